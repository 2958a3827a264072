// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plan classification for pharmacy benefit cards.
//!
//! This crate provides:
//! - [`DeterministicClassifier`]: exact BIN/PCN and BIN reference lookups
//! - [`HeuristicClassifier`]: weighted pattern scoring with a threshold
//! - [`ClassificationEngine`]: the pipeline every transport calls

pub mod deterministic;
pub mod engine;
pub mod heuristic;

pub use deterministic::DeterministicClassifier;
pub use engine::ClassificationEngine;
pub use heuristic::{HeuristicClassifier, Scores};
