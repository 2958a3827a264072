// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for rxplan.
//!
//! Provides the error type, the card/result domain types, the field
//! normalizer, and the fetcher trait used by every other crate in the
//! workspace.

pub mod error;
pub mod normalize;
pub mod traits;
pub mod types;

pub use error::RxplanError;
pub use normalize::normalize;
pub use traits::ReferenceFetcher;
pub use types::{
    CardFields, ClassificationResult, DecisionStage, HealthStatus, NormalizedCardFields,
    PlanCategory, SourceId, UNKNOWN_PLAN,
};
