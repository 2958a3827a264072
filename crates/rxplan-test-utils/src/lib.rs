// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for rxplan integration tests.
//!
//! Provides fixture CSVs, a scripted fetcher, and a harness that assembles
//! store, engine, and refresher over a temp cache directory, so tests run
//! without network access.
//!
//! # Components
//!
//! - [`fixtures`] - Small Part D and Medicaid reference CSVs
//! - [`MockFetcher`] - Fetcher with per-location scripted responses
//! - [`TestHarness`] - Store + engine + refresher wired together

pub mod fixtures;
pub mod harness;
pub mod mock_fetcher;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_fetcher::MockFetcher;
