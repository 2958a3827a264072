// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the engine and its I/O collaborators.

pub mod fetcher;

pub use fetcher::ReferenceFetcher;
