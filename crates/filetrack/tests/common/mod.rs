//! Shared test utilities for filetrack integration tests.
//!
//! This module provides:
//! - `TestHarness` for loading policy and dataset files from a temp directory
//! - Builders for creating case files and officers programmatically

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
