// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analysis record writer for stages that compute synchronously

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRecordWriter, RecordCall};

use async_trait::async_trait;
use cv_core::AnalysisInput;
use thiserror::Error;

/// Errors from producing analysis records
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("source data unavailable: {0}")]
    DataUnavailable(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
}

/// Reads a window of data and writes the derived analysis records
#[async_trait]
pub trait RecordWriter: Clone + Send + Sync + 'static {
    /// Compute and store SLI records for the input window, returning the count
    async fn write_sli_records(&self, input: &AnalysisInput) -> Result<usize, RecordError>;

    /// Aggregate referenced SLI records into composite rollups, returning the count
    async fn write_composite_rollup(&self, input: &AnalysisInput) -> Result<usize, RecordError>;
}
