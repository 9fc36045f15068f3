// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Verification task directory

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTaskDirectory;

use async_trait::async_trait;
use cv_core::{CompositeRef, TaskOwner};
use thiserror::Error;

/// Errors from directory lookups
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("verification task not found: {0}")]
    TaskNotFound(String),
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Resolves verification tasks to the objects that own them
#[async_trait]
pub trait TaskDirectory: Clone + Send + Sync + 'static {
    /// Owner of a verification task
    async fn resolve_owner(&self, verification_task_id: &str) -> Result<TaskOwner, DirectoryError>;

    /// Composite objectives that aggregate the given SLI
    async fn referencing_composites(&self, sli_id: &str)
        -> Result<Vec<CompositeRef>, DirectoryError>;
}
