// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker dispatch service

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DispatchCall, FakeWorkerDispatch};

use async_trait::async_trait;
use cv_core::{DispatchRequest, WorkerTaskStatus};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Errors from the worker dispatch service
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch rejected: {0}")]
    Rejected(String),
    #[error("worker service unavailable: {0}")]
    Unavailable(String),
    #[error("worker task not found: {0}")]
    TaskNotFound(String),
}

/// Schedules external computation and answers status queries
#[async_trait]
pub trait WorkerDispatch: Clone + Send + Sync + 'static {
    /// Schedule a worker task, returning its id
    async fn dispatch(&self, request: &DispatchRequest) -> Result<String, DispatchError>;

    /// Current status of one worker task
    async fn poll_status(&self, worker_task_id: &str) -> Result<WorkerTaskStatus, DispatchError>;

    /// Statuses of several worker tasks.
    ///
    /// Ids absent from the returned map were not answered by the service.
    async fn poll_statuses(
        &self,
        worker_task_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, WorkerTaskStatus>, DispatchError> {
        let mut statuses = HashMap::with_capacity(worker_task_ids.len());
        for id in worker_task_ids {
            statuses.insert(id.clone(), self.poll_status(id).await?);
        }
        Ok(statuses)
    }
}
