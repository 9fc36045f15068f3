// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::dispatch::{DispatchError, WorkerDispatch};
use async_trait::async_trait;
use cv_core::{DispatchRequest, WorkerTaskStatus};
use std::collections::{BTreeSet, HashMap};
use tracing::Instrument;

/// Wrapper that adds tracing to any WorkerDispatch
#[derive(Clone)]
pub struct TracedWorkerDispatch<W> {
    inner: W,
}

impl<W> TracedWorkerDispatch<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<W: WorkerDispatch> WorkerDispatch for TracedWorkerDispatch<W> {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<String, DispatchError> {
        let span = tracing::info_span!(
            "worker.dispatch",
            kind = %request.kind,
            task_id = %request.verification_task_id,
        );
        async {
            tracing::info!(window = %request.window, "dispatching");

            // Precondition: the window must not be empty
            if request.window.start >= request.window.end {
                tracing::error!("empty dispatch window");
                return Err(DispatchError::Rejected(format!(
                    "empty window {} for {}",
                    request.window, request.verification_task_id
                )));
            }

            let start = std::time::Instant::now();
            let result = self.inner.dispatch(request).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(worker_task_id) => tracing::info!(
                    worker_task_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "dispatched"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "dispatch failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn poll_status(&self, worker_task_id: &str) -> Result<WorkerTaskStatus, DispatchError> {
        let result = self.inner.poll_status(worker_task_id).await;
        match &result {
            Ok(status) => tracing::debug!(worker_task_id, %status, "polled"),
            // A failed poll is retried by the next tick
            Err(e) => tracing::warn!(worker_task_id, error = %e, "poll failed"),
        }
        result
    }

    async fn poll_statuses(
        &self,
        worker_task_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, WorkerTaskStatus>, DispatchError> {
        let span = tracing::info_span!("worker.poll", count = worker_task_ids.len());
        async {
            let result = self.inner.poll_statuses(worker_task_ids).await;
            tracing::debug!(
                answered = result.as_ref().map(|m| m.len()).ok(),
                "polled batch"
            );
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
