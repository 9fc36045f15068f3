// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-stage state executors
//!
//! Every stage implements [`StateExecutor`]. The orchestrator picks the
//! executor for a state's stage from an [`ExecutorSet`] and drives it one
//! handler per tick.

mod cluster;
mod dispatch;
mod sampling;
mod set;
mod slo;

pub use cluster::LogClusterExecutor;
pub use dispatch::DispatchExecutor;
pub use sampling::HostSamplingExecutor;
pub use set::{ExecutorDeps, ExecutorSet};
pub use slo::{CompositeSloExecutor, SliExecutor};

use crate::error::StateMachineError;
use async_trait::async_trait;
use cv_adapters::WorkerDispatch;
use cv_core::{
    AnalysisInput, AnalysisState, AnalysisStatus, OrchestratorConfig, StageType, StateKind,
    WorkerTaskStatus,
};

/// Settings every executor needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Reruns allowed before a stage gives up
    pub max_retry: u32,
    /// Window length of one L1 log clustering task
    pub cluster_shard: chrono::Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::from(&OrchestratorConfig::default())
    }
}

impl From<&OrchestratorConfig> for ExecutorConfig {
    fn from(config: &OrchestratorConfig) -> Self {
        Self {
            max_retry: config.max_retry,
            // Too large to represent means one shard covers any window
            cluster_shard: chrono::Duration::from_std(config.cluster_shard)
                .unwrap_or(chrono::Duration::MAX),
        }
    }
}

/// Behavior of one pipeline stage
#[async_trait]
pub trait StateExecutor: Send + Sync {
    /// Stage this executor drives
    fn stage(&self) -> StageType;

    fn config(&self) -> &ExecutorConfig;

    /// Start the stage's work: dispatch worker tasks or compute in place
    async fn execute(&self, state: AnalysisState) -> Result<AnalysisState, StateMachineError>;

    /// Current status of the stage's work. `Success` is returned as-is without polling.
    async fn execution_status(
        &self,
        state: &AnalysisState,
    ) -> Result<AnalysisStatus, StateMachineError>;

    fn handle_running(&self, state: AnalysisState) -> AnalysisState {
        state
    }

    /// Mark the stage successful, returning inputs to queue after it
    async fn handle_success(
        &self,
        mut state: AnalysisState,
    ) -> Result<(AnalysisState, Vec<AnalysisInput>), StateMachineError> {
        state.status = AnalysisStatus::Success;
        Ok((state, Vec::new()))
    }

    /// Finish the stage's work.
    ///
    /// Returns a `Created` state of the successor stage, the same state in
    /// `Success` when the stage ends the pipeline, or the same state in
    /// `Retry` when the successor cannot be decided yet.
    async fn handle_transition(
        &self,
        state: AnalysisState,
    ) -> Result<AnalysisState, StateMachineError>;

    /// Run the stage again from scratch
    async fn handle_rerun(
        &self,
        mut state: AnalysisState,
    ) -> Result<AnalysisState, StateMachineError> {
        state.retry_count += 1;
        state.clear_worker_tasks();
        tracing::info!(
            task_id = %state.verification_task_id(),
            stage = %state.stage(),
            retry_count = state.retry_count,
            "rerunning stage"
        );
        self.execute(state).await
    }

    /// Rerun the stage unless the retry budget is spent
    async fn handle_retry(
        &self,
        mut state: AnalysisState,
    ) -> Result<AnalysisState, StateMachineError> {
        if state.retry_count >= self.config().max_retry {
            state.status = self.exhausted_status();
            tracing::warn!(
                task_id = %state.verification_task_id(),
                stage = %state.stage(),
                retry_count = state.retry_count,
                status = %state.status,
                "retries exhausted"
            );
            return Ok(state);
        }
        self.handle_rerun(state).await
    }

    /// Terminal status once the retry budget is spent
    fn exhausted_status(&self) -> AnalysisStatus {
        AnalysisStatus::Failed
    }

    /// Report a terminal state to the owner's progress log
    fn handle_final_statuses(&self, state: &AnalysisState) {
        if state.status.is_failure() {
            tracing::warn!(
                task_id = %state.verification_task_id(),
                stage = %state.stage(),
                status = %state.status,
                retry_count = state.retry_count,
                "analysis finished without success"
            );
        } else {
            tracing::info!(
                task_id = %state.verification_task_id(),
                stage = %state.stage(),
                status = %state.status,
                "analysis finished"
            );
        }
    }
}

/// Reject a state that belongs to another stage
pub(crate) fn ensure_stage(
    expected: StageType,
    state: &AnalysisState,
) -> Result<(), StateMachineError> {
    let actual = state.stage();
    if actual != expected {
        return Err(StateMachineError::StageMismatch { expected, actual });
    }
    Ok(())
}

/// Fresh `Created` state of `kind` over the same input
pub(crate) fn successor(state: &AnalysisState, kind: StateKind) -> AnalysisState {
    AnalysisState::new(state.inputs.clone(), kind)
}

/// Current state marked as the end of its pipeline
pub(crate) fn finished(mut state: AnalysisState) -> AnalysisState {
    state.status = AnalysisStatus::Success;
    state
}

/// Current state sent through the retry gate on the next tick
pub(crate) fn needs_retry(mut state: AnalysisState) -> AnalysisState {
    state.status = AnalysisStatus::Retry;
    state
}

/// Fold worker statuses into one stage status.
///
/// All succeeded is `Transition`. Any queued or running worker keeps the
/// stage `Running`, even next to a failed sibling, so a rerun never races
/// shards that are still computing. Otherwise any failure or timeout is
/// `Retry`. No workers at all is `Retry`.
pub fn reduce_worker_statuses(
    task_id: &str,
    statuses: &[(String, WorkerTaskStatus)],
) -> Result<AnalysisStatus, StateMachineError> {
    if statuses.is_empty() {
        return Ok(AnalysisStatus::Retry);
    }

    let mut running = false;
    let mut failed = false;
    for (worker_task_id, status) in statuses {
        match status {
            WorkerTaskStatus::Success => {}
            WorkerTaskStatus::Queued | WorkerTaskStatus::Running => running = true,
            WorkerTaskStatus::Failed | WorkerTaskStatus::Timeout => failed = true,
            WorkerTaskStatus::Unrecognized(status) => {
                return Err(StateMachineError::UnrecognizedWorkerStatus {
                    task_id: task_id.to_string(),
                    worker_task_id: worker_task_id.clone(),
                    status: status.clone(),
                })
            }
        }
    }

    Ok(if running {
        AnalysisStatus::Running
    } else if failed {
        AnalysisStatus::Retry
    } else {
        AnalysisStatus::Transition
    })
}

/// Poll every worker task recorded on the state and reduce the answers.
///
/// Ids the service leaves unanswered, or whose poll fails, count as failed.
pub(crate) async fn poll_workers<W: WorkerDispatch>(
    dispatch: &W,
    state: &AnalysisState,
) -> Result<AnalysisStatus, StateMachineError> {
    match state.status {
        AnalysisStatus::Success => return Ok(AnalysisStatus::Success),
        // Finished work whose hand-off failed goes back through the retry gate
        AnalysisStatus::Retry => return Ok(AnalysisStatus::Retry),
        _ => {}
    }

    let ids = state.worker_task_ids();
    if ids.is_empty() {
        return Ok(AnalysisStatus::Retry);
    }

    let task_id = state.verification_task_id();
    let statuses = match dispatch.poll_statuses(&ids).await {
        Ok(mut answered) => ids
            .into_iter()
            .map(|id| {
                let status = answered.remove(&id).unwrap_or_else(|| {
                    tracing::warn!(task_id, worker_task_id = %id, "no status reported");
                    WorkerTaskStatus::Failed
                });
                (id, status)
            })
            .collect::<Vec<_>>(),
        Err(e) => {
            tracing::warn!(task_id, error = %e, "batch poll failed, polling individually");
            let mut statuses = Vec::with_capacity(ids.len());
            for id in ids {
                let status = dispatch
                    .poll_status(&id)
                    .await
                    .unwrap_or(WorkerTaskStatus::Failed);
                statuses.push((id, status));
            }
            statuses
        }
    };

    reduce_worker_statuses(task_id, &statuses)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
