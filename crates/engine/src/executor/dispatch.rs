// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stages that hand one task to a worker

use super::{
    ensure_stage, finished, needs_retry, poll_workers, successor, ExecutorConfig, StateExecutor,
};
use crate::error::StateMachineError;
use async_trait::async_trait;
use cv_adapters::{TaskDirectory, WorkerDispatch};
use cv_core::{
    AnalysisState, AnalysisStatus, DispatchRequest, LearningEngineTaskType, StageType, StateKind,
    WorkerTaskKind,
};

/// Executor for a single-dispatch stage: service guard log, trend and
/// time-series analysis, and deployment log, feedback and time-series analysis
pub struct DispatchExecutor<W, D> {
    stage: StageType,
    dispatch: W,
    directory: D,
    config: ExecutorConfig,
}

impl<W, D> DispatchExecutor<W, D>
where
    W: WorkerDispatch,
    D: TaskDirectory,
{
    pub fn new(stage: StageType, dispatch: W, directory: D, config: ExecutorConfig) -> Self {
        Self {
            stage,
            dispatch,
            directory,
            config,
        }
    }

    fn task_kind(&self, state: &AnalysisState) -> Result<WorkerTaskKind, StateMachineError> {
        let sampled = state
            .kind
            .learning_engine_task_type()
            .unwrap_or(LearningEngineTaskType::BeforeAfter);
        let kind = match self.stage {
            StageType::ServiceGuardLogAnalysis => WorkerTaskKind::ServiceGuardLogAnalysis,
            StageType::ServiceGuardTrendAnalysis => WorkerTaskKind::ServiceGuardTrendAnalysis,
            StageType::ServiceGuardTimeSeries => WorkerTaskKind::ServiceGuardTimeSeries,
            StageType::DeploymentLogAnalysis => WorkerTaskKind::DeploymentLogAnalysis(sampled),
            StageType::DeploymentLogFeedback => WorkerTaskKind::DeploymentLogFeedback,
            StageType::DeploymentTimeSeriesAnalysis => {
                WorkerTaskKind::DeploymentTimeSeries(sampled)
            }
            other => {
                return Err(StateMachineError::StageMismatch {
                    expected: other,
                    actual: state.stage(),
                })
            }
        };
        Ok(kind)
    }

    /// Successor of deployment log analysis depends on the job's feedback setting
    async fn after_log_analysis(&self, state: AnalysisState) -> AnalysisState {
        match self.directory.resolve_owner(state.verification_task_id()).await {
            Ok(owner) if owner.feedback_enabled() => {
                match StateKind::single_dispatch(StageType::DeploymentLogFeedback) {
                    Some(kind) => successor(&state, kind),
                    None => finished(state),
                }
            }
            Ok(_) => finished(state),
            Err(e) => {
                tracing::warn!(
                    task_id = %state.verification_task_id(),
                    error = %e,
                    "owner lookup failed, retrying stage"
                );
                needs_retry(state)
            }
        }
    }
}

#[async_trait]
impl<W, D> StateExecutor for DispatchExecutor<W, D>
where
    W: WorkerDispatch,
    D: TaskDirectory,
{
    fn stage(&self) -> StageType {
        self.stage
    }

    fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    async fn execute(&self, mut state: AnalysisState) -> Result<AnalysisState, StateMachineError> {
        ensure_stage(self.stage, &state)?;
        let request = DispatchRequest::for_input(self.task_kind(&state)?, &state.inputs);

        match self.dispatch.dispatch(&request).await {
            Ok(id) if id.trim().is_empty() => {
                Err(StateMachineError::MissingWorkerTaskId { stage: self.stage })
            }
            Ok(id) => {
                if let Some(slot) = state.worker_task_id_mut() {
                    *slot = Some(id);
                }
                state.status = AnalysisStatus::Running;
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(
                    task_id = %state.verification_task_id(),
                    stage = %self.stage,
                    error = %e,
                    "dispatch failed"
                );
                state.status = AnalysisStatus::Retry;
                Ok(state)
            }
        }
    }

    async fn execution_status(
        &self,
        state: &AnalysisState,
    ) -> Result<AnalysisStatus, StateMachineError> {
        poll_workers(&self.dispatch, state).await
    }

    async fn handle_transition(
        &self,
        state: AnalysisState,
    ) -> Result<AnalysisState, StateMachineError> {
        ensure_stage(self.stage, &state)?;
        let next = match self.stage {
            StageType::ServiceGuardLogAnalysis => {
                match StateKind::single_dispatch(StageType::ServiceGuardTrendAnalysis) {
                    Some(kind) => successor(&state, kind),
                    None => finished(state),
                }
            }
            StageType::DeploymentLogAnalysis => self.after_log_analysis(state).await,
            _ => finished(state),
        };
        Ok(next)
    }

    fn exhausted_status(&self) -> AnalysisStatus {
        match self.stage {
            StageType::ServiceGuardLogAnalysis | StageType::ServiceGuardTrendAnalysis => {
                AnalysisStatus::Ignored
            }
            _ => AnalysisStatus::Failed,
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
