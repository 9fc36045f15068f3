// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log clustering stages that fan out over worker tasks

use super::{
    ensure_stage, finished, needs_retry, poll_workers, successor, ExecutorConfig, StateExecutor,
};
use crate::error::StateMachineError;
use async_trait::async_trait;
use cv_adapters::{TaskDirectory, WorkerDispatch};
use cv_core::{
    AnalysisState, AnalysisStatus, ClusterLevel, DispatchRequest, StageType, StateKind,
    TimeWindow, WorkerTaskKind,
};
use std::collections::BTreeSet;

/// Executor for service guard, deployment and pre-deployment log clustering.
///
/// Level one and pre-deployment clustering dispatch one worker task per
/// `cluster_shard` of the window; level two clusters the whole window at once.
pub struct LogClusterExecutor<W, D> {
    stage: StageType,
    dispatch: W,
    directory: D,
    config: ExecutorConfig,
}

impl<W, D> LogClusterExecutor<W, D>
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
        match (&state.kind, state.kind.cluster_level()) {
            (StateKind::ServiceGuardLogCluster { .. }, Some(level)) => {
                Ok(WorkerTaskKind::ServiceGuardLogCluster(level))
            }
            (StateKind::DeploymentLogCluster { .. }, Some(level)) => {
                Ok(WorkerTaskKind::DeploymentLogCluster(level))
            }
            (StateKind::PreDeploymentLogCluster { .. }, _) => {
                Ok(WorkerTaskKind::PreDeploymentLogCluster)
            }
            _ => Err(StateMachineError::StageMismatch {
                expected: self.stage,
                actual: state.stage(),
            }),
        }
    }

    fn windows(&self, state: &AnalysisState) -> Vec<TimeWindow> {
        let window = state.inputs.window();
        match state.kind.cluster_level() {
            Some(ClusterLevel::L2) => vec![window],
            _ => window.shards(self.config.cluster_shard),
        }
    }

    /// Deployment clustering hands off to host sampling only when the job
    /// declares how it deploys
    async fn after_deployment_clustering(&self, state: AnalysisState) -> AnalysisState {
        match self.directory.resolve_owner(state.verification_task_id()).await {
            Ok(owner) if owner.strategy().is_some() => {
                successor(&state, StateKind::deployment_log_host_sampling())
            }
            Ok(_) => match StateKind::single_dispatch(StageType::DeploymentLogAnalysis) {
                Some(kind) => successor(&state, kind),
                None => finished(state),
            },
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
impl<W, D> StateExecutor for LogClusterExecutor<W, D>
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
        let kind = self.task_kind(&state)?;
        let base = DispatchRequest::for_input(kind, &state.inputs);

        let mut ids = BTreeSet::new();
        for window in self.windows(&state) {
            match self.dispatch.dispatch(&base.clone().with_window(window)).await {
                Ok(id) if id.trim().is_empty() => {
                    return Err(StateMachineError::MissingWorkerTaskId { stage: self.stage })
                }
                Ok(id) => {
                    ids.insert(id);
                }
                Err(e) => {
                    tracing::warn!(
                        task_id = %state.verification_task_id(),
                        stage = %self.stage,
                        %window,
                        error = %e,
                        "dispatch failed"
                    );
                    state.clear_worker_tasks();
                    state.status = AnalysisStatus::Retry;
                    return Ok(state);
                }
            }
        }

        if ids.is_empty() {
            return Err(StateMachineError::EmptyFanOut { stage: self.stage });
        }

        tracing::info!(
            task_id = %state.verification_task_id(),
            stage = %self.stage,
            %kind,
            worker_tasks = ids.len(),
            "dispatched clustering"
        );
        if let Some(slot) = state.worker_task_ids_mut() {
            *slot = ids;
        }
        state.status = AnalysisStatus::Running;
        Ok(state)
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
        let next = match (&state.kind, state.kind.cluster_level()) {
            (StateKind::ServiceGuardLogCluster { .. }, Some(ClusterLevel::L1)) => successor(
                &state,
                StateKind::service_guard_log_cluster(ClusterLevel::L2),
            ),
            (StateKind::ServiceGuardLogCluster { .. }, _) => {
                match StateKind::single_dispatch(StageType::ServiceGuardLogAnalysis) {
                    Some(kind) => successor(&state, kind),
                    None => finished(state),
                }
            }
            (StateKind::DeploymentLogCluster { .. }, Some(ClusterLevel::L1)) => {
                successor(&state, StateKind::deployment_log_cluster(ClusterLevel::L2))
            }
            (StateKind::DeploymentLogCluster { .. }, _) => {
                self.after_deployment_clustering(state).await
            }
            _ => finished(state),
        };
        Ok(next)
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
