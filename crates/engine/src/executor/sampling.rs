// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host sampling: split deployment hosts into control and test sets

use super::{ensure_stage, successor, ExecutorConfig, StateExecutor};
use crate::error::StateMachineError;
use async_trait::async_trait;
use cv_adapters::{HostInventory, TaskDirectory};
use cv_core::{
    partition_hosts, AnalysisState, AnalysisStatus, DeploymentStrategy, HostPartition,
    LearningEngineTaskType, StageType, StateKind,
};

/// Executor for log and metric host sampling. Computes in place; no worker
/// task is dispatched.
pub struct HostSamplingExecutor<D, I> {
    stage: StageType,
    directory: D,
    inventory: I,
    config: ExecutorConfig,
}

impl<D, I> HostSamplingExecutor<D, I>
where
    D: TaskDirectory,
    I: HostInventory,
{
    pub fn new(stage: StageType, directory: D, inventory: I, config: ExecutorConfig) -> Self {
        Self {
            stage,
            directory,
            inventory,
            config,
        }
    }

    async fn sample(&self, state: &AnalysisState) -> Result<HostPartition, String> {
        let task_id = state.verification_task_id();
        let window = state.inputs.window();
        let owner = self
            .directory
            .resolve_owner(task_id)
            .await
            .map_err(|e| e.to_string())?;

        let strategy = owner.strategy().unwrap_or(DeploymentStrategy::Auto);
        let baseline = match owner.pre_deployment_window() {
            Some(baseline) => baseline,
            None => window
                .preceding()
                .ok_or_else(|| format!("no baseline window before {window}"))?,
        };

        let pre = self
            .inventory
            .hosts(task_id, baseline)
            .await
            .map_err(|e| e.to_string())?;
        let post = self
            .inventory
            .hosts(task_id, window)
            .await
            .map_err(|e| e.to_string())?;

        Ok(partition_hosts(&pre, &post, strategy))
    }

    fn next_stage(&self) -> StageType {
        match self.stage {
            StageType::DeploymentMetricHostSampling => StageType::DeploymentTimeSeriesAnalysis,
            _ => StageType::DeploymentLogAnalysis,
        }
    }
}

#[async_trait]
impl<D, I> StateExecutor for HostSamplingExecutor<D, I>
where
    D: TaskDirectory,
    I: HostInventory,
{
    fn stage(&self) -> StageType {
        self.stage
    }

    fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    async fn execute(&self, mut state: AnalysisState) -> Result<AnalysisState, StateMachineError> {
        ensure_stage(self.stage, &state)?;

        let partition = match self.sample(&state).await {
            Ok(partition) => partition,
            Err(reason) => {
                tracing::warn!(
                    task_id = %state.verification_task_id(),
                    stage = %self.stage,
                    %reason,
                    "host sampling input unavailable"
                );
                state.status = AnalysisStatus::Retry;
                return Ok(state);
            }
        };

        tracing::info!(
            task_id = %state.verification_task_id(),
            control = partition.control.len(),
            test = partition.test.len(),
            task_type = ?partition.task_type,
            "sampled hosts"
        );
        match &mut state.kind {
            StateKind::DeploymentLogHostSampling {
                control_hosts,
                test_hosts,
                learning_engine_task_type,
            }
            | StateKind::DeploymentMetricHostSampling {
                control_hosts,
                test_hosts,
                learning_engine_task_type,
            } => {
                *control_hosts = partition.control;
                *test_hosts = partition.test;
                *learning_engine_task_type = Some(partition.task_type);
            }
            _ => {
                return Err(StateMachineError::StageMismatch {
                    expected: self.stage,
                    actual: state.stage(),
                })
            }
        }
        state.status = AnalysisStatus::Transition;
        Ok(state)
    }

    async fn execution_status(
        &self,
        state: &AnalysisState,
    ) -> Result<AnalysisStatus, StateMachineError> {
        Ok(state.status)
    }

    fn handle_running(&self, mut state: AnalysisState) -> AnalysisState {
        state.status = AnalysisStatus::Transition;
        state
    }

    async fn handle_transition(
        &self,
        state: AnalysisState,
    ) -> Result<AnalysisState, StateMachineError> {
        ensure_stage(self.stage, &state)?;
        let (control, test, task_type) = match &state.kind {
            StateKind::DeploymentLogHostSampling {
                control_hosts,
                test_hosts,
                learning_engine_task_type,
            }
            | StateKind::DeploymentMetricHostSampling {
                control_hosts,
                test_hosts,
                learning_engine_task_type,
            } => (
                control_hosts.clone(),
                test_hosts.clone(),
                learning_engine_task_type.unwrap_or(LearningEngineTaskType::BeforeAfter),
            ),
            _ => {
                return Err(StateMachineError::StageMismatch {
                    expected: self.stage,
                    actual: state.stage(),
                })
            }
        };

        let stage = self.next_stage();
        let kind = StateKind::deployment_analysis(stage, task_type).ok_or(
            StateMachineError::StageMismatch {
                expected: stage,
                actual: self.stage,
            },
        )?;
        let mut next = successor(&state, kind);
        next.inputs = state.inputs.with_hosts(control, test);
        Ok(next)
    }
}

#[cfg(test)]
#[path = "sampling_tests.rs"]
mod tests;
