// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SLI and composite SLO analysis, computed in place

use super::{ensure_stage, finished, ExecutorConfig, StateExecutor};
use crate::error::StateMachineError;
use async_trait::async_trait;
use cv_adapters::{DirectoryError, RecordError, RecordWriter, TaskDirectory};
use cv_core::{
    AnalysisInput, AnalysisState, AnalysisStatus, StageType, TaskOwner, VerificationTaskType,
};

/// Shared execute path: write records, `Success` on completion, `Retry` when
/// the source data is not there yet
fn record_outcome(
    mut state: AnalysisState,
    written: Result<usize, RecordError>,
) -> AnalysisState {
    match written {
        Ok(records) => {
            tracing::info!(
                task_id = %state.verification_task_id(),
                stage = %state.stage(),
                records,
                "records written"
            );
            state.status = AnalysisStatus::Success;
        }
        Err(e) => {
            tracing::warn!(
                task_id = %state.verification_task_id(),
                stage = %state.stage(),
                error = %e,
                "record write failed"
            );
            state.status = AnalysisStatus::Retry;
        }
    }
    state
}

/// SLI metric analysis
pub struct SliExecutor<D, R> {
    directory: D,
    records: R,
    config: ExecutorConfig,
}

impl<D, R> SliExecutor<D, R>
where
    D: TaskDirectory,
    R: RecordWriter,
{
    pub fn new(directory: D, records: R, config: ExecutorConfig) -> Self {
        Self {
            directory,
            records,
            config,
        }
    }

    /// Inputs re-running every composite built on this SLI over the same window
    async fn composite_restores(
        &self,
        input: &AnalysisInput,
    ) -> Result<Vec<AnalysisInput>, DirectoryError> {
        let sli_id = match self.directory.resolve_owner(input.verification_task_id()).await? {
            TaskOwner::Sli { sli_id } => sli_id,
            other => {
                tracing::warn!(
                    task_id = %input.verification_task_id(),
                    owner = %other.id(),
                    "restored task is not owned by an SLI, composites not restored"
                );
                return Ok(Vec::new());
            }
        };
        let composites = self.directory.referencing_composites(&sli_id).await?;
        Ok(composites
            .into_iter()
            .map(|composite| {
                input
                    .for_task(composite.verification_task_id)
                    .with_task_type(VerificationTaskType::CompositeSlo)
            })
            .collect())
    }
}

#[async_trait]
impl<D, R> StateExecutor for SliExecutor<D, R>
where
    D: TaskDirectory,
    R: RecordWriter,
{
    fn stage(&self) -> StageType {
        StageType::SliMetricAnalysis
    }

    fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    async fn execute(&self, state: AnalysisState) -> Result<AnalysisState, StateMachineError> {
        ensure_stage(StageType::SliMetricAnalysis, &state)?;
        let written = self.records.write_sli_records(&state.inputs).await;
        Ok(record_outcome(state, written))
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

    async fn handle_success(
        &self,
        mut state: AnalysisState,
    ) -> Result<(AnalysisState, Vec<AnalysisInput>), StateMachineError> {
        state.status = AnalysisStatus::Success;
        if !state.inputs.is_restore_task() {
            return Ok((state, Vec::new()));
        }

        let follow_ups = match self.composite_restores(&state.inputs).await {
            Ok(inputs) => inputs,
            Err(e) => {
                tracing::warn!(
                    task_id = %state.verification_task_id(),
                    error = %e,
                    "composite lookup failed, composites not restored"
                );
                Vec::new()
            }
        };
        Ok((state, follow_ups))
    }

    async fn handle_transition(
        &self,
        state: AnalysisState,
    ) -> Result<AnalysisState, StateMachineError> {
        ensure_stage(StageType::SliMetricAnalysis, &state)?;
        Ok(finished(state))
    }
}

/// Composite SLO analysis over the SLIs it references
pub struct CompositeSloExecutor<R> {
    records: R,
    config: ExecutorConfig,
}

impl<R: RecordWriter> CompositeSloExecutor<R> {
    pub fn new(records: R, config: ExecutorConfig) -> Self {
        Self { records, config }
    }
}

#[async_trait]
impl<R: RecordWriter> StateExecutor for CompositeSloExecutor<R> {
    fn stage(&self) -> StageType {
        StageType::CompositeSloMetricAnalysis
    }

    fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    async fn execute(&self, state: AnalysisState) -> Result<AnalysisState, StateMachineError> {
        ensure_stage(StageType::CompositeSloMetricAnalysis, &state)?;
        let written = self.records.write_composite_rollup(&state.inputs).await;
        Ok(record_outcome(state, written))
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

    /// Queues the next window of the same length, unless it would overflow
    /// the time range
    async fn handle_success(
        &self,
        mut state: AnalysisState,
    ) -> Result<(AnalysisState, Vec<AnalysisInput>), StateMachineError> {
        state.status = AnalysisStatus::Success;
        match state.inputs.next_window() {
            Some(next) => Ok((state, vec![next])),
            None => {
                tracing::warn!(
                    task_id = %state.verification_task_id(),
                    window = %state.inputs.window(),
                    "next window out of range, not queued"
                );
                Ok((state, Vec::new()))
            }
        }
    }

    async fn handle_transition(
        &self,
        state: AnalysisState,
    ) -> Result<AnalysisState, StateMachineError> {
        ensure_stage(StageType::CompositeSloMetricAnalysis, &state)?;
        Ok(finished(state))
    }
}

#[cfg(test)]
#[path = "slo_tests.rs"]
mod tests;
