// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analysis orchestrator: drives states through their stages

use crate::error::OrchestratorError;
use crate::executor::{ExecutorConfig, ExecutorDeps, ExecutorSet, StateExecutor};
use crate::metrics::{record_mark, DurationGuard};
use cv_adapters::{
    HostInventory, MetricsSink, RecordWriter, TaskDirectory, TracedWorkerDispatch, WorkerDispatch,
};
use cv_core::{
    AnalysisInput, AnalysisState, AnalysisStatus, ClusterLevel, DataKind, Operation,
    OrchestratorConfig, StateKind, TaskOwner, VerificationTaskType,
};
use cv_storage::{MaterializedState, Wal};
use std::sync::{Arc, Mutex};
use tracing::Instrument;

/// Orchestrator dependencies
pub struct OrchestratorDeps<W, D, I, R, M> {
    pub dispatch: W,
    pub directory: D,
    pub inventory: I,
    pub records: R,
    pub metrics: M,
    pub wal: Arc<Mutex<Wal>>,
    pub state: Arc<Mutex<MaterializedState>>,
}

/// Outcome of advancing one state by one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    /// State to persist and drive next
    pub state: AnalysisState,
    /// States that reached a terminal status during the step, oldest first
    pub completed: Vec<AnalysisState>,
    /// Inputs to queue for later analysis
    pub follow_ups: Vec<AnalysisInput>,
}

impl Tick {
    fn idle(state: AnalysisState) -> Self {
        Self {
            state,
            completed: Vec::new(),
            follow_ups: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Drives analysis inputs through their stage pipelines
pub struct Orchestrator<W, D, I, R, M> {
    executors: ExecutorSet<TracedWorkerDispatch<W>, D, I, R>,
    directory: D,
    metrics: M,
    wal: Arc<Mutex<Wal>>,
    state: Arc<Mutex<MaterializedState>>,
    config: OrchestratorConfig,
}

impl<W, D, I, R, M> Orchestrator<W, D, I, R, M>
where
    W: WorkerDispatch,
    D: TaskDirectory,
    I: HostInventory,
    R: RecordWriter,
    M: MetricsSink,
{
    pub fn new(deps: OrchestratorDeps<W, D, I, R, M>, config: OrchestratorConfig) -> Self {
        let executors = ExecutorSet::new(
            ExecutorDeps {
                dispatch: TracedWorkerDispatch::new(deps.dispatch),
                directory: deps.directory.clone(),
                inventory: deps.inventory,
                records: deps.records,
            },
            ExecutorConfig::from(&config),
        );
        Self {
            executors,
            directory: deps.directory,
            metrics: deps.metrics,
            wal: deps.wal,
            state: deps.state,
            config,
        }
    }

    /// Build the first stage for an input from its task type and owner
    pub async fn initial_state(
        &self,
        input: AnalysisInput,
    ) -> Result<AnalysisState, OrchestratorError> {
        let owner = self
            .directory
            .resolve_owner(input.verification_task_id())
            .await?;
        let task_type = input.task_type().unwrap_or_else(|| owner.task_type());

        let kind = match task_type {
            VerificationTaskType::Sli => StateKind::SliMetricAnalysis,
            VerificationTaskType::CompositeSlo => StateKind::CompositeSloMetricAnalysis,
            VerificationTaskType::LiveMonitoring => match owner.data_kind() {
                Some(DataKind::Logs) => StateKind::service_guard_log_cluster(ClusterLevel::L1),
                _ => StateKind::ServiceGuardTimeSeries {
                    worker_task_id: None,
                },
            },
            VerificationTaskType::Deployment => deployment_start(&owner, &input),
        };

        Ok(AnalysisState::new(input.with_task_type(task_type), kind))
    }

    /// Advance a state by one step: execute a new state, or poll and apply
    /// the matching handler. Terminal states come back unchanged.
    pub async fn advance(&self, state: AnalysisState) -> Result<Tick, OrchestratorError> {
        if state.is_terminal() {
            return Ok(Tick::idle(state));
        }

        let stage = state.stage();
        let span = tracing::info_span!(
            "analysis.tick",
            task_id = %state.verification_task_id(),
            %stage,
            status = %state.status,
            retry_count = state.retry_count,
        );
        let _timer = DurationGuard::new(self.metrics.clone(), format!("analysis.{}.tick", stage));

        async move {
            let executor = self.executors.for_stage(stage);
            let state = match state.status {
                AnalysisStatus::Created => executor.execute(state).await?,
                _ => {
                    let status = executor.execution_status(&state).await?;
                    handle_status(executor, state, status).await?
                }
            };
            let tick = settle(executor, state).await?;
            if tick.is_terminal() {
                record_mark(
                    &self.metrics,
                    &format!(
                        "analysis.{}.{}",
                        tick.state.stage(),
                        tick.state.status.as_str().to_ascii_lowercase()
                    ),
                );
            }

            tracing::info!(
                status = %tick.state.status,
                next_stage = %tick.state.stage(),
                completed = tick.completed.len(),
                follow_ups = tick.follow_ups.len(),
                "advanced"
            );
            Ok(tick)
        }
        .instrument(span)
        .await
    }

    /// Read a task's state, advance it, and persist the outcome
    pub async fn tick(&self, task_id: &str) -> Result<Tick, OrchestratorError> {
        let state = self
            .lock_state()
            .get_state(task_id)
            .cloned()
            .ok_or_else(|| OrchestratorError::TaskNotFound(task_id.to_string()))?;

        let tick = self.advance(state).await?;
        self.record(&tick)?;
        Ok(tick)
    }

    /// Create and persist the first stage of an input
    pub async fn start(&self, input: AnalysisInput) -> Result<AnalysisState, OrchestratorError> {
        let state = self.initial_state(input).await?;
        tracing::info!(
            task_id = %state.verification_task_id(),
            stage = %state.stage(),
            "analysis started"
        );
        self.persist(Operation::StateSaved {
            state: state.clone(),
        })?;
        Ok(state)
    }

    /// Run an input's pipeline until a terminal status
    pub async fn drive_to_terminal(
        &self,
        input: AnalysisInput,
    ) -> Result<AnalysisState, OrchestratorError> {
        let state = self.start(input).await?;
        self.drive(state.verification_task_id()).await
    }

    /// Tick a stored task until it is terminal, sleeping between polls of
    /// running work
    pub async fn drive(&self, task_id: &str) -> Result<AnalysisState, OrchestratorError> {
        for _ in 0..self.config.max_ticks {
            let tick = self.tick(task_id).await?;
            if tick.is_terminal() {
                return Ok(tick.state);
            }
            if tick.state.status == AnalysisStatus::Running {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }

        tracing::error!(task_id, ticks = self.config.max_ticks, "tick limit reached");
        Err(OrchestratorError::TickLimit {
            task_id: task_id.to_string(),
            ticks: self.config.max_ticks,
        })
    }

    /// Drive every stored task that was left unfinished, e.g. before a restart
    pub async fn resume_pending(&self) -> Result<Vec<AnalysisState>, OrchestratorError> {
        let pending = self.lock_state().pending_tasks();
        let mut finished = Vec::with_capacity(pending.len());
        for task_id in pending {
            tracing::info!(task_id = %task_id, "resuming analysis");
            finished.push(self.drive(&task_id).await?);
        }
        Ok(finished)
    }

    /// Queue an input for a later drive
    pub fn enqueue(&self, input: AnalysisInput) -> Result<(), OrchestratorError> {
        self.persist(Operation::InputQueued { input })
    }

    /// Take the oldest queued input
    pub fn next_queued(&self) -> Result<Option<AnalysisInput>, OrchestratorError> {
        let next = self.lock_state().queue.front().cloned();
        if next.is_some() {
            self.persist(Operation::InputDequeued)?;
        }
        Ok(next)
    }

    /// Current state of a task, by id or unique prefix
    pub fn current_state(&self, task_id: &str) -> Option<AnalysisState> {
        self.lock_state().get_state(task_id).cloned()
    }

    /// Terminal stages a task has passed through, oldest first
    pub fn completed_stages(&self, task_id: &str) -> Vec<AnalysisState> {
        self.lock_state().completed_stages(task_id).to_vec()
    }

    fn record(&self, tick: &Tick) -> Result<(), OrchestratorError> {
        for state in &tick.completed {
            self.persist(Operation::StateCompleted {
                state: state.clone(),
            })?;
        }
        self.persist(Operation::StateSaved {
            state: tick.state.clone(),
        })?;
        for input in &tick.follow_ups {
            self.persist(Operation::InputQueued {
                input: input.clone(),
            })?;
        }
        Ok(())
    }

    fn persist(&self, op: Operation) -> Result<(), OrchestratorError> {
        {
            let mut wal = self.wal.lock().unwrap_or_else(|e| e.into_inner());
            wal.append(&op)?;
        }
        self.lock_state().apply(&op);
        Ok(())
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, MaterializedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// First stage of a deployment verification task
fn deployment_start(owner: &TaskOwner, input: &AnalysisInput) -> StateKind {
    match owner.data_kind() {
        Some(DataKind::Logs) if owner.covers_pre_deployment(input.window()) => {
            StateKind::pre_deployment_log_cluster()
        }
        Some(DataKind::Logs) => StateKind::deployment_log_cluster(ClusterLevel::L1),
        _ if owner.strategy().is_some() => StateKind::deployment_metric_host_sampling(),
        _ => StateKind::DeploymentTimeSeriesAnalysis {
            worker_task_id: None,
            learning_engine_task_type: None,
        },
    }
}

/// Apply the handler matching a polled status
async fn handle_status(
    executor: &dyn StateExecutor,
    mut state: AnalysisState,
    status: AnalysisStatus,
) -> Result<AnalysisState, OrchestratorError> {
    let state = match status {
        AnalysisStatus::Running => {
            let mut state = executor.handle_running(state);
            if state.status != AnalysisStatus::Transition {
                state.status = AnalysisStatus::Running;
            }
            state
        }
        AnalysisStatus::Retry => executor.handle_retry(state).await?,
        AnalysisStatus::Created => state,
        AnalysisStatus::Transition
        | AnalysisStatus::Success
        | AnalysisStatus::Failed
        | AnalysisStatus::Ignored => {
            state.status = status;
            state
        }
    };
    Ok(state)
}

/// Resolve `Transition` and `Success` within the tick that produced them
async fn settle(
    executor: &dyn StateExecutor,
    state: AnalysisState,
) -> Result<Tick, OrchestratorError> {
    let mut completed = Vec::new();
    let mut follow_ups = Vec::new();

    let state = match state.status {
        AnalysisStatus::Transition => {
            let mut current = state.clone();
            let next = executor.handle_transition(state).await?;
            match next.status {
                AnalysisStatus::Created => {
                    current.status = AnalysisStatus::Success;
                    completed.push(current);
                    next
                }
                AnalysisStatus::Success => {
                    let (done, queued) = executor.handle_success(next).await?;
                    follow_ups = queued;
                    done
                }
                _ => next,
            }
        }
        AnalysisStatus::Success => {
            let (done, queued) = executor.handle_success(state).await?;
            follow_ups = queued;
            done
        }
        _ => state,
    };

    if state.is_terminal() {
        executor.handle_final_statuses(&state);
        completed.push(state.clone());
    }

    Ok(Tick {
        state,
        completed,
        follow_ups,
    })
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
