// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for orchestrator specs

#![allow(dead_code)]

pub use chrono::{DateTime, TimeZone, Utc};
pub use cv_adapters::{
    FakeHostInventory, FakeMetricsSink, FakeRecordWriter, FakeTaskDirectory, FakeWorkerDispatch,
    RecordCall,
};
pub use cv_core::{
    AnalysisInput, AnalysisState, AnalysisStatus, ClusterLevel, CompositeRef, DataKind,
    DeploymentStrategy, LearningEngineTaskType, OrchestratorConfig, StageType, TaskOwner,
    TimeWindow, VerificationTaskType, WorkerTaskKind, WorkerTaskStatus,
};
pub use cv_engine::{Orchestrator, OrchestratorDeps, OrchestratorError};

use cv_storage::Wal;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub type FakeOrchestrator = Orchestrator<
    FakeWorkerDispatch,
    FakeTaskDirectory,
    FakeHostInventory,
    FakeRecordWriter,
    FakeMetricsSink,
>;

/// Orchestrator over fake collaborators with a WAL in a temp directory
pub struct World {
    pub dispatch: FakeWorkerDispatch,
    pub directory: FakeTaskDirectory,
    pub inventory: FakeHostInventory,
    pub records: FakeRecordWriter,
    pub metrics: FakeMetricsSink,
    pub orchestrator: FakeOrchestrator,
    config: OrchestratorConfig,
    wal_path: PathBuf,
    _dir: TempDir,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(OrchestratorConfig {
            poll_interval: Duration::from_millis(1),
            ..OrchestratorConfig::default()
        })
    }

    pub fn with_config(config: OrchestratorConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let wal_path = dir.path().join("state").join("analysis.wal");
        let dispatch = FakeWorkerDispatch::new();
        let directory = FakeTaskDirectory::new();
        let inventory = FakeHostInventory::new();
        let records = FakeRecordWriter::new();
        let metrics = FakeMetricsSink::new();
        let orchestrator = open(
            &wal_path,
            &dispatch,
            &directory,
            &inventory,
            &records,
            &metrics,
            config.clone(),
        );

        Self {
            dispatch,
            directory,
            inventory,
            records,
            metrics,
            orchestrator,
            config,
            wal_path,
            _dir: dir,
        }
    }

    /// Simulate a process restart: rebuild an orchestrator from the WAL
    pub fn restart(&self) -> FakeOrchestrator {
        open(
            &self.wal_path,
            &self.dispatch,
            &self.directory,
            &self.inventory,
            &self.records,
            &self.metrics,
            self.config.clone(),
        )
    }

    /// Stage sequence a task has completed, with cluster levels spelled out
    pub fn trail(&self, task_id: &str) -> Vec<String> {
        trail(&self.orchestrator.completed_stages(task_id))
    }

    pub fn dispatched_kinds(&self) -> Vec<WorkerTaskKind> {
        self.dispatch
            .dispatched()
            .into_iter()
            .map(|r| r.kind)
            .collect()
    }
}

fn open(
    wal_path: &Path,
    dispatch: &FakeWorkerDispatch,
    directory: &FakeTaskDirectory,
    inventory: &FakeHostInventory,
    records: &FakeRecordWriter,
    metrics: &FakeMetricsSink,
    config: OrchestratorConfig,
) -> FakeOrchestrator {
    let (wal, state) = Wal::load(wal_path).unwrap();
    Orchestrator::new(
        OrchestratorDeps {
            dispatch: dispatch.clone(),
            directory: directory.clone(),
            inventory: inventory.clone(),
            records: records.clone(),
            metrics: metrics.clone(),
            wal: Arc::new(Mutex::new(wal)),
            state: Arc::new(Mutex::new(state)),
        },
        config,
    )
}

pub fn trail(states: &[AnalysisState]) -> Vec<String> {
    states
        .iter()
        .map(|s| match s.kind.cluster_level() {
            Some(level) => format!("{}:{}", s.stage(), level),
            None => s.stage().to_string(),
        })
        .collect()
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, hour, minute, 0).unwrap()
}

/// Ten-minute analysis window starting at 10:00
pub fn input(task_id: &str) -> AnalysisInput {
    AnalysisInput::new(task_id, at(10, 0), at(10, 10)).unwrap()
}

/// Ten minutes before the analysis window
pub fn baseline() -> TimeWindow {
    TimeWindow::new(at(9, 50), at(10, 0))
}

pub fn deployment_job(data_kind: DataKind, strategy: Option<DeploymentStrategy>) -> TaskOwner {
    TaskOwner::VerificationJob {
        job_id: "deploy-42".to_string(),
        data_kind,
        strategy,
        pre_deployment: baseline(),
        is_pre_deployment_task: false,
        feedback_enabled: false,
    }
}

pub fn monitored_service(data_kind: DataKind) -> TaskOwner {
    TaskOwner::MonitoredService {
        monitored_service_id: "checkout".to_string(),
        data_kind,
    }
}

pub fn host_set(names: &[&str]) -> std::collections::BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}
