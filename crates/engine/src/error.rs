// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the analysis engine

use cv_core::StageType;
use thiserror::Error;

/// Invariant violations inside the state machine. These halt the driver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("unrecognized status {status:?} for worker task {worker_task_id} of {task_id}")]
    UnrecognizedWorkerStatus {
        task_id: String,
        worker_task_id: String,
        status: String,
    },
    #[error("worker dispatch returned an empty id for {stage}")]
    MissingWorkerTaskId { stage: StageType },
    #[error("{stage} scheduled no worker tasks")]
    EmptyFanOut { stage: StageType },
    #[error("executor for {expected} was handed a {actual} state")]
    StageMismatch {
        expected: StageType,
        actual: StageType,
    },
}

/// Errors that can occur while driving analyses
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("state machine error: {0}")]
    StateMachine(#[from] StateMachineError),
    #[error("storage error: {0}")]
    Storage(#[from] cv_storage::WalError),
    #[error("invalid input: {0}")]
    Input(#[from] cv_core::InputError),
    #[error("directory error: {0}")]
    Directory(#[from] cv_adapters::DirectoryError),
    #[error("{task_id} not terminal after {ticks} ticks")]
    TickLimit { task_id: String, ticks: u32 },
    #[error("no analysis state for task: {0}")]
    TaskNotFound(String),
}
