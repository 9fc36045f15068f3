// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations persisted to the write-ahead log

use crate::input::AnalysisInput;
use crate::state::AnalysisState;
use serde::{Deserialize, Serialize};

/// A durable change to orchestration state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Current state of a task after a tick
    StateSaved { state: AnalysisState },
    /// A stage reached a terminal status and was superseded or finished
    StateCompleted { state: AnalysisState },
    /// Follow-up input waiting to be driven
    InputQueued { input: AnalysisInput },
    /// Oldest queued input handed to a driver
    InputDequeued,
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
