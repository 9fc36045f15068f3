// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analysis and worker task statuses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of one analysis state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    /// Built but not yet executed
    Created,
    /// Work dispatched, waiting on workers
    Running,
    /// Last attempt failed, waiting for the retry gate
    Retry,
    /// Work finished, next stage pending
    Transition,
    Success,
    Failed,
    /// Gave up on a best-effort stage
    Ignored,
}

impl AnalysisStatus {
    /// No further driving happens from this status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnalysisStatus::Success | AnalysisStatus::Failed | AnalysisStatus::Ignored
        )
    }

    /// Terminal without success
    pub fn is_failure(&self) -> bool {
        matches!(self, AnalysisStatus::Failed | AnalysisStatus::Ignored)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Created => "CREATED",
            AnalysisStatus::Running => "RUNNING",
            AnalysisStatus::Retry => "RETRY",
            AnalysisStatus::Transition => "TRANSITION",
            AnalysisStatus::Success => "SUCCESS",
            AnalysisStatus::Failed => "FAILED",
            AnalysisStatus::Ignored => "IGNORED",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of an external worker task as reported by the dispatch service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkerTaskStatus {
    Queued,
    Running,
    Success,
    Failed,
    Timeout,
    /// A status value this engine does not know how to interpret
    Unrecognized(String),
}

impl FromStr for WorkerTaskStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "QUEUED" => WorkerTaskStatus::Queued,
            "RUNNING" => WorkerTaskStatus::Running,
            "SUCCESS" => WorkerTaskStatus::Success,
            "FAILED" => WorkerTaskStatus::Failed,
            "TIMEOUT" => WorkerTaskStatus::Timeout,
            _ => WorkerTaskStatus::Unrecognized(s.to_string()),
        })
    }
}

impl fmt::Display for WorkerTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerTaskStatus::Queued => f.write_str("QUEUED"),
            WorkerTaskStatus::Running => f.write_str("RUNNING"),
            WorkerTaskStatus::Success => f.write_str("SUCCESS"),
            WorkerTaskStatus::Failed => f.write_str("FAILED"),
            WorkerTaskStatus::Timeout => f.write_str("TIMEOUT"),
            WorkerTaskStatus::Unrecognized(raw) => write!(f, "UNRECOGNIZED({})", raw),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
