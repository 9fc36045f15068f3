// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analysis input: the immutable description of one unit of work

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Errors from building an analysis input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("verification task id must not be empty")]
    EmptyTaskId,
    #[error("invalid window for {task_id}: start {start} is not before end {end}")]
    InvalidWindow {
        task_id: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Kind of verification task an input belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationTaskType {
    LiveMonitoring,
    Sli,
    Deployment,
    CompositeSlo,
}

/// Half-open time range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Split the window into consecutive shards of at most `shard` length.
    ///
    /// Returns an empty list for an empty window or a non-positive shard size.
    pub fn shards(&self, shard: Duration) -> Vec<TimeWindow> {
        let mut shards = Vec::new();
        if shard <= Duration::zero() {
            return shards;
        }
        let mut cursor = self.start;
        while cursor < self.end {
            let next = cursor
                .checked_add_signed(shard)
                .map_or(self.end, |next| next.min(self.end));
            shards.push(TimeWindow::new(cursor, next));
            cursor = next;
        }
        shards
    }

    /// The window of equal length directly after this one.
    ///
    /// `None` when the end of that window is past the representable range.
    pub fn following(&self) -> Option<TimeWindow> {
        let end = self.end.checked_add_signed(self.duration())?;
        Some(TimeWindow::new(self.end, end))
    }

    /// The window of equal length directly before this one.
    ///
    /// `None` when the start of that window is before the representable range.
    pub fn preceding(&self) -> Option<TimeWindow> {
        let start = self.start.checked_sub_signed(self.duration())?;
        Some(TimeWindow::new(start, self.start))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Parameters for one analysis run over one verification task.
///
/// Inputs are never mutated in place. Stages that need a different window or
/// host set build a new input with the `with_*` helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    verification_task_id: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    control_hosts: Option<BTreeSet<String>>,
    test_hosts: Option<BTreeSet<String>>,
    task_type: Option<VerificationTaskType>,
    is_restore_task: bool,
}

impl AnalysisInput {
    /// Create an input for the window `[start_time, end_time)`
    pub fn new(
        verification_task_id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, InputError> {
        let verification_task_id = verification_task_id.into();
        if verification_task_id.trim().is_empty() {
            return Err(InputError::EmptyTaskId);
        }
        if start_time >= end_time {
            return Err(InputError::InvalidWindow {
                task_id: verification_task_id,
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            verification_task_id,
            start_time,
            end_time,
            control_hosts: None,
            test_hosts: None,
            task_type: None,
            is_restore_task: false,
        })
    }

    pub fn verification_task_id(&self) -> &str {
        &self.verification_task_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }

    pub fn control_hosts(&self) -> Option<&BTreeSet<String>> {
        self.control_hosts.as_ref()
    }

    pub fn test_hosts(&self) -> Option<&BTreeSet<String>> {
        self.test_hosts.as_ref()
    }

    pub fn task_type(&self) -> Option<VerificationTaskType> {
        self.task_type
    }

    pub fn is_restore_task(&self) -> bool {
        self.is_restore_task
    }

    /// Copy of this input with the given control/test host sets
    pub fn with_hosts(&self, control: BTreeSet<String>, test: BTreeSet<String>) -> Self {
        Self {
            control_hosts: Some(control),
            test_hosts: Some(test),
            ..self.clone()
        }
    }

    /// Copy of this input tagged with a task type
    pub fn with_task_type(&self, task_type: VerificationTaskType) -> Self {
        Self {
            task_type: Some(task_type),
            ..self.clone()
        }
    }

    /// Copy of this input flagged as a restore run
    pub fn as_restore(&self) -> Self {
        Self {
            is_restore_task: true,
            ..self.clone()
        }
    }

    /// Input for another task over the same window, keeping the restore flag
    pub fn for_task(&self, verification_task_id: impl Into<String>) -> Self {
        Self {
            verification_task_id: verification_task_id.into(),
            control_hosts: None,
            test_hosts: None,
            task_type: None,
            ..self.clone()
        }
    }

    /// Input for the same task over the next window of equal length.
    ///
    /// Host sets and the restore flag do not carry over. `None` when the next
    /// window would overflow the time range.
    pub fn next_window(&self) -> Option<Self> {
        let next = self.window().following()?;
        Some(Self {
            verification_task_id: self.verification_task_id.clone(),
            start_time: next.start,
            end_time: next.end,
            control_hosts: None,
            test_hosts: None,
            task_type: self.task_type,
            is_restore_task: false,
        })
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
