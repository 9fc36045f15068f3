// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake worker dispatch service for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DispatchError, WorkerDispatch};
use async_trait::async_trait;
use cv_core::{DispatchRequest, WorkerTaskStatus};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Recorded dispatch service call
#[derive(Debug, Clone)]
pub enum DispatchCall {
    Dispatch { request: DispatchRequest },
    PollStatus { worker_task_id: String },
}

#[derive(Default)]
struct FakeDispatchState {
    next_id: u64,
    /// Poll answers per worker task; the last answer repeats
    statuses: HashMap<String, VecDeque<WorkerTaskStatus>>,
    /// Poll script applied to upcoming dispatches, in order
    scripts: VecDeque<Vec<WorkerTaskStatus>>,
    default_status: Option<WorkerTaskStatus>,
    failing_dispatches: u32,
    failing_polls: u32,
    empty_ids: bool,
}

/// Fake worker dispatch service for testing
///
/// Dispatched tasks get ids `worker-1`, `worker-2`, ... and report `Success`
/// unless scripted otherwise.
#[derive(Clone, Default)]
pub struct FakeWorkerDispatch {
    state: Arc<Mutex<FakeDispatchState>>,
    calls: Arc<Mutex<Vec<DispatchCall>>>,
}

impl FakeWorkerDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<DispatchCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Requests passed to `dispatch`, in order
    pub fn dispatched(&self) -> Vec<DispatchRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DispatchCall::Dispatch { request } => Some(request),
                DispatchCall::PollStatus { .. } => None,
            })
            .collect()
    }

    /// Number of status polls made so far
    pub fn poll_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, DispatchCall::PollStatus { .. }))
            .count()
    }

    /// Status reported by tasks with no script
    pub fn set_default_status(&self, status: WorkerTaskStatus) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).default_status = Some(status);
    }

    /// Poll answers for the next dispatched task; the last answer repeats
    pub fn script_next(&self, statuses: Vec<WorkerTaskStatus>) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .scripts
            .push_back(statuses);
    }

    /// Override the status of an already dispatched task
    pub fn set_status(&self, worker_task_id: &str, status: WorkerTaskStatus) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .statuses
            .insert(worker_task_id.to_string(), VecDeque::from([status]));
    }

    /// Fail the next `count` dispatch calls
    pub fn fail_dispatches(&self, count: u32) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).failing_dispatches = count;
    }

    /// Fail the next `count` poll calls
    pub fn fail_polls(&self, count: u32) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).failing_polls = count;
    }

    /// Answer dispatches with an empty id
    pub fn return_empty_ids(&self, empty: bool) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).empty_ids = empty;
    }
}

#[async_trait]
impl WorkerDispatch for FakeWorkerDispatch {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<String, DispatchError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(DispatchCall::Dispatch {
                request: request.clone(),
            });

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.failing_dispatches > 0 {
            state.failing_dispatches -= 1;
            return Err(DispatchError::Unavailable("injected dispatch failure".into()));
        }
        if state.empty_ids {
            return Ok(String::new());
        }

        state.next_id += 1;
        let id = format!("worker-{}", state.next_id);
        let script = state.scripts.pop_front().unwrap_or_default();
        state.statuses.insert(id.clone(), script.into());
        Ok(id)
    }

    async fn poll_status(&self, worker_task_id: &str) -> Result<WorkerTaskStatus, DispatchError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(DispatchCall::PollStatus {
                worker_task_id: worker_task_id.to_string(),
            });

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.failing_polls > 0 {
            state.failing_polls -= 1;
            return Err(DispatchError::Unavailable("injected poll failure".into()));
        }

        let default_status = state
            .default_status
            .clone()
            .unwrap_or(WorkerTaskStatus::Success);
        let queue = state
            .statuses
            .get_mut(worker_task_id)
            .ok_or_else(|| DispatchError::TaskNotFound(worker_task_id.to_string()))?;

        let status = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(status.unwrap_or(default_status))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
