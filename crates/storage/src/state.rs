// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use cv_core::{AnalysisInput, AnalysisState, Operation};
use std::collections::{HashMap, VecDeque};

/// Orchestration state built from WAL operations
#[derive(Debug, Default)]
pub struct MaterializedState {
    /// Current state per verification task id
    pub states: HashMap<String, AnalysisState>,
    /// Stages that reached a terminal status, oldest first, per task id
    pub history: HashMap<String, Vec<AnalysisState>>,
    /// Follow-up inputs waiting for a driver
    pub queue: VecDeque<AnalysisInput>,
}

impl MaterializedState {
    /// Rebuild state by applying operations in order
    pub fn from_operations(ops: &[Operation]) -> Self {
        let mut state = Self::default();
        for op in ops {
            state.apply(op);
        }
        state
    }

    /// Get a task's current state by id or unique prefix (like git commit hashes)
    pub fn get_state(&self, task_id: &str) -> Option<&AnalysisState> {
        // Try exact match first
        if let Some(state) = self.states.get(task_id) {
            return Some(state);
        }

        let mut matches = self
            .states
            .iter()
            .filter(|(k, _)| k.starts_with(task_id))
            .map(|(_, v)| v);

        // Only return if exactly one match (unambiguous)
        match (matches.next(), matches.next()) {
            (Some(state), None) => Some(state),
            _ => None,
        }
    }

    /// Completed stages of a task, oldest first
    pub fn completed_stages(&self, task_id: &str) -> &[AnalysisState] {
        self.history
            .get(task_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Ids of tasks whose current state still needs driving, sorted
    pub fn pending_tasks(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .states
            .iter()
            .filter(|(_, state)| !state.is_terminal())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::StateSaved { state } => {
                self.states
                    .insert(state.verification_task_id().to_string(), state.clone());
            }

            Operation::StateCompleted { state } => {
                self.history
                    .entry(state.verification_task_id().to_string())
                    .or_default()
                    .push(state.clone());
            }

            Operation::InputQueued { input } => {
                self.queue.push_back(input.clone());
            }

            Operation::InputDequeued => {
                self.queue.pop_front();
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
