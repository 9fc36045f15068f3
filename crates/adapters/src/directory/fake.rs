// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake task directory for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DirectoryError, TaskDirectory};
use async_trait::async_trait;
use cv_core::{CompositeRef, TaskOwner};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Entries {
    owners: HashMap<String, TaskOwner>,
    composites: HashMap<String, Vec<CompositeRef>>,
    failing_lookups: u32,
}

/// In-memory task directory for testing
#[derive(Clone, Default)]
pub struct FakeTaskDirectory {
    entries: Arc<Mutex<Entries>>,
}

impl FakeTaskDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the owner of a verification task
    pub fn add_owner(&self, verification_task_id: &str, owner: TaskOwner) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .owners
            .insert(verification_task_id.to_string(), owner);
    }

    /// Register a composite objective referencing an SLI
    pub fn add_composite(&self, sli_id: &str, composite: CompositeRef) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .composites
            .entry(sli_id.to_string())
            .or_default()
            .push(composite);
    }

    /// Fail the next `count` lookups of either kind
    pub fn fail_lookups(&self, count: u32) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failing_lookups = count;
    }

    fn take_failure(entries: &mut Entries) -> Result<(), DirectoryError> {
        if entries.failing_lookups > 0 {
            entries.failing_lookups -= 1;
            return Err(DirectoryError::Unavailable("injected lookup failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskDirectory for FakeTaskDirectory {
    async fn resolve_owner(&self, verification_task_id: &str) -> Result<TaskOwner, DirectoryError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Self::take_failure(&mut entries)?;
        entries
            .owners
            .get(verification_task_id)
            .cloned()
            .ok_or_else(|| DirectoryError::TaskNotFound(verification_task_id.to_string()))
    }

    async fn referencing_composites(
        &self,
        sli_id: &str,
    ) -> Result<Vec<CompositeRef>, DirectoryError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Self::take_failure(&mut entries)?;
        Ok(entries.composites.get(sli_id).cloned().unwrap_or_default())
    }
}
