// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake host inventory for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{HostInventory, InventoryError};
use async_trait::async_trait;
use cv_core::TimeWindow;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inventory {
    hosts: HashMap<(String, TimeWindow), BTreeSet<String>>,
    failing_lookups: u32,
}

/// In-memory host inventory keyed by task and exact window
#[derive(Clone, Default)]
pub struct FakeHostInventory {
    inner: Arc<Mutex<Inventory>>,
}

impl FakeHostInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hosts seen for a task over a window
    pub fn set_hosts(&self, verification_task_id: &str, window: TimeWindow, hosts: &[&str]) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .hosts
            .insert(
                (verification_task_id.to_string(), window),
                hosts.iter().map(|h| h.to_string()).collect(),
            );
    }

    /// Fail the next `count` lookups
    pub fn fail_lookups(&self, count: u32) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failing_lookups = count;
    }
}

#[async_trait]
impl HostInventory for FakeHostInventory {
    async fn hosts(
        &self,
        verification_task_id: &str,
        window: TimeWindow,
    ) -> Result<BTreeSet<String>, InventoryError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.failing_lookups > 0 {
            inner.failing_lookups -= 1;
            return Err(InventoryError::Unavailable {
                task_id: verification_task_id.to_string(),
                reason: "injected lookup failure".into(),
            });
        }
        Ok(inner
            .hosts
            .get(&(verification_task_id.to_string(), window))
            .cloned()
            .unwrap_or_default())
    }
}
