// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host inventory: which instances reported data in a time range

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeHostInventory;

use async_trait::async_trait;
use cv_core::TimeWindow;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors from host lookups
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("host data unavailable for {task_id}: {reason}")]
    Unavailable { task_id: String, reason: String },
}

/// Looks up the hosts seen for a verification task
#[async_trait]
pub trait HostInventory: Clone + Send + Sync + 'static {
    async fn hosts(
        &self,
        verification_task_id: &str,
        window: TimeWindow,
    ) -> Result<BTreeSet<String>, InventoryError>;
}
