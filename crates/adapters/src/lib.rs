// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the orchestrator's external collaborators

pub mod directory;
pub mod dispatch;
pub mod inventory;
pub mod metrics;
pub mod records;
pub mod traced;

pub use directory::{DirectoryError, TaskDirectory};
pub use dispatch::{DispatchError, WorkerDispatch};
pub use inventory::{HostInventory, InventoryError};
pub use metrics::{MetricsError, MetricsSink, NoOpMetricsSink};
pub use records::{RecordError, RecordWriter};
pub use traced::TracedWorkerDispatch;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use directory::FakeTaskDirectory;
#[cfg(any(test, feature = "test-support"))]
pub use dispatch::{DispatchCall, FakeWorkerDispatch};
#[cfg(any(test, feature = "test-support"))]
pub use inventory::FakeHostInventory;
#[cfg(any(test, feature = "test-support"))]
pub use metrics::{FakeMetricsSink, MetricRecord};
#[cfg(any(test, feature = "test-support"))]
pub use records::{FakeRecordWriter, RecordCall};
