// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cv-core: Core types for the analysis state machine orchestrator
//!
//! This crate provides:
//! - Analysis inputs, statuses and the per-stage state record
//! - The pure host sampling (control/test partition) algorithm
//! - Owner metadata and worker dispatch requests shared with adapters
//! - Orchestrator configuration and storage operations

pub mod config;
pub mod dispatch;
pub mod input;
pub mod operation;
pub mod owner;
pub mod sampling;
pub mod state;
pub mod status;

pub use config::{ConfigError, OrchestratorConfig};
pub use dispatch::{DispatchRequest, WorkerTaskKind};
pub use input::{AnalysisInput, InputError, TimeWindow, VerificationTaskType};
pub use operation::Operation;
pub use owner::{CompositeRef, DataKind, DeploymentStrategy, TaskOwner};
pub use sampling::{partition_hosts, HostPartition, LearningEngineTaskType};
pub use state::{AnalysisState, ClusterLevel, StageType, StateKind};
pub use status::{AnalysisStatus, WorkerTaskStatus};
