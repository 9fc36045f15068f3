// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Analysis state machine engine

mod error;
pub mod executor;
mod metrics;
mod orchestrator;

pub use error::{OrchestratorError, StateMachineError};
pub use executor::{ExecutorConfig, ExecutorDeps, ExecutorSet, StateExecutor};
pub use metrics::DurationGuard;
pub use orchestrator::{Orchestrator, OrchestratorDeps, Tick};
