// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owners of verification tasks, as resolved by the task directory

use crate::input::{TimeWindow, VerificationTaskType};
use serde::{Deserialize, Serialize};

/// How a deployment rolled out new instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStrategy {
    Canary,
    Rolling,
    BlueGreen,
    Auto,
}

/// Kind of data a health source produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Logs,
    Metrics,
}

/// A composite objective that aggregates an SLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeRef {
    pub objective_id: String,
    /// Verification task that runs the composite's own analysis
    pub verification_task_id: String,
}

/// The object a verification task belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskOwner {
    Sli {
        sli_id: String,
    },
    CompositeSlo {
        objective_id: String,
    },
    MonitoredService {
        monitored_service_id: String,
        data_kind: DataKind,
    },
    VerificationJob {
        job_id: String,
        data_kind: DataKind,
        /// `None` for jobs that are not deployment comparisons (e.g. load tests)
        strategy: Option<DeploymentStrategy>,
        /// Window before the deployment, used for baseline hosts
        pre_deployment: TimeWindow,
        /// The task analyzes the pre-deployment window itself
        #[serde(default)]
        is_pre_deployment_task: bool,
        #[serde(default)]
        feedback_enabled: bool,
    },
}

impl TaskOwner {
    /// Task type implied by this owner
    pub fn task_type(&self) -> VerificationTaskType {
        match self {
            TaskOwner::Sli { .. } => VerificationTaskType::Sli,
            TaskOwner::CompositeSlo { .. } => VerificationTaskType::CompositeSlo,
            TaskOwner::MonitoredService { .. } => VerificationTaskType::LiveMonitoring,
            TaskOwner::VerificationJob { .. } => VerificationTaskType::Deployment,
        }
    }

    /// Identifier of the owner, whatever its kind
    pub fn id(&self) -> &str {
        match self {
            TaskOwner::Sli { sli_id } => sli_id,
            TaskOwner::CompositeSlo { objective_id } => objective_id,
            TaskOwner::MonitoredService {
                monitored_service_id,
                ..
            } => monitored_service_id,
            TaskOwner::VerificationJob { job_id, .. } => job_id,
        }
    }

    pub fn strategy(&self) -> Option<DeploymentStrategy> {
        match self {
            TaskOwner::VerificationJob { strategy, .. } => *strategy,
            _ => None,
        }
    }

    /// Kind of data analysed, for owners that collect a single kind
    pub fn data_kind(&self) -> Option<DataKind> {
        match self {
            TaskOwner::MonitoredService { data_kind, .. }
            | TaskOwner::VerificationJob { data_kind, .. } => Some(*data_kind),
            _ => None,
        }
    }

    /// Baseline window of a verification job
    pub fn pre_deployment_window(&self) -> Option<TimeWindow> {
        match self {
            TaskOwner::VerificationJob { pre_deployment, .. } => Some(*pre_deployment),
            _ => None,
        }
    }

    /// Whether an analysis of `window` belongs to the job's pre-deployment phase
    pub fn covers_pre_deployment(&self, window: TimeWindow) -> bool {
        match self {
            TaskOwner::VerificationJob {
                pre_deployment,
                is_pre_deployment_task,
                ..
            } => *is_pre_deployment_task || window.end <= pre_deployment.end,
            _ => false,
        }
    }

    pub fn feedback_enabled(&self) -> bool {
        matches!(
            self,
            TaskOwner::VerificationJob {
                feedback_enabled: true,
                ..
            }
        )
    }
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
