// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker dispatch requests

use crate::input::{AnalysisInput, TimeWindow};
use crate::sampling::LearningEngineTaskType;
use crate::state::ClusterLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of computation a worker is asked to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerTaskKind {
    ServiceGuardLogCluster(ClusterLevel),
    ServiceGuardLogAnalysis,
    ServiceGuardTrendAnalysis,
    ServiceGuardTimeSeries,
    PreDeploymentLogCluster,
    DeploymentLogCluster(ClusterLevel),
    DeploymentLogAnalysis(LearningEngineTaskType),
    DeploymentLogFeedback,
    DeploymentTimeSeries(LearningEngineTaskType),
}

impl fmt::Display for WorkerTaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerTaskKind::ServiceGuardLogCluster(level) => {
                write!(f, "service_guard_log_cluster_{}", level)
            }
            WorkerTaskKind::ServiceGuardLogAnalysis => f.write_str("service_guard_log_analysis"),
            WorkerTaskKind::ServiceGuardTrendAnalysis => {
                f.write_str("service_guard_trend_analysis")
            }
            WorkerTaskKind::ServiceGuardTimeSeries => f.write_str("service_guard_time_series"),
            WorkerTaskKind::PreDeploymentLogCluster => f.write_str("pre_deployment_log_cluster"),
            WorkerTaskKind::DeploymentLogCluster(level) => {
                write!(f, "deployment_log_cluster_{}", level)
            }
            WorkerTaskKind::DeploymentLogAnalysis(LearningEngineTaskType::Canary) => {
                f.write_str("canary_deployment_log")
            }
            WorkerTaskKind::DeploymentLogAnalysis(LearningEngineTaskType::BeforeAfter) => {
                f.write_str("before_after_deployment_log")
            }
            WorkerTaskKind::DeploymentLogFeedback => f.write_str("deployment_log_feedback"),
            WorkerTaskKind::DeploymentTimeSeries(LearningEngineTaskType::Canary) => {
                f.write_str("canary_deployment_time_series")
            }
            WorkerTaskKind::DeploymentTimeSeries(LearningEngineTaskType::BeforeAfter) => {
                f.write_str("before_after_deployment_time_series")
            }
        }
    }
}

/// A unit of work handed to the worker dispatch service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub kind: WorkerTaskKind,
    pub verification_task_id: String,
    pub window: TimeWindow,
    pub control_hosts: Option<BTreeSet<String>>,
    pub test_hosts: Option<BTreeSet<String>>,
}

impl DispatchRequest {
    /// Request covering the input's whole window and host sets
    pub fn for_input(kind: WorkerTaskKind, input: &AnalysisInput) -> Self {
        Self {
            kind,
            verification_task_id: input.verification_task_id().to_string(),
            window: input.window(),
            control_hosts: input.control_hosts().cloned(),
            test_hosts: input.test_hosts().cloned(),
        }
    }

    /// Narrow the request to a sub-window
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }
}
