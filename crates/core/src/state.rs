// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analysis state: shared fields plus a per-stage payload

use crate::input::AnalysisInput;
use crate::sampling::LearningEngineTaskType;
use crate::status::AnalysisStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Log clustering level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterLevel {
    /// Per-shard clustering of raw log lines
    L1,
    /// Clustering of the L1 output over the whole window
    L2,
}

impl fmt::Display for ClusterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterLevel::L1 => f.write_str("l1"),
            ClusterLevel::L2 => f.write_str("l2"),
        }
    }
}

/// Pipeline stage, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    ServiceGuardLogCluster,
    ServiceGuardLogAnalysis,
    ServiceGuardTrendAnalysis,
    ServiceGuardTimeSeries,
    PreDeploymentLogCluster,
    DeploymentLogCluster,
    DeploymentLogHostSampling,
    DeploymentLogAnalysis,
    DeploymentLogFeedback,
    DeploymentMetricHostSampling,
    DeploymentTimeSeriesAnalysis,
    SliMetricAnalysis,
    CompositeSloMetricAnalysis,
}

impl StageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageType::ServiceGuardLogCluster => "service_guard_log_cluster",
            StageType::ServiceGuardLogAnalysis => "service_guard_log_analysis",
            StageType::ServiceGuardTrendAnalysis => "service_guard_trend_analysis",
            StageType::ServiceGuardTimeSeries => "service_guard_time_series",
            StageType::PreDeploymentLogCluster => "pre_deployment_log_cluster",
            StageType::DeploymentLogCluster => "deployment_log_cluster",
            StageType::DeploymentLogHostSampling => "deployment_log_host_sampling",
            StageType::DeploymentLogAnalysis => "deployment_log_analysis",
            StageType::DeploymentLogFeedback => "deployment_log_feedback",
            StageType::DeploymentMetricHostSampling => "deployment_metric_host_sampling",
            StageType::DeploymentTimeSeriesAnalysis => "deployment_time_series_analysis",
            StageType::SliMetricAnalysis => "sli_metric_analysis",
            StageType::CompositeSloMetricAnalysis => "composite_slo_metric_analysis",
        }
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage-specific part of an analysis state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StateKind {
    ServiceGuardLogCluster {
        level: ClusterLevel,
        worker_task_ids: BTreeSet<String>,
    },
    ServiceGuardLogAnalysis {
        worker_task_id: Option<String>,
    },
    ServiceGuardTrendAnalysis {
        worker_task_id: Option<String>,
    },
    ServiceGuardTimeSeries {
        worker_task_id: Option<String>,
    },
    PreDeploymentLogCluster {
        worker_task_ids: BTreeSet<String>,
    },
    DeploymentLogCluster {
        level: ClusterLevel,
        worker_task_ids: BTreeSet<String>,
    },
    DeploymentLogHostSampling {
        control_hosts: BTreeSet<String>,
        test_hosts: BTreeSet<String>,
        learning_engine_task_type: Option<LearningEngineTaskType>,
    },
    DeploymentLogAnalysis {
        worker_task_id: Option<String>,
        #[serde(default)]
        learning_engine_task_type: Option<LearningEngineTaskType>,
    },
    DeploymentLogFeedback {
        worker_task_id: Option<String>,
    },
    DeploymentMetricHostSampling {
        control_hosts: BTreeSet<String>,
        test_hosts: BTreeSet<String>,
        learning_engine_task_type: Option<LearningEngineTaskType>,
    },
    DeploymentTimeSeriesAnalysis {
        worker_task_id: Option<String>,
        #[serde(default)]
        learning_engine_task_type: Option<LearningEngineTaskType>,
    },
    SliMetricAnalysis,
    CompositeSloMetricAnalysis,
}

impl StateKind {
    pub fn service_guard_log_cluster(level: ClusterLevel) -> Self {
        StateKind::ServiceGuardLogCluster {
            level,
            worker_task_ids: BTreeSet::new(),
        }
    }

    pub fn deployment_log_cluster(level: ClusterLevel) -> Self {
        StateKind::DeploymentLogCluster {
            level,
            worker_task_ids: BTreeSet::new(),
        }
    }

    pub fn pre_deployment_log_cluster() -> Self {
        StateKind::PreDeploymentLogCluster {
            worker_task_ids: BTreeSet::new(),
        }
    }

    pub fn deployment_log_host_sampling() -> Self {
        StateKind::DeploymentLogHostSampling {
            control_hosts: BTreeSet::new(),
            test_hosts: BTreeSet::new(),
            learning_engine_task_type: None,
        }
    }

    pub fn deployment_metric_host_sampling() -> Self {
        StateKind::DeploymentMetricHostSampling {
            control_hosts: BTreeSet::new(),
            test_hosts: BTreeSet::new(),
            learning_engine_task_type: None,
        }
    }

    /// Fresh payload for a single-dispatch stage, `None` for other stages
    pub fn single_dispatch(stage: StageType) -> Option<Self> {
        let kind = match stage {
            StageType::ServiceGuardLogAnalysis => StateKind::ServiceGuardLogAnalysis {
                worker_task_id: None,
            },
            StageType::ServiceGuardTrendAnalysis => StateKind::ServiceGuardTrendAnalysis {
                worker_task_id: None,
            },
            StageType::ServiceGuardTimeSeries => StateKind::ServiceGuardTimeSeries {
                worker_task_id: None,
            },
            StageType::DeploymentLogAnalysis => StateKind::DeploymentLogAnalysis {
                worker_task_id: None,
                learning_engine_task_type: None,
            },
            StageType::DeploymentLogFeedback => StateKind::DeploymentLogFeedback {
                worker_task_id: None,
            },
            StageType::DeploymentTimeSeriesAnalysis => StateKind::DeploymentTimeSeriesAnalysis {
                worker_task_id: None,
                learning_engine_task_type: None,
            },
            _ => return None,
        };
        Some(kind)
    }

    pub fn stage(&self) -> StageType {
        match self {
            StateKind::ServiceGuardLogCluster { .. } => StageType::ServiceGuardLogCluster,
            StateKind::ServiceGuardLogAnalysis { .. } => StageType::ServiceGuardLogAnalysis,
            StateKind::ServiceGuardTrendAnalysis { .. } => StageType::ServiceGuardTrendAnalysis,
            StateKind::ServiceGuardTimeSeries { .. } => StageType::ServiceGuardTimeSeries,
            StateKind::PreDeploymentLogCluster { .. } => StageType::PreDeploymentLogCluster,
            StateKind::DeploymentLogCluster { .. } => StageType::DeploymentLogCluster,
            StateKind::DeploymentLogHostSampling { .. } => StageType::DeploymentLogHostSampling,
            StateKind::DeploymentLogAnalysis { .. } => StageType::DeploymentLogAnalysis,
            StateKind::DeploymentLogFeedback { .. } => StageType::DeploymentLogFeedback,
            StateKind::DeploymentMetricHostSampling { .. } => {
                StageType::DeploymentMetricHostSampling
            }
            StateKind::DeploymentTimeSeriesAnalysis { .. } => {
                StageType::DeploymentTimeSeriesAnalysis
            }
            StateKind::SliMetricAnalysis => StageType::SliMetricAnalysis,
            StateKind::CompositeSloMetricAnalysis => StageType::CompositeSloMetricAnalysis,
        }
    }

    /// Deployment analysis payload carrying the sampled learning engine task type
    pub fn deployment_analysis(
        stage: StageType,
        task_type: LearningEngineTaskType,
    ) -> Option<Self> {
        let kind = match stage {
            StageType::DeploymentLogAnalysis => StateKind::DeploymentLogAnalysis {
                worker_task_id: None,
                learning_engine_task_type: Some(task_type),
            },
            StageType::DeploymentTimeSeriesAnalysis => StateKind::DeploymentTimeSeriesAnalysis {
                worker_task_id: None,
                learning_engine_task_type: Some(task_type),
            },
            _ => return None,
        };
        Some(kind)
    }

    /// Learning engine task type chosen by host sampling, where recorded
    pub fn learning_engine_task_type(&self) -> Option<LearningEngineTaskType> {
        match self {
            StateKind::DeploymentLogHostSampling {
                learning_engine_task_type,
                ..
            }
            | StateKind::DeploymentMetricHostSampling {
                learning_engine_task_type,
                ..
            }
            | StateKind::DeploymentLogAnalysis {
                learning_engine_task_type,
                ..
            }
            | StateKind::DeploymentTimeSeriesAnalysis {
                learning_engine_task_type,
                ..
            } => *learning_engine_task_type,
            _ => None,
        }
    }

    /// Clustering level, for cluster stages that have one
    pub fn cluster_level(&self) -> Option<ClusterLevel> {
        match self {
            StateKind::ServiceGuardLogCluster { level, .. }
            | StateKind::DeploymentLogCluster { level, .. } => Some(*level),
            _ => None,
        }
    }
}

/// One stage of an analysis pipeline for one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisState {
    pub status: AnalysisStatus,
    pub retry_count: u32,
    pub inputs: AnalysisInput,
    pub kind: StateKind,
}

impl AnalysisState {
    /// Create a state in `Created` status
    pub fn new(inputs: AnalysisInput, kind: StateKind) -> Self {
        Self {
            status: AnalysisStatus::Created,
            retry_count: 0,
            inputs,
            kind,
        }
    }

    pub fn stage(&self) -> StageType {
        self.kind.stage()
    }

    pub fn verification_task_id(&self) -> &str {
        self.inputs.verification_task_id()
    }

    /// Every worker task id currently recorded, for single and fan-out stages
    pub fn worker_task_ids(&self) -> BTreeSet<String> {
        match &self.kind {
            StateKind::ServiceGuardLogCluster {
                worker_task_ids, ..
            }
            | StateKind::PreDeploymentLogCluster { worker_task_ids }
            | StateKind::DeploymentLogCluster {
                worker_task_ids, ..
            } => worker_task_ids.clone(),
            StateKind::ServiceGuardLogAnalysis { worker_task_id }
            | StateKind::ServiceGuardTrendAnalysis { worker_task_id }
            | StateKind::ServiceGuardTimeSeries { worker_task_id }
            | StateKind::DeploymentLogAnalysis { worker_task_id, .. }
            | StateKind::DeploymentLogFeedback { worker_task_id }
            | StateKind::DeploymentTimeSeriesAnalysis { worker_task_id, .. } => {
                worker_task_id.iter().cloned().collect()
            }
            StateKind::DeploymentLogHostSampling { .. }
            | StateKind::DeploymentMetricHostSampling { .. }
            | StateKind::SliMetricAnalysis
            | StateKind::CompositeSloMetricAnalysis => BTreeSet::new(),
        }
    }

    /// Slot holding the worker id of a single-dispatch stage
    pub fn worker_task_id_mut(&mut self) -> Option<&mut Option<String>> {
        match &mut self.kind {
            StateKind::ServiceGuardLogAnalysis { worker_task_id }
            | StateKind::ServiceGuardTrendAnalysis { worker_task_id }
            | StateKind::ServiceGuardTimeSeries { worker_task_id }
            | StateKind::DeploymentLogAnalysis { worker_task_id, .. }
            | StateKind::DeploymentLogFeedback { worker_task_id }
            | StateKind::DeploymentTimeSeriesAnalysis { worker_task_id, .. } => {
                Some(worker_task_id)
            }
            _ => None,
        }
    }

    /// Set holding the worker ids of a fan-out stage
    pub fn worker_task_ids_mut(&mut self) -> Option<&mut BTreeSet<String>> {
        match &mut self.kind {
            StateKind::ServiceGuardLogCluster {
                worker_task_ids, ..
            }
            | StateKind::PreDeploymentLogCluster { worker_task_ids }
            | StateKind::DeploymentLogCluster {
                worker_task_ids, ..
            } => Some(worker_task_ids),
            _ => None,
        }
    }

    /// Forget every recorded worker task so a stale id is never polled again
    pub fn clear_worker_tasks(&mut self) {
        if let Some(slot) = self.worker_task_id_mut() {
            *slot = None;
        }
        if let Some(ids) = self.worker_task_ids_mut() {
            ids.clear();
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
