// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeZone, Utc};

fn input() -> AnalysisInput {
    AnalysisInput::new(
        "task-1",
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 5, 0).unwrap(),
    )
    .unwrap()
}

#[test]
fn new_state_is_created_with_no_retries() {
    let state = AnalysisState::new(input(), StateKind::SliMetricAnalysis);

    assert_eq!(state.status, AnalysisStatus::Created);
    assert_eq!(state.retry_count, 0);
    assert_eq!(state.stage(), StageType::SliMetricAnalysis);
    assert!(state.worker_task_ids().is_empty());
}

#[test]
fn single_dispatch_slot_round_trips() {
    let kind = StateKind::single_dispatch(StageType::DeploymentLogAnalysis).unwrap();
    let mut state = AnalysisState::new(input(), kind);

    *state.worker_task_id_mut().unwrap() = Some("w-1".to_string());
    assert_eq!(state.worker_task_ids().len(), 1);
    assert!(state.worker_task_ids_mut().is_none());

    state.clear_worker_tasks();
    assert!(state.worker_task_ids().is_empty());
}

#[test]
fn fan_out_set_round_trips() {
    let mut state = AnalysisState::new(
        input(),
        StateKind::deployment_log_cluster(ClusterLevel::L1),
    );

    let ids = state.worker_task_ids_mut().unwrap();
    ids.insert("w-1".to_string());
    ids.insert("w-2".to_string());
    assert_eq!(state.worker_task_ids().len(), 2);
    assert!(state.worker_task_id_mut().is_none());

    state.clear_worker_tasks();
    assert!(state.worker_task_ids().is_empty());
}

#[test]
fn single_dispatch_is_none_for_other_stages() {
    assert!(StateKind::single_dispatch(StageType::DeploymentLogCluster).is_none());
    assert!(StateKind::single_dispatch(StageType::SliMetricAnalysis).is_none());
    assert!(StateKind::single_dispatch(StageType::DeploymentMetricHostSampling).is_none());
}

#[test]
fn cluster_level_only_for_cluster_stages() {
    assert_eq!(
        StateKind::service_guard_log_cluster(ClusterLevel::L2).cluster_level(),
        Some(ClusterLevel::L2)
    );
    assert_eq!(StateKind::pre_deployment_log_cluster().cluster_level(), None);
}

#[test]
fn state_serializes_with_stage_tag() {
    let state = AnalysisState::new(input(), StateKind::deployment_log_host_sampling());
    let json = serde_json::to_value(&state).unwrap();

    assert_eq!(json["kind"]["stage"], "deployment_log_host_sampling");
    assert_eq!(json["status"], "CREATED");

    let back: AnalysisState = serde_json::from_value(json).unwrap();
    assert_eq!(back, state);
}

#[test]
fn deployment_analysis_carries_sampled_task_type() {
    let kind = StateKind::deployment_analysis(
        StageType::DeploymentTimeSeriesAnalysis,
        LearningEngineTaskType::Canary,
    )
    .unwrap();

    assert_eq!(kind.stage(), StageType::DeploymentTimeSeriesAnalysis);
    assert_eq!(
        kind.learning_engine_task_type(),
        Some(LearningEngineTaskType::Canary)
    );
    assert!(StateKind::deployment_analysis(
        StageType::DeploymentLogFeedback,
        LearningEngineTaskType::Canary
    )
    .is_none());
    assert_eq!(
        StateKind::single_dispatch(StageType::DeploymentLogAnalysis)
            .unwrap()
            .learning_engine_task_type(),
        None
    );
}
