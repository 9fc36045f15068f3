// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment verification specs
//!
//! Verify log and metric deployment tasks walk clustering, host sampling,
//! analysis and feedback in order.

use crate::prelude::*;

#[tokio::test]
async fn canary_log_deployment_runs_through_feedback() {
    let world = World::new();
    world.directory.add_owner(
        "deploy-logs",
        TaskOwner::VerificationJob {
            job_id: "deploy-42".to_string(),
            data_kind: DataKind::Logs,
            strategy: Some(DeploymentStrategy::Canary),
            pre_deployment: baseline(),
            is_pre_deployment_task: false,
            feedback_enabled: true,
        },
    );
    world
        .inventory
        .set_hosts("deploy-logs", baseline(), &["web-1", "web-2"]);
    world.inventory.set_hosts(
        "deploy-logs",
        input("deploy-logs").window(),
        &["web-1", "web-2", "web-3"],
    );

    let state = world
        .orchestrator
        .drive_to_terminal(input("deploy-logs"))
        .await
        .unwrap();

    assert_eq!(state.status, AnalysisStatus::Success);
    similar_asserts::assert_eq!(
        world.trail("deploy-logs"),
        vec![
            "deployment_log_cluster:l1",
            "deployment_log_cluster:l2",
            "deployment_log_host_sampling",
            "deployment_log_analysis",
            "deployment_log_feedback",
        ]
    );
    similar_asserts::assert_eq!(
        world.dispatched_kinds(),
        vec![
            WorkerTaskKind::DeploymentLogCluster(ClusterLevel::L1),
            WorkerTaskKind::DeploymentLogCluster(ClusterLevel::L1),
            WorkerTaskKind::DeploymentLogCluster(ClusterLevel::L2),
            WorkerTaskKind::DeploymentLogAnalysis(LearningEngineTaskType::Canary),
            WorkerTaskKind::DeploymentLogFeedback,
        ]
    );

    let requests = world.dispatch.dispatched();
    let analysis = &requests[3];
    assert_eq!(analysis.control_hosts, Some(host_set(&["web-1", "web-2"])));
    assert_eq!(analysis.test_hosts, Some(host_set(&["web-3"])));
}

#[tokio::test]
async fn log_deployment_without_feedback_ends_at_analysis() {
    let world = World::new();
    world.directory.add_owner(
        "deploy-logs",
        deployment_job(DataKind::Logs, Some(DeploymentStrategy::Rolling)),
    );

    let state = world
        .orchestrator
        .drive_to_terminal(input("deploy-logs"))
        .await
        .unwrap();

    assert_eq!(state.stage(), StageType::DeploymentLogAnalysis);
    assert_eq!(state.status, AnalysisStatus::Success);
    assert!(!world
        .dispatched_kinds()
        .contains(&WorkerTaskKind::DeploymentLogFeedback));
}

#[tokio::test]
async fn rolling_metric_deployment_compares_before_and_after() {
    let world = World::new();
    world.directory.add_owner(
        "deploy-metrics",
        deployment_job(DataKind::Metrics, Some(DeploymentStrategy::Rolling)),
    );
    world
        .inventory
        .set_hosts("deploy-metrics", baseline(), &["old-1", "old-2"]);
    world.inventory.set_hosts(
        "deploy-metrics",
        input("deploy-metrics").window(),
        &["new-1", "new-2"],
    );

    world
        .orchestrator
        .drive_to_terminal(input("deploy-metrics"))
        .await
        .unwrap();

    similar_asserts::assert_eq!(
        world.trail("deploy-metrics"),
        vec![
            "deployment_metric_host_sampling",
            "deployment_time_series_analysis",
        ]
    );
    let requests = world.dispatch.dispatched();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].kind,
        WorkerTaskKind::DeploymentTimeSeries(LearningEngineTaskType::BeforeAfter)
    );
    assert_eq!(requests[0].control_hosts, Some(host_set(&["old-1", "old-2"])));
    assert_eq!(requests[0].test_hosts, Some(host_set(&["new-1", "new-2"])));
}

#[tokio::test]
async fn metric_job_without_strategy_skips_sampling() {
    let world = World::new();
    world
        .directory
        .add_owner("load-test", deployment_job(DataKind::Metrics, None));

    world
        .orchestrator
        .drive_to_terminal(input("load-test"))
        .await
        .unwrap();

    similar_asserts::assert_eq!(
        world.trail("load-test"),
        vec!["deployment_time_series_analysis"]
    );
    let requests = world.dispatch.dispatched();
    assert_eq!(requests[0].control_hosts, None);
    assert_eq!(requests[0].test_hosts, None);
}

#[tokio::test]
async fn fully_replaced_canary_falls_back_to_baseline_hosts() {
    let world = World::new();
    world.directory.add_owner(
        "deploy-metrics",
        deployment_job(DataKind::Metrics, Some(DeploymentStrategy::Canary)),
    );
    world
        .inventory
        .set_hosts("deploy-metrics", baseline(), &["old-1"]);
    world.inventory.set_hosts(
        "deploy-metrics",
        input("deploy-metrics").window(),
        &["new-1", "new-2"],
    );

    world
        .orchestrator
        .drive_to_terminal(input("deploy-metrics"))
        .await
        .unwrap();

    let request = &world.dispatch.dispatched()[0];
    assert_eq!(
        request.kind,
        WorkerTaskKind::DeploymentTimeSeries(LearningEngineTaskType::Canary)
    );
    assert_eq!(request.control_hosts, Some(host_set(&["old-1"])));
    assert_eq!(request.test_hosts, Some(host_set(&[])));
}

#[tokio::test]
async fn pre_deployment_task_only_clusters_baseline() {
    let world = World::new();
    world.directory.add_owner(
        "pre-deploy",
        TaskOwner::VerificationJob {
            job_id: "deploy-42".to_string(),
            data_kind: DataKind::Logs,
            strategy: Some(DeploymentStrategy::Canary),
            pre_deployment: TimeWindow::new(at(10, 0), at(10, 10)),
            is_pre_deployment_task: true,
            feedback_enabled: true,
        },
    );

    let state = world
        .orchestrator
        .drive_to_terminal(input("pre-deploy"))
        .await
        .unwrap();

    assert_eq!(state.stage(), StageType::PreDeploymentLogCluster);
    assert_eq!(state.status, AnalysisStatus::Success);
    similar_asserts::assert_eq!(
        world.dispatched_kinds(),
        vec![
            WorkerTaskKind::PreDeploymentLogCluster,
            WorkerTaskKind::PreDeploymentLogCluster,
        ]
    );
}

#[tokio::test]
async fn failing_log_analysis_fails_deployment_without_feedback() {
    let world = World::new();
    world.directory.add_owner(
        "deploy-logs",
        TaskOwner::VerificationJob {
            job_id: "deploy-42".to_string(),
            data_kind: DataKind::Logs,
            strategy: None,
            pre_deployment: baseline(),
            is_pre_deployment_task: false,
            feedback_enabled: true,
        },
    );
    // Both L1 shards and L2 succeed; every analysis attempt fails
    for _ in 0..3 {
        world.dispatch.script_next(vec![WorkerTaskStatus::Success]);
    }
    world.dispatch.set_default_status(WorkerTaskStatus::Failed);

    let state = world
        .orchestrator
        .drive_to_terminal(input("deploy-logs"))
        .await
        .unwrap();

    assert_eq!(state.stage(), StageType::DeploymentLogAnalysis);
    assert_eq!(state.status, AnalysisStatus::Failed);
    let kinds = world.dispatched_kinds();
    let analysis = WorkerTaskKind::DeploymentLogAnalysis(LearningEngineTaskType::BeforeAfter);
    assert_eq!(kinds.iter().filter(|k| **k == analysis).count(), 4);
    assert!(!kinds.contains(&WorkerTaskKind::DeploymentLogFeedback));
}
