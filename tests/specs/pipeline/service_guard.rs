// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live monitoring specs
//!
//! Verify monitored-service tasks cluster and analyze logs, or run time
//! series analysis for metrics.

use crate::prelude::*;

#[tokio::test]
async fn log_monitoring_clusters_then_analyzes_trends() {
    let world = World::new();
    world
        .directory
        .add_owner("checkout-logs", monitored_service(DataKind::Logs));

    let state = world
        .orchestrator
        .drive_to_terminal(input("checkout-logs"))
        .await
        .unwrap();

    assert_eq!(state.status, AnalysisStatus::Success);
    similar_asserts::assert_eq!(
        world.trail("checkout-logs"),
        vec![
            "service_guard_log_cluster:l1",
            "service_guard_log_cluster:l2",
            "service_guard_log_analysis",
            "service_guard_trend_analysis",
        ]
    );

    let requests = world.dispatch.dispatched();
    let shard_windows: Vec<TimeWindow> = requests
        .iter()
        .filter(|r| r.kind == WorkerTaskKind::ServiceGuardLogCluster(ClusterLevel::L1))
        .map(|r| r.window)
        .collect();
    similar_asserts::assert_eq!(
        shard_windows,
        vec![
            TimeWindow::new(at(10, 0), at(10, 5)),
            TimeWindow::new(at(10, 5), at(10, 10)),
        ]
    );
}

#[tokio::test]
async fn metric_monitoring_runs_time_series_only() {
    let world = World::new();
    world
        .directory
        .add_owner("checkout-metrics", monitored_service(DataKind::Metrics));

    world
        .orchestrator
        .drive_to_terminal(input("checkout-metrics"))
        .await
        .unwrap();

    similar_asserts::assert_eq!(
        world.trail("checkout-metrics"),
        vec!["service_guard_time_series"]
    );
    similar_asserts::assert_eq!(
        world.dispatched_kinds(),
        vec![WorkerTaskKind::ServiceGuardTimeSeries]
    );
}

#[tokio::test]
async fn exhausted_log_analysis_is_ignored_and_stops() {
    let world = World::new();
    world
        .directory
        .add_owner("checkout-logs", monitored_service(DataKind::Logs));
    for _ in 0..3 {
        world.dispatch.script_next(vec![WorkerTaskStatus::Success]);
    }
    world.dispatch.set_default_status(WorkerTaskStatus::Failed);

    let state = world
        .orchestrator
        .drive_to_terminal(input("checkout-logs"))
        .await
        .unwrap();

    assert_eq!(state.stage(), StageType::ServiceGuardLogAnalysis);
    assert_eq!(state.status, AnalysisStatus::Ignored);
    assert!(!world
        .dispatched_kinds()
        .contains(&WorkerTaskKind::ServiceGuardTrendAnalysis));
}

#[tokio::test]
async fn timed_out_worker_is_redispatched() {
    let world = World::new();
    world
        .directory
        .add_owner("checkout-metrics", monitored_service(DataKind::Metrics));
    world
        .dispatch
        .script_next(vec![WorkerTaskStatus::Running, WorkerTaskStatus::Timeout]);

    let state = world
        .orchestrator
        .drive_to_terminal(input("checkout-metrics"))
        .await
        .unwrap();

    assert_eq!(state.status, AnalysisStatus::Success);
    assert_eq!(state.retry_count, 1);
    assert_eq!(state.worker_task_ids(), host_set(&["worker-2"]));
    assert_eq!(world.dispatch.dispatched().len(), 2);
}

#[tokio::test]
async fn queued_worker_keeps_stage_running() {
    let world = World::with_config(OrchestratorConfig {
        max_ticks: 4,
        poll_interval: std::time::Duration::from_millis(1),
        ..OrchestratorConfig::default()
    });
    world
        .directory
        .add_owner("checkout-metrics", monitored_service(DataKind::Metrics));
    world.dispatch.set_default_status(WorkerTaskStatus::Queued);

    let err = world
        .orchestrator
        .drive_to_terminal(input("checkout-metrics"))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::TickLimit { ticks: 4, .. }));
    assert_eq!(world.dispatch.dispatched().len(), 1);
    assert_eq!(world.dispatch.poll_count(), 3);
}

#[tokio::test]
async fn ticks_and_final_status_are_metered() {
    let world = World::new();
    world
        .directory
        .add_owner("checkout-metrics", monitored_service(DataKind::Metrics));

    world
        .orchestrator
        .drive_to_terminal(input("checkout-metrics"))
        .await
        .unwrap();

    // Dispatch tick, then the poll that finishes the stage and marks it
    similar_asserts::assert_eq!(
        world.metrics.names(),
        vec![
            "analysis.service_guard_time_series.tick",
            "analysis.service_guard_time_series.success",
            "analysis.service_guard_time_series.tick",
        ]
    );
}
