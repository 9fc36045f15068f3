// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restart recovery specs
//!
//! Verify state, history and queued inputs survive a restart, and that
//! unfinished tasks resume from the recorded worker tasks.

use crate::prelude::*;

#[tokio::test]
async fn running_pipeline_resumes_after_restart() {
    let world = World::new();
    world
        .directory
        .add_owner("checkout-logs", monitored_service(DataKind::Logs));

    world
        .orchestrator
        .start(input("checkout-logs"))
        .await
        .unwrap();
    // Dispatch L1, then finish it and hand off to L2
    world.orchestrator.tick("checkout-logs").await.unwrap();
    world.orchestrator.tick("checkout-logs").await.unwrap();
    world.orchestrator.tick("checkout-logs").await.unwrap();
    let dispatched_before = world.dispatch.dispatched().len();
    assert_eq!(dispatched_before, 3);

    let restarted = world.restart();
    let before = restarted.current_state("checkout-logs").unwrap();
    assert_eq!(before.kind.cluster_level(), Some(ClusterLevel::L2));
    assert_eq!(before.status, AnalysisStatus::Running);

    let finished = restarted.resume_pending().await.unwrap();

    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].stage(), StageType::ServiceGuardTrendAnalysis);
    assert_eq!(finished[0].status, AnalysisStatus::Success);
    // L2 is polled rather than dispatched again
    assert_eq!(world.dispatch.dispatched().len(), dispatched_before + 2);
    similar_asserts::assert_eq!(
        trail(&restarted.completed_stages("checkout-logs")),
        vec![
            "service_guard_log_cluster:l1",
            "service_guard_log_cluster:l2",
            "service_guard_log_analysis",
            "service_guard_trend_analysis",
        ]
    );
}

#[tokio::test]
async fn finished_tasks_are_not_resumed() {
    let world = World::new();
    world
        .directory
        .add_owner("checkout-metrics", monitored_service(DataKind::Metrics));
    world
        .orchestrator
        .drive_to_terminal(input("checkout-metrics"))
        .await
        .unwrap();

    let restarted = world.restart();

    assert!(restarted.resume_pending().await.unwrap().is_empty());
    assert_eq!(
        restarted.current_state("checkout-metrics").unwrap().status,
        AnalysisStatus::Success
    );
    assert_eq!(world.dispatch.dispatched().len(), 1);
}

#[tokio::test]
async fn queued_inputs_survive_restart_in_order() {
    let world = World::new();
    world.orchestrator.enqueue(input("first")).unwrap();
    world.orchestrator.enqueue(input("second")).unwrap();
    world.orchestrator.enqueue(input("third")).unwrap();
    assert_eq!(
        world
            .orchestrator
            .next_queued()
            .unwrap()
            .unwrap()
            .verification_task_id(),
        "first"
    );

    let restarted = world.restart();

    let mut remaining = Vec::new();
    while let Some(next) = restarted.next_queued().unwrap() {
        remaining.push(next.verification_task_id().to_string());
    }
    similar_asserts::assert_eq!(remaining, vec!["second", "third"]);
}

#[tokio::test]
async fn tick_limit_leaves_work_resumable() {
    let world = World::with_config(OrchestratorConfig {
        max_ticks: 2,
        poll_interval: std::time::Duration::from_millis(1),
        ..OrchestratorConfig::default()
    });
    world
        .directory
        .add_owner("checkout-metrics", monitored_service(DataKind::Metrics));
    world.dispatch.set_default_status(WorkerTaskStatus::Running);

    let err = world
        .orchestrator
        .drive_to_terminal(input("checkout-metrics"))
        .await
        .unwrap_err();
    assert!(matches!(err, OrchestratorError::TickLimit { .. }));

    world.dispatch.set_status("worker-1", WorkerTaskStatus::Success);
    let finished = world.restart().resume_pending().await.unwrap();

    assert_eq!(finished[0].status, AnalysisStatus::Success);
    assert_eq!(world.dispatch.dispatched().len(), 1);
}
