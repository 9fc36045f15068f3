// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SLI and composite SLO specs
//!
//! Verify SLI records are written synchronously and composite rollups
//! chain into the next window through the input queue.

use crate::prelude::*;

fn sli_owner() -> TaskOwner {
    TaskOwner::Sli {
        sli_id: "latency-sli".to_string(),
    }
}

fn composite_owner() -> TaskOwner {
    TaskOwner::CompositeSlo {
        objective_id: "checkout-slo".to_string(),
    }
}

#[tokio::test]
async fn sli_analysis_writes_records_without_workers() {
    let world = World::new();
    world.directory.add_owner("sli-task", sli_owner());

    let state = world
        .orchestrator
        .drive_to_terminal(input("sli-task"))
        .await
        .unwrap();

    assert_eq!(state.status, AnalysisStatus::Success);
    similar_asserts::assert_eq!(world.trail("sli-task"), vec!["sli_metric_analysis"]);
    assert_eq!(world.records.calls().len(), 1);
    assert!(world.dispatch.calls().is_empty());
    assert_eq!(world.orchestrator.next_queued().unwrap(), None);
}

#[tokio::test]
async fn restored_sli_drives_composite_rollups() {
    let world = World::new();
    world.directory.add_owner("sli-task", sli_owner());
    world.directory.add_owner("composite-task", composite_owner());
    world.directory.add_composite(
        "latency-sli",
        CompositeRef {
            objective_id: "checkout-slo".to_string(),
            verification_task_id: "composite-task".to_string(),
        },
    );

    world
        .orchestrator
        .drive_to_terminal(input("sli-task").as_restore())
        .await
        .unwrap();

    let composite = world.orchestrator.next_queued().unwrap().unwrap();
    assert_eq!(composite.verification_task_id(), "composite-task");
    assert_eq!(composite.window(), input("sli-task").window());

    let state = world
        .orchestrator
        .drive_to_terminal(composite)
        .await
        .unwrap();
    assert_eq!(state.stage(), StageType::CompositeSloMetricAnalysis);
    assert_eq!(state.status, AnalysisStatus::Success);

    // The rollup schedules its own next window
    let next = world.orchestrator.next_queued().unwrap().unwrap();
    assert_eq!(next.verification_task_id(), "composite-task");
    assert_eq!(next.window(), TimeWindow::new(at(10, 10), at(10, 20)));
    assert_eq!(world.orchestrator.next_queued().unwrap(), None);

    let calls = world.records.calls();
    assert!(matches!(
        calls.as_slice(),
        [RecordCall::Sli { .. }, RecordCall::CompositeRollup { .. }]
    ));
}

#[tokio::test]
async fn composite_rollup_retries_transient_write_failures() {
    let world = World::new();
    world.directory.add_owner("composite-task", composite_owner());
    world.records.fail_writes(2);

    let state = world
        .orchestrator
        .drive_to_terminal(input("composite-task"))
        .await
        .unwrap();

    assert_eq!(state.status, AnalysisStatus::Success);
    assert_eq!(state.retry_count, 2);
    assert_eq!(world.records.calls().len(), 3);
}

#[tokio::test]
async fn sli_write_outage_fails_after_retry_budget() {
    let world = World::with_config(OrchestratorConfig {
        max_retry: 1,
        poll_interval: std::time::Duration::from_millis(1),
        ..OrchestratorConfig::default()
    });
    world.directory.add_owner("sli-task", sli_owner());
    world.records.fail_writes(u32::MAX);

    let state = world
        .orchestrator
        .drive_to_terminal(input("sli-task"))
        .await
        .unwrap();

    assert_eq!(state.status, AnalysisStatus::Failed);
    assert_eq!(world.records.calls().len(), 2);
    similar_asserts::assert_eq!(world.trail("sli-task"), vec!["sli_metric_analysis"]);
}
