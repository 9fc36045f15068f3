// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake metrics sink for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MetricsError, MetricsSink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded duration
#[derive(Debug, Clone)]
pub struct MetricRecord {
    pub name: String,
    pub duration: Duration,
}

/// Fake metrics sink for testing
#[derive(Clone, Default)]
pub struct FakeMetricsSink {
    records: Arc<Mutex<Vec<MetricRecord>>>,
    failing: Arc<AtomicBool>,
}

impl FakeMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded durations
    pub fn records(&self) -> Vec<MetricRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Names of recorded metrics, in order
    pub fn names(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.name).collect()
    }

    /// Make every record call fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl MetricsSink for FakeMetricsSink {
    fn record_duration(&self, metric_name: &str, duration: Duration) -> Result<(), MetricsError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MetricsError::Unavailable("injected sink failure".into()));
        }
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(MetricRecord {
                name: metric_name.to_string(),
                duration,
            });
        Ok(())
    }
}
