// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metrics sink

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMetricsSink, MetricRecord};

use std::time::Duration;
use thiserror::Error;

/// Errors from recording metrics
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics sink unavailable: {0}")]
    Unavailable(String),
}

/// Fire-and-forget duration recording
pub trait MetricsSink: Clone + Send + Sync + 'static {
    fn record_duration(&self, metric_name: &str, duration: Duration) -> Result<(), MetricsError>;
}

/// Sink that discards everything
#[derive(Clone, Copy, Default)]
pub struct NoOpMetricsSink;

impl NoOpMetricsSink {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsSink for NoOpMetricsSink {
    fn record_duration(&self, _metric_name: &str, _duration: Duration) -> Result<(), MetricsError> {
        Ok(())
    }
}
