// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duration marks recorded on scope exit

use cv_adapters::MetricsSink;
use std::time::{Duration, Instant};

/// Records the time between construction and drop under `name`.
///
/// Sink failures are logged and never reach the caller.
pub struct DurationGuard<M: MetricsSink> {
    sink: M,
    name: String,
    started: Instant,
}

impl<M: MetricsSink> DurationGuard<M> {
    pub fn new(sink: M, name: impl Into<String>) -> Self {
        Self {
            sink,
            name: name.into(),
            started: Instant::now(),
        }
    }
}

impl<M: MetricsSink> Drop for DurationGuard<M> {
    fn drop(&mut self) {
        record(&self.sink, &self.name, self.started.elapsed());
    }
}

/// Record a zero-length mark, counted by name
pub fn record_mark<M: MetricsSink>(sink: &M, name: &str) {
    record(sink, name, Duration::ZERO);
}

fn record<M: MetricsSink>(sink: &M, name: &str, duration: Duration) {
    if let Err(e) = sink.record_duration(name, duration) {
        tracing::warn!(metric = %name, error = %e, "failed to record duration");
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
