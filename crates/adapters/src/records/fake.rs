// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake record writer for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{RecordError, RecordWriter};
use async_trait::async_trait;
use cv_core::AnalysisInput;
use std::sync::{Arc, Mutex};

/// Recorded writer call
#[derive(Debug, Clone)]
pub enum RecordCall {
    Sli { input: AnalysisInput },
    CompositeRollup { input: AnalysisInput },
}

#[derive(Default)]
struct WriterState {
    failing_writes: u32,
}

/// Fake record writer; every call writes one record unless told to fail
#[derive(Clone, Default)]
pub struct FakeRecordWriter {
    state: Arc<Mutex<WriterState>>,
    calls: Arc<Mutex<Vec<RecordCall>>>,
}

impl FakeRecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<RecordCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Fail the next `count` writes with missing source data
    pub fn fail_writes(&self, count: u32) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).failing_writes = count;
    }

    fn record(&self, call: RecordCall) -> Result<usize, RecordError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.failing_writes > 0 {
            state.failing_writes -= 1;
            return Err(RecordError::DataUnavailable("injected write failure".into()));
        }
        Ok(1)
    }
}

#[async_trait]
impl RecordWriter for FakeRecordWriter {
    async fn write_sli_records(&self, input: &AnalysisInput) -> Result<usize, RecordError> {
        self.record(RecordCall::Sli {
            input: input.clone(),
        })
    }

    async fn write_composite_rollup(&self, input: &AnalysisInput) -> Result<usize, RecordError> {
        self.record(RecordCall::CompositeRollup {
            input: input.clone(),
        })
    }
}
