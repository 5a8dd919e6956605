//! Batch of manually managed OS threads.
//!
//! Every unit gets a brand new thread which is joined right after it is
//! started, so the batch runs strictly one unit at a time in ordinal order
//! even though several threads are created.

use std::any::Any;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument};

use crate::config::DemoConfig;
use crate::report::BatchReport;
use crate::sink::{DemoEvent, EventSink};
use crate::unit::{RunnerKind, WorkUnit, Workload};
use crate::{DemoError, Result};

/// Starts and joins one OS thread per unit
pub struct ThreadBatchRunner {
    workloads: Vec<Workload>,
}

impl ThreadBatchRunner {
    /// One sleeping unit per configured slot
    pub fn new(config: &DemoConfig) -> Self {
        Self::with_workloads(vec![Workload::Sleep(config.work_duration); config.units])
    }

    /// Explicit workloads; unit `i` gets `workloads[i - 1]`
    pub fn with_workloads(workloads: Vec<Workload>) -> Self {
        Self { workloads }
    }

    /// Run every unit to completion, one after another
    #[instrument(skip(self, sink), fields(units = self.workloads.len()))]
    pub fn run(self, sink: Arc<dyn EventSink>) -> Result<BatchReport> {
        sink.record(DemoEvent::RunnerStarted(RunnerKind::Thread));
        let units = self.workloads.len();
        let start = Instant::now();

        for (index, workload) in self.workloads.into_iter().enumerate() {
            let ordinal = index + 1;
            let unit = WorkUnit::new(RunnerKind::Thread, ordinal, workload);
            let unit_sink = Arc::clone(&sink);

            let handle = thread::Builder::new()
                .name(format!("unit-thread-{ordinal}"))
                .spawn(move || unit.run_blocking(unit_sink.as_ref()))?;

            if let Err(payload) = handle.join() {
                let message = panic_message(payload.as_ref());
                error!(ordinal, error = %message, "Thread unit panicked");
                return Err(DemoError::ThreadPanicked { ordinal, message });
            }
        }

        let report = BatchReport {
            runner: RunnerKind::Thread,
            units,
            elapsed: start.elapsed(),
        };
        info!(
            units,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Thread batch completed"
        );
        sink.record(DemoEvent::RunnerFinished(report));
        Ok(report)
    }

    /// Lower bound on the batch's wall time: the sum of all sleeps
    pub fn minimum_elapsed(&self) -> Duration {
        self.workloads
            .iter()
            .map(|workload| match workload {
                Workload::Sleep(duration) => *duration,
                Workload::Fault(_) => Duration::ZERO,
            })
            .sum()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
