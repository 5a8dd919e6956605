//! Batch of tasks on a shared worker pool.
//!
//! All units are submitted before any is awaited; a join-all barrier then
//! waits for every one of them. The pool itself belongs to tokio and is only
//! reached through the [`Scheduler`] seam.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::config::DemoConfig;
use crate::context::mark_pool_worker;
use crate::report::BatchReport;
use crate::sink::{DemoEvent, EventSink};
use crate::unit::{RunnerKind, WorkUnit, Workload};
use crate::Result;

/// Name given to every worker thread of the pool
pub const POOL_THREAD_NAME: &str = "pool-worker";

/// Submits units to background workers and waits for them
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Handle to one submitted unit
    type Handle: Send;

    /// Start running `unit` in the background
    fn submit(&self, unit: WorkUnit, sink: Arc<dyn EventSink>) -> Self::Handle;

    /// Wait until every handle completes, or return the first failure
    async fn join_all(&self, handles: Vec<Self::Handle>) -> Result<()>;
}

/// [`Scheduler`] backed by a tokio runtime
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Schedule onto the runtime behind `handle`
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl Scheduler for TokioScheduler {
    type Handle = JoinHandle<()>;

    fn submit(&self, unit: WorkUnit, sink: Arc<dyn EventSink>) -> Self::Handle {
        debug!(ordinal = unit.ordinal(), "Submitting task");
        self.handle.spawn(async move { unit.run_async(sink.as_ref()).await })
    }

    /// Returns on the first failed task; the remaining tasks are not aborted
    /// and keep running (and reporting to the sink) on the runtime.
    async fn join_all(&self, handles: Vec<Self::Handle>) -> Result<()> {
        try_join_all(handles).await?;
        Ok(())
    }
}

/// Build the multi-thread runtime used as the worker pool.
///
/// Its threads are named [`POOL_THREAD_NAME`] and report themselves as pool
/// workers.
pub fn build_pool_runtime(config: &DemoConfig) -> Result<Runtime> {
    let runtime = Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name(POOL_THREAD_NAME)
        .on_thread_start(mark_pool_worker)
        .enable_all()
        .build()?;
    Ok(runtime)
}

/// Submits every unit, then waits on all of them at once
pub struct TaskBatchRunner<S> {
    workloads: Vec<Workload>,
    scheduler: S,
}

impl<S: Scheduler> TaskBatchRunner<S> {
    /// One sleeping unit per configured slot
    pub fn new(config: &DemoConfig, scheduler: S) -> Self {
        Self::with_workloads(
            vec![Workload::Sleep(config.work_duration); config.units],
            scheduler,
        )
    }

    /// Explicit workloads; unit `i` gets `workloads[i - 1]`
    pub fn with_workloads(workloads: Vec<Workload>, scheduler: S) -> Self {
        Self {
            workloads,
            scheduler,
        }
    }

    /// Submit all units and wait at the barrier
    #[instrument(skip(self, sink), fields(units = self.workloads.len()))]
    pub async fn run(self, sink: Arc<dyn EventSink>) -> Result<BatchReport> {
        sink.record(DemoEvent::RunnerStarted(RunnerKind::Task));
        let units = self.workloads.len();
        let start = Instant::now();

        let handles: Vec<_> = self
            .workloads
            .into_iter()
            .enumerate()
            .map(|(index, workload)| {
                let unit = WorkUnit::new(RunnerKind::Task, index + 1, workload);
                self.scheduler.submit(unit, Arc::clone(&sink))
            })
            .collect();

        if let Err(e) = self.scheduler.join_all(handles).await {
            error!(error = %e, "Task batch failed");
            return Err(e);
        }

        let report = BatchReport {
            runner: RunnerKind::Task,
            units,
            elapsed: start.elapsed(),
        };
        info!(
            units,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Task batch completed"
        );
        sink.record(DemoEvent::RunnerFinished(report));
        Ok(report)
    }
}

/// Run the task batch on a freshly built pool, blocking the caller.
///
/// Must not be called from inside another tokio runtime.
pub fn run_on_pool(config: &DemoConfig, sink: Arc<dyn EventSink>) -> Result<BatchReport> {
    let runtime = build_pool_runtime(config)?;
    let scheduler = TokioScheduler::new(runtime.handle().clone());
    runtime.block_on(TaskBatchRunner::new(config, scheduler).run(sink))
}
