//! Task batch tests
//!
//! Units on the worker pool overlap and all finish before the barrier
//! releases.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use thread_task_demo::{
    sink::{DemoEvent, EventSink, RecordingSink},
    task_runner::{run_on_pool, Scheduler, TaskBatchRunner, TokioScheduler},
    unit::{RunnerKind, UnitState, WorkUnit, Workload},
    DemoConfig, DemoError,
};
use tokio::runtime::Handle;

const DELAY: Duration = Duration::from_millis(200);

fn config(units: usize) -> DemoConfig {
    DemoConfig::new()
        .with_units(units)
        .with_work_duration(DELAY)
        .with_worker_threads(3)
}

/// Counts (starts, ends) per ordinal
fn transitions(sink: &RecordingSink) -> HashMap<usize, (usize, usize)> {
    let mut counts = HashMap::new();
    for event in sink.unit_events() {
        let entry = counts.entry(event.ordinal).or_insert((0, 0));
        match event.state {
            UnitState::Running => entry.0 += 1,
            UnitState::Completed => entry.1 += 1,
            UnitState::Created => {}
        }
    }
    counts
}

#[tokio::test(flavor = "multi_thread", worker_threads = 3)]
async fn test_tasks_overlap() {
    let sink = Arc::new(RecordingSink::new());
    let scheduler = TokioScheduler::new(Handle::current());

    let report = TaskBatchRunner::new(&config(3), scheduler)
        .run(sink.clone())
        .await
        .expect("Task batch should succeed");

    assert_eq!(report.runner, RunnerKind::Task);
    assert_eq!(report.units, 3);
    assert!(report.elapsed >= DELAY);
    assert!(
        report.elapsed < DELAY * 2,
        "Three overlapping tasks should take about one delay, took {:?}",
        report.elapsed
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 3)]
async fn test_each_task_starts_and_ends_once() {
    let sink = Arc::new(RecordingSink::new());
    let scheduler = TokioScheduler::new(Handle::current());

    TaskBatchRunner::new(&config(3), scheduler)
        .run(sink.clone())
        .await
        .expect("Task batch should succeed");

    let expected: HashMap<usize, (usize, usize)> =
        (1..=3).map(|ordinal| (ordinal, (1, 1))).collect();
    assert_eq!(transitions(&sink), expected);

    // Each unit's own start precedes its own end, whatever the interleaving
    let events = sink.unit_events();
    for ordinal in 1..=3 {
        let start = events
            .iter()
            .position(|e| e.ordinal == ordinal && e.state == UnitState::Running);
        let end = events
            .iter()
            .position(|e| e.ordinal == ordinal && e.state == UnitState::Completed);
        assert!(start < end, "Task {ordinal} ended before it started");
    }

    // The barrier only releases after every unit completed
    assert!(matches!(
        sink.events().last(),
        Some(DemoEvent::RunnerFinished(_))
    ));
}

#[tokio::test]
async fn test_empty_batch() {
    let sink = Arc::new(RecordingSink::new());
    let scheduler = TokioScheduler::new(Handle::current());

    let report = TaskBatchRunner::new(&config(0), scheduler)
        .run(sink.clone())
        .await
        .expect("Empty batch should succeed");

    assert_eq!(report.units, 0);
    assert!(report.elapsed < DELAY);
    assert!(sink.unit_events().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panicking_task_is_reraised_by_barrier() {
    let sink = Arc::new(RecordingSink::new());
    let scheduler = TokioScheduler::new(Handle::current());
    let runner = TaskBatchRunner::with_workloads(
        vec![
            Workload::Sleep(Duration::from_millis(20)),
            Workload::Fault("task exploded".to_string()),
        ],
        scheduler,
    );

    let err = runner
        .run(sink.clone())
        .await
        .expect_err("A panicking task should fail the barrier");

    match err {
        DemoError::Join(join_error) => assert!(join_error.is_panic()),
        other => panic!("Unexpected error: {other}"),
    }
    assert!(!sink
        .events()
        .iter()
        .any(|event| matches!(event, DemoEvent::RunnerFinished(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_barrier_leaves_siblings_running() {
    let sink = Arc::new(RecordingSink::new());
    let scheduler = TokioScheduler::new(Handle::current());
    let runner = TaskBatchRunner::with_workloads(
        vec![
            Workload::Sleep(Duration::from_millis(50)),
            Workload::Fault("task exploded".to_string()),
        ],
        scheduler,
    );

    runner
        .run(sink.clone())
        .await
        .expect_err("A panicking task should fail the barrier");

    tokio::time::sleep(Duration::from_millis(300)).await;

    let sibling_completed = sink
        .unit_events()
        .iter()
        .any(|event| event.ordinal == 1 && event.state == UnitState::Completed);
    assert!(sibling_completed, "Sibling task should not be aborted");
}

#[test]
fn test_pool_tasks_report_pool_workers() {
    let sink = Arc::new(RecordingSink::new());

    let report = run_on_pool(&config(3), sink.clone()).expect("Task batch should succeed");

    assert_eq!(report.units, 3);
    let starts: Vec<_> = sink
        .unit_events()
        .into_iter()
        .filter(|event| event.state == UnitState::Running)
        .collect();
    assert_eq!(starts.len(), 3);
    assert!(starts.iter().all(|event| event.context.is_pool_worker));
}

/// Runs every unit only when the barrier is reached, one after another
struct DeferredScheduler;

type Deferred = Pin<Box<dyn Future<Output = ()> + Send>>;

#[async_trait]
impl Scheduler for DeferredScheduler {
    type Handle = Deferred;

    fn submit(&self, unit: WorkUnit, sink: Arc<dyn EventSink>) -> Self::Handle {
        Box::pin(async move { unit.run_async(sink.as_ref()).await })
    }

    async fn join_all(&self, handles: Vec<Self::Handle>) -> thread_task_demo::Result<()> {
        for handle in handles {
            handle.await;
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_runner_uses_injected_scheduler() {
    let sink = Arc::new(RecordingSink::new());
    let runner = TaskBatchRunner::with_workloads(
        vec![Workload::Sleep(Duration::from_millis(10)); 3],
        DeferredScheduler,
    );

    let report = runner
        .run(sink.clone())
        .await
        .expect("Deferred batch should succeed");

    let sequence: Vec<(usize, UnitState)> = sink
        .unit_events()
        .iter()
        .map(|event| (event.ordinal, event.state))
        .collect();
    assert_eq!(
        sequence,
        vec![
            (1, UnitState::Running),
            (1, UnitState::Completed),
            (2, UnitState::Running),
            (2, UnitState::Completed),
            (3, UnitState::Running),
            (3, UnitState::Completed),
        ]
    );
    assert!(report.elapsed >= Duration::from_millis(30));
}
