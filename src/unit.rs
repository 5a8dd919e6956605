use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::context::ExecutionContext;
use crate::sink::{DemoEvent, EventSink};

/// Which runner a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunnerKind {
    /// Manually managed OS thread
    Thread,
    /// Task on the worker pool
    Task,
}

impl fmt::Display for RunnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerKind::Thread => f.write_str("Thread"),
            RunnerKind::Task => f.write_str("Task"),
        }
    }
}

/// Lifecycle of a work unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// Built but not yet executing
    Created,
    /// Executing its workload
    Running,
    /// Workload finished
    Completed,
}

impl UnitState {
    /// The only state reachable from this one
    pub fn next(self) -> Option<UnitState> {
        match self {
            UnitState::Created => Some(UnitState::Running),
            UnitState::Running => Some(UnitState::Completed),
            UnitState::Completed => None,
        }
    }
}

/// What a unit does while running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Workload {
    /// Simulated work
    Sleep(Duration),
    /// Fail with the given message instead of working
    Fault(String),
}

/// A unit entered a new state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitEvent {
    /// Runner that owns the unit
    pub runner: RunnerKind,
    /// 1-based position in the batch
    pub ordinal: usize,
    /// State just entered
    pub state: UnitState,
    /// Where the transition was observed
    pub context: ExecutionContext,
}

impl fmt::Display for UnitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] ", self.runner, self.ordinal)?;
        match self.state {
            UnitState::Created => f.write_str("Created"),
            UnitState::Running => write!(f, "Start - {}", self.context),
            UnitState::Completed => f.write_str("End"),
        }
    }
}

/// A single unit of work with a fixed ordinal
#[derive(Debug, Clone)]
pub struct WorkUnit {
    runner: RunnerKind,
    ordinal: usize,
    workload: Workload,
    state: UnitState,
}

impl WorkUnit {
    /// Create a unit in the `Created` state
    pub fn new(runner: RunnerKind, ordinal: usize, workload: Workload) -> Self {
        debug!(runner = %runner, ordinal, "Work unit created");
        Self {
            runner,
            ordinal,
            workload,
            state: UnitState::Created,
        }
    }

    /// 1-based position in the batch
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Run on the calling thread, blocking it for the whole workload
    pub fn run_blocking(mut self, sink: &dyn EventSink) {
        self.advance(UnitState::Running, sink);
        match &self.workload {
            Workload::Sleep(duration) => std::thread::sleep(*duration),
            Workload::Fault(message) => panic!("{message}"),
        }
        self.advance(UnitState::Completed, sink);
    }

    /// Run as a task; the delay yields the worker instead of blocking it
    pub async fn run_async(mut self, sink: &dyn EventSink) {
        self.advance(UnitState::Running, sink);
        match &self.workload {
            Workload::Sleep(duration) => tokio::time::sleep(*duration).await,
            Workload::Fault(message) => panic!("{message}"),
        }
        self.advance(UnitState::Completed, sink);
    }

    fn advance(&mut self, next: UnitState, sink: &dyn EventSink) {
        debug_assert_eq!(self.state.next(), Some(next));
        self.state = next;

        let context = ExecutionContext::current();
        debug!(
            runner = %self.runner,
            ordinal = self.ordinal,
            state = ?next,
            context_id = context.id,
            pool_worker = context.is_pool_worker,
            "Work unit transition"
        );

        sink.record(DemoEvent::Unit(UnitEvent {
            runner: self.runner,
            ordinal: self.ordinal,
            state: next,
            context,
        }));
    }
}
