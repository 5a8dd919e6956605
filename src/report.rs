use std::fmt;
use std::time::Duration;

use crate::context::ExecutionContext;
use crate::unit::RunnerKind;

/// Timing of one finished batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Runner that produced the batch
    pub runner: RunnerKind,
    /// Units that ran
    pub units: usize,
    /// Wall time from before the first unit was created until the last finished
    pub elapsed: Duration,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total execution time ({}): {}ms",
            self.runner,
            self.elapsed.as_millis()
        )
    }
}

/// Thread batch against task batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    /// Elapsed time of the thread batch
    pub thread: Duration,
    /// Elapsed time of the task batch
    pub task: Duration,
}

impl Comparison {
    /// Build from the two batch reports
    pub fn new(thread: &BatchReport, task: &BatchReport) -> Self {
        Self {
            thread: thread.elapsed,
            task: task.elapsed,
        }
    }

    /// How many times faster the task batch was; `None` when it took no time
    pub fn speedup(&self) -> Option<f64> {
        if self.task.is_zero() {
            return None;
        }
        Some(self.thread.as_secs_f64() / self.task.as_secs_f64())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.speedup() {
            Some(ratio) => write!(f, "Tasks finished {ratio:.2}x faster than threads"),
            None => write!(
                f,
                "Threads took {}ms, tasks took {}ms",
                self.thread.as_millis(),
                self.task.as_millis()
            ),
        }
    }
}

/// Everything one demo run measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSummary {
    /// Context the demo was started from
    pub main_context: ExecutionContext,
    /// Thread batch timing
    pub thread: BatchReport,
    /// Task batch timing
    pub task: BatchReport,
}

impl DemoSummary {
    /// Compare the two batches
    pub fn comparison(&self) -> Comparison {
        Comparison::new(&self.thread, &self.task)
    }
}
