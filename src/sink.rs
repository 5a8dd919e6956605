//! Demo output.
//!
//! Runners never print directly; they hand [`DemoEvent`]s to an
//! [`EventSink`]. The binary renders them to stdout, tests record them.

use parking_lot::Mutex;
use std::fmt;

use crate::context::ExecutionContext;
use crate::report::{BatchReport, Comparison};
use crate::unit::{RunnerKind, UnitEvent};

/// Width of the rule printed between sections
pub const SEPARATOR_WIDTH: usize = 60;

/// Something observable happened during the demo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoEvent {
    /// The demo started on the calling thread
    Startup {
        /// Context of the caller
        context: ExecutionContext,
    },
    /// A runner is about to create its units
    RunnerStarted(RunnerKind),
    /// A unit changed state
    Unit(UnitEvent),
    /// A runner's batch finished
    RunnerFinished(BatchReport),
    /// Both batches finished
    Comparison(Comparison),
    /// The demo is over
    Completed,
}

impl fmt::Display for DemoEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoEvent::Startup { context } => {
                write!(f, "Main thread started. Context ID: {}", context.id)
            }
            DemoEvent::RunnerStarted(kind) => {
                writeln!(f, "{}", "-".repeat(SEPARATOR_WIDTH))?;
                let title = match kind {
                    RunnerKind::Thread => "THREAD EXAMPLE - manually created threads",
                    RunnerKind::Task => "TASK EXAMPLE - tasks on the worker pool",
                };
                f.write_str(title)
            }
            DemoEvent::Unit(event) => event.fmt(f),
            DemoEvent::RunnerFinished(report) => report.fmt(f),
            DemoEvent::Comparison(comparison) => {
                writeln!(f, "{}", "-".repeat(SEPARATOR_WIDTH))?;
                comparison.fmt(f)
            }
            DemoEvent::Completed => f.write_str("Demo completed."),
        }
    }
}

/// Receives demo events; shared across threads and pool tasks
pub trait EventSink: Send + Sync {
    /// Handle one event
    fn record(&self, event: DemoEvent);
}

/// Prints every event as text on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn record(&self, event: DemoEvent) {
        println!("{event}");
    }
}

/// Keeps every event in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DemoEvent>>,
}

impl RecordingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far
    pub fn events(&self) -> Vec<DemoEvent> {
        self.events.lock().clone()
    }

    /// Snapshot of the unit events only
    pub fn unit_events(&self) -> Vec<UnitEvent> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                DemoEvent::Unit(unit) => Some(unit.clone()),
                _ => None,
            })
            .collect()
    }

    /// Events rendered the way stdout would show them, one entry per line
    pub fn lines(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .flat_map(|event| {
                event
                    .to_string()
                    .lines()
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: DemoEvent) {
        self.events.lock().push(event);
    }
}
