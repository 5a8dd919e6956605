//! # Thread vs Task demo
//!
//! Runs the same small batch of work twice: once on manually created OS
//! threads, each joined before the next one starts, and once as tasks on a
//! shared worker pool awaited through a join-all barrier. Both batches are
//! timed and every unit reports the execution context it ran on.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use thread_task_demo::{demo::run_demo, sink::StdoutSink, DemoConfig};
//!
//! # fn example() -> thread_task_demo::Result<()> {
//! let summary = run_demo(&DemoConfig::default(), Arc::new(StdoutSink))?;
//! assert!(summary.thread.elapsed > summary.task.elapsed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: batch size, simulated work and pool sizing
//! - [`context`]: identity of the thread a unit runs on
//! - [`unit`]: work units and their lifecycle events
//! - [`sink`]: where demo output goes
//! - [`thread_runner`]: start-then-join OS threads
//! - [`task_runner`]: pool-scheduled tasks behind a join-all barrier
//! - [`report`]: batch timings and the final comparison
//! - [`demo`]: the end-to-end sequence

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

use thiserror::Error;

/// Result type for demo operations
pub type Result<T> = std::result::Result<T, DemoError>;

/// Main error type for the demo
#[derive(Error, Debug)]
pub enum DemoError {
    /// A unit running on a manually managed thread panicked
    #[error("Thread unit {ordinal} panicked: {message}")]
    ThreadPanicked {
        /// Ordinal of the failed unit
        ordinal: usize,
        /// Panic payload, when it was a string
        message: String,
    },

    /// A pool task failed and the join-all barrier re-raised it
    #[error("Async join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Spawning a thread or building the worker pool failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Batch size, simulated work and pool sizing
pub mod config;

/// Execution context identity
pub mod context;

/// Work units and lifecycle events
pub mod unit;

/// Output sinks
pub mod sink;

/// Manually managed thread batch
pub mod thread_runner;

/// Pool-scheduled task batch
pub mod task_runner;

/// Batch timings
pub mod report;

/// End-to-end demo sequence
pub mod demo;

pub use config::DemoConfig;
