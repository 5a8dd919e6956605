//! Identity of the thread a unit runs on.
//!
//! `std::thread::ThreadId` has no stable integer form, so every thread is
//! handed a small sequential id the first time it is observed.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CONTEXT_ID: u64 = NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed);
    static POOL_WORKER: Cell<bool> = const { Cell::new(false) };
}

/// Identity of an execution context, as observed from inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionContext {
    /// Process-unique id of the thread
    pub id: u64,
    /// Whether the thread belongs to the worker pool
    pub is_pool_worker: bool,
}

impl ExecutionContext {
    /// Identity of the calling thread
    pub fn current() -> Self {
        Self {
            id: CONTEXT_ID.with(|id| *id),
            is_pool_worker: POOL_WORKER.with(Cell::get),
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Context ID: {}, IsPoolWorker: {}",
            self.id, self.is_pool_worker
        )
    }
}

/// Flag the calling thread as a pool worker.
///
/// Installed as the pool runtime's `on_thread_start` hook.
pub fn mark_pool_worker() {
    POOL_WORKER.with(|flag| flag.set(true));
}
