use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::DemoConfig;
use crate::context::ExecutionContext;
use crate::report::DemoSummary;
use crate::sink::{DemoEvent, EventSink};
use crate::task_runner::run_on_pool;
use crate::thread_runner::ThreadBatchRunner;
use crate::Result;

/// Run the thread batch, then the task batch, reporting everything to `sink`.
///
/// Blocks the calling thread for the whole demo. Must not be called from
/// inside a tokio runtime since it builds its own pool.
#[instrument(skip(sink))]
pub fn run_demo(config: &DemoConfig, sink: Arc<dyn EventSink>) -> Result<DemoSummary> {
    let main_context = ExecutionContext::current();
    sink.record(DemoEvent::Startup {
        context: main_context,
    });

    let thread = ThreadBatchRunner::new(config).run(Arc::clone(&sink))?;
    let task = run_on_pool(config, Arc::clone(&sink))?;

    let summary = DemoSummary {
        main_context,
        thread,
        task,
    };
    let comparison = summary.comparison();
    info!(speedup = ?comparison.speedup(), "Demo finished");

    sink.record(DemoEvent::Comparison(comparison));
    sink.record(DemoEvent::Completed);
    Ok(summary)
}
