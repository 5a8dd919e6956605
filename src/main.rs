//! Thread vs Task demo binary.
//!
//! Takes no arguments. Runs both batches with the default configuration and
//! prints the results on stdout; diagnostics go to stderr.

use anyhow::Result;
use std::sync::Arc;

use thread_task_demo::{demo::run_demo, sink::StdoutSink, DemoConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("thread_task_demo=warn")
        .with_writer(std::io::stderr)
        .init();

    run_demo(&DemoConfig::default(), Arc::new(StdoutSink))?;
    Ok(())
}
