use std::time::Duration;

/// Units per batch when nothing else is configured
pub const DEFAULT_UNITS: usize = 3;

/// Simulated work performed by each unit
pub const DEFAULT_WORK_DURATION: Duration = Duration::from_millis(500);

/// Demo configuration.
///
/// The binary always runs with [`DemoConfig::default`]; the builders exist so
/// tests can shrink the batch and the delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Number of work units in each batch
    pub units: usize,
    /// How long each unit sleeps
    pub work_duration: Duration,
    /// Worker threads in the task pool
    pub worker_threads: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            units: DEFAULT_UNITS,
            work_duration: DEFAULT_WORK_DURATION,
            worker_threads: num_cpus::get().max(DEFAULT_UNITS),
        }
    }
}

impl DemoConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of units per batch
    pub fn with_units(mut self, units: usize) -> Self {
        self.units = units;
        self
    }

    /// Set the simulated work duration
    pub fn with_work_duration(mut self, duration: Duration) -> Self {
        self.work_duration = duration;
        self
    }

    /// Set the worker pool size (at least one worker)
    pub fn with_worker_threads(mut self, workers: usize) -> Self {
        self.worker_threads = workers.max(1);
        self
    }
}
