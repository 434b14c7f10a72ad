// Minime DPU benchmark sweep harness

use std::fmt;

// Process seams. Both calls block until the external process has exited.
pub trait Builder {
    /// Rebuild the benchmark so the next run executes a binary with exactly these parameters.
    fn build(&mut self, params: &BuildParams) -> Result<(), BuildError>;
}

pub trait Runner {
    /// Execute the most recently built binary and capture what it printed.
    fn run(&mut self, params: &RunParams) -> Result<RawOutput, RunError>;
}

/// Build-time constants baked into one binary variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BuildParams {
    pub device_count: u32,
    pub tasklet_count: u32,
    /// Power of two by convention; not enforced.
    pub block_size: u32,
}

impl fmt::Display for BuildParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "dpus={}, tasklets={}, block_size={}",
            self.device_count, self.tasklet_count, self.block_size
        )
    }
}

/// Flags for one execution of the host binary
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunParams {
    pub mode: u32,
    pub total_memory: MemorySize,
    /// 0 lets the binary decide (a single untimed pass for some modes).
    pub duration_seconds: u64,
    pub use_dpu: bool,
}

impl fmt::Display for RunParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "mode={} ({}), memory={}, duration={}s",
            self.mode,
            mode_name(self.mode).unwrap_or("unknown"),
            self.total_memory,
            self.duration_seconds
        )
    }
}

/// One (build, run) pair of the sweep
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepPoint {
    pub build: BuildParams,
    pub run: RunParams,
}

impl fmt::Display for SweepPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}; {}]", self.build, self.run)
    }
}

/// Text captured from a finished child process
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
}

impl RawOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self::new(stdout, String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }
}

/// Benchmark plugins compiled into the host, indexed by mode.
pub const MODE_NAMES: [&str; 2] = ["sequential_read", "random_read"];

pub fn mode_name(mode: u32) -> Option<&'static str> {
    MODE_NAMES.get(mode as usize).copied()
}

// Implementations
pub mod benchmark;
pub mod error;
pub mod metrics;
pub mod process;
pub mod prompt;
pub mod size;
pub mod space;

pub use benchmark::{
    FailedPoint, FailurePolicy, SweepConfig, SweepDriver, SweepRecord, SweepReport, SweepStatus,
};
pub use error::{BuildError, BuildStep, ConfigError, ExitDescription, RunError, SweepError};
pub use metrics::{Metrics, extract};
pub use process::{HostRunner, MakeBuilder};
pub use size::MemorySize;
pub use space::{ConfigSpace, ConfigSpaceIter};
