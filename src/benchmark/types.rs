use crate::error::{BuildError, ConfigError, RunError, SweepError};
use crate::metrics::Metrics;
use crate::space::ConfigSpace;
use crate::{MemorySize, RawOutput, RunParams, SweepPoint};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_TASKLETS: [u32; 1] = [1];
pub const DEFAULT_BLOCK_SIZES: [u32; 9] = [2, 4, 8, 16, 32, 64, 128, 256, 512];
pub const DEFAULT_DURATION_SECONDS: u64 = 10;

/// What the sweep does when a point's build or run fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the sweep at the failing point.
    Abort,
    /// Record the failure and move on to the next point.
    #[default]
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            _ => Err(ConfigError::Value {
                field: "failure policy",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailurePolicy::Abort => f.write_str("abort"),
            FailurePolicy::Skip => f.write_str("skip"),
        }
    }
}

/// Everything one sweep needs, passed to the driver up front.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub device_count: u32,
    pub mode: u32,
    pub duration_seconds: u64,
    pub total_memory: MemorySize,
    pub tasklets: Vec<u32>,
    pub block_sizes: Vec<u32>,
    /// Log every external command before it runs.
    pub debug: bool,
    pub on_build_failure: FailurePolicy,
    pub on_run_failure: FailurePolicy,
    /// Pass `-d` so the host actually offloads to the DPUs.
    pub use_dpu: bool,
    pub show_build_output: bool,
    pub show_run_output: bool,
    /// Directory holding the Makefile and the built `host` binary.
    pub work_dir: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            device_count: 1,
            mode: 0,
            duration_seconds: DEFAULT_DURATION_SECONDS,
            total_memory: MemorySize::default(),
            tasklets: DEFAULT_TASKLETS.to_vec(),
            block_sizes: DEFAULT_BLOCK_SIZES.to_vec(),
            debug: false,
            on_build_failure: FailurePolicy::Skip,
            on_run_failure: FailurePolicy::Skip,
            use_dpu: false,
            show_build_output: false,
            show_run_output: false,
            work_dir: PathBuf::from("."),
        }
    }
}

impl SweepConfig {
    /// Empty tasklet or block-size lists are allowed and make an empty sweep.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_count == 0 {
            return Err(ConfigError::Zero {
                field: "device count",
            });
        }
        if self.tasklets.contains(&0) {
            return Err(ConfigError::ZeroEntry { field: "tasklets" });
        }
        if self.block_sizes.contains(&0) {
            return Err(ConfigError::ZeroEntry {
                field: "block sizes",
            });
        }
        Ok(())
    }

    pub fn run_params(&self) -> RunParams {
        RunParams {
            mode: self.mode,
            total_memory: self.total_memory.clone(),
            duration_seconds: self.duration_seconds,
            use_dpu: self.use_dpu,
        }
    }

    pub fn config_space(&self) -> ConfigSpace {
        ConfigSpace::new(
            self.device_count,
            self.run_params(),
            self.tasklets.clone(),
            self.block_sizes.clone(),
        )
    }

    pub fn policy_for(&self, failure: &PointFailure) -> FailurePolicy {
        match failure {
            PointFailure::Build(_) => self.on_build_failure,
            PointFailure::Run(_) => self.on_run_failure,
        }
    }
}

/// Metrics of one successful point, tagged with the point that produced them.
#[derive(Clone, Debug)]
pub struct SweepRecord {
    pub point: SweepPoint,
    pub metrics: Metrics,
    pub output: RawOutput,
}

#[derive(Debug)]
pub enum PointFailure {
    Build(BuildError),
    Run(RunError),
}

impl fmt::Display for PointFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PointFailure::Build(err) => write!(f, "build: {err}"),
            PointFailure::Run(err) => write!(f, "run: {err}"),
        }
    }
}

#[derive(Debug)]
pub struct FailedPoint {
    pub point: SweepPoint,
    pub failure: PointFailure,
}

impl FailedPoint {
    /// Output the failed process left behind, if any was captured.
    pub fn output(&self) -> Option<&RawOutput> {
        match &self.failure {
            PointFailure::Build(BuildError::Failed { output, .. }) => Some(output),
            PointFailure::Build(BuildError::Launch { .. }) => None,
            PointFailure::Run(err) => err.output(),
        }
    }
}

impl From<FailedPoint> for SweepError {
    fn from(failed: FailedPoint) -> Self {
        match failed.failure {
            PointFailure::Build(source) => SweepError::Build {
                point: failed.point,
                source,
            },
            PointFailure::Run(source) => SweepError::Run {
                point: failed.point,
                source,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepStatus {
    Completed,
    /// Stopped at the last entry of `failures` under the abort policy.
    Aborted,
}

#[derive(Debug)]
pub struct SweepReport {
    pub records: Vec<SweepRecord>,
    pub failures: Vec<FailedPoint>,
    pub status: SweepStatus,
    /// Size of the configured space, including points never reached.
    pub total_points: usize,
}

impl SweepReport {
    pub fn exit_code(&self) -> i32 {
        match self.status {
            SweepStatus::Completed => 0,
            SweepStatus::Aborted => 1,
        }
    }

    /// Turn an aborted sweep into the error that stopped it.
    pub fn into_result(mut self) -> Result<Self, SweepError> {
        if self.status == SweepStatus::Aborted {
            if let Some(failed) = self.failures.pop() {
                return Err(failed.into());
            }
        }
        Ok(self)
    }
}
