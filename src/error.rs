//! Error types for the sweep harness.
//!
//! | Error         | Raised when                                           | Sweep reaction            |
//! |---------------|-------------------------------------------------------|---------------------------|
//! | `BuildError`  | `make clean` or `make` failed or could not be spawned | skip point or abort       |
//! | `RunError`    | the host binary exited non-zero or could not spawn    | skip point or abort       |
//! | `ConfigError` | the sweep configuration is unusable                   | nothing is launched       |
//!
//! A missing metric label is not an error: it shows up as `None` in
//! [`Metrics`](crate::metrics::Metrics).

use crate::{RawOutput, SweepPoint};
use std::fmt;
use std::process::ExitStatus;

/// The half of a rebuild that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildStep {
    Clean,
    Build,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStep::Clean => f.write_str("clean"),
            BuildStep::Build => f.write_str("build"),
        }
    }
}

/// How a child process ended, without holding on to the platform `ExitStatus`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitDescription {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ExitDescription {
    pub fn from_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }
}

impl From<ExitStatus> for ExitDescription {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

impl fmt::Display for ExitDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit code {code}"),
            (None, Some(signal)) => write!(f, "signal {signal}"),
            (None, None) => f.write_str("unknown exit status"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("could not launch `{program}` for the {step} step: {source}")]
    Launch {
        step: BuildStep,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} step failed with {exit}")]
    Failed {
        step: BuildStep,
        exit: ExitDescription,
        /// Captured build output; empty when the build inherited the terminal.
        output: RawOutput,
    },
}

impl BuildError {
    pub fn step(&self) -> BuildStep {
        match self {
            BuildError::Launch { step, .. } | BuildError::Failed { step, .. } => *step,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("could not launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("benchmark exited with {exit}")]
    Failed {
        exit: ExitDescription,
        /// Whatever the binary printed before it failed.
        output: RawOutput,
    },
}

impl RunError {
    pub fn output(&self) -> Option<&RawOutput> {
        match self {
            RunError::Launch { .. } => None,
            RunError::Failed { output, .. } => Some(output),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} contains a zero entry")]
    ZeroEntry { field: &'static str },

    #[error("invalid memory size {0:?}: expected digits with an optional K or M suffix")]
    MemorySize(String),

    #[error("invalid {field} list {value:?}")]
    List { field: &'static str, value: String },

    #[error("invalid value for {field}: {value:?}")]
    Value { field: &'static str, value: String },

    #[error("prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("build failed for {point}: {source}")]
    Build {
        point: SweepPoint,
        #[source]
        source: BuildError,
    },

    #[error("run failed for {point}: {source}")]
    Run {
        point: SweepPoint,
        #[source]
        source: RunError,
    },
}
