use super::command::{OutputMode, describe, execute};
use crate::error::RunError;
use crate::{RawOutput, RunParams, Runner};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Runs the host binary produced by the last build:
/// `host -t <mode> -g <memory> -T <seconds> [-d]`.
pub struct HostRunner {
    work_dir: PathBuf,
    binary: PathBuf,
    echo_commands: bool,
}

impl HostRunner {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            binary: PathBuf::from("host"),
            echo_commands: false,
        }
    }

    /// Binary to execute; relative paths are resolved against the work directory.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn echo_commands(mut self, echo: bool) -> Self {
        self.echo_commands = echo;
        self
    }

    /// Where the binary is expected, as seen from the harness's own cwd.
    pub fn binary_path(&self) -> PathBuf {
        self.work_dir.join(&self.binary)
    }

    // The child starts in the work directory, so a relative binary is named
    // from there. The `./` prefix keeps it off the PATH search.
    fn program(&self) -> PathBuf {
        if self.binary.is_absolute() {
            self.binary.clone()
        } else {
            Path::new(".").join(&self.binary)
        }
    }

    pub fn command(&self, params: &RunParams) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.arg("-t")
            .arg(params.mode.to_string())
            .arg("-g")
            .arg(params.total_memory.as_str())
            .arg("-T")
            .arg(params.duration_seconds.to_string());
        if params.use_dpu {
            cmd.arg("-d");
        }
        cmd.current_dir(&self.work_dir);
        cmd
    }
}

impl Runner for HostRunner {
    fn run(&mut self, params: &RunParams) -> Result<RawOutput, RunError> {
        let mut cmd = self.command(params);
        let line = describe(&cmd);
        if self.echo_commands {
            println!("Command being executed: {line}");
        }
        debug!(command = %line, "running benchmark");

        // No timeout here: the binary is trusted to honour -T.
        let outcome = execute(&mut cmd, OutputMode::Capture).map_err(|source| RunError::Launch {
            program: self.binary_path().display().to_string(),
            source,
        })?;
        if !outcome.success {
            return Err(RunError::Failed {
                exit: outcome.exit,
                output: outcome.output,
            });
        }
        Ok(outcome.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySize;

    fn params(use_dpu: bool) -> RunParams {
        RunParams {
            mode: 1,
            total_memory: MemorySize::parse("512K").unwrap(),
            duration_seconds: 0,
            use_dpu,
        }
    }

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_command_flags() {
        let runner = HostRunner::new("/opt/minime/src");
        let cmd = runner.command(&params(false));
        assert_eq!(cmd.get_program(), "./host");
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/opt/minime/src")));
        assert_eq!(args(&cmd), ["-t", "1", "-g", "512K", "-T", "0"]);
    }

    #[test]
    fn test_relative_binary_is_not_joined_with_work_dir() {
        let runner = HostRunner::new("src").with_binary("build/host");
        let cmd = runner.command(&params(false));
        assert_eq!(cmd.get_program(), "./build/host");
        assert_eq!(cmd.get_current_dir(), Some(Path::new("src")));
        assert_eq!(runner.binary_path(), Path::new("src/build/host"));
    }

    #[test]
    fn test_command_use_dpu_flag() {
        let runner = HostRunner::new("src").with_binary("/usr/local/bin/host");
        let cmd = runner.command(&params(true));
        assert_eq!(cmd.get_program(), "/usr/local/bin/host");
        assert_eq!(args(&cmd).last().map(String::as_str), Some("-d"));
    }

    #[test]
    fn test_missing_binary_is_launch_error() {
        let mut runner = HostRunner::new("/no/such/dir").with_binary("/no/such/host");
        let err = runner.run(&params(false)).unwrap_err();
        assert!(matches!(err, RunError::Launch { .. }));
        assert!(err.output().is_none());
    }
}
