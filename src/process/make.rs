use super::command::{OutputMode, describe, execute};
use crate::error::{BuildError, BuildStep};
use crate::{BuildParams, Builder};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Rebuilds the benchmark with `make clean` followed by
/// `make NR_DPUS=.. NR_TASKLETS=.. BLOCK_SIZE=..` in the source directory.
///
/// The two steps are separate processes with structured arguments, so a
/// failing clean is reported on its own and never reaches the build.
pub struct MakeBuilder {
    program: OsString,
    work_dir: PathBuf,
    output_mode: OutputMode,
    echo_commands: bool,
}

impl MakeBuilder {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: OsString::from("make"),
            work_dir: work_dir.into(),
            output_mode: OutputMode::Capture,
            echo_commands: false,
        }
    }

    /// Use another `make` executable. A bare name is looked up on PATH, a
    /// relative path is taken from the harness's cwd.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Stream build output to the terminal instead of capturing it.
    pub fn show_output(mut self, show: bool) -> Self {
        self.output_mode = if show {
            OutputMode::Inherit
        } else {
            OutputMode::Capture
        };
        self
    }

    /// Print each command line before running it.
    pub fn echo_commands(mut self, echo: bool) -> Self {
        self.echo_commands = echo;
        self
    }

    // The child runs in the work directory, so a relative path such as
    // `tools/make` must be made absolute before spawning.
    fn program(&self) -> PathBuf {
        let path = Path::new(&self.program);
        if path.is_relative() && path.components().count() > 1 {
            if let Ok(absolute) = std::path::absolute(path) {
                return absolute;
            }
        }
        path.to_path_buf()
    }

    pub fn clean_command(&self) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.arg("clean").current_dir(&self.work_dir);
        cmd
    }

    pub fn build_command(&self, params: &BuildParams) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.arg(format!("NR_DPUS={}", params.device_count))
            .arg(format!("NR_TASKLETS={}", params.tasklet_count))
            .arg(format!("BLOCK_SIZE={}", params.block_size))
            .current_dir(&self.work_dir);
        cmd
    }

    fn step(&self, step: BuildStep, mut cmd: Command) -> Result<(), BuildError> {
        let line = describe(&cmd);
        if self.echo_commands {
            println!("Command being executed: {line}");
        }
        debug!(%step, command = %line, "running build step");
        let outcome = execute(&mut cmd, self.output_mode).map_err(|source| BuildError::Launch {
            step,
            program: self.program.to_string_lossy().into_owned(),
            source,
        })?;
        if !outcome.success {
            return Err(BuildError::Failed {
                step,
                exit: outcome.exit,
                output: outcome.output,
            });
        }
        Ok(())
    }
}

impl Builder for MakeBuilder {
    fn build(&mut self, params: &BuildParams) -> Result<(), BuildError> {
        self.step(BuildStep::Clean, self.clean_command())?;
        self.step(BuildStep::Build, self.build_command(params))
    }
}
