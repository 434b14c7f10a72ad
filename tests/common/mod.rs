#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use minime::error::ExitDescription;
use minime::{
    BuildError, BuildParams, BuildStep, Builder, MemorySize, RawOutput, RunError, RunParams,
    Runner, SweepConfig,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Build(BuildParams),
    Run(RunParams),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Records every build and fails for the listed (tasklets, block size) pairs.
pub struct StubBuilder {
    pub log: CallLog,
    pub fail_on: Vec<(u32, u32)>,
}

impl Builder for StubBuilder {
    fn build(&mut self, params: &BuildParams) -> Result<(), BuildError> {
        self.log.borrow_mut().push(Call::Build(*params));
        if self
            .fail_on
            .contains(&(params.tasklet_count, params.block_size))
        {
            return Err(BuildError::Failed {
                step: BuildStep::Build,
                exit: ExitDescription::from_code(2),
                output: RawOutput::new("", "make: *** [host] Error 1\n"),
            });
        }
        Ok(())
    }
}

/// Answers with canned host output derived from the most recent build.
pub struct StubRunner {
    pub log: CallLog,
    pub fail_on: Vec<(u32, u32)>,
}

impl Runner for StubRunner {
    fn run(&mut self, params: &RunParams) -> Result<RawOutput, RunError> {
        let last_build = self.log.borrow().iter().rev().find_map(|c| match c {
            Call::Build(b) => Some(*b),
            Call::Run(_) => None,
        });
        self.log.borrow_mut().push(Call::Run(params.clone()));

        let build = last_build.expect("run called before any build");
        if self.fail_on.contains(&(build.tasklet_count, build.block_size)) {
            return Err(RunError::Failed {
                exit: ExitDescription::from_code(1),
                output: RawOutput::from_stdout("Bench parameters\n"),
            });
        }
        Ok(RawOutput::from_stdout(canned_output(&build)))
    }
}

pub fn canned_output(build: &BuildParams) -> String {
    format!(
        "Bench parameters\n\t* Use DPU: 1\nAverage cycles per DPU: {}\nOverall throughput: {}.5 MB/s\n",
        build.tasklet_count * 1000 + build.block_size,
        build.tasklet_count * build.block_size
    )
}

/// device_count=4, mode=1, tasklets=[1,2], block_sizes=[2,4], duration=10
pub fn small_config() -> SweepConfig {
    SweepConfig {
        device_count: 4,
        mode: 1,
        duration_seconds: 10,
        total_memory: MemorySize::default(),
        tasklets: vec![1, 2],
        block_sizes: vec![2, 4],
        ..SweepConfig::default()
    }
}

/// Write an executable shell script into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    let mut perms = std::fs::metadata(&path)
        .expect("Failed to stat script")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("Failed to chmod script");
    path
}
