use crate::RawOutput;
use crate::error::ExitDescription;
use std::process::{Command, Stdio};

/// What happens to a child's stdout and stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Collect both streams into a [`RawOutput`].
    Capture,
    /// Let the child write straight to the harness's terminal.
    Inherit,
}

#[derive(Debug)]
pub struct CommandOutcome {
    pub exit: ExitDescription,
    pub success: bool,
    /// Empty in [`OutputMode::Inherit`].
    pub output: RawOutput,
}

/// Spawn `cmd`, block until it exits and collect its output according to `mode`.
///
/// Only spawn failures are reported as `Err`; a non-zero exit is a normal
/// outcome the caller inspects.
pub fn execute(cmd: &mut Command, mode: OutputMode) -> std::io::Result<CommandOutcome> {
    cmd.stdin(Stdio::null());
    match mode {
        OutputMode::Capture => {
            let output = cmd.output()?;
            Ok(CommandOutcome {
                exit: output.status.into(),
                success: output.status.success(),
                output: RawOutput::new(
                    String::from_utf8_lossy(&output.stdout),
                    String::from_utf8_lossy(&output.stderr),
                ),
            })
        }
        OutputMode::Inherit => {
            let status = cmd
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()?;
            Ok(CommandOutcome {
                exit: status.into(),
                success: status.success(),
                output: RawOutput::default(),
            })
        }
    }
}

/// Render `cmd` as a shell-like line for logs. Not meant to be re-parsed.
pub fn describe(cmd: &Command) -> String {
    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    if let Some(dir) = cmd.get_current_dir() {
        line.push_str(&format!(" (in {})", dir.display()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_lists_args_and_dir() {
        let mut cmd = Command::new("make");
        cmd.args(["NR_DPUS=4", "NR_TASKLETS=2"]).current_dir("/tmp/src");
        assert_eq!(describe(&cmd), "make NR_DPUS=4 NR_TASKLETS=2 (in /tmp/src)");
    }

    #[test]
    fn test_execute_reports_spawn_failure() {
        let mut cmd = Command::new("/definitely/not/a/real/program");
        let err = execute(&mut cmd, OutputMode::Capture).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_captures_both_streams() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo out; echo err >&2; exit 3"]);
        let outcome = execute(&mut cmd, OutputMode::Capture).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.exit.code, Some(3));
        assert_eq!(outcome.output.stdout, "out\n");
        assert_eq!(outcome.output.stderr, "err\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_inherit_has_no_output() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exit 0"]);
        let outcome = execute(&mut cmd, OutputMode::Inherit).unwrap();
        assert!(outcome.success);
        assert!(outcome.output.is_empty());
    }
}
