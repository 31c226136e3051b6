//! Real subprocess runner

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::{CapturedOutput, Shell, ShellCommand};
use crate::error::{Result, StepError};

/// Runs commands as child processes of pkgstep
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessShell;

impl ProcessShell {
    /// Create a new process shell
    pub fn new() -> Self {
        Self
    }

    fn command(command: &ShellCommand) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).current_dir(&command.cwd);
        cmd
    }
}

impl Shell for ProcessShell {
    async fn run(&self, command: &ShellCommand) -> Result<()> {
        debug!("running `{}` in {}", command, command.cwd.display());

        let status = Self::command(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| StepError::CommandSpawn {
                command: command.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(StepError::CommandFailed {
                command: command.to_string(),
                cwd: command.cwd.clone(),
                code: status.code(),
            });
        }

        Ok(())
    }

    async fn capture(&self, command: &ShellCommand) -> Result<CapturedOutput> {
        debug!("capturing `{}` in {}", command, command.cwd.display());

        let output = Self::command(command)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| StepError::CommandSpawn {
                command: command.to_string(),
                source,
            })?;

        Ok(CapturedOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_success() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ShellCommand::new("true", Vec::<String>::new(), dir.path());
        ProcessShell::new().run(&cmd).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_failure_keeps_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ShellCommand::new("sh", ["-c", "exit 3"], dir.path());
        let err = ProcessShell::new().run(&cmd).await.unwrap_err();
        match err {
            StepError::CommandFailed { command, cwd, code } => {
                assert_eq!(command, "sh -c exit 3");
                assert_eq!(cwd, dir.path());
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ShellCommand::new("pkgstep-no-such-program", ["x"], dir.path());
        let err = ProcessShell::new().run(&cmd).await.unwrap_err();
        assert!(matches!(err, StepError::CommandSpawn { .. }));
    }

    #[tokio::test]
    async fn test_capture_runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        let cmd = ShellCommand::new("ls", Vec::<String>::new(), dir.path());
        let output = ProcessShell::new().capture(&cmd).await.unwrap();
        assert!(output.success());
        assert!(output.stdout.contains("marker"));
    }

    #[tokio::test]
    async fn test_capture_does_not_fail_on_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ShellCommand::new("sh", ["-c", "echo oops >&2; exit 1"], dir.path());
        let output = ProcessShell::new().capture(&cmd).await.unwrap();
        assert_eq!(output.code, Some(1));
        assert_eq!(output.stderr.trim(), "oops");
    }
}
