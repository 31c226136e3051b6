//! Subprocess execution for package manager invocations

mod dry_run;
mod process;

pub use dry_run::DryRunShell;
pub use process::ProcessShell;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// An external command run inside a package directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// Program to execute
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
}

impl ShellCommand {
    /// Create a new command
    pub fn new<I, A>(program: impl Into<String>, args: I, cwd: impl AsRef<Path>) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Output of a captured command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

impl CapturedOutput {
    /// Whether the command exited with status zero
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Trait for command runners
#[allow(async_fn_in_trait)]
pub trait Shell {
    /// Run a command with inherited stdio, failing on a non-zero exit
    async fn run(&self, command: &ShellCommand) -> Result<()>;

    /// Run a read-only command and capture its output regardless of exit status
    async fn capture(&self, command: &ShellCommand) -> Result<CapturedOutput>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording shell used by unit tests

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::StepError;

    /// Records every command and fails those whose display matches `fail_on`
    #[derive(Debug, Clone, Default)]
    pub struct RecordingShell {
        pub commands: Arc<Mutex<Vec<ShellCommand>>>,
        pub fail_on: Option<String>,
        pub captures: HashMap<String, CapturedOutput>,
    }

    impl RecordingShell {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(command: &str) -> Self {
            Self {
                fail_on: Some(command.to_string()),
                ..Self::default()
            }
        }

        pub fn with_capture(mut self, command: &str, output: CapturedOutput) -> Self {
            self.captures.insert(command.to_string(), output);
            self
        }

        pub fn lines(&self) -> Vec<String> {
            self.commands
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.to_string())
                .collect()
        }
    }

    impl Shell for RecordingShell {
        async fn run(&self, command: &ShellCommand) -> Result<()> {
            self.commands.lock().unwrap().push(command.clone());
            let line = command.to_string();
            if self.fail_on.as_deref() == Some(line.as_str()) {
                return Err(StepError::CommandFailed {
                    command: line,
                    cwd: command.cwd.clone(),
                    code: Some(1),
                });
            }
            Ok(())
        }

        async fn capture(&self, command: &ShellCommand) -> Result<CapturedOutput> {
            self.commands.lock().unwrap().push(command.clone());
            Ok(self
                .captures
                .get(&command.to_string())
                .cloned()
                .unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let cmd = ShellCommand::new(
            "npm",
            ["version", "1.0.1", "--allow-same-version"],
            "/repo/a",
        );
        assert_eq!(cmd.to_string(), "npm version 1.0.1 --allow-same-version");
        assert_eq!(cmd.cwd, PathBuf::from("/repo/a"));
    }

    #[test]
    fn test_display_without_args() {
        let cmd = ShellCommand::new("npm", Vec::<String>::new(), ".");
        assert_eq!(cmd.to_string(), "npm");
    }
}
