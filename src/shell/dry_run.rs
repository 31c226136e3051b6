//! Preview runner that prints instead of executing

use super::{CapturedOutput, ProcessShell, Shell, ShellCommand};
use crate::error::Result;
use crate::output;

/// Prints mutating commands without running them.
///
/// Read-only queries still go through to the package manager so that the
/// previewed version bump matches what a real run would do.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunShell {
    inner: ProcessShell,
}

impl DryRunShell {
    /// Create a new dry-run shell
    pub fn new() -> Self {
        Self::default()
    }
}

impl Shell for DryRunShell {
    async fn run(&self, command: &ShellCommand) -> Result<()> {
        output::command_preview(command);
        Ok(())
    }

    async fn capture(&self, command: &ShellCommand) -> Result<CapturedOutput> {
        self.inner.capture(command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dry_run_never_fails() {
        let cmd = ShellCommand::new("pkgstep-no-such-program", ["publish"], "/nonexistent");
        DryRunShell::new().run(&cmd).await.unwrap();
    }
}
