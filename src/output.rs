//! User-facing progress lines

use std::sync::atomic::{AtomicBool, Ordering};

use console::style;

use crate::models::PackageInfo;
use crate::shell::ShellCommand;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Silence progress lines
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Format the banner printed before a package's steps
pub fn format_package_header(verb: &str, info: &PackageInfo) -> String {
    format!(
        "{} {} {}",
        style("═══").cyan().bold(),
        style(verb).bold(),
        style(info.directory.display()).cyan().bold()
    )
}

/// Format a single step line
pub fn format_package_operation(operation: &str, info: &PackageInfo) -> String {
    format!(
        "  {} {} {}",
        style("▸").green(),
        operation,
        style(format!("({})", info.directory.display())).dim()
    )
}

/// Format the line shown for a command that a dry run skips
pub fn format_command_preview(command: &ShellCommand) -> String {
    format!(
        "    {} {} {}",
        style("would run").yellow(),
        style(command).bold(),
        style(format!("({})", command.cwd.display())).dim()
    )
}

/// Print the banner for a package
pub fn package_header(verb: &str, info: &PackageInfo) {
    if !is_quiet() {
        println!("\n{}", format_package_header(verb, info));
    }
}

/// Print a step about to run for a package
pub fn package_operation(operation: &str, info: &PackageInfo) {
    if !is_quiet() {
        println!("{}", format_package_operation(operation, info));
    }
}

/// Print a command that a dry run skips
pub fn command_preview(command: &ShellCommand) {
    if !is_quiet() {
        println!("{}", format_command_preview(command));
    }
}
