//! Command execution seam
//!
//! This module provides the ONLY sanctioned way to invoke external commands.
//! Every provisioning step goes through the `CommandRunner` trait so that:
//!
//! - The exact command line of every invocation is logged
//! - Dry-run mode can skip execution while still showing the preview
//! - Tests can substitute a recording runner and assert on the sequence
//!
//! # Architecture Rule
//!
//! `CommandRunner` is the execution gatekeeper. Using `Command::new` directly
//! inside a step module violates the architecture (the preflight checks in
//! `sanity` are the one exception, since they run before a runner exists).

use crate::error::{Result, SiteupError};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Global dry-run flag.
///
/// When set, `SystemRunner` logs the command it would execute and reports
/// success without spawning anything. Staged file renders still happen so
/// the preview is realistic.
static DRY_RUN: AtomicBool = AtomicBool::new(false);

/// Enable dry-run mode (set from the global `--dry-run` CLI flag).
pub fn enable_dry_run() {
    DRY_RUN.store(true, Ordering::SeqCst);
}

/// Disable dry-run mode (used by tests to restore the default).
pub fn disable_dry_run() {
    DRY_RUN.store(false, Ordering::SeqCst);
}

/// Whether dry-run mode is currently active.
pub fn is_dry_run() -> bool {
    DRY_RUN.load(Ordering::SeqCst)
}

/// Output from a single external command invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Standard output from the command.
    pub stdout: String,
    /// Standard error from the command.
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// Whether execution was skipped due to dry-run mode.
    pub dry_run: bool,
}

impl CommandOutput {
    /// Check that the command succeeded and return a `Command` error if not.
    ///
    /// The failing command's own stderr is included when available; this is
    /// the specific tier of the two-tier error reporting every step uses.
    pub fn ensure_success(&self, context: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            let code = self.exit_code.unwrap_or(-1);
            let stderr = self.stderr.trim();
            if stderr.is_empty() {
                Err(SiteupError::command(format!(
                    "{} (exit code {})",
                    context, code
                )))
            } else {
                Err(SiteupError::command(format!(
                    "{} (exit code {}): {}",
                    context, code, stderr
                )))
            }
        }
    }

    /// A synthetic success, used for dry-run skips.
    pub fn skipped() -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(0),
            success: true,
            dry_run: true,
        }
    }
}

/// The seam through which every provisioning command is executed.
///
/// Implementors run `program` with `args`, blocking until it exits, and
/// report the captured output. A spawn failure (binary missing, permission
/// denied) is an `Err`; a clean spawn with a non-zero exit is an `Ok` whose
/// `success` flag is false, so callers decide fatality via `ensure_success`.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Production runner backed by `std::process::Command`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let rendered = render_command_line(program, args);

        if is_dry_run() {
            info!("[dry-run] would execute: {}", rendered);
            return Ok(CommandOutput::skipped());
        }

        info!("executing: {}", rendered);

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                SiteupError::command(format!("failed to spawn `{}`: {}", rendered, e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let exit_code = output.status.code();
        let success = output.status.success();

        if success {
            info!("`{}` completed successfully", rendered);
        } else {
            info!(
                "`{}` failed with exit code {}",
                rendered,
                exit_code.unwrap_or(-1)
            );
        }

        Ok(CommandOutput {
            stdout,
            stderr,
            exit_code,
            success,
            dry_run: false,
        })
    }
}

/// Render a command line for logs and error messages.
pub fn render_command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
