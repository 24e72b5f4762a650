//! Pre-flight sanity checks for the runtime environment
//!
//! Verifies the host before any step runs:
//! - Required runtime binaries are present
//! - The process is root, or a non-root user with sudo available
//!
//! If a check fails, the program exits with a clear error message before
//! any command is executed.

use std::process::Command;
use tracing::{debug, info, warn};

/// Result of environment verification
#[derive(Debug)]
pub struct SanityCheckResult {
    pub missing_binaries: Vec<String>,
    pub can_escalate: bool,
}

impl SanityCheckResult {
    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.missing_binaries.is_empty() && self.can_escalate
    }
}

/// Required runtime binaries for provisioning
const REQUIRED_BINARIES: &[&str] = &[
    "sudo",      // Privilege escalation for system changes
    "apt",       // Package installation
    "git",       // Repository clone
    "python3",   // Virtual environment creation
    "systemctl", // Service and Apache control
];

/// Check if a binary is available in PATH
fn binary_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Check if running as root (EUID 0)
fn is_running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Perform all sanity checks and return the result
pub fn verify_environment() -> SanityCheckResult {
    let mut missing = Vec::new();

    for binary in REQUIRED_BINARIES {
        if !binary_exists(binary) {
            missing.push((*binary).to_string());
        }
    }

    // Root can do everything directly; anyone else needs sudo on PATH.
    let can_escalate = is_running_as_root() || binary_exists("sudo");

    SanityCheckResult {
        missing_binaries: missing,
        can_escalate,
    }
}

/// Print a pretty error message to stderr and exit
pub fn print_error_and_exit(result: &SanityCheckResult) -> ! {
    eprintln!();
    eprintln!("siteup - pre-flight check failed");
    eprintln!();

    if !result.can_escalate {
        eprintln!("error: cannot escalate privileges");
        eprintln!("  Provisioning changes system packages, services, and /etc files.");
        eprintln!("  Run as root, or install sudo for the current user.");
        eprintln!();
    }

    if !result.missing_binaries.is_empty() {
        eprintln!("error: missing required binaries");
        for binary in &result.missing_binaries {
            eprintln!("  - {}", binary);
        }
        eprintln!();
        eprintln!("  Install the missing tools and try again.");
        eprintln!();
    }

    std::process::exit(1);
}

/// Skip the checks entirely (for development/testing)
/// Set SITEUP_SKIP_PREFLIGHT=1 to skip
pub fn should_skip_preflight() -> bool {
    std::env::var("SITEUP_SKIP_PREFLIGHT")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Main entry point: verify the environment and exit if checks fail.
/// Call this before the first step runs.
pub fn run_preflight_checks() {
    if should_skip_preflight() {
        warn!("Pre-flight checks skipped (SITEUP_SKIP_PREFLIGHT=1)");
        return;
    }

    debug!("Running pre-flight sanity checks...");
    let result = verify_environment();

    if !result.is_ok() {
        print_error_and_exit(&result);
    }

    info!(
        "Pre-flight checks passed: can_escalate={}, all binaries present",
        result.can_escalate
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_exists_sh() {
        // sh should always exist
        assert!(binary_exists("sh"), "sh should be available");
    }

    #[test]
    fn test_binary_exists_nonexistent() {
        assert!(!binary_exists("this_binary_definitely_does_not_exist_12345"));
    }

    #[test]
    fn test_sanity_result_is_ok() {
        let ok_result = SanityCheckResult {
            missing_binaries: vec![],
            can_escalate: true,
        };
        assert!(ok_result.is_ok());

        let missing_binary = SanityCheckResult {
            missing_binaries: vec!["git".to_string()],
            can_escalate: true,
        };
        assert!(!missing_binary.is_ok());

        let no_escalation = SanityCheckResult {
            missing_binaries: vec![],
            can_escalate: false,
        };
        assert!(!no_escalation.is_ok());
    }
}
