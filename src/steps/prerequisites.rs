//! System package prerequisites.
//!
//! Installs the Python tooling the later steps need. Runs `apt` through sudo
//! so the provisioner itself can stay an unprivileged process.

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::runner::CommandRunner;
use tracing::info;

pub fn run(_config: &ProvisionConfig, runner: &dyn CommandRunner) -> Result<()> {
    info!("Updating package lists");
    runner
        .run("sudo", &["apt", "update"])?
        .ensure_success("apt update")?;

    info!("Installing Python dependencies (python3-venv, python3-pip)");
    runner
        .run(
            "sudo",
            &["apt", "install", "-y", "python3-venv", "python3-pip"],
        )?
        .ensure_success("apt install python3-venv python3-pip")?;

    info!("Python dependencies installed successfully");
    Ok(())
}
