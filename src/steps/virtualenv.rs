//! Virtual environment setup.
//!
//! Creates the venv inside the checkout and installs the application's
//! requirements into it. A missing `requirements.txt` is the one non-fatal
//! skip in the whole run.

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::runner::{is_dry_run, CommandRunner};
use std::fs;
use tracing::{info, warn};

pub fn run(config: &ProvisionConfig, runner: &dyn CommandRunner) -> Result<()> {
    let project_dir = config.project_dir();
    if is_dry_run() {
        // Only staged renders may touch the filesystem in dry-run mode.
        info!(
            "[dry-run] would create project directory {}",
            project_dir.display()
        );
    } else {
        info!("Preparing project directory: {}", project_dir.display());
        fs::create_dir_all(&project_dir)?;
    }

    let venv_dir = config.venv_dir().display().to_string();
    info!("Creating Python virtual environment");
    runner
        .run("python3", &["-m", "venv", &venv_dir])?
        .ensure_success("python3 -m venv")?;

    let requirements = project_dir.join("requirements.txt");
    if requirements.exists() {
        info!("Installing project dependencies from requirements.txt");
        let pip = config.venv_pip().display().to_string();
        let requirements = requirements.display().to_string();
        runner
            .run(&pip, &["install", "-r", &requirements])?
            .ensure_success("pip install -r requirements.txt")?;
        info!("Project dependencies installed successfully");
    } else {
        warn!("No requirements.txt found, skipping dependency installation");
    }

    info!("Virtual environment setup complete");
    info!(
        "To activate the environment, run: source {}",
        config.venv_dir().join("bin").join("activate").display()
    );
    Ok(())
}
