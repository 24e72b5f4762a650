//! Repository checkout.
//!
//! Prepares the base directory and clones the application repository. An
//! existing checkout is removed and re-cloned, never merged into, so re-runs
//! always start from a pristine tree.

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::runner::CommandRunner;
use tracing::{debug, info, warn};

pub fn run(config: &ProvisionConfig, runner: &dyn CommandRunner) -> Result<()> {
    let base_dir = config.base_dir.display().to_string();
    let target_dir = config.project_dir().display().to_string();

    if !config.base_dir.exists() {
        info!("Creating base directory {}", base_dir);
        runner
            .run("sudo", &["mkdir", "-p", &base_dir])?
            .ensure_success("mkdir base directory")?;
    }

    info!("Setting permissions for base directory {}", base_dir);
    let ownership = format!("{}:{}", config.owner, config.owner);
    runner
        .run("sudo", &["chown", &ownership, &base_dir])?
        .ensure_success("chown base directory")?;

    if config.project_dir().exists() {
        warn!("Target directory {} already exists. Removing it.", target_dir);
        runner
            .run("sudo", &["rm", "-rf", &target_dir])?
            .ensure_success("remove existing checkout")?;
    } else {
        debug!("Target directory {} does not exist, proceeding with clone", target_dir);
    }

    info!("Cloning repository from {} to {}", config.repo_url, target_dir);
    runner
        .run("git", &["clone", &config.repo_url, &target_dir])?
        .ensure_success("git clone")?;

    info!("Repository cloned successfully");
    Ok(())
}
