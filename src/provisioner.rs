//! Provisioning orchestration.
//!
//! Runs the six steps in their fixed order against a single runner. The
//! first failing step aborts the whole run; there is no retry, rollback, or
//! partial-success continuation.

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::runner::CommandRunner;
use crate::steps::{run_step, Step};
use tracing::{error, info};

/// Drives a full provisioning run.
pub struct Provisioner<'a> {
    config: &'a ProvisionConfig,
    runner: &'a dyn CommandRunner,
    skip_tls: bool,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        config: &'a ProvisionConfig,
        runner: &'a dyn CommandRunner,
        skip_tls: bool,
    ) -> Self {
        Self {
            config,
            runner,
            skip_tls,
        }
    }

    /// Run every step in order, stopping at the first failure.
    pub fn run(&self) -> Result<()> {
        info!("{}", "=".repeat(60));
        info!(
            "Starting initialization process for {}",
            self.config.project_name
        );
        info!("{}", "=".repeat(60));

        for step in Step::ordered() {
            if step == Step::Tls && self.skip_tls {
                info!("Skipping TLS setup (--skip-tls)");
                continue;
            }

            info!("--- step: {} ---", step);
            run_step(step, self.config, self.runner).map_err(|e| {
                error!("Step {} failed: {}", step, e);
                e
            })?;
        }

        info!("Application setup completed successfully");
        let scheme = if self.skip_tls { "http" } else { "https" };
        info!(
            "{} is now running and accessible at {}://{}",
            self.config.project_name, scheme, self.config.domain_name
        );
        Ok(())
    }
}
