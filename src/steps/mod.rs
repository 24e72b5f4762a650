//! Provisioning steps.
//!
//! One module per step. Each step is a straight-line sequence of external
//! commands (run through the `CommandRunner` seam) plus the occasional staged
//! file render; any command failure aborts the step, and the provisioner
//! aborts the run.

pub mod prerequisites;
pub mod proxy;
pub mod repository;
pub mod service;
pub mod tls;
pub mod virtualenv;

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::runner::CommandRunner;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The six provisioning steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Step {
    /// Update package lists and install python3-venv / python3-pip.
    Prerequisites,
    /// Prepare the base directory and clone the application repository.
    Repository,
    /// Create the virtual environment and install requirements.
    Virtualenv,
    /// Install, start, and enable the systemd unit.
    Service,
    /// Install Apache and configure it as a reverse proxy.
    Proxy,
    /// Obtain TLS certificates with certbot.
    Tls,
}

impl Step {
    /// All steps in the fixed documented order.
    pub fn ordered() -> Vec<Step> {
        Step::iter().collect()
    }
}

/// Run a single step against the given runner.
pub fn run_step(
    step: Step,
    config: &ProvisionConfig,
    runner: &dyn CommandRunner,
) -> Result<()> {
    match step {
        Step::Prerequisites => prerequisites::run(config, runner),
        Step::Repository => repository::run(config, runner),
        Step::Virtualenv => virtualenv::run(config, runner),
        Step::Service => service::run(config, runner),
        Step::Proxy => proxy::run(config, runner),
        Step::Tls => tls::run(config, runner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order_is_fixed() {
        assert_eq!(
            Step::ordered(),
            vec![
                Step::Prerequisites,
                Step::Repository,
                Step::Virtualenv,
                Step::Service,
                Step::Proxy,
                Step::Tls,
            ]
        );
    }

    #[test]
    fn test_step_parsing() {
        assert_eq!("prerequisites".parse::<Step>().unwrap(), Step::Prerequisites);
        assert_eq!("proxy".parse::<Step>().unwrap(), Step::Proxy);
        assert_eq!("tls".parse::<Step>().unwrap(), Step::Tls);
        assert!("bogus".parse::<Step>().is_err());
    }

    #[test]
    fn test_step_display_is_lowercase() {
        assert_eq!(Step::Virtualenv.to_string(), "virtualenv");
        assert_eq!(Step::Service.to_string(), "service");
    }
}
