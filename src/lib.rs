//! siteup library
//!
//! Core functionality for the siteup provisioning CLI: configuration,
//! the command-execution seam, the six provisioning steps, and the
//! orchestrator that runs them in order.

pub mod cli;
pub mod config;
pub mod error;
pub mod provisioner;
pub mod runner;
pub mod sanity;
pub mod steps;

// Re-export main types for convenience
pub use cli::{Cli, Commands, RenderTarget};
pub use config::{sanitize_service_name, ProvisionConfig};
pub use error::SiteupError;
pub use provisioner::Provisioner;
pub use runner::{
    disable_dry_run, enable_dry_run, is_dry_run, CommandOutput, CommandRunner, SystemRunner,
};
pub use steps::{run_step, Step};
