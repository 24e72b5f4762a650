use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strum::{Display, EnumString};

/// siteup - provisions a Python web application behind Apache
#[derive(Parser)]
#[command(name = "siteup")]
#[command(about = "Provisions a Python web application behind Apache with systemd and Let's Encrypt")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: log the commands that would be executed without
    /// running them. File renders still land in the staging directory so
    /// the preview is realistic.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full provisioning sequence
    Provision {
        /// Path to a JSON configuration file (default: environment variables)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop after the reverse proxy step, without obtaining certificates
        #[arg(long)]
        skip_tls: bool,
    },
    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        config: PathBuf,
    },
    /// Run a single provisioning step
    Step {
        /// Step name (prerequisites, repository, virtualenv, service, proxy, tls)
        name: String,

        /// Path to a JSON configuration file (default: environment variables)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print a rendered template to stdout
    Render {
        /// Template name (unit, vhost, certbot)
        template: String,

        /// Path to a JSON configuration file (default: environment variables)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Templates the `render` subcommand can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RenderTarget {
    /// systemd service unit
    Unit,
    /// Apache virtual host
    Vhost,
    /// certbot expect session
    Certbot,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_no_args() {
        // Running with no args should succeed (defaults to a full provision)
        let result = Cli::try_parse_from(["siteup"]);
        assert!(result.is_ok());
        let cli = result.unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_provision_with_config() {
        let result = Cli::try_parse_from([
            "siteup",
            "provision",
            "--config",
            "/path/to/provision.json",
        ]);
        assert!(result.is_ok());
        let cli = result.unwrap();
        match cli.command {
            Some(Commands::Provision { config, skip_tls }) => {
                assert_eq!(config.unwrap().to_str().unwrap(), "/path/to/provision.json");
                assert!(!skip_tls);
            }
            _ => panic!("Expected Provision command"),
        }
    }

    #[test]
    fn test_cli_provision_skip_tls() {
        let result = Cli::try_parse_from(["siteup", "provision", "--skip-tls"]);
        assert!(result.is_ok());
        match result.unwrap().command {
            Some(Commands::Provision { skip_tls, .. }) => assert!(skip_tls),
            _ => panic!("Expected Provision command"),
        }
    }

    #[test]
    fn test_cli_validate_command() {
        let result = Cli::try_parse_from(["siteup", "validate", "/path/to/provision.json"]);
        assert!(result.is_ok());
        match result.unwrap().command {
            Some(Commands::Validate { config }) => {
                assert_eq!(config.to_str().unwrap(), "/path/to/provision.json");
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_step_command() {
        let result = Cli::try_parse_from(["siteup", "step", "proxy"]);
        assert!(result.is_ok());
        match result.unwrap().command {
            Some(Commands::Step { name, .. }) => assert_eq!(name, "proxy"),
            _ => panic!("Expected Step command"),
        }
    }

    #[test]
    fn test_cli_global_dry_run() {
        let result = Cli::try_parse_from(["siteup", "step", "service", "--dry-run"]);
        assert!(result.is_ok());
        assert!(result.unwrap().dry_run);
    }

    #[test]
    fn test_render_target_parsing() {
        assert_eq!("unit".parse::<RenderTarget>().unwrap(), RenderTarget::Unit);
        assert_eq!("vhost".parse::<RenderTarget>().unwrap(), RenderTarget::Vhost);
        assert_eq!(
            "certbot".parse::<RenderTarget>().unwrap(),
            RenderTarget::Certbot
        );
        assert!("bogus".parse::<RenderTarget>().is_err());
    }
}
