//! siteup - Main entry point
//!
//! A command-line provisioner that deploys a Python web application behind
//! Apache, registers it as a systemd service, and obtains TLS certificates.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use siteup::cli::{Cli, Commands, RenderTarget};
use siteup::config::ProvisionConfig;
use siteup::provisioner::Provisioner;
use siteup::runner::{self, SystemRunner};
use siteup::steps::{self, Step};
use siteup::{sanity, steps::run_step};

/// Initialize logging to stdout, and additionally to `log_file` when given.
///
/// Falls back to stdout-only with a warning when the log file cannot be
/// opened (e.g. running unprivileged against /var/log).
fn init_logging(log_file: Option<&Path>) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("siteup=info"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact();

    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                // Subscriber is not up yet, so this goes straight to stderr.
                eprintln!(
                    "warning: could not open log file {}: {}; logging to stdout only",
                    path.display(),
                    e
                );
                None
            }
        }
    });

    match file {
        Some(file) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(file_layer)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .init();
        }
    }
}

/// Resolve the configuration: JSON file when given, environment otherwise.
fn load_config(path: Option<&PathBuf>) -> Result<ProvisionConfig> {
    let config = match path {
        Some(path) => ProvisionConfig::load_from_file(path)?,
        None => ProvisionConfig::from_env()?,
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    if cli.dry_run {
        runner::enable_dry_run();
    }

    match cli.command {
        Some(Commands::Validate { config }) => {
            init_logging(None);
            info!("Validating configuration file: {:?}", config);
            match ProvisionConfig::load_from_file(&config) {
                Ok(loaded) => match loaded.validate() {
                    Ok(()) => {
                        info!("Configuration validation successful");
                        println!("✓ Configuration file is valid: {:?}", config);
                    }
                    Err(e) => {
                        error!("Configuration validation failed: {}", e);
                        eprintln!("✗ Configuration validation failed: {}", e);
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    error!("Failed to load configuration file: {}", e);
                    eprintln!("✗ Failed to load configuration file: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Render { template, config }) => {
            init_logging(None);
            let target: RenderTarget = template.parse().unwrap_or_else(|_| {
                eprintln!("✗ Unknown template: {}", template);
                eprintln!("  Valid templates: unit, vhost, certbot");
                std::process::exit(1);
            });
            let config = load_config(config.as_ref())?;
            let rendered = match target {
                RenderTarget::Unit => steps::service::render_unit(&config),
                RenderTarget::Vhost => steps::proxy::render_vhost(&config),
                RenderTarget::Certbot => steps::tls::render_certbot_session(&config),
            };
            print!("{}", rendered);
        }
        Some(Commands::Step { name, config }) => {
            let step: Step = name.parse().unwrap_or_else(|_| {
                eprintln!("✗ Unknown step: {}", name);
                eprintln!("  Valid steps: prerequisites, repository, virtualenv, service, proxy, tls");
                std::process::exit(1);
            });
            let config = load_config(config.as_ref())?;
            init_logging(Some(&config.log_file));
            if !runner::is_dry_run() {
                sanity::run_preflight_checks();
            }

            let runner = SystemRunner::new();
            match run_step(step, &config, &runner) {
                Ok(()) => println!("✓ Step {} completed successfully", step),
                Err(e) => {
                    error!("Step {} failed: {}", step, e);
                    eprintln!("✗ Step {} failed: {}", step, e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Provision { config, skip_tls }) => {
            run_provision(config.as_ref(), skip_tls)?;
        }
        None => {
            // No subcommand: full provision from environment variables.
            run_provision(None, false)?;
        }
    }

    Ok(())
}

/// Run the full provisioning sequence and exit non-zero on the first failure.
fn run_provision(config_path: Option<&PathBuf>, skip_tls: bool) -> Result<()> {
    let config = load_config(config_path)?;
    init_logging(Some(&config.log_file));

    if runner::is_dry_run() {
        warn!("Dry-run mode: no commands will be executed");
    } else {
        sanity::run_preflight_checks();
    }

    let runner = SystemRunner::new();
    let provisioner = Provisioner::new(&config, &runner, skip_tls);

    match provisioner.run() {
        Ok(()) => {
            println!("✓ Provisioning completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Provisioning failed: {}", e);
            eprintln!("✗ Provisioning failed: {}", e);
            std::process::exit(1);
        }
    }
}
