//! Shared test fixtures: a recording command runner and a config rooted in
//! a temporary directory.

use siteup::config::ProvisionConfig;
use siteup::error::Result;
use siteup::runner::{CommandOutput, CommandRunner};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// A `CommandRunner` that records every invocation instead of executing it.
///
/// Optionally fails the first command whose rendered command line starts
/// with a given prefix, to exercise abort-on-failure behavior.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner that reports failure for commands starting with `prefix`.
    pub fn failing_on(prefix: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(prefix.to_string()),
        }
    }

    /// Rendered command lines, in invocation order.
    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let rendered = if args.is_empty() {
            program.to_string()
        } else {
            format!("{} {}", program, args.join(" "))
        };
        self.calls.lock().unwrap().push(rendered.clone());

        if let Some(prefix) = &self.fail_on {
            if rendered.starts_with(prefix.as_str()) {
                return Ok(CommandOutput {
                    stdout: String::new(),
                    stderr: format!("injected failure for `{}`", rendered),
                    exit_code: Some(1),
                    success: false,
                    dry_run: false,
                });
            }
        }

        Ok(CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(0),
            success: true,
            dry_run: false,
        })
    }
}

/// A config whose directories all live under `root`, so steps never touch
/// the real /srv, /tmp, or /etc.
pub fn test_config(root: &Path) -> ProvisionConfig {
    let mut config = ProvisionConfig::default();
    config.project_name = "shopapp".to_string();
    config.service_name = "shopapp".to_string();
    config.repo_url = "https://example.com/shopapp.git".to_string();
    config.domain_name = "shop.example.com".to_string();
    config.app_port = 9000;
    config.base_dir = root.join("srv");
    config.staging_dir = root.join("staging");
    config.systemd_unit_dir = root.join("systemd");
    config.apache_sites_dir = root.join("sites-available");
    config.log_file = root.join("siteup.log");

    fs::create_dir_all(&config.base_dir).unwrap();
    fs::create_dir_all(&config.staging_dir).unwrap();
    fs::create_dir_all(&config.systemd_unit_dir).unwrap();
    fs::create_dir_all(&config.apache_sites_dir).unwrap();

    config
}
