//! Background service registration.
//!
//! Renders the systemd unit for the gunicorn process, installs it, and
//! starts and enables the service. The unit is staged in the staging
//! directory first and copied into place with sudo, the same write pattern
//! every privileged file install in this crate uses.

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::runner::CommandRunner;
use std::fs;
use tracing::info;

/// Render the systemd unit file for the configured application.
///
/// The output is the fixed five-field template with configured values
/// substituted; nothing else may vary between runs.
pub fn render_unit(config: &ProvisionConfig) -> String {
    format!(
        "[Unit]\n\
         Description={name} web application\n\
         \n\
         [Service]\n\
         ExecStart={gunicorn} app:app -w {workers} -b 127.0.0.1:{port}\n\
         WorkingDirectory={workdir}\n\
         Restart=on-failure\n\
         User={user}\n\
         Group={group}\n\
         \n\
         [Install]\n\
         WantedBy=multi-user.target\n",
        name = config.service_name,
        gunicorn = config.gunicorn_bin().display(),
        workers = config.workers,
        port = config.app_port,
        workdir = config.project_dir().display(),
        user = config.service_user,
        group = config.service_group,
    )
}

pub fn run(config: &ProvisionConfig, runner: &dyn CommandRunner) -> Result<()> {
    let staged = config.staged_unit_path();
    let installed = config.unit_path();

    info!("Creating systemd service file for {}", config.service_name);
    fs::write(&staged, render_unit(config))?;

    let staged_str = staged.display().to_string();
    let installed_str = installed.display().to_string();
    runner
        .run("sudo", &["cp", &staged_str, &installed_str])?
        .ensure_success("install systemd unit")?;

    info!("Reloading systemd daemon");
    runner
        .run("sudo", &["systemctl", "daemon-reload"])?
        .ensure_success("systemctl daemon-reload")?;

    info!("Starting {} service", config.service_name);
    runner
        .run("sudo", &["systemctl", "start", &config.service_name])?
        .ensure_success("systemctl start")?;

    info!("Enabling {} service to start on boot", config.service_name);
    runner
        .run("sudo", &["systemctl", "enable", &config.service_name])?
        .ensure_success("systemctl enable")?;

    info!("{} service successfully set up and started", config.service_name);
    info!(
        "Service status: sudo systemctl status {}",
        config.service_name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_unit_is_byte_exact() {
        let config = ProvisionConfig::default();
        let expected = "\
[Unit]
Description=tooltrack web application

[Service]
ExecStart=/srv/tooltrack/venv/bin/gunicorn app:app -w 4 -b 127.0.0.1:8000
WorkingDirectory=/srv/tooltrack
Restart=on-failure
User=ubuntu
Group=ubuntu

[Install]
WantedBy=multi-user.target
";
        assert_eq!(render_unit(&config), expected);
    }

    #[test]
    fn test_render_unit_substitutes_port_and_workers() {
        let mut config = ProvisionConfig::default();
        config.app_port = 9000;
        config.workers = 2;
        let unit = render_unit(&config);
        assert!(unit.contains("-w 2 -b 127.0.0.1:9000"));
        assert!(unit.contains("Restart=on-failure"));
        assert!(unit.contains("WantedBy=multi-user.target"));
    }
}
