//! Apache reverse proxy configuration.
//!
//! Installs Apache, replaces the stock site with a rendered virtual host
//! that proxies the public domain to the local gunicorn port, enables the
//! proxy modules, and brings both Apache and the application service back up.

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::runner::CommandRunner;
use std::fs;
use tracing::{info, warn};

/// Render the HTTP virtual host for the configured domain and port.
///
/// The layout (indentation, blank lines, trailing vim modeline) is fixed;
/// only the domain and port vary.
pub fn render_vhost(config: &ProvisionConfig) -> String {
    format!(
        "<VirtualHost *:80>\n\
         \x20       ServerName {domain}\n\
         \x20       ServerAlias www.{domain}\n\
         \n\
         \x20       ProxyPass / http://127.0.0.1:{port}/\n\
         \x20       ProxyPassReverse / http://127.0.0.1:{port}/\n\
         \n\
         </VirtualHost>\n\
         \n\
         # vim: syntax=apache ts=4 sw=4 sts=4 sr noet\n",
        domain = config.domain_name,
        port = config.app_port,
    )
}

pub fn run(config: &ProvisionConfig, runner: &dyn CommandRunner) -> Result<()> {
    info!("Installing Apache2 server");
    runner
        .run("sudo", &["apt", "install", "-y", "apache2"])?
        .ensure_success("apt install apache2")?;

    info!("Stopping {} service temporarily", config.service_name);
    runner
        .run("sudo", &["systemctl", "stop", &config.service_name])?
        .ensure_success("systemctl stop")?;

    info!("Configuring Apache2 virtual host for {}", config.domain_name);
    let vhost_file = config.vhost_path().display().to_string();

    // The stock SSL site would shadow the certbot-managed one later.
    let default_ssl = config
        .apache_sites_dir
        .join("default-ssl.conf")
        .display()
        .to_string();
    runner
        .run("sudo", &["rm", "-f", &default_ssl])?
        .ensure_success("remove default SSL site")?;

    let default_site = config.apache_sites_dir.join("000-default.conf");
    if default_site.exists() {
        info!("Removing default Apache2 configuration");
        let default_site = default_site.display().to_string();
        runner
            .run("sudo", &["mv", &default_site, &vhost_file])?
            .ensure_success("rename default site")?;
    }

    let staged = config.staged_vhost_path();
    fs::write(&staged, render_vhost(config))?;
    let staged_str = staged.display().to_string();
    runner
        .run("sudo", &["cp", &staged_str, &vhost_file])?
        .ensure_success("install virtual host")?;

    info!("Enabling required Apache2 modules");
    runner
        .run("sudo", &["a2enmod", "proxy", "proxy_http"])?
        .ensure_success("a2enmod proxy proxy_http")?;

    info!("Disabling default site and enabling {} site", config.domain_name);
    let disable = runner.run("sudo", &["a2dissite", "000-default.conf"])?;
    if !disable.success {
        // Not fatal: the default site may already be gone.
        warn!("Default site 000-default.conf does not exist, continuing anyway");
    }

    let site_conf = format!("{}.conf", config.domain_name);
    runner
        .run("sudo", &["a2ensite", &site_conf])?
        .ensure_success("a2ensite")?;

    info!("Reloading Apache2 configuration");
    runner
        .run("sudo", &["systemctl", "reload", "apache2"])?
        .ensure_success("systemctl reload apache2")?;

    info!("Restarting {} service", config.service_name);
    runner
        .run("sudo", &["systemctl", "start", &config.service_name])?
        .ensure_success("systemctl start")?;

    info!("Apache2 reverse proxy setup complete");
    info!(
        "{} is now accessible at http://{}",
        config.project_name, config.domain_name
    );
    Ok(())
}
