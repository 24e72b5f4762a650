//! TLS certificates via certbot.
//!
//! Installs certbot from snap and drives its interactive Apache flow through
//! a generated expect session, answering the registration prompts with the
//! configured contact email.

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::runner::CommandRunner;
use std::fs;
use tracing::info;

/// Render the expect session that answers certbot's interactive prompts.
///
/// Accepts the Terms of Service, declines email sharing, and takes the
/// default site selection. The five-minute timeout covers the ACME
/// challenge round-trip.
pub fn render_certbot_session(config: &ProvisionConfig) -> String {
    format!(
        "#!/usr/bin/expect\n\
         set timeout 300\n\
         spawn sudo certbot --apache\n\
         expect \"Enter email address\"\n\
         send \"{email}\\r\"\n\
         expect \"the Terms of Service\"\n\
         send \"Y\\r\"\n\
         expect \"share your email\"\n\
         send \"N\\r\"\n\
         expect \"Select the appropriate number\"\n\
         send \"\\r\"\n\
         expect eof\n",
        email = config.contact_email,
    )
}

pub fn run(config: &ProvisionConfig, runner: &dyn CommandRunner) -> Result<()> {
    info!("Installing Certbot via snap");
    runner
        .run("sudo", &["snap", "install", "--classic", "certbot"])?
        .ensure_success("snap install certbot")?;

    info!("Creating symlink for certbot");
    runner
        .run("sudo", &["ln", "-sf", "/snap/bin/certbot", "/usr/bin/certbot"])?
        .ensure_success("symlink certbot")?;

    info!("Obtaining SSL certificates with Certbot");
    let script = config.staged_certbot_script_path();
    fs::write(&script, render_certbot_session(config))?;

    let script_str = script.display().to_string();
    runner
        .run("chmod", &["+x", &script_str])?
        .ensure_success("chmod certbot session script")?;

    runner
        .run("sudo", &["apt", "install", "-y", "expect"])?
        .ensure_success("apt install expect")?;

    info!("Running Certbot to obtain SSL certificates");
    runner
        .run(&script_str, &[])?
        .ensure_success("certbot session")?;

    info!("SSL certificates successfully obtained and configured");
    info!(
        "Website is now accessible via HTTPS: https://{}",
        config.domain_name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_certbot_session() {
        let mut config = ProvisionConfig::default();
        config.contact_email = "ops@example.com".to_string();
        let session = render_certbot_session(&config);

        assert!(session.starts_with("#!/usr/bin/expect\n"));
        assert!(session.contains("spawn sudo certbot --apache"));
        assert!(session.contains("send \"ops@example.com\\r\""));
        assert!(session.contains("send \"Y\\r\""));
        assert!(session.contains("send \"N\\r\""));
        assert!(session.ends_with("expect eof\n"));
    }

    #[test]
    fn test_render_certbot_session_timeout() {
        let config = ProvisionConfig::default();
        assert!(render_certbot_session(&config).contains("set timeout 300"));
    }
}
