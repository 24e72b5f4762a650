//! Provisioning configuration.
//!
//! Every knob of the provisioning run lives in `ProvisionConfig`. Values come
//! from hard-coded fallbacks, overridden by environment variables
//! (`from_env`), or from a JSON file (`load_from_file`) that can be saved and
//! shared between hosts. Directory fields exist so tests can point the
//! provisioner at temporary directories instead of `/etc` and `/tmp`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default application repository, the last revision's hard-coded URL.
const DEFAULT_REPO_URL: &str = "https://github.com/pakin6509681182/cs333_FinalProject.git";

/// Configuration for a provisioning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Project name, also the checkout directory name under `base_dir`.
    pub project_name: String,
    /// Directory the project is cloned under.
    pub base_dir: PathBuf,
    /// Git URL of the application repository.
    pub repo_url: String,
    /// Public domain the site is served on.
    pub domain_name: String,
    /// Local port gunicorn binds and Apache proxies to.
    pub app_port: u16,
    /// systemd unit name (without the `.service` suffix).
    pub service_name: String,
    /// Account the service runs as.
    pub service_user: String,
    /// Group the service runs as.
    pub service_group: String,
    /// Account that owns the base directory after `chown`.
    pub owner: String,
    /// gunicorn worker count.
    pub workers: u8,
    /// Email certbot registers with.
    pub contact_email: String,
    /// Where rendered files are staged before being copied with sudo.
    pub staging_dir: PathBuf,
    /// systemd unit directory.
    pub systemd_unit_dir: PathBuf,
    /// Apache `sites-available` directory.
    pub apache_sites_dir: PathBuf,
    /// Log file the run appends to (in addition to stdout).
    pub log_file: PathBuf,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        let project_name = "tooltrack".to_string();
        let domain_name = "tooltrack.example.com".to_string();
        let service_user = "ubuntu".to_string();
        Self {
            service_name: sanitize_service_name(&project_name),
            contact_email: format!("admin@{}", domain_name),
            owner: service_user.clone(),
            project_name,
            base_dir: PathBuf::from("/srv"),
            repo_url: DEFAULT_REPO_URL.to_string(),
            domain_name,
            app_port: 8000,
            service_user: service_user.clone(),
            service_group: service_user,
            workers: 4,
            staging_dir: PathBuf::from("/tmp"),
            systemd_unit_dir: PathBuf::from("/etc/systemd/system"),
            apache_sites_dir: PathBuf::from("/etc/apache2/sites-available"),
            log_file: PathBuf::from("/var/log/siteup.log"),
        }
    }
}

impl ProvisionConfig {
    /// Build a configuration from environment variables with hard-coded
    /// fallbacks. This is the surface the provisioner exposes when no config
    /// file is given.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = env::var("PROJECT_NAME") {
            config.service_name = sanitize_service_name(&name);
            config.project_name = name;
        }
        if let Ok(dir) = env::var("PROJECT_BASE_DIR") {
            config.base_dir = PathBuf::from(dir);
        }
        if let Ok(url) = env::var("REPO_URL") {
            config.repo_url = url;
        }
        if let Ok(domain) = env::var("DOMAIN_NAME") {
            config.contact_email = format!("admin@{}", domain);
            config.domain_name = domain;
        }
        if let Ok(port) = env::var("APP_PORT") {
            config.app_port = port
                .parse()
                .with_context(|| format!("APP_PORT is not a valid port number: {:?}", port))?;
        }
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service_name = name;
        }
        if let Ok(user) = env::var("SERVICE_USER") {
            config.owner = user.clone();
            config.service_user = user.clone();
            config.service_group = user;
        }
        if let Ok(group) = env::var("SERVICE_GROUP") {
            config.service_group = group;
        }
        if let Ok(user) = env::var("USER") {
            config.owner = user;
        }
        if let Ok(workers) = env::var("APP_WORKERS") {
            config.workers = workers
                .parse()
                .with_context(|| format!("APP_WORKERS is not a valid count: {:?}", workers))?;
        }
        if let Ok(email) = env::var("CERTBOT_EMAIL") {
            config.contact_email = email;
        }
        if let Ok(path) = env::var("SITEUP_LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let project = self.project_name.trim();
        if project.is_empty() {
            anyhow::bail!("Project name must be specified");
        }
        if project.contains('/') || project.contains("..") {
            anyhow::bail!("Project name must not contain path separators: {:?}", project);
        }

        if self.repo_url.trim().is_empty() {
            anyhow::bail!("Repository URL must be specified");
        }

        let domain = self.domain_name.trim();
        if domain.is_empty() {
            anyhow::bail!("Domain name must be specified");
        }
        if !domain.contains('.')
            || !domain
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            anyhow::bail!("Domain name is not valid: {:?}", domain);
        }

        if self.app_port == 0 {
            anyhow::bail!("Application port must be non-zero");
        }

        if self.workers == 0 {
            anyhow::bail!("Worker count must be at least 1");
        }

        let service = self.service_name.trim();
        if service.is_empty() {
            anyhow::bail!("Service name must be specified");
        }
        if !service
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            anyhow::bail!("Service name is not valid: {:?}", service);
        }

        if !self.contact_email.contains('@') {
            anyhow::bail!("Contact email is not valid: {:?}", self.contact_email);
        }

        Ok(())
    }

    /// Checkout directory: `<base_dir>/<project_name>`.
    pub fn project_dir(&self) -> PathBuf {
        self.base_dir.join(&self.project_name)
    }

    /// Virtual environment directory inside the checkout.
    pub fn venv_dir(&self) -> PathBuf {
        self.project_dir().join("venv")
    }

    /// pip binary inside the virtual environment.
    pub fn venv_pip(&self) -> PathBuf {
        self.venv_dir().join("bin").join("pip")
    }

    /// gunicorn binary inside the virtual environment.
    pub fn gunicorn_bin(&self) -> PathBuf {
        self.venv_dir().join("bin").join("gunicorn")
    }

    /// Installed systemd unit path.
    pub fn unit_path(&self) -> PathBuf {
        self.systemd_unit_dir
            .join(format!("{}.service", self.service_name))
    }

    /// Staged systemd unit path (written before the sudo copy).
    pub fn staged_unit_path(&self) -> PathBuf {
        self.staging_dir
            .join(format!("{}.service", self.service_name))
    }

    /// Installed Apache virtual-host path.
    pub fn vhost_path(&self) -> PathBuf {
        self.apache_sites_dir
            .join(format!("{}.conf", self.domain_name))
    }

    /// Staged Apache virtual-host path.
    pub fn staged_vhost_path(&self) -> PathBuf {
        self.staging_dir.join(format!("{}.conf", self.domain_name))
    }

    /// Staged certbot expect-session script path.
    pub fn staged_certbot_script_path(&self) -> PathBuf {
        self.staging_dir.join("certbot_session.exp")
    }
}

/// Derive a systemd-safe service name from a project name: lowercase, with
/// anything outside `[a-z0-9_-]` collapsed to `-`.
pub fn sanitize_service_name(project_name: &str) -> String {
    let name: String = project_name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = name.trim_matches('-');
    if trimmed.is_empty() {
        "app".to_string()
    } else {
        trimmed.to_string()
    }
}
