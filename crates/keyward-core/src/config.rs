//! Runtime configuration for Keyward.
//!
//! Configuration is read once per invocation from `config.yml` in the root
//! directory and is never mutated afterwards, so a single instance can be
//! shared by reference between resolvers.
//!
//! ```yaml
//! authority_url: "https://gitlab.example.com"
//! http_settings:
//!   read_timeout_seconds: 10
//! secret_file: ".gitlab_shell_secret"
//! log_level: "info"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default configuration file name inside the root directory.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Complete Keyward configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywardConfig {
    /// Installation root. Forced commands point at `<root_dir>/bin/gitlab-shell`.
    /// Not read from YAML; set by the loader.
    #[serde(skip)]
    pub root_dir: PathBuf,

    /// Base URL of the remote authority.
    #[serde(alias = "gitlab_url")]
    pub authority_url: String,

    /// HTTP client settings.
    #[serde(default)]
    pub http_settings: HttpSettings,

    /// File holding the shared secret sent to the authority.
    #[serde(default = "default_secret_file")]
    pub secret_file: PathBuf,

    /// Log file. Logs go to stderr when unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Default log filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// HTTP client settings for talking to the authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Upper bound on one authority round trip.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_seconds: u64,

    /// Basic auth user.
    #[serde(default)]
    pub user: Option<String>,

    /// Basic auth password.
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            read_timeout_seconds: default_read_timeout(),
            user: None,
            password: None,
        }
    }
}

fn default_read_timeout() -> u64 {
    300
}

fn default_secret_file() -> PathBuf {
    PathBuf::from(".gitlab_shell_secret")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl KeywardConfig {
    /// Build a configuration in code with defaults for everything else.
    pub fn new(root_dir: impl Into<PathBuf>, authority_url: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            authority_url: authority_url.into(),
            http_settings: HttpSettings::default(),
            secret_file: default_secret_file(),
            log_file: None,
            log_level: default_log_level(),
        }
    }

    /// Load `<root_dir>/config.yml`.
    pub fn load(root_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root_dir = root_dir.as_ref();
        Self::from_file(root_dir, root_dir.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from an explicit file, anchored at `root_dir`.
    pub fn from_file(
        root_dir: impl AsRef<Path>,
        path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(root_dir, &content)
    }

    /// Parse and validate configuration from YAML content.
    pub fn from_yaml(root_dir: impl AsRef<Path>, content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.root_dir = root_dir.as_ref().to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Check that the authority URL is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.authority_url).map_err(|e| {
            ConfigError::Config(format!("invalid authority_url {:?}: {e}", self.authority_url))
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::Config(format!(
                    "unsupported authority_url scheme: {other}"
                )));
            }
        }

        if self.http_settings.read_timeout_seconds == 0 {
            return Err(ConfigError::Config(
                "http_settings.read_timeout_seconds must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Path of the forced-command binary embedded in every authorized entry.
    pub fn shell_path(&self) -> PathBuf {
        self.root_dir.join("bin").join("gitlab-shell")
    }

    /// Deadline applied to a single authority round trip.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.http_settings.read_timeout_seconds)
    }

    /// Absolute path of the shared secret file.
    pub fn secret_path(&self) -> PathBuf {
        self.resolve(&self.secret_file)
    }

    /// Absolute path of the log file, if any.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(|p| self.resolve(p))
    }

    /// Read the shared secret. A missing file yields `None`.
    pub fn resolve_secret(&self) -> Result<Option<String>, ConfigError> {
        let secret = match fs::read_to_string(self.secret_path()) {
            Ok(secret) => secret,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let secret = secret.trim();
        if secret.is_empty() {
            return Ok(None);
        }
        Ok(Some(secret.to_string()))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }
}
