//! Tracing setup.
//!
//! stdout belongs to `sshd`, so logs go to stderr or to the configured log file.

use anyhow::Context;
use keyward_core::KeywardConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub fn init(config: &KeywardConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("invalid log_level: {}", config.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);

    let result = match config.log_path() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    // The only test in this binary that installs the global subscriber.
    #[test]
    fn test_init_appends_to_log_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("keyward.log"), "previous run\n").unwrap();

        let mut config = KeywardConfig::new(dir.path(), "http://localhost");
        config.log_file = Some("keyward.log".into());
        config.log_level = "info".to_string();

        init(&config).unwrap();
        tracing::error!(marker = "logging-init-check", "Log file written");

        let written = fs::read_to_string(dir.path().join("keyward.log")).unwrap();
        assert!(written.starts_with("previous run\n"));
        assert!(written.contains("logging-init-check"));
    }

    #[test]
    fn test_unopenable_log_file() {
        let dir = tempdir().unwrap();
        let mut config = KeywardConfig::new(dir.path(), "http://localhost");
        config.log_file = Some("missing-dir/keyward.log".into());

        let err = init(&config).unwrap_err();
        assert!(err.to_string().contains("failed to open log file"));
    }
}
