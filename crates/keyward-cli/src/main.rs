use anyhow::Context;
use clap::{Parser, Subcommand};
use keyward_core::{AuthorizedKeysArgs, AuthorizedPrincipalsArgs, KeywardConfig};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "keyward", version, about = "Keyward sshd authorization helper")]
struct Cli {
    /// Installation root; forced commands point at <root-dir>/bin/gitlab-shell.
    #[arg(long, env = "KEYWARD_ROOT_DIR", default_value = "/opt/keyward", global = true)]
    root_dir: PathBuf,

    /// Configuration file (defaults to <root-dir>/config.yml).
    #[arg(long, env = "KEYWARD_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a presented public key (AuthorizedKeysCommand).
    AuthorizedKeysCheck {
        /// <expected-username> <actual-username> <key>
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Resolve certificate principals (AuthorizedPrincipalsCommand).
    AuthorizedPrincipalsCheck {
        /// <key-id> <principal1> [<principal2>...]
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Arc<KeywardConfig>> {
        let config = match &self.config {
            Some(path) => KeywardConfig::from_file(&self.root_dir, path),
            None => KeywardConfig::load(&self.root_dir),
        }
        .with_context(|| format!("failed to load configuration from {}", self.root_dir.display()))?;

        logging::init(&config)?;
        tracing::debug!(
            root_dir = %config.root_dir.display(),
            authority_url = %config.authority_url,
            "Configuration loaded"
        );
        Ok(Arc::new(config))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.cmd {
        Command::AuthorizedKeysCheck { args } => {
            let args = AuthorizedKeysArgs::parse(args)?;
            let config = cli.load_config()?;
            let mut out = io::stdout().lock();
            commands::authorized_keys::run(config, args, &mut out).await?;
        }
        Command::AuthorizedPrincipalsCheck { args } => {
            let args = AuthorizedPrincipalsArgs::parse(args)?;
            let config = cli.load_config()?;
            let mut out = io::stdout().lock();
            commands::authorized_principals::run(config, args, &mut out)?;
        }
    }

    Ok(())
}
