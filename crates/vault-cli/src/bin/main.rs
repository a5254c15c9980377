//! PW Vault CLI
//!
//! Generates passwords from encoded or ad-hoc policies and manages the
//! default and named policies kept in settings.json.

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::OsRng;
use tracing::debug;

use vault_cli::{commands, Cli, Command};
use vault_core::SettingsManager;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so generated passwords stay alone on stdout
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => SettingsManager::default_dir()?,
    };
    debug!("Using config directory {:?}", config_dir);
    let mut settings = SettingsManager::new(&config_dir);

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Command::Generate(args) => commands::generate(args, &settings, &mut OsRng, &mut stdout)?,
        Command::Policy(command) => {
            commands::policy_command(command, &mut settings, &mut stdout).await?
        }
        Command::Check => {
            let password =
                rpassword::prompt_password("Passphrase: ").context("Failed to read passphrase")?;
            commands::check(&password, &mut stdout)?;
        }
    }

    Ok(())
}
