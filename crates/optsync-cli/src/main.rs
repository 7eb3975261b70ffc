//! Optsync CLI - edit server option panels from the terminal
//!
//! Every panel is loaded, edited locally and saved as a per-key diff.

mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::Parser;
use optsync_core::PanelKind;

use crate::cli::{Cli, Commands};
use crate::commands::common::{resolve_client_config, ConnectionOverrides};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::keys::run_keys;
use crate::commands::model_ratio::run_model_ratio;
use crate::commands::quota_reset::run_quota_reset;
use crate::commands::set::{run_set, SetOptions};
use crate::commands::show::run_show;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        "optsync=info"
            .parse()
            .map_err(|error| CliError::Config(format!("Invalid log directive: {error}")))?,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let flags = ConnectionOverrides {
        base_url: cli.base_url,
        access_token: cli.access_token,
        timeout_secs: cli.timeout,
    };
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Show {
            panel,
            reveal,
            json,
        } => {
            let config = resolve_client_config(flags, profile)?;
            run_show(PanelKind::from(panel), reveal, json, config).await?;
        }
        Commands::Set {
            panel,
            assignments,
            dry_run,
            toggles_first,
            whole_diff,
            retries,
            json,
        } => {
            let config = resolve_client_config(flags, profile)?;
            let options = SetOptions {
                dry_run,
                toggles_first,
                whole_diff,
                retries,
                json,
            };
            run_set(PanelKind::from(panel), &assignments, options, config).await?;
        }
        Commands::Keys { panel, json } => run_keys(panel.map(PanelKind::from), json)?,
        Commands::ModelRatio { command } => {
            let config = resolve_client_config(flags, profile)?;
            run_model_ratio(command, config).await?;
        }
        Commands::QuotaReset { command } => {
            let config = resolve_client_config(flags, profile)?;
            run_quota_reset(command, config).await?;
        }
        Commands::Config { command } => run_config(command, profile)?,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
    }

    Ok(())
}
