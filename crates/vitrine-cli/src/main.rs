//! Vitrine CLI - Manage promotions against the admin API
//!
//! Thin front over vitrine-core's collection synchronizer: list, toggle, and
//! aggregate-metrics commands plus shell completions.

mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::completions::run_completions;
use crate::commands::list::run_list;
use crate::commands::metrics::run_metrics;
use crate::commands::toggle::run_toggle;
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

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vitrine=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.as_deref();
    let tenant = cli.tenant.as_deref();

    match cli.command {
        Commands::List {
            active,
            name,
            page,
            limit,
            json,
        } => {
            run_list(api_url, tenant, active, name.as_deref(), page, limit, json).await?;
        }
        Commands::Toggle { id, state } => run_toggle(api_url, tenant, &id, state).await?,
        Commands::Metrics { json } => run_metrics(api_url, tenant, json).await?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
