//! qotd CLI - Command-line interface for the quote collection
//!
//! Show, capture, and sync quotes from the terminal with minimal friction.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands, SyncCommands};
use crate::commands::add::run_add;
use crate::commands::categories::run_categories;
use crate::commands::common::{resolve_db_path, resolve_remote_url};
use crate::commands::completions::run_completions;
use crate::commands::edit::run_edit;
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::show::run_show;
use crate::commands::sync::{run_sync, run_sync_conflicts, run_sync_watch};
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
                .add_directive("qotd=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    let remote_url = resolve_remote_url(cli.remote);

    match cli.command {
        Some(Commands::Show { category }) => {
            run_show(category.as_deref(), &db_path, &remote_url).await?;
        }
        Some(Commands::Add { text, category }) => {
            run_add(&text, category.as_deref(), &db_path, &remote_url).await?;
        }
        Some(Commands::Edit { id, text, category }) => {
            run_edit(&id, &text, category.as_deref(), &db_path, &remote_url).await?;
        }
        Some(Commands::List {
            category,
            all,
            limit,
            json,
        }) => {
            run_list(category.as_deref(), all, limit, json, &db_path, &remote_url).await?;
        }
        Some(Commands::Categories) => run_categories(&db_path, &remote_url).await?,
        Some(Commands::Import { file }) => run_import(&file, &db_path, &remote_url).await?,
        Some(Commands::Export { output }) => {
            run_export(output.as_deref(), &db_path, &remote_url).await?;
        }
        Some(Commands::Sync { command }) => match command {
            None => run_sync(&db_path, &remote_url).await?,
            Some(SyncCommands::Watch { interval }) => {
                run_sync_watch(interval, &db_path, &remote_url).await?;
            }
            Some(SyncCommands::Conflicts { limit, json }) => {
                run_sync_conflicts(limit, json, &db_path, &remote_url).await?;
            }
        },
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            // Quick add mode: qotd "a line worth keeping"
            if cli.quote.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                run_add(&cli.quote, None, &db_path, &remote_url).await?;
            }
        }
    }

    Ok(())
}
