mod catalog;
mod cli;
mod commands;
mod config;
mod error;
mod git;
mod session;
mod tui;

#[cfg(test)]
mod test_utils;

use clap::Parser;
use cli::{Cli, Commands};
use commands::product::ProductFields;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tui::notify;

/// Logs go to stderr so `list --json` stays pipeable
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match config::resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            notify::error(format!("{e:#}"));
            std::process::exit(1);
        }
    };
    tracing::debug!(checkout = %config.checkout_path().display(), "config resolved");

    let command = cli.command.unwrap_or(Commands::Browse { url: None });
    let result = match command {
        Commands::Browse { url } => commands::browse::handle_browse(&config, url).await,
        Commands::Clone { url } => commands::clone::handle_clone(&config, url).await,
        Commands::Branches {} => commands::branch::handle_branches(&config),
        Commands::Switch { name } => commands::branch::handle_switch(&config, name),
        Commands::NewBranch { name } => commands::branch::handle_new_branch(&config, name),
        Commands::List { json } => commands::product::handle_list(&config, json),
        Commands::Add {
            id,
            name,
            description,
            status,
        } => commands::product::handle_add(
            &config,
            ProductFields {
                id,
                name,
                description,
                status,
            },
        ),
        Commands::Edit {
            file,
            name,
            description,
            status,
        } => commands::product::handle_edit(
            &config,
            &file,
            ProductFields {
                id: None,
                name,
                description,
                status,
            },
        ),
        Commands::Delete { file, yes } => commands::product::handle_delete(&config, &file, yes),
        Commands::Merge { yes } => commands::merge::handle_merge(&config, yes),
        Commands::Log { limit } => commands::log::handle_log(&config, limit),
        Commands::Export { path } => commands::product::handle_export(&config, &path),
    };

    if let Err(e) = result {
        notify::error(e);
        std::process::exit(1);
    }
}
