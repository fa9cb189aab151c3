//! Tally CLI - Personal expense tracker
//!
//! Usage:
//!   tally init                                   Initialize database
//!   tally users add --username U --email E ...   Register a user
//!   tally expenses add -u E -c Food -a 250       Record an expense
//!   tally analyze -u E [--advice] [--offline]    Spending analysis
//!   tally serve --port 3000                      Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add {
                    username,
                    email,
                    password,
                }) => commands::cmd_users_add(&db, &username, &email, &password),
            }
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                ExpensesAction::Add {
                    user,
                    category,
                    amount,
                    date,
                    description,
                } => commands::cmd_expenses_add(
                    &db,
                    &user,
                    &category,
                    amount,
                    date.as_deref(),
                    description.as_deref(),
                ),
                ExpensesAction::List { user, limit } => {
                    commands::cmd_expenses_list(&db, &user, limit)
                }
                ExpensesAction::Delete { user, id } => {
                    commands::cmd_expenses_delete(&db, &user, id)
                }
            }
        }
        Commands::Analyze {
            user,
            advice,
            offline,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_analyze(&db, &user, advice, offline).await
        }
        Commands::Dashboard { user } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_dashboard(&db, &user)
        }
        Commands::Serve {
            port,
            host,
            static_dir,
            expose_debug,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                static_dir.as_deref(),
                expose_debug,
            )
            .await
        }
    }
}
