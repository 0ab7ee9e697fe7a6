//! Traevo CLI - Personal finance backend with spending risk alerts
//!
//! Usage:
//!   traevo init                          Initialize database
//!   traevo users add -n NAME -e EMAIL    Register a user
//!   traevo assess --email EMAIL          Classify this month's spending risk
//!   traevo serve --port 3000             Start web server

mod cli;
mod commands;


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
        Commands::Serve { port, host } => {
            commands::cmd_serve(&cli.db, &host, port, cli.no_encrypt).await
        }
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add {
                    name,
                    email,
                    password,
                }) => commands::cmd_users_add(&db, &name, &email, &password),
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                TransactionsAction::List {
                    email,
                    from,
                    to,
                    limit,
                } => commands::cmd_transactions_list(
                    &db,
                    &email,
                    from.as_deref(),
                    to.as_deref(),
                    limit,
                ),
                TransactionsAction::Add {
                    email,
                    category,
                    amount,
                    description,
                    date,
                    kind,
                    recurrence,
                } => commands::cmd_transactions_add(
                    &db,
                    &email,
                    &commands::TransactionArgs {
                        category: &category,
                        amount: &amount,
                        description: &description,
                        date: date.as_deref(),
                        kind: &kind,
                        recurrence: &recurrence,
                    },
                ),
            }
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                BudgetAction::Show { email, month } => {
                    commands::cmd_budget_show(&db, &email, month.as_deref())
                }
                BudgetAction::Set {
                    email,
                    month,
                    limit,
                } => commands::cmd_budget_set(&db, &email, month.as_deref(), &limit),
            }
        }
        Commands::Assess {
            email,
            date,
            save,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_assess(&db, &email, date.as_deref(), save, json)
        }
    }
}
