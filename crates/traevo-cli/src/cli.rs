//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Traevo - Know where your month is heading
#[derive(Parser)]
#[command(name = "traevo")]
#[command(about = "Self-hosted personal finance backend with spending risk alerts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "traevo.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TRAEVO_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    ///
    /// Requires TRAEVO_JWT_SECRET for signing bearer tokens.
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Show database status (encryption, size, etc.)
    Status,

    /// Manage users
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Record and list transactions
    Transactions {
        #[command(subcommand)]
        action: TransactionsAction,
    },

    /// Set or show a monthly budget
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Assess spending risk for the current month
    Assess {
        /// Email of the user to assess
        #[arg(short, long)]
        email: String,

        /// Assess as of this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Store the result as the user's latest prediction
        #[arg(long)]
        save: bool,

        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List registered users
    List,

    /// Register a new user
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address (used to log in)
        #[arg(short, long)]
        email: String,

        /// Password (6-50 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List a user's transactions with totals
    List {
        /// Email of the owner
        #[arg(short, long)]
        email: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Maximum rows to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record a transaction
    Add {
        /// Email of the owner
        #[arg(short, long)]
        email: String,

        /// Category name (e.g., Food)
        #[arg(short, long)]
        category: String,

        /// Amount (positive, at most 2 decimal places)
        #[arg(short, long)]
        amount: String,

        /// Description
        #[arg(short, long)]
        description: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Kind: income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,

        /// Recurrence: once, weekly or monthly
        #[arg(long, default_value = "once")]
        recurrence: String,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Show budget status for a month
    Show {
        /// Email of the owner
        #[arg(short, long)]
        email: String,

        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Create or change the budget for a month
    Set {
        /// Email of the owner
        #[arg(short, long)]
        email: String,

        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Monthly ceiling
        #[arg(short, long)]
        limit: String,
    },
}
