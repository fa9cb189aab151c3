//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track expenses and get plain-language spending analysis
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
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

    /// Manage users
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Manage expenses (add, list, delete)
    Expenses {
        #[command(subcommand)]
        action: ExpensesAction,
    },

    /// Analyze a user's spending
    Analyze {
        /// Email of the user to analyze
        #[arg(short, long)]
        user: String,

        /// Ask for money-saving advice instead of a general analysis
        #[arg(long)]
        advice: bool,

        /// Skip the external model and use the rule-based analysis only
        #[arg(long)]
        offline: bool,
    },

    /// Show dashboard summary for a user
    Dashboard {
        /// Email of the user
        #[arg(short, long)]
        user: String,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Include provider failure details in analysis replies (debugging only)
        #[arg(long)]
        expose_debug: bool,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List registered users
    List,

    /// Register a user
    Add {
        /// Display name (must be unique)
        #[arg(long)]
        username: String,

        /// Login email (must be unique)
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// Record an expense
    Add {
        /// Email of the owning user
        #[arg(short, long)]
        user: String,

        /// Category (e.g. Food, Travel, Shopping, Bills)
        #[arg(short, long)]
        category: String,

        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Optional note
        #[arg(long)]
        description: Option<String>,
    },

    /// List expenses, newest first
    List {
        /// Email of the owning user
        #[arg(short, long)]
        user: String,

        /// Maximum number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete an expense
    Delete {
        /// Email of the owning user
        #[arg(short, long)]
        user: String,

        /// Expense ID
        id: i64,
    },
}
