//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `resolve_user` - Look up the user a command acts for
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tally_core::db::Database;
use tally_core::models::User;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    tracing::debug!(path = %path_str, encrypted = !no_encrypt, "Opening database");
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Find a registered user by email
pub fn resolve_user(db: &Database, email: &str) -> Result<User> {
    db.get_user_by_email(email)?.ok_or_else(|| {
        anyhow!(
            "No user with email '{}'. Register one with: tally users add",
            email
        )
    })
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Register: tally users add --username you --email you@example.com --password ...");
    println!("  2. Record spending: tally expenses add -u you@example.com -c Food -a 250");
    println!("  3. Get analysis: tally analyze -u you@example.com");

    Ok(())
}
