//! User commands

use anyhow::{Context, Result};
use tally_core::db::Database;

pub fn cmd_users_add(db: &Database, username: &str, email: &str, password: &str) -> Result<()> {
    let user = db
        .create_user(username, email, password)
        .context("Failed to register user")?;

    println!("✅ Registered {} <{}> (id {})", user.username, user.email, user.id);
    Ok(())
}

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Register one with:");
        println!("  tally users add --username you --email you@example.com --password ...");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────");
    for user in users {
        println!(
            "   {:>4}  {:<20} {}",
            user.id,
            user.username,
            user.email
        );
    }

    Ok(())
}
