//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
    expose_debug: bool,
) -> Result<()> {
    println!("🚀 Starting Tally web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let mut config = tally_server::ServerConfig::from_env();
    config.expose_debug |= expose_debug;

    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} ({})",
            config.allowed_origins.join(", "),
            tally_server::ALLOWED_ORIGINS_ENV
        );
    }
    if config.expose_debug {
        println!("   🐞 Provider failure details exposed in analysis replies");
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    tally_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
