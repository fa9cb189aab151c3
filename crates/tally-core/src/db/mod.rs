//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `users` - Accounts, password verification and bearer sessions
//! - `expenses` - Expense CRUD and the record view used by analysis

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::{Error, Result};

mod expenses;
mod users;

pub use users::SESSION_TTL_DAYS;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for database encryption key
pub const DB_KEY_ENV: &str = "TALLY_DB_KEY";

/// Derive an encryption key from a passphrase using Argon2
///
/// Uses a fixed application salt so the same passphrase always produces the same key,
/// regardless of database path.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this invalidates every existing encrypted database
    const APP_SALT: &[u8; 16] = b"tally-salt-v1-fx";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let output = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(output.as_bytes()))
}

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    db_path: String,
}

impl Database {
    /// Open an encrypted database
    ///
    /// Requires `TALLY_DB_KEY`; the SQLCipher key is derived from it with
    /// Argon2. Use `new_unencrypted()` for development databases.
    pub fn new(path: &str) -> Result<Self> {
        match std::env::var(DB_KEY_ENV).ok() {
            Some(key) => Self::new_with_key(path, Some(&key)),
            None => Err(Error::Encryption(format!(
                "Database encryption required. Set {} environment variable with your passphrase, \
                or use --no-encrypt for unencrypted databases (not recommended for production).",
                DB_KEY_ENV
            ))),
        }
    }

    /// Open an unencrypted database (development and tests only)
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Open a database with an explicit passphrase
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);

        let pool = if let Some(pass) = passphrase {
            let key = derive_key(pass)?;
            let key_pragma = format!("PRAGMA key = 'x\"{}\"';", key);

            // The key must be set on every new pooled connection
            let manager = manager.with_init(move |conn| {
                conn.execute_batch(&key_pragma)?;
                Ok(())
            });

            Pool::builder().max_size(10).build(manager)?
        } else {
            Pool::builder().max_size(10).build(manager)?
        };

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        info!(path = %path, encrypted = passphrase.is_some(), "Database opened");
        Ok(db)
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` because every pooled
    /// connection would otherwise see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!("tally_test_{}_{}.db", std::process::id(), id));
        let path = path.to_string_lossy().to_string();

        let _ = std::fs::remove_file(&path);

        Self::new_unencrypted(&path)
    }

    /// Path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA cache_size = 2000;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Bearer sessions; only a SHA-256 of the token is stored
            CREATE TABLE IF NOT EXISTS sessions (
                token_hash TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                expires_at DATETIME NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);

            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                category TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                date DATE NOT NULL,
                description TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_user ON expenses(user_id);
            CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
            CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category);
            "#,
        )?;

        Ok(())
    }
}
