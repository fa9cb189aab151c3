//! User accounts and bearer sessions

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

/// How long a session token stays valid
pub const SESSION_TTL_DAYS: i64 = 30;

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| Error::Auth(format!("Failed to create salt: {}", e)))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Auth(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn token_hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// A UNIQUE violation means another registration won the race
pub(super) fn registration_error(err: rusqlite::Error) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::InvalidData("Username or email already registered".to_string())
        }
        other => Error::Database(other),
    }
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Register a user
    ///
    /// Username and email must both be unused.
    pub fn create_user(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(Error::InvalidData(
                "Username, email and password are required".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(Error::InvalidData(format!("Invalid email address: {}", email)));
        }

        let conn = self.conn()?;

        let taken: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ? OR username = ?",
                params![email, username],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_some() {
            return Err(Error::InvalidData(
                "Username or email already registered".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;
        conn.execute(
            "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)",
            params![username, email, password_hash],
        )
        .map_err(registration_error)?;
        let id = conn.last_insert_rowid();

        info!(user_id = id, "User registered");
        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, email, created_at FROM users WHERE id = ?",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by email
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, email, created_at FROM users WHERE email = ?",
                params![email.trim()],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// All users, oldest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, username, email, created_at FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Check an email/password pair
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the caller.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let found: Option<(User, String)> = conn
            .query_row(
                "SELECT id, username, email, created_at, password_hash FROM users WHERE email = ?",
                params![email.trim()],
                |row| Ok((row_to_user(row)?, row.get::<_, String>(4)?)),
            )
            .optional()?;

        match found {
            Some((user, stored)) if verify_password(password, &stored) => Ok(Some(user)),
            _ => {
                debug!("Login rejected");
                Ok(None)
            }
        }
    }

    /// Start a session and return its bearer token
    pub fn create_session(&self, user_id: i64) -> Result<String> {
        let token = Uuid::new_v4().simple().to_string();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (token_hash, user_id, expires_at)
             VALUES (?, ?, datetime('now', ?))",
            params![
                token_hash(&token),
                user_id,
                format!("+{} days", SESSION_TTL_DAYS)
            ],
        )?;
        Ok(token)
    }

    /// Resolve a bearer token to its user, if the session is live
    pub fn user_for_token(&self, token: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT u.id, u.username, u.email, u.created_at
                 FROM sessions s JOIN users u ON u.id = s.user_id
                 WHERE s.token_hash = ? AND s.expires_at > datetime('now')",
                params![token_hash(token)],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// End a session; returns whether it existed
    pub fn delete_session(&self, token: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?",
            params![token_hash(token)],
        )?;
        Ok(deleted > 0)
    }

    /// Drop sessions past their expiry
    pub fn purge_expired_sessions(&self) -> Result<usize> {
        let conn = self.conn()?;
        let purged = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= datetime('now')",
            [],
        )?;
        Ok(purged)
    }
}
