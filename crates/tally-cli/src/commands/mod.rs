//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, resolve_user)
//! - `users` - User registration and listing
//! - `expenses` - Expense commands (add, list, delete)
//! - `analyze` - Spending analysis and dashboard
//! - `serve` - Web server command

pub mod analyze;
pub mod core;
pub mod expenses;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use analyze::*;
pub use core::*;
pub use expenses::*;
pub use serve::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
