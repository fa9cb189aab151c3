//! Expense operations
//!
//! Every query is scoped to the owning user.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseRecord, NewExpense};

const EXPENSE_COLUMNS: &str = "id, user_id, category, amount, date, description, created_at";

impl Database {
    /// Record an expense for `user_id`, returning its ID
    pub fn insert_expense(&self, user_id: i64, expense: &NewExpense) -> Result<i64> {
        expense.validate().map_err(Error::InvalidData)?;

        let description = expense
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (user_id, category, amount, date, description)
             VALUES (?, ?, ?, ?, ?)",
            params![
                user_id,
                expense.category.trim(),
                expense.amount,
                expense.date.format("%Y-%m-%d").to_string(),
                description
            ],
        )?;
        let id = conn.last_insert_rowid();

        debug!(user_id, expense_id = id, category = %expense.category.trim(), "Expense recorded");
        Ok(id)
    }

    /// All expenses for a user, newest first
    pub fn list_expenses(&self, user_id: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE user_id = ?
             ORDER BY date DESC, created_at DESC, id DESC",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(params![user_id], Self::row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Get one expense if it belongs to `user_id`
    pub fn get_expense(&self, user_id: i64, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!(
                    "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
                    EXPENSE_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// Delete an expense owned by `user_id`; false if there was nothing to delete
    pub fn delete_expense(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// The aggregator's view of a user's expenses
    pub fn expense_records(&self, user_id: i64) -> Result<Vec<ExpenseRecord>> {
        Ok(self
            .list_expenses(user_id)?
            .iter()
            .map(Expense::to_record)
            .collect())
    }

    /// Column order: see `EXPENSE_COLUMNS`
    fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        let date_str: String = row.get(4)?;
        let created_at_str: String = row.get(6)?;
        Ok(Expense {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category: row.get(2)?,
            amount: row.get(3)?,
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
            description: row.get(5)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
