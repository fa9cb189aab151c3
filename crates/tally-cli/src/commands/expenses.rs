//! Expense commands (add, list, delete)

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::analysis::format_currency;
use tally_core::db::Database;
use tally_core::models::NewExpense;

use super::{resolve_user, truncate};

/// Parse a YYYY-MM-DD date, defaulting to today
pub fn parse_expense_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}': expected YYYY-MM-DD", s)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub fn cmd_expenses_add(
    db: &Database,
    email: &str,
    category: &str,
    amount: f64,
    date: Option<&str>,
    description: Option<&str>,
) -> Result<()> {
    let user = resolve_user(db, email)?;
    let expense = NewExpense {
        category: category.to_string(),
        amount,
        date: parse_expense_date(date)?,
        description: description.map(str::to_string),
    };

    let id = db
        .insert_expense(user.id, &expense)
        .context("Failed to add expense")?;

    println!(
        "✅ Recorded {} in {} on {} (id {})",
        format_currency(expense.amount, 2),
        expense.category.trim(),
        expense.date,
        id
    );
    Ok(())
}

pub fn cmd_expenses_list(db: &Database, email: &str, limit: usize) -> Result<()> {
    let user = resolve_user(db, email)?;
    let expenses = db.list_expenses(user.id)?;

    if expenses.is_empty() {
        println!("No expenses recorded for {}.", user.email);
        return Ok(());
    }

    println!();
    println!("💸 Expenses for {} ({} total)", user.username, expenses.len());
    println!("   ─────────────────────────────────────────────────────────");
    for expense in expenses.iter().take(limit) {
        println!(
            "   {:>5}  {}  {:<14} {:>14}  {}",
            expense.id,
            expense.date,
            truncate(&expense.category, 14),
            format_currency(expense.amount, 2),
            truncate(expense.description.as_deref().unwrap_or(""), 30)
        );
    }
    if expenses.len() > limit {
        println!("   ... {} more (use --limit)", expenses.len() - limit);
    }

    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, email: &str, id: i64) -> Result<()> {
    let user = resolve_user(db, email)?;

    if db.delete_expense(user.id, id)? {
        println!("🗑️  Deleted expense {}", id);
        Ok(())
    } else {
        anyhow::bail!("Expense {} not found for {}", id, user.email)
    }
}
