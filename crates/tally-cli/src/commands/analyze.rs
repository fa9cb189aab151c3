//! Spending analysis and dashboard commands

use anyhow::Result;
use tally_core::ai::AIBackend;
use tally_core::analysis::{format_currency, AggregateSnapshot, DashboardStats};
use tally_core::db::Database;
use tally_core::models::AnalysisMode;
use tally_core::ExpenseAnalyst;

use super::{resolve_user, truncate};

pub async fn cmd_analyze(db: &Database, email: &str, advice: bool, offline: bool) -> Result<()> {
    let analyst = if offline {
        ExpenseAnalyst::offline()
    } else {
        ExpenseAnalyst::from_env()
    };
    run_analysis(db, email, advice, &analyst).await
}

/// Print one analysis for `email` using the given analyst
pub async fn run_analysis(
    db: &Database,
    email: &str,
    advice: bool,
    analyst: &ExpenseAnalyst,
) -> Result<()> {
    let user = resolve_user(db, email)?;
    let records = db.expense_records(user.id)?;
    let today = chrono::Local::now().date_naive();
    let mode = if advice {
        AnalysisMode::Advice
    } else {
        AnalysisMode::Analysis
    };

    match analyst.ai() {
        Some(client) => println!("🤖 Asking {} for {}...", client.model(), mode),
        None => println!("📐 Rule-based {}", mode),
    }
    println!();

    let reply = analyst.analyze(&records, mode, today).await;
    println!("{}", reply.response);

    if let Some(reason) = reply.debug {
        tracing::warn!(reason = %reason, "External model failed, showing rule-based analysis");
        println!();
        println!("   ⚠️  External model unavailable ({}); showing rule-based analysis", reason);
    }

    Ok(())
}

pub fn cmd_dashboard(db: &Database, email: &str) -> Result<()> {
    let user = resolve_user(db, email)?;
    let records = db.expense_records(user.id)?;
    let today = chrono::Local::now().date_naive();

    let stats = AggregateSnapshot::from_records(&records, today)
        .map(|snapshot| DashboardStats::from_snapshot(&snapshot))
        .unwrap_or_else(DashboardStats::empty);

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           💰 Tally Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Total spent:       {}", format_currency(stats.total_amount, 2));
    println!("  Transactions:      {}", stats.transaction_count);
    println!("  Last 30 days:      {}", stats.recent_count);
    println!("  Categories:        {}", stats.category_count);

    if stats.category_count == 0 {
        println!();
        println!("  Record spending with: tally expenses add -u {} ...", user.email);
        return Ok(());
    }

    println!(
        "  Avg per category:  {}",
        format_currency(stats.average_per_category, 2)
    );
    if let Some(top) = &stats.highest_category {
        println!("  📈 Highest:        {} ({})", top.category, format_currency(top.amount, 2));
    }
    if let Some(low) = &stats.lowest_category {
        println!("  📉 Lowest:         {} ({})", low.category, format_currency(low.amount, 2));
    }
    println!();
    println!("  Category          Amount          Share   vs avg");
    println!("  ───────────────────────────────────────────────────");
    for row in &stats.categories {
        println!(
            "  {:<16} {:>14} {:>7.1}% {:>+7.1}%",
            truncate(&row.category, 16),
            format_currency(row.amount, 2),
            row.percentage,
            row.vs_average
        );
    }

    Ok(())
}
