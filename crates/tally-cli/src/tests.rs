//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use clap::Parser;
use tally_core::db::Database;
use tally_core::{AIClient, ExpenseAnalyst, MockBackend};

use crate::cli::{Cli, Commands, ExpensesAction, UsersAction};
use crate::commands::{self, truncate};

const EMAIL: &str = "meera@example.com";

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.create_user("meera", EMAIL, "pa55word").unwrap();
    db
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a long description", 10), "a long ...");
    assert_eq!(truncate("₹₹₹₹₹₹₹₹₹₹₹₹", 6), "₹₹₹...");
}

#[test]
fn test_parse_expense_date() {
    let parsed = commands::parse_expense_date(Some("2024-02-29")).unwrap();
    assert_eq!(parsed.to_string(), "2024-02-29");

    assert!(commands::parse_expense_date(Some("29/02/2024")).is_err());
    assert!(commands::parse_expense_date(None).is_ok());
}

#[test]
fn test_open_db_unencrypted() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tally.db");

    assert!(commands::open_db(&path, true).is_ok());
    assert!(path.exists());
}

#[test]
fn test_cmd_init() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("fresh.db");
    assert!(commands::cmd_init(&path, true).is_ok());
}

#[test]
fn test_resolve_user() {
    let db = setup_test_db();
    assert_eq!(commands::resolve_user(&db, EMAIL).unwrap().username, "meera");
    assert!(commands::resolve_user(&db, "ghost@example.com").is_err());
}

// ========== Users Command Tests ==========

#[test]
fn test_cmd_users_add_and_list() {
    let db = Database::in_memory().unwrap();
    assert!(commands::cmd_users_list(&db).is_ok());

    assert!(commands::cmd_users_add(&db, "dev", "dev@example.com", "secret").is_ok());
    assert!(db.get_user_by_email("dev@example.com").unwrap().is_some());

    // Duplicate email
    assert!(commands::cmd_users_add(&db, "dev2", "dev@example.com", "secret").is_err());
    assert!(commands::cmd_users_list(&db).is_ok());
}

// ========== Expenses Command Tests ==========

#[test]
fn test_cmd_expenses_add() {
    let db = setup_test_db();
    let result = commands::cmd_expenses_add(
        &db,
        EMAIL,
        "Food",
        320.0,
        Some("2024-06-01"),
        Some("groceries"),
    );
    assert!(result.is_ok());

    let user = db.get_user_by_email(EMAIL).unwrap().unwrap();
    let expenses = db.list_expenses(user.id).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].category, "Food");
    assert_eq!(expenses[0].description.as_deref(), Some("groceries"));
}

#[test]
fn test_cmd_expenses_add_rejects_bad_input() {
    let db = setup_test_db();
    assert!(commands::cmd_expenses_add(&db, EMAIL, "Food", 0.0, None, None).is_err());
    assert!(commands::cmd_expenses_add(&db, EMAIL, "", 10.0, None, None).is_err());
    assert!(commands::cmd_expenses_add(&db, EMAIL, "Food", 10.0, Some("yesterday"), None).is_err());
    assert!(commands::cmd_expenses_add(&db, "ghost@example.com", "Food", 10.0, None, None).is_err());
}

#[test]
fn test_cmd_expenses_list_and_delete() {
    let db = setup_test_db();
    commands::cmd_expenses_add(&db, EMAIL, "Travel", 900.0, None, None).unwrap();

    assert!(commands::cmd_expenses_list(&db, EMAIL, 20).is_ok());
    assert!(commands::cmd_expenses_list(&db, EMAIL, 0).is_ok());

    let user = db.get_user_by_email(EMAIL).unwrap().unwrap();
    let id = db.list_expenses(user.id).unwrap()[0].id;

    assert!(commands::cmd_expenses_delete(&db, EMAIL, id).is_ok());
    assert!(commands::cmd_expenses_delete(&db, EMAIL, id).is_err());
}

// ========== Analysis Command Tests ==========

#[tokio::test]
async fn test_cmd_analyze_offline() {
    let db = setup_test_db();
    assert!(commands::cmd_analyze(&db, EMAIL, false, true).await.is_ok());

    commands::cmd_expenses_add(&db, EMAIL, "Entertainment", 1500.0, None, None).unwrap();
    assert!(commands::cmd_analyze(&db, EMAIL, true, true).await.is_ok());
}

#[tokio::test]
async fn test_run_analysis_with_failing_provider() {
    let db = setup_test_db();
    commands::cmd_expenses_add(&db, EMAIL, "Food", 640.0, None, None).unwrap();

    let analyst = ExpenseAnalyst::new(Some(AIClient::Mock(MockBackend::failing("quota"))));
    assert!(commands::run_analysis(&db, EMAIL, false, &analyst).await.is_ok());
    assert!(commands::run_analysis(&db, "ghost@example.com", false, &analyst)
        .await
        .is_err());
}

#[test]
fn test_cmd_dashboard() {
    let db = setup_test_db();
    assert!(commands::cmd_dashboard(&db, EMAIL).is_ok());

    commands::cmd_expenses_add(&db, EMAIL, "Bills", 1200.0, None, None).unwrap();
    commands::cmd_expenses_add(&db, EMAIL, "Food", 800.0, None, None).unwrap();
    assert!(commands::cmd_dashboard(&db, EMAIL).is_ok());
    assert!(commands::cmd_dashboard(&db, "ghost@example.com").is_err());
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_expenses_add_args() {
    let cli = Cli::try_parse_from([
        "tally",
        "--no-encrypt",
        "expenses",
        "add",
        "-u",
        EMAIL,
        "-c",
        "Food",
        "-a",
        "99.5",
        "--date",
        "2024-06-01",
    ])
    .unwrap();

    assert!(cli.no_encrypt);
    match cli.command {
        Commands::Expenses {
            action:
                ExpensesAction::Add {
                    user,
                    category,
                    amount,
                    date,
                    description,
                },
        } => {
            assert_eq!(user, EMAIL);
            assert_eq!(category, "Food");
            assert_eq!(amount, 99.5);
            assert_eq!(date.as_deref(), Some("2024-06-01"));
            assert!(description.is_none());
        }
        _ => panic!("expected expenses add"),
    }
}

#[test]
fn test_parse_analyze_and_users_args() {
    let cli = Cli::try_parse_from(["tally", "analyze", "--user", EMAIL, "--advice"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Analyze {
            advice: true,
            offline: false,
            ..
        }
    ));

    let cli = Cli::try_parse_from(["tally", "users"]).unwrap();
    assert!(matches!(cli.command, Commands::Users { action: None }));

    let cli = Cli::try_parse_from([
        "tally", "users", "add", "--username", "a", "--email", "a@b.c", "--password", "p",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Users {
            action: Some(UsersAction::Add { .. })
        }
    ));

    assert!(Cli::try_parse_from(["tally", "analyze"]).is_err());
}
