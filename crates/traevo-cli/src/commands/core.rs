//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - Parsers for dates, months and money given on the command line

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use traevo_core::db::Database;
use traevo_core::models::{BudgetMonth, User};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;

    let categories = db.list_categories(0)?;
    println!("   Seeded {} default categories", categories.len());

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a user: traevo users add --name NAME --email EMAIL --password PASSWORD");
    println!("  2. Start the API: traevo serve");

    Ok(())
}

/// Look up a user by email or fail with a helpful message
pub fn require_user(db: &Database, email: &str) -> Result<User> {
    db.get_user_by_email(email)?
        .ok_or_else(|| anyhow::anyhow!("No user registered with email {}", email))
}

/// Parse a YYYY-MM-DD date, defaulting to today
pub fn parse_date_or_today(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s)),
        None => Ok(Utc::now().date_naive()),
    }
}

pub fn parse_optional_date(date: Option<&str>) -> Result<Option<NaiveDate>> {
    date.map(|s| parse_date_or_today(Some(s))).transpose()
}

/// Parse a YYYY-MM month, defaulting to the current one
pub fn parse_month_or_current(month: Option<&str>) -> Result<BudgetMonth> {
    match month {
        Some(s) => BudgetMonth::from_str(s).map_err(|e| anyhow::anyhow!(e)),
        None => Ok(BudgetMonth::from_date(Utc::now().date_naive())),
    }
}

pub fn parse_amount(s: &str) -> Result<Decimal> {
    Decimal::from_str(s.trim()).with_context(|| format!("Invalid amount '{}'", s))
}
