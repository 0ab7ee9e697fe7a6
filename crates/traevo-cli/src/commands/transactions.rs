//! Transaction command implementations

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use traevo_core::db::{Database, TransactionFilter};
use traevo_core::models::{NewTransaction, Recurrence, TransactionKind};

use super::{parse_amount, parse_date_or_today, parse_optional_date, require_user, truncate};

/// Arguments for `transactions add`, as typed on the command line
pub struct TransactionArgs<'a> {
    pub category: &'a str,
    pub amount: &'a str,
    pub description: &'a str,
    pub date: Option<&'a str>,
    pub kind: &'a str,
    pub recurrence: &'a str,
}

pub fn cmd_transactions_list(
    db: &Database,
    email: &str,
    from: Option<&str>,
    to: Option<&str>,
    limit: usize,
) -> Result<()> {
    let user = require_user(db, email)?;
    let from = parse_optional_date(from)?;
    let to = parse_optional_date(to)?;
    if let (Some(f), Some(t)) = (from, to) {
        anyhow::ensure!(f <= t, "--from must not be after --to");
    }

    let list = db.list_transactions(TransactionFilter::for_user(user.id).from(from).to(to))?;

    if list.transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  traevo transactions add --email {} --category Food --amount 12.50 --description Lunch", user.email);
        return Ok(());
    }

    println!();
    println!("📝 Transactions for {}", user.email);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in list.transactions.iter().take(limit) {
        let amount_str = match tx.kind {
            TransactionKind::Expense => format!("\x1b[31m-{:.2}\x1b[0m", tx.amount), // Red for expenses
            TransactionKind::Income => format!("\x1b[32m+{:.2}\x1b[0m", tx.amount), // Green for income
        };

        println!(
            "   [{}] {} │ {:>10} │ {:<10} │ {}",
            tx.id,
            tx.date,
            amount_str,
            truncate(&tx.category_name, 10),
            truncate(&tx.description, 40)
        );
    }
    if list.transactions.len() > limit {
        println!("   ... {} more", list.transactions.len() - limit);
    }

    println!();
    println!("   Income:  {:.2}", list.totals.total_income);
    println!("   Expense: {:.2}", list.totals.total_expense);
    let balance = list.totals.balance;
    if balance < Decimal::ZERO {
        println!("   Balance: \x1b[31m{:.2}\x1b[0m", balance);
    } else {
        println!("   Balance: {:.2}", balance);
    }

    Ok(())
}

pub fn cmd_transactions_add(db: &Database, email: &str, args: &TransactionArgs) -> Result<()> {
    let user = require_user(db, email)?;

    let category = db
        .list_categories(user.id)?
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(args.category.trim()))
        .with_context(|| format!("Unknown category '{}'", args.category))?;

    let kind: TransactionKind = args.kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let recurrence: Recurrence = args
        .recurrence
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let tx = db.insert_transaction(
        user.id,
        &NewTransaction {
            category_id: category.id,
            description: args.description.to_string(),
            amount: parse_amount(args.amount)?,
            date: parse_date_or_today(args.date)?,
            kind,
            recurrence,
        },
    )?;

    db.log_audit(
        user.id,
        "create",
        Some("transaction"),
        Some(tx.id),
        Some(&format!("{} {}", tx.kind, tx.amount)),
    )?;

    println!("✅ Recorded transaction {}:", tx.id);
    println!(
        "   {} │ {} {:.2} │ {} │ {}",
        tx.date,
        tx.kind,
        tx.amount,
        tx.category_name,
        truncate(&tx.description, 40)
    );

    Ok(())
}
