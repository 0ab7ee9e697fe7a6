//! Budget command implementations

use anyhow::Result;
use traevo_core::db::Database;
use traevo_core::models::{BudgetStatus, BudgetUpdate, NewBudget};

use super::{parse_amount, parse_month_or_current, require_user, truncate};

pub fn cmd_budget_show(db: &Database, email: &str, month: Option<&str>) -> Result<()> {
    let user = require_user(db, email)?;
    let period = parse_month_or_current(month)?;

    let Some(budget) = db.get_budget_for_month(user.id, period)? else {
        println!("No budget set for {}. Create one with:", period);
        println!("  traevo budget set --email {} --month {} --limit 1500", user.email, period);
        return Ok(());
    };

    print_status(&db.budget_status(&budget)?);
    Ok(())
}

pub fn cmd_budget_set(db: &Database, email: &str, month: Option<&str>, limit: &str) -> Result<()> {
    let user = require_user(db, email)?;
    let period = parse_month_or_current(month)?;
    let limit = parse_amount(limit)?;

    let budget = match db.get_budget_for_month(user.id, period)? {
        Some(existing) => {
            let budget = db.update_budget(
                user.id,
                existing.id,
                &BudgetUpdate {
                    limit,
                    category_limits: None,
                },
            )?;
            db.log_audit(
                user.id,
                "update",
                Some("budget"),
                Some(budget.id),
                Some(&format!("limit={}", budget.limit)),
            )?;
            println!("✅ Updated budget for {}: {:.2}", period, budget.limit);
            budget
        }
        None => {
            let budget = db.create_budget(
                user.id,
                &NewBudget {
                    period,
                    limit,
                    category_limits: vec![],
                },
            )?;
            db.log_audit(
                user.id,
                "create",
                Some("budget"),
                Some(budget.id),
                Some(&format!("{} limit={}", period, budget.limit)),
            )?;
            println!("✅ Created budget for {}: {:.2}", period, budget.limit);
            budget
        }
    };

    print_status(&db.budget_status(&budget)?);
    Ok(())
}

fn print_status(status: &BudgetStatus) {
    println!();
    println!("💰 Budget {}", status.budget.period);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Limit:     {:.2}", status.budget.limit);
    println!("   Spent:     {:.2}", status.spent);
    println!("   Remaining: {:.2}", status.remaining);
    if let Some(usage) = status.usage_percent {
        println!("   Used:      {:.2}%", usage);
    }

    if !status.categories.is_empty() {
        println!();
        for cat in &status.categories {
            let usage = cat
                .usage_percent
                .map(|u| format!("{:.2}%", u))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "   {:<12} {:>10.2} / {:>10.2}  {:>8}",
                truncate(&cat.category_name, 12),
                cat.spent,
                cat.limit,
                usage
            );
        }
    }
}
