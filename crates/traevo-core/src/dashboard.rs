//! Dashboard overview assembly

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::db::Database;
use crate::error::Result;
use crate::models::{usage_percent, BudgetMonth, DashboardOverview};
use crate::risk::RiskAnalyzer;

/// Build the overview for the month containing `today`
///
/// Uses the latest stored prediction for the month, generating one first if
/// the user has none yet.
pub fn overview(db: &Database, user_id: i64, today: NaiveDate) -> Result<DashboardOverview> {
    let period = BudgetMonth::from_date(today);
    let totals = db.transaction_totals(user_id, period.first_day(), period.last_day())?;

    let budget = match db.get_budget_for_month(user_id, period)? {
        Some(b) => Some(db.budget_status(&b)?),
        None => None,
    };
    let total_usage_percent = budget
        .as_ref()
        .and_then(|b| usage_percent(totals.total_expense, b.budget.limit));

    let prediction = RiskAnalyzer::new(db).latest_or_refresh(user_id, today)?;

    let day = today.day();
    let days_remaining = period.days_in_month().saturating_sub(day);
    let average_daily_spend = (totals.total_expense / Decimal::from(day)).round_dp(2);

    Ok(DashboardOverview {
        period,
        totals,
        budget,
        prediction,
        total_usage_percent,
        days_remaining,
        average_daily_spend,
    })
}
