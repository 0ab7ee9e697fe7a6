//! Monthly expense aggregation
//!
//! Groups expense transactions by calendar month over the trailing window of
//! complete months before the month being assessed.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{BudgetMonth, Transaction};

use super::types::MonthlyTotal;

/// Number of complete months in the history window
pub const HISTORY_MONTHS: u32 = 6;

/// First and last month of the history window for `current`
pub fn history_window(current: BudgetMonth) -> (BudgetMonth, BudgetMonth) {
    (current.minus_months(HISTORY_MONTHS), current.prev())
}

/// Inclusive date range covering the history window and `current` up to `today`
pub fn fetch_range(current: BudgetMonth, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (first, _) = history_window(current);
    (first.first_day(), today)
}

/// Sum expenses per month across the history window
///
/// Always returns `HISTORY_MONTHS` entries, oldest first. Months without
/// expenses are zero. Income and transactions outside the window are ignored.
pub fn monthly_totals(transactions: &[Transaction], current: BudgetMonth) -> Vec<MonthlyTotal> {
    let (first, _) = history_window(current);

    let mut totals: Vec<MonthlyTotal> = (0..HISTORY_MONTHS)
        .scan(first, |month, _| {
            let this = *month;
            *month = month.next();
            Some(MonthlyTotal {
                period: this,
                total: Decimal::ZERO,
            })
        })
        .collect();

    for tx in transactions.iter().filter(|t| t.is_expense()) {
        let period = BudgetMonth::from_date(tx.date);
        if let Some(slot) = totals.iter_mut().find(|m| m.period == period) {
            slot.total = slot.total.saturating_add(tx.amount);
        }
    }

    totals
}

/// Expenses recorded in `current` on or before `today`
pub fn spent_in_month(transactions: &[Transaction], current: BudgetMonth, today: NaiveDate) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.is_expense() && current.contains(t.date) && t.date <= today)
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}
