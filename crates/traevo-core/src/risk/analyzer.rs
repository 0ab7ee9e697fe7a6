//! Risk analysis over a spending data source

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::db::{Database, TransactionFilter};
use crate::error::Result;
use crate::models::{usage_percent, Budget, BudgetMonth, Prediction, Transaction};

use super::aggregator::{fetch_range, monthly_totals, spent_in_month};
use super::classifier::{classify, message, project_month_end};
use super::trend::summarize;
use super::types::RiskAssessment;

/// Stored predictions older than this are dropped on refresh
pub const PREDICTION_RETENTION_DAYS: i64 = 90;

/// Where the analyzer reads transactions and budgets from
pub trait SpendingSource {
    /// All of the user's transactions dated within `[start, end]`
    fn fetch_transactions(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>>;

    /// The user's budget for a month, if one exists
    fn fetch_budget(&self, user_id: i64, period: BudgetMonth) -> Result<Option<Budget>>;
}

impl SpendingSource for Database {
    fn fetch_transactions(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        self.search_transactions(
            TransactionFilter::for_user(user_id)
                .date_range(start, end)
                .oldest_first(true),
        )
    }

    fn fetch_budget(&self, user_id: i64, period: BudgetMonth) -> Result<Option<Budget>> {
        self.get_budget_for_month(user_id, period)
    }
}

/// Score a month from its transactions and budget
///
/// `transactions` should cover the history window and the current month up
/// to `today`; anything else is ignored. The result depends only on the
/// arguments.
pub fn assess(transactions: &[Transaction], budget: Option<&Budget>, today: NaiveDate) -> RiskAssessment {
    let period = BudgetMonth::from_date(today);
    let day = today.day();
    let days_in_month = period.days_in_month();

    let history = monthly_totals(transactions, period);
    let summary = summarize(&history);
    let spent = spent_in_month(transactions, period, today);
    let projected = project_month_end(spent, &summary, day, days_in_month);

    let limit = budget.map(|b| b.limit);
    let level = classify(projected, spent, limit, day, summary.trend);
    let has_budget = limit.is_some_and(|l| l > Decimal::ZERO);

    RiskAssessment {
        period,
        as_of: today,
        level,
        projected_spend: projected,
        spent_so_far: spent.round_dp(2),
        budget_limit: limit,
        budget_usage: limit.and_then(|l| usage_percent(spent, l)),
        projected_usage: limit.and_then(|l| usage_percent(projected, l)),
        moving_average: summary.moving_average.round_dp(2),
        std_deviation: summary.std_deviation.round_dp(2),
        trend: summary.trend,
        day_of_month: day,
        days_in_month,
        history,
        message: message(level, summary.trend, projected, has_budget),
    }
}

/// Runs assessments for users against a `SpendingSource`
pub struct RiskAnalyzer<'a, S: SpendingSource> {
    source: &'a S,
}

impl<'a, S: SpendingSource> RiskAnalyzer<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Assess the month containing `today` for a user
    pub fn assess(&self, user_id: i64, today: NaiveDate) -> Result<RiskAssessment> {
        let period = BudgetMonth::from_date(today);
        let (start, end) = fetch_range(period, today);

        let transactions = self.source.fetch_transactions(user_id, start, end)?;
        let budget = self.source.fetch_budget(user_id, period)?;

        let assessment = assess(&transactions, budget.as_ref(), today);
        debug!(
            user_id,
            level = %assessment.level,
            projected = %assessment.projected_spend,
            spent = %assessment.spent_so_far,
            trend = %assessment.trend,
            "Risk assessment computed"
        );
        Ok(assessment)
    }
}

impl<'a> RiskAnalyzer<'a, Database> {
    /// Compute and store a new prediction, pruning snapshots past retention
    pub fn refresh_prediction(&self, user_id: i64, today: NaiveDate) -> Result<Prediction> {
        let assessment = self.assess(user_id, today)?;
        let pruned = self
            .source
            .delete_old_predictions(user_id, PREDICTION_RETENTION_DAYS)?;
        if pruned > 0 {
            debug!(user_id, pruned, "Pruned old predictions");
        }
        self.source.insert_prediction(user_id, &assessment)
    }

    /// Latest stored prediction for the month containing `today`, generating
    /// one if none exists yet
    pub fn latest_or_refresh(&self, user_id: i64, today: NaiveDate) -> Result<Prediction> {
        match self
            .source
            .latest_prediction(user_id, BudgetMonth::from_date(today))?
        {
            Some(prediction) => Ok(prediction),
            None => self.refresh_prediction(user_id, today),
        }
    }
}
