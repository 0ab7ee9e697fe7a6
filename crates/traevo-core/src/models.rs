//! Domain models for Traevo

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::risk::RiskAssessment;

/// Largest accepted transaction amount or budget limit
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// A registered user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Registration data (before hashing and DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial profile update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A spending/income category
///
/// Categories without an owner are system defaults visible to every user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub user_id: Option<i64>,
}

impl Category {
    pub fn is_default(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Direction of money flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often a transaction repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    Once,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unknown recurrence: {}", s)),
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub description: String,
    /// Always positive; direction comes from `kind`
    pub amount: Decimal,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub recurrence: Recurrence,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Negative for expenses, positive for income
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// A new transaction to be recorded (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub category_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl NewTransaction {
    /// Check business rules and return a normalized copy
    pub fn validated(&self) -> Result<Self> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::InvalidData(
                "Description must not be empty".to_string(),
            ));
        }
        if description.chars().count() > 255 {
            return Err(Error::InvalidData(
                "Description must be at most 255 characters".to_string(),
            ));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::InvalidData(
                "Amount must be greater than zero".to_string(),
            ));
        }
        if self.amount > MAX_AMOUNT {
            return Err(Error::InvalidData(format!(
                "Amount must be at most {}",
                MAX_AMOUNT
            )));
        }
        if self.amount.normalize().scale() > 2 {
            return Err(Error::InvalidData(
                "Amount must have at most 2 decimal places".to_string(),
            ));
        }

        Ok(Self {
            description: description.to_string(),
            amount: self.amount.normalize(),
            ..self.clone()
        })
    }
}

/// Income/expense totals for a set of transactions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionTotals {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

impl TransactionTotals {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut totals = Self::default();
        for tx in transactions {
            match tx.kind {
                TransactionKind::Income => {
                    totals.total_income = totals.total_income.saturating_add(tx.amount)
                }
                TransactionKind::Expense => {
                    totals.total_expense = totals.total_expense.saturating_add(tx.amount)
                }
            }
        }
        totals.balance = totals.total_income - totals.total_expense;
        totals
    }
}

/// Filtered transaction listing with totals
#[derive(Debug, Clone, Serialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
    #[serde(flatten)]
    pub totals: TransactionTotals,
}

/// A calendar month, the unit budgets and risk assessments are scoped to
///
/// Serialized as `{"year": 2026, "month": 10}` so it can be flattened into
/// request and response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMonth", into = "RawMonth")]
pub struct BudgetMonth {
    year: i32,
    month: u32,
}

#[derive(Serialize, Deserialize)]
struct RawMonth {
    year: i32,
    month: u32,
}

impl BudgetMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidData(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(Error::InvalidData(format!("Year out of range: {}", year)));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Constructors guarantee the date exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or_else(|| self.first_day())
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Step back `n` months
    pub fn minus_months(&self, n: u32) -> Self {
        (0..n).fold(*self, |m, _| m.prev())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for BudgetMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for BudgetMonth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Invalid month (use YYYY-MM): {}", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid year in month: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid month: {}", s))?;
        Self::new(year, month).map_err(|e| e.to_string())
    }
}

impl TryFrom<RawMonth> for BudgetMonth {
    type Error = String;

    fn try_from(raw: RawMonth) -> std::result::Result<Self, Self::Error> {
        Self::new(raw.year, raw.month).map_err(|e| e.to_string())
    }
}

impl From<BudgetMonth> for RawMonth {
    fn from(m: BudgetMonth) -> Self {
        Self {
            year: m.year,
            month: m.month,
        }
    }
}

/// Per-category sub-limit inside a monthly budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLimit {
    pub category_id: i64,
    pub limit: Decimal,
}

/// A monthly budget (one per user per month)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub period: BudgetMonth,
    /// Monthly ceiling across all categories
    pub limit: Decimal,
    pub category_limits: Vec<CategoryLimit>,
    pub created_at: DateTime<Utc>,
}

/// A budget to be created
#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    #[serde(flatten)]
    pub period: BudgetMonth,
    pub limit: Decimal,
    #[serde(default)]
    pub category_limits: Vec<CategoryLimit>,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        validate_limits(self.limit, &self.category_limits)
    }
}

/// Changes to an existing budget
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetUpdate {
    pub limit: Decimal,
    /// Replaces every sub-limit when present
    pub category_limits: Option<Vec<CategoryLimit>>,
}

impl BudgetUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_limits(self.limit, self.category_limits.as_deref().unwrap_or_default())
    }
}

fn validate_limits(limit: Decimal, category_limits: &[CategoryLimit]) -> Result<()> {
    if limit <= Decimal::ZERO {
        return Err(Error::InvalidData(
            "Budget limit must be greater than zero".to_string(),
        ));
    }
    if limit > MAX_AMOUNT {
        return Err(Error::InvalidData(format!(
            "Budget limit must be at most {}",
            MAX_AMOUNT
        )));
    }
    for cl in category_limits {
        if cl.limit <= Decimal::ZERO {
            return Err(Error::InvalidData(format!(
                "Limit for category {} must be greater than zero",
                cl.category_id
            )));
        }
        if cl.limit > MAX_AMOUNT {
            return Err(Error::InvalidData(format!(
                "Limit for category {} must be at most {}",
                cl.category_id, MAX_AMOUNT
            )));
        }
    }
    let mut ids: Vec<i64> = category_limits.iter().map(|c| c.category_id).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.len() != category_limits.len() {
        return Err(Error::InvalidData(
            "Each category may only appear once in a budget".to_string(),
        ));
    }
    Ok(())
}

/// Spending against one category sub-limit
#[derive(Debug, Clone, Serialize)]
pub struct CategoryBudgetStatus {
    pub category_id: i64,
    pub category_name: String,
    pub limit: Decimal,
    pub spent: Decimal,
    /// `None` when the limit is zero
    pub usage_percent: Option<Decimal>,
    pub remaining: Decimal,
}

/// A budget together with what has been spent against it
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent: Decimal,
    /// `None` when the ceiling is zero
    pub usage_percent: Option<Decimal>,
    pub remaining: Decimal,
    pub categories: Vec<CategoryBudgetStatus>,
}

/// Percentage of `limit` used by `spent`, rounded to cents
///
/// Returns `None` for a non-positive limit instead of dividing by zero.
pub fn usage_percent(spent: Decimal, limit: Decimal) -> Option<Decimal> {
    if limit <= Decimal::ZERO {
        return None;
    }
    spent
        .checked_div(limit)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .map(|r| r.round_dp(2))
}

/// A persisted risk assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: i64,
    pub user_id: i64,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub period: BudgetMonth,
    pub assessment: RiskAssessment,
}

/// Everything the home screen needs in one response
#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    #[serde(flatten)]
    pub period: BudgetMonth,
    #[serde(flatten)]
    pub totals: TransactionTotals,
    pub budget: Option<BudgetStatus>,
    /// Latest risk assessment snapshot for the month
    pub prediction: Prediction,
    /// Month expenses as a percentage of the ceiling (`None` without a budget)
    pub total_usage_percent: Option<Decimal>,
    pub days_remaining: u32,
    pub average_daily_spend: Decimal,
}
