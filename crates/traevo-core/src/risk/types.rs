//! Core types for spending risk analysis

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::BudgetMonth;

/// Three-level spending risk
///
/// Ordered from least to most severe so levels can be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// On track
    Green,
    /// Close to the ceiling or trending upward
    Yellow,
    /// Likely to exceed the ceiling
    Red,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Green => "GREEN",
            RiskLevel::Yellow => "YELLOW",
            RiskLevel::Red => "RED",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Green => "🟢",
            RiskLevel::Yellow => "🟡",
            RiskLevel::Red => "🔴",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GREEN" => Ok(RiskLevel::Green),
            "YELLOW" => Ok(RiskLevel::Yellow),
            "RED" => Ok(RiskLevel::Red),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

/// Direction of monthly spending over the history window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Stable,
    Decreasing,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Stable => "stable",
            Trend::Decreasing => "decreasing",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expense total for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    #[serde(flatten)]
    pub period: BudgetMonth,
    pub total: Decimal,
}

/// Statistics over the monthly history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Mean monthly expense from the first month with activity onward
    pub moving_average: Decimal,
    /// Population standard deviation over the same months
    pub std_deviation: Decimal,
    pub trend: Trend,
    /// Months counted in the average
    pub active_months: usize,
}

impl TrendSummary {
    /// Summary for a user with no expense history
    pub fn empty() -> Self {
        Self {
            moving_average: Decimal::ZERO,
            std_deviation: Decimal::ZERO,
            trend: Trend::Stable,
            active_months: 0,
        }
    }

    pub fn has_history(&self) -> bool {
        self.active_months > 0
    }
}

/// Result of a risk analysis for one user and month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(flatten)]
    pub period: BudgetMonth,
    /// Date the assessment was computed for
    pub as_of: NaiveDate,
    pub level: RiskLevel,
    pub projected_spend: Decimal,
    pub spent_so_far: Decimal,
    /// Monthly ceiling (`None` when no budget exists)
    pub budget_limit: Option<Decimal>,
    /// Spent so far as a percentage of the ceiling (`None` without a usable budget)
    pub budget_usage: Option<Decimal>,
    /// Projected spend as a percentage of the ceiling
    pub projected_usage: Option<Decimal>,
    pub moving_average: Decimal,
    pub std_deviation: Decimal,
    pub trend: Trend,
    pub day_of_month: u32,
    pub days_in_month: u32,
    pub history: Vec<MonthlyTotal>,
    pub message: String,
}
