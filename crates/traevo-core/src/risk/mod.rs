//! Spending Risk Analysis
//!
//! Classifies how likely a user is to overrun this month's budget. The score
//! is a deterministic, rule-based function of three stages:
//!
//! - **Aggregator** - sums expenses per calendar month over the 6 complete
//!   months before the current one
//! - **Trend** - moving average, standard deviation and direction of the
//!   monthly totals
//! - **Classifier** - projects month-end spend and maps it, with the budget
//!   ceiling and the day of month, to GREEN / YELLOW / RED
//!
//! ## Usage
//!
//! ```rust,ignore
//! use traevo_core::risk::RiskAnalyzer;
//!
//! let analyzer = RiskAnalyzer::new(&db);
//! let assessment = analyzer.assess(user_id, today)?;
//! println!("{} {}", assessment.level, assessment.message);
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod classifier;
pub mod trend;
pub mod types;

pub use analyzer::{assess, RiskAnalyzer, SpendingSource, PREDICTION_RETENTION_DAYS};
pub use types::{MonthlyTotal, RiskAssessment, RiskLevel, Trend, TrendSummary};
