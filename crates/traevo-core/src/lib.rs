//! Traevo Core Library
//!
//! Shared functionality for the Traevo personal finance backend:
//! - Database access and migrations
//! - Password hashing and credential validation
//! - Rule-based spending risk analysis
//! - Dashboard overview assembly

pub mod auth;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod models;
pub mod risk;

pub use db::{AuditEntry, Database, TransactionFilter};
pub use error::{Error, Result};
pub use risk::{RiskAnalyzer, RiskAssessment, RiskLevel, SpendingSource, Trend};
