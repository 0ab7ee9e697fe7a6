//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod transactions;
pub mod users;

// Re-export all handlers for use in router
pub use audit::*;
pub use auth::*;
pub use budgets::*;
pub use categories::*;
pub use dashboard::*;
pub use health::*;
pub use transactions::*;
pub use users::*;
