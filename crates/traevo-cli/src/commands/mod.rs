//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `assess` - Spending risk assessment
//! - `budgets` - Monthly budget commands (show, set)
//! - `core` - Init plus shared utilities (open_db, argument parsing)
//! - `serve` - Web server command
//! - `status` - Database status
//! - `transactions` - Transaction commands (list, add)
//! - `users` - User commands (list, add)

pub mod assess;
pub mod budgets;
pub mod core;
pub mod serve;
pub mod status;
pub mod transactions;
pub mod users;

// Re-export command functions for main.rs
pub use assess::*;
pub use budgets::*;
pub use core::*;
pub use serve::*;
pub use status::*;
pub use transactions::*;
pub use users::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
