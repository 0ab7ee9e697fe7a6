//! Monthly budget operations

use std::collections::HashMap;

use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;
use tracing::info;

use super::{decimal_column, parse_datetime, Database, DbConn, TransactionFilter};
use crate::error::{Error, Result};
use crate::models::{
    usage_percent, Budget, BudgetMonth, BudgetStatus, BudgetUpdate, CategoryBudgetStatus,
    CategoryLimit, NewBudget, TransactionKind,
};

/// Raw budget row before its category limits are attached
struct BudgetRow {
    id: i64,
    user_id: i64,
    year: i32,
    month: u32,
    limit: Decimal,
    created_at: String,
}

const BUDGET_COLUMNS: &str = "id, user_id, year, month, limit_amount, created_at";

impl Database {
    fn row_to_budget_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BudgetRow> {
        Ok(BudgetRow {
            id: row.get(0)?,
            user_id: row.get(1)?,
            year: row.get(2)?,
            month: row.get(3)?,
            limit: decimal_column(row, 4)?,
            created_at: row.get(5)?,
        })
    }

    fn load_category_limits(conn: &DbConn, budget_id: i64) -> Result<Vec<CategoryLimit>> {
        let mut stmt = conn.prepare(
            "SELECT category_id, limit_amount FROM budget_category_limits WHERE budget_id = ? ORDER BY category_id",
        )?;
        let limits = stmt
            .query_map(params![budget_id], |row| {
                Ok(CategoryLimit {
                    category_id: row.get(0)?,
                    limit: decimal_column(row, 1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(limits)
    }

    fn hydrate_budget(conn: &DbConn, row: BudgetRow) -> Result<Budget> {
        Ok(Budget {
            id: row.id,
            user_id: row.user_id,
            period: BudgetMonth::new(row.year, row.month)?,
            limit: row.limit,
            category_limits: Self::load_category_limits(conn, row.id)?,
            created_at: parse_datetime(&row.created_at),
        })
    }

    fn check_category_limits(&self, user_id: i64, limits: &[CategoryLimit]) -> Result<()> {
        for cl in limits {
            if self.get_category_for_user(cl.category_id, user_id)?.is_none() {
                return Err(Error::InvalidData(format!(
                    "Category {} does not exist",
                    cl.category_id
                )));
            }
        }
        Ok(())
    }

    fn replace_category_limits(
        conn: &DbConn,
        budget_id: i64,
        limits: &[CategoryLimit],
    ) -> Result<()> {
        conn.execute(
            "DELETE FROM budget_category_limits WHERE budget_id = ?",
            params![budget_id],
        )?;
        for cl in limits {
            conn.execute(
                "INSERT INTO budget_category_limits (budget_id, category_id, limit_amount) VALUES (?, ?, ?)",
                params![budget_id, cl.category_id, cl.limit.to_string()],
            )?;
        }
        Ok(())
    }

    /// Create the budget for a month
    ///
    /// A user has at most one budget per month; a second one is
    /// `Error::Conflict`.
    pub fn create_budget(&self, user_id: i64, new_budget: &NewBudget) -> Result<Budget> {
        new_budget.validate()?;
        self.check_category_limits(user_id, &new_budget.category_limits)?;

        if self
            .get_budget_for_month(user_id, new_budget.period)?
            .is_some()
        {
            return Err(Error::Conflict(format!(
                "A budget for {} already exists",
                new_budget.period
            )));
        }

        let mut conn = self.conn()?;
        let db_tx = conn.transaction()?;
        db_tx.execute(
            "INSERT INTO budgets (user_id, year, month, limit_amount) VALUES (?, ?, ?, ?)",
            params![
                user_id,
                new_budget.period.year(),
                new_budget.period.month(),
                new_budget.limit.to_string()
            ],
        )?;
        let id = db_tx.last_insert_rowid();
        for cl in &new_budget.category_limits {
            db_tx.execute(
                "INSERT INTO budget_category_limits (budget_id, category_id, limit_amount) VALUES (?, ?, ?)",
                params![id, cl.category_id, cl.limit.to_string()],
            )?;
        }
        db_tx.commit()?;
        drop(conn);

        info!("Created budget {} for {} (user {})", id, new_budget.period, user_id);
        self.get_budget(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))
    }

    /// Get one of the user's budgets by ID
    pub fn get_budget(&self, user_id: i64, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM budgets WHERE id = ? AND user_id = ?", BUDGET_COLUMNS),
                params![id, user_id],
                Self::row_to_budget_row,
            )
            .optional()?;

        row.map(|r| Self::hydrate_budget(&conn, r)).transpose()
    }

    /// Get the user's budget for a month
    pub fn get_budget_for_month(&self, user_id: i64, period: BudgetMonth) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM budgets WHERE user_id = ? AND year = ? AND month = ?",
                    BUDGET_COLUMNS
                ),
                params![user_id, period.year(), period.month()],
                Self::row_to_budget_row,
            )
            .optional()?;

        row.map(|r| Self::hydrate_budget(&conn, r)).transpose()
    }

    /// List the user's budgets, most recent month first
    pub fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budgets WHERE user_id = ? ORDER BY year DESC, month DESC",
            BUDGET_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![user_id], Self::row_to_budget_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|r| Self::hydrate_budget(&conn, r))
            .collect()
    }

    /// Change a budget's ceiling (and optionally replace its sub-limits)
    pub fn update_budget(&self, user_id: i64, id: i64, update: &BudgetUpdate) -> Result<Budget> {
        update.validate()?;
        if let Some(ref limits) = update.category_limits {
            self.check_category_limits(user_id, limits)?;
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE budgets SET limit_amount = ? WHERE id = ? AND user_id = ?",
            params![update.limit.to_string(), id, user_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Budget {}", id)));
        }
        if let Some(ref limits) = update.category_limits {
            Self::replace_category_limits(&conn, id, limits)?;
        }
        drop(conn);

        self.get_budget(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))
    }

    /// Delete one of the user's budgets
    pub fn delete_budget(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Budget {}", id)));
        }
        Ok(())
    }

    /// Compare a budget against the expenses recorded in its month
    pub fn budget_status(&self, budget: &Budget) -> Result<BudgetStatus> {
        let expenses = self.search_transactions(
            TransactionFilter::for_user(budget.user_id)
                .date_range(budget.period.first_day(), budget.period.last_day())
                .kind(Some(TransactionKind::Expense)),
        )?;

        let mut spent = Decimal::ZERO;
        let mut by_category: HashMap<i64, (String, Decimal)> = HashMap::new();
        for tx in &expenses {
            spent = spent.saturating_add(tx.amount);
            let entry = by_category
                .entry(tx.category_id)
                .or_insert_with(|| (tx.category_name.clone(), Decimal::ZERO));
            entry.1 = entry.1.saturating_add(tx.amount);
        }

        let mut categories = Vec::with_capacity(budget.category_limits.len());
        for cl in &budget.category_limits {
            let (name, cat_spent) = match by_category.get(&cl.category_id) {
                Some((name, amount)) => (name.clone(), *amount),
                None => {
                    let name = self
                        .get_category_for_user(cl.category_id, budget.user_id)?
                        .map(|c| c.name)
                        .unwrap_or_default();
                    (name, Decimal::ZERO)
                }
            };
            categories.push(CategoryBudgetStatus {
                category_id: cl.category_id,
                category_name: name,
                limit: cl.limit,
                spent: cat_spent,
                usage_percent: usage_percent(cat_spent, cl.limit),
                remaining: cl.limit - cat_spent,
            });
        }

        Ok(BudgetStatus {
            budget: budget.clone(),
            spent,
            usage_percent: usage_percent(spent, budget.limit),
            remaining: budget.limit - spent,
            categories,
        })
    }
}
