//! Transaction filter builder for constructing dynamic SQL queries

use chrono::NaiveDate;

use crate::models::TransactionKind;

/// Builder for constructing transaction query filters
///
/// Every filter is scoped to one user; the remaining criteria are optional
/// and combined with AND.
pub struct TransactionFilter {
    pub user_id: i64,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub kind: Option<TransactionKind>,
    pub oldest_first: bool,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl TransactionFilter {
    /// Create a filter over all of a user's transactions
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id,
            from: None,
            to: None,
            category_id: None,
            kind: None,
            oldest_first: false,
        }
    }

    /// Only transactions on or after `date`
    pub fn from(mut self, date: Option<NaiveDate>) -> Self {
        self.from = date;
        self
    }

    /// Only transactions on or before `date`
    pub fn to(mut self, date: Option<NaiveDate>) -> Self {
        self.to = date;
        self
    }

    /// Set an inclusive date range
    pub fn date_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.from(Some(start)).to(Some(end))
    }

    pub fn category_id(mut self, id: Option<i64>) -> Self {
        self.category_id = id;
        self
    }

    pub fn kind(mut self, kind: Option<TransactionKind>) -> Self {
        self.kind = kind;
        self
    }

    /// Sort ascending by date instead of newest first
    pub fn oldest_first(mut self, value: bool) -> Self {
        self.oldest_first = value;
        self
    }

    /// Build the filter components
    pub fn build(self) -> FilterResult {
        let mut conditions = vec!["t.user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(self.user_id)];

        if let Some(from) = self.from {
            conditions.push("t.date >= ?".to_string());
            params.push(Box::new(from.to_string()));
        }

        if let Some(to) = self.to {
            conditions.push("t.date <= ?".to_string());
            params.push(Box::new(to.to_string()));
        }

        if let Some(cid) = self.category_id {
            conditions.push("t.category_id = ?".to_string());
            params.push(Box::new(cid));
        }

        if let Some(kind) = self.kind {
            conditions.push("t.kind = ?".to_string());
            params.push(Box::new(kind.as_str()));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        let order_clause = if self.oldest_first {
            "ORDER BY t.date ASC, t.id ASC".to_string()
        } else {
            "ORDER BY t.date DESC, t.id DESC".to_string()
        };

        FilterResult {
            where_clause,
            order_clause,
            params,
        }
    }
}

impl FilterResult {
    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
