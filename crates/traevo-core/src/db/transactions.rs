//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{date_column, decimal_column, parse_datetime, Database, TransactionFilter};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionList, TransactionTotals};

const TRANSACTION_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.category_id, c.name, t.description, t.amount,
           t.date, t.kind, t.recurrence, t.created_at
    FROM transactions t
    JOIN categories c ON c.id = t.category_id
"#;

impl Database {
    fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
        let kind_str: String = row.get(7)?;
        let recurrence_str: String = row.get(8)?;
        let created_at_str: String = row.get(9)?;

        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category_id: row.get(2)?,
            category_name: row.get(3)?,
            description: row.get(4)?,
            amount: decimal_column(row, 5)?,
            date: date_column(row, 6)?,
            kind: kind_str.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(
                    7,
                    rusqlite::types::Type::Text,
                    e.into(),
                )
            })?,
            recurrence: recurrence_str.parse().unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Record a transaction for a user
    ///
    /// The category must be a default or one of the user's own.
    pub fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        let tx = tx.validated()?;

        if self.get_category_for_user(tx.category_id, user_id)?.is_none() {
            return Err(Error::InvalidData(format!(
                "Category {} does not exist",
                tx.category_id
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (user_id, category_id, description, amount, date, kind, recurrence)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.category_id,
                tx.description,
                tx.amount.to_string(),
                tx.date.to_string(),
                tx.kind.as_str(),
                tx.recurrence.as_str(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        debug!("Inserted transaction {} for user {}", id, user_id);
        self.get_transaction(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// Get one of the user's transactions by ID
    pub fn get_transaction(&self, user_id: i64, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let sql = format!("{} WHERE t.id = ? AND t.user_id = ?", TRANSACTION_SELECT);
        let transaction = conn
            .query_row(&sql, params![id, user_id], Self::row_to_transaction)
            .optional()?;
        Ok(transaction)
    }

    /// Search transactions using a filter
    pub fn search_transactions(&self, filter: TransactionFilter) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let filter = filter.build();

        let sql = format!(
            "{} {} {}",
            TRANSACTION_SELECT, filter.where_clause, filter.order_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(filter.params_refs().as_slice(), Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Filtered listing together with income/expense totals
    pub fn list_transactions(&self, filter: TransactionFilter) -> Result<TransactionList> {
        let transactions = self.search_transactions(filter)?;
        let totals = TransactionTotals::from_transactions(&transactions);
        Ok(TransactionList {
            transactions,
            totals,
        })
    }

    /// Totals for a user's transactions within an inclusive date range
    pub fn transaction_totals(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TransactionTotals> {
        let transactions =
            self.search_transactions(TransactionFilter::for_user(user_id).date_range(start, end))?;
        Ok(TransactionTotals::from_transactions(&transactions))
    }

    /// Delete one of the user's transactions
    ///
    /// Returns `Error::NotFound` when the transaction doesn't exist or belongs
    /// to someone else.
    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }
        Ok(())
    }

    /// Count a user's transactions
    pub fn count_transactions(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
