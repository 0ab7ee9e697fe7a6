//! Persisted risk assessment snapshots

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{BudgetMonth, Prediction};
use crate::risk::RiskAssessment;

impl Database {
    fn row_to_prediction(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, i64, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }

    fn build_prediction(raw: (i64, i64, String, String)) -> Result<Prediction> {
        let (id, user_id, assessment_json, generated_at) = raw;
        let assessment: RiskAssessment = serde_json::from_str(&assessment_json)?;
        Ok(Prediction {
            id,
            user_id,
            generated_at: parse_datetime(&generated_at),
            period: assessment.period,
            assessment,
        })
    }

    /// Store a new snapshot of an assessment
    pub fn insert_prediction(&self, user_id: i64, assessment: &RiskAssessment) -> Result<Prediction> {
        let json = serde_json::to_string(assessment)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO predictions (user_id, year, month, level, projected_spend, assessment)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                assessment.period.year(),
                assessment.period.month(),
                assessment.level.as_str(),
                assessment.projected_spend.to_string(),
                json,
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_prediction(id)?
            .ok_or_else(|| Error::NotFound(format!("Prediction {}", id)))
    }

    fn get_prediction(&self, id: i64) -> Result<Option<Prediction>> {
        let conn = self.conn()?;
        let raw = conn
            .query_row(
                "SELECT id, user_id, assessment, generated_at FROM predictions WHERE id = ?",
                params![id],
                Self::row_to_prediction,
            )
            .optional()?;
        raw.map(Self::build_prediction).transpose()
    }

    /// Most recent snapshot for a user's month
    pub fn latest_prediction(&self, user_id: i64, period: BudgetMonth) -> Result<Option<Prediction>> {
        let conn = self.conn()?;
        let raw = conn
            .query_row(
                r#"
                SELECT id, user_id, assessment, generated_at FROM predictions
                WHERE user_id = ? AND year = ? AND month = ?
                ORDER BY generated_at DESC, id DESC
                LIMIT 1
                "#,
                params![user_id, period.year(), period.month()],
                Self::row_to_prediction,
            )
            .optional()?;
        raw.map(Self::build_prediction).transpose()
    }

    /// All of a user's snapshots, newest first
    pub fn list_predictions(&self, user_id: i64, limit: i64) -> Result<Vec<Prediction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, assessment, generated_at FROM predictions
            WHERE user_id = ?
            ORDER BY generated_at DESC, id DESC
            LIMIT ?
            "#,
        )?;
        let rows = stmt
            .query_map(params![user_id, limit], Self::row_to_prediction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(Self::build_prediction).collect()
    }

    /// Drop a user's snapshots generated more than `retention_days` ago
    pub fn delete_old_predictions(&self, user_id: i64, retention_days: i64) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            r#"
            DELETE FROM predictions
            WHERE user_id = ? AND generated_at < datetime('now', ? || ' days')
            "#,
            params![user_id, format!("-{}", retention_days.max(0))],
        )?;
        Ok(deleted)
    }
}
