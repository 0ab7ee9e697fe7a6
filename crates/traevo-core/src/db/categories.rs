//! Category operations

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::{Error, Result};
use crate::models::Category;

impl Database {
    /// List the categories a user can use: system defaults plus their own
    pub fn list_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, user_id FROM categories
            WHERE user_id IS NULL OR user_id = ?
            ORDER BY user_id IS NOT NULL, name
            "#,
        )?;

        let categories = stmt
            .query_map(params![user_id], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    user_id: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get a category if it is visible to the user
    pub fn get_category_for_user(&self, id: i64, user_id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name, user_id FROM categories WHERE id = ? AND (user_id IS NULL OR user_id = ?)",
                params![id, user_id],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        user_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(category)
    }

    /// Create a category owned by the user
    ///
    /// Names clashing with a default or with one of the user's own categories
    /// are rejected with `Error::Conflict`.
    pub fn create_category(&self, user_id: i64, name: &str) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Category name must not be empty".to_string()));
        }

        let conn = self.conn()?;
        let clash: i64 = conn.query_row(
            r#"
            SELECT COUNT(*) FROM categories
            WHERE name = ? COLLATE NOCASE AND (user_id IS NULL OR user_id = ?)
            "#,
            params![name, user_id],
            |row| row.get(0),
        )?;
        if clash > 0 {
            return Err(Error::Conflict(format!("Category already exists: {}", name)));
        }

        conn.execute(
            "INSERT INTO categories (name, user_id) VALUES (?, ?)",
            params![name, user_id],
        )?;

        Ok(Category {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            user_id: Some(user_id),
        })
    }
}
