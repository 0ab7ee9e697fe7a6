//! User operations

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{parse_datetime, Database};
use crate::auth::{hash_password, normalize_email, normalize_name, validate_password, verify_password};
use crate::error::{Error, Result};
use crate::models::{NewUser, User, UserUpdate};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

impl Database {
    fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        let created_at_str: String = row.get(4)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Register a new user
    ///
    /// Validates name, email and password, hashes the password and rejects
    /// duplicate emails (case-insensitive) with `Error::Conflict`.
    pub fn create_user(&self, new_user: &NewUser) -> Result<User> {
        let name = normalize_name(&new_user.name)?;
        let email = normalize_email(&new_user.email)?;
        validate_password(&new_user.password)?;

        if self.get_user_by_email(&email)?.is_some() {
            return Err(Error::Conflict(format!("Email already registered: {}", email)));
        }

        let password_hash = hash_password(&new_user.password)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)",
            params![name, email, password_hash],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        info!("Registered user {}", id);
        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by email (case-insensitive)
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ? COLLATE NOCASE", USER_COLUMNS),
                params![email.trim()],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Check credentials and return the user
    ///
    /// Unknown email and wrong password produce the same `Error::Auth`.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let invalid = || Error::Auth("Invalid email or password".to_string());

        let user = self.get_user_by_email(email)?.ok_or_else(invalid)?;
        if !verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }
        Ok(user)
    }

    /// Update name and/or email
    pub fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User> {
        let mut user = self
            .get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))?;

        if let Some(ref name) = update.name {
            user.name = normalize_name(name)?;
        }
        if let Some(ref email) = update.email {
            let email = normalize_email(email)?;
            if let Some(other) = self.get_user_by_email(&email)? {
                if other.id != id {
                    return Err(Error::Conflict(format!("Email already registered: {}", email)));
                }
            }
            user.email = email;
        }

        let conn = self.conn()?;
        conn.execute(
            "UPDATE users SET name = ?, email = ? WHERE id = ?",
            params![user.name, user.email, id],
        )?;

        Ok(user)
    }
}
