//! Profile handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{AppError, AppState, AuthUser};
use traevo_core::models::{User, UserUpdate};

/// GET /api/users/me - The authenticated user's profile
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .get_user(user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}

/// PATCH /api/users/me - Update name and/or email
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<UserUpdate>,
) -> Result<Json<User>, AppError> {
    if body.name.is_none() && body.email.is_none() {
        return Err(AppError::bad_request("Nothing to update"));
    }

    let user = state.db.update_user(user_id, &body)?;

    let changed: Vec<&str> = [
        body.name.as_ref().map(|_| "name"),
        body.email.as_ref().map(|_| "email"),
    ]
    .into_iter()
    .flatten()
    .collect();
    state.db.log_audit(
        user_id,
        "update",
        Some("user"),
        Some(user_id),
        Some(&changed.join(",")),
    )?;

    Ok(Json(user))
}
