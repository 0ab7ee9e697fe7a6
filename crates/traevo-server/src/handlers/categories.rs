//! Category handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser};
use traevo_core::models::Category;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// GET /api/categories - Defaults plus the user's own
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.db.list_categories(user_id)?))
}

/// POST /api/categories - Create a user category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = state.db.create_category(user_id, &body.name)?;

    state.db.log_audit(
        user_id,
        "create",
        Some("category"),
        Some(category.id),
        Some(&category.name),
    )?;

    Ok((StatusCode::CREATED, Json(category)))
}
