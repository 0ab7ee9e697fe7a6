//! Registration, login and token refresh handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{AppError, AppState, TokenPair, TokenType};
use traevo_core::models::{NewUser, User};

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /api/auth/register - Create an account
///
/// Password hashing is CPU-bound, so it runs on the blocking pool.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let db = state.db.clone();
    let user = tokio::task::spawn_blocking(move || db.create_user(&body)).await??;

    state
        .db
        .log_audit(user.id, "register", Some("user"), Some(user.id), None)?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/auth/login - Exchange credentials for a token pair
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let db = state.db.clone();
    let LoginRequest { email, password } = body;
    let result = tokio::task::spawn_blocking(move || db.authenticate(&email, &password)).await?;
    let user = match result {
        Ok(user) => user,
        Err(traevo_core::Error::Auth(msg)) => {
            warn!("Failed login attempt");
            return Err(AppError::unauthorized(&msg));
        }
        Err(e) => return Err(e.into()),
    };

    let pair = state.config.tokens.issue_pair(user.id)?;
    state.db.log_audit(user.id, "login", None, None, None)?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(pair))
}

/// POST /api/auth/refresh - Exchange a refresh token for a new pair
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let user_id = state
        .config
        .tokens
        .validate(&body.refresh_token, TokenType::Refresh)
        .map_err(|e| {
            warn!(error = %e, "Rejected refresh token");
            AppError::unauthorized("Invalid or expired refresh token")
        })?;

    if state.db.get_user(user_id)?.is_none() {
        return Err(AppError::unauthorized("Invalid or expired refresh token"));
    }

    Ok(Json(state.config.tokens.issue_pair(user_id)?))
}
