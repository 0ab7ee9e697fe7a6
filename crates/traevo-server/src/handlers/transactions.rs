//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use traevo_core::db::TransactionFilter;
use traevo_core::models::{NewTransaction, Transaction, TransactionKind, TransactionList};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    /// Start date (YYYY-MM-DD, inclusive)
    pub from: Option<NaiveDate>,
    /// End date (YYYY-MM-DD, inclusive)
    pub to: Option<NaiveDate>,
    pub category_id: Option<i64>,
    /// income or expense
    pub kind: Option<TransactionKind>,
}

/// GET /api/transactions - List transactions with totals
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<TransactionList>, AppError> {
    if let (Some(from), Some(to)) = (params.from, params.to) {
        if from > to {
            return Err(AppError::bad_request("'from' must not be after 'to'"));
        }
    }

    let filter = TransactionFilter::for_user(user_id)
        .from(params.from)
        .to(params.to)
        .category_id(params.category_id)
        .kind(params.kind);

    Ok(Json(state.db.list_transactions(filter)?))
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let tx = state.db.insert_transaction(user_id, &body)?;

    state.db.log_audit(
        user_id,
        "create",
        Some("transaction"),
        Some(tx.id),
        Some(&format!("{} {}", tx.kind, tx.amount)),
    )?;

    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    let tx = state
        .db
        .get_transaction(user_id, id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    Ok(Json(tx))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_transaction(user_id, id)?;

    state
        .db
        .log_audit(user_id, "delete", Some("transaction"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
