//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use traevo_core::models::{Budget, BudgetMonth, BudgetStatus, BudgetUpdate, NewBudget};

/// Query parameters selecting a month (defaults to the current one)
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MonthQuery {
    fn resolve(&self) -> Result<BudgetMonth, AppError> {
        let current = BudgetMonth::from_date(Utc::now().date_naive());
        match (self.year, self.month) {
            (None, None) => Ok(current),
            (year, month) => Ok(BudgetMonth::new(
                year.unwrap_or(current.year()),
                month.unwrap_or(current.month()),
            )?),
        }
    }
}

/// GET /api/budgets - Budget status for a month
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<BudgetStatus>, AppError> {
    let period = params.resolve()?;
    let budget = state
        .db
        .get_budget_for_month(user_id, period)?
        .ok_or_else(|| AppError::not_found(&format!("No budget for {}", period)))?;

    Ok(Json(state.db.budget_status(&budget)?))
}

/// POST /api/budgets - Create the budget for a month
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<NewBudget>,
) -> Result<(StatusCode, Json<Budget>), AppError> {
    let budget = state.db.create_budget(user_id, &body)?;

    state.db.log_audit(
        user_id,
        "create",
        Some("budget"),
        Some(budget.id),
        Some(&format!("{} limit={}", budget.period, budget.limit)),
    )?;

    Ok((StatusCode::CREATED, Json(budget)))
}

/// PUT /api/budgets/:id - Change a budget's ceiling
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<BudgetUpdate>,
) -> Result<Json<Budget>, AppError> {
    let budget = state.db.update_budget(user_id, id, &body)?;

    state.db.log_audit(
        user_id,
        "update",
        Some("budget"),
        Some(id),
        Some(&format!("limit={}", budget.limit)),
    )?;

    Ok(Json(budget))
}

/// DELETE /api/budgets/:id - Delete a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_budget(user_id, id)?;

    state
        .db
        .log_audit(user_id, "delete", Some("budget"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
