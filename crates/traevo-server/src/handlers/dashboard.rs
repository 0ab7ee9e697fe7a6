//! Dashboard and risk assessment handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser, MAX_PAGE_LIMIT};
use traevo_core::dashboard;
use traevo_core::models::{DashboardOverview, Prediction};
use traevo_core::risk::{RiskAnalyzer, RiskAssessment};

/// Query parameters for an ad-hoc assessment
#[derive(Debug, Deserialize)]
pub struct RiskQuery {
    /// Assess as of this date instead of today (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    #[serde(default = "default_prediction_limit")]
    pub limit: i64,
}

fn default_prediction_limit() -> i64 {
    12
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// GET /api/dashboard/overview - Month KPIs, budget status and latest prediction
pub async fn get_overview(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<DashboardOverview>, AppError> {
    Ok(Json(dashboard::overview(&state.db, user_id, today())?))
}

/// POST /api/dashboard/refresh-prediction - Compute and store a new prediction
pub async fn refresh_prediction(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Prediction>, AppError> {
    let prediction = RiskAnalyzer::new(&state.db).refresh_prediction(user_id, today())?;

    state.db.log_audit(
        user_id,
        "refresh",
        Some("prediction"),
        Some(prediction.id),
        Some(prediction.assessment.level.as_str()),
    )?;

    Ok(Json(prediction))
}

/// GET /api/dashboard/predictions - Stored predictions, newest first
pub async fn list_predictions(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(params): Query<PredictionQuery>,
) -> Result<Json<Vec<Prediction>>, AppError> {
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    Ok(Json(state.db.list_predictions(user_id, limit)?))
}

/// GET /api/risk - Compute an assessment without storing it
pub async fn get_risk(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(params): Query<RiskQuery>,
) -> Result<Json<RiskAssessment>, AppError> {
    let as_of = params.date.unwrap_or_else(today);
    Ok(Json(RiskAnalyzer::new(&state.db).assess(user_id, as_of)?))
}
