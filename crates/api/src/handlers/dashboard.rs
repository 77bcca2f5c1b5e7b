//! Handlers for the dashboard widgets.
//!
//! Each endpoint is a thin wrapper over [`Reporter`](vendorhub_activity::Reporter);
//! a report that fails is surfaced as an error, never replaced with
//! placeholder numbers.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use vendorhub_core::activity::EntityKind;
use vendorhub_core::aggregation::{Bucket, RankField, RankedItem, SpendBucket};
use vendorhub_db::models::dashboard::DashboardSummary;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub entity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub entity: Option<String>,
    pub field: Option<String>,
    pub n: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SpendParams {
    pub n: Option<i64>,
}

fn required<'a>(name: &str, value: Option<&'a str>) -> AppResult<&'a str> {
    value.ok_or_else(|| AppError::BadRequest(format!("Missing required parameter '{name}'")))
}

/// GET /api/v1/dashboard/summary
pub async fn summary(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let summary = state.reporter.summary().await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/dashboard/status?entity=vendor|contract
///
/// Defaults to vendors.
pub async fn status_distribution(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<DataResponse<Vec<Bucket>>>> {
    let entity = match params.entity.as_deref() {
        Some(raw) => EntityKind::parse(raw)?,
        None => EntityKind::Vendor,
    };
    let buckets = state.reporter.count_by_status(entity).await?;
    Ok(Json(DataResponse { data: buckets }))
}

/// GET /api/v1/dashboard/categories
pub async fn category_distribution(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Bucket>>>> {
    let buckets = state.reporter.count_by_category().await?;
    Ok(Json(DataResponse { data: buckets }))
}

/// GET /api/v1/dashboard/top?entity=&field=&n=
pub async fn top_n(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<TopParams>,
) -> AppResult<Json<DataResponse<Vec<RankedItem>>>> {
    let entity = EntityKind::parse(required("entity", params.entity.as_deref())?)?;
    let field = RankField::parse(required("field", params.field.as_deref())?)?;
    let ranked = state.reporter.top_n(entity, field, params.n).await?;
    Ok(Json(DataResponse { data: ranked }))
}

/// GET /api/v1/dashboard/spend?n=
pub async fn spend_by_vendor(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<SpendParams>,
) -> AppResult<Json<DataResponse<Vec<SpendBucket>>>> {
    let buckets = state.reporter.spend_by_vendor(params.n).await?;
    Ok(Json(DataResponse { data: buckets }))
}
