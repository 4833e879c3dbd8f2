//! Earnings API (营收分析)

use axum::{
    Json, Router,
    extract::{Query, State},
    middleware,
    routing::get,
};
use serde::Deserialize;

use crate::auth::require_admin;
use crate::core::ServerState;
use crate::reports::EarningsReport;
use crate::utils::AppResult;
use crate::utils::time::TimeRange;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/earnings",
        get(report).layer(middleware::from_fn(require_admin)),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsQuery {
    #[serde(default)]
    pub time_range: TimeRange,
    /// YYYY-MM-DD, 店铺时区
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/earnings?timeRange=&startDate=&endDate=
pub async fn report(
    State(state): State<ServerState>,
    Query(query): Query<EarningsQuery>,
) -> AppResult<Json<EarningsReport>> {
    let report = state
        .reports
        .earnings(
            query.time_range,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
        )
        .await?;
    Ok(Json(report))
}
