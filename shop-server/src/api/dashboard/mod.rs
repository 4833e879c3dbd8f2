//! Dashboard API (管理员首页汇总)

use axum::{
    Json, Router,
    extract::{Query, State},
    middleware,
    routing::get,
};
use serde::Deserialize;

use crate::auth::require_admin;
use crate::core::ServerState;
use crate::reports::DashboardSummary;
use shared::PageRequest;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/dashboard",
        get(summary).layer(middleware::from_fn(require_admin)),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// GET /api/dashboard
///
/// 报表失败或超时时返回空汇总，不返回错误
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> Json<DashboardSummary> {
    let page = PageRequest::new(query.page, query.page_size, state.config.dashboard_page_size);
    Json(state.reports.dashboard(page).await)
}
