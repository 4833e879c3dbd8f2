//! Rewards API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::api::blocking;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::reports::RewardsReport;
use crate::utils::{AppError, AppResult};
use shared::ErrorCode;
use shared::client::{ClaimRequest, ClaimResponse, CustomerRewards, RebuildSummary};

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub phone: String,
}

/// GET /api/rewards/lookup?phone= - 顾客奖励进度
pub async fn lookup(
    State(state): State<ServerState>,
    Query(query): Query<LookupQuery>,
) -> AppResult<Json<CustomerRewards>> {
    let rewards = state
        .reports
        .rewards_by_phone(&query.phone)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::CustomerNotFound, "No customer with this phone")
        })?;
    Ok(Json(rewards))
}

/// GET /api/rewards - 全部顾客的奖励记录与统计
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<RewardsReport>> {
    Ok(Json(state.reports.rewards().await))
}

/// POST /api/rewards/claim - 兑换一杯免费饮品
pub async fn claim(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ClaimRequest>,
) -> AppResult<Json<ClaimResponse>> {
    let ledger = state.ledger.clone();
    let response =
        blocking(move || Ok(ledger.claim_reward(req.customer_id, &req.category)?)).await?;

    tracing::info!(
        admin = %user.username,
        customer_id = %response.customer.id,
        category = %response.category,
        "Reward claim approved"
    );
    Ok(Json(response))
}

/// POST /api/rewards/rebuild - 根据订单历史重建奖励计数
pub async fn rebuild(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<RebuildSummary>> {
    tracing::info!(admin = %user.username, "Reward counter rebuild requested");
    let ledger = state.ledger.clone();
    let summary = blocking(move || Ok(ledger.rebuild_rewards()?)).await?;
    Ok(Json(summary))
}
