//! Customers API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::blocking;
use crate::core::ServerState;
use crate::db::repository::CustomerRepository;
use crate::utils::{AppError, AppResult};
use shared::client::CustomerDetail;
use shared::models::CustomerSummary;
use shared::{ErrorCode, PageRequest, PaginatedResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    /// Name or phone substring
    pub q: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// GET /api/customers - 顾客列表 (最近活跃优先)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<PaginatedResponse<CustomerSummary>>> {
    let page = PageRequest::new(query.page, query.page_size, state.config.dashboard_page_size);
    let repo = CustomerRepository::new(state.storage.clone());
    let customers = blocking(move || Ok(repo.search(query.q.as_deref())?)).await?;
    Ok(Json(page.apply(customers)))
}

/// GET /api/customers/:id - 顾客详情与各品类进度
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CustomerDetail>> {
    let repo = CustomerRepository::new(state.storage.clone());
    let customer = blocking(move || Ok(repo.find_by_id(id)?))
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::CustomerNotFound, format!("Customer {} not found", id))
                .with_detail("customerId", id)
        })?;

    Ok(Json(CustomerDetail {
        rewards: customer.reward_records(),
        customer,
    }))
}
