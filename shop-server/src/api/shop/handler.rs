//! Shop Profile API Handlers

use axum::{Json, extract::State};

use crate::api::blocking;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::ShopRepository;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};
use shared::models::{Shop, ShopUpdate};

/// GET /api/shop - 获取店铺资料
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<Shop>> {
    let repo = ShopRepository::new(state.storage.clone());
    let shop = blocking(move || Ok(repo.get()?)).await?;
    Ok(Json(shop))
}

/// PUT /api/shop - 更新店铺资料
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(mut payload): Json<ShopUpdate>,
) -> AppResult<Json<Shop>> {
    if let Some(name) = &mut payload.name {
        *name = name.trim().to_string();
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.logo, "logo", MAX_URL_LEN)?;
    validate_optional_text(&payload.opening_hours, "openingHours", MAX_NAME_LEN)?;

    let repo = ShopRepository::new(state.storage.clone());
    let shop = blocking(move || Ok(repo.update(payload)?)).await?;

    tracing::info!(admin = %user.username, shop = %shop.name, "Shop profile updated");
    Ok(Json(shop))
}
