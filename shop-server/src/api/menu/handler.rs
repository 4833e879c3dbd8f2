//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::blocking;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::MenuItemRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_price,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::ErrorCode;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

fn menu_item_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {} not found", id))
        .with_detail("itemId", id)
}

/// GET /api/menu - 在售商品 (可按分类过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.storage.clone());
    let category = query
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let items = blocking(move || Ok(repo.find_active(category.as_deref())?)).await?;
    Ok(Json(items))
}

/// GET /api/menu/categories - 在售分类
pub async fn categories(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let repo = MenuItemRepository::new(state.storage.clone());
    let categories = blocking(move || Ok(repo.categories()?)).await?;
    Ok(Json(categories))
}

/// GET /api/menu/:id - 单个商品 (下架商品对外不可见)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.storage.clone());
    let item = blocking(move || Ok(repo.find_by_id(id)?))
        .await?
        .filter(|i| i.is_active)
        .ok_or_else(|| menu_item_not_found(id))?;
    Ok(Json(item))
}

/// GET /api/menu/all - 全部商品 (含下架)
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.storage.clone());
    let items = blocking(move || Ok(repo.find_all_with_inactive()?)).await?;
    Ok(Json(items))
}

/// POST /api/menu - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(mut payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    payload.name = payload.name.trim().to_string();
    payload.category = payload.category.trim().to_string();
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;
    validate_price(payload.price, "price")?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let repo = MenuItemRepository::new(state.storage.clone());
    let item = blocking(move || Ok(repo.create(payload)?)).await?;

    tracing::info!(
        admin = %user.username,
        item_id = %item.id,
        name = %item.name,
        category = %item.category,
        "Menu item created"
    );
    Ok(Json(item))
}

/// PUT /api/menu/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(mut payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    if let Some(name) = &mut payload.name {
        *name = name.trim().to_string();
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(category) = &mut payload.category {
        *category = category.trim().to_string();
        validate_required_text(category, "category", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let repo = MenuItemRepository::new(state.storage.clone());
    let item = blocking(move || {
        if repo.find_by_id(id)?.is_none() {
            return Err(menu_item_not_found(id));
        }
        Ok(repo.update(id, payload)?)
    })
    .await?;

    tracing::info!(admin = %user.username, item_id = %id, "Menu item updated");
    Ok(Json(item))
}

/// DELETE /api/menu/:id - 下架商品 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = MenuItemRepository::new(state.storage.clone());
    let deleted = blocking(move || Ok(repo.delete(id)?)).await?;

    if deleted {
        tracing::info!(admin = %user.username, item_id = %id, "Menu item deactivated");
    }
    Ok(Json(deleted))
}
