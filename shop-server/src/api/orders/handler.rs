//! Orders API Handlers

use axum::{Json, extract::State};

use crate::api::blocking;
use crate::core::ServerState;
use crate::db::repository::MenuItemRepository;
use crate::loyalty::PurchaseInput;
use crate::utils::validation::validate_price;
use crate::utils::{AppError, AppResult};
use shared::ErrorCode;
use shared::client::{PurchaseRequest, PurchaseResponse};
use shared::models::MenuItem;

/// Resolve the referenced menu item
///
/// Paid purchases need an active item; reward purchases only use it to fill
/// in a missing category or name.
fn resolve_item(
    repo: &MenuItemRepository,
    item_id: Option<i64>,
    is_reward: bool,
) -> AppResult<Option<MenuItem>> {
    let Some(id) = item_id else {
        if is_reward {
            return Ok(None);
        }
        return Err(AppError::new(ErrorCode::ItemReferenceRequired));
    };

    match repo.find_by_id(id)? {
        Some(item) if item.is_active || is_reward => Ok(Some(item)),
        Some(item) => Err(AppError::with_message(
            ErrorCode::MenuItemInactive,
            format!("Menu item '{}' is not available", item.name),
        )
        .with_detail("itemId", id)),
        None if is_reward => Ok(None),
        None => Err(AppError::with_message(
            ErrorCode::MenuItemNotFound,
            format!("Menu item {} not found", id),
        )
        .with_detail("itemId", id)),
    }
}

/// Build the ledger input; request fields win over catalog values
fn purchase_input(req: PurchaseRequest, item: Option<MenuItem>) -> AppResult<PurchaseInput> {
    let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let category = non_empty(req.drink_type)
        .or_else(|| item.as_ref().map(|i| i.category.clone()))
        .ok_or_else(|| AppError::required("drinkType"))?;

    let item_name = non_empty(req.item_name)
        .or_else(|| item.as_ref().map(|i| i.name.clone()))
        .unwrap_or_else(|| format!("{category} (Reward)"));

    let price = if req.is_reward {
        0.0
    } else {
        let price = req
            .price
            .or_else(|| item.as_ref().map(|i| i.price))
            .ok_or_else(|| AppError::required("price"))?;
        validate_price(price, "price")?;
        price
    };

    Ok(PurchaseInput {
        customer_name: req.customer_name,
        customer_phone: req.customer_phone,
        category,
        item_id: if req.is_reward { None } else { req.item_id },
        item_name,
        price,
        is_reward: req.is_reward,
        date: None,
    })
}

/// POST /api/orders - 记录一杯饮品 (付费或兑换)
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<PurchaseRequest>,
) -> AppResult<Json<PurchaseResponse>> {
    let repo = MenuItemRepository::new(state.storage.clone());
    let ledger = state.ledger.clone();

    let response = blocking(move || {
        let item = resolve_item(&repo, req.item_id, req.is_reward)?;
        let input = purchase_input(req, item)?;
        Ok(ledger.record_purchase(input)?)
    })
    .await?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ShopStorage;
    use shared::models::MenuItemCreate;

    fn request(item_id: Option<i64>, is_reward: bool) -> PurchaseRequest {
        PurchaseRequest {
            customer_name: "Ana".into(),
            customer_phone: "600".into(),
            item_id,
            drink_type: None,
            item_name: None,
            price: None,
            is_reward,
        }
    }

    fn repo_with_item(active: bool) -> (MenuItemRepository, MenuItem) {
        let repo = MenuItemRepository::new(ShopStorage::open_in_memory().unwrap());
        let item = repo
            .create(MenuItemCreate {
                name: "Classic Mojito".into(),
                category: "Mojito".into(),
                price: 50.0,
                image: None,
                description: None,
            })
            .unwrap();
        if !active {
            repo.delete(item.id).unwrap();
        }
        (repo, item)
    }

    #[test]
    fn test_paid_purchase_requires_active_item() {
        let (repo, item) = repo_with_item(false);
        let err = resolve_item(&repo, Some(item.id), false).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemInactive);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let err = resolve_item(&repo, None, false).unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemReferenceRequired);

        let err = resolve_item(&repo, Some(424242), false).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);
    }

    #[test]
    fn test_reward_purchase_tolerates_missing_item() {
        let (repo, item) = repo_with_item(false);
        assert!(resolve_item(&repo, None, true).unwrap().is_none());
        assert!(resolve_item(&repo, Some(item.id), true).unwrap().is_some());
        assert!(resolve_item(&repo, Some(424242), true).unwrap().is_none());
    }

    #[test]
    fn test_input_falls_back_to_catalog() {
        let (_, item) = repo_with_item(true);
        let input = purchase_input(request(Some(item.id), false), Some(item.clone())).unwrap();
        assert_eq!(input.category, "Mojito");
        assert_eq!(input.item_name, "Classic Mojito");
        assert_eq!(input.price, 50.0);
        assert_eq!(input.item_id, Some(item.id));
    }

    #[test]
    fn test_input_keeps_caller_values() {
        let (_, item) = repo_with_item(true);
        let mut req = request(Some(item.id), false);
        req.price = Some(45.0);
        req.drink_type = Some(" Juice ".into());
        req.item_name = Some("Happy hour mojito".into());
        let input = purchase_input(req, Some(item)).unwrap();
        assert_eq!(input.price, 45.0);
        assert_eq!(input.category, "Juice");
        assert_eq!(input.item_name, "Happy hour mojito");
    }

    #[test]
    fn test_reward_input_shape() {
        let mut req = request(Some(7), true);
        req.drink_type = Some("Juice".into());
        req.price = Some(9.0);
        let input = purchase_input(req, None).unwrap();
        assert_eq!(input.price, 0.0);
        assert_eq!(input.item_id, None);
        assert_eq!(input.item_name, "Juice (Reward)");

        let err = purchase_input(request(None, true), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[test]
    fn test_paid_input_rejects_bad_price() {
        let mut req = request(Some(1), false);
        req.drink_type = Some("Juice".into());
        req.item_name = Some("OJ".into());
        req.price = Some(-1.0);
        let err = purchase_input(req, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAmount);
    }
}
