//! Menu Item Repository

use super::{RepoError, RepoResult};
use crate::db::ShopStorage;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::util::{now_millis, snowflake_id};

#[derive(Clone, Debug)]
pub struct MenuItemRepository {
    storage: ShopStorage,
}

impl MenuItemRepository {
    pub fn new(storage: ShopStorage) -> Self {
        Self { storage }
    }

    /// Active items ordered by category then name, optionally filtered by category
    pub fn find_active(&self, category: Option<&str>) -> RepoResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self
            .storage
            .all_menu_items()?
            .into_iter()
            .filter(|i| i.is_active)
            .filter(|i| category.is_none_or(|c| i.category == c))
            .collect();
        sort_items(&mut items);
        Ok(items)
    }

    /// All items (including inactive)
    pub fn find_all_with_inactive(&self) -> RepoResult<Vec<MenuItem>> {
        let mut items = self.storage.all_menu_items()?;
        sort_items(&mut items);
        Ok(items)
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<MenuItem>> {
        Ok(self.storage.get_menu_item(id)?)
    }

    /// Distinct categories of active items, sorted
    pub fn categories(&self) -> RepoResult<Vec<String>> {
        let mut categories: Vec<String> = self
            .find_active(None)?
            .into_iter()
            .map(|i| i.category)
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    pub fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let duplicate = self
            .storage
            .all_menu_items()?
            .into_iter()
            .any(|i| i.is_active && i.name.eq_ignore_ascii_case(data.name.trim()));
        if duplicate {
            return Err(RepoError::Duplicate(format!("Menu item '{}'", data.name)));
        }

        let item = MenuItem::from_create(snowflake_id(), data, now_millis());
        self.storage.put_menu_item(&item)?;
        Ok(item)
    }

    pub fn update(&self, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let mut item = self
            .find_by_id(id)?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {}", id)))?;
        item.apply(data, now_millis());
        self.storage.put_menu_item(&item)?;
        Ok(item)
    }

    /// Soft delete: the item keeps resolving for order history
    pub fn delete(&self, id: i64) -> RepoResult<bool> {
        let Some(mut item) = self.find_by_id(id)? else {
            return Ok(false);
        };
        if !item.is_active {
            return Ok(false);
        }
        item.is_active = false;
        item.updated_at = now_millis();
        self.storage.put_menu_item(&item)?;
        Ok(true)
    }
}

fn sort_items(items: &mut [MenuItem]) {
    items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
}
