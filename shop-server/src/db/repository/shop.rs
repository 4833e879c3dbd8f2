//! Shop Profile Repository

use super::RepoResult;
use crate::db::ShopStorage;
use shared::models::{Shop, ShopUpdate};
use shared::util::now_millis;

const DEFAULT_SHOP_NAME: &str = "Juice Shop";

#[derive(Clone, Debug)]
pub struct ShopRepository {
    storage: ShopStorage,
}

impl ShopRepository {
    pub fn new(storage: ShopStorage) -> Self {
        Self { storage }
    }

    /// Current profile, or an unsaved default if none was ever written
    pub fn get(&self) -> RepoResult<Shop> {
        Ok(self.storage.get_shop()?.unwrap_or_else(|| Shop {
            name: DEFAULT_SHOP_NAME.to_string(),
            ..Default::default()
        }))
    }

    pub fn update(&self, data: ShopUpdate) -> RepoResult<Shop> {
        let mut shop = self.get()?;
        shop.apply(data, now_millis());
        self.storage.put_shop(&shop)?;
        Ok(shop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_persists_over_default() {
        let repo = ShopRepository::new(ShopStorage::open_in_memory().unwrap());
        assert_eq!(repo.get().unwrap().name, DEFAULT_SHOP_NAME);

        let shop = repo
            .update(ShopUpdate {
                address: Some("1 Main St".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(shop.name, DEFAULT_SHOP_NAME);
        assert_eq!(repo.get().unwrap().address.as_deref(), Some("1 Main St"));
    }
}
