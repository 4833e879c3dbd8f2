//! Customer Model

use serde::{Deserialize, Serialize};

use super::reward::{CategoryReward, RewardMap};

/// A single drink transaction, embedded in its customer
///
/// Name, category and price are copied at purchase time so history stays
/// stable when the menu item later changes or disappears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub drink_type: String,
    pub item_name: String,
    /// Menu item reference; `None` for reward orders
    #[serde(default)]
    pub item_id: Option<i64>,
    pub price: f64,
    pub date: i64,
    #[serde(default)]
    pub is_reward: bool,
    /// Always `true`; stored for compatibility with existing documents
    #[serde(default = "default_true")]
    pub claimed: bool,
}

fn default_true() -> bool {
    true
}

impl Order {
    /// Paid purchase of a menu item
    pub fn paid(
        drink_type: impl Into<String>,
        item_id: i64,
        item_name: impl Into<String>,
        price: f64,
        date: i64,
    ) -> Self {
        Self {
            drink_type: drink_type.into(),
            item_name: item_name.into(),
            item_id: Some(item_id),
            price,
            date,
            is_reward: false,
            claimed: true,
        }
    }

    /// Free drink: no item reference, zero price
    pub fn redemption(drink_type: impl Into<String>, item_name: impl Into<String>, date: i64) -> Self {
        Self {
            drink_type: drink_type.into(),
            item_name: item_name.into(),
            item_id: None,
            price: 0.0,
            date,
            is_reward: true,
            claimed: true,
        }
    }

    /// Synthetic order appended by a reward claim
    pub fn claim(category: &str, date: i64) -> Self {
        Self::redemption(category, format!("{category} (Reward)"), date)
    }
}

/// Customer document (found-or-created by phone on first purchase)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub orders: Vec<Order>,
    /// Always `orders.len()`
    #[serde(default)]
    pub total_orders: u32,
    /// Reward orders ever created (claims), not rewards currently available
    #[serde(default)]
    pub rewards_earned: u32,
    #[serde(default)]
    pub rewards: RewardMap,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Customer {
    pub fn new(id: i64, name: impl Into<String>, phone: impl Into<String>, now: i64) -> Self {
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            orders: Vec::new(),
            total_orders: 0,
            rewards_earned: 0,
            rewards: RewardMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append an order and keep `total_orders` in lockstep
    pub fn push_order(&mut self, order: Order, now: i64) {
        self.orders.push(order);
        self.total_orders = self.orders.len() as u32;
        self.updated_at = now;
    }

    pub fn paid_order_count(&self) -> u32 {
        self.orders.iter().filter(|o| !o.is_reward).count() as u32
    }

    pub fn reward_order_count(&self) -> u32 {
        self.orders.iter().filter(|o| o.is_reward).count() as u32
    }

    /// Derived reward records for every category
    pub fn reward_records(&self) -> Vec<CategoryReward> {
        self.rewards.records()
    }

    /// Re-derive `total_orders` from the order list (documents written by
    /// older tools may carry a stale count)
    pub fn sync_total_orders(&mut self) -> bool {
        let actual = self.orders.len() as u32;
        let changed = self.total_orders != actual;
        self.total_orders = actual;
        changed
    }
}

/// Customer without the order history (list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub total_orders: u32,
    pub rewards_earned: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Customer> for CustomerSummary {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            phone: c.phone.clone(),
            total_orders: c.total_orders,
            rewards_earned: c.rewards_earned,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
