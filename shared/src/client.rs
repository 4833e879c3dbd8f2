//! Request/response DTOs shared between the shop server and its clients

use serde::{Deserialize, Serialize};

use crate::models::{Admin, CategoryReward, Customer, RewardStatus};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Admin login request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Human-verification token from the login form widget
    #[serde(default)]
    pub verification_token: Option<String>,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub admin: AdminInfo,
}

/// Admin as seen by clients (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminInfo {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub last_login_at: Option<i64>,
}

impl From<&Admin> for AdminInfo {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            last_login_at: admin.last_login_at,
        }
    }
}

// =============================================================================
// Order / Reward API DTOs
// =============================================================================

/// POS checkout request (one drink)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub customer_name: String,
    pub customer_phone: String,
    /// Required for paid purchases
    #[serde(default)]
    pub item_id: Option<i64>,
    /// Drink category; for paid purchases defaults to the menu item's category
    #[serde(default)]
    pub drink_type: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_reward: bool,
}

/// Checkout result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub customer: Customer,
    pub is_reward: bool,
    pub is_new_customer: bool,
    /// Derived progress for the purchased category
    pub reward: CategoryReward,
}

/// Claim one pending reward
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub customer_id: i64,
    pub category: String,
}

/// Claim result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub customer: Customer,
    pub category: String,
    pub reward: CategoryReward,
}

/// Counter rebuild summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildSummary {
    pub customers_scanned: u32,
    pub customers_updated: u32,
    pub counters_rebuilt: u32,
}

/// One customer's reward progress, all categories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRewards {
    pub customer_id: i64,
    pub name: String,
    pub phone: String,
    pub total_orders: u32,
    pub rewards_earned: u32,
    pub categories: Vec<CategoryReward>,
}

impl CustomerRewards {
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            customer_id: customer.id,
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            total_orders: customer.total_orders,
            rewards_earned: customer.rewards_earned,
            categories: customer.reward_records(),
        }
    }

    pub fn count_status(&self, status: RewardStatus) -> usize {
        self.categories.iter().filter(|c| c.status == status).count()
    }
}

/// Customer detail (admin view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetail {
    pub customer: Customer,
    pub rewards: Vec<CategoryReward>,
}

/// Image upload result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub size: u64,
}
