//! Admin & Shop Models (single-tenant singletons)

use serde::{Deserialize, Serialize};

/// Back-office administrator
///
/// Stored as-is; clients only ever see [`crate::client::AdminInfo`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: i64,
    #[serde(default)]
    pub last_login_at: Option<i64>,
}

/// Shop profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Logo URL
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub updated_at: i64,
}

/// Update shop payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<String>,
    pub opening_hours: Option<String>,
}

impl Shop {
    pub fn apply(&mut self, data: ShopUpdate, now: i64) {
        if let Some(name) = data.name {
            self.name = name;
        }
        if data.address.is_some() {
            self.address = data.address;
        }
        if data.phone.is_some() {
            self.phone = data.phone;
        }
        if data.logo.is_some() {
            self.logo = data.logo;
        }
        if data.opening_hours.is_some() {
            self.opening_hours = data.opening_hours;
        }
        self.updated_at = now;
    }
}
