//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    /// Drink category, also the loyalty category
    pub category: String,
    pub price: f64,
    /// Image URL
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Availability flag (soft delete)
    pub is_active: bool,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl MenuItem {
    pub fn from_create(id: i64, data: MenuItemCreate, now: i64) -> Self {
        Self {
            id,
            name: data.name,
            category: data.category,
            price: data.price,
            image: data.image.unwrap_or_default(),
            description: data.description,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update
    pub fn apply(&mut self, data: MenuItemUpdate, now: i64) {
        if let Some(name) = data.name {
            self.name = name;
        }
        if let Some(category) = data.category {
            self.category = category;
        }
        if let Some(price) = data.price {
            self.price = price;
        }
        if let Some(image) = data.image {
            self.image = image;
        }
        if data.description.is_some() {
            self.description = data.description;
        }
        if let Some(is_active) = data.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
    }
}
