//! Repository Module
//!
//! CRUD operations over the redb collections. Loyalty mutations do not go
//! through here; they belong to [`crate::loyalty::RewardLedger`].

pub mod admin;
pub mod customer;
pub mod menu_item;
pub mod shop;

// Re-exports
pub use admin::AdminRepository;
pub use customer::CustomerRepository;
pub use menu_item::MenuItemRepository;
pub use shop::ShopRepository;

use shared::error::AppError;
use thiserror::Error;

use crate::db::storage::StorageError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<StorageError> for RepoError {
    fn from(err: StorageError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::already_exists(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
