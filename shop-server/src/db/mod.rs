//! Database Module
//!
//! Embedded redb store plus thin per-collection repositories

pub mod repository;
pub mod storage;

pub use storage::{ShopStorage, StorageError, StorageResult};
