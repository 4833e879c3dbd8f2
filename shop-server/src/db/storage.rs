//! redb-based document store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `customers` | customer id | `Customer` (JSON) | Customer documents with embedded orders |
//! | `phone_index` | normalized phone | customer id | Natural-key lookup, unique |
//! | `menu_items` | item id | `MenuItem` (JSON) | Catalog |
//! | `admins` | username | `Admin` (JSON) | Back-office accounts |
//! | `settings` | key | JSON | Singletons (shop profile) |
//!
//! # Transactions
//!
//! redb admits a single write transaction at a time; `begin_write` blocks
//! until the previous writer commits or aborts. Every loyalty mutation runs its
//! read-modify-write inside one write transaction, so phone dedup and counter
//! updates never interleave. Readers get MVCC snapshots and never block.

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, ReadableTableMetadata,
    TableDefinition, WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{Admin, Customer, MenuItem, Shop};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// key = customer id, value = JSON-serialized Customer
const CUSTOMERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("customers");

/// key = normalized phone, value = customer id
const PHONE_INDEX_TABLE: TableDefinition<&str, i64> = TableDefinition::new("phone_index");

/// key = menu item id, value = JSON-serialized MenuItem
const MENU_ITEMS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("menu_items");

/// key = username, value = JSON-serialized Admin
const ADMINS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("admins");

/// key = setting name, value = JSON
const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

const SHOP_KEY: &str = "shop";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Phone {phone} already belongs to customer {existing}")]
    PhoneTaken { phone: String, existing: i64 },
}

pub type StorageResult<T> = Result<T, StorageError>;

fn encode<T: Serialize>(value: &T) -> StorageResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Shop storage backed by redb
#[derive(Clone)]
pub struct ShopStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for ShopStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopStorage").finish_non_exhaustive()
    }
}

impl ShopStorage {
    /// Open or create the database at the given path
    ///
    /// The parent directory is created if missing. redb commits with
    /// `Durability::Immediate` by default, so a returned `commit()` is on disk.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init_tables(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(db)
    }

    fn init_tables(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CUSTOMERS_TABLE)?;
            let _ = write_txn.open_table(PHONE_INDEX_TABLE)?;
            let _ = write_txn.open_table(MENU_ITEMS_TABLE)?;
            let _ = write_txn.open_table(ADMINS_TABLE)?;
            let _ = write_txn.open_table(SETTINGS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction (blocks while another writer is active)
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction (snapshot)
    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    /// Liveness check for the health endpoint
    pub fn check(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CUSTOMERS_TABLE)?;
        Ok(table.len()?)
    }

    // ========== Customer Operations (within transaction) ==========

    /// Resolve a normalized phone to a customer id
    pub fn customer_id_by_phone_txn(
        &self,
        txn: &WriteTransaction,
        phone: &str,
    ) -> StorageResult<Option<i64>> {
        let table = txn.open_table(PHONE_INDEX_TABLE)?;
        Ok(table.get(phone)?.map(|g| g.value()))
    }

    pub fn get_customer_txn(
        &self,
        txn: &WriteTransaction,
        id: i64,
    ) -> StorageResult<Option<Customer>> {
        let table = txn.open_table(CUSTOMERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Write a customer document and keep the phone index pointing at it
    ///
    /// Fails with [`StorageError::PhoneTaken`] if the phone is indexed to a
    /// different customer.
    pub fn put_customer_txn(&self, txn: &WriteTransaction, customer: &Customer) -> StorageResult<()> {
        {
            let mut index = txn.open_table(PHONE_INDEX_TABLE)?;
            let existing = index.get(customer.phone.as_str())?.map(|g| g.value());
            match existing {
                Some(id) if id != customer.id => {
                    return Err(StorageError::PhoneTaken {
                        phone: customer.phone.clone(),
                        existing: id,
                    });
                }
                Some(_) => {}
                None => {
                    index.insert(customer.phone.as_str(), customer.id)?;
                }
            }
        }

        let bytes = encode(customer)?;
        let mut table = txn.open_table(CUSTOMERS_TABLE)?;
        table.insert(customer.id, bytes.as_slice())?;
        Ok(())
    }

    /// All customers visible to a write transaction
    pub fn all_customers_txn(&self, txn: &WriteTransaction) -> StorageResult<Vec<Customer>> {
        let table = txn.open_table(CUSTOMERS_TABLE)?;
        let mut customers = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            customers.push(decode(value.value())?);
        }
        Ok(customers)
    }

    // ========== Customer Operations (read-only) ==========

    pub fn get_customer(&self, id: i64) -> StorageResult<Option<Customer>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CUSTOMERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn find_customer_by_phone(&self, phone: &str) -> StorageResult<Option<Customer>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(PHONE_INDEX_TABLE)?;
        let Some(id) = index.get(phone)?.map(|g| g.value()) else {
            return Ok(None);
        };
        let table = read_txn.open_table(CUSTOMERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Snapshot of every customer document
    pub fn all_customers(&self) -> StorageResult<Vec<Customer>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CUSTOMERS_TABLE)?;

        let mut customers = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            customers.push(decode(value.value())?);
        }
        Ok(customers)
    }

    pub fn customer_count(&self) -> StorageResult<u64> {
        self.check()
    }

    // ========== Menu Operations ==========

    pub fn get_menu_item(&self, id: i64) -> StorageResult<Option<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_ITEMS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn all_menu_items(&self) -> StorageResult<Vec<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_ITEMS_TABLE)?;

        let mut items = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            items.push(decode(value.value())?);
        }
        Ok(items)
    }

    pub fn put_menu_item(&self, item: &MenuItem) -> StorageResult<()> {
        let bytes = encode(item)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;
            table.insert(item.id, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========== Admin Operations ==========

    pub fn get_admin(&self, username: &str) -> StorageResult<Option<Admin>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ADMINS_TABLE)?;
        match table.get(username)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_admin(&self, admin: &Admin) -> StorageResult<()> {
        let bytes = encode(admin)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ADMINS_TABLE)?;
            table.insert(admin.username.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn admin_count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ADMINS_TABLE)?;
        Ok(table.len()?)
    }

    // ========== Shop Profile ==========

    pub fn get_shop(&self) -> StorageResult<Option<Shop>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;
        match table.get(SHOP_KEY)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_shop(&self, shop: &Shop) -> StorageResult<()> {
        let bytes = encode(shop)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SETTINGS_TABLE)?;
            table.insert(SHOP_KEY, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }
}
