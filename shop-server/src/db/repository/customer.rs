//! Customer Repository (read side)
//!
//! Customers are created and mutated only by the reward ledger.

use super::RepoResult;
use crate::db::ShopStorage;
use shared::models::{Customer, CustomerSummary};

#[derive(Clone, Debug)]
pub struct CustomerRepository {
    storage: ShopStorage,
}

impl CustomerRepository {
    pub fn new(storage: ShopStorage) -> Self {
        Self { storage }
    }

    /// Customers sorted by most recently updated, optionally filtered by a
    /// case-insensitive substring of name or phone
    pub fn search(&self, query: Option<&str>) -> RepoResult<Vec<CustomerSummary>> {
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let mut customers: Vec<Customer> = self
            .storage
            .all_customers()?
            .into_iter()
            .filter(|c| match &needle {
                Some(q) => c.name.to_lowercase().contains(q) || c.phone.contains(q.as_str()),
                None => true,
            })
            .collect();
        customers.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(customers.iter().map(CustomerSummary::from).collect())
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<Customer>> {
        Ok(self.storage.get_customer(id)?)
    }
}
