//! Read-side reporters
//!
//! Every report is recomputed per request from one read snapshot of the
//! customer collection and never writes. The snapshot load runs on the
//! blocking pool under `REPORT_TIMEOUT_MS`; admin reports degrade to empty
//! data on timeout or store error, the public phone lookup does not.

pub mod dashboard;
pub mod earnings;
pub mod rewards;

use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;
use shared::PageRequest;
use shared::client::CustomerRewards;
use shared::models::Customer;
use shared::util::{normalize_phone, now_millis};

use crate::db::{ShopStorage, StorageError};
use crate::utils::time::{self, TimeRange};
use crate::utils::{AppError, AppResult};

pub use dashboard::{DashboardSummary, RecentCustomer};
pub use earnings::{CustomerSpend, EarningsReport, ItemRevenue, PeriodEarnings};
pub use rewards::{RewardStats, RewardsReport};

/// Why a snapshot load produced nothing
#[derive(Debug, Error)]
enum LoadFailure {
    #[error("timed out")]
    TimedOut(#[from] tokio::time::error::Elapsed),

    #[error(transparent)]
    Store(#[from] StorageError),

    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

/// Report entry point shared by the dashboard, rewards and earnings APIs
#[derive(Clone, Debug)]
pub struct ReportService {
    storage: ShopStorage,
    timeout: Duration,
    tz: Tz,
}

impl ReportService {
    pub fn new(storage: ShopStorage, timeout: Duration, tz: Tz) -> Self {
        Self {
            storage,
            timeout,
            tz,
        }
    }

    /// Run a blocking store read on the blocking pool, bounded by the timeout
    async fn bounded<T, F>(&self, read: F) -> Result<T, LoadFailure>
    where
        T: Send + 'static,
        F: FnOnce(&ShopStorage) -> Result<T, StorageError> + Send + 'static,
    {
        let storage = self.storage.clone();
        let task = tokio::task::spawn_blocking(move || read(&storage));
        Ok(tokio::time::timeout(self.timeout, task).await???)
    }

    /// Customer snapshot; empty on failure
    async fn load_customers(&self, report: &'static str) -> Vec<Customer> {
        match self.bounded(|s| s.all_customers()).await {
            Ok(customers) => customers,
            Err(e) => {
                tracing::warn!(
                    report,
                    timeout_ms = self.timeout.as_millis() as u64,
                    error = %e,
                    "Report degraded to empty data"
                );
                Vec::new()
            }
        }
    }

    pub async fn dashboard(&self, page: PageRequest) -> DashboardSummary {
        let customers = self.load_customers("dashboard").await;
        dashboard::summarize(&customers, page)
    }

    pub async fn rewards(&self) -> RewardsReport {
        let customers = self.load_customers("rewards").await;
        rewards::summarize(&customers)
    }

    /// Earnings over a time range
    ///
    /// Fails only on a bad range/date combination; store trouble degrades.
    pub async fn earnings(
        &self,
        range: TimeRange,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> AppResult<EarningsReport> {
        let window = time::resolve_window(range, start_date, end_date, self.tz, now_millis())?;
        let customers = self.load_customers("earnings").await;
        Ok(earnings::summarize(&customers, window, self.tz))
    }

    /// Public reward lookup by phone
    ///
    /// Unlike the admin reports this surfaces store trouble, since an empty
    /// answer would read as "no such customer".
    pub async fn rewards_by_phone(&self, phone: &str) -> AppResult<Option<CustomerRewards>> {
        let phone = normalize_phone(phone);
        if phone.is_empty() {
            return Err(AppError::required("phone"));
        }

        let customer = match self.bounded(move |s| s.find_customer_by_phone(&phone)).await {
            Ok(customer) => customer,
            Err(LoadFailure::TimedOut(_)) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Reward lookup timed out"
                );
                return Err(AppError::timeout("Reward lookup timed out"));
            }
            Err(LoadFailure::Store(e)) => return Err(e.into()),
            Err(LoadFailure::Join(e)) => return Err(crate::utils::error::join_error(e)),
        };

        Ok(customer.as_ref().map(CustomerRewards::from_customer))
    }
}
