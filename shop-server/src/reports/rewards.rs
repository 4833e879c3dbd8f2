//! Rewards listing

use serde::{Deserialize, Serialize};
use shared::client::CustomerRewards;
use shared::models::{Customer, RewardStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardStats {
    /// Σ rewardsEarned
    pub total_rewards_given: u64,
    /// Customers with at least one category counter
    pub customers_with_rewards: u64,
    /// Σ pending over "ready" categories
    pub ready_rewards: i64,
    pub upcoming_categories: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsReport {
    pub customers: Vec<CustomerRewards>,
    pub stats: RewardStats,
}

/// Per-customer reward records, most recently active first
pub fn summarize(customers: &[Customer]) -> RewardsReport {
    let mut sorted: Vec<&Customer> = customers.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

    let mut stats = RewardStats::default();
    let listed: Vec<CustomerRewards> = sorted
        .into_iter()
        .map(|customer| {
            let rewards = CustomerRewards::from_customer(customer);
            stats.total_rewards_given += u64::from(rewards.rewards_earned);
            if !rewards.categories.is_empty() {
                stats.customers_with_rewards += 1;
            }
            for record in &rewards.categories {
                match record.status {
                    RewardStatus::Ready => stats.ready_rewards += record.pending,
                    RewardStatus::Upcoming => stats.upcoming_categories += 1,
                    _ => {}
                }
            }
            rewards
        })
        .collect();

    RewardsReport {
        customers: listed,
        stats,
    }
}
