//! Dashboard summary

use serde::{Deserialize, Serialize};
use shared::models::{Customer, DRINKS_PER_REWARD};
use shared::{PageRequest, PaginatedResponse};

/// A customer is "close to a reward" on the dashboard when their order count
/// sits one short of a multiple of this. Category-blind, unlike the
/// per-category `upcoming` status.
const DASHBOARD_REWARD_CYCLE: u32 = DRINKS_PER_REWARD + 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_customers: u64,
    pub total_drinks_sold: u64,
    pub total_rewards_earned: u64,
    pub upcoming_rewards: u64,
    pub recent_customers: PaginatedResponse<RecentCustomer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCustomer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub total_orders: u32,
    pub rewards_earned: u32,
    pub drinks_until_reward: u32,
    pub updated_at: i64,
}

impl From<&Customer> for RecentCustomer {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            phone: c.phone.clone(),
            total_orders: c.total_orders,
            rewards_earned: c.rewards_earned,
            drinks_until_reward: drinks_until_reward(c),
            updated_at: c.updated_at,
        }
    }
}

/// Drinks until the next reward from aggregate figures, across categories
///
/// Paid drinks already "spent" on rewards are subtracted first. The
/// difference goes negative when a POS reward purchase (`isReward` on
/// `POST /api/orders`) was recorded without enough paid history, since
/// that path skips the pending check. The remainder is Euclidean so
/// such customers still land in `1..=5` instead of underflowing.
pub fn drinks_until_reward(customer: &Customer) -> u32 {
    let per_reward = i64::from(DRINKS_PER_REWARD);
    let effective_paid = i64::from(customer.paid_order_count())
        - i64::from(customer.rewards_earned) * per_reward;
    let rem = effective_paid.rem_euclid(per_reward);
    if rem == 0 && effective_paid > 0 {
        0
    } else {
        (per_reward - rem) as u32
    }
}

pub fn summarize(customers: &[Customer], page: PageRequest) -> DashboardSummary {
    let total_drinks_sold = customers.iter().map(|c| u64::from(c.total_orders)).sum();
    let total_rewards_earned = customers.iter().map(|c| u64::from(c.rewards_earned)).sum();
    let upcoming_rewards = customers
        .iter()
        .filter(|c| c.total_orders % DASHBOARD_REWARD_CYCLE == DASHBOARD_REWARD_CYCLE - 1)
        .count() as u64;

    let mut recent: Vec<&Customer> = customers.iter().collect();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
    let recent: Vec<RecentCustomer> = recent.into_iter().map(RecentCustomer::from).collect();

    DashboardSummary {
        total_customers: customers.len() as u64,
        total_drinks_sold,
        total_rewards_earned,
        upcoming_rewards,
        recent_customers: page.apply(recent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Order;

    fn customer(id: i64, paid: u32, rewards: u32, updated_at: i64) -> Customer {
        let mut c = Customer::new(id, format!("C{id}"), format!("{id}"), 0);
        for _ in 0..paid {
            c.push_order(Order::paid("Juice", 1, "OJ", 4.0, 1), updated_at);
        }
        for _ in 0..rewards {
            c.push_order(Order::claim("Juice", 2), updated_at);
            c.rewards_earned += 1;
        }
        c.updated_at = updated_at;
        c
    }

    #[test]
    fn test_drinks_until_reward() {
        assert_eq!(drinks_until_reward(&customer(1, 0, 0, 0)), 5);
        assert_eq!(drinks_until_reward(&customer(1, 3, 0, 0)), 2);
        assert_eq!(drinks_until_reward(&customer(1, 5, 0, 0)), 0);
        assert_eq!(drinks_until_reward(&customer(1, 5, 1, 0)), 5);
        assert_eq!(drinks_until_reward(&customer(1, 7, 1, 0)), 3);
        // More rewards than paid history: -3 rem_euclid 5 = 2
        assert_eq!(drinks_until_reward(&customer(1, 2, 1, 0)), 3);
        assert_eq!(drinks_until_reward(&customer(1, 0, 2, 0)), 5);
    }

    #[test]
    fn test_drinks_until_reward_after_unchecked_pos_reward() {
        use crate::db::ShopStorage;
        use crate::loyalty::{PurchaseInput, RewardLedger};

        let ledger = RewardLedger::new(ShopStorage::open_in_memory().unwrap());
        let purchase = |is_reward: bool| PurchaseInput {
            customer_name: "Ana".into(),
            customer_phone: "700".into(),
            category: "Juice".into(),
            item_id: Some(1),
            item_name: "OJ".into(),
            price: if is_reward { 0.0 } else { 4.0 },
            is_reward,
            date: None,
        };
        ledger.record_purchase(purchase(false)).unwrap();
        ledger.record_purchase(purchase(false)).unwrap();
        // Reward recorded at the counter with nothing pending
        let out = ledger.record_purchase(purchase(true)).unwrap();

        assert_eq!(out.customer.paid_order_count(), 2);
        assert_eq!(out.customer.rewards_earned, 1);
        assert_eq!(drinks_until_reward(&out.customer), 3);
    }

    #[test]
    fn test_summary_totals_and_heuristic() {
        let customers = vec![
            customer(1, 5, 0, 10),  // 5 orders -> upcoming
            customer(2, 10, 1, 30), // 11 orders -> upcoming
            customer(3, 4, 0, 20),  // 4 orders
        ];
        let summary = summarize(&customers, PageRequest::new(None, None, 10));
        assert_eq!(summary.total_customers, 3);
        assert_eq!(summary.total_drinks_sold, 20);
        assert_eq!(summary.total_rewards_earned, 1);
        assert_eq!(summary.upcoming_rewards, 2);

        let ids: Vec<i64> = summary.recent_customers.data.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_recent_customers_paginate() {
        let customers: Vec<Customer> = (1..=25).map(|i| customer(i, 1, 0, i)).collect();
        let summary = summarize(&customers, PageRequest::new(Some(3), Some(10), 10));
        assert_eq!(summary.recent_customers.total, 25);
        assert_eq!(summary.recent_customers.total_pages, 3);
        assert_eq!(summary.recent_customers.data.len(), 5);
        assert_eq!(summary.recent_customers.data[0].id, 5);
    }
}
