//! Earnings analytics
//!
//! Orders are flattened into transactions, filtered by the window, then
//! split: paid transactions feed revenue, reward transactions are only
//! counted. Amounts accumulate as `Decimal` and are rounded once at the end.

use std::collections::{BTreeMap, HashMap};

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Customer, Order};

use crate::utils::money;
use crate::utils::time::{self, TimeWindow};

/// Entries in each top-N list
const TOP_N: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsReport {
    /// `None` for an unbounded (`all`) report
    pub window: Option<TimeWindow>,
    pub total_earnings: f64,
    /// Paid orders only
    pub total_orders: u64,
    pub average_order_value: f64,
    /// Reward orders in the window, excluded from revenue
    pub total_rewards: u64,
    pub top_customers: Vec<CustomerSpend>,
    pub top_items: Vec<ItemRevenue>,
    pub earnings_by_day: Vec<PeriodEarnings>,
    pub earnings_by_month: Vec<PeriodEarnings>,
    pub earnings_by_year: Vec<PeriodEarnings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSpend {
    pub customer_id: i64,
    pub name: String,
    pub phone: String,
    pub total_spent: f64,
    pub order_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRevenue {
    pub item_name: String,
    pub category: String,
    pub revenue: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodEarnings {
    /// `YYYY-MM-DD`, `YYYY-MM` or `YYYY` in the shop timezone
    pub period: String,
    pub earnings: f64,
    pub orders: u32,
}

#[derive(Default)]
struct Tally {
    amount: Decimal,
    count: u32,
}

impl Tally {
    fn add(&mut self, price: Decimal) {
        self.amount += price;
        self.count += 1;
    }
}

/// Grouping key → tally, in key order
type Buckets = BTreeMap<String, Tally>;

fn bucket(buckets: &mut Buckets, key: Option<String>, price: Decimal) {
    if let Some(key) = key {
        buckets.entry(key).or_default().add(price);
    }
}

fn periods(buckets: Buckets) -> Vec<PeriodEarnings> {
    buckets
        .into_iter()
        .map(|(period, tally)| PeriodEarnings {
            period,
            earnings: money::to_f64(tally.amount),
            orders: tally.count,
        })
        .collect()
}

pub fn summarize(customers: &[Customer], window: Option<TimeWindow>, tz: Tz) -> EarningsReport {
    let in_window = |order: &&Order| window.is_none_or(|w| w.contains(order.date));

    let mut total = Decimal::ZERO;
    let mut total_orders = 0u64;
    let mut total_rewards = 0u64;
    let mut by_customer: Vec<(&Customer, Tally)> = Vec::new();
    let mut by_item: HashMap<(&str, &str), Tally> = HashMap::new();
    let mut by_day = Buckets::new();
    let mut by_month = Buckets::new();
    let mut by_year = Buckets::new();

    for customer in customers {
        let mut spend = Tally::default();
        for order in customer.orders.iter().filter(in_window) {
            if order.is_reward {
                total_rewards += 1;
                continue;
            }
            let price = money::to_decimal(order.price);
            total += price;
            total_orders += 1;
            spend.add(price);
            by_item
                .entry((order.item_name.as_str(), order.drink_type.as_str()))
                .or_default()
                .add(price);
            bucket(&mut by_day, time::day_key(order.date, tz), price);
            bucket(&mut by_month, time::month_key(order.date, tz), price);
            bucket(&mut by_year, time::year_key(order.date, tz), price);
        }
        if spend.count > 0 {
            by_customer.push((customer, spend));
        }
    }

    by_customer.sort_by(|a, b| b.1.amount.cmp(&a.1.amount).then(a.0.name.cmp(&b.0.name)));
    let top_customers = by_customer
        .into_iter()
        .take(TOP_N)
        .map(|(c, tally)| CustomerSpend {
            customer_id: c.id,
            name: c.name.clone(),
            phone: c.phone.clone(),
            total_spent: money::to_f64(tally.amount),
            order_count: tally.count,
        })
        .collect();

    let mut items: Vec<((&str, &str), Tally)> = by_item.into_iter().collect();
    items.sort_by(|a, b| b.1.amount.cmp(&a.1.amount).then(a.0.cmp(&b.0)));
    let top_items = items
        .into_iter()
        .take(TOP_N)
        .map(|((name, category), tally)| ItemRevenue {
            item_name: name.to_string(),
            category: category.to_string(),
            revenue: money::to_f64(tally.amount),
            quantity: tally.count,
        })
        .collect();

    let total_earnings = money::to_f64(total);
    EarningsReport {
        window,
        total_earnings,
        total_orders,
        average_order_value: money::average(total_earnings, total_orders as usize),
        total_rewards,
        top_customers,
        top_items,
        earnings_by_day: periods(by_day),
        earnings_by_month: periods(by_month),
        earnings_by_year: periods(by_year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // 2025-03-14 12:00:00 UTC
    const MAR_14: i64 = 1_741_953_600_000;
    const DAY: i64 = 86_400_000;

    fn customer(id: i64, name: &str, orders: Vec<Order>) -> Customer {
        let mut c = Customer::new(id, name, format!("{id}"), 0);
        for o in orders {
            c.push_order(o, 0);
        }
        c
    }

    #[test]
    fn test_paid_and_reward_split() {
        let customers = vec![customer(
            1,
            "Ana",
            vec![
                Order::paid("Mojito", 1, "Classic Mojito", 50.0, MAR_14),
                Order::paid("Mojito", 1, "Classic Mojito", 70.0, MAR_14),
                Order::paid("Juice", 2, "Orange Juice", 30.0, MAR_14),
                Order::claim("Mojito", MAR_14),
            ],
        )];
        let window = TimeWindow {
            start: MAR_14 - DAY,
            end: MAR_14 + DAY,
        };

        let report = summarize(&customers, Some(window), chrono_tz::UTC);
        assert_eq!(report.total_earnings, 150.0);
        assert_eq!(report.total_orders, 3);
        assert_eq!(report.total_rewards, 1);
        assert_eq!(report.average_order_value, 50.0);

        assert_eq!(report.top_items[0].item_name, "Classic Mojito");
        assert_eq!(report.top_items[0].revenue, 120.0);
        assert_eq!(report.top_items[0].quantity, 2);
        assert_eq!(report.top_items.len(), 2);

        assert_eq!(
            report.earnings_by_day,
            vec![PeriodEarnings {
                period: "2025-03-14".into(),
                earnings: 150.0,
                orders: 3,
            }]
        );
        assert_eq!(report.earnings_by_month[0].period, "2025-03");
        assert_eq!(report.earnings_by_year[0].period, "2025");
    }

    #[test]
    fn test_window_filters_orders() {
        let customers = vec![customer(
            1,
            "Ana",
            vec![
                Order::paid("Juice", 2, "OJ", 4.0, MAR_14 - 3 * DAY),
                Order::paid("Juice", 2, "OJ", 5.0, MAR_14),
                Order::claim("Juice", MAR_14 - 3 * DAY),
            ],
        )];
        let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let window = TimeWindow {
            start: time::day_start_millis(day, chrono_tz::UTC),
            end: time::day_end_millis(day, chrono_tz::UTC),
        };

        let report = summarize(&customers, Some(window), chrono_tz::UTC);
        assert_eq!(report.total_earnings, 5.0);
        assert_eq!(report.total_orders, 1);
        assert_eq!(report.total_rewards, 0);

        let all = summarize(&customers, None, chrono_tz::UTC);
        assert_eq!(all.total_earnings, 9.0);
        assert_eq!(all.total_rewards, 1);
        assert_eq!(all.earnings_by_day.len(), 2);
        assert_eq!(all.earnings_by_day[0].period, "2025-03-11");
    }

    #[test]
    fn test_day_buckets_follow_shop_timezone() {
        // 23:30 UTC on the 14th is already the 15th in Madrid
        let late = MAR_14 + 11 * 3_600_000 + 30 * 60_000;
        let customers = vec![customer(1, "Ana", vec![Order::paid("Juice", 2, "OJ", 4.0, late)])];
        let report = summarize(&customers, None, chrono_tz::Europe::Madrid);
        assert_eq!(report.earnings_by_day[0].period, "2025-03-15");
    }

    #[test]
    fn test_top_customers_ranked_and_capped() {
        let customers: Vec<Customer> = (1..=12)
            .map(|i| {
                customer(
                    i,
                    &format!("C{i:02}"),
                    vec![Order::paid("Juice", 2, "OJ", i as f64, MAR_14)],
                )
            })
            .chain(std::iter::once(customer(
                99,
                "Only rewards",
                vec![Order::claim("Juice", MAR_14)],
            )))
            .collect();

        let report = summarize(&customers, None, chrono_tz::UTC);
        assert_eq!(report.top_customers.len(), 10);
        assert_eq!(report.top_customers[0].customer_id, 12);
        assert_eq!(report.top_customers[0].total_spent, 12.0);
        assert_eq!(report.top_customers[9].customer_id, 3);
        assert!(report.top_customers.iter().all(|c| c.customer_id != 99));
    }

    #[test]
    fn test_sums_do_not_drift() {
        let orders = (0..10)
            .map(|_| Order::paid("Juice", 2, "OJ", 0.1, MAR_14))
            .collect();
        let report = summarize(&[customer(1, "Ana", orders)], None, chrono_tz::UTC);
        assert_eq!(report.total_earnings, 1.0);
        assert_eq!(report.average_order_value, 0.1);
    }
}
