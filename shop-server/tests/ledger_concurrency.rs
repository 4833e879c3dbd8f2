//! 并发写入测试: 同一手机号并发下单、并发兑换
//!
//! redb 只允许一个写事务，账本的每个操作都在单个事务内完成，
//! 因此并发请求之间不会出现重复顾客或重复兑换。

use std::sync::Arc;
use std::thread;

use shop_server::ShopStorage;
use shop_server::loyalty::{LedgerError, PurchaseInput, RewardLedger};

fn open_ledger() -> (tempfile::TempDir, RewardLedger, ShopStorage) {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = ShopStorage::open(dir.path().join("shop.redb")).expect("open storage");
    (dir, RewardLedger::new(storage.clone()), storage)
}

fn paid(phone: &str, category: &str) -> PurchaseInput {
    PurchaseInput {
        customer_name: "Ana".to_string(),
        customer_phone: phone.to_string(),
        category: category.to_string(),
        item_id: Some(1),
        item_name: format!("{category} Small"),
        price: 4.5,
        is_reward: false,
        date: None,
    }
}

#[test]
fn test_concurrent_first_purchases_create_one_customer() {
    let (_dir, ledger, storage) = open_ledger();
    let ledger = Arc::new(ledger);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ledger = ledger.clone();
            thread::spawn(move || ledger.record_purchase(paid("600111222", "Smoothie")))
        })
        .collect();

    let new_customers = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked").expect("purchase"))
        .filter(|r| r.is_new_customer)
        .count();
    assert_eq!(new_customers, 1);

    let customers = storage.all_customers().unwrap();
    assert_eq!(customers.len(), 1);
    let customer = &customers[0];
    assert_eq!(customer.total_orders, 8);
    assert_eq!(customer.orders.len(), 8);

    let counter = customer.rewards.get("Smoothie").copied().unwrap();
    assert_eq!(counter.paid, 8);
    assert_eq!(counter.earned, 1);
}

#[test]
fn test_concurrent_claims_single_success() {
    let (_dir, ledger, storage) = open_ledger();
    let mut customer_id = 0;
    for _ in 0..6 {
        customer_id = ledger
            .record_purchase(paid("600333444", "Juice"))
            .unwrap()
            .customer
            .id;
    }

    let ledger = Arc::new(ledger);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ledger = ledger.clone();
            thread::spawn(move || ledger.claim_reward(customer_id, "Juice"))
        })
        .collect();

    let mut ok = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.join().expect("thread panicked") {
            Ok(_) => ok += 1,
            Err(LedgerError::NoRewardAvailable(_)) => rejected += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(rejected, 3);

    let customer = storage.get_customer(customer_id).unwrap().unwrap();
    let counter = customer.rewards.get("Juice").copied().unwrap();
    assert_eq!(counter.claimed, 1);
    assert_eq!(counter.pending(), 0);
    assert_eq!(customer.rewards_earned, 1);
    assert_eq!(customer.total_orders, 7);
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.redb");
    {
        let ledger = RewardLedger::new(ShopStorage::open(&path).unwrap());
        for _ in 0..3 {
            ledger.record_purchase(paid("600555666", "Tea")).unwrap();
        }
    }

    let storage = ShopStorage::open(&path).unwrap();
    let customer = storage.find_customer_by_phone("600555666").unwrap().unwrap();
    assert_eq!(customer.rewards.get("Tea").map(|c| c.paid), Some(3));
}
