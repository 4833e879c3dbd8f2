//! Loyalty program: "buy 5, get the 6th free" per drink category
//!
//! [`RewardLedger`] is the only writer of customer reward state. The status
//! derivation it reports lives in [`shared::models::RewardCounter::progress`].

pub mod ledger;

pub use ledger::{LedgerError, LedgerResult, PurchaseInput, RewardLedger};
