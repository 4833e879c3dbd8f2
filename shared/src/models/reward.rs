//! Loyalty reward counters and progress derivation
//!
//! Every category a customer buys in carries a [`RewardCounter`]. The display
//! status of a counter is derived by [`RewardCounter::progress`]; all readers
//! (purchase responses, reward listings, dashboards, claim checks) go through
//! it so the labels never disagree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Paid drinks in one category that unlock one free drink
pub const DRINKS_PER_REWARD: u32 = 5;

/// Progress at or above which a category is shown as "upcoming"
const UPCOMING_THRESHOLD: u32 = DRINKS_PER_REWARD - 1;

/// Display label for a category's reward state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardStatus {
    /// Collecting paid drinks
    Progress,
    /// One paid drink away from the next reward
    Upcoming,
    /// At least one unlocked reward waiting to be claimed
    Ready,
    /// Legacy label kept so old payloads still deserialize; never derived
    Earned,
}

impl RewardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::Upcoming => "upcoming",
            Self::Ready => "ready",
            Self::Earned => "earned",
        }
    }
}

/// Per-(customer, category) reward counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardCounter {
    /// Non-reward orders ever placed in this category
    #[serde(default)]
    pub paid: u32,
    /// Free drinks unlocked to date, always `paid / DRINKS_PER_REWARD`
    #[serde(default)]
    pub earned: u32,
    /// Successful claims in this category
    #[serde(default)]
    pub claimed: u32,
}

/// Derived view of a [`RewardCounter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardProgress {
    pub progress: u32,
    pub drinks_until_reward: u32,
    /// `earned - claimed`; signed so an inconsistent counter stays visible
    pub pending: i64,
    pub status: RewardStatus,
}

impl RewardCounter {
    pub fn new(paid: u32, earned: u32, claimed: u32) -> Self {
        Self {
            paid,
            earned,
            claimed,
        }
    }

    /// Record one paid drink; `earned` is recomputed from `paid`
    pub fn record_paid(&mut self) {
        self.paid += 1;
        self.earned = self.paid / DRINKS_PER_REWARD;
    }

    /// Record one redeemed reward
    pub fn record_claim(&mut self) {
        self.claimed += 1;
    }

    pub fn pending(&self) -> i64 {
        i64::from(self.earned) - i64::from(self.claimed)
    }

    /// Whether a claim would succeed right now
    pub fn has_pending(&self) -> bool {
        self.earned > self.claimed
    }

    /// Derive progress and display status.
    ///
    /// Branch order matters: a counter with unclaimed rewards is "ready" even
    /// when its progress is low, and a counter with no paid drinks is always
    /// "progress".
    pub fn progress(&self) -> RewardProgress {
        let progress = self.paid % DRINKS_PER_REWARD;
        let drinks_until_reward = if progress == 0 && self.paid > 0 {
            0
        } else {
            DRINKS_PER_REWARD - progress
        };
        let pending = self.pending();

        let status = if self.paid == 0 {
            RewardStatus::Progress
        } else if pending > 0 {
            RewardStatus::Ready
        } else if progress >= UPCOMING_THRESHOLD {
            RewardStatus::Upcoming
        } else {
            RewardStatus::Progress
        };

        RewardProgress {
            progress,
            drinks_until_reward,
            pending,
            status,
        }
    }
}

/// Full derived record for one category (counter + progress)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReward {
    pub category: String,
    pub paid: u32,
    pub earned: u32,
    pub claimed: u32,
    pub pending: i64,
    pub progress: u32,
    pub drinks_until_reward: u32,
    pub status: RewardStatus,
}

impl CategoryReward {
    pub fn from_counter(category: impl Into<String>, counter: &RewardCounter) -> Self {
        let derived = counter.progress();
        Self {
            category: category.into(),
            paid: counter.paid,
            earned: counter.earned,
            claimed: counter.claimed,
            pending: derived.pending,
            progress: derived.progress,
            drinks_until_reward: derived.drinks_until_reward,
            status: derived.status,
        }
    }
}

/// Category name → counter, with entries created on first use
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardMap(BTreeMap<String, RewardCounter>);

impl RewardMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: &str) -> Option<&RewardCounter> {
        self.0.get(category)
    }

    /// Counter for `category`, inserting a zeroed one if absent
    pub fn entry_or_default(&mut self, category: &str) -> &mut RewardCounter {
        self.0.entry(category.to_string()).or_default()
    }

    pub fn insert(&mut self, category: impl Into<String>, counter: RewardCounter) {
        self.0.insert(category.into(), counter);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RewardCounter)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Derived records for every category, sorted by category name
    pub fn records(&self) -> Vec<CategoryReward> {
        self.0
            .iter()
            .map(|(category, counter)| CategoryReward::from_counter(category.as_str(), counter))
            .collect()
    }
}

impl FromIterator<(String, RewardCounter)> for RewardMap {
    fn from_iter<I: IntoIterator<Item = (String, RewardCounter)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
