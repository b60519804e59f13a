use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteStatistics {
    pub total: u32,
    #[serde(default)]
    pub by_binding: BTreeMap<String, u32>,
    #[serde(default)]
    pub by_value: BTreeMap<String, u32>,
    #[serde(default)]
    pub by_binding_value: BTreeMap<String, u32>,
}

impl VoteStatistics {
    pub fn count(map: &BTreeMap<String, u32>, key: &str) -> u32 {
        map.get(key).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryCounts {
    #[serde(default)]
    pub binding_plus_one: u32,
    #[serde(default)]
    pub non_binding_plus_one: u32,
    #[serde(default)]
    pub plus_zero: u32,
    #[serde(default)]
    pub minus_one: u32,
    #[serde(default)]
    pub total: u32,
}

impl SummaryCounts {
    /// Total votes, falling back to the sum of the sub-counts when the
    /// recorded total is zero.
    pub fn resolved_total(&self) -> u32 {
        if self.total > 0 {
            self.total
        } else {
            self.binding_plus_one
                .saturating_add(self.non_binding_plus_one)
                .saturating_add(self.plus_zero)
                .saturating_add(self.minus_one)
        }
    }
}

impl From<&VoteStatistics> for SummaryCounts {
    fn from(stats: &VoteStatistics) -> Self {
        let combo = |key: &str| VoteStatistics::count(&stats.by_binding_value, key);
        Self {
            binding_plus_one: combo("binding:+1"),
            // +1 without a binding marker counts as community support
            non_binding_plus_one: combo("non-binding:+1").saturating_add(combo("unknown:+1")),
            plus_zero: VoteStatistics::count(&stats.by_value, "+0"),
            minus_one: VoteStatistics::count(&stats.by_value, "-1"),
            total: stats.total,
        }
    }
}
