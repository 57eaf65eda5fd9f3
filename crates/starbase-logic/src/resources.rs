//! Resource kinds and the maps used to count them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::LevelCost;

/// A minable, storable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    Metal,
    Crystal,
    Silicone,
    Plutonium,
}

impl ResourceKind {
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::Metal,
            ResourceKind::Crystal,
            ResourceKind::Silicone,
            ResourceKind::Plutonium,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Metal => "METAL",
            ResourceKind::Crystal => "CRYSTAL",
            ResourceKind::Silicone => "SILICONE",
            ResourceKind::Plutonium => "PLUTONIUM",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Amount held (or owed) per resource kind. Keys are unique; absent and zero
/// mean the same thing to every check in this crate.
pub type ResourceMap = BTreeMap<ResourceKind, u32>;

/// Sum of all amounts, widened so it cannot overflow.
pub fn total(resources: &ResourceMap) -> u64 {
    resources.values().map(|&v| v as u64).sum()
}

/// Collapse a catalog cost list into a map, adding up repeated kinds.
pub fn cost_map(costs: &[LevelCost]) -> ResourceMap {
    let mut map = ResourceMap::new();
    for cost in costs {
        let entry = map.entry(cost.resource).or_insert(0);
        *entry = entry.saturating_add(cost.amount);
    }
    map
}

/// True if `held` has at least `needed` of every kind.
pub fn covers(held: &ResourceMap, needed: &ResourceMap) -> bool {
    needed
        .iter()
        .all(|(kind, &amount)| held.get(kind).copied().unwrap_or(0) >= amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_empty() {
        assert_eq!(total(&ResourceMap::new()), 0);
    }

    #[test]
    fn test_total_does_not_overflow() {
        let mut map = ResourceMap::new();
        map.insert(ResourceKind::Metal, u32::MAX);
        map.insert(ResourceKind::Crystal, u32::MAX);
        assert_eq!(total(&map), 2 * u32::MAX as u64);
    }

    #[test]
    fn test_cost_map_merges_duplicates() {
        let costs = vec![
            LevelCost::new(ResourceKind::Metal, 10),
            LevelCost::new(ResourceKind::Crystal, 5),
            LevelCost::new(ResourceKind::Metal, 7),
        ];
        let map = cost_map(&costs);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&ResourceKind::Metal], 17);
        assert_eq!(map[&ResourceKind::Crystal], 5);
    }

    #[test]
    fn test_covers() {
        let mut held = ResourceMap::new();
        held.insert(ResourceKind::Metal, 50);
        let mut needed = ResourceMap::new();
        needed.insert(ResourceKind::Metal, 50);
        assert!(covers(&held, &needed));

        needed.insert(ResourceKind::Plutonium, 1);
        assert!(!covers(&held, &needed), "missing kind counts as zero");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ResourceKind::Plutonium).unwrap();
        assert_eq!(json, "\"PLUTONIUM\"");
        assert_eq!(ResourceKind::Silicone.to_string(), "SILICONE");
    }
}
