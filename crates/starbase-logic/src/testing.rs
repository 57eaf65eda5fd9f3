//! Catalog doubles shared by the unit tests.

use std::sync::Mutex;

use crate::catalog::{ComponentKind, InMemoryCatalog, Level, LevelCatalog, LevelCost};
use crate::resources::ResourceKind;

/// Levels 1..=effects.len() for one component. Level `n` costs
/// `per_level * (n - 1)` of each listed resource.
pub(crate) fn tiered(
    component: ComponentKind,
    effects: &[u32],
    per_level: &[(ResourceKind, u32)],
) -> Vec<Level> {
    let top = effects.len() as u32;
    effects
        .iter()
        .enumerate()
        .map(|(idx, &effect)| {
            let n = idx as u32 + 1;
            let costs = if n == 1 {
                Vec::new()
            } else {
                per_level
                    .iter()
                    .map(|&(r, a)| LevelCost::new(r, a * (n - 1)))
                    .collect()
            };
            Level {
                component,
                level: n,
                effect,
                max: n == top,
                costs,
            }
        })
        .collect()
}

/// Small catalog covering every component, with round numbers.
pub(crate) fn small_catalog() -> InMemoryCatalog {
    let mut levels = Vec::new();
    levels.extend(tiered(ComponentKind::Engine, &[1, 2, 3], &[(ResourceKind::Metal, 10)]));
    levels.extend(tiered(
        ComponentKind::Shield,
        &[100, 200, 300],
        &[(ResourceKind::Crystal, 100)],
    ));
    levels.extend(tiered(ComponentKind::Drill, &[5, 10], &[(ResourceKind::Metal, 20)]));
    levels.extend(tiered(
        ComponentKind::Scanner,
        &[1, 2],
        &[(ResourceKind::Silicone, 20)],
    ));
    levels.extend(tiered(
        ComponentKind::ShipStorage,
        &[100, 200, 300],
        &[(ResourceKind::Metal, 30)],
    ));
    levels.extend(tiered(
        ComponentKind::StationStorage,
        &[500, 1000, 2000],
        &[(ResourceKind::Metal, 100), (ResourceKind::Crystal, 50)],
    ));
    levels.extend(tiered(ComponentKind::Hangar, &[1, 2, 3], &[(ResourceKind::Plutonium, 10)]));
    InMemoryCatalog::from_levels(levels).expect("small catalog is valid")
}

/// Wraps a catalog and records every lookup in order.
pub(crate) struct RecordingCatalog {
    inner: InMemoryCatalog,
    calls: Mutex<Vec<(ComponentKind, u32)>>,
}

impl RecordingCatalog {
    pub(crate) fn new(inner: InMemoryCatalog) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(ComponentKind, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl LevelCatalog for RecordingCatalog {
    fn level(&self, component: ComponentKind, level: u32) -> Option<Level> {
        self.calls.lock().unwrap().push((component, level));
        self.inner.level(component, level)
    }
}

/// Answers every lookup with the same entry, whatever was asked for.
pub(crate) struct FixedCatalog(pub(crate) Level);

impl FixedCatalog {
    pub(crate) fn answering(component: ComponentKind, level: u32, max: bool) -> Self {
        Self(Level {
            component,
            level,
            effect: 1,
            max,
            costs: Vec::new(),
        })
    }
}

impl LevelCatalog for FixedCatalog {
    fn level(&self, _component: ComponentKind, _level: u32) -> Option<Level> {
        Some(self.0.clone())
    }
}
