//! Level catalog: what every level of every component is worth and costs.
//!
//! The catalog is read-only to the rest of the crate. A level's `costs` are
//! the price of *reaching* that level, so the cost of upgrading a component
//! at level `k` is the cost list of level `k + 1`.
//!
//! The built-in catalog lives in `data/levels.json`:
//!
//! ```json
//! { "component": "SHIELD", "level": 2, "effect": 150, "max": false,
//!   "costs": [ { "resource": "CRYSTAL", "amount": 40 } ] }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, EconomyError, EconomyResult};
use crate::resources::ResourceKind;

const BUILTIN_LEVELS_JSON: &str = include_str!("../../../data/levels.json");

/// Every kind of leveled component a ship or station can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentKind {
    Engine,
    Shield,
    Drill,
    Scanner,
    ShipStorage,
    StationStorage,
    Hangar,
}

impl ComponentKind {
    pub fn all() -> &'static [ComponentKind] {
        &[
            ComponentKind::Engine,
            ComponentKind::Shield,
            ComponentKind::Drill,
            ComponentKind::Scanner,
            ComponentKind::ShipStorage,
            ComponentKind::StationStorage,
            ComponentKind::Hangar,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Engine => "ENGINE",
            ComponentKind::Shield => "SHIELD",
            ComponentKind::Drill => "DRILL",
            ComponentKind::Scanner => "SCANNER",
            ComponentKind::ShipStorage => "SHIP_STORAGE",
            ComponentKind::StationStorage => "STATION_STORAGE",
            ComponentKind::Hangar => "HANGAR",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One resource line of a level's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCost {
    pub resource: ResourceKind,
    pub amount: u32,
}

impl LevelCost {
    pub fn new(resource: ResourceKind, amount: u32) -> Self {
        Self { resource, amount }
    }
}

/// A catalog entry for one (component, level) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub component: ComponentKind,
    pub level: u32,
    /// Magnitude of the component at this level. For storages this is the
    /// capacity, for hangars the dock count.
    pub effect: u32,
    /// No level follows this one.
    pub max: bool,
    /// Resources spent to reach this level, in catalog order.
    #[serde(default)]
    pub costs: Vec<LevelCost>,
}

/// Lookup from (component, level) to catalog data.
///
/// Implementations must be deterministic for the lifetime of a game session
/// and safe to read from many entities at once. Entries are returned by value
/// so a catalog may build them on demand.
pub trait LevelCatalog: Send + Sync {
    fn level(&self, component: ComponentKind, level: u32) -> Option<Level>;
}

/// Resolve a level or fail with [`EconomyError::InvalidLevel`]. Level 0 is
/// rejected without consulting the catalog, and so is an entry keyed
/// differently from the request.
pub fn fetch(
    catalog: &dyn LevelCatalog,
    component: ComponentKind,
    level: u32,
) -> EconomyResult<Level> {
    if level == 0 {
        return Err(EconomyError::InvalidLevel { component, level });
    }
    match catalog.level(component, level) {
        Some(found) if found.component == component && found.level == level => Ok(found),
        Some(found) => {
            log::warn!(
                "catalog answered {} {} with {} {}",
                component,
                level,
                found.component,
                found.level
            );
            Err(EconomyError::InvalidLevel { component, level })
        }
        None => Err(EconomyError::InvalidLevel { component, level }),
    }
}

/// Resolve the level after `level`. A catalog that leaves a level at
/// `u32::MAX` unflagged as max has no successor to offer.
pub fn fetch_next(
    catalog: &dyn LevelCatalog,
    component: ComponentKind,
    level: u32,
) -> EconomyResult<Level> {
    let next = level
        .checked_add(1)
        .ok_or(EconomyError::InvalidLevel { component, level })?;
    fetch(catalog, component, next)
}

/// Validated catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    levels: HashMap<(ComponentKind, u32), Level>,
    max_levels: BTreeMap<ComponentKind, u32>,
}

impl InMemoryCatalog {
    /// Build a catalog, checking that every component's levels run 1..=N
    /// with strictly increasing effect, that only level N is flagged max, and
    /// that no cost line is zero.
    pub fn from_levels(levels: Vec<Level>) -> Result<Self, CatalogError> {
        let mut by_component: BTreeMap<ComponentKind, Vec<Level>> = BTreeMap::new();
        for level in levels {
            if level.level == 0 {
                return Err(CatalogError::ZeroLevel(level.component));
            }
            if level.costs.iter().any(|c| c.amount == 0) {
                return Err(CatalogError::ZeroCost {
                    component: level.component,
                    level: level.level,
                });
            }
            by_component.entry(level.component).or_default().push(level);
        }

        let mut catalog = InMemoryCatalog::default();
        for (component, mut list) in by_component {
            list.sort_by_key(|l| l.level);
            let top = list.len() as u32;
            let mut prev_effect: Option<u32> = None;
            for (idx, level) in list.into_iter().enumerate() {
                let expected = idx as u32 + 1;
                if level.level < expected {
                    return Err(CatalogError::DuplicateLevel {
                        component,
                        level: level.level,
                    });
                }
                if level.level > expected {
                    return Err(CatalogError::MissingLevel {
                        component,
                        missing: expected,
                    });
                }
                if prev_effect.is_some_and(|p| level.effect <= p) {
                    return Err(CatalogError::EffectNotIncreasing {
                        component,
                        level: level.level,
                    });
                }
                if level.max != (level.level == top) {
                    return Err(CatalogError::MaxFlagMisplaced {
                        component,
                        level: level.level,
                    });
                }
                prev_effect = Some(level.effect);
                catalog.levels.insert((component, level.level), level);
            }
            catalog.max_levels.insert(component, top);
        }
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        Self::from_levels(levels)
    }

    /// The catalog shipped with the game.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_LEVELS_JSON)
    }

    /// Components that have at least one level.
    pub fn components(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.max_levels.keys().copied()
    }

    pub fn max_level(&self, component: ComponentKind) -> Option<u32> {
        self.max_levels.get(&component).copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl LevelCatalog for InMemoryCatalog {
    fn level(&self, component: ComponentKind, level: u32) -> Option<Level> {
        self.levels.get(&(component, level)).cloned()
    }
}
