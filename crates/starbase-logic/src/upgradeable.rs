//! The leveled-attribute primitive.
//!
//! An `Upgradeable` is a component kind, a level, and the catalog data for
//! that level. The cached data is replaced only once the next level has been
//! fetched successfully, so `level_data().level == level()` always holds.
//!
//! Upgrading never touches resources. Callers query the cost, pay it from
//! wherever they keep resources, then advance the level.

use serde::Serialize;

use crate::catalog::{fetch, fetch_next, ComponentKind, Level, LevelCatalog, LevelCost};
use crate::error::{EconomyError, EconomyResult};
use crate::projection::LevelProjection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upgradeable {
    component: ComponentKind,
    current: Level,
}

impl Upgradeable {
    /// Resolve `level` for `component`. Fails with
    /// [`EconomyError::InvalidLevel`] for level 0 or a catalog miss.
    pub fn new(
        catalog: &dyn LevelCatalog,
        component: ComponentKind,
        level: u32,
    ) -> EconomyResult<Self> {
        let current = fetch(catalog, component, level)?;
        Ok(Self { component, current })
    }

    pub fn component(&self) -> ComponentKind {
        self.component
    }

    pub fn level(&self) -> u32 {
        self.current.level
    }

    pub fn effect(&self) -> u32 {
        self.current.effect
    }

    pub fn level_data(&self) -> &Level {
        &self.current
    }

    pub fn is_fully_upgraded(&self) -> bool {
        self.current.max
    }

    /// Price of the next level, in catalog order. Does not change anything.
    pub fn upgrade_cost(&self, catalog: &dyn LevelCatalog) -> EconomyResult<Vec<LevelCost>> {
        self.ensure_upgradeable()?;
        let next = fetch_next(catalog, self.component, self.current.level)?;
        Ok(next.costs)
    }

    /// Advance one level. On failure the component is unchanged.
    pub fn upgrade(&mut self, catalog: &dyn LevelCatalog) -> EconomyResult<&Level> {
        self.ensure_upgradeable()?;
        let next = fetch_next(catalog, self.component, self.current.level)?;
        log::info!(
            "{} upgraded {} -> {} (effect {} -> {})",
            self.component,
            self.current.level,
            next.level,
            self.current.effect,
            next.effect
        );
        self.current = next;
        Ok(&self.current)
    }

    pub fn projection(&self) -> LevelProjection {
        LevelProjection {
            component: self.component,
            level: self.current.level,
            effect: self.current.effect,
            fully_upgraded: self.current.max,
        }
    }

    fn ensure_upgradeable(&self) -> EconomyResult<()> {
        if self.current.max {
            return Err(EconomyError::UpgradeNotAvailable {
                component: self.component,
                level: self.current.level,
            });
        }
        Ok(())
    }
}
