//! Capacity-checked resource storage.
//!
//! A storage is an [`Upgradeable`] whose effect is its capacity, plus the
//! resources it holds. The sum of stored amounts never exceeds capacity:
//! construction rejects over-full contents and every mutation checks before
//! it writes. Upgrades only raise capacity, so they need no extra check.

use crate::catalog::{ComponentKind, Level, LevelCatalog, LevelCost};
use crate::error::{EconomyError, EconomyResult};
use crate::projection::StorageProjection;
use crate::resources::{self, ResourceKind, ResourceMap};
use crate::upgradeable::Upgradeable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceStorage {
    leveled: Upgradeable,
    stored: ResourceMap,
}

impl ResourceStorage {
    /// Build a storage at `level` holding `initial`. Zero-valued entries are
    /// kept as given.
    pub fn new(
        catalog: &dyn LevelCatalog,
        component: ComponentKind,
        level: u32,
        initial: ResourceMap,
    ) -> EconomyResult<Self> {
        let leveled = Upgradeable::new(catalog, component, level)?;
        let capacity = leveled.effect() as u64;
        let stored = resources::total(&initial);
        if stored > capacity {
            return Err(EconomyError::ResourceCapacityExceeded { capacity, stored });
        }
        Ok(Self {
            leveled,
            stored: initial,
        })
    }

    pub fn component(&self) -> ComponentKind {
        self.leveled.component()
    }

    pub fn level(&self) -> u32 {
        self.leveled.level()
    }

    pub fn leveled(&self) -> &Upgradeable {
        &self.leveled
    }

    pub fn capacity(&self) -> u64 {
        self.leveled.effect() as u64
    }

    pub fn used(&self) -> u64 {
        resources::total(&self.stored)
    }

    pub fn free_space(&self) -> u64 {
        self.capacity().saturating_sub(self.used())
    }

    pub fn is_fully_upgraded(&self) -> bool {
        self.leveled.is_fully_upgraded()
    }

    /// Read-only view of the contents.
    pub fn stored_resources(&self) -> &ResourceMap {
        &self.stored
    }

    pub fn amount(&self, kind: ResourceKind) -> u32 {
        self.stored.get(&kind).copied().unwrap_or(0)
    }

    /// Credit `amount` of `kind`. All or nothing: if it does not fit, nothing
    /// is added.
    pub fn add_resource(&mut self, kind: ResourceKind, amount: u32) -> EconomyResult<bool> {
        if amount == 0 {
            return Err(EconomyError::InvalidAmount {
                resource: kind,
                amount,
            });
        }
        let free = self.free_space();
        if amount as u64 > free {
            log::warn!(
                "{}: cannot add {} {}, only {} free",
                self.component(),
                amount,
                kind,
                free
            );
            return Err(EconomyError::InsufficientStorageSpace {
                free,
                requested: amount as u64,
            });
        }
        // Fits under a u32 capacity, so the per-kind sum cannot overflow.
        *self.stored.entry(kind).or_insert(0) += amount;
        log::debug!("{}: +{} {}", self.component(), amount, kind);
        Ok(true)
    }

    /// Debit `amount` of `kind`, never going below zero.
    pub fn remove_resource(&mut self, kind: ResourceKind, amount: u32) -> EconomyResult<()> {
        if amount == 0 {
            return Err(EconomyError::InvalidAmount {
                resource: kind,
                amount,
            });
        }
        let available = self.amount(kind);
        if available < amount {
            return Err(EconomyError::InsufficientResources {
                resource: kind,
                available,
                requested: amount,
            });
        }
        if let Some(held) = self.stored.get_mut(&kind) {
            *held -= amount;
        }
        log::debug!("{}: -{} {}", self.component(), amount, kind);
        Ok(())
    }

    /// Credit several kinds at once, all or nothing.
    pub fn add_resources(&mut self, incoming: &ResourceMap) -> EconomyResult<()> {
        if let Some((&kind, _)) = incoming.iter().find(|(_, &a)| a == 0) {
            return Err(EconomyError::InvalidAmount {
                resource: kind,
                amount: 0,
            });
        }
        let requested = resources::total(incoming);
        let free = self.free_space();
        if requested > free {
            return Err(EconomyError::InsufficientStorageSpace { free, requested });
        }
        for (&kind, &amount) in incoming {
            *self.stored.entry(kind).or_insert(0) += amount;
        }
        Ok(())
    }

    /// True if every line of `costs` is covered by the contents.
    pub fn has_resources(&self, costs: &[LevelCost]) -> bool {
        resources::covers(&self.stored, &resources::cost_map(costs))
    }

    /// Pay a cost list. Every kind is checked before any is deducted, so a
    /// failure leaves the contents untouched.
    pub fn remove_resources(&mut self, costs: &[LevelCost]) -> EconomyResult<()> {
        let owed = resources::cost_map(costs);
        for (&kind, &requested) in &owed {
            let available = self.amount(kind);
            if available < requested {
                log::warn!(
                    "{}: cannot pay {} {}, only {} held",
                    self.component(),
                    requested,
                    kind,
                    available
                );
                return Err(EconomyError::InsufficientResources {
                    resource: kind,
                    available,
                    requested,
                });
            }
        }
        for (kind, amount) in owed {
            if let Some(held) = self.stored.get_mut(&kind) {
                *held -= amount;
            }
        }
        Ok(())
    }

    pub fn upgrade_cost(&self, catalog: &dyn LevelCatalog) -> EconomyResult<Vec<LevelCost>> {
        self.leveled.upgrade_cost(catalog)
    }

    pub fn upgrade(&mut self, catalog: &dyn LevelCatalog) -> EconomyResult<&Level> {
        self.leveled.upgrade(catalog)
    }

    pub(crate) fn leveled_mut(&mut self) -> &mut Upgradeable {
        &mut self.leveled
    }

    pub fn projection(&self) -> StorageProjection {
        StorageProjection {
            level: self.level(),
            capacity: self.capacity(),
            used: self.used(),
            free_space: self.free_space(),
            fully_upgraded: self.is_fully_upgraded(),
            resources: self.stored.clone(),
        }
    }
}
