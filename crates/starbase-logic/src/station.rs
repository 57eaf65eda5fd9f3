//! Space stations: a resource storage and a hangar.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{ComponentKind, LevelCatalog, LevelCost};
use crate::error::{EconomyError, EconomyResult};
use crate::projection::{HangarProjection, LevelProjection, StationProjection};
use crate::resources::ResourceMap;
use crate::storage::ResourceStorage;
use crate::upgradeable::Upgradeable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationPart {
    Storage,
    Hangar,
}

impl StationPart {
    pub fn all() -> &'static [StationPart] {
        &[StationPart::Storage, StationPart::Hangar]
    }

    pub fn component(self) -> ComponentKind {
        match self {
            StationPart::Storage => ComponentKind::StationStorage,
            StationPart::Hangar => ComponentKind::Hangar,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StationPart::Storage => "STORAGE",
            StationPart::Hangar => "HANGAR",
        }
    }
}

impl fmt::Display for StationPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StationPart {
    type Err = EconomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STORAGE" => Ok(StationPart::Storage),
            "HANGAR" => Ok(StationPart::Hangar),
            _ => Err(EconomyError::UnknownPart {
                container: "station",
                part: s.to_string(),
            }),
        }
    }
}

/// Docking bay. The hangar level's effect is the number of docks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hangar {
    leveled: Upgradeable,
    ships: BTreeSet<u64>,
}

impl Hangar {
    pub fn new(catalog: &dyn LevelCatalog, level: u32) -> EconomyResult<Self> {
        Ok(Self {
            leveled: Upgradeable::new(catalog, ComponentKind::Hangar, level)?,
            ships: BTreeSet::new(),
        })
    }

    pub fn leveled(&self) -> &Upgradeable {
        &self.leveled
    }

    pub fn docks(&self) -> u32 {
        self.leveled.effect()
    }

    pub fn free_docks(&self) -> u32 {
        self.docks().saturating_sub(self.ships.len() as u32)
    }

    pub fn ships(&self) -> &BTreeSet<u64> {
        &self.ships
    }

    pub fn contains(&self, ship_id: u64) -> bool {
        self.ships.contains(&ship_id)
    }

    pub fn dock(&mut self, ship_id: u64) -> EconomyResult<()> {
        if self.ships.contains(&ship_id) {
            return Err(EconomyError::ShipAlreadyDocked(ship_id));
        }
        if self.free_docks() == 0 {
            log::warn!("hangar full, ship {} turned away", ship_id);
            return Err(EconomyError::NoFreeDocks {
                docks: self.docks(),
            });
        }
        self.ships.insert(ship_id);
        log::info!("ship {} docked ({} docks free)", ship_id, self.free_docks());
        Ok(())
    }

    pub fn undock(&mut self, ship_id: u64) -> EconomyResult<()> {
        if !self.ships.remove(&ship_id) {
            return Err(EconomyError::ShipNotDocked(ship_id));
        }
        log::info!("ship {} undocked", ship_id);
        Ok(())
    }

    pub fn projection(&self) -> HangarProjection {
        HangarProjection {
            level: self.leveled.level(),
            docks: self.docks(),
            free_docks: self.free_docks(),
            fully_upgraded: self.leveled.is_fully_upgraded(),
            ships: self.ships.clone(),
        }
    }
}

/// A station and its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceStation {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) storage: ResourceStorage,
    pub(crate) hangar: Hangar,
}

impl SpaceStation {
    /// Build a station with both parts at `starting_level` and
    /// `starting_resources` in storage.
    pub fn create_new(
        catalog: &dyn LevelCatalog,
        id: u64,
        name: impl Into<String>,
        starting_level: u32,
        starting_resources: ResourceMap,
    ) -> EconomyResult<Self> {
        let storage = ResourceStorage::new(
            catalog,
            ComponentKind::StationStorage,
            starting_level,
            starting_resources,
        )?;
        let hangar = Hangar::new(catalog, starting_level)?;
        Ok(Self {
            id,
            name: name.into(),
            storage,
            hangar,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> &ResourceStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut ResourceStorage {
        &mut self.storage
    }

    pub fn hangar(&self) -> &Hangar {
        &self.hangar
    }

    pub fn hangar_mut(&mut self) -> &mut Hangar {
        &mut self.hangar
    }

    pub fn part(&self, part: StationPart) -> &Upgradeable {
        match part {
            StationPart::Storage => self.storage.leveled(),
            StationPart::Hangar => &self.hangar.leveled,
        }
    }

    fn part_mut(&mut self, part: StationPart) -> &mut Upgradeable {
        match part {
            StationPart::Storage => self.storage.leveled_mut(),
            StationPart::Hangar => &mut self.hangar.leveled,
        }
    }

    pub fn upgrade_cost(
        &self,
        catalog: &dyn LevelCatalog,
        part: StationPart,
    ) -> EconomyResult<Vec<LevelCost>> {
        self.part(part).upgrade_cost(catalog)
    }

    /// Advance `part` one level without paying for it.
    pub fn upgrade_part(
        &mut self,
        catalog: &dyn LevelCatalog,
        part: StationPart,
    ) -> EconomyResult<LevelProjection> {
        let id = self.id;
        let upgraded = self.part_mut(part);
        upgraded.upgrade(catalog)?;
        log::info!("station {} {} now level {}", id, part, upgraded.level());
        Ok(upgraded.projection())
    }

    pub fn detailed_projection(&self) -> StationProjection {
        StationProjection {
            id: self.id,
            name: self.name.clone(),
            storage: self.storage.projection(),
            hangar: self.hangar.projection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceKind;
    use crate::testing::small_catalog;

    fn station() -> SpaceStation {
        let mut resources = ResourceMap::new();
        resources.insert(ResourceKind::Metal, 2);
        SpaceStation::create_new(&small_catalog(), 1, "New Station", 1, resources).unwrap()
    }

    #[test]
    fn test_create_new() {
        let s = station();
        assert_eq!(s.name(), "New Station");
        assert_eq!(s.storage().capacity(), 500);
        assert_eq!(s.storage().amount(ResourceKind::Metal), 2);
        assert_eq!(s.hangar().docks(), 1);
        assert_eq!(s.hangar().free_docks(), 1);
    }

    #[test]
    fn test_create_new_overfull() {
        let mut resources = ResourceMap::new();
        resources.insert(ResourceKind::Metal, 501);
        assert!(matches!(
            SpaceStation::create_new(&small_catalog(), 1, "S", 1, resources),
            Err(EconomyError::ResourceCapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_hangar_dock_limits() {
        let catalog = small_catalog();
        let mut s = station();
        s.hangar_mut().dock(10).unwrap();
        assert_eq!(
            s.hangar_mut().dock(10),
            Err(EconomyError::ShipAlreadyDocked(10))
        );
        assert_eq!(
            s.hangar_mut().dock(11),
            Err(EconomyError::NoFreeDocks { docks: 1 })
        );

        s.upgrade_part(&catalog, StationPart::Hangar).unwrap();
        s.hangar_mut().dock(11).unwrap();
        assert_eq!(s.hangar().free_docks(), 0);

        s.hangar_mut().undock(10).unwrap();
        assert_eq!(s.hangar_mut().undock(10), Err(EconomyError::ShipNotDocked(10)));
        assert!(s.hangar().contains(11));
        assert_eq!(s.hangar().free_docks(), 1);
    }

    #[test]
    fn test_upgrade_cost_per_part() {
        let catalog = small_catalog();
        let s = station();
        assert_eq!(
            s.upgrade_cost(&catalog, StationPart::Hangar).unwrap(),
            vec![LevelCost::new(ResourceKind::Plutonium, 10)]
        );
        assert_eq!(
            s.upgrade_cost(&catalog, StationPart::Storage).unwrap(),
            vec![
                LevelCost::new(ResourceKind::Metal, 100),
                LevelCost::new(ResourceKind::Crystal, 50)
            ]
        );
    }

    #[test]
    fn test_upgrade_to_max() {
        let catalog = small_catalog();
        let mut s = station();
        s.upgrade_part(&catalog, StationPart::Storage).unwrap();
        let p = s.upgrade_part(&catalog, StationPart::Storage).unwrap();
        assert!(p.fully_upgraded);
        assert_eq!(s.storage().capacity(), 2000);
        assert!(matches!(
            s.upgrade_part(&catalog, StationPart::Storage),
            Err(EconomyError::UpgradeNotAvailable { level: 3, .. })
        ));
        assert_eq!(s.part(StationPart::Hangar).level(), 1);
    }

    #[test]
    fn test_part_from_str() {
        assert_eq!("hangar".parse::<StationPart>(), Ok(StationPart::Hangar));
        assert!(matches!(
            "drill".parse::<StationPart>(),
            Err(EconomyError::UnknownPart {
                container: "station",
                ..
            })
        ));
    }

    #[test]
    fn test_detailed_projection() {
        let catalog = small_catalog();
        let mut s = station();
        s.hangar_mut().dock(3).unwrap();
        s.upgrade_part(&catalog, StationPart::Hangar).unwrap();
        let p = s.detailed_projection();
        assert_eq!(p.hangar.level, 2);
        assert_eq!(p.hangar.docks, 2);
        assert_eq!(p.hangar.free_docks, 1);
        assert!(p.hangar.ships.contains(&3));
        assert_eq!(p.storage.resources[&ResourceKind::Metal], 2);
        assert_eq!(p.storage.free_space, 498);
    }
}
