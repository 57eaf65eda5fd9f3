//! Multi-step economy transactions.
//!
//! Cost query, payment and level-up stay separately callable on the parts
//! themselves. The functions here run them in order for a caller holding
//! exclusive access to the entities involved; `&mut` is the per-entity
//! serialization boundary, so two upgrades cannot both spend the same
//! balance. If any step fails, every entity is restored to its state before
//! the call.
//!
//! Ships pay from the storage of the station they are docked at.

use crate::catalog::LevelCatalog;
use crate::error::{EconomyError, EconomyResult};
use crate::projection::LevelProjection;
use crate::resources::{self, ResourceMap};
use crate::ship::{ShipPart, SpaceShip};
use crate::station::{SpaceStation, StationPart};

/// Pay for and apply one level of `part` on a docked ship.
pub fn upgrade_ship_part(
    catalog: &dyn LevelCatalog,
    station: &mut SpaceStation,
    ship: &mut SpaceShip,
    part: ShipPart,
) -> EconomyResult<LevelProjection> {
    ensure_docked(station, ship)?;
    let cost = ship.upgrade_cost(catalog, part)?;
    let before = station.storage.clone();
    station.storage.remove_resources(&cost)?;
    match ship.upgrade_part(catalog, part) {
        Ok(projection) => Ok(projection),
        Err(e) => {
            station.storage = before;
            Err(e)
        }
    }
}

/// Pay for and apply one level of a station part from the station's own
/// storage.
pub fn upgrade_station_part(
    catalog: &dyn LevelCatalog,
    station: &mut SpaceStation,
    part: StationPart,
) -> EconomyResult<LevelProjection> {
    let cost = station.upgrade_cost(catalog, part)?;
    let before = station.storage.clone();
    station.storage.remove_resources(&cost)?;
    match station.upgrade_part(catalog, part) {
        Ok(projection) => Ok(projection),
        Err(e) => {
            station.storage = before;
            Err(e)
        }
    }
}

/// Unload a docked ship's cargo into the station. Zero lines are ignored.
/// Either everything moves or nothing does.
pub fn move_resources_from_ship(
    station: &mut SpaceStation,
    ship: &mut SpaceShip,
    moves: &ResourceMap,
) -> EconomyResult<bool> {
    ensure_docked(station, ship)?;
    let moves: ResourceMap = moves
        .iter()
        .filter(|(_, &amount)| amount > 0)
        .map(|(&kind, &amount)| (kind, amount))
        .collect();

    for (&kind, &requested) in &moves {
        let available = ship.storage.amount(kind);
        if available < requested {
            return Err(EconomyError::InsufficientResources {
                resource: kind,
                available,
                requested,
            });
        }
    }
    let requested = resources::total(&moves);
    let free = station.storage.free_space();
    if requested > free {
        return Err(EconomyError::InsufficientStorageSpace { free, requested });
    }

    let ship_before = ship.storage.clone();
    let station_before = station.storage.clone();
    if let Err(e) = transfer(station, ship, &moves) {
        ship.storage = ship_before;
        station.storage = station_before;
        return Err(e);
    }
    log::debug!(
        "ship {} unloaded {} units into station {}",
        ship.id,
        requested,
        station.id
    );
    Ok(true)
}

fn transfer(
    station: &mut SpaceStation,
    ship: &mut SpaceShip,
    moves: &ResourceMap,
) -> EconomyResult<()> {
    for (&kind, &amount) in moves {
        ship.storage.remove_resource(kind, amount)?;
    }
    station.storage.add_resources(moves)
}

fn ensure_docked(station: &SpaceStation, ship: &SpaceShip) -> EconomyResult<()> {
    if station.hangar.contains(ship.id) {
        Ok(())
    } else {
        Err(EconomyError::ShipNotDocked(ship.id))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;
    use crate::catalog::{ComponentKind, InMemoryCatalog, Level};
    use crate::resources::ResourceKind;
    use crate::ship::{ShipColor, ShipKind};
    use crate::testing::small_catalog;

    fn setup(metal: u32) -> (InMemoryCatalog, SpaceStation, SpaceShip) {
        let catalog = small_catalog();
        let mut resources = ResourceMap::new();
        resources.insert(ResourceKind::Metal, metal);
        let mut station = SpaceStation::create_new(&catalog, 1, "Base", 1, resources).unwrap();
        let ship =
            SpaceShip::create_new(&catalog, 9, "Digger", ShipColor::Yellow, ShipKind::Miner, 1)
                .unwrap();
        station.hangar_mut().dock(ship.id()).unwrap();
        (catalog, station, ship)
    }

    #[test]
    fn test_upgrade_ship_part_pays_from_station() {
        let (catalog, mut station, mut ship) = setup(25);
        let p = upgrade_ship_part(&catalog, &mut station, &mut ship, ShipPart::Engine).unwrap();
        assert_eq!(p.level, 2);
        assert_eq!(station.storage().amount(ResourceKind::Metal), 15);
    }

    #[test]
    fn test_upgrade_ship_part_insufficient_funds() {
        let (catalog, mut station, mut ship) = setup(5);
        let err =
            upgrade_ship_part(&catalog, &mut station, &mut ship, ShipPart::Engine).unwrap_err();
        assert_eq!(
            err,
            EconomyError::InsufficientResources {
                resource: ResourceKind::Metal,
                available: 5,
                requested: 10
            }
        );
        assert_eq!(ship.part(ShipPart::Engine).unwrap().level(), 1);
        assert_eq!(station.storage().amount(ResourceKind::Metal), 5);
    }

    #[test]
    fn test_upgrade_ship_part_requires_docking() {
        let (catalog, mut station, mut ship) = setup(100);
        station.hangar_mut().undock(ship.id()).unwrap();
        assert_eq!(
            upgrade_ship_part(&catalog, &mut station, &mut ship, ShipPart::Engine),
            Err(EconomyError::ShipNotDocked(9))
        );
    }

    #[test]
    fn test_upgrade_ship_part_unknown_part_costs_nothing() {
        let (catalog, mut station, mut ship) = setup(100);
        assert!(matches!(
            upgrade_ship_part(&catalog, &mut station, &mut ship, ShipPart::Scanner),
            Err(EconomyError::UnknownPart { .. })
        ));
        assert_eq!(station.storage().amount(ResourceKind::Metal), 100);
    }

    /// Answers each (component, level) once; repeat lookups miss.
    struct FlakyCatalog {
        inner: InMemoryCatalog,
        seen: Mutex<HashSet<(ComponentKind, u32)>>,
    }

    impl LevelCatalog for FlakyCatalog {
        fn level(&self, component: ComponentKind, level: u32) -> Option<Level> {
            if self.seen.lock().unwrap().insert((component, level)) {
                self.inner.level(component, level)
            } else {
                None
            }
        }
    }

    #[test]
    fn test_failed_level_up_refunds() {
        let (catalog, mut station, mut ship) = setup(100);
        let flaky = FlakyCatalog {
            inner: catalog,
            seen: Mutex::new(HashSet::new()),
        };
        // The cost lookup of engine level 2 succeeds, the level-up lookup misses.
        assert!(matches!(
            upgrade_ship_part(&flaky, &mut station, &mut ship, ShipPart::Engine),
            Err(EconomyError::InvalidLevel { level: 2, .. })
        ));
        assert_eq!(station.storage().amount(ResourceKind::Metal), 100);
        assert_eq!(ship.part(ShipPart::Engine).unwrap().level(), 1);
    }

    #[test]
    fn test_upgrade_station_part() {
        let catalog = small_catalog();
        let mut resources = ResourceMap::new();
        resources.insert(ResourceKind::Metal, 150);
        resources.insert(ResourceKind::Crystal, 60);
        let mut station = SpaceStation::create_new(&catalog, 1, "Base", 1, resources).unwrap();

        let p = upgrade_station_part(&catalog, &mut station, StationPart::Storage).unwrap();
        assert_eq!(p.effect, 1000);
        assert_eq!(station.storage().amount(ResourceKind::Metal), 50);
        assert_eq!(station.storage().amount(ResourceKind::Crystal), 10);

        // Level 3 costs 200 METAL + 100 CRYSTAL.
        assert!(matches!(
            upgrade_station_part(&catalog, &mut station, StationPart::Storage),
            Err(EconomyError::InsufficientResources { .. })
        ));
        assert_eq!(station.storage().level(), 2);
        assert_eq!(station.storage().amount(ResourceKind::Metal), 50);
    }

    #[test]
    fn test_move_resources_from_ship() {
        let (_, mut station, mut ship) = setup(0);
        ship.storage_mut().add_resource(ResourceKind::Crystal, 40).unwrap();
        ship.storage_mut().add_resource(ResourceKind::Metal, 20).unwrap();

        let mut moves = ResourceMap::new();
        moves.insert(ResourceKind::Crystal, 30);
        moves.insert(ResourceKind::Metal, 0);
        assert_eq!(
            move_resources_from_ship(&mut station, &mut ship, &moves),
            Ok(true)
        );
        assert_eq!(ship.storage().amount(ResourceKind::Crystal), 10);
        assert_eq!(ship.storage().amount(ResourceKind::Metal), 20);
        assert_eq!(station.storage().amount(ResourceKind::Crystal), 30);
    }

    #[test]
    fn test_move_more_than_ship_holds() {
        let (_, mut station, mut ship) = setup(0);
        ship.storage_mut().add_resource(ResourceKind::Crystal, 10).unwrap();
        let mut moves = ResourceMap::new();
        moves.insert(ResourceKind::Crystal, 10);
        moves.insert(ResourceKind::Silicone, 1);
        assert!(matches!(
            move_resources_from_ship(&mut station, &mut ship, &moves),
            Err(EconomyError::InsufficientResources {
                resource: ResourceKind::Silicone,
                ..
            })
        ));
        assert_eq!(ship.storage().amount(ResourceKind::Crystal), 10);
        assert_eq!(station.storage().used(), 0);
    }

    #[test]
    fn test_move_into_full_station() {
        let (_, mut station, mut ship) = setup(495);
        ship.storage_mut().add_resource(ResourceKind::Crystal, 10).unwrap();
        let mut moves = ResourceMap::new();
        moves.insert(ResourceKind::Crystal, 10);
        assert_eq!(
            move_resources_from_ship(&mut station, &mut ship, &moves),
            Err(EconomyError::InsufficientStorageSpace {
                free: 5,
                requested: 10
            })
        );
        assert_eq!(ship.storage().amount(ResourceKind::Crystal), 10);
    }
}
