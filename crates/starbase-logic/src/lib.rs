//! Upgrade and storage economy for StarBase.
//!
//! Ships and stations are built from parts, each part holding a level in the
//! level catalog. A level resolves to an effect (speed, shield energy, drill
//! yield, storage capacity, dock count) and the resources it costs to reach.
//! Everything here is plain data in, plain data out: no database, no web
//! layer, no global state. The catalog is handed to every operation that
//! needs to consult it.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Component kinds, catalog levels, the `LevelCatalog` lookup |
//! | [`config`] | Economy configuration (JSON) and validation |
//! | [`error`] | Error types for every fallible operation |
//! | [`orchestration`] | Pay-then-upgrade and ship-to-station resource moves |
//! | [`persistence`] | Flat records, bincode snapshots, rehydration |
//! | [`projection`] | Read-only snapshots handed to the boundary layer |
//! | [`resources`] | Resource kinds and resource maps |
//! | [`ship`] | Miner and scout ships and their part table |
//! | [`station`] | Space stations, storage and hangar |
//! | [`storage`] | Capacity-checked resource storage |
//! | [`upgradeable`] | The leveled-attribute primitive |
//!
//! ```
//! use starbase_logic::catalog::InMemoryCatalog;
//! use starbase_logic::ship::{ShipColor, ShipKind, ShipPart, SpaceShip};
//!
//! let catalog = InMemoryCatalog::builtin().unwrap();
//! let mut ship = SpaceShip::create_new(&catalog, 1, "Rockhopper", ShipColor::Red, ShipKind::Miner, 1).unwrap();
//! let cost = ship.upgrade_cost(&catalog, ShipPart::Drill).unwrap();
//! assert!(!cost.is_empty());
//! ship.upgrade_part(&catalog, ShipPart::Drill).unwrap();
//! assert_eq!(ship.part(ShipPart::Drill).unwrap().level(), 2);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod orchestration;
pub mod persistence;
pub mod projection;
pub mod resources;
pub mod ship;
pub mod station;
pub mod storage;
pub mod upgradeable;

#[cfg(test)]
mod testing;

pub use error::{EconomyError, EconomyResult};
