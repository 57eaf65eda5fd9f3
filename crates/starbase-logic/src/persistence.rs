//! Save/load for ships and stations.
//!
//! Entities are flattened into records (levels, shield energy, contents,
//! docked ship ids) and written with bincode behind a version number.
//! Loading goes back through the catalog, so a record that names a missing
//! level or holds more than its storage allows is rejected the same way a
//! fresh construction would be.

use std::collections::BTreeSet;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{ComponentKind, LevelCatalog};
use crate::error::{EconomyError, EconomyResult};
use crate::resources::ResourceMap;
use crate::ship::{ShipColor, ShipKind, SpaceShip};
use crate::station::{Hangar, SpaceStation};
use crate::storage::ResourceStorage;
use crate::upgradeable::Upgradeable;

/// Version number for the snapshot format (increment when the format changes)
const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipRecord {
    pub id: u64,
    pub name: String,
    pub color: ShipColor,
    pub kind: ShipKind,
    pub engine_level: u32,
    pub shield_level: u32,
    pub shield_energy: u32,
    /// Drill level for miners, scanner level for scouts.
    pub tool_level: u32,
    pub storage_level: u32,
    pub resources: ResourceMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: u64,
    pub name: String,
    pub storage_level: u32,
    pub hangar_level: u32,
    pub resources: ResourceMap,
    pub docked: BTreeSet<u64>,
}

impl From<&SpaceShip> for ShipRecord {
    fn from(ship: &SpaceShip) -> Self {
        Self {
            id: ship.id,
            name: ship.name.clone(),
            color: ship.color,
            kind: ship.kind,
            engine_level: ship.engine.level(),
            shield_level: ship.shield.level(),
            shield_energy: ship.shield_energy,
            tool_level: ship.tool.level(),
            storage_level: ship.storage.level(),
            resources: ship.storage.stored_resources().clone(),
        }
    }
}

impl From<&SpaceStation> for StationRecord {
    fn from(station: &SpaceStation) -> Self {
        Self {
            id: station.id,
            name: station.name.clone(),
            storage_level: station.storage.level(),
            hangar_level: station.hangar.leveled().level(),
            resources: station.storage.stored_resources().clone(),
            docked: station.hangar.ships().clone(),
        }
    }
}

impl ShipRecord {
    /// Rebuild the live ship. Shield energy above the shield's effect is
    /// clamped down.
    pub fn hydrate(self, catalog: &dyn LevelCatalog) -> EconomyResult<SpaceShip> {
        let engine = Upgradeable::new(catalog, ComponentKind::Engine, self.engine_level)?;
        let shield = Upgradeable::new(catalog, ComponentKind::Shield, self.shield_level)?;
        let tool = Upgradeable::new(catalog, self.kind.tool().component(), self.tool_level)?;
        let storage = ResourceStorage::new(
            catalog,
            ComponentKind::ShipStorage,
            self.storage_level,
            self.resources,
        )?;
        let shield_energy = self.shield_energy.min(shield.effect());
        Ok(SpaceShip {
            id: self.id,
            name: self.name,
            color: self.color,
            kind: self.kind,
            engine,
            shield,
            shield_energy,
            tool,
            storage,
        })
    }
}

impl StationRecord {
    /// Rebuild the live station, re-docking every recorded ship.
    pub fn hydrate(self, catalog: &dyn LevelCatalog) -> EconomyResult<SpaceStation> {
        let storage = ResourceStorage::new(
            catalog,
            ComponentKind::StationStorage,
            self.storage_level,
            self.resources,
        )?;
        let mut hangar = Hangar::new(catalog, self.hangar_level)?;
        for ship_id in self.docked {
            hangar.dock(ship_id)?;
        }
        Ok(SpaceStation {
            id: self.id,
            name: self.name,
            storage,
            hangar,
        })
    }
}

/// Serializable snapshot of one station and the ships it owns.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveData {
    /// Snapshot format version
    pub version: u32,
    pub station: StationRecord,
    pub ships: Vec<ShipRecord>,
}

/// A snapshot after rehydration.
#[derive(Debug)]
pub struct LoadedSnapshot {
    pub station: SpaceStation,
    pub ships: Vec<SpaceShip>,
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),

    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Saved state is inconsistent with the catalog: {0}")]
    Hydrate(#[from] EconomyError),
}

/// Write a station and its ships.
pub fn save_snapshot<W: Write>(
    writer: W,
    station: &SpaceStation,
    ships: &[SpaceShip],
) -> Result<(), SaveError> {
    let data = SaveData {
        version: SAVE_VERSION,
        station: station.into(),
        ships: ships.iter().map(ShipRecord::from).collect(),
    };
    bincode::serialize_into(writer, &data)?;
    Ok(())
}

/// Read a snapshot and rebuild every entity against `catalog`.
pub fn load_snapshot<R: Read>(
    reader: R,
    catalog: &dyn LevelCatalog,
) -> Result<LoadedSnapshot, SaveError> {
    let data: SaveData = bincode::deserialize_from(reader)?;
    if data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: data.version,
        });
    }
    let station = data.station.hydrate(catalog)?;
    let ships = data
        .ships
        .into_iter()
        .map(|record| record.hydrate(catalog))
        .collect::<EconomyResult<Vec<_>>>()?;
    log::info!(
        "loaded station {} with {} ships",
        station.id(),
        ships.len()
    );
    Ok(LoadedSnapshot { station, ships })
}
