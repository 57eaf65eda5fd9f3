//! Read-only snapshots of ships and stations.
//!
//! Built fresh on every call from the live entity, so they always show the
//! latest levels and contents. The boundary layer shapes these into its own
//! responses.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::ComponentKind;
use crate::resources::ResourceMap;
use crate::ship::{ShipColor, ShipKind, ShipPart};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelProjection {
    pub component: ComponentKind,
    pub level: u32,
    pub effect: u32,
    pub fully_upgraded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageProjection {
    pub level: u32,
    pub capacity: u64,
    pub used: u64,
    pub free_space: u64,
    pub fully_upgraded: bool,
    pub resources: ResourceMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HangarProjection {
    pub level: u32,
    pub docks: u32,
    pub free_docks: u32,
    pub fully_upgraded: bool,
    pub ships: BTreeSet<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipProjection {
    pub id: u64,
    pub name: String,
    pub color: ShipColor,
    pub kind: ShipKind,
    pub shield_energy: u32,
    /// Non-storage parts in the ship kind's part order.
    pub parts: Vec<(ShipPart, LevelProjection)>,
    pub storage: StorageProjection,
}

impl ShipProjection {
    pub fn part(&self, part: ShipPart) -> Option<&LevelProjection> {
        self.parts.iter().find(|(p, _)| *p == part).map(|(_, l)| l)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationProjection {
    pub id: u64,
    pub name: String,
    pub storage: StorageProjection,
    pub hangar: HangarProjection,
}
