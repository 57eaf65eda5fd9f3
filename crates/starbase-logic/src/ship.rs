//! Ships and their part table.
//!
//! Every ship has an engine, a shield and a storage. Miners add a drill,
//! scouts a scanner. The set of parts is fixed by the ship kind when the ship
//! is built; upgrades change levels, never the shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{ComponentKind, LevelCatalog, LevelCost};
use crate::error::{EconomyError, EconomyResult};
use crate::projection::{LevelProjection, ShipProjection};
use crate::resources::ResourceMap;
use crate::storage::ResourceStorage;
use crate::upgradeable::Upgradeable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipKind {
    Miner,
    Scout,
}

impl ShipKind {
    /// Parts owned by this kind, in display order.
    pub fn parts(self) -> &'static [ShipPart] {
        match self {
            ShipKind::Miner => &[
                ShipPart::Engine,
                ShipPart::Shield,
                ShipPart::Drill,
                ShipPart::Storage,
            ],
            ShipKind::Scout => &[
                ShipPart::Engine,
                ShipPart::Shield,
                ShipPart::Scanner,
                ShipPart::Storage,
            ],
        }
    }

    /// The kind-specific part.
    pub fn tool(self) -> ShipPart {
        match self {
            ShipKind::Miner => ShipPart::Drill,
            ShipKind::Scout => ShipPart::Scanner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipPart {
    Engine,
    Shield,
    Drill,
    Scanner,
    Storage,
}

impl ShipPart {
    pub fn component(self) -> ComponentKind {
        match self {
            ShipPart::Engine => ComponentKind::Engine,
            ShipPart::Shield => ComponentKind::Shield,
            ShipPart::Drill => ComponentKind::Drill,
            ShipPart::Scanner => ComponentKind::Scanner,
            ShipPart::Storage => ComponentKind::ShipStorage,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShipPart::Engine => "ENGINE",
            ShipPart::Shield => "SHIELD",
            ShipPart::Drill => "DRILL",
            ShipPart::Scanner => "SCANNER",
            ShipPart::Storage => "STORAGE",
        }
    }
}

impl fmt::Display for ShipPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShipPart {
    type Err = EconomyError;

    /// Case-insensitive, as sent by the client (`"engine"`, `"DRILL"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ENGINE" => Ok(ShipPart::Engine),
            "SHIELD" => Ok(ShipPart::Shield),
            "DRILL" => Ok(ShipPart::Drill),
            "SCANNER" => Ok(ShipPart::Scanner),
            "STORAGE" => Ok(ShipPart::Storage),
            _ => Err(EconomyError::UnknownPart {
                container: "ship",
                part: s.to_string(),
            }),
        }
    }
}

/// A ship and its leveled parts.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceShip {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) color: ShipColor,
    pub(crate) kind: ShipKind,
    pub(crate) engine: Upgradeable,
    pub(crate) shield: Upgradeable,
    pub(crate) shield_energy: u32,
    /// Drill for miners, scanner for scouts.
    pub(crate) tool: Upgradeable,
    pub(crate) storage: ResourceStorage,
}

impl SpaceShip {
    /// Build a ship with every part at `starting_level`, an empty hold and a
    /// fully charged shield. Fails with the first part that cannot be built.
    pub fn create_new(
        catalog: &dyn LevelCatalog,
        id: u64,
        name: impl Into<String>,
        color: ShipColor,
        kind: ShipKind,
        starting_level: u32,
    ) -> EconomyResult<Self> {
        let engine = Upgradeable::new(catalog, ComponentKind::Engine, starting_level)?;
        let shield = Upgradeable::new(catalog, ComponentKind::Shield, starting_level)?;
        let tool = Upgradeable::new(catalog, kind.tool().component(), starting_level)?;
        let storage = ResourceStorage::new(
            catalog,
            ComponentKind::ShipStorage,
            starting_level,
            ResourceMap::new(),
        )?;
        let shield_energy = shield.effect();
        Ok(Self {
            id,
            name: name.into(),
            color,
            kind,
            engine,
            shield,
            shield_energy,
            tool,
            storage,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> ShipColor {
        self.color
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    pub fn storage(&self) -> &ResourceStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut ResourceStorage {
        &mut self.storage
    }

    /// The leveled state behind `part`, or [`EconomyError::UnknownPart`] if
    /// this kind of ship has no such part.
    pub fn part(&self, part: ShipPart) -> EconomyResult<&Upgradeable> {
        match part {
            ShipPart::Engine => Ok(&self.engine),
            ShipPart::Shield => Ok(&self.shield),
            ShipPart::Storage => Ok(self.storage.leveled()),
            ShipPart::Drill | ShipPart::Scanner if part == self.kind.tool() => Ok(&self.tool),
            _ => Err(self.unknown_part(part)),
        }
    }

    fn part_mut(&mut self, part: ShipPart) -> EconomyResult<&mut Upgradeable> {
        match part {
            ShipPart::Engine => Ok(&mut self.engine),
            ShipPart::Shield => Ok(&mut self.shield),
            ShipPart::Storage => Ok(self.storage.leveled_mut()),
            ShipPart::Drill | ShipPart::Scanner if part == self.kind.tool() => Ok(&mut self.tool),
            _ => Err(self.unknown_part(part)),
        }
    }

    fn unknown_part(&self, part: ShipPart) -> EconomyError {
        EconomyError::UnknownPart {
            container: match self.kind {
                ShipKind::Miner => "miner ship",
                ShipKind::Scout => "scout ship",
            },
            part: part.name().to_string(),
        }
    }

    pub fn upgrade_cost(
        &self,
        catalog: &dyn LevelCatalog,
        part: ShipPart,
    ) -> EconomyResult<Vec<LevelCost>> {
        self.part(part)?.upgrade_cost(catalog)
    }

    /// Advance `part` one level. Does not pay for it; see
    /// [`crate::orchestration::upgrade_ship_part`].
    pub fn upgrade_part(
        &mut self,
        catalog: &dyn LevelCatalog,
        part: ShipPart,
    ) -> EconomyResult<LevelProjection> {
        let id = self.id;
        let upgraded = self.part_mut(part)?;
        upgraded.upgrade(catalog)?;
        log::info!("ship {} {} now level {}", id, part, upgraded.level());
        Ok(upgraded.projection())
    }

    pub fn shield_energy(&self) -> u32 {
        self.shield_energy
    }

    /// Absorb `amount` of damage. Returns the energy left.
    pub fn damage_shield(&mut self, amount: u32) -> u32 {
        self.shield_energy = self.shield_energy.saturating_sub(amount);
        self.shield_energy
    }

    /// Recharge up to the shield's current effect. Returns the energy now held.
    pub fn repair_shield(&mut self, amount: u32) -> u32 {
        self.shield_energy = self
            .shield_energy
            .saturating_add(amount)
            .min(self.shield.effect());
        self.shield_energy
    }

    pub fn detailed_projection(&self) -> ShipProjection {
        let parts = self
            .kind
            .parts()
            .iter()
            .filter(|&&p| p != ShipPart::Storage)
            .filter_map(|&p| self.part(p).ok().map(|u| (p, u.projection())))
            .collect();
        ShipProjection {
            id: self.id,
            name: self.name.clone(),
            color: self.color,
            kind: self.kind,
            shield_energy: self.shield_energy,
            parts,
            storage: self.storage.projection(),
        }
    }
}
