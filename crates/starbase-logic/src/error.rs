//! Error types.
//!
//! Every failure is reported to the immediate caller and nothing is retried
//! internally. An operation that returns an error has left its target exactly
//! as it found it.

use thiserror::Error;

use crate::catalog::ComponentKind;
use crate::resources::ResourceKind;

pub type EconomyResult<T> = Result<T, EconomyError>;

/// Failures of the upgrade and storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    /// The catalog has no entry for this level, or the level is 0.
    #[error("no level {level} in catalog for {component}")]
    InvalidLevel { component: ComponentKind, level: u32 },

    /// Cost or upgrade requested on a component already at its max level.
    #[error("{component} is fully upgraded at level {level}")]
    UpgradeNotAvailable { component: ComponentKind, level: u32 },

    /// Storage built with contents that already exceed its capacity.
    #[error("initial resources ({stored}) exceed storage capacity ({capacity})")]
    ResourceCapacityExceeded { capacity: u64, stored: u64 },

    /// Adding resources would overflow the storage.
    #[error("not enough storage space: {requested} requested, {free} free")]
    InsufficientStorageSpace { free: u64, requested: u64 },

    /// Add/remove called with a zero amount.
    #[error("invalid amount {amount} of {resource}")]
    InvalidAmount { resource: ResourceKind, amount: u32 },

    /// Removing or paying more of a resource than is stored.
    #[error("not enough {resource}: {requested} requested, {available} available")]
    InsufficientResources {
        resource: ResourceKind,
        available: u32,
        requested: u32,
    },

    /// A part identifier the container does not own.
    #[error("{container} has no part '{part}'")]
    UnknownPart { container: &'static str, part: String },

    /// Every dock in the hangar is taken.
    #[error("hangar is full ({docks} docks)")]
    NoFreeDocks { docks: u32 },

    /// The ship is not docked in this hangar.
    #[error("ship {0} is not docked here")]
    ShipNotDocked(u64),

    /// The ship is already docked in this hangar.
    #[error("ship {0} is already docked")]
    ShipAlreadyDocked(u64),
}

/// Malformed catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level 0 listed for {0}")]
    ZeroLevel(ComponentKind),

    #[error("duplicate level {level} for {component}")]
    DuplicateLevel { component: ComponentKind, level: u32 },

    #[error("{component} levels are not contiguous: missing level {missing}")]
    MissingLevel { component: ComponentKind, missing: u32 },

    #[error("{component} effect does not increase at level {level}")]
    EffectNotIncreasing { component: ComponentKind, level: u32 },

    #[error("{component} max flag must be set on exactly the last level (level {level} is wrong)")]
    MaxFlagMisplaced { component: ComponentKind, level: u32 },

    #[error("{component} level {level} has a zero-amount cost")]
    ZeroCost { component: ComponentKind, level: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_component() {
        let e = EconomyError::UpgradeNotAvailable {
            component: ComponentKind::Shield,
            level: 5,
        };
        assert_eq!(e.to_string(), "SHIELD is fully upgraded at level 5");

        let e = EconomyError::InsufficientStorageSpace {
            free: 40,
            requested: 50,
        };
        assert!(e.to_string().contains("40 free"));
    }
}
