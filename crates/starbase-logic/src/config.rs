//! Economy configuration.
//!
//! Which catalog to load, the level new parts start at, and what a new
//! station holds on day one. Read from JSON; every field has a default.
//!
//! ```
//! use starbase_logic::config::{validate_config, EconomyConfig};
//!
//! let config = EconomyConfig::from_json(r#"{ "starting_level": 1 }"#).unwrap();
//! let catalog = config.load_catalog().unwrap();
//! assert!(validate_config(&config, &catalog).is_empty());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{ComponentKind, InMemoryCatalog, LevelCatalog};
use crate::error::CatalogError;
use crate::resources::{self, ResourceKind, ResourceMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Catalog JSON file. `None` uses the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    /// Level of every part on a newly created ship or station.
    pub starting_level: u32,
    /// Contents of a newly created station's storage.
    pub station_starting_resources: ResourceMap,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        let mut station_starting_resources = ResourceMap::new();
        station_starting_resources.insert(ResourceKind::Metal, 150);
        station_starting_resources.insert(ResourceKind::Crystal, 50);
        Self {
            catalog_path: None,
            starting_level: 1,
            station_starting_resources,
        }
    }
}

/// Failure to read configuration or the catalog it names.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl EconomyConfig {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        Self::from_json(&read(path)?)
    }

    /// Load the configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<InMemoryCatalog, LoadError> {
        let catalog = match &self.catalog_path {
            Some(path) => InMemoryCatalog::from_json(&read(path)?)?,
            None => InMemoryCatalog::builtin()?,
        };
        log::info!("catalog loaded: {} levels", catalog.len());
        Ok(catalog)
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Levels start at 1.
    StartingLevelZero,
    /// The catalog has no such level for this component.
    StartingLevelMissing(ComponentKind),
    /// Starting station resources do not fit in the starting station storage.
    StartingResourcesExceedCapacity { stored: u64, capacity: u64 },
}

/// Check a configuration against the catalog it will run with, returning
/// all errors found.
pub fn validate_config(config: &EconomyConfig, catalog: &dyn LevelCatalog) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.starting_level == 0 {
        errors.push(ConfigError::StartingLevelZero);
        return errors;
    }

    for &component in ComponentKind::all() {
        if catalog.level(component, config.starting_level).is_none() {
            errors.push(ConfigError::StartingLevelMissing(component));
        }
    }

    if let Some(level) = catalog.level(ComponentKind::StationStorage, config.starting_level) {
        let stored = resources::total(&config.station_starting_resources);
        let capacity = level.effect as u64;
        if stored > capacity {
            errors.push(ConfigError::StartingResourcesExceedCapacity { stored, capacity });
        }
    }

    errors
}
