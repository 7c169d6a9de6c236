//! TOML configuration for searchmap.
//!
//! ```toml
//! [mapper]
//! hydration_mode = "store"
//! mapping_command = "map_all_fields"
//!
//! [entities."blog::Post"]
//! indexable = true
//! identifier = "id"
//! fields = [
//!     { name = "id", kind = "int" },
//!     { name = "title", kind = "text", boost = 2.0 },
//! ]
//! ```

mod source;


pub use source::TableMappingSource;

use searchmap_core::{
    error::ConfigurationError,
    mapper::{MapperSettings, ResolvedSettings},
    model::EntityMapping,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;
use tracing::{debug, warn};

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("entity '{entity}': {message}")]
    Entity { entity: String, message: String },
}

///
/// SearchmapConfig
///
/// Mapper settings plus per-entity mapping tables, keyed by entity path.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchmapConfig {
    pub mapper: MapperSettings,
    pub entities: BTreeMap<String, EntityMapping>,
}

impl SearchmapConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;

        debug!(
            entities = config.entities.len(),
            hydration_mode = config.mapper.hydration_mode.as_deref(),
            "loaded searchmap config"
        );

        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&input)
    }

    /// Check that every name resolves and every table is usable as a mapping.
    ///
    /// Full field validation happens when the metadata factory builds the
    /// entity; here only what needs no entity type is checked.
    pub fn validate(&self) -> Result<ResolvedSettings, ConfigError> {
        let resolved = self.mapper.resolve()?;

        for (entity, mapping) in &self.entities {
            if entity.trim().is_empty() {
                return Err(ConfigError::Entity {
                    entity: entity.clone(),
                    message: "entity path is empty".to_string(),
                });
            }
            if mapping.indexable && mapping.identifier.is_none() {
                return Err(ConfigError::Entity {
                    entity: entity.clone(),
                    message: "indexable entity declares no identifier".to_string(),
                });
            }
        }

        for entity in self.dormant_tables() {
            warn!(entity, "table declares an identifier but is not indexable");
        }

        Ok(resolved)
    }

    /// Tables that name an identifier but leave `indexable` unset, so they
    /// never produce documents.
    pub fn dormant_tables(&self) -> impl Iterator<Item = &str> {
        self.entities
            .iter()
            .filter(|(_, mapping)| !mapping.indexable && mapping.identifier.is_some())
            .map(|(entity, _)| entity.as_str())
    }

    /// Mapping source over this config's entity tables.
    #[must_use]
    pub fn mapping_source(&self) -> TableMappingSource {
        TableMappingSource::new(self.entities.clone())
    }
}
