use crate::{error::ConfigurationError, hydrate::HydrationMode, mapping::MappingCommand};
use serde::{Deserialize, Serialize};

///
/// MapperSettings
///
/// Serializable mapper configuration. Names are resolved by `resolve`;
/// absent entries leave the mapper's current selection alone.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hydration_mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_command: Option<String>,

    /// Entity fields written by `map_changed_fields`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changed_fields: Vec<String>,
}

///
/// ResolvedSettings
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResolvedSettings {
    pub hydration_mode: Option<HydrationMode>,
    pub mapping_command: Option<MappingCommand>,
}

impl MapperSettings {
    /// Parse every named selection; fails on the first unknown name.
    pub fn resolve(&self) -> Result<ResolvedSettings, ConfigurationError> {
        let hydration_mode = self
            .hydration_mode
            .as_deref()
            .map(str::parse::<HydrationMode>)
            .transpose()?;

        let mapping_command = self
            .mapping_command
            .as_deref()
            .map(str::parse::<MappingCommand>)
            .transpose()?
            .map(|command| match command {
                MappingCommand::MapChangedFields(_) => {
                    MappingCommand::changed_fields(self.changed_fields.iter().cloned())
                }
                other => other,
            });

        Ok(ResolvedSettings {
            hydration_mode,
            mapping_command,
        })
    }
}
