use searchmap_core::{
    error::MappingError,
    model::{EntityMapping, EntityType, MappingSource},
};
use std::collections::BTreeMap;
use tracing::trace;

///
/// TableMappingSource
///
/// Mapping tables keyed by entity path. Types without a table fall back to
/// the mapping they declare in code.
///

#[derive(Clone, Debug, Default)]
pub struct TableMappingSource {
    tables: BTreeMap<String, EntityMapping>,
}

impl TableMappingSource {
    #[must_use]
    pub const fn new(tables: BTreeMap<String, EntityMapping>) -> Self {
        Self { tables }
    }

    #[must_use]
    pub fn with_table(mut self, path: impl Into<String>, mapping: EntityMapping) -> Self {
        self.tables.insert(path.into(), mapping);
        self
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.tables.contains_key(path)
    }
}

impl MappingSource for TableMappingSource {
    fn read_field_mappings(&self, entity: &EntityType) -> Result<EntityMapping, MappingError> {
        if let Some(mapping) = self.tables.get(entity.path()) {
            trace!(entity = entity.path(), "mapping read from config table");

            return Ok(mapping.clone());
        }

        Ok(entity.declared_mapping())
    }
}
