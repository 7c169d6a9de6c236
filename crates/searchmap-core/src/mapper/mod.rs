//! `EntityMapper`: the orchestrator over metadata, mapping commands, and
//! hydrators.
//!
//! Configuration (`set_*`, `configure`) takes `&mut self`; conversion takes
//! `&self`. A mapper can be shared across threads for conversion, but
//! reconfiguring it requires exclusive access.

mod settings;


pub use settings::{MapperSettings, ResolvedSettings};

use crate::{
    document::Document,
    error::{ConfigurationError, MapperError, MappingError},
    hydrate::{HydrationMode, Hydrator, IndexHydrator, StoreHydrator},
    mapping::MappingCommand,
    model::{MetaInformation, MetaInformationFactory},
    store::PersistenceRegistry,
    traits::MappedEntity,
};
use std::{any::TypeId, sync::Arc};
use tracing::{debug, trace};

///
/// EntityMapper
///

pub struct EntityMapper {
    factory: Arc<MetaInformationFactory>,
    command: MappingCommand,
    mode: Option<HydrationMode>,
    index: IndexHydrator,
    store: Option<StoreHydrator>,
}

impl EntityMapper {
    /// Mapper with both hydration strategies available.
    #[must_use]
    pub fn new(factory: Arc<MetaInformationFactory>, registry: Arc<dyn PersistenceRegistry>) -> Self {
        Self {
            factory,
            command: MappingCommand::default(),
            mode: None,
            index: IndexHydrator,
            store: Some(StoreHydrator::new(registry)),
        }
    }

    /// Mapper for hosts without a persistent store; only `Index` mode can be
    /// selected.
    #[must_use]
    pub fn without_store(factory: Arc<MetaInformationFactory>) -> Self {
        Self {
            factory,
            command: MappingCommand::default(),
            mode: None,
            index: IndexHydrator,
            store: None,
        }
    }

    #[must_use]
    pub fn factory(&self) -> &Arc<MetaInformationFactory> {
        &self.factory
    }

    #[must_use]
    pub const fn mapping_command(&self) -> &MappingCommand {
        &self.command
    }

    #[must_use]
    pub const fn hydration_mode(&self) -> Option<HydrationMode> {
        self.mode
    }

    // ------------------------------------------------------------------
    // configuration
    // ------------------------------------------------------------------

    pub fn set_mapping_command(&mut self, command: MappingCommand) {
        debug!(command = command.name(), "mapping command selected");
        self.command = command;
    }

    pub fn set_hydration_mode(&mut self, mode: HydrationMode) -> Result<(), ConfigurationError> {
        if mode == HydrationMode::Store && self.store.is_none() {
            return Err(ConfigurationError::StoreUnavailable);
        }

        debug!(%mode, "hydration mode selected");
        self.mode = Some(mode);

        Ok(())
    }

    /// Select a mode by name (`index`, `store`, or the `doctrine` alias).
    /// Unknown names leave the current mode untouched.
    pub fn set_hydration_mode_name(&mut self, name: &str) -> Result<(), ConfigurationError> {
        let mode = name.parse::<HydrationMode>()?;

        self.set_hydration_mode(mode)
    }

    /// Apply settings all-or-nothing: every name is resolved and checked
    /// before anything changes.
    pub fn configure(&mut self, settings: &MapperSettings) -> Result<(), ConfigurationError> {
        let resolved = settings.resolve()?;

        if resolved.hydration_mode == Some(HydrationMode::Store) && self.store.is_none() {
            return Err(ConfigurationError::StoreUnavailable);
        }
        if let Some(mode) = resolved.hydration_mode {
            self.set_hydration_mode(mode)?;
        }
        if let Some(command) = resolved.mapping_command {
            self.set_mapping_command(command);
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // write path
    // ------------------------------------------------------------------

    /// Map `entity` to a document with the active command.
    ///
    /// Returns `Ok(None)` when the metadata is not indexable or the instance
    /// declines through `should_index`; neither is an error.
    pub fn to_document<E: MappedEntity>(
        &self,
        entity: &E,
        meta: &MetaInformation,
    ) -> Result<Option<Document>, MapperError> {
        if meta.type_id() != TypeId::of::<E>() {
            return Err(MappingError::EntityMismatch {
                expected: meta.path(),
                found: E::PATH,
            }
            .into());
        }
        if !meta.is_indexable() {
            trace!(entity = meta.path(), "entity not indexable, no document");
            return Ok(None);
        }
        if !entity.should_index() {
            trace!(entity = meta.path(), "instance filtered out, no document");
            return Ok(None);
        }

        let document = self.command.map_to_document(entity, meta)?;

        Ok(Some(document))
    }

    /// `to_document` with metadata resolved through this mapper's factory.
    pub fn document_for<E: MappedEntity>(&self, entity: &E) -> Result<Option<Document>, MapperError> {
        let meta = self.factory.meta_information::<E>()?;

        self.to_document(entity, &meta)
    }

    // ------------------------------------------------------------------
    // read path
    // ------------------------------------------------------------------

    /// Hydrate `target` from `document` with the hydrator bound to the
    /// current mode.
    ///
    /// `Index` mutates the caller's instance in place; `Store` replaces it
    /// with the canonical store entity plus the index-authoritative overlay.
    pub fn to_entity<E: MappedEntity>(
        &self,
        document: &Document,
        target: &mut E,
    ) -> Result<(), MapperError> {
        let mode = self.mode.ok_or(ConfigurationError::HydrationModeUnset)?;
        let meta = self.factory.meta_information::<E>()?;

        match mode {
            HydrationMode::Index => self.index.hydrate(document, target, &meta),
            HydrationMode::Store => self
                .store
                .as_ref()
                .ok_or(ConfigurationError::StoreUnavailable)?
                .hydrate(document, target, &meta),
        }
    }
}
