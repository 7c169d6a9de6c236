use crate::{
    error::MappingError,
    model::{DeclaredMappingSource, EntityType, MappingSource, MetaInformation},
    traits::MappedEntity,
};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};
use tracing::debug;

///
/// GLOBAL
/// process-wide factory over in-code declarations, built on first use
///

static GLOBAL: LazyLock<Arc<MetaInformationFactory>> =
    LazyLock::new(|| Arc::new(MetaInformationFactory::declared()));

///
/// MetaInformationFactory
///
/// Derives `MetaInformation` through a `MappingSource` and caches it by
/// type identity. Readers share the read lock; a miss is computed outside
/// the lock and inserted first-writer-wins, so racing callers for the same
/// type all observe one complete instance.
///

pub struct MetaInformationFactory {
    source: Arc<dyn MappingSource>,
    cache: RwLock<HashMap<TypeId, Arc<MetaInformation>>>,
}

impl MetaInformationFactory {
    #[must_use]
    pub fn new(source: impl MappingSource + 'static) -> Self {
        Self::with_source(Arc::new(source))
    }

    #[must_use]
    pub fn with_source(source: Arc<dyn MappingSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Factory over the mappings entity types declare in code.
    #[must_use]
    pub fn declared() -> Self {
        Self::new(DeclaredMappingSource)
    }

    /// The shared process-wide factory.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    pub fn meta_information<E: MappedEntity>(&self) -> Result<Arc<MetaInformation>, MappingError> {
        self.resolve(&EntityType::of::<E>())
    }

    /// Instance form of `meta_information`; only the type of `entity` matters.
    pub fn meta_information_for<E: MappedEntity>(
        &self,
        _entity: &E,
    ) -> Result<Arc<MetaInformation>, MappingError> {
        self.meta_information::<E>()
    }

    pub fn resolve(&self, entity: &EntityType) -> Result<Arc<MetaInformation>, MappingError> {
        if let Some(meta) = self.cached(entity.type_id()) {
            return Ok(meta);
        }

        let mapping = self.source.read_field_mappings(entity)?;
        let meta = Arc::new(MetaInformation::build(entity, mapping)?);

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let entry = cache.entry(entity.type_id()).or_insert_with(|| {
            debug!(
                entity = entity.path(),
                fields = meta.fields().len(),
                indexable = meta.is_indexable(),
                "cached entity metadata"
            );
            meta
        });

        Ok(Arc::clone(entry))
    }

    /// Number of cached entity types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached entry; the next request re-reads its source.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn cached(&self, type_id: TypeId) -> Option<Arc<MetaInformation>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }
}

impl Default for MetaInformationFactory {
    fn default() -> Self {
        Self::declared()
    }
}
