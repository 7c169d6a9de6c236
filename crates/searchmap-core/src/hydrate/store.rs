use crate::{
    document::Document,
    error::{EntityNotFoundError, HydrationError, MapperError},
    hydrate::{Hydrator, apply, decode_fields, document_entity_id},
    model::{EntityType, FieldDescriptor, MetaInformation},
    store::PersistenceRegistry,
    traits::MappedEntity,
};
use std::sync::Arc;
use tracing::{trace, warn};

///
/// StoreHydrator
///
/// Resolves the canonical entity through the persistence registry, then
/// overlays the fields the metadata marks index-authoritative. The target
/// slot receives the canonical instance.
///

#[derive(Clone)]
pub struct StoreHydrator {
    registry: Arc<dyn PersistenceRegistry>,
}

impl StoreHydrator {
    #[must_use]
    pub fn new(registry: Arc<dyn PersistenceRegistry>) -> Self {
        Self { registry }
    }
}

impl Hydrator for StoreHydrator {
    fn hydrate<E: MappedEntity>(
        &self,
        document: &Document,
        target: &mut E,
        meta: &MetaInformation,
    ) -> Result<(), MapperError> {
        let id = document_entity_id(document, meta)?;
        let overlay = decode_fields(document, meta, FieldDescriptor::is_index_authoritative)?;

        let entity = EntityType::of::<E>();
        let repository = self.registry.manager_for(&entity)?.repository(&entity)?;

        let Some(found) = repository.find(&id)? else {
            warn!(entity = meta.path(), id = ?id, "document has no matching store entity");

            return Err(EntityNotFoundError {
                entity: meta.path().to_string(),
                id: id.key_string().unwrap_or_default(),
            }
            .into());
        };
        let mut canonical = found
            .downcast::<E>()
            .map_err(|_| HydrationError::EntityType {
                entity: meta.path().to_string(),
            })?;

        apply(canonical.as_mut(), meta, &overlay)?;
        *target = *canonical;

        trace!(
            entity = meta.path(),
            overlay = overlay.len(),
            "hydrated entity from store"
        );

        Ok(())
    }
}
