use crate::{
    document::Document,
    error::MapperError,
    hydrate::{DecodedField, Hydrator, apply, decode_fields, document_entity_id, identifier},
    model::MetaInformation,
    traits::MappedEntity,
};
use tracing::trace;

///
/// IndexHydrator
///
/// Populates the target from document data only. Used after index-only
/// queries or whenever the store is unavailable.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct IndexHydrator;

impl Hydrator for IndexHydrator {
    fn hydrate<E: MappedEntity>(
        &self,
        document: &Document,
        target: &mut E,
        meta: &MetaInformation,
    ) -> Result<(), MapperError> {
        let id = document_entity_id(document, meta)?;
        let identifier = identifier(meta)?;

        let mut fields = vec![DecodedField {
            name: &identifier.name,
            value: id,
        }];
        fields.extend(decode_fields(document, meta, |_| true)?);

        apply(target, meta, &fields)?;

        trace!(
            entity = meta.path(),
            fields = fields.len(),
            "hydrated entity from index"
        );

        Ok(())
    }
}
