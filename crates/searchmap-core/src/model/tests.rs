use crate::{
    error::MappingError,
    model::{
        EntityMapping, EntityType, FieldKind, FieldMapping, MappingSource, MetaInformation,
        MetaInformationFactory,
    },
    test_support::{Article, AuditEntry, ValidTestEntity},
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

// ---- helpers -----------------------------------------------------------

fn build(mapping: EntityMapping) -> Result<MetaInformation, MappingError> {
    MetaInformation::build(&EntityType::of::<Article>(), mapping)
}

///
/// CountingSource
/// Declared source that counts reads.
///

#[derive(Default)]
struct CountingSource {
    reads: AtomicUsize,
}

impl MappingSource for CountingSource {
    fn read_field_mappings(&self, entity: &EntityType) -> Result<EntityMapping, MappingError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(entity.declared_mapping())
    }
}

///
/// FailingSource
///

struct FailingSource;

impl MappingSource for FailingSource {
    fn read_field_mappings(&self, entity: &EntityType) -> Result<EntityMapping, MappingError> {
        Err(MappingError::Source {
            entity: entity.path().to_string(),
            message: "annotation reader offline".to_string(),
        })
    }
}

// ---- build -------------------------------------------------------------

#[test]
fn document_names_derive_from_kind_suffix() {
    let meta = MetaInformationFactory::declared()
        .meta_information::<Article>()
        .expect("article metadata should build");

    let names: Vec<_> = meta
        .fields()
        .iter()
        .map(|f| (f.name.as_str(), f.document_name.as_str()))
        .collect();

    assert_eq!(
        names,
        vec![
            ("title", "title_t"),
            ("body", "body_t"),
            ("tags", "tags_ss"),
            ("views", "views_i"),
            ("rating", "rating_d"),
            ("published", "published_dt"),
            ("featured", "is_featured"),
            ("draft_notes", "draft_notes_t"),
        ],
        "declared order is kept and explicit names win over suffixes"
    );
}

#[test]
fn identifier_is_split_from_mapped_fields() {
    let meta = MetaInformationFactory::declared()
        .meta_information::<Article>()
        .expect("article metadata should build");

    let identifier = meta.identifier().expect("article declares an identifier");
    assert_eq!(identifier.name, "id");
    assert_eq!(identifier.kind, FieldKind::Int);
    assert!(meta.field("id").is_none(), "identifier is not a regular field");
    assert_eq!(meta.document_name(), "article");
    assert_eq!(meta.index(), Some("articles"));
}

#[test]
fn document_key_round_trips_through_prefix() {
    let meta = MetaInformationFactory::declared()
        .meta_information::<ValidTestEntity>()
        .expect("scenario metadata should build");

    let key = meta
        .document_key(&1_i64.into())
        .expect("int identifiers form keys");
    assert_eq!(key, "document_1");
    assert_eq!(meta.entity_id_from_key(&key), "1");
    assert_eq!(meta.entity_id_from_key("42"), "42", "raw ids pass through");
    assert_eq!(meta.entity_id_from_key("document_"), "document_");
}

#[test]
fn non_indexable_entity_builds_without_identifier() {
    let meta = MetaInformationFactory::declared()
        .meta_information::<AuditEntry>()
        .expect("non-indexable metadata is not an error");

    assert!(!meta.is_indexable());
    assert!(meta.identifier().is_none());
    assert_eq!(meta.fields().len(), 1);
}

#[test]
fn conflicting_document_names_are_rejected() {
    let err = build(
        EntityMapping::indexable("id")
            .field(FieldMapping::new("id", FieldKind::Int))
            .field(FieldMapping::new("title", FieldKind::Text))
            .field(FieldMapping::new("heading", FieldKind::Text).document_name("title_t")),
    )
    .expect_err("two fields on one document name must fail");

    assert!(
        matches!(
            &err,
            MappingError::DuplicateDocumentField { document_field, first, second, .. }
                if document_field == "title_t" && first == "title" && second == "heading"
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn reserved_key_field_cannot_be_claimed() {
    let err = build(
        EntityMapping::indexable("id")
            .field(FieldMapping::new("id", FieldKind::Int))
            .field(FieldMapping::new("slug", FieldKind::String).document_name("id")),
    )
    .expect_err("'id' is reserved for the document key");

    assert!(matches!(err, MappingError::ReservedDocumentField { .. }));
}

#[test]
fn indexable_without_identifier_is_rejected() {
    let mut mapping = EntityMapping::indexable("id");
    mapping.identifier = None;
    let err = build(mapping.field(FieldMapping::new("title", FieldKind::Text)))
        .expect_err("indexable entities need an identifier");

    assert!(matches!(err, MappingError::MissingIdentifier { .. }));
}

#[test]
fn identifier_must_be_declared() {
    let err = build(EntityMapping::indexable("uuid").field(FieldMapping::new("title", FieldKind::Text)))
        .expect_err("identifier must name a declared field");

    assert!(matches!(
        err,
        MappingError::UnknownIdentifier { ref field, .. } if field == "uuid"
    ));
}

#[test]
fn duplicate_and_empty_field_names_are_rejected() {
    let dup = build(
        EntityMapping::indexable("id")
            .field(FieldMapping::new("id", FieldKind::Int))
            .field(FieldMapping::new("title", FieldKind::Text))
            .field(FieldMapping::new("title", FieldKind::String)),
    )
    .expect_err("duplicate field");
    assert!(matches!(dup, MappingError::DuplicateField { .. }));

    let empty = build(EntityMapping::not_indexable().field(FieldMapping::new(" ", FieldKind::Text)))
        .expect_err("empty field");
    assert!(matches!(empty, MappingError::EmptyFieldName { .. }));
}

#[test]
fn empty_document_names_are_rejected() {
    let err = build(
        EntityMapping::indexable("id")
            .document_name("")
            .field(FieldMapping::new("id", FieldKind::Int)),
    )
    .expect_err("empty document name would key documents as '_1'");
    assert!(matches!(err, MappingError::EmptyDocumentName { .. }));

    let err = build(
        EntityMapping::indexable("id")
            .field(FieldMapping::new("id", FieldKind::Int))
            .field(FieldMapping::new("title", FieldKind::Text).document_name(" ")),
    )
    .expect_err("blank document field");
    assert!(matches!(
        err,
        MappingError::EmptyDocumentField { ref field, .. } if field == "title"
    ));
}

#[test]
fn nested_list_kind_is_unsupported() {
    let err = build(
        EntityMapping::not_indexable().field(FieldMapping::new(
            "matrix",
            FieldKind::list_of(FieldKind::list_of(FieldKind::Int)),
        )),
    )
    .expect_err("nested lists are not document values");

    assert!(matches!(err, MappingError::UnsupportedKind { .. }));
}

#[test]
fn field_kind_names_parse_and_display() {
    for name in ["string", "text", "int", "float", "bool", "date", "list<string>", "list<date>"] {
        let kind: FieldKind = name.parse().expect("known kind should parse");
        assert_eq!(kind.to_string(), name);
    }

    assert_eq!("Integer".parse::<FieldKind>(), Ok(FieldKind::Int));
    assert!("list<list<int>>".parse::<FieldKind>().is_ok(), "build rejects nesting, not parse");
    assert!("uuid".parse::<FieldKind>().is_err());
}

// ---- factory -----------------------------------------------------------

#[test]
fn factory_reads_each_type_once() {
    let source = Arc::new(CountingSource::default());
    let factory = MetaInformationFactory::with_source(Arc::clone(&source) as Arc<dyn MappingSource>);

    let first = factory
        .meta_information::<Article>()
        .expect("first lookup should build");
    let second = factory
        .meta_information::<Article>()
        .expect("second lookup should hit cache");

    assert_eq!(*first, *second, "cached metadata must be value-equal");
    assert!(Arc::ptr_eq(&first, &second), "cache hands out the same instance");
    assert_eq!(source.reads.load(Ordering::SeqCst), 1);
    assert_eq!(factory.len(), 1);
}

#[test]
fn instance_and_type_lookups_share_cache() {
    let factory = MetaInformationFactory::declared();
    let by_type = factory
        .meta_information::<ValidTestEntity>()
        .expect("type lookup should build");
    let by_instance = factory
        .meta_information_for(&ValidTestEntity::default())
        .expect("instance lookup should build");

    assert!(Arc::ptr_eq(&by_type, &by_instance));
}

#[test]
fn clear_forces_a_reread() {
    let source = Arc::new(CountingSource::default());
    let factory = MetaInformationFactory::with_source(Arc::clone(&source) as Arc<dyn MappingSource>);

    factory.meta_information::<Article>().expect("build");
    factory.clear();
    assert!(factory.is_empty());
    factory.meta_information::<Article>().expect("rebuild");

    assert_eq!(source.reads.load(Ordering::SeqCst), 2);
}

#[test]
fn source_failures_surface_and_are_not_cached() {
    let factory = MetaInformationFactory::new(FailingSource);

    let err = factory
        .meta_information::<Article>()
        .expect_err("failing source should fail lookup");
    assert!(err.to_string().contains("annotation reader offline"));
    assert!(factory.is_empty(), "failures must not poison the cache");
}

#[test]
fn concurrent_first_lookups_agree() {
    let factory = Arc::new(MetaInformationFactory::declared());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let factory = Arc::clone(&factory);
            thread::spawn(move || {
                factory
                    .meta_information::<Article>()
                    .expect("concurrent lookup should build")
            })
        })
        .collect();

    let metas: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("lookup thread should not panic"))
        .collect();

    for meta in &metas {
        assert!(Arc::ptr_eq(meta, &metas[0]), "first writer wins for everyone");
    }
    assert_eq!(factory.len(), 1);
}

#[test]
fn global_factory_is_shared() {
    let a = MetaInformationFactory::global();
    let b = MetaInformationFactory::global();

    assert!(Arc::ptr_eq(&a, &b));
    a.meta_information::<ValidTestEntity>()
        .expect("global factory reads declared mappings");
}
