//! Shared fixtures for core unit tests.

use crate::{
    error::StoreError,
    model::{EntityMapping, EntityType, FieldKind, FieldMapping},
    store::{MemoryRegistry, MemoryRepository, ObjectManager, PersistenceRegistry, Repository},
    value::Value,
};
use std::{
    any::Any,
    sync::{Arc, Mutex, PoisonError},
};

mapped_entity! {
    ///
    /// Article
    /// General-purpose indexable entity covering every field kind.
    ///
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Article {
        pub id: i64,
        pub title: String,
        pub body: Option<String>,
        pub tags: Vec<String>,
        pub views: i64,
        pub rating: Option<f64>,
        pub published: Option<i64>,
        pub featured: bool,
        pub draft_notes: Option<String>,
    }

    path: "tests::Article",
    mapping: EntityMapping::indexable("id")
        .index("articles")
        .field(FieldMapping::new("id", FieldKind::Int))
        .field(FieldMapping::new("title", FieldKind::Text).not_null().boost(2.0))
        .field(FieldMapping::new("body", FieldKind::Text))
        .field(FieldMapping::new("tags", FieldKind::list_of(FieldKind::String)))
        .field(FieldMapping::new("views", FieldKind::Int).index_authoritative())
        .field(FieldMapping::new("rating", FieldKind::Float))
        .field(FieldMapping::new("published", FieldKind::Date))
        .field(FieldMapping::new("featured", FieldKind::Bool).document_name("is_featured"))
        .field(FieldMapping::new("draft_notes", FieldKind::Text).not_indexed()),
}

mapped_entity! {
    ///
    /// ValidTestEntity
    /// Store-backed scenario entity: `title` comes from the index.
    ///
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct ValidTestEntity {
        pub id: i64,
        pub field: Option<String>,
        pub title: Option<String>,
    }

    path: "tests::ValidTestEntity",
    mapping: EntityMapping::indexable("id")
        .document_name("document")
        .field(FieldMapping::new("id", FieldKind::Int))
        .field(FieldMapping::new("field", FieldKind::String))
        .field(FieldMapping::new("title", FieldKind::String).index_authoritative()),
}

mapped_entity! {
    ///
    /// AuditEntry
    /// Declares itself non-indexable.
    ///
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct AuditEntry {
        pub id: i64,
        pub message: String,
    }

    path: "tests::AuditEntry",
    mapping: EntityMapping::not_indexable()
        .field(FieldMapping::new("message", FieldKind::Text)),
}

mapped_entity! {
    ///
    /// Counter
    /// Narrow and unsigned integer fields behind int document fields.
    ///
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Counter {
        pub id: i64,
        pub title: String,
        pub small: i32,
        pub hits: u64,
    }

    path: "tests::Counter",
    mapping: EntityMapping::indexable("id")
        .field(FieldMapping::new("id", FieldKind::Int))
        .field(FieldMapping::new("title", FieldKind::Text))
        .field(FieldMapping::new("small", FieldKind::Int))
        .field(FieldMapping::new("hits", FieldKind::Int).not_null()),
}

/// Build an article with the given id and title; other fields default.
#[must_use]
pub fn article(id: i64, title: &str) -> Article {
    Article {
        id,
        title: title.to_string(),
        ..Article::default()
    }
}

///
/// CallLog
/// Shared record of persistence calls made through `CountingRegistry`.
///

#[derive(Clone, Debug, Default)]
pub struct CallLog {
    inner: Arc<Mutex<CallLogInner>>,
}

#[derive(Debug, Default)]
struct CallLogInner {
    manager_calls: usize,
    find_ids: Vec<Value>,
}

impl CallLog {
    pub fn manager_calls(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .manager_calls
    }

    pub fn find_ids(&self) -> Vec<Value> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .find_ids
            .clone()
    }

    fn record_manager(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .manager_calls += 1;
    }

    fn record_find(&self, id: &Value) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .find_ids
            .push(id.clone());
    }
}

///
/// CountingRegistry
/// Wraps a `MemoryRegistry` and records every lookup.
///

#[derive(Default)]
pub struct CountingRegistry {
    inner: MemoryRegistry,
    log: CallLog,
}

impl CountingRegistry {
    pub fn new() -> Self {
        Self {
            inner: MemoryRegistry::new(),
            log: CallLog::default(),
        }
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn seed<E>(&self, rows: impl IntoIterator<Item = (i64, E)>)
    where
        E: crate::traits::MappedEntity + Clone + Sync,
    {
        let repo = self.inner.register(MemoryRepository::<E>::new());
        for (id, row) in rows {
            repo.insert(id, row).expect("seeding test repository should succeed");
        }
    }
}

impl PersistenceRegistry for CountingRegistry {
    fn manager_for(&self, entity: &EntityType) -> Result<Arc<dyn ObjectManager>, StoreError> {
        self.log.record_manager();
        let manager = self.inner.manager_for(entity)?;

        Ok(Arc::new(CountingManager {
            inner: manager,
            log: self.log.clone(),
        }))
    }
}

struct CountingManager {
    inner: Arc<dyn ObjectManager>,
    log: CallLog,
}

impl ObjectManager for CountingManager {
    fn repository(&self, entity: &EntityType) -> Result<Arc<dyn Repository>, StoreError> {
        let inner = self.inner.repository(entity)?;

        Ok(Arc::new(CountingRepository {
            inner,
            log: self.log.clone(),
        }))
    }
}

struct CountingRepository {
    inner: Arc<dyn Repository>,
    log: CallLog,
}

impl Repository for CountingRepository {
    fn find(&self, id: &Value) -> Result<Option<Box<dyn Any + Send>>, StoreError> {
        self.log.record_find(id);
        self.inner.find(id)
    }
}
