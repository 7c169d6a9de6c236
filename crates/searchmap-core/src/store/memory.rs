use crate::{
    error::StoreError,
    model::EntityType,
    store::{ObjectManager, PersistenceRegistry, Repository},
    traits::MappedEntity,
    value::Value,
};
use std::{
    any::{Any, TypeId},
    collections::{BTreeMap, HashMap},
    sync::{Arc, PoisonError, RwLock},
};

///
/// MemoryRepository
///
/// Rows of one entity type keyed by the identifier's key string.
/// `find` hands out clones; the repository keeps the originals.
///

pub struct MemoryRepository<E> {
    rows: RwLock<BTreeMap<String, E>>,
}

impl<E> MemoryRepository<E> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert or replace the row for `id`. Returns the replaced row.
    pub fn insert(&self, id: impl Into<Value>, entity: E) -> Result<Option<E>, StoreError> {
        let id = id.into();
        let key = id
            .key_string()
            .ok_or_else(|| StoreError::Backend(format!("unusable identifier {id:?}")))?;

        Ok(self
            .rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entity))
    }

    pub fn remove(&self, id: &Value) -> Option<E> {
        let key = id.key_string()?;

        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Repository for MemoryRepository<E>
where
    E: MappedEntity + Clone + Sync,
{
    fn find(&self, id: &Value) -> Result<Option<Box<dyn Any + Send>>, StoreError> {
        let Some(key) = id.key_string() else {
            return Ok(None);
        };

        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);

        Ok(rows
            .get(&key)
            .map(|entity| Box::new(entity.clone()) as Box<dyn Any + Send>))
    }
}

///
/// MemoryManager
/// Repositories keyed by entity type.
///

#[derive(Default)]
pub struct MemoryManager {
    repositories: RwLock<HashMap<TypeId, Arc<dyn Repository>>>,
}

impl MemoryManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a repository to entity type `E`, replacing any earlier binding.
    pub fn register<E: MappedEntity>(&self, repository: Arc<dyn Repository>) {
        self.repositories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<E>(), repository);
    }
}

impl ObjectManager for MemoryManager {
    fn repository(&self, entity: &EntityType) -> Result<Arc<dyn Repository>, StoreError> {
        self.repositories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&entity.type_id())
            .cloned()
            .ok_or_else(|| StoreError::NoRepository(entity.path().to_string()))
    }
}

///
/// MemoryRegistry
///
/// Single-manager registry. Every registered entity type resolves to the
/// same `MemoryManager`; unregistered types fail with `NoManager`.
///

#[derive(Default)]
pub struct MemoryRegistry {
    manager: Arc<MemoryManager>,
}

impl MemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed repository and return it for seeding.
    pub fn register<E>(&self, repository: MemoryRepository<E>) -> Arc<MemoryRepository<E>>
    where
        E: MappedEntity + Clone + Sync,
    {
        let repository = Arc::new(repository);
        self.manager
            .register::<E>(Arc::clone(&repository) as Arc<dyn Repository>);

        repository
    }

    #[must_use]
    pub fn manager(&self) -> Arc<MemoryManager> {
        Arc::clone(&self.manager)
    }
}

impl PersistenceRegistry for MemoryRegistry {
    fn manager_for(&self, entity: &EntityType) -> Result<Arc<dyn ObjectManager>, StoreError> {
        let registered = self
            .manager
            .repositories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&entity.type_id());

        if registered {
            Ok(Arc::clone(&self.manager) as Arc<dyn ObjectManager>)
        } else {
            Err(StoreError::NoManager(entity.path().to_string()))
        }
    }
}
