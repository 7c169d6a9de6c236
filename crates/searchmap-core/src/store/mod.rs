//! Persistence ports consumed by store-backed hydration.
//!
//! registry → manager → repository → `find(id)`. Implementations own their
//! own timeouts and report failure synchronously as `StoreError`.

mod memory;

pub use memory::{MemoryManager, MemoryRegistry, MemoryRepository};

use crate::{error::StoreError, model::EntityType, value::Value};
use std::{any::Any, sync::Arc};

///
/// PersistenceRegistry
///

pub trait PersistenceRegistry: Send + Sync {
    fn manager_for(&self, entity: &EntityType) -> Result<Arc<dyn ObjectManager>, StoreError>;
}

///
/// ObjectManager
///

pub trait ObjectManager: Send + Sync {
    fn repository(&self, entity: &EntityType) -> Result<Arc<dyn Repository>, StoreError>;
}

///
/// Repository
///
/// Lookup of canonical entities by identifier. The returned box must hold
/// the concrete entity type the repository was requested for.
///

pub trait Repository: Send + Sync {
    fn find(&self, id: &Value) -> Result<Option<Box<dyn Any + Send>>, StoreError>;
}
