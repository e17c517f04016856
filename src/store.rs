//! In-memory table primitive.
//!
//! The back office keeps all state in process-local maps. Handlers depend
//! on this small capability set (`get`, `set`, `delete`, `values`) so the
//! backing structure can be swapped without touching call sites.

use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

pub struct MemTable<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T: Clone> MemTable<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.rows.read().get(id).cloned()
    }

    pub fn set(&self, id: Uuid, row: T) {
        self.rows.write().insert(id, row);
    }

    pub fn delete(&self, id: &Uuid) -> Option<T> {
        self.rows.write().remove(id)
    }

    pub fn values(&self) -> Vec<T> {
        self.rows.read().values().cloned().collect()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.rows.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl<T: Clone> Default for MemTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
