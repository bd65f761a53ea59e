//! Identity map - at most one live record per `(type, id)` in a context.
//!
//! Entries are weak. The map never keeps a record alive; a record whose last
//! `Arc` was dropped fails `Weak::upgrade` and is treated as absent until
//! `purge_stale` removes the entry.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::model::{Model, Record};

type Entry = Weak<dyn Any + Send + Sync>;

#[derive(Default)]
pub(crate) struct IdentityMap {
    entries: HashMap<String, Entry>,
}

impl IdentityMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn make_key(type_name: &str, id: &str) -> String {
        format!("{}:{}", type_name, id)
    }

    /// Register a record, replacing any prior entry for its id.
    pub(crate) fn register<M: Model>(&mut self, record: &Arc<Record<M>>) {
        let erased: Arc<dyn Any + Send + Sync> = record.clone();
        self.entries.insert(
            Self::make_key(M::TYPE_NAME, record.id()),
            Arc::downgrade(&erased),
        );
    }

    /// The live record for an id, if one is still owned somewhere.
    pub(crate) fn lookup<M: Model>(&self, id: &str) -> Option<Arc<Record<M>>> {
        self.entries
            .get(&Self::make_key(M::TYPE_NAME, id))?
            .upgrade()?
            .downcast::<Record<M>>()
            .ok()
    }

    pub(crate) fn remove<M: Model>(&mut self, id: &str) -> bool {
        self.entries
            .remove(&Self::make_key(M::TYPE_NAME, id))
            .is_some()
    }

    /// Drop entries whose record is gone. Returns how many were removed.
    pub(crate) fn purge_stale(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.strong_count() > 0);
        before - self.entries.len()
    }

    /// Number of entries, stale ones included.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
