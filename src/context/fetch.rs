use std::sync::Arc;

use log::trace;

use super::ModelContext;
use crate::model::{Model, Record};
use crate::query::FetchDescriptor;

impl ModelContext {
    /// Every record of type `M` that matches the descriptor, in sort order.
    ///
    /// Live records come from the identity map. Without a predicate, records
    /// not yet in memory come back as faults. With one, they are decoded and
    /// tested; only matches are registered. Unreadable units are skipped,
    /// and a type directory that cannot be listed yields nothing.
    pub fn fetch<M: Model>(&self, descriptor: &FetchDescriptor<M>) -> Vec<Arc<Record<M>>> {
        let purged = self.identity_map().purge_stale();
        if purged > 0 {
            trace!("purged {} stale identity map entries", purged);
        }

        let ids = match self.shared.storage.list_ids(M::TYPE_NAME) {
            Ok(ids) => ids,
            Err(err) => {
                self.report(&err);
                return Vec::new();
            }
        };

        let predicate = descriptor.predicate();
        let mut results = Vec::with_capacity(ids.len());
        for id in &ids {
            let live = self.identity_map().lookup::<M>(id);
            let record = match (live, predicate) {
                (Some(live), None) => Some(live),
                (Some(live), Some(predicate)) => {
                    let matched = live.read(|model| predicate(model));
                    matched.then_some(live)
                }
                (None, Some(predicate)) => self.admit(id, predicate),
                (None, None) => Some(self.register_fault::<M>(id)),
            };
            results.extend(record);
        }

        descriptor.apply_sort(&mut results);
        trace!(
            "fetched {} of {} {} record(s)",
            results.len(),
            ids.len(),
            M::TYPE_NAME
        );
        results
    }

    /// Every record of type `M`, unsorted.
    pub fn fetch_all<M: Model>(&self) -> Vec<Arc<Record<M>>> {
        self.fetch(&FetchDescriptor::new())
    }

    /// The record with `id`: the live instance if there is one, otherwise a
    /// fault when a storage unit exists.
    pub fn get<M: Model>(&self, id: &str) -> Option<Arc<Record<M>>> {
        let live = self.identity_map().lookup::<M>(id);
        if live.is_some() {
            return live;
        }

        match self.shared.storage.contains(M::TYPE_NAME, id) {
            Ok(true) => Some(self.register_fault::<M>(id)),
            Ok(false) => None,
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    /// Decode and test a record that is not in memory. Rejected records are
    /// dropped without touching the identity map.
    fn admit<M: Model>(
        &self,
        id: &str,
        predicate: &(dyn Fn(&M) -> bool + Send + Sync),
    ) -> Option<Arc<Record<M>>> {
        let model = match self.load::<M>(id) {
            Ok(model) => model,
            Err(err) => {
                self.report(&err);
                return None;
            }
        };
        if !predicate(&model) {
            return None;
        }

        let mut map = self.identity_map();
        if let Some(live) = map.lookup::<M>(id) {
            return Some(live);
        }
        let record = Record::materialized(id, model, self.clone());
        map.register(&record);
        Some(record)
    }

    fn register_fault<M: Model>(&self, id: &str) -> Arc<Record<M>> {
        let mut map = self.identity_map();
        if let Some(live) = map.lookup::<M>(id) {
            return live;
        }
        let shell = Record::fault(id, self.clone());
        map.register(&shell);
        shell
    }
}
