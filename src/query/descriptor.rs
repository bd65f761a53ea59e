use std::fmt;
use std::sync::Arc;

use super::sort::{sort_records, SortDescriptor};
use crate::model::{Model, Record};

/// Read-only test applied to a fully resolved model.
pub type Predicate<M> = Box<dyn Fn(&M) -> bool + Send + Sync>;

/// What to fetch: an optional predicate and an ordered list of sort keys.
///
/// Built once and reused; fetching never mutates the descriptor.
pub struct FetchDescriptor<M> {
    sort_by: Vec<SortDescriptor<M>>,
    predicate: Option<Predicate<M>>,
}

impl<M: Model> FetchDescriptor<M> {
    /// Every record, unsorted.
    pub fn new() -> Self {
        Self {
            sort_by: Vec::new(),
            predicate: None,
        }
    }

    /// Keep only records matching `predicate`. Replaces any earlier predicate.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Append a sort key. Earlier keys take precedence.
    pub fn sort(mut self, key: SortDescriptor<M>) -> Self {
        self.sort_by.push(key);
        self
    }

    pub fn predicate(&self) -> Option<&(dyn Fn(&M) -> bool + Send + Sync)> {
        self.predicate.as_deref()
    }

    pub fn sort_by(&self) -> &[SortDescriptor<M>] {
        &self.sort_by
    }

    pub(crate) fn apply_sort(&self, records: &mut [Arc<Record<M>>]) {
        sort_records(records, &self.sort_by);
    }
}

impl<M: Model> Default for FetchDescriptor<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for FetchDescriptor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchDescriptor")
            .field("sort_by", &self.sort_by)
            .field("has_predicate", &self.predicate.is_some())
            .finish()
    }
}
