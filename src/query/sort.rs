use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use log::debug;

use crate::model::{Field, Model, Record};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Forward,
    Reverse,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Forward => ordering,
            SortOrder::Reverse => ordering.reverse(),
        }
    }
}

/// Sort key with its field type erased.
trait SortKey<M: Model>: Send + Sync {
    fn compare(&self, lhs: &M, rhs: &M) -> Option<Ordering>;

    /// Reorder `records` by this key. Returns false, leaving them untouched,
    /// when some key is missing or some pair of keys has no ordering.
    fn sort(&self, records: &mut [Arc<Record<M>>], order: SortOrder) -> bool;
}

struct FieldKey<F, T> {
    field: F,
    _value: PhantomData<fn() -> T>,
}

impl<M, T, F> SortKey<M> for FieldKey<F, T>
where
    M: Model,
    T: PartialOrd + Clone + 'static,
    F: Fn(&M) -> &Field<T> + Send + Sync,
{
    fn compare(&self, lhs: &M, rhs: &M) -> Option<Ordering> {
        (self.field)(lhs).get()?.partial_cmp((self.field)(rhs).get()?)
    }

    fn sort(&self, records: &mut [Arc<Record<M>>], order: SortOrder) -> bool {
        // One record lock at a time; later writes do not affect this pass.
        let keys: Option<Vec<T>> = records
            .iter()
            .map(|record| record.read(|model| (self.field)(model).get().cloned()))
            .collect();
        let Some(keys) = keys else {
            return false;
        };
        if !totally_ordered(&keys) {
            return false;
        }

        let mut positions: Vec<usize> = (0..records.len()).collect();
        positions.sort_by(|&a, &b| {
            let ordering = keys[a].partial_cmp(&keys[b]).unwrap_or(Ordering::Equal);
            order.apply(ordering)
        });

        let snapshot = records.to_vec();
        for (slot, position) in records.iter_mut().zip(positions) {
            *slot = Arc::clone(&snapshot[position]);
        }
        true
    }
}

/// Whether every pair of keys, each key with itself included, is comparable.
fn totally_ordered<T: PartialOrd>(keys: &[T]) -> bool {
    keys.iter()
        .enumerate()
        .all(|(i, lhs)| keys[i..].iter().all(|rhs| lhs.partial_cmp(rhs).is_some()))
}

/// One sort key: a field selector plus a direction.
pub struct SortDescriptor<M> {
    key: Box<dyn SortKey<M>>,
    order: SortOrder,
}

impl<M: Model> SortDescriptor<M> {
    pub fn new<T, F>(field: F, order: SortOrder) -> Self
    where
        T: PartialOrd + Clone + 'static,
        F: Fn(&M) -> &Field<T> + Send + Sync + 'static,
    {
        Self {
            key: Box::new(FieldKey {
                field,
                _value: PhantomData,
            }),
            order,
        }
    }

    /// Ascending by `field`.
    pub fn forward<T, F>(field: F) -> Self
    where
        T: PartialOrd + Clone + 'static,
        F: Fn(&M) -> &Field<T> + Send + Sync + 'static,
    {
        Self::new(field, SortOrder::Forward)
    }

    /// Descending by `field`.
    pub fn reverse<T, F>(field: F) -> Self
    where
        T: PartialOrd + Clone + 'static,
        F: Fn(&M) -> &Field<T> + Send + Sync + 'static,
    {
        Self::new(field, SortOrder::Reverse)
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Order of two models by this key, or `None` when the values have no
    /// ordering (unresolved fields, NaN).
    pub fn compare(&self, lhs: &M, rhs: &M) -> Option<Ordering> {
        self.key
            .compare(lhs, rhs)
            .map(|ordering| self.order.apply(ordering))
    }

    /// Stable sort of `records` by this key over a snapshot of the key
    /// values. A pass whose keys are not totally ordered is skipped.
    pub(crate) fn sort_records(&self, records: &mut [Arc<Record<M>>]) {
        if !self.key.sort(records, self.order) {
            debug!(
                "skipped {} sort pass over {} record(s): incomparable keys",
                M::TYPE_NAME,
                records.len()
            );
        }
    }
}

impl<M> fmt::Debug for SortDescriptor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortDescriptor")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Stable sort by every key, first key dominant.
pub(crate) fn sort_records<M: Model>(
    records: &mut [Arc<Record<M>>],
    keys: &[SortDescriptor<M>],
) {
    for key in keys.iter().rev() {
        key.sort_records(records);
    }
}
