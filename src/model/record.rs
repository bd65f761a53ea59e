use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use super::{FaultState, Field, Model};
use crate::context::ModelContext;

/// State and data of a record, guarded together.
pub(crate) struct Slot<M> {
    pub(crate) state: FaultState,
    pub(crate) model: M,
}

/// A live model instance.
///
/// Records are shared as `Arc<Record<M>>`; a context hands out the same
/// `Arc` for the same id for as long as any caller holds it. Every read
/// faults the record in first, and every write is saved through the owning
/// context before the setter returns.
pub struct Record<M: Model> {
    id: String,
    slot: RwLock<Slot<M>>,
    context: RwLock<Option<ModelContext>>,
}

impl<M: Model> Record<M> {
    /// Wrap a freshly constructed model. The record is `Loaded` and detached
    /// until inserted into a context. An empty id is replaced with a UUID.
    pub fn new(mut model: M) -> Arc<Self> {
        if model.id().is_empty() {
            model.set_id(&Uuid::new_v4().to_string());
        }
        let id = model.id().to_string();
        Arc::new(Self::with_state(id, model, FaultState::Loaded, None))
    }

    /// An unloaded shell for an id known to exist in storage.
    pub(crate) fn fault(id: &str, context: ModelContext) -> Arc<Self> {
        let mut shell = M::fault_shell();
        shell.set_id(id);
        Arc::new(Self::with_state(
            id.to_string(),
            shell,
            FaultState::Fault,
            Some(context),
        ))
    }

    /// A record built from a fully decoded storage unit.
    pub(crate) fn materialized(id: &str, mut model: M, context: ModelContext) -> Arc<Self> {
        model.set_id(id);
        Arc::new(Self::with_state(
            id.to_string(),
            model,
            FaultState::Loaded,
            Some(context),
        ))
    }

    fn with_state(
        id: String,
        model: M,
        state: FaultState,
        context: Option<ModelContext>,
    ) -> Self {
        Self {
            id,
            slot: RwLock::new(Slot { state, model }),
            context: RwLock::new(context),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fault_state(&self) -> FaultState {
        self.slot_read().state
    }

    pub fn is_fault(&self) -> bool {
        self.fault_state() == FaultState::Fault
    }

    /// The context this record saves through, if any.
    pub fn context(&self) -> Option<ModelContext> {
        self.context
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn attach(&self, context: Option<ModelContext>) {
        *self.context.write().unwrap_or_else(PoisonError::into_inner) = context;
    }

    pub(crate) fn slot_read(&self) -> RwLockReadGuard<'_, Slot<M>> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn slot_write(&self) -> RwLockWriteGuard<'_, Slot<M>> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn mark_loaded(&self) {
        self.slot_write().state = FaultState::Loaded;
    }

    /// Load the storage unit into this record if it is still a fault.
    /// A failed load leaves the record a fault.
    pub(crate) fn fault_if_needed(&self) {
        if self.fault_state() != FaultState::Fault {
            return;
        }
        let Some(context) = self.context() else {
            return;
        };

        let result = {
            let mut slot = self.slot_write();
            if slot.state != FaultState::Fault {
                return;
            }
            context.materialize(&mut slot, &self.id)
        };
        if let Err(err) = result {
            context.report(&err);
        }
    }

    /// Run `f` against the resolved model.
    pub fn read<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        self.fault_if_needed();
        let slot = self.slot_read();
        f(&slot.model)
    }

    /// Resolved value of one field. `None` only when the field has no value
    /// and no default, e.g. a shell whose storage unit could not be read.
    pub fn get<T: Clone>(&self, field: impl FnOnce(&M) -> &Field<T>) -> Option<T> {
        self.read(|model| field(model).get().cloned())
    }

    /// Set one field and save the record.
    pub fn set<T>(&self, field: impl FnOnce(&mut M) -> &mut Field<T>, value: T) {
        self.update(|model| field(model).set(value));
    }

    /// Mutate the model and save the record. The id cannot be changed.
    pub fn update<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        self.fault_if_needed();
        let result = {
            let mut slot = self.slot_write();
            let result = f(&mut slot.model);
            slot.model.set_id(&self.id);
            result
        };

        if let Some(context) = self.context() {
            context.save(self);
        }
        result
    }
}

impl<M: Model> fmt::Debug for Record<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("type", &M::TYPE_NAME)
            .field("id", &self.id)
            .field("state", &self.fault_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: Field<String>,
    }

    impl Model for Note {
        const TYPE_NAME: &'static str = "Note";

        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: &str) {
            self.id = id.to_string();
        }

        fn fault_shell() -> Self {
            Note {
                id: String::new(),
                body: Field::unloaded(),
            }
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.into(),
            body: Field::new(body.into()),
        }
    }

    #[test]
    fn new_record_is_loaded_and_detached() {
        let record = Record::new(note("n1", "hello"));
        assert_eq!(record.id(), "n1");
        assert_eq!(record.fault_state(), FaultState::Loaded);
        assert!(record.context().is_none());
        assert_eq!(record.get(|n| &n.body), Some("hello".to_string()));
    }

    #[test]
    fn empty_id_gets_generated() {
        let record = Record::new(note("", "hello"));
        assert!(Uuid::parse_str(record.id()).is_ok());
        assert_eq!(record.read(|n| n.id.clone()), record.id());
    }

    #[test]
    fn detached_set_updates_in_memory() {
        let record = Record::new(note("n1", "hello"));
        record.set(|n| &mut n.body, "bye".to_string());
        assert_eq!(record.get(|n| &n.body), Some("bye".to_string()));
    }

    #[test]
    fn update_cannot_change_id() {
        let record = Record::new(note("n1", "hello"));
        record.update(|n| n.id = "other".into());
        assert_eq!(record.read(|n| n.id.clone()), "n1");
    }

    #[test]
    fn debug_shows_type_and_state() {
        let record = Record::new(note("n1", "hello"));
        let debug = format!("{:?}", record);
        assert!(debug.contains("Note"));
        assert!(debug.contains("Loaded"));
    }
}
