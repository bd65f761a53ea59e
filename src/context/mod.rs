//! ModelContext - the entry point for inserting, saving, deleting, and fetching records.
//!
//! A context owns one storage backend and one identity map. Writes are
//! best-effort: failures never reach the caller of `insert`, `save`,
//! `delete`, or `Record::set`; they are logged and passed to the handler
//! installed with [`ModelContext::on_error`]. The `try_*` variants return
//! the typed error instead.

mod container;
mod fetch;
mod notify;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use log::{debug, trace, warn};

use crate::config::StoreConfig;
use crate::error::{StorageOp, StoreError};
use crate::identity_map::IdentityMap;
use crate::model::{FaultState, Model, Record, Slot};
use crate::storage::{Codec, FileStorage, InMemoryStorage, Storage};

use self::notify::ChangeNotifier;

pub use container::{ModelContainer, ModelContainerBuilder};
pub use notify::CONTEXT_DID_CHANGE;

/// Receives errors swallowed by best-effort operations.
pub type ErrorHandler = Arc<dyn Fn(&StoreError) + Send + Sync>;

struct Shared {
    base_dir: Option<PathBuf>,
    codec: Codec,
    storage: Arc<dyn Storage>,
    identity_map: Mutex<IdentityMap>,
    notifier: ChangeNotifier,
    error_handler: RwLock<Option<ErrorHandler>>,
}

/// Handle to a store. Clones share the same identity map and storage.
#[derive(Clone)]
pub struct ModelContext {
    shared: Arc<Shared>,
}

impl ModelContext {
    /// Open a file-backed context, creating the base directory if needed.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.base_dir).map_err(|e| {
            StoreError::storage(
                StorageOp::Write,
                format!("{}: {}", config.base_dir.display(), e),
            )
        })?;
        debug!(
            "opened model context at {} ({})",
            config.base_dir.display(),
            config.codec
        );

        let storage = FileStorage::new(&config.base_dir, config.codec.extension());
        Ok(Self::build(Arc::new(storage), config.codec, Some(config.base_dir)))
    }

    /// Open a JSON file-backed context at `base_dir`.
    pub fn at(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open(StoreConfig::new(base_dir))
    }

    /// A context whose records live only as long as the process.
    pub fn in_memory() -> Self {
        Self::with_storage(InMemoryStorage::new(), Codec::Json)
    }

    pub fn with_storage(storage: impl Storage + 'static, codec: Codec) -> Self {
        Self::build(Arc::new(storage), codec, None)
    }

    fn build(storage: Arc<dyn Storage>, codec: Codec, base_dir: Option<PathBuf>) -> Self {
        Self {
            shared: Arc::new(Shared {
                base_dir,
                codec,
                storage,
                identity_map: Mutex::new(IdentityMap::new()),
                notifier: ChangeNotifier::new(),
                error_handler: RwLock::new(None),
            }),
        }
    }

    /// Root directory of a file-backed context.
    pub fn base_dir(&self) -> Option<&Path> {
        self.shared.base_dir.as_deref()
    }

    pub fn codec(&self) -> Codec {
        self.shared.codec
    }

    pub fn storage(&self) -> &dyn Storage {
        self.shared.storage.as_ref()
    }

    /// Whether two handles refer to the same context.
    pub fn ptr_eq(&self, other: &ModelContext) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    fn identity_map(&self) -> MutexGuard<'_, IdentityMap> {
        self.shared
            .identity_map
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of live records in the identity map.
    pub fn live_count(&self) -> usize {
        let mut map = self.identity_map();
        map.purge_stale();
        map.len()
    }

    /// Register a new record, attach it to this context, and save it.
    pub fn insert<M: Model>(&self, record: &Arc<Record<M>>) {
        self.identity_map().register(record);
        record.attach(Some(self.clone()));
        record.mark_loaded();
        self.save(record);
    }

    /// Wrap `model` in a record and insert it.
    pub fn create<M: Model>(&self, model: M) -> Arc<Record<M>> {
        let record = Record::new(model);
        self.insert(&record);
        record
    }

    /// Write the record to storage. Failures are reported, not returned.
    pub fn save<M: Model>(&self, record: &Record<M>) {
        if let Err(err) = self.try_save(record) {
            self.report(&err);
        }
    }

    pub fn try_save<M: Model>(&self, record: &Record<M>) -> Result<(), StoreError> {
        record.fault_if_needed();
        let bytes = {
            let slot = record.slot_read();
            if slot.state == FaultState::Faulting {
                return Ok(());
            }
            self.shared.codec.encode(&slot.model)?
        };

        self.shared
            .storage
            .write(M::TYPE_NAME, record.id(), &bytes)?;
        trace!("saved {}:{}", M::TYPE_NAME, record.id());
        self.shared.notifier.notify();
        Ok(())
    }

    /// Forget the record and remove its storage unit. Deleting twice is fine.
    pub fn delete<M: Model>(&self, record: &Record<M>) {
        if let Err(err) = self.try_delete(record) {
            self.report(&err);
        }
    }

    /// Returns whether a storage unit was removed.
    pub fn try_delete<M: Model>(&self, record: &Record<M>) -> Result<bool, StoreError> {
        self.identity_map().remove::<M>(record.id());
        record.attach(None);

        let existed = self.shared.storage.remove(M::TYPE_NAME, record.id())?;
        debug!(
            "deleted {}:{} (unit existed: {})",
            M::TYPE_NAME,
            record.id(),
            existed
        );
        self.shared.notifier.notify();
        Ok(existed)
    }

    /// Decode the record's storage unit and copy it into the record in place.
    /// On failure the record keeps its previous state and fields.
    pub fn fault_in<M: Model>(&self, record: &Record<M>) -> Result<(), StoreError> {
        let mut slot = record.slot_write();
        self.materialize(&mut slot, record.id())
    }

    pub(crate) fn materialize<M: Model>(
        &self,
        slot: &mut Slot<M>,
        id: &str,
    ) -> Result<(), StoreError> {
        let prior = slot.state;
        slot.state = FaultState::Faulting;
        match self.load::<M>(id) {
            Ok(full) => {
                slot.model.copy_from(full);
                slot.model.set_id(id);
                slot.state = FaultState::Loaded;
                debug!("faulted in {}:{}", M::TYPE_NAME, id);
                Ok(())
            }
            Err(err) => {
                slot.state = prior;
                Err(err)
            }
        }
    }

    pub(crate) fn load<M: Model>(&self, id: &str) -> Result<M, StoreError> {
        let bytes = self.shared.storage.read(M::TYPE_NAME, id)?;
        let mut model: M = self.shared.codec.decode(&bytes)?;
        model.set_id(id);
        Ok(model)
    }

    /// Call `listener` on a background thread after every change.
    /// Returns an id for [`ModelContext::remove_change_listener`].
    pub fn on_change<F>(&self, listener: F) -> String
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.notifier.subscribe(listener)
    }

    pub fn remove_change_listener(&self, listener_id: &str) -> bool {
        self.shared.notifier.unsubscribe(listener_id)
    }

    /// Install the handler for errors swallowed by best-effort operations.
    pub fn on_error<F>(&self, handler: F)
    where
        F: Fn(&StoreError) + Send + Sync + 'static,
    {
        *self
            .shared
            .error_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handler));
    }

    pub(crate) fn report(&self, err: &StoreError) {
        warn!("{}", err);
        let handler = self
            .shared
            .error_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            handler(err);
        }
    }
}

impl fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelContext")
            .field("base_dir", &self.shared.base_dir)
            .field("codec", &self.shared.codec)
            .finish_non_exhaustive()
    }
}
