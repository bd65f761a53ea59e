mod config;
mod context;
mod error;
mod identity_map;
mod model;
mod query;
mod storage;

pub use config::{StoreConfig, CODEC_ENV, STORE_DIR_ENV};
pub use context::{
    ErrorHandler, ModelContainer, ModelContainerBuilder, ModelContext, CONTEXT_DID_CHANGE,
};
pub use error::{StorageOp, StoreError};
pub use model::{FaultState, Field, Model, Record};
pub use query::{FetchDescriptor, Predicate, SortDescriptor, SortOrder};
pub use storage::{Codec, FileStorage, InMemoryStorage, Storage};
