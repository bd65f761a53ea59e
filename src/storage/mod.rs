//! Storage backends - raw bytes per `(type name, id)` storage unit.
//!
//! A backend knows nothing about models; it maps a type name and a record id
//! to a storage unit and moves bytes in and out of it. Encoding lives in
//! [`Codec`].
//!
//! ## Layout
//!
//! ```text
//! <base>/
//!   User/
//!     u1.json
//!     u2.json
//!   Post/
//!     p1.json
//! ```

mod codec;
mod file;
mod in_memory;

use crate::error::StoreError;

/// Abstract byte storage for model records.
pub trait Storage: Send + Sync {
    /// Read the bytes of one storage unit. Fails with `NotFound` if it does not exist.
    fn read(&self, type_name: &str, id: &str) -> Result<Vec<u8>, StoreError>;

    /// Create or replace one storage unit.
    fn write(&self, type_name: &str, id: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Remove one storage unit. Returns true if it existed.
    fn remove(&self, type_name: &str, id: &str) -> Result<bool, StoreError>;

    /// Whether a storage unit exists for the id.
    fn contains(&self, type_name: &str, id: &str) -> Result<bool, StoreError>;

    /// Ids of every storage unit of a type. A type with no units yields an empty list.
    fn list_ids(&self, type_name: &str) -> Result<Vec<String>, StoreError>;
}

pub use codec::Codec;
pub use file::FileStorage;
pub use in_memory::InMemoryStorage;
