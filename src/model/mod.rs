//! Models - Plain Old Rust Structs persisted one storage unit per record.
//!
//! A persisted type implements [`Model`] and declares each persisted value as
//! a [`Field`]. Live instances are shared as `Arc<Record<M>>`; all reads and
//! writes go through the record so that faulting and write-through saving
//! happen in one place.
//!
//! ## Example
//!
//! ```ignore
//! use jsondata::{Field, Model, ModelContext, Record};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     id: String,
//!     name: Field<String>,
//! }
//!
//! impl Model for User {
//!     const TYPE_NAME: &'static str = "User";
//!     fn id(&self) -> &str { &self.id }
//!     fn set_id(&mut self, id: &str) { self.id = id.to_string(); }
//!     fn fault_shell() -> Self {
//!         User { id: String::new(), name: Field::unloaded() }
//!     }
//! }
//!
//! let context = ModelContext::at("/tmp/store")?;
//! let user = context.create(User { id: "u1".into(), name: Field::new("Ann".into()) });
//! user.set(|u| &mut u.name, "Anne".to_string()); // saved to User/u1.json
//! ```

mod field;
mod record;

use serde::{de::DeserializeOwned, Serialize};

/// Capabilities every persisted type provides.
pub trait Model: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Directory name for this type's storage units.
    const TYPE_NAME: &'static str;

    /// Unique identifier of this record.
    fn id(&self) -> &str;

    fn set_id(&mut self, id: &str);

    /// An unloaded instance: empty id and every field unloaded.
    fn fault_shell() -> Self;

    /// Overwrite every declared field from a fully decoded instance.
    fn copy_from(&mut self, other: Self)
    where
        Self: Sized,
    {
        *self = other;
    }
}

/// Loading state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultState {
    /// Every field holds its real value.
    Loaded,
    /// Only the id is known; fields load on first access.
    Fault,
    /// The storage unit is being copied into the record.
    Faulting,
}

pub use field::Field;
pub use record::Record;
pub(crate) use record::Slot;
