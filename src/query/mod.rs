//! Queries - predicate and multi-key sort over one model type.
//!
//! ## Example
//!
//! ```ignore
//! use jsondata::{FetchDescriptor, SortDescriptor};
//!
//! let adults = FetchDescriptor::<User>::new()
//!     .filter(|u| u.age.get().is_some_and(|age| *age >= 18))
//!     .sort(SortDescriptor::forward(|u: &User| &u.name))
//!     .sort(SortDescriptor::reverse(|u: &User| &u.age));
//!
//! let users = context.fetch(&adults);
//! ```

mod descriptor;
mod sort;

pub use descriptor::{FetchDescriptor, Predicate};
pub use sort::{SortDescriptor, SortOrder};
