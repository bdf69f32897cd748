//! Schema snapshot subsystem
//!
//! A read-only view of the schema used to turn object ids embedded in
//! explain output back into readable names.
//!
//! - Closed set of object kinds (pointer, constraint, other named object)
//! - Lookup by id through the [`SchemaSnapshot`] trait
//! - Never mutated by the explain pipeline

mod errors;
mod loader;
mod snapshot;
mod types;

pub use errors::{LoadError, LoadResult};
pub use loader::SchemaLoader;
pub use snapshot::{InMemorySchema, SchemaSnapshot};
pub use types::{Constraint, NamedObject, Pointer, PointerKind, SchemaObject};
