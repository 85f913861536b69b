//! jsgo IR - shared front-end vocabulary.
//!
//! This crate holds the data the code generator consumes from the front end:
//! - Names for interned identifiers
//! - `TypeId` handles into the type interner
//! - Spans for source locations
//! - The resolved declaration graph (`Universe`, `Object`, `Package`)
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32), Types → TypeId(u32)
//! - **Index, don't point**: objects and packages are addressed by u32 ids
//!   into an append-only arena, so the graph can be shared across threads
//!   by plain reference once it is built.

mod interner;
mod name;
mod object;
mod span;
mod type_id;
mod universe;

pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use object::{Object, ObjectFlags, ObjectId, ObjectKind, Package, PackageId};
pub use span::Span;
pub use type_id::TypeId;
pub use universe::Universe;
