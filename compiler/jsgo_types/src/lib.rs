//! Type representation for the jsgo compiler.
//!
//! Types are interned into a sharded [`TypeInterner`]; a [`TypeId`] is the
//! handle. Anonymous types with the same structure intern to the same id, so
//! comparing ids is comparing types. Named types are nominal: their identity
//! is the declaring object plus type arguments, and their underlying type is
//! bound separately so that recursive declarations can refer to themselves.

mod data;
mod format;
mod interner;
mod subst;

pub use data::{BasicKind, ChanDir, Field, Method, TypeData, TypeList};
pub use format::TypeFormatter;
pub use interner::{TypeInternError, TypeInterner};
pub use jsgo_ir::TypeId;
pub use subst::Subst;
