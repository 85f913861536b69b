//! Identifier allocation, instance naming and dependency recording.
//!
//! Code generation asks this crate for the host identifier of every binding,
//! type and generic instance it emits, and formats its output with exactly
//! the identifiers it gets back. All state lives in a [`UnitContext`], one
//! per compilation unit, so independent units can be named in parallel.
//!
//! # Naming rules
//!
//! - A binding is named once; every later reference in its lexical extent
//!   gets the same identifier.
//! - A proposed name is sanitized with [`encode_ident`], then made unique in
//!   its scope by a `$N` suffix, or replaced by the next free base-26 name
//!   when minifying.
//! - A generic instance is named `base[ID /* args */]`, where `ID` is
//!   assigned per entity on first use.
//! - Each anonymous composite type gets one package-level declaration,
//!   shared by every structurally equal occurrence.
//!
//! Every reference made while emitting a declaration also records a
//! dependency edge in the unit's dead-code graph.

mod context;
mod encode;
mod error;
mod instance;
mod marshal;
mod naming;
mod reserved;
mod scope;
mod selection;
mod tags;
mod type_name;

#[cfg(test)]
mod test_fixture;

pub use context::UnitContext;
pub use encode::{encode_ident, encode_string, MID_DOT};
pub use error::NamingError;
pub use instance::{DeclKey, Instance, InstanceSet};
pub use reserved::{is_reserved, RESERVED_KEYWORDS};
pub use scope::{minified_name, NamingMode, ScopeId, ScopeTree};
pub use selection::Selection;
pub use tags::{format_js_tag_val, get_js_tag};
pub use type_name::{is_wrapped, to_js_type};

/// Import path of the package declaring the opaque host handle `Object`.
pub const HOST_PACKAGE_PATH: &str = "github.com/gopherjs/gopherjs/js";
