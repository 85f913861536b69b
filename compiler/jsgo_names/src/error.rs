//! Invariant violations in naming.

/// Why naming could not proceed. Always wrapped in a `FatalError`.
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    #[error("cannot allocate an identifier for an empty name")]
    EmptyName,

    #[error("left the package scope: no function scope is open")]
    ScopeUnderflow,

    #[error("unexpected type parameter {0}")]
    UnexpectedTypeParam(String),

    #[error("expected a method, got {0}")]
    NotAMethod(String),

    #[error("{0} has no package and cannot be addressed through one")]
    NoPackage(String),

    #[error("{ty} is declared inside generic function {func} and referenced outside of it")]
    OutsideNestingFunction { ty: String, func: String },

    #[error("unhandled type {ty} in {context}")]
    UnhandledType { ty: String, context: &'static str },

    #[error("selection step {index} applied to non-struct type {ty}")]
    NotAStruct { ty: String, index: usize },
}
