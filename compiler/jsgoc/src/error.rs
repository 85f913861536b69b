use thiserror::Error;

/// Causes of fatal errors raised by the driver itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("emitting {decl} left {depth} function scope(s) open")]
    UnbalancedScopes { decl: String, depth: usize },
    #[error("emitter asked for {0}, which belongs to another package")]
    ForeignDecl(String),
}
