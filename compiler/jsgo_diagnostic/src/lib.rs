//! Error reporting for the jsgo compiler.
//!
//! Two classes of error exist:
//!
//! - **Soft diagnostics** ([`Diagnostic`]) describe problems in the program
//!   being compiled. They accumulate in a [`DiagnosticList`] and compilation
//!   carries on, so one run reports every problem it can find.
//! - **Fatal errors** ([`FatalError`]) are invariant violations: something
//!   that cannot happen for a well-typed program. They carry the cause, the
//!   stack where they were raised, and free-form clues added as they
//!   propagate. Nothing recovers from them.

mod diagnostic;
mod error_code;
mod fatal;
mod list;

pub use diagnostic::{missing_host_handle, Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use fatal::{bailout, FatalError, ResultExt};
pub use list::{DiagnosticConfig, DiagnosticList};
