//! Error codes for soft diagnostics.

use std::fmt;

/// Error codes for soft diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: Name and selector resolution
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// External field annotation with no host handle to attach to
    E1001,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
