//! Soft diagnostics.

use std::fmt;

use jsgo_ir::Span;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    /// The program is wrong; output may be incomplete.
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A problem in the program being compiled.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    /// Where the offending construct is; [`Span::DUMMY`] when unknown.
    pub span: Span,
    /// Follow-up lines shown under the message.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            span: Span::DUMMY,
            notes: Vec::new(),
        }
    }

    pub fn error(code: ErrorCode) -> Self {
        Self::new(code, Severity::Error)
    }

    pub fn warning(code: ErrorCode) -> Self {
        Self::new(code, Severity::Warning)
    }

    #[must_use]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        Diagnostic { span, ..self }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

/// `error[E1001]: message`, with the position when there is one and the
/// notes on their own lines.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.severity.as_str(), self.code)?;
        if !self.span.is_dummy() {
            write!(f, " {}", self.span)?;
        }
        write!(f, ": {}", self.message)?;
        self.notes
            .iter()
            .try_for_each(|note| write!(f, "\n  note: {note}"))
    }
}

/// An external field annotation whose struct has no embedded host handle.
pub fn missing_host_handle(span: Span, field: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(format!(
            "could not find field with type *js.Object for 'js' tag of field '{field}'"
        ))
        .with_span(span)
}
