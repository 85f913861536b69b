//! Accumulated soft diagnostics.

use crate::Diagnostic;

/// Configuration for diagnostic collection.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of diagnostics kept (0 = unlimited).
    pub error_limit: usize,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig { error_limit: 100 }
    }
}

impl DiagnosticConfig {
    /// No limit (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig { error_limit: 0 }
    }
}

/// Diagnostics reported so far in one compilation unit, in report order.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticList {
    items: Vec<Diagnostic>,
    config: DiagnosticConfig,
    /// Diagnostics reported after the limit was hit.
    dropped: usize,
}

impl DiagnosticList {
    pub fn new(config: DiagnosticConfig) -> Self {
        DiagnosticList {
            items: Vec::new(),
            config,
            dropped: 0,
        }
    }

    /// Record a diagnostic. Returns `false` once the limit has been reached
    /// and the diagnostic was dropped.
    pub fn push(&mut self, diagnostic: Diagnostic) -> bool {
        if self.is_full() {
            self.dropped += 1;
            tracing::debug!(dropped = self.dropped, code = %diagnostic.code, "diagnostic limit reached");
            return false;
        }
        self.items.push(diagnostic);
        true
    }

    pub fn is_full(&self) -> bool {
        self.config.error_limit != 0 && self.items.len() >= self.config.error_limit
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl<'a> IntoIterator for &'a DiagnosticList {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
