//! Compilation options.

use jsgo_diagnostic::DiagnosticConfig;
use jsgo_ir::{ObjectKind, Universe};
use jsgo_names::{DeclKey, NamingMode};

/// Which declarations are kept alive regardless of references.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EntryPoints {
    /// The package's `main` and `init` functions.
    #[default]
    Program,
    /// Exported package-level declarations and `init`.
    Library,
    /// Every seed declaration; nothing is pruned that was asked for.
    All,
    /// Exactly these declarations.
    Keys(Vec<DeclKey>),
}

impl EntryPoints {
    /// Entry declarations among `seeds`.
    pub fn resolve(&self, universe: &Universe, seeds: &[DeclKey]) -> Vec<DeclKey> {
        match self {
            EntryPoints::All => seeds.to_vec(),
            EntryPoints::Keys(keys) => keys.clone(),
            EntryPoints::Program | EntryPoints::Library => seeds
                .iter()
                .filter(|key| self.selects(universe, key))
                .cloned()
                .collect(),
        }
    }

    fn selects(&self, universe: &Universe, key: &DeclKey) -> bool {
        let DeclKey::Instance(inst) = key else {
            return false;
        };
        let object = universe.object(inst.object);
        let name = universe.lookup(object.name);
        let is_func = matches!(object.kind, ObjectKind::Func);
        match self {
            EntryPoints::Program => is_func && (name == "main" || name == "init"),
            EntryPoints::Library => {
                (object.is_exported() && object.is_package_level()) || (is_func && name == "init")
            }
            EntryPoints::All | EntryPoints::Keys(_) => true,
        }
    }
}

/// Options shared by every unit of a build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Shortest-name identifiers and whitespace removal.
    pub minify: bool,
    pub entry_points: EntryPoints,
    pub diagnostics: DiagnosticConfig,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `JSGO_MINIFY` (`1` or `true`) and
    /// `JSGO_ERROR_LIMIT`.
    pub fn from_env() -> Self {
        Self::default().with_env(|var| std::env::var(var).ok())
    }

    /// Apply overrides looked up through `var`.
    #[must_use]
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = var("JSGO_MINIFY") {
            self.minify = matches!(value.trim(), "1" | "true");
        }
        if let Some(value) = var("JSGO_ERROR_LIMIT") {
            match value.trim().parse() {
                Ok(limit) => self.diagnostics.error_limit = limit,
                Err(_) => tracing::warn!(%value, "ignoring malformed JSGO_ERROR_LIMIT"),
            }
        }
        self
    }

    #[must_use]
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    #[must_use]
    pub fn with_entry_points(mut self, entry_points: EntryPoints) -> Self {
        self.entry_points = entry_points;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[inline]
    pub fn naming_mode(&self) -> NamingMode {
        if self.minify {
            NamingMode::Minified
        } else {
            NamingMode::Natural
        }
    }
}
