//! Per-unit naming state.

use jsgo_dce::DepGraph;
use jsgo_diagnostic::{bailout, Diagnostic, DiagnosticConfig, DiagnosticList, FatalError};
use jsgo_ir::{ObjectId, PackageId, TypeId, Universe};
use jsgo_types::{TypeFormatter, TypeInterner, TypeList};
use rustc_hash::FxHashMap;

use crate::instance::{DeclKey, Instance, InstanceSet};
use crate::scope::{NamingMode, ScopeId, ScopeTree};
use crate::{NamingError, HOST_PACKAGE_PATH};

/// One open function body (or the package body at the bottom).
pub(crate) struct Frame {
    pub(crate) scope: ScopeId,
    /// The function instance being emitted; `None` for the package body.
    pub(crate) instance: Option<Instance>,
    pub(crate) lit_counter: u32,
}

/// Everything the naming layer tracks for one compilation unit.
///
/// Shared inputs (`Universe`, `TypeInterner`) are borrowed; everything else
/// is owned and dies with the unit.
pub struct UnitContext<'a> {
    pub(crate) universe: &'a Universe,
    pub(crate) types: &'a TypeInterner,
    pub(crate) package: PackageId,
    pub(crate) host_package: Option<PackageId>,
    pub(crate) scopes: ScopeTree,
    pub(crate) frames: Vec<Frame>,
    pub(crate) instances: InstanceSet,
    pub(crate) deps: DepGraph<DeclKey>,
    /// Declaration whose code is being emitted; dependency edges start here.
    pub(crate) current_decl: Option<DeclKey>,
    pub(crate) anon_types: FxHashMap<TypeId, String>,
    /// Anonymous type declarations in creation order.
    pub(crate) anon_order: Vec<(TypeId, String)>,
    /// Import path → package variable.
    pub(crate) pkg_vars: FxHashMap<String, String>,
    pub(crate) var_ptr_names: FxHashMap<ObjectId, String>,
    pub(crate) diagnostics: DiagnosticList,
}

impl<'a> UnitContext<'a> {
    pub fn new(
        universe: &'a Universe,
        types: &'a TypeInterner,
        package: PackageId,
        mode: NamingMode,
        diagnostics: DiagnosticConfig,
    ) -> Self {
        UnitContext {
            universe,
            types,
            package,
            host_package: universe.package_by_path(HOST_PACKAGE_PATH),
            scopes: ScopeTree::new(mode),
            frames: vec![Frame {
                scope: ScopeId::ROOT,
                instance: None,
                lit_counter: 0,
            }],
            instances: InstanceSet::new(),
            deps: DepGraph::new(),
            current_decl: None,
            anon_types: FxHashMap::default(),
            anon_order: Vec::new(),
            pkg_vars: FxHashMap::default(),
            var_ptr_names: FxHashMap::default(),
            diagnostics: DiagnosticList::new(diagnostics),
        }
    }

    #[inline]
    pub fn universe(&self) -> &'a Universe {
        self.universe
    }

    #[inline]
    pub fn types(&self) -> &'a TypeInterner {
        self.types
    }

    #[inline]
    pub fn package(&self) -> PackageId {
        self.package
    }

    #[inline]
    pub fn mode(&self) -> NamingMode {
        self.scopes.mode()
    }

    /// Formatter that prints this unit's own types unqualified.
    pub fn formatter(&self) -> TypeFormatter<'a> {
        TypeFormatter::new(self.types, self.universe).relative_to(self.package)
    }

    pub(crate) fn frame(&self) -> &Frame {
        // The package frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    pub(crate) fn frame_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    #[inline]
    pub fn current_scope(&self) -> ScopeId {
        self.frame().scope
    }

    /// The function instance being emitted, if inside one.
    pub fn current_instance(&self) -> Option<&Instance> {
        self.frame().instance.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    // Scopes

    /// Open the body of `instance`, nested in the current scope.
    pub fn enter_function(&mut self, instance: Instance) {
        let scope = self.scopes.enter(self.current_scope());
        tracing::trace!(object = ?instance.object, depth = self.frames.len(), "enter function");
        self.frames.push(Frame {
            scope,
            instance: Some(instance),
            lit_counter: 0,
        });
    }

    /// Type arguments of the open instance of `func`, searched from the
    /// innermost body outward.
    pub(crate) fn nesting_targs(&self, func: ObjectId) -> Option<&TypeList> {
        self.frames
            .iter()
            .rev()
            .filter_map(|frame| frame.instance.as_ref())
            .find(|inst| inst.object == func)
            .map(|inst| &inst.targs)
    }

    /// Close the innermost function body, returning its local variables in
    /// allocation order.
    pub fn exit_function(&mut self) -> Result<Vec<String>, FatalError> {
        if self.frames.len() <= 1 {
            return Err(bailout(NamingError::ScopeUnderflow));
        }
        match self.frames.pop() {
            Some(frame) => Ok(self.scopes.take_locals(frame.scope)),
            None => Err(bailout(NamingError::ScopeUnderflow)),
        }
    }

    /// Run `f` inside a function body, closing it afterwards even when `f`
    /// fails.
    pub fn in_function<R>(
        &mut self,
        instance: Instance,
        f: impl FnOnce(&mut Self) -> Result<R, FatalError>,
    ) -> Result<(R, Vec<String>), FatalError> {
        self.enter_function(instance);
        let result = f(self);
        let locals = self.exit_function()?;
        Ok((result?, locals))
    }

    /// Local variables allocated so far in the innermost scope.
    pub fn local_vars(&self) -> &[String] {
        self.scopes.local_vars(self.current_scope())
    }

    // Dependencies

    /// Run `f` with `key` as the declaration being emitted.
    pub fn in_decl<R>(&mut self, key: DeclKey, f: impl FnOnce(&mut Self) -> R) -> R {
        self.deps.declare(&key);
        let outer = self.current_decl.replace(key);
        let result = f(self);
        self.current_decl = outer;
        result
    }

    pub fn current_decl(&self) -> Option<&DeclKey> {
        self.current_decl.as_ref()
    }

    /// Record that the declaration being emitted requires `to`.
    ///
    /// References made outside any declaration (e.g. while setting up the
    /// package prologue) are not tracked.
    pub fn declare_dependency(&mut self, to: DeclKey) {
        match &self.current_decl {
            Some(from) => self.deps.declare_dependency(from, &to),
            None => {
                tracing::trace!(?to, "reference outside a declaration");
                self.deps.declare(&to);
            }
        }
    }

    pub fn deps(&self) -> &DepGraph<DeclKey> {
        &self.deps
    }

    pub fn deps_mut(&mut self) -> &mut DepGraph<DeclKey> {
        &mut self.deps
    }

    pub fn instances(&self) -> &InstanceSet {
        &self.instances
    }

    /// Anonymous type declarations in creation order.
    pub fn anon_types(&self) -> &[(TypeId, String)] {
        &self.anon_order
    }

    // Diagnostics

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &DiagnosticList {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticList {
        std::mem::take(&mut self.diagnostics)
    }
}
