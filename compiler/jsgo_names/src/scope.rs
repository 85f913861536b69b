//! Scope tree and identifier allocation.
//!
//! Scopes live in an arena and refer to their parent by [`ScopeId`], so the
//! tree has no ownership cycles and lookups walk ids up to the root. The
//! root is the package scope; every function body gets a child scope that
//! starts from a copy of its parent's name counts, which is what keeps a
//! local from reusing a name visible in an enclosing function.

use jsgo_diagnostic::{bailout, FatalError};
use jsgo_ir::ObjectId;
use rustc_hash::FxHashMap;

use crate::encode::encode_ident;
use crate::reserved::RESERVED_KEYWORDS;
use crate::NamingError;

/// How proposed names turn into final identifiers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum NamingMode {
    /// Keep the source name, adding `$N` on collision.
    #[default]
    Natural,
    /// Ignore the source name and hand out the shortest free name.
    Minified,
}

/// Handle to a scope in a [`ScopeTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The package scope.
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

struct Scope {
    parent: Option<ScopeId>,
    /// Base name → number of allocations seen from this scope.
    all_vars: FxHashMap<String, u32>,
    /// Function-local names in allocation order.
    local_vars: Vec<String>,
    /// Names already assigned to source bindings.
    object_names: FxHashMap<ObjectId, String>,
}

/// All scopes of one compilation unit.
pub struct ScopeTree {
    scopes: Vec<Scope>,
    mode: NamingMode,
}

impl ScopeTree {
    /// Create a tree holding only the package scope, with every host
    /// reserved word already counted once.
    pub fn new(mode: NamingMode) -> Self {
        let all_vars = RESERVED_KEYWORDS
            .iter()
            .map(|kw| ((*kw).to_owned(), 1))
            .collect();
        ScopeTree {
            scopes: vec![Scope {
                parent: None,
                all_vars,
                local_vars: Vec::new(),
                object_names: FxHashMap::default(),
            }],
            mode,
        }
    }

    #[inline]
    pub fn mode(&self) -> NamingMode {
        self.mode
    }

    /// Open a function scope under `parent`.
    pub fn enter(&mut self, parent: ScopeId) -> ScopeId {
        let all_vars = self.scopes[parent.index()].all_vars.clone();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "scope count is bounded by the number of functions in a unit"
        )]
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            all_vars,
            local_vars: Vec::new(),
            object_names: FxHashMap::default(),
        });
        tracing::trace!(?id, ?parent, "entered scope");
        id
    }

    #[inline]
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.index()].parent
    }

    /// Allocate a fresh identifier for `proposed` in `scope`.
    ///
    /// With `module_level`, the name is reserved in every ancestor as well
    /// and is not added to the scope's local variables.
    pub fn allocate(
        &mut self,
        scope: ScopeId,
        proposed: &str,
        module_level: bool,
    ) -> Result<String, FatalError> {
        if proposed.is_empty() {
            return Err(bailout(NamingError::EmptyName));
        }
        Ok(self.allocate_encoded(scope, encode_ident(proposed), module_level))
    }

    /// Like [`allocate`](Self::allocate) for a name that is already a valid
    /// host identifier, e.g. one carrying a `$` suffix.
    pub(crate) fn allocate_encoded(&mut self, scope: ScopeId, base: String, module_level: bool) -> String {
        let base = match self.mode {
            NamingMode::Natural => base,
            NamingMode::Minified => self.next_minified(scope, module_level),
        };

        let target = &mut self.scopes[scope.index()];
        let count = target.all_vars.get(&base).copied().unwrap_or(0);
        target.all_vars.insert(base.clone(), count + 1);
        let name = if count > 0 {
            format!("{base}${count}")
        } else {
            base.clone()
        };

        if module_level {
            let mut ancestor = target.parent;
            while let Some(id) = ancestor {
                let scope = &mut self.scopes[id.index()];
                scope.all_vars.insert(base.clone(), count + 1);
                ancestor = scope.parent;
            }
            return name;
        }

        self.scopes[scope.index()].local_vars.push(name.clone());
        name
    }

    fn next_minified(&self, scope: ScopeId, module_level: bool) -> String {
        let all_vars = &self.scopes[scope.index()].all_vars;
        let mut i = 0u64;
        loop {
            let candidate = minified_name(i, module_level);
            if all_vars.get(&candidate).copied().unwrap_or(0) == 0 {
                return candidate;
            }
            i += 1;
        }
    }

    /// Name previously assigned to `obj` in `scope` or any ancestor. The
    /// outermost assignment wins.
    pub fn assigned_name(&self, scope: ScopeId, obj: ObjectId) -> Option<&str> {
        let mut chain = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            chain.push(id);
            current = self.scopes[id.index()].parent;
        }
        chain
            .iter()
            .rev()
            .find_map(|id| self.scopes[id.index()].object_names.get(&obj))
            .map(String::as_str)
    }

    pub fn record_name(&mut self, scope: ScopeId, obj: ObjectId, name: String) {
        self.scopes[scope.index()].object_names.insert(obj, name);
    }

    /// Times `base` has been allocated as seen from `scope`.
    pub fn usage_count(&self, scope: ScopeId, base: &str) -> u32 {
        self.scopes[scope.index()].all_vars.get(base).copied().unwrap_or(0)
    }

    pub fn local_vars(&self, scope: ScopeId) -> &[String] {
        &self.scopes[scope.index()].local_vars
    }

    /// Discard a scope's locals, returning them in allocation order.
    pub fn take_locals(&mut self, scope: ScopeId) -> Vec<String> {
        std::mem::take(&mut self.scopes[scope.index()].local_vars)
    }
}

/// The `index`-th name of the base-26 sequence: `a … z aa ab …`, or the
/// uppercase one for module level.
pub fn minified_name(index: u64, uppercase: bool) -> String {
    let offset = if uppercase { b'A' } else { b'a' };
    let mut letters = Vec::new();
    let mut j = index;
    loop {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "j % 26 is below 26"
        )]
        letters.push(offset + (j % 26) as u8);
        if j < 26 {
            break;
        }
        j = j / 26 - 1;
    }
    letters.iter().rev().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
