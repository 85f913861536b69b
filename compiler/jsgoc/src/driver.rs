//! Per-unit emission to a fixed point, then pruning.

use jsgo_dce::Pruned;
use jsgo_diagnostic::{bailout, DiagnosticList, FatalError, ResultExt};
use jsgo_ir::{PackageId, Universe};
use jsgo_names::{DeclKey, UnitContext};
use jsgo_types::TypeInterner;
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::error::DriverError;
use crate::minify::remove_whitespace;
use crate::options::CompileOptions;

/// Code generation for single declarations.
///
/// Every symbol the generated code refers to must be named through `ctx`;
/// that is how the driver learns which declarations depend on which.
pub trait DeclEmitter {
    fn emit(&self, ctx: &mut UnitContext<'_>, key: &DeclKey) -> Result<String, FatalError>;
}

/// One package to compile.
#[derive(Clone, Debug)]
pub struct UnitInput {
    pub package: PackageId,
    /// Declarations emitted unconditionally, in source order.
    pub decls: Vec<DeclKey>,
}

/// What survives of a unit.
#[derive(Debug)]
pub struct UnitOutput {
    /// Live declarations with their code, in emission order.
    pub decls: Vec<(DeclKey, String)>,
    /// Unreachable declarations, in first-reference order.
    pub dead: Vec<DeclKey>,
    /// Live declarations of other packages this unit refers to.
    pub imports: Vec<DeclKey>,
    pub diagnostics: DiagnosticList,
}

struct Unit<'u, 'a, E: ?Sized> {
    ctx: UnitContext<'a>,
    emitter: &'u E,
    minify: bool,
    emitted: FxHashSet<DeclKey>,
    code: Vec<(DeclKey, String)>,
}

impl<E: DeclEmitter + ?Sized> Unit<'_, '_, E> {
    /// Whether the unit itself must emit `key`.
    fn is_local(&self, key: &DeclKey) -> bool {
        match key {
            DeclKey::AnonType(_) => true,
            DeclKey::Instance(inst) => {
                self.ctx.universe().object(inst.object).package == Some(self.ctx.package())
            }
        }
    }

    fn describe(&self, key: &DeclKey) -> String {
        match key {
            DeclKey::Instance(inst) => {
                let name = self.ctx.universe().name_of(inst.object);
                if inst.is_trivial() {
                    name.to_owned()
                } else {
                    format!("{name}[{}]", inst.type_params_string(&self.ctx.formatter()))
                }
            }
            DeclKey::AnonType(ty) => self.ctx.formatter().format(*ty),
        }
    }

    fn emit(&mut self, key: &DeclKey) -> Result<(), FatalError> {
        if !self.is_local(key) {
            return Err(bailout(DriverError::ForeignDecl(self.describe(key))));
        }
        if !self.emitted.insert(key.clone()) {
            return Ok(());
        }
        let emitter = self.emitter;
        let code = self
            .ctx
            .in_decl(key.clone(), |ctx| emitter.emit(ctx, key))
            .clue(|| format!("emitting {}", self.describe(key)))?;
        if self.ctx.depth() != 0 {
            return Err(bailout(DriverError::UnbalancedScopes {
                decl: self.describe(key),
                depth: self.ctx.depth(),
            }));
        }
        tracing::trace!(decl = %self.describe(key), bytes = code.len(), "declaration emitted");
        let code = if self.minify {
            remove_whitespace(&code)
        } else {
            code
        };
        self.code.push((key.clone(), code));
        Ok(())
    }
}

/// Compile one unit.
///
/// Seeds are emitted first. The dependency graph is then closed from the
/// entry points: every reached declaration of this package that has not
/// been emitted yet (typically a generic instance first named while
/// emitting something else) is emitted in turn, which may reach more.
pub fn compile_unit<E: DeclEmitter + ?Sized>(
    universe: &Universe,
    types: &TypeInterner,
    input: &UnitInput,
    emitter: &E,
    options: &CompileOptions,
) -> Result<UnitOutput, FatalError> {
    let package = &universe.package(input.package).path;
    let mut unit = Unit {
        ctx: UnitContext::new(
            universe,
            types,
            input.package,
            options.naming_mode(),
            options.diagnostics.clone(),
        ),
        emitter,
        minify: options.minify,
        emitted: FxHashSet::default(),
        code: Vec::with_capacity(input.decls.len()),
    };

    for key in &input.decls {
        unit.emit(key).clue(|| format!("compiling package {package}"))?;
    }

    let entries = options.entry_points.resolve(universe, &input.decls);
    let mut graph = std::mem::take(unit.ctx.deps_mut());
    let Pruned { live, dead } = graph
        .close(&entries, |graph, key| {
            if unit.is_local(key) && !unit.emitted.contains(key) {
                unit.emit(key)?;
                graph.merge(&std::mem::take(unit.ctx.deps_mut()));
            }
            Ok::<_, FatalError>(())
        })
        .clue(|| format!("compiling package {package}"))?;

    let imports: Vec<_> = live.iter().filter(|key| !unit.is_local(key)).cloned().collect();
    let live: FxHashSet<&DeclKey> = live.iter().collect();
    let decls: Vec<_> = unit
        .code
        .into_iter()
        .filter(|(key, _)| live.contains(key))
        .collect();
    tracing::debug!(
        %package,
        emitted = unit.emitted.len(),
        live = decls.len(),
        dead = dead.len(),
        imports = imports.len(),
        "unit compiled"
    );

    Ok(UnitOutput {
        decls,
        dead,
        imports,
        diagnostics: unit.ctx.take_diagnostics(),
    })
}

/// Compile independent units in parallel, one result per input, in input
/// order.
pub fn compile_units<E: DeclEmitter + Sync + ?Sized>(
    universe: &Universe,
    types: &TypeInterner,
    units: &[UnitInput],
    emitter: &E,
    options: &CompileOptions,
) -> Vec<Result<UnitOutput, FatalError>> {
    units
        .par_iter()
        .map(|input| compile_unit(universe, types, input, emitter, options))
        .collect()
}
