//! Host names for types.

use std::fmt::Write as _;

use jsgo_diagnostic::{bailout, FatalError};
use jsgo_ir::{ObjectId, TypeId};
use jsgo_stack::ensure_sufficient_stack;
use jsgo_types::{BasicKind, ChanDir, Subst, TypeData, TypeInterner, TypeList};

use crate::context::UnitContext;
use crate::encode::encode_string;
use crate::instance::{DeclKey, Instance};
use crate::NamingError;

/// Prelude suffix for a basic kind: `$Int`, `$kindInt`, …
pub fn to_js_type(kind: BasicKind) -> &'static str {
    match kind {
        BasicKind::Bool => "Bool",
        BasicKind::Int => "Int",
        BasicKind::Int8 => "Int8",
        BasicKind::Int16 => "Int16",
        BasicKind::Int32 => "Int32",
        BasicKind::Int64 => "Int64",
        BasicKind::Uint => "Uint",
        BasicKind::Uint8 => "Uint8",
        BasicKind::Uint16 => "Uint16",
        BasicKind::Uint32 => "Uint32",
        BasicKind::Uint64 => "Uint64",
        BasicKind::Uintptr => "Uintptr",
        BasicKind::Float32 => "Float32",
        BasicKind::Float64 => "Float64",
        BasicKind::Complex64 => "Complex64",
        BasicKind::Complex128 => "Complex128",
        BasicKind::String => "String",
        BasicKind::UnsafePointer => "UnsafePointer",
        BasicKind::UntypedNil => "UntypedNil",
    }
}

/// Whether values of `ty` must be boxed in their named type's wrapper to
/// reach its methods.
pub fn is_wrapped(types: &TypeInterner, ty: TypeId) -> bool {
    match types.lookup(types.underlying(ty)) {
        TypeData::Basic(kind) => {
            !kind.is_64bit() && !kind.is_complex() && kind != BasicKind::UntypedNil
        }
        TypeData::Array { .. }
        | TypeData::Chan { .. }
        | TypeData::Map { .. }
        | TypeData::Signature { .. } => true,
        TypeData::Pointer(elem) => {
            matches!(types.lookup(types.underlying(elem)), TypeData::Array { .. })
        }
        _ => false,
    }
}

impl UnitContext<'_> {
    /// Replace the type parameters of the function being emitted (and of
    /// the generic function it is nested in) with their arguments.
    pub fn resolve_type(&self, ty: TypeId) -> TypeId {
        let Some(inst) = self.current_instance() else {
            return ty;
        };
        let object = self.universe.object(inst.object);
        let mut params: Vec<TypeId> = Vec::new();
        let mut args: Vec<TypeId> = Vec::new();
        if let Some(func) = object.nesting_func {
            for (param, arg) in self.universe.object(func).type_params.iter().zip(&inst.tnest) {
                params.push(*param);
                args.push(*arg);
            }
        }
        for (param, arg) in object.type_params.iter().zip(&inst.targs) {
            params.push(*param);
            args.push(*arg);
        }
        self.types.substitute(ty, &Subst::new(&params, &args))
    }

    /// Host expression naming the runtime type `ty`.
    ///
    /// Basic types and the empty interface are prelude names; named types go
    /// through the instance registry; every other type gets one shared
    /// package-level declaration per structural identity.
    pub fn type_name(&mut self, ty: TypeId) -> Result<String, FatalError> {
        let ty = self.resolve_type(ty);
        ensure_sufficient_stack(|| self.type_name_resolved(ty))
    }

    fn type_name_resolved(&mut self, ty: TypeId) -> Result<String, FatalError> {
        match self.types.lookup(ty) {
            TypeData::Basic(kind) => return Ok(format!("${}", to_js_type(kind))),
            TypeData::Named { obj, .. } if obj == ObjectId::ERROR => {
                return Ok("$error".to_owned());
            }
            TypeData::Named { obj, args } => {
                let tnest = self.nest_args(obj, ty)?;
                return self.inst_name(&Instance::new(obj, args, tnest));
            }
            TypeData::Interface(methods) if methods.is_empty() => {
                return Ok("$emptyInterface".to_owned());
            }
            TypeData::TypeParam { .. } => {
                return Err(bailout(NamingError::UnexpectedTypeParam(
                    self.formatter().format(ty),
                )));
            }
            TypeData::Tuple(_) => {
                return Err(bailout(NamingError::UnhandledType {
                    ty: self.formatter().format(ty),
                    context: "type_name",
                }));
            }
            _ => {}
        }

        if let Some(name) = self.anon_types.get(&ty) {
            let name = name.clone();
            self.declare_dependency(DeclKey::AnonType(ty));
            return Ok(name);
        }

        // Component types are named first so their declarations precede
        // this one.
        self.type_init_args(ty)?;
        let label = self.types.lookup(ty).kind_label();
        let name = self.new_variable(&format!("{label}Type"), true)?;
        tracing::trace!(%name, ty = %self.formatter().format(ty), "anonymous type declared");
        self.anon_types.insert(ty, name.clone());
        self.anon_order.push((ty, name.clone()));
        // Shared at package level, so no nesting arguments.
        self.declare_dependency(DeclKey::AnonType(ty));
        Ok(name)
    }

    /// Type arguments inherited by named type `ty` declared inside a generic
    /// function: those of the open instance of that function.
    fn nest_args(&self, obj: ObjectId, ty: TypeId) -> Result<TypeList, FatalError> {
        let Some(func) = self.universe.object(obj).nesting_func else {
            return Ok(TypeList::new());
        };
        self.nesting_targs(func)
            .cloned()
            .ok_or_else(|| {
                bailout(NamingError::OutsideNestingFunction {
                    ty: self.formatter().format(ty),
                    func: self.universe.name_of(func).to_owned(),
                })
            })
    }

    /// Constructor arguments of the runtime type declaration for anonymous
    /// type `ty`, e.g. `$Int, 4` for `[4]int`. Names every component type.
    pub fn type_init_args(&mut self, ty: TypeId) -> Result<String, FatalError> {
        let data = self.types.lookup(ty);
        let mut out = String::new();
        match data {
            TypeData::Array { elem, len } => {
                let _ = write!(out, "{}, {len}", self.type_name(elem)?);
            }
            TypeData::Slice(elem) | TypeData::Pointer(elem) => {
                out.push_str(&self.type_name(elem)?);
            }
            TypeData::Chan { elem, dir } => {
                let elem = self.type_name(elem)?;
                let _ = write!(
                    out,
                    "{elem}, {}, {}",
                    dir == ChanDir::Send,
                    dir == ChanDir::Recv
                );
            }
            TypeData::Map { key, value } => {
                let key = self.type_name(key)?;
                let value = self.type_name(value)?;
                let _ = write!(out, "{key}, {value}");
            }
            TypeData::Signature {
                params,
                results,
                variadic,
                ..
            } => {
                let params = self.type_names(&params)?;
                let results = self.type_names(&results)?;
                let _ = write!(out, "[{params}], [{results}], {variadic}");
            }
            TypeData::Interface(methods) => {
                out.push('[');
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let name = self.universe.lookup(method.name);
                    let sig = self.type_name(method.sig)?;
                    let _ = write!(
                        out,
                        "{{prop: \"{name}\", name: \"{name}\", pkg: {}, typ: {sig}}}",
                        self.member_pkg(name)
                    );
                }
                out.push(']');
            }
            TypeData::Struct(fields) => {
                let path = &self.universe.package(self.package).path;
                let _ = write!(out, "{}, [", encode_string(path.as_bytes()));
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let prop = self.field_name(ty, i)?;
                    let name = self.universe.lookup(field.name);
                    let typ = self.type_name(field.ty)?;
                    let tag = self.universe.lookup(field.tag);
                    let _ = write!(
                        out,
                        "{{prop: \"{prop}\", name: {}, embedded: {}, exported: {}, typ: {typ}, tag: {}}}",
                        encode_string(name.as_bytes()),
                        field.embedded,
                        is_exported_name(name),
                        encode_string(tag.as_bytes()),
                    );
                }
                out.push(']');
            }
            TypeData::Basic(_)
            | TypeData::Named { .. }
            | TypeData::TypeParam { .. }
            | TypeData::Tuple(_) => {
                return Err(bailout(NamingError::UnhandledType {
                    ty: self.formatter().format(ty),
                    context: "type_init_args",
                }));
            }
        }
        Ok(out)
    }

    fn type_names(&mut self, tys: &[TypeId]) -> Result<String, FatalError> {
        let mut out = String::new();
        for (i, ty) in tys.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.type_name(*ty)?);
        }
        Ok(out)
    }

    /// Package qualifier of an interface method: empty when exported.
    fn member_pkg(&self, name: &str) -> String {
        if is_exported_name(name) {
            return "\"\"".to_owned();
        }
        encode_string(self.universe.package(self.package).path.as_bytes())
    }

    /// Runtime kind constant for `ty`, e.g. `$kindStruct`.
    pub fn type_kind(&self, ty: TypeId) -> Result<String, FatalError> {
        let kind = match self.types.lookup(self.types.underlying(ty)) {
            TypeData::Basic(kind) => return Ok(format!("$kind{}", to_js_type(kind))),
            TypeData::Array { .. } => "Array",
            TypeData::Chan { .. } => "Chan",
            TypeData::Interface(_) => "Interface",
            TypeData::Map { .. } => "Map",
            TypeData::Signature { .. } => "Func",
            TypeData::Slice(_) => "Slice",
            TypeData::Struct(_) => "Struct",
            TypeData::Pointer(_) => "Ptr",
            TypeData::Named { .. } | TypeData::TypeParam { .. } | TypeData::Tuple(_) => {
                return Err(bailout(NamingError::UnhandledType {
                    ty: self.formatter().format(ty),
                    context: "type_kind",
                }));
            }
        };
        Ok(format!("$kind{kind}"))
    }

    pub fn is_wrapped(&self, ty: TypeId) -> bool {
        is_wrapped(self.types, ty)
    }
}

fn is_exported_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
