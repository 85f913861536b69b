//! Source-syntax rendering of types.
//!
//! Used for the readable annotations on instance names and for the `string`
//! of runtime type descriptors.

use jsgo_ir::{PackageId, TypeId, Universe};
use jsgo_stack::ensure_sufficient_stack;

use crate::data::{ChanDir, TypeData};
use crate::TypeInterner;

/// Renders types the way they are spelled in source.
pub struct TypeFormatter<'a> {
    types: &'a TypeInterner,
    universe: &'a Universe,
    /// Named types from this package are printed unqualified.
    relative_to: Option<PackageId>,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(types: &'a TypeInterner, universe: &'a Universe) -> Self {
        TypeFormatter {
            types,
            universe,
            relative_to: None,
        }
    }

    #[must_use]
    pub fn relative_to(mut self, package: PackageId) -> Self {
        self.relative_to = Some(package);
        self
    }

    pub fn format(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write(&mut out, id);
        out
    }

    /// Comma-separated list, as used between brackets and parentheses.
    pub fn format_list(&self, ids: &[TypeId]) -> String {
        let mut out = String::new();
        self.write_list(&mut out, ids);
        out
    }

    fn write_list(&self, out: &mut String, ids: &[TypeId]) {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write(out, *id);
        }
    }

    fn write(&self, out: &mut String, id: TypeId) {
        ensure_sufficient_stack(|| match self.types.lookup(id) {
            TypeData::Basic(kind) => out.push_str(kind.as_str()),
            TypeData::Array { elem, len } => {
                out.push('[');
                out.push_str(&len.to_string());
                out.push(']');
                self.write(out, elem);
            }
            TypeData::Slice(elem) => {
                out.push_str("[]");
                self.write(out, elem);
            }
            TypeData::Map { key, value } => {
                out.push_str("map[");
                self.write(out, key);
                out.push(']');
                self.write(out, value);
            }
            TypeData::Chan { elem, dir } => {
                out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write(out, elem);
            }
            TypeData::Pointer(elem) => {
                out.push('*');
                self.write(out, elem);
            }
            TypeData::Signature {
                params,
                results,
                variadic,
                ..
            } => {
                out.push_str("func");
                self.write_signature(out, &params, &results, variadic);
            }
            TypeData::Struct(fields) => {
                out.push_str("struct{");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if !field.embedded {
                        out.push_str(self.universe.lookup(field.name));
                        out.push(' ');
                    }
                    self.write(out, field.ty);
                    if !field.tag.is_empty() {
                        out.push(' ');
                        out.push_str(&format!("{:?}", self.universe.lookup(field.tag)));
                    }
                }
                out.push('}');
            }
            TypeData::Interface(methods) => {
                if methods.is_empty() {
                    out.push_str("interface {}");
                    return;
                }
                out.push_str("interface{");
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    out.push_str(self.universe.lookup(method.name));
                    if let TypeData::Signature {
                        params,
                        results,
                        variadic,
                        ..
                    } = self.types.lookup(method.sig)
                    {
                        self.write_signature(out, &params, &results, variadic);
                    }
                }
                out.push('}');
            }
            TypeData::Named { obj, args } => {
                let object = self.universe.object(obj);
                if let Some(pkg) = object.package {
                    if Some(pkg) != self.relative_to {
                        out.push_str(&self.universe.package(pkg).name);
                        out.push('.');
                    }
                }
                out.push_str(self.universe.lookup(object.name));
                if !args.is_empty() {
                    out.push('[');
                    self.write_list(out, &args);
                    out.push(']');
                }
            }
            TypeData::TypeParam { name, .. } => out.push_str(self.universe.lookup(name)),
            TypeData::Tuple(elems) => {
                out.push('(');
                self.write_list(out, &elems);
                out.push(')');
            }
        });
    }

    fn write_signature(&self, out: &mut String, params: &[TypeId], results: &[TypeId], variadic: bool) {
        out.push('(');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let is_rest = variadic && i + 1 == params.len();
            match self.types.lookup(*param) {
                TypeData::Slice(elem) if is_rest => {
                    out.push_str("...");
                    self.write(out, elem);
                }
                _ => self.write(out, *param),
            }
        }
        out.push(')');
        match results {
            [] => {}
            [single] => {
                out.push(' ');
                self.write(out, *single);
            }
            many => {
                out.push_str(" (");
                self.write_list(out, many);
                out.push(')');
            }
        }
    }
}
