//! Field selections through structs, including external field annotations.

use jsgo_diagnostic::{bailout, missing_host_handle, FatalError};
use jsgo_ir::{Span, TypeId};
use jsgo_types::TypeData;

use crate::context::UnitContext;
use crate::tags::{format_js_tag_val, get_js_tag};
use crate::NamingError;

/// A resolved field selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Property names to follow from the receiver, in order.
    pub fields: Vec<String>,
    /// External name to read from the host handle reached by `fields`.
    pub js_tag: Option<String>,
}

impl Selection {
    /// Host expression selecting from `recv`.
    pub fn render(&self, recv: &str) -> String {
        let mut out = recv.to_owned();
        for field in &self.fields {
            out.push('.');
            out.push_str(field);
        }
        if let Some(tag) = &self.js_tag {
            out.push_str(&format_js_tag_val(tag));
        }
        out
    }
}

impl UnitContext<'_> {
    /// Resolve the field path `path` (field indices, implicit dereferences
    /// included) starting at a value of type `recv`.
    ///
    /// A field annotated `js:"name"` stops the walk: the selection follows
    /// the first-field chain down to the embedded host handle and reads
    /// `name` from it. When no handle is found a diagnostic is reported and
    /// nothing is returned.
    pub fn resolve_selection(
        &mut self,
        recv: TypeId,
        path: &[usize],
        span: Span,
    ) -> Result<Option<Selection>, FatalError> {
        let mut fields = Vec::with_capacity(path.len());
        let mut ty = self.resolve_type(recv);

        for &index in path {
            let strukt = self.deref_struct(ty).ok_or_else(|| {
                bailout(NamingError::NotAStruct {
                    ty: self.formatter().format(ty),
                    index,
                })
            })?;
            let field = self
                .types
                .struct_fields(strukt)
                .and_then(|f| f.get(index).cloned())
                .ok_or_else(|| {
                    bailout(NamingError::NotAStruct {
                        ty: self.formatter().format(strukt),
                        index,
                    })
                })?;

            let tag = get_js_tag(self.universe.lookup(field.tag)).filter(|t| !t.is_empty());
            if let Some(tag) = tag {
                let js_field = self.universe.lookup(field.name);
                let mut current = strukt;
                loop {
                    fields.push(self.field_name(current, 0)?);
                    let first = self
                        .types
                        .struct_fields(current)
                        .and_then(|f| f.first().map(|f| f.ty))
                        .map(|ty| self.resolve_type(ty));
                    let Some(first) = first else {
                        break;
                    };
                    if self.is_js_object(first) {
                        return Ok(Some(Selection {
                            fields,
                            js_tag: Some(tag),
                        }));
                    }
                    match self.deref_struct(first) {
                        Some(next) if self.has_fields(next) => current = next,
                        _ => break,
                    }
                }
                tracing::debug!(field = js_field, "external field without host handle");
                self.report(missing_host_handle(span, js_field));
                return Ok(None);
            }

            fields.push(self.field_name(strukt, index)?);
            ty = self.resolve_type(field.ty);
        }

        Ok(Some(Selection {
            fields,
            js_tag: None,
        }))
    }

    /// `ty` itself, or its element type when it is a pointer, if the result
    /// is a struct.
    fn deref_struct(&self, ty: TypeId) -> Option<TypeId> {
        let ty = match self.types.lookup(self.types.underlying(ty)) {
            TypeData::Pointer(elem) => elem,
            _ => ty,
        };
        self.types.struct_fields(ty).map(|_| ty)
    }

    fn has_fields(&self, ty: TypeId) -> bool {
        self.types.struct_fields(ty).is_some_and(|f| !f.is_empty())
    }
}
