//! Call sites of the runtime value bridge.
//!
//! Generated code converts values at every boundary with the host. Kinds
//! whose representation already coincides with the host's skip the runtime
//! call; everything else goes through `$externalize` / `$internalize` with
//! the runtime type as second argument.

use jsgo_diagnostic::FatalError;
use jsgo_ir::TypeId;
use jsgo_types::{BasicKind, TypeData};

use crate::context::UnitContext;

impl UnitContext<'_> {
    /// Host expression converting compiled `expr` of type `ty` to a host
    /// value.
    pub fn externalize_site(&mut self, expr: &str, ty: TypeId) -> Result<String, FatalError> {
        let ty = self.resolve_type(ty);
        if self.is_js_object(ty) {
            return Ok(expr.to_owned());
        }
        if let TypeData::Basic(kind) = self.types.lookup(self.types.underlying(ty)) {
            if kind.is_numeric() && !kind.is_64bit() && !kind.is_complex() {
                return Ok(expr.to_owned());
            }
            if kind == BasicKind::UntypedNil {
                return Ok("null".to_owned());
            }
        }
        Ok(format!("$externalize({expr}, {})", self.type_name(ty)?))
    }

    /// Compiled expression converting host `expr` to a value of type `ty`.
    pub fn internalize_site(&mut self, expr: &str, ty: TypeId) -> Result<String, FatalError> {
        let ty = self.resolve_type(ty);
        if self.is_js_object(ty) {
            return Ok(expr.to_owned());
        }
        if let TypeData::Basic(kind) = self.types.lookup(self.types.underlying(ty)) {
            if kind == BasicKind::Bool {
                return Ok(format!("!!({expr})"));
            }
            if kind.is_integer() && !kind.is_64bit() {
                return Ok(fix_number(&format!("$parseInt({expr})"), kind));
            }
            if kind.is_float() {
                return Ok(format!("$parseFloat({expr})"));
            }
        }
        Ok(format!("$internalize({expr}, {})", self.type_name(ty)?))
    }
}

/// Wrap a host number expression so it holds a valid value of `kind`.
fn fix_number(expr: &str, kind: BasicKind) -> String {
    match kind {
        BasicKind::Int8 => format!("({expr} << 24 >> 24)"),
        BasicKind::Uint8 => format!("({expr} << 24 >>> 24)"),
        BasicKind::Int16 => format!("({expr} << 16 >> 16)"),
        BasicKind::Uint16 => format!("({expr} << 16 >>> 16)"),
        BasicKind::Int32 | BasicKind::Int => format!("({expr} >> 0)"),
        BasicKind::Uint32 | BasicKind::Uint | BasicKind::Uintptr => format!("({expr} >>> 0)"),
        _ => expr.to_owned(),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
