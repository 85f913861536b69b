//! Compiled values to host values.

use std::rc::Rc;

use jsgo_diagnostic::{bailout, FatalError, ResultExt};
use jsgo_stack::ensure_sufficient_stack;

use crate::descriptor::{DescId, Kind};
use crate::error::ConversionError;
use crate::host::{HostObject, HostValue, TypedArray};
use crate::strings::utf8_to_utf16;
use crate::value::{Store, Value};
use crate::wrapper::Wrapper;
use crate::Bridge;

/// Compiled value graphs may be cyclic through pointers; externalizing one
/// recurses until this depth and then fails.
const MAX_DEPTH: usize = 10_000;

impl Bridge {
    /// Convert `value`, of descriptor `desc`, into a host value.
    ///
    /// Structs that hold no host handle become fresh host objects with
    /// their exported fields, unless `wrapper` is given, in which case it
    /// decides what the host sees.
    pub fn externalize(
        &self,
        value: &Value,
        desc: DescId,
        wrapper: Option<&Wrapper>,
    ) -> Result<HostValue, FatalError> {
        self.externalize_at(value, desc, wrapper, 0)
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "64-bit integers flatten to host numbers"
    )]
    fn externalize_at(
        &self,
        value: &Value,
        id: DescId,
        wrapper: Option<&Wrapper>,
        depth: usize,
    ) -> Result<HostValue, FatalError> {
        if depth > MAX_DEPTH {
            return Err(bailout(ConversionError::TooDeep(MAX_DEPTH)));
        }
        if id == DescId::JS_OBJECT {
            return match value {
                Value::Host(host) => Ok(host.clone()),
                _ => Err(self.mismatch(id, "host handle")),
            };
        }

        let desc = self.table.desc(id)?;
        let next = depth + 1;
        match (&desc.kind, value) {
            (Kind::Bool, Value::Bool(b)) => Ok(HostValue::Bool(*b)),
            (kind, Value::Int(n)) if kind.is_small_int() || *kind == Kind::UnsafePointer => {
                Ok(HostValue::Number(*n as f64))
            }
            (Kind::Float32 | Kind::Float64, Value::Float(n)) => Ok(HostValue::Number(*n)),
            // 64-bit integers flatten to the nearest host number.
            (Kind::Int64, Value::Int64(n)) => Ok(HostValue::Number(*n as f64)),
            (Kind::Uint64, Value::Uint64(n)) => Ok(HostValue::Number(*n as f64)),
            (Kind::String, Value::Str(bytes)) => Ok(HostValue::Str(utf8_to_utf16(bytes))),

            (Kind::Array { elem, len }, Value::Array(store)) => {
                self.externalize_seq(store, 0, *len, *elem, wrapper, next)
            }
            (Kind::Slice { .. }, Value::Slice(None))
            | (Kind::Map { .. }, Value::Map(None))
            | (Kind::Ptr { .. }, Value::Ptr(None))
            | (Kind::Func(_), Value::Func(None))
            | (Kind::Interface { .. }, Value::Iface(None)) => Ok(HostValue::Null),
            (Kind::Slice { elem }, Value::Slice(Some(slice))) => {
                self.externalize_seq(&slice.store, slice.offset, slice.len, *elem, wrapper, next)
            }

            (Kind::Func(sig), Value::Func(Some(func))) => self.externalize_func(func, sig, wrapper),

            (Kind::Interface { .. }, Value::Iface(Some(boxed))) => {
                if boxed.desc == DescId::JS_OBJECT {
                    if let Value::Host(host) = &boxed.value {
                        return Ok(host.clone());
                    }
                }
                ensure_sufficient_stack(|| {
                    self.externalize_at(&boxed.value, boxed.desc, wrapper, next)
                })
            }

            (Kind::Map { key, elem }, Value::Map(Some(map))) => {
                let object = HostObject::new();
                let entries = map.borrow().entries().to_vec();
                for (k, v) in &entries {
                    let k = ensure_sufficient_stack(|| self.externalize_at(k, *key, wrapper, next))?;
                    let v = ensure_sufficient_stack(|| self.externalize_at(v, *elem, wrapper, next))?;
                    object.set(&k.to_display_string(), v);
                }
                Ok(HostValue::Object(Rc::new(object)))
            }

            (Kind::Ptr { elem }, Value::Ptr(Some(ptr))) => {
                let target = ptr.load();
                ensure_sufficient_stack(|| self.externalize_at(&target, *elem, wrapper, next))
            }

            (Kind::Struct { .. }, Value::Struct(_)) => {
                self.externalize_struct(value, id, wrapper, next)
            }

            (Kind::Complex64 | Kind::Complex128 | Kind::Chan { .. }, _) => Err(bailout(
                ConversionError::CannotExternalize(desc.string.clone()),
            )),

            (kind, _) => Err(self.mismatch(id, kind.label())),
        }
    }

    fn externalize_seq(
        &self,
        store: &Store,
        offset: usize,
        len: usize,
        elem: DescId,
        wrapper: Option<&Wrapper>,
        depth: usize,
    ) -> Result<HostValue, FatalError> {
        // Numeric elements: the host views the same buffer.
        if let Store::Numeric(buffer) = store {
            if !self.table.needs_externalization(elem) {
                return Ok(HostValue::Typed(TypedArray {
                    buffer: buffer.clone(),
                    offset,
                    len,
                }));
            }
        }
        let mut items = Vec::with_capacity(len);
        for i in offset..offset + len {
            let item = store.get(i).ok_or_else(|| self.mismatch(elem, "element in range"))?;
            items.push(ensure_sufficient_stack(|| {
                self.externalize_at(&item, elem, wrapper, depth)
            })?);
        }
        Ok(HostValue::array(items))
    }

    fn externalize_struct(
        &self,
        value: &Value,
        id: DescId,
        wrapper: Option<&Wrapper>,
        depth: usize,
    ) -> Result<HostValue, FatalError> {
        let obj = value
            .as_struct()
            .ok_or_else(|| self.mismatch(id, "struct"))?;

        if self.table.timestamp() == Some(id) {
            let nanos = obj
                .borrow()
                .fields
                .first()
                .and_then(Value::as_int)
                .ok_or_else(|| self.mismatch(id, "int64 nanoseconds"))?;
            #[expect(clippy::cast_precision_loss, reason = "dates are host numbers")]
            let millis = (nanos / 1_000_000) as f64;
            return Ok(HostValue::Date(millis));
        }

        if let Some(handle) = self.search_host_handle(value, id)? {
            return Ok(handle);
        }

        if let Some(wrapper) = wrapper {
            return wrapper
                .wrap(self, value, id)
                .clue(|| format!("wrapping {}", self.table.string(id)));
        }

        let object = HostObject::new();
        let fields = self.table.struct_fields(id)?;
        let values = obj.borrow().fields.clone();
        for (field, field_value) in fields.iter().zip(&values) {
            if !field.exported {
                continue;
            }
            let host = ensure_sufficient_stack(|| {
                self.externalize_at(field_value, field.desc, wrapper, depth)
            })
            .clue(|| format!("externalizing field {}", field.name))?;
            object.set(&field.name, host);
        }
        Ok(HostValue::Object(Rc::new(object)))
    }

    /// Follow first fields (through pointers and interfaces) looking for a
    /// host handle. A struct that embeds one externalizes to the handle.
    fn search_host_handle(&self, value: &Value, id: DescId) -> Result<Option<HostValue>, FatalError> {
        let mut visited = Vec::new();
        self.search_host_handle_in(value, id, &mut visited)
    }

    fn search_host_handle_in(
        &self,
        value: &Value,
        id: DescId,
        visited: &mut Vec<usize>,
    ) -> Result<Option<HostValue>, FatalError> {
        if id == DescId::JS_OBJECT {
            return Ok(value.as_host().cloned());
        }
        match (&self.table.desc(id)?.kind, value) {
            (Kind::Ptr { elem }, Value::Ptr(Some(ptr))) => {
                let target = ptr.load();
                self.search_host_handle_in(&target, *elem, visited)
            }
            (Kind::Struct { fields }, _) => {
                let (Some(first), Some(obj)) = (fields.first(), value.as_struct()) else {
                    return Ok(None);
                };
                // Structs linked through their first field may form a cycle.
                let addr = Rc::as_ptr(obj) as usize;
                if visited.contains(&addr) {
                    return Ok(None);
                }
                visited.push(addr);
                let Some(inner) = obj.borrow().fields.first().cloned() else {
                    return Ok(None);
                };
                self.search_host_handle_in(&inner, first.desc, visited)
            }
            (Kind::Interface { .. }, Value::Iface(Some(boxed))) => {
                self.search_host_handle_in(&boxed.value, boxed.desc, visited)
            }
            _ => Ok(None),
        }
    }

    pub(crate) fn mismatch(&self, id: DescId, expected: &'static str) -> FatalError {
        bailout(ConversionError::ValueMismatch {
            ty: self.table.string(id),
            expected,
        })
    }
}
