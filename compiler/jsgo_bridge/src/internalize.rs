//! Host values to compiled values.
//!
//! Each top-level call keeps a seen-set keyed by (target descriptor, host
//! identity, view length). Struct, map and slice results are registered
//! before their contents are converted, so a cyclic host graph becomes a
//! cyclic compiled graph instead of recursing forever, and a host object
//! reached twice for the same target yields the same compiled value.

use std::cell::RefCell;
use std::rc::Rc;

use jsgo_diagnostic::{bailout, FatalError, ResultExt};
use jsgo_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

use crate::descriptor::{DescId, Kind, NumKind};
use crate::error::ConversionError;
use crate::host::{HostValue, InternalRef};
use crate::numeric::{parse_float, parse_int, to_int64, to_number, to_uint64, wrap_int};
use crate::strings::utf16_to_utf8;
use crate::value::{MapObject, NumericBuffer, Pointer, SliceValue, Store, Value};
use crate::Bridge;

type Seen = FxHashMap<SeenKey, Value>;

/// Typed views over the same buffer start are told apart by length.
type SeenKey = (DescId, usize, usize);

fn seen_key(id: DescId, host: &HostValue) -> Option<SeenKey> {
    let addr = host.identity()?;
    let len = match host {
        HostValue::Typed(view) => view.len,
        _ => 0,
    };
    Some((id, addr, len))
}

impl Bridge {
    /// Convert `host` into a compiled value of descriptor `desc`.
    ///
    /// `recv` is bound as the receiver of host functions converted along
    /// the way.
    pub fn internalize(
        &self,
        host: &HostValue,
        desc: DescId,
        recv: Option<&HostValue>,
    ) -> Result<Value, FatalError> {
        let mut seen = Seen::default();
        self.internalize_with(host, desc, recv, &mut seen)
    }

    fn internalize_with(
        &self,
        host: &HostValue,
        id: DescId,
        recv: Option<&HostValue>,
        seen: &mut Seen,
    ) -> Result<Value, FatalError> {
        if id == DescId::JS_OBJECT {
            return Ok(Value::Host(host.clone()));
        }
        if id == DescId::JS_OBJECT_STRUCT {
            return Err(bailout(ConversionError::HandleByValue));
        }
        if let HostValue::Object(obj) = host {
            if let Some(internal) = obj.internal() {
                return self.assert_internal(internal, id);
            }
        }
        if self.table.timestamp() == Some(id) {
            return self.internalize_timestamp(host, id);
        }
        if let Some(value) = seen_key(id, host).and_then(|key| seen.get(&key)) {
            return Ok(value.clone());
        }

        let desc = self.table.desc(id)?;
        match &desc.kind {
            Kind::Bool => Ok(Value::Bool(host.truthy())),
            kind if kind.is_small_int() => Ok(Value::Int(
                wrap_int(kind, parse_int(host)).unwrap_or_default(),
            )),
            Kind::Int64 => Ok(Value::Int64(to_int64(to_number(host)))),
            Kind::Uint64 => Ok(Value::Uint64(to_uint64(to_number(host)))),
            Kind::Float32 | Kind::Float64 => Ok(Value::Float(parse_float(host))),
            Kind::String => Ok(Value::Str(match host {
                HostValue::Str(units) => utf16_to_utf8(units),
                other => Rc::from(other.to_display_string().into_bytes()),
            })),

            Kind::Array { elem, len } => {
                let items = self.host_items(host, id)?;
                if items.len() != *len {
                    return Err(bailout(ConversionError::WrongArrayLength {
                        expected: *len,
                        got: items.len(),
                    }));
                }
                let store = self.internalize_items(&items, *elem, recv, seen)?;
                Ok(Value::Array(store))
            }

            Kind::Slice { elem } => {
                if host.is_nullish() {
                    return Ok(Value::Slice(None));
                }
                let items = self.host_items(host, id)?;
                self.internalize_slice(host, &items, id, *elem, recv, seen)
            }

            Kind::Func(sig) => self.internalize_func(host, sig, recv, id),

            Kind::Interface { methods } => {
                if !methods.is_empty() {
                    return Err(bailout(ConversionError::CannotInternalize(
                        desc.string.clone(),
                    )));
                }
                self.internalize_dynamic(host, recv, seen)
            }

            Kind::Map { key, elem } => self.internalize_map(host, id, *key, *elem, recv, seen),

            Kind::Ptr { elem } => {
                if host.is_nullish() {
                    return Ok(Value::Ptr(None));
                }
                if self.table.pointee_struct(id).is_some() {
                    let target = ensure_sufficient_stack(|| {
                        self.internalize_with(host, *elem, recv, seen)
                    })?;
                    return match target {
                        Value::Struct(obj) => Ok(Value::Ptr(Some(Pointer::Struct(obj)))),
                        _ => Err(self.mismatch(*elem, "struct")),
                    };
                }
                Err(bailout(ConversionError::CannotInternalize(
                    desc.string.clone(),
                )))
            }

            Kind::Struct { .. } => self.internalize_struct(host, id, recv, seen),

            Kind::Complex64 | Kind::Complex128 | Kind::UnsafePointer | Kind::Chan { .. } => Err(
                bailout(ConversionError::CannotInternalize(desc.string.clone())),
            ),

            // Every small integer kind is taken by the guard above.
            _ => Err(bailout(ConversionError::CannotInternalize(
                desc.string.clone(),
            ))),
        }
    }

    /// A host object made by a wrapper factory carries the compiled value
    /// it stands for; hand that back if it fits the target.
    fn assert_internal(&self, internal: InternalRef, target: DescId) -> Result<Value, FatalError> {
        if internal.desc == target {
            return Ok(internal.value);
        }
        if self.table.pointee_struct(target) == Some(internal.desc) {
            if let Some(obj) = internal.value.as_struct() {
                return Ok(Value::Ptr(Some(Pointer::Struct(Rc::clone(obj)))));
            }
        }
        if matches!(self.table.desc(target)?.kind, Kind::Interface { .. })
            && self.table.implements(internal.desc, target)
        {
            return Ok(Value::boxed(internal.desc, internal.value));
        }
        Err(bailout(ConversionError::TypeAssertion {
            expected: self.table.string(target),
            got: self.table.string(internal.desc),
        }))
    }

    fn internalize_timestamp(&self, host: &HostValue, id: DescId) -> Result<Value, FatalError> {
        let HostValue::Date(millis) = host else {
            return Err(bailout(ConversionError::NotADate {
                ty: self.table.string(id),
                got: host.type_of(),
            }));
        };
        let value = self.table.zero(id)?;
        let obj = value.as_struct().ok_or_else(|| self.mismatch(id, "struct"))?;
        if let Some(slot) = obj.borrow_mut().fields.first_mut() {
            *slot = Value::Int64(to_int64(millis * 1_000_000.0));
        }
        Ok(value)
    }

    /// Elements of a host array or typed array.
    fn host_items(&self, host: &HostValue, id: DescId) -> Result<Vec<HostValue>, FatalError> {
        match host {
            HostValue::Array(arr) => Ok(arr.items()),
            HostValue::Typed(view) => Ok(view.to_vec().into_iter().map(HostValue::Number).collect()),
            other => Err(bailout(ConversionError::UnexpectedHostValue {
                host: other.type_of(),
                ty: self.table.string(id),
            })),
        }
    }

    fn internalize_items(
        &self,
        items: &[HostValue],
        elem: DescId,
        recv: Option<&HostValue>,
        seen: &mut Seen,
    ) -> Result<Store, FatalError> {
        let values = items
            .iter()
            .map(|item| ensure_sufficient_stack(|| self.internalize_with(item, elem, recv, seen)))
            .collect::<Result<Vec<_>, _>>()?;
        self.store_from(elem, values)
    }

    fn internalize_slice(
        &self,
        host: &HostValue,
        items: &[HostValue],
        id: DescId,
        elem: DescId,
        recv: Option<&HostValue>,
        seen: &mut Seen,
    ) -> Result<Value, FatalError> {
        if self.table.desc(elem)?.kind.num_kind().is_some() {
            let store = self.internalize_items(items, elem, recv, seen)?;
            return Ok(Value::slice(store));
        }
        let cell = Rc::new(RefCell::new(Vec::with_capacity(items.len())));
        let slice = Value::Slice(Some(SliceValue {
            store: Store::Boxed(Rc::clone(&cell)),
            offset: 0,
            len: items.len(),
        }));
        if let Some(key) = seen_key(id, host) {
            seen.insert(key, slice.clone());
        }
        for (i, item) in items.iter().enumerate() {
            let value = ensure_sufficient_stack(|| self.internalize_with(item, elem, recv, seen))
                .clue(|| format!("internalizing element {i}"))?;
            cell.borrow_mut().push(value);
        }
        Ok(slice)
    }

    fn internalize_map(
        &self,
        host: &HostValue,
        id: DescId,
        key: DescId,
        elem: DescId,
        recv: Option<&HostValue>,
        seen: &mut Seen,
    ) -> Result<Value, FatalError> {
        let entries: Vec<(String, HostValue)> = match host {
            HostValue::Undefined | HostValue::Null => return Ok(Value::Map(None)),
            HostValue::Object(obj) => obj.entries(),
            HostValue::Array(arr) => arr
                .items()
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
            other => {
                return Err(bailout(ConversionError::UnexpectedHostValue {
                    host: other.type_of(),
                    ty: self.table.string(id),
                }))
            }
        };
        let map = Rc::new(RefCell::new(MapObject::new()));
        if let Some(key) = seen_key(id, host) {
            seen.insert(key, Value::Map(Some(Rc::clone(&map))));
        }
        for (prop, value) in entries {
            let k = self.internalize_with(&HostValue::string(&prop), key, recv, seen)?;
            let v = ensure_sufficient_stack(|| self.internalize_with(&value, elem, recv, seen))
                .clue(|| format!("internalizing map entry {prop:?}"))?;
            map.borrow_mut().insert(k, v)?;
        }
        Ok(Value::Map(Some(map)))
    }

    fn internalize_struct(
        &self,
        host: &HostValue,
        id: DescId,
        recv: Option<&HostValue>,
        seen: &mut Seen,
    ) -> Result<Value, FatalError> {
        if let Some(found) = self.search_handle_target(host, id)? {
            return Ok(found);
        }
        if host.is_nullish() {
            return Err(bailout(ConversionError::UnexpectedHostValue {
                host: host.type_of(),
                ty: self.table.string(id),
            }));
        }

        let value = self.table.zero(id)?;
        let obj = value.as_struct().ok_or_else(|| self.mismatch(id, "struct"))?.clone();
        if let Some(key) = seen_key(id, host) {
            seen.insert(key, value.clone());
        }
        let fields = self.table.struct_fields(id)?;
        for (i, field) in fields.iter().enumerate() {
            if !field.exported {
                continue;
            }
            let prop = host.get(&field.name);
            let converted =
                ensure_sufficient_stack(|| self.internalize_with(&prop, field.desc, recv, seen))
                    .clue(|| format!("internalizing field {}", field.name))?;
            if let Some(slot) = obj.borrow_mut().fields.get_mut(i) {
                *slot = converted;
            }
        }
        Ok(value)
    }

    /// Target-directed search for a host handle slot: if the first field
    /// chain of `id` ends in `*js.Object`, build that chain around `host`.
    fn search_handle_target(&self, host: &HostValue, id: DescId) -> Result<Option<Value>, FatalError> {
        let mut visiting = Vec::new();
        self.search_handle_target_in(host, id, &mut visiting)
    }

    fn search_handle_target_in(
        &self,
        host: &HostValue,
        id: DescId,
        visiting: &mut Vec<DescId>,
    ) -> Result<Option<Value>, FatalError> {
        if id == DescId::JS_OBJECT {
            return Ok(Some(Value::Host(host.clone())));
        }
        if id == DescId::JS_OBJECT_STRUCT {
            return Err(bailout(ConversionError::HandleByValue));
        }
        // A recursive first-field chain never reaches a handle.
        if visiting.contains(&id) {
            return Ok(None);
        }
        visiting.push(id);
        match &self.table.desc(id)?.kind {
            Kind::Ptr { elem } => {
                let inner = self.search_handle_target_in(host, *elem, visiting)?;
                Ok(inner.map(|inner| match inner {
                    Value::Struct(obj) => Value::Ptr(Some(Pointer::Struct(obj))),
                    other => Value::cell_ptr(other),
                }))
            }
            Kind::Struct { fields } => {
                let Some(first) = fields.first() else {
                    return Ok(None);
                };
                let Some(inner) = self.search_handle_target_in(host, first.desc, visiting)? else {
                    return Ok(None);
                };
                let value = self.table.zero(id)?;
                if let Some(obj) = value.as_struct() {
                    if let Some(slot) = obj.borrow_mut().fields.first_mut() {
                        *slot = inner;
                    }
                }
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    /// Conversion into the empty interface: the dynamic type is chosen by
    /// the host value's class.
    fn internalize_dynamic(
        &self,
        host: &HostValue,
        recv: Option<&HostValue>,
        seen: &mut Seen,
    ) -> Result<Value, FatalError> {
        let boxed =
            |desc: DescId, value: Value| -> Result<Value, FatalError> { Ok(Value::boxed(desc, value)) };
        match host {
            HostValue::Null => Ok(Value::nil_iface()),
            HostValue::Undefined => boxed(DescId::JS_OBJECT, Value::Host(HostValue::Undefined)),
            HostValue::Typed(view) => {
                let desc = match view.buffer.kind() {
                    NumKind::I8 => DescId::SLICE_INT8,
                    NumKind::I16 => DescId::SLICE_INT16,
                    NumKind::I32 => DescId::SLICE_INT,
                    NumKind::U8 => DescId::SLICE_UINT8,
                    NumKind::U16 => DescId::SLICE_UINT16,
                    NumKind::U32 => DescId::SLICE_UINT,
                    NumKind::F32 => DescId::SLICE_FLOAT32,
                    NumKind::F64 => DescId::SLICE_FLOAT64,
                };
                // Shares the host buffer.
                let slice = SliceValue {
                    store: Store::Numeric(view.buffer.clone()),
                    offset: view.offset,
                    len: view.len,
                };
                boxed(desc, Value::Slice(Some(slice)))
            }
            HostValue::Array(_) => {
                let slice = self.internalize_with(host, DescId::SLICE_EMPTY_INTERFACE, recv, seen)?;
                boxed(DescId::SLICE_EMPTY_INTERFACE, slice)
            }
            HostValue::Bool(b) => boxed(DescId::BOOL, Value::Bool(*b)),
            HostValue::Date(_) => match self.table.timestamp() {
                Some(ts) => boxed(ts, self.internalize_timestamp(host, ts)?),
                None => boxed(DescId::JS_OBJECT, Value::Host(host.clone())),
            },
            HostValue::Function(_) => {
                let func = self.internalize_with(host, DescId::FUNC_VARIADIC_JS, recv, seen)?;
                boxed(DescId::FUNC_VARIADIC_JS, func)
            }
            HostValue::Number(n) => boxed(DescId::FLOAT64, Value::Float(*n)),
            HostValue::Str(units) => boxed(DescId::STRING, Value::Str(utf16_to_utf8(units))),
            HostValue::Object(_) => {
                let map =
                    self.internalize_with(host, DescId::MAP_STRING_EMPTY_INTERFACE, recv, seen)?;
                boxed(DescId::MAP_STRING_EMPTY_INTERFACE, map)
            }
        }
    }

    /// A store of `elem` holding `values`.
    #[expect(
        clippy::cast_precision_loss,
        reason = "numeric stores hold at most 32-bit integers"
    )]
    pub(crate) fn store_from(&self, elem: DescId, values: Vec<Value>) -> Result<Store, FatalError> {
        let Some(kind) = self.table.desc(elem)?.kind.num_kind() else {
            return Ok(Store::boxed(values));
        };
        let numbers = values
            .iter()
            .map(|value| match value {
                Value::Int(n) => Ok(*n as f64),
                Value::Float(n) => Ok(*n),
                _ => Err(self.mismatch(elem, "number")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Store::Numeric(NumericBuffer::from_vec(kind, numbers)))
    }
}
