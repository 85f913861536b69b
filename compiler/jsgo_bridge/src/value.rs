//! Compiled values: the runtime representation of program values.
//!
//! The shape of a [`Value`] follows its descriptor's kind, never the other
//! way round; a value carries no type of its own except inside an
//! interface ([`Boxed`]) or a struct object.
//!
//! # Sharing
//!
//! - A pointer to a struct *is* the struct object ([`Pointer::Struct`]),
//!   so taking the address of a struct and converting either yields the
//!   same object.
//! - Sequences of numeric kinds live in a [`NumericBuffer`] that host typed
//!   arrays can view without copying.
//! - Struct and array *values* are copied on assignment; see
//!   [`DescriptorTable::copy_if_required`](crate::DescriptorTable::copy_if_required).

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use jsgo_diagnostic::{bailout, FatalError};
use rustc_hash::FxHashMap;

use crate::descriptor::{DescId, NumKind};
use crate::error::ConversionError;
use crate::host::HostFunction;
use crate::host::HostValue;

/// A compiled value.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    /// Integer kinds up to 32 bits, already wrapped to their width.
    Int(i64),
    Float(f64),
    Complex(f64, f64),
    Int64(i64),
    Uint64(u64),
    /// UTF-8 bytes. Not necessarily valid UTF-8.
    Str(Rc<[u8]>),
    Array(Store),
    /// `None` is the nil slice.
    Slice(Option<SliceValue>),
    /// `None` is the nil map.
    Map(Option<MapRef>),
    Struct(StructRef),
    /// `None` is the nil pointer.
    Ptr(Option<Pointer>),
    /// `None` is the nil interface.
    Iface(Option<Rc<Boxed>>),
    /// `None` is the nil function.
    Func(Option<FuncRef>),
    Chan(Option<Rc<ChanObject>>),
    /// A host value held directly, as `*js.Object` values are.
    Host(HostValue),
}

// Factory Methods

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(n: f64) -> Self {
        Value::Float(n)
    }

    pub fn string(s: &str) -> Self {
        Value::Str(Rc::from(s.as_bytes()))
    }

    pub fn bytes(b: &[u8]) -> Self {
        Value::Str(Rc::from(b))
    }

    /// A struct object of descriptor `desc` with the given field values.
    pub fn new_struct(desc: DescId, fields: Vec<Value>) -> Self {
        Value::Struct(Rc::new(RefCell::new(StructObject { desc, fields })))
    }

    /// A pointer to a fresh struct object.
    pub fn struct_ptr(desc: DescId, fields: Vec<Value>) -> Self {
        Value::Ptr(Some(Pointer::Struct(Rc::new(RefCell::new(StructObject {
            desc,
            fields,
        })))))
    }

    /// A pointer to a fresh variable holding `value`.
    pub fn cell_ptr(value: Value) -> Self {
        Value::Ptr(Some(Pointer::Cell(Rc::new(RefCell::new(value)))))
    }

    /// A slice over all of `store`.
    pub fn slice(store: Store) -> Self {
        let len = store.len();
        Value::Slice(Some(SliceValue {
            store,
            offset: 0,
            len,
        }))
    }

    /// A slice of interface-typed or other boxed elements.
    pub fn boxed_slice(items: Vec<Value>) -> Self {
        Value::slice(Store::boxed(items))
    }

    /// An interface holding `value` with dynamic type `desc`.
    pub fn boxed(desc: DescId, value: Value) -> Self {
        Value::Iface(Some(Rc::new(Boxed { desc, value })))
    }

    pub fn map(map: MapObject) -> Self {
        Value::Map(Some(Rc::new(RefCell::new(map))))
    }

    pub fn func(func: CompiledFunc) -> Self {
        Value::Func(Some(Rc::new(func)))
    }

    /// The nil interface.
    #[inline]
    pub fn nil_iface() -> Self {
        Value::Iface(None)
    }
}

// Accessors

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) | Value::Int64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_uint64(&self) -> Option<u64> {
        match self {
            Value::Uint64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The struct object behind a struct value or a pointer to one.
    pub fn as_struct(&self) -> Option<&StructRef> {
        match self {
            Value::Struct(obj) | Value::Ptr(Some(Pointer::Struct(obj))) => Some(obj),
            _ => None,
        }
    }

    pub fn as_boxed(&self) -> Option<&Boxed> {
        match self {
            Value::Iface(Some(boxed)) => Some(boxed),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&SliceValue> {
        match self {
            Value::Slice(Some(slice)) => Some(slice),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(Some(map)) => Some(map),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncRef> {
        match self {
            Value::Func(Some(func)) => Some(func),
            _ => None,
        }
    }

    pub fn as_host(&self) -> Option<&HostValue> {
        match self {
            Value::Host(host) => Some(host),
            _ => None,
        }
    }

    /// Whether this is the nil value of a nilable kind.
    pub fn is_nil(&self) -> bool {
        matches!(
            self,
            Value::Slice(None)
                | Value::Map(None)
                | Value::Ptr(None)
                | Value::Iface(None)
                | Value::Func(None)
                | Value::Chan(None)
                | Value::Host(HostValue::Null)
        )
    }

    /// Identity of a reference value: the address of its allocation.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Struct(obj) | Value::Ptr(Some(Pointer::Struct(obj))) => {
                Some(Rc::as_ptr(obj) as usize)
            }
            Value::Ptr(Some(Pointer::Cell(cell))) => Some(Rc::as_ptr(cell) as usize),
            Value::Map(Some(map)) => Some(Rc::as_ptr(map) as usize),
            Value::Func(Some(func)) => Some(Rc::as_ptr(func) as usize),
            Value::Chan(Some(chan)) => Some(Rc::as_ptr(chan) as usize),
            Value::Slice(Some(slice)) => Some(slice.store.address() + slice.offset),
            Value::Array(store) => Some(store.address()),
            Value::Host(host) => host.identity(),
            _ => None,
        }
    }

    /// Short label of the variant, for mismatch errors.
    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex(..) => "complex",
            Value::Int64(_) => "int64",
            Value::Uint64(_) => "uint64",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Slice(_) => "slice",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
            Value::Ptr(_) => "pointer",
            Value::Iface(_) => "interface",
            Value::Func(_) => "func",
            Value::Chan(_) => "chan",
            Value::Host(_) => "host value",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) | Value::Int64(n) => write!(f, "{n}"),
            Value::Uint64(n) => write!(f, "{n}u"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::Complex(re, im) => write!(f, "({re:?}+{im:?}i)"),
            Value::Str(s) => write!(f, "{:?}", String::from_utf8_lossy(s)),
            Value::Array(store) => write!(f, "array{:?}", store.to_vec()),
            Value::Slice(None) => f.write_str("[]nil"),
            Value::Slice(Some(slice)) => write!(f, "slice{:?}", slice.to_vec()),
            Value::Map(None) => f.write_str("map(nil)"),
            Value::Map(Some(map)) => write!(f, "map(len {})", map.borrow().len()),
            // Struct graphs may be cyclic; print identity only.
            Value::Struct(obj) => write!(f, "struct@{:p}", Rc::as_ptr(obj)),
            Value::Ptr(None) | Value::Func(None) | Value::Chan(None) => f.write_str("nil"),
            Value::Ptr(Some(Pointer::Struct(obj))) => write!(f, "&struct@{:p}", Rc::as_ptr(obj)),
            Value::Ptr(Some(Pointer::Cell(cell))) => write!(f, "&cell@{:p}", Rc::as_ptr(cell)),
            Value::Iface(None) => f.write_str("iface(nil)"),
            Value::Iface(Some(boxed)) => write!(f, "iface({:?}, {:?})", boxed.desc, boxed.value),
            Value::Func(Some(func)) => write!(f, "func@{:p}", Rc::as_ptr(func)),
            Value::Chan(Some(chan)) => write!(f, "chan@{:p}", Rc::as_ptr(chan)),
            Value::Host(host) => write!(f, "host({host:?})"),
        }
    }
}

/// A numeric backing buffer, shared by compiled sequences and host typed
/// arrays. Elements are stored as `f64` and normalized to the buffer's
/// element kind on every write.
#[derive(Clone)]
pub struct NumericBuffer {
    kind: NumKind,
    data: Rc<RefCell<Vec<f64>>>,
}

impl NumericBuffer {
    /// A zero-filled buffer.
    pub fn zeroed(kind: NumKind, len: usize) -> Self {
        NumericBuffer {
            kind,
            data: Rc::new(RefCell::new(vec![0.0; len])),
        }
    }

    pub fn from_vec(kind: NumKind, mut data: Vec<f64>) -> Self {
        for n in &mut data {
            *n = kind.store(*n);
        }
        NumericBuffer {
            kind,
            data: Rc::new(RefCell::new(data)),
        }
    }

    pub fn kind(&self) -> NumKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }

    /// Element `index`; zero past the end.
    pub fn get(&self, index: usize) -> f64 {
        self.data.borrow().get(index).copied().unwrap_or(0.0)
    }

    pub fn set(&self, index: usize, n: f64) {
        if let Some(slot) = self.data.borrow_mut().get_mut(index) {
            *slot = self.kind.store(n);
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.borrow().clone()
    }

    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.data) as usize
    }

    pub fn ptr_eq(&self, other: &NumericBuffer) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// An independent buffer with the same contents.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        NumericBuffer {
            kind: self.kind,
            data: Rc::new(RefCell::new(self.to_vec())),
        }
    }

    /// Element `index` as a compiled value.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "integer buffers only hold values of their element width"
    )]
    pub fn value_at(&self, index: usize) -> Value {
        let n = self.get(index);
        if self.kind.is_float() {
            Value::Float(n)
        } else {
            Value::Int(n as i64)
        }
    }
}

/// Backing storage of an array or slice.
#[derive(Clone)]
pub enum Store {
    Numeric(NumericBuffer),
    Boxed(Rc<RefCell<Vec<Value>>>),
}

impl Store {
    pub fn boxed(items: Vec<Value>) -> Self {
        Store::Boxed(Rc::new(RefCell::new(items)))
    }

    pub fn len(&self) -> usize {
        match self {
            Store::Numeric(buf) => buf.len(),
            Store::Boxed(items) => items.borrow().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Store::Numeric(buf) => (index < buf.len()).then(|| buf.value_at(index)),
            Store::Boxed(items) => items.borrow().get(index).cloned(),
        }
    }

    /// Overwrite element `index`. Numeric stores take `Int` and `Float`.
    #[expect(
        clippy::cast_precision_loss,
        reason = "numeric stores hold at most 32-bit integers"
    )]
    pub fn set(&self, index: usize, value: Value) {
        match self {
            Store::Numeric(buf) => match value {
                Value::Int(n) => buf.set(index, n as f64),
                Value::Float(n) => buf.set(index, n),
                _ => {}
            },
            Store::Boxed(items) => {
                if let Some(slot) = items.borrow_mut().get_mut(index) {
                    *slot = value;
                }
            }
        }
    }

    pub fn to_vec(&self) -> Vec<Value> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }

    pub fn address(&self) -> usize {
        match self {
            Store::Numeric(buf) => buf.address(),
            Store::Boxed(items) => Rc::as_ptr(items) as usize,
        }
    }
}

/// A non-nil slice: a window onto a store.
#[derive(Clone)]
pub struct SliceValue {
    pub store: Store,
    pub offset: usize,
    pub len: usize,
}

impl SliceValue {
    pub fn get(&self, index: usize) -> Option<Value> {
        if index >= self.len {
            return None;
        }
        self.store.get(self.offset + index)
    }

    pub fn set(&self, index: usize, value: Value) {
        if index < self.len {
            self.store.set(self.offset + index, value);
        }
    }

    pub fn to_vec(&self) -> Vec<Value> {
        (0..self.len).filter_map(|i| self.get(i)).collect()
    }

    /// The window as its own slice, sharing the store.
    #[must_use]
    pub fn sub(&self, from: usize, to: usize) -> SliceValue {
        let to = to.min(self.len);
        let from = from.min(to);
        SliceValue {
            store: self.store.clone(),
            offset: self.offset + from,
            len: to - from,
        }
    }
}

/// A struct object: field values in declaration order.
pub struct StructObject {
    pub desc: DescId,
    pub fields: Vec<Value>,
}

pub type StructRef = Rc<RefCell<StructObject>>;

/// A non-nil pointer.
#[derive(Clone)]
pub enum Pointer {
    /// Points to a struct: the struct object itself.
    Struct(StructRef),
    /// Points to a variable of any other type.
    Cell(Rc<RefCell<Value>>),
}

impl Pointer {
    /// The pointed-to value. For a struct, the struct object itself.
    pub fn load(&self) -> Value {
        match self {
            Pointer::Struct(obj) => Value::Struct(Rc::clone(obj)),
            Pointer::Cell(cell) => cell.borrow().clone(),
        }
    }

    pub fn store(&self, value: Value) {
        match self {
            Pointer::Struct(obj) => {
                if let Value::Struct(src) = value {
                    let fields = src.borrow().fields.clone();
                    obj.borrow_mut().fields = fields;
                }
            }
            Pointer::Cell(cell) => *cell.borrow_mut() = value,
        }
    }
}

/// An interface value: a dynamic type and its value.
#[derive(Debug)]
pub struct Boxed {
    pub desc: DescId,
    pub value: Value,
}

/// A channel. Channels never cross the host boundary; only their identity
/// and element type exist at this level.
#[derive(Debug)]
pub struct ChanObject {
    pub elem: DescId,
}

/// Key of a compiled map entry, derived from a comparable value.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    Uint(u64),
    /// Bit pattern, with negative zero folded into zero.
    Float(u64),
    Complex(u64, u64),
    Str(Rc<[u8]>),
    /// Reference identity.
    Addr(usize),
    HostStr(Rc<[u16]>),
    Nil,
    /// Interface key: dynamic type and inner key.
    Iface(DescId, Box<MapKey>),
    /// Struct or array key, element-wise.
    Seq(Vec<MapKey>),
}

impl MapKey {
    /// Key of a comparable value. Slices, maps and functions are not
    /// comparable and fail.
    pub fn of(value: &Value) -> Result<MapKey, FatalError> {
        Ok(match value {
            Value::Bool(b) => MapKey::Bool(*b),
            Value::Int(n) | Value::Int64(n) => MapKey::Int(*n),
            Value::Uint64(n) => MapKey::Uint(*n),
            Value::Float(n) => MapKey::Float(float_bits(*n)),
            Value::Complex(re, im) => MapKey::Complex(float_bits(*re), float_bits(*im)),
            Value::Str(s) => MapKey::Str(Rc::clone(s)),
            Value::Array(store) => MapKey::Seq(
                store
                    .to_vec()
                    .iter()
                    .map(MapKey::of)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Struct(obj) => MapKey::Seq(
                obj.borrow()
                    .fields
                    .iter()
                    .map(MapKey::of)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Iface(None) => MapKey::Nil,
            Value::Iface(Some(boxed)) => {
                MapKey::Iface(boxed.desc, Box::new(MapKey::of(&boxed.value)?))
            }
            Value::Ptr(None) | Value::Chan(None) => MapKey::Nil,
            Value::Ptr(Some(_)) | Value::Chan(Some(_)) => {
                MapKey::Addr(value.identity().unwrap_or_default())
            }
            Value::Host(host) => match host {
                HostValue::Undefined | HostValue::Null => MapKey::Nil,
                HostValue::Bool(b) => MapKey::Bool(*b),
                HostValue::Number(n) => MapKey::Float(float_bits(*n)),
                HostValue::Str(s) => MapKey::HostStr(Rc::clone(s)),
                HostValue::Date(ms) => MapKey::Float(float_bits(*ms)),
                other => MapKey::Addr(other.identity().unwrap_or_default()),
            },
            Value::Slice(_) | Value::Map(_) | Value::Func(_) => {
                return Err(bailout(ConversionError::UnhashableKey(
                    value.shape().to_owned(),
                )));
            }
        })
    }
}

fn float_bits(n: f64) -> u64 {
    if n == 0.0 {
        0
    } else {
        n.to_bits()
    }
}

/// A compiled map. Entries keep insertion order.
#[derive(Default)]
pub struct MapObject {
    index: FxHashMap<MapKey, usize>,
    entries: Vec<(Value, Value)>,
}

pub type MapRef = Rc<RefCell<MapObject>>;

impl MapObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), FatalError> {
        let map_key = MapKey::of(&key)?;
        if let Some(&idx) = self.index.get(&map_key) {
            self.entries[idx].1 = value;
            return Ok(());
        }
        self.index.insert(map_key, self.entries.len());
        self.entries.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &Value) -> Result<Option<Value>, FatalError> {
        let map_key = MapKey::of(key)?;
        Ok(self
            .index
            .get(&map_key)
            .map(|&idx| self.entries[idx].1.clone()))
    }

    pub fn remove(&mut self, key: &Value) -> Result<Option<Value>, FatalError> {
        let map_key = MapKey::of(key)?;
        let Some(idx) = self.index.remove(&map_key) else {
            return Ok(None);
        };
        let (_, value) = self.entries.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Ok(Some(value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }
}

type FuncBody = dyn Fn(&[Value]) -> Result<Vec<Value>, FatalError>;

/// A compiled function.
///
/// Calls take the parameters in order (a variadic tail arrives as one
/// slice) and return every result.
pub struct CompiledFunc {
    body: Box<FuncBody>,
    /// The host wrapper handed out for this function, while it lives.
    pub(crate) host_wrapper: RefCell<Weak<HostFunction>>,
}

pub type FuncRef = Rc<CompiledFunc>;

impl CompiledFunc {
    pub fn new(body: impl Fn(&[Value]) -> Result<Vec<Value>, FatalError> + 'static) -> Self {
        CompiledFunc {
            body: Box::new(body),
            host_wrapper: RefCell::new(Weak::new()),
        }
    }

    pub fn call(&self, args: &[Value]) -> Result<Vec<Value>, FatalError> {
        (self.body)(args)
    }
}

impl fmt::Debug for CompiledFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFunc")
            .field("wrapped", &(self.host_wrapper.borrow().strong_count() > 0))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
