//! Host values: what the surrounding environment sees.
//!
//! Objects, arrays and functions are reference types; identity is the
//! address of their shared allocation. Typed arrays are views over a
//! [`NumericBuffer`] that compiled slices may share.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use jsgo_diagnostic::FatalError;
use rustc_hash::FxHashMap;

use crate::descriptor::DescId;
use crate::value::{NumericBuffer, Value};

/// A value owned by the host environment.
#[derive(Clone)]
pub enum HostValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    /// UTF-16 code units; may contain lone surrogates.
    Str(Rc<[u16]>),
    Object(Rc<HostObject>),
    Array(Rc<HostArray>),
    Typed(TypedArray),
    /// A date, as milliseconds since the Unix epoch.
    Date(f64),
    Function(Rc<HostFunction>),
}

// Factory Methods

impl HostValue {
    #[inline]
    pub fn number(n: f64) -> Self {
        HostValue::Number(n)
    }

    /// A host string from Rust text.
    pub fn string(s: &str) -> Self {
        HostValue::Str(s.encode_utf16().collect())
    }

    pub fn object(props: impl IntoIterator<Item = (String, HostValue)>) -> Self {
        let object = HostObject::new();
        for (key, value) in props {
            object.set(&key, value);
        }
        HostValue::Object(Rc::new(object))
    }

    pub fn array(items: Vec<HostValue>) -> Self {
        HostValue::Array(Rc::new(HostArray::new(items)))
    }

    pub fn function(
        call: impl Fn(&HostValue, &[HostValue]) -> Result<HostValue, FatalError> + 'static,
    ) -> Self {
        HostValue::Function(Rc::new(HostFunction::new(call)))
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, HostValue::Undefined | HostValue::Null)
    }

    /// Identity of a reference value: the address of its allocation.
    pub fn identity(&self) -> Option<usize> {
        match self {
            HostValue::Object(obj) => Some(Rc::as_ptr(obj) as usize),
            HostValue::Array(arr) => Some(Rc::as_ptr(arr) as usize),
            HostValue::Function(func) => Some(Rc::as_ptr(func) as usize),
            HostValue::Typed(view) => Some(view.buffer.address() + view.offset),
            _ => None,
        }
    }

    /// Same primitive value or same reference.
    #[expect(clippy::float_cmp, reason = "host strict equality compares exactly")]
    pub fn strict_equals(&self, other: &HostValue) -> bool {
        match (self, other) {
            (HostValue::Undefined, HostValue::Undefined) | (HostValue::Null, HostValue::Null) => {
                true
            }
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
            (HostValue::Number(a), HostValue::Number(b)) => a == b,
            (HostValue::Str(a), HostValue::Str(b)) => a == b,
            (HostValue::Typed(a), HostValue::Typed(b)) => {
                a.buffer.address() == b.buffer.address() && a.offset == b.offset && a.len == b.len
            }
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Name of the host type, as `typeof` would report it.
    pub fn type_of(&self) -> &'static str {
        match self {
            HostValue::Undefined => "undefined",
            HostValue::Bool(_) => "boolean",
            HostValue::Number(_) => "number",
            HostValue::Str(_) => "string",
            HostValue::Function(_) => "function",
            HostValue::Null
            | HostValue::Object(_)
            | HostValue::Array(_)
            | HostValue::Typed(_)
            | HostValue::Date(_) => "object",
        }
    }

    /// Host truthiness.
    pub fn truthy(&self) -> bool {
        match self {
            HostValue::Undefined | HostValue::Null => false,
            HostValue::Bool(b) => *b,
            HostValue::Number(n) => *n != 0.0 && !n.is_nan(),
            HostValue::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Host string conversion, used for property keys and `String(v)`.
    pub fn to_display_string(&self) -> String {
        match self {
            HostValue::Undefined => "undefined".to_owned(),
            HostValue::Null => "null".to_owned(),
            HostValue::Bool(b) => b.to_string(),
            HostValue::Number(n) => number_to_string(*n),
            HostValue::Str(s) => String::from_utf16_lossy(s),
            HostValue::Array(arr) => arr
                .items()
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_display_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            HostValue::Typed(view) => view
                .to_vec()
                .into_iter()
                .map(number_to_string)
                .collect::<Vec<_>>()
                .join(","),
            HostValue::Object(_) => "[object Object]".to_owned(),
            HostValue::Date(ms) => format!("Date({})", number_to_string(*ms)),
            HostValue::Function(_) => "function () { [native code] }".to_owned(),
        }
    }

    /// Own property of an object, or `undefined`.
    pub fn get(&self, key: &str) -> HostValue {
        match self {
            HostValue::Object(obj) => obj.get(key).unwrap_or(HostValue::Undefined),
            HostValue::Array(arr) => key
                .parse::<usize>()
                .map_or(HostValue::Undefined, |index| arr.get(index)),
            _ => HostValue::Undefined,
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Undefined => f.write_str("undefined"),
            HostValue::Null => f.write_str("null"),
            HostValue::Bool(b) => write!(f, "{b}"),
            HostValue::Number(n) => f.write_str(&number_to_string(*n)),
            HostValue::Str(s) => write!(f, "{:?}", String::from_utf16_lossy(s)),
            HostValue::Object(obj) => {
                let mut map = f.debug_map();
                for (key, value) in obj.entries() {
                    map.entry(&key, &value);
                }
                map.finish()
            }
            HostValue::Array(arr) => f.debug_list().entries(arr.items().iter()).finish(),
            HostValue::Typed(view) => {
                write!(f, "{}{:?}", view.buffer.kind().host_class(), view.to_vec())
            }
            HostValue::Date(ms) => write!(f, "Date({ms})"),
            HostValue::Function(_) => f.write_str("function"),
        }
    }
}

/// Host number formatting: integral values print without a fraction.
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if n == 0.0 {
        return "0".to_owned();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{n:.0}");
    }
    n.to_string()
}

/// Back-reference from a host object to the compiled value it wraps.
#[derive(Clone, Debug)]
pub struct InternalRef {
    pub desc: DescId,
    pub value: Value,
}

#[derive(Default)]
struct Props {
    index: FxHashMap<String, usize>,
    entries: Vec<(String, HostValue)>,
}

/// A plain host object. Properties keep insertion order.
#[derive(Default)]
pub struct HostObject {
    props: RefCell<Props>,
    internal: RefCell<Option<InternalRef>>,
}

impl HostObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<HostValue> {
        let props = self.props.borrow();
        props
            .index
            .get(key)
            .map(|&idx| props.entries[idx].1.clone())
    }

    pub fn set(&self, key: &str, value: HostValue) {
        let mut props = self.props.borrow_mut();
        if let Some(&idx) = props.index.get(key) {
            props.entries[idx].1 = value;
            return;
        }
        let idx = props.entries.len();
        props.index.insert(key.to_owned(), idx);
        props.entries.push((key.to_owned(), value));
    }

    pub fn keys(&self) -> Vec<String> {
        self.props
            .borrow()
            .entries
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Snapshot of all properties.
    pub fn entries(&self) -> Vec<(String, HostValue)> {
        self.props.borrow().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.props.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The compiled value this object wraps, if it was made by a wrapper
    /// factory.
    pub fn internal(&self) -> Option<InternalRef> {
        self.internal.borrow().clone()
    }

    pub fn set_internal(&self, internal: InternalRef) {
        *self.internal.borrow_mut() = Some(internal);
    }
}

/// A host array.
pub struct HostArray {
    items: RefCell<Vec<HostValue>>,
}

impl HostArray {
    pub fn new(items: Vec<HostValue>) -> Self {
        HostArray {
            items: RefCell::new(items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Element `index`, or `undefined` past the end.
    pub fn get(&self, index: usize) -> HostValue {
        self.items
            .borrow()
            .get(index)
            .cloned()
            .unwrap_or(HostValue::Undefined)
    }

    pub fn push(&self, value: HostValue) {
        self.items.borrow_mut().push(value);
    }

    /// Snapshot of the elements.
    pub fn items(&self) -> Vec<HostValue> {
        self.items.borrow().clone()
    }
}

/// A typed-array view over a numeric buffer.
#[derive(Clone)]
pub struct TypedArray {
    pub buffer: NumericBuffer,
    pub offset: usize,
    pub len: usize,
}

impl TypedArray {
    /// A view over a whole buffer.
    pub fn whole(buffer: NumericBuffer) -> Self {
        let len = buffer.len();
        TypedArray {
            buffer,
            offset: 0,
            len,
        }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        (index < self.len).then(|| self.buffer.get(self.offset + index))
    }

    pub fn set(&self, index: usize, n: f64) {
        if index < self.len {
            self.buffer.set(self.offset + index, n);
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        (0..self.len)
            .map(|i| self.buffer.get(self.offset + i))
            .collect()
    }
}

type HostCall = dyn Fn(&HostValue, &[HostValue]) -> Result<HostValue, FatalError>;

/// A host function. Called with a receiver (`this`) and arguments.
pub struct HostFunction {
    call: Box<HostCall>,
}

impl HostFunction {
    pub fn new(
        call: impl Fn(&HostValue, &[HostValue]) -> Result<HostValue, FatalError> + 'static,
    ) -> Self {
        HostFunction {
            call: Box::new(call),
        }
    }

    pub fn call(&self, this: &HostValue, args: &[HostValue]) -> Result<HostValue, FatalError> {
        (self.call)(this, args)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
