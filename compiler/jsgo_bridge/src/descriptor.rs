//! Runtime type descriptors.
//!
//! A descriptor is the runtime's view of a compiled type: its kind, its
//! components and its method set. Descriptors live in a
//! [`DescriptorTable`](crate::DescriptorTable) and refer to each other by
//! [`DescId`], which makes recursive types (`type Node struct { next *Node }`)
//! plain data.

use std::fmt;

/// Index of a descriptor in its table.
///
/// The well-known descriptors sit at fixed indices, so the bridge can refer
/// to `[]interface{}` or `*js.Object` without a lookup.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct DescId(u32);

impl DescId {
    pub const BOOL: DescId = DescId(0);
    pub const INT: DescId = DescId(1);
    pub const INT8: DescId = DescId(2);
    pub const INT16: DescId = DescId(3);
    pub const INT32: DescId = DescId(4);
    pub const INT64: DescId = DescId(5);
    pub const UINT: DescId = DescId(6);
    pub const UINT8: DescId = DescId(7);
    pub const UINT16: DescId = DescId(8);
    pub const UINT32: DescId = DescId(9);
    pub const UINT64: DescId = DescId(10);
    pub const UINTPTR: DescId = DescId(11);
    pub const FLOAT32: DescId = DescId(12);
    pub const FLOAT64: DescId = DescId(13);
    pub const COMPLEX64: DescId = DescId(14);
    pub const COMPLEX128: DescId = DescId(15);
    pub const STRING: DescId = DescId(16);
    pub const UNSAFE_POINTER: DescId = DescId(17);
    /// `interface{}`.
    pub const EMPTY_INTERFACE: DescId = DescId(18);
    /// The struct behind the host handle. Never a valid conversion target.
    pub const JS_OBJECT_STRUCT: DescId = DescId(19);
    /// `*js.Object`: the opaque host handle.
    pub const JS_OBJECT: DescId = DescId(20);
    pub const SLICE_INT8: DescId = DescId(21);
    pub const SLICE_INT16: DescId = DescId(22);
    pub const SLICE_INT: DescId = DescId(23);
    pub const SLICE_UINT8: DescId = DescId(24);
    pub const SLICE_UINT16: DescId = DescId(25);
    pub const SLICE_UINT: DescId = DescId(26);
    pub const SLICE_FLOAT32: DescId = DescId(27);
    pub const SLICE_FLOAT64: DescId = DescId(28);
    /// `[]interface{}`: target for host arrays held in an interface.
    pub const SLICE_EMPTY_INTERFACE: DescId = DescId(29);
    /// `map[string]interface{}`: target for plain host objects held in an
    /// interface.
    pub const MAP_STRING_EMPTY_INTERFACE: DescId = DescId(30);
    /// `func(...interface{}) *js.Object`: target for host functions held in
    /// an interface.
    pub const FUNC_VARIADIC_JS: DescId = DescId(31);

    /// First index handed out for program types.
    pub const FIRST_PROGRAM: u32 = 32;

    #[inline]
    pub(crate) const fn from_index(index: u32) -> Self {
        DescId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DescId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DescId({})", self.0)
    }
}

/// Element kind of a numeric backing buffer.
///
/// Sequences of these kinds are stored as host typed arrays, so a slice
/// can be handed to the host without copying.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NumKind {
    I8,
    I16,
    I32,
    U8,
    U16,
    U32,
    F32,
    F64,
}

impl NumKind {
    /// Bring `n` into the representable range of this element kind, the
    /// way a typed-array store does.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "elements wrap and round like host typed arrays"
    )]
    pub fn store(self, n: f64) -> f64 {
        match self {
            NumKind::F64 => n,
            NumKind::F32 => f64::from(n as f32),
            NumKind::I8 => f64::from(crate::numeric::to_int32(n) as i8),
            NumKind::I16 => f64::from(crate::numeric::to_int32(n) as i16),
            NumKind::I32 => f64::from(crate::numeric::to_int32(n)),
            NumKind::U8 => f64::from(crate::numeric::to_int32(n) as u8),
            NumKind::U16 => f64::from(crate::numeric::to_int32(n) as u16),
            NumKind::U32 => f64::from(crate::numeric::to_int32(n) as u32),
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, NumKind::F32 | NumKind::F64)
    }

    /// Host constructor name, e.g. `Int32Array`.
    pub fn host_class(self) -> &'static str {
        match self {
            NumKind::I8 => "Int8Array",
            NumKind::I16 => "Int16Array",
            NumKind::I32 => "Int32Array",
            NumKind::U8 => "Uint8Array",
            NumKind::U16 => "Uint16Array",
            NumKind::U32 => "Uint32Array",
            NumKind::F32 => "Float32Array",
            NumKind::F64 => "Float64Array",
        }
    }
}

/// Structure of a descriptor.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Kind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    Array { elem: DescId, len: usize },
    Slice { elem: DescId },
    Map { key: DescId, elem: DescId },
    Chan { elem: DescId },
    Ptr { elem: DescId },
    Func(FuncSig),
    Interface { methods: Vec<MethodSig> },
    Struct { fields: Vec<StructField> },
}

impl Kind {
    /// Integer kinds no wider than 32 bits, stored as wrapped `i64`.
    pub fn is_small_int(&self) -> bool {
        matches!(
            self,
            Kind::Int
                | Kind::Int8
                | Kind::Int16
                | Kind::Int32
                | Kind::Uint
                | Kind::Uint8
                | Kind::Uint16
                | Kind::Uint32
                | Kind::Uintptr
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Kind::Float32 | Kind::Float64)
    }

    /// Buffer element kind for sequences of this kind, if they are stored
    /// as typed arrays.
    pub fn num_kind(&self) -> Option<NumKind> {
        Some(match self {
            Kind::Int8 => NumKind::I8,
            Kind::Int16 => NumKind::I16,
            Kind::Int | Kind::Int32 => NumKind::I32,
            Kind::Uint8 => NumKind::U8,
            Kind::Uint16 => NumKind::U16,
            Kind::Uint | Kind::Uint32 | Kind::Uintptr => NumKind::U32,
            Kind::Float32 => NumKind::F32,
            Kind::Float64 => NumKind::F64,
            _ => return None,
        })
    }

    /// Whether values of this kind have a different representation on the
    /// host side. Sequences of kinds that don't are passed through as-is.
    pub fn needs_externalization(&self) -> bool {
        !(matches!(self, Kind::Bool) || self.num_kind().is_some())
    }

    /// Short label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Uintptr => "uintptr",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::Complex64 => "complex64",
            Kind::Complex128 => "complex128",
            Kind::String => "string",
            Kind::UnsafePointer => "unsafe.Pointer",
            Kind::Array { .. } => "array",
            Kind::Slice { .. } => "slice",
            Kind::Map { .. } => "map",
            Kind::Chan { .. } => "chan",
            Kind::Ptr { .. } => "ptr",
            Kind::Func(_) => "func",
            Kind::Interface { .. } => "interface",
            Kind::Struct { .. } => "struct",
        }
    }
}

/// Parameter and result lists of a function descriptor.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct FuncSig {
    pub params: Vec<DescId>,
    pub results: Vec<DescId>,
    /// The last parameter is a slice collecting trailing arguments.
    pub variadic: bool,
}

/// A struct field as the runtime sees it.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StructField {
    /// Declared name; also the host property name on conversion.
    pub name: String,
    /// Storage key inside the compiled struct object.
    pub prop: String,
    pub desc: DescId,
    pub embedded: bool,
    /// Only exported fields cross the host boundary.
    pub exported: bool,
}

impl StructField {
    /// A field whose storage key is its name and whose visibility follows
    /// the case of its first letter.
    pub fn new(name: impl Into<String>, desc: DescId) -> Self {
        let name = name.into();
        let exported = name.chars().next().is_some_and(char::is_uppercase);
        StructField {
            prop: name.clone(),
            name,
            desc,
            embedded: false,
            exported,
        }
    }

    #[must_use]
    pub fn with_prop(mut self, prop: impl Into<String>) -> Self {
        self.prop = prop.into();
        self
    }

    #[must_use]
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

/// An interface method or a method of a named type.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MethodSig {
    pub name: String,
    /// Package path for unexported names, empty otherwise.
    pub pkg: String,
    /// Descriptor of the signature, without receiver.
    pub sig: DescId,
}

impl MethodSig {
    pub fn new(name: impl Into<String>, sig: DescId) -> Self {
        MethodSig {
            name: name.into(),
            pkg: String::new(),
            sig,
        }
    }
}

/// A runtime type descriptor.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Descriptor {
    pub kind: Kind,
    /// Printable type, used in error messages.
    pub string: String,
    /// Declared with a name, as opposed to a type literal.
    pub named: bool,
    /// Method set of a named type, sorted by name.
    pub methods: Vec<MethodSig>,
}

impl Descriptor {
    pub fn new(kind: Kind, string: impl Into<String>) -> Self {
        Descriptor {
            kind,
            string: string.into(),
            named: false,
            methods: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(mut self) -> Self {
        self.named = true;
        self
    }

    #[must_use]
    pub fn with_methods(mut self, mut methods: Vec<MethodSig>) -> Self {
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        self.methods = methods;
        self
    }
}
