//! Type data stored in the interner.

use jsgo_ir::{Name, ObjectId, TypeId};
use smallvec::SmallVec;

/// Ordered type-argument list. Most instantiations have one or two.
pub type TypeList = SmallVec<[TypeId; 4]>;

/// Predeclared basic types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BasicKind {
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
    UntypedNil,
}

impl BasicKind {
    pub const ALL: [BasicKind; 19] = [
        BasicKind::Bool,
        BasicKind::Int,
        BasicKind::Int8,
        BasicKind::Int16,
        BasicKind::Int32,
        BasicKind::Int64,
        BasicKind::Uint,
        BasicKind::Uint8,
        BasicKind::Uint16,
        BasicKind::Uint32,
        BasicKind::Uint64,
        BasicKind::Uintptr,
        BasicKind::Float32,
        BasicKind::Float64,
        BasicKind::Complex64,
        BasicKind::Complex128,
        BasicKind::String,
        BasicKind::UnsafePointer,
        BasicKind::UntypedNil,
    ];

    /// The pre-interned id for this kind.
    pub const fn type_id(self) -> TypeId {
        match self {
            BasicKind::Bool => TypeId::BOOL,
            BasicKind::Int => TypeId::INT,
            BasicKind::Int8 => TypeId::INT8,
            BasicKind::Int16 => TypeId::INT16,
            BasicKind::Int32 => TypeId::INT32,
            BasicKind::Int64 => TypeId::INT64,
            BasicKind::Uint => TypeId::UINT,
            BasicKind::Uint8 => TypeId::UINT8,
            BasicKind::Uint16 => TypeId::UINT16,
            BasicKind::Uint32 => TypeId::UINT32,
            BasicKind::Uint64 => TypeId::UINT64,
            BasicKind::Uintptr => TypeId::UINTPTR,
            BasicKind::Float32 => TypeId::FLOAT32,
            BasicKind::Float64 => TypeId::FLOAT64,
            BasicKind::Complex64 => TypeId::COMPLEX64,
            BasicKind::Complex128 => TypeId::COMPLEX128,
            BasicKind::String => TypeId::STRING,
            BasicKind::UnsafePointer => TypeId::UNSAFE_POINTER,
            BasicKind::UntypedNil => TypeId::UNTYPED_NIL,
        }
    }

    /// Source spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::UntypedNil => "untyped nil",
        }
    }

    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            BasicKind::Int
                | BasicKind::Int8
                | BasicKind::Int16
                | BasicKind::Int32
                | BasicKind::Int64
                | BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
        )
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, BasicKind::Float32 | BasicKind::Float64)
    }

    pub const fn is_complex(self) -> bool {
        matches!(self, BasicKind::Complex64 | BasicKind::Complex128)
    }

    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float() || self.is_complex()
    }

    /// 64-bit integers need a two-word representation on the host.
    pub const fn is_64bit(self) -> bool {
        matches!(self, BasicKind::Int64 | BasicKind::Uint64)
    }
}

/// Channel direction.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// A struct field.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Field {
    pub name: Name,
    pub ty: TypeId,
    pub embedded: bool,
    /// Raw struct tag; `Name::EMPTY` when absent.
    pub tag: Name,
}

impl Field {
    pub fn new(name: Name, ty: TypeId) -> Self {
        Field {
            name,
            ty,
            embedded: false,
            tag: Name::EMPTY,
        }
    }

    #[must_use]
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: Name) -> Self {
        self.tag = tag;
        self
    }
}

/// An interface method or a named type's method.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Method {
    pub name: Name,
    /// A `TypeData::Signature` without receiver.
    pub sig: TypeId,
}

/// Structural type data.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    Basic(BasicKind),
    Array {
        elem: TypeId,
        len: u64,
    },
    Slice(TypeId),
    Map {
        key: TypeId,
        value: TypeId,
    },
    Chan {
        elem: TypeId,
        dir: ChanDir,
    },
    Pointer(TypeId),
    Signature {
        params: Vec<TypeId>,
        results: Vec<TypeId>,
        /// The last parameter is a slice collecting trailing arguments.
        variadic: bool,
        recv: Option<TypeId>,
    },
    Struct(Vec<Field>),
    /// Methods in canonical (interned name) order.
    Interface(Vec<Method>),
    /// A declared type, possibly instantiated.
    Named {
        obj: ObjectId,
        args: TypeList,
    },
    TypeParam {
        owner: ObjectId,
        index: u32,
        name: Name,
    },
    Tuple(Vec<TypeId>),
}

impl TypeData {
    pub fn is_named(&self) -> bool {
        matches!(self, TypeData::Named { .. })
    }

    /// Short kind label used for anonymous type declarations.
    pub fn kind_label(&self) -> &'static str {
        match self {
            TypeData::Basic(_) => "basic",
            TypeData::Array { .. } => "array",
            TypeData::Slice(_) => "slice",
            TypeData::Map { .. } => "map",
            TypeData::Chan { .. } => "chan",
            TypeData::Pointer(_) => "ptr",
            TypeData::Signature { .. } => "func",
            TypeData::Struct(_) => "struct",
            TypeData::Interface(_) => "interface",
            TypeData::Named { .. } => "named",
            TypeData::TypeParam { .. } => "typeParam",
            TypeData::Tuple(_) => "tuple",
        }
    }
}
