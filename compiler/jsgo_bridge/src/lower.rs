//! Lowering checked types to runtime descriptors.
//!
//! Every distinct type gets one descriptor; a named type's id is reserved
//! before its underlying type is lowered, so types that refer to
//! themselves through pointers, slices or maps lower without recursion.

use jsgo_diagnostic::{bailout, FatalError, ResultExt};
use jsgo_ir::{ObjectId, TypeId, Universe};
use jsgo_names::{is_reserved, HOST_PACKAGE_PATH};
use jsgo_stack::ensure_sufficient_stack;
use jsgo_types::{BasicKind, Method, TypeData, TypeFormatter, TypeInterner};
use rustc_hash::FxHashMap;

use crate::descriptor::{DescId, Descriptor, FuncSig, Kind, MethodSig, StructField};
use crate::error::ConversionError;
use crate::table::DescriptorTable;

pub struct DescriptorLowering<'a> {
    types: &'a TypeInterner,
    universe: &'a Universe,
    table: &'a mut DescriptorTable,
    memo: FxHashMap<TypeId, DescId>,
    timestamp: Option<ObjectId>,
}

impl<'a> DescriptorLowering<'a> {
    pub fn new(types: &'a TypeInterner, universe: &'a Universe, table: &'a mut DescriptorTable) -> Self {
        let mut memo = FxHashMap::default();
        for kind in BasicKind::ALL {
            if let Some(id) = basic_desc(kind) {
                memo.insert(kind.type_id(), id);
            }
        }
        memo.insert(TypeId::EMPTY_INTERFACE, DescId::EMPTY_INTERFACE);
        DescriptorLowering {
            types,
            universe,
            table,
            memo,
            timestamp: None,
        }
    }

    /// Treat the named type declared by `obj` as the timestamp type.
    #[must_use]
    pub fn with_timestamp(mut self, obj: ObjectId) -> Self {
        self.timestamp = Some(obj);
        self
    }

    /// Descriptor of `ty`, lowering it and its components on first use.
    pub fn lower(&mut self, ty: TypeId) -> Result<DescId, FatalError> {
        if let Some(&id) = self.memo.get(&ty) {
            return Ok(id);
        }
        ensure_sufficient_stack(|| self.lower_new(ty))
            .clue(|| format!("lowering {}", self.format(ty)))
    }

    fn lower_new(&mut self, ty: TypeId) -> Result<DescId, FatalError> {
        let data = self.types.lookup(ty);
        match data {
            TypeData::Named { obj, .. } if self.is_host_object(obj) => {
                self.memo.insert(ty, DescId::JS_OBJECT_STRUCT);
                return Ok(DescId::JS_OBJECT_STRUCT);
            }
            TypeData::Pointer(elem)
                if self
                    .types
                    .as_named(elem)
                    .is_some_and(|(obj, _)| self.is_host_object(obj)) =>
            {
                self.memo.insert(ty, DescId::JS_OBJECT);
                return Ok(DescId::JS_OBJECT);
            }
            _ => {}
        }

        let id = self.table.reserve();
        self.memo.insert(ty, id);
        let string = self.format(ty);

        let desc = if let TypeData::Named { obj, .. } = data {
            let underlying = self.types.underlying(ty);
            if underlying == ty {
                return Err(bailout(ConversionError::Unlowerable(string)));
            }
            let kind = self.lower_kind(underlying)?;
            let methods = self.lower_methods(&self.types.methods(ty))?;
            if self.timestamp == Some(obj) {
                self.table.set_timestamp(id);
            }
            Descriptor::new(kind, string).named().with_methods(methods)
        } else {
            Descriptor::new(self.lower_kind(ty)?, string)
        };
        tracing::trace!(?id, ty = %desc.string, "descriptor lowered");
        self.table.define(id, desc);
        Ok(id)
    }

    /// Kind of a type literal.
    fn lower_kind(&mut self, ty: TypeId) -> Result<Kind, FatalError> {
        Ok(match self.types.lookup(ty) {
            TypeData::Basic(kind) => basic_kind(kind)
                .ok_or_else(|| bailout(ConversionError::Unlowerable(self.format(ty))))?,
            TypeData::Array { elem, len } => Kind::Array {
                elem: self.lower(elem)?,
                len: usize::try_from(len)
                    .map_err(|_| bailout(ConversionError::Unlowerable(self.format(ty))))?,
            },
            TypeData::Slice(elem) => Kind::Slice {
                elem: self.lower(elem)?,
            },
            TypeData::Map { key, value } => Kind::Map {
                key: self.lower(key)?,
                elem: self.lower(value)?,
            },
            TypeData::Chan { elem, .. } => Kind::Chan {
                elem: self.lower(elem)?,
            },
            TypeData::Pointer(elem) => Kind::Ptr {
                elem: self.lower(elem)?,
            },
            TypeData::Signature {
                params,
                results,
                variadic,
                ..
            } => Kind::Func(FuncSig {
                params: self.lower_all(&params)?,
                results: self.lower_all(&results)?,
                variadic,
            }),
            TypeData::Struct(fields) => {
                let mut lowered = Vec::with_capacity(fields.len());
                for (index, field) in fields.iter().enumerate() {
                    let name = self.universe.lookup(field.name);
                    let mut out = StructField::new(name, self.lower(field.ty)?)
                        .with_prop(field_prop(name, index));
                    if field.embedded {
                        out = out.embedded();
                    }
                    lowered.push(out);
                }
                Kind::Struct { fields: lowered }
            }
            TypeData::Interface(methods) => Kind::Interface {
                methods: self.lower_methods(&methods)?,
            },
            TypeData::Named { .. } | TypeData::TypeParam { .. } | TypeData::Tuple(_) => {
                return Err(bailout(ConversionError::Unlowerable(self.format(ty))));
            }
        })
    }

    fn lower_all(&mut self, tys: &[TypeId]) -> Result<Vec<DescId>, FatalError> {
        tys.iter().map(|&ty| self.lower(ty)).collect()
    }

    fn lower_methods(&mut self, methods: &[Method]) -> Result<Vec<MethodSig>, FatalError> {
        let mut lowered = Vec::with_capacity(methods.len());
        for method in methods {
            let name = self.universe.lookup(method.name);
            lowered.push(MethodSig::new(name, self.lower(method.sig)?));
        }
        Ok(lowered)
    }

    fn is_host_object(&self, obj: ObjectId) -> bool {
        let object = self.universe.object(obj);
        self.universe.lookup(object.name) == "Object"
            && object
                .package
                .is_some_and(|pkg| self.universe.package(pkg).path == HOST_PACKAGE_PATH)
    }

    fn format(&self, ty: TypeId) -> String {
        TypeFormatter::new(self.types, self.universe).format(ty)
    }
}

/// Storage key of a struct field: its name, unless that is blank or a
/// reserved word.
fn field_prop(name: &str, index: usize) -> String {
    if name == "_" || is_reserved(name) {
        return format!("{name}${index}");
    }
    name.to_owned()
}

fn basic_desc(kind: BasicKind) -> Option<DescId> {
    Some(match kind {
        BasicKind::Bool => DescId::BOOL,
        BasicKind::Int => DescId::INT,
        BasicKind::Int8 => DescId::INT8,
        BasicKind::Int16 => DescId::INT16,
        BasicKind::Int32 => DescId::INT32,
        BasicKind::Int64 => DescId::INT64,
        BasicKind::Uint => DescId::UINT,
        BasicKind::Uint8 => DescId::UINT8,
        BasicKind::Uint16 => DescId::UINT16,
        BasicKind::Uint32 => DescId::UINT32,
        BasicKind::Uint64 => DescId::UINT64,
        BasicKind::Uintptr => DescId::UINTPTR,
        BasicKind::Float32 => DescId::FLOAT32,
        BasicKind::Float64 => DescId::FLOAT64,
        BasicKind::Complex64 => DescId::COMPLEX64,
        BasicKind::Complex128 => DescId::COMPLEX128,
        BasicKind::String => DescId::STRING,
        BasicKind::UnsafePointer => DescId::UNSAFE_POINTER,
        BasicKind::UntypedNil => return None,
    })
}

fn basic_kind(kind: BasicKind) -> Option<Kind> {
    Some(match kind {
        BasicKind::Bool => Kind::Bool,
        BasicKind::Int => Kind::Int,
        BasicKind::Int8 => Kind::Int8,
        BasicKind::Int16 => Kind::Int16,
        BasicKind::Int32 => Kind::Int32,
        BasicKind::Int64 => Kind::Int64,
        BasicKind::Uint => Kind::Uint,
        BasicKind::Uint8 => Kind::Uint8,
        BasicKind::Uint16 => Kind::Uint16,
        BasicKind::Uint32 => Kind::Uint32,
        BasicKind::Uint64 => Kind::Uint64,
        BasicKind::Uintptr => Kind::Uintptr,
        BasicKind::Float32 => Kind::Float32,
        BasicKind::Float64 => Kind::Float64,
        BasicKind::Complex64 => Kind::Complex64,
        BasicKind::Complex128 => Kind::Complex128,
        BasicKind::String => Kind::String,
        BasicKind::UnsafePointer => Kind::UnsafePointer,
        BasicKind::UntypedNil => return None,
    })
}
