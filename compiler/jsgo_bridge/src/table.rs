//! The descriptor table.
//!
//! Built once, before any conversion runs, and read-only afterwards. Slots
//! below [`DescId::FIRST_PROGRAM`] hold the well-known descriptors the
//! bridge itself refers to; program types follow.
//!
//! Recursive program types are registered in two steps: [`reserve`] an id,
//! build the components (which may mention that id), then [`define`] it.
//!
//! [`reserve`]: DescriptorTable::reserve
//! [`define`]: DescriptorTable::define

use std::cell::RefCell;
use std::rc::Rc;

use jsgo_diagnostic::{bailout, FatalError};
use jsgo_stack::ensure_sufficient_stack;

use crate::descriptor::{DescId, Descriptor, FuncSig, Kind, StructField};
use crate::error::ConversionError;
use crate::host::HostValue;
use crate::value::{NumericBuffer, Store, StructObject, Value};

#[derive(Debug)]
pub struct DescriptorTable {
    descs: Vec<Option<Descriptor>>,
    timestamp: Option<DescId>,
}

impl DescriptorTable {
    /// A table holding only the well-known descriptors.
    pub fn new() -> Self {
        let mut table = DescriptorTable {
            descs: Vec::with_capacity(64),
            timestamp: None,
        };
        table.install_well_known();
        table
    }

    fn install_well_known(&mut self) {
        let basics = [
            (Kind::Bool, "bool"),
            (Kind::Int, "int"),
            (Kind::Int8, "int8"),
            (Kind::Int16, "int16"),
            (Kind::Int32, "int32"),
            (Kind::Int64, "int64"),
            (Kind::Uint, "uint"),
            (Kind::Uint8, "uint8"),
            (Kind::Uint16, "uint16"),
            (Kind::Uint32, "uint32"),
            (Kind::Uint64, "uint64"),
            (Kind::Uintptr, "uintptr"),
            (Kind::Float32, "float32"),
            (Kind::Float64, "float64"),
            (Kind::Complex64, "complex64"),
            (Kind::Complex128, "complex128"),
            (Kind::String, "string"),
            (Kind::UnsafePointer, "unsafe.Pointer"),
        ];
        for (kind, name) in basics {
            self.add(Descriptor::new(kind, name).named());
        }
        self.add(Descriptor::new(
            Kind::Interface {
                methods: Vec::new(),
            },
            "interface {}",
        ));
        self.add(
            Descriptor::new(
                Kind::Struct {
                    fields: vec![StructField::new("object", DescId::JS_OBJECT)],
                },
                "js.Object",
            )
            .named(),
        );
        self.add(Descriptor::new(
            Kind::Ptr {
                elem: DescId::JS_OBJECT_STRUCT,
            },
            "*js.Object",
        ));
        for elem in [
            DescId::INT8,
            DescId::INT16,
            DescId::INT,
            DescId::UINT8,
            DescId::UINT16,
            DescId::UINT,
            DescId::FLOAT32,
            DescId::FLOAT64,
            DescId::EMPTY_INTERFACE,
        ] {
            let string = format!("[]{}", self.string(elem));
            self.add(Descriptor::new(Kind::Slice { elem }, string));
        }
        self.add(Descriptor::new(
            Kind::Map {
                key: DescId::STRING,
                elem: DescId::EMPTY_INTERFACE,
            },
            "map[string]interface {}",
        ));
        self.add(Descriptor::new(
            Kind::Func(FuncSig {
                params: vec![DescId::SLICE_EMPTY_INTERFACE],
                results: vec![DescId::JS_OBJECT],
                variadic: true,
            }),
            "func(...interface {}) *js.Object",
        ));
        debug_assert_eq!(self.descs.len(), DescId::FIRST_PROGRAM as usize);
    }

    /// Register a fully built descriptor.
    pub fn add(&mut self, desc: Descriptor) -> DescId {
        let id = self.reserve();
        self.descs[id.index()] = Some(desc);
        id
    }

    /// Allocate an id to be defined later.
    pub fn reserve(&mut self) -> DescId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "descriptor count is bounded by the program's types"
        )]
        let id = DescId::from_index(self.descs.len() as u32);
        self.descs.push(None);
        id
    }

    /// Fill a reserved id.
    pub fn define(&mut self, id: DescId, desc: Descriptor) {
        if let Some(slot) = self.descs.get_mut(id.index()) {
            *slot = Some(desc);
        }
    }

    pub fn get(&self, id: DescId) -> Option<&Descriptor> {
        self.descs.get(id.index()).and_then(Option::as_ref)
    }

    /// The descriptor at `id`; fatal if none was defined there.
    pub fn desc(&self, id: DescId) -> Result<&Descriptor, FatalError> {
        self.get(id)
            .ok_or_else(|| bailout(ConversionError::UnknownDescriptor(id.index())))
    }

    pub fn len(&self) -> usize {
        self.descs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descs.is_empty()
    }

    /// Printable type of `id`, for messages.
    pub fn string(&self, id: DescId) -> String {
        self.get(id)
            .map_or_else(|| format!("{id:?}"), |desc| desc.string.clone())
    }

    /// Enable the timestamp mapping: `id` must be a struct whose first field
    /// is an `int64` of nanoseconds since the Unix epoch. Values of it cross
    /// the boundary as host dates.
    pub fn set_timestamp(&mut self, id: DescId) {
        self.timestamp = Some(id);
    }

    /// Register a minimal timestamp struct and enable the mapping for it.
    pub fn register_timestamp(&mut self) -> DescId {
        let id = self.add(
            Descriptor::new(
                Kind::Struct {
                    fields: vec![StructField::new("unixNano", DescId::INT64)],
                },
                "time.Time",
            )
            .named(),
        );
        self.set_timestamp(id);
        id
    }

    pub fn timestamp(&self) -> Option<DescId> {
        self.timestamp
    }

    pub fn needs_externalization(&self, id: DescId) -> bool {
        self.get(id)
            .map_or(true, |desc| desc.kind.needs_externalization())
    }

    /// Whether `desc` has every method of interface `iface`. A pointer type
    /// also has the methods of its element.
    pub fn implements(&self, desc: DescId, iface: DescId) -> bool {
        let Some(Kind::Interface { methods }) = self.get(iface).map(|d| &d.kind) else {
            return false;
        };
        let Some(concrete) = self.get(desc) else {
            return false;
        };
        let elem_methods = match concrete.kind {
            Kind::Ptr { elem } => self.get(elem).map(|d| d.methods.as_slice()),
            _ => None,
        };
        methods.iter().all(|wanted| {
            concrete
                .methods
                .iter()
                .chain(elem_methods.unwrap_or_default())
                .any(|have| have.name == wanted.name && have.pkg == wanted.pkg && have.sig == wanted.sig)
        })
    }

    /// The zero value of `id`.
    pub fn zero(&self, id: DescId) -> Result<Value, FatalError> {
        if id == DescId::JS_OBJECT {
            return Ok(Value::Host(HostValue::Null));
        }
        let desc = self.desc(id)?;
        Ok(match &desc.kind {
            Kind::Bool => Value::Bool(false),
            Kind::Int
            | Kind::Int8
            | Kind::Int16
            | Kind::Int32
            | Kind::Uint
            | Kind::Uint8
            | Kind::Uint16
            | Kind::Uint32
            | Kind::Uintptr
            | Kind::UnsafePointer => Value::Int(0),
            Kind::Int64 => Value::Int64(0),
            Kind::Uint64 => Value::Uint64(0),
            Kind::Float32 | Kind::Float64 => Value::Float(0.0),
            Kind::Complex64 | Kind::Complex128 => Value::Complex(0.0, 0.0),
            Kind::String => Value::string(""),
            Kind::Array { elem, len } => Value::Array(self.zero_store(*elem, *len)?),
            Kind::Slice { .. } => Value::Slice(None),
            Kind::Map { .. } => Value::Map(None),
            Kind::Chan { .. } => Value::Chan(None),
            Kind::Ptr { .. } => Value::Ptr(None),
            Kind::Func(_) => Value::Func(None),
            Kind::Interface { .. } => Value::Iface(None),
            Kind::Struct { fields } => {
                let fields = fields
                    .iter()
                    .map(|field| ensure_sufficient_stack(|| self.zero(field.desc)))
                    .collect::<Result<Vec<_>, _>>()?;
                Value::new_struct(id, fields)
            }
        })
    }

    /// A backing store of `len` zero elements of `elem`.
    pub fn zero_store(&self, elem: DescId, len: usize) -> Result<Store, FatalError> {
        if let Some(kind) = self.desc(elem)?.kind.num_kind() {
            return Ok(Store::Numeric(NumericBuffer::zeroed(kind, len)));
        }
        let items = (0..len)
            .map(|_| ensure_sufficient_stack(|| self.zero(elem)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Store::boxed(items))
    }

    /// Copy value types (structs and arrays) so the result shares no state
    /// with `value`. Everything else is returned as is.
    pub fn copy_if_required(&self, value: &Value, id: DescId) -> Result<Value, FatalError> {
        let desc = self.desc(id)?;
        match (&desc.kind, value) {
            (Kind::Struct { fields }, Value::Struct(obj)) => {
                let src = obj.borrow();
                let copied = fields
                    .iter()
                    .zip(&src.fields)
                    .map(|(field, value)| {
                        ensure_sufficient_stack(|| self.copy_if_required(value, field.desc))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Struct(Rc::new(RefCell::new(StructObject {
                    desc: src.desc,
                    fields: copied,
                }))))
            }
            (Kind::Array { elem, .. }, Value::Array(store)) => Ok(Value::Array(match store {
                Store::Numeric(buf) => Store::Numeric(buf.deep_copy()),
                Store::Boxed(_) => Store::boxed(
                    store
                        .to_vec()
                        .iter()
                        .map(|item| ensure_sufficient_stack(|| self.copy_if_required(item, *elem)))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
            })),
            _ => Ok(value.clone()),
        }
    }

    /// Fields of struct descriptor `id`; fatal for any other kind.
    pub fn struct_fields(&self, id: DescId) -> Result<&[StructField], FatalError> {
        match &self.desc(id)?.kind {
            Kind::Struct { fields } => Ok(fields),
            _ => Err(bailout(ConversionError::ValueMismatch {
                ty: self.string(id),
                expected: "struct descriptor",
            })),
        }
    }

    /// The struct a pointer descriptor points to, if any.
    pub(crate) fn pointee_struct(&self, id: DescId) -> Option<DescId> {
        match self.get(id)?.kind {
            Kind::Ptr { elem } if matches!(self.get(elem)?.kind, Kind::Struct { .. }) => Some(elem),
            _ => None,
        }
    }
}

impl Default for DescriptorTable {
    fn default() -> Self {
        Self::new()
    }
}
