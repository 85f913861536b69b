//! Value marshaling between compiled code and the host runtime.
//!
//! Compiled values carry their static type as a [`DescId`] into a shared
//! [`DescriptorTable`]. [`Bridge::externalize`] turns a compiled value into
//! the [`HostValue`] the host sees; [`Bridge::internalize`] does the
//! reverse, driven by the target type.
//!
//! # Conversions
//!
//! - Numbers pass through; integers of 32 bits or less wrap on the way in
//!   like the host's typed arrays, 64-bit integers flatten on the way out.
//! - Strings re-encode between UTF-8 and UTF-16. Invalid sequences become
//!   U+FFFD.
//! - Slices and arrays of numbers share their buffer with a host typed
//!   array; other element types are converted one by one.
//! - Structs convert to objects holding their exported fields, unless a
//!   first field (transitively) holds a host handle, in which case they
//!   convert to that handle.
//! - Functions convert to wrappers that convert their arguments and
//!   results; the same function always gets the same wrapper.
//!
//! A failed conversion is a [`FatalError`](jsgo_diagnostic::FatalError)
//! whose cause is a [`ConversionError`].
//!
//! Host values are reference-counted and single-threaded, like the runtime
//! they stand for.

use std::rc::Rc;

mod descriptor;
mod error;
mod externalize;
mod func;
mod host;
mod internalize;
mod lower;
mod numeric;
mod strings;
mod table;
mod value;
mod wrapper;

#[cfg(test)]
mod test_fixture;

pub use descriptor::{DescId, Descriptor, FuncSig, Kind, MethodSig, NumKind, StructField};
pub use error::ConversionError;
pub use host::{HostArray, HostFunction, HostObject, HostValue, InternalRef, TypedArray};
pub use lower::DescriptorLowering;
pub use numeric::{parse_float, parse_int, to_int32, to_int64, to_number, to_uint64, wrap_int};
pub use strings::{utf16_to_utf8, utf8_to_utf16};
pub use table::DescriptorTable;
pub use value::{
    Boxed, ChanObject, CompiledFunc, FuncRef, MapKey, MapObject, MapRef, NumericBuffer, Pointer,
    SliceValue, Store, StructObject, StructRef, Value,
};
pub use wrapper::{InternalRefWrapper, Wrapper, WrapperFactory};

/// Converts values across the host boundary.
///
/// Cheap to clone: function wrappers keep a clone so they can convert
/// arguments when the host calls them.
#[derive(Clone, Debug)]
pub struct Bridge {
    table: Rc<DescriptorTable>,
}

impl Bridge {
    pub fn new(table: DescriptorTable) -> Self {
        Bridge {
            table: Rc::new(table),
        }
    }

    #[inline]
    pub fn table(&self) -> &DescriptorTable {
        &self.table
    }
}
