//! Interned type identifier.
//!
//! Basic types, the empty interface and the predeclared `error` type are
//! pre-interned in shard 0 at fixed local indices.

use std::fmt;

/// Interned type identifier.
///
/// # Layout
/// 32-bit index split into shard (4 bits) + local index (28 bits):
/// - Bits 31-28: Shard index (0-15)
/// - Bits 27-0: Local index within shard
///
/// Structurally equal anonymous types intern to the same `TypeId`, so
/// `TypeId` equality is type identity.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const BOOL: TypeId = TypeId(0);
    pub const INT: TypeId = TypeId(1);
    pub const INT8: TypeId = TypeId(2);
    pub const INT16: TypeId = TypeId(3);
    pub const INT32: TypeId = TypeId(4);
    pub const INT64: TypeId = TypeId(5);
    pub const UINT: TypeId = TypeId(6);
    pub const UINT8: TypeId = TypeId(7);
    pub const UINT16: TypeId = TypeId(8);
    pub const UINT32: TypeId = TypeId(9);
    pub const UINT64: TypeId = TypeId(10);
    pub const UINTPTR: TypeId = TypeId(11);
    pub const FLOAT32: TypeId = TypeId(12);
    pub const FLOAT64: TypeId = TypeId(13);
    pub const COMPLEX64: TypeId = TypeId(14);
    pub const COMPLEX128: TypeId = TypeId(15);
    pub const STRING: TypeId = TypeId(16);
    pub const UNSAFE_POINTER: TypeId = TypeId(17);
    /// Type of the untyped `nil` literal.
    pub const UNTYPED_NIL: TypeId = TypeId(18);
    /// `interface{}`.
    pub const EMPTY_INTERFACE: TypeId = TypeId(19);
    /// The predeclared `error` named type.
    pub const ERROR: TypeId = TypeId(20);

    /// First local index in shard 0 for dynamically interned types.
    pub const FIRST_COMPOUND: u32 = 21;

    /// Maximum local index per shard (2^28 - 1).
    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    /// Number of shards for type interning.
    pub const NUM_SHARDS: usize = 16;

    #[inline]
    pub const fn from_shard_local(shard: u32, local: u32) -> Self {
        debug_assert!(shard < 16);
        debug_assert!(local <= Self::MAX_LOCAL);
        TypeId((shard << 28) | local)
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> 28) as usize
    }

    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether this is one of the fixed pre-interned types.
    #[inline]
    pub const fn is_predeclared(self) -> bool {
        self.0 < Self::FIRST_COMPOUND
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BOOL => write!(f, "TypeId::BOOL"),
            Self::INT => write!(f, "TypeId::INT"),
            Self::STRING => write!(f, "TypeId::STRING"),
            Self::FLOAT64 => write!(f, "TypeId::FLOAT64"),
            Self::EMPTY_INTERFACE => write!(f, "TypeId::EMPTY_INTERFACE"),
            Self::ERROR => write!(f, "TypeId::ERROR"),
            _ => write!(f, "TypeId({}:{})", self.shard(), self.local()),
        }
    }
}
