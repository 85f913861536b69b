//! Handles to interned identifiers.

use std::fmt;

/// An identifier interned in a [`StringInterner`](crate::StringInterner).
///
/// The top [`Name::SHARD_BITS`] bits pick the interner shard, the rest index
/// into it. Comparing two names compares the strings they stand for, as
/// long as both came from the same interner.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    pub const SHARD_BITS: u32 = 4;
    pub const NUM_SHARDS: usize = 1 << Self::SHARD_BITS;
    /// Largest index a single shard can hand out.
    pub const MAX_LOCAL: u32 = u32::MAX >> Self::SHARD_BITS;

    /// The empty identifier, pre-interned in shard 0. Blank and embedded
    /// names resolve to it.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub const fn new(shard: u32, local: u32) -> Self {
        debug_assert!((shard as usize) < Self::NUM_SHARDS);
        debug_assert!(local <= Self::MAX_LOCAL);
        Name((shard << (32 - Self::SHARD_BITS)) | local)
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> (32 - Self::SHARD_BITS)) as usize
    }

    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.shard(), self.local())
    }
}
