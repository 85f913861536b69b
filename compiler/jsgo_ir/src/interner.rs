//! Identifier interning.
//!
//! Identifiers are stored once and handed out as [`Name`]s. Strings are
//! spread over [`Name::NUM_SHARDS`] shards by hash, each behind its own
//! `RwLock`, so units compiled in parallel rarely contend when they intern
//! synthesized names. Interned strings are leaked: they live as long as the
//! build.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};
use thiserror::Error;

use crate::Name;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InternError {
    #[error("identifier shard {shard} is full ({} names)", Name::MAX_LOCAL)]
    ShardFull { shard: usize },
}

#[derive(Default)]
struct Shard {
    index: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Shard {
    fn get(&self, s: &str) -> Option<u32> {
        self.index.get(s).copied()
    }

    /// Store `s`, which must not be present yet.
    fn insert(&mut self, s: &str) -> Option<u32> {
        let local = u32::try_from(self.strings.len())
            .ok()
            .filter(|&local| local <= Name::MAX_LOCAL)?;
        let s: &'static str = Box::leak(Box::<str>::from(s));
        self.strings.push(s);
        self.index.insert(s, local);
        Some(local)
    }
}

/// Identifiers predeclared by the source language, and the few names the
/// compiler looks up by string.
const PREDECLARED: &[&str] = &[
    "bool", "byte", "complex64", "complex128", "error", "float32", "float64", "int", "int8",
    "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16", "uint32", "uint64",
    "uintptr", "any", "Error", "main", "init", "_", "Object",
];

pub struct StringInterner {
    shards: [RwLock<Shard>; Name::NUM_SHARDS],
    count: AtomicUsize,
}

impl StringInterner {
    pub fn new() -> Self {
        let interner = StringInterner {
            shards: std::array::from_fn(|_| RwLock::new(Shard::default())),
            count: AtomicUsize::new(0),
        };
        // The empty string must land at local 0 of shard 0.
        interner.shards[0].write().insert("");
        interner.count.store(1, Ordering::Relaxed);
        for ident in PREDECLARED {
            interner.intern(ident);
        }
        interner
    }

    fn shard_of(s: &str) -> usize {
        if s.is_empty() {
            return 0;
        }
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "only the low bits select a shard"
        )]
        let hash = hasher.finish() as usize;
        hash % Name::NUM_SHARDS
    }

    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        let shard = Self::shard_of(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard indices are below NUM_SHARDS"
        )]
        let make = |local| Name::new(shard as u32, local);

        if let Some(local) = self.shards[shard].read().get(s) {
            return Ok(make(local));
        }
        let mut guard = self.shards[shard].write();
        // Another thread may have won the race for the write lock.
        if let Some(local) = guard.get(s) {
            return Ok(make(local));
        }
        let local = guard.insert(s).ok_or(InternError::ShardFull { shard })?;
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(make(local))
    }

    /// Like [`try_intern`](Self::try_intern), but a full shard is a bug in
    /// the build, not an input error.
    ///
    /// # Panics
    /// When the shard `s` hashes to is full.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The string behind `name`; `""` for a name from another interner.
    pub fn lookup(&self, name: Name) -> &'static str {
        let shard = self.shards[name.shard()].read();
        shard.strings.get(name.local()).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Never true: the empty string and the predeclared identifiers are
    /// always present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
