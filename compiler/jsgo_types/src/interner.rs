//! Sharded type interner.
//!
//! Same layout as the string interner in `jsgo_ir`: the hash of the type
//! data picks a shard, each shard maps data to a local index under its own
//! `RwLock`. The interner is shared by reference between units compiled in
//! parallel, so every method takes `&self`.

use std::hash::{Hash, Hasher};

use jsgo_ir::{Name, ObjectId, StringInterner, TypeId};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::data::{BasicKind, Field, Method, TypeData, TypeList};

/// Error when interning a type fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeInternError {
    /// Shard exceeded capacity (over 268 million types per shard).
    ShardOverflow { shard_idx: usize },
}

impl std::fmt::Display for TypeInternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeInternError::ShardOverflow { shard_idx } => {
                write!(f, "type interner shard {shard_idx} exceeded capacity")
            }
        }
    }
}

impl std::error::Error for TypeInternError {}

struct TypeShard {
    map: FxHashMap<TypeData, u32>,
    types: Vec<TypeData>,
}

impl TypeShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            types: Vec::with_capacity(128),
        }
    }

    /// Shard 0 with the predeclared types at the indices of the `TypeId`
    /// constants.
    fn with_predeclared() -> Self {
        let mut shard = Self::new();
        let predeclared = BasicKind::ALL
            .into_iter()
            .map(TypeData::Basic)
            .chain([
                TypeData::Interface(Vec::new()),
                TypeData::Named {
                    obj: ObjectId::ERROR,
                    args: TypeList::new(),
                },
            ]);
        for (idx, data) in predeclared.enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "predeclared count is fixed and small"
            )]
            let idx_u32 = idx as u32;
            shard.map.insert(data.clone(), idx_u32);
            shard.types.push(data);
        }
        debug_assert_eq!(shard.types.len(), TypeId::FIRST_COMPOUND as usize);
        shard
    }
}

/// Sharded type interner for concurrent access.
pub struct TypeInterner {
    shards: [RwLock<TypeShard>; TypeId::NUM_SHARDS],
    /// Underlying type of each named type.
    underlying: RwLock<FxHashMap<TypeId, TypeId>>,
    /// Declared methods of each named type, in canonical order.
    methods: RwLock<FxHashMap<TypeId, Vec<Method>>>,
}

impl TypeInterner {
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(TypeShard::with_predeclared())
            } else {
                RwLock::new(TypeShard::new())
            }
        });
        TypeInterner {
            shards,
            underlying: RwLock::new(FxHashMap::default()),
            methods: RwLock::new(FxHashMap::default()),
        }
    }

    /// Bind the predeclared `error` type to `interface{ Error() string }`.
    pub fn install_prelude(&self, names: &StringInterner) {
        let sig = self.signature(Vec::new(), vec![TypeId::STRING], false);
        let error_iface = self.interface(vec![Method {
            name: names.intern("Error"),
            sig,
        }]);
        self.set_underlying(TypeId::ERROR, error_iface);
    }

    #[inline]
    fn shard_for(data: &TypeData) -> usize {
        let mut hasher = rustc_hash::FxHasher::default();
        data.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation is fine for hash-based shard selection"
        )]
        let hash = hasher.finish() as usize;
        hash % TypeId::NUM_SHARDS
    }

    fn predeclared(data: &TypeData) -> Option<TypeId> {
        match data {
            TypeData::Basic(kind) => Some(kind.type_id()),
            TypeData::Interface(methods) if methods.is_empty() => Some(TypeId::EMPTY_INTERFACE),
            TypeData::Named { obj, args } if *obj == ObjectId::ERROR && args.is_empty() => {
                Some(TypeId::ERROR)
            }
            _ => None,
        }
    }

    /// Intern a type, returning the existing id when already present.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "shard_idx is bounded by NUM_SHARDS (16)"
    )]
    pub fn try_intern(&self, data: TypeData) -> Result<TypeId, TypeInternError> {
        if let Some(id) = Self::predeclared(&data) {
            return Ok(id);
        }

        let shard_idx = Self::shard_for(&data);
        let shard = &self.shards[shard_idx];

        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(&data) {
                return Ok(TypeId::from_shard_local(shard_idx as u32, local));
            }
        }

        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(&data) {
            return Ok(TypeId::from_shard_local(shard_idx as u32, local));
        }

        let local = u32::try_from(guard.types.len())
            .ok()
            .filter(|local| *local <= TypeId::MAX_LOCAL)
            .ok_or(TypeInternError::ShardOverflow { shard_idx })?;
        guard.types.push(data.clone());
        guard.map.insert(data, local);

        Ok(TypeId::from_shard_local(shard_idx as u32, local))
    }

    /// Intern a type.
    ///
    /// # Panics
    /// Panics if a shard overflows. Use `try_intern` for fallible interning.
    #[inline]
    pub fn intern(&self, data: TypeData) -> TypeId {
        self.try_intern(data).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Look up the data for an id.
    pub fn lookup(&self, id: TypeId) -> TypeData {
        let guard = self.shards[id.shard()].read();
        guard.types[id.local()].clone()
    }

    // Constructors

    pub fn slice(&self, elem: TypeId) -> TypeId {
        self.intern(TypeData::Slice(elem))
    }

    pub fn array(&self, elem: TypeId, len: u64) -> TypeId {
        self.intern(TypeData::Array { elem, len })
    }

    pub fn pointer(&self, elem: TypeId) -> TypeId {
        self.intern(TypeData::Pointer(elem))
    }

    pub fn map(&self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeData::Map { key, value })
    }

    pub fn signature(&self, params: Vec<TypeId>, results: Vec<TypeId>, variadic: bool) -> TypeId {
        self.intern(TypeData::Signature {
            params,
            results,
            variadic,
            recv: None,
        })
    }

    pub fn struct_type(&self, fields: Vec<Field>) -> TypeId {
        self.intern(TypeData::Struct(fields))
    }

    /// Interface types keep their methods in canonical order so that method
    /// order in the source does not change identity.
    pub fn interface(&self, mut methods: Vec<Method>) -> TypeId {
        methods.sort_by_key(|m| m.name);
        self.intern(TypeData::Interface(methods))
    }

    pub fn named(&self, obj: ObjectId, args: TypeList) -> TypeId {
        self.intern(TypeData::Named { obj, args })
    }

    pub fn type_param(&self, owner: ObjectId, index: u32, name: Name) -> TypeId {
        self.intern(TypeData::TypeParam { owner, index, name })
    }

    pub fn tuple(&self, elems: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Tuple(elems))
    }

    // Named types

    /// Bind a named type's underlying type.
    pub fn set_underlying(&self, named: TypeId, underlying: TypeId) {
        self.underlying.write().insert(named, underlying);
    }

    /// The underlying type: itself for anything that is not named, the bound
    /// underlying type otherwise. An unbound named type resolves to itself.
    pub fn underlying(&self, id: TypeId) -> TypeId {
        let mut current = id;
        // Named types may be declared in terms of other named types.
        for _ in 0..64 {
            match self.underlying.read().get(&current) {
                Some(&next) if next != current => current = next,
                _ => return current,
            }
        }
        tracing::warn!(?id, "underlying chain did not terminate");
        current
    }

    pub fn has_underlying(&self, named: TypeId) -> bool {
        self.underlying.read().contains_key(&named)
    }

    pub fn set_methods(&self, named: TypeId, mut methods: Vec<Method>) {
        methods.sort_by_key(|m| m.name);
        self.methods.write().insert(named, methods);
    }

    /// Declared methods of a named type (empty for anything else).
    pub fn methods(&self, named: TypeId) -> Vec<Method> {
        self.methods.read().get(&named).cloned().unwrap_or_default()
    }

    // Queries

    /// The basic kind of the underlying type, if it is basic.
    pub fn basic(&self, id: TypeId) -> Option<BasicKind> {
        match self.lookup(self.underlying(id)) {
            TypeData::Basic(kind) => Some(kind),
            _ => None,
        }
    }

    /// Declaring object and type arguments when `id` is a named type.
    pub fn as_named(&self, id: TypeId) -> Option<(ObjectId, TypeList)> {
        match self.lookup(id) {
            TypeData::Named { obj, args } => Some((obj, args)),
            _ => None,
        }
    }

    pub fn is_interface(&self, id: TypeId) -> bool {
        matches!(self.lookup(self.underlying(id)), TypeData::Interface(_))
    }

    pub fn is_empty_interface(&self, id: TypeId) -> bool {
        self.underlying(id) == TypeId::EMPTY_INTERFACE
    }

    pub fn struct_fields(&self, id: TypeId) -> Option<Vec<Field>> {
        match self.lookup(self.underlying(id)) {
            TypeData::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}
