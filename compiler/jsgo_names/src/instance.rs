//! Instance identity and registration.
//!
//! An instance is a declared entity together with the type arguments
//! applied to it and those inherited from the generic function it is
//! declared in. Two instances are the same iff all three parts are equal;
//! type arguments compare by `TypeId`, which is structural identity.

use jsgo_ir::{ObjectId, TypeId};
use jsgo_types::{TypeFormatter, TypeList};
use rustc_hash::FxHashMap;

/// A concrete use of a possibly generic entity.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Instance {
    pub object: ObjectId,
    /// Type arguments applied directly to the entity.
    pub targs: TypeList,
    /// Type arguments of the enclosing generic function.
    pub tnest: TypeList,
}

impl Instance {
    /// The only instance of a non-generic entity.
    pub fn trivial(object: ObjectId) -> Self {
        Instance {
            object,
            targs: TypeList::new(),
            tnest: TypeList::new(),
        }
    }

    pub fn new(object: ObjectId, targs: TypeList, tnest: TypeList) -> Self {
        Instance {
            object,
            targs,
            tnest,
        }
    }

    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.targs.is_empty() && self.tnest.is_empty()
    }

    /// Readable rendering of the type arguments: nesting arguments first,
    /// separated from the direct ones by `; `.
    pub fn type_params_string(&self, fmt: &TypeFormatter<'_>) -> String {
        let mut out = String::new();
        if !self.tnest.is_empty() {
            out.push_str(&fmt.format_list(&self.tnest));
        }
        if !self.tnest.is_empty() && !self.targs.is_empty() {
            out.push_str("; ");
        }
        if !self.targs.is_empty() {
            out.push_str(&fmt.format_list(&self.targs));
        }
        out
    }
}

/// A node of the dead-code graph.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKey {
    /// A declared entity, generic or not.
    Instance(Instance),
    /// The synthesized declaration shared by every occurrence of a
    /// structurally equal anonymous type.
    AnonType(TypeId),
}

impl DeclKey {
    pub fn object(obj: ObjectId) -> Self {
        DeclKey::Instance(Instance::trivial(obj))
    }
}

impl From<Instance> for DeclKey {
    fn from(inst: Instance) -> Self {
        DeclKey::Instance(inst)
    }
}

#[derive(Default)]
struct ObjectInstances {
    ids: FxHashMap<Instance, u32>,
    order: Vec<Instance>,
}

/// Instances registered so far in a unit, with per-entity numeric ids
/// assigned on first use.
#[derive(Default)]
pub struct InstanceSet {
    by_object: FxHashMap<ObjectId, ObjectInstances>,
    total: usize,
}

impl InstanceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id of `inst`, registering it if this is its first use.
    pub fn id(&mut self, inst: &Instance) -> u32 {
        let entry = self.by_object.entry(inst.object).or_default();
        if let Some(&id) = entry.ids.get(inst) {
            return id;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "instances per entity are bounded well below u32::MAX"
        )]
        let id = entry.order.len() as u32;
        entry.ids.insert(inst.clone(), id);
        entry.order.push(inst.clone());
        self.total += 1;
        tracing::trace!(object = ?inst.object, id, "registered instance");
        id
    }

    /// The id of `inst` if it has been registered.
    pub fn get(&self, inst: &Instance) -> Option<u32> {
        self.by_object.get(&inst.object)?.ids.get(inst).copied()
    }

    /// Registered instances of `obj`, in id order.
    pub fn for_object(&self, obj: ObjectId) -> &[Instance] {
        self.by_object
            .get(&obj)
            .map(|e| e.order.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests;
