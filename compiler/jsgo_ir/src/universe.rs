//! The resolved declaration graph.

use crate::{Name, Object, ObjectId, ObjectKind, Package, PackageId, StringInterner, TypeId};

/// Append-only arena of packages and objects produced by the front end.
///
/// Built once, then shared by reference between every unit compiled from
/// it; nothing in the code generator mutates it.
pub struct Universe {
    names: StringInterner,
    packages: Vec<Package>,
    objects: Vec<Object>,
}

impl Universe {
    /// Create a universe holding only the predeclared `error` type name.
    pub fn new() -> Self {
        let names = StringInterner::new();
        let error = Object::new(names.intern("error"), ObjectKind::TypeName).with_type(TypeId::ERROR);
        Universe {
            names,
            packages: Vec::new(),
            objects: vec![error],
        }
    }

    #[inline]
    pub fn names(&self) -> &StringInterner {
        &self.names
    }

    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.names.intern(s)
    }

    #[inline]
    pub fn lookup(&self, name: Name) -> &'static str {
        self.names.lookup(name)
    }

    pub fn add_package(&mut self, path: impl Into<String>, name: impl Into<String>) -> PackageId {
        let id = PackageId::new(index_u32(self.packages.len()));
        self.packages.push(Package {
            path: path.into(),
            name: name.into(),
        });
        id
    }

    #[inline]
    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    pub fn package_by_path(&self, path: &str) -> Option<PackageId> {
        self.packages
            .iter()
            .position(|p| p.path == path)
            .map(|i| PackageId::new(index_u32(i)))
    }

    pub fn add_object(&mut self, object: Object) -> ObjectId {
        let id = ObjectId::new(index_u32(self.objects.len()));
        self.objects.push(object);
        id
    }

    #[inline]
    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    /// The object's source name.
    #[inline]
    pub fn name_of(&self, id: ObjectId) -> &'static str {
        self.names.lookup(self.object(id).name)
    }

    /// Bind an object's type after the fact.
    ///
    /// Type names need their object id before their `Named` type exists.
    pub fn set_type(&mut self, id: ObjectId, ty: TypeId) {
        self.objects[id.index()].ty = ty;
    }

    pub fn set_type_params(&mut self, id: ObjectId, params: Vec<TypeId>) {
        self.objects[id.index()].type_params = params;
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, obj)| (ObjectId::new(index_u32(i)), obj))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.len() <= 1
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "arena indices are bounded well below u32::MAX"
)]
fn index_u32(len: usize) -> u32 {
    len as u32
}
