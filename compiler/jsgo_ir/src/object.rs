//! Resolved declarations handed over by the front end.
//!
//! Every binding the code generator may name (variables, constants, type
//! names, functions, methods, imported package names) is an [`Object`]
//! addressed by an [`ObjectId`] into the [`Universe`](crate::Universe).

use std::fmt;

use bitflags::bitflags;

use crate::{Name, Span, TypeId};

/// Index of an object in the universe arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ObjectId(u32);

impl ObjectId {
    /// The predeclared `error` type name, registered by `Universe::new`.
    pub const ERROR: ObjectId = ObjectId(0);

    #[inline]
    pub const fn new(index: u32) -> Self {
        ObjectId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// Index of a package in the universe arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct PackageId(u32);

impl PackageId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        PackageId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A source package.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Package {
    /// Import path, e.g. `github.com/user/repo/pkg`.
    pub path: String,
    /// Declared package name, e.g. `pkg`.
    pub name: String,
}

/// What kind of binding an object is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ObjectKind {
    Var,
    Const,
    TypeName,
    Func,
    /// A method; `recv` is the receiver's type name object.
    Method { recv: ObjectId },
    /// An import binding; `imported` is the package it refers to.
    PkgName { imported: PackageId },
}

bitflags! {
    /// Resolution facts the front end records per object.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ObjectFlags: u8 {
        /// Visible outside its package.
        const EXPORTED = 1 << 0;
        /// Declared at package scope.
        const PACKAGE_LEVEL = 1 << 1;
        /// Address taken by a closure or `&`, so it lives in a box.
        const ESCAPING = 1 << 2;
    }
}

/// A resolved declaration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Object {
    pub name: Name,
    pub kind: ObjectKind,
    /// `None` only for universe-scope objects such as `error`.
    pub package: Option<PackageId>,
    pub flags: ObjectFlags,
    /// The generic function this object is declared inside, if any.
    pub nesting_func: Option<ObjectId>,
    /// Type parameters of a generic type or function, in declaration order.
    pub type_params: Vec<TypeId>,
    pub ty: TypeId,
    pub span: Span,
}

impl Object {
    pub fn new(name: Name, kind: ObjectKind) -> Self {
        Object {
            name,
            kind,
            package: None,
            flags: ObjectFlags::empty(),
            nesting_func: None,
            type_params: Vec::new(),
            ty: TypeId::UNTYPED_NIL,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn in_package(mut self, package: PackageId) -> Self {
        self.package = Some(package);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ObjectFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn nested_in(mut self, func: ObjectId) -> Self {
        self.nesting_func = Some(func);
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeId) -> Self {
        self.ty = ty;
        self
    }

    #[must_use]
    pub fn with_type_params(mut self, params: Vec<TypeId>) -> Self {
        self.type_params = params;
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[inline]
    pub fn is_exported(&self) -> bool {
        self.flags.contains(ObjectFlags::EXPORTED)
    }

    #[inline]
    pub fn is_package_level(&self) -> bool {
        self.flags.contains(ObjectFlags::PACKAGE_LEVEL)
    }

    #[inline]
    pub fn is_escaping(&self) -> bool {
        self.flags.contains(ObjectFlags::ESCAPING)
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}
