//! A small front-end universe shared by the unit tests.

use jsgo_diagnostic::DiagnosticConfig;
use jsgo_ir::{Object, ObjectFlags, ObjectId, ObjectKind, PackageId, TypeId, Universe};
use jsgo_types::{Field, TypeInterner, TypeList};

use crate::{NamingMode, UnitContext, HOST_PACKAGE_PATH};

pub(crate) struct Fixture {
    pub universe: Universe,
    pub types: TypeInterner,
    /// The package being compiled.
    pub main: PackageId,
    pub fmt: PackageId,
    /// `*js.Object`.
    pub js_object: TypeId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut universe = Universe::new();
        let types = TypeInterner::new();
        types.install_prelude(universe.names());
        let main = universe.add_package("example.com/app", "main");
        let fmt = universe.add_package("fmt", "fmt");
        let js = universe.add_package(HOST_PACKAGE_PATH, "js");

        let object = universe.add_object(
            Object::new(universe.intern("Object"), ObjectKind::TypeName)
                .in_package(js)
                .with_flags(ObjectFlags::EXPORTED | ObjectFlags::PACKAGE_LEVEL),
        );
        let named = types.named(object, TypeList::new());
        universe.set_type(object, named);
        let js_object = types.pointer(named);
        types.set_underlying(
            named,
            types.struct_type(vec![Field::new(universe.intern("object"), js_object)]),
        );

        Fixture {
            universe,
            types,
            main,
            fmt,
            js_object,
        }
    }

    pub fn ctx(&self) -> UnitContext<'_> {
        self.ctx_with(NamingMode::Natural)
    }

    pub fn ctx_with(&self, mode: NamingMode) -> UnitContext<'_> {
        UnitContext::new(
            &self.universe,
            &self.types,
            self.main,
            mode,
            DiagnosticConfig::unlimited(),
        )
    }

    pub fn add(&mut self, name: &str, kind: ObjectKind, flags: ObjectFlags) -> ObjectId {
        let object = Object::new(self.universe.intern(name), kind)
            .in_package(self.main)
            .with_flags(flags);
        self.universe.add_object(object)
    }

    /// A function-local variable.
    pub fn local(&mut self, name: &str) -> ObjectId {
        self.add(name, ObjectKind::Var, ObjectFlags::empty())
    }

    pub fn func(&mut self, name: &str) -> ObjectId {
        self.add(name, ObjectKind::Func, ObjectFlags::PACKAGE_LEVEL)
    }

    /// A generic package-level function with one type parameter `T`.
    pub fn generic_func(&mut self, name: &str) -> (ObjectId, TypeId) {
        let func = self.func(name);
        let param = self.types.type_param(func, 0, self.universe.intern("T"));
        self.universe.set_type_params(func, vec![param]);
        (func, param)
    }

    /// A package-level named type with the given underlying type.
    pub fn named(&mut self, name: &str, underlying: TypeId) -> (ObjectId, TypeId) {
        let obj = self.add(name, ObjectKind::TypeName, ObjectFlags::PACKAGE_LEVEL);
        let named = self.types.named(obj, TypeList::new());
        self.universe.set_type(obj, named);
        self.types.set_underlying(named, underlying);
        (obj, named)
    }

    pub fn field(&self, name: &str, ty: TypeId) -> Field {
        Field::new(self.universe.intern(name), ty)
    }

    pub fn tagged(&self, name: &str, ty: TypeId, tag: &str) -> Field {
        Field::new(self.universe.intern(name), ty).with_tag(self.universe.intern(tag))
    }
}
