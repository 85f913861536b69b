//! Naming of bindings, instances and package variables.

use jsgo_diagnostic::{bailout, FatalError, ResultExt};
use jsgo_ir::{ObjectId, ObjectKind, PackageId, TypeId};
use jsgo_types::{TypeData, TypeList};

use crate::context::UnitContext;
use crate::encode::{encode_ident, MID_DOT};
use crate::instance::{DeclKey, Instance};
use crate::reserved::is_reserved;
use crate::scope::{NamingMode, ScopeId};
use crate::NamingError;

impl UnitContext<'_> {
    /// Allocate a fresh identifier for `name` in the current scope.
    ///
    /// A package-level name is reserved in every enclosing scope and is not
    /// added to the current function's locals.
    pub fn new_variable(&mut self, name: &str, pkg_level: bool) -> Result<String, FatalError> {
        let scope = self.current_scope();
        self.scopes.allocate(scope, name, pkg_level)
    }

    pub fn new_local_variable(&mut self, name: &str) -> Result<String, FatalError> {
        self.new_variable(name, false)
    }

    /// Host expression referring to `obj`, allocating its identifier on
    /// first use.
    pub fn object_name(&mut self, obj: ObjectId) -> Result<String, FatalError> {
        let universe = self.universe;
        let object = universe.object(obj);
        let pkg_level = self.is_pkg_level(obj);

        if pkg_level {
            // Objects nested in an open generic function inherit its type
            // arguments.
            let tnest = object
                .nesting_func
                .and_then(|func| self.nesting_targs(func))
                .cloned()
                .unwrap_or_default();
            self.declare_dependency(DeclKey::Instance(Instance::new(obj, TypeList::new(), tnest)));

            let package = object
                .package
                .ok_or_else(|| bailout(NamingError::NoPackage(universe.name_of(obj).to_owned())))?;
            let var_or_const = matches!(object.kind, ObjectKind::Var | ObjectKind::Const);
            if package != self.package || (var_or_const && object.is_exported()) {
                return Ok(format!("{}.{}", self.pkg_var(package), universe.name_of(obj)));
            }
        }

        let scope = self.current_scope();
        let name = match self.scopes.assigned_name(scope, obj) {
            Some(name) => name.to_owned(),
            None => {
                let name = self.new_variable(universe.name_of(obj), pkg_level)?;
                let owner = if pkg_level { ScopeId::ROOT } else { scope };
                self.scopes.record_name(owner, obj, name.clone());
                name
            }
        };

        if matches!(object.kind, ObjectKind::Var) && object.is_escaping() {
            return Ok(format!("{name}[0]"));
        }
        Ok(name)
    }

    /// Named types always live at package level, even when declared inside
    /// a function body.
    pub(crate) fn is_pkg_level(&self, obj: ObjectId) -> bool {
        let object = self.universe.object(obj);
        object.is_package_level() || matches!(object.kind, ObjectKind::TypeName)
    }

    /// Identifier of an instance: the entity's name, followed by
    /// `[ID /* args */]` unless the instance is trivial.
    pub fn inst_name(&mut self, inst: &Instance) -> Result<String, FatalError> {
        let universe = self.universe;
        let base = self
            .object_name(inst.object)
            .clue(|| format!("naming instance of {}", universe.name_of(inst.object)))?;
        if inst.is_trivial() {
            return Ok(base);
        }
        self.declare_dependency(DeclKey::Instance(inst.clone()));
        let id = self.instances.id(inst);
        Ok(match self.mode() {
            NamingMode::Natural => {
                let label = inst.type_params_string(&self.formatter());
                format!("{base}[{id} /* {label} */]")
            }
            NamingMode::Minified => format!("{base}[{id}]"),
        })
    }

    /// Property name of a method on its receiver's prototype.
    pub fn method_name(&self, func: ObjectId) -> Result<String, FatalError> {
        let object = self.universe.object(func);
        if !matches!(object.kind, ObjectKind::Method { .. }) {
            return Err(bailout(NamingError::NotAMethod(
                self.universe.name_of(func).to_owned(),
            )));
        }
        // Method names are unique per receiver; only keywords need escaping.
        let name = self.universe.name_of(func);
        if is_reserved(name) {
            return Ok(format!("{name}$"));
        }
        Ok(name.to_owned())
    }

    /// Property name of field `index` of struct type `ty`.
    pub fn field_name(&self, ty: TypeId, index: usize) -> Result<String, FatalError> {
        let fields = self.types.struct_fields(ty).ok_or_else(|| {
            bailout(NamingError::NotAStruct {
                ty: self.formatter().format(ty),
                index,
            })
        })?;
        let field = fields.get(index).ok_or_else(|| {
            bailout(NamingError::NotAStruct {
                ty: self.formatter().format(ty),
                index,
            })
        })?;
        let name = self.universe.lookup(field.name);
        if name == "_" || is_reserved(name) {
            return Ok(format!("{name}${index}"));
        }
        Ok(name.to_owned())
    }

    /// Identifier holding a pointer to variable `obj`.
    pub fn var_ptr_name(&mut self, obj: ObjectId) -> Result<String, FatalError> {
        let universe = self.universe;
        let object = universe.object(obj);
        let pkg_level = self.is_pkg_level(obj);
        if pkg_level && object.is_exported() {
            if let Some(package) = object.package {
                return Ok(format!(
                    "{}.{}$ptr",
                    self.pkg_var(package),
                    universe.name_of(obj)
                ));
            }
        }

        if let Some(name) = self.var_ptr_names.get(&obj) {
            return Ok(name.clone());
        }
        let base = format!("{}$ptr", encode_ident(universe.name_of(obj)));
        let scope = self.current_scope();
        let name = self.scopes.allocate_encoded(scope, base, pkg_level);
        self.var_ptr_names.insert(obj, name.clone());
        Ok(name)
    }

    /// Host expression for a package object: `$pkg` for this unit's own
    /// package, the import variable if one was allocated, or a lookup in
    /// the global package table.
    pub fn pkg_var(&self, package: PackageId) -> String {
        if package == self.package {
            return "$pkg".to_owned();
        }
        let path = &self.universe.package(package).path;
        match self.pkg_vars.get(path) {
            Some(var) => var.clone(),
            None => format!("$packages[\"{path}\"]"),
        }
    }

    /// Package-level variable holding an imported package, allocated on the
    /// first request for its path.
    pub fn imported_pkg_var(&mut self, package: PackageId) -> Result<String, FatalError> {
        let universe = self.universe;
        let pkg = universe.package(package);
        if let Some(var) = self.pkg_vars.get(&pkg.path) {
            return Ok(var.clone());
        }
        let var = self.new_variable(&pkg.name, true)?;
        tracing::trace!(path = %pkg.path, %var, "imported package variable");
        self.pkg_vars.insert(pkg.path.clone(), var.clone());
        Ok(var)
    }

    /// Synthetic name for the next function literal in the current body:
    /// `Recv·Method·funcN`, `Func·funcN`, or `funcN` at package level.
    pub fn new_lit_func_name(&mut self) -> String {
        let frame = self.frame_mut();
        frame.lit_counter += 1;
        let counter = frame.lit_counter;

        let mut name = String::new();
        if let Some(inst) = self.current_instance() {
            let object = self.universe.object(inst.object);
            if let ObjectKind::Method { recv } = object.kind {
                name.push_str(self.universe.name_of(recv));
                name.push_str(MID_DOT);
            }
            name.push_str(self.universe.lookup(object.name));
            name.push_str(MID_DOT);
        }
        name.push_str("func");
        name.push_str(&counter.to_string());
        name
    }

    /// Instances of `obj` that code must be emitted for.
    ///
    /// A non-generic object outside any generic function always has its
    /// trivial instance. A generic one has whatever was registered so far,
    /// possibly nothing.
    pub fn known_instances(&self, obj: ObjectId) -> Vec<Instance> {
        let registered = self.instances.for_object(obj);
        let object = self.universe.object(obj);
        if registered.is_empty() && !object.is_generic() && object.nesting_func.is_none() {
            return vec![Instance::trivial(obj)];
        }
        registered.to_vec()
    }

    /// Whether `ty` is the opaque host handle `*js.Object`.
    pub fn is_js_object(&self, ty: TypeId) -> bool {
        let Some(host) = self.host_package else {
            return false;
        };
        let TypeData::Pointer(elem) = self.types.lookup(ty) else {
            return false;
        };
        let Some((obj, _)) = self.types.as_named(elem) else {
            return false;
        };
        let object = self.universe.object(obj);
        object.package == Some(host) && self.universe.lookup(object.name) == "Object"
    }
}
