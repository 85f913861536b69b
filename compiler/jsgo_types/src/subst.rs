//! Type-parameter substitution.
//!
//! Instantiating a generic declaration replaces its type parameters with
//! concrete arguments throughout a type. Instantiated named types get their
//! underlying type and method set derived from the generic form on first
//! construction, so `underlying()` works on them like on any named type.

use jsgo_ir::TypeId;
use jsgo_stack::ensure_sufficient_stack;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::data::{Field, Method, TypeData, TypeList};
use crate::TypeInterner;

/// Mapping from type parameters to type arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subst {
    map: FxHashMap<TypeId, TypeId>,
}

impl Subst {
    /// Pair `params` with `args` positionally; extra entries on either side
    /// are ignored.
    pub fn new(params: &[TypeId], args: &[TypeId]) -> Self {
        Subst {
            map: params.iter().copied().zip(args.iter().copied()).collect(),
        }
    }

    #[inline]
    pub fn get(&self, param: TypeId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl TypeInterner {
    /// Apply `subst` to `ty`.
    pub fn substitute(&self, ty: TypeId, subst: &Subst) -> TypeId {
        if subst.is_empty() {
            return ty;
        }
        let mut walker = Substituter {
            types: self,
            subst,
            in_progress: FxHashSet::default(),
        };
        walker.apply(ty)
    }

    /// Instantiate a generic named type.
    ///
    /// `generic` is the named type applied to its own type parameters, e.g.
    /// `List[T]`, with its underlying type already bound.
    pub fn instantiate(&self, generic: TypeId, params: &[TypeId], args: &[TypeId]) -> TypeId {
        self.substitute(generic, &Subst::new(params, args))
    }
}

struct Substituter<'a> {
    types: &'a TypeInterner,
    subst: &'a Subst,
    /// Named instances whose underlying type is being derived right now.
    /// A recursive reference to one of them is left as-is.
    in_progress: FxHashSet<TypeId>,
}

impl Substituter<'_> {
    fn apply(&mut self, ty: TypeId) -> TypeId {
        if ty.is_predeclared() {
            return ty;
        }
        ensure_sufficient_stack(|| self.apply_data(ty))
    }

    fn apply_all(&mut self, tys: &[TypeId]) -> Vec<TypeId> {
        tys.iter().map(|t| self.apply(*t)).collect()
    }

    fn apply_data(&mut self, ty: TypeId) -> TypeId {
        let types = self.types;
        match types.lookup(ty) {
            TypeData::TypeParam { .. } => self.subst.get(ty).unwrap_or(ty),
            TypeData::Basic(_) => ty,
            TypeData::Array { elem, len } => types.array(self.apply(elem), len),
            TypeData::Slice(elem) => types.slice(self.apply(elem)),
            TypeData::Pointer(elem) => types.pointer(self.apply(elem)),
            TypeData::Map { key, value } => {
                let key = self.apply(key);
                types.map(key, self.apply(value))
            }
            TypeData::Chan { elem, dir } => types.intern(TypeData::Chan {
                elem: self.apply(elem),
                dir,
            }),
            TypeData::Signature {
                params,
                results,
                variadic,
                recv,
            } => {
                let params = self.apply_all(&params);
                let results = self.apply_all(&results);
                let recv = recv.map(|r| self.apply(r));
                types.intern(TypeData::Signature {
                    params,
                    results,
                    variadic,
                    recv,
                })
            }
            TypeData::Struct(fields) => {
                let fields = fields
                    .into_iter()
                    .map(|f| Field {
                        ty: self.apply(f.ty),
                        ..f
                    })
                    .collect();
                types.struct_type(fields)
            }
            TypeData::Interface(methods) => {
                let methods = self.apply_methods(methods);
                types.interface(methods)
            }
            TypeData::Tuple(elems) => {
                let elems = self.apply_all(&elems);
                types.tuple(elems)
            }
            TypeData::Named { obj, args } => {
                if args.is_empty() {
                    return ty;
                }
                let new_args: TypeList = args.iter().map(|a| self.apply(*a)).collect();
                if new_args == args {
                    return ty;
                }
                let instance = types.named(obj, new_args);
                if types.has_underlying(instance) || !self.in_progress.insert(instance) {
                    return instance;
                }
                if types.has_underlying(ty) {
                    let under = self.apply(types.underlying(ty));
                    types.set_underlying(instance, under);
                }
                let methods = types.methods(ty);
                if !methods.is_empty() {
                    let methods = self.apply_methods(methods);
                    types.set_methods(instance, methods);
                }
                self.in_progress.remove(&instance);
                tracing::trace!(?ty, ?instance, "instantiated named type");
                instance
            }
        }
    }

    fn apply_methods(&mut self, methods: Vec<Method>) -> Vec<Method> {
        methods
            .into_iter()
            .map(|m| Method {
                sig: self.apply(m.sig),
                ..m
            })
            .collect()
    }
}
