use super::*;
use crate::test_fixture::Fixture;
use jsgo_ir::{Object, ObjectFlags, ObjectKind};
use jsgo_types::Method;
use pretty_assertions::assert_eq;
use smallvec::smallvec;

#[test]
fn basic_and_prelude_types() {
    let fx = Fixture::new();
    let mut ctx = fx.ctx();
    assert_eq!(ctx.type_name(TypeId::INT).unwrap(), "$Int");
    assert_eq!(ctx.type_name(TypeId::UINT8).unwrap(), "$Uint8");
    assert_eq!(ctx.type_name(TypeId::STRING).unwrap(), "$String");
    assert_eq!(ctx.type_name(TypeId::UNSAFE_POINTER).unwrap(), "$UnsafePointer");
    assert_eq!(ctx.type_name(TypeId::ERROR).unwrap(), "$error");
    assert_eq!(ctx.type_name(TypeId::EMPTY_INTERFACE).unwrap(), "$emptyInterface");
}

#[test]
fn anonymous_types_are_declared_once_per_structure() {
    let fx = Fixture::new();
    let ints = fx.types.slice(TypeId::INT);
    let strings = fx.types.slice(TypeId::STRING);
    let mut ctx = fx.ctx();

    assert_eq!(ctx.type_name(ints).unwrap(), "sliceType");
    assert_eq!(ctx.type_name(fx.types.slice(TypeId::INT)).unwrap(), "sliceType");
    assert_eq!(ctx.type_name(strings).unwrap(), "sliceType$1");
    assert_eq!(
        ctx.anon_types(),
        &[(ints, "sliceType".to_owned()), (strings, "sliceType$1".to_owned())][..]
    );
}

#[test]
fn component_types_are_declared_first() {
    let fx = Fixture::new();
    let ints = fx.types.slice(TypeId::INT);
    let index = fx.types.map(TypeId::STRING, ints);
    let mut ctx = fx.ctx();

    assert_eq!(ctx.type_name(index).unwrap(), "mapType");
    let order: Vec<_> = ctx.anon_types().iter().map(|(ty, _)| *ty).collect();
    assert_eq!(order, vec![ints, index]);
}

#[test]
fn anonymous_types_record_dependencies() {
    let mut fx = Fixture::new();
    let main = fx.func("main");
    let ptr = fx.types.pointer(TypeId::INT);
    let mut ctx = fx.ctx();
    ctx.in_decl(DeclKey::object(main), |ctx| ctx.type_name(ptr)).unwrap();
    let deps: Vec<_> = ctx.deps().dependencies(&DeclKey::object(main)).cloned().collect();
    assert_eq!(deps, vec![DeclKey::AnonType(ptr)]);
}

#[test]
fn named_types_go_through_instances() {
    let mut fx = Fixture::new();
    let (_, point) = fx.named("Point", TypeId::INT);
    let list = fx.add("List", ObjectKind::TypeName, ObjectFlags::PACKAGE_LEVEL);
    let param = fx.types.type_param(list, 0, fx.universe.intern("T"));
    fx.universe.set_type_params(list, vec![param]);
    let list_int = fx.types.named(list, smallvec![TypeId::INT]);
    let mut ctx = fx.ctx();

    assert_eq!(ctx.type_name(point).unwrap(), "Point");
    assert_eq!(ctx.type_name(list_int).unwrap(), "List[0 /* int */]");
}

#[test]
fn unresolved_type_parameters_are_fatal() {
    let mut fx = Fixture::new();
    let (_, t) = fx.generic_func("Id");
    let mut ctx = fx.ctx();
    let err = ctx.type_name(t).unwrap_err();
    assert!(matches!(
        err.cause_as::<NamingError>(),
        Some(NamingError::UnexpectedTypeParam(_))
    ));
}

#[test]
fn type_parameters_resolve_inside_an_instance() {
    let mut fx = Fixture::new();
    let (id, t) = fx.generic_func("Id");
    let slice_of_t = fx.types.slice(t);
    let mut ctx = fx.ctx();

    ctx.enter_function(Instance::new(id, smallvec![TypeId::BOOL], TypeList::new()));
    assert_eq!(ctx.type_name(t).unwrap(), "$Bool");
    assert_eq!(ctx.resolve_type(slice_of_t), fx.types.slice(TypeId::BOOL));
}

#[test]
fn types_nested_in_generic_functions() {
    let mut fx = Fixture::new();
    let (outer, _) = fx.generic_func("Outer");
    let local = fx.universe.add_object(
        Object::new(fx.universe.intern("local"), ObjectKind::TypeName)
            .in_package(fx.main)
            .nested_in(outer),
    );
    let local_ty = fx.types.named(local, TypeList::new());
    fx.types.set_underlying(local_ty, TypeId::INT);
    let mut ctx = fx.ctx();

    let err = ctx.type_name(local_ty).unwrap_err();
    assert!(matches!(
        err.cause_as::<NamingError>(),
        Some(NamingError::OutsideNestingFunction { .. })
    ));

    ctx.enter_function(Instance::new(outer, smallvec![TypeId::STRING], TypeList::new()));
    assert_eq!(ctx.type_name(local_ty).unwrap(), "local[0 /* string */]");
    assert_eq!(
        ctx.known_instances(local),
        vec![Instance::new(local, TypeList::new(), smallvec![TypeId::STRING])]
    );
}

#[test]
fn nested_types_inherit_through_inner_function_bodies() {
    let mut fx = Fixture::new();
    let (outer, _) = fx.generic_func("Outer");
    let closure = fx.func("closure");
    let local = fx.universe.add_object(
        Object::new(fx.universe.intern("local"), ObjectKind::TypeName)
            .in_package(fx.main)
            .nested_in(outer),
    );
    let local_ty = fx.types.named(local, TypeList::new());
    fx.types.set_underlying(local_ty, TypeId::INT);
    let mut ctx = fx.ctx();

    let outer_inst = Instance::new(outer, smallvec![TypeId::STRING], TypeList::new());
    let expected = Instance::new(local, TypeList::new(), smallvec![TypeId::STRING]);
    ctx.enter_function(outer_inst.clone());
    ctx.enter_function(Instance::trivial(closure));
    ctx.in_decl(DeclKey::Instance(outer_inst.clone()), |ctx| {
        assert_eq!(ctx.type_name(local_ty).unwrap(), "local[0 /* string */]");
        ctx.object_name(local).unwrap();
    });

    let deps: Vec<_> = ctx
        .deps()
        .dependencies(&DeclKey::Instance(outer_inst))
        .cloned()
        .collect();
    assert_eq!(deps, vec![DeclKey::Instance(expected.clone())]);
    assert_eq!(ctx.known_instances(local), vec![expected]);
}

#[test]
fn init_args_of_composite_types() {
    let fx = Fixture::new();
    let array = fx.types.array(TypeId::INT, 4);
    let chan = fx.types.intern(TypeData::Chan {
        elem: TypeId::BOOL,
        dir: ChanDir::Recv,
    });
    let strings = fx.types.slice(TypeId::STRING);
    let sig = fx.types.signature(vec![TypeId::INT, strings], vec![TypeId::BOOL], true);
    let mut ctx = fx.ctx();

    assert_eq!(ctx.type_init_args(array).unwrap(), "$Int, 4");
    assert_eq!(ctx.type_init_args(chan).unwrap(), "$Bool, false, true");
    assert_eq!(ctx.type_init_args(sig).unwrap(), "[$Int, sliceType], [$Bool], true");
    assert!(ctx.type_init_args(TypeId::INT).is_err());
}

#[test]
fn init_args_of_structs_and_interfaces() {
    let fx = Fixture::new();
    let strukt = fx.types.struct_type(vec![
        fx.field("A", TypeId::INT),
        fx.tagged("b", TypeId::STRING, "json:\"b\""),
    ]);
    let stringer = fx.types.interface(vec![Method {
        name: fx.universe.intern("String"),
        sig: fx.types.signature(Vec::new(), vec![TypeId::STRING], false),
    }]);
    let mut ctx = fx.ctx();

    assert_eq!(
        ctx.type_init_args(strukt).unwrap(),
        "\"example.com/app\", [\
         {prop: \"A\", name: \"A\", embedded: false, exported: true, typ: $Int, tag: \"\"}, \
         {prop: \"b\", name: \"b\", embedded: false, exported: false, typ: $String, tag: \"json:\\\"b\\\"\"}]"
    );
    assert_eq!(
        ctx.type_init_args(stringer).unwrap(),
        "[{prop: \"String\", name: \"String\", pkg: \"\", typ: funcType}]"
    );
}

#[test]
fn kinds() {
    let mut fx = Fixture::new();
    let (_, celsius) = fx.named("Celsius", TypeId::FLOAT64);
    let strukt = fx.types.struct_type(Vec::new());
    let ctx = fx.ctx();
    assert_eq!(ctx.type_kind(TypeId::INT).unwrap(), "$kindInt");
    assert_eq!(ctx.type_kind(celsius).unwrap(), "$kindFloat64");
    assert_eq!(ctx.type_kind(strukt).unwrap(), "$kindStruct");
    assert_eq!(ctx.type_kind(fx.types.pointer(strukt)).unwrap(), "$kindPtr");
    assert_eq!(ctx.type_kind(TypeId::ERROR).unwrap(), "$kindInterface");
    assert!(ctx.type_kind(fx.types.tuple(vec![TypeId::INT])).is_err());
}

#[test]
fn wrapped_types() {
    let fx = Fixture::new();
    let array = fx.types.array(TypeId::INT, 2);
    let strukt = fx.types.struct_type(Vec::new());
    assert!(is_wrapped(&fx.types, TypeId::INT));
    assert!(is_wrapped(&fx.types, TypeId::STRING));
    assert!(!is_wrapped(&fx.types, TypeId::INT64));
    assert!(!is_wrapped(&fx.types, TypeId::COMPLEX128));
    assert!(is_wrapped(&fx.types, array));
    assert!(is_wrapped(&fx.types, fx.types.pointer(array)));
    assert!(!is_wrapped(&fx.types, fx.types.pointer(strukt)));
    assert!(!is_wrapped(&fx.types, strukt));
}
