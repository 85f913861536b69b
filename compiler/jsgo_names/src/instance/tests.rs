use super::*;
use jsgo_ir::Universe;
use jsgo_types::TypeInterner;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use smallvec::smallvec;

#[test]
fn trivial_instances() {
    let inst = Instance::trivial(ObjectId::new(3));
    assert!(inst.is_trivial());
    assert!(!Instance::new(ObjectId::new(3), smallvec![TypeId::INT], TypeList::new()).is_trivial());
    assert!(!Instance::new(ObjectId::new(3), TypeList::new(), smallvec![TypeId::INT]).is_trivial());
}

#[test]
fn ids_are_per_object_and_first_use_wins() {
    let mut set = InstanceSet::new();
    let f = ObjectId::new(1);
    let g = ObjectId::new(2);
    let f_int = Instance::new(f, smallvec![TypeId::INT], TypeList::new());
    let f_str = Instance::new(f, smallvec![TypeId::STRING], TypeList::new());
    let g_int = Instance::new(g, smallvec![TypeId::INT], TypeList::new());

    assert_eq!(set.id(&f_str), 0);
    assert_eq!(set.id(&f_int), 1);
    assert_eq!(set.id(&g_int), 0);
    assert_eq!(set.id(&f_str), 0);
    assert_eq!(set.for_object(f), &[f_str, f_int][..]);
    assert_eq!(set.len(), 3);
    assert_eq!(set.for_object(ObjectId::new(9)), &[][..]);
}

#[test]
fn nesting_arguments_are_part_of_identity() {
    let mut set = InstanceSet::new();
    let local_type = ObjectId::new(4);
    let a = Instance::new(local_type, TypeList::new(), smallvec![TypeId::INT]);
    let b = Instance::new(local_type, TypeList::new(), smallvec![TypeId::UINT]);
    assert_ne!(set.id(&a), set.id(&b));
}

#[test]
fn label_separates_nesting_and_direct_arguments() {
    let universe = Universe::new();
    let types = TypeInterner::new();
    let fmt = TypeFormatter::new(&types, &universe);
    let inst = Instance::new(
        ObjectId::new(1),
        smallvec![types.slice(TypeId::UINT8)],
        smallvec![TypeId::INT, TypeId::STRING],
    );
    assert_eq!(inst.type_params_string(&fmt), "int, string; []uint8");
    let direct = Instance::new(ObjectId::new(1), smallvec![TypeId::BOOL], TypeList::new());
    assert_eq!(direct.type_params_string(&fmt), "bool");
}

fn arb_types() -> impl Strategy<Value = Vec<TypeId>> {
    prop::collection::vec(
        prop::sample::select(vec![TypeId::INT, TypeId::STRING, TypeId::BOOL, TypeId::FLOAT64]),
        0..3,
    )
}

proptest! {
    #[test]
    fn equal_tuples_share_ids_and_distinct_tuples_do_not(
        obj in 0u32..3, a in arb_types(), n in arb_types(),
        obj2 in 0u32..3, a2 in arb_types(), n2 in arb_types(),
    ) {
        let mut set = InstanceSet::new();
        let x = Instance::new(ObjectId::new(obj), a.into_iter().collect(), n.into_iter().collect());
        let y = Instance::new(ObjectId::new(obj2), a2.into_iter().collect(), n2.into_iter().collect());
        let id_x = set.id(&x);
        let id_y = set.id(&y);
        prop_assert_eq!(set.id(&x), id_x);
        if x == y {
            prop_assert_eq!(id_x, id_y);
        } else if x.object == y.object {
            prop_assert_ne!(id_x, id_y);
        }
    }
}
