use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rustc_hash::FxHashSet;

#[test]
fn natural_names_count_up() {
    let mut tree = ScopeTree::new(NamingMode::Natural);
    let f = tree.enter(ScopeId::ROOT);
    let names: Vec<_> = (0..3).map(|_| tree.allocate(f, "x", false).unwrap()).collect();
    assert_eq!(names, vec!["x", "x$1", "x$2"]);
    assert_eq!(tree.local_vars(f), names.as_slice());
}

#[test]
fn reserved_words_are_uniquified() {
    let mut tree = ScopeTree::new(NamingMode::Natural);
    assert_eq!(tree.allocate(ScopeId::ROOT, "new", true).unwrap(), "new$1");
    assert_eq!(tree.allocate(ScopeId::ROOT, "delete", true).unwrap(), "delete$1");
}

#[test]
fn empty_name_is_fatal() {
    let mut tree = ScopeTree::new(NamingMode::Natural);
    let err = tree.allocate(ScopeId::ROOT, "", false).unwrap_err();
    assert!(matches!(err.cause_as::<NamingError>(), Some(NamingError::EmptyName)));
}

#[test]
fn child_scope_sees_names_of_parent_at_entry() {
    let mut tree = ScopeTree::new(NamingMode::Natural);
    let outer = tree.enter(ScopeId::ROOT);
    assert_eq!(tree.allocate(outer, "v", false).unwrap(), "v");
    let inner = tree.enter(outer);
    assert_eq!(tree.allocate(inner, "v", false).unwrap(), "v$1");
    // Siblings of `inner` do not see its locals.
    let sibling = tree.enter(outer);
    assert_eq!(tree.allocate(sibling, "v", false).unwrap(), "v$1");
}

#[test]
fn module_level_allocation_reserves_in_ancestors_not_locals() {
    let mut tree = ScopeTree::new(NamingMode::Natural);
    let f = tree.enter(ScopeId::ROOT);
    let g = tree.enter(f);
    assert_eq!(tree.allocate(g, "sliceType", true).unwrap(), "sliceType");
    assert!(tree.local_vars(g).is_empty());
    assert_eq!(tree.usage_count(ScopeId::ROOT, "sliceType"), 1);
    assert_eq!(tree.usage_count(f, "sliceType"), 1);
    assert_eq!(tree.allocate(ScopeId::ROOT, "sliceType", true).unwrap(), "sliceType$1");
}

#[test]
fn assigned_names_prefer_outermost() {
    let mut tree = ScopeTree::new(NamingMode::Natural);
    let f = tree.enter(ScopeId::ROOT);
    let obj = ObjectId::new(7);
    tree.record_name(f, obj, "local".to_owned());
    tree.record_name(ScopeId::ROOT, obj, "global".to_owned());
    assert_eq!(tree.assigned_name(f, obj), Some("global"));
    assert_eq!(tree.assigned_name(ScopeId::ROOT, ObjectId::new(8)), None);
}

#[test]
fn take_locals_empties_scope() {
    let mut tree = ScopeTree::new(NamingMode::Natural);
    let f = tree.enter(ScopeId::ROOT);
    tree.allocate(f, "a", false).unwrap();
    tree.allocate(f, "b", false).unwrap();
    assert_eq!(tree.take_locals(f), vec!["a", "b"]);
    assert!(tree.local_vars(f).is_empty());
}

#[test]
fn minified_sequence_shape() {
    assert_eq!(minified_name(0, false), "a");
    assert_eq!(minified_name(25, false), "z");
    assert_eq!(minified_name(26, false), "aa");
    assert_eq!(minified_name(27, true), "AB");
    assert_eq!(minified_name(26 + 26 * 26, true), "AAA");
}

#[test]
fn minified_allocation_skips_taken_names() {
    let mut tree = ScopeTree::new(NamingMode::Minified);
    let f = tree.enter(ScopeId::ROOT);
    let taken: Vec<_> = (0..118).map(|_| tree.allocate(f, "ignored", false).unwrap()).collect();
    // 118 lowercase names fit before the reserved word `do`.
    assert_eq!(taken.last().map(String::as_str), Some("dn"));
    assert_eq!(tree.allocate(f, "ignored", false).unwrap(), "dp");
}

proptest! {
    #[test]
    fn natural_names_are_pairwise_distinct(
        proposals in prop::collection::vec("[a-c]{1,2}|new|x\\$1", 1..60),
    ) {
        let mut tree = ScopeTree::new(NamingMode::Natural);
        let f = tree.enter(ScopeId::ROOT);
        let mut seen = FxHashSet::default();
        for p in &proposals {
            let name = tree.allocate(f, p, false).unwrap();
            prop_assert!(seen.insert(name.clone()), "duplicate {}", name);
        }
    }

    #[test]
    fn module_level_minified_matches_sequence(k in 0usize..200) {
        let mut tree = ScopeTree::new(NamingMode::Minified);
        let mut last = String::new();
        for _ in 0..=k {
            last = tree.allocate(ScopeId::ROOT, "v", true).unwrap();
        }
        prop_assert_eq!(last, minified_name(k as u64, true));
    }

    #[test]
    fn function_level_minified_matches_sequence(k in 0usize..118) {
        let mut tree = ScopeTree::new(NamingMode::Minified);
        let f = tree.enter(ScopeId::ROOT);
        let mut last = String::new();
        for _ in 0..=k {
            last = tree.allocate(f, "v", false).unwrap();
        }
        prop_assert_eq!(last, minified_name(k as u64, false));
    }
}
