use super::*;
use pretty_assertions::assert_eq;

#[test]
fn intern_and_lookup() {
    let interner = StringInterner::new();

    let hello = interner.intern("hello");
    let world = interner.intern("world");
    let hello2 = interner.intern("hello");

    assert_eq!(hello, hello2);
    assert_ne!(hello, world);
    assert_eq!(interner.lookup(hello), "hello");
    assert_eq!(interner.lookup(world), "world");
}

#[test]
fn empty_string_is_name_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn predeclared_identifiers_are_already_present() {
    let interner = StringInterner::new();
    let before = interner.len();
    interner.intern("error");
    interner.intern("uintptr");
    assert_eq!(interner.len(), before);
    assert!(!interner.is_empty());
    assert_eq!(interner.lookup(interner.intern("Object")), "Object");
}

#[test]
fn non_ascii_identifiers_round_trip() {
    let interner = StringInterner::new();
    let name = interner.intern("größe·func1");
    assert_eq!(interner.lookup(name), "größe·func1");
}

#[test]
fn concurrent_interning_agrees() {
    let interner = StringInterner::new();
    let names: Vec<Name> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| interner.intern("shared")))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(Name::EMPTY))
            .collect()
    });
    assert!(names.windows(2).all(|w| w[0] == w[1]));
    assert_ne!(names[0], Name::EMPTY);
}

