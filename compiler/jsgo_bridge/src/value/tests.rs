use super::*;
use pretty_assertions::assert_eq;

#[test]
fn numeric_buffers_normalize_on_write() {
    let buffer = NumericBuffer::from_vec(NumKind::U8, vec![300.0, -1.0, 3.9]);
    assert_eq!(buffer.to_vec(), vec![44.0, 255.0, 3.0]);
    buffer.set(0, 256.0);
    assert_eq!(buffer.get(0), 0.0);
    assert_eq!(buffer.get(10), 0.0);
}

#[test]
fn deep_copies_do_not_share() {
    let buffer = NumericBuffer::from_vec(NumKind::F64, vec![1.5]);
    let copy = buffer.deep_copy();
    copy.set(0, 2.5);
    assert_eq!(buffer.get(0), 1.5);
    assert!(!buffer.ptr_eq(&copy));
    assert!(buffer.ptr_eq(&buffer.clone()));
}

#[test]
fn sub_slices_share_the_store() {
    let Value::Slice(Some(slice)) = Value::slice(Store::boxed(vec![
        Value::int(1),
        Value::int(2),
        Value::int(3),
    ])) else {
        panic!("expected a slice");
    };
    let tail = slice.sub(1, 10);
    assert_eq!(tail.len, 2);
    tail.set(0, Value::int(20));
    assert_eq!(slice.get(1).and_then(|v| v.as_int()), Some(20));
    assert!(tail.get(2).is_none());
}

#[test]
fn struct_pointers_are_the_struct_object() {
    let ptr = Value::struct_ptr(DescId::from_index(DescId::FIRST_PROGRAM), vec![Value::int(1)]);
    let target = match &ptr {
        Value::Ptr(Some(p)) => p.load(),
        other => panic!("expected a pointer, got {other:?}"),
    };
    assert_eq!(ptr.identity(), target.identity());
    if let Some(obj) = target.as_struct() {
        obj.borrow_mut().fields[0] = Value::int(7);
    }
    let fields = ptr.as_struct().map(|obj| obj.borrow().fields.clone());
    assert_eq!(fields.and_then(|f| f[0].as_int()), Some(7));
}

#[test]
fn cell_pointers_load_and_store() {
    let Value::Ptr(Some(ptr)) = Value::cell_ptr(Value::string("a")) else {
        panic!("expected a pointer");
    };
    ptr.store(Value::string("b"));
    assert_eq!(ptr.load().as_bytes(), Some(&b"b"[..]));
}

#[test]
fn map_keys_compare_by_value() {
    let mut map = MapObject::new();
    map.insert(Value::string("k"), Value::int(1)).unwrap();
    map.insert(Value::string("k"), Value::int(2)).unwrap();
    map.insert(Value::float(0.0), Value::int(3)).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&Value::string("k")).unwrap().and_then(|v| v.as_int()), Some(2));
    assert_eq!(map.get(&Value::float(-0.0)).unwrap().and_then(|v| v.as_int()), Some(3));

    assert_eq!(map.remove(&Value::string("k")).unwrap().and_then(|v| v.as_int()), Some(2));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&Value::float(0.0)).unwrap().and_then(|v| v.as_int()), Some(3));
}

#[test]
fn interface_keys_include_the_dynamic_type() {
    let a = MapKey::of(&Value::boxed(DescId::INT, Value::int(1))).unwrap();
    let b = MapKey::of(&Value::boxed(DescId::INT32, Value::int(1))).unwrap();
    assert_ne!(a, b);
    assert_eq!(MapKey::of(&Value::nil_iface()).unwrap(), MapKey::Nil);
}

#[test]
fn unhashable_keys_fail() {
    let err = MapKey::of(&Value::boxed_slice(Vec::new())).unwrap_err();
    assert!(matches!(
        err.cause_as::<ConversionError>(),
        Some(ConversionError::UnhashableKey(shape)) if shape == "slice"
    ));
    let mut map = MapObject::new();
    assert!(map.insert(Value::map(MapObject::new()), Value::int(1)).is_err());
}

#[test]
fn nil_values() {
    assert!(Value::Slice(None).is_nil());
    assert!(Value::nil_iface().is_nil());
    assert!(Value::Host(HostValue::Null).is_nil());
    assert!(!Value::Host(HostValue::Undefined).is_nil());
    assert!(!Value::int(0).is_nil());
}

#[test]
fn compiled_functions_call_their_body() {
    let func = CompiledFunc::new(|args| Ok(args.iter().rev().cloned().collect()));
    let results = func.call(&[Value::int(1), Value::int(2)]).unwrap();
    assert_eq!(results.first().and_then(Value::as_int), Some(2));
    assert_eq!(results.len(), 2);
}
