use super::*;
use pretty_assertions::assert_eq;

use crate::descriptor::NumKind;

#[test]
fn objects_keep_insertion_order() {
    let obj = HostObject::new();
    obj.set("b", HostValue::number(1.0));
    obj.set("a", HostValue::number(2.0));
    obj.set("b", HostValue::number(3.0));
    assert_eq!(obj.keys(), vec!["b".to_owned(), "a".to_owned()]);
    assert_eq!(obj.len(), 2);
    assert!(obj.get("b").is_some_and(|v| v.strict_equals(&HostValue::number(3.0))));
    assert!(obj.get("c").is_none());
}

#[test]
fn missing_properties_are_undefined() {
    let obj = HostValue::object([("x".to_owned(), HostValue::Bool(true))]);
    assert!(matches!(obj.get("x"), HostValue::Bool(true)));
    assert!(matches!(obj.get("y"), HostValue::Undefined));
    assert!(matches!(HostValue::Null.get("x"), HostValue::Undefined));

    let arr = HostValue::array(vec![HostValue::number(4.0)]);
    assert!(matches!(arr.get("0"), HostValue::Number(n) if n == 4.0));
    assert!(matches!(arr.get("1"), HostValue::Undefined));
}

#[test]
fn strict_equality_is_identity_for_references() {
    let a = HostValue::object([]);
    let b = HostValue::object([]);
    assert!(a.strict_equals(&a.clone()));
    assert!(!a.strict_equals(&b));
    assert!(HostValue::string("hi").strict_equals(&HostValue::string("hi")));
    assert!(!HostValue::number(f64::NAN).strict_equals(&HostValue::number(f64::NAN)));
    assert!(!HostValue::Null.strict_equals(&HostValue::Undefined));
}

#[test]
fn typed_views_share_their_buffer() {
    let buffer = NumericBuffer::from_vec(NumKind::I32, vec![1.0, 2.0, 3.0]);
    let view = TypedArray {
        buffer: buffer.clone(),
        offset: 1,
        len: 2,
    };
    view.set(0, 20.0);
    view.set(5, 99.0);
    assert_eq!(buffer.to_vec(), vec![1.0, 20.0, 3.0]);
    assert_eq!(view.to_vec(), vec![20.0, 3.0]);
    assert_eq!(view.get(2), None);
}

#[test]
fn display_strings_follow_host_conversion() {
    assert_eq!(HostValue::number(3.0).to_display_string(), "3");
    assert_eq!(HostValue::number(-0.0).to_display_string(), "0");
    assert_eq!(HostValue::number(2.5).to_display_string(), "2.5");
    assert_eq!(HostValue::number(f64::NEG_INFINITY).to_display_string(), "-Infinity");
    assert_eq!(HostValue::Bool(false).to_display_string(), "false");
    assert_eq!(
        HostValue::array(vec![HostValue::number(1.0), HostValue::Null, HostValue::string("x")])
            .to_display_string(),
        "1,,x"
    );
    assert_eq!(HostValue::object([]).to_display_string(), "[object Object]");
}

#[test]
fn truthiness() {
    assert!(!HostValue::Undefined.truthy());
    assert!(!HostValue::number(0.0).truthy());
    assert!(!HostValue::number(f64::NAN).truthy());
    assert!(!HostValue::string("").truthy());
    assert!(HostValue::string("0").truthy());
    assert!(HostValue::object([]).truthy());
}

#[test]
fn functions_receive_this_and_arguments() {
    let func = HostValue::function(|this, args| {
        Ok(HostValue::array(
            std::iter::once(this.get("base")).chain(args.iter().cloned()).collect(),
        ))
    });
    let HostValue::Function(func) = func else {
        panic!("expected a function");
    };
    let this = HostValue::object([("base".to_owned(), HostValue::string("abc"))]);
    let result = func.call(&this, &[HostValue::Null, HostValue::number(2.0)]).unwrap();
    assert_eq!(result.to_display_string(), "abc,,2");
}
