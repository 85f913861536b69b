use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn integers_wrap_to_their_width() {
    assert_eq!(wrap_int(&Kind::Int8, 300.0), Some(44));
    assert_eq!(wrap_int(&Kind::Uint8, 300.0), Some(44));
    assert_eq!(wrap_int(&Kind::Int8, 200.0), Some(-56));
    assert_eq!(wrap_int(&Kind::Uint16, -1.0), Some(65535));
    assert_eq!(wrap_int(&Kind::Int32, 2_147_483_648.0), Some(-2_147_483_648));
    assert_eq!(wrap_int(&Kind::Uint32, -1.0), Some(4_294_967_295));
    assert_eq!(wrap_int(&Kind::Int, 4_294_967_297.0), Some(1));
}

#[test]
fn fractions_truncate_toward_zero() {
    assert_eq!(wrap_int(&Kind::Int, 3.9), Some(3));
    assert_eq!(wrap_int(&Kind::Int, -3.9), Some(-3));
    assert_eq!(parse_int(&HostValue::Number(3.9)), 3.0);
}

#[test]
fn non_integer_kinds_do_not_wrap() {
    assert_eq!(wrap_int(&Kind::Float64, 1.0), None);
    assert_eq!(wrap_int(&Kind::Int64, 1.0), None);
    assert_eq!(wrap_int(&Kind::String, 1.0), None);
}

#[test]
fn non_finite_numbers_become_zero() {
    assert_eq!(to_int32(f64::NAN), 0);
    assert_eq!(to_int32(f64::INFINITY), 0);
    assert_eq!(to_int64(f64::NAN), 0);
    assert_eq!(wrap_int(&Kind::Int, parse_int(&HostValue::string("abc"))), Some(0));
}

#[test]
fn parse_int_reads_a_leading_integer() {
    assert_eq!(parse_int(&HostValue::string("  42px")), 42.0);
    assert_eq!(parse_int(&HostValue::string("-17")), -17.0);
    assert_eq!(parse_int(&HostValue::string("0x1F")), 31.0);
    assert!(parse_int(&HostValue::Bool(true)).is_nan());
    assert!(parse_int(&HostValue::Null).is_nan());
    assert!(parse_int(&HostValue::string("")).is_nan());
}

#[test]
fn parse_float_reads_a_leading_decimal() {
    assert_eq!(parse_float(&HostValue::string("2.5e3xyz")), 2500.0);
    assert_eq!(parse_float(&HostValue::string(".5")), 0.5);
    assert_eq!(parse_float(&HostValue::string("-Infinity")), f64::NEG_INFINITY);
    assert_eq!(parse_float(&HostValue::string("1e")), 1.0);
    assert!(parse_float(&HostValue::string(".")).is_nan());
    assert!(parse_float(&HostValue::Undefined).is_nan());
}

#[test]
fn number_follows_host_coercion() {
    assert_eq!(to_number(&HostValue::Null), 0.0);
    assert_eq!(to_number(&HostValue::Bool(true)), 1.0);
    assert_eq!(to_number(&HostValue::string(" 12 ")), 12.0);
    assert_eq!(to_number(&HostValue::string("0x10")), 16.0);
    assert_eq!(to_number(&HostValue::string("")), 0.0);
    assert_eq!(to_number(&HostValue::array(vec![HostValue::number(7.0)])), 7.0);
    assert!(to_number(&HostValue::Undefined).is_nan());
    assert!(to_number(&HostValue::string("12px")).is_nan());
}

#[test]
fn sixty_four_bit_slots_saturate_or_wrap() {
    assert_eq!(to_int64(1e300), i64::MAX);
    assert_eq!(to_int64(-2.7), -2);
    assert_eq!(to_uint64(-1.0), u64::MAX);
    assert_eq!(to_uint64(5.5), 5);
}

proptest! {
    #[test]
    fn int32_values_are_fixed_points(n in any::<i32>()) {
        prop_assert_eq!(to_int32(f64::from(n)), n);
    }

    #[test]
    fn wrapped_values_fit_their_kind(n in -1e12f64..1e12) {
        let i8v = wrap_int(&Kind::Int8, n).unwrap_or_default();
        let u16v = wrap_int(&Kind::Uint16, n).unwrap_or_default();
        prop_assert!((-128..=127).contains(&i8v));
        prop_assert!((0..=65535).contains(&u16v));
    }

    #[test]
    fn integer_strings_parse_exactly(n in -1_000_000_000i64..1_000_000_000) {
        #[expect(clippy::cast_precision_loss, reason = "small test range")]
        let expected = n as f64;
        prop_assert_eq!(parse_int(&HostValue::string(&n.to_string())), expected);
    }
}
