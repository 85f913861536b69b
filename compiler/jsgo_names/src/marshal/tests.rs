use super::*;
use crate::test_fixture::Fixture;
use pretty_assertions::assert_eq;

#[test]
fn externalize_skips_host_native_kinds() {
    let fx = Fixture::new();
    let mut ctx = fx.ctx();
    assert_eq!(ctx.externalize_site("x", TypeId::INT).unwrap(), "x");
    assert_eq!(ctx.externalize_site("x", TypeId::FLOAT64).unwrap(), "x");
    assert_eq!(ctx.externalize_site("x", TypeId::UINT8).unwrap(), "x");
    assert_eq!(ctx.externalize_site("o", fx.js_object).unwrap(), "o");
    assert_eq!(ctx.externalize_site("nil", TypeId::UNTYPED_NIL).unwrap(), "null");
}

#[test]
fn externalize_calls_the_runtime_otherwise() {
    let fx = Fixture::new();
    let ints = fx.types.slice(TypeId::INT);
    let mut ctx = fx.ctx();
    assert_eq!(ctx.externalize_site("x", TypeId::INT64).unwrap(), "$externalize(x, $Int64)");
    assert_eq!(ctx.externalize_site("s", TypeId::STRING).unwrap(), "$externalize(s, $String)");
    assert_eq!(ctx.externalize_site("b", TypeId::BOOL).unwrap(), "$externalize(b, $Bool)");
    assert_eq!(ctx.externalize_site("xs", ints).unwrap(), "$externalize(xs, sliceType)");
}

#[test]
fn internalize_coerces_scalars_inline() {
    let fx = Fixture::new();
    let mut ctx = fx.ctx();
    assert_eq!(ctx.internalize_site("v", TypeId::BOOL).unwrap(), "!!(v)");
    assert_eq!(ctx.internalize_site("v", TypeId::INT8).unwrap(), "($parseInt(v) << 24 >> 24)");
    assert_eq!(ctx.internalize_site("v", TypeId::UINT8).unwrap(), "($parseInt(v) << 24 >>> 24)");
    assert_eq!(ctx.internalize_site("v", TypeId::INT16).unwrap(), "($parseInt(v) << 16 >> 16)");
    assert_eq!(ctx.internalize_site("v", TypeId::UINT16).unwrap(), "($parseInt(v) << 16 >>> 16)");
    assert_eq!(ctx.internalize_site("v", TypeId::INT).unwrap(), "($parseInt(v) >> 0)");
    assert_eq!(ctx.internalize_site("v", TypeId::UINTPTR).unwrap(), "($parseInt(v) >>> 0)");
    assert_eq!(ctx.internalize_site("v", TypeId::FLOAT32).unwrap(), "$parseFloat(v)");
}

#[test]
fn internalize_calls_the_runtime_otherwise() {
    let fx = Fixture::new();
    let mut ctx = fx.ctx();
    assert_eq!(ctx.internalize_site("o", fx.js_object).unwrap(), "o");
    assert_eq!(ctx.internalize_site("v", TypeId::INT64).unwrap(), "$internalize(v, $Int64)");
    assert_eq!(ctx.internalize_site("v", TypeId::STRING).unwrap(), "$internalize(v, $String)");
    assert_eq!(
        ctx.internalize_site("v", TypeId::EMPTY_INTERFACE).unwrap(),
        "$internalize(v, $emptyInterface)"
    );
}
