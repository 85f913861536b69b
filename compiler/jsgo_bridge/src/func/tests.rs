use pretty_assertions::assert_eq;

use crate::test_fixture::Fixture;
use crate::{
    CompiledFunc, ConversionError, HostFunction, HostValue, NumKind, NumericBuffer, Store, Value,
};

fn host_function(host: &HostValue) -> &HostFunction {
    match host {
        HostValue::Function(func) => func,
        other => panic!("expected a function, got {other:?}"),
    }
}

fn add_one() -> Value {
    Value::func(CompiledFunc::new(|args| {
        let n = args.first().and_then(Value::as_int).unwrap_or_default();
        Ok(vec![Value::int(n + 1)])
    }))
}

#[test]
fn the_same_function_gets_the_same_wrapper() {
    let fx = Fixture::new();
    let func = add_one();
    let first = fx.bridge.externalize(&func, fx.func_int_int, None).unwrap();
    let second = fx.bridge.externalize(&func, fx.func_int_int, None).unwrap();
    assert!(first.strict_equals(&second));

    let other = fx.bridge.externalize(&add_one(), fx.func_int_int, None).unwrap();
    assert!(!first.strict_equals(&other));
}

#[test]
fn wrappers_convert_arguments_and_results() {
    let fx = Fixture::new();
    let host = fx.bridge.externalize(&add_one(), fx.func_int_int, None).unwrap();
    let call = host_function(&host);

    let result = call.call(&HostValue::Undefined, &[HostValue::number(41.9)]).unwrap();
    assert!(result.strict_equals(&HostValue::number(42.0)));

    // A missing argument arrives as undefined, which parses to zero.
    let result = call.call(&HostValue::Undefined, &[]).unwrap();
    assert!(result.strict_equals(&HostValue::number(1.0)));
}

#[test]
fn trailing_host_arguments_fill_the_variadic_slice() {
    let fx = Fixture::new();
    let sum = Value::func(CompiledFunc::new(|args| {
        let prefix = args.first().and_then(Value::as_bytes).map_or(0, <[u8]>::len);
        let rest: i64 = args
            .get(1)
            .and_then(Value::as_slice)
            .map(|slice| slice.to_vec().iter().filter_map(Value::as_int).sum())
            .unwrap_or_default();
        Ok(vec![Value::int(rest + i64::try_from(prefix).unwrap_or_default())])
    }));
    let host = fx.bridge.externalize(&sum, fx.func_variadic, None).unwrap();
    let call = host_function(&host);

    let args = [
        HostValue::string("ab"),
        HostValue::number(1.0),
        HostValue::number(2.0),
        HostValue::number(3.0),
    ];
    let result = call.call(&HostValue::Undefined, &args).unwrap();
    assert!(result.strict_equals(&HostValue::number(8.0)));

    let result = call.call(&HostValue::Undefined, &[HostValue::string("ab")]).unwrap();
    assert!(result.strict_equals(&HostValue::number(2.0)));
}

#[test]
fn several_results_become_an_array() {
    let fx = Fixture::new();
    let pair = Value::func(CompiledFunc::new(|_| Ok(vec![Value::int(1), Value::string("a")])));
    let host = fx.bridge.externalize(&pair, fx.func_pair, None).unwrap();
    let result = host_function(&host).call(&HostValue::Undefined, &[]).unwrap();
    assert_eq!(result.to_display_string(), "1,a");
}

#[test]
fn wrong_result_count_is_fatal() {
    let fx = Fixture::new();
    let broken = Value::func(CompiledFunc::new(|_| Ok(Vec::new())));
    let host = fx.bridge.externalize(&broken, fx.func_int_int, None).unwrap();
    let err = host_function(&host)
        .call(&HostValue::Undefined, &[HostValue::number(1.0)])
        .unwrap_err();
    assert!(matches!(
        err.cause_as::<ConversionError>(),
        Some(ConversionError::ValueMismatch { .. })
    ));
}

#[test]
fn host_functions_are_called_with_the_bound_receiver() {
    let fx = Fixture::new();
    let host = HostValue::function(|this, args| {
        let base = match this.get("base") {
            HostValue::Number(n) => n,
            _ => 0.0,
        };
        match args.first() {
            Some(HostValue::Number(n)) => Ok(HostValue::number(base + n + 0.7)),
            _ => Ok(HostValue::Undefined),
        }
    });
    let recv = HostValue::object([("base".to_owned(), HostValue::number(10.0))]);

    let func = fx.bridge.internalize(&host, fx.func_int_int, Some(&recv)).unwrap();
    let results = func.as_func().unwrap().call(&[Value::int(5)]).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].as_int(), Some(15));

    let unbound = fx.bridge.internalize(&host, fx.func_int_int, None).unwrap();
    let results = unbound.as_func().unwrap().call(&[Value::int(5)]).unwrap();
    assert_eq!(results[0].as_int(), Some(5));
}

#[test]
fn variadic_slices_are_spread_for_the_host() {
    let fx = Fixture::new();
    let host = HostValue::function(|_, args| {
        Ok(HostValue::number(f64::from(
            u32::try_from(args.len()).unwrap_or_default(),
        )))
    });
    let func = fx.bridge.internalize(&host, fx.func_variadic, None).unwrap();
    let nums = Value::slice(Store::Numeric(NumericBuffer::from_vec(
        NumKind::I32,
        vec![1.0, 2.0],
    )));
    let results = func
        .as_func()
        .unwrap()
        .call(&[Value::string("x"), nums])
        .unwrap();
    assert_eq!(results[0].as_int(), Some(3));
}

#[test]
fn variadic_argument_must_be_a_slice() {
    let fx = Fixture::new();
    let host = HostValue::function(|_, args| {
        Ok(HostValue::number(f64::from(
            u32::try_from(args.len()).unwrap_or_default(),
        )))
    });
    let func = fx.bridge.internalize(&host, fx.func_variadic, None).unwrap();
    let func = func.as_func().unwrap();

    let results = func.call(&[Value::string("x"), Value::Slice(None)]).unwrap();
    assert_eq!(results[0].as_int(), Some(1));

    let err = func.call(&[Value::string("x"), Value::int(7)]).unwrap_err();
    assert!(matches!(
        err.cause_as::<ConversionError>(),
        Some(ConversionError::ValueMismatch { expected: "variadic slice", .. })
    ));
}

#[test]
fn host_arrays_fill_several_results() {
    let fx = Fixture::new();
    let host = HostValue::function(|_, _| {
        Ok(HostValue::array(vec![HostValue::number(2.0), HostValue::string("b")]))
    });
    let func = fx.bridge.internalize(&host, fx.func_pair, None).unwrap();
    let results = func.as_func().unwrap().call(&[]).unwrap();
    assert_eq!(results[0].as_int(), Some(2));
    assert_eq!(results[1].as_bytes(), Some(&b"b"[..]));
}

#[test]
fn nullish_and_non_functions() {
    let fx = Fixture::new();
    let nil = fx.bridge.internalize(&HostValue::Null, fx.func_int_int, None).unwrap();
    assert!(nil.is_nil());

    let err = fx
        .bridge
        .internalize(&HostValue::number(1.0), fx.func_int_int, None)
        .unwrap_err();
    assert!(matches!(
        err.cause_as::<ConversionError>(),
        Some(ConversionError::UnexpectedHostValue { host: "number", .. })
    ));
}

#[test]
fn functions_round_trip_through_the_host() {
    let fx = Fixture::new();
    let host = fx.bridge.externalize(&add_one(), fx.func_int_int, None).unwrap();
    let back = fx.bridge.internalize(&host, fx.func_int_int, None).unwrap();
    let results = back.as_func().unwrap().call(&[Value::int(9)]).unwrap();
    assert_eq!(results[0].as_int(), Some(10));
}
