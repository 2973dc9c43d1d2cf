mod util;

use rust_types::{
    error::{CallError, RegistryError},
    registry::Value,
    BitsClass, DoubleData, ImmutableInt64, NonCopyable, MODULE_NAME,
};
use util::REGISTRY;

fn call(name: &str, args: &mut [Value]) -> Value {
    REGISTRY.with(|r| {
        let registry = r.borrow();
        let module = registry.module(MODULE_NAME).unwrap();
        module.call(name, args).unwrap()
    })
}

fn int(value: i64) -> Value {
    call("ImmutableInt64", &mut [Value::new(value)])
}

#[test]
fn immutable_int_constructors() {
    let zero = call("ImmutableInt64", &mut []);
    assert_eq!(zero.unbox::<ImmutableInt64>().unwrap(), 0i64);

    let mut args = [int(42)];
    let value = call("getvalue", &mut args);
    assert_eq!(value.unbox::<i64>().unwrap(), 42);
}

#[test]
fn immutable_int_operators() {
    let mut args = [int(2), int(3)];
    let sum = call("+", &mut args);
    assert_eq!(sum.unbox::<ImmutableInt64>().unwrap().get_value(), 5);
    assert_eq!(args[0].unbox::<ImmutableInt64>().unwrap(), 2i64);

    let eq = call("==", &mut [int(2), Value::new(2i64)]);
    assert!(eq.unbox::<bool>().unwrap());

    let eq = call("==", &mut [Value::new(3i64), int(2)]);
    assert!(!eq.unbox::<bool>().unwrap());

    let converted = call("convert", &mut [int(-7)]);
    assert_eq!(converted.unbox::<i64>().unwrap(), -7);
}

#[test]
fn immutable_int_equality_needs_an_int() {
    REGISTRY.with(|r| {
        let registry = r.borrow();
        let module = registry.module(MODULE_NAME).unwrap();

        let err = module
            .call("==", &mut [int(2), Value::new(2.0f64)])
            .unwrap_err();
        assert!(matches!(
            *err,
            RegistryError::CallError(CallError::NoMatchingOverload { ref arg_types, .. })
                if arg_types == "ImmutableInt64, Float64"
        ));
    });
}

#[test]
fn bits_round_trip() {
    let bits = call("make_bits", &mut [Value::new(0.25f64), Value::new(9i64)]);
    assert_eq!(bits.unbox::<BitsClass>().unwrap(), BitsClass::new(0.25, 9));

    let mut args = [bits];
    assert_eq!(call("get_bits_a", &mut args).unbox::<f64>().unwrap(), 0.25);
    assert_eq!(call("get_bits_b", &mut args).unbox::<i64>().unwrap(), 9);
}

#[test]
fn non_copyable_can_be_constructed() {
    REGISTRY.with(|r| {
        let registry = r.borrow();
        let module = registry.module(MODULE_NAME).unwrap();

        let value = module.call("NonCopyable", &mut []).unwrap();
        assert!(value.is::<NonCopyable>());
        assert_eq!(module.julia_type_name(&value), Some("NonCopyable"));
        assert!(value.into_inner::<NonCopyable>().is_ok());
    });
}

#[test]
fn double_data_is_opaque() {
    REGISTRY.with(|r| {
        let registry = r.borrow();
        let module = registry.module(MODULE_NAME).unwrap();

        let value = Value::new(DoubleData { a: [1.0; 4] });
        assert_eq!(module.julia_type_name(&value), Some("DoubleData"));
        assert!(module.type_info_of::<DoubleData>().unwrap().kind().fields().is_empty());

        let overloads = module.overloads("DoubleData").unwrap();
        assert_eq!(overloads.len(), 1);
        assert_eq!(overloads[0].signature().arity(), 0);

        let data = module.call("DoubleData", &mut []).unwrap();
        assert_eq!(data.unbox::<DoubleData>().unwrap(), DoubleData::default());
    });
}

#[test]
fn overloads_check_argument_count() {
    REGISTRY.with(|r| {
        let registry = r.borrow();
        let module = registry.module(MODULE_NAME).unwrap();
        let make_bits = &module.overloads("make_bits").unwrap()[0];

        let err = make_bits.call(&mut [Value::new(1.0f64)]).unwrap_err();
        assert_eq!(
            *err,
            RegistryError::CallError(CallError::WrongArity {
                expected: 2,
                found: 1
            })
        );

        let err = module.call("make_bits", &mut [Value::new(1.0f64)]).unwrap_err();
        assert!(matches!(
            *err,
            RegistryError::CallError(CallError::NoMatchingOverload { .. })
        ));
    });
}
