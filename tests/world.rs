mod util;

use std::{slice, sync::Arc};

use rust_types::{
    error::{CallError, RegistryError},
    registry::{Ownership, Value},
    World, MODULE_NAME,
};
use util::REGISTRY;

fn greet(value: &mut Value) -> String {
    REGISTRY.with(|r| {
        let registry = r.borrow();
        let module = registry.module(MODULE_NAME).unwrap();
        module
            .call("greet", slice::from_mut(value))
            .unwrap()
            .unbox::<String>()
            .unwrap()
    })
}

fn call(name: &str, args: &mut [Value]) -> Value {
    REGISTRY.with(|r| {
        let registry = r.borrow();
        let module = registry.module(MODULE_NAME).unwrap();
        module.call(name, args).unwrap()
    })
}

#[test]
fn default_constructor() {
    let mut world = call("World", &mut []);
    assert!(world.is::<World>());
    assert_eq!(greet(&mut world), "default hello");
}

#[test]
fn set_replaces_message() {
    let mut args = [
        call("World", &mut [Value::new(String::from("first"))]),
        Value::new(String::from("second")),
    ];
    assert_eq!(greet(&mut args[0]), "first");

    assert!(call("set", &mut args).is_nothing());
    assert_eq!(greet(&mut args[0]), "second");
}

#[test]
fn factories_use_ownership_modes() {
    REGISTRY.with(|r| {
        let registry = r.borrow();
        let module = registry.module(MODULE_NAME).unwrap();

        let cases = [
            ("world_factory", "factory hello", Ownership::Owned),
            ("shared_world_factory", "shared factory hello", Ownership::Shared),
            ("unique_world_factory", "unique factory hello", Ownership::Unique),
        ];

        for (factory, msg, ownership) in cases {
            let mut world = module.call(factory, &mut []).unwrap();
            assert_eq!(module.ownership_of(&world), Some(ownership));
            assert_eq!(module.julia_type_name(&world), Some("World"));

            let greeting = module.call("greet", slice::from_mut(&mut world)).unwrap();
            assert_eq!(greeting.unbox::<String>().unwrap(), msg);
        }
    });
}

#[test]
fn shared_greet_keeps_refcount() {
    let shared = call("shared_world_factory", &mut [])
        .into_inner::<Arc<World>>()
        .unwrap();
    let outside = shared.clone();

    let mut value = Value::new(shared);
    assert_eq!(greet(&mut value), outside.greet());
    assert_eq!(Arc::strong_count(&outside), 2);

    drop(value);
    assert_eq!(Arc::strong_count(&outside), 1);
}

#[test]
fn unique_world_is_mutable() {
    let mut args = [
        call("unique_world_factory", &mut []),
        Value::new(String::from("changed")),
    ];
    call("set", &mut args);
    assert_eq!(greet(&mut args[0]), "changed");
}

#[test]
fn shared_world_cant_be_set() {
    REGISTRY.with(|r| {
        let registry = r.borrow();
        let module = registry.module(MODULE_NAME).unwrap();

        let mut args = [
            module.call("shared_world_factory", &mut []).unwrap(),
            Value::new(String::from("changed")),
        ];
        let err = module.call("set", &mut args).unwrap_err();
        assert!(matches!(
            *err,
            RegistryError::CallError(CallError::NoMatchingOverload { ref arg_types, .. })
                if arg_types == "World, String"
        ));
    });
}

#[test]
fn dropping_value_drops_world() {
    let shared = Arc::new(World::new("temporary"));
    let weak = Arc::downgrade(&shared);

    let value = Value::new(shared);
    assert!(weak.upgrade().is_some());

    drop(value);
    assert!(weak.upgrade().is_none());
}

#[test]
fn unknown_function() {
    REGISTRY.with(|r| {
        let registry = r.borrow();
        let module = registry.module(MODULE_NAME).unwrap();

        let err = module.call("farewell", &mut []).unwrap_err();
        assert!(matches!(
            *err,
            RegistryError::CallError(CallError::FunctionNotFound { .. })
        ));
    });
}
