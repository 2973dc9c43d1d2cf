//! Export the types of `rust_types` to Julia.
//!
//! Opaque types are wrapped in a newtype that implements `OpaqueType`, `ImmutableInt64` and
//! `BitsClass` are isbits types that are defined in `RustTypes.jl` and mapped to Rust with the
//! derive macros. The Julia module must define those two structs before `@wrapmodule` is called.

use std::sync::Arc;

use jlrs::{
    data::{
        managed::{
            string::StringRet,
            value::typed::{TypedValue, TypedValueRet},
        },
        types::foreign_type::OpaqueType,
    },
    prelude::*,
};
use rust_types::types;

/// Plain value type with only a default constructor.
pub struct DoubleData(types::DoubleData);

unsafe impl OpaqueType for DoubleData {}

impl DoubleData {
    fn new() -> TypedValueRet<DoubleData> {
        unsafe {
            CCall::invoke(|mut frame| {
                TypedValue::new(&mut frame, DoubleData(types::DoubleData::default())).leak()
            })
        }
    }
}

/// A `World` owned by Julia.
pub struct World(types::World);

unsafe impl OpaqueType for World {}

impl World {
    fn new(msg: JuliaString) -> TypedValueRet<World> {
        let msg = String::from_utf8_lossy(msg.as_bytes()).into_owned();
        unsafe { leak_world(types::World::new(msg)) }
    }

    fn new_default() -> TypedValueRet<World> {
        unsafe { leak_world(types::World::default()) }
    }

    fn set(&mut self, msg: JuliaString) {
        self.0.set(String::from_utf8_lossy(msg.as_bytes()).into_owned())
    }

    fn greet(&self) -> StringRet {
        unsafe { leak_string(self.0.greet()) }
    }
}

/// A reference-counted `World`, Julia owns one of its references.
pub struct SharedWorld(Arc<types::World>);

unsafe impl OpaqueType for SharedWorld {}

impl SharedWorld {
    fn greet(&self) -> StringRet {
        unsafe { leak_string(types::greet_shared(self.0.clone())) }
    }
}

pub struct NonCopyable(types::NonCopyable);

unsafe impl OpaqueType for NonCopyable {}

impl NonCopyable {
    fn new() -> TypedValueRet<NonCopyable> {
        unsafe {
            CCall::invoke(|mut frame| {
                TypedValue::new(&mut frame, NonCopyable(types::NonCopyable::default())).leak()
            })
        }
    }
}

#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Unbox,
    ValidLayout,
    Typecheck,
    IntoJulia,
    ValidField,
    IsBits,
    ConstructType,
    CCallArg,
    CCallReturn,
)]
#[jlrs(julia_type = "Main.RustTypes.ImmutableInt64")]
pub struct ImmutableInt64 {
    pub value: i64,
}

impl From<types::ImmutableInt64> for ImmutableInt64 {
    fn from(value: types::ImmutableInt64) -> Self {
        ImmutableInt64 {
            value: value.get_value(),
        }
    }
}

impl From<ImmutableInt64> for types::ImmutableInt64 {
    fn from(value: ImmutableInt64) -> Self {
        types::ImmutableInt64::new(value.value)
    }
}

#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Unbox,
    ValidLayout,
    Typecheck,
    IntoJulia,
    ValidField,
    IsBits,
    ConstructType,
    CCallArg,
    CCallReturn,
)]
#[jlrs(julia_type = "Main.RustTypes.BitsClass")]
pub struct BitsClass {
    pub a: f64,
    pub b: i64,
}

impl From<types::BitsClass> for BitsClass {
    fn from(bits: types::BitsClass) -> Self {
        BitsClass {
            a: bits.a,
            b: bits.get_b(),
        }
    }
}

impl From<BitsClass> for types::BitsClass {
    fn from(bits: BitsClass) -> Self {
        types::BitsClass::new(bits.a, bits.b)
    }
}

unsafe fn leak_world(world: types::World) -> TypedValueRet<World> {
    CCall::invoke(|mut frame| TypedValue::new(&mut frame, World(world)).leak())
}

unsafe fn leak_string(s: String) -> StringRet {
    CCall::invoke(|mut frame| JuliaString::new(&mut frame, s).leak())
}

fn world_factory() -> TypedValueRet<World> {
    unsafe { leak_world(types::world_factory()) }
}

fn shared_world_factory() -> TypedValueRet<SharedWorld> {
    let world = types::shared_world_factory();
    unsafe { CCall::invoke(|mut frame| TypedValue::new(&mut frame, SharedWorld(world)).leak()) }
}

fn unique_world_factory() -> TypedValueRet<World> {
    let world = types::unique_world_factory();
    unsafe { leak_world(*world) }
}

fn getvalue(int: ImmutableInt64) -> i64 {
    types::ImmutableInt64::from(int).get_value()
}

fn to_int64(int: ImmutableInt64) -> i64 {
    i64::from(types::ImmutableInt64::from(int))
}

fn add(a: ImmutableInt64, b: ImmutableInt64) -> ImmutableInt64 {
    (types::ImmutableInt64::from(a) + types::ImmutableInt64::from(b)).into()
}

fn is_equal(a: ImmutableInt64, b: i64) -> Bool {
    Bool::new(types::ImmutableInt64::from(a) == b)
}

fn make_bits(a: f64, b: i64) -> BitsClass {
    types::make_bits(a, b).into()
}

fn get_bits_a(bits: BitsClass) -> f64 {
    types::get_bits_a(bits.into())
}

fn get_bits_b(bits: BitsClass) -> i64 {
    types::get_bits_b(bits.into())
}

julia_module! {
    become rust_types_init_fn;

    struct DoubleData;
    in DoubleData fn new() -> TypedValueRet<DoubleData> as DoubleData;

    struct World;
    in World fn new_default() -> TypedValueRet<World> as World;
    in World fn new(msg: JuliaString) -> TypedValueRet<World> as World;
    in World fn set(&mut self, msg: JuliaString) as set!;
    in World fn greet(&self) -> StringRet as greet;

    fn world_factory() -> TypedValueRet<World>;
    fn unique_world_factory() -> TypedValueRet<World>;

    struct SharedWorld;
    fn shared_world_factory() -> TypedValueRet<SharedWorld>;
    in SharedWorld fn greet(&self) -> StringRet as greet;

    struct NonCopyable;
    in NonCopyable fn new() -> TypedValueRet<NonCopyable> as NonCopyable;

    fn getvalue(int: ImmutableInt64) -> i64;
    fn to_int64(int: ImmutableInt64) -> i64;
    fn add(a: ImmutableInt64, b: ImmutableInt64) -> ImmutableInt64;
    fn is_equal(a: ImmutableInt64, b: i64) -> Bool;

    fn make_bits(a: f64, b: i64) -> BitsClass;
    fn get_bits_a(bits: BitsClass) -> f64;
    fn get_bits_b(bits: BitsClass) -> i64;
}
