//! rust_types exposes a handful of Rust types to a host runtime through a registry of modules.
//!
//! The types cover the common ways data crosses a language boundary:
//!
//!  - [`DoubleData`], a plain value type with only a default constructor.
//!  - [`World`], a class with constructors and methods that is returned by factories as an owned
//!    value, as a shared `Arc<World>` and as a unique `Box<World>`.
//!  - [`NonCopyable`], a type that can't be duplicated.
//!  - [`ImmutableInt64`], an immutable value type whose field can be introspected.
//!  - [`BitsClass`], a fixed-layout aggregate that can be copied byte for byte.
//!
//! All of them are registered by [`define_module`], which declares the module `RustTypes` in a
//! [`Registry`]. The registry records every declaration and lets the host call functions by
//! name:
//!
//! ```
//! use rust_types::{define_module, registry::{Registry, Value}, MODULE_NAME};
//!
//! # fn main() -> rust_types::error::RegistryResult<()> {
//! let mut registry = Registry::new();
//! define_module(&mut registry)?;
//!
//! let module = registry.module(MODULE_NAME).unwrap();
//! let mut world = module.call("World", &mut [Value::new(String::from("hi"))])?;
//! let greeting = module.call("greet", std::slice::from_mut(&mut world))?;
//! assert_eq!(greeting.unbox::<String>()?, "hi");
//! # Ok(())
//! # }
//! ```
//!
//! # Julia
//!
//! The `rust_types_jl` crate in this repository exports the same types to Julia with jlrs. After
//! building it the library can be loaded from Julia:
//!
//! ```julia
//! module RustTypes
//! using JlrsCore.Wrap
//!
//! @wrapmodule("./path/to/librust_types_jl.so", :rust_types_init_fn)
//!
//! function __init__()
//!     @initjlrs
//! end
//! end
//! ```
//!
//! # Logging
//!
//! Declarations are logged at the `debug` level and calls at the `trace` level with the
//! `rust_types::registry` target. No subscriber is installed by this crate.

pub mod error;
pub mod registry;
pub mod types;

use crate::error::RegistryResult;
pub use crate::{
    registry::Registry,
    types::{BitsClass, DoubleData, ImmutableInt64, NonCopyable, World},
};

/// The name of the module declared by [`define_module`].
pub const MODULE_NAME: &str = "RustTypes";

/// Declare the `RustTypes` module and all of its types and functions in `registry`.
///
/// Types are declared before the functions that use them. Only `BitsClass`, `make_bits`,
/// `get_bits_a` and `get_bits_b` are exported, everything else must be accessed with a
/// qualified name unless the registry exports all symbols by default.
pub fn define_module(registry: &mut Registry) -> RegistryResult<()> {
    use crate::types::{
        get_bits_a, get_bits_b, greet_shared, make_bits, shared_world_factory,
        unique_world_factory, world_factory,
    };

    let module = registry.create_module(MODULE_NAME)?;

    module
        .add_type::<DoubleData>("DoubleData")?
        .default_constructor()?;

    module
        .add_type::<World>("World")?
        .default_constructor()?
        .constructor(|msg: String| World::new(msg))?
        .method_mut("set", World::set)?
        .method("greet", World::greet)?
        .module()
        .function("world_factory", world_factory)?
        .function("shared_world_factory", shared_world_factory)?
        .function("greet", greet_shared)?
        .function("unique_world_factory", unique_world_factory)?;

    module
        .add_type::<NonCopyable>("NonCopyable")?
        .default_constructor()?;

    module
        .add_immutable::<ImmutableInt64>("ImmutableInt64")?
        .default_constructor()?
        .constructor(ImmutableInt64::new)?
        .method("getvalue", ImmutableInt64::get_value)?
        .module()
        .function("convert", |a: ImmutableInt64| i64::from(a))?
        .function("+", |a: ImmutableInt64, b: ImmutableInt64| a + b)?
        .function("==", |a: ImmutableInt64, b: i64| a == b)?
        .function("==", |b: i64, a: ImmutableInt64| b == a)?;

    module
        .add_bits::<BitsClass>("BitsClass")?
        .module()
        .function("make_bits", make_bits)?
        .function("get_bits_a", get_bits_a)?
        .function("get_bits_b", get_bits_b)?;

    module.export_symbols(["get_bits_a", "get_bits_b", "make_bits"])?;
    module.export_symbols(["BitsClass"])?;

    Ok(())
}
