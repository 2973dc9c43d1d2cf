//! The types exposed by the `RustTypes` module.
//!
//! - [`DoubleData`]: plain value type with a default constructor.
//! - [`World`]: a class with mutable state, returned by factories with owned, shared, and
//!   unique ownership.
//! - [`NonCopyable`]: a marker type that can't be duplicated.
//! - [`ImmutableInt64`]: an immutable wrapper around an `i64`.
//! - [`BitsClass`]: a fixed-layout aggregate.

pub mod bits_class;
pub mod double_data;
pub mod immutable_int;
pub mod non_copyable;
pub mod world;

pub use self::{
    bits_class::{get_bits_a, get_bits_b, make_bits, BitsClass},
    double_data::DoubleData,
    immutable_int::ImmutableInt64,
    non_copyable::NonCopyable,
    world::{greet_shared, shared_world_factory, unique_world_factory, world_factory, World},
};
