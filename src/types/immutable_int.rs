//! An immutable wrapper around an `i64`.

use std::{mem::offset_of, ops::Add};

use crate::registry::{FieldDesc, Immutable};

/// An `i64` that can't be changed after construction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImmutableInt64 {
    value: i64,
}

impl ImmutableInt64 {
    pub const fn new(value: i64) -> Self {
        ImmutableInt64 { value }
    }

    pub const fn get_value(&self) -> i64 {
        self.value
    }
}

impl Immutable for ImmutableInt64 {
    const FIELDS: &'static [FieldDesc] = &[FieldDesc::new::<i64>(
        "value",
        "Int64",
        offset_of!(ImmutableInt64, value),
    )];
}

/// Wraps on overflow.
impl Add for ImmutableInt64 {
    type Output = ImmutableInt64;

    fn add(self, rhs: Self) -> Self::Output {
        ImmutableInt64::new(self.value.wrapping_add(rhs.value))
    }
}

impl PartialEq<i64> for ImmutableInt64 {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

impl PartialEq<ImmutableInt64> for i64 {
    fn eq(&self, other: &ImmutableInt64) -> bool {
        *self == other.value
    }
}

impl From<i64> for ImmutableInt64 {
    fn from(value: i64) -> Self {
        ImmutableInt64::new(value)
    }
}

impl From<ImmutableInt64> for i64 {
    fn from(value: ImmutableInt64) -> Self {
        value.value
    }
}
