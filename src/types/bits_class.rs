//! A fixed-layout aggregate.

use std::mem::offset_of;

use crate::registry::{FieldDesc, Immutable, IsBits};

/// A float and an integer, laid out like the C struct `{ double a; int64_t b; }`.
///
/// `a` is accessed directly, `b` through [`BitsClass::get_b`] and [`BitsClass::set_b`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BitsClass {
    pub a: f64,
    b: i64,
}

impl BitsClass {
    pub const fn new(a: f64, b: i64) -> Self {
        BitsClass { a, b }
    }

    pub const fn get_b(&self) -> i64 {
        self.b
    }

    pub fn set_b(&mut self, b: i64) {
        self.b = b;
    }
}

impl Immutable for BitsClass {
    const FIELDS: &'static [FieldDesc] = &[
        FieldDesc::new::<f64>("a", "Float64", offset_of!(BitsClass, a)),
        FieldDesc::new::<i64>("b", "Int64", offset_of!(BitsClass, b)),
    ];
}

// Safety: BitsClass is repr(C), FIELDS describes both of its fields, and f64 and i64 are bits
// types.
unsafe impl IsBits for BitsClass {}

/// Build a `BitsClass` from its fields.
pub fn make_bits(a: f64, b: i64) -> BitsClass {
    let mut bits = BitsClass::default();
    bits.a = a;
    bits.set_b(b);
    bits
}

pub fn get_bits_a(bits: BitsClass) -> f64 {
    bits.a
}

pub fn get_bits_b(bits: BitsClass) -> i64 {
    bits.get_b()
}
