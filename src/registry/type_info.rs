//! Descriptions of declared types.
//!
//! Opaque types expose nothing about their layout to the host. Immutable and bits types also
//! carry a static list of [`FieldDesc`]s, which lets the host introspect their shape without
//! touching the data itself.

use std::{
    any::{Any, TypeId},
    mem::{align_of, size_of},
};

use fnv::FnvHashMap;
use once_cell::sync::Lazy;

/// Which party is responsible for releasing a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// The value is owned by whoever holds it, `T`.
    Owned,
    /// The value is reference counted, `Arc<T>`.
    Shared,
    /// The value was allocated by the callee and moved to the caller, `Box<T>`.
    Unique,
}

/// Whether a symbol is exported from its module.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// The symbol can only be reached by its qualified name.
    #[default]
    Qualified,
    /// The symbol is exported.
    Exported,
}

/// Field of an immutable or bits type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldDesc {
    /// The name of the field.
    pub name: &'static str,
    /// The name of the field's type in the host.
    pub julia_type: &'static str,
    /// Offset of the field in bytes.
    pub offset: usize,
    /// Size of the field in bytes.
    pub size: usize,
}

impl FieldDesc {
    /// Describe a field of type `T` at `offset`, use `std::mem::offset_of!` to find it.
    pub const fn new<T>(name: &'static str, julia_type: &'static str, offset: usize) -> Self {
        FieldDesc {
            name,
            julia_type,
            offset,
            size: size_of::<T>(),
        }
    }
}

/// A type whose fields can't change after construction.
///
/// `FIELDS` is published to the host, it doesn't need to match the Rust layout exactly but
/// must name every field in declaration order.
pub trait Immutable: Any + Clone + Send + Sync {
    /// The fields of this type.
    const FIELDS: &'static [FieldDesc];
}

/// Indicate that a type is a fixed-layout aggregate of bits fields.
///
/// Safety: the type must be `#[repr(C)]`, and `FIELDS` must describe every field with its
/// correct offset and size. Every field must itself be a bits type.
pub unsafe trait IsBits: Immutable + Copy {}

/// The kind of a declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    /// Layout is invisible to the host.
    Opaque,
    /// Immutable type with introspectable fields.
    Immutable { fields: &'static [FieldDesc] },
    /// Fixed-layout aggregate that can be copied byte for byte.
    Bits {
        size: usize,
        align: usize,
        fields: &'static [FieldDesc],
    },
}

impl TypeKind {
    pub(crate) fn bits<T: IsBits>() -> Self {
        TypeKind::Bits {
            size: size_of::<T>(),
            align: align_of::<T>(),
            fields: T::FIELDS,
        }
    }

    /// The fields of this type, opaque types have none.
    pub fn fields(&self) -> &'static [FieldDesc] {
        match self {
            TypeKind::Opaque => &[],
            TypeKind::Immutable { fields } => fields,
            TypeKind::Bits { fields, .. } => fields,
        }
    }

    /// Returns `true` if values of this type can't be mutated by the host.
    pub fn is_immutable(&self) -> bool {
        !matches!(self, TypeKind::Opaque)
    }
}

/// A type declared in a module.
#[derive(Clone, Debug)]
pub struct TypeInfo {
    pub(crate) name: String,
    pub(crate) rust_name: &'static str,
    pub(crate) type_id: TypeId,
    pub(crate) kind: TypeKind,
}

impl TypeInfo {
    /// The name of this type in the host.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name of the Rust type.
    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    /// The `TypeId` of the owned Rust type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The kind of this type.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }
}

/// Scalar types every module knows about, with their name in the host.
pub(crate) static BUILTIN_TYPES: Lazy<FnvHashMap<TypeId, &'static str>> = Lazy::new(|| {
    let mut types = FnvHashMap::default();
    types.insert(TypeId::of::<()>(), "Nothing");
    types.insert(TypeId::of::<bool>(), "Bool");
    types.insert(TypeId::of::<i64>(), "Int64");
    types.insert(TypeId::of::<f64>(), "Float64");
    types.insert(TypeId::of::<String>(), "String");
    types
});

/// Host names and sizes of the types allowed as fields of bits types.
pub(crate) const BITS_FIELD_TYPES: &[(&str, usize)] =
    &[("Bool", 1), ("Int64", 8), ("Float64", 8)];

pub(crate) fn builtin_name(type_id: TypeId) -> Option<&'static str> {
    BUILTIN_TYPES.get(&type_id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_known() {
        assert_eq!(builtin_name(TypeId::of::<i64>()), Some("Int64"));
        assert_eq!(builtin_name(TypeId::of::<String>()), Some("String"));
        assert_eq!(builtin_name(TypeId::of::<u8>()), None);
    }

    #[test]
    fn opaque_types_have_no_fields() {
        assert!(TypeKind::Opaque.fields().is_empty());
        assert!(!TypeKind::Opaque.is_immutable());
    }
}
