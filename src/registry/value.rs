//! Type-erased values passed between the host and registered functions.

use std::{
    any::{type_name, Any, TypeId},
    fmt::{Debug, Formatter, Result as FmtResult},
};

use crate::error::{CallError, RegistryResult};

/// A boxed value owned by the host.
///
/// Every argument and return value of a registered function is a `Value`. Dropping a `Value`
/// drops its content, so ownership of whatever it holds ends with it.
pub struct Value {
    data: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Box `data`.
    pub fn new<T>(data: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Value {
            data: Box::new(data),
            type_name: type_name::<T>(),
        }
    }

    /// The value returned by functions that return `()`.
    #[inline]
    pub fn nothing() -> Self {
        Value::new(())
    }

    /// Returns `true` if this value holds `()`.
    #[inline]
    pub fn is_nothing(&self) -> bool {
        self.is::<()>()
    }

    /// Returns `true` if the content of this value is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.data.is::<T>()
    }

    /// The `TypeId` of the content.
    #[inline]
    pub fn content_type_id(&self) -> TypeId {
        Any::type_id(&*self.data)
    }

    /// The Rust type name of the content.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the content as a `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref()
    }

    /// Mutably borrow the content as a `T`.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.data.downcast_mut()
    }

    /// Copy the content out of this value.
    pub fn unbox<T: Any + Clone>(&self) -> RegistryResult<T> {
        match self.downcast_ref::<T>() {
            Some(data) => Ok(data.clone()),
            None => Err(CallError::NotA {
                value_type: self.type_name.into(),
                target: type_name::<T>().into(),
            })?,
        }
    }

    /// Take the content out of this value.
    ///
    /// If the content is not a `T`, the value is returned unchanged.
    pub fn into_inner<T: Any>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        match self.data.downcast::<T>() {
            Ok(data) => Ok(*data),
            Err(data) => Err(Value { data, type_name }),
        }
    }

    /// Borrow the content as the receiver of a method of `T`.
    ///
    /// Both `T` and `Box<T>` are accepted, a unique handle has been moved to the caller and
    /// behaves like an owned instance. Shared handles are not.
    pub(crate) fn receiver_ref<T: Any>(&self) -> Option<&T> {
        match self.downcast_ref::<T>() {
            Some(data) => Some(data),
            None => self.downcast_ref::<Box<T>>().map(|b| &**b),
        }
    }

    /// Mutable counterpart of [`Value::receiver_ref`].
    pub(crate) fn receiver_mut<T: Any>(&mut self) -> Option<&mut T> {
        if self.is::<T>() {
            self.downcast_mut::<T>()
        } else {
            self.downcast_mut::<Box<T>>().map(|b| &mut **b)
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Value")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbox_checks_type() {
        let v = Value::new(3i64);
        assert_eq!(v.unbox::<i64>().unwrap(), 3);

        let err = v.unbox::<f64>().unwrap_err();
        assert!(matches!(
            *err,
            crate::error::RegistryError::CallError(CallError::NotA { .. })
        ));
    }

    #[test]
    fn into_inner_returns_value_on_mismatch() {
        let v = Value::new(String::from("hello"));
        let v = v.into_inner::<i64>().unwrap_err();
        assert_eq!(v.into_inner::<String>().unwrap(), "hello");
    }

    #[test]
    fn boxed_content_is_a_receiver() {
        let mut v = Value::new(Box::new(1i64));
        assert_eq!(v.receiver_ref::<i64>(), Some(&1));
        *v.receiver_mut::<i64>().unwrap() += 1;
        assert_eq!(v.receiver_ref::<i64>(), Some(&2));
        assert!(v.receiver_ref::<f64>().is_none());
    }

    #[test]
    fn nothing_holds_unit() {
        let v = Value::nothing();
        assert!(v.is_nothing());
        assert_eq!(v.content_type_id(), TypeId::of::<()>());
        assert!(!Value::new(0i64).is_nothing());
    }

    #[test]
    fn content_type_id_is_not_the_box() {
        let v = Value::new(1.0f64);
        assert_eq!(v.content_type_id(), TypeId::of::<f64>());
    }
}
