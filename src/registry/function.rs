//! Registered functions and their signatures.
//!
//! Free functions are registered through [`IntoFunction`], which is implemented for every
//! `Fn(A1, .., An) -> R` where all arguments are `Clone`. Arguments are cloned out of the
//! [`Value`]s the host passes, so a type that can't be duplicated can't be taken by value:
//!
//! ```compile_fail
//! use rust_types::{registry::Registry, NonCopyable};
//!
//! let mut registry = Registry::new();
//! let module = registry.create_module("M").unwrap();
//! module.add_type::<NonCopyable>("NonCopyable").unwrap();
//! module.function("consume", |_nc: NonCopyable| ()).unwrap();
//! ```
//!
//! Methods are registered through [`IntoMethod`], which is implemented for every
//! `Fn(&T, A1, .., An) -> R` and `Fn(&mut T, A1, .., An) -> R`. The receiver is borrowed from
//! the first argument.

use std::{
    any::{type_name, Any, TypeId},
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    marker::PhantomData,
    sync::Arc,
};

use smallvec::{smallvec, SmallVec};

use super::value::Value;
use crate::error::{CallError, RegistryResult};

#[doc(hidden)]
pub type Callable = Arc<dyn Fn(&mut [Value]) -> RegistryResult<Value> + Send + Sync>;

/// How an argument is passed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Passing {
    /// The argument is cloned out of its `Value`.
    ByValue,
    /// The argument is borrowed.
    ByRef,
    /// The argument is borrowed mutably.
    ByMut,
}

/// A parameter or return type of a registered function.
#[derive(Copy, Clone)]
pub struct Param {
    type_id: TypeId,
    rust_name: &'static str,
    passing: Passing,
    boxed: Option<TypeId>,
    accepts: fn(&Value) -> bool,
}

impl Param {
    /// A parameter of type `T` that is passed by value.
    pub fn by_value<T: Any>() -> Self {
        Param {
            type_id: TypeId::of::<T>(),
            rust_name: type_name::<T>(),
            passing: Passing::ByValue,
            boxed: None,
            accepts: Value::is::<T>,
        }
    }

    /// A receiver of type `T`, borrowed immutably.
    pub fn by_ref<T: Any>() -> Self {
        Param {
            type_id: TypeId::of::<T>(),
            rust_name: type_name::<T>(),
            passing: Passing::ByRef,
            boxed: Some(TypeId::of::<Box<T>>()),
            accepts: accepts_receiver::<T>,
        }
    }

    /// A receiver of type `T`, borrowed mutably.
    pub fn by_mut<T: Any>() -> Self {
        Param {
            type_id: TypeId::of::<T>(),
            rust_name: type_name::<T>(),
            passing: Passing::ByMut,
            boxed: Some(TypeId::of::<Box<T>>()),
            accepts: accepts_receiver::<T>,
        }
    }

    /// The `TypeId` of the parameter's type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The name of the parameter's Rust type.
    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    /// How the parameter is passed.
    pub fn passing(&self) -> Passing {
        self.passing
    }

    /// Returns `true` if `value` can be passed as this parameter.
    pub fn accepts(&self, value: &Value) -> bool {
        (self.accepts)(value)
    }

    /// Returns `true` if some value is accepted by both parameters.
    ///
    /// A receiver of `T` also accepts a `Box<T>`, so it overlaps with a `Box<T>` taken by value.
    pub fn overlaps(&self, other: &Param) -> bool {
        self.type_id == other.type_id
            || self.boxed == Some(other.type_id)
            || other.boxed == Some(self.type_id)
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.passing == other.passing
    }
}

impl Eq for Param {}

impl Debug for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.passing {
            Passing::ByValue => write!(f, "{}", self.rust_name),
            Passing::ByRef => write!(f, "&{}", self.rust_name),
            Passing::ByMut => write!(f, "&mut {}", self.rust_name),
        }
    }
}

fn accepts_receiver<T: Any>(value: &Value) -> bool {
    value.is::<T>() || value.is::<Box<T>>()
}

/// Parameter types and return type of a registered function.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    params: SmallVec<[Param; 4]>,
    ret: Param,
}

impl Signature {
    /// The parameters.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The return type.
    pub fn ret(&self) -> Param {
        self.ret
    }

    /// The number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Two signatures overlap if they can't be told apart by their arguments.
    pub fn overlaps(&self, other: &Signature) -> bool {
        self.arity() == other.arity()
            && self
                .params
                .iter()
                .zip(other.params.iter())
                .all(|(a, b)| a.overlaps(b))
    }

    pub(crate) fn matches(&self, args: &[Value]) -> bool {
        self.arity() == args.len()
            && self
                .params
                .iter()
                .zip(args.iter())
                .all(|(param, arg)| param.accepts(arg))
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", param)?;
        }
        write!(f, ") -> {:?}", self.ret)
    }
}

/// A single overload of a registered function.
#[derive(Clone)]
pub struct NativeFn {
    signature: Signature,
    callable: Callable,
}

impl NativeFn {
    pub(crate) fn from_function<F, Args>(func: F) -> Self
    where
        F: IntoFunction<Args>,
    {
        NativeFn {
            signature: F::signature(),
            callable: func.into_callable(),
        }
    }

    pub(crate) fn from_method<F, T, Args>(func: F) -> Self
    where
        F: IntoMethod<T, Args>,
    {
        NativeFn {
            signature: F::signature(),
            callable: func.into_callable(),
        }
    }

    /// The signature of this overload.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Call this overload.
    ///
    /// Returns an error if the number of arguments or their types don't match the signature.
    pub fn call(&self, args: &mut [Value]) -> RegistryResult<Value> {
        if args.len() != self.signature.arity() {
            Err(CallError::WrongArity {
                expected: self.signature.arity(),
                found: args.len(),
            })?;
        }

        (self.callable)(args)
    }
}

impl Debug for NativeFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("NativeFn")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Convert a Rust function to a registered free function.
///
/// `Args` is a marker that keeps the implementations for different arities apart, it's always
/// inferred.
pub trait IntoFunction<Args>: Send + Sync + 'static {
    /// The signature of the function.
    fn signature() -> Signature;

    #[doc(hidden)]
    fn into_callable(self) -> Callable;
}

/// Convert a Rust function whose first argument is `&T` or `&mut T` to a registered method.
pub trait IntoMethod<T, Args>: Send + Sync + 'static {
    /// The signature of the method, including the receiver.
    fn signature() -> Signature;

    #[doc(hidden)]
    fn into_callable(self) -> Callable;
}

/// Marker for functions taking all arguments by value.
pub struct FnMarker<Args, R>(PhantomData<fn(Args) -> R>);

/// Marker for methods taking `&T`.
pub struct RefMarker<Args, R>(PhantomData<fn(Args) -> R>);

/// Marker for methods taking `&mut T`.
pub struct MutMarker<Args, R>(PhantomData<fn(Args) -> R>);

fn arg<A: Any + Clone>(args: &[Value], index: usize) -> RegistryResult<A> {
    let value = args.get(index);
    match value.and_then(|v| v.downcast_ref::<A>()) {
        Some(a) => Ok(a.clone()),
        None => Err(CallError::ArgumentMismatch {
            index,
            expected: type_name::<A>().into(),
            found: value.map_or("nothing", Value::type_name).into(),
        })?,
    }
}

fn receiver_mismatch<T: Any>(found: Option<&'static str>) -> CallError {
    CallError::ArgumentMismatch {
        index: 0,
        expected: type_name::<T>().into(),
        found: found.unwrap_or("nothing").into(),
    }
}

macro_rules! impl_into_function {
    ($($arg:ident),*) => {
        impl<F, R, $($arg,)*> IntoFunction<FnMarker<($($arg,)*), R>> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: Any + Send + Sync,
            $($arg: Any + Clone + Send + Sync,)*
        {
            fn signature() -> Signature {
                Signature {
                    params: smallvec![$(Param::by_value::<$arg>()),*],
                    ret: Param::by_value::<R>(),
                }
            }

            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn into_callable(self) -> Callable {
                Arc::new(move |args: &mut [Value]| {
                    let mut index = 0;
                    $(
                        let $arg = arg::<$arg>(args, index)?;
                        index += 1;
                    )*
                    Ok(Value::new((self)($($arg),*)))
                })
            }
        }

        impl<F, T, R, $($arg,)*> IntoMethod<T, RefMarker<($($arg,)*), R>> for F
        where
            F: Fn(&T, $($arg),*) -> R + Send + Sync + 'static,
            T: Any,
            R: Any + Send + Sync,
            $($arg: Any + Clone + Send + Sync,)*
        {
            fn signature() -> Signature {
                Signature {
                    params: smallvec![Param::by_ref::<T>() $(, Param::by_value::<$arg>())*],
                    ret: Param::by_value::<R>(),
                }
            }

            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn into_callable(self) -> Callable {
                Arc::new(move |args: &mut [Value]| {
                    let mut index = 1;
                    $(
                        let $arg = arg::<$arg>(args, index)?;
                        index += 1;
                    )*
                    let found = args.first().map(Value::type_name);
                    let this = match args.first().and_then(|v| v.receiver_ref::<T>()) {
                        Some(this) => this,
                        None => Err(receiver_mismatch::<T>(found))?,
                    };
                    Ok(Value::new((self)(this $(, $arg)*)))
                })
            }
        }

        impl<F, T, R, $($arg,)*> IntoMethod<T, MutMarker<($($arg,)*), R>> for F
        where
            F: Fn(&mut T, $($arg),*) -> R + Send + Sync + 'static,
            T: Any,
            R: Any + Send + Sync,
            $($arg: Any + Clone + Send + Sync,)*
        {
            fn signature() -> Signature {
                Signature {
                    params: smallvec![Param::by_mut::<T>() $(, Param::by_value::<$arg>())*],
                    ret: Param::by_value::<R>(),
                }
            }

            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn into_callable(self) -> Callable {
                Arc::new(move |args: &mut [Value]| {
                    let mut index = 1;
                    $(
                        let $arg = arg::<$arg>(args, index)?;
                        index += 1;
                    )*
                    let found = args.first().map(Value::type_name);
                    let this = match args.first_mut().and_then(|v| v.receiver_mut::<T>()) {
                        Some(this) => this,
                        None => Err(receiver_mismatch::<T>(found))?,
                    };
                    Ok(Value::new((self)(this $(, $arg)*)))
                })
            }
        }
    };
}

impl_into_function!();
impl_into_function!(A1);
impl_into_function!(A1, A2);
impl_into_function!(A1, A2, A3);
impl_into_function!(A1, A2, A3, A4);
