//! Everything related to errors.

use thiserror::Error;

/// Alias that is used for most `Result`s in this crate.
pub type RegistryResult<T> = Result<T, Box<RegistryError>>;

/// Errors raised while declaring types and functions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("a module named {module} already exists")]
    DuplicateModule { module: String },
    #[error("{module} already has a type named {name}")]
    DuplicateType { module: String, name: String },
    #[error("{rust_type} is already declared in {module} as {name}")]
    TypeAlreadyMapped {
        module: String,
        rust_type: String,
        name: String,
    },
    #[error("{function} uses {rust_type}, which has not been declared")]
    UnknownType { function: String, rust_type: String },
    #[error("{name}{signature} has already been declared")]
    DuplicateOverload { name: String, signature: String },
    #[error("constructor of {name} returns {returns}")]
    InvalidConstructor { name: String, returns: String },
    #[error("layout of {name} is invalid: {reason}")]
    InvalidLayout { name: String, reason: String },
    #[error("{module} has no symbol named {name}")]
    SymbolNotFound { module: String, name: String },
}

/// Errors raised while calling registered functions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("{module} has no function named {name}")]
    FunctionNotFound { module: String, name: String },
    #[error("no method matching {name}({arg_types})")]
    NoMatchingOverload { name: String, arg_types: String },
    #[error("expected {expected} arguments, got {found}")]
    WrongArity { expected: usize, found: usize },
    #[error("argument {index} must be a {expected}, got a {found}")]
    ArgumentMismatch {
        index: usize,
        expected: String,
        found: String,
    },
    #[error("{value_type} is not a {target}")]
    NotA { value_type: String, target: String },
}

/// All different errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Declaration error: {0}")]
    DeclarationError(DeclarationError),
    #[error("Call error: {0}")]
    CallError(CallError),
}

macro_rules! impl_from {
    ($type:ident) => {
        impl From<$type> for RegistryError {
            #[inline]
            fn from(e: $type) -> Self {
                RegistryError::$type(e)
            }
        }

        impl From<$type> for Box<RegistryError> {
            #[inline]
            fn from(e: $type) -> Self {
                Box::new(RegistryError::from(e))
            }
        }
    };
}

impl_from!(DeclarationError);
impl_from!(CallError);
