//! A registry of modules that expose Rust types and functions to a host.
//!
//! A [`Registry`] owns a set of named [`Module`]s. Types are declared in a module with
//! [`Module::add_type`], [`Module::add_immutable`] or [`Module::add_bits`], which return a
//! [`TypeBuilder`] that is used to add constructors and methods. Free functions are added with
//! [`Module::function`]. Once a module has been defined the host can look up its symbols and
//! call its functions with [`Module::call`]:
//!
//! ```
//! use rust_types::registry::{value::Value, Registry};
//!
//! # fn main() -> rust_types::error::RegistryResult<()> {
//! let mut registry = Registry::new();
//! let module = registry.create_module("Math")?;
//! module.function("double", |x: i64| 2 * x)?;
//!
//! let module = registry.module("Math").unwrap();
//! let result = module.call("double", &mut [Value::new(21i64)])?;
//! assert_eq!(result.unbox::<i64>()?, 42);
//! # Ok(())
//! # }
//! ```

pub mod function;
pub mod module;
pub mod type_info;
pub mod value;

use fnv::FnvHashMap;
use tracing::debug;

pub use self::{
    function::{NativeFn, Signature},
    module::{Module, Symbol, TypeBuilder},
    type_info::{FieldDesc, Immutable, IsBits, Ownership, TypeInfo, TypeKind, Visibility},
    value::Value,
};
use crate::error::{DeclarationError, RegistryResult};

/// A set of named modules.
#[derive(Debug, Default)]
pub struct Registry {
    default_visibility: Visibility,
    modules: Vec<Module>,
    module_names: FnvHashMap<String, usize>,
}

impl Registry {
    /// Create an empty registry, symbols are only exported when this is explicitly requested.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Configure a new registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The visibility of symbols that haven't been exported explicitly.
    pub fn default_visibility(&self) -> Visibility {
        self.default_visibility
    }

    /// Create a new module named `name`.
    pub fn create_module(&mut self, name: &str) -> RegistryResult<&mut Module> {
        if self.module_names.contains_key(name) {
            Err(DeclarationError::DuplicateModule {
                module: name.into(),
            })?;
        }

        debug!(target: "rust_types::registry", module = name, "created module");

        let idx = self.modules.len();
        self.modules
            .push(Module::new(name.into(), self.default_visibility));
        self.module_names.insert(name.into(), idx);

        Ok(&mut self.modules[idx])
    }

    /// The module named `name`.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.module_names.get(name).map(|&idx| &self.modules[idx])
    }

    /// Mutable access to the module named `name`.
    pub fn module_mut(&mut self, name: &str) -> Option<&mut Module> {
        match self.module_names.get(name) {
            Some(&idx) => Some(&mut self.modules[idx]),
            None => None,
        }
    }

    /// All modules in creation order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }
}

/// Build a [`Registry`].
///
/// The only option is the visibility policy: by default symbols can only be reached by their
/// qualified name unless they're exported with [`Module::export_symbols`]. A registry built
/// with [`Visibility::Exported`] exports every symbol.
#[derive(Copy, Clone, Debug, Default)]
pub struct RegistryBuilder {
    default_visibility: Visibility,
}

impl RegistryBuilder {
    /// Create a new `RegistryBuilder`.
    pub fn new() -> Self {
        RegistryBuilder::default()
    }

    /// Set the visibility of symbols that aren't exported explicitly.
    pub fn default_visibility(mut self, visibility: Visibility) -> Self {
        self.default_visibility = visibility;
        self
    }

    /// Build the registry.
    pub fn build(self) -> Registry {
        Registry {
            default_visibility: self.default_visibility,
            ..Registry::default()
        }
    }
}
