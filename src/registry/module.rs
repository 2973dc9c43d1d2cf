//! A module of declared types and functions.

use std::{
    any::{type_name, Any, TypeId},
    marker::PhantomData,
    sync::Arc,
};

use fnv::{FnvHashMap, FnvHashSet};
use tracing::{debug, trace};

use super::{
    function::{IntoFunction, IntoMethod, MutMarker, NativeFn, RefMarker, Signature},
    type_info::{
        builtin_name, Immutable, IsBits, Ownership, TypeInfo, TypeKind, Visibility,
        BITS_FIELD_TYPES,
    },
    value::Value,
};
use crate::error::{CallError, DeclarationError, RegistryResult};

const TARGET: &str = "rust_types::registry";

/// A symbol declared in a module.
#[derive(Copy, Clone, Debug)]
pub enum Symbol<'a> {
    /// A declared type.
    Type(&'a TypeInfo),
    /// A function, with all its overloads.
    Function(&'a str, &'a [NativeFn]),
}

impl<'a> Symbol<'a> {
    /// The name of this symbol.
    pub fn name(&self) -> &'a str {
        match self {
            Symbol::Type(info) => info.name(),
            Symbol::Function(name, _) => name,
        }
    }
}

/// A module of types and functions.
///
/// Types must be declared before any function that uses them. Every function is stored with
/// all of its overloads, methods and constructors are functions whose first argument is the
/// receiver or whose name is the name of the type respectively.
#[derive(Debug)]
pub struct Module {
    name: String,
    default_visibility: Visibility,
    types: Vec<TypeInfo>,
    type_names: FnvHashMap<String, usize>,
    type_ids: FnvHashMap<TypeId, (usize, Ownership)>,
    functions: Vec<(String, Vec<NativeFn>)>,
    function_names: FnvHashMap<String, usize>,
    exported: FnvHashSet<String>,
}

impl Module {
    pub(crate) fn new(name: String, default_visibility: Visibility) -> Self {
        Module {
            name,
            default_visibility,
            types: Vec::new(),
            type_names: FnvHashMap::default(),
            type_ids: FnvHashMap::default(),
            functions: Vec::new(),
            function_names: FnvHashMap::default(),
            exported: FnvHashSet::default(),
        }
    }

    /// The name of this module.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare an opaque type named `name`.
    ///
    /// The type is also known to the module as `Arc<T>` and `Box<T>`, so functions can return
    /// it with shared or unique ownership.
    pub fn add_type<T>(&mut self, name: &str) -> RegistryResult<TypeBuilder<'_, T>>
    where
        T: Any + Send + Sync,
    {
        self.declare_type::<T>(name, TypeKind::Opaque)?;
        Ok(TypeBuilder::new(self))
    }

    /// Declare an immutable type named `name`, its fields are described by `T::FIELDS`.
    pub fn add_immutable<T>(&mut self, name: &str) -> RegistryResult<TypeBuilder<'_, T>>
    where
        T: Immutable,
    {
        self.declare_type::<T>(name, TypeKind::Immutable { fields: T::FIELDS })?;
        Ok(TypeBuilder::new(self))
    }

    /// Declare a bits type named `name`.
    ///
    /// The field list is checked against the size of `T`: every field must be in bounds, fields
    /// must not overlap, and every field must be a bits type.
    pub fn add_bits<T>(&mut self, name: &str) -> RegistryResult<TypeBuilder<'_, T>>
    where
        T: IsBits,
    {
        let kind = TypeKind::bits::<T>();
        check_bits_layout(name, &kind)?;
        self.declare_type::<T>(name, kind)?;
        Ok(TypeBuilder::new(self))
    }

    /// Declare the free function `name`.
    ///
    /// If a function with this name exists, `func` is added as a new overload. Overloads must
    /// differ in their argument types.
    pub fn function<F, Args>(&mut self, name: &str, func: F) -> RegistryResult<&mut Self>
    where
        F: IntoFunction<Args>,
    {
        self.declare_function(name, NativeFn::from_function(func))?;
        Ok(self)
    }

    /// Mark the types or functions in `names` as exported.
    pub fn export_symbols<I, S>(&mut self, names: I) -> RegistryResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            if !self.has_symbol(name) {
                Err(DeclarationError::SymbolNotFound {
                    module: self.name.clone(),
                    name: name.into(),
                })?;
            }

            debug!(target: TARGET, module = %self.name, symbol = name, "exported symbol");
            self.exported.insert(name.into());
        }

        Ok(self)
    }

    /// Call the function `name` with `args`.
    ///
    /// The first overload whose arity and argument types match is called. Arguments that are
    /// taken by value are cloned, receivers are borrowed from `args`.
    pub fn call(&self, name: &str, args: &mut [Value]) -> RegistryResult<Value> {
        let overloads = match self.function_names.get(name) {
            Some(&idx) => &self.functions[idx].1,
            None => Err(CallError::FunctionNotFound {
                module: self.name.clone(),
                name: name.into(),
            })?,
        };

        match overloads.iter().find(|f| f.signature().matches(args)) {
            Some(func) => {
                trace!(target: TARGET, module = %self.name, function = name, signature = %func.signature(), "call");
                func.call(args)
            }
            None => {
                let arg_types = args
                    .iter()
                    .map(|arg| self.julia_type_name(arg).unwrap_or(arg.type_name()))
                    .collect::<Vec<_>>()
                    .join(", ");

                Err(CallError::NoMatchingOverload {
                    name: name.into(),
                    arg_types,
                })?
            }
        }
    }

    /// The type named `name`.
    pub fn type_info(&self, name: &str) -> Option<&TypeInfo> {
        self.type_names.get(name).map(|&idx| &self.types[idx])
    }

    /// The type `T` was declared as.
    pub fn type_info_of<T: Any>(&self) -> Option<&TypeInfo> {
        self.type_ids
            .get(&TypeId::of::<T>())
            .filter(|(_, ownership)| *ownership == Ownership::Owned)
            .map(|&(idx, _)| &self.types[idx])
    }

    /// All declared types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.iter()
    }

    /// The overloads of the function `name`.
    pub fn overloads(&self, name: &str) -> Option<&[NativeFn]> {
        self.function_names
            .get(name)
            .map(|&idx| self.functions[idx].1.as_slice())
    }

    /// All symbols, types first, in declaration order.
    ///
    /// Constructors share the name of their type and are not listed separately.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol<'_>> {
        let types = self.types.iter().map(Symbol::Type);
        let functions = self
            .functions
            .iter()
            .filter(|(name, _)| !self.type_names.contains_key(name))
            .map(|(name, overloads)| Symbol::Function(name.as_str(), overloads.as_slice()));
        types.chain(functions)
    }

    /// Returns `true` if a type or function named `name` exists.
    pub fn has_symbol(&self, name: &str) -> bool {
        self.type_names.contains_key(name) || self.function_names.contains_key(name)
    }

    /// The visibility of the symbol `name`, `None` if it doesn't exist.
    pub fn visibility(&self, name: &str) -> Option<Visibility> {
        if !self.has_symbol(name) {
            return None;
        }

        if self.exported.contains(name) {
            Some(Visibility::Exported)
        } else {
            Some(self.default_visibility)
        }
    }

    /// Returns `true` if the symbol `name` is exported.
    pub fn is_exported(&self, name: &str) -> bool {
        self.visibility(name) == Some(Visibility::Exported)
    }

    /// The names of all exported symbols in declaration order.
    pub fn exported_symbols(&self) -> Vec<&str> {
        self.symbols()
            .map(|symbol| symbol.name())
            .filter(|name| self.is_exported(name))
            .collect()
    }

    /// The ownership of the content of `value`, `None` if its type isn't known to this module.
    pub fn ownership_of(&self, value: &Value) -> Option<Ownership> {
        self.type_ids
            .get(&value.content_type_id())
            .map(|&(_, ownership)| ownership)
    }

    /// The name of the content's type in the host.
    pub fn julia_type_name(&self, value: &Value) -> Option<&str> {
        let type_id = value.content_type_id();
        match self.type_ids.get(&type_id) {
            Some(&(idx, _)) => Some(self.types[idx].name()),
            None => builtin_name(type_id),
        }
    }

    fn declare_type<T: Any>(&mut self, name: &str, kind: TypeKind) -> RegistryResult<()> {
        if self.type_names.contains_key(name) {
            Err(DeclarationError::DuplicateType {
                module: self.name.clone(),
                name: name.into(),
            })?;
        }

        if let Some(&(idx, _)) = self.type_ids.get(&TypeId::of::<T>()) {
            Err(DeclarationError::TypeAlreadyMapped {
                module: self.name.clone(),
                rust_type: type_name::<T>().into(),
                name: self.types[idx].name.clone(),
            })?;
        }

        let idx = self.types.len();
        debug!(target: TARGET, module = %self.name, type_name = name, rust_type = type_name::<T>(), ?kind, "declared type");

        self.types.push(TypeInfo {
            name: name.into(),
            rust_name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            kind,
        });
        self.type_names.insert(name.into(), idx);
        self.type_ids.insert(TypeId::of::<T>(), (idx, Ownership::Owned));
        self.type_ids
            .insert(TypeId::of::<Arc<T>>(), (idx, Ownership::Shared));
        self.type_ids
            .insert(TypeId::of::<Box<T>>(), (idx, Ownership::Unique));

        Ok(())
    }

    fn declare_function(&mut self, name: &str, func: NativeFn) -> RegistryResult<()> {
        self.check_signature(name, func.signature())?;

        let idx = match self.function_names.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.functions.len();
                self.functions.push((name.into(), Vec::new()));
                self.function_names.insert(name.into(), idx);
                idx
            }
        };

        let overloads = &mut self.functions[idx].1;
        if overloads
            .iter()
            .any(|other| other.signature().overlaps(func.signature()))
        {
            Err(DeclarationError::DuplicateOverload {
                name: name.into(),
                signature: func.signature().to_string(),
            })?;
        }

        debug!(target: TARGET, module = %self.name, function = name, signature = %func.signature(), "declared function");
        overloads.push(func);
        Ok(())
    }

    fn check_signature(&self, name: &str, signature: &Signature) -> RegistryResult<()> {
        let ret = signature.ret();
        let types = signature
            .params()
            .iter()
            .chain(std::iter::once(&ret))
            .map(|param| (param.type_id(), param.rust_name()));

        for (type_id, rust_name) in types {
            if !self.type_ids.contains_key(&type_id) && builtin_name(type_id).is_none() {
                Err(DeclarationError::UnknownType {
                    function: name.into(),
                    rust_type: rust_name.into(),
                })?;
            }
        }

        Ok(())
    }
}

fn check_bits_layout(name: &str, kind: &TypeKind) -> RegistryResult<()> {
    let TypeKind::Bits {
        size,
        align,
        fields,
    } = kind
    else {
        return Ok(());
    };

    let invalid = |reason: String| DeclarationError::InvalidLayout {
        name: name.into(),
        reason,
    };

    let mut end = 0;
    for field in fields.iter() {
        let host_size = BITS_FIELD_TYPES
            .iter()
            .find(|(julia_type, _)| *julia_type == field.julia_type)
            .map(|&(_, size)| size);

        match host_size {
            None => Err(invalid(format!(
                "field {} has type {}, which is not a bits type",
                field.name, field.julia_type
            )))?,
            Some(host_size) if host_size != field.size => Err(invalid(format!(
                "field {} is {} bytes, a {} is {} bytes",
                field.name, field.size, field.julia_type, host_size
            )))?,
            Some(_) => (),
        }

        if field.offset < end {
            Err(invalid(format!("field {} overlaps the previous field", field.name)))?;
        }

        end = field.offset + field.size;
        if end > *size {
            Err(invalid(format!(
                "field {} ends at byte {}, the type is {} bytes",
                field.name, end, size
            )))?;
        }
    }

    if end.next_multiple_of(*align) != *size {
        Err(invalid(format!(
            "fields cover {} bytes, the type is {} bytes",
            end, size
        )))?;
    }

    Ok(())
}

/// Adds constructors and methods to a newly declared type.
pub struct TypeBuilder<'module, T> {
    module: &'module mut Module,
    _marker: PhantomData<fn() -> T>,
}

impl<'module, T> TypeBuilder<'module, T>
where
    T: Any + Send + Sync,
{
    fn new(module: &'module mut Module) -> Self {
        TypeBuilder {
            module,
            _marker: PhantomData,
        }
    }

    /// Add a constructor, a function with the same name as the type that returns a `T`.
    pub fn constructor<F, Args>(self, func: F) -> RegistryResult<Self>
    where
        F: IntoFunction<Args>,
    {
        let func = NativeFn::from_function(func);
        let name = self.type_name();

        if func.signature().ret().type_id() != TypeId::of::<T>() {
            Err(DeclarationError::InvalidConstructor {
                name: name.clone(),
                returns: func.signature().ret().rust_name().into(),
            })?;
        }

        self.module.declare_function(&name, func)?;
        Ok(self)
    }

    /// Add a constructor that takes no arguments and returns `T::default()`.
    pub fn default_constructor(self) -> RegistryResult<Self>
    where
        T: Default,
    {
        self.constructor(T::default)
    }

    /// Add a method that borrows its receiver.
    pub fn method<F, Args, R>(self, name: &str, func: F) -> RegistryResult<Self>
    where
        F: IntoMethod<T, RefMarker<Args, R>>,
    {
        self.module
            .declare_function(name, NativeFn::from_method(func))?;
        Ok(self)
    }

    /// Add a method that borrows its receiver mutably.
    pub fn method_mut<F, Args, R>(self, name: &str, func: F) -> RegistryResult<Self>
    where
        F: IntoMethod<T, MutMarker<Args, R>>,
    {
        self.module
            .declare_function(name, NativeFn::from_method(func))?;
        Ok(self)
    }

    /// The module this type is declared in.
    pub fn module(self) -> &'module mut Module {
        self.module
    }

    fn type_name(&self) -> String {
        self.module
            .type_info_of::<T>()
            .map(|info| info.name.clone())
            .unwrap_or_else(|| type_name::<T>().into())
    }
}
