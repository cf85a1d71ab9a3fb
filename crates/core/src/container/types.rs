use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::providers::provider::{ConfigProvider, ProviderFactory};

/// Generic argument of a type name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeArg {
    /// Unbound generic parameter, e.g. `T`
    Param(String),
    /// Concrete type argument
    Type(TypeName),
}

impl TypeArg {
    /// Create a generic parameter argument
    pub fn param(name: impl Into<String>) -> Self {
        TypeArg::Param(name.into())
    }

    /// Check if the argument is, or contains, an unbound parameter
    pub fn is_open(&self) -> bool {
        match self {
            TypeArg::Param(_) => true,
            TypeArg::Type(name) => name.is_open(),
        }
    }
}

impl From<TypeName> for TypeArg {
    fn from(name: TypeName) -> Self {
        TypeArg::Type(name)
    }
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Param(name) => write!(f, "{}", name),
            TypeArg::Type(name) => write!(f, "{}", name),
        }
    }
}

/// Identity of a type as seen by the automapper
///
/// A path plus ordered generic arguments. Names containing a parameter are
/// open; `definition()` maps any generic name onto its generic definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName {
    path: String,
    args: Vec<TypeArg>,
}

impl TypeName {
    /// Path of the collection form registered for multimapped contracts
    pub const COLLECTION_PATH: &'static str = "Vec";

    /// Create a non-generic type name
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
        }
    }

    /// Create a generic type name
    pub fn generic<I, A>(path: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<TypeArg>,
    {
        Self {
            path: path.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Create the name of a real Rust type
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// Create the collection form of a contract, e.g. `Vec<IPlugin>`
    pub fn collection_of(element: &TypeName) -> Self {
        Self::generic(Self::COLLECTION_PATH, [element.clone()])
    }

    /// Get the path without generic arguments
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the generic arguments
    pub fn args(&self) -> &[TypeArg] {
        &self.args
    }

    /// Number of generic arguments
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Check if the name has generic arguments
    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// Check if any argument is an unbound parameter
    pub fn is_open(&self) -> bool {
        self.args.iter().any(TypeArg::is_open)
    }

    /// Check if every argument is a distinct bare parameter
    pub fn is_definition_form(&self) -> bool {
        let mut seen = HashSet::new();
        self.is_generic()
            && self.args.iter().all(|arg| match arg {
                TypeArg::Param(name) => seen.insert(name.as_str()),
                TypeArg::Type(_) => false,
            })
    }

    /// Generic definition with positionally renamed parameters (`T1`, `T2`, ...)
    ///
    /// Non-generic names are returned unchanged.
    pub fn definition(&self) -> TypeName {
        if !self.is_generic() {
            return self.clone();
        }
        Self {
            path: self.path.clone(),
            args: (1..=self.args.len())
                .map(|i| TypeArg::Param(format!("T{}", i)))
                .collect(),
        }
    }

    /// Key under which directives for this name are stored
    ///
    /// Open names collapse onto their definition so that `IRepo<T>` and
    /// `IRepo<U>` share directives.
    pub fn directive_key(&self) -> TypeName {
        if self.is_open() {
            self.definition()
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{}", first)?;
            for arg in rest {
                write!(f, ", {}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl Serialize for TypeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Kind of an enumerated type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Abstract contract that implementations bind to
    Interface,
    /// Concrete implementation
    Class,
}

/// Metadata marker attached to a type descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// Never map this type
    Exclude,
    /// Register with a single shared instance
    Singleton,
    /// Allow several implementations of this contract
    Multimap,
    /// Register under the given name
    Named(String),
    /// Route calls through configured interceptors
    PolicyInjection,
    /// Register with the lifetime manager of the given kind
    CustomLifetime(String),
}

/// Type enumerated for automapping
#[derive(Clone)]
pub struct TypeDescriptor {
    name: TypeName,
    kind: TypeKind,
    interfaces: Vec<TypeName>,
    markers: Vec<Marker>,
    provider: Option<ProviderFactory>,
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("interfaces", &self.interfaces)
            .field("markers", &self.markers)
            .field("provider", &self.provider.as_ref().map(|_| "<provider_factory>"))
            .finish()
    }
}

impl TypeDescriptor {
    /// Describe an interface
    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::with_kind(name.into(), TypeKind::Interface)
    }

    /// Describe a concrete class
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::with_kind(name.into(), TypeKind::Class)
    }

    /// Describe a configuration provider constructed through `Default`
    pub fn config_provider<P>(name: impl Into<TypeName>) -> Self
    where
        P: ConfigProvider + Default + 'static,
    {
        let factory: ProviderFactory =
            Arc::new(|| Box::new(P::default()) as Box<dyn ConfigProvider>);
        Self::class(name).with_provider(factory)
    }

    fn with_kind(name: TypeName, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            interfaces: Vec::new(),
            markers: Vec::new(),
            provider: None,
        }
    }

    /// Add an implemented contract
    pub fn implements(mut self, contract: impl Into<TypeName>) -> Self {
        self.interfaces.push(contract.into());
        self
    }

    /// Attach a marker
    pub fn marked(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Attach a configuration provider factory
    pub fn with_provider(mut self, factory: ProviderFactory) -> Self {
        self.provider = Some(factory);
        self
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    pub fn interfaces(&self) -> &[TypeName] {
        &self.interfaces
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn provider(&self) -> Option<&ProviderFactory> {
        self.provider.as_ref()
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }
}

impl From<&str> for TypeName {
    fn from(path: &str) -> Self {
        TypeName::new(path)
    }
}

impl From<String> for TypeName {
    fn from(path: String) -> Self {
        TypeName::new(path)
    }
}

/// Supplies the candidate types for a run
pub trait TypeSource {
    fn types(&self) -> Vec<TypeDescriptor>;
}

impl TypeSource for Vec<TypeDescriptor> {
    fn types(&self) -> Vec<TypeDescriptor> {
        self.clone()
    }
}

impl TypeSource for [TypeDescriptor] {
    fn types(&self) -> Vec<TypeDescriptor> {
        self.to_vec()
    }
}
