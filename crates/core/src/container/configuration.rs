use std::collections::BTreeMap;

use crate::container::mapping::TypeMapping;
use crate::container::scope::ServiceScope;
use crate::container::types::TypeName;
use crate::errors::AutomapError;

/// Directives collected for a single type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDirectives {
    pub excluded: bool,
    pub singleton: bool,
    pub multimap: bool,
    pub name: Option<String>,
    pub policy_injected: bool,
    pub custom_lifetime: Option<ServiceScope>,
}

/// Accumulated automapping configuration
///
/// Every `merge_*` call leaves the receiver untouched and returns the
/// updated model, so earlier snapshots stay valid:
///
/// ```
/// use automap_core::container::MappingConfig;
///
/// let base = MappingConfig::create().merge_multimaps(["IPlugin"]);
/// let config = base
///     .merge_exclusions(["IInternal"])
///     .merge_singletons(["IClock"])
///     .unwrap();
///
/// assert!(!config.is_mappable(&"IInternal".into()));
/// assert!(base.is_mappable(&"IInternal".into()));
/// ```
///
/// Directives on a generic definition (`IRepo<T1>`) apply to every closed
/// form of it. A type may not end up with both a singleton directive and a
/// custom lifetime, nor with two different custom lifetimes; the merge that
/// introduces the second directive fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingConfig {
    directives: BTreeMap<TypeName, TypeDirectives>,
}

impl MappingConfig {
    /// Create an empty configuration
    pub fn create() -> Self {
        Self::default()
    }

    /// Mark types as never mappable
    pub fn merge_exclusions<I>(&self, types: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TypeName>,
    {
        let mut next = self.clone();
        for ty in types {
            next.entry(&ty.into()).excluded = true;
        }
        next
    }

    /// Mark types as registered with a single shared instance
    pub fn merge_singletons<I>(&self, types: I) -> Result<Self, AutomapError>
    where
        I: IntoIterator,
        I::Item: Into<TypeName>,
    {
        let mut next = self.clone();
        for ty in types {
            let ty = ty.into();
            next.entry(&ty).singleton = true;
            next.validate_lifetimes(&ty)?;
        }
        Ok(next)
    }

    /// Mark contracts as accepting several implementations
    pub fn merge_multimaps<I>(&self, types: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TypeName>,
    {
        let mut next = self.clone();
        for ty in types {
            next.entry(&ty.into()).multimap = true;
        }
        next
    }

    /// Register a type under an explicit name
    ///
    /// A later name for the same type replaces an earlier one.
    pub fn merge_named(&self, ty: impl Into<TypeName>, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        let ty = ty.into();
        let name = name.into();
        let directives = next.entry(&ty);
        if let Some(previous) = directives.name.as_deref().filter(|previous| *previous != name) {
            tracing::warn!(
                "Named mapping for {} changed from '{}' to '{}'",
                ty,
                previous,
                name
            );
        }
        directives.name = Some(name);
        next
    }

    /// Mark types for policy injection
    pub fn merge_policy_injected<I>(&self, types: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TypeName>,
    {
        let mut next = self.clone();
        for ty in types {
            next.entry(&ty.into()).policy_injected = true;
        }
        next
    }

    /// Register a type with a custom lifetime manager
    pub fn merge_custom_lifetime(
        &self,
        ty: impl Into<TypeName>,
        kind: ServiceScope,
    ) -> Result<Self, AutomapError> {
        let mut next = self.clone();
        let ty = ty.into();
        let directives = next.entry(&ty);
        if directives.custom_lifetime.is_some_and(|existing| existing != kind) {
            return Err(AutomapError::multiple_lifetime_managers(&ty.directive_key()));
        }
        directives.custom_lifetime = Some(kind);
        next.validate_lifetimes(&ty)?;
        Ok(next)
    }

    /// Union this configuration with another fragment
    ///
    /// Flags combine by union; the fragment's names win over existing ones.
    pub fn merge(&self, other: &MappingConfig) -> Result<Self, AutomapError> {
        let mut next = self.clone();

        for (ty, incoming) in &other.directives {
            let directives = next.entry(ty);
            directives.excluded |= incoming.excluded;
            directives.singleton |= incoming.singleton;
            directives.multimap |= incoming.multimap;
            directives.policy_injected |= incoming.policy_injected;

            if let Some(name) = &incoming.name {
                if let Some(previous) = directives.name.as_deref().filter(|previous| previous != name) {
                    tracing::warn!(
                        "Named mapping for {} changed from '{}' to '{}'",
                        ty,
                        previous,
                        name
                    );
                }
                directives.name = Some(name.clone());
            }

            match (directives.custom_lifetime, incoming.custom_lifetime) {
                (Some(existing), Some(kind)) if existing != kind => {
                    return Err(AutomapError::multiple_lifetime_managers(ty));
                }
                (None, Some(kind)) => directives.custom_lifetime = Some(kind),
                _ => {}
            }

            next.validate_lifetimes(ty)?;
        }

        Ok(next)
    }

    /// Check if a type may take part in mappings
    pub fn is_mappable(&self, ty: &TypeName) -> bool {
        !self.lookup(ty).any(|d| d.excluded)
    }

    /// Check if a type is registered with a single shared instance
    pub fn is_singleton(&self, ty: &TypeName) -> bool {
        self.lookup(ty).any(|d| d.singleton)
    }

    /// Check if a contract accepts several implementations
    pub fn is_multimap(&self, ty: &TypeName) -> bool {
        self.lookup(ty).any(|d| d.multimap)
    }

    /// Check if a type is registered with policy injection
    pub fn is_policy_injected(&self, ty: &TypeName) -> bool {
        self.lookup(ty).any(|d| d.policy_injected)
    }

    /// Check if any type requires policy injection
    pub fn policy_injection_required(&self) -> bool {
        self.directives.values().any(|d| d.policy_injected)
    }

    /// Custom lifetime configured for a type, if any
    pub fn custom_lifetime(&self, ty: &TypeName) -> Option<ServiceScope> {
        self.lookup(ty).find_map(|d| d.custom_lifetime)
    }

    /// Effective lifetime manager for a type
    pub fn lifetime_for(&self, ty: &TypeName) -> ServiceScope {
        if self.is_singleton(ty) {
            ServiceScope::Singleton
        } else {
            self.custom_lifetime(ty).unwrap_or(ServiceScope::Transient)
        }
    }

    /// Name configured for a type, if any
    pub fn named_mapping(&self, ty: &TypeName) -> Option<&str> {
        self.lookup(ty).find_map(|d| d.name.as_deref())
    }

    /// Name to register a mapping under
    ///
    /// The implementation's name is preferred over the contract's.
    pub fn named_mapping_for(&self, mapping: &TypeMapping) -> Option<String> {
        self.named_mapping(&mapping.to)
            .or_else(|| self.named_mapping(&mapping.from))
            .map(str::to_string)
    }

    /// Directives stored for exactly this type
    pub fn directives(&self, ty: &TypeName) -> Option<&TypeDirectives> {
        self.directives.get(&ty.directive_key())
    }

    /// Iterate over configured types and their directives
    pub fn iter(&self) -> impl Iterator<Item = (&TypeName, &TypeDirectives)> {
        self.directives.iter()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    fn entry(&mut self, ty: &TypeName) -> &mut TypeDirectives {
        self.directives.entry(ty.directive_key()).or_default()
    }

    /// Exact directives first, then those of the generic definition
    fn lookup<'a>(&'a self, ty: &TypeName) -> impl Iterator<Item = &'a TypeDirectives> + 'a {
        let key = ty.directive_key();
        let definition = ty.definition();
        let inherited = if definition != key {
            self.directives.get(&definition)
        } else {
            None
        };
        self.directives.get(&key).into_iter().chain(inherited)
    }

    /// Check every type sharing a definition with `ty` for lifetime conflicts
    fn validate_lifetimes(&self, ty: &TypeName) -> Result<(), AutomapError> {
        let definition = ty.definition();

        for key in self.directives.keys().filter(|key| key.definition() == definition) {
            let mut singleton = false;
            let mut custom: Option<ServiceScope> = None;

            for directives in self.lookup(key) {
                singleton |= directives.singleton;
                if let Some(kind) = directives.custom_lifetime {
                    if custom.is_some_and(|existing| existing != kind) {
                        return Err(AutomapError::multiple_lifetime_managers(key));
                    }
                    custom = Some(kind);
                }
            }

            if singleton && custom.is_some() {
                return Err(AutomapError::multiple_lifetime_managers(key));
            }
        }

        Ok(())
    }
}
