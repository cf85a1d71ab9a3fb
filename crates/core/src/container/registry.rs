use std::collections::HashSet;

use serde::Serialize;

use crate::container::scope::ServiceScope;
use crate::container::types::TypeName;
use crate::errors::AutomapError;

/// Interceptor attached to a policy-injected registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptorKind {
    /// Proxy implementing the registered contract
    Interface,
}

/// Behavior run by the interceptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptionBehavior {
    /// Dispatch through externally configured call handlers
    PolicyInjection,
}

/// Extra wiring applied to a registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionMember {
    Interceptor(InterceptorKind),
    InterceptionBehavior(InterceptionBehavior),
    /// Resolve every registration of `element` into a collection
    ResolvedArray { element: TypeName },
}

impl InjectionMember {
    /// Members wiring a registration for policy injection
    pub fn policy_injection() -> Vec<InjectionMember> {
        vec![
            InjectionMember::Interceptor(InterceptorKind::Interface),
            InjectionMember::InterceptionBehavior(InterceptionBehavior::PolicyInjection),
        ]
    }
}

/// Registration held by a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationEntry {
    pub registered_type: TypeName,
    pub mapped_to: TypeName,
    pub name: Option<String>,
    pub lifetime: ServiceScope,
    pub injection_members: Vec<InjectionMember>,
}

impl RegistrationEntry {
    /// Key identifying the entry within a registry
    pub fn key(&self) -> (TypeName, Option<String>) {
        (self.registered_type.clone(), self.name.clone())
    }

    /// Check if calls through this registration are intercepted
    pub fn is_intercepted(&self) -> bool {
        self.injection_members
            .iter()
            .any(|member| matches!(member, InjectionMember::Interceptor(_)))
    }
}

/// Registry that automapping registers into
pub trait Registry {
    /// Current registrations
    fn registrations(&self) -> Vec<RegistrationEntry>;

    /// Register `to` for `from`, replacing any entry with the same name
    fn register_type(
        &mut self,
        from: &TypeName,
        to: &TypeName,
        name: Option<&str>,
        lifetime: ServiceScope,
        injection_members: &[InjectionMember],
    ) -> Result<(), AutomapError>;

    /// First registration of `from`, whatever its name
    fn find_registration(&self, from: &TypeName) -> Option<RegistrationEntry> {
        self.registrations()
            .into_iter()
            .find(|entry| &entry.registered_type == from)
    }

    /// Registration of `from` under exactly `name`
    fn find_named_registration(
        &self,
        from: &TypeName,
        name: Option<&str>,
    ) -> Option<RegistrationEntry> {
        self.registrations()
            .into_iter()
            .find(|entry| &entry.registered_type == from && entry.name.as_deref() == name)
    }

    /// Attach the interception extension
    fn add_interception_extension(&mut self) -> Result<(), AutomapError>;

    /// Check if the interception extension is attached
    fn has_interception_extension(&self) -> bool;
}

/// Registration keys present in a registry at one point in time
#[derive(Debug, Clone, Default)]
pub struct RegistrationSnapshot {
    keys: HashSet<(TypeName, Option<String>)>,
}

impl RegistrationSnapshot {
    /// Capture the current registrations of a registry
    pub fn capture<R: Registry + ?Sized>(registry: &R) -> Self {
        Self {
            keys: registry
                .registrations()
                .iter()
                .map(RegistrationEntry::key)
                .collect(),
        }
    }

    pub fn contains(&self, registered_type: &TypeName, name: Option<&str>) -> bool {
        self.keys
            .contains(&(registered_type.clone(), name.map(str::to_string)))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Registrations present now that were absent when the snapshot was taken
    pub fn new_registrations<R: Registry + ?Sized>(&self, registry: &R) -> Vec<RegistrationEntry> {
        registry
            .registrations()
            .into_iter()
            .filter(|entry| !self.keys.contains(&entry.key()))
            .collect()
    }
}

/// In-memory registry keeping registrations in insertion order
///
/// Holds no instances; resolving only looks registrations up.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: Vec<RegistrationEntry>,
    interception_extensions: usize,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the registration for a contract and optional name
    ///
    /// Without a name the unnamed registration is returned, or the only
    /// registration of the contract when there is exactly one.
    pub fn resolve(&self, from: &TypeName, name: Option<&str>) -> Option<&RegistrationEntry> {
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| &entry.registered_type == from && entry.name.as_deref() == name)
        {
            return Some(entry);
        }

        if name.is_none() {
            let mut candidates = self.resolve_all(from).into_iter();
            if let (Some(only), None) = (candidates.next(), candidates.next()) {
                return Some(only);
            }
        }

        None
    }

    /// All registrations for a contract
    pub fn resolve_all(&self, from: &TypeName) -> Vec<&RegistrationEntry> {
        self.entries
            .iter()
            .filter(|entry| &entry.registered_type == from)
            .collect()
    }

    /// Check if a contract has any registration
    pub fn contains(&self, from: &TypeName) -> bool {
        self.entries.iter().any(|entry| &entry.registered_type == from)
    }

    /// Get the number of registrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of times the interception extension was attached
    pub fn interception_extension_count(&self) -> usize {
        self.interception_extensions
    }
}

impl Registry for TypeRegistry {
    fn registrations(&self) -> Vec<RegistrationEntry> {
        self.entries.clone()
    }

    fn find_registration(&self, from: &TypeName) -> Option<RegistrationEntry> {
        self.entries
            .iter()
            .find(|entry| &entry.registered_type == from)
            .cloned()
    }

    fn find_named_registration(
        &self,
        from: &TypeName,
        name: Option<&str>,
    ) -> Option<RegistrationEntry> {
        self.entries
            .iter()
            .find(|entry| &entry.registered_type == from && entry.name.as_deref() == name)
            .cloned()
    }

    fn register_type(
        &mut self,
        from: &TypeName,
        to: &TypeName,
        name: Option<&str>,
        lifetime: ServiceScope,
        injection_members: &[InjectionMember],
    ) -> Result<(), AutomapError> {
        let entry = RegistrationEntry {
            registered_type: from.clone(),
            mapped_to: to.clone(),
            name: name.map(str::to_string),
            lifetime,
            injection_members: injection_members.to_vec(),
        };

        match self
            .entries
            .iter_mut()
            .find(|existing| &existing.registered_type == from && existing.name.as_deref() == name)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }

        Ok(())
    }

    fn add_interception_extension(&mut self) -> Result<(), AutomapError> {
        self.interception_extensions += 1;
        Ok(())
    }

    fn has_interception_extension(&self) -> bool {
        self.interception_extensions > 0
    }
}
