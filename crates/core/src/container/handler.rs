use crate::container::configuration::MappingConfig;
use crate::container::mapping::{MappingBehaviors, TypeMapping};
use crate::container::registry::{InjectionMember, RegistrationEntry, RegistrationSnapshot, Registry};
use crate::container::scope::ServiceScope;
use crate::container::types::TypeName;
use crate::errors::AutomapError;

/// Carries out registrations on a registry
///
/// Mappings are validated against the registry and the configuration one
/// at a time, in order. The first failure aborts the batch; registrations
/// made before it are not rolled back. The interception extension is
/// attached just before the first intercepted registration is committed.
pub struct TypeMappingHandler<'a> {
    config: &'a MappingConfig,
    mappings: &'a [TypeMapping],
    behaviors: MappingBehaviors,
}

impl<'a> TypeMappingHandler<'a> {
    pub fn new(
        config: &'a MappingConfig,
        mappings: &'a [TypeMapping],
        behaviors: MappingBehaviors,
    ) -> Self {
        Self {
            config,
            mappings,
            behaviors,
        }
    }

    /// Register every mapping and return the registrations this call added
    pub fn perform_registrations<R: Registry + ?Sized>(
        &self,
        registry: &mut R,
    ) -> Result<Vec<RegistrationEntry>, AutomapError> {
        let snapshot = RegistrationSnapshot::capture(registry);

        let mut multimapped: Vec<&TypeName> = Vec::new();

        for mapping in self.mappings {
            let multimapping = self.is_multimapping(&mapping.from);
            self.validate(registry, mapping, multimapping)?;

            let lifetime = self.config.lifetime_for(&mapping.from);
            let injection_members = if self.config.is_policy_injected(&mapping.from) {
                InjectionMember::policy_injection()
            } else {
                Vec::new()
            };
            let name = self.registration_name(mapping, multimapping);

            tracing::debug!(
                "Registering {} (name: {:?}, lifetime: {}, intercepted: {})",
                mapping,
                name,
                lifetime,
                !injection_members.is_empty()
            );
            if !injection_members.is_empty() && !registry.has_interception_extension() {
                tracing::info!("Attaching interception extension for {}", mapping.from);
                registry.add_interception_extension()?;
            }
            registry.register_type(
                &mapping.from,
                &mapping.to,
                name.as_deref(),
                lifetime,
                &injection_members,
            )?;

            if multimapping && !multimapped.contains(&&mapping.from) {
                multimapped.push(&mapping.from);
            }
        }

        if self
            .behaviors
            .contains(MappingBehaviors::COLLECTION_REGISTRATION)
        {
            for contract in multimapped {
                register_collection(registry, contract)?;
            }
        }

        let added = snapshot.new_registrations(registry);
        tracing::info!(
            "Processed {} mappings, {} new registrations",
            self.mappings.len(),
            added.len()
        );
        Ok(added)
    }

    fn is_multimapping(&self, contract: &TypeName) -> bool {
        self.config.is_multimap(contract)
            || self.behaviors.contains(MappingBehaviors::MULTIMAP_BY_DEFAULT)
    }

    /// Explicit name, else the implementation's name when multimapping
    fn registration_name(&self, mapping: &TypeMapping, multimapping: bool) -> Option<String> {
        self.config
            .named_mapping_for(mapping)
            .or_else(|| multimapping.then(|| mapping.to.to_string()))
    }

    fn validate<R: Registry + ?Sized>(
        &self,
        registry: &R,
        mapping: &TypeMapping,
        multimapping: bool,
    ) -> Result<(), AutomapError> {
        if !multimapping {
            if let Some(existing) = registry.find_registration(&mapping.from) {
                return Err(AutomapError::duplicate_mapping(
                    mapping.from.clone(),
                    existing.mapped_to,
                    mapping.to.clone(),
                ));
            }
        }

        if let Some(name) = self.config.named_mapping_for(mapping) {
            if let Some(existing) =
                registry.find_named_registration(&mapping.from, Some(name.as_str()))
            {
                return Err(AutomapError::duplicate_named_mapping(
                    mapping.from.clone(),
                    existing.mapped_to,
                    mapping.to.clone(),
                    name,
                ));
            }
        }

        Ok(())
    }
}

fn register_collection<R: Registry + ?Sized>(
    registry: &mut R,
    contract: &TypeName,
) -> Result<(), AutomapError> {
    let collection = TypeName::collection_of(contract);
    if registry.find_registration(&collection).is_some() {
        return Ok(());
    }

    tracing::debug!("Registering collection {}", collection);
    registry.register_type(
        &collection,
        &collection,
        None,
        ServiceScope::Transient,
        &[InjectionMember::ResolvedArray {
            element: contract.clone(),
        }],
    )
}

/// Register `mappings` on `registry` and return the registrations added
pub fn perform_registrations<R: Registry + ?Sized>(
    registry: &mut R,
    mappings: &[TypeMapping],
    behaviors: MappingBehaviors,
    config: &MappingConfig,
) -> Result<Vec<RegistrationEntry>, AutomapError> {
    TypeMappingHandler::new(config, mappings, behaviors).perform_registrations(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::registry::TypeRegistry;

    fn register(
        registry: &mut TypeRegistry,
        mappings: &[TypeMapping],
        behaviors: MappingBehaviors,
        config: &MappingConfig,
    ) -> Result<Vec<RegistrationEntry>, AutomapError> {
        perform_registrations(registry, mappings, behaviors, config)
    }

    #[test]
    fn test_plain_mapping_is_transient_and_unnamed() {
        let mut registry = TypeRegistry::new();
        let added = register(
            &mut registry,
            &[TypeMapping::new("IFoo", "FooImpl")],
            MappingBehaviors::empty(),
            &MappingConfig::create(),
        )
        .unwrap();

        assert_eq!(added.len(), 1);
        assert_eq!(added[0].registered_type, TypeName::new("IFoo"));
        assert_eq!(added[0].mapped_to, TypeName::new("FooImpl"));
        assert_eq!(added[0].name, None);
        assert_eq!(added[0].lifetime, ServiceScope::Transient);
        assert!(!added[0].is_intercepted());
        assert!(!registry.has_interception_extension());
    }

    #[test]
    fn test_lifetime_selection() {
        let config = MappingConfig::create()
            .merge_singletons(["IClock"])
            .unwrap()
            .merge_custom_lifetime("ICache", ServiceScope::PerThread)
            .unwrap();
        let mut registry = TypeRegistry::new();

        register(
            &mut registry,
            &[
                TypeMapping::new("IClock", "SystemClock"),
                TypeMapping::new("ICache", "MemoryCache"),
                TypeMapping::new("IFoo", "Foo"),
            ],
            MappingBehaviors::empty(),
            &config,
        )
        .unwrap();

        let lifetime = |from: &str| registry.resolve(&from.into(), None).unwrap().lifetime;
        assert_eq!(lifetime("IClock"), ServiceScope::Singleton);
        assert_eq!(lifetime("ICache"), ServiceScope::PerThread);
        assert_eq!(lifetime("IFoo"), ServiceScope::Transient);
    }

    #[test]
    fn test_duplicate_contract_rejected_without_multimapping() {
        let mut registry = TypeRegistry::new();
        let error = register(
            &mut registry,
            &[
                TypeMapping::new("IFoo", "FooOne"),
                TypeMapping::new("IFoo", "FooTwo"),
            ],
            MappingBehaviors::empty(),
            &MappingConfig::create(),
        )
        .unwrap_err();

        match error {
            AutomapError::DuplicateMapping {
                interface,
                existing,
                attempted,
                name,
            } => {
                assert_eq!(interface, TypeName::new("IFoo"));
                assert_eq!(existing, TypeName::new("FooOne"));
                assert_eq!(attempted, TypeName::new("FooTwo"));
                assert_eq!(name, None);
            }
            other => panic!("unexpected error: {other}"),
        }

        // no rollback of the first registration
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_multimapping_allows_several_implementations() {
        let mappings = [
            TypeMapping::new("IFoo", "FooOne"),
            TypeMapping::new("IFoo", "FooTwo"),
        ];

        let mut by_default = TypeRegistry::new();
        let added = register(
            &mut by_default,
            &mappings,
            MappingBehaviors::MULTIMAP_BY_DEFAULT,
            &MappingConfig::create(),
        )
        .unwrap();
        assert_eq!(added.len(), 2);

        let mut explicit = TypeRegistry::new();
        let added = register(
            &mut explicit,
            &mappings,
            MappingBehaviors::empty(),
            &MappingConfig::create().merge_multimaps(["IFoo"]),
        )
        .unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(added[0].name.as_deref(), Some("FooOne"));
        assert_eq!(added[1].name.as_deref(), Some("FooTwo"));
        assert_eq!(explicit.resolve_all(&"IFoo".into()).len(), 2);
    }

    #[test]
    fn test_same_name_collides_even_when_multimapped() {
        let config = MappingConfig::create()
            .merge_multimaps(["ISender"])
            .merge_named("SmtpSender", "mail")
            .merge_named("QueueSender", "mail");
        let mut registry = TypeRegistry::new();

        let error = register(
            &mut registry,
            &[
                TypeMapping::new("ISender", "SmtpSender"),
                TypeMapping::new("ISender", "QueueSender"),
            ],
            MappingBehaviors::empty(),
            &config,
        )
        .unwrap_err();

        assert!(error.is_duplicate_mapping());
        assert_eq!(error.mapping_name(), Some("mail"));
    }

    #[test]
    fn test_distinct_names_coexist() {
        let config = MappingConfig::create()
            .merge_multimaps(["ISender"])
            .merge_named("SmtpSender", "smtp")
            .merge_named("QueueSender", "queue");
        let mut registry = TypeRegistry::new();

        let added = register(
            &mut registry,
            &[
                TypeMapping::new("ISender", "SmtpSender"),
                TypeMapping::new("ISender", "QueueSender"),
            ],
            MappingBehaviors::empty(),
            &config,
        )
        .unwrap();

        assert_eq!(added.len(), 2);
        assert!(registry.resolve(&"ISender".into(), Some("smtp")).is_some());
        assert!(registry.resolve(&"ISender".into(), Some("queue")).is_some());
    }

    #[test]
    fn test_distinct_names_still_collide_without_multimapping() {
        let config = MappingConfig::create()
            .merge_named("SmtpSender", "smtp")
            .merge_named("SesSender", "ses");
        let mut registry = TypeRegistry::new();

        let error = register(
            &mut registry,
            &[
                TypeMapping::new("ISender", "SmtpSender"),
                TypeMapping::new("ISender", "SesSender"),
            ],
            MappingBehaviors::empty(),
            &config,
        )
        .unwrap_err();

        match error {
            AutomapError::DuplicateMapping {
                existing,
                attempted,
                name,
                ..
            } => {
                assert_eq!(existing, TypeName::new("SmtpSender"));
                assert_eq!(attempted, TypeName::new("SesSender"));
                assert_eq!(name, None);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(registry.resolve(&"ISender".into(), Some("smtp")).is_some());
    }

    #[test]
    fn test_policy_injection_attaches_extension_once() {
        let config = MappingConfig::create().merge_policy_injected(["IAudited", "IOther"]);
        let mut registry = TypeRegistry::new();

        let added = register(
            &mut registry,
            &[
                TypeMapping::new("IAudited", "Audited"),
                TypeMapping::new("IOther", "Other"),
            ],
            MappingBehaviors::empty(),
            &config,
        )
        .unwrap();

        assert_eq!(registry.interception_extension_count(), 1);
        assert!(added.iter().all(RegistrationEntry::is_intercepted));
        assert_eq!(added[0].injection_members, InjectionMember::policy_injection());

        register(
            &mut registry,
            &[TypeMapping::new("IAudited", "Audited")],
            MappingBehaviors::MULTIMAP_BY_DEFAULT,
            &config,
        )
        .unwrap();
        assert_eq!(registry.interception_extension_count(), 1);
    }

    #[test]
    fn test_extension_skipped_when_batch_needs_none() {
        let config = MappingConfig::create().merge_policy_injected(["IUnused"]);
        let mut registry = TypeRegistry::new();

        register(
            &mut registry,
            &[TypeMapping::new("IFoo", "Foo")],
            MappingBehaviors::empty(),
            &config,
        )
        .unwrap();

        assert!(!registry.has_interception_extension());
    }

    #[test]
    fn test_extension_not_attached_when_batch_fails_first() {
        let config = MappingConfig::create().merge_policy_injected(["IAudited"]);
        let mut registry = TypeRegistry::new();

        let error = register(
            &mut registry,
            &[
                TypeMapping::new("IFoo", "FooOne"),
                TypeMapping::new("IFoo", "FooTwo"),
                TypeMapping::new("IAudited", "Audited"),
            ],
            MappingBehaviors::empty(),
            &config,
        )
        .unwrap_err();

        assert!(error.is_duplicate_mapping());
        assert!(!registry.has_interception_extension());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_extension_attached_before_first_intercepted_registration() {
        let config = MappingConfig::create().merge_policy_injected(["IAudited"]);
        let mut registry = TypeRegistry::new();

        register(
            &mut registry,
            &[
                TypeMapping::new("IFoo", "Foo"),
                TypeMapping::new("IAudited", "Audited"),
            ],
            MappingBehaviors::empty(),
            &config,
        )
        .unwrap();

        assert_eq!(registry.interception_extension_count(), 1);
        assert!(registry.resolve(&"IAudited".into(), None).unwrap().is_intercepted());
    }

    #[test]
    fn test_collection_registration_for_multimapped_contracts() {
        let config = MappingConfig::create().merge_multimaps(["IPlugin"]);
        let mut registry = TypeRegistry::new();
        let behaviors = MappingBehaviors::COLLECTION_REGISTRATION;

        let added = register(
            &mut registry,
            &[
                TypeMapping::new("IPlugin", "First"),
                TypeMapping::new("IPlugin", "Second"),
                TypeMapping::new("IFoo", "Foo"),
            ],
            behaviors,
            &config,
        )
        .unwrap();

        let collection = TypeName::collection_of(&"IPlugin".into());
        assert_eq!(added.len(), 4);
        let entry = registry.resolve(&collection, None).unwrap();
        assert_eq!(
            entry.injection_members,
            vec![InjectionMember::ResolvedArray {
                element: TypeName::new("IPlugin")
            }]
        );
        assert!(registry
            .resolve(&TypeName::collection_of(&"IFoo".into()), None)
            .is_none());

        let again = register(
            &mut registry,
            &[TypeMapping::new("IPlugin", "Third")],
            behaviors,
            &config,
        )
        .unwrap();
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].mapped_to, TypeName::new("Third"));
    }

    #[test]
    fn test_second_run_returns_only_its_own_registrations() {
        let mut registry = TypeRegistry::new();
        let config = MappingConfig::create();

        let first = register(
            &mut registry,
            &[TypeMapping::new("IFoo", "Foo")],
            MappingBehaviors::empty(),
            &config,
        )
        .unwrap();
        let second = register(
            &mut registry,
            &[TypeMapping::new("IBar", "Bar")],
            MappingBehaviors::empty(),
            &config,
        )
        .unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].registered_type, TypeName::new("IBar"));
    }

    #[test]
    fn test_prior_registration_blocks_unmultimapped_contract() {
        let mut registry = TypeRegistry::new();
        registry
            .register_type(
                &"IFoo".into(),
                &"LegacyFoo".into(),
                None,
                ServiceScope::Singleton,
                &[],
            )
            .unwrap();

        let error = register(
            &mut registry,
            &[TypeMapping::new("IFoo", "Foo")],
            MappingBehaviors::empty(),
            &MappingConfig::create(),
        )
        .unwrap_err();

        assert!(matches!(
            error,
            AutomapError::DuplicateMapping { ref existing, .. } if existing == &TypeName::new("LegacyFoo")
        ));
    }
}
