use uuid::Uuid;

use crate::config::MappingOptions;
use crate::container::configuration::MappingConfig;
use crate::container::factory::{ConventionMappingFactory, MappingFactory};
use crate::container::handler::TypeMappingHandler;
use crate::container::mapping::MappingBehaviors;
use crate::container::registry::{RegistrationEntry, Registry};
use crate::container::types::{TypeDescriptor, TypeSource};
use crate::errors::AutomapError;
use crate::providers::{scan_markers, ProviderRegistry};

/// Runs the automapping pipeline against a target registry
///
/// Configuration comes from the providers among the candidate types first,
/// then from their markers. Both are rebuilt on every call.
pub struct MappingController<'r, R: Registry + ?Sized> {
    target: &'r mut R,
    factory: Box<dyn MappingFactory>,
}

impl<'r, R: Registry + ?Sized> MappingController<'r, R> {
    /// Create a controller using the convention mapping factory
    pub fn new(target: &'r mut R) -> Self {
        Self::with_factory(target, Box::new(ConventionMappingFactory::new()))
    }

    /// Create a controller with a custom mapping factory
    pub fn with_factory(target: &'r mut R, factory: Box<dyn MappingFactory>) -> Self {
        Self { target, factory }
    }

    /// Map and register the candidate types, returning the registrations added
    pub fn register_types(
        &mut self,
        behaviors: MappingBehaviors,
        types: &[TypeDescriptor],
    ) -> Result<Vec<RegistrationEntry>, AutomapError> {
        let span = tracing::info_span!("automap", run_id = %Uuid::new_v4());
        let _guard = span.enter();

        tracing::info!(
            "Automapping {} candidate types with behaviors {:?}",
            types.len(),
            behaviors
        );

        let config = build_configuration(types)?;
        let mappings = self.factory.create_mappings(behaviors, &config, types);

        TypeMappingHandler::new(&config, &mappings, behaviors).perform_registrations(&mut *self.target)
    }
}

/// Build the merged configuration for a set of candidate types
pub fn build_configuration(types: &[TypeDescriptor]) -> Result<MappingConfig, AutomapError> {
    let providers = ProviderRegistry::from_types(types);
    let provided = providers.create_configuration()?;
    let scanned = scan_markers(types)?;
    provided.merge(&scanned)
}

/// Automap every type supplied by `source` into `registry`
pub fn automap<R: Registry + ?Sized>(
    registry: &mut R,
    options: &MappingOptions,
    source: &dyn TypeSource,
) -> Result<Vec<RegistrationEntry>, AutomapError> {
    let types = source.types();
    MappingController::new(registry).register_types(options.behaviors, &types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::mapping::TypeMapping;
    use crate::container::registry::TypeRegistry;
    use crate::container::scope::ServiceScope;
    use crate::container::types::{Marker, TypeName};
    use crate::providers::ConfigProvider;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct StringSingletonProvider;

    impl ConfigProvider for StringSingletonProvider {
        fn create_configuration(&self) -> Result<MappingConfig, AutomapError> {
            MappingConfig::create().merge_singletons(["String"])
        }
    }

    #[derive(Default)]
    struct SecondaryConfigProvider;

    impl ConfigProvider for SecondaryConfigProvider {
        fn create_configuration(&self) -> Result<MappingConfig, AutomapError> {
            Ok(MappingConfig::create().merge_exclusions(["i32"]))
        }
    }

    /// Records the configuration it was called with and returns fixed mappings
    struct RecordingFactory {
        seen: Arc<Mutex<Vec<MappingConfig>>>,
        mappings: Vec<TypeMapping>,
    }

    impl MappingFactory for RecordingFactory {
        fn create_mappings(
            &self,
            _behaviors: MappingBehaviors,
            config: &MappingConfig,
            _types: &[TypeDescriptor],
        ) -> Vec<TypeMapping> {
            self.seen.lock().unwrap().push(config.clone());
            self.mappings.clone()
        }
    }

    fn recording(mappings: Vec<TypeMapping>) -> (Box<RecordingFactory>, Arc<Mutex<Vec<MappingConfig>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let factory = Box::new(RecordingFactory {
            seen: seen.clone(),
            mappings,
        });
        (factory, seen)
    }

    #[test]
    fn test_provider_and_marker_configuration_reach_the_factory() {
        let types = vec![
            TypeDescriptor::config_provider::<StringSingletonProvider>("StringSingletonProvider"),
            TypeDescriptor::config_provider::<SecondaryConfigProvider>("SecondaryConfigProvider"),
            TypeDescriptor::interface("IMultiMap").marked(Marker::Multimap),
        ];
        let (factory, seen) = recording(Vec::new());
        let mut registry = TypeRegistry::new();

        MappingController::with_factory(&mut registry, factory)
            .register_types(MappingBehaviors::empty(), &types)
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_singleton(&"String".into()));
        assert!(!seen[0].is_mappable(&"i32".into()));
        assert!(seen[0].is_multimap(&"IMultiMap".into()));
    }

    #[test]
    fn test_factory_mappings_are_registered() {
        let (factory, _) = recording(vec![TypeMapping::new("IFoo", "Foo")]);
        let mut registry = TypeRegistry::new();

        let added = MappingController::with_factory(&mut registry, factory)
            .register_types(MappingBehaviors::empty(), &[])
            .unwrap();

        assert_eq!(added.len(), 1);
        assert_eq!(added[0].mapped_to, TypeName::new("Foo"));
    }

    #[test]
    fn test_provider_conflicting_with_markers_aborts_before_registration() {
        #[derive(Default)]
        struct HierarchicalProvider;

        impl ConfigProvider for HierarchicalProvider {
            fn create_configuration(&self) -> Result<MappingConfig, AutomapError> {
                MappingConfig::create().merge_custom_lifetime("IClock", ServiceScope::Hierarchical)
            }
        }

        let types = vec![
            TypeDescriptor::config_provider::<HierarchicalProvider>("HierarchicalProvider"),
            TypeDescriptor::interface("IClock").marked(Marker::Singleton),
            TypeDescriptor::class("SystemClock").implements("IClock"),
        ];
        let mut registry = TypeRegistry::new();

        let error = MappingController::new(&mut registry)
            .register_types(MappingBehaviors::empty(), &types)
            .unwrap_err();

        assert!(error.is_configuration_conflict());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_automap_uses_option_behaviors() {
        let types = vec![
            TypeDescriptor::interface("IFoo"),
            TypeDescriptor::class("FooOne").implements("IFoo"),
            TypeDescriptor::class("FooTwo").implements("IFoo"),
        ];
        let mut registry = TypeRegistry::new();

        assert!(automap(&mut registry, &MappingOptions::new(), &types)
            .unwrap_err()
            .is_duplicate_mapping());

        let mut registry = TypeRegistry::new();
        let options = MappingOptions::new().with_behaviors(MappingBehaviors::MULTIMAP_BY_DEFAULT);
        let added = automap(&mut registry, &options, &types).unwrap();
        assert_eq!(added.len(), 2);
    }
}
