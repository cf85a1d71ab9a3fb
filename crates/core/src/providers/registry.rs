use crate::container::configuration::MappingConfig;
use crate::container::types::{TypeDescriptor, TypeName};
use crate::errors::AutomapError;
use crate::providers::ProviderFactory;

/// Configuration providers found among the candidate types of a run
pub struct ProviderRegistry {
    providers: Vec<(TypeName, ProviderFactory)>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Collect every candidate type exposing a provider factory
    pub fn from_types(types: &[TypeDescriptor]) -> Self {
        let mut registry = Self::new();
        for descriptor in types {
            if let Some(factory) = descriptor.provider() {
                registry.register(descriptor.name().clone(), factory.clone());
            }
        }
        registry
    }

    /// Register a provider factory under the name of its type
    pub fn register(&mut self, name: TypeName, factory: ProviderFactory) {
        self.providers.push((name, factory));
    }

    /// Get the number of registered providers
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Construct every provider and merge their fragments in registration order
    ///
    /// Lifetime conflicts pass through unchanged; any other provider failure
    /// is reported against the provider's name.
    pub fn create_configuration(&self) -> Result<MappingConfig, AutomapError> {
        let mut config = MappingConfig::create();

        for (name, factory) in &self.providers {
            tracing::debug!("Loading configuration provider: {}", name);
            let provider = factory();
            let fragment = provider.create_configuration().map_err(|e| {
                if e.is_configuration_conflict() {
                    e
                } else {
                    AutomapError::provider(name.to_string(), e.to_string())
                }
            })?;
            config = config.merge(&fragment)?;
        }

        Ok(config)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
