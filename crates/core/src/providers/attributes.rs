use crate::container::configuration::MappingConfig;
use crate::container::scope::ServiceScope;
use crate::container::types::{Marker, TypeDescriptor};
use crate::errors::AutomapError;

/// Build a configuration fragment from the markers on the candidate types
///
/// Each marker kind maps to one directive. A custom lifetime must name a
/// known lifetime manager.
pub fn scan_markers(types: &[TypeDescriptor]) -> Result<MappingConfig, AutomapError> {
    let mut config = MappingConfig::create();

    for descriptor in types {
        let ty = descriptor.name();
        for marker in descriptor.markers() {
            config = match marker {
                Marker::Exclude => config.merge_exclusions([ty.clone()]),
                Marker::Singleton => config.merge_singletons([ty.clone()])?,
                Marker::Multimap => config.merge_multimaps([ty.clone()]),
                Marker::Named(name) => config.merge_named(ty.clone(), name.clone()),
                Marker::PolicyInjection => config.merge_policy_injected([ty.clone()]),
                Marker::CustomLifetime(kind) => {
                    let scope = kind.parse::<ServiceScope>().map_err(|_| {
                        AutomapError::invalid_lifetime_manager(&ty.directive_key(), kind.clone())
                    })?;
                    config.merge_custom_lifetime(ty.clone(), scope)?
                }
            };
        }
    }

    Ok(config)
}
