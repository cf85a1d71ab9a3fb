use std::sync::Arc;

use crate::container::configuration::MappingConfig;
use crate::errors::AutomapError;

/// Type that contributes automapping configuration in code
///
/// Providers are found among the candidate types of a run; each one is
/// constructed and asked for a configuration fragment.
pub trait ConfigProvider: Send + Sync {
    /// Produce this provider's configuration fragment
    fn create_configuration(&self) -> Result<MappingConfig, AutomapError>;
}

/// Factory constructing a configuration provider instance
pub type ProviderFactory = Arc<dyn Fn() -> Box<dyn ConfigProvider> + Send + Sync>;

impl<F> ConfigProvider for F
where
    F: Fn() -> Result<MappingConfig, AutomapError> + Send + Sync,
{
    fn create_configuration(&self) -> Result<MappingConfig, AutomapError> {
        self()
    }
}
