pub mod config;
pub mod container;
pub mod errors;
pub mod providers;

// Re-export key types for convenience
pub use config::{ConfigError, MappingOptions};
pub use container::{
    automap, perform_registrations, ConventionMappingFactory, MappingBehaviors, MappingConfig,
    MappingController, MappingFactory, Marker, RegistrationEntry, Registry, ServiceScope,
    TypeArg, TypeDescriptor, TypeMapping, TypeMappingHandler, TypeName, TypeRegistry, TypeSource,
};
pub use errors::AutomapError;
pub use providers::{ConfigProvider, ProviderFactory};
