use crate::config::ConfigError;
use crate::container::types::TypeName;
use thiserror::Error;

/// Core error type for automapping runs
#[derive(Debug, Error)]
pub enum AutomapError {
    #[error("The type {type_name} has multiple lifetime managers specified.")]
    MultipleLifetimeManagers { type_name: String },

    #[error(
        "The type {type_name} has been marked with the type {manager} as a lifetime manager; \
         lifetime managers must be one of: {}.",
        crate::container::scope::ServiceScope::known_names().join(", ")
    )]
    InvalidLifetimeManager { type_name: String, manager: String },

    #[error("{}", describe_duplicate(.interface, .existing, .attempted, .name))]
    DuplicateMapping {
        interface: TypeName,
        existing: TypeName,
        attempted: TypeName,
        name: Option<String>,
    },

    #[error("Configuration provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Registry error: {message}")]
    Registry { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn describe_duplicate(
    interface: &TypeName,
    existing: &TypeName,
    attempted: &TypeName,
    name: &Option<String>,
) -> String {
    match name {
        Some(name) => format!(
            "Attempted to map at least two concrete types ({existing} and {attempted}) \
             with the same name ('{name}') to the interface {interface}."
        ),
        None => format!(
            "Attempted to map at least two concrete types ({existing} and {attempted}) \
             to the same interface ({interface}) without multimapping."
        ),
    }
}

impl AutomapError {
    /// Create an error for a type carrying more than one lifetime directive
    pub fn multiple_lifetime_managers(type_name: &TypeName) -> Self {
        Self::MultipleLifetimeManagers {
            type_name: type_name.to_string(),
        }
    }

    /// Create an error for a custom lifetime that names no known manager
    pub fn invalid_lifetime_manager(type_name: &TypeName, manager: impl Into<String>) -> Self {
        Self::InvalidLifetimeManager {
            type_name: type_name.to_string(),
            manager: manager.into(),
        }
    }

    /// Create a duplicate mapping error for an unnamed collision
    pub fn duplicate_mapping(interface: TypeName, existing: TypeName, attempted: TypeName) -> Self {
        Self::DuplicateMapping {
            interface,
            existing,
            attempted,
            name: None,
        }
    }

    /// Create a duplicate mapping error for a named collision
    pub fn duplicate_named_mapping(
        interface: TypeName,
        existing: TypeName,
        attempted: TypeName,
        name: impl Into<String>,
    ) -> Self {
        Self::DuplicateMapping {
            interface,
            existing,
            attempted,
            name: Some(name.into()),
        }
    }

    /// Create a registry error
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Create a provider error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Check if the error comes from contradictory configuration
    pub fn is_configuration_conflict(&self) -> bool {
        matches!(
            self,
            Self::MultipleLifetimeManagers { .. } | Self::InvalidLifetimeManager { .. }
        )
    }

    /// Check if the error is a duplicate mapping
    pub fn is_duplicate_mapping(&self) -> bool {
        matches!(self, Self::DuplicateMapping { .. })
    }

    /// Name carried by a named duplicate mapping
    pub fn mapping_name(&self) -> Option<&str> {
        match self {
            Self::DuplicateMapping { name, .. } => name.as_deref(),
            _ => None,
        }
    }
}
