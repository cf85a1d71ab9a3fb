/// Lifetime manager applied to a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceScope {
    /// New instance for every resolution
    Transient,
    /// Single instance owned by the registry for the process lifetime
    Singleton,
    /// Single instance per child registry
    Hierarchical,
    /// Instance reused within one resolution graph
    PerResolve,
    /// Single instance per thread
    PerThread,
    /// Instance owned elsewhere; the registry holds a weak reference
    ExternallyControlled,
}

impl ServiceScope {
    const ALL: [ServiceScope; 6] = [
        ServiceScope::Transient,
        ServiceScope::Singleton,
        ServiceScope::Hierarchical,
        ServiceScope::PerResolve,
        ServiceScope::PerThread,
        ServiceScope::ExternallyControlled,
    ];

    /// Get the scope name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceScope::Transient => "transient",
            ServiceScope::Singleton => "singleton",
            ServiceScope::Hierarchical => "hierarchical",
            ServiceScope::PerResolve => "per_resolve",
            ServiceScope::PerThread => "per_thread",
            ServiceScope::ExternallyControlled => "externally_controlled",
        }
    }

    /// Names accepted by `FromStr`
    pub fn known_names() -> Vec<&'static str> {
        Self::ALL.iter().map(ServiceScope::as_str).collect()
    }
}

impl Default for ServiceScope {
    fn default() -> Self {
        ServiceScope::Transient
    }
}

impl std::fmt::Display for ServiceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for a lifetime name that matches no known manager
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown lifetime manager: {0}")]
pub struct UnknownLifetime(pub String);

impl std::str::FromStr for ServiceScope {
    type Err = UnknownLifetime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        let normalized = normalized.strip_suffix("lifetimemanager").unwrap_or(&normalized);

        match normalized {
            "transient" => Ok(ServiceScope::Transient),
            "singleton" | "containercontrolled" => Ok(ServiceScope::Singleton),
            "hierarchical" => Ok(ServiceScope::Hierarchical),
            "perresolve" => Ok(ServiceScope::PerResolve),
            "perthread" => Ok(ServiceScope::PerThread),
            "externallycontrolled" => Ok(ServiceScope::ExternallyControlled),
            _ => Err(UnknownLifetime(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_scope_from_str() {
        assert_eq!("singleton".parse::<ServiceScope>().unwrap(), ServiceScope::Singleton);
        assert_eq!("transient".parse::<ServiceScope>().unwrap(), ServiceScope::Transient);
        assert_eq!("per_thread".parse::<ServiceScope>().unwrap(), ServiceScope::PerThread);
        assert_eq!(
            "HierarchicalLifetimeManager".parse::<ServiceScope>().unwrap(),
            ServiceScope::Hierarchical
        );
        assert_eq!(
            "ContainerControlledLifetimeManager".parse::<ServiceScope>().unwrap(),
            ServiceScope::Singleton
        );

        assert_eq!(
            "String".parse::<ServiceScope>(),
            Err(UnknownLifetime("String".to_string()))
        );
    }

    #[test]
    fn test_service_scope_display_round_trips() {
        for scope in ServiceScope::ALL {
            assert_eq!(scope.to_string().parse::<ServiceScope>().unwrap(), scope);
        }
        assert_eq!(ServiceScope::default(), ServiceScope::Transient);
    }
}
