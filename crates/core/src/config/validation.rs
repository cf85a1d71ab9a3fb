use std::path::PathBuf;

use thiserror::Error;

/// Error raised while loading mapping options
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Unknown mapping behavior '{name}'; expected multimap_by_default, \
         collection_registration or none"
    )]
    UnknownBehavior { name: String },

    #[error("Behavior bits {bits:#x} do not name any mapping behavior")]
    UnsupportedBehaviorBits { bits: u8 },

    #[error("Environment variable {variable} is not valid unicode")]
    NonUnicodeVariable { variable: String },

    #[error("Failed to read options file {}: {source}", .path.display())]
    ReadOptions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed options document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub fn unknown_behavior(name: impl Into<String>) -> Self {
        Self::UnknownBehavior { name: name.into() }
    }

    pub fn unsupported_behavior_bits(bits: u8) -> Self {
        Self::UnsupportedBehaviorBits { bits }
    }

    pub fn non_unicode_variable(variable: impl Into<String>) -> Self {
        Self::NonUnicodeVariable {
            variable: variable.into(),
        }
    }

    /// Wrap an IO failure with the path of the options file
    pub fn read_options(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadOptions {
            path: path.into(),
            source,
        }
    }
}
