use crate::config::ConfigError;
use crate::container::mapping::MappingBehaviors;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Environment variable holding the behavior flags for a run
pub const BEHAVIORS_ENV_VAR: &str = "AUTOMAP_BEHAVIORS";

/// Options guiding one automapping run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingOptions {
    pub behaviors: MappingBehaviors,
}

impl MappingOptions {
    /// Create options with no behaviors set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the behavior flags
    pub fn with_behaviors(mut self, behaviors: MappingBehaviors) -> Self {
        self.behaviors = behaviors;
        self
    }

    /// Load options from `AUTOMAP_BEHAVIORS`, falling back to defaults when unset
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = Self::new();

        match env::var(BEHAVIORS_ENV_VAR) {
            Ok(value) => options.behaviors = parse_behaviors(&value)?,
            Err(env::VarError::NotPresent) => {}
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::non_unicode_variable(BEHAVIORS_ENV_VAR));
            }
        }

        options.validate()?;
        Ok(options)
    }

    /// Parse options from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_yaml::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_options(path, e))?;
        Self::from_yaml_str(&contents)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unknown = self.behaviors.bits() & !MappingBehaviors::all().bits();
        if unknown != 0 {
            return Err(ConfigError::unsupported_behavior_bits(unknown));
        }
        Ok(())
    }
}

/// Parse a list of behavior names separated by `,` or `|`
///
/// Names are case-insensitive and may use either `multimap_by_default` or
/// `MultimapByDefault` spelling. `none` and the empty string yield no flags.
pub fn parse_behaviors(input: &str) -> Result<MappingBehaviors, ConfigError> {
    let mut behaviors = MappingBehaviors::empty();

    for raw in input.split([',', '|']) {
        let name = raw.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("none") {
            continue;
        }

        let flag = MappingBehaviors::from_name(&normalize_flag_name(name))
            .ok_or_else(|| ConfigError::unknown_behavior(name))?;
        behaviors |= flag;
    }

    Ok(behaviors)
}

fn normalize_flag_name(name: &str) -> String {
    if name.contains('_') {
        return name.to_ascii_uppercase();
    }

    // MultimapByDefault -> MULTIMAP_BY_DEFAULT
    let mut normalized = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            normalized.push('_');
        }
        normalized.push(ch.to_ascii_uppercase());
    }
    normalized
}
