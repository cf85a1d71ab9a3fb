use std::fmt;

use crate::container::types::TypeName;

bitflags::bitflags! {
    /// Toggles guiding how mappings are registered
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct MappingBehaviors: u8 {
        /// Allow several implementations per contract unless restricted
        const MULTIMAP_BY_DEFAULT = 1 << 0;
        /// Also register the collection form of multimapped contracts
        const COLLECTION_REGISTRATION = 1 << 1;
    }
}

/// Binding from a contract to the implementation registered for it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeMapping {
    pub from: TypeName,
    pub to: TypeName,
}

impl TypeMapping {
    pub fn new(from: impl Into<TypeName>, to: impl Into<TypeName>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for TypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
