use std::collections::HashSet;

use crate::container::configuration::MappingConfig;
use crate::container::mapping::{MappingBehaviors, TypeMapping};
use crate::container::types::{TypeDescriptor, TypeName};

/// Turns candidate types into the mappings to register
pub trait MappingFactory {
    fn create_mappings(
        &self,
        behaviors: MappingBehaviors,
        config: &MappingConfig,
        types: &[TypeDescriptor],
    ) -> Vec<TypeMapping>;
}

/// Maps every class onto each candidate interface it implements
///
/// An interface only counts as a contract when its generic definition is
/// itself one of the candidate types. Open implementations bind in
/// definition form, and only to contracts that forward their parameters
/// unchanged; closed implementations bind the contracts exactly as written.
/// Duplicate contracts are left for the registration handler to reject.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConventionMappingFactory;

impl ConventionMappingFactory {
    pub fn new() -> Self {
        Self
    }
}

impl MappingFactory for ConventionMappingFactory {
    fn create_mappings(
        &self,
        _behaviors: MappingBehaviors,
        config: &MappingConfig,
        types: &[TypeDescriptor],
    ) -> Vec<TypeMapping> {
        let contracts: HashSet<TypeName> = types
            .iter()
            .filter(|descriptor| descriptor.is_interface())
            .map(|descriptor| descriptor.name().definition())
            .collect();

        let mut seen = HashSet::new();
        let mut mappings = Vec::new();

        for implementation in types.iter().filter(|descriptor| descriptor.is_class()) {
            if !config.is_mappable(implementation.name()) {
                continue;
            }

            for contract in implementation.interfaces() {
                if !contracts.contains(&contract.definition()) {
                    continue;
                }

                let Some(mapping) = bind(contract, implementation.name()) else {
                    continue;
                };

                if config.is_mappable(&mapping.from) && seen.insert(mapping.clone()) {
                    mappings.push(mapping);
                }
            }
        }

        tracing::debug!(
            "Created {} mappings from {} candidate types",
            mappings.len(),
            types.len()
        );

        mappings
    }
}

fn bind(contract: &TypeName, implementation: &TypeName) -> Option<TypeMapping> {
    if implementation.is_open() {
        if implementation.is_definition_form() && contract.args() == implementation.args() {
            return Some(TypeMapping::new(
                contract.definition(),
                implementation.definition(),
            ));
        }
        return None;
    }

    if contract.is_open() {
        return None;
    }

    Some(TypeMapping::new(contract.clone(), implementation.clone()))
}
