use anyhow::{bail, Context};
use automap_core::config::parse_behaviors;
use automap_core::{automap, MappingBehaviors, MappingOptions, ServiceScope, TypeName, TypeRegistry};

use crate::fixtures::{self, smoke_types, NAMED_MAPPING};

/// Outcome of one registration check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
}

pub fn run(behaviors: Option<&str>, all: bool) -> anyhow::Result<()> {
    let behavior_sets = if all {
        behavior_combinations()
    } else {
        let behaviors = match behaviors {
            Some(input) => parse_behaviors(input).context("invalid --behaviors")?,
            None => MappingBehaviors::empty(),
        };
        vec![behaviors]
    };

    let mut failures = 0;
    for behaviors in behavior_sets {
        println!("Behaviors: {:?}", behaviors);
        let results = run_scenario(behaviors)?;
        for result in &results {
            let status = if result.passed { "PASS" } else { "FAIL" };
            println!("  [{}] {}", status, result.name);
        }
        failures += results.iter().filter(|result| !result.passed).count();
    }

    if failures > 0 {
        bail!("{} smoke checks failed", failures);
    }

    println!("All smoke checks passed");
    Ok(())
}

/// Every combination of the behavior flags, starting with none
pub fn behavior_combinations() -> Vec<MappingBehaviors> {
    vec![
        MappingBehaviors::empty(),
        MappingBehaviors::MULTIMAP_BY_DEFAULT,
        MappingBehaviors::COLLECTION_REGISTRATION,
        MappingBehaviors::MULTIMAP_BY_DEFAULT | MappingBehaviors::COLLECTION_REGISTRATION,
    ]
}

/// Register the smoke types into a fresh registry and check the result
pub fn run_scenario(behaviors: MappingBehaviors) -> anyhow::Result<Vec<CheckResult>> {
    let mut registry = TypeRegistry::new();
    let options = MappingOptions::new().with_behaviors(behaviors);
    automap(&mut registry, &options, &smoke_types())
        .with_context(|| format!("automapping failed with behaviors {:?}", behaviors))?;

    let maps_to = |contract: &TypeName, name: Option<&str>, implementation: &str| {
        registry
            .resolve(contract, name)
            .is_some_and(|entry| entry.mapped_to == TypeName::new(implementation))
    };
    let collection_registered = |contract: &TypeName| {
        registry.contains(&TypeName::collection_of(contract))
            == behaviors.contains(MappingBehaviors::COLLECTION_REGISTRATION)
    };

    let open_generic = fixtures::open_generic().definition();
    let open_impl = TypeName::generic("smoke::OpenGeneric", open_generic.args().to_vec());

    let checks = vec![
        CheckResult {
            name: "simple mapping",
            passed: maps_to(&fixtures::simple(), None, "smoke::Simple"),
        },
        CheckResult {
            name: "open generic mapping",
            passed: registry
                .resolve(&open_generic, None)
                .is_some_and(|entry| entry.mapped_to == open_impl),
        },
        CheckResult {
            name: "closed generic mappings",
            passed: maps_to(
                &fixtures::closed_generic(TypeName::of::<i32>()),
                None,
                "smoke::IntGeneric",
            ) && maps_to(
                &fixtures::closed_generic(TypeName::new("String")),
                None,
                "smoke::StringGeneric",
            ),
        },
        CheckResult {
            name: "multimap",
            passed: registry.resolve_all(&fixtures::multimap()).len() == 2
                && collection_registered(&fixtures::multimap()),
        },
        CheckResult {
            name: "single instance multimap",
            passed: maps_to(&fixtures::single_multimap(), None, "smoke::SingleMultimap"),
        },
        CheckResult {
            name: "named mapping",
            passed: maps_to(&fixtures::named(), Some(NAMED_MAPPING), "smoke::Named"),
        },
        CheckResult {
            name: "provider singleton",
            passed: registry
                .resolve(&fixtures::provider_singleton(), None)
                .is_some_and(|entry| entry.lifetime == ServiceScope::Singleton),
        },
        CheckResult {
            name: "provider multimap",
            passed: registry.resolve_all(&fixtures::provider_multimap()).len() == 2
                && collection_registered(&fixtures::provider_multimap()),
        },
        CheckResult {
            name: "dependency chain",
            passed: maps_to(&fixtures::dependency(), None, "smoke::Dependency")
                && maps_to(&fixtures::dependent(), None, "smoke::Dependent"),
        },
        CheckResult {
            name: "policy injection",
            passed: registry.interception_extension_count() == 1
                && registry
                    .resolve(&fixtures::policy_injected(), None)
                    .is_some_and(|entry| entry.is_intercepted()),
        },
    ];

    Ok(checks)
}
