//! Candidate types exercised by the smoke scenario
//!
//! One group per registration feature: a plain contract, open and closed
//! generics, multimapped and named contracts, provider-configured contracts,
//! a dependency chain and a policy-injected contract.

use automap_core::{
    AutomapError, ConfigProvider, MappingConfig, Marker, TypeArg, TypeDescriptor, TypeName,
};

pub const NAMED_MAPPING: &str = "Test";

pub fn simple() -> TypeName {
    TypeName::new("smoke::ISimple")
}

pub fn open_generic() -> TypeName {
    TypeName::generic(
        "smoke::IOpenGeneric",
        [TypeArg::param("TFirst"), TypeArg::param("TSecond")],
    )
}

pub fn closed_generic(argument: TypeName) -> TypeName {
    TypeName::generic("smoke::IClosedGeneric", [argument])
}

pub fn multimap() -> TypeName {
    TypeName::new("smoke::IMultimap")
}

pub fn single_multimap() -> TypeName {
    TypeName::new("smoke::ISingleMultimap")
}

pub fn named() -> TypeName {
    TypeName::new("smoke::INamed")
}

pub fn provider_singleton() -> TypeName {
    TypeName::new("smoke::IProviderSingleton")
}

pub fn provider_multimap() -> TypeName {
    TypeName::new("smoke::IProviderMultimap")
}

pub fn dependency() -> TypeName {
    TypeName::new("smoke::IDependency")
}

pub fn dependent() -> TypeName {
    TypeName::new("smoke::IDependent")
}

pub fn policy_injected() -> TypeName {
    TypeName::new("smoke::IPolicyInjected")
}

/// Configures the provider-driven contracts
#[derive(Default)]
pub struct SmokeConfigProvider;

impl ConfigProvider for SmokeConfigProvider {
    fn create_configuration(&self) -> Result<MappingConfig, AutomapError> {
        Ok(MappingConfig::create()
            .merge_singletons([provider_singleton()])?
            .merge_multimaps([provider_multimap()]))
    }
}

/// Every candidate type of the smoke scenario
pub fn smoke_types() -> Vec<TypeDescriptor> {
    let open_impl = TypeName::generic(
        "smoke::OpenGeneric",
        [TypeArg::param("TFirst"), TypeArg::param("TSecond")],
    );

    vec![
        TypeDescriptor::interface(simple()),
        TypeDescriptor::class("smoke::Simple").implements(simple()),
        TypeDescriptor::interface(open_generic()),
        TypeDescriptor::class(open_impl).implements(open_generic()),
        TypeDescriptor::interface(TypeName::generic(
            "smoke::IClosedGeneric",
            [TypeArg::param("T")],
        )),
        TypeDescriptor::class("smoke::IntGeneric").implements(closed_generic(TypeName::of::<i32>())),
        TypeDescriptor::class("smoke::StringGeneric")
            .implements(closed_generic(TypeName::new("String"))),
        TypeDescriptor::interface(multimap()).marked(Marker::Multimap),
        TypeDescriptor::class("smoke::MultimapOne").implements(multimap()),
        TypeDescriptor::class("smoke::MultimapTwo").implements(multimap()),
        TypeDescriptor::interface(single_multimap()).marked(Marker::Multimap),
        TypeDescriptor::class("smoke::SingleMultimap").implements(single_multimap()),
        TypeDescriptor::interface(named()),
        TypeDescriptor::class("smoke::Named")
            .implements(named())
            .marked(Marker::Named(NAMED_MAPPING.to_string())),
        TypeDescriptor::config_provider::<SmokeConfigProvider>("smoke::SmokeConfigProvider"),
        TypeDescriptor::interface(provider_singleton()),
        TypeDescriptor::class("smoke::ProviderSingleton").implements(provider_singleton()),
        TypeDescriptor::interface(provider_multimap()),
        TypeDescriptor::class("smoke::ProviderMultimapOne").implements(provider_multimap()),
        TypeDescriptor::class("smoke::ProviderMultimapTwo").implements(provider_multimap()),
        TypeDescriptor::interface(dependency()),
        TypeDescriptor::class("smoke::Dependency").implements(dependency()),
        TypeDescriptor::interface(dependent()),
        TypeDescriptor::class("smoke::Dependent").implements(dependent()),
        TypeDescriptor::interface(policy_injected()).marked(Marker::PolicyInjection),
        TypeDescriptor::class("smoke::PolicyInjected").implements(policy_injected()),
    ]
}
