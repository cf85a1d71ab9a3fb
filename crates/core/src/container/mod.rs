pub mod configuration;
pub mod controller;
pub mod factory;
pub mod handler;
pub mod mapping;
pub mod registry;
pub mod scope;
pub mod types;

pub use configuration::{MappingConfig, TypeDirectives};
pub use controller::{automap, build_configuration, MappingController};
pub use factory::{ConventionMappingFactory, MappingFactory};
pub use handler::{perform_registrations, TypeMappingHandler};
pub use mapping::{MappingBehaviors, TypeMapping};
pub use registry::{
    InjectionMember, InterceptionBehavior, InterceptorKind, RegistrationEntry,
    RegistrationSnapshot, Registry, TypeRegistry,
};
pub use scope::{ServiceScope, UnknownLifetime};
pub use types::{Marker, TypeArg, TypeDescriptor, TypeKind, TypeName, TypeSource};
