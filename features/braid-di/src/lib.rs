//! Braid DI consists of the following components:
//!
//! 1. DiBuilder - for registering instances, injectable classes and scopes.
//! 2. DependencyGraph - which validates the declared wiring before anything
//!    is built, and aborts the build if:
//!    - Any required dependency is missing
//!    - Any construction cycle was found (deferred `Provider` edges are exempt)
//! 3. DiContainer - the frozen registry that answers `ComponentRef` lookups.
//! 4. ComponentClass / InjectionPlan - the metadata stand-in for reflection:
//!    a class declares its constructors, fields, methods and annotations, and
//!    the plan is what the container executes to build and inject an instance.
//!
//! General logic:
//! Bindings go in through DiBuilder, which rejects malformed components
//! immediately. `build()` walks every provider's declared dependencies,
//! checks the graph, and freezes a DiContainer. A lookup materializes the
//! component graph rooted at the request: constructor parameters first, then
//! fields, then inject methods with superclass methods running before
//! subclass methods. Scope wrappers decide how much of that work is reused
//! between lookups.

pub mod annotation;
pub mod builder;
pub mod class;
pub mod container;
pub mod dependency_graph;
pub mod errors;
pub mod introspection;
pub mod key;
pub mod provider;
pub mod scope;
pub mod types;

pub use annotation::{literal, Annotation, AnnotationKind, DynAnnotation, Named, Singleton};
pub use builder::DiBuilder;
pub use class::{
    downcast_value, Args, ClassBuilder, ComponentClass, ConstructorMeta, DeclaredType, FieldMeta,
    MethodMeta, ProjectFn, SiteMeta,
};
pub use container::{DiContainer, Provider, ProviderHandle};
pub use dependency_graph::DependencyGraph;
pub use errors::{GraphError, GraphErrors, IllegalComponent};
pub use introspection::InjectionPlan;
pub use key::{ComponentKey, ComponentRef, RefKind};
pub use provider::{ComponentProvider, InjectionProvider, InstanceProvider};
pub use scope::{ScopeFactory, ScopeRegistry, SingletonProvider};
pub use types::{AnyObj, BoxedInstance, TypeInfo, Value};
