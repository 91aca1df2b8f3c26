use thiserror::Error;

use crate::key::ComponentKey;
use crate::types::TypeInfo;

/// A component whose declared shape the container cannot accept.
///
/// Raised while binding, before any graph checks run.
#[derive(Error, Debug, Clone)]
pub enum IllegalComponent {
    #[error("'{0}' is abstract and cannot be bound as an implementation")]
    AbstractComponent(TypeInfo),

    #[error("'{0}' declares more than one inject constructor")]
    MultipleInjectConstructors(TypeInfo),

    #[error("'{0}' has neither an inject constructor nor a default constructor")]
    NoUsableConstructor(TypeInfo),

    #[error("inject field '{class}::{field}' is immutable")]
    ImmutableInjectField { class: TypeInfo, field: &'static str },

    #[error("inject method '{class}::{method}' declares its own type parameters")]
    GenericInjectMethod {
        class: TypeInfo,
        method: &'static str,
    },

    #[error("more than one qualifier on an injection site of '{0}'")]
    MultipleQualifiers(TypeInfo),

    #[error("'{annotation}' is not a qualifier annotation")]
    NotAQualifier { annotation: TypeInfo },

    #[error("more than one scope for the binding of '{0}'")]
    MultipleScopes(TypeInfo),

    #[error("no scope registered for annotation '{annotation}'")]
    UnknownScope { annotation: TypeInfo },

    #[error("unsupported container shape on an injection site of '{0}'")]
    UnsupportedSite(TypeInfo),
}

/// A single finding from dependency-graph validation.
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("'{component}' requires '{dependency}' but it is not bound")]
    DependencyNotFound {
        component: ComponentKey,
        dependency: ComponentKey,
    },

    #[error("cyclic dependencies through {components:?}")]
    CyclicDependenciesFound { components: Vec<ComponentKey> },
}

/// Everything wrong with the dependency graph, reported together.
#[derive(Error, Debug, Clone)]
pub struct GraphErrors {
    pub errors: Vec<GraphError>,
}

impl std::fmt::Display for GraphErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("the dependency graph had one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}
