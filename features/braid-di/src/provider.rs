use std::sync::Arc;

use crate::class::{Args, ComponentClass};
use crate::container::DiContainer;
use crate::errors::IllegalComponent;
use crate::introspection::InjectionPlan;
use crate::key::ComponentRef;
use crate::types::{AnyObj, Value};

/// A source of component instances.
///
/// Custom scopes implement this to wrap the provider of the binding they
/// decorate; a wrapper must forward [`dependencies`](Self::dependencies) so
/// graph validation sees through it.
pub trait ComponentProvider: Send + Sync {
    /// Builds (or reuses) an instance, resolving dependencies from the
    /// container.
    fn produce(&self, container: &DiContainer) -> Value;

    /// Every dependency this provider will request while producing.
    fn dependencies(&self) -> Vec<ComponentRef> {
        Vec::new()
    }
}

/// Provider for a pre-built instance: every lookup sees the same value.
pub struct InstanceProvider {
    value: Value,
}

impl InstanceProvider {
    pub fn new<T: Send + Sync + 'static>(instance: T) -> Self {
        Self {
            value: Arc::new(instance),
        }
    }
}

impl ComponentProvider for InstanceProvider {
    fn produce(&self, _container: &DiContainer) -> Value {
        self.value.clone()
    }
}

/// Builds instances from an [`InjectionPlan`]: constructor first, then
/// fields in collection order, then methods with superclass methods first.
pub struct InjectionProvider {
    plan: InjectionPlan,
}

impl InjectionProvider {
    /// Introspects the class; a malformed one is rejected here, before it
    /// can be bound.
    pub fn new(class: &Arc<ComponentClass>) -> Result<Self, IllegalComponent> {
        Ok(Self {
            plan: InjectionPlan::introspect(class)?,
        })
    }
}

impl ComponentProvider for InjectionProvider {
    fn produce(&self, container: &DiContainer) -> Value {
        tracing::trace!("constructing instance of {}", self.plan.info);

        let args = Args::new(resolve_all(container, &self.plan.constructor.refs));
        let mut instance = (self.plan.constructor.construct)(args);

        for field in &self.plan.fields {
            let value = resolve_one(container, &field.reference);
            (field.set)(project(instance.as_mut(), &field.path), value);
        }

        for method in &self.plan.methods {
            let args = Args::new(resolve_all(container, &method.refs));
            (method.invoke)(project(instance.as_mut(), &method.path), args);
        }

        Arc::from(instance)
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.plan.dependencies()
    }
}

fn resolve_all(container: &DiContainer, refs: &[ComponentRef]) -> Vec<Value> {
    refs.iter()
        .map(|reference| resolve_one(container, reference))
        .collect()
}

fn resolve_one(container: &DiContainer, reference: &ComponentRef) -> Value {
    container
        .get(reference)
        .expect("dependency presence is checked before the container is built")
}

fn project<'a>(
    mut target: &'a mut AnyObj,
    path: &[crate::class::ProjectFn],
) -> &'a mut AnyObj {
    for step in path {
        target = step(target);
    }
    target
}
