use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::annotation::{Annotation, Singleton};
use crate::container::DiContainer;
use crate::key::ComponentRef;
use crate::provider::ComponentProvider;
use crate::types::Value;

/// Wraps a binding's provider with a reuse policy.
pub type ScopeFactory =
    Arc<dyn Fn(Arc<dyn ComponentProvider>) -> Arc<dyn ComponentProvider> + Send + Sync>;

/// Known scope annotations and how to realize each one.
///
/// [`Singleton`] is pre-registered; user scopes are added through
/// `DiBuilder::add_scope`.
pub struct ScopeRegistry {
    factories: HashMap<TypeId, ScopeFactory>,
}

impl ScopeRegistry {
    pub(crate) fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register::<Singleton>(Arc::new(|inner| Arc::new(SingletonProvider::new(inner))));
        registry
    }

    pub(crate) fn register<A: Annotation>(&mut self, factory: ScopeFactory) {
        self.factories.insert(TypeId::of::<A>(), factory);
    }

    pub(crate) fn lookup(&self, annotation: &dyn Annotation) -> Option<&ScopeFactory> {
        self.factories.get(&annotation.type_info().type_id)
    }
}

/// Builds once, then hands out the memoized instance for the container's
/// lifetime.
///
/// The lock keeps produce-once intact when one container is shared across
/// threads.
pub struct SingletonProvider {
    inner: Arc<dyn ComponentProvider>,
    cached: Mutex<Option<Value>>,
}

impl SingletonProvider {
    pub fn new(inner: Arc<dyn ComponentProvider>) -> Self {
        Self {
            inner,
            cached: Mutex::new(None),
        }
    }
}

impl ComponentProvider for SingletonProvider {
    fn produce(&self, container: &DiContainer) -> Value {
        let mut cached = self.cached.lock().expect("singleton cache lock");
        match cached.as_ref() {
            Some(value) => value.clone(),
            None => {
                let value = self.inner.produce(container);
                *cached = Some(value.clone());
                value
            }
        }
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.inner.dependencies()
    }
}
