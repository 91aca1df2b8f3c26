use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::dependency_graph::DependencyGraph;
use crate::key::{ComponentKey, ComponentRef, RefKind};
use crate::provider::ComponentProvider;
use crate::types::Value;

/// The frozen registry every lookup goes through.
///
/// Produced by `DiBuilder::build` after validation; cloning shares the same
/// registry. Later builder mutations never reach an already-built container.
#[derive(Clone)]
pub struct DiContainer(Arc<ContainerInner>);

struct ContainerInner {
    bindings: HashMap<ComponentKey, Arc<dyn ComponentProvider>>,
    graph: DependencyGraph,
}

impl fmt::Debug for DiContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for key in self.0.bindings.keys() {
            set.entry(&format_args!("{}", key));
        }
        set.finish()
    }
}

impl DiContainer {
    pub(crate) fn new(
        bindings: Vec<(ComponentKey, Arc<dyn ComponentProvider>)>,
        graph: DependencyGraph,
    ) -> Self {
        Self(Arc::new(ContainerInner {
            bindings: bindings.into_iter().collect(),
            graph,
        }))
    }

    /// Answers one injection request.
    ///
    /// A direct request materializes the component; a provider request
    /// returns a deferred [`ProviderHandle`]. An unbound key resolves to
    /// `None`, as does any container shape other than a provider.
    pub fn get(&self, reference: &ComponentRef) -> Option<Value> {
        match reference.kind() {
            RefKind::Direct => {
                let provider = self.provider(reference.key())?;
                Some(provider.produce(self))
            }
            RefKind::Provider => {
                self.provider(reference.key())?;
                let handle: Value = Arc::new(ProviderHandle {
                    container: self.clone(),
                    key: reference.key().clone(),
                });
                Some(handle)
            }
            RefKind::Unsupported => None,
        }
    }

    /// Typed lookup for an unqualified binding whose concrete type is `T`.
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.resolve_ref(&ComponentRef::of::<T>())
    }

    /// Typed lookup by explicit reference.
    ///
    /// Yields `None` when the key is unbound or the bound value is not a `T`
    /// (a key type bound to a different implementation class).
    pub fn resolve_ref<T: Send + Sync + 'static>(&self, reference: &ComponentRef) -> Option<Arc<T>> {
        self.get(reference)?.downcast::<T>().ok()
    }

    /// The validated dependency graph behind this container.
    pub fn graph(&self) -> &DependencyGraph {
        &self.0.graph
    }

    fn provider(&self, key: &ComponentKey) -> Option<&Arc<dyn ComponentProvider>> {
        self.0.bindings.get(key)
    }
}

/// Deferred accessor behind a provider request.
///
/// Holds the container, so the target is materialized only when asked for.
/// Each call goes back through the target's provider; scoping decides
/// whether that reuses an instance.
#[derive(Clone)]
pub struct ProviderHandle {
    container: DiContainer,
    key: ComponentKey,
}

impl ProviderHandle {
    /// Materializes the target component now.
    pub fn get(&self) -> Value {
        self.container
            .provider(&self.key)
            .expect("a handle is only issued for a bound key")
            .produce(&self.container)
    }

    pub fn key(&self) -> &ComponentKey {
        &self.key
    }
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProviderHandle({})", self.key)
    }
}

/// Typed deferred accessor, the injectable face of [`ProviderHandle`].
pub struct Provider<T> {
    handle: ProviderHandle,
    _target: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Provider<T> {
    /// Restores the typed accessor from an injected value.
    pub fn from_injected(value: Value) -> Self {
        let handle = value
            .downcast::<ProviderHandle>()
            .unwrap_or_else(|_| panic!("injected value for a provider site is not a handle"));
        Self {
            handle: (*handle).clone(),
            _target: PhantomData,
        }
    }

    /// Materializes the target component now.
    pub fn get(&self) -> Arc<T> {
        self.handle
            .get()
            .downcast::<T>()
            .unwrap_or_else(|_| panic!("provider target is not a {}", std::any::type_name::<T>()))
    }
}

impl<T> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            _target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Provider<{}>", std::any::type_name::<T>())
    }
}
