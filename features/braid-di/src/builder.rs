use std::collections::HashMap;
use std::sync::Arc;

use crate::annotation::{Annotation, AnnotationKind, DynAnnotation};
use crate::class::ComponentClass;
use crate::container::DiContainer;
use crate::dependency_graph::DependencyGraph;
use crate::errors::{GraphErrors, IllegalComponent};
use crate::key::ComponentKey;
use crate::provider::{ComponentProvider, InjectionProvider, InstanceProvider};
use crate::scope::{ScopeFactory, ScopeRegistry};
use crate::types::TypeInfo;

/// Collects bindings and scopes, then freezes them into a [`DiContainer`].
///
/// Binding a key twice replaces the earlier binding. Malformed components
/// and misused annotations are rejected here; graph-level problems are
/// reported by [`build`](Self::build).
pub struct DiBuilder {
    bindings: Vec<(ComponentKey, Arc<dyn ComponentProvider>)>,
    index: HashMap<ComponentKey, usize>,
    scopes: ScopeRegistry,
}

impl Default for DiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DiBuilder {
    pub fn new() -> Self {
        DiBuilder {
            bindings: Vec::new(),
            index: HashMap::new(),
            scopes: ScopeRegistry::new(),
        }
    }

    /// Binds `T` to an existing instance.
    pub fn add_instance<T: Send + Sync + 'static>(mut self, instance: T) -> Self {
        self.insert(
            ComponentKey::of::<T>(),
            Arc::new(InstanceProvider::new(instance)),
        );
        self
    }

    /// Binds an existing instance once per qualifier.
    ///
    /// Every annotation must be qualifier-kind; an instance binding has no
    /// use for a scope or a plain annotation.
    pub fn add_instance_with<T: Send + Sync + 'static>(
        mut self,
        instance: T,
        annotations: Vec<DynAnnotation>,
    ) -> Result<Self, IllegalComponent> {
        for annotation in &annotations {
            if annotation.kind() != AnnotationKind::Qualifier {
                return Err(IllegalComponent::NotAQualifier {
                    annotation: annotation.type_info(),
                });
            }
        }
        let provider: Arc<dyn ComponentProvider> = Arc::new(InstanceProvider::new(instance));
        self.insert_each::<T>(provider, annotations);
        Ok(self)
    }

    /// Binds key type `S` to a class built and injected by the container.
    pub fn add_component<S: ?Sized + 'static>(
        self,
        class: &Arc<ComponentClass>,
    ) -> Result<Self, IllegalComponent> {
        self.add_component_with::<S>(class, Vec::new())
    }

    /// Binds key type `S` to a class, once per supplied qualifier, wrapped in
    /// the effective scope if one applies.
    pub fn add_component_with<S: ?Sized + 'static>(
        mut self,
        class: &Arc<ComponentClass>,
        annotations: Vec<DynAnnotation>,
    ) -> Result<Self, IllegalComponent> {
        let (qualifiers, argument_scope) = split_annotations(class.info(), &annotations)?;
        let scope = effective_scope(class, argument_scope)?;

        let mut provider: Arc<dyn ComponentProvider> = Arc::new(InjectionProvider::new(class)?);
        if let Some(annotation) = scope {
            let factory =
                self.scopes
                    .lookup(annotation.as_ref())
                    .ok_or(IllegalComponent::UnknownScope {
                        annotation: annotation.type_info(),
                    })?;
            provider = factory(provider);
        }

        self.insert_each::<S>(provider, qualifiers);
        Ok(self)
    }

    /// Registers a scope realization for annotation type `A`.
    pub fn add_scope<A: Annotation>(mut self, factory: ScopeFactory) -> Self {
        self.scopes.register::<A>(factory);
        self
    }

    /// Validates the dependency graph and freezes the container.
    pub fn build(self) -> Result<DiContainer, GraphErrors> {
        let graph = DependencyGraph::new(&self.bindings);
        graph.check()?;

        tracing::debug!("container resolved with {} bindings", self.bindings.len());
        Ok(DiContainer::new(self.bindings, graph))
    }

    /// One binding per qualifier, all sharing the same provider; no
    /// qualifiers means one unqualified binding.
    fn insert_each<S: ?Sized + 'static>(
        &mut self,
        provider: Arc<dyn ComponentProvider>,
        qualifiers: Vec<DynAnnotation>,
    ) {
        if qualifiers.is_empty() {
            self.insert(ComponentKey::of::<S>(), provider);
        } else {
            for qualifier in qualifiers {
                self.insert(ComponentKey::qualified::<S>(qualifier), provider.clone());
            }
        }
    }

    fn insert(&mut self, key: ComponentKey, provider: Arc<dyn ComponentProvider>) {
        match self.index.get(&key) {
            Some(position) => self.bindings[*position] = (key, provider),
            None => {
                self.index.insert(key.clone(), self.bindings.len());
                self.bindings.push((key, provider));
            }
        }
    }
}

fn split_annotations(
    owner: TypeInfo,
    annotations: &[DynAnnotation],
) -> Result<(Vec<DynAnnotation>, Option<DynAnnotation>), IllegalComponent> {
    let mut qualifiers = Vec::new();
    let mut scope = None;
    for annotation in annotations {
        match annotation.kind() {
            AnnotationKind::Qualifier => qualifiers.push(annotation.clone()),
            AnnotationKind::Scope => {
                if scope.replace(annotation.clone()).is_some() {
                    return Err(IllegalComponent::MultipleScopes(owner));
                }
            }
            AnnotationKind::Plain => {
                return Err(IllegalComponent::NotAQualifier {
                    annotation: annotation.type_info(),
                });
            }
        }
    }
    Ok((qualifiers, scope))
}

fn effective_scope(
    class: &ComponentClass,
    argument_scope: Option<DynAnnotation>,
) -> Result<Option<DynAnnotation>, IllegalComponent> {
    let class_scopes = class.scope_annotations();
    if class_scopes.len() > 1 {
        return Err(IllegalComponent::MultipleScopes(class.info()));
    }
    // A scope supplied at bind time wins over the class annotation.
    Ok(argument_scope.or_else(|| class_scopes.into_iter().next()))
}
