use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::errors::{GraphError, GraphErrors};
use crate::key::{ComponentKey, ComponentRef, RefKind};
use crate::provider::ComponentProvider;

/// The declared dependency graph of a binding set.
///
/// Checked once while the container is built; kept afterwards so the wiring
/// can be inspected.
pub struct DependencyGraph {
    entries: Vec<GraphEntry>,
    index: HashMap<ComponentKey, usize>,
}

struct GraphEntry {
    key: ComponentKey,
    dependencies: Vec<ComponentRef>,
}

impl DependencyGraph {
    pub(crate) fn new(bindings: &[(ComponentKey, Arc<dyn ComponentProvider>)]) -> Self {
        let mut entries = Vec::with_capacity(bindings.len());
        let mut index = HashMap::with_capacity(bindings.len());
        for (key, provider) in bindings {
            index.insert(key.clone(), entries.len());
            entries.push(GraphEntry {
                key: key.clone(),
                dependencies: provider.dependencies(),
            });
        }
        Self { entries, index }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared dependencies of `key`, if it is bound.
    pub fn dependencies_of(&self, key: &ComponentKey) -> Option<&[ComponentRef]> {
        self.index
            .get(key)
            .map(|position| self.entries[*position].dependencies.as_slice())
    }

    /// Validates the whole graph.
    ///
    /// Every declared request, deferred or not, must name a bound key. Cycle
    /// detection runs over direct edges only: a deferred provider edge does
    /// not materialize its target during construction, so it cannot close a
    /// construction cycle.
    ///
    /// Returns a list of all issues.
    pub fn check(&self) -> Result<(), GraphErrors> {
        let mut checked = HashSet::new();
        let mut errors = Vec::new();

        for entry in &self.entries {
            let mut chain = Vec::new();
            self.check_recurse(entry, &mut checked, &mut errors, &mut chain);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(GraphErrors { errors })
        }
    }

    fn check_recurse(
        &self,
        entry: &GraphEntry,
        checked: &mut HashSet<ComponentKey>,
        errors: &mut Vec<GraphError>,
        chain: &mut Vec<ComponentKey>,
    ) {
        // Re-entering a key on the visiting chain closes a cycle; report the
        // keys from its first occurrence onward.
        if let Some(position) = chain.iter().position(|visiting| *visiting == entry.key) {
            errors.push(GraphError::CyclicDependenciesFound {
                components: chain[position..].to_vec(),
            });
            return;
        }

        // Skip other checks if already checked
        if !checked.insert(entry.key.clone()) {
            return;
        }

        chain.push(entry.key.clone());

        for dependency in &entry.dependencies {
            let Some(next) = self
                .index
                .get(dependency.key())
                .map(|position| &self.entries[*position])
            else {
                errors.push(GraphError::DependencyNotFound {
                    component: entry.key.clone(),
                    dependency: dependency.key().clone(),
                });
                continue;
            };

            if dependency.kind() == RefKind::Provider {
                // Deferred edge, checked when its own entry is visited.
                continue;
            }

            self.check_recurse(next, checked, errors, chain);
        }

        chain.pop();
    }
}

#[cfg(test)]
mod tests {
    use crate::container::DiContainer;
    use crate::types::Value;

    use super::*;

    struct Declares(Vec<ComponentRef>);

    impl ComponentProvider for Declares {
        fn produce(&self, _container: &DiContainer) -> Value {
            unreachable!("validation never produces")
        }

        fn dependencies(&self) -> Vec<ComponentRef> {
            self.0.clone()
        }
    }

    struct A;
    struct B;
    struct C;

    fn graph(bindings: Vec<(ComponentKey, Vec<ComponentRef>)>) -> DependencyGraph {
        let bindings: Vec<(ComponentKey, Arc<dyn ComponentProvider>)> = bindings
            .into_iter()
            .map(|(key, refs)| (key, Arc::new(Declares(refs)) as Arc<dyn ComponentProvider>))
            .collect();
        DependencyGraph::new(&bindings)
    }

    #[test]
    fn reports_missing_dependency() {
        let graph = graph(vec![(ComponentKey::of::<A>(), vec![ComponentRef::of::<B>()])]);

        let errors = graph.check().unwrap_err().errors;
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            GraphError::DependencyNotFound { component, dependency }
                if *component == ComponentKey::of::<A>() && *dependency == ComponentKey::of::<B>()
        ));
    }

    #[test]
    fn reports_two_member_cycle_once() {
        let graph = graph(vec![
            (ComponentKey::of::<A>(), vec![ComponentRef::of::<B>()]),
            (ComponentKey::of::<B>(), vec![ComponentRef::of::<A>()]),
        ]);

        let errors = graph.check().unwrap_err().errors;
        assert_eq!(errors.len(), 1);
        let GraphError::CyclicDependenciesFound { components } = &errors[0] else {
            panic!("expected a cycle, got {:?}", errors[0]);
        };
        assert_eq!(components.len(), 2);
        assert!(components.contains(&ComponentKey::of::<A>()));
        assert!(components.contains(&ComponentKey::of::<B>()));
    }

    #[test]
    fn reports_three_member_cycle() {
        let graph = graph(vec![
            (ComponentKey::of::<A>(), vec![ComponentRef::of::<B>()]),
            (ComponentKey::of::<B>(), vec![ComponentRef::of::<C>()]),
            (ComponentKey::of::<C>(), vec![ComponentRef::of::<A>()]),
        ]);

        let errors = graph.check().unwrap_err().errors;
        let GraphError::CyclicDependenciesFound { components } = &errors[0] else {
            panic!("expected a cycle, got {:?}", errors[0]);
        };
        assert_eq!(components.len(), 3);
    }

    #[test]
    fn provider_edge_does_not_close_a_cycle() {
        let graph = graph(vec![
            (ComponentKey::of::<A>(), vec![ComponentRef::of::<B>()]),
            (ComponentKey::of::<B>(), vec![ComponentRef::provider_of::<A>()]),
        ]);

        assert!(graph.check().is_ok());
    }

    #[test]
    fn provider_edge_is_still_presence_checked() {
        let graph = graph(vec![(
            ComponentKey::of::<A>(),
            vec![ComponentRef::provider_of::<B>()],
        )]);

        let errors = graph.check().unwrap_err().errors;
        assert!(matches!(&errors[0], GraphError::DependencyNotFound { .. }));
    }
}
