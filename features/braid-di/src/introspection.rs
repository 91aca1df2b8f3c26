//! Extraction of an [`InjectionPlan`] from class metadata.
//!
//! The plan fixes everything the container needs to build one component: the
//! selected constructor, the injectable fields walking up the hierarchy, and
//! the injectable methods in superclass-first invocation order.

use std::sync::Arc;

use crate::annotation::{AnnotationKind, DynAnnotation};
use crate::class::{
    provider_marker, ComponentClass, ConstructFn, DeclaredType, InvokeFn, MethodMeta, ProjectFn,
    SetFn, SiteMeta,
};
use crate::errors::IllegalComponent;
use crate::key::{ComponentRef, RefKind};
use crate::types::TypeInfo;

pub(crate) struct PlannedConstructor {
    pub(crate) construct: ConstructFn,
    pub(crate) refs: Vec<ComponentRef>,
}

pub(crate) struct PlannedField {
    pub(crate) path: Vec<ProjectFn>,
    pub(crate) set: SetFn,
    pub(crate) reference: ComponentRef,
}

pub(crate) struct PlannedCall {
    pub(crate) path: Vec<ProjectFn>,
    pub(crate) invoke: InvokeFn,
    pub(crate) refs: Vec<ComponentRef>,
}

/// The validated injection recipe for one class.
pub struct InjectionPlan {
    pub(crate) info: TypeInfo,
    pub(crate) constructor: PlannedConstructor,
    pub(crate) fields: Vec<PlannedField>,
    pub(crate) methods: Vec<PlannedCall>,
}

impl InjectionPlan {
    pub fn introspect(class: &Arc<ComponentClass>) -> Result<Self, IllegalComponent> {
        if class.is_abstract {
            return Err(IllegalComponent::AbstractComponent(class.info));
        }

        Ok(InjectionPlan {
            info: class.info,
            constructor: select_constructor(class)?,
            fields: collect_fields(class)?,
            methods: collect_methods(class)?,
        })
    }

    /// All dependency requests: constructor parameters, then fields in
    /// collection order, then method parameters in invocation order.
    pub fn dependencies(&self) -> Vec<ComponentRef> {
        let mut refs = self.constructor.refs.clone();
        refs.extend(self.fields.iter().map(|field| field.reference.clone()));
        refs.extend(self.methods.iter().flat_map(|method| method.refs.clone()));
        refs
    }
}

/// Exactly one inject constructor if any is marked; otherwise the
/// no-argument constructor.
fn select_constructor(class: &ComponentClass) -> Result<PlannedConstructor, IllegalComponent> {
    let mut inject = class.constructors.iter().filter(|c| c.inject);
    let selected = match (inject.next(), inject.next()) {
        (_, Some(_)) => return Err(IllegalComponent::MultipleInjectConstructors(class.info)),
        (Some(constructor), None) => constructor,
        (None, None) => class
            .constructors
            .iter()
            .find(|c| !c.inject && c.params.is_empty())
            .ok_or(IllegalComponent::NoUsableConstructor(class.info))?,
    };

    Ok(PlannedConstructor {
        construct: selected.construct.clone(),
        refs: site_refs(&selected.params, class.info)?,
    })
}

fn collect_fields(class: &Arc<ComponentClass>) -> Result<Vec<PlannedField>, IllegalComponent> {
    let mut planned = Vec::new();
    let mut path: Vec<ProjectFn> = Vec::new();
    let mut current = Arc::clone(class);

    loop {
        for field in current.fields.iter().filter(|f| f.inject) {
            if field.immutable {
                return Err(IllegalComponent::ImmutableInjectField {
                    class: class.info,
                    field: field.name,
                });
            }
            planned.push(PlannedField {
                path: path.clone(),
                set: field
                    .set
                    .clone()
                    .expect("a mutable inject field carries a setter"),
                reference: site_ref(&field.site, class.info)?,
            });
        }

        let next = match &current.superclass {
            Some(link) => {
                path.push(link.project);
                Arc::clone(&link.class)
            }
            None => break,
        };
        current = next;
    }

    Ok(planned)
}

/// Walks the hierarchy collecting inject methods, leaf level first. A method
/// is dropped when a subclass level already collected an inject method with
/// the same signature, or when the leaf class declares a non-inject method
/// with the same signature. The collected list is then reversed so
/// superclass methods run first.
fn collect_methods(class: &Arc<ComponentClass>) -> Result<Vec<PlannedCall>, IllegalComponent> {
    let mut collected: Vec<(Vec<ProjectFn>, MethodMeta)> = Vec::new();
    let mut path: Vec<ProjectFn> = Vec::new();
    let mut current = Arc::clone(class);

    loop {
        for method in current.methods.iter().filter(|m| m.inject) {
            if collected.iter().any(|(_, sub)| same_signature(sub, method)) {
                continue;
            }
            if class
                .methods
                .iter()
                .any(|declared| !declared.inject && same_signature(declared, method))
            {
                continue;
            }
            collected.push((path.clone(), method.clone()));
        }

        let next = match &current.superclass {
            Some(link) => {
                path.push(link.project);
                Arc::clone(&link.class)
            }
            None => break,
        };
        current = next;
    }

    if let Some((_, generic)) = collected.iter().find(|(_, m)| m.type_params > 0) {
        return Err(IllegalComponent::GenericInjectMethod {
            class: class.info,
            method: generic.name,
        });
    }

    collected.reverse();
    collected
        .into_iter()
        .map(|(path, method)| {
            Ok(PlannedCall {
                path,
                invoke: method.invoke.clone(),
                refs: site_refs(&method.params, class.info)?,
            })
        })
        .collect()
}

fn same_signature(a: &MethodMeta, b: &MethodMeta) -> bool {
    a.name == b.name
        && a.params.len() == b.params.len()
        && a.params
            .iter()
            .zip(&b.params)
            .all(|(left, right)| left.declared == right.declared)
}

fn site_refs(sites: &[SiteMeta], owner: TypeInfo) -> Result<Vec<ComponentRef>, IllegalComponent> {
    sites.iter().map(|site| site_ref(site, owner)).collect()
}

/// Turns a declared site into a request, peeling exactly one provider layer.
/// Nested containers and non-provider containers have no defined request
/// shape and are rejected.
fn site_ref(site: &SiteMeta, owner: TypeInfo) -> Result<ComponentRef, IllegalComponent> {
    let qualifier = qualifier_of(&site.annotations, owner)?;
    match &site.declared {
        DeclaredType::Plain(info) => Ok(ComponentRef::from_parts(*info, qualifier, RefKind::Direct)),
        DeclaredType::Container { marker, inner } if *marker == provider_marker() => {
            match inner.as_ref() {
                DeclaredType::Plain(info) => {
                    Ok(ComponentRef::from_parts(*info, qualifier, RefKind::Provider))
                }
                DeclaredType::Container { .. } => Err(IllegalComponent::UnsupportedSite(owner)),
            }
        }
        DeclaredType::Container { .. } => Err(IllegalComponent::UnsupportedSite(owner)),
    }
}

fn qualifier_of(
    annotations: &[DynAnnotation],
    owner: TypeInfo,
) -> Result<Option<DynAnnotation>, IllegalComponent> {
    let mut qualifiers = annotations
        .iter()
        .filter(|annotation| annotation.kind() == AnnotationKind::Qualifier);
    let first = qualifiers.next().cloned();
    if qualifiers.next().is_some() {
        return Err(IllegalComponent::MultipleQualifiers(owner));
    }
    Ok(first)
}
