use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::types::TypeInfo;

/// What an annotation means to the container when it inspects one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    /// Distinguishes multiple bindings of the same type.
    Qualifier,
    /// Selects a reuse policy for a binding.
    Scope,
    /// Carries no meaning for the container.
    Plain,
}

/// A runtime annotation value.
///
/// Component keys compare qualifiers through this vtable, so every
/// annotation type decides its own value semantics: [`Named`] compares by
/// its string, marker annotations compare by type alone.
pub trait Annotation: Any + Send + Sync + fmt::Debug {
    /// Identity of the annotation type itself.
    fn type_info(&self) -> TypeInfo;

    fn kind(&self) -> AnnotationKind;

    fn dyn_eq(&self, other: &dyn Annotation) -> bool;

    fn dyn_hash(&self, state: &mut dyn Hasher);

    fn as_any(&self) -> &dyn Any;
}

pub type DynAnnotation = Arc<dyn Annotation>;

/// Wraps a concrete annotation for a bind call.
pub fn literal<A: Annotation>(annotation: A) -> DynAnnotation {
    Arc::new(annotation)
}

/// Built-in string qualifier. Two `Named` values are the same qualifier
/// exactly when their strings match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Named(pub String);

impl Named {
    pub fn new(value: impl Into<String>) -> Self {
        Named(value.into())
    }
}

impl Annotation for Named {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<Named>()
    }

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Qualifier
    }

    fn dyn_eq(&self, other: &dyn Annotation) -> bool {
        other
            .as_any()
            .downcast_ref::<Named>()
            .is_some_and(|other| other.0 == self.0)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<Named>().hash(&mut state);
        self.0.hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Built-in scope marker: one instance per container.
#[derive(Debug, Clone, Copy, Default)]
pub struct Singleton;

impl Annotation for Singleton {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<Singleton>()
    }

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Scope
    }

    fn dyn_eq(&self, other: &dyn Annotation) -> bool {
        other.as_any().is::<Singleton>()
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<Singleton>().hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_equals_by_value() {
        assert!(Named::new("one").dyn_eq(&Named::new("one")));
        assert!(!Named::new("one").dyn_eq(&Named::new("two")));
    }

    #[test]
    fn named_is_not_a_scope_marker() {
        assert!(!Named::new("one").dyn_eq(&Singleton));
        assert_eq!(Named::new("one").kind(), AnnotationKind::Qualifier);
        assert_eq!(Singleton.kind(), AnnotationKind::Scope);
    }

    #[test]
    fn singleton_equals_by_type() {
        assert!(Singleton.dyn_eq(&Singleton));
        assert!(!Singleton.dyn_eq(&Named::new("Singleton")));
    }
}
