use std::fmt;
use std::hash::{Hash, Hasher};

use crate::annotation::DynAnnotation;
use crate::types::TypeInfo;

/// Map identity of a binding: the component type plus an optional qualifier.
///
/// An unqualified key and any qualified key for the same type are distinct
/// entries; qualified keys compare through the qualifier's own equality.
#[derive(Clone)]
pub struct ComponentKey {
    type_info: TypeInfo,
    qualifier: Option<DynAnnotation>,
}

impl ComponentKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_parts(TypeInfo::of::<T>(), None)
    }

    pub fn qualified<T: ?Sized + 'static>(qualifier: DynAnnotation) -> Self {
        Self::from_parts(TypeInfo::of::<T>(), Some(qualifier))
    }

    pub(crate) fn from_parts(type_info: TypeInfo, qualifier: Option<DynAnnotation>) -> Self {
        Self {
            type_info,
            qualifier,
        }
    }

    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    pub fn qualifier(&self) -> Option<&DynAnnotation> {
        self.qualifier.as_ref()
    }
}

impl PartialEq for ComponentKey {
    fn eq(&self, other: &Self) -> bool {
        if self.type_info != other.type_info {
            return false;
        }
        match (&self.qualifier, &other.qualifier) {
            (None, None) => true,
            (Some(a), Some(b)) => a.dyn_eq(b.as_ref()),
            _ => false,
        }
    }
}

impl Eq for ComponentKey {}

impl Hash for ComponentKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_info.hash(state);
        if let Some(qualifier) = &self.qualifier {
            qualifier.dyn_hash(state);
        }
    }
}

impl fmt::Debug for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}[{:?}]", self.type_info, qualifier),
            None => write!(f, "{}", self.type_info),
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How an injection site asks for its dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    /// The component itself, materialized while the requester is built.
    Direct,
    /// A deferred accessor; the target is not built until it is asked for.
    Provider,
    /// A container shape the registry does not serve.
    Unsupported,
}

/// One injection request: a component key plus how the value is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    key: ComponentKey,
    kind: RefKind,
}

impl ComponentRef {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_parts(TypeInfo::of::<T>(), None, RefKind::Direct)
    }

    pub fn qualified<T: ?Sized + 'static>(qualifier: DynAnnotation) -> Self {
        Self::from_parts(TypeInfo::of::<T>(), Some(qualifier), RefKind::Direct)
    }

    /// A deferred request for `T`.
    pub fn provider_of<T: ?Sized + 'static>() -> Self {
        Self::from_parts(TypeInfo::of::<T>(), None, RefKind::Provider)
    }

    pub fn provider_qualified<T: ?Sized + 'static>(qualifier: DynAnnotation) -> Self {
        Self::from_parts(TypeInfo::of::<T>(), Some(qualifier), RefKind::Provider)
    }

    /// A request through some other single-parameter container `M`.
    ///
    /// The registry answers these with `None`; only the provider container is
    /// understood.
    pub fn container_of<M: 'static, T: ?Sized + 'static>() -> Self {
        Self::from_parts(TypeInfo::of::<T>(), None, RefKind::Unsupported)
    }

    pub(crate) fn from_parts(
        type_info: TypeInfo,
        qualifier: Option<DynAnnotation>,
        kind: RefKind,
    ) -> Self {
        Self {
            key: ComponentKey::from_parts(type_info, qualifier),
            kind,
        }
    }

    pub fn key(&self) -> &ComponentKey {
        &self.key
    }

    pub fn kind(&self) -> RefKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::annotation::{literal, Named};

    use super::*;

    struct Service;

    #[test]
    fn keys_of_same_type_are_equal() {
        assert_eq!(ComponentKey::of::<Service>(), ComponentKey::of::<Service>());
        assert_ne!(ComponentKey::of::<Service>(), ComponentKey::of::<String>());
    }

    #[test]
    fn qualified_keys_compare_by_qualifier_value() {
        let one = ComponentKey::qualified::<Service>(literal(Named::new("one")));
        let one_again = ComponentKey::qualified::<Service>(literal(Named::new("one")));
        let two = ComponentKey::qualified::<Service>(literal(Named::new("two")));

        assert_eq!(one, one_again);
        assert_ne!(one, two);
        assert_ne!(one, ComponentKey::of::<Service>());
    }

    #[test]
    fn keys_work_as_map_keys() {
        let mut map = HashMap::new();
        map.insert(ComponentKey::of::<Service>(), "plain");
        map.insert(
            ComponentKey::qualified::<Service>(literal(Named::new("one"))),
            "one",
        );

        assert_eq!(map.get(&ComponentKey::of::<Service>()), Some(&"plain"));
        assert_eq!(
            map.get(&ComponentKey::qualified::<Service>(literal(Named::new("one")))),
            Some(&"one")
        );
        assert_eq!(
            map.get(&ComponentKey::qualified::<Service>(literal(Named::new("two")))),
            None
        );
    }

    #[test]
    fn refs_carry_the_delivery_kind() {
        assert_eq!(ComponentRef::of::<Service>().kind(), RefKind::Direct);
        assert_eq!(ComponentRef::provider_of::<Service>().kind(), RefKind::Provider);
        assert_eq!(
            ComponentRef::of::<Service>().key(),
            ComponentRef::provider_of::<Service>().key()
        );
    }
}
