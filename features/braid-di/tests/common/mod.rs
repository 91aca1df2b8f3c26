//! Fixture annotations and the reference user-defined scope shared by the
//! integration suites. These stand in for the annotation vocabulary a host
//! ecosystem would supply.
#![allow(dead_code)]

use std::any::{Any, TypeId};
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::{Arc, Mutex};

use braid_di::{
    Annotation, AnnotationKind, ComponentProvider, ComponentRef, DiContainer, TypeInfo, Value,
};

/// Marker qualifier: any two `Skywalker` values are the same qualifier.
#[derive(Debug, Clone, Copy)]
pub struct Skywalker;

impl Annotation for Skywalker {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<Skywalker>()
    }

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Qualifier
    }

    fn dyn_eq(&self, other: &dyn Annotation) -> bool {
        other.as_any().is::<Skywalker>()
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<Skywalker>().hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An annotation that is neither a qualifier nor a scope.
#[derive(Debug, Clone, Copy)]
pub struct PlainMarker;

impl Annotation for PlainMarker {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<PlainMarker>()
    }

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Plain
    }

    fn dyn_eq(&self, other: &dyn Annotation) -> bool {
        other.as_any().is::<PlainMarker>()
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<PlainMarker>().hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Scope marker realized by [`PooledProvider`].
#[derive(Debug, Clone, Copy)]
pub struct Pooled;

impl Annotation for Pooled {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<Pooled>()
    }

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Scope
    }

    fn dyn_eq(&self, other: &dyn Annotation) -> bool {
        other.as_any().is::<Pooled>()
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<Pooled>().hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub const POOL_MAX: usize = 2;

/// Reference user-defined scope: the first `POOL_MAX` lookups fill a pool,
/// later lookups reuse it round-robin.
pub struct PooledProvider {
    inner: Arc<dyn ComponentProvider>,
    state: Mutex<PoolState>,
}

struct PoolState {
    pool: Vec<Value>,
    handed_out: usize,
}

impl PooledProvider {
    pub fn new(inner: Arc<dyn ComponentProvider>) -> Self {
        Self {
            inner,
            state: Mutex::new(PoolState {
                pool: Vec::new(),
                handed_out: 0,
            }),
        }
    }
}

impl ComponentProvider for PooledProvider {
    fn produce(&self, container: &DiContainer) -> Value {
        let mut state = self.state.lock().expect("pool lock");
        if state.pool.len() < POOL_MAX {
            let fresh = self.inner.produce(container);
            state.pool.push(fresh);
        }
        let value = state.pool[state.handed_out % POOL_MAX].clone();
        state.handed_out += 1;
        value
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.inner.dependencies()
    }
}
