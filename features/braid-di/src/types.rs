use std::any::{Any, TypeId};

use std::sync::Arc;

/// Container handles are cloneable and may be moved across threads,
/// so anything held by the container needs to be Send + Sync + 'static.
pub type AnyObj = dyn Any + Send + Sync;

/// A component instance as it flows through the container.
pub type Value = Arc<AnyObj>;

/// An instance under construction, before it is frozen for sharing.
pub type BoxedInstance = Box<AnyObj>;

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}
