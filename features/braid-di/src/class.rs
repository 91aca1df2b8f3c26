//! Runtime class metadata.
//!
//! Rust has no reflection, so an injectable class is described by data: a
//! [`ComponentClass`] lists the constructors, fields, methods and annotations
//! reflection would discover, and carries the accessor behavior (instantiate,
//! assign a field, invoke a method) as closures. A superclass link holds a
//! projection from a leaf instance to its embedded parent struct, so parent
//! metadata written once applies to every subclass.

use std::sync::Arc;

use crate::annotation::{literal, Annotation, AnnotationKind, DynAnnotation};
use crate::container::Provider;
use crate::types::{AnyObj, BoxedInstance, TypeInfo, Value};

/// Maps a leaf instance to the embedded parent struct that superclass
/// members operate on.
pub type ProjectFn = fn(&mut AnyObj) -> &mut AnyObj;

pub(crate) type ConstructFn = Arc<dyn Fn(Args) -> BoxedInstance + Send + Sync>;
pub(crate) type SetFn = Arc<dyn Fn(&mut AnyObj, Value) + Send + Sync>;
pub(crate) type InvokeFn = Arc<dyn Fn(&mut AnyObj, Args) + Send + Sync>;

/// Declared type of an injection site, before any provider peeling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Plain(TypeInfo),
    Container {
        marker: TypeInfo,
        inner: Box<DeclaredType>,
    },
}

impl DeclaredType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        DeclaredType::Plain(TypeInfo::of::<T>())
    }

    /// `Provider<T>`: a deferred request for `T`.
    pub fn provider_of<T: ?Sized + 'static>() -> Self {
        DeclaredType::Container {
            marker: provider_marker(),
            inner: Box::new(Self::of::<T>()),
        }
    }

    /// A request wrapped in some other single-parameter container `M`.
    pub fn container_of<M: 'static, T: ?Sized + 'static>() -> Self {
        DeclaredType::Container {
            marker: TypeInfo::of::<M>(),
            inner: Box::new(Self::of::<T>()),
        }
    }
}

/// The one container marker the registry understands.
pub(crate) struct ProviderMark;

pub(crate) fn provider_marker() -> TypeInfo {
    TypeInfo::of::<ProviderMark>()
}

/// One injection site: a declared type plus the annotations on it.
#[derive(Clone)]
pub struct SiteMeta {
    pub(crate) declared: DeclaredType,
    pub(crate) annotations: Vec<DynAnnotation>,
}

impl SiteMeta {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::declared(DeclaredType::of::<T>())
    }

    pub fn provider_of<T: ?Sized + 'static>() -> Self {
        Self::declared(DeclaredType::provider_of::<T>())
    }

    pub fn declared(declared: DeclaredType) -> Self {
        Self {
            declared,
            annotations: Vec::new(),
        }
    }

    /// Adds an annotation to the site.
    pub fn annotated(mut self, annotation: impl Annotation) -> Self {
        self.annotations.push(literal(annotation));
        self
    }
}

/// A constructor the metadata declares.
#[derive(Clone)]
pub struct ConstructorMeta {
    pub(crate) inject: bool,
    pub(crate) params: Vec<SiteMeta>,
    pub(crate) construct: ConstructFn,
}

impl ConstructorMeta {
    /// The no-argument constructor.
    pub fn default_constructor(f: impl Fn() -> BoxedInstance + Send + Sync + 'static) -> Self {
        Self {
            inject: false,
            params: Vec::new(),
            construct: Arc::new(move |_args| f()),
        }
    }

    /// A constructor marked as the injection point.
    pub fn inject(
        params: Vec<SiteMeta>,
        f: impl Fn(Args) -> BoxedInstance + Send + Sync + 'static,
    ) -> Self {
        Self {
            inject: true,
            params,
            construct: Arc::new(f),
        }
    }

    /// A constructor that takes arguments but is not an injection point.
    pub fn plain(
        params: Vec<SiteMeta>,
        f: impl Fn(Args) -> BoxedInstance + Send + Sync + 'static,
    ) -> Self {
        Self {
            inject: false,
            params,
            construct: Arc::new(f),
        }
    }
}

/// A field the metadata declares. Only inject fields matter to the
/// container; a mutable one carries its setter.
#[derive(Clone)]
pub struct FieldMeta {
    pub(crate) name: &'static str,
    pub(crate) site: SiteMeta,
    pub(crate) inject: bool,
    pub(crate) immutable: bool,
    pub(crate) set: Option<SetFn>,
}

impl FieldMeta {
    pub fn inject(
        name: &'static str,
        site: SiteMeta,
        set: impl Fn(&mut AnyObj, Value) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            site,
            inject: true,
            immutable: false,
            set: Some(Arc::new(set)),
        }
    }

    /// An inject field that cannot be assigned after construction.
    pub fn immutable_inject(name: &'static str, site: SiteMeta) -> Self {
        Self {
            name,
            site,
            inject: true,
            immutable: true,
            set: None,
        }
    }
}

/// A method the metadata declares.
#[derive(Clone)]
pub struct MethodMeta {
    pub(crate) name: &'static str,
    pub(crate) inject: bool,
    pub(crate) type_params: usize,
    pub(crate) params: Vec<SiteMeta>,
    pub(crate) invoke: InvokeFn,
}

impl MethodMeta {
    pub fn inject(
        name: &'static str,
        params: Vec<SiteMeta>,
        f: impl Fn(&mut AnyObj, Args) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            inject: true,
            type_params: 0,
            params,
            invoke: Arc::new(f),
        }
    }

    /// A declared method without the inject marker. Declaring one with the
    /// signature of an inherited inject method suppresses that injection.
    pub fn plain(
        name: &'static str,
        params: Vec<SiteMeta>,
        f: impl Fn(&mut AnyObj, Args) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            inject: false,
            type_params: 0,
            params,
            invoke: Arc::new(f),
        }
    }

    /// Declares method-level type parameters. An inject method may not have
    /// any.
    pub fn with_type_params(mut self, count: usize) -> Self {
        self.type_params = count;
        self
    }
}

pub(crate) struct SuperclassLink {
    pub(crate) class: Arc<ComponentClass>,
    pub(crate) project: ProjectFn,
}

/// Runtime description of a bindable class: what reflection would see.
pub struct ComponentClass {
    pub(crate) info: TypeInfo,
    pub(crate) is_abstract: bool,
    pub(crate) annotations: Vec<DynAnnotation>,
    pub(crate) superclass: Option<SuperclassLink>,
    pub(crate) constructors: Vec<ConstructorMeta>,
    pub(crate) fields: Vec<FieldMeta>,
    pub(crate) methods: Vec<MethodMeta>,
}

impl ComponentClass {
    /// Starts metadata for a concrete class.
    pub fn of<T: Send + Sync + 'static>() -> ClassBuilder {
        ClassBuilder::new(TypeInfo::of::<T>(), false)
    }

    /// Starts metadata for an abstract class or trait; no instances can be
    /// built from it.
    pub fn abstract_of<T: ?Sized + 'static>() -> ClassBuilder {
        ClassBuilder::new(TypeInfo::of::<T>(), true)
    }

    pub fn info(&self) -> TypeInfo {
        self.info
    }

    pub(crate) fn scope_annotations(&self) -> Vec<DynAnnotation> {
        self.annotations
            .iter()
            .filter(|annotation| annotation.kind() == AnnotationKind::Scope)
            .cloned()
            .collect()
    }
}

pub struct ClassBuilder {
    class: ComponentClass,
}

impl ClassBuilder {
    fn new(info: TypeInfo, is_abstract: bool) -> Self {
        Self {
            class: ComponentClass {
                info,
                is_abstract,
                annotations: Vec::new(),
                superclass: None,
                constructors: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
            },
        }
    }

    /// Adds a class-level annotation (e.g. a scope marker).
    pub fn annotated(mut self, annotation: impl Annotation) -> Self {
        self.class.annotations.push(literal(annotation));
        self
    }

    /// Declares the superclass and how to reach its embedded struct inside a
    /// leaf instance.
    pub fn extends(mut self, parent: &Arc<ComponentClass>, project: ProjectFn) -> Self {
        self.class.superclass = Some(SuperclassLink {
            class: Arc::clone(parent),
            project,
        });
        self
    }

    pub fn constructor(mut self, meta: ConstructorMeta) -> Self {
        self.class.constructors.push(meta);
        self
    }

    pub fn default_constructor(
        self,
        f: impl Fn() -> BoxedInstance + Send + Sync + 'static,
    ) -> Self {
        self.constructor(ConstructorMeta::default_constructor(f))
    }

    pub fn inject_constructor(
        self,
        params: Vec<SiteMeta>,
        f: impl Fn(Args) -> BoxedInstance + Send + Sync + 'static,
    ) -> Self {
        self.constructor(ConstructorMeta::inject(params, f))
    }

    pub fn field(mut self, meta: FieldMeta) -> Self {
        self.class.fields.push(meta);
        self
    }

    pub fn method(mut self, meta: MethodMeta) -> Self {
        self.class.methods.push(meta);
        self
    }

    pub fn build(self) -> Arc<ComponentClass> {
        Arc::new(self.class)
    }
}

/// Resolved dependencies for one constructor or method call, in declaration
/// order.
pub struct Args {
    values: std::vec::IntoIter<Value>,
}

impl Args {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter(),
        }
    }

    /// Takes the next dependency as a shared instance of `T`.
    pub fn take<T: Send + Sync + 'static>(&mut self) -> Arc<T> {
        downcast_value(self.take_value())
    }

    /// Takes the next dependency as a deferred accessor for `T`.
    pub fn take_provider<T: Send + Sync + 'static>(&mut self) -> Provider<T> {
        Provider::from_injected(self.take_value())
    }

    /// Takes the next dependency without restoring its type.
    pub fn take_value(&mut self) -> Value {
        self.values
            .next()
            .expect("one resolved value per declared site")
    }
}

/// Restores the concrete type of a resolved dependency.
pub fn downcast_value<T: Send + Sync + 'static>(value: Value) -> Arc<T> {
    value
        .downcast::<T>()
        .unwrap_or_else(|_| panic!("resolved dependency is not a {}", std::any::type_name::<T>()))
}
