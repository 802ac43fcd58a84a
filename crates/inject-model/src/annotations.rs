//! Qualified names of the annotations and runtime types the compiler
//! recognizes or references.

pub const COMPONENT: &str = "me.tatarka.inject.annotations.Component";
pub const INJECT: &str = "me.tatarka.inject.annotations.Inject";
pub const PROVIDES: &str = "me.tatarka.inject.annotations.Provides";
pub const SCOPE: &str = "me.tatarka.inject.annotations.Scope";
pub const QUALIFIER: &str = "me.tatarka.inject.annotations.Qualifier";
pub const INTO_SET: &str = "me.tatarka.inject.annotations.IntoSet";
pub const INTO_MAP: &str = "me.tatarka.inject.annotations.IntoMap";

/// Legacy annotations, recognized when `enable_javax_annotations` is set.
pub mod javax {
    pub const INJECT: &str = "javax.inject.Inject";
    pub const SCOPE: &str = "javax.inject.Scope";
    pub const QUALIFIER: &str = "javax.inject.Qualifier";
}

/// Runtime support types referenced by generated components.
pub mod runtime {
    pub const SCOPED_COMPONENT: &str = "me.tatarka.inject.internal.ScopedComponent";
    pub const LAZY_MAP: &str = "me.tatarka.inject.internal.LazyMap";
    pub const KCLASS: &str = "kotlin.reflect.KClass";
}
