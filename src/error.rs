//! Error types for introspection and caching operations.

use thiserror::Error;

use crate::meta::{AttrTarget, MethodHandle, TypeHandle};

/// Errors that can occur during introspection operations.
///
/// Failures raised while computing a cache miss are never stored; the
/// error surfaces to the caller unchanged and a later call with the same
/// key re-attempts the computation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntrospectError {
    /// The assembly handle is not registered with the provider.
    #[error("Assembly {0} is not registered")]
    UnknownAssembly(crate::meta::AssemblyHandle),

    /// The module handle is not registered with the provider.
    #[error("Module {0} is not registered")]
    UnknownModule(crate::meta::ModuleHandle),

    /// The type handle is not registered with the provider.
    #[error("Type {0} is not registered")]
    UnknownType(TypeHandle),

    /// The method handle is not registered with the provider.
    #[error("Method {0} is not registered")]
    UnknownMethod(MethodHandle),

    /// The field handle is not registered with the provider.
    #[error("Field {0} is not registered")]
    UnknownField(crate::meta::FieldHandle),

    /// The property handle is not registered with the provider.
    #[error("Property {0} is not registered")]
    UnknownProperty(crate::meta::PropertyHandle),

    /// The event handle is not registered with the provider.
    #[error("Event {0} is not registered")]
    UnknownEvent(crate::meta::EventHandle),

    /// The parameter handle is not registered with the provider.
    #[error("Parameter {0} is not registered")]
    UnknownParameter(crate::meta::ParamHandle),

    /// No assembly with the requested name is available to load.
    #[error("No assembly named '{0}' is available")]
    AssemblyNotFound(String),

    /// The type is not an open generic definition.
    ///
    /// Parameterized construction requires a definition with at least one
    /// generic parameter.
    #[error("Type {0} is not a generic type definition")]
    NotGenericType(TypeHandle),

    /// The method is not an open generic definition.
    #[error("Method {0} is not a generic method definition")]
    NotGenericMethod(MethodHandle),

    /// The number of supplied type arguments does not match the number of
    /// generic parameters on the definition.
    #[error("Generic arity mismatch: definition takes {expected} argument(s), got {actual}")]
    GenericArityMismatch {
        /// Number of generic parameters on the definition.
        expected: usize,
        /// Number of type arguments supplied.
        actual: usize,
    },

    /// More than one attribute of the requested type was found where at
    /// most one was expected.
    ///
    /// Zero matches is an absent result and exactly one match is returned
    /// directly; this error is raised only for two or more matches, never
    /// silently resolving to an arbitrary one.
    #[error("Ambiguous attribute: {count} attributes of type {attribute} on {target}")]
    AmbiguousAttribute {
        /// The attribute type that was requested.
        attribute: TypeHandle,
        /// The target that was inspected.
        target: AttrTarget,
        /// How many matches were found.
        count: usize,
    },

    /// The method has no invocation behavior registered.
    #[error("Method {0} is not invokable")]
    NotInvokable(MethodHandle),
}

/// A specialized `Result` type for introspection operations.
pub type Result<T> = std::result::Result<T, IntrospectError>;

/// Error type for facade construction failures.
///
/// Construction validates its collaborators up front; a missing provider
/// is reported immediately, never deferred to the first call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    /// No base provider was supplied.
    #[error("A base provider is required. Use .provider() to set it.")]
    MissingProvider,
}
