//! Introspection provider abstractions.
//!
//! The full introspection surface is split into narrow capability traits
//! grouped by concern, so a decorator can wrap exactly the operations it
//! cares about and a backend only has to implement what it supports:
//!
//! - [`StructureIntrospect`]: structural queries over a type's members.
//! - [`GenericConstruct`]: building parameterized generic types/methods.
//! - [`AttributeIntrospect`]: custom-attribute retrieval and checks.
//! - [`MemberSearch`]: filtered member, interface, and type search.
//! - [`ValueAccess`]: loading, invocation, and value get/set. These
//!   operations are stateful and are never cached by any decorator.
//!
//! [`IntrospectionProvider`] bundles all five for consumers that need the
//! whole surface. Every query operation is a pure function of its
//! arguments for the lifetime of the provider, which is the contract that
//! makes the first four groups cacheable.

pub mod registry;

pub use registry::MetadataRegistry;

use std::sync::Arc;

use crate::error::{IntrospectError, Result};
use crate::meta::{
    AssemblyHandle, AttrTarget, AttributeValue, EventHandle, FieldHandle, MemberFilter,
    MemberHandle, MemberKinds, MemberPredicate, MethodHandle, ModuleHandle, ParamHandle,
    PropertyHandle, TypeHandle, Value,
};

/// Structural queries over a type's members.
///
/// All operations are pure; results are immutable shared slices.
pub trait StructureIntrospect {
    /// All members of `ty` matching `filter`, every kind mixed together.
    fn members_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[MemberHandle]>>;

    /// Fields of `ty` matching `filter`.
    fn fields_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[FieldHandle]>>;

    /// Methods of `ty` matching `filter`. Constructors are excluded.
    fn methods_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[MethodHandle]>>;

    /// Constructors of `ty` matching `filter`.
    fn constructors_of(&self, ty: TypeHandle, filter: MemberFilter)
        -> Result<Arc<[MethodHandle]>>;

    /// Properties of `ty` matching `filter`.
    fn properties_of(&self, ty: TypeHandle, filter: MemberFilter)
        -> Result<Arc<[PropertyHandle]>>;

    /// Events of `ty` matching `filter`.
    fn events_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[EventHandle]>>;

    /// Nested types of `ty` matching `filter`.
    fn nested_types_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[TypeHandle]>>;

    /// Interfaces implemented by `ty`.
    fn interfaces_of(&self, ty: TypeHandle) -> Result<Arc<[TypeHandle]>>;

    /// Generic parameters of `ty`. Empty for non-generic types.
    fn generic_parameters_of(&self, ty: TypeHandle) -> Result<Arc<[TypeHandle]>>;

    /// Generic parameters of `method`. Empty for non-generic methods.
    fn method_generic_parameters_of(&self, method: MethodHandle) -> Result<Arc<[TypeHandle]>>;

    /// Custom modifier types attached to `param`.
    fn custom_modifiers_of(&self, param: ParamHandle) -> Result<Arc<[TypeHandle]>>;
}

/// Construction of parameterized generic types and methods.
///
/// Construction is pure and interned: repeated calls with the same
/// definition and content-equal argument lists return the same handle.
pub trait GenericConstruct {
    /// Instantiate the open generic type `definition` with `arguments`.
    ///
    /// # Errors
    ///
    /// [`IntrospectError::NotGenericType`] if `definition` has no generic
    /// parameters; [`IntrospectError::GenericArityMismatch`] if the
    /// argument count differs from the parameter count.
    fn make_generic_type(
        &self,
        definition: TypeHandle,
        arguments: &[TypeHandle],
    ) -> Result<TypeHandle>;

    /// Instantiate the open generic method `definition` with `arguments`.
    fn make_generic_method(
        &self,
        definition: MethodHandle,
        arguments: &[TypeHandle],
    ) -> Result<MethodHandle>;
}

/// Custom-attribute retrieval and defined-checks.
pub trait AttributeIntrospect {
    /// All attributes on `target`. With `inherit`, attributes contributed
    /// by base types are included for type targets.
    fn attributes_of(&self, target: AttrTarget, inherit: bool) -> Result<Arc<[AttributeValue]>>;

    /// Attributes of type `attribute` on `target`.
    fn attributes_of_type(
        &self,
        target: AttrTarget,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<Arc<[AttributeValue]>>;

    /// Whether at least one attribute of type `attribute` is present.
    fn has_attribute(
        &self,
        target: AttrTarget,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<bool>;

    /// Attributes on the return parameter of `method`.
    fn return_attributes_of(
        &self,
        method: MethodHandle,
        inherit: bool,
    ) -> Result<Arc<[AttributeValue]>>;

    /// Attributes of type `attribute` on the return parameter of
    /// `method`.
    fn return_attributes_of_type(
        &self,
        method: MethodHandle,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<Arc<[AttributeValue]>>;

    /// Whether the return parameter of `method` carries an attribute of
    /// type `attribute`.
    fn return_attribute_defined(
        &self,
        method: MethodHandle,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<bool>;

    /// The single attribute of type `attribute` on `target`, if any.
    ///
    /// Zero matches is `Ok(None)` and exactly one is `Ok(Some(..))`; two
    /// or more raise [`IntrospectError::AmbiguousAttribute`] rather than
    /// silently picking one.
    fn single_attribute(
        &self,
        target: AttrTarget,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<Option<AttributeValue>> {
        let matches = self.attributes_of_type(target, attribute, inherit)?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(Some(matches[0].clone())),
            count => Err(IntrospectError::AmbiguousAttribute {
                attribute,
                target,
                count,
            }),
        }
    }
}

/// Filtered member, interface, and type search.
///
/// Search criteria are structured [`MemberPredicate`] data so a search
/// call is a pure function of hashable arguments.
pub trait MemberSearch {
    /// Members of `ty` restricted to `kinds`, matching `filter` and
    /// `predicate`.
    fn find_members(
        &self,
        ty: TypeHandle,
        kinds: MemberKinds,
        filter: MemberFilter,
        predicate: &MemberPredicate,
    ) -> Result<Arc<[MemberHandle]>>;

    /// Interfaces of `ty` matching `predicate`.
    fn find_interfaces(
        &self,
        ty: TypeHandle,
        predicate: &MemberPredicate,
    ) -> Result<Arc<[TypeHandle]>>;

    /// Types declared in `module` matching `predicate`.
    fn find_types(
        &self,
        module: ModuleHandle,
        predicate: &MemberPredicate,
    ) -> Result<Arc<[TypeHandle]>>;
}

/// Loading, invocation, and value access.
///
/// These operations observe or mutate state outside the metadata itself,
/// so they are never eligible for caching; decorators delegate them
/// verbatim.
pub trait ValueAccess {
    /// Resolve an assembly by name.
    fn load_assembly(&self, name: &str) -> Result<AssemblyHandle>;

    /// Invoke `method` on an optional receiver with the given arguments.
    fn invoke(
        &self,
        method: MethodHandle,
        receiver: Option<Value>,
        arguments: &[Value],
    ) -> Result<Value>;

    /// Read a field's current value.
    fn field_value(&self, field: FieldHandle) -> Result<Value>;

    /// Write a field's value.
    fn set_field_value(&self, field: FieldHandle, value: Value) -> Result<()>;

    /// Read a property's current value.
    fn property_value(&self, property: PropertyHandle) -> Result<Value>;

    /// Write a property's value.
    fn set_property_value(&self, property: PropertyHandle, value: Value) -> Result<()>;
}

/// The complete introspection surface.
///
/// Blanket-implemented for anything providing all five capability groups
/// and shareable across threads.
pub trait IntrospectionProvider:
    StructureIntrospect + GenericConstruct + AttributeIntrospect + MemberSearch + ValueAccess + Send + Sync
{
}

impl<T> IntrospectionProvider for T where
    T: StructureIntrospect
        + GenericConstruct
        + AttributeIntrospect
        + MemberSearch
        + ValueAccess
        + Send
        + Sync
{
}
