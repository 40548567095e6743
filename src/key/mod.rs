//! Composite cache key types.
//!
//! Each multi-argument cacheable operation gets one lightweight aggregate
//! bundling its varying arguments into a single key with value equality.
//! Keys that embed an ordered argument list implement `PartialEq`/`Hash`
//! by hand through the [`sequence`] combinator, so two keys built from
//! reference-distinct but content-equal argument buffers land on the same
//! cache entry. Scalar-only keys derive field-wise equality directly.

mod sequence;

pub use sequence::{sequence_eq, sequence_hash, sequence_hash_value};

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::meta::{
    AttrTarget, MemberFilter, MemberKinds, MemberPredicate, MethodHandle, TypeHandle,
};

/// Key for parameterized generic type construction.
///
/// Bundles the open definition with the ordered type-argument list.
/// Equality is by content: the same definition instantiated with two
/// distinct buffers holding the same arguments in the same order is one
/// logical construction.
#[derive(Debug, Clone, Eq)]
pub struct GenericTypeKey {
    /// The open generic type definition.
    pub definition: TypeHandle,
    /// Ordered type arguments.
    pub arguments: Arc<[TypeHandle]>,
}

impl GenericTypeKey {
    /// Build a key from a definition and a borrowed argument list.
    pub fn new(definition: TypeHandle, arguments: &[TypeHandle]) -> Self {
        Self {
            definition,
            arguments: Arc::from(arguments),
        }
    }
}

impl PartialEq for GenericTypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.definition == other.definition
            && sequence_eq(Some(&self.arguments), Some(&other.arguments))
    }
}

impl Hash for GenericTypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.definition.hash(state);
        sequence_hash(Some(&self.arguments), state);
    }
}

/// Key for parameterized generic method construction.
///
/// Same shape and equality contract as [`GenericTypeKey`], with a method
/// definition at the front.
#[derive(Debug, Clone, Eq)]
pub struct GenericMethodKey {
    /// The open generic method definition.
    pub definition: MethodHandle,
    /// Ordered type arguments.
    pub arguments: Arc<[TypeHandle]>,
}

impl GenericMethodKey {
    /// Build a key from a definition and a borrowed argument list.
    pub fn new(definition: MethodHandle, arguments: &[TypeHandle]) -> Self {
        Self {
            definition,
            arguments: Arc::from(arguments),
        }
    }
}

impl PartialEq for GenericMethodKey {
    fn eq(&self, other: &Self) -> bool {
        self.definition == other.definition
            && sequence_eq(Some(&self.arguments), Some(&other.arguments))
    }
}

impl Hash for GenericMethodKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.definition.hash(state);
        sequence_hash(Some(&self.arguments), state);
    }
}

/// Key for filtered structural queries: an owner handle plus the member
/// filter. Scalar fields only, so derived field-wise equality suffices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilteredKey<H> {
    /// The queried entity.
    pub owner: H,
    /// The visibility/binding filter the query ran with.
    pub filter: MemberFilter,
}

impl<H> FilteredKey<H> {
    /// Build a filtered-query key.
    pub fn new(owner: H, filter: MemberFilter) -> Self {
        Self { owner, filter }
    }
}

/// Key for attribute enumeration on a target, split by the inherit flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributesKey {
    /// The attributed target.
    pub target: AttrTarget,
    /// Whether inherited attributes were requested.
    pub inherit: bool,
}

impl AttributesKey {
    /// Build an attribute-enumeration key.
    pub fn new(target: AttrTarget, inherit: bool) -> Self {
        Self { target, inherit }
    }
}

/// Key for attribute queries narrowed to one attribute type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypedAttributesKey {
    /// The attributed target.
    pub target: AttrTarget,
    /// The attribute type asked for.
    pub attribute: TypeHandle,
    /// Whether inherited attributes were requested.
    pub inherit: bool,
}

impl TypedAttributesKey {
    /// Build a typed attribute-query key.
    pub fn new(target: AttrTarget, attribute: TypeHandle, inherit: bool) -> Self {
        Self {
            target,
            attribute,
            inherit,
        }
    }
}

/// Key for the per-method return-attribute sub-facade's typed queries,
/// where the method itself is fixed at sub-facade construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypedKey {
    /// The attribute type asked for.
    pub attribute: TypeHandle,
    /// Whether inherited attributes were requested.
    pub inherit: bool,
}

impl TypedKey {
    /// Build a typed key.
    pub fn new(attribute: TypeHandle, inherit: bool) -> Self {
        Self { attribute, inherit }
    }
}

/// Key for filtered member search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FindMembersKey {
    /// The type being searched.
    pub owner: TypeHandle,
    /// Which member kinds to consider.
    pub kinds: MemberKinds,
    /// The visibility/binding filter.
    pub filter: MemberFilter,
    /// The structured search criterion.
    pub predicate: MemberPredicate,
}

impl FindMembersKey {
    /// Build a member-search key.
    pub fn new(
        owner: TypeHandle,
        kinds: MemberKinds,
        filter: MemberFilter,
        predicate: MemberPredicate,
    ) -> Self {
        Self {
            owner,
            kinds,
            filter,
            predicate,
        }
    }
}

/// Key for interface and type search: an owner handle plus the search
/// criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FindKey<H> {
    /// The searched scope (a type for interface search, a module for type
    /// search).
    pub owner: H,
    /// The structured search criterion.
    pub predicate: MemberPredicate,
}

impl<H> FindKey<H> {
    /// Build a search key.
    pub fn new(owner: H, predicate: MemberPredicate) -> Self {
        Self { owner, predicate }
    }
}
