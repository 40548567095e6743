//! Reflected-entity data model.
//!
//! Introspection operations identify assemblies, modules, types, and
//! members through small copyable handles. Handles are stable for the
//! lifetime of the provider that issued them, which is what makes the
//! results of pure metadata queries cacheable in the first place.
//!
//! Query results are immutable shared values (`Arc<[..]>`), so a cache
//! hit clones a pointer rather than the underlying data.

mod filter;

pub use filter::{MemberFilter, MemberKinds};

use std::fmt;
use std::sync::Arc;

/// Handle to a loaded assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssemblyHandle(pub u32);

/// Handle to a module within an assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleHandle(pub u32);

/// Handle to a type.
///
/// Generic type definitions, their instantiations, generic parameters,
/// and interfaces are all type handles; the issuing provider knows which
/// is which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(pub u32);

/// Handle to a method or constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodHandle(pub u32);

/// Handle to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldHandle(pub u32);

/// Handle to a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyHandle(pub u32);

/// Handle to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventHandle(pub u32);

/// Handle to a method parameter (including the return parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamHandle(pub u32);

impl fmt::Display for AssemblyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "assembly#{}", self.0)
    }
}

impl fmt::Display for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module#{}", self.0)
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

impl fmt::Display for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "method#{}", self.0)
    }
}

impl fmt::Display for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field#{}", self.0)
    }
}

impl fmt::Display for PropertyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "property#{}", self.0)
    }
}

impl fmt::Display for EventHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

impl fmt::Display for ParamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "param#{}", self.0)
    }
}

/// A member of a type, tagged by kind.
///
/// Mixed-kind query results (member enumeration, filtered member search)
/// use this handle; kind-specific queries return the underlying handle
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberHandle {
    /// A field.
    Field(FieldHandle),
    /// A method.
    Method(MethodHandle),
    /// A constructor.
    Constructor(MethodHandle),
    /// A property.
    Property(PropertyHandle),
    /// An event.
    Event(EventHandle),
    /// A nested type.
    NestedType(TypeHandle),
}

impl MemberHandle {
    /// The kind of this member as a single-flag [`MemberKinds`] mask.
    pub fn kind(&self) -> MemberKinds {
        match self {
            MemberHandle::Field(_) => MemberKinds::FIELD,
            MemberHandle::Method(_) => MemberKinds::METHOD,
            MemberHandle::Constructor(_) => MemberKinds::CONSTRUCTOR,
            MemberHandle::Property(_) => MemberKinds::PROPERTY,
            MemberHandle::Event(_) => MemberKinds::EVENT,
            MemberHandle::NestedType(_) => MemberKinds::NESTED_TYPE,
        }
    }
}

impl fmt::Display for MemberHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberHandle::Field(h) => write!(f, "{h}"),
            MemberHandle::Method(h) => write!(f, "{h}"),
            MemberHandle::Constructor(h) => write!(f, "ctor:{h}"),
            MemberHandle::Property(h) => write!(f, "{h}"),
            MemberHandle::Event(h) => write!(f, "{h}"),
            MemberHandle::NestedType(h) => write!(f, "nested:{h}"),
        }
    }
}

/// A target that can carry custom attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrTarget {
    /// An assembly.
    Assembly(AssemblyHandle),
    /// A module.
    Module(ModuleHandle),
    /// A type.
    Type(TypeHandle),
    /// A member of a type.
    Member(MemberHandle),
    /// A method parameter.
    Parameter(ParamHandle),
}

impl fmt::Display for AttrTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrTarget::Assembly(h) => write!(f, "{h}"),
            AttrTarget::Module(h) => write!(f, "{h}"),
            AttrTarget::Type(h) => write!(f, "{h}"),
            AttrTarget::Member(h) => write!(f, "{h}"),
            AttrTarget::Parameter(h) => write!(f, "{h}"),
        }
    }
}

/// A dynamically typed value for the stateful access surface.
///
/// Used by invocation and field/property get/set, which are never cached,
/// and as attribute constructor arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value.
    Unit,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(Arc<str>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Unit
    }
}

/// An instantiated custom attribute.
///
/// Compared structurally; a provider returns the same logical attribute
/// for repeated queries, so cached and uncached reads are
/// indistinguishable.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeValue {
    /// The attribute's type.
    pub attribute: TypeHandle,
    /// Constructor arguments the attribute was instantiated with.
    pub arguments: Arc<[Value]>,
}

impl AttributeValue {
    /// Create an attribute instance with no constructor arguments.
    pub fn marker(attribute: TypeHandle) -> Self {
        Self {
            attribute,
            arguments: Arc::new([]),
        }
    }

    /// Create an attribute instance with the given constructor arguments.
    pub fn with_arguments(attribute: TypeHandle, arguments: impl Into<Arc<[Value]>>) -> Self {
        Self {
            attribute,
            arguments: arguments.into(),
        }
    }
}

/// A structured search criterion for filtered member, interface, and type
/// search.
///
/// Predicates are plain data rather than closures so a search call can be
/// embedded in a cache key. Name matching is by the entity's simple name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberPredicate {
    /// Match everything.
    Any,
    /// Exact name match.
    NameIs(Arc<str>),
    /// Case-insensitive (ASCII) name match.
    NameIsIgnoreCase(Arc<str>),
    /// Match entities carrying an attribute of the given type.
    HasAttribute(TypeHandle),
}

impl MemberPredicate {
    /// Exact-name predicate.
    pub fn name(name: &str) -> Self {
        MemberPredicate::NameIs(Arc::from(name))
    }

    /// Case-insensitive name predicate.
    pub fn name_ignore_case(name: &str) -> Self {
        MemberPredicate::NameIsIgnoreCase(Arc::from(name))
    }

    /// Test the predicate against an entity's name and attribute list.
    pub fn matches(&self, name: &str, attributes: &[AttributeValue]) -> bool {
        match self {
            MemberPredicate::Any => true,
            MemberPredicate::NameIs(wanted) => name == wanted.as_ref(),
            MemberPredicate::NameIsIgnoreCase(wanted) => name.eq_ignore_ascii_case(wanted),
            MemberPredicate::HasAttribute(attr) => {
                attributes.iter().any(|a| a.attribute == *attr)
            }
        }
    }
}
