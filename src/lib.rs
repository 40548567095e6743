//! # introcache
//!
//! Selective memoization for reflective introspection providers.
//!
//! Repeated metadata queries (enumerating a type's members, building a
//! parameterized generic, reading custom attributes) are pure and
//! referentially stable for the lifetime of the process, yet often
//! expensive enough to matter when they run thousands of times. This
//! crate decorates an introspection provider so those queries become
//! cached O(1) lookups, while stateful operations (invocation, value
//! get/set, loading) pass straight through untouched.
//!
//! The building blocks compose bottom up:
//!
//! - [`key`]: composite cache keys with content equality over embedded
//!   argument lists, built on an order-sensitive sequence combinator.
//! - [`memo`]: a generic memoization engine pairing one pure function
//!   with one clearable concurrent cache.
//! - [`provider`]: the introspection surface as narrow capability
//!   traits, plus a complete in-memory registry implementation.
//! - [`facade`]: the caching decorator, with per-category opt-in decided
//!   once at construction and a transitive `clear()`.
//!
//! ## Example
//!
//! ```rust
//! use introcache::prelude::*;
//!
//! let registry = MetadataRegistry::new();
//! let assembly = registry.add_assembly("app");
//! let module = registry.add_module(assembly, "app.main").unwrap();
//! let list = registry.add_type(module, "List").unwrap();
//! registry.add_generic_parameter(list, "T").unwrap();
//! let int32 = registry.add_type(module, "Int32").unwrap();
//!
//! let provider = CachingProvider::new(registry);
//!
//! // Equal-content argument lists land on one cache entry, even from
//! // distinct buffers.
//! let a = provider.make_generic_type(list, &[int32]).unwrap();
//! let b = provider.make_generic_type(list, &[int32]).unwrap();
//! assert_eq!(a, b);
//!
//! // Force-invalidate after upstream metadata changes.
//! provider.clear();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod facade;
pub mod key;
pub mod memo;
pub mod meta;
pub mod provider;

pub use error::{BuilderError, IntrospectError, Result};

/// Common imports for convenient usage.
pub mod prelude {
    pub use crate::error::{BuilderError, IntrospectError, Result};
    pub use crate::facade::{CachingProvider, CachingProviderBuilder, Categories, ReturnAttributes};
    pub use crate::memo::{MemoCache, Memoized};
    pub use crate::meta::{
        AssemblyHandle, AttrTarget, AttributeValue, EventHandle, FieldHandle, MemberFilter,
        MemberHandle, MemberKinds, MemberPredicate, MethodHandle, ModuleHandle, ParamHandle,
        PropertyHandle, TypeHandle, Value,
    };
    pub use crate::provider::{
        AttributeIntrospect, GenericConstruct, IntrospectionProvider, MemberSearch,
        MetadataRegistry, StructureIntrospect, ValueAccess,
    };
}
