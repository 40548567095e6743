//! Per-method return-attribute sub-facade.

use std::sync::Arc;

use crate::error::Result;
use crate::key::TypedKey;
use crate::memo::Memoized;
use crate::meta::{AttributeValue, MethodHandle, TypeHandle};
use crate::provider::AttributeIntrospect;

/// Caching view over one method's return-parameter attributes.
///
/// Produced by
/// [`CachingProvider::return_attribute_provider`](super::CachingProvider::return_attribute_provider)
/// and itself stored as a cached value inside the outer facade, this
/// object owns three further caches: attribute enumeration by inherit
/// flag, enumeration narrowed to one attribute type, and the
/// defined-check. It is a cache holder in its own right, so the outer
/// facade's `clear()` reaches into every retained instance; callers
/// holding one across an invalidation see it empty and repopulate
/// lazily, never serve stale results forever.
pub struct ReturnAttributes<P> {
    base: Arc<P>,
    method: MethodHandle,
    attributes: Option<Memoized<bool, Arc<[AttributeValue]>>>,
    typed: Option<Memoized<TypedKey, Arc<[AttributeValue]>>>,
    defined: Option<Memoized<TypedKey, bool>>,
}

impl<P> ReturnAttributes<P>
where
    P: AttributeIntrospect + Send + Sync + 'static,
{
    /// Build a caching instance with all three operation caches armed.
    pub(crate) fn cached(base: Arc<P>, method: MethodHandle) -> Self {
        let attributes = {
            let base = Arc::clone(&base);
            Memoized::new(move |inherit: &bool| base.return_attributes_of(method, *inherit))
        };
        let typed = {
            let base = Arc::clone(&base);
            Memoized::new(move |key: &TypedKey| {
                base.return_attributes_of_type(method, key.attribute, key.inherit)
            })
        };
        let defined = {
            let base = Arc::clone(&base);
            Memoized::new(move |key: &TypedKey| {
                base.return_attribute_defined(method, key.attribute, key.inherit)
            })
        };
        Self {
            base,
            method,
            attributes: Some(attributes),
            typed: Some(typed),
            defined: Some(defined),
        }
    }

    /// Build a pass-through instance with no caches at all, used when the
    /// attribute category is disabled on the owning facade.
    pub(crate) fn passthrough(base: Arc<P>, method: MethodHandle) -> Self {
        Self {
            base,
            method,
            attributes: None,
            typed: None,
            defined: None,
        }
    }

    /// The method whose return parameter this view inspects.
    pub fn method(&self) -> MethodHandle {
        self.method
    }

    /// All attributes on the return parameter.
    pub fn attributes(&self, inherit: bool) -> Result<Arc<[AttributeValue]>> {
        match &self.attributes {
            Some(memo) => memo.call(&inherit),
            None => self.base.return_attributes_of(self.method, inherit),
        }
    }

    /// Attributes of type `attribute` on the return parameter.
    pub fn attributes_of_type(
        &self,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<Arc<[AttributeValue]>> {
        match &self.typed {
            Some(memo) => memo.call(&TypedKey::new(attribute, inherit)),
            None => self
                .base
                .return_attributes_of_type(self.method, attribute, inherit),
        }
    }

    /// Whether the return parameter carries an attribute of type
    /// `attribute`.
    pub fn is_defined(&self, attribute: TypeHandle, inherit: bool) -> Result<bool> {
        match &self.defined {
            Some(memo) => memo.call(&TypedKey::new(attribute, inherit)),
            None => self
                .base
                .return_attribute_defined(self.method, attribute, inherit),
        }
    }

    /// Empty all three caches. Subsequent calls repopulate lazily.
    pub fn clear(&self) {
        if let Some(memo) = &self.attributes {
            memo.clear();
        }
        if let Some(memo) = &self.typed {
            memo.clear();
        }
        if let Some(memo) = &self.defined {
            memo.clear();
        }
    }
}

impl<P> std::fmt::Debug for ReturnAttributes<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReturnAttributes")
            .field("method", &self.method)
            .field("cached", &self.attributes.is_some())
            .finish()
    }
}
