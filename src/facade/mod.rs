//! Caching decorator for introspection providers.
//!
//! [`CachingProvider`] wraps any
//! [`IntrospectionProvider`](crate::provider::IntrospectionProvider) and
//! turns repeated pure metadata queries into cached lookups, while
//! leaving stateful operations (loading, invocation, value get/set)
//! untouched. Which operation groups are cached is chosen once, at
//! construction, through [`Categories`]; an operation in a disabled
//! category has no backing cache at all and always reaches the base
//! provider directly.
//!
//! The decorator never changes what an operation returns, only the cost
//! of repeating an identical call.
//!
//! # Invalidation
//!
//! Caches are unbounded: entries accumulate until [`CachingProvider::clear`]
//! is called, typically after the underlying metadata has been reloaded
//! or hot-swapped upstream. `clear()` is transitive: it also empties the
//! caches inside every [`ReturnAttributes`] sub-facade the outer caches
//! have produced and retained.
//!
//! # Example
//!
//! ```
//! use introcache::facade::{CachingProvider, Categories};
//! use introcache::meta::MemberFilter;
//! use introcache::provider::{MetadataRegistry, StructureIntrospect};
//!
//! let registry = MetadataRegistry::new();
//! let assembly = registry.add_assembly("app");
//! let module = registry.add_module(assembly, "app.main").unwrap();
//! let widget = registry.add_type(module, "Widget").unwrap();
//! registry.add_method(widget, "refresh", true, false).unwrap();
//!
//! let provider = CachingProvider::builder()
//!     .provider(registry)
//!     .categories(Categories::GET | Categories::ATTRIBUTES)
//!     .build()
//!     .unwrap();
//!
//! // First call computes, repeats are cache hits.
//! let methods = provider.methods_of(widget, MemberFilter::DEFAULT).unwrap();
//! let again = provider.methods_of(widget, MemberFilter::DEFAULT).unwrap();
//! assert_eq!(methods, again);
//! ```

mod categories;
mod return_attrs;

pub use categories::Categories;
pub use return_attrs::ReturnAttributes;

use std::sync::Arc;

use crate::error::{BuilderError, Result};
use crate::key::{
    AttributesKey, FilteredKey, FindKey, FindMembersKey, GenericMethodKey, GenericTypeKey,
    TypedAttributesKey,
};
use crate::memo::Memoized;
use crate::meta::{
    AssemblyHandle, AttrTarget, AttributeValue, EventHandle, FieldHandle, MemberFilter,
    MemberHandle, MemberKinds, MemberPredicate, MethodHandle, ModuleHandle, ParamHandle,
    PropertyHandle, TypeHandle, Value,
};
use crate::provider::{
    AttributeIntrospect, GenericConstruct, IntrospectionProvider, MemberSearch,
    StructureIntrospect, ValueAccess,
};

/// Caching decorator over a base introspection provider.
///
/// Owns one independent [`Memoized`] operation per cacheable operation in
/// an enabled category, each wrapping a closure over the shared base
/// provider. Slots for disabled categories are absent, so pass-through
/// dispatch carries no caching overhead whatsoever.
///
/// The facade implements the same capability traits as the base provider
/// and adds exactly one operation the base does not have: [`clear`].
///
/// Storage is internally synchronized; one instance may be shared across
/// threads. Concurrent first calls on the same key may each run the
/// underlying pure query, with the last store winning.
///
/// [`clear`]: CachingProvider::clear
pub struct CachingProvider<P> {
    base: Arc<P>,
    categories: Categories,

    // Construction
    generic_types: Option<Memoized<GenericTypeKey, TypeHandle>>,
    generic_methods: Option<Memoized<GenericMethodKey, MethodHandle>>,

    // Get
    members: Option<Memoized<FilteredKey<TypeHandle>, Arc<[MemberHandle]>>>,
    fields: Option<Memoized<FilteredKey<TypeHandle>, Arc<[FieldHandle]>>>,
    methods: Option<Memoized<FilteredKey<TypeHandle>, Arc<[MethodHandle]>>>,
    constructors: Option<Memoized<FilteredKey<TypeHandle>, Arc<[MethodHandle]>>>,
    properties: Option<Memoized<FilteredKey<TypeHandle>, Arc<[PropertyHandle]>>>,
    events: Option<Memoized<FilteredKey<TypeHandle>, Arc<[EventHandle]>>>,
    nested_types: Option<Memoized<FilteredKey<TypeHandle>, Arc<[TypeHandle]>>>,
    interfaces: Option<Memoized<TypeHandle, Arc<[TypeHandle]>>>,
    generic_parameters: Option<Memoized<TypeHandle, Arc<[TypeHandle]>>>,
    method_generic_parameters: Option<Memoized<MethodHandle, Arc<[TypeHandle]>>>,
    custom_modifiers: Option<Memoized<ParamHandle, Arc<[TypeHandle]>>>,

    // Attributes
    attributes: Option<Memoized<AttributesKey, Arc<[AttributeValue]>>>,
    typed_attributes: Option<Memoized<TypedAttributesKey, Arc<[AttributeValue]>>>,
    attribute_checks: Option<Memoized<TypedAttributesKey, bool>>,
    return_attributes: Option<Memoized<MethodHandle, Arc<ReturnAttributes<P>>>>,

    // Find
    member_search: Option<Memoized<FindMembersKey, Arc<[MemberHandle]>>>,
    interface_search: Option<Memoized<FindKey<TypeHandle>, Arc<[TypeHandle]>>>,
    type_search: Option<Memoized<FindKey<ModuleHandle>, Arc<[TypeHandle]>>>,
}

impl<P> CachingProvider<P>
where
    P: IntrospectionProvider + 'static,
{
    /// Decorate `base` with every category enabled.
    pub fn new(base: P) -> Self {
        Self::from_arc(Arc::new(base), Categories::ALL)
    }

    /// Decorate `base`, caching only the given categories.
    pub fn with_categories(base: P, categories: Categories) -> Self {
        Self::from_arc(Arc::new(base), categories)
    }

    /// Decorate an already-shared provider.
    pub fn from_arc(base: Arc<P>, categories: Categories) -> Self {
        let construction = categories.contains(Categories::CONSTRUCTION);
        let get = categories.contains(Categories::GET);
        let attrs = categories.contains(Categories::ATTRIBUTES);
        let find = categories.contains(Categories::FIND);

        Self {
            generic_types: construction.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &GenericTypeKey| {
                    base.make_generic_type(key.definition, &key.arguments)
                })
            }),
            generic_methods: construction.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &GenericMethodKey| {
                    base.make_generic_method(key.definition, &key.arguments)
                })
            }),

            members: get.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &FilteredKey<TypeHandle>| {
                    base.members_of(key.owner, key.filter)
                })
            }),
            fields: get.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &FilteredKey<TypeHandle>| {
                    base.fields_of(key.owner, key.filter)
                })
            }),
            methods: get.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &FilteredKey<TypeHandle>| {
                    base.methods_of(key.owner, key.filter)
                })
            }),
            constructors: get.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &FilteredKey<TypeHandle>| {
                    base.constructors_of(key.owner, key.filter)
                })
            }),
            properties: get.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &FilteredKey<TypeHandle>| {
                    base.properties_of(key.owner, key.filter)
                })
            }),
            events: get.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &FilteredKey<TypeHandle>| {
                    base.events_of(key.owner, key.filter)
                })
            }),
            nested_types: get.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &FilteredKey<TypeHandle>| {
                    base.nested_types_of(key.owner, key.filter)
                })
            }),
            interfaces: get.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |ty: &TypeHandle| base.interfaces_of(*ty))
            }),
            generic_parameters: get.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |ty: &TypeHandle| base.generic_parameters_of(*ty))
            }),
            method_generic_parameters: get.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |method: &MethodHandle| {
                    base.method_generic_parameters_of(*method)
                })
            }),
            custom_modifiers: get.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |param: &ParamHandle| base.custom_modifiers_of(*param))
            }),

            attributes: attrs.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &AttributesKey| {
                    base.attributes_of(key.target, key.inherit)
                })
            }),
            typed_attributes: attrs.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &TypedAttributesKey| {
                    base.attributes_of_type(key.target, key.attribute, key.inherit)
                })
            }),
            attribute_checks: attrs.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &TypedAttributesKey| {
                    base.has_attribute(key.target, key.attribute, key.inherit)
                })
            }),
            return_attributes: attrs.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |method: &MethodHandle| {
                    Ok(Arc::new(ReturnAttributes::cached(
                        Arc::clone(&base),
                        *method,
                    )))
                })
            }),

            member_search: find.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &FindMembersKey| {
                    base.find_members(key.owner, key.kinds, key.filter, &key.predicate)
                })
            }),
            interface_search: find.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &FindKey<TypeHandle>| {
                    base.find_interfaces(key.owner, &key.predicate)
                })
            }),
            type_search: find.then(|| {
                let base = Arc::clone(&base);
                Memoized::new(move |key: &FindKey<ModuleHandle>| {
                    base.find_types(key.owner, &key.predicate)
                })
            }),

            base,
            categories,
        }
    }

    /// Start building a facade.
    pub fn builder() -> CachingProviderBuilder<P> {
        CachingProviderBuilder::new()
    }

    /// The categories this facade caches. Fixed at construction.
    pub fn categories(&self) -> Categories {
        self.categories
    }

    /// The decorated base provider.
    pub fn inner(&self) -> &P {
        &self.base
    }

    /// A shared handle to the decorated base provider.
    pub fn shared_inner(&self) -> Arc<P> {
        Arc::clone(&self.base)
    }

    /// The caching view over `method`'s return-parameter attributes.
    ///
    /// With the attribute category enabled the view is built once per
    /// method and cached; with it disabled every call hands out a fresh
    /// pass-through view.
    pub fn return_attribute_provider(
        &self,
        method: MethodHandle,
    ) -> Result<Arc<ReturnAttributes<P>>> {
        match &self.return_attributes {
            Some(memo) => memo.call(&method),
            None => Ok(Arc::new(ReturnAttributes::passthrough(
                Arc::clone(&self.base),
                method,
            ))),
        }
    }

    /// Empty every cache this facade owns, transitively.
    ///
    /// Retained [`ReturnAttributes`] sub-facades are cleared first, so a
    /// caller still holding one sees its caches emptied too rather than
    /// serving stale results forever. The facade itself stays armed;
    /// subsequent calls repopulate lazily.
    pub fn clear(&self) {
        // Sub-facades are cache holders stored as values; forgetting the
        // outer entries alone would leave retained instances stale.
        if let Some(memo) = &self.return_attributes {
            memo.for_each_value(|sub| sub.clear());
        }

        let caches: [&dyn ClearableSlot; 20] = [
            &self.generic_types,
            &self.generic_methods,
            &self.members,
            &self.fields,
            &self.methods,
            &self.constructors,
            &self.properties,
            &self.events,
            &self.nested_types,
            &self.interfaces,
            &self.generic_parameters,
            &self.method_generic_parameters,
            &self.custom_modifiers,
            &self.attributes,
            &self.typed_attributes,
            &self.attribute_checks,
            &self.return_attributes,
            &self.member_search,
            &self.interface_search,
            &self.type_search,
        ];
        for cache in caches {
            cache.clear_slot();
        }
    }
}

/// Erases per-operation key/value types so `clear()` can sweep every
/// slot uniformly.
trait ClearableSlot {
    fn clear_slot(&self);
}

impl<K, V, E> ClearableSlot for Option<Memoized<K, V, E>>
where
    K: Eq + std::hash::Hash + Clone,
    V: Clone,
{
    fn clear_slot(&self) {
        if let Some(memo) = self {
            memo.clear();
        }
    }
}

impl<P> std::fmt::Debug for CachingProvider<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingProvider")
            .field("categories", &self.categories)
            .finish()
    }
}

/// Builder for [`CachingProvider`].
///
/// The base provider is required; categories default to
/// [`Categories::ALL`]. Validation happens in [`build`], so a missing
/// collaborator is reported at construction rather than on first use.
///
/// [`build`]: CachingProviderBuilder::build
pub struct CachingProviderBuilder<P> {
    provider: Option<Arc<P>>,
    categories: Categories,
}

impl<P> CachingProviderBuilder<P>
where
    P: IntrospectionProvider + 'static,
{
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            provider: None,
            categories: Categories::ALL,
        }
    }

    /// Set the base provider to decorate.
    pub fn provider(mut self, provider: P) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set an already-shared base provider.
    pub fn shared_provider(mut self, provider: Arc<P>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Select which operation categories to cache.
    pub fn categories(mut self, categories: Categories) -> Self {
        self.categories = categories;
        self
    }

    /// Build the facade.
    ///
    /// # Errors
    ///
    /// [`BuilderError::MissingProvider`] if no base provider was set.
    pub fn build(self) -> std::result::Result<CachingProvider<P>, BuilderError> {
        let provider = self.provider.ok_or(BuilderError::MissingProvider)?;
        Ok(CachingProvider::from_arc(provider, self.categories))
    }
}

impl<P> Default for CachingProviderBuilder<P>
where
    P: IntrospectionProvider + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> StructureIntrospect for CachingProvider<P>
where
    P: IntrospectionProvider + 'static,
{
    fn members_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[MemberHandle]>> {
        match &self.members {
            Some(memo) => memo.call(&FilteredKey::new(ty, filter)),
            None => self.base.members_of(ty, filter),
        }
    }

    fn fields_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[FieldHandle]>> {
        match &self.fields {
            Some(memo) => memo.call(&FilteredKey::new(ty, filter)),
            None => self.base.fields_of(ty, filter),
        }
    }

    fn methods_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[MethodHandle]>> {
        match &self.methods {
            Some(memo) => memo.call(&FilteredKey::new(ty, filter)),
            None => self.base.methods_of(ty, filter),
        }
    }

    fn constructors_of(
        &self,
        ty: TypeHandle,
        filter: MemberFilter,
    ) -> Result<Arc<[MethodHandle]>> {
        match &self.constructors {
            Some(memo) => memo.call(&FilteredKey::new(ty, filter)),
            None => self.base.constructors_of(ty, filter),
        }
    }

    fn properties_of(
        &self,
        ty: TypeHandle,
        filter: MemberFilter,
    ) -> Result<Arc<[PropertyHandle]>> {
        match &self.properties {
            Some(memo) => memo.call(&FilteredKey::new(ty, filter)),
            None => self.base.properties_of(ty, filter),
        }
    }

    fn events_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[EventHandle]>> {
        match &self.events {
            Some(memo) => memo.call(&FilteredKey::new(ty, filter)),
            None => self.base.events_of(ty, filter),
        }
    }

    fn nested_types_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[TypeHandle]>> {
        match &self.nested_types {
            Some(memo) => memo.call(&FilteredKey::new(ty, filter)),
            None => self.base.nested_types_of(ty, filter),
        }
    }

    fn interfaces_of(&self, ty: TypeHandle) -> Result<Arc<[TypeHandle]>> {
        match &self.interfaces {
            Some(memo) => memo.call(&ty),
            None => self.base.interfaces_of(ty),
        }
    }

    fn generic_parameters_of(&self, ty: TypeHandle) -> Result<Arc<[TypeHandle]>> {
        match &self.generic_parameters {
            Some(memo) => memo.call(&ty),
            None => self.base.generic_parameters_of(ty),
        }
    }

    fn method_generic_parameters_of(&self, method: MethodHandle) -> Result<Arc<[TypeHandle]>> {
        match &self.method_generic_parameters {
            Some(memo) => memo.call(&method),
            None => self.base.method_generic_parameters_of(method),
        }
    }

    fn custom_modifiers_of(&self, param: ParamHandle) -> Result<Arc<[TypeHandle]>> {
        match &self.custom_modifiers {
            Some(memo) => memo.call(&param),
            None => self.base.custom_modifiers_of(param),
        }
    }
}

impl<P> GenericConstruct for CachingProvider<P>
where
    P: IntrospectionProvider + 'static,
{
    fn make_generic_type(
        &self,
        definition: TypeHandle,
        arguments: &[TypeHandle],
    ) -> Result<TypeHandle> {
        match &self.generic_types {
            Some(memo) => memo.call(&GenericTypeKey::new(definition, arguments)),
            None => self.base.make_generic_type(definition, arguments),
        }
    }

    fn make_generic_method(
        &self,
        definition: MethodHandle,
        arguments: &[TypeHandle],
    ) -> Result<MethodHandle> {
        match &self.generic_methods {
            Some(memo) => memo.call(&GenericMethodKey::new(definition, arguments)),
            None => self.base.make_generic_method(definition, arguments),
        }
    }
}

impl<P> AttributeIntrospect for CachingProvider<P>
where
    P: IntrospectionProvider + 'static,
{
    fn attributes_of(&self, target: AttrTarget, inherit: bool) -> Result<Arc<[AttributeValue]>> {
        match &self.attributes {
            Some(memo) => memo.call(&AttributesKey::new(target, inherit)),
            None => self.base.attributes_of(target, inherit),
        }
    }

    fn attributes_of_type(
        &self,
        target: AttrTarget,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<Arc<[AttributeValue]>> {
        match &self.typed_attributes {
            Some(memo) => memo.call(&TypedAttributesKey::new(target, attribute, inherit)),
            None => self.base.attributes_of_type(target, attribute, inherit),
        }
    }

    fn has_attribute(
        &self,
        target: AttrTarget,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<bool> {
        match &self.attribute_checks {
            Some(memo) => memo.call(&TypedAttributesKey::new(target, attribute, inherit)),
            None => self.base.has_attribute(target, attribute, inherit),
        }
    }

    fn return_attributes_of(
        &self,
        method: MethodHandle,
        inherit: bool,
    ) -> Result<Arc<[AttributeValue]>> {
        self.return_attribute_provider(method)?.attributes(inherit)
    }

    fn return_attributes_of_type(
        &self,
        method: MethodHandle,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<Arc<[AttributeValue]>> {
        self.return_attribute_provider(method)?
            .attributes_of_type(attribute, inherit)
    }

    fn return_attribute_defined(
        &self,
        method: MethodHandle,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<bool> {
        self.return_attribute_provider(method)?
            .is_defined(attribute, inherit)
    }
}

impl<P> MemberSearch for CachingProvider<P>
where
    P: IntrospectionProvider + 'static,
{
    fn find_members(
        &self,
        ty: TypeHandle,
        kinds: MemberKinds,
        filter: MemberFilter,
        predicate: &MemberPredicate,
    ) -> Result<Arc<[MemberHandle]>> {
        match &self.member_search {
            Some(memo) => memo.call(&FindMembersKey::new(ty, kinds, filter, predicate.clone())),
            None => self.base.find_members(ty, kinds, filter, predicate),
        }
    }

    fn find_interfaces(
        &self,
        ty: TypeHandle,
        predicate: &MemberPredicate,
    ) -> Result<Arc<[TypeHandle]>> {
        match &self.interface_search {
            Some(memo) => memo.call(&FindKey::new(ty, predicate.clone())),
            None => self.base.find_interfaces(ty, predicate),
        }
    }

    fn find_types(
        &self,
        module: ModuleHandle,
        predicate: &MemberPredicate,
    ) -> Result<Arc<[TypeHandle]>> {
        match &self.type_search {
            Some(memo) => memo.call(&FindKey::new(module, predicate.clone())),
            None => self.base.find_types(module, predicate),
        }
    }
}

impl<P> ValueAccess for CachingProvider<P>
where
    P: IntrospectionProvider + 'static,
{
    #[inline]
    fn load_assembly(&self, name: &str) -> Result<AssemblyHandle> {
        self.base.load_assembly(name)
    }

    #[inline]
    fn invoke(
        &self,
        method: MethodHandle,
        receiver: Option<Value>,
        arguments: &[Value],
    ) -> Result<Value> {
        self.base.invoke(method, receiver, arguments)
    }

    #[inline]
    fn field_value(&self, field: FieldHandle) -> Result<Value> {
        self.base.field_value(field)
    }

    #[inline]
    fn set_field_value(&self, field: FieldHandle, value: Value) -> Result<()> {
        self.base.set_field_value(field, value)
    }

    #[inline]
    fn property_value(&self, property: PropertyHandle) -> Result<Value> {
        self.base.property_value(property)
    }

    #[inline]
    fn set_property_value(&self, property: PropertyHandle, value: Value) -> Result<()> {
        self.base.set_property_value(property, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MetadataRegistry;

    fn sample() -> (MetadataRegistry, ModuleHandle, TypeHandle) {
        let registry = MetadataRegistry::new();
        let assembly = registry.add_assembly("sample");
        let module = registry.add_module(assembly, "sample.main").unwrap();
        let ty = registry.add_type(module, "Widget").unwrap();
        (registry, module, ty)
    }

    #[test]
    fn test_builder_requires_provider() {
        let result = CachingProviderBuilder::<MetadataRegistry>::new().build();
        assert_eq!(result.unwrap_err(), BuilderError::MissingProvider);
    }

    #[test]
    fn test_builder_defaults_to_all_categories() {
        let (registry, _, _) = sample();
        let facade = CachingProvider::builder()
            .provider(registry)
            .build()
            .unwrap();
        assert_eq!(facade.categories(), Categories::ALL);
    }

    #[test]
    fn test_disabled_category_has_no_slot() {
        let (registry, _, _) = sample();
        let facade = CachingProvider::with_categories(registry, Categories::GET);
        assert!(facade.members.is_some());
        assert!(facade.generic_types.is_none());
        assert!(facade.attributes.is_none());
        assert!(facade.member_search.is_none());
    }

    #[test]
    fn test_facade_returns_base_results_unchanged() {
        let (registry, _, ty) = sample();
        registry.add_field(ty, "count", true, false).unwrap();
        let expected = registry.fields_of(ty, MemberFilter::DEFAULT).unwrap();

        let facade = CachingProvider::new(registry);
        let via_facade = facade.fields_of(ty, MemberFilter::DEFAULT).unwrap();
        assert_eq!(via_facade, expected);
        // Repeat is a hit and still identical.
        assert_eq!(facade.fields_of(ty, MemberFilter::DEFAULT).unwrap(), expected);
    }

    #[test]
    fn test_clear_empties_every_slot() {
        let (registry, module, ty) = sample();
        registry.add_field(ty, "count", true, false).unwrap();
        let facade = CachingProvider::new(registry);

        facade.fields_of(ty, MemberFilter::DEFAULT).unwrap();
        facade.interfaces_of(ty).unwrap();
        facade.find_types(module, &MemberPredicate::Any).unwrap();
        assert_eq!(facade.fields.as_ref().unwrap().len(), 1);
        assert_eq!(facade.interfaces.as_ref().unwrap().len(), 1);
        assert_eq!(facade.type_search.as_ref().unwrap().len(), 1);

        facade.clear();
        assert!(facade.fields.as_ref().unwrap().is_empty());
        assert!(facade.interfaces.as_ref().unwrap().is_empty());
        assert!(facade.type_search.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_value_access_is_never_cached() {
        let (registry, _, ty) = sample();
        let field = registry.add_field(ty, "count", true, false).unwrap();
        let facade = CachingProvider::new(registry);

        facade.set_field_value(field, Value::Int(1)).unwrap();
        assert_eq!(facade.field_value(field).unwrap(), Value::Int(1));
        // A second write is observed immediately; no cache interferes.
        facade.set_field_value(field, Value::Int(2)).unwrap();
        assert_eq!(facade.field_value(field).unwrap(), Value::Int(2));
    }
}
