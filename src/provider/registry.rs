//! In-memory metadata registry.
//!
//! A complete [`IntrospectionProvider`](super::IntrospectionProvider)
//! backed by plain tables. Entities are registered up front through the
//! `add_*` methods; every query is then a pure function of its arguments,
//! so the registry can sit behind the caching facade, serve as a test
//! double, or act as a fully virtualized metadata source.
//!
//! Interior mutability uses a single `parking_lot::RwLock`: registration
//! takes the write lock, queries take the read lock. Generic
//! instantiation interns constructed handles, so repeated construction
//! with content-equal argument lists returns the same handle even when
//! no cache sits in front.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{IntrospectError, Result};
use crate::key::{GenericMethodKey, GenericTypeKey};
use crate::meta::{
    AssemblyHandle, AttrTarget, AttributeValue, EventHandle, FieldHandle, MemberFilter,
    MemberHandle, MemberKinds, MemberPredicate, MethodHandle, ModuleHandle, ParamHandle,
    PropertyHandle, TypeHandle, Value,
};
use crate::provider::{
    AttributeIntrospect, GenericConstruct, MemberSearch, StructureIntrospect, ValueAccess,
};

#[derive(Debug)]
struct AssemblyRecord {
    name: Arc<str>,
    modules: Vec<ModuleHandle>,
    attributes: Vec<AttributeValue>,
}

#[derive(Debug)]
struct ModuleRecord {
    #[allow(dead_code)]
    name: Arc<str>,
    assembly: AssemblyHandle,
    types: Vec<TypeHandle>,
    attributes: Vec<AttributeValue>,
}

#[derive(Debug)]
struct TypeRecord {
    name: Arc<str>,
    module: ModuleHandle,
    base: Option<TypeHandle>,
    interfaces: Vec<TypeHandle>,
    fields: Vec<FieldHandle>,
    methods: Vec<MethodHandle>,
    constructors: Vec<MethodHandle>,
    properties: Vec<PropertyHandle>,
    events: Vec<EventHandle>,
    nested: Vec<TypeHandle>,
    generic_params: Vec<TypeHandle>,
    attributes: Vec<AttributeValue>,
}

impl TypeRecord {
    fn new(name: Arc<str>, module: ModuleHandle) -> Self {
        Self {
            name,
            module,
            base: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            nested: Vec::new(),
            generic_params: Vec::new(),
            attributes: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct MethodRecord {
    name: Arc<str>,
    declaring: TypeHandle,
    public: bool,
    is_static: bool,
    generic_params: Vec<TypeHandle>,
    params: Vec<ParamHandle>,
    attributes: Vec<AttributeValue>,
    return_attributes: Vec<AttributeValue>,
}

#[derive(Debug)]
struct SlotRecord {
    name: Arc<str>,
    public: bool,
    is_static: bool,
    attributes: Vec<AttributeValue>,
}

#[derive(Debug)]
struct ParamRecord {
    #[allow(dead_code)]
    name: Arc<str>,
    #[allow(dead_code)]
    method: MethodHandle,
    modifiers: Vec<TypeHandle>,
    attributes: Vec<AttributeValue>,
}

#[derive(Default)]
struct RegistryState {
    assemblies: Vec<AssemblyRecord>,
    assembly_names: FxHashMap<Arc<str>, AssemblyHandle>,
    modules: Vec<ModuleRecord>,
    types: Vec<TypeRecord>,
    methods: Vec<MethodRecord>,
    fields: Vec<SlotRecord>,
    properties: Vec<SlotRecord>,
    events: Vec<SlotRecord>,
    params: Vec<ParamRecord>,
    type_instances: FxHashMap<GenericTypeKey, TypeHandle>,
    method_instances: FxHashMap<GenericMethodKey, MethodHandle>,
    field_values: FxHashMap<FieldHandle, Value>,
    property_values: FxHashMap<PropertyHandle, Value>,
    invoke_results: FxHashMap<MethodHandle, Value>,
}

impl RegistryState {
    fn assembly(&self, handle: AssemblyHandle) -> Result<&AssemblyRecord> {
        self.assemblies
            .get(handle.0 as usize)
            .ok_or(IntrospectError::UnknownAssembly(handle))
    }

    fn module(&self, handle: ModuleHandle) -> Result<&ModuleRecord> {
        self.modules
            .get(handle.0 as usize)
            .ok_or(IntrospectError::UnknownModule(handle))
    }

    fn ty(&self, handle: TypeHandle) -> Result<&TypeRecord> {
        self.types
            .get(handle.0 as usize)
            .ok_or(IntrospectError::UnknownType(handle))
    }

    fn ty_mut(&mut self, handle: TypeHandle) -> Result<&mut TypeRecord> {
        self.types
            .get_mut(handle.0 as usize)
            .ok_or(IntrospectError::UnknownType(handle))
    }

    fn method(&self, handle: MethodHandle) -> Result<&MethodRecord> {
        self.methods
            .get(handle.0 as usize)
            .ok_or(IntrospectError::UnknownMethod(handle))
    }

    fn method_mut(&mut self, handle: MethodHandle) -> Result<&mut MethodRecord> {
        self.methods
            .get_mut(handle.0 as usize)
            .ok_or(IntrospectError::UnknownMethod(handle))
    }

    fn field(&self, handle: FieldHandle) -> Result<&SlotRecord> {
        self.fields
            .get(handle.0 as usize)
            .ok_or(IntrospectError::UnknownField(handle))
    }

    fn property(&self, handle: PropertyHandle) -> Result<&SlotRecord> {
        self.properties
            .get(handle.0 as usize)
            .ok_or(IntrospectError::UnknownProperty(handle))
    }

    fn event(&self, handle: EventHandle) -> Result<&SlotRecord> {
        self.events
            .get(handle.0 as usize)
            .ok_or(IntrospectError::UnknownEvent(handle))
    }

    fn param(&self, handle: ParamHandle) -> Result<&ParamRecord> {
        self.params
            .get(handle.0 as usize)
            .ok_or(IntrospectError::UnknownParameter(handle))
    }

    /// Base-type chain starting at `ty`, excluding `ty` itself. Bounded
    /// by the table size so a malformed chain cannot loop forever.
    fn base_chain(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        let mut chain = Vec::new();
        let mut current = self.types.get(ty.0 as usize).and_then(|r| r.base);
        while let Some(base) = current {
            if chain.len() >= self.types.len() {
                break;
            }
            chain.push(base);
            current = self.types.get(base.0 as usize).and_then(|r| r.base);
        }
        chain
    }

    fn member_name_and_attrs(&self, member: MemberHandle) -> Result<(Arc<str>, &[AttributeValue])> {
        match member {
            MemberHandle::Field(h) => {
                let rec = self.field(h)?;
                Ok((Arc::clone(&rec.name), &rec.attributes))
            }
            MemberHandle::Method(h) | MemberHandle::Constructor(h) => {
                let rec = self.method(h)?;
                Ok((Arc::clone(&rec.name), &rec.attributes))
            }
            MemberHandle::Property(h) => {
                let rec = self.property(h)?;
                Ok((Arc::clone(&rec.name), &rec.attributes))
            }
            MemberHandle::Event(h) => {
                let rec = self.event(h)?;
                Ok((Arc::clone(&rec.name), &rec.attributes))
            }
            MemberHandle::NestedType(h) => {
                let rec = self.ty(h)?;
                Ok((Arc::clone(&rec.name), &rec.attributes))
            }
        }
    }
}

fn slot_matches(public: bool, is_static: bool, filter: MemberFilter) -> bool {
    let visibility = if public {
        MemberFilter::PUBLIC
    } else {
        MemberFilter::NON_PUBLIC
    };
    let binding = if is_static {
        MemberFilter::STATIC
    } else {
        MemberFilter::INSTANCE
    };
    filter.contains(visibility) && filter.contains(binding)
}

/// In-memory introspection provider.
///
/// # Example
///
/// ```
/// use introcache::meta::MemberFilter;
/// use introcache::provider::{MetadataRegistry, StructureIntrospect};
///
/// let registry = MetadataRegistry::new();
/// let assembly = registry.add_assembly("core");
/// let module = registry.add_module(assembly, "core.main").unwrap();
/// let list = registry.add_type(module, "List").unwrap();
/// registry.add_field(list, "length", true, false).unwrap();
///
/// let fields = registry.fields_of(list, MemberFilter::DEFAULT).unwrap();
/// assert_eq!(fields.len(), 1);
/// ```
pub struct MetadataRegistry {
    state: RwLock<RegistryState>,
}

impl MetadataRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Register an assembly and return its handle.
    pub fn add_assembly(&self, name: &str) -> AssemblyHandle {
        let mut state = self.state.write();
        let handle = AssemblyHandle(state.assemblies.len() as u32);
        let name: Arc<str> = Arc::from(name);
        state.assembly_names.insert(Arc::clone(&name), handle);
        state.assemblies.push(AssemblyRecord {
            name,
            modules: Vec::new(),
            attributes: Vec::new(),
        });
        handle
    }

    /// Register a module inside `assembly`.
    pub fn add_module(&self, assembly: AssemblyHandle, name: &str) -> Result<ModuleHandle> {
        let mut state = self.state.write();
        state.assembly(assembly)?;
        let handle = ModuleHandle(state.modules.len() as u32);
        state.modules.push(ModuleRecord {
            name: Arc::from(name),
            assembly,
            types: Vec::new(),
            attributes: Vec::new(),
        });
        state.assemblies[assembly.0 as usize].modules.push(handle);
        Ok(handle)
    }

    /// Register a type inside `module`.
    pub fn add_type(&self, module: ModuleHandle, name: &str) -> Result<TypeHandle> {
        let mut state = self.state.write();
        state.module(module)?;
        let handle = TypeHandle(state.types.len() as u32);
        state.types.push(TypeRecord::new(Arc::from(name), module));
        state.modules[module.0 as usize].types.push(handle);
        Ok(handle)
    }

    /// Register a nested type declared inside `outer`.
    pub fn add_nested_type(&self, outer: TypeHandle, name: &str) -> Result<TypeHandle> {
        let module = {
            let state = self.state.read();
            state.ty(outer)?.module
        };
        let handle = self.add_type(module, name)?;
        self.state.write().ty_mut(outer)?.nested.push(handle);
        Ok(handle)
    }

    /// Set the base type `ty` inherits from.
    pub fn set_base_type(&self, ty: TypeHandle, base: TypeHandle) -> Result<()> {
        let mut state = self.state.write();
        state.ty(base)?;
        state.ty_mut(ty)?.base = Some(base);
        Ok(())
    }

    /// Record that `ty` implements `interface`.
    pub fn add_interface(&self, ty: TypeHandle, interface: TypeHandle) -> Result<()> {
        let mut state = self.state.write();
        state.ty(interface)?;
        state.ty_mut(ty)?.interfaces.push(interface);
        Ok(())
    }

    /// Declare a generic parameter on `ty`, turning it into an open
    /// generic definition. Returns the parameter's type handle.
    pub fn add_generic_parameter(&self, ty: TypeHandle, name: &str) -> Result<TypeHandle> {
        let mut state = self.state.write();
        let module = state.ty(ty)?.module;
        let handle = TypeHandle(state.types.len() as u32);
        state.types.push(TypeRecord::new(Arc::from(name), module));
        state.ty_mut(ty)?.generic_params.push(handle);
        Ok(handle)
    }

    /// Declare a generic parameter on `method`.
    pub fn add_method_generic_parameter(
        &self,
        method: MethodHandle,
        name: &str,
    ) -> Result<TypeHandle> {
        let mut state = self.state.write();
        let declaring = state.method(method)?.declaring;
        let module = state.ty(declaring)?.module;
        let handle = TypeHandle(state.types.len() as u32);
        state.types.push(TypeRecord::new(Arc::from(name), module));
        state.method_mut(method)?.generic_params.push(handle);
        Ok(handle)
    }

    /// Register a field on `ty`.
    pub fn add_field(
        &self,
        ty: TypeHandle,
        name: &str,
        public: bool,
        is_static: bool,
    ) -> Result<FieldHandle> {
        let mut state = self.state.write();
        state.ty(ty)?;
        let handle = FieldHandle(state.fields.len() as u32);
        state.fields.push(SlotRecord {
            name: Arc::from(name),
            public,
            is_static,
            attributes: Vec::new(),
        });
        state.ty_mut(ty)?.fields.push(handle);
        Ok(handle)
    }

    /// Register a method on `ty`.
    pub fn add_method(
        &self,
        ty: TypeHandle,
        name: &str,
        public: bool,
        is_static: bool,
    ) -> Result<MethodHandle> {
        self.add_method_record(ty, name, public, is_static, false)
    }

    /// Register a constructor on `ty`.
    pub fn add_constructor(&self, ty: TypeHandle, public: bool) -> Result<MethodHandle> {
        self.add_method_record(ty, ".ctor", public, false, true)
    }

    fn add_method_record(
        &self,
        ty: TypeHandle,
        name: &str,
        public: bool,
        is_static: bool,
        is_ctor: bool,
    ) -> Result<MethodHandle> {
        let mut state = self.state.write();
        state.ty(ty)?;
        let handle = MethodHandle(state.methods.len() as u32);
        state.methods.push(MethodRecord {
            name: Arc::from(name),
            declaring: ty,
            public,
            is_static,
            generic_params: Vec::new(),
            params: Vec::new(),
            attributes: Vec::new(),
            return_attributes: Vec::new(),
        });
        let record = state.ty_mut(ty)?;
        if is_ctor {
            record.constructors.push(handle);
        } else {
            record.methods.push(handle);
        }
        Ok(handle)
    }

    /// Register a property on `ty`.
    pub fn add_property(
        &self,
        ty: TypeHandle,
        name: &str,
        public: bool,
        is_static: bool,
    ) -> Result<PropertyHandle> {
        let mut state = self.state.write();
        state.ty(ty)?;
        let handle = PropertyHandle(state.properties.len() as u32);
        state.properties.push(SlotRecord {
            name: Arc::from(name),
            public,
            is_static,
            attributes: Vec::new(),
        });
        state.ty_mut(ty)?.properties.push(handle);
        Ok(handle)
    }

    /// Register an event on `ty`.
    pub fn add_event(
        &self,
        ty: TypeHandle,
        name: &str,
        public: bool,
        is_static: bool,
    ) -> Result<EventHandle> {
        let mut state = self.state.write();
        state.ty(ty)?;
        let handle = EventHandle(state.events.len() as u32);
        state.events.push(SlotRecord {
            name: Arc::from(name),
            public,
            is_static,
            attributes: Vec::new(),
        });
        state.ty_mut(ty)?.events.push(handle);
        Ok(handle)
    }

    /// Register a parameter on `method`.
    pub fn add_parameter(&self, method: MethodHandle, name: &str) -> Result<ParamHandle> {
        let mut state = self.state.write();
        state.method(method)?;
        let handle = ParamHandle(state.params.len() as u32);
        state.params.push(ParamRecord {
            name: Arc::from(name),
            method,
            modifiers: Vec::new(),
            attributes: Vec::new(),
        });
        state.method_mut(method)?.params.push(handle);
        Ok(handle)
    }

    /// Attach a custom modifier type to `param`.
    pub fn add_custom_modifier(&self, param: ParamHandle, modifier: TypeHandle) -> Result<()> {
        let mut state = self.state.write();
        state.ty(modifier)?;
        state.param(param)?;
        state.params[param.0 as usize].modifiers.push(modifier);
        Ok(())
    }

    /// Attach an attribute instance to any target.
    pub fn add_attribute(&self, target: AttrTarget, attribute: AttributeValue) -> Result<()> {
        let mut state = self.state.write();
        match target {
            AttrTarget::Assembly(h) => {
                state.assembly(h)?;
                state.assemblies[h.0 as usize].attributes.push(attribute);
            }
            AttrTarget::Module(h) => {
                state.module(h)?;
                state.modules[h.0 as usize].attributes.push(attribute);
            }
            AttrTarget::Type(h) => {
                state.ty(h)?;
                state.types[h.0 as usize].attributes.push(attribute);
            }
            AttrTarget::Member(member) => match member {
                MemberHandle::Field(h) => {
                    state.field(h)?;
                    state.fields[h.0 as usize].attributes.push(attribute);
                }
                MemberHandle::Method(h) | MemberHandle::Constructor(h) => {
                    state.method(h)?;
                    state.methods[h.0 as usize].attributes.push(attribute);
                }
                MemberHandle::Property(h) => {
                    state.property(h)?;
                    state.properties[h.0 as usize].attributes.push(attribute);
                }
                MemberHandle::Event(h) => {
                    state.event(h)?;
                    state.events[h.0 as usize].attributes.push(attribute);
                }
                MemberHandle::NestedType(h) => {
                    state.ty(h)?;
                    state.types[h.0 as usize].attributes.push(attribute);
                }
            },
            AttrTarget::Parameter(h) => {
                state.param(h)?;
                state.params[h.0 as usize].attributes.push(attribute);
            }
        }
        Ok(())
    }

    /// Attach an attribute instance to the return parameter of `method`.
    pub fn add_return_attribute(
        &self,
        method: MethodHandle,
        attribute: AttributeValue,
    ) -> Result<()> {
        let mut state = self.state.write();
        state.method_mut(method)?.return_attributes.push(attribute);
        Ok(())
    }

    /// Register the value `invoke` should return for `method`.
    pub fn set_invoke_result(&self, method: MethodHandle, result: Value) -> Result<()> {
        let mut state = self.state.write();
        state.method(method)?;
        state.invoke_results.insert(method, result);
        Ok(())
    }

    fn attributes_for(&self, target: AttrTarget, inherit: bool) -> Result<Vec<AttributeValue>> {
        let state = self.state.read();
        let mut collected = match target {
            AttrTarget::Assembly(h) => state.assembly(h)?.attributes.clone(),
            AttrTarget::Module(h) => state.module(h)?.attributes.clone(),
            AttrTarget::Type(h) => state.ty(h)?.attributes.clone(),
            AttrTarget::Member(member) => state.member_name_and_attrs(member)?.1.to_vec(),
            AttrTarget::Parameter(h) => state.param(h)?.attributes.clone(),
        };
        if inherit {
            if let AttrTarget::Type(h) = target {
                for base in state.base_chain(h) {
                    collected.extend_from_slice(&state.ty(base)?.attributes);
                }
            }
        }
        Ok(collected)
    }
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureIntrospect for MetadataRegistry {
    fn members_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[MemberHandle]>> {
        let mut members: Vec<MemberHandle> = Vec::new();
        members.extend(self.fields_of(ty, filter)?.iter().map(|&h| MemberHandle::Field(h)));
        members.extend(
            self.methods_of(ty, filter)?
                .iter()
                .map(|&h| MemberHandle::Method(h)),
        );
        members.extend(
            self.constructors_of(ty, filter)?
                .iter()
                .map(|&h| MemberHandle::Constructor(h)),
        );
        members.extend(
            self.properties_of(ty, filter)?
                .iter()
                .map(|&h| MemberHandle::Property(h)),
        );
        members.extend(
            self.events_of(ty, filter)?
                .iter()
                .map(|&h| MemberHandle::Event(h)),
        );
        members.extend(
            self.nested_types_of(ty, filter)?
                .iter()
                .map(|&h| MemberHandle::NestedType(h)),
        );
        Ok(members.into())
    }

    fn fields_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[FieldHandle]>> {
        let state = self.state.read();
        let mut owners = vec![ty];
        if !filter.contains(MemberFilter::DECLARED_ONLY) {
            owners.extend(state.base_chain(ty));
        }
        let mut matched = Vec::new();
        for owner in owners {
            for &field in &state.ty(owner)?.fields {
                let record = state.field(field)?;
                if slot_matches(record.public, record.is_static, filter) {
                    matched.push(field);
                }
            }
        }
        Ok(matched.into())
    }

    fn methods_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[MethodHandle]>> {
        let state = self.state.read();
        let mut owners = vec![ty];
        if !filter.contains(MemberFilter::DECLARED_ONLY) {
            owners.extend(state.base_chain(ty));
        }
        let mut matched = Vec::new();
        for owner in owners {
            for &method in &state.ty(owner)?.methods {
                let record = state.method(method)?;
                if slot_matches(record.public, record.is_static, filter) {
                    matched.push(method);
                }
            }
        }
        Ok(matched.into())
    }

    fn constructors_of(
        &self,
        ty: TypeHandle,
        filter: MemberFilter,
    ) -> Result<Arc<[MethodHandle]>> {
        // Constructors are never inherited.
        let state = self.state.read();
        let mut matched = Vec::new();
        for &ctor in &state.ty(ty)?.constructors {
            let record = state.method(ctor)?;
            if slot_matches(record.public, record.is_static, filter) {
                matched.push(ctor);
            }
        }
        Ok(matched.into())
    }

    fn properties_of(
        &self,
        ty: TypeHandle,
        filter: MemberFilter,
    ) -> Result<Arc<[PropertyHandle]>> {
        let state = self.state.read();
        let mut owners = vec![ty];
        if !filter.contains(MemberFilter::DECLARED_ONLY) {
            owners.extend(state.base_chain(ty));
        }
        let mut matched = Vec::new();
        for owner in owners {
            for &property in &state.ty(owner)?.properties {
                let record = state.property(property)?;
                if slot_matches(record.public, record.is_static, filter) {
                    matched.push(property);
                }
            }
        }
        Ok(matched.into())
    }

    fn events_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[EventHandle]>> {
        let state = self.state.read();
        let mut owners = vec![ty];
        if !filter.contains(MemberFilter::DECLARED_ONLY) {
            owners.extend(state.base_chain(ty));
        }
        let mut matched = Vec::new();
        for owner in owners {
            for &event in &state.ty(owner)?.events {
                let record = state.event(event)?;
                if slot_matches(record.public, record.is_static, filter) {
                    matched.push(event);
                }
            }
        }
        Ok(matched.into())
    }

    fn nested_types_of(&self, ty: TypeHandle, filter: MemberFilter) -> Result<Arc<[TypeHandle]>> {
        // Nested types are never inherited; registered ones are public.
        let state = self.state.read();
        let record = state.ty(ty)?;
        if filter.contains(MemberFilter::PUBLIC) {
            Ok(record.nested.clone().into())
        } else {
            Ok(Arc::new([]))
        }
    }

    fn interfaces_of(&self, ty: TypeHandle) -> Result<Arc<[TypeHandle]>> {
        let state = self.state.read();
        Ok(state.ty(ty)?.interfaces.clone().into())
    }

    fn generic_parameters_of(&self, ty: TypeHandle) -> Result<Arc<[TypeHandle]>> {
        let state = self.state.read();
        Ok(state.ty(ty)?.generic_params.clone().into())
    }

    fn method_generic_parameters_of(&self, method: MethodHandle) -> Result<Arc<[TypeHandle]>> {
        let state = self.state.read();
        Ok(state.method(method)?.generic_params.clone().into())
    }

    fn custom_modifiers_of(&self, param: ParamHandle) -> Result<Arc<[TypeHandle]>> {
        let state = self.state.read();
        Ok(state.param(param)?.modifiers.clone().into())
    }
}

impl GenericConstruct for MetadataRegistry {
    fn make_generic_type(
        &self,
        definition: TypeHandle,
        arguments: &[TypeHandle],
    ) -> Result<TypeHandle> {
        let mut state = self.state.write();
        let (param_count, definition_name, module) = {
            let record = state.ty(definition)?;
            (
                record.generic_params.len(),
                Arc::clone(&record.name),
                record.module,
            )
        };
        if param_count == 0 {
            return Err(IntrospectError::NotGenericType(definition));
        }
        if param_count != arguments.len() {
            return Err(IntrospectError::GenericArityMismatch {
                expected: param_count,
                actual: arguments.len(),
            });
        }
        let mut argument_names: SmallVec<[Arc<str>; 4]> = SmallVec::new();
        for &argument in arguments {
            argument_names.push(Arc::clone(&state.ty(argument)?.name));
        }

        let key = GenericTypeKey::new(definition, arguments);
        if let Some(&existing) = state.type_instances.get(&key) {
            return Ok(existing);
        }

        let name = format!("{}<{}>", definition_name, argument_names.join(", "));
        let handle = TypeHandle(state.types.len() as u32);
        state.types.push(TypeRecord::new(Arc::from(name), module));
        state.modules[module.0 as usize].types.push(handle);
        state.type_instances.insert(key, handle);
        Ok(handle)
    }

    fn make_generic_method(
        &self,
        definition: MethodHandle,
        arguments: &[TypeHandle],
    ) -> Result<MethodHandle> {
        let mut state = self.state.write();
        let (param_count, definition_name, declaring, public, is_static) = {
            let record = state.method(definition)?;
            (
                record.generic_params.len(),
                Arc::clone(&record.name),
                record.declaring,
                record.public,
                record.is_static,
            )
        };
        if param_count == 0 {
            return Err(IntrospectError::NotGenericMethod(definition));
        }
        if param_count != arguments.len() {
            return Err(IntrospectError::GenericArityMismatch {
                expected: param_count,
                actual: arguments.len(),
            });
        }
        let mut argument_names: SmallVec<[Arc<str>; 4]> = SmallVec::new();
        for &argument in arguments {
            argument_names.push(Arc::clone(&state.ty(argument)?.name));
        }

        let key = GenericMethodKey::new(definition, arguments);
        if let Some(&existing) = state.method_instances.get(&key) {
            return Ok(existing);
        }

        let name = format!("{}<{}>", definition_name, argument_names.join(", "));
        let handle = MethodHandle(state.methods.len() as u32);
        state.methods.push(MethodRecord {
            name: Arc::from(name),
            declaring,
            public,
            is_static,
            generic_params: Vec::new(),
            params: Vec::new(),
            attributes: Vec::new(),
            return_attributes: Vec::new(),
        });
        state.method_instances.insert(key, handle);
        Ok(handle)
    }
}

impl AttributeIntrospect for MetadataRegistry {
    fn attributes_of(&self, target: AttrTarget, inherit: bool) -> Result<Arc<[AttributeValue]>> {
        Ok(self.attributes_for(target, inherit)?.into())
    }

    fn attributes_of_type(
        &self,
        target: AttrTarget,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<Arc<[AttributeValue]>> {
        let mut collected = self.attributes_for(target, inherit)?;
        collected.retain(|a| a.attribute == attribute);
        Ok(collected.into())
    }

    fn has_attribute(
        &self,
        target: AttrTarget,
        attribute: TypeHandle,
        inherit: bool,
    ) -> Result<bool> {
        Ok(self
            .attributes_for(target, inherit)?
            .iter()
            .any(|a| a.attribute == attribute))
    }

    fn return_attributes_of(
        &self,
        method: MethodHandle,
        _inherit: bool,
    ) -> Result<Arc<[AttributeValue]>> {
        let state = self.state.read();
        Ok(state.method(method)?.return_attributes.clone().into())
    }

    fn return_attributes_of_type(
        &self,
        method: MethodHandle,
        attribute: TypeHandle,
        _inherit: bool,
    ) -> Result<Arc<[AttributeValue]>> {
        let state = self.state.read();
        let matched: Vec<AttributeValue> = state
            .method(method)?
            .return_attributes
            .iter()
            .filter(|a| a.attribute == attribute)
            .cloned()
            .collect();
        Ok(matched.into())
    }

    fn return_attribute_defined(
        &self,
        method: MethodHandle,
        attribute: TypeHandle,
        _inherit: bool,
    ) -> Result<bool> {
        let state = self.state.read();
        Ok(state
            .method(method)?
            .return_attributes
            .iter()
            .any(|a| a.attribute == attribute))
    }
}

impl MemberSearch for MetadataRegistry {
    fn find_members(
        &self,
        ty: TypeHandle,
        kinds: MemberKinds,
        filter: MemberFilter,
        predicate: &MemberPredicate,
    ) -> Result<Arc<[MemberHandle]>> {
        let candidates = self.members_of(ty, filter)?;
        let state = self.state.read();
        let mut matched = Vec::new();
        for &member in candidates.iter() {
            if !kinds.intersects(member.kind()) {
                continue;
            }
            let (name, attributes) = state.member_name_and_attrs(member)?;
            if predicate.matches(&name, attributes) {
                matched.push(member);
            }
        }
        Ok(matched.into())
    }

    fn find_interfaces(
        &self,
        ty: TypeHandle,
        predicate: &MemberPredicate,
    ) -> Result<Arc<[TypeHandle]>> {
        let state = self.state.read();
        let mut matched = Vec::new();
        for &interface in &state.ty(ty)?.interfaces {
            let record = state.ty(interface)?;
            if predicate.matches(&record.name, &record.attributes) {
                matched.push(interface);
            }
        }
        Ok(matched.into())
    }

    fn find_types(
        &self,
        module: ModuleHandle,
        predicate: &MemberPredicate,
    ) -> Result<Arc<[TypeHandle]>> {
        let state = self.state.read();
        let mut matched = Vec::new();
        for &ty in &state.module(module)?.types {
            let record = state.ty(ty)?;
            if predicate.matches(&record.name, &record.attributes) {
                matched.push(ty);
            }
        }
        Ok(matched.into())
    }
}

impl ValueAccess for MetadataRegistry {
    fn load_assembly(&self, name: &str) -> Result<AssemblyHandle> {
        let state = self.state.read();
        state
            .assembly_names
            .get(name)
            .copied()
            .ok_or_else(|| IntrospectError::AssemblyNotFound(name.to_string()))
    }

    fn invoke(
        &self,
        method: MethodHandle,
        _receiver: Option<Value>,
        _arguments: &[Value],
    ) -> Result<Value> {
        let state = self.state.read();
        state.method(method)?;
        state
            .invoke_results
            .get(&method)
            .cloned()
            .ok_or(IntrospectError::NotInvokable(method))
    }

    fn field_value(&self, field: FieldHandle) -> Result<Value> {
        let state = self.state.read();
        state.field(field)?;
        Ok(state.field_values.get(&field).cloned().unwrap_or_default())
    }

    fn set_field_value(&self, field: FieldHandle, value: Value) -> Result<()> {
        let mut state = self.state.write();
        state.field(field)?;
        state.field_values.insert(field, value);
        Ok(())
    }

    fn property_value(&self, property: PropertyHandle) -> Result<Value> {
        let state = self.state.read();
        state.property(property)?;
        Ok(state
            .property_values
            .get(&property)
            .cloned()
            .unwrap_or_default())
    }

    fn set_property_value(&self, property: PropertyHandle, value: Value) -> Result<()> {
        let mut state = self.state.write();
        state.property(property)?;
        state.property_values.insert(property, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MetadataRegistry, ModuleHandle, TypeHandle) {
        let registry = MetadataRegistry::new();
        let assembly = registry.add_assembly("sample");
        let module = registry.add_module(assembly, "sample.main").unwrap();
        let ty = registry.add_type(module, "Widget").unwrap();
        (registry, module, ty)
    }

    #[test]
    fn test_structural_queries_respect_filter() {
        let (registry, _, ty) = sample();
        registry.add_field(ty, "count", true, false).unwrap();
        registry.add_field(ty, "secret", false, false).unwrap();
        registry.add_field(ty, "shared", true, true).unwrap();

        let public = registry.fields_of(ty, MemberFilter::DEFAULT).unwrap();
        assert_eq!(public.len(), 2);

        let non_public = registry
            .fields_of(ty, MemberFilter::NON_PUBLIC | MemberFilter::INSTANCE)
            .unwrap();
        assert_eq!(non_public.len(), 1);

        let static_only = registry
            .fields_of(ty, MemberFilter::PUBLIC | MemberFilter::STATIC)
            .unwrap();
        assert_eq!(static_only.len(), 1);
    }

    #[test]
    fn test_inherited_members_and_declared_only() {
        let (registry, module, ty) = sample();
        let base = registry.add_type(module, "Base").unwrap();
        registry.set_base_type(ty, base).unwrap();
        registry.add_method(base, "describe", true, false).unwrap();
        registry.add_method(ty, "refresh", true, false).unwrap();

        let all = registry.methods_of(ty, MemberFilter::DEFAULT).unwrap();
        assert_eq!(all.len(), 2);

        let declared = registry
            .methods_of(ty, MemberFilter::DEFAULT | MemberFilter::DECLARED_ONLY)
            .unwrap();
        assert_eq!(declared.len(), 1);
    }

    #[test]
    fn test_constructors_not_inherited() {
        let (registry, module, ty) = sample();
        let base = registry.add_type(module, "Base").unwrap();
        registry.set_base_type(ty, base).unwrap();
        registry.add_constructor(base, true).unwrap();

        let ctors = registry.constructors_of(ty, MemberFilter::DEFAULT).unwrap();
        assert!(ctors.is_empty());
    }

    #[test]
    fn test_generic_instantiation_is_interned() {
        let (registry, module, list) = sample();
        registry.add_generic_parameter(list, "T").unwrap();
        let int32 = registry.add_type(module, "Int32").unwrap();

        let a = registry.make_generic_type(list, &[int32]).unwrap();
        let b = registry.make_generic_type(list, &[int32]).unwrap();
        assert_eq!(a, b);

        let state = registry.state.read();
        assert_eq!(state.ty(a).unwrap().name.as_ref(), "Widget<Int32>");
    }

    #[test]
    fn test_generic_construction_errors() {
        let (registry, module, ty) = sample();
        let int32 = registry.add_type(module, "Int32").unwrap();

        assert_eq!(
            registry.make_generic_type(ty, &[int32]),
            Err(IntrospectError::NotGenericType(ty))
        );

        registry.add_generic_parameter(ty, "T").unwrap();
        assert_eq!(
            registry.make_generic_type(ty, &[int32, int32]),
            Err(IntrospectError::GenericArityMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_attribute_inheritance_walk() {
        let (registry, module, ty) = sample();
        let base = registry.add_type(module, "Base").unwrap();
        let marker = registry.add_type(module, "MarkerAttribute").unwrap();
        registry.set_base_type(ty, base).unwrap();
        registry
            .add_attribute(AttrTarget::Type(base), AttributeValue::marker(marker))
            .unwrap();

        let own = registry.attributes_of(AttrTarget::Type(ty), false).unwrap();
        assert!(own.is_empty());

        let inherited = registry.attributes_of(AttrTarget::Type(ty), true).unwrap();
        assert_eq!(inherited.len(), 1);
        assert!(registry
            .has_attribute(AttrTarget::Type(ty), marker, true)
            .unwrap());
    }

    #[test]
    fn test_find_members_by_kind_and_name() {
        let (registry, _, ty) = sample();
        registry.add_field(ty, "value", true, false).unwrap();
        registry.add_method(ty, "value", true, false).unwrap();
        registry.add_method(ty, "reset", true, false).unwrap();

        let found = registry
            .find_members(
                ty,
                MemberKinds::METHOD,
                MemberFilter::DEFAULT,
                &MemberPredicate::name("value"),
            )
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(matches!(found[0], MemberHandle::Method(_)));
    }

    #[test]
    fn test_find_types_in_module() {
        let (registry, module, _) = sample();
        registry.add_type(module, "Helper").unwrap();

        let all = registry.find_types(module, &MemberPredicate::Any).unwrap();
        assert_eq!(all.len(), 2);

        let helpers = registry
            .find_types(module, &MemberPredicate::name_ignore_case("helper"))
            .unwrap();
        assert_eq!(helpers.len(), 1);
    }

    #[test]
    fn test_value_access_roundtrip() {
        let (registry, _, ty) = sample();
        let field = registry.add_field(ty, "count", true, false).unwrap();

        assert_eq!(registry.field_value(field).unwrap(), Value::Unit);
        registry.set_field_value(field, Value::Int(5)).unwrap();
        assert_eq!(registry.field_value(field).unwrap(), Value::Int(5));
    }

    #[test]
    fn test_invoke_requires_registered_result() {
        let (registry, _, ty) = sample();
        let method = registry.add_method(ty, "run", true, false).unwrap();

        assert_eq!(
            registry.invoke(method, None, &[]),
            Err(IntrospectError::NotInvokable(method))
        );

        registry
            .set_invoke_result(method, Value::Str("done".into()))
            .unwrap();
        assert_eq!(
            registry.invoke(method, None, &[]),
            Ok(Value::Str("done".into()))
        );
    }

    #[test]
    fn test_load_assembly_by_name() {
        let (registry, _, _) = sample();
        assert!(registry.load_assembly("sample").is_ok());
        assert_eq!(
            registry.load_assembly("missing"),
            Err(IntrospectError::AssemblyNotFound("missing".into()))
        );
    }
}
