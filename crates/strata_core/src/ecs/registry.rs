// registry.rs - Per-world numbering of component types
//
// Ids are dense, assigned in registration order and never reused. A type keeps
// its id for the lifetime of the registry.

use std::any::TypeId;
use std::collections::HashMap;

use thiserror::Error;
use tracing::trace;

use crate::ecs::{ArchetypeKey, Bundle, Component, ComponentId, ComponentInfo, MAX_COMPONENTS};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("component {name} is already registered")]
    AlreadyRegistered { name: &'static str },
    #[error("component registry is full ({limit} types)")]
    CapacityExceeded { limit: usize },
}

/// Maps component types to [`ComponentId`]s and archetype keys.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    ids: HashMap<TypeId, ComponentId>,
    infos: Vec<ComponentInfo>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id to `T`.
    ///
    /// Fails if `T` already has an id or if all [`MAX_COMPONENTS`] ids are
    /// taken; the registry is unchanged in both cases.
    pub fn register<T: Component>(&mut self) -> Result<ComponentId, RegistryError> {
        self.register_info(ComponentInfo::of::<T>())
    }

    /// Untyped form of [`register`](Self::register).
    pub fn register_info(&mut self, info: ComponentInfo) -> Result<ComponentId, RegistryError> {
        if self.ids.contains_key(&info.type_id()) {
            return Err(RegistryError::AlreadyRegistered { name: info.name() });
        }
        if self.infos.len() >= MAX_COMPONENTS {
            return Err(RegistryError::CapacityExceeded {
                limit: MAX_COMPONENTS,
            });
        }

        let id = ComponentId::from_index(self.infos.len());
        self.ids.insert(info.type_id(), id);
        self.infos.push(info);
        trace!(component = info.name(), id = id.index(), "registered component");
        Ok(id)
    }

    /// Id of `T`, if registered.
    #[inline]
    pub fn lookup<T: Component>(&self) -> Option<ComponentId> {
        self.lookup_type(TypeId::of::<T>())
    }

    #[inline]
    pub fn lookup_type(&self, type_id: TypeId) -> Option<ComponentId> {
        self.ids.get(&type_id).copied()
    }

    /// Descriptor registered under `id`.
    pub fn info(&self, id: ComponentId) -> Option<&ComponentInfo> {
        self.infos.get(id.index())
    }

    /// Key of the bundle's component set, or `None` if any member is
    /// unregistered. Never registers anything.
    pub fn key_of<B: Bundle>(&self) -> Option<ArchetypeKey> {
        self.key_of_types(B::infos().iter().map(ComponentInfo::type_id))
    }

    /// Key of an arbitrary set of types. Order and repetition do not matter.
    pub fn key_of_types<I>(&self, types: I) -> Option<ArchetypeKey>
    where
        I: IntoIterator<Item = TypeId>,
    {
        types
            .into_iter()
            .try_fold(ArchetypeKey::EMPTY, |key, type_id| {
                self.lookup_type(type_id).map(|id| key.with(id))
            })
    }

    /// Key of the bundle's component set, registering missing members.
    pub fn resolve_or_register<B: Bundle>(&mut self) -> Result<ArchetypeKey, RegistryError> {
        self.resolve_infos(&B::infos())
    }

    /// Members registered before a `CapacityExceeded` failure stay registered.
    pub(crate) fn resolve_infos(
        &mut self,
        infos: &[ComponentInfo],
    ) -> Result<ArchetypeKey, RegistryError> {
        let mut key = ArchetypeKey::EMPTY;
        for info in infos {
            let id = match self.lookup_type(info.type_id()) {
                Some(id) => id,
                None => self.register_info(*info)?,
            };
            key = key.with(id);
        }
        Ok(key)
    }

    /// Number of registered component types.
    #[inline]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}
