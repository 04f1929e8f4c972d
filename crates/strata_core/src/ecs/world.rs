// world.rs - ECS World owning the registry and every archetype

use std::collections::{hash_map::Entry, HashMap};

use thiserror::Error;
use tracing::debug;

use crate::config::WorldConfig;
use crate::ecs::query::QueryIter;
use crate::ecs::view::{self, ViewIter, ViewShape};
use crate::ecs::{
    Archetype, ArchetypeError, ArchetypeKey, Bundle, Component, ComponentId, ComponentInfo,
    ComponentRegistry, EntityLocator, RegistryError, StorageError,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Archetype(#[from] ArchetypeError),
    #[error("no archetype with key {key}")]
    ArchetypeNotFound { key: ArchetypeKey },
}

impl From<StorageError> for WorldError {
    fn from(err: StorageError) -> Self {
        WorldError::Archetype(ArchetypeError::Storage(err))
    }
}

/// The main ECS world containing all archetypes and their rows.
///
/// Archetypes are created lazily, the first time a component set is used,
/// and are kept in creation order.
pub struct World {
    config: WorldConfig,
    registry: ComponentRegistry,
    archetypes: Vec<Archetype>,
    index: HashMap<ArchetypeKey, usize>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            config,
            registry: ComponentRegistry::new(),
            archetypes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Store `bundle` as a new entity.
    ///
    /// Unregistered component types are registered first. The entity goes to
    /// the archetype of exactly its component set, which is created if this
    /// is the first entity with that set.
    pub fn create<B: Bundle>(&mut self, bundle: B) -> Result<EntityLocator, WorldError> {
        let position = self.resolve_archetype(&B::infos())?;
        let archetype = &mut self.archetypes[position];
        let row = archetype.add(bundle)?;
        Ok(EntityLocator::new(archetype.key(), row))
    }

    /// The archetype for `B`'s component set, created empty if needed.
    pub fn archetype_for<B: Bundle>(&mut self) -> Result<&mut Archetype, WorldError> {
        let position = self.resolve_archetype(&B::infos())?;
        Ok(&mut self.archetypes[position])
    }

    fn resolve_archetype(&mut self, infos: &[ComponentInfo]) -> Result<usize, WorldError> {
        let key = self.registry.resolve_infos(infos)?;
        match self.index.entry(key) {
            Entry::Occupied(slot) => Ok(*slot.get()),
            Entry::Vacant(slot) => {
                let archetype = Archetype::new(key, infos, self.config.initial_capacity)?;
                debug!(%key, fields = archetype.field_count(), "created archetype");
                let position = self.archetypes.len();
                self.archetypes.push(archetype);
                slot.insert(position);
                Ok(position)
            }
        }
    }

    pub fn archetype(&self, key: ArchetypeKey) -> Option<&Archetype> {
        let position = *self.index.get(&key)?;
        self.archetypes.get(position)
    }

    pub fn archetype_mut(&mut self, key: ArchetypeKey) -> Option<&mut Archetype> {
        let position = *self.index.get(&key)?;
        self.archetypes.get_mut(position)
    }

    /// All archetypes, in creation order.
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    /// Total rows across all archetypes.
    pub fn entity_count(&self) -> usize {
        self.archetypes.iter().map(Archetype::len).sum()
    }

    pub fn get<T: Component>(&self, at: EntityLocator) -> Option<&T> {
        self.archetype(at.archetype())?.get::<T>(at.row())
    }

    pub fn get_mut<T: Component>(&mut self, at: EntityLocator) -> Option<&mut T> {
        self.archetype_mut(at.archetype())?.get_mut::<T>(at.row())
    }

    /// View every row of the archetype stored under `key`.
    pub fn view<Q: ViewShape>(&mut self, key: ArchetypeKey) -> Result<ViewIter<'_, Q>, WorldError> {
        let archetype = self
            .archetype_mut(key)
            .ok_or(WorldError::ArchetypeNotFound { key })?;
        Ok(archetype.view::<Q>()?)
    }

    /// Iterate every row of every archetype that stores all of `Q`'s types.
    ///
    /// Archetypes are visited in creation order. A shape naming a type that
    /// was never registered matches nothing; nothing is registered here.
    pub fn query<Q: ViewShape>(&mut self) -> Result<QueryIter<'_, Q>, WorldError> {
        let fields = Q::fields();
        view::check_aliasing(&fields)?;
        let required = self
            .registry
            .key_of_types(fields.iter().map(|field| field.type_id));
        Ok(QueryIter::new(&mut self.archetypes, required))
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Register `T` ahead of its first use.
    ///
    /// The registry itself is only reachable read-only, so every id stays
    /// consistent with the keys of existing archetypes.
    pub fn register<T: Component>(&mut self) -> Result<ComponentId, WorldError> {
        Ok(self.registry.register::<T>()?)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Destroy every archetype and the rows they hold.
    ///
    /// Dropping the world releases the same storage; this variant logs it.
    pub fn teardown(mut self) {
        debug!(
            archetypes = self.archetype_count(),
            entities = self.entity_count(),
            "tearing down world"
        );
        self.index.clear();
        self.archetypes.clear();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("components", &self.registry.len())
            .field("archetypes", &self.archetypes)
            .finish()
    }
}
