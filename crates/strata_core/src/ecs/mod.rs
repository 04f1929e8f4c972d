//! Entity Component System storage core.
//!
//! Entities that carry exactly the same set of component types share an
//! archetype. Each archetype stores its components column by column, one
//! type-erased column per component type, and every column always holds the
//! same number of rows. The registry numbers component types per world so an
//! archetype can be identified by a 128-bit mask.

mod archetype;
mod bundle;
mod component;
mod entity;
mod macros;
mod query;
mod registry;
pub mod storage;
mod view;
mod world;

pub use archetype::{ArchetypeKey, KeyIds};
pub use bundle::Bundle;
pub use component::{Component, ComponentId, ComponentInfo, MAX_COMPONENTS};
pub use entity::EntityLocator;
pub use query::QueryIter;
pub use registry::{ComponentRegistry, RegistryError};
pub use storage::{
    Archetype, ArchetypeError, ComponentStore, ErasedStore, RowWriter, StorageError,
};
pub use view::{FieldAccess, Read, ViewField, ViewIter, ViewShape, Write};
pub use world::{World, WorldError};
