// mod.rs - Storage module exports

mod archetype_storage;
mod column;
mod erased;

pub use archetype_storage::{Archetype, ArchetypeError, RowWriter};
pub use column::{ComponentStore, StorageError};
pub use erased::ErasedStore;
