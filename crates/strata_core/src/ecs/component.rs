// component.rs - Component types and their runtime descriptors
//
// Component identity is nominal: two structs with the same layout are still
// different components. Numbering happens per world in the registry; this
// module only describes what a component type is.

use std::alloc::Layout;
use std::any::TypeId;
use std::fmt;

use crate::ecs::storage::{ErasedStore, StorageError};

/// Hard ceiling on distinct component types per registry.
///
/// Archetype keys are 128-bit masks, one bit per [`ComponentId`].
pub const MAX_COMPONENTS: usize = 128;

/// Trait for plain data records stored in archetype columns.
///
/// Implement it through [`define_component!`](crate::define_component) so a
/// type only becomes storable by explicit opt-in.
pub trait Component: 'static + Sized + Send + Sync {
    /// Human-readable name, used in errors and logs.
    const NAME: &'static str;
}

/// Helper macro to implement the [`Component`] trait.
///
/// # Example
/// ```ignore
/// #[derive(Clone, Copy)]
/// struct Position { x: f32, y: f32 }
///
/// define_component!(Position);
/// define_component!(Velocity, "Velocity");
/// ```
#[macro_export]
macro_rules! define_component {
    ($ty:ty) => {
        $crate::define_component!($ty, stringify!($ty));
    };
    ($ty:ty, $name:expr) => {
        impl $crate::ecs::Component for $ty {
            const NAME: &'static str = $name;
        }
    };
}

/// Dense per-registry identifier of a component type.
///
/// Assigned in registration order starting at 0 and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u8);

impl ComponentId {
    /// Callers keep `index < MAX_COMPONENTS`.
    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        debug_assert!(index < MAX_COMPONENTS);
        Self(index as u8)
    }

    /// Bit position of this component inside an [`ArchetypeKey`](crate::ecs::ArchetypeKey).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Runtime descriptor of a component type.
///
/// Carries the column constructor for the type, generated once per `T`, so
/// archetypes can build their columns from descriptors alone.
#[derive(Clone, Copy, Debug)]
pub struct ComponentInfo {
    type_id: TypeId,
    name: &'static str,
    layout: Layout,
    new_column: fn(usize) -> Result<ErasedStore, StorageError>,
}

impl ComponentInfo {
    /// Describe the component type `T`.
    pub fn of<T: Component>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
            layout: Layout::new::<T>(),
            new_column: ErasedStore::new::<T>,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub fn align(&self) -> usize {
        self.layout.align()
    }

    /// Allocate an empty column of this type.
    pub(crate) fn new_column(&self, capacity: usize) -> Result<ErasedStore, StorageError> {
        (self.new_column)(capacity)
    }
}

impl PartialEq for ComponentInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ComponentInfo {}
