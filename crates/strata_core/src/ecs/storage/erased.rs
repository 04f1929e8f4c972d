// erased.rs - Type-erased column handle
//
// Archetypes keep columns of different element types in one map. The element
// type is never inspected at runtime: whoever reads a column already knows
// the type it was stored under and reinterprets the handle accordingly.

use std::any::{type_name, TypeId};

use super::column::{ComponentStore, StorageError};
use crate::ecs::Component;

/// Operations an archetype performs without knowing a column's element type.
///
/// Destroying the column is the trait object's `Drop`.
trait ColumnOps: Send + Sync {
    fn remove_at(&mut self, index: usize);
    fn len(&self) -> usize;
}

impl<T: Component> ColumnOps for ComponentStore<T> {
    fn remove_at(&mut self, index: usize) {
        self.remove(index);
    }

    fn len(&self) -> usize {
        ComponentStore::len(self)
    }
}

/// Owning, type-erased handle over exactly one [`ComponentStore`].
pub struct ErasedStore {
    column: Box<dyn ColumnOps>,
    type_id: TypeId,
    type_name: &'static str,
}

impl ErasedStore {
    /// Allocate an empty column for `T` with room for `capacity` rows.
    pub fn new<T: Component>(capacity: usize) -> Result<Self, StorageError> {
        Ok(Self {
            column: Box::new(ComponentStore::<T>::with_capacity(capacity)?),
            type_id: TypeId::of::<T>(),
            type_name: T::NAME,
        })
    }

    /// Type the column was created for.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Component name the column was created for.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.column.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swap-remove a row without naming the element type.
    #[inline]
    pub fn remove(&mut self, index: usize) {
        self.column.remove_at(index);
    }

    /// Recover the typed column.
    ///
    /// # Safety
    /// `T` must be the type this store was created with via
    /// [`ErasedStore::new`]. Any other `T` is undefined behavior.
    #[inline]
    pub unsafe fn reinterpret_as<T: Component>(&self) -> &ComponentStore<T> {
        debug_assert_eq!(
            self.type_id,
            TypeId::of::<T>(),
            "column for {} reinterpreted as {}",
            self.type_name,
            type_name::<T>()
        );
        // SAFETY: the boxed value is a `ComponentStore<T>` per the caller's
        // contract; dropping the vtable half of the fat pointer is sound.
        unsafe { &*(self.column.as_ref() as *const dyn ColumnOps as *const ComponentStore<T>) }
    }

    /// Recover the typed column mutably.
    ///
    /// # Safety
    /// Same contract as [`ErasedStore::reinterpret_as`].
    #[inline]
    pub unsafe fn reinterpret_as_mut<T: Component>(&mut self) -> &mut ComponentStore<T> {
        debug_assert_eq!(
            self.type_id,
            TypeId::of::<T>(),
            "column for {} reinterpreted as {}",
            self.type_name,
            type_name::<T>()
        );
        // SAFETY: see `reinterpret_as`.
        unsafe { &mut *(self.column.as_mut() as *mut dyn ColumnOps as *mut ComponentStore<T>) }
    }
}

impl std::fmt::Debug for ErasedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedStore")
            .field("type_name", &self.type_name)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_component;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Mass(f32);
    define_component!(Mass);

    struct Tracked(Arc<AtomicUsize>);
    define_component!(Tracked);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn reinterpret_reads_and_writes_typed_rows() {
        let mut store = ErasedStore::new::<Mass>(4).unwrap();
        unsafe {
            store.reinterpret_as_mut::<Mass>().add(Mass(1.5)).unwrap();
            store.reinterpret_as_mut::<Mass>().add(Mass(2.5)).unwrap();
        }
        assert_eq!(store.len(), 2);
        assert_eq!(store.type_id(), TypeId::of::<Mass>());
        assert_eq!(store.type_name(), "Mass");
        let typed = unsafe { store.reinterpret_as::<Mass>() };
        assert_eq!(typed.as_slice(), &[Mass(1.5), Mass(2.5)]);
    }

    #[test]
    fn erased_remove_swaps_without_type() {
        let mut store = ErasedStore::new::<Mass>(0).unwrap();
        for value in [1.0, 2.0, 3.0] {
            unsafe { store.reinterpret_as_mut::<Mass>() }.add(Mass(value)).unwrap();
        }
        store.remove(0);
        store.remove(10);
        let typed = unsafe { store.reinterpret_as::<Mass>() };
        assert_eq!(typed.as_slice(), &[Mass(3.0), Mass(2.0)]);
    }

    #[test]
    fn dropping_the_handle_destroys_every_row() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut store = ErasedStore::new::<Tracked>(2).unwrap();
        for _ in 0..3 {
            unsafe { store.reinterpret_as_mut::<Tracked>() }
                .add(Tracked(drops.clone()))
                .unwrap();
        }
        store.remove(1);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        drop(store);
        assert_eq!(drops.load(Ordering::SeqCst), 3);
    }
}
