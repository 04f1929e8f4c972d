use thiserror::Error;

/// Errors raised while growing a column.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("out of memory while reserving {requested} more rows")]
    OutOfMemory { requested: usize },
}

/// Densely packed, growable column holding a single component type.
///
/// Rows are addressed by a dense index in `0..len()`. Removing a row moves
/// the last row into the vacated slot, so row order carries no meaning.
/// Growth goes through `try_reserve` and reports allocation failure as
/// [`StorageError::OutOfMemory`] instead of aborting.
pub struct ComponentStore<T> {
    rows: Vec<T>,
}

impl<T> ComponentStore<T> {
    /// Create an empty column without allocating.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Create an empty column with room for `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Result<Self, StorageError> {
        let mut rows = Vec::new();
        rows.try_reserve_exact(capacity)
            .map_err(|_| StorageError::OutOfMemory { requested: capacity })?;
        Ok(Self { rows })
    }

    /// Append a row.
    ///
    /// On failure the column is left exactly as it was.
    pub fn add(&mut self, item: T) -> Result<(), StorageError> {
        self.rows
            .try_reserve(1)
            .map_err(|_| StorageError::OutOfMemory { requested: 1 })?;
        self.rows.push(item);
        Ok(())
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.rows.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.rows.get_mut(index)
    }

    /// Swap-remove the row at `index`, returning it.
    ///
    /// The last row takes the vacated slot. Removing the last row is a plain
    /// truncation and an out-of-range index is ignored.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.rows.len() {
            Some(self.rows.swap_remove(index))
        } else {
            None
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that fit before the next reallocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.rows.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.rows
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.rows
    }
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(values: &[u32]) -> ComponentStore<u32> {
        let mut store = ComponentStore::new();
        for &value in values {
            store.add(value).unwrap();
        }
        store
    }

    #[test]
    fn add_appends_and_get_reads_back() {
        let store = store_of(&[10, 11, 12]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(0), Some(&10));
        assert_eq!(store.get(2), Some(&12));
    }

    #[test]
    fn get_past_the_end_is_none() {
        let store = store_of(&[1]);
        assert_eq!(store.get(1), None);
        assert_eq!(store.get(usize::MAX), None);
    }

    #[test]
    fn remove_moves_last_row_into_slot() {
        let mut store = store_of(&[1, 2, 3, 4]);
        assert_eq!(store.remove(1), Some(2));
        assert_eq!(store.as_slice(), &[1, 4, 3]);
    }

    #[test]
    fn remove_last_row_truncates() {
        let mut store = store_of(&[1, 2, 3]);
        assert_eq!(store.remove(2), Some(3));
        assert_eq!(store.as_slice(), &[1, 2]);
    }

    #[test]
    fn remove_only_row_empties_store() {
        let mut store = store_of(&[9]);
        store.remove(0);
        assert!(store.is_empty());
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut store = store_of(&[1, 2]);
        assert_eq!(store.remove(2), None);
        assert_eq!(store.as_slice(), &[1, 2]);
    }

    #[test]
    fn with_capacity_reserves_without_rows() {
        let store = ComponentStore::<u64>::with_capacity(32).unwrap();
        assert!(store.is_empty());
        assert!(store.capacity() >= 32);
    }

    #[test]
    fn oversized_reservation_reports_out_of_memory() {
        assert!(matches!(
            ComponentStore::<u64>::with_capacity(usize::MAX),
            Err(StorageError::OutOfMemory {
                requested: usize::MAX
            })
        ));
    }

    #[test]
    fn get_mut_writes_in_place() {
        let mut store = store_of(&[5, 6]);
        *store.get_mut(1).unwrap() = 60;
        assert_eq!(store.as_slice(), &[5, 60]);
    }
}
