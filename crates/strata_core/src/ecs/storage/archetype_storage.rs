// archetype_storage.rs - Column storage for one archetype
//
// Every column holds exactly `len` rows between calls. Row `i` of the
// archetype is row `i` of every column.

use std::any::TypeId;
use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use super::{ComponentStore, ErasedStore, StorageError};
use crate::ecs::view::{self, ViewIter, ViewShape};
use crate::ecs::{ArchetypeKey, Bundle, Component, ComponentInfo};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArchetypeError {
    #[error("component {name} is not part of this archetype")]
    UnrecognizedField { name: &'static str },
    #[error("row supplied {supplied} of {expected} components")]
    MissingFields { expected: usize, supplied: usize },
    #[error("component {name} was supplied more than once")]
    DuplicateField { name: &'static str },
    #[error("component {name} is not stored in this archetype")]
    FieldNotFound { name: &'static str },
    #[error("component {name} appears more than once in a view")]
    AliasedField { name: &'static str },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Storage for all rows of a single archetype.
pub struct Archetype {
    key: ArchetypeKey,
    columns: HashMap<TypeId, ErasedStore>,
    len: usize,
}

impl Archetype {
    /// Create an empty archetype with one column per distinct type in `infos`.
    pub fn new(
        key: ArchetypeKey,
        infos: &[ComponentInfo],
        capacity: usize,
    ) -> Result<Self, StorageError> {
        let mut columns = HashMap::with_capacity(infos.len());
        for info in infos {
            if !columns.contains_key(&info.type_id()) {
                columns.insert(info.type_id(), info.new_column(capacity)?);
            }
        }
        Ok(Self {
            key,
            columns,
            len: 0,
        })
    }

    /// Append one row built from `bundle`, returning its index.
    ///
    /// The bundle must supply every column exactly once. On any failure the
    /// columns written so far are truncated back and `len` is unchanged.
    pub fn add<B: Bundle>(&mut self, bundle: B) -> Result<usize, ArchetypeError> {
        let row = self.len;
        let expected = self.columns.len();
        let mut writer = RowWriter {
            columns: &mut self.columns,
            row,
            touched: Vec::with_capacity(expected),
        };

        bundle.write_row(&mut writer)?;
        if writer.touched.len() != expected {
            return Err(ArchetypeError::MissingFields {
                expected,
                supplied: writer.touched.len(),
            });
        }
        writer.commit();

        self.len += 1;
        Ok(row)
    }

    /// Remove `row`, moving the last row into its place.
    ///
    /// Returns the former index of the row now stored at `row` (equal to
    /// `row` when the last row itself was removed), or `None` if `row` is out
    /// of range.
    pub fn swap_remove(&mut self, row: usize) -> Option<usize> {
        if row >= self.len {
            return None;
        }
        for column in self.columns.values_mut() {
            column.remove(row);
        }
        self.len -= 1;
        Some(self.len)
    }

    #[inline]
    pub fn contains<T: Component>(&self) -> bool {
        self.contains_type(TypeId::of::<T>())
    }

    #[inline]
    pub fn contains_type(&self, type_id: TypeId) -> bool {
        self.columns.contains_key(&type_id)
    }

    /// Typed column for `T`, if stored here.
    pub fn column<T: Component>(&self) -> Option<&ComponentStore<T>> {
        let column = self.columns.get(&TypeId::of::<T>())?;
        // SAFETY: columns are keyed by the TypeId of their element type.
        Some(unsafe { column.reinterpret_as::<T>() })
    }

    /// Mutable typed column for `T`.
    ///
    /// Rows can be edited in place but not added or removed, so the column
    /// lengths stay in step.
    pub fn column_mut<T: Component>(&mut self) -> Option<&mut [T]> {
        let column = self.columns.get_mut(&TypeId::of::<T>())?;
        // SAFETY: see `column`.
        Some(unsafe { column.reinterpret_as_mut::<T>() }.as_mut_slice())
    }

    pub fn get<T: Component>(&self, row: usize) -> Option<&T> {
        self.column::<T>()?.get(row)
    }

    pub fn get_mut<T: Component>(&mut self, row: usize) -> Option<&mut T> {
        self.column_mut::<T>()?.get_mut(row)
    }

    /// Row count of the column stored under `type_id`.
    pub fn column_len(&self, type_id: TypeId) -> Option<usize> {
        self.columns.get(&type_id).map(ErasedStore::len)
    }

    /// Types of the stored columns, in no particular order.
    pub fn component_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.columns.keys().copied()
    }

    #[inline]
    pub fn key(&self) -> ArchetypeKey {
        self.key
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of component types per row.
    #[inline]
    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterate every row through the shape `Q`.
    ///
    /// All fields are checked before the iterator is built; a missing type
    /// fails with `FieldNotFound` and a repeated one with `AliasedField`.
    pub fn view<Q: ViewShape>(&mut self) -> Result<ViewIter<'_, Q>, ArchetypeError> {
        view::validate::<Q>(self)?;
        Ok(ViewIter::new(self))
    }

    /// Raw base pointer of the column for `T`.
    pub(crate) fn column_ptr<T: Component>(&mut self) -> Option<*mut T> {
        let column = self.columns.get_mut(&TypeId::of::<T>())?;
        // SAFETY: see `column`.
        Some(unsafe { column.reinterpret_as_mut::<T>() }.as_mut_slice().as_mut_ptr())
    }
}

impl std::fmt::Debug for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archetype")
            .field("key", &self.key)
            .field("len", &self.len)
            .field("columns", &self.columns.values().collect::<Vec<_>>())
            .finish()
    }
}

/// Scoped writer for one pending row.
///
/// Each successful [`push`](Self::push) is recorded. Unless the row is
/// committed, dropping the writer removes every recorded value again, so an
/// early return or an unwind leaves the columns as they were.
pub struct RowWriter<'a> {
    columns: &'a mut HashMap<TypeId, ErasedStore>,
    row: usize,
    touched: Vec<TypeId>,
}

impl RowWriter<'_> {
    /// Append `value` to its column at the pending row.
    pub fn push<T: Component>(&mut self, value: T) -> Result<(), ArchetypeError> {
        let type_id = TypeId::of::<T>();
        let column = self
            .columns
            .get_mut(&type_id)
            .ok_or(ArchetypeError::UnrecognizedField { name: T::NAME })?;
        if column.len() != self.row {
            return Err(ArchetypeError::DuplicateField { name: T::NAME });
        }
        // SAFETY: the column was looked up by `T`'s TypeId.
        unsafe { column.reinterpret_as_mut::<T>() }.add(value)?;
        self.touched.push(type_id);
        Ok(())
    }

    fn commit(mut self) {
        self.touched.clear();
    }
}

impl Drop for RowWriter<'_> {
    fn drop(&mut self) {
        if self.touched.is_empty() {
            return;
        }
        debug!(
            row = self.row,
            touched = self.touched.len(),
            "rolling back partial row"
        );
        for type_id in &self.touched {
            if let Some(column) = self.columns.get_mut(type_id) {
                column.remove(self.row);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_component;
    use crate::ecs::{ComponentRegistry, Read, Write};

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Position {
        x: i32,
        y: i32,
    }
    define_component!(Position);

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Velocity {
        vx: i32,
        vy: i32,
    }
    define_component!(Velocity);

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Tag;
    define_component!(Tag);

    fn moving() -> Archetype {
        let mut registry = ComponentRegistry::new();
        let key = registry.resolve_or_register::<(Position, Velocity)>().unwrap();
        let infos = [ComponentInfo::of::<Position>(), ComponentInfo::of::<Velocity>()];
        Archetype::new(key, &infos, 4).unwrap()
    }

    fn row(i: i32) -> (Position, Velocity) {
        (Position { x: i, y: i + 1 }, Velocity { vx: -i, vy: -i - 1 })
    }

    fn assert_columns_in_step(archetype: &Archetype) {
        for type_id in archetype.component_types() {
            assert_eq!(archetype.column_len(type_id), Some(archetype.len()));
        }
    }

    #[test]
    fn new_builds_one_column_per_distinct_type() {
        let infos = [
            ComponentInfo::of::<Position>(),
            ComponentInfo::of::<Position>(),
            ComponentInfo::of::<Tag>(),
        ];
        let archetype = Archetype::new(ArchetypeKey::EMPTY, &infos, 0).unwrap();
        assert_eq!(archetype.field_count(), 2);
        assert!(archetype.is_empty());
    }

    #[test]
    fn add_accepts_any_member_order() {
        let mut archetype = moving();
        assert_eq!(archetype.add(row(1)).unwrap(), 0);
        let (p, v) = row(2);
        assert_eq!(archetype.add((v, p)).unwrap(), 1);
        assert_eq!(archetype.len(), 2);
        assert_eq!(archetype.get::<Position>(1), Some(&Position { x: 2, y: 3 }));
        assert_columns_in_step(&archetype);
    }

    #[test]
    fn missing_field_rolls_back() {
        let mut archetype = moving();
        archetype.add(row(1)).unwrap();
        let err = archetype.add((Position { x: 0, y: 0 },)).unwrap_err();
        assert_eq!(err, ArchetypeError::MissingFields { expected: 2, supplied: 1 });
        assert_eq!(archetype.len(), 1);
        assert_columns_in_step(&archetype);
    }

    #[test]
    fn unrecognized_field_rolls_back() {
        let mut archetype = moving();
        let (p, v) = row(1);
        let err = archetype.add((p, Tag, v)).unwrap_err();
        assert_eq!(err, ArchetypeError::UnrecognizedField { name: "Tag" });
        assert!(archetype.is_empty());
        assert_columns_in_step(&archetype);
    }

    #[test]
    fn duplicate_field_rolls_back() {
        let mut archetype = moving();
        let (p, v) = row(1);
        let err = archetype.add((p, p, v)).unwrap_err();
        assert_eq!(err, ArchetypeError::DuplicateField { name: "Position" });
        assert!(archetype.is_empty());
        assert_columns_in_step(&archetype);
    }

    #[test]
    fn swap_remove_reports_moved_row() {
        let mut archetype = moving();
        for i in 0..4 {
            archetype.add(row(i * 10)).unwrap();
        }
        assert_eq!(archetype.swap_remove(1), Some(3));
        assert_eq!(archetype.get::<Position>(1), Some(&Position { x: 30, y: 31 }));
        assert_eq!(archetype.get::<Velocity>(1), Some(&Velocity { vx: -30, vy: -31 }));
        assert_eq!(archetype.swap_remove(2), Some(2));
        assert_eq!(archetype.swap_remove(2), None);
        assert_eq!(archetype.len(), 2);
        assert_columns_in_step(&archetype);
    }

    #[test]
    fn column_mut_edits_in_place() {
        let mut archetype = moving();
        archetype.add(row(1)).unwrap();
        archetype.add(row(2)).unwrap();
        for velocity in archetype.column_mut::<Velocity>().unwrap() {
            velocity.vx *= 2;
        }
        assert_eq!(archetype.get::<Velocity>(1).map(|v| v.vx), Some(-4));
        assert!(archetype.column::<Tag>().is_none());
    }

    #[test]
    fn view_rejects_missing_and_aliased_fields() {
        let mut archetype = moving();
        archetype.add(row(1)).unwrap();
        assert_eq!(
            archetype.view::<(Read<Position>, Read<Tag>)>().err(),
            Some(ArchetypeError::FieldNotFound { name: "Tag" })
        );
        assert_eq!(
            archetype.view::<(Write<Position>, Read<Position>)>().err(),
            Some(ArchetypeError::AliasedField { name: "Position" })
        );
    }

    #[test]
    fn view_writes_are_visible_afterwards() {
        let mut archetype = moving();
        archetype.add(row(1)).unwrap();
        for (p, v) in archetype.view::<(Write<Position>, Read<Velocity>)>().unwrap() {
            p.x += v.vx;
            p.y += v.vy;
        }
        assert_eq!(archetype.get::<Position>(0), Some(&Position { x: 0, y: 0 }));
    }
}
