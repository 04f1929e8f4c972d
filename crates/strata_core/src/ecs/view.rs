// view.rs - Typed row iteration over one archetype
//
// A shape is a tuple of `Read<T>` and `Write<T>` markers. Reads hand out
// copies, writes hand out `&mut T` straight into the column. The iterator
// holds the archetype mutably for its whole lifetime, so no row can be added
// or removed while it is alive.

use std::any::TypeId;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::ecs::{Archetype, ArchetypeError, Component};

/// Field marker: yield a copy of `T`.
pub struct Read<T>(PhantomData<fn() -> T>);

/// Field marker: yield `&mut T` into storage.
pub struct Write<T>(PhantomData<fn() -> T>);

mod sealed {
    pub trait Sealed {}
}

/// Type and name of one field requested by a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldAccess {
    pub type_id: TypeId,
    pub name: &'static str,
}

/// One field of a shape. Sealed: only [`Read`] and [`Write`] implement it.
pub trait ViewField: sealed::Sealed + 'static {
    /// Per-archetype state, a raw column pointer.
    type Fetch: Copy;
    type Item<'a>;

    fn access() -> FieldAccess;

    fn fetch(archetype: &mut Archetype) -> Option<Self::Fetch>;

    /// # Safety
    /// `row` is below the archetype's length and no other live item refers to
    /// the same cell.
    unsafe fn item<'a>(fetch: Self::Fetch, row: usize) -> Self::Item<'a>;
}

impl<T: Component + Copy> sealed::Sealed for Read<T> {}

impl<T: Component + Copy> ViewField for Read<T> {
    type Fetch = *const T;
    type Item<'a> = T;

    fn access() -> FieldAccess {
        FieldAccess {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
        }
    }

    fn fetch(archetype: &mut Archetype) -> Option<*const T> {
        archetype.column_ptr::<T>().map(|ptr| ptr as *const T)
    }

    #[inline]
    unsafe fn item<'a>(fetch: *const T, row: usize) -> Self::Item<'a> {
        unsafe { *fetch.add(row) }
    }
}

impl<T: Component> sealed::Sealed for Write<T> {}

impl<T: Component> ViewField for Write<T> {
    type Fetch = *mut T;
    type Item<'a> = &'a mut T;

    fn access() -> FieldAccess {
        FieldAccess {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
        }
    }

    fn fetch(archetype: &mut Archetype) -> Option<*mut T> {
        archetype.column_ptr::<T>()
    }

    #[inline]
    unsafe fn item<'a>(fetch: *mut T, row: usize) -> &'a mut T {
        unsafe { &mut *fetch.add(row) }
    }
}

/// A tuple of one to eight [`ViewField`]s.
pub trait ViewShape: sealed::Sealed + 'static {
    type Fetch: Copy;
    type Item<'a>;

    /// Requested fields, in tuple order.
    fn fields() -> Vec<FieldAccess>;

    fn fetch(archetype: &mut Archetype) -> Option<Self::Fetch>;

    /// # Safety
    /// Same contract as [`ViewField::item`], for every field.
    unsafe fn item<'a>(fetch: Self::Fetch, row: usize) -> Self::Item<'a>;
}

macro_rules! impl_view_shape {
    ($($name:ident),+) => {
        impl<$($name: ViewField),+> sealed::Sealed for ($($name,)+) {}

        impl<$($name: ViewField),+> ViewShape for ($($name,)+) {
            type Fetch = ($($name::Fetch,)+);
            type Item<'a> = ($($name::Item<'a>,)+);

            fn fields() -> Vec<FieldAccess> {
                vec![$($name::access()),+]
            }

            fn fetch(archetype: &mut Archetype) -> Option<Self::Fetch> {
                Some(($($name::fetch(archetype)?,)+))
            }

            #[allow(non_snake_case)]
            #[inline]
            unsafe fn item<'a>(fetch: Self::Fetch, row: usize) -> Self::Item<'a> {
                let ($($name,)+) = fetch;
                unsafe { ($(<$name as ViewField>::item($name, row),)+) }
            }
        }
    };
}

impl_view_shape!(A);
impl_view_shape!(A, B);
impl_view_shape!(A, B, C);
impl_view_shape!(A, B, C, D);
impl_view_shape!(A, B, C, D, E);
impl_view_shape!(A, B, C, D, E, F);
impl_view_shape!(A, B, C, D, E, F, G);
impl_view_shape!(A, B, C, D, E, F, G, H);

/// Reject shapes that name one component type twice.
pub(crate) fn check_aliasing(fields: &[FieldAccess]) -> Result<(), ArchetypeError> {
    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|seen| seen.type_id == field.type_id) {
            return Err(ArchetypeError::AliasedField { name: field.name });
        }
    }
    Ok(())
}

/// Check every field of `Q` against `archetype` before any iteration.
pub(crate) fn validate<Q: ViewShape>(archetype: &Archetype) -> Result<(), ArchetypeError> {
    let fields = Q::fields();
    if let Some(missing) = fields.iter().find(|f| !archetype.contains_type(f.type_id)) {
        return Err(ArchetypeError::FieldNotFound { name: missing.name });
    }
    check_aliasing(&fields)
}

/// Iterator over the rows of one archetype, in row order.
pub struct ViewIter<'a, Q: ViewShape> {
    fetch: Option<Q::Fetch>,
    row: usize,
    len: usize,
    _archetype: PhantomData<&'a mut Archetype>,
}

impl<'a, Q: ViewShape> ViewIter<'a, Q> {
    /// Callers validate `Q` against `archetype` first. A shape whose fields
    /// are not all present yields nothing.
    pub(crate) fn new(archetype: &'a mut Archetype) -> Self {
        let len = archetype.len();
        Self {
            fetch: Q::fetch(archetype),
            row: 0,
            len,
            _archetype: PhantomData,
        }
    }
}

impl<'a, Q: ViewShape> Iterator for ViewIter<'a, Q> {
    type Item = Q::Item<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let fetch = self.fetch?;
        if self.row >= self.len {
            return None;
        }
        let row = self.row;
        self.row += 1;
        // SAFETY: `row < len`, the archetype is borrowed for `'a`, each row
        // is visited once and `validate` ruled out repeated types.
        Some(unsafe { Q::item(fetch, row) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.fetch {
            Some(_) => self.len - self.row,
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl<Q: ViewShape> ExactSizeIterator for ViewIter<'_, Q> {}
impl<Q: ViewShape> FusedIterator for ViewIter<'_, Q> {}
