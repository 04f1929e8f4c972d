// archetype.rs - Archetype identification
//
// An archetype is a unique set of component types. Bit `i` of the key is set
// exactly when the component with id `i` belongs to the set, so equal sets
// always produce equal keys regardless of the order they were named in.

use std::fmt;
use std::iter::FusedIterator;

use crate::ecs::{ComponentId, MAX_COMPONENTS};

/// 128-bit component mask identifying an archetype.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchetypeKey(u128);

impl ArchetypeKey {
    /// The key of the empty component set.
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub const fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u128 {
        self.0
    }

    /// This key with `id` added.
    #[inline]
    #[must_use]
    pub const fn with(self, id: ComponentId) -> Self {
        Self(self.0 | 1u128 << id.index())
    }

    #[inline]
    pub const fn contains(self, id: ComponentId) -> bool {
        self.0 & (1u128 << id.index()) != 0
    }

    /// True if every component of `other` is also in `self`.
    #[inline]
    pub const fn contains_all(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Number of component types in the set.
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Component ids in the set, ascending.
    #[inline]
    pub fn ids(self) -> KeyIds {
        KeyIds { remaining: self.0 }
    }
}

impl FromIterator<ComponentId> for ArchetypeKey {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Display for ArchetypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#034x}", self.0)
    }
}

/// Iterator over the ids set in an [`ArchetypeKey`].
#[derive(Clone, Debug)]
pub struct KeyIds {
    remaining: u128,
}

impl Iterator for KeyIds {
    type Item = ComponentId;

    #[inline]
    fn next(&mut self) -> Option<ComponentId> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.remaining.trailing_zeros() as usize;
        self.remaining &= self.remaining - 1;
        debug_assert!(index < MAX_COMPONENTS);
        Some(ComponentId::from_index(index))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for KeyIds {}
impl FusedIterator for KeyIds {}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: usize) -> ComponentId {
        ComponentId::from_index(index)
    }

    #[test]
    fn with_is_commutative() {
        let a = ArchetypeKey::EMPTY.with(id(3)).with(id(70));
        let b = ArchetypeKey::EMPTY.with(id(70)).with(id(3));
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn highest_id_uses_top_bit() {
        let key = ArchetypeKey::EMPTY.with(id(127));
        assert_eq!(key.bits(), 1u128 << 127);
        assert!(key.contains(id(127)));
        assert!(!key.contains(id(0)));
    }

    #[test]
    fn subset_checks() {
        let full: ArchetypeKey = [id(0), id(1), id(5)].into_iter().collect();
        let part: ArchetypeKey = [id(5), id(0)].into_iter().collect();
        assert!(full.contains_all(part));
        assert!(!part.contains_all(full));
        assert!(full.contains_all(ArchetypeKey::EMPTY));
    }

    #[test]
    fn ids_iterate_ascending() {
        let key = ArchetypeKey::from_bits(0b1010_0001 | 1u128 << 100);
        let ids: Vec<usize> = key.ids().map(ComponentId::index).collect();
        assert_eq!(ids, vec![0, 5, 7, 100]);
        assert_eq!(key.ids().len(), 4);
    }

    #[test]
    fn empty_key() {
        assert!(ArchetypeKey::EMPTY.is_empty());
        assert_eq!(ArchetypeKey::EMPTY.ids().next(), None);
        assert_eq!(
            ArchetypeKey::EMPTY.to_string(),
            "0x00000000000000000000000000000000"
        );
    }
}
