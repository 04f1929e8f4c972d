//! Entity locators
//!
//! An entity has no identity of its own here: it is a row in an archetype.

use crate::ecs::ArchetypeKey;

/// Where a created entity was stored: an archetype and a row inside it.
///
/// Locators are not stable. Removing a row with
/// [`Archetype::swap_remove`](crate::ecs::Archetype::swap_remove) moves the
/// last row of that archetype, and a locator pointing at it goes stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct EntityLocator {
    archetype: ArchetypeKey,
    row: usize,
}

impl EntityLocator {
    pub const fn new(archetype: ArchetypeKey, row: usize) -> Self {
        Self { archetype, row }
    }

    pub fn archetype(&self) -> ArchetypeKey {
        self.archetype
    }

    pub fn row(&self) -> usize {
        self.row
    }
}
