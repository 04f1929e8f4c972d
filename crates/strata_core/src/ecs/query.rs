// query.rs - Iteration across every archetype that matches a shape

use std::iter::FusedIterator;
use std::slice;

use crate::ecs::{Archetype, ArchetypeKey, ViewIter, ViewShape};

/// Chains the views of all archetypes whose key covers the shape's
/// components, in archetype creation order.
pub struct QueryIter<'a, Q: ViewShape> {
    archetypes: slice::IterMut<'a, Archetype>,
    required: Option<ArchetypeKey>,
    current: Option<ViewIter<'a, Q>>,
}

impl<'a, Q: ViewShape> QueryIter<'a, Q> {
    /// `required == None` means some component of the shape was never
    /// registered, so nothing can match.
    pub(crate) fn new(archetypes: &'a mut [Archetype], required: Option<ArchetypeKey>) -> Self {
        Self {
            archetypes: archetypes.iter_mut(),
            required,
            current: None,
        }
    }
}

impl<'a, Q: ViewShape> Iterator for QueryIter<'a, Q> {
    type Item = Q::Item<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let required = self.required?;
        loop {
            if let Some(item) = self.current.as_mut().and_then(Iterator::next) {
                return Some(item);
            }
            let archetype = self
                .archetypes
                .find(|archetype| archetype.key().contains_all(required))?;
            self.current = Some(ViewIter::new(archetype));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let current = self.current.as_ref().map_or(0, ExactSizeIterator::len);
        if self.required.is_none() {
            return (0, Some(0));
        }
        (current, None)
    }
}

impl<Q: ViewShape> FusedIterator for QueryIter<'_, Q> {}
