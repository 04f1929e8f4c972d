//! Component bundles for adding rows
//!
//! A bundle is a tuple of component values that becomes one archetype row.

use crate::ecs::{ArchetypeError, Component, ComponentInfo, RowWriter};

/// A group of components written to an archetype as one row.
///
/// Implemented for tuples of one to ten components. A single component is
/// written as a one-element tuple: `(Position { .. },)`.
pub trait Bundle: 'static {
    /// Descriptors of the members, in tuple order.
    fn infos() -> Vec<ComponentInfo>;

    /// Push every member into `row`, stopping at the first failure.
    fn write_row(self, row: &mut RowWriter<'_>) -> Result<(), ArchetypeError>;
}

macro_rules! impl_bundle {
    ($($name:ident),+) => {
        impl<$($name: Component),+> Bundle for ($($name,)+) {
            fn infos() -> Vec<ComponentInfo> {
                vec![$(ComponentInfo::of::<$name>()),+]
            }

            #[allow(non_snake_case)]
            fn write_row(self, row: &mut RowWriter<'_>) -> Result<(), ArchetypeError> {
                let ($($name,)+) = self;
                $(row.push($name)?;)+
                Ok(())
            }
        }
    };
}

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);
impl_bundle!(A, B, C, D, E, F, G, H, I);
impl_bundle!(A, B, C, D, E, F, G, H, I, J);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_component;

    struct Name;
    define_component!(Name);

    struct Score;
    define_component!(Score);

    #[test]
    fn infos_follow_tuple_order() {
        let names: Vec<&str> = <(Score, Name)>::infos().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["Score", "Name"]);
    }

    #[test]
    fn repeated_members_are_listed_twice() {
        assert_eq!(<(Score, Score)>::infos().len(), 2);
    }
}
