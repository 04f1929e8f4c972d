//! Convenience macros for entity creation

/// Create an entity from a list of component values.
///
/// Expands to [`World::create`](crate::ecs::World::create) with the values
/// packed into a bundle, so the same rules apply: every value must be a
/// distinct component type and the call returns a `Result`.
///
/// # Examples
///
/// ```ignore
/// let at = create!(world, Position { x: 0, y: 0 })?;
///
/// let at = create!(world,
///     Position { x: 0, y: 0 },
///     Velocity { vx: 1, vy: 1 },
/// )?;
/// ```
#[macro_export]
macro_rules! create {
    ($world:expr, $($component:expr),+ $(,)?) => {
        $world.create(($($component,)+))
    };
}
