//! Strata Core
//!
//! Archetype-based entity storage:
//! - Component registry with bitmask archetype keys
//! - Type-erased columnar storage, one column per component type
//! - Typed views over a single archetype and queries across archetypes

pub mod config;
pub mod ecs;

pub use config::{ConfigError, WorldConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
