#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::entity::EntitySet;
use crate::geom::GridPoint;

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Name of the entity under the pointer.
    pub name: &'static str,
    /// Lattice point that was hit; equal to the entity's position.
    pub at: GridPoint,
}

/// Find the entity sitting exactly on `at`.
///
/// Matching is integer equality against the snapped pointer position, not a
/// proximity test. If several entities share the point, the first in
/// insertion order wins.
#[must_use]
pub fn hit_test(entities: &EntitySet, at: GridPoint) -> Option<Hit> {
    entities
        .iter()
        .find(|(_, e)| e.position() == at)
        .map(|(name, _)| Hit { name, at })
}
