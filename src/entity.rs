//! Draggable entities: bounded lattice points the user can reposition.
//!
//! A stage owns an [`EntitySet`], an ordered name → [`DraggableEntity`]
//! mapping rebuilt from the stage's initial configuration each time the stage
//! is entered. Iteration order is insertion order; hit-testing and drag
//! dispatch rely on it to break ties deterministically.
//!
//! Repositioning is split in two: [`DraggableEntity::update_position`] is a
//! pure clamp-and-compare, and [`DraggableEntity::commit`] applies the result.
//! Callers commit (and redraw) only when the snapped position really changes.

#[cfg(test)]
#[path = "entity_test.rs"]
mod entity_test;

use crate::camera::ScreenOffset;
use crate::error::LessonError;
use crate::geom::{GridPoint, clamp};

/// Inclusive axis-aligned rectangle on the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_i: i32,
    pub max_i: i32,
    pub min_j: i32,
    pub max_j: i32,
}

impl Bounds {
    #[must_use]
    pub const fn new(min_i: i32, max_i: i32, min_j: i32, max_j: i32) -> Self {
        Self { min_i, max_i, min_j, max_j }
    }

    /// Whether `min <= max` on both axes.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.min_i <= self.max_i && self.min_j <= self.max_j
    }

    #[must_use]
    pub fn contains(&self, p: GridPoint) -> bool {
        (self.min_i..=self.max_i).contains(&p.i) && (self.min_j..=self.max_j).contains(&p.j)
    }

    /// Nearest point inside the bounds, component-wise.
    #[must_use]
    pub fn clamp(&self, p: GridPoint) -> GridPoint {
        GridPoint {
            i: clamp(p.i, self.min_i, self.max_i),
            j: clamp(p.j, self.min_j, self.max_j),
        }
    }
}

/// One user-movable point in a lesson stage.
///
/// `position` always lies inside `bounds`. `drag_offset` is present exactly
/// while this entity is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct DraggableEntity {
    bounds: Bounds,
    position: GridPoint,
    drag_offset: Option<ScreenOffset>,
}

impl DraggableEntity {
    /// Create an idle entity at `position`.
    ///
    /// `bounds` must be well-formed and contain `position`; see [`Self::validate`].
    #[must_use]
    pub fn new(position: GridPoint, bounds: Bounds) -> Self {
        debug_assert!(bounds.is_well_formed(), "inverted entity bounds {bounds:?}");
        debug_assert!(bounds.contains(position), "entity at {position:?} outside {bounds:?}");
        Self { bounds, position, drag_offset: None }
    }

    /// Validating constructor for configuration paths.
    ///
    /// # Errors
    ///
    /// [`LessonError::InvalidBounds`] or [`LessonError::PositionOutOfBounds`].
    pub fn try_new(name: &'static str, position: GridPoint, bounds: Bounds) -> Result<Self, LessonError> {
        let entity = Self { bounds, position, drag_offset: None };
        entity.validate(name)?;
        Ok(entity)
    }

    /// Runtime check of the constructor's preconditions.
    ///
    /// # Errors
    ///
    /// [`LessonError::InvalidBounds`] or [`LessonError::PositionOutOfBounds`].
    pub fn validate(&self, name: &'static str) -> Result<(), LessonError> {
        if !self.bounds.is_well_formed() {
            return Err(LessonError::InvalidBounds { name });
        }
        if !self.bounds.contains(self.position) {
            return Err(LessonError::PositionOutOfBounds { name, position: self.position });
        }
        Ok(())
    }

    #[must_use]
    pub fn position(&self) -> GridPoint {
        self.position
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn drag_offset(&self) -> Option<ScreenOffset> {
        self.drag_offset
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// Record the sub-cell grab offset for a drag starting now.
    pub fn begin_drag(&mut self, offset: ScreenOffset) {
        self.drag_offset = Some(offset);
    }

    pub fn end_drag(&mut self) {
        self.drag_offset = None;
    }

    /// Clamp `candidate` into bounds and report whether it differs from the
    /// current position. Does not mutate.
    #[must_use]
    pub fn update_position(&self, candidate: GridPoint) -> (GridPoint, bool) {
        let next = self.bounds.clamp(candidate);
        (next, next != self.position)
    }

    /// Move to `position`, which must come from [`Self::update_position`].
    pub fn commit(&mut self, position: GridPoint) {
        debug_assert!(self.bounds.contains(position), "commit outside bounds: {position:?}");
        self.position = self.bounds.clamp(position);
    }
}

/// Ordered name → entity mapping for one stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySet {
    entries: Vec<(&'static str, DraggableEntity)>,
}

impl EntitySet {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, name: &'static str, entity: DraggableEntity) -> Self {
        self.insert(name, entity);
        self
    }

    /// Insert an entity. An existing entry with the same name is replaced in place,
    /// keeping its iteration slot; returns the replaced entity.
    pub fn insert(&mut self, name: &'static str, entity: DraggableEntity) -> Option<DraggableEntity> {
        if let Some(slot) = self.get_mut(name) {
            return Some(std::mem::replace(slot, entity));
        }
        self.entries.push((name, entity));
        None
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DraggableEntity> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, e)| e)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut DraggableEntity> {
        self.entries.iter_mut().find(|(n, _)| *n == name).map(|(_, e)| e)
    }

    /// Current position of the named entity.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<GridPoint> {
        self.get(name).map(DraggableEntity::position)
    }

    /// Entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DraggableEntity)> {
        self.entries.iter().map(|(n, e)| (*n, e))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start dragging `name`, clearing any other entity's offset so at most
    /// one drag is live. Returns false if no such entity exists.
    pub fn begin_drag(&mut self, name: &str, offset: ScreenOffset) -> bool {
        if self.get(name).is_none() {
            return false;
        }
        for (n, e) in &mut self.entries {
            if *n == name {
                e.begin_drag(offset);
            } else {
                e.end_drag();
            }
        }
        true
    }

    /// The entity currently being dragged and its grab offset.
    #[must_use]
    pub fn drag_target(&self) -> Option<(&'static str, ScreenOffset)> {
        self.entries
            .iter()
            .find_map(|(n, e)| e.drag_offset().map(|off| (*n, off)))
    }

    /// Clear every entity's drag offset. Returns true if any drag was live.
    pub fn end_drag_all(&mut self) -> bool {
        let mut was_dragging = false;
        for (_, e) in &mut self.entries {
            was_dragging |= e.is_dragging();
            e.end_drag();
        }
        was_dragging
    }

    /// Validate every entity in insertion order.
    ///
    /// # Errors
    ///
    /// The first [`LessonError`] found.
    pub fn validate(&self) -> Result<(), LessonError> {
        self.entries.iter().try_for_each(|(name, entity)| entity.validate(*name))
    }
}

impl FromIterator<(&'static str, DraggableEntity)> for EntitySet {
    fn from_iter<I: IntoIterator<Item = (&'static str, DraggableEntity)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, entity) in iter {
            set.insert(name, entity);
        }
        set
    }
}
