//! Pointer events and the drag controller.
//!
//! The controller is a small state machine over one stage's [`EntitySet`].
//! Its only state is which entity (if any) carries a drag offset:
//!
//! - **down** snaps the pointer to the lattice, hit-tests, and records the
//!   sub-cell grab offset on the hit entity;
//! - **move** re-snaps `pointer − offset`, clamps into the entity's bounds and,
//!   only when the lattice position changes, commits it and calls `redraw`;
//! - **up** clears every offset in the set.
//!
//! Events are handled synchronously, one at a time. Pointer motion that stays
//! within the current cell never reaches the redraw callback.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::{Camera, Point};
use crate::entity::EntitySet;
use crate::geom::GridPoint;
use crate::hit::hit_test;

/// A raw pointer event in surface-relative screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed over the drawing surface.
    Down(Point),
    /// Pointer moved; delivered whether or not it is over the surface.
    Move(Point),
    /// Button released anywhere.
    Up,
}

/// What an event did to the entity set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Nothing changed.
    Ignored,
    /// A drag started on the named entity.
    Grabbed(&'static str),
    /// The dragged entity stayed on its current lattice point.
    Held(&'static str),
    /// The dragged entity moved and the stage was redrawn.
    Moved { name: &'static str, to: GridPoint },
    /// A live drag ended.
    Released,
}

/// Dispatch one pointer event.
///
/// # Errors
///
/// Propagates the error returned by `redraw`.
pub fn handle<E>(
    entities: &mut EntitySet,
    camera: &Camera,
    event: PointerEvent,
    redraw: impl FnOnce(&EntitySet) -> Result<(), E>,
) -> Result<InputOutcome, E> {
    match event {
        PointerEvent::Down(pt) => Ok(pointer_down(entities, camera, pt)),
        PointerEvent::Move(pt) => pointer_move(entities, camera, pt, redraw),
        PointerEvent::Up => Ok(pointer_up(entities)),
    }
}

/// Start dragging the entity under `screen`, if any.
pub fn pointer_down(entities: &mut EntitySet, camera: &Camera, screen: Point) -> InputOutcome {
    let at = camera.screen_to_grid(screen);
    let Some(hit) = hit_test(entities, at) else {
        return InputOutcome::Ignored;
    };
    let grab_offset = screen - camera.grid_to_screen(at.into());
    if !entities.begin_drag(hit.name, grab_offset) {
        return InputOutcome::Ignored;
    }
    log::debug!("grabbed {} at ({}, {})", hit.name, at.i, at.j);
    InputOutcome::Grabbed(hit.name)
}

/// Move the dragged entity toward `screen`, redrawing only on a lattice change.
///
/// # Errors
///
/// Propagates the error returned by `redraw`.
pub fn pointer_move<E>(
    entities: &mut EntitySet,
    camera: &Camera,
    screen: Point,
    redraw: impl FnOnce(&EntitySet) -> Result<(), E>,
) -> Result<InputOutcome, E> {
    let Some((name, grab_offset)) = entities.drag_target() else {
        return Ok(InputOutcome::Ignored);
    };
    // Global grid clamp first, entity bounds second.
    let candidate = camera.screen_to_grid(screen - grab_offset);
    let Some(entity) = entities.get_mut(name) else {
        return Ok(InputOutcome::Ignored);
    };
    let (next, changed) = entity.update_position(candidate);
    if !changed {
        return Ok(InputOutcome::Held(name));
    }
    entity.commit(next);
    log::debug!("moved {name} to ({}, {})", next.i, next.j);
    redraw(entities)?;
    Ok(InputOutcome::Moved { name, to: next })
}

/// End any drag in progress.
pub fn pointer_up(entities: &mut EntitySet) -> InputOutcome {
    if entities.end_drag_all() {
        InputOutcome::Released
    } else {
        InputOutcome::Ignored
    }
}
