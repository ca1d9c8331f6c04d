//! Stage descriptors.
//!
//! A [`StageSpec`] is everything a lesson needs to run one phase: instruction
//! text, the initial draggable entities, a redraw procedure closing over the
//! stage's fixed reference points, and an optional acceptance check over the
//! entities' positions. Specs are immutable; entering a stage clones the
//! initial entities so no dragged state leaks between visits.

#[cfg(test)]
#[path = "stage_test.rs"]
mod stage_test;

use std::fmt;

use crate::entity::EntitySet;
use crate::error::{LessonError, RenderError};
use crate::geom::Coords;
use crate::render::Renderer;

/// Redraw procedure: computes derived geometry from the entities and draws it.
pub type DrawFn = Box<dyn Fn(&EntitySet, &mut dyn Renderer) -> Result<(), RenderError>>;

/// Acceptance predicate over the entities' current positions.
pub type CheckFn = Box<dyn Fn(&EntitySet) -> bool>;

/// Result of asking a stage to check the learner's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The answer is correct.
    Pass,
    /// The answer is wrong; the stage stays interactive for another try.
    Fail,
    /// The stage is exploratory and has nothing to check.
    NoCheck,
}

/// One phase of a lesson.
pub struct StageSpec {
    name: &'static str,
    instructions: &'static str,
    entities: EntitySet,
    draw: DrawFn,
    check: Option<CheckFn>,
}

impl fmt::Debug for StageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSpec")
            .field("name", &self.name)
            .field("entities", &self.entities)
            .field("has_check", &self.check.is_some())
            .finish_non_exhaustive()
    }
}

impl StageSpec {
    /// An exploratory stage with no check.
    pub fn new(
        name: &'static str,
        instructions: &'static str,
        entities: EntitySet,
        draw: impl Fn(&EntitySet, &mut dyn Renderer) -> Result<(), RenderError> + 'static,
    ) -> Self {
        Self { name, instructions, entities, draw: Box::new(draw), check: None }
    }

    /// Gate advancement on `check`.
    #[must_use]
    pub fn with_check(mut self, check: impl Fn(&EntitySet) -> bool + 'static) -> Self {
        self.check = Some(Box::new(check));
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn instructions(&self) -> &'static str {
        self.instructions
    }

    #[must_use]
    pub fn has_check(&self) -> bool {
        self.check.is_some()
    }

    /// Label for the control that moves past this stage.
    #[must_use]
    pub fn continue_label(&self) -> &'static str {
        if self.has_check() { "Continue" } else { "Next" }
    }

    /// Fresh copy of the stage's initial entities.
    #[must_use]
    pub fn enter(&self) -> EntitySet {
        self.entities.clone()
    }

    /// Run the redraw procedure against `entities`.
    ///
    /// # Errors
    ///
    /// Whatever the renderer or the procedure reports.
    pub fn redraw(&self, entities: &EntitySet, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
        (self.draw)(entities, renderer)
    }

    #[must_use]
    pub fn evaluate(&self, entities: &EntitySet) -> CheckOutcome {
        match &self.check {
            None => CheckOutcome::NoCheck,
            Some(check) if check(entities) => CheckOutcome::Pass,
            Some(_) => CheckOutcome::Fail,
        }
    }

    /// Validate the initial entities.
    ///
    /// # Errors
    ///
    /// The first invalid entity, as a [`LessonError`].
    pub fn validate(&self) -> Result<(), LessonError> {
        self.entities.validate()
    }
}

/// Position of a named entity as grid coordinates, for use inside redraw procedures.
///
/// # Errors
///
/// [`RenderError::MissingEntity`] if the stage never declared `name`.
pub fn require(entities: &EntitySet, name: &'static str) -> Result<Coords, RenderError> {
    entities
        .position(name)
        .map(Coords::from)
        .ok_or(RenderError::MissingEntity(name))
}
