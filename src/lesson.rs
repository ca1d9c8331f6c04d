//! Stage state machine.
//!
//! A [`Lesson`] walks forward through an ordered list of [`StageSpec`]s. Each
//! stage is `Interactive` until its check passes (gated stages) or until the
//! learner moves on (exploratory stages). A passed stage ignores pointer input
//! and waits for [`Lesson::advance`]. The last stage is terminal.
//!
//! ```text
//! Interactive --check: Fail--> Interactive (feedback "Incorrect.")
//! Interactive --check: Pass--> Passed      (feedback "Correct!")
//! Passed / exploratory --advance--> next stage, Interactive
//! ```

#[cfg(test)]
#[path = "lesson_test.rs"]
mod lesson_test;

use std::collections::VecDeque;

use serde::Serialize;

use crate::camera::Camera;
use crate::entity::EntitySet;
use crate::error::{LessonError, RenderError};
use crate::input::{self, InputOutcome, PointerEvent};
use crate::render::Renderer;
use crate::stage::{CheckOutcome, StageSpec};

/// Whether the current stage accepts pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Interactive,
    Passed,
}

/// Feedback shown after the last check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Incorrect,
}

impl Feedback {
    #[must_use]
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Correct => Some("Correct!"),
            Self::Incorrect => Some("Incorrect."),
        }
    }
}

/// Everything the host needs to render the instruction and feedback panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    pub index: usize,
    pub count: usize,
    pub name: &'static str,
    pub instructions: &'static str,
    /// Show a "Check" button.
    pub has_check: bool,
    pub interactive: bool,
    pub feedback: Option<&'static str>,
    /// Label of the control that advances, when advancing is allowed.
    pub continue_label: Option<&'static str>,
    pub terminal: bool,
}

/// Driver for a sequence of stages.
#[derive(Debug)]
pub struct Lesson {
    current: StageSpec,
    upcoming: VecDeque<StageSpec>,
    index: usize,
    count: usize,
    entities: EntitySet,
    phase: Phase,
    feedback: Feedback,
}

impl Lesson {
    /// Validate every stage and enter the first one.
    ///
    /// # Errors
    ///
    /// [`LessonError::EmptyPlan`] for no stages, or the first invalid entity.
    pub fn new(stages: Vec<StageSpec>) -> Result<Self, LessonError> {
        for stage in &stages {
            stage.validate()?;
        }
        let count = stages.len();
        let mut upcoming = VecDeque::from(stages);
        let current = upcoming.pop_front().ok_or(LessonError::EmptyPlan)?;
        let entities = current.enter();
        log::info!("lesson: {count} stages, entering {}", current.name());
        Ok(Self {
            current,
            upcoming,
            index: 0,
            count,
            entities,
            phase: Phase::Interactive,
            feedback: Feedback::None,
        })
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn stage(&self) -> &StageSpec {
        &self.current
    }

    #[must_use]
    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.phase == Phase::Interactive
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.upcoming.is_empty()
    }

    /// A next stage exists and the current one has been passed or has no check.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        !self.is_terminal() && (self.phase == Phase::Passed || !self.current.has_check())
    }

    /// Clear the surface and draw the current stage.
    ///
    /// # Errors
    ///
    /// Whatever the renderer reports.
    pub fn redraw(&self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
        paint(&self.current, &self.entities, renderer)
    }

    /// Route a pointer event to the drag controller, redrawing on change.
    /// Ignored once the stage has passed.
    ///
    /// # Errors
    ///
    /// Whatever the renderer reports during the redraw.
    pub fn pointer(
        &mut self,
        event: PointerEvent,
        camera: &Camera,
        renderer: &mut dyn Renderer,
    ) -> Result<InputOutcome, RenderError> {
        if self.phase == Phase::Passed {
            return Ok(InputOutcome::Ignored);
        }
        let stage = &self.current;
        input::handle(&mut self.entities, camera, event, |entities| paint(stage, entities, renderer))
    }

    /// Evaluate the current stage's check.
    ///
    /// A pass locks the stage and ends any drag. Checking a passed stage again
    /// reports `Pass` without re-evaluating.
    pub fn check(&mut self) -> CheckOutcome {
        if self.phase == Phase::Passed {
            return CheckOutcome::Pass;
        }
        let outcome = self.current.evaluate(&self.entities);
        match outcome {
            CheckOutcome::Pass => {
                self.entities.end_drag_all();
                self.phase = Phase::Passed;
                self.feedback = Feedback::Correct;
            }
            CheckOutcome::Fail => self.feedback = Feedback::Incorrect,
            CheckOutcome::NoCheck => {}
        }
        log::info!("stage {} ({}): check {outcome:?}", self.index, self.current.name());
        outcome
    }

    /// Enter the next stage with fresh entities.
    ///
    /// # Errors
    ///
    /// [`LessonError::Finished`] on the last stage, [`LessonError::NotReady`]
    /// if a gated stage has not passed yet.
    pub fn advance(&mut self) -> Result<(), LessonError> {
        if self.is_terminal() {
            return Err(LessonError::Finished);
        }
        if !self.can_advance() {
            return Err(LessonError::NotReady(self.current.name()));
        }
        let Some(next) = self.upcoming.pop_front() else {
            return Err(LessonError::Finished);
        };
        let from = std::mem::replace(&mut self.current, next);
        self.index += 1;
        self.entities = self.current.enter();
        self.phase = Phase::Interactive;
        self.feedback = Feedback::None;
        log::info!("stage {} -> {} ({})", from.name(), self.current.name(), self.index);
        Ok(())
    }

    #[must_use]
    pub fn view(&self) -> StageView {
        StageView {
            index: self.index,
            count: self.count,
            name: self.current.name(),
            instructions: self.current.instructions(),
            has_check: self.current.has_check() && self.phase == Phase::Interactive,
            interactive: self.is_interactive(),
            feedback: self.feedback.message(),
            continue_label: self.can_advance().then(|| self.current.continue_label()),
            terminal: self.is_terminal(),
        }
    }
}

fn paint(stage: &StageSpec, entities: &EntitySet, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
    renderer.clear()?;
    stage.redraw(entities, renderer)
}
