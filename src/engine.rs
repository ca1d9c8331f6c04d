//! The lesson engine.
//!
//! [`EngineCore`] owns the lesson, the renderer and the camera, and contains
//! all logic that does not depend on a browser, so it can be tested natively.
//!
//! [`Engine`] adds the host subscription. It holds at most one live pointer
//! subscription, bound to the current stage index. The subscription is dropped
//! when the stage's check passes and replaced when the lesson advances, so
//! handlers never outlive their stage and never stack.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::cell::{RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::camera::{Camera, Point};
use crate::error::{LessonError, RenderError};
use crate::host::{PointerHost, PointerSink};
use crate::input::{InputOutcome, PointerEvent};
use crate::lesson::{Lesson, StageView};
use crate::render::Renderer;
use crate::stage::CheckOutcome;

/// Core engine state: everything except the host subscription.
pub struct EngineCore<R> {
    lesson: Lesson,
    renderer: R,
    camera: Camera,
}

impl<R: Renderer> EngineCore<R> {
    #[must_use]
    pub fn new(lesson: Lesson, renderer: R, camera: Camera) -> Self {
        Self { lesson, renderer, camera }
    }

    // --- Input events ---

    /// # Errors
    ///
    /// None in practice: a press does not redraw.
    pub fn on_pointer_down(&mut self, screen: Point) -> Result<InputOutcome, RenderError> {
        self.dispatch(PointerEvent::Down(screen))
    }

    /// # Errors
    ///
    /// Whatever the renderer reports while redrawing.
    pub fn on_pointer_move(&mut self, screen: Point) -> Result<InputOutcome, RenderError> {
        self.dispatch(PointerEvent::Move(screen))
    }

    /// # Errors
    ///
    /// None in practice: a release does not redraw.
    pub fn on_pointer_up(&mut self) -> Result<InputOutcome, RenderError> {
        self.dispatch(PointerEvent::Up)
    }

    fn dispatch(&mut self, event: PointerEvent) -> Result<InputOutcome, RenderError> {
        self.lesson.pointer(event, &self.camera, &mut self.renderer)
    }

    // --- Lesson control ---

    pub fn check(&mut self) -> CheckOutcome {
        self.lesson.check()
    }

    /// Enter the next stage and draw it.
    ///
    /// # Errors
    ///
    /// See [`Lesson::advance`]; render failures of the first frame.
    pub fn advance(&mut self) -> Result<(), LessonError> {
        self.lesson.advance()?;
        self.render()?;
        Ok(())
    }

    /// Draw the current stage.
    ///
    /// # Errors
    ///
    /// Whatever the renderer reports.
    pub fn render(&mut self) -> Result<(), RenderError> {
        self.lesson.redraw(&mut self.renderer)
    }

    // --- Queries ---

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn view(&self) -> StageView {
        self.lesson.view()
    }
}

/// Pointer sink bound to one stage. Events that arrive after the lesson has
/// moved past that stage are dropped.
struct StageSink<R> {
    core: Weak<RefCell<EngineCore<R>>>,
    stage: usize,
}

impl<R: Renderer> StageSink<R> {
    fn with_core(&self, f: impl FnOnce(&mut EngineCore<R>) -> Result<InputOutcome, RenderError>) {
        let Some(core) = self.core.upgrade() else {
            return;
        };
        let Ok(mut core) = core.try_borrow_mut() else {
            log::warn!("pointer event re-entered the engine; dropped");
            return;
        };
        if core.lesson.index() != self.stage {
            log::warn!("pointer event for stale stage {}; dropped", self.stage);
            return;
        }
        if let Err(e) = f(&mut *core) {
            log::error!("redraw failed: {e}");
        }
    }
}

impl<R: Renderer> PointerSink for StageSink<R> {
    fn pointer_down(&self, screen: Point) {
        self.with_core(|core| core.on_pointer_down(screen));
    }

    fn pointer_move(&self, screen: Point) {
        self.with_core(|core| core.on_pointer_move(screen));
    }

    fn pointer_up(&self) {
        self.with_core(EngineCore::on_pointer_up);
    }
}

/// [`EngineCore`] plus the stage-scoped host subscription.
pub struct Engine<H: PointerHost, R> {
    // Dropped first, so listeners never see a dead core.
    subscription: Option<H::Guard>,
    core: Rc<RefCell<EngineCore<R>>>,
    host: H,
}

impl<H: PointerHost, R: Renderer + 'static> Engine<H, R> {
    /// Draw the first stage and subscribe its handlers.
    ///
    /// # Errors
    ///
    /// Render failures of the first frame, or the host refusing the subscription.
    pub fn start(host: H, mut core: EngineCore<R>) -> Result<Self, LessonError> {
        core.render()?;
        let mut engine = Self { subscription: None, core: Rc::new(RefCell::new(core)), host };
        engine.subscribe()?;
        Ok(engine)
    }

    fn subscribe(&mut self) -> Result<(), LessonError> {
        // Old handlers go before new ones are installed.
        self.subscription = None;
        let stage = self.core.try_borrow().map_err(|e| LessonError::Host(e.to_string()))?.lesson.index();
        let sink: Rc<dyn PointerSink> = Rc::new(StageSink { core: Rc::downgrade(&self.core), stage });
        self.subscription = Some(self.host.subscribe(sink)?);
        log::debug!("subscribed pointer handlers for stage {stage}");
        Ok(())
    }

    /// Check the current stage; a pass drops the pointer subscription.
    ///
    /// # Errors
    ///
    /// [`LessonError::Host`] if the engine is busy handling an event.
    pub fn check(&mut self) -> Result<CheckOutcome, LessonError> {
        let outcome = self.core_mut()?.check();
        if outcome == CheckOutcome::Pass && self.subscription.take().is_some() {
            log::debug!("stage passed; pointer handlers removed");
        }
        Ok(outcome)
    }

    /// Move to the next stage, subscribe its handlers, and draw it.
    ///
    /// Once the lesson has moved on, the new stage is subscribed even if its
    /// first frame then fails to draw.
    ///
    /// # Errors
    ///
    /// See [`Lesson::advance`]; host subscription and render failures.
    pub fn advance(&mut self) -> Result<(), LessonError> {
        self.core_mut()?.lesson.advance()?;
        self.subscribe()?;
        self.core_mut()?.render()?;
        Ok(())
    }

    fn core_mut(&self) -> Result<RefMut<'_, EngineCore<R>>, LessonError> {
        self.core.try_borrow_mut().map_err(|e| LessonError::Host(e.to_string()))
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Snapshot of the current stage for the host UI.
    ///
    /// # Errors
    ///
    /// [`LessonError::Host`] if the engine is busy handling an event.
    pub fn view(&self) -> Result<StageView, LessonError> {
        Ok(self.core.try_borrow().map_err(|e| LessonError::Host(e.to_string()))?.view())
    }

    /// Shared handle to the core, for inspection.
    #[must_use]
    pub fn core(&self) -> &Rc<RefCell<EngineCore<R>>> {
        &self.core
    }
}
