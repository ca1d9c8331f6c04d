//! Pointer subscription seam between the engine and whatever delivers input.
//!
//! A host hands pointer events to a [`PointerSink`] for as long as the guard
//! returned by [`PointerHost::subscribe`] is alive. Dropping the guard
//! unregisters every listener the subscription installed, exactly once, so a
//! stage's handlers cannot outlive the stage.

use std::rc::Rc;

use crate::camera::Point;
use crate::error::LessonError;

/// Receiver of pointer events, in drawing-surface pixels.
pub trait PointerSink {
    /// Button pressed over the surface.
    fn pointer_down(&self, screen: Point);
    /// Pointer moved anywhere; position is relative to the surface origin.
    fn pointer_move(&self, screen: Point);
    /// Button released anywhere.
    fn pointer_up(&self);
}

/// Something that can deliver pointer events to a sink.
pub trait PointerHost {
    /// Live subscription; dropping it unregisters the sink.
    type Guard;

    /// Start delivering events to `sink`.
    ///
    /// # Errors
    ///
    /// [`LessonError::Host`] if listeners could not be installed. No listener
    /// stays registered on failure.
    fn subscribe(&self, sink: Rc<dyn PointerSink>) -> Result<Self::Guard, LessonError>;
}
