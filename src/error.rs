//! Error types for geometry validation, rendering and lesson sequencing.

use wasm_bindgen::JsValue;

use crate::geom::GridPoint;

/// Error returned by the validating geometry helpers in [`crate::geom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// A mirror line was given by two identical points.
    #[error("mirror line has zero length")]
    DegenerateLine,
    /// Two lines are parallel or collinear and have no unique intersection.
    #[error("lines are parallel and do not intersect at a single point")]
    ParallelLines,
}

/// Error raised while drawing a stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A `Canvas2D` call failed; carries the debug form of the thrown value.
    #[error("canvas call failed: {0}")]
    Canvas(String),
    /// A stage's redraw looked up an entity it never declared.
    #[error("stage has no entity named `{0}`")]
    MissingEntity(&'static str),
}

impl From<JsValue> for RenderError {
    fn from(value: JsValue) -> Self {
        Self::Canvas(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

/// Error returned by lesson construction, configuration and stage transitions.
#[derive(Debug, thiserror::Error)]
pub enum LessonError {
    /// A lesson plan must contain at least one stage.
    #[error("lesson plan has no stages")]
    EmptyPlan,
    /// An entity's bounds have `min > max` on some axis.
    #[error("entity `{name}` has inverted bounds")]
    InvalidBounds { name: &'static str },
    /// An entity's initial position lies outside its bounds.
    #[error("entity `{name}` starts at ({}, {}) outside its bounds", position.i, position.j)]
    PositionOutOfBounds { name: &'static str, position: GridPoint },
    /// `advance` was requested before the current stage allows it.
    #[error("stage `{0}` has not been completed")]
    NotReady(&'static str),
    /// `advance` was requested on the last stage.
    #[error("lesson is already on its final stage")]
    Finished,
    /// The host configuration was not valid JSON for [`crate::config::LessonConfig`].
    #[error("invalid lesson config: {0}")]
    Config(#[from] serde_json::Error),
    /// The host configuration parsed but carries an unusable value.
    #[error("invalid lesson config: {0}")]
    InvalidConfig(String),
    /// The host surface could not be set up.
    #[error("host setup failed: {0}")]
    Host(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
