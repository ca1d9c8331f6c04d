//! Geometry and interaction engine for an interactive plane-mirror lesson.
//!
//! The crate is compiled to WebAssembly and runs in the browser. It owns the
//! lesson's logic: mapping pointer input onto a discrete grid, repositioning
//! bounded draggable points, computing reflections and ray/mirror
//! intersections, and sequencing lesson stages behind pass/fail checks. The
//! host JavaScript layer only builds the instruction/feedback DOM and calls
//! into [`dom::LessonApp`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`geom`] | Grid coordinates, vectors, reflection and line intersection |
//! | [`camera`] | Screen points and the grid ↔ screen affine map |
//! | [`entity`] | Bounded draggable points and the ordered entity set |
//! | [`hit`] | Hit-testing pointer positions against entities |
//! | [`input`] | Pointer events and the drag controller |
//! | [`stage`] | Stage descriptors: entities, redraw, optional check |
//! | [`optics`] | The built-in mirror stages and lesson plans |
//! | [`lesson`] | Stage state machine driver |
//! | [`engine`] | Testable [`engine::EngineCore`] and handler-scoped [`engine::Engine`] |
//! | [`host`] | Pointer subscription traits implemented by hosts |
//! | [`render`] | Renderer interface and the `Canvas2D` implementation |
//! | [`dom`] | Browser host and `wasm-bindgen` entry point |
//! | [`config`] | Host-supplied lesson configuration |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants |

pub mod camera;
pub mod config;
pub mod consts;
pub mod dom;
pub mod engine;
pub mod entity;
pub mod error;
pub mod geom;
pub mod hit;
pub mod host;
pub mod input;
pub mod lesson;
pub mod optics;
pub mod render;
pub mod stage;

#[cfg(test)]
mod testing;
