//! The built-in plane-mirror stages and the lesson plans that sequence them.
//!
//! Every stage works on the same 16×12 grid with the eye and object starting
//! at fixed lattice points. Positions the learner must find are derived from
//! the reference geometry with [`reflect`] and [`intersect`] instead of being
//! hard-coded, so the checks and the drawn rays cannot disagree.

#[cfg(test)]
#[path = "optics_test.rs"]
mod optics_test;

use serde::{Deserialize, Serialize};

use crate::consts::{GEOM_EPSILON, GRID_HEIGHT, GRID_WIDTH};
use crate::entity::{Bounds, DraggableEntity, EntitySet};
use crate::geom::{Coords, GridPoint, intersect, reflect};
use crate::render::{ImageOrder, Transform2};
use crate::stage::{StageSpec, require};

/// Lattice row of the horizontal mirror.
pub const MIRROR_ROW: i32 = GRID_HEIGHT / 2;

/// Where the eye starts (and stays, in the first two stages).
pub const EYE: GridPoint = GridPoint::new(10, 3);

/// Where the object starts (and stays, in the first two stages).
pub const OBJECT: GridPoint = GridPoint::new(2, 1);

/// Columns of the vertical mirrors in the multi-mirror stage, with their styling.
const VERTICAL_MIRRORS: [(i32, ImageOrder); 5] = [
    (4, ImageOrder::Real),
    (8, ImageOrder::Real),
    (0, ImageOrder::FirstVirtual),
    (12, ImageOrder::FirstVirtual),
    (16, ImageOrder::SecondVirtual),
];

const REFLECTION_POINT_TEXT: &str = "When light is reflected from a mirror, the angle of incidence is equal to the \
     angle of reflection. Drag the point at which the light ray hits the mirror to the correct position.";

const VIRTUAL_IMAGE_TEXT: &str = "Drag the virtual image formed by reflection to the correct position by \
     extending the reflected ray backwards.";

const SINGLE_MIRROR_TEXT: &str = "Experiment with dragging the eye and the object to see how the light ray and \
     virtual image are affected.";

const MULTI_MIRROR_TEXT: &str = "Multiple reflections are possible with multiple mirrors. Experiment with \
     dragging the eye and the object to see how the light ray and virtual image are affected.";

/// End points of the horizontal mirror, spanning the whole grid.
#[must_use]
pub fn horizontal_mirror() -> (Coords, Coords) {
    let j = f64::from(MIRROR_ROW);
    (Coords::new(0.0, j), Coords::new(f64::from(GRID_WIDTH), j))
}

/// End points of the vertical mirror at column `i`.
#[must_use]
pub fn vertical_mirror(i: i32) -> (Coords, Coords) {
    let i = f64::from(i);
    (Coords::new(i, 0.0), Coords::new(i, f64::from(GRID_HEIGHT)))
}

/// Derived geometry for one eye/object pair over the horizontal mirror.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleMirrorPath {
    /// The object reflected in the mirror.
    pub image: Coords,
    /// Where the ray from the object to the eye meets the mirror.
    pub hit: Coords,
}

#[must_use]
pub fn single_mirror_path(eye: Coords, object: Coords) -> SingleMirrorPath {
    let (start, end) = horizontal_mirror();
    let image = reflect(object, start, end);
    let hit = intersect(eye, image, start, end);
    SingleMirrorPath { image, hit }
}

/// Derived geometry for the two-mirror corridor between columns 4 and 8.
///
/// The ray leaves the object, bounces off mirror 4 at `x2`, then off mirror 8
/// at `x1`, and reaches the eye. Looking back from the eye, it appears to come
/// from `v3`, the image of `v2` in the virtual mirror at 12.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiMirrorPath {
    /// Object reflected in mirror 4.
    pub v1: Coords,
    /// Object reflected in mirror 8.
    pub v2: Coords,
    /// `v2` reflected in virtual mirror 12.
    pub v3: Coords,
    /// Eye ray hitting mirror 8.
    pub x1: Coords,
    /// Second bounce, on mirror 4.
    pub x2: Coords,
}

#[must_use]
pub fn multi_mirror_path(eye: Coords, object: Coords) -> MultiMirrorPath {
    let (m4s, m4e) = vertical_mirror(4);
    let (m8s, m8e) = vertical_mirror(8);
    let (m12s, m12e) = vertical_mirror(12);

    let v1 = reflect(object, m4s, m4e);
    let v2 = reflect(object, m8s, m8e);
    let v3 = reflect(v2, m12s, m12e);
    let x1 = intersect(eye, v3, m8s, m8e);
    let x2 = intersect(x1, v1, m4s, m4e);
    MultiMirrorPath { v1, v2, v3, x1, x2 }
}

fn is_at(entities: &EntitySet, name: &str, target: Coords) -> bool {
    entities
        .position(name)
        .is_some_and(|p| Coords::from(p).approx_eq(target, GEOM_EPSILON))
}

/// Stage 1: drag the reflection point along the mirror until the angles match.
#[must_use]
pub fn reflection_point_stage() -> StageSpec {
    let entities = EntitySet::new().with(
        "point",
        DraggableEntity::new(GridPoint::new(4, MIRROR_ROW), Bounds::new(0, GRID_WIDTH, MIRROR_ROW, MIRROR_ROW)),
    );
    let (eye, object) = (Coords::from(EYE), Coords::from(OBJECT));
    let answer = single_mirror_path(eye, object).hit;

    StageSpec::new("reflection_point", REFLECTION_POINT_TEXT, entities, move |entities, r| {
        let point = require(entities, "point")?;
        let (start, end) = horizontal_mirror();
        r.draw_grid()?;
        r.draw_angle_arcs(point, eye, object)?;
        r.draw_mirror(start, end, ImageOrder::Real)?;
        r.draw_eye(eye)?;
        r.draw_object(object, ImageOrder::Real, Transform2::IDENTITY)?;
        r.draw_ray(eye, point, false)?;
        r.draw_ray(point, object, false)?;
        r.draw_point_marker(point)
    })
    .with_check(move |entities| is_at(entities, "point", answer))
}

/// Stage 2: with the true ray drawn, place the virtual image below the mirror.
#[must_use]
pub fn virtual_image_stage() -> StageSpec {
    let entities = EntitySet::new().with(
        "image",
        DraggableEntity::new(GridPoint::new(5, 10), Bounds::new(0, GRID_WIDTH, MIRROR_ROW + 1, GRID_HEIGHT)),
    );
    let (eye, object) = (Coords::from(EYE), Coords::from(OBJECT));
    let SingleMirrorPath { image: answer, hit } = single_mirror_path(eye, object);

    StageSpec::new("virtual_image", VIRTUAL_IMAGE_TEXT, entities, move |entities, r| {
        let image = require(entities, "image")?;
        let (start, end) = horizontal_mirror();
        r.draw_grid()?;
        r.draw_mirror(start, end, ImageOrder::Real)?;
        r.draw_eye(eye)?;
        r.draw_object(object, ImageOrder::Real, Transform2::IDENTITY)?;
        r.draw_ray(eye, hit, false)?;
        r.draw_ray(hit, object, false)?;
        r.draw_object(image, ImageOrder::FirstVirtual, Transform2::FLIP_VERTICAL)?;
        r.draw_ray(hit, image, true)
    })
    .with_check(move |entities| is_at(entities, "image", answer))
}

/// Stage 3: move the eye and object freely above the mirror.
#[must_use]
pub fn single_mirror_stage() -> StageSpec {
    let above = Bounds::new(0, GRID_WIDTH, 0, MIRROR_ROW - 1);
    let entities = EntitySet::new()
        .with("eye", DraggableEntity::new(EYE, above))
        .with("object", DraggableEntity::new(OBJECT, above));

    StageSpec::new("single_mirror", SINGLE_MIRROR_TEXT, entities, |entities, r| {
        let eye = require(entities, "eye")?;
        let object = require(entities, "object")?;
        let SingleMirrorPath { image, hit } = single_mirror_path(eye, object);
        let (start, end) = horizontal_mirror();
        r.draw_grid()?;
        r.draw_mirror(start, end, ImageOrder::Real)?;
        r.draw_object(object, ImageOrder::Real, Transform2::IDENTITY)?;
        r.draw_object(image, ImageOrder::FirstVirtual, Transform2::FLIP_VERTICAL)?;
        r.draw_eye(eye)?;
        r.draw_ray(eye, hit, false)?;
        r.draw_ray(hit, object, false)?;
        r.draw_ray(hit, image, true)
    })
}

/// Stage 4: two facing mirrors and the images they multiply.
#[must_use]
pub fn multi_mirror_stage() -> StageSpec {
    let corridor = Bounds::new(5, 7, 0, GRID_HEIGHT);
    let entities = EntitySet::new()
        .with("eye", DraggableEntity::new(GridPoint::new(6, 10), corridor))
        .with("object", DraggableEntity::new(GridPoint::new(7, 3), corridor));

    StageSpec::new("multi_mirror", MULTI_MIRROR_TEXT, entities, |entities, r| {
        let eye = require(entities, "eye")?;
        let object = require(entities, "object")?;
        let MultiMirrorPath { v1, v2, v3, x1, x2 } = multi_mirror_path(eye, object);
        r.draw_grid()?;
        for (i, order) in VERTICAL_MIRRORS {
            let (start, end) = vertical_mirror(i);
            r.draw_mirror(start, end, order)?;
        }
        r.draw_object(object, ImageOrder::Real, Transform2::IDENTITY)?;
        r.draw_eye(eye)?;
        r.draw_object(v1, ImageOrder::FirstVirtual, Transform2::FLIP_HORIZONTAL)?;
        r.draw_object(v2, ImageOrder::FirstVirtual, Transform2::FLIP_HORIZONTAL)?;
        r.draw_object(v3, ImageOrder::SecondVirtual, Transform2::IDENTITY)?;
        r.draw_ray(eye, x1, false)?;
        r.draw_ray(x1, x2, false)?;
        r.draw_ray(x2, object, false)?;
        r.draw_ray(x1, v3, true)
    })
}

/// Which stages a lesson runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonPlan {
    /// All four stages.
    #[default]
    Full,
    /// Stages 1-3 over the horizontal mirror.
    SingleMirror,
    /// Only the multi-mirror stage.
    MultiMirror,
}

impl LessonPlan {
    /// Fresh stage descriptors for this plan, in order.
    #[must_use]
    pub fn stages(self) -> Vec<StageSpec> {
        match self {
            Self::Full => vec![
                reflection_point_stage(),
                virtual_image_stage(),
                single_mirror_stage(),
                multi_mirror_stage(),
            ],
            Self::SingleMirror => vec![reflection_point_stage(), virtual_image_stage(), single_mirror_stage()],
            Self::MultiMirror => vec![multi_mirror_stage()],
        }
    }
}
