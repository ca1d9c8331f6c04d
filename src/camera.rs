//! Screen points and the fixed affine map between the lesson grid and pixels.
//!
//! All geometry and every stored entity position is in grid units. Pixels
//! appear only at the boundary: pointer input arrives as a [`Point`] and is
//! snapped onto the lattice by [`Camera::screen_to_grid`]; the renderer maps
//! grid coordinates back with [`Camera::grid_to_screen`].

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::Sub;

use crate::consts::{DEFAULT_CELL_SIZE_PX, DEFAULT_MARGIN_PX, GRID_HEIGHT, GRID_WIDTH};
use crate::geom::{Coords, GridPoint, clamp};

/// A point in screen space (CSS pixels relative to the drawing surface origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Difference between two screen points.
///
/// Recorded when a drag starts: the sub-cell distance between the pointer and
/// the grabbed entity's snapped screen position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenOffset {
    pub dx: f64,
    pub dy: f64,
}

impl Sub for Point {
    type Output = ScreenOffset;

    fn sub(self, rhs: Self) -> ScreenOffset {
        ScreenOffset { dx: self.x - rhs.x, dy: self.y - rhs.y }
    }
}

impl Sub<ScreenOffset> for Point {
    type Output = Self;

    fn sub(self, rhs: ScreenOffset) -> Self {
        Self { x: self.x - rhs.dx, y: self.y - rhs.dy }
    }
}

/// Affine grid ↔ screen map: `screen = grid * cell_size + margin`.
///
/// `grid_width` / `grid_height` bound the lattice to `[0, W] × [0, H]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub cell_size: f64,
    pub margin: f64,
    pub grid_width: i32,
    pub grid_height: i32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE_PX,
            margin: DEFAULT_MARGIN_PX,
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
        }
    }
}

impl Camera {
    /// Convert a grid coordinate to screen pixels.
    #[must_use]
    pub fn grid_to_screen(&self, grid: Coords) -> Point {
        Point {
            x: grid.i * self.cell_size + self.margin,
            y: grid.j * self.cell_size + self.margin,
        }
    }

    /// Snap a screen point to the nearest lattice point inside the full grid.
    ///
    /// Rounds half away from zero, then clamps to `[0, W] × [0, H]`. Per-entity
    /// bounds are applied later by the drag controller.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn screen_to_grid(&self, screen: Point) -> GridPoint {
        let i = ((screen.x - self.margin) / self.cell_size).round();
        let j = ((screen.y - self.margin) / self.cell_size).round();
        GridPoint {
            i: clamp(i, 0.0, f64::from(self.grid_width)) as i32,
            j: clamp(j, 0.0, f64::from(self.grid_height)) as i32,
        }
    }

    /// Drawing surface size in pixels, `(width, height)`, including the margin on both sides.
    #[must_use]
    pub fn surface_size(&self) -> (f64, f64) {
        (
            f64::from(self.grid_width) * self.cell_size + 2.0 * self.margin,
            f64::from(self.grid_height) * self.cell_size + 2.0 * self.margin,
        )
    }
}
