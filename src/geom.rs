//! Geometric kernel: grid coordinates, vectors, reflection and intersection.
//!
//! Everything here is pure. Coordinates are in logical grid units so the
//! geometry is independent of the rendering scale; [`crate::camera`] owns the
//! mapping to pixels. No formula normalizes a vector: reflection works with a
//! ratio of inner products and intersection with 2×2 determinants.
//!
//! [`reflect`] and [`intersect`] have preconditions (non-degenerate mirror,
//! non-parallel lines) that lesson authors must uphold. They are checked with
//! `debug_assert!`; [`try_reflect`] and [`try_intersect`] perform the same
//! checks at runtime for validation paths.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::{Add, Sub};

use crate::consts::PARALLEL_EPSILON;
use crate::error::GeometryError;

/// A point in continuous grid space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub i: f64,
    pub j: f64,
}

impl Coords {
    #[must_use]
    pub const fn new(i: f64, j: f64) -> Self {
        Self { i, j }
    }

    /// Whether both components are within `eps` of `other`.
    #[must_use]
    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        (self.i - other.i).abs() <= eps && (self.j - other.j).abs() <= eps
    }
}

/// An integer lattice point. Entity positions and bounds live on the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint {
    pub i: i32,
    pub j: i32,
}

impl GridPoint {
    #[must_use]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }
}

impl From<GridPoint> for Coords {
    fn from(p: GridPoint) -> Self {
        Self { i: f64::from(p.i), j: f64::from(p.j) }
    }
}

/// Difference of two [`Coords`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    pub di: f64,
    pub dj: f64,
}

impl Vector {
    #[must_use]
    pub const fn new(di: f64, dj: f64) -> Self {
        Self { di, dj }
    }

    #[must_use]
    pub fn scale(self, c: f64) -> Self {
        Self { di: c * self.di, dj: c * self.dj }
    }

    /// Inner product.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.di * other.di + self.dj * other.dj
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { di: self.di + rhs.di, dj: self.dj + rhs.dj }
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { di: self.di - rhs.di, dj: self.dj - rhs.dj }
    }
}

impl Sub for Coords {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Vector {
        Vector { di: self.i - rhs.i, dj: self.j - rhs.j }
    }
}

impl Add<Vector> for Coords {
    type Output = Self;

    fn add(self, rhs: Vector) -> Self {
        Self { i: self.i + rhs.di, j: self.j + rhs.dj }
    }
}

/// Clamp `x` into `[lo, hi]`. Requires `lo <= hi`.
#[must_use]
pub fn clamp<T: PartialOrd>(x: T, lo: T, hi: T) -> T {
    debug_assert!(lo <= hi, "clamp called with lo > hi");
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Reflect `point` across the infinite line through `start` and `end`.
///
/// `start` must differ from `end`.
#[must_use]
pub fn reflect(point: Coords, start: Coords, end: Coords) -> Coords {
    let line = end - start;
    let rel = point - start;
    let len2 = line.dot(line);
    debug_assert!(len2 > 0.0, "reflect across zero-length line at {start:?}");
    // Twice the projection of `rel` onto the line, minus `rel` itself.
    let projection2 = line.scale(2.0 * line.dot(rel) / len2);
    start + (projection2 - rel)
}

/// [`reflect`], rejecting a zero-length mirror line.
///
/// # Errors
///
/// [`GeometryError::DegenerateLine`] when `start == end`.
pub fn try_reflect(point: Coords, start: Coords, end: Coords) -> Result<Coords, GeometryError> {
    let line = end - start;
    if line.dot(line) <= 0.0 {
        return Err(GeometryError::DegenerateLine);
    }
    Ok(reflect(point, start, end))
}

fn det(a: f64, b: f64, c: f64, d: f64) -> f64 {
    a * d - b * c
}

/// Denominator of the two-point intersection formula; zero for parallel lines.
fn intersection_denominator(p1: Coords, p2: Coords, p3: Coords, p4: Coords) -> f64 {
    det(p1.i - p2.i, p1.j - p2.j, p3.i - p4.i, p3.j - p4.j)
}

/// Intersection of the infinite line `p1–p2` with the infinite line `p3–p4`.
///
/// The lines must not be parallel or collinear.
#[must_use]
pub fn intersect(p1: Coords, p2: Coords, p3: Coords, p4: Coords) -> Coords {
    let d1 = det(p1.i, p1.j, p2.i, p2.j);
    let d2 = det(p3.i, p3.j, p4.i, p4.j);
    let d1i = p1.i - p2.i;
    let d2i = p3.i - p4.i;
    let d1j = p1.j - p2.j;
    let d2j = p3.j - p4.j;

    let denom = det(d1i, d1j, d2i, d2j);
    debug_assert!(
        denom.abs() > PARALLEL_EPSILON,
        "intersect called with parallel lines {p1:?}-{p2:?} and {p3:?}-{p4:?}"
    );

    Coords {
        i: det(d1, d1i, d2, d2i) / denom,
        j: det(d1, d1j, d2, d2j) / denom,
    }
}

/// [`intersect`], rejecting parallel or collinear lines.
///
/// # Errors
///
/// [`GeometryError::ParallelLines`] when the lines have no unique intersection,
/// which includes either line being given by two identical points.
pub fn try_intersect(p1: Coords, p2: Coords, p3: Coords, p4: Coords) -> Result<Coords, GeometryError> {
    if intersection_denominator(p1, p2, p3, p4).abs() <= PARALLEL_EPSILON {
        return Err(GeometryError::ParallelLines);
    }
    Ok(intersect(p1, p2, p3, p4))
}
