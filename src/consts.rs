//! Shared numeric constants for the lesson crate.

// ── Grid ────────────────────────────────────────────────────────

/// Number of grid cells along the horizontal axis; lattice `i` spans `0..=GRID_WIDTH`.
pub const GRID_WIDTH: i32 = 16;

/// Number of grid cells along the vertical axis; lattice `j` spans `0..=GRID_HEIGHT`.
pub const GRID_HEIGHT: i32 = 12;

/// Default edge length of one grid cell in CSS pixels.
pub const DEFAULT_CELL_SIZE_PX: f64 = 40.0;

/// Default blank border around the grid in CSS pixels.
pub const DEFAULT_MARGIN_PX: f64 = 40.0;

// ── Geometry ────────────────────────────────────────────────────

/// Tolerance when comparing computed geometry against lattice points.
pub const GEOM_EPSILON: f64 = 1e-9;

/// Determinants with a smaller magnitude are treated as zero (parallel lines).
pub const PARALLEL_EPSILON: f64 = 1e-12;

// ── Glyphs ──────────────────────────────────────────────────────

/// Half-extent scale for the eye and object glyphs, in pixels.
pub const GLYPH_SIZE_PX: f64 = 20.0;

/// Radius of a grid lattice dot.
pub const GRID_DOT_RADIUS_PX: f64 = 1.0;

/// Radius of the mirror-hit marker.
pub const MARKER_RADIUS_PX: f64 = 8.0;

/// Radius of the incidence/reflection angle arcs.
pub const ARC_RADIUS_PX: f64 = 30.0;

/// Line width of an angle arc when the angle is a full quarter turn.
pub const ARC_MAX_WIDTH_PX: f64 = 10.0;

/// Dash pattern (on, off) for virtual rays.
pub const RAY_DASH_PX: (f64, f64) = (4.0, 6.0);

/// Arrowhead half-size drawn at the midpoint of a ray.
pub const ARROWHEAD_PX: f64 = 5.0;
