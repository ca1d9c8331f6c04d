//! Rendering: the drawing interface stages are written against, and its
//! `Canvas2D` implementation.
//!
//! Stages call [`Renderer`] methods with already-computed grid coordinates;
//! the renderer owns the pixel mapping and all styling. [`ImageOrder`] and
//! [`Transform2`] only pick a visual style and have no geometric effect.
//!
//! [`CanvasRenderer`] is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. Fallible `Canvas2D` calls propagate
//! as [`RenderError::Canvas`].

use std::f64::consts::{PI, SQRT_2};

use web_sys::CanvasRenderingContext2d;

use crate::camera::Camera;
use crate::consts::{
    ARC_MAX_WIDTH_PX, ARC_RADIUS_PX, ARROWHEAD_PX, GLYPH_SIZE_PX, GRID_DOT_RADIUS_PX, MARKER_RADIUS_PX, RAY_DASH_PX,
};
use crate::error::RenderError;
use crate::geom::Coords;

const TAU: f64 = 2.0 * PI;

/// How many reflections separate a drawn item from the real scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageOrder {
    /// The real object or a real mirror.
    #[default]
    Real,
    /// Seen through one reflection.
    FirstVirtual,
    /// Seen through two reflections.
    SecondVirtual,
}

/// A 2×2 linear transform applied to a glyph around its anchor, `[a, b, c, d]`
/// in `Canvas2D` `setTransform` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Transform2 {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0 };
    /// Mirror image across a horizontal mirror.
    pub const FLIP_VERTICAL: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: -1.0 };
    /// Mirror image across a vertical mirror.
    pub const FLIP_HORIZONTAL: Self = Self { a: -1.0, b: 0.0, c: 0.0, d: 1.0 };
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Drawing primitives consumed by stage redraw procedures. All positions are
/// in grid coordinates.
pub trait Renderer {
    /// Erase the whole surface.
    fn clear(&mut self) -> Result<(), RenderError>;

    /// Lattice dots for every grid point.
    fn draw_grid(&mut self) -> Result<(), RenderError>;

    /// Marker for the point where a ray meets a mirror.
    fn draw_point_marker(&mut self, at: Coords) -> Result<(), RenderError>;

    fn draw_mirror(&mut self, start: Coords, end: Coords, order: ImageOrder) -> Result<(), RenderError>;

    /// Light ray from `start` to `end`; `dashed` marks an apparent (virtual) ray.
    fn draw_ray(&mut self, start: Coords, end: Coords, dashed: bool) -> Result<(), RenderError>;

    fn draw_eye(&mut self, at: Coords) -> Result<(), RenderError>;

    fn draw_object(&mut self, at: Coords, order: ImageOrder, transform: Transform2) -> Result<(), RenderError>;

    /// Arcs at `vertex` sized by the angles toward `eye` and `object`.
    fn draw_angle_arcs(&mut self, vertex: Coords, eye: Coords, object: Coords) -> Result<(), RenderError>;
}

/// [`Renderer`] backed by a browser `Canvas2D` context.
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    camera: Camera,
}

impl CanvasRenderer {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d, camera: Camera) -> Self {
        Self { ctx, camera }
    }

    fn dash(&self, pattern: &[f64]) -> Result<(), RenderError> {
        let dash_array = js_sys::Array::new();
        for len in pattern {
            dash_array.push(&(*len).into());
        }
        self.ctx.set_line_dash(&dash_array)?;
        Ok(())
    }
}

impl Renderer for CanvasRenderer {
    fn clear(&mut self) -> Result<(), RenderError> {
        let (w, h) = self.camera.surface_size();
        self.ctx.reset_transform()?;
        self.ctx.clear_rect(0.0, 0.0, w, h);
        Ok(())
    }

    fn draw_grid(&mut self) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("#999");
        for i in 0..=self.camera.grid_width {
            for j in 0..=self.camera.grid_height {
                let p = self.camera.grid_to_screen(Coords::new(f64::from(i), f64::from(j)));
                ctx.begin_path();
                ctx.arc(p.x, p.y, GRID_DOT_RADIUS_PX, 0.0, TAU)?;
                ctx.fill();
            }
        }
        Ok(())
    }

    fn draw_point_marker(&mut self, at: Coords) -> Result<(), RenderError> {
        let p = self.camera.grid_to_screen(at);
        let ctx = &self.ctx;
        ctx.set_fill_style_str("red");
        ctx.begin_path();
        ctx.arc(p.x, p.y, MARKER_RADIUS_PX, 0.0, TAU)?;
        ctx.fill();
        Ok(())
    }

    fn draw_mirror(&mut self, start: Coords, end: Coords, order: ImageOrder) -> Result<(), RenderError> {
        let s = self.camera.grid_to_screen(start);
        let e = self.camera.grid_to_screen(end);
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(match order {
            ImageOrder::Real => "#666",
            ImageOrder::FirstVirtual => "#999",
            ImageOrder::SecondVirtual => "#ccc",
        });
        ctx.set_line_cap("square");
        ctx.set_line_width(4.0);
        ctx.begin_path();
        ctx.move_to(s.x, s.y);
        ctx.line_to(e.x, e.y);
        ctx.stroke();
        Ok(())
    }

    fn draw_ray(&mut self, start: Coords, end: Coords, dashed: bool) -> Result<(), RenderError> {
        let s = self.camera.grid_to_screen(start);
        let e = self.camera.grid_to_screen(end);

        self.ctx.set_stroke_style_str("red");
        self.ctx.set_line_cap("butt");
        self.ctx.set_line_width(2.0);
        self.ctx.begin_path();
        if dashed {
            self.dash(&[RAY_DASH_PX.0, RAY_DASH_PX.1])?;
        }
        self.ctx.move_to(s.x, s.y);
        self.ctx.line_to(e.x, e.y);
        self.ctx.stroke();
        self.dash(&[])?;

        // Arrowhead at the midpoint, pointing back toward `start`.
        let angle = (e.y - s.y).atan2(e.x - s.x);
        let (sin, cos) = angle.sin_cos();
        let ctx = &self.ctx;
        ctx.set_transform(cos, sin, -sin, cos, (s.x + e.x) / 2.0, (s.y + e.y) / 2.0)?;
        ctx.set_fill_style_str("red");
        ctx.begin_path();
        ctx.move_to(0.0, 0.0);
        ctx.line_to(ARROWHEAD_PX, ARROWHEAD_PX);
        ctx.line_to(ARROWHEAD_PX, -ARROWHEAD_PX);
        ctx.close_path();
        ctx.fill();
        ctx.reset_transform()?;
        Ok(())
    }

    fn draw_eye(&mut self, at: Coords) -> Result<(), RenderError> {
        let p = self.camera.grid_to_screen(at);
        let ctx = &self.ctx;
        let size = GLYPH_SIZE_PX;

        ctx.set_transform(1.0, 0.0, 0.0, 1.0, p.x, p.y)?;

        // Outline: two circular arcs meeting at the corners of the eye.
        ctx.set_stroke_style_str("black");
        ctx.set_line_width(2.0);
        ctx.set_line_cap("round");
        ctx.set_fill_style_str("white");
        ctx.begin_path();
        ctx.arc(0.0, size, size * SQRT_2, TAU * (5.0 / 8.0), TAU * (7.0 / 8.0))?;
        ctx.arc(0.0, -size, size * SQRT_2, TAU * (1.0 / 8.0), TAU * (3.0 / 8.0))?;
        ctx.close_path();
        ctx.fill();
        ctx.stroke();

        // Iris.
        ctx.set_fill_style_str("black");
        ctx.begin_path();
        ctx.arc(0.0, 0.0, (SQRT_2 - 1.0) * size, 0.0, TAU)?;
        ctx.fill();

        ctx.reset_transform()?;
        Ok(())
    }

    fn draw_object(&mut self, at: Coords, order: ImageOrder, transform: Transform2) -> Result<(), RenderError> {
        let p = self.camera.grid_to_screen(at);
        let ctx = &self.ctx;
        let s = GLYPH_SIZE_PX;
        let Transform2 { a, b, c, d } = transform;

        ctx.set_transform(a, b, c, d, p.x, p.y)?;

        let (fill, stroke) = match order {
            ImageOrder::Real => ("#f00", "#000"),
            ImageOrder::FirstVirtual => ("#f66", "#666"),
            ImageOrder::SecondVirtual => ("#f99", "#999"),
        };
        ctx.set_fill_style_str(fill);
        ctx.set_stroke_style_str(stroke);
        ctx.set_line_cap("round");
        ctx.set_line_width(2.0);

        // A square with a bump on the top and right edges and a notch on the
        // bottom and left, so every reflection of it is distinguishable.
        let (q, h) = (s / 4.0, 3.0 * s / 4.0);
        ctx.begin_path();
        ctx.move_to(-h, -h);
        ctx.line_to(-q, -h);
        ctx.arc_with_anticlockwise(0.0, -h, q, PI, TAU, false)?;
        ctx.line_to(h, -h);
        ctx.line_to(h, -q);
        ctx.arc_with_anticlockwise(h, 0.0, q, 1.5 * PI, 0.5 * PI, false)?;
        ctx.line_to(h, h);
        ctx.line_to(q, h);
        ctx.arc_with_anticlockwise(0.0, h, q, 0.0, PI, true)?;
        ctx.line_to(-h, h);
        ctx.line_to(-h, q);
        ctx.arc_with_anticlockwise(-h, 0.0, q, 0.5 * PI, 1.5 * PI, true)?;
        ctx.close_path();
        ctx.fill();
        ctx.stroke();

        ctx.reset_transform()?;
        Ok(())
    }

    fn draw_angle_arcs(&mut self, vertex: Coords, eye: Coords, object: Coords) -> Result<(), RenderError> {
        let p = self.camera.grid_to_screen(vertex);
        let object_angle = ((object.j - vertex.j).atan2(object.i - vertex.i) + TAU) % TAU;
        let eye_angle = ((eye.j - vertex.j).atan2(eye.i - vertex.i) + TAU) % TAU;

        // Width grows with the angle measured from the mirror on each side.
        let object_frac = (object_angle - PI) / (PI / 2.0);
        let eye_frac = (TAU - eye_angle) / (PI / 2.0);

        let ctx = &self.ctx;
        ctx.set_line_cap("butt");
        ctx.set_stroke_style_str("#fcc");

        ctx.set_line_width(ARC_MAX_WIDTH_PX * object_frac);
        ctx.begin_path();
        ctx.arc(p.x, p.y, ARC_RADIUS_PX, PI, object_angle)?;
        ctx.stroke();

        ctx.set_line_width(ARC_MAX_WIDTH_PX * eye_frac);
        ctx.begin_path();
        ctx.arc(p.x, p.y, ARC_RADIUS_PX, eye_angle, 0.0)?;
        ctx.stroke();
        Ok(())
    }
}
