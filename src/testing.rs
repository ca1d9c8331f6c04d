//! Test doubles shared by the unit tests: a renderer that records draw calls
//! and a pointer host that tracks live subscriptions.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::camera::Point;
use crate::error::{LessonError, RenderError};
use crate::geom::Coords;
use crate::host::{PointerHost, PointerSink};
use crate::render::{ImageOrder, Renderer, Transform2};

/// One recorded [`Renderer`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Grid,
    Marker(Coords),
    Mirror { start: Coords, end: Coords, order: ImageOrder },
    Ray { start: Coords, end: Coords, dashed: bool },
    Eye(Coords),
    Object { at: Coords, order: ImageOrder, transform: Transform2 },
    Arcs { vertex: Coords, eye: Coords, object: Coords },
}

/// Records every draw call; optionally fails all of them.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
    pub fail_with: Option<RenderError>,
}

impl RecordingRenderer {
    /// Number of full redraws (each starts with `clear`).
    pub fn frames(&self) -> usize {
        self.calls.iter().filter(|c| **c == DrawCall::Clear).count()
    }

    /// Calls since the most recent `clear`.
    pub fn last_frame(&self) -> &[DrawCall] {
        let start = self.calls.iter().rposition(|c| *c == DrawCall::Clear).unwrap_or(0);
        self.calls.get(start..).unwrap_or_default()
    }

    pub fn objects(&self) -> Vec<(Coords, ImageOrder, Transform2)> {
        self.last_frame()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Object { at, order, transform } => Some((*at, *order, *transform)),
                _ => None,
            })
            .collect()
    }

    pub fn rays(&self) -> Vec<(Coords, Coords, bool)> {
        self.last_frame()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Ray { start, end, dashed } => Some((*start, *end, *dashed)),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: DrawCall) -> Result<(), RenderError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) -> Result<(), RenderError> {
        self.record(DrawCall::Clear)
    }

    fn draw_grid(&mut self) -> Result<(), RenderError> {
        self.record(DrawCall::Grid)
    }

    fn draw_point_marker(&mut self, at: Coords) -> Result<(), RenderError> {
        self.record(DrawCall::Marker(at))
    }

    fn draw_mirror(&mut self, start: Coords, end: Coords, order: ImageOrder) -> Result<(), RenderError> {
        self.record(DrawCall::Mirror { start, end, order })
    }

    fn draw_ray(&mut self, start: Coords, end: Coords, dashed: bool) -> Result<(), RenderError> {
        self.record(DrawCall::Ray { start, end, dashed })
    }

    fn draw_eye(&mut self, at: Coords) -> Result<(), RenderError> {
        self.record(DrawCall::Eye(at))
    }

    fn draw_object(&mut self, at: Coords, order: ImageOrder, transform: Transform2) -> Result<(), RenderError> {
        self.record(DrawCall::Object { at, order, transform })
    }

    fn draw_angle_arcs(&mut self, vertex: Coords, eye: Coords, object: Coords) -> Result<(), RenderError> {
        self.record(DrawCall::Arcs { vertex, eye, object })
    }
}

/// In-memory pointer host. Every live subscription receives every event,
/// like listeners attached to one DOM element.
#[derive(Default, Clone)]
pub struct FakeHost {
    sinks: Rc<RefCell<Vec<(u64, Rc<dyn PointerSink>)>>>,
    next_id: Rc<RefCell<u64>>,
    total_subscribed: Rc<RefCell<u64>>,
}

/// Guard returned by [`FakeHost::subscribe`]; unsubscribes on drop.
pub struct FakeGuard {
    id: u64,
    sinks: Weak<RefCell<Vec<(u64, Rc<dyn PointerSink>)>>>,
}

impl Drop for FakeGuard {
    fn drop(&mut self) {
        if let Some(sinks) = self.sinks.upgrade() {
            sinks.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

impl FakeHost {
    pub fn live(&self) -> usize {
        self.sinks.borrow().len()
    }

    pub fn total_subscribed(&self) -> u64 {
        *self.total_subscribed.borrow()
    }

    fn each(&self, f: impl Fn(&dyn PointerSink)) {
        // Snapshot so sinks may (un)subscribe while being notified.
        let sinks: Vec<_> = self.sinks.borrow().iter().map(|(_, s)| Rc::clone(s)).collect();
        for sink in sinks {
            f(sink.as_ref());
        }
    }

    pub fn down(&self, x: f64, y: f64) {
        self.each(|s| s.pointer_down(Point::new(x, y)));
    }

    pub fn moved(&self, x: f64, y: f64) {
        self.each(|s| s.pointer_move(Point::new(x, y)));
    }

    pub fn up(&self) {
        self.each(|s| s.pointer_up());
    }

    /// Down on `from`, move to `to`, release; all in screen pixels.
    pub fn drag(&self, from: (f64, f64), to: (f64, f64)) {
        self.down(from.0, from.1);
        self.moved(to.0, to.1);
        self.up();
    }
}

impl PointerHost for FakeHost {
    type Guard = FakeGuard;

    fn subscribe(&self, sink: Rc<dyn PointerSink>) -> Result<FakeGuard, LessonError> {
        let id = {
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            *next
        };
        *self.total_subscribed.borrow_mut() += 1;
        self.sinks.borrow_mut().push((id, sink));
        Ok(FakeGuard { id, sinks: Rc::downgrade(&self.sinks) })
    }
}
