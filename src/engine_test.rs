use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::geom::{Coords, GridPoint};
use crate::optics::LessonPlan;
use crate::testing::{DrawCall, FakeHost, RecordingRenderer};

// =============================================================
// Helpers
// =============================================================

fn core(plan: LessonPlan) -> EngineCore<RecordingRenderer> {
    let lesson = Lesson::new(plan.stages()).unwrap();
    EngineCore::new(lesson, RecordingRenderer::default(), Camera::default())
}

fn start(plan: LessonPlan) -> (FakeHost, Engine<FakeHost, RecordingRenderer>) {
    let host = FakeHost::default();
    let engine = Engine::start(host.clone(), core(plan)).unwrap();
    (host, engine)
}

/// Screen pixel over lattice point `(i, j)` with the default camera.
fn px(i: i32, j: i32) -> (f64, f64) {
    let p = Camera::default().grid_to_screen(GridPoint::new(i, j).into());
    (p.x, p.y)
}

fn position(engine: &Engine<FakeHost, RecordingRenderer>, name: &str) -> Option<GridPoint> {
    engine.core().borrow().lesson().entities().position(name)
}

fn frames(engine: &Engine<FakeHost, RecordingRenderer>) -> usize {
    engine.core().borrow().renderer().frames()
}

/// Host that never unsubscribes, to exercise stage binding of sinks.
#[derive(Default, Clone)]
struct LeakyHost {
    sinks: Rc<RefCell<Vec<Rc<dyn PointerSink>>>>,
}

impl LeakyHost {
    fn drag(&self, from: (f64, f64), to: (f64, f64)) {
        let sinks: Vec<_> = self.sinks.borrow().clone();
        for sink in &sinks {
            sink.pointer_down(Point::new(from.0, from.1));
            sink.pointer_move(Point::new(to.0, to.1));
            sink.pointer_up();
        }
    }
}

impl PointerHost for LeakyHost {
    type Guard = ();

    fn subscribe(&self, sink: Rc<dyn PointerSink>) -> Result<(), LessonError> {
        self.sinks.borrow_mut().push(sink);
        Ok(())
    }
}

/// Host that refuses every subscription.
struct BrokenHost;

impl PointerHost for BrokenHost {
    type Guard = ();

    fn subscribe(&self, _sink: Rc<dyn PointerSink>) -> Result<(), LessonError> {
        Err(LessonError::Host("no surface".into()))
    }
}

// =============================================================
// EngineCore
// =============================================================

#[test]
fn core_drag_redraws_through_renderer() {
    let mut core = core(LessonPlan::Full);
    let (x, y) = px(4, 6);
    assert_eq!(core.on_pointer_down(Point::new(x, y)).unwrap(), InputOutcome::Grabbed("point"));
    let (x, y) = px(7, 6);
    let moved = core.on_pointer_move(Point::new(x, y)).unwrap();
    assert_eq!(moved, InputOutcome::Moved { name: "point", to: GridPoint::new(7, 6) });
    assert_eq!(core.on_pointer_up().unwrap(), InputOutcome::Released);
    assert_eq!(core.renderer().frames(), 1);
    assert_eq!(core.check(), CheckOutcome::Pass);
}

#[test]
fn core_advance_draws_next_stage() {
    let mut core = core(LessonPlan::Full);
    core.on_pointer_down(Point::new(px(4, 6).0, px(4, 6).1)).unwrap();
    core.on_pointer_move(Point::new(px(7, 6).0, px(7, 6).1)).unwrap();
    core.check();
    core.advance().unwrap();
    assert_eq!(core.view().name, "virtual_image");
    assert_eq!(core.renderer().frames(), 2);
    assert!(core.renderer().objects().iter().any(|(at, ..)| *at == Coords::new(5.0, 10.0)));
}

#[test]
fn core_advance_refused_before_pass() {
    let mut core = core(LessonPlan::Full);
    assert!(matches!(core.advance(), Err(LessonError::NotReady(_))));
    assert_eq!(core.renderer().frames(), 0);
}

#[test]
fn core_render_errors_propagate() {
    let mut core = core(LessonPlan::Full);
    core.renderer.fail_with = Some(RenderError::Canvas("lost context".into()));
    assert_eq!(core.render(), Err(RenderError::Canvas("lost context".into())));
}

// =============================================================
// Engine: subscription lifecycle
// =============================================================

#[test]
fn start_draws_and_subscribes_once() {
    let (host, engine) = start(LessonPlan::Full);
    assert_eq!(frames(&engine), 1);
    assert_eq!(host.live(), 1);
    assert!(engine.is_subscribed());
}

#[test]
fn host_events_drive_the_drag() {
    let (host, engine) = start(LessonPlan::Full);
    host.drag(px(4, 6), px(9, 6));
    assert_eq!(position(&engine, "point"), Some(GridPoint::new(9, 6)));
    assert_eq!(frames(&engine), 2);
}

#[test]
fn failed_check_keeps_handlers() {
    let (host, mut engine) = start(LessonPlan::Full);
    assert_eq!(engine.check().unwrap(), CheckOutcome::Fail);
    assert_eq!(host.live(), 1);
    host.drag(px(4, 6), px(5, 6));
    assert_eq!(position(&engine, "point"), Some(GridPoint::new(5, 6)));
}

#[test]
fn passing_check_removes_handlers() {
    let (host, mut engine) = start(LessonPlan::Full);
    host.drag(px(4, 6), px(7, 6));
    assert_eq!(engine.check().unwrap(), CheckOutcome::Pass);
    assert_eq!(host.live(), 0);
    assert!(!engine.is_subscribed());

    // Nothing listens any more.
    host.drag(px(7, 6), px(2, 6));
    assert_eq!(position(&engine, "point"), Some(GridPoint::new(7, 6)));
}

#[test]
fn advancing_replaces_handlers_without_stacking() {
    let (host, mut engine) = start(LessonPlan::Full);
    host.drag(px(4, 6), px(7, 6));
    engine.check().unwrap();
    engine.advance().unwrap();
    assert_eq!(host.live(), 1);
    assert_eq!(host.total_subscribed(), 2);

    host.drag(px(5, 10), px(2, 11));
    assert_eq!(position(&engine, "image"), Some(GridPoint::new(2, 11)));
    engine.check().unwrap();
    assert_eq!(host.live(), 0);

    // Exploratory stage: advancing swaps handlers directly.
    engine.advance().unwrap();
    assert_eq!(host.live(), 1);
    engine.advance().unwrap();
    assert_eq!(host.live(), 1);
    assert_eq!(host.total_subscribed(), 4);
    assert_eq!(engine.view().unwrap().name, "multi_mirror");
}

#[test]
fn refused_advance_keeps_handlers() {
    let (host, mut engine) = start(LessonPlan::Full);
    assert!(matches!(engine.advance(), Err(LessonError::NotReady(_))));
    assert_eq!(host.live(), 1);
    assert_eq!(host.total_subscribed(), 1);
}

#[test]
fn finished_lesson_refuses_advance() {
    let (host, mut engine) = start(LessonPlan::MultiMirror);
    assert!(engine.view().unwrap().terminal);
    assert!(matches!(engine.advance(), Err(LessonError::Finished)));
    assert_eq!(host.live(), 1);
}

#[test]
fn dropping_engine_unsubscribes() {
    let (host, engine) = start(LessonPlan::Full);
    drop(engine);
    assert_eq!(host.live(), 0);
}

#[test]
fn stale_sink_events_are_dropped() {
    let host = LeakyHost::default();
    let mut engine = Engine::start(host.clone(), core(LessonPlan::Full)).unwrap();
    host.drag(px(4, 6), px(7, 6));
    engine.check().unwrap();
    engine.advance().unwrap();
    assert_eq!(host.sinks.borrow().len(), 2);

    // Both sinks see the drag; only the stage-1 sink's binding is stale.
    host.drag(px(5, 10), px(2, 11));
    let core = engine.core().borrow();
    assert_eq!(core.lesson().entities().position("image"), Some(GridPoint::new(2, 11)));
    assert_eq!(core.lesson().index(), 1);
}

#[test]
fn subscription_failure_surfaces() {
    let err = Engine::start(BrokenHost, core(LessonPlan::Full)).err();
    assert!(matches!(err, Some(LessonError::Host(msg)) if msg == "no surface"));
}

#[test]
fn render_failure_on_start_surfaces() {
    let mut core = core(LessonPlan::Full);
    core.renderer.fail_with = Some(RenderError::Canvas("no 2d context".into()));
    let err = Engine::start(FakeHost::default(), core).err();
    assert!(matches!(err, Some(LessonError::Render(RenderError::Canvas(_)))));
}

#[test]
fn redraw_failure_during_drag_is_logged_not_fatal() {
    let host = FakeHost::default();
    let engine = Engine::start(host.clone(), core(LessonPlan::Full)).unwrap();
    engine.core().borrow_mut().renderer.fail_with = Some(RenderError::Canvas("gone".into()));
    host.drag(px(4, 6), px(8, 6));
    // Position committed before the failed redraw.
    assert_eq!(position(&engine, "point"), Some(GridPoint::new(8, 6)));
    assert_eq!(host.live(), 1);
}

#[test]
fn last_frame_matches_stage_after_advance() {
    let (host, mut engine) = start(LessonPlan::Full);
    host.drag(px(4, 6), px(7, 6));
    engine.check().unwrap();
    engine.advance().unwrap();
    let core = engine.core().borrow();
    let frame = core.renderer().last_frame();
    assert_eq!(frame.first(), Some(&DrawCall::Clear));
    assert_eq!(frame.get(1), Some(&DrawCall::Grid));
    assert!(!frame.iter().any(|c| matches!(c, DrawCall::Marker(_))));
}

#[test]
fn render_failure_on_advance_still_subscribes_new_stage() {
    let (host, mut engine) = start(LessonPlan::Full);
    host.drag(px(4, 6), px(7, 6));
    engine.check().unwrap();
    engine.advance().unwrap();
    host.drag(px(5, 10), px(2, 11));
    engine.check().unwrap();
    engine.advance().unwrap();

    engine.core().borrow_mut().renderer.fail_with = Some(RenderError::Canvas("lost".into()));
    let err = engine.advance().err();
    assert!(matches!(err, Some(LessonError::Render(RenderError::Canvas(_)))));
    assert_eq!(engine.core().borrow().lesson().index(), 3);
    assert_eq!(host.live(), 1);

    engine.core().borrow_mut().renderer.fail_with = None;
    host.drag(px(6, 10), px(5, 10));
    assert_eq!(position(&engine, "eye"), Some(GridPoint::new(5, 10)));
}
