use super::*;
use crate::engine::EventKind;
use crate::foundation::core::{Fps, Point, Viewport};

#[derive(Default)]
struct Probe {
    ticks: Vec<f64>,
    renders: u32,
    moves: Vec<Point>,
    leaves: u32,
    sizes: Vec<Viewport>,
}

impl Engine for Probe {
    fn name(&self) -> &'static str {
        "probe"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[
            EventKind::PointerMove,
            EventKind::PointerLeave,
            EventKind::Resize,
        ]
    }

    fn resize(&mut self, viewport: Viewport) {
        self.sizes.push(viewport);
    }

    fn pointer_move(&mut self, pos: Point) {
        self.moves.push(pos);
    }

    fn pointer_leave(&mut self) {
        self.leaves += 1;
    }

    fn tick(&mut self, dt_ms: f64) {
        self.ticks.push(dt_ms);
    }

    fn render(&self, _surface: &mut Surface) -> FxResult<()> {
        Ok(())
    }
}

fn host() -> Host {
    Host::new(Viewport::new(40.0, 20.0).with_dpr(2.0), Fps::new(50, 1).unwrap())
}

#[test]
fn start_sizes_surface_and_draws_every_pump() {
    let mut h = host();
    let mut c = Controller::new(Probe::default());
    assert_eq!(c.state(), ControllerState::Uninitialized);
    c.start(&mut h).unwrap();
    assert_eq!(c.state(), ControllerState::Running);
    assert_eq!((c.surface().pixel_width(), c.surface().pixel_height()), (80, 40));
    assert_eq!(c.engine().sizes.len(), 1);
    assert_eq!(h.live_listeners(), 3);

    for _ in 0..4 {
        h.pump(&mut [&mut c]);
    }
    assert_eq!(c.stats().frames_drawn, 4);
    assert_eq!(c.engine().ticks, vec![20.0; 4]);
}

#[test]
fn input_is_forwarded_and_resizes_the_surface() {
    let mut h = host();
    let mut c = Controller::new(Probe::default());
    c.start(&mut h).unwrap();

    h.pointer_move(Point::new(1.0, 2.0));
    h.pointer_leave();
    h.resize(Viewport::new(10.0, 5.0));
    h.pump(&mut [&mut c]);

    assert_eq!(c.engine().moves, vec![Point::new(1.0, 2.0)]);
    assert_eq!(c.engine().leaves, 1);
    assert_eq!(c.engine().sizes.last(), Some(&Viewport::new(10.0, 5.0)));
    assert_eq!(c.surface().pixel_width(), 10);
    assert_eq!(c.stats().events_handled, 3);
}

#[test]
fn teardown_stops_draws_and_listeners() {
    let mut h = host();
    let mut c = Controller::new(Probe::default());
    c.start(&mut h).unwrap();
    h.pump(&mut [&mut c]);
    c.stop();
    c.stop();
    assert_eq!(c.state(), ControllerState::TornDown);

    let drawn = c.stats().frames_drawn;
    for _ in 0..5 {
        h.pointer_move(Point::new(5.0, 5.0));
        let report = h.pump(&mut [&mut c]);
        assert_eq!(report.events_delivered, 0);
        assert_eq!(report.frames_delivered, 0);
    }
    assert_eq!(c.stats().frames_drawn, drawn);
    assert!(c.engine().moves.is_empty());
    assert_eq!(h.live_listeners(), 0);
    assert_eq!(h.live_frame_requests(), 0);
}

#[test]
fn restart_after_teardown_is_rejected() {
    let mut h = host();
    let mut c = Controller::new(Probe::default());
    c.start(&mut h).unwrap();
    assert!(matches!(c.start(&mut h), Err(FxError::Lifecycle(_))));
    c.stop();
    assert!(matches!(c.start(&mut h), Err(FxError::Lifecycle(_))));
}

#[test]
fn dropping_a_controller_releases_its_registrations() {
    let mut h = host();
    {
        let mut c = Controller::new(Probe::default());
        c.start(&mut h).unwrap();
        assert_eq!(h.live_frame_requests(), 1);
    }
    assert_eq!(h.live_listeners(), 0);
    assert_eq!(h.live_frame_requests(), 0);
    assert_eq!(h.pump(&mut []), crate::host::PumpReport::default());
}

#[test]
fn stop_requested_during_a_frame_finishes_it_without_rerequesting() {
    struct Stopper {
        id: Option<ClientId>,
        target: StopHandle,
        _frame: Option<Registration>,
    }
    impl HostClient for Stopper {
        fn client_id(&self) -> Option<ClientId> {
            self.id
        }
        fn on_event(&mut self, _host: &mut Host, _event: &HostEvent) {}
        fn on_frame(&mut self, _host: &mut Host, _now_ms: f64) {
            self.target.request_stop();
        }
    }

    let mut h = host();
    let mut c = Controller::new(Probe::default());
    c.start(&mut h).unwrap();
    h.pump(&mut [&mut c]);
    assert_eq!(c.stats().frames_drawn, 1);

    // The controller's frame runs first in this pump; the stopper fires after it.
    let id = h.register_client();
    let mut s = Stopper {
        id: Some(id),
        target: c.stop_handle(),
        _frame: Some(h.request_frame(id)),
    };
    h.pump(&mut [&mut c, &mut s]);
    assert_eq!(c.stats().frames_drawn, 2);
    assert_eq!(c.state(), ControllerState::Running);

    // Next frame observes the request before drawing.
    h.pump(&mut [&mut c, &mut s]);
    assert_eq!(c.stats().frames_drawn, 2);
    assert_eq!(c.state(), ControllerState::TornDown);
    assert_eq!(h.pump(&mut [&mut c]).frames_delivered, 0);
}

#[test]
fn a_stop_requested_mid_frame_prevents_the_next_request() {
    struct SelfStopping {
        inner: Probe,
        handle: StopHandle,
    }
    impl Engine for SelfStopping {
        fn name(&self) -> &'static str {
            "self-stopping"
        }
        fn subscriptions(&self) -> &'static [EventKind] {
            &[]
        }
        fn resize(&mut self, viewport: Viewport) {
            self.inner.resize(viewport);
        }
        fn pointer_move(&mut self, _pos: Point) {}
        fn pointer_leave(&mut self) {}
        fn tick(&mut self, dt_ms: f64) {
            self.inner.tick(dt_ms);
            self.handle.request_stop();
        }
        fn render(&self, _surface: &mut Surface) -> FxResult<()> {
            Ok(())
        }
    }

    let handle = StopHandle::default();
    let mut h = host();
    let mut c = Controller::new(SelfStopping {
        inner: Probe::default(),
        handle: handle.clone(),
    });
    c.stop = handle;
    c.start(&mut h).unwrap();

    h.pump(&mut [&mut c]);
    assert_eq!(c.stats().frames_drawn, 1);
    assert_eq!(c.state(), ControllerState::TornDown);
    assert_eq!(h.live_frame_requests(), 0);
    assert_eq!(h.pump(&mut [&mut c]).frames_delivered, 0);
}
