use super::*;

#[derive(Default)]
struct Recorder {
    id: Option<ClientId>,
    events: Vec<HostEvent>,
    frames: Vec<f64>,
    rerequest: bool,
    held: Vec<Registration>,
}

impl HostClient for Recorder {
    fn client_id(&self) -> Option<ClientId> {
        self.id
    }

    fn on_event(&mut self, _host: &mut Host, event: &HostEvent) {
        self.events.push(*event);
    }

    fn on_frame(&mut self, host: &mut Host, now_ms: f64) {
        self.frames.push(now_ms);
        if self.rerequest {
            if let Some(id) = self.id {
                self.held.push(host.request_frame(id));
            }
        }
    }
}

fn host() -> Host {
    Host::new(Viewport::new(100.0, 50.0), Fps::new(50, 1).unwrap())
}

#[test]
fn clock_advances_one_frame_per_pump() {
    let mut h = host();
    assert_eq!(h.now_ms(), 0.0);
    h.pump(&mut []);
    h.pump(&mut []);
    assert!((h.now_ms() - 40.0).abs() < 1e-9);
}

#[test]
fn events_reach_matching_listeners_only() {
    let mut h = host();
    let mut r = Recorder::default();
    let id = h.register_client();
    r.id = Some(id);
    let _moves = h.subscribe(id, EventKind::PointerMove);

    h.pointer_move(Point::new(3.0, 4.0));
    h.pointer_leave();
    let report = h.pump(&mut [&mut r]);

    assert_eq!(report.events_delivered, 1);
    assert_eq!(r.events, vec![HostEvent::PointerMove(Point::new(3.0, 4.0))]);
}

#[test]
fn frame_requests_are_one_shot() {
    let mut h = host();
    let mut r = Recorder::default();
    let id = h.register_client();
    r.id = Some(id);
    let _frame = h.request_frame(id);

    assert_eq!(h.pump(&mut [&mut r]).frames_delivered, 1);
    assert_eq!(h.pump(&mut [&mut r]).frames_delivered, 0);
    assert_eq!(r.frames.len(), 1);
    assert_eq!(h.live_frame_requests(), 0);
}

#[test]
fn frames_requested_during_a_pump_run_on_the_next() {
    let mut h = host();
    let mut r = Recorder {
        rerequest: true,
        ..Recorder::default()
    };
    let id = h.register_client();
    r.id = Some(id);
    r.held.push(h.request_frame(id));

    for _ in 0..3 {
        assert_eq!(h.pump(&mut [&mut r]).frames_delivered, 1);
    }
    assert_eq!(r.frames.len(), 3);
    assert!(r.frames.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn released_registrations_are_never_invoked() {
    let mut h = host();
    let mut r = Recorder::default();
    let id = h.register_client();
    r.id = Some(id);
    let listener = h.subscribe(id, EventKind::PointerLeave);
    let frame = h.request_frame(id);
    listener.release();
    drop(frame);

    h.pointer_leave();
    let report = h.pump(&mut [&mut r]);
    assert_eq!(report, PumpReport::default());
    assert!(r.events.is_empty() && r.frames.is_empty());
    assert_eq!(h.live_listeners(), 0);
}

#[test]
fn events_are_delivered_before_frames() {
    struct Order(Option<ClientId>, Vec<&'static str>);
    impl HostClient for Order {
        fn client_id(&self) -> Option<ClientId> {
            self.0
        }
        fn on_event(&mut self, _host: &mut Host, _event: &HostEvent) {
            self.1.push("event");
        }
        fn on_frame(&mut self, _host: &mut Host, _now_ms: f64) {
            self.1.push("frame");
        }
    }

    let mut h = host();
    let id = h.register_client();
    let mut o = Order(Some(id), Vec::new());
    let _frame = h.request_frame(id);
    let _sub = h.subscribe(id, EventKind::Resize);
    h.resize(Viewport::new(10.0, 10.0));
    h.pump(&mut [&mut o]);
    assert_eq!(o.1, vec!["event", "frame"]);
    assert_eq!(h.viewport(), Viewport::new(10.0, 10.0));
}
