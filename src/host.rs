//! Single-threaded frame and input scheduler.
//!
//! The host owns the viewport, a monotonic clock and a queue of pending input. Clients register
//! listeners and one-shot frame requests and receive callbacks only from [`Host::pump`]. Every
//! registration is backed by a shared liveness flag; once released, the host never invokes it
//! again and prunes it on the next pump.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::engine::EventKind;
use crate::foundation::core::{Fps, Point, Viewport};

/// Identity of a registered client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

/// Input delivered to listeners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// Pointer moved to a position in CSS pixels.
    PointerMove(Point),
    /// Pointer left the surface.
    PointerLeave,
    /// Viewport changed.
    Resize(Viewport),
}

impl HostEvent {
    /// Listener kind this event is delivered to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerMove(_) => EventKind::PointerMove,
            Self::PointerLeave => EventKind::PointerLeave,
            Self::Resize(_) => EventKind::Resize,
        }
    }
}

/// Handle to a listener or frame request; releasing it cancels the registration.
#[derive(Debug)]
pub struct Registration {
    alive: Rc<Cell<bool>>,
}

impl Registration {
    fn new() -> (Self, Rc<Cell<bool>>) {
        let alive = Rc::new(Cell::new(true));
        (
            Self {
                alive: Rc::clone(&alive),
            },
            alive,
        )
    }

    /// Cancel the registration. Idempotent.
    pub fn release(&self) {
        self.alive.set(false);
    }

    /// Return `true` until released.
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.release();
    }
}

/// Receiver of host callbacks.
pub trait HostClient {
    /// Identity assigned by [`Host::register_client`], if mounted.
    fn client_id(&self) -> Option<ClientId>;

    /// Deliver one input event.
    fn on_event(&mut self, host: &mut Host, event: &HostEvent);

    /// Deliver a frame callback at host time `now_ms`.
    fn on_frame(&mut self, host: &mut Host, now_ms: f64);
}

#[derive(Clone, Debug)]
struct Listener {
    client: ClientId,
    kind: EventKind,
    alive: Rc<Cell<bool>>,
}

#[derive(Clone, Debug)]
struct FrameRequest {
    client: ClientId,
    alive: Rc<Cell<bool>>,
}

/// Counters for one [`Host::pump`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Listener invocations.
    pub events_delivered: usize,
    /// Frame callbacks invoked.
    pub frames_delivered: usize,
}

/// The frame/event scheduler standing in for a browser window.
#[derive(Debug)]
pub struct Host {
    viewport: Viewport,
    fps: Fps,
    clock_ms: f64,
    next_client: u64,
    pending: VecDeque<HostEvent>,
    listeners: Vec<Listener>,
    frames: Vec<FrameRequest>,
}

impl Host {
    /// Create a host with a clock at zero.
    pub fn new(viewport: Viewport, fps: Fps) -> Self {
        Self {
            viewport,
            fps,
            clock_ms: 0.0,
            next_client: 0,
            pending: VecDeque::new(),
            listeners: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frame rate the clock advances at.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Host time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Allocate a client identity.
    pub fn register_client(&mut self) -> ClientId {
        let id = ClientId(self.next_client);
        self.next_client += 1;
        id
    }

    /// Register a listener for `kind` events.
    pub fn subscribe(&mut self, client: ClientId, kind: EventKind) -> Registration {
        let (reg, alive) = Registration::new();
        self.listeners.push(Listener {
            client,
            kind,
            alive,
        });
        reg
    }

    /// Request one frame callback on the next pump.
    pub fn request_frame(&mut self, client: ClientId) -> Registration {
        let (reg, alive) = Registration::new();
        self.frames.push(FrameRequest { client, alive });
        reg
    }

    /// Queue an input event for the next pump.
    pub fn dispatch(&mut self, event: HostEvent) {
        if let HostEvent::Resize(vp) = event {
            self.viewport = vp;
        }
        self.pending.push_back(event);
    }

    /// Queue a pointer move.
    pub fn pointer_move(&mut self, pos: Point) {
        self.dispatch(HostEvent::PointerMove(pos));
    }

    /// Queue a pointer leave.
    pub fn pointer_leave(&mut self) {
        self.dispatch(HostEvent::PointerLeave);
    }

    /// Change the viewport and queue a resize event.
    pub fn resize(&mut self, viewport: Viewport) {
        self.dispatch(HostEvent::Resize(viewport));
    }

    /// Number of live listeners.
    pub fn live_listeners(&self) -> usize {
        self.listeners.iter().filter(|l| l.alive.get()).count()
    }

    /// Number of live frame requests.
    pub fn live_frame_requests(&self) -> usize {
        self.frames.iter().filter(|f| f.alive.get()).count()
    }

    /// Run one host frame: advance the clock, deliver all queued events to completion, then
    /// invoke the frame requests that were pending when the pump began.
    ///
    /// Frames requested during the pump run on the next one. Released registrations are skipped
    /// and pruned.
    pub fn pump(&mut self, clients: &mut [&mut dyn HostClient]) -> PumpReport {
        let mut report = PumpReport::default();
        self.clock_ms += self.fps.frame_duration_ms();

        while let Some(event) = self.pending.pop_front() {
            let targets: Vec<Listener> = self
                .listeners
                .iter()
                .filter(|l| l.kind == event.kind() && l.alive.get())
                .cloned()
                .collect();
            for l in targets {
                if !l.alive.get() {
                    continue;
                }
                if let Some(client) = find_client(clients, l.client) {
                    client.on_event(self, &event);
                    report.events_delivered += 1;
                }
            }
        }

        let now = self.clock_ms;
        let frames = std::mem::take(&mut self.frames);
        for f in frames {
            if !f.alive.get() {
                continue;
            }
            // One-shot: consumed whether or not the client is present.
            f.alive.set(false);
            if let Some(client) = find_client(clients, f.client) {
                client.on_frame(self, now);
                report.frames_delivered += 1;
            }
        }

        self.listeners.retain(|l| l.alive.get());
        self.frames.retain(|f| f.alive.get());
        report
    }
}

fn find_client<'a, 'b>(
    clients: &'a mut [&'b mut dyn HostClient],
    id: ClientId,
) -> Option<&'a mut (dyn HostClient + 'b)> {
    clients
        .iter_mut()
        .find(|c| c.client_id() == Some(id))
        .map(|c| &mut **c)
}

#[cfg(test)]
#[path = "../tests/unit/host.rs"]
mod tests;
