use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::FxResult;
use crate::render::Surface;

/// Host input an engine can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer moved over the surface.
    PointerMove,
    /// Pointer left the surface.
    PointerLeave,
    /// Viewport changed size or device pixel ratio.
    Resize,
}

/// An animated effect driven by a [`crate::Controller`].
///
/// Engines own their simulation state exclusively. `render` reads that state only, so rendering
/// the same state twice produces the same pixels.
pub trait Engine {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Input kinds the controller should register for.
    fn subscriptions(&self) -> &'static [EventKind];

    /// Rebuild size-dependent state for a new viewport.
    fn resize(&mut self, viewport: Viewport);

    /// Pointer moved to `pos` (CSS pixels relative to the surface).
    fn pointer_move(&mut self, pos: Point);

    /// Pointer left the surface.
    fn pointer_leave(&mut self);

    /// Advance one tick; `dt_ms` is the host time elapsed since the previous tick.
    fn tick(&mut self, dt_ms: f64);

    /// Paint the current state at full strength.
    fn render(&self, surface: &mut Surface) -> FxResult<()>;

    /// Alpha applied when the layer is composited.
    fn layer_opacity(&self) -> f64 {
        1.0
    }
}
