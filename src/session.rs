//! Offline playback of a [`Scene`]: mounts the configured engines on a host, replays the pointer
//! script and composites every layer into output frames.

use crate::circuit::CircuitEngine;
use crate::config::Palette;
use crate::controller::Controller;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange, Point, Viewport};
use crate::foundation::error::{FxError, FxResult};
use crate::foundation::rng::Rng64;
use crate::host::{Host, HostClient, HostEvent};
use crate::overlay::{NoiseOverlay, ScanlineOverlay};
use crate::render::{FrameRGBA, Surface};
use crate::scene::{Scene, ScriptEvent};
use crate::wave::WaveEngine;

const CIRCUIT_STREAM: u64 = 1;
const WAVE_STREAM: u64 = 2;

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames delivered to the sink.
    pub frames_total: u64,
    /// Frames simulated without output to reach the start of the range.
    pub frames_skipped: u64,
    /// Listener invocations across all pumps.
    pub events_delivered: u64,
}

/// Stateful renderer for one scene.
///
/// The simulation only moves forward: frames are produced in order, and asking for an earlier
/// frame replays the scene from the start with the same seed.
pub struct RenderSession {
    scene: Scene,
    script: Vec<ScriptEvent>,
    cursor: usize,
    next_frame: u64,
    host: Host,
    circuit: Option<Controller<CircuitEngine>>,
    wave: Option<Controller<WaveEngine>>,
    noise: Option<NoiseOverlay>,
    scanlines: Option<ScanlineOverlay>,
    output: Surface,
    events_delivered: u64,
}

impl std::fmt::Debug for RenderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSession")
            .field("next_frame", &self.next_frame)
            .field("circuit", &self.circuit)
            .field("wave", &self.wave)
            .finish_non_exhaustive()
    }
}

impl RenderSession {
    /// Validate `scene` and mount its layers on a fresh host.
    pub fn new(scene: &Scene) -> FxResult<Self> {
        scene.validate()?;
        let mut host = Host::new(scene.viewport, scene.fps);

        let circuit = match &scene.circuit {
            Some(cfg) => {
                let rng = Rng64::fork(scene.seed, CIRCUIT_STREAM);
                let mut c = Controller::new(CircuitEngine::new(cfg.clone(), Box::new(rng)));
                c.start(&mut host)?;
                Some(c)
            }
            None => None,
        };
        let wave = match &scene.wave {
            Some(cfg) => {
                let rng = Rng64::fork(scene.seed, WAVE_STREAM);
                let mut w = Controller::new(WaveEngine::new(cfg.clone(), Box::new(rng)));
                w.start(&mut host)?;
                Some(w)
            }
            None => None,
        };

        let mut script = scene.pointer.clone();
        script.sort_by_key(ScriptEvent::frame);

        Ok(Self {
            scene: scene.clone(),
            script,
            cursor: 0,
            next_frame: 0,
            host,
            circuit,
            wave,
            noise: scene.noise.clone().map(NoiseOverlay::new),
            scanlines: scene.scanlines.clone().map(ScanlineOverlay::new),
            output: Surface::new(scene.viewport),
            events_delivered: 0,
        })
    }

    /// The scene being played.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Index of the next frame [`RenderSession::advance`] will produce.
    pub fn next_frame(&self) -> FrameIndex {
        FrameIndex(self.next_frame)
    }

    /// The mounted circuit controller, if any.
    pub fn circuit(&self) -> Option<&Controller<CircuitEngine>> {
        self.circuit.as_ref()
    }

    /// The mounted wave controller, if any.
    pub fn wave(&self) -> Option<&Controller<WaveEngine>> {
        self.wave.as_ref()
    }

    /// Render a single frame, replaying from the start if it lies in the past.
    pub fn render_frame(&mut self, frame: FrameIndex) -> FxResult<FrameRGBA> {
        if frame.0 >= self.scene.duration {
            return Err(FxError::validation(
                "render_frame frame must be within scene duration",
            ));
        }
        self.seek(frame)?;
        self.advance()
    }

    /// Render a frame range and stream frames into a sink.
    ///
    /// The sink receives frames in strictly increasing frame index order. Frames before
    /// `range.start` are simulated but not composited.
    #[tracing::instrument(skip(self, sink), fields(start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &mut self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> FxResult<RenderStats> {
        if range.is_empty() {
            return Err(FxError::validation("render_range range must be non-empty"));
        }
        if range.end.0 > self.scene.duration {
            return Err(FxError::validation(
                "render_range range must be within scene duration",
            ));
        }

        let replay_from = if range.start.0 < self.next_frame {
            0
        } else {
            self.next_frame
        };
        let events_before = if replay_from == 0 && self.next_frame > 0 {
            0
        } else {
            self.events_delivered
        };
        self.seek(range.start)?;
        let mut stats = RenderStats {
            frames_skipped: range.start.0 - replay_from,
            ..RenderStats::default()
        };

        self.output.resize(self.host.viewport());
        sink.begin(SinkConfig {
            width: self.output.pixel_width(),
            height: self.output.pixel_height(),
            fps: self.scene.fps,
        })?;
        for idx in range.start.0..range.end.0 {
            let frame = self.advance()?;
            sink.push_frame(FrameIndex(idx), &frame)?;
            stats.frames_total += 1;
        }
        sink.end()?;

        stats.events_delivered = self.events_delivered.saturating_sub(events_before);
        tracing::debug!(frames = stats.frames_total, "range rendered");
        Ok(stats)
    }

    /// Produce the next frame.
    pub fn advance(&mut self) -> FxResult<FrameRGBA> {
        self.step()?;
        self.composite()?;
        Ok(self.output.to_frame())
    }

    fn seek(&mut self, frame: FrameIndex) -> FxResult<()> {
        if frame.0 < self.next_frame {
            tracing::debug!(frame = frame.0, "replaying scene from the start");
            *self = Self::new(&self.scene)?;
        }
        while self.next_frame < frame.0 {
            self.step()?;
        }
        Ok(())
    }

    // Dispatch this frame's script events and pump the host once.
    fn step(&mut self) -> FxResult<()> {
        let frame = self.next_frame;
        while let Some(ev) = self.script.get(self.cursor).copied() {
            if ev.frame() > frame {
                break;
            }
            self.cursor += 1;
            let event = match ev {
                ScriptEvent::Move { x, y, .. } => HostEvent::PointerMove(Point::new(x, y)),
                ScriptEvent::Leave { .. } => HostEvent::PointerLeave,
                ScriptEvent::Resize {
                    width, height, dpr, ..
                } => HostEvent::Resize(Viewport {
                    width,
                    height,
                    dpr: dpr.unwrap_or(self.host.viewport().dpr),
                }),
            };
            self.host.dispatch(event);
        }

        let mut clients: Vec<&mut dyn HostClient> = Vec::with_capacity(2);
        if let Some(c) = self.circuit.as_mut() {
            clients.push(c);
        }
        if let Some(w) = self.wave.as_mut() {
            clients.push(w);
        }
        let report = self.host.pump(&mut clients);
        self.events_delivered += report.events_delivered as u64;
        self.next_frame += 1;
        Ok(())
    }

    // circuit -> wave -> noise -> scanlines, over the palette background.
    fn composite(&mut self) -> FxResult<()> {
        self.output.resize(self.host.viewport());
        let background = self
            .scene
            .circuit
            .as_ref()
            .map_or_else(|| Palette::default().background, |c| c.palette.background);
        self.output.fill(background);

        if let Some(c) = &self.circuit {
            composite_layer(&mut self.output, c.surface(), c.layer_opacity())?;
        }
        if let Some(w) = &self.wave {
            composite_layer(&mut self.output, w.surface(), w.layer_opacity())?;
        }
        if let Some(noise) = self.noise.as_mut() {
            noise.apply(&mut self.output)?;
        }
        if let Some(scanlines) = &self.scanlines {
            let time_s = (self.next_frame.saturating_sub(1)) as f64 / self.scene.fps.as_f64();
            scanlines.apply(&mut self.output, time_s);
        }
        Ok(())
    }
}

// Layers that have not drawn at the current size yet are skipped.
fn composite_layer(output: &mut Surface, layer: &Surface, opacity: f64) -> FxResult<()> {
    if layer.is_empty() || layer.data().len() != output.data().len() {
        return Ok(());
    }
    output.composite_over(layer, opacity)
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
