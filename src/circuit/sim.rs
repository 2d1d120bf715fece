use std::collections::VecDeque;

use crate::circuit::graph::CircuitGraph;
use crate::circuit::interact::{Pointer, activate_nearby};
use crate::config::CircuitConfig;
use crate::foundation::core::{Point, TICK_SECONDS};
use crate::foundation::rng::RandomSource;

/// Bounded history of recent packet positions, newest first.
#[derive(Clone, Debug, PartialEq)]
pub struct Trail {
    points: VecDeque<Point>,
    capacity: usize,
}

impl Trail {
    /// Empty trail holding at most `capacity` points.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record the newest position, evicting the oldest beyond capacity.
    pub fn push_front(&mut self, p: Point) {
        self.points.push_front(p);
        while self.points.len() > self.capacity {
            self.points.pop_back();
        }
    }

    /// Positions from newest to oldest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Point> + '_ {
        self.points.iter()
    }

    /// Number of stored positions.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return `true` when no positions are stored.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximum number of stored positions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget all positions.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Palette slot a packet is painted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketTone {
    /// Bright accent green.
    Accent,
    /// Dim trace green.
    Primary,
}

/// A unit of "data" travelling from one node to an adjacent node.
#[derive(Clone, Debug, PartialEq)]
pub struct Packet {
    /// Source node index.
    pub from: usize,
    /// Destination node index.
    pub to: usize,
    /// Position along the trace in `[0, 1]`.
    pub progress: f64,
    /// Progress added per tick.
    pub speed: f64,
    /// Paint slot.
    pub tone: PacketTone,
    /// Body edge length in CSS pixels.
    pub size: f64,
    /// Position computed on the last tick.
    pub pos: Point,
    /// Recent positions.
    pub trail: Trail,
}

/// Everything the circuit layer mutates from tick to tick.
///
/// Owned by exactly one engine instance; rendering only reads it.
#[derive(Clone, Debug)]
pub struct CircuitState {
    /// Current node graph.
    pub graph: CircuitGraph,
    /// Live packets.
    pub packets: Vec<Packet>,
    /// Last sampled pointer.
    pub pointer: Pointer,
    /// Animation time in seconds, advanced by a fixed step per tick.
    pub time: f64,
    /// Monotonic engine clock in milliseconds.
    pub clock_ms: f64,
    /// Engine clock at the last interaction-driven spawn.
    pub(crate) last_emit_ms: Option<f64>,
}

impl CircuitState {
    /// Fresh state over `graph` with no packets and an inactive pointer.
    pub fn new(graph: CircuitGraph) -> Self {
        Self {
            graph,
            packets: Vec::new(),
            pointer: Pointer::default(),
            time: 0.0,
            clock_ms: 0.0,
            last_emit_ms: None,
        }
    }

    /// Replace the graph, discarding every live packet (their indices would dangle).
    pub fn replace_graph(&mut self, graph: CircuitGraph) {
        self.graph = graph;
        self.packets.clear();
    }
}

/// Counters describing one tick, used for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Packets spawned by pointer interaction.
    pub emitted: usize,
    /// Packets spawned ambiently.
    pub ambient: usize,
    /// Packets that re-targeted on arrival.
    pub rerouted: usize,
    /// Packets removed (arrived without reroute, or dangling).
    pub removed: usize,
}

/// Position along the right-angle trace between `from` and `to` at `progress`.
///
/// The first half runs along the dominant axis to the midpoint; the second half closes the
/// remaining offset to the destination.
pub fn trace_point(from: Point, to: Point, progress: f64) -> Point {
    let mid = from.midpoint(to);
    if (from.x - to.x).abs() > (from.y - to.y).abs() {
        if progress < 0.5 {
            let t = progress * 2.0;
            Point::new(from.x + (mid.x - from.x) * t, from.y)
        } else {
            let t = (progress - 0.5) * 2.0;
            Point::new(mid.x + (to.x - mid.x) * t, from.y + (to.y - from.y) * t)
        }
    } else if progress < 0.5 {
        let t = progress * 2.0;
        Point::new(from.x, from.y + (mid.y - from.y) * t)
    } else {
        let t = (progress - 0.5) * 2.0;
        Point::new(from.x + (to.x - from.x) * t, mid.y + (to.y - mid.y) * t)
    }
}

/// Spawn a packet leaving `node_idx` toward a random neighbor.
///
/// Refused when the packet cap is reached, the index is stale, or the node has no neighbors.
pub fn spawn_packet_from<R: RandomSource + ?Sized>(
    graph: &CircuitGraph,
    packets: &mut Vec<Packet>,
    cfg: &CircuitConfig,
    node_idx: usize,
    rng: &mut R,
) -> bool {
    if packets.len() >= cfg.packet_cap() {
        tracing::trace!(cap = cfg.packet_cap(), "packet cap reached");
        return false;
    }
    let Some(node) = graph.node(node_idx) else {
        return false;
    };
    if node.neighbors.is_empty() {
        return false;
    }

    let tuning = &cfg.tuning;
    let to = node.neighbors[rng.index(node.neighbors.len())];
    let speed = rng.span(tuning.packet_speed_min, tuning.packet_speed_span) * cfg.speed;
    let tone = if rng.chance(tuning.accent_ratio) {
        PacketTone::Accent
    } else {
        PacketTone::Primary
    };
    let size = rng.span(tuning.packet_size_min, tuning.packet_size_span);
    packets.push(Packet {
        from: node_idx,
        to,
        progress: 0.0,
        speed,
        tone,
        size,
        pos: node.pos,
        trail: Trail::new(tuning.trail_capacity),
    });
    true
}

/// Spawn a packet from a uniformly random node.
pub fn spawn_random_packet<R: RandomSource + ?Sized>(
    state: &mut CircuitState,
    cfg: &CircuitConfig,
    rng: &mut R,
) -> bool {
    if state.graph.is_empty() {
        return false;
    }
    let idx = rng.index(state.graph.len());
    spawn_packet_from(&state.graph, &mut state.packets, cfg, idx, rng)
}

/// Advance the circuit by one tick.
///
/// Order: pointer activation, packet motion/trails/endpoint boosts/arrival, energy decay,
/// ambient spawn.
pub fn tick<R: RandomSource + ?Sized>(
    state: &mut CircuitState,
    cfg: &CircuitConfig,
    dt_ms: f64,
    rng: &mut R,
) -> TickReport {
    let mut report = TickReport::default();
    if dt_ms.is_finite() && dt_ms > 0.0 {
        state.clock_ms += dt_ms;
    }
    state.time += TICK_SECONDS;

    if state.pointer.active {
        report.emitted = activate_nearby(state, cfg, rng);
    }

    advance_packets(state, cfg, rng, &mut report);

    let decay = cfg.tuning.energy_decay;
    for node in &mut state.graph.nodes {
        node.energy *= decay;
    }

    if rng.chance(cfg.ambient_spawn_probability()) && spawn_random_packet(state, cfg, rng) {
        report.ambient += 1;
    }

    report
}

fn advance_packets<R: RandomSource + ?Sized>(
    state: &mut CircuitState,
    cfg: &CircuitConfig,
    rng: &mut R,
    report: &mut TickReport,
) {
    let tuning = &cfg.tuning;
    let CircuitState { graph, packets, .. } = state;

    packets.retain_mut(|p| {
        p.progress = (p.progress + p.speed).min(1.0);

        let (Some(from), Some(to)) = (graph.node(p.from), graph.node(p.to)) else {
            report.removed += 1;
            return false;
        };
        p.pos = trace_point(from.pos, to.pos, p.progress);
        p.trail.push_front(p.pos);

        if p.progress < 0.1 {
            let e = &mut graph.nodes[p.from].energy;
            *e = (*e + tuning.endpoint_boost).min(1.0);
        }
        if p.progress > 0.9 {
            let e = &mut graph.nodes[p.to].energy;
            *e = (*e + tuning.endpoint_boost).min(1.0);
        }

        if p.progress < 1.0 {
            return true;
        }

        let next: Vec<usize> = graph.nodes[p.to]
            .neighbors
            .iter()
            .copied()
            .filter(|&c| c != p.from)
            .collect();
        if !next.is_empty() && rng.chance(tuning.reroute) {
            p.from = p.to;
            p.to = next[rng.index(next.len())];
            p.progress = 0.0;
            p.trail.clear();
            report.rerouted += 1;
            true
        } else {
            report.removed += 1;
            false
        }
    });
}

#[cfg(test)]
#[path = "../../tests/unit/circuit/sim.rs"]
mod tests;
