use crate::config::CircuitConfig;
use crate::foundation::core::Point;
use crate::foundation::rng::RandomSource;

/// Largest CSS extent the builder lays a grid over; matches the rasterizer's `u16` limit.
const MAX_EXTENT: f64 = u16::MAX as f64;

/// A point in the circuit graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Position in CSS pixels.
    pub pos: Point,
    /// Undirected adjacency into the owning graph's node list.
    pub neighbors: Vec<usize>,
    /// Brightness driver in `[0, 1]`.
    pub energy: f64,
    /// Phase of the idle pulse, in radians.
    pub pulse_phase: f64,
}

/// Spatial node graph rebuilt from scratch on every resize.
///
/// Invariants (upheld by [`build_graph`]): every node has at least one neighbor, adjacency is
/// symmetric, and all indices are in range.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CircuitGraph {
    /// Surviving nodes.
    pub nodes: Vec<Node>,
    /// Grid spacing used to lay the nodes out.
    pub grid_size: f64,
}

impl CircuitGraph {
    /// Graph with no nodes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` when there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a node index, tolerating stale indices.
    pub fn node(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// Each undirected edge once, as `(lo, hi)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes.iter().enumerate().flat_map(|(i, n)| {
            n.neighbors
                .iter()
                .copied()
                .filter(move |&j| j > i)
                .map(move |j| (i, j))
        })
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }
}

struct Candidate {
    node: Node,
    row: usize,
    col: usize,
}

/// Lay out, connect and prune a circuit graph for a `width x height` CSS-pixel surface.
///
/// Surfaces narrower or shorter than one CSS pixel produce an empty graph. Deterministic for a
/// given random stream: the same seed gives the same graph.
#[tracing::instrument(skip(cfg, rng), fields(grid = cfg.grid_size()))]
pub fn build_graph<R: RandomSource + ?Sized>(
    width: f64,
    height: f64,
    cfg: &CircuitConfig,
    rng: &mut R,
) -> CircuitGraph {
    let tuning = &cfg.tuning;
    let grid = cfg.grid_size();
    let width = clamp_extent(width);
    let height = clamp_extent(height);
    if width < 1.0 || height < 1.0 || !grid.is_finite() {
        return CircuitGraph {
            nodes: Vec::new(),
            grid_size: grid,
        };
    }

    let cols = (width / grid).ceil() as usize + 1;
    let rows = (height / grid).ceil() as usize + 1;

    let mut cells: Vec<Option<usize>> = vec![None; rows * cols];
    let mut candidates: Vec<Candidate> = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let keep = (row + col) % 2 == 0 || rng.chance(tuning.odd_cell_keep);
            if !keep {
                continue;
            }
            let ox = (rng.next_f64() - 0.5) * grid * tuning.jitter;
            let oy = (rng.next_f64() - 0.5) * grid * tuning.jitter;
            let energy = rng.next_f64() * tuning.initial_energy;
            let pulse_phase = rng.angle();
            cells[row * cols + col] = Some(candidates.len());
            candidates.push(Candidate {
                node: Node {
                    pos: Point::new(col as f64 * grid + ox, row as f64 * grid + oy),
                    neighbors: Vec::new(),
                    energy,
                    pulse_phase,
                },
                row,
                col,
            });
        }
    }

    connect(&mut candidates, &cells, rows, cols, grid, cfg, rng);
    let nodes = prune_isolated(candidates.into_iter().map(|c| c.node).collect());

    let graph = CircuitGraph {
        nodes,
        grid_size: grid,
    };
    tracing::debug!(
        nodes = graph.len(),
        edges = graph.edge_count(),
        rows,
        cols,
        "built circuit graph"
    );
    graph
}

fn clamp_extent(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, MAX_EXTENT) } else { 0.0 }
}

/// Connect pairs closer than `connect_factor * grid`.
///
/// Each grid cell holds at most one node, so only cells within `reach` of each other can be
/// close enough; pairs are visited once with `j > i`.
fn connect<R: RandomSource + ?Sized>(
    candidates: &mut [Candidate],
    cells: &[Option<usize>],
    rows: usize,
    cols: usize,
    grid: f64,
    cfg: &CircuitConfig,
    rng: &mut R,
) {
    let tuning = &cfg.tuning;
    let max_dist = grid * tuning.connect_factor;
    let reach = (tuning.connect_factor + tuning.jitter).ceil().max(1.0) as isize;

    for i in 0..candidates.len() {
        let (row, col, pi) = {
            let c = &candidates[i];
            (c.row as isize, c.col as isize, c.node.pos)
        };
        for dr in -reach..=reach {
            let r = row + dr;
            if r < 0 || r >= rows as isize {
                continue;
            }
            for dc in -reach..=reach {
                let c = col + dc;
                if c < 0 || c >= cols as isize {
                    continue;
                }
                let Some(j) = cells[(r as usize) * cols + c as usize] else {
                    continue;
                };
                if j <= i {
                    continue;
                }
                let dist = pi.distance(candidates[j].node.pos);
                if dist < max_dist && rng.chance(tuning.edge_keep) {
                    candidates[i].node.neighbors.push(j);
                    candidates[j].node.neighbors.push(i);
                }
            }
        }
    }
}

/// Drop nodes without edges and remap adjacency into the surviving index space.
fn prune_isolated(nodes: Vec<Node>) -> Vec<Node> {
    let mut remap: Vec<Option<usize>> = Vec::with_capacity(nodes.len());
    let mut next = 0usize;
    for n in &nodes {
        if n.neighbors.is_empty() {
            remap.push(None);
        } else {
            remap.push(Some(next));
            next += 1;
        }
    }

    nodes
        .into_iter()
        .filter(|n| !n.neighbors.is_empty())
        .map(|mut n| {
            n.neighbors = n
                .neighbors
                .iter()
                .filter_map(|&old| remap.get(old).copied().flatten())
                .collect();
            n
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/circuit/graph.rs"]
mod tests;
