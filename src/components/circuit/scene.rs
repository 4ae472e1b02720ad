use std::collections::HashMap;

use super::rng::Rng;

/// Pitch of the candidate lattice, in CSS pixels.
pub const GRID_SPACING: f64 = 80.0;

const NODE_PROBABILITY: f64 = 0.3;
const JITTER: f64 = 10.0;
const TRACE_ACTIVE_PROBABILITY: f64 = 0.7;

/// Visual category, fixed at build time. Junctions are twice as common as
/// either other kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	Processor,
	Junction,
	Terminal,
}

impl NodeKind {
	fn pick(rng: &mut Rng) -> Self {
		match rng.index(4) {
			0 => NodeKind::Processor,
			3 => NodeKind::Terminal,
			_ => NodeKind::Junction,
		}
	}
}

/// A fixed point of the circuit graph.
#[derive(Clone, Debug)]
pub struct Node {
	pub x: f64,
	pub y: f64,
	/// Indices of connected nodes. Mutual: if `j` is here, this node is in
	/// `nodes[j].links`.
	pub links: Vec<usize>,
	/// Lit by packet arrival; never cleared while the scene lives.
	pub active: bool,
	/// Drives the pulsing brightness animation.
	pub phase: f64,
	pub size: f64,
	pub kind: NodeKind,
}

/// A routed connection between two nodes: start, one orthogonal bend, end.
#[derive(Clone, Debug)]
pub struct Trace {
	pub start: usize,
	pub end: usize,
	pub path: [(f64, f64); 3],
	pub active: bool,
	pub glow: f64,
}

impl Trace {
	/// Point at `progress` in `[0, 1]` along the two-segment path.
	pub fn point_at(&self, progress: f64) -> (f64, f64) {
		let t = progress.clamp(0.0, 1.0) * 2.0;
		let (seg, local) = if t < 1.0 {
			(0, t)
		} else {
			(1, (t - 1.0).min(1.0))
		};
		let (x0, y0) = self.path[seg];
		let (x1, y1) = self.path[seg + 1];
		(x0 + (x1 - x0) * local, y0 + (y1 - y0) * local)
	}
}

/// The static graph one mounted simulation runs over. Built once per
/// viewport/configuration; replaced wholesale on rebuild.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	pub nodes: Vec<Node>,
	pub traces: Vec<Trace>,
	by_pair: HashMap<(usize, usize), usize>,
}

fn pair_key(a: usize, b: usize) -> (usize, usize) {
	if a <= b { (a, b) } else { (b, a) }
}

impl Scene {
	/// Sample nodes over a jittered lattice and route traces between close
	/// pairs. A zero-area viewport yields an empty scene.
	pub fn build(width: f64, height: f64, rng: &mut Rng) -> Self {
		if width <= 0.0 || height <= 0.0 {
			return Self::default();
		}

		let mut nodes = Vec::new();
		// One extra cell of margin past each edge keeps the border populated
		// through small resizes until the rebuild lands.
		let cols = (width / GRID_SPACING).ceil() as i64 + 1;
		let rows = (height / GRID_SPACING).ceil() as i64 + 1;
		for row in -1..=rows {
			for col in -1..=cols {
				if !rng.chance(NODE_PROBABILITY) {
					continue;
				}
				nodes.push(Node {
					x: col as f64 * GRID_SPACING + rng.range_f64(-JITTER, JITTER),
					y: row as f64 * GRID_SPACING + rng.range_f64(-JITTER, JITTER),
					links: Vec::new(),
					active: false,
					phase: rng.range_f64(0.0, std::f64::consts::TAU),
					size: rng.range_f64(2.5, 5.0),
					kind: NodeKind::pick(rng),
				});
			}
		}
		if nodes.is_empty() {
			// The backdrop should never come up blank on a real viewport.
			nodes.push(Node {
				x: width / 2.0,
				y: height / 2.0,
				links: Vec::new(),
				active: false,
				phase: 0.0,
				size: 4.0,
				kind: NodeKind::Junction,
			});
		}

		let mut traces = Vec::new();
		let mut by_pair = HashMap::new();
		let min_dist = GRID_SPACING * 0.5;
		let max_dist = GRID_SPACING * 2.0;
		for i in 0..nodes.len() {
			let candidates: Vec<usize> = (0..nodes.len())
				.filter(|&j| j != i)
				.filter(|&j| {
					let d = distance(&nodes[i], &nodes[j]);
					d > min_dist && d < max_dist
				})
				.collect();
			if candidates.is_empty() {
				continue;
			}
			let picks = 1 + rng.index(3);
			for _ in 0..picks.min(candidates.len()) {
				let j = candidates[rng.index(candidates.len())];
				let key = pair_key(i, j);
				if by_pair.contains_key(&key) {
					continue;
				}
				let path = route(&nodes[i], &nodes[j], rng);
				by_pair.insert(key, traces.len());
				traces.push(Trace {
					start: i,
					end: j,
					path,
					active: rng.chance(TRACE_ACTIVE_PROBABILITY),
					glow: rng.range_f64(0.5, 1.0),
				});
				nodes[i].links.push(j);
				nodes[j].links.push(i);
			}
		}

		Self {
			nodes,
			traces,
			by_pair,
		}
	}

	/// The trace routed between `a` and `b`, in either orientation.
	pub fn trace_between(&self, a: usize, b: usize) -> Option<&Trace> {
		self.by_pair.get(&pair_key(a, b)).map(|&i| &self.traces[i])
	}
}

fn distance(a: &Node, b: &Node) -> f64 {
	let (dx, dy) = (a.x - b.x, a.y - b.y);
	(dx * dx + dy * dy).sqrt()
}

fn route(a: &Node, b: &Node, rng: &mut Rng) -> [(f64, f64); 3] {
	// One orthogonal bend, picked at random from the two possible corners.
	let bend = if rng.chance(0.5) { (a.x, b.y) } else { (b.x, a.y) };
	[(a.x, a.y), bend, (b.x, b.y)]
}
