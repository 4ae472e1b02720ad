use super::rng::Rng;
use super::scene::Scene;
use super::types::{Palette, SchemeKind};

const PACKET_TARGET: usize = 20;
const TRAIL_CAP: usize = 10;
const TRAIL_ALPHA: f64 = 0.5;
const SPARK_MAX_LIFE: u32 = 20;
const SPARK_SIZE: f64 = 3.0;
const PHASE_STEP: f64 = 0.04;
const SPAWN_ATTEMPTS: usize = 8;
const ACCENT_BIAS: f64 = 0.3;

/// One sample of a packet's recent path. Alpha is recomputed every tick so
/// the tail fades linearly toward the oldest point.
#[derive(Clone, Debug)]
pub struct TrailPoint {
	pub x: f64,
	pub y: f64,
	pub alpha: f64,
}

/// A pulse travelling along one trace, from `current` toward `target`.
#[derive(Clone, Debug)]
pub struct Packet {
	pub current: usize,
	pub target: usize,
	pub progress: f64,
	pub speed: f64,
	pub color: (u8, u8, u8),
	pub size: f64,
	pub trail: Vec<TrailPoint>,
}

/// A short arrival burst pinned to a node. Ages by one per tick and is
/// dropped the moment it reaches `max_life`.
#[derive(Clone, Debug)]
pub struct Spark {
	pub x: f64,
	pub y: f64,
	pub life: u32,
	pub max_life: u32,
	pub size: f64,
}

/// Everything that changes frame to frame. `tick` mutates it, the renderer
/// only reads it.
pub struct CircuitState {
	pub scene: Scene,
	pub packets: Vec<Packet>,
	pub sparks: Vec<Spark>,
	pub palette: Palette,
	pub width: f64,
	pub height: f64,
	rng: Rng,
}

impl CircuitState {
	pub fn new(width: f64, height: f64, scheme: SchemeKind, seed: u64) -> Self {
		let mut rng = Rng::new(seed);
		let scene = Scene::build(width, height, &mut rng);
		let mut state = Self {
			scene,
			packets: Vec::new(),
			sparks: Vec::new(),
			palette: scheme.palette(),
			width,
			height,
			rng,
		};
		state.fill_pool();
		state
	}

	/// Rebuild the scene for a new viewport and restart every entity from
	/// scratch. In-flight packets and sparks reference node indices of the
	/// old graph, so none of them survive.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.scene = Scene::build(width, height, &mut self.rng);
		self.packets.clear();
		self.sparks.clear();
		self.fill_pool();
	}

	fn fill_pool(&mut self) {
		while self.packets.len() < PACKET_TARGET {
			if !self.spawn_packet() {
				break;
			}
		}
	}

	/// Launch one packet from a random linked node. Gives up after a few
	/// attempts so a scene of isolated nodes cannot loop forever.
	fn spawn_packet(&mut self) -> bool {
		if self.scene.nodes.is_empty() {
			return false;
		}
		for _ in 0..SPAWN_ATTEMPTS {
			let current = self.rng.index(self.scene.nodes.len());
			let links = &self.scene.nodes[current].links;
			if links.is_empty() {
				continue;
			}
			let target = links[self.rng.index(links.len())];
			let color = if self.rng.chance(ACCENT_BIAS) {
				self.palette.accent
			} else {
				self.palette.primary
			};
			self.packets.push(Packet {
				current,
				target,
				progress: 0.0,
				speed: self.rng.range_f64(0.006, 0.018),
				color,
				size: self.rng.range_f64(1.5, 3.0),
				trail: Vec::new(),
			});
			return true;
		}
		false
	}

	fn spawn_spark(&mut self, node: usize) {
		let (x, y) = (self.scene.nodes[node].x, self.scene.nodes[node].y);
		self.sparks.push(Spark {
			x,
			y,
			life: 0,
			max_life: SPARK_MAX_LIFE,
			size: SPARK_SIZE,
		});
	}

	fn arrive(&mut self, node: usize) {
		let n = &mut self.scene.nodes[node];
		n.active = true;
		n.phase = 0.0;
		self.spawn_spark(node);
	}

	/// Advance the simulation by exactly one frame. Pure state mutation;
	/// nothing here touches the canvas.
	pub fn tick(&mut self) {
		for node in &mut self.scene.nodes {
			node.phase += PHASE_STEP;
		}

		// Sparks age before packets complete, so a burst spawned by an
		// arrival below still reads age zero at the end of this frame.
		self.sparks.retain_mut(|spark| {
			spark.life += 1;
			spark.life < spark.max_life
		});

		let mut arrivals = 0;
		let mut k = 0;
		while k < self.packets.len() {
			let (current, target, progress) = {
				let p = &self.packets[k];
				(p.current, p.target, p.progress)
			};
			let (x, y) = self.position_between(current, target, progress);
			{
				let p = &mut self.packets[k];
				p.trail.push(TrailPoint { x, y, alpha: 0.0 });
				if p.trail.len() > TRAIL_CAP {
					p.trail.remove(0);
				}
				let len = p.trail.len();
				for (idx, point) in p.trail.iter_mut().enumerate() {
					point.alpha = TRAIL_ALPHA * (idx + 1) as f64 / len as f64;
				}
				p.progress += p.speed;
			}
			if self.packets[k].progress >= 1.0 {
				let arrived_at = self.packets[k].target;
				self.packets.swap_remove(k);
				self.arrive(arrived_at);
				arrivals += 1;
				// The swapped-in packet lands at index k and still needs
				// this frame's advancement.
				continue;
			}
			k += 1;
		}
		// Replacements launch after the sweep so they end the frame at
		// progress zero with an empty trail.
		for _ in 0..arrivals {
			self.spawn_packet();
		}
	}

	/// Position of a packet `progress` of the way from `current` to
	/// `target`, following the routed trace in whichever orientation it was
	/// stored. Falls back to a straight line when no trace joins the pair.
	pub fn position_between(&self, current: usize, target: usize, progress: f64) -> (f64, f64) {
		if let Some(trace) = self.scene.trace_between(current, target) {
			let t = if trace.start == current {
				progress
			} else {
				// The lookup only returns traces joining the pair, so the
				// reversed orientation is the only other case.
				debug_assert_eq!(trace.end, current);
				1.0 - progress
			};
			return trace.point_at(t);
		}
		let a = &self.scene.nodes[current];
		let b = &self.scene.nodes[target];
		(a.x + (b.x - a.x) * progress, a.y + (b.y - a.y) * progress)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::circuit::scene::{Node, NodeKind};

	fn state() -> CircuitState {
		CircuitState::new(1280.0, 800.0, SchemeKind::Cyan, 42)
	}

	fn isolated_node(x: f64, y: f64) -> Node {
		Node {
			x,
			y,
			links: Vec::new(),
			active: false,
			phase: 0.0,
			size: 3.0,
			kind: NodeKind::Junction,
		}
	}

	#[test]
	fn pool_fills_to_target() {
		let state = state();
		assert_eq!(state.packets.len(), PACKET_TARGET);
	}

	#[test]
	fn packets_ride_real_edges() {
		let mut state = state();
		for _ in 0..10 {
			state.tick();
		}
		for packet in &state.packets {
			assert!(packet.current < state.scene.nodes.len());
			assert!(packet.target < state.scene.nodes.len());
			assert!(state.scene.nodes[packet.current].links.contains(&packet.target));
			assert!(packet.progress >= 0.0);
			assert!(packet.progress < 1.0);
		}
	}

	#[test]
	fn completion_replaces_packet_and_spawns_spark() {
		let mut state = state();
		state.sparks.clear();
		state.packets[0].progress = 0.999;
		state.packets[0].speed = 0.01;
		let arrived_at = state.packets[0].target;

		state.tick();

		assert_eq!(state.packets.len(), PACKET_TARGET);
		let replacement = state.packets.last().unwrap();
		assert_eq!(replacement.progress, 0.0);
		assert!(replacement.trail.is_empty());
		assert_eq!(state.sparks.len(), 1);
		assert_eq!(state.sparks[0].life, 0);
		assert!(state.scene.nodes[arrived_at].active);
		assert_eq!(state.scene.nodes[arrived_at].phase, 0.0);
	}

	#[test]
	fn spark_lives_exactly_twenty_frames() {
		let mut state = state();
		state.packets.clear();
		state.spawn_spark(0);

		// Visible at every age up to 19, gone on the frame age hits 20.
		for expected in 1..SPARK_MAX_LIFE {
			state.tick();
			assert_eq!(state.sparks.len(), 1);
			assert_eq!(state.sparks[0].life, expected);
		}

		state.tick();
		assert!(state.sparks.is_empty());
	}

	#[test]
	fn two_completions_in_one_frame_replace_both() {
		let mut state = state();
		state.sparks.clear();
		for k in 0..2 {
			state.packets[k].progress = 0.999;
			state.packets[k].speed = 0.01;
		}
		let targets = [state.packets[0].target, state.packets[1].target];

		state.tick();

		assert_eq!(state.packets.len(), PACKET_TARGET);
		assert_eq!(state.sparks.len(), 2);
		assert!(state.sparks.iter().all(|s| s.life == 0));
		for t in targets {
			assert!(state.scene.nodes[t].active);
		}
		// Swap-removal must not skip the packets it moves: every survivor
		// advanced exactly one step this frame, the replacements none.
		for packet in &state.packets[..PACKET_TARGET - 2] {
			assert_eq!(packet.progress, packet.speed);
		}
		for packet in &state.packets[PACKET_TARGET - 2..] {
			assert_eq!(packet.progress, 0.0);
			assert!(packet.trail.is_empty());
		}
	}

	#[test]
	fn long_run_holds_pool_and_edge_invariants() {
		let mut state = state();
		for _ in 0..2_000 {
			state.tick();
			assert_eq!(state.packets.len(), PACKET_TARGET);
			for packet in &state.packets {
				assert!(packet.progress >= 0.0);
				assert!(packet.progress < 1.0);
				assert!(packet.trail.len() <= TRAIL_CAP);
				assert!(state.scene.nodes[packet.current].links.contains(&packet.target));
			}
			for spark in &state.sparks {
				assert!(spark.life < spark.max_life);
			}
		}
	}

	#[test]
	fn trails_stay_capped_and_fade_toward_the_tail() {
		let mut state = state();
		for _ in 0..15 {
			state.tick();
		}
		for packet in &state.packets {
			assert!(packet.trail.len() <= TRAIL_CAP);
			assert!(!packet.trail.is_empty());
			for pair in packet.trail.windows(2) {
				assert!(pair[0].alpha < pair[1].alpha);
			}
			let newest = packet.trail.last().unwrap();
			assert!((newest.alpha - TRAIL_ALPHA).abs() < 1e-9);
		}
	}

	#[test]
	fn resize_rebuilds_scene_and_restarts_entities() {
		let mut state = state();
		for _ in 0..30 {
			state.tick();
		}
		state.resize(640.0, 480.0);
		assert!(state.sparks.is_empty());
		assert_eq!(state.packets.len(), PACKET_TARGET);
		for packet in &state.packets {
			assert_eq!(packet.progress, 0.0);
			assert!(packet.trail.is_empty());
		}
	}

	#[test]
	fn spawn_gives_up_on_isolated_nodes() {
		let mut state = state();
		let mut scene = Scene::default();
		scene.nodes.push(isolated_node(10.0, 10.0));
		scene.nodes.push(isolated_node(60.0, 60.0));
		state.scene = scene;
		state.packets.clear();

		assert!(!state.spawn_packet());
		state.fill_pool();
		assert!(state.packets.is_empty());
	}

	#[test]
	fn position_falls_back_to_a_straight_line() {
		let mut state = state();
		let mut scene = Scene::default();
		let mut a = isolated_node(0.0, 0.0);
		let mut b = isolated_node(10.0, 0.0);
		a.links.push(1);
		b.links.push(0);
		scene.nodes.push(a);
		scene.nodes.push(b);
		state.scene = scene;

		assert_eq!(state.position_between(0, 1, 0.5), (5.0, 0.0));
		assert_eq!(state.position_between(1, 0, 0.0), (10.0, 0.0));
	}

	#[test]
	fn position_respects_trace_orientation() {
		let state = state();
		let trace = &state.scene.traces[0];
		let (start, end) = (trace.start, trace.end);
		let start_pos = (state.scene.nodes[start].x, state.scene.nodes[start].y);
		let end_pos = (state.scene.nodes[end].x, state.scene.nodes[end].y);

		// Progress zero always sits on the departure node, whichever
		// orientation the trace was stored in.
		assert_eq!(state.position_between(start, end, 0.0), start_pos);
		assert_eq!(state.position_between(end, start, 0.0), end_pos);
	}

	#[test]
	fn zero_area_viewport_stays_inert() {
		let mut state = CircuitState::new(0.0, 0.0, SchemeKind::Green, 7);
		assert!(state.packets.is_empty());
		for _ in 0..5 {
			state.tick();
		}
		assert!(state.packets.is_empty());
		assert!(state.sparks.is_empty());
	}
}
