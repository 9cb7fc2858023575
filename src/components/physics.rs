//! Bubble physics on top of [`force_graph`].
//!
//! Every bubble is a graph node whose mass sets how hard it repels the
//! others. Each distinct target point is an anchored node, and a bubble is
//! tied to its target by a spring edge. Retargeting removes the old anchors
//! (their springs go with them) and wires up new ones.
//!
//! `force_graph` has no collision force, so layouts that need one run a
//! position pass after each update that pushes overlapping circles apart.
//! The graph also never cools, so a layout runs for a fixed number of ticks
//! after it is reheated and then stops.

use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

/// Seconds handed to [`ForceGraph::update`] per tick.
pub const TICK_SECONDS: f32 = 0.016;
/// Ticks a layout runs after being reheated.
pub const SETTLE_TICKS: u32 = 300;
const INITIAL_RADIUS: f64 = 10.0;

/// What a graph node stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Body {
	/// The bubble at this input index.
	Bubble(usize),
	/// A fixed target point.
	Anchor,
}

/// Starting state of one bubble.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BubbleBody {
	/// Starting x.
	pub x: f64,
	/// Starting y.
	pub y: f64,
	/// Used by the collision pass.
	pub radius: f64,
	/// Repulsion between two bubbles scales with the product of their masses.
	pub mass: f32,
}

/// Tunables of one bubble layout.
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
	/// Spring, charge, speed and damping of the graph.
	pub parameters: SimulationParameters,
	/// Push overlapping circles apart after each update.
	pub collide: bool,
	/// Ticks run after each reheat.
	pub settle_ticks: u32,
}

impl Default for PhysicsConfig {
	fn default() -> Self {
		Self {
			parameters: SimulationParameters {
				force_charge: 20.0,
				force_spring: 0.3,
				force_max: 280.0,
				node_speed: 7000.0,
				damping_factor: 0.9,
			},
			collide: false,
			settle_ticks: SETTLE_TICKS,
		}
	}
}

/// Linear congruential generator; deterministic source of jitter and
/// scattered initial positions.
#[derive(Clone, Debug)]
pub struct Lcg {
	state: u64,
}

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	/// Generator starting from `seed`.
	pub fn new(seed: u64) -> Self {
		Self {
			state: seed % Self::M,
		}
	}

	/// Next value in `[0, 1)`.
	pub fn next_f64(&mut self) -> f64 {
		self.state = (Self::A * self.state + Self::C) % Self::M;
		self.state as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

impl Default for Lcg {
	fn default() -> Self {
		Self::new(1)
	}
}

/// `len` points on a phyllotaxis spiral around `center`.
pub fn phyllotaxis(len: usize, center: (f64, f64)) -> Vec<(f64, f64)> {
	let angle_step = PI * (3.0 - 5f64.sqrt());
	(0..len)
		.map(|i| {
			let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
			let angle = i as f64 * angle_step;
			(center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
		})
		.collect()
}

/// A set of bubbles in a [`ForceGraph`], springing toward their targets.
pub struct BubblePhysics {
	graph: ForceGraph<Body>,
	bubbles: Vec<DefaultNodeIdx>,
	anchors: Vec<DefaultNodeIdx>,
	targets: Vec<(f64, f64)>,
	radii: Vec<f64>,
	positions: Vec<(f64, f64)>,
	collide: bool,
	settle_ticks: u32,
	ticks_left: u32,
	rng: Lcg,
}

impl BubblePhysics {
	/// Adds one graph node per body. Nothing moves until targets are set.
	pub fn new(config: PhysicsConfig, bodies: &[BubbleBody]) -> Self {
		let mut graph = ForceGraph::new(config.parameters);
		let bubbles = bodies
			.iter()
			.enumerate()
			.map(|(i, b)| {
				graph.add_node(NodeData {
					x: b.x as f32,
					y: b.y as f32,
					mass: b.mass,
					is_anchor: false,
					user_data: Body::Bubble(i),
				})
			})
			.collect();
		let mut physics = Self {
			graph,
			bubbles,
			anchors: Vec::new(),
			targets: Vec::new(),
			radii: bodies.iter().map(|b| b.radius).collect(),
			positions: vec![(0.0, 0.0); bodies.len()],
			collide: config.collide,
			settle_ticks: config.settle_ticks,
			ticks_left: 0,
			rng: Lcg::default(),
		};
		physics.read_positions();
		physics
	}

	/// Ties bubble `i` to `targets[i]` and reheats. Bubbles sharing a target
	/// share one anchor; bubbles past the end of `targets` float free.
	/// Unchanged targets keep their anchors.
	pub fn set_targets(&mut self, targets: Vec<(f64, f64)>) {
		if targets == self.targets && !self.anchors.is_empty() {
			self.reheat();
			return;
		}
		for anchor in self.anchors.drain(..) {
			self.graph.remove_node(anchor);
		}
		let mut placed: Vec<((f64, f64), DefaultNodeIdx)> = Vec::new();
		for (&bubble, &target) in self.bubbles.iter().zip(&targets) {
			let anchor = match placed.iter().find(|(t, _)| *t == target) {
				Some((_, idx)) => *idx,
				None => {
					let idx = self.graph.add_node(NodeData {
						x: target.0 as f32,
						y: target.1 as f32,
						mass: 0.0,
						is_anchor: true,
						user_data: Body::Anchor,
					});
					placed.push((target, idx));
					idx
				}
			};
			self.graph.add_edge(bubble, anchor, EdgeData::default());
		}
		self.anchors = placed.into_iter().map(|(_, idx)| idx).collect();
		self.targets = targets;
		debug!("bubble-charts: {} bubbles tied to {} anchors", self.bubbles.len(), self.anchor_count());
		self.reheat();
	}

	#[cfg(test)]
	pub(crate) fn targets(&self) -> &[(f64, f64)] {
		&self.targets
	}

	/// Number of anchored nodes in the graph.
	pub fn anchor_count(&self) -> usize {
		let mut count = 0;
		self.graph.visit_nodes(|node| {
			if node.data.user_data == Body::Anchor {
				count += 1;
			}
		});
		count
	}

	/// Runs for another full settle period.
	pub fn reheat(&mut self) {
		self.ticks_left = self.settle_ticks;
	}

	/// Whether [`step`](Self::step) still moves anything.
	pub fn is_running(&self) -> bool {
		self.ticks_left > 0
	}

	/// Advances one tick if running. Returns whether the layout is still live.
	pub fn step(&mut self) -> bool {
		if !self.is_running() {
			return false;
		}
		self.graph.update(TICK_SECONDS);
		self.read_positions();
		if self.collide {
			self.resolve_collisions();
		}
		self.ticks_left -= 1;
		self.ticks_left > 0
	}

	/// Bubble centers in input order.
	pub fn positions(&self) -> &[(f64, f64)] {
		&self.positions
	}

	fn read_positions(&mut self) {
		let positions = &mut self.positions;
		self.graph.visit_nodes(|node| {
			if let Body::Bubble(i) = node.data.user_data {
				if let Some(p) = positions.get_mut(i) {
					*p = (f64::from(node.x()), f64::from(node.y()));
				}
			}
		});
	}

	/// Moves overlapping pairs apart along the line between them. The
	/// smaller circle takes the larger share of the move.
	fn resolve_collisions(&mut self) {
		let len = self.positions.len();
		let mut moved = false;
		for i in 0..len {
			let ri = self.radii[i];
			for j in (i + 1)..len {
				let rj = self.radii[j];
				let r = ri + rj;
				let (xi, yi) = self.positions[i];
				let (xj, yj) = self.positions[j];
				let (mut dx, mut dy) = (xi - xj, yi - yj);
				let mut l = dx * dx + dy * dy;
				if l >= r * r {
					continue;
				}
				if l == 0.0 {
					dx = self.rng.jiggle();
					dy = self.rng.jiggle();
					l = dx * dx + dy * dy;
				}
				let dist = l.sqrt();
				let push = (r - dist) / dist;
				let (ri2, rj2) = (ri * ri, rj * rj);
				let share = if ri2 + rj2 > 0.0 { rj2 / (ri2 + rj2) } else { 0.5 };
				self.positions[i].0 += dx * push * share;
				self.positions[i].1 += dy * push * share;
				self.positions[j].0 -= dx * push * (1.0 - share);
				self.positions[j].1 -= dy * push * (1.0 - share);
				moved = true;
			}
		}
		if !moved {
			return;
		}
		let positions = &self.positions;
		self.graph.visit_nodes_mut(|node| {
			if let Body::Bubble(i) = node.data.user_data {
				if let Some(&(x, y)) = positions.get(i) {
					node.data.x = x as f32;
					node.data.y = y as f32;
				}
			}
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn body(x: f64, y: f64, radius: f64) -> BubbleBody {
		BubbleBody {
			x,
			y,
			radius,
			mass: 1.0,
		}
	}

	fn settle(physics: &mut BubblePhysics) -> u32 {
		let mut ticks = 1;
		while physics.step() {
			ticks += 1;
			assert!(ticks < 10_000, "layout never stopped");
		}
		ticks
	}

	fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
		((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
	}

	#[test]
	fn phyllotaxis_spreads_initial_positions() {
		let points = phyllotaxis(3, (100.0, 50.0));
		assert!((points[0].0 - (100.0 + INITIAL_RADIUS * 0.5f64.sqrt())).abs() < 1e-9);
		assert_eq!(points[0].1, 50.0);
		assert_ne!(points[1], points[2]);
	}

	#[test]
	fn idle_until_targets_are_set() {
		let mut physics = BubblePhysics::new(PhysicsConfig::default(), &[body(0.0, 0.0, 5.0)]);
		assert!(!physics.is_running());
		assert!(!physics.step());
		assert_eq!(physics.positions(), &[(0.0, 0.0)]);
	}

	#[test]
	fn runs_for_the_settle_period_after_each_reheat() {
		let mut physics = BubblePhysics::new(PhysicsConfig::default(), &[body(0.0, 0.0, 5.0)]);
		physics.set_targets(vec![(10.0, 10.0)]);
		assert_eq!(settle(&mut physics), SETTLE_TICKS);
		assert!(!physics.is_running());
		physics.reheat();
		assert!(physics.step());
		assert_eq!(settle(&mut physics), SETTLE_TICKS - 1);
	}

	#[test]
	fn spring_pulls_a_bubble_onto_its_anchor() {
		let mut physics = BubblePhysics::new(PhysicsConfig::default(), &[body(0.0, 0.0, 5.0)]);
		physics.set_targets(vec![(100.0, 50.0)]);
		settle(&mut physics);
		let p = physics.positions()[0];
		assert!(distance(p, (100.0, 50.0)) < 1.0, "ended at {p:?}");
	}

	#[test]
	fn shared_targets_share_one_anchor() {
		let bodies = [body(0.0, 0.0, 5.0), body(50.0, 0.0, 5.0), body(0.0, 50.0, 5.0)];
		let mut physics = BubblePhysics::new(PhysicsConfig::default(), &bodies);
		physics.set_targets(vec![(10.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
		assert_eq!(physics.anchor_count(), 2);
		physics.set_targets(vec![(5.0, 5.0); 3]);
		assert_eq!(physics.anchor_count(), 1);
		assert_eq!(physics.targets(), &[(5.0, 5.0); 3]);
		physics.set_targets(vec![(5.0, 5.0); 3]);
		assert_eq!(physics.anchor_count(), 1);
		assert!(physics.is_running());
	}

	#[test]
	fn retargeting_moves_bubbles_to_the_new_anchor() {
		let mut physics = BubblePhysics::new(PhysicsConfig::default(), &[body(0.0, 0.0, 5.0)]);
		physics.set_targets(vec![(-80.0, 0.0)]);
		settle(&mut physics);
		physics.set_targets(vec![(120.0, 40.0)]);
		settle(&mut physics);
		let p = physics.positions()[0];
		assert!(distance(p, (120.0, 40.0)) < 1.0, "ended at {p:?}");
		assert_eq!(physics.anchor_count(), 1);
	}

	#[test]
	fn charge_pushes_bubbles_apart() {
		let bodies = [body(0.0, 0.0, 1.0), body(5.0, 0.0, 1.0)];
		let mut physics = BubblePhysics::new(PhysicsConfig::default(), &bodies);
		physics.reheat();
		physics.step();
		assert!(physics.positions()[0].0 < 0.0);
		assert!(physics.positions()[1].0 > 5.0);
	}

	#[test]
	fn collision_separates_overlapping_circles() {
		let config = PhysicsConfig {
			collide: true,
			..PhysicsConfig::default()
		};
		let bodies = [body(0.0, 0.0, 10.0), body(1.0, 0.0, 10.0)];
		let mut physics = BubblePhysics::new(config, &bodies);
		physics.set_targets(vec![(0.0, 0.0); 2]);
		settle(&mut physics);
		let (a, b) = (physics.positions()[0], physics.positions()[1]);
		assert!(distance(a, b) > 19.9, "still overlapping at {}", distance(a, b));
	}

	#[test]
	fn lcg_is_deterministic_and_in_unit_range() {
		let mut a = Lcg::default();
		let mut b = Lcg::default();
		for _ in 0..100 {
			let v = a.next_f64();
			assert_eq!(v, b.next_f64());
			assert!((0.0..1.0).contains(&v));
		}
	}
}
