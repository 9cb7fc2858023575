//! Node construction, grouping and physics state for the force chart.
//!
//! Each bubble springs toward an anchor on the vertical middle of the canvas:
//! the chart center, its year's center or its impact level's center. Node
//! mass is the radius, so bubbles repel in proportion to their sizes.
//! Switching grouping re-points the springs at new anchors and reheats.

use log::warn;

use super::types::{ForceNode, GrantRecord};
use crate::components::scale::{OrdinalScale, PowScale, ease_cubic_in_out, max_magnitude};
use crate::components::physics::{BubbleBody, BubblePhysics, Lcg, PhysicsConfig};
use crate::components::theme::{Color, IMPACT_COLORS};
use crate::components::tooltip::TooltipContent;
use crate::error::Dimensions;

/// A named group's pull target and title position.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupAnchor {
	/// Year or impact level this group collects.
	pub key: String,
	/// Where its bubbles are pulled.
	pub center_x: f64,
	/// Where its title is drawn.
	pub title_x: f64,
}

impl GroupAnchor {
	fn new(key: &str, center_x: f64, title_x: f64) -> Self {
		Self {
			key: key.to_string(),
			center_x,
			title_x,
		}
	}
}

/// Tunables of the force chart. [`BubbleForceConfig::new`] gives the
/// standard three-year, three-impact layout for a canvas size.
#[derive(Clone, Debug)]
pub struct BubbleForceConfig {
	/// Stiffness of the spring between a bubble and its anchor.
	pub spring: f32,
	/// Repulsion between bubbles, scaled by the product of their radii.
	pub charge: f32,
	/// Share of velocity kept each tick.
	pub damping: f32,
	/// Smallest and largest bubble radius.
	pub radius_range: (f64, f64),
	/// Initial positions are scattered over `[0, w) x [0, h)`.
	pub scatter: (f64, f64),
	/// Baseline of the group titles.
	pub title_y: f64,
	/// Duration of the radius grow-in, in milliseconds.
	pub grow_in_ms: f64,
	/// Groups for [`GroupMode::Year`].
	pub years: Vec<GroupAnchor>,
	/// Groups for [`GroupMode::Impact`].
	pub impacts: Vec<GroupAnchor>,
}

impl BubbleForceConfig {
	/// Standard layout for a canvas of `dims`.
	pub fn new(dims: Dimensions) -> Self {
		let w = dims.width;
		Self {
			spring: 0.3,
			charge: 40.0,
			damping: 0.9,
			radius_range: (2.0, 85.0),
			scatter: (900.0, 800.0),
			title_y: 40.0,
			grow_in_ms: 2000.0,
			years: vec![
				GroupAnchor::new("2008", w / 3.0, 160.0),
				GroupAnchor::new("2009", w / 2.0, w / 2.0),
				GroupAnchor::new("2010", 2.0 * w / 3.0, w - 160.0),
			],
			impacts: vec![
				GroupAnchor::new("low", w / 3.0, 160.0),
				GroupAnchor::new("medium", w / 2.0, w / 3.0),
				GroupAnchor::new("high", 2.0 * w / 3.0, w / 1.5),
			],
		}
	}
}

/// Converts raw records into bubbles, largest first so small bubbles are
/// drawn on top.
///
/// Radius follows a square-root scale from `0` to the largest amount onto
/// `config.radius_range`. Starting positions are drawn from `rng`.
pub fn create_nodes(records: &[GrantRecord], config: &BubbleForceConfig, rng: &mut Lcg) -> Vec<ForceNode> {
	let max_amount = max_magnitude(records.iter().map(|r| r.total_amount));
	let radius_scale = PowScale::sqrt((0.0, max_amount), config.radius_range);

	let mut nodes: Vec<ForceNode> = records
		.iter()
		.map(|r| ForceNode {
			id: r.id.clone(),
			radius: radius_scale.scale(r.total_amount).max(0.0),
			value: r.total_amount,
			name: r.grant_title.clone(),
			org: r.organization.clone(),
			group: r.group.clone(),
			year: r.start_year.clone(),
			initial: (rng.next_f64() * config.scatter.0, rng.next_f64() * config.scatter.1),
		})
		.collect();
	nodes.sort_by(|a, b| b.value.total_cmp(&a.value));
	nodes
}

/// Which centers the bubbles are pulled toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupMode {
	/// Everything around the chart center.
	#[default]
	All,
	/// One cluster per start year.
	Year,
	/// One cluster per impact level.
	Impact,
}

/// A group heading drawn above its cluster, horizontally centered on `x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Title {
	/// Group key.
	pub text: String,
	/// Horizontal center.
	pub x: f64,
	/// Baseline.
	pub y: f64,
}

/// Running state of a mounted force chart.
pub struct BubbleForceState {
	/// Canvas size.
	pub dims: Dimensions,
	/// Layout tunables.
	pub config: BubbleForceConfig,
	/// Bubbles, largest first.
	pub nodes: Vec<ForceNode>,
	/// One graph node per bubble, in `nodes` order.
	pub physics: BubblePhysics,
	/// Grouping last applied.
	pub mode: GroupMode,
	/// Bubble under the pointer.
	pub hovered: Option<usize>,
	/// `(fill, stroke)` per node.
	colors: Vec<(Color, Color)>,
	fill_scale: OrdinalScale<Color>,
	grow_elapsed_ms: f64,
	rng: Lcg,
}

impl BubbleForceState {
	/// An empty chart with idle physics; call [`chart`](Self::chart) to bind
	/// data.
	pub fn new(dims: Dimensions, config: BubbleForceConfig) -> Self {
		let fill_scale = OrdinalScale::with_domain(
			IMPACT_COLORS.iter().map(|(k, _)| *k),
			IMPACT_COLORS.iter().map(|(_, c)| *c).collect(),
		);
		let mut state = Self {
			dims,
			config,
			nodes: Vec::new(),
			physics: BubblePhysics::new(PhysicsConfig::default(), &[]),
			mode: GroupMode::All,
			hovered: None,
			colors: Vec::new(),
			fill_scale,
			grow_elapsed_ms: 0.0,
			rng: Lcg::default(),
		};
		state.bind(Vec::new());
		state
	}

	/// Builds nodes from `records`, binds them to fresh idle physics and
	/// restarts the grow-in.
	pub fn chart(&mut self, records: &[GrantRecord]) {
		let nodes = create_nodes(records, &self.config, &mut self.rng);
		self.bind(nodes);
	}

	fn bind(&mut self, nodes: Vec<ForceNode>) {
		let mut config = PhysicsConfig::default();
		config.parameters.force_spring = self.config.spring;
		config.parameters.force_charge = self.config.charge;
		config.parameters.damping_factor = self.config.damping;
		let bodies: Vec<BubbleBody> = nodes
			.iter()
			.map(|n| BubbleBody {
				x: n.initial.0,
				y: n.initial.1,
				radius: n.radius,
				mass: n.radius as f32,
			})
			.collect();
		let physics = BubblePhysics::new(config, &bodies);

		self.colors = nodes
			.iter()
			.map(|n| (self.fill_color(&n.group), self.stroke_color(&n.group)))
			.collect();
		self.nodes = nodes;
		self.physics = physics;
		self.mode = GroupMode::All;
		self.hovered = None;
		self.grow_elapsed_ms = 0.0;
	}

	/// Fill for an impact level. Unknown levels get the next palette color.
	pub fn fill_color(&mut self, group: &str) -> Color {
		self.fill_scale
			.get(group)
			.unwrap_or(Color::rgb(128, 128, 128))
	}

	/// Outline for an impact level: the fill one step darker.
	pub fn stroke_color(&mut self, group: &str) -> Color {
		stroke_for(self.fill_color(group))
	}

	/// `(fill, stroke)` of bubble `index`.
	pub fn colors(&self, index: usize) -> Option<(Color, Color)> {
		self.colors.get(index).copied()
	}

	/// Dispatches to the grouping for `mode`.
	pub fn apply_mode(&mut self, mode: GroupMode) {
		match mode {
			GroupMode::All => self.group_bubbles(),
			GroupMode::Year => self.split_bubbles(),
			GroupMode::Impact => self.split_impact(),
		}
	}

	/// Pull every bubble to the chart center.
	pub fn group_bubbles(&mut self) {
		self.retarget(vec![self.dims.width / 2.0; self.nodes.len()]);
		self.mode = GroupMode::All;
	}

	/// Pull bubbles to their start year's center.
	pub fn split_bubbles(&mut self) {
		let targets = self.anchor_targets(GroupMode::Year);
		self.retarget(targets);
		self.mode = GroupMode::Year;
	}

	/// Pull bubbles to their impact level's center.
	pub fn split_impact(&mut self) {
		let targets = self.anchor_targets(GroupMode::Impact);
		self.retarget(targets);
		self.mode = GroupMode::Impact;
	}

	fn anchors(&self, mode: GroupMode) -> &[GroupAnchor] {
		match mode {
			GroupMode::All => &[],
			GroupMode::Year => &self.config.years,
			GroupMode::Impact => &self.config.impacts,
		}
	}

	fn anchor_targets(&self, mode: GroupMode) -> Vec<f64> {
		let anchors = self.anchors(mode);
		let fallback = self.dims.width / 2.0;
		let mut unplaced = 0usize;
		let targets = self
			.nodes
			.iter()
			.map(|n| {
				let key = match mode {
					GroupMode::Impact => &n.group,
					_ => &n.year,
				};
				anchors
					.iter()
					.find(|a| &a.key == key)
					.map(|a| a.center_x)
					.unwrap_or_else(|| {
						unplaced += 1;
						fallback
					})
			})
			.collect();
		if unplaced > 0 {
			warn!(
				"bubble-charts: {} bubble(s) have no {:?} center, keeping them in the middle",
				unplaced, mode
			);
		}
		targets
	}

	fn retarget(&mut self, xs: Vec<f64>) {
		let y = self.dims.height / 2.0;
		self.physics.set_targets(xs.into_iter().map(|x| (x, y)).collect());
	}

	/// Advances the grow-in by `dt_ms` and the physics by one tick.
	/// Returns whether anything is still animating.
	pub fn advance(&mut self, dt_ms: f64) -> bool {
		self.grow_elapsed_ms = (self.grow_elapsed_ms + dt_ms).min(self.config.grow_in_ms);
		let moving = self.physics.step();
		moving || self.grow_progress() < 1.0
	}

	/// Eased grow-in progress in `[0, 1]`.
	pub fn grow_progress(&self) -> f64 {
		if self.config.grow_in_ms <= 0.0 {
			return 1.0;
		}
		ease_cubic_in_out(self.grow_elapsed_ms / self.config.grow_in_ms)
	}

	/// Radius as currently drawn, including the grow-in.
	pub fn display_radius(&self, index: usize) -> f64 {
		self.nodes
			.get(index)
			.map_or(0.0, |n| n.radius * self.grow_progress())
	}

	/// Bubble centers in `nodes` order.
	pub fn positions(&self) -> &[(f64, f64)] {
		self.physics.positions()
	}

	/// Topmost bubble under `(x, y)`.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		self.positions()
			.iter()
			.enumerate()
			.rev()
			.find(|&(i, &(px, py))| {
				let (dx, dy) = (px - x, py - y);
				(dx * dx + dy * dy).sqrt() < self.display_radius(i)
			})
			.map(|(i, _)| i)
	}

	/// Marks the bubble under the pointer.
	pub fn set_hover(&mut self, index: Option<usize>) {
		self.hovered = index;
	}

	/// Title, impact and year of bubble `index`.
	pub fn tooltip_for(&self, index: usize) -> Option<TooltipContent> {
		let node = self.nodes.get(index)?;
		Some(TooltipContent::rows([
			("Title", node.name.as_str()),
			("Impact", node.group.as_str()),
			("Year", node.year.as_str()),
		]))
	}

	/// Group headings for the current mode.
	pub fn titles(&self) -> Vec<Title> {
		self.anchors(self.mode)
			.iter()
			.map(|a| Title {
				text: a.key.clone(),
				x: a.title_x,
				y: self.config.title_y,
			})
			.collect()
	}
}

fn stroke_for(fill: Color) -> Color {
	fill.darker(1.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	const DIMS: Dimensions = Dimensions {
		width: 960.0,
		height: 640.0,
	};

	fn grant(id: &str, amount: f64, group: &str, year: &str) -> GrantRecord {
		GrantRecord {
			id: id.into(),
			total_amount: amount,
			grant_title: format!("grant {id}"),
			organization: "org".into(),
			group: group.into(),
			start_year: year.into(),
		}
	}

	fn grants() -> Vec<GrantRecord> {
		vec![
			grant("a", 250_000.0, "low", "2008"),
			grant("b", 1_000_000.0, "high", "2010"),
			grant("c", 0.0, "medium", "2009"),
			grant("d", 40_000.0, "low", "2009"),
		]
	}

	fn charted() -> BubbleForceState {
		let mut state = BubbleForceState::new(DIMS, BubbleForceConfig::new(DIMS));
		state.chart(&grants());
		state
	}

	#[test]
	fn nodes_keep_ids_and_sort_descending() {
		let config = BubbleForceConfig::new(DIMS);
		let nodes = create_nodes(&grants(), &config, &mut Lcg::default());
		let mut ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["b", "a", "d", "c"]);
		ids.sort();
		assert_eq!(ids, ["a", "b", "c", "d"]);
		assert!(nodes.windows(2).all(|w| w[0].value > w[1].value));
	}

	#[test]
	fn radius_scale_maps_max_amount_to_85() {
		let config = BubbleForceConfig::new(DIMS);
		let nodes = create_nodes(&grants(), &config, &mut Lcg::default());
		assert!((nodes[0].radius - 85.0).abs() < 1e-9);
		assert!((nodes[3].radius - 2.0).abs() < 1e-9);
		assert!((nodes[1].radius - (2.0 + 83.0 * 0.5)).abs() < 1e-9);
	}

	#[test]
	fn negative_amounts_never_give_a_negative_radius() {
		let config = BubbleForceConfig::new(DIMS);
		let records = vec![grant("a", 1_000_000.0, "low", "2008"), grant("b", -1_000_000.0, "low", "2008")];
		let nodes = create_nodes(&records, &config, &mut Lcg::default());
		assert_eq!(nodes[1].id, "b");
		assert_eq!(nodes[1].radius, 0.0);
	}

	#[test]
	fn initial_positions_are_scattered_in_bounds() {
		let config = BubbleForceConfig::new(DIMS);
		let nodes = create_nodes(&grants(), &config, &mut Lcg::default());
		for n in &nodes {
			assert!((0.0..900.0).contains(&n.initial.0));
			assert!((0.0..800.0).contains(&n.initial.1));
		}
		assert_ne!(nodes[0].initial, nodes[1].initial);
	}

	#[test]
	fn chart_binds_idle_physics_at_the_scattered_positions() {
		let mut state = charted();
		assert_eq!(state.positions().len(), 4);
		assert!(!state.physics.is_running());
		let (x, y) = state.nodes[0].initial;
		let p = state.positions()[0];
		assert!((p.0 - x).abs() < 1e-3 && (p.1 - y).abs() < 1e-3);
		state.group_bubbles();
		assert!(state.physics.is_running());
		assert_eq!(state.physics.anchor_count(), 1);
	}

	#[test]
	fn split_targets_follow_year_and_impact_centers() {
		let mut state = charted();
		state.split_bubbles();
		// Sorted order: b (2010), a (2008), d (2009), c (2009).
		assert_eq!(
			state.physics.targets(),
			&[(640.0, 320.0), (320.0, 320.0), (480.0, 320.0), (480.0, 320.0)]
		);
		assert_eq!(state.physics.anchor_count(), 3);
		state.split_impact();
		// b high, a low, d low, c medium.
		assert_eq!(
			state.physics.targets(),
			&[(640.0, 320.0), (320.0, 320.0), (320.0, 320.0), (480.0, 320.0)]
		);
		assert_eq!(state.physics.anchor_count(), 3);
	}

	#[test]
	fn regrouping_is_repeatable() {
		let mut state = charted();
		for mode in [GroupMode::Year, GroupMode::Impact, GroupMode::All, GroupMode::Year, GroupMode::All] {
			state.apply_mode(mode);
			assert_eq!(state.mode, mode);
			assert!(state.physics.is_running());
		}
		assert_eq!(state.physics.targets(), &[(480.0, 320.0); 4]);
		assert_eq!(state.physics.anchor_count(), 1);
	}

	#[test]
	fn unknown_years_fall_back_to_the_center() {
		let mut state = BubbleForceState::new(DIMS, BubbleForceConfig::new(DIMS));
		state.chart(&[grant("x", 10.0, "low", "1999")]);
		state.split_bubbles();
		assert_eq!(state.physics.targets(), &[(480.0, 320.0)]);
	}

	#[test]
	fn year_split_separates_clusters() {
		let mut state = charted();
		state.split_bubbles();
		let mut guard = 0;
		while state.advance(16.0) {
			guard += 1;
			assert!(guard < 1000);
		}
		let x = |i: usize| state.positions()[i].0;
		// 2010 bubble right of the 2008 bubble.
		assert!(x(0) > x(1));
	}

	#[test]
	fn titles_track_the_mode() {
		let mut state = charted();
		assert!(state.titles().is_empty());
		state.split_bubbles();
		let titles = state.titles();
		assert_eq!(titles.len(), 3);
		assert_eq!(titles[0].text, "2008");
		assert_eq!(titles[0].x, 160.0);
		assert_eq!(titles[2].x, 800.0);
		assert_eq!(titles[1].y, 40.0);
		state.split_impact();
		assert_eq!(state.titles()[2].text, "high");
		state.group_bubbles();
		assert!(state.titles().is_empty());
	}

	#[test]
	fn grow_in_runs_from_zero_to_full_radius() {
		let mut state = charted();
		assert_eq!(state.display_radius(0), 0.0);
		state.advance(1000.0);
		assert!((state.display_radius(0) - 42.5).abs() < 1e-9);
		for _ in 0..30 {
			state.advance(100.0);
		}
		assert!((state.display_radius(0) - 85.0).abs() < 1e-9);
	}

	#[test]
	fn impact_colors_with_darker_strokes() {
		let mut state = charted();
		let (fill, stroke) = state.colors(0).unwrap();
		assert_eq!(fill, Color::rgb(0x7a, 0xa2, 0x5c));
		assert_eq!(stroke, fill.darker(1.0));
		assert_eq!(state.stroke_color("high"), stroke);
		assert_eq!(state.fill_color("low"), Color::rgb(0xd8, 0x4b, 0x2a));
		assert_eq!(state.fill_color("unrated"), Color::rgb(0xd8, 0x4b, 0x2a));
	}

	#[test]
	fn hover_tooltip_lists_title_impact_year() {
		let mut state = charted();
		for _ in 0..200 {
			state.advance(16.0);
		}
		let (x, y) = state.positions()[0];
		let hit = state.node_at_position(x, y);
		assert_eq!(hit, Some(0));
		assert_eq!(
			state.tooltip_for(0).unwrap().to_plain_text(),
			"Title: grant b\nImpact: high\nYear: 2010"
		);
		assert_eq!(state.tooltip_for(10), None);
	}
}
