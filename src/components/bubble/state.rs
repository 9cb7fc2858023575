//! Layout and physics state for the count-sized bubble charts.
//!
//! [`BubbleLayout`] holds everything derived once from the inputs (radius
//! scale, category x-centers). [`BubbleState`] pairs it with the bubble
//! physics and the current layout mode.

use log::warn;

use super::types::BubbleRecord;
use crate::components::scale::{PowScale, max_magnitude};
use crate::components::physics::{BubbleBody, BubblePhysics, PhysicsConfig, phyllotaxis};
use crate::components::tooltip::TooltipContent;
use crate::error::Dimensions;

/// Smallest and largest bubble radius in pixels.
pub const RADIUS_RANGE: (f64, f64) = (2.0, 50.0);
/// Default horizontal distance between category columns.
pub const DEFAULT_GAP: f64 = 200.0;
/// Bubbles barely repel each other; collision does the packing.
const CHARGE: f32 = 2.0;
/// Distance of axis labels above the bottom edge.
const AXIS_LABEL_RAISE: f64 = 10.0;

/// x-center of category column `index`.
pub fn category_x_center(index: usize, gap: f64) -> f64 {
	index as f64 * gap
}

/// x-centers of `len` category columns.
pub fn category_x_centers(len: usize, gap: f64) -> Vec<f64> {
	(0..len).map(|i| category_x_center(i, gap)).collect()
}

/// Shifts per-bubble x targets so their mean lands on `center`. Keeps the
/// layout as a whole centered on the canvas.
pub fn center_targets(mut xs: Vec<f64>, center: f64) -> Vec<f64> {
	if xs.is_empty() {
		return xs;
	}
	let mean = xs.iter().sum::<f64>() / xs.len() as f64;
	let shift = center - mean;
	for x in &mut xs {
		*x += shift;
	}
	xs
}

/// Where bubbles are pulled to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BubbleMode {
	/// One cluster around the chart center.
	#[default]
	Center,
	/// One column per category along the x-axis.
	Axis,
}

/// A category label drawn under its column.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisLabel {
	/// Category name.
	pub text: String,
	/// Left edge of the text.
	pub x: f64,
	/// Baseline.
	pub y: f64,
}

/// Derived, immutable view of one dataset.
#[derive(Clone, Debug)]
pub struct BubbleLayout {
	/// Canvas size.
	pub dims: Dimensions,
	/// Input records, in input order.
	pub records: Vec<BubbleRecord>,
	/// Category labels, indexed by `BubbleRecord::category`.
	pub categories: Vec<String>,
	/// Distance between category columns.
	pub gap: f64,
	/// Count to radius.
	pub radius_scale: PowScale,
	/// Column x per category.
	pub x_centers: Vec<f64>,
}

impl BubbleLayout {
	/// Derives the radius scale and column centers.
	pub fn new(dims: Dimensions, records: Vec<BubbleRecord>, categories: Vec<String>, gap: f64) -> Self {
		let max_count = max_magnitude(records.iter().map(|r| r.count));
		let x_centers = category_x_centers(categories.len(), gap);
		Self {
			dims,
			records,
			categories,
			gap,
			radius_scale: PowScale::sqrt((0.0, max_count), RADIUS_RANGE),
			x_centers,
		}
	}

	/// Radius of record `index`, or the smallest radius if out of range.
	pub fn radius(&self, index: usize) -> f64 {
		self.records
			.get(index)
			.map_or(RADIUS_RANGE.0, |r| self.radius_scale.scale(r.count).max(0.0))
	}

	/// Label of the record's category, if it has a known one.
	pub fn category_label(&self, record: &BubbleRecord) -> Option<&str> {
		record
			.category
			.and_then(|c| self.categories.get(c))
			.map(String::as_str)
	}

	/// Labels under each category column. The whole row is shifted right by
	/// `width/len - gap/len` so the columns sit inside the canvas.
	pub fn axis_labels(&self) -> Vec<AxisLabel> {
		let len = self.categories.len();
		if len == 0 {
			return Vec::new();
		}
		let shift = self.dims.width / len as f64 - self.gap / len as f64;
		self.categories
			.iter()
			.zip(&self.x_centers)
			.map(|(text, x)| AxisLabel {
				text: text.clone(),
				x: x + shift,
				y: self.dims.height - AXIS_LABEL_RAISE,
			})
			.collect()
	}
}

/// Running state of a mounted bubble chart.
pub struct BubbleState {
	/// Inputs and derived scales.
	pub layout: BubbleLayout,
	/// One graph node per record.
	pub physics: BubblePhysics,
	/// Mode last applied.
	pub mode: BubbleMode,
	/// Bubble under the pointer.
	pub hovered: Option<usize>,
}

impl BubbleState {
	/// Spirals the records out from the chart center. Nothing moves until a
	/// mode is applied.
	pub fn new(layout: BubbleLayout) -> Self {
		let Dimensions { width, height } = layout.dims;
		let bodies: Vec<BubbleBody> = phyllotaxis(layout.records.len(), (width / 2.0, height / 2.0))
			.into_iter()
			.enumerate()
			.map(|(i, (x, y))| BubbleBody {
				x,
				y,
				radius: layout.radius(i),
				mass: 1.0,
			})
			.collect();
		let mut config = PhysicsConfig::default();
		config.parameters.force_charge = CHARGE;
		config.collide = true;
		Self {
			physics: BubblePhysics::new(config, &bodies),
			layout,
			mode: BubbleMode::Center,
			hovered: None,
		}
	}

	/// Applies `mode` and restarts the relaxation.
	pub fn apply_mode(&mut self, mode: BubbleMode) {
		match mode {
			BubbleMode::Center => self.simulate_center(),
			BubbleMode::Axis => self.simulate_axis(),
		}
	}

	/// Single cluster. Every bubble is pulled toward the right edge and the
	/// layout is re-centered, so they all share one anchor mid-canvas.
	pub fn simulate_center(&mut self) {
		self.retarget(vec![self.layout.dims.width; self.layout.records.len()]);
		self.mode = BubbleMode::Center;
	}

	/// One column per category. Records without a known category are pulled
	/// to the chart center instead.
	pub fn simulate_axis(&mut self) {
		let fallback = self.layout.dims.width / 2.0;
		let mut unplaced = 0usize;
		let targets = self
			.layout
			.records
			.iter()
			.map(|r| {
				r.category
					.and_then(|c| self.layout.x_centers.get(c).copied())
					.unwrap_or_else(|| {
						unplaced += 1;
						fallback
					})
			})
			.collect::<Vec<_>>();
		if unplaced > 0 {
			warn!(
				"bubble-charts: {} record(s) have no category column, centering them",
				unplaced
			);
		}
		self.retarget(targets);
		self.mode = BubbleMode::Axis;
	}

	fn retarget(&mut self, xs: Vec<f64>) {
		let Dimensions { width, height } = self.layout.dims;
		let targets = center_targets(xs, width / 2.0)
			.into_iter()
			.map(|x| (x, height / 2.0))
			.collect();
		self.physics.set_targets(targets);
	}

	/// Advances the physics one tick. Returns whether it is still moving.
	pub fn tick(&mut self) -> bool {
		self.physics.step()
	}

	/// Bubble centers in record order.
	pub fn positions(&self) -> &[(f64, f64)] {
		self.physics.positions()
	}

	/// Record `index`.
	pub fn record(&self, index: usize) -> Option<&BubbleRecord> {
		self.layout.records.get(index)
	}

	/// Topmost bubble under `(x, y)`.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		self.positions()
			.iter()
			.enumerate()
			.rev()
			.find(|&(i, &(px, py))| {
				let (dx, dy) = (px - x, py - y);
				(dx * dx + dy * dy).sqrt() < self.layout.radius(i)
			})
			.map(|(i, _)| i)
	}

	/// Marks the bubble under the pointer.
	pub fn set_hover(&mut self, index: Option<usize>) {
		self.hovered = index;
	}

	/// `Term Name : <name>,  Type : <category>` for record `index`.
	pub fn tooltip_for(&self, index: usize) -> Option<TooltipContent> {
		let record = self.record(index)?;
		let kind = self.layout.category_label(record).unwrap_or("unknown");
		Some(TooltipContent::Text(format!(
			"Term Name : {},  Type : {}",
			record.name, kind
		)))
	}

	/// Labels to draw for the current mode.
	pub fn axis_labels(&self) -> Vec<AxisLabel> {
		match self.mode {
			BubbleMode::Axis => self.layout.axis_labels(),
			BubbleMode::Center => Vec::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(id: &str, count: f64, category: Option<usize>) -> BubbleRecord {
		BubbleRecord {
			id: id.into(),
			name: format!("term {id}"),
			count,
			category,
			color: "#1f77b4".into(),
		}
	}

	fn layout(records: Vec<BubbleRecord>) -> BubbleLayout {
		BubbleLayout::new(
			Dimensions {
				width: 800.0,
				height: 400.0,
			},
			records,
			vec!["noun".into(), "verb".into(), "adjective".into()],
			DEFAULT_GAP,
		)
	}

	fn settle(state: &mut BubbleState) {
		let mut guard = 0;
		while state.tick() {
			guard += 1;
			assert!(guard < 1000);
		}
	}

	#[test]
	fn category_index_times_gap() {
		assert_eq!(category_x_center(2, 200.0), 400.0);
		assert_eq!(category_x_centers(3, 150.0), vec![0.0, 150.0, 300.0]);
	}

	#[test]
	fn targets_are_shifted_to_the_center() {
		assert_eq!(center_targets(vec![0.0, 400.0, 0.0, 400.0], 400.0), vec![200.0, 600.0, 200.0, 600.0]);
		assert_eq!(center_targets(vec![800.0; 3], 400.0), vec![400.0; 3]);
		assert!(center_targets(Vec::new(), 400.0).is_empty());
	}

	#[test]
	fn radius_spans_configured_range() {
		let l = layout(vec![record("a", 0.0, None), record("b", 400.0, None), record("c", 100.0, None)]);
		assert_eq!(l.radius(0), 2.0);
		assert_eq!(l.radius(1), 50.0);
		assert_eq!(l.radius(2), 26.0);
	}

	#[test]
	fn negative_counts_never_give_a_negative_radius() {
		let l = layout(vec![record("a", 400.0, None), record("b", -400.0, None)]);
		assert_eq!(l.radius(1), 0.0);
	}

	#[test]
	fn axis_labels_are_shifted_columns() {
		let labels = layout(vec![]).axis_labels();
		let shift = 800.0 / 3.0 - 200.0 / 3.0;
		assert_eq!(labels.len(), 3);
		assert_eq!(labels[2].text, "adjective");
		assert!((labels[2].x - (400.0 + shift)).abs() < 1e-9);
		assert_eq!(labels[0].y, 390.0);
	}

	#[test]
	fn idle_until_a_mode_is_applied() {
		let mut state = BubbleState::new(layout(vec![record("a", 1.0, Some(0))]));
		assert!(!state.tick());
		state.simulate_center();
		assert!(state.tick());
	}

	#[test]
	fn center_mode_keeps_cluster_centered() {
		let records = (0..12)
			.map(|i| record(&i.to_string(), (i * 10) as f64, Some(i % 3)))
			.collect();
		let mut state = BubbleState::new(layout(records));
		state.simulate_center();
		assert_eq!(state.physics.anchor_count(), 1);
		settle(&mut state);
		let n = state.positions().len() as f64;
		let cx = state.positions().iter().map(|p| p.0).sum::<f64>() / n;
		let cy = state.positions().iter().map(|p| p.1).sum::<f64>() / n;
		assert!((cx - 400.0).abs() < 50.0, "centroid x {cx}");
		assert!((cy - 200.0).abs() < 50.0, "centroid y {cy}");
		for &(x, y) in state.positions() {
			assert!(((x - 400.0).powi(2) + (y - 200.0).powi(2)).sqrt() < 200.0);
		}
		assert!(state.axis_labels().is_empty());
	}

	#[test]
	fn axis_mode_sorts_bubbles_into_columns() {
		let records = vec![
			record("a", 10.0, Some(0)),
			record("b", 10.0, Some(2)),
			record("c", 10.0, Some(0)),
			record("d", 10.0, Some(2)),
		];
		let mut state = BubbleState::new(layout(records));
		state.simulate_axis();
		settle(&mut state);
		let x = |i: usize| state.positions()[i].0;
		assert!(x(1) > x(0) + 100.0);
		assert!(x(3) > x(2) + 100.0);
		assert_eq!(state.axis_labels().len(), 3);
	}

	#[test]
	fn regrouping_is_repeatable_and_replaces_the_target() {
		let mut state = BubbleState::new(layout(vec![record("a", 5.0, Some(1)), record("b", 5.0, Some(9))]));
		for _ in 0..3 {
			state.simulate_axis();
			// Column 1 at 200 and the unknown category at 400, shifted by 100.
			assert_eq!(state.physics.targets(), &[(300.0, 200.0), (500.0, 200.0)]);
			assert_eq!(state.physics.anchor_count(), 2);
			state.simulate_center();
			assert_eq!(state.physics.targets(), &[(400.0, 200.0), (400.0, 200.0)]);
			assert_eq!(state.physics.anchor_count(), 1);
		}
		assert_eq!(state.mode, BubbleMode::Center);
		assert!(state.physics.is_running());
	}

	#[test]
	fn hit_test_and_tooltip() {
		let mut state = BubbleState::new(layout(vec![record("a", 400.0, Some(1)), record("b", 1.0, None)]));
		let (x, y) = state.positions()[0];
		assert_eq!(state.node_at_position(x, y), Some(0));
		assert_eq!(state.node_at_position(5_000.0, 5_000.0), None);
		assert_eq!(
			state.tooltip_for(0),
			Some(TooltipContent::Text("Term Name : term a,  Type : verb".into()))
		);
		assert_eq!(
			state.tooltip_for(1),
			Some(TooltipContent::Text("Term Name : term b,  Type : unknown".into()))
		);
		state.set_hover(Some(1));
		assert_eq!(state.hovered, Some(1));
		assert_eq!(state.tooltip_for(7), None);
	}
}
