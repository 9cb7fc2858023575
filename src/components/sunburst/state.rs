//! Zoomable sunburst layout state.
//!
//! The partition is computed once per dataset. Zooming never touches the
//! partition; it only animates the scale parameters in [`ZoomView`], and
//! every frame derives arcs from the current view.

use std::f64::consts::TAU;

use log::debug;

use super::partition::{PartitionNode, partition};
use super::types::HierarchyNode;
use crate::components::scale::{OrdinalScale, PowScale, ease_cubic_in_out, lerp_pair};
use crate::components::theme::{CATEGORY20, Color};
use crate::components::tooltip::{TooltipContent, add_commas};
use crate::error::Dimensions;

/// Length of a zoom transition.
pub const ZOOM_DURATION_MS: f64 = 750.0;
/// Inner radius kept free for the parent ring when zoomed below the root.
pub const ZOOM_INNER_RADIUS: f64 = 20.0;
const MARGIN: f64 = 10.0;

/// Scale parameters for angle (x) and radius (y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomView {
	/// Partition x span mapped onto the full circle.
	pub x_domain: (f64, f64),
	/// Partition y span mapped onto `y_range`.
	pub y_domain: (f64, f64),
	/// Radii in pixels.
	pub y_range: (f64, f64),
}

impl ZoomView {
	/// Unzoomed view of a sunburst with outer radius `radius`.
	pub fn full(radius: f64) -> Self {
		Self {
			x_domain: (0.0, 1.0),
			y_domain: (0.0, 1.0),
			y_range: (0.0, radius),
		}
	}

	/// View that makes `node` fill the whole circle.
	pub fn focused_on(node: &PartitionNode, radius: f64) -> Self {
		let inner = if node.y0 > 0.0 { ZOOM_INNER_RADIUS } else { 0.0 };
		Self {
			x_domain: (node.x0, node.x1),
			y_domain: (node.y0, 1.0),
			y_range: (inner, radius),
		}
	}

	fn interpolate(self, to: ZoomView, t: f64) -> Self {
		Self {
			x_domain: lerp_pair(self.x_domain, to.x_domain, t),
			y_domain: lerp_pair(self.y_domain, to.y_domain, t),
			y_range: lerp_pair(self.y_range, to.y_range, t),
		}
	}
}

#[derive(Clone, Copy, Debug)]
struct ZoomTransition {
	from: ZoomView,
	to: ZoomView,
	elapsed_ms: f64,
}

/// Annular sector in d3 angle convention: 0 at twelve o'clock, clockwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arc {
	/// Radians from twelve o'clock.
	pub start_angle: f64,
	/// Radians from twelve o'clock.
	pub end_angle: f64,
	/// Pixels from the center.
	pub inner_radius: f64,
	/// Pixels from the center.
	pub outer_radius: f64,
}

impl Arc {
	/// Whether the sector has any area.
	pub fn is_visible(&self) -> bool {
		self.end_angle > self.start_angle && self.outer_radius > self.inner_radius
	}

	fn contains(&self, angle: f64, radius: f64) -> bool {
		self.is_visible()
			&& angle >= self.start_angle
			&& angle < self.end_angle
			&& radius >= self.inner_radius
			&& radius < self.outer_radius
	}
}

/// Running state of a mounted sunburst.
pub struct SunburstState {
	/// Canvas size.
	pub dims: Dimensions,
	/// Outer radius of the unzoomed chart.
	pub radius: f64,
	/// Partitioned tree, breadth-first.
	pub nodes: Vec<PartitionNode>,
	colors: Vec<Color>,
	view: ZoomView,
	transition: Option<ZoomTransition>,
	/// Arc under the pointer.
	pub hovered: Option<usize>,
}

impl SunburstState {
	/// Partitions `root` and colors it, fully zoomed out.
	pub fn new(dims: Dimensions, root: &HierarchyNode) -> Self {
		let radius = dims.width.min(dims.height) / 2.0 - MARGIN;
		let nodes = partition(root);
		let colors = assign_colors(&nodes);
		debug!("bubble-charts: sunburst partitioned {} nodes", nodes.len());
		Self {
			dims,
			radius,
			nodes,
			colors,
			view: ZoomView::full(radius),
			transition: None,
			hovered: None,
		}
	}

	/// Canvas center.
	pub fn center(&self) -> (f64, f64) {
		(self.dims.width / 2.0, self.dims.height / 2.0)
	}

	/// Current, possibly mid-transition, view.
	pub fn view(&self) -> ZoomView {
		match self.transition {
			Some(tr) => {
				let t = ease_cubic_in_out((tr.elapsed_ms / ZOOM_DURATION_MS).clamp(0.0, 1.0));
				tr.from.interpolate(tr.to, t)
			}
			None => self.view,
		}
	}

	#[cfg(test)]
	pub(crate) fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	/// Fill of node `index`.
	pub fn color(&self, index: usize) -> Option<Color> {
		self.colors.get(index).copied()
	}

	/// Arc for `index` under the current view. Angles are clamped to the
	/// circle and radii to zero, so nodes outside the zoomed subtree collapse.
	pub fn arc(&self, index: usize) -> Option<Arc> {
		let node = self.nodes.get(index)?;
		let view = self.view();
		let x = PowScale::linear(view.x_domain, (0.0, TAU));
		let y = PowScale::sqrt(view.y_domain, view.y_range);
		Some(Arc {
			start_angle: x.scale(node.x0).clamp(0.0, TAU),
			end_angle: x.scale(node.x1).clamp(0.0, TAU),
			inner_radius: y.scale(node.y0).max(0.0),
			outer_radius: y.scale(node.y1).max(0.0),
		})
	}

	/// Starts a zoom onto `index`. A zoom issued mid-transition starts from
	/// the view currently on screen.
	pub fn click(&mut self, index: usize) {
		let Some(node) = self.nodes.get(index) else {
			return;
		};
		let to = ZoomView::focused_on(node, self.radius);
		debug!("bubble-charts: sunburst zoom to '{}'", node.name);
		self.transition = Some(ZoomTransition {
			from: self.view(),
			to,
			elapsed_ms: 0.0,
		});
	}

	/// Moves the zoom transition forward. Returns true while animating.
	pub fn advance(&mut self, dt_ms: f64) -> bool {
		let Some(mut tr) = self.transition else {
			return false;
		};
		tr.elapsed_ms += dt_ms.max(0.0);
		if tr.elapsed_ms >= ZOOM_DURATION_MS {
			self.view = tr.to;
			self.transition = None;
			false
		} else {
			self.transition = Some(tr);
			true
		}
	}

	/// Hit test in canvas coordinates. Deeper arcs win.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		let (cx, cy) = self.center();
		let (dx, dy) = (x - cx, y - cy);
		let radius = dx.hypot(dy);
		let mut angle = dx.atan2(-dy);
		if angle < 0.0 {
			angle += TAU;
		}
		(0..self.nodes.len())
			.rev()
			.find(|&i| self.arc(i).is_some_and(|arc| arc.contains(angle, radius)))
	}

	/// Marks the arc under the pointer.
	pub fn set_hover(&mut self, index: Option<usize>) {
		self.hovered = index;
	}

	/// Name and aggregate value of node `index`.
	pub fn tooltip_for(&self, index: usize) -> Option<TooltipContent> {
		let node = self.nodes.get(index)?;
		Some(TooltipContent::rows([
			("Title", node.name.clone()),
			("Value", add_commas(node.value)),
		]))
	}
}

/// Inner nodes take their own name's color, leaves their parent's, so a
/// parent and its leaf children share a hue.
fn assign_colors(nodes: &[PartitionNode]) -> Vec<Color> {
	let mut scale = OrdinalScale::new(CATEGORY20.to_vec());
	nodes
		.iter()
		.map(|node| {
			let key = match node.parent {
				Some(p) if !node.has_children() => nodes[p].name.as_str(),
				_ => node.name.as_str(),
			};
			scale.get(key).unwrap_or(CATEGORY20[0])
		})
		.collect()
}
