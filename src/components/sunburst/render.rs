//! Canvas rendering for the sunburst.

use std::f64::consts::FRAC_PI_2;

use web_sys::CanvasRenderingContext2d;

use super::state::SunburstState;
use crate::components::theme::ChartTheme;

const HOVER_DARKEN: f64 = 0.3;

/// Paints the visible arcs of the current view.
pub fn render(state: &SunburstState, ctx: &CanvasRenderingContext2d, theme: &ChartTheme) {
	let dims = state.dims;
	ctx.clear_rect(0.0, 0.0, dims.width, dims.height);
	if let Some(bg) = theme.background {
		ctx.set_fill_style_str(&bg.to_css());
		ctx.fill_rect(0.0, 0.0, dims.width, dims.height);
	}

	let (cx, cy) = state.center();
	ctx.save();
	let _ = ctx.translate(cx, cy);
	ctx.set_line_width(theme.arc_stroke_width);
	ctx.set_stroke_style_str(&theme.arc_stroke.to_css());

	for i in 0..state.nodes.len() {
		let Some(arc) = state.arc(i).filter(|a| a.is_visible()) else {
			continue;
		};
		let Some(mut fill) = state.color(i) else {
			continue;
		};
		if state.hovered == Some(i) {
			fill = fill.darker(HOVER_DARKEN);
		}
		// Canvas angles start at three o'clock.
		let start = arc.start_angle - FRAC_PI_2;
		let end = arc.end_angle - FRAC_PI_2;
		let outer = arc.outer_radius.max(0.0);
		let inner = arc.inner_radius.max(0.0);
		ctx.begin_path();
		let _ = ctx.arc(0.0, 0.0, outer, start, end);
		let _ = ctx.arc_with_anticlockwise(0.0, 0.0, inner, end, start, true);
		ctx.close_path();
		ctx.set_fill_style_str(&fill.to_css());
		ctx.fill();
		ctx.stroke();
	}

	ctx.restore();
}
