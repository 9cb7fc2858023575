//! Canvas rendering for the force chart.
//!
//! Bubbles are drawn in node order (largest first) so small bubbles stay
//! visible; group titles go on top.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::BubbleForceState;
use crate::components::theme::ChartTheme;

/// Paints one frame: bubbles, then titles.
pub fn render(
	state: &BubbleForceState,
	positions: &[(f64, f64)],
	ctx: &CanvasRenderingContext2d,
	theme: &ChartTheme,
) {
	let dims = state.dims;
	ctx.clear_rect(0.0, 0.0, dims.width, dims.height);
	if let Some(bg) = theme.background {
		ctx.set_fill_style_str(&bg.to_css());
		ctx.fill_rect(0.0, 0.0, dims.width, dims.height);
	}

	ctx.set_line_width(theme.bubble_stroke_width);
	for (i, &(x, y)) in positions.iter().enumerate() {
		let radius = state.display_radius(i).max(0.0);
		if radius <= 0.0 {
			continue;
		}
		let Some((fill, stroke)) = state.colors(i) else {
			continue;
		};
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&fill.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&stroke.to_css());
		ctx.stroke();
	}

	let titles = state.titles();
	if !titles.is_empty() {
		ctx.set_font(&theme.title_font);
		ctx.set_text_align("center");
		ctx.set_fill_style_str(&theme.title_color.to_css());
		for title in &titles {
			let _ = ctx.fill_text(&title.text, title.x, title.y);
		}
	}
}
