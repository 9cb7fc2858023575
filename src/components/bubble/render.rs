//! Canvas rendering for the count-sized bubble charts.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::BubbleState;
use crate::components::theme::ChartTheme;

const DEFAULT_FILL: &str = "#000000";

/// Paints one frame. Positions come from `positions`; everything else from
/// `state`.
pub fn render(
	state: &BubbleState,
	positions: &[(f64, f64)],
	ctx: &CanvasRenderingContext2d,
	theme: &ChartTheme,
) {
	let dims = state.layout.dims;
	ctx.clear_rect(0.0, 0.0, dims.width, dims.height);
	if let Some(bg) = theme.background {
		ctx.set_fill_style_str(&bg.to_css());
		ctx.fill_rect(0.0, 0.0, dims.width, dims.height);
	}

	for (i, (&(x, y), record)) in positions.iter().zip(&state.layout.records).enumerate() {
		let fill = if record.color.is_empty() {
			DEFAULT_FILL
		} else {
			&record.color
		};
		ctx.begin_path();
		let radius = state.layout.radius(i).max(0.0);
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(fill);
		ctx.fill();
	}

	let labels = state.axis_labels();
	if !labels.is_empty() {
		ctx.set_font(&theme.label_font);
		ctx.set_text_align("start");
		ctx.set_fill_style_str(&theme.label_color.to_css());
		for label in &labels {
			let _ = ctx.fill_text(&label.text, label.x, label.y);
		}
	}
}
