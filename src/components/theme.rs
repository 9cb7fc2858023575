//! Visual theming for the charts.
//!
//! Provides the color type, the categorical palettes and the style
//! configuration shared by all widgets.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity `a`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Darken by `0.7^k` per channel.
	pub fn darker(self, k: f64) -> Self {
		let f = 0.7f64.powf(k);
		let channel = |c: u8| (c as f64 * f).round().clamp(0.0, 255.0) as u8;
		Self {
			r: channel(self.r),
			g: channel(self.g),
			b: channel(self.b),
			a: self.a,
		}
	}

	/// `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Twenty-color categorical palette (paired light/dark hues).
pub const CATEGORY20: [Color; 20] = [
	Color::rgb(0x1f, 0x77, 0xb4),
	Color::rgb(0xae, 0xc7, 0xe8),
	Color::rgb(0xff, 0x7f, 0x0e),
	Color::rgb(0xff, 0xbb, 0x78),
	Color::rgb(0x2c, 0xa0, 0x2c),
	Color::rgb(0x98, 0xdf, 0x8a),
	Color::rgb(0xd6, 0x27, 0x28),
	Color::rgb(0xff, 0x98, 0x96),
	Color::rgb(0x94, 0x67, 0xbd),
	Color::rgb(0xc5, 0xb0, 0xd5),
	Color::rgb(0x8c, 0x56, 0x4b),
	Color::rgb(0xc4, 0x9c, 0x94),
	Color::rgb(0xe3, 0x77, 0xc2),
	Color::rgb(0xf7, 0xb6, 0xd2),
	Color::rgb(0x7f, 0x7f, 0x7f),
	Color::rgb(0xc7, 0xc7, 0xc7),
	Color::rgb(0xbc, 0xbd, 0x22),
	Color::rgb(0xdb, 0xdb, 0x8d),
	Color::rgb(0x17, 0xbe, 0xcf),
	Color::rgb(0x9e, 0xda, 0xe5),
];

/// Impact-level fills: low, medium, high.
pub const IMPACT_COLORS: [(&str, Color); 3] = [
	("low", Color::rgb(0xd8, 0x4b, 0x2a)),
	("medium", Color::rgb(0xbe, 0xcc, 0xae)),
	("high", Color::rgb(0x7a, 0xa2, 0x5c)),
];

/// Floating tooltip box style.
#[derive(Clone, Debug)]
pub struct TooltipStyle {
	/// Text color.
	pub color: Color,
	/// Box fill.
	pub background: Color,
	/// Inner padding.
	pub padding_px: f64,
	/// Corner radius.
	pub radius_px: f64,
	/// CSS font shorthand.
	pub font: String,
	/// Cursor offset `(dx, dy)` applied to the box's top-left corner.
	pub offset: (f64, f64),
}

impl TooltipStyle {
	/// Inline style placing the box next to viewport point `(x, y)`.
	pub fn to_css(&self, x: f64, y: f64) -> String {
		format!(
			"position: fixed; z-index: 10; pointer-events: none; left: {}px; top: {}px; color: {}; padding: {}px; background-color: {}; border-radius: {}px; font: {};",
			x + self.offset.0,
			y + self.offset.1,
			self.color.to_css(),
			self.padding_px,
			self.background.to_css(),
			self.radius_px,
			self.font,
		)
	}
}

impl Default for TooltipStyle {
	fn default() -> Self {
		Self {
			color: Color::rgb(255, 255, 255),
			background: Color::rgba(0, 0, 0, 0.75),
			padding_px: 8.0,
			radius_px: 6.0,
			font: "12px sans-serif".into(),
			offset: (10.0, -10.0),
		}
	}
}

/// Canvas styling shared by every chart.
#[derive(Clone, Debug)]
pub struct ChartTheme {
	/// `None` leaves the canvas transparent.
	pub background: Option<Color>,
	/// Outline width of force chart bubbles.
	pub bubble_stroke_width: f64,
	/// Font of the force chart group titles.
	pub title_font: String,
	/// Color of the force chart group titles.
	pub title_color: Color,
	/// Font of the category axis labels.
	pub label_font: String,
	/// Color of the category axis labels.
	pub label_color: Color,
	/// Separator drawn between sunburst arcs.
	pub arc_stroke: Color,
	/// Width of the arc separator.
	pub arc_stroke_width: f64,
	/// Hover tooltip style.
	pub tooltip: TooltipStyle,
}

impl Default for ChartTheme {
	fn default() -> Self {
		Self {
			background: None,
			bubble_stroke_width: 2.0,
			title_font: "16px sans-serif".into(),
			title_color: Color::rgb(0x33, 0x33, 0x33),
			label_font: "12px sans-serif".into(),
			label_color: Color::rgb(0, 0, 0),
			arc_stroke: Color::rgb(255, 255, 255),
			arc_stroke_width: 1.0,
			tooltip: TooltipStyle::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn darker_scales_channels() {
		let c = Color::rgb(100, 200, 0).darker(1.0);
		assert_eq!(c, Color::rgb(70, 140, 0));
		assert_eq!(Color::rgb(10, 20, 30).darker(0.0), Color::rgb(10, 20, 30));
	}

	#[test]
	fn css_output_switches_on_alpha() {
		assert_eq!(Color::rgb(0x1f, 0x77, 0xb4).to_css(), "#1f77b4");
		assert_eq!(Color::rgba(0, 0, 0, 0.75).to_css(), "rgba(0, 0, 0, 0.75)");
	}

	#[test]
	fn tooltip_css_offsets_from_cursor() {
		let css = TooltipStyle::default().to_css(100.0, 50.0);
		assert!(css.contains("left: 110px"));
		assert!(css.contains("top: 40px"));
		assert!(css.contains("background-color: rgba(0, 0, 0, 0.75)"));
	}
}
