//! Floating tooltip overlay shown next to the cursor on hover.

use leptos::prelude::*;

use super::theme::TooltipStyle;

/// What a tooltip shows.
#[derive(Clone, Debug, PartialEq)]
pub enum TooltipContent {
	/// A single line of text.
	Text(String),
	/// `label: value` rows.
	Rows(Vec<(String, String)>),
}

impl TooltipContent {
	/// Builds [`TooltipContent::Rows`] from `(label, value)` pairs.
	pub fn rows<L: Into<String>, V: Into<String>>(rows: impl IntoIterator<Item = (L, V)>) -> Self {
		TooltipContent::Rows(rows.into_iter().map(|(l, v)| (l.into(), v.into())).collect())
	}

	/// Plain-text rendering, one row per line.
	pub fn to_plain_text(&self) -> String {
		match self {
			TooltipContent::Text(text) => text.clone(),
			TooltipContent::Rows(rows) => rows
				.iter()
				.map(|(label, value)| format!("{label}: {value}"))
				.collect::<Vec<_>>()
				.join("\n"),
		}
	}
}

/// Formats a number with thousands separators: `1234567.5 -> "1,234,567.5"`.
pub fn add_commas(value: f64) -> String {
	let text = value.to_string();
	let (int_part, frac_part) = match text.split_once('.') {
		Some((i, f)) => (i, Some(f)),
		None => (text.as_str(), None),
	};
	let (sign, digits) = match int_part.strip_prefix('-') {
		Some(d) => ("-", d),
		None => ("", int_part),
	};
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(ch);
	}
	match frac_part {
		Some(f) => format!("{sign}{grouped}.{f}"),
		None => format!("{sign}{grouped}"),
	}
}

/// A visible tooltip anchored at viewport coordinates `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipState {
	/// Text to show.
	pub content: TooltipContent,
	/// Cursor x in the viewport.
	pub x: f64,
	/// Cursor y in the viewport.
	pub y: f64,
}

/// Renders the tooltip while `state` holds a value; nothing otherwise.
#[component]
pub fn ChartTooltip(
	#[prop(into)] state: Signal<Option<TooltipState>>,
	#[prop(default = TooltipStyle::default())] style: TooltipStyle,
) -> impl IntoView {
	move || {
		state.get().map(|tip| {
			let css = style.to_css(tip.x, tip.y);
			let label = tip.content.to_plain_text();
			let body = match tip.content {
				TooltipContent::Text(text) => text.into_any(),
				TooltipContent::Rows(rows) => rows
					.into_iter()
					.map(|(label, value)| {
						view! {
							<div>
								<span class="name">{label}": "</span>
								<span class="value">{value}</span>
							</div>
						}
					})
					.collect_view()
					.into_any(),
			};
			view! {
				<div class="chart-tooltip" role="tooltip" aria-label=label style=css>
					{body}
				</div>
			}
		})
	}
}
