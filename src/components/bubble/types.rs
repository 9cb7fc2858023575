//! Input records for the count-sized bubble charts.

use serde::Deserialize;

use crate::components::record::{lenient_f64, lenient_index, lenient_string};

/// One data point of a [`BubbleCenterChart`](super::BubbleCenterChart) or
/// [`BubbleScaleAxisChart`](super::BubbleScaleAxisChart).
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct BubbleRecord {
	/// Identifier handed back to click observers.
	#[serde(default, deserialize_with = "lenient_string")]
	pub id: String,
	/// Term shown in the tooltip.
	#[serde(default, deserialize_with = "lenient_string")]
	pub name: String,
	/// Magnitude the bubble area is proportional to.
	#[serde(default, deserialize_with = "lenient_f64")]
	pub count: f64,
	/// Index into the chart's category labels.
	#[serde(default, deserialize_with = "lenient_index")]
	pub category: Option<usize>,
	/// CSS fill color.
	#[serde(default)]
	pub color: String,
}
