//! bubble-charts: animated bubble and sunburst charts for the browser.
//!
//! This crate provides WASM canvas widgets that lay out data points as
//! force-simulated bubbles (clustered, split by category, grouped by year or
//! impact) and hierarchies as a zoomable sunburst, with hover tooltips.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;
pub mod error;

pub use components::bubble::{BubbleCenterChart, BubbleMode, BubbleRecord, BubbleScaleAxisChart};
pub use components::bubble_force::{BubbleForceChart, BubbleForceConfig, ForceNode, GrantRecord, GroupMode};
pub use components::sunburst::{HierarchyNode, SunburstChart};
pub use error::ChartError;

const DATA_ELEMENT_ID: &str = "chart-data";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("bubble-charts: logging initialized");
}

/// Datasets embedded in the page. Every section is optional; a widget whose
/// section is absent is not rendered.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ChartData {
	/// Records for the two count-sized bubble charts.
	#[serde(default)]
	pub bubbles: Option<Vec<BubbleRecord>>,
	/// Category labels for `bubbles`.
	#[serde(default)]
	pub categories: Option<Vec<String>>,
	/// Column spacing of the axis chart.
	#[serde(default)]
	pub gap: Option<f64>,
	/// Records for the force chart.
	#[serde(default)]
	pub grants: Option<Vec<GrantRecord>>,
	/// Tree for the sunburst.
	#[serde(default)]
	pub hierarchy: Option<HierarchyNode>,
}

impl ChartData {
	/// Parses the embedded JSON document.
	pub fn from_json(json: &str) -> Result<Self, ChartError> {
		Ok(serde_json::from_str(json)?)
	}
}

/// Load chart data from a script element with id="chart-data".
/// Expected format: JSON with { bubbles, categories, gap, grants, hierarchy }.
pub fn load_chart_data() -> Result<ChartData, ChartError> {
	let missing = || ChartError::MissingElement(DATA_ELEMENT_ID);
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(missing)?;
	let script: HtmlScriptElement = document
		.get_element_by_id(DATA_ELEMENT_ID)
		.ok_or_else(missing)?
		.dyn_into()
		.map_err(|_| missing())?;
	let json_text = script.text().map_err(|_| missing())?;

	let data = ChartData::from_json(&json_text)?;
	info!(
		"bubble-charts: loaded {} bubbles, {} grants, hierarchy: {}",
		data.bubbles.as_ref().map_or(0, Vec::len),
		data.grants.as_ref().map_or(0, Vec::len),
		data.hierarchy.is_some()
	);
	Ok(data)
}

/// Main application component.
/// Loads the datasets from the DOM and renders every chart with its controls.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let data = load_chart_data().unwrap_or_else(|e| {
		warn!("bubble-charts: failed to load chart data: {}", e);
		ChartData::default()
	});
	let categories = data.categories.unwrap_or_default();
	let gap = data.gap.unwrap_or(components::bubble::state::DEFAULT_GAP);

	let (axis_mode, set_axis_mode) = signal(BubbleMode::Center);
	let (group_mode, set_group_mode) = signal(GroupMode::All);

	let bubbles = data.bubbles.map(|records| {
		let records = Signal::stored(records);
		let labels = Signal::stored(categories.clone());
		view! {
			<section class="chart-section">
				<h2>"Bubbles"</h2>
				<BubbleCenterChart data=records categories=labels width=960.0 height=500.0 />
				<h2>"Bubbles by category"</h2>
				<div class="chart-controls">
					<button on:click=move |_| set_axis_mode.set(BubbleMode::Center)>"All together"</button>
					<button on:click=move |_| set_axis_mode.set(BubbleMode::Axis)>"By category"</button>
				</div>
				<BubbleScaleAxisChart
					data=records
					categories=labels
					width=960.0
					height=500.0
					gap=gap
					mode=axis_mode
				/>
			</section>
		}
	});

	let grants = data.grants.map(|records| {
		view! {
			<section class="chart-section">
				<h2>"Grants"</h2>
				<div class="chart-controls">
					<button on:click=move |_| set_group_mode.set(GroupMode::All)>"All grants"</button>
					<button on:click=move |_| set_group_mode.set(GroupMode::Year)>"By year"</button>
					<button on:click=move |_| set_group_mode.set(GroupMode::Impact)>"By impact"</button>
				</div>
				<BubbleForceChart
					data=Signal::stored(records)
					width=960.0
					height=640.0
					mode=group_mode
				/>
			</section>
		}
	});

	let sunburst = data.hierarchy.map(|root| {
		view! {
			<section class="chart-section">
				<h2>"Hierarchy"</h2>
				<SunburstChart data=Signal::stored(root) width=960.0 height=700.0 />
			</section>
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Bubble Charts" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="charts">
			{bubbles}
			{grants}
			{sunburst}
		</main>
	}
}
