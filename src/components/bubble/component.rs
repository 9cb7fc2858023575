//! Leptos components for the count-sized bubble charts.
//!
//! Both charts share one canvas mount: the dataset effect rebuilds the
//! physics from scratch (the previous state is dropped, never patched), a
//! single animation loop ticks and repaints whatever state is current, and
//! pointer handlers hit-test against the latest bubble positions. The loop
//! is stopped when the component is cleaned up.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::state::{BubbleLayout, BubbleMode, BubbleState, DEFAULT_GAP};
use super::types::BubbleRecord;
use crate::components::canvas::{AnimationLoop, pointer_position, prepare_canvas, viewport_position};
use crate::components::theme::ChartTheme;
use crate::components::tooltip::{ChartTooltip, TooltipState};
use crate::error::{ChartError, Dimensions, require};

/// Bundles the chart state with the canvas it paints on.
struct ChartContext {
	state: BubbleState,
	ctx: CanvasRenderingContext2d,
	theme: ChartTheme,
}

/// Validated inputs of a bubble chart.
struct BubbleMount {
	dims: Dimensions,
	data: Signal<Vec<BubbleRecord>>,
	categories: Signal<Vec<String>>,
	gap: f64,
	mode: Signal<BubbleMode>,
	on_click: Option<Callback<BubbleRecord>>,
}

/// Presence check on the construction parameters shared by both charts.
fn validate<D, C>(
	width: Option<f64>,
	height: Option<f64>,
	data: Option<D>,
	categories: Option<C>,
) -> Result<(Dimensions, D, C), ChartError> {
	let dims = Dimensions::validate(width, height)?;
	let data = require(data, ChartError::MissingData)?;
	let categories = require(categories, ChartError::MissingCategories)?;
	Ok((dims, data, categories))
}

/// A single cluster of bubbles sized by `count`.
///
/// Bubbles spring toward one anchor in the middle of the canvas while
/// collisions keep them apart. Hovering shows the term
/// name and its category; clicking hands the record to `on_click`.
///
/// If a dimension, the dataset or the category labels are missing, an error
/// is logged and nothing is mounted.
#[component]
pub fn BubbleCenterChart(
	#[prop(optional, into)] data: Option<Signal<Vec<BubbleRecord>>>,
	#[prop(optional, into)] categories: Option<Signal<Vec<String>>>,
	#[prop(optional)] width: Option<f64>,
	#[prop(optional)] height: Option<f64>,
	#[prop(optional, into)] on_click: Option<Callback<BubbleRecord>>,
) -> impl IntoView {
	match validate(width, height, data, categories) {
		Ok((dims, data, categories)) => bubble_canvas(BubbleMount {
			dims,
			data,
			categories,
			gap: DEFAULT_GAP,
			mode: Signal::stored(BubbleMode::Center),
			on_click,
		}),
		Err(e) => {
			error!("bubble-charts: failed to init bubble center chart: {}", e);
			().into_any()
		}
	}
}

/// Bubbles that can be laid out as one cluster or in one column per category.
///
/// Column `i` is centered at `i * gap`; labels are drawn under the columns
/// while `mode` is [`BubbleMode::Axis`]. Changing `mode` re-targets the
/// running layout without rebuilding it.
#[component]
pub fn BubbleScaleAxisChart(
	#[prop(optional, into)] data: Option<Signal<Vec<BubbleRecord>>>,
	#[prop(optional, into)] categories: Option<Signal<Vec<String>>>,
	#[prop(optional)] width: Option<f64>,
	#[prop(optional)] height: Option<f64>,
	#[prop(default = DEFAULT_GAP)] gap: f64,
	#[prop(optional, into)] mode: Option<Signal<BubbleMode>>,
	#[prop(optional, into)] on_click: Option<Callback<BubbleRecord>>,
) -> impl IntoView {
	match validate(width, height, data, categories) {
		Ok((dims, data, categories)) => bubble_canvas(BubbleMount {
			dims,
			data,
			categories,
			gap,
			mode: mode.unwrap_or_else(|| Signal::stored(BubbleMode::Center)),
			on_click,
		}),
		Err(e) => {
			error!("bubble-charts: failed to init bubble axis chart: {}", e);
			().into_any()
		}
	}
}

fn bubble_canvas(mount: BubbleMount) -> AnyView {
	let BubbleMount {
		dims,
		data,
		categories,
		gap,
		mode,
		on_click,
	} = mount;
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<ChartContext>>> = Rc::new(RefCell::new(None));
	let animation = AnimationLoop::new();
	on_cleanup({
		let animation = animation.clone();
		move || animation.stop()
	});
	let (tooltip, set_tooltip) = signal(None::<TooltipState>);
	let theme = ChartTheme::default();
	let tooltip_style = theme.tooltip.clone();

	let context_init = context.clone();
	Effect::new(move |_| {
		let records = data.get();
		let labels = categories.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let ctx = match prepare_canvas(&canvas, dims) {
			Ok(ctx) => ctx,
			Err(e) => {
				error!("bubble-charts: {}", e);
				return;
			}
		};

		info!("bubble-charts: binding {} bubbles", records.len());
		let mut state = BubbleState::new(BubbleLayout::new(dims, records, labels, gap));
		state.apply_mode(mode.get_untracked());
		*context_init.borrow_mut() = Some(ChartContext {
			state,
			ctx,
			theme: theme.clone(),
		});
		set_tooltip.set(None);

		let context_anim = context_init.clone();
		let started = animation.start(move |_dt| {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick();
				render::render(&c.state, c.state.positions(), &c.ctx, &c.theme);
			}
		});
		if let Err(e) = started {
			error!("bubble-charts: {}", e);
		}
	});

	let context_mode = context.clone();
	Effect::new(move |prev: Option<BubbleMode>| {
		let next = mode.get();
		if prev.is_some() {
			if let Some(ref mut c) = *context_mode.borrow_mut() {
				c.state.apply_mode(next);
			}
		}
		next
	});

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);
		let tip = context_mm.borrow_mut().as_mut().and_then(|c| {
			let hit = c.state.node_at_position(x, y);
			c.state.set_hover(hit);
			hit.and_then(|i| c.state.tooltip_for(i))
		});
		let (vx, vy) = viewport_position(&ev);
		set_tooltip.set(tip.map(|content| TooltipState {
			content,
			x: vx,
			y: vy,
		}));
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.set_hover(None);
		}
		set_tooltip.set(None);
	};

	let context_click = context.clone();
	let on_canvas_click = move |ev: MouseEvent| {
		let Some(callback) = on_click else {
			return;
		};
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);
		let record = context_click.borrow().as_ref().and_then(|c| {
			c.state
				.node_at_position(x, y)
				.and_then(|i| c.state.record(i).cloned())
		});
		// Borrow released before the observer runs; it may trigger a rebuild.
		if let Some(record) = record {
			callback.run(record);
		}
	};

	view! {
		<div
			class="bubble-chart"
			style=format!("position: relative; width: {}px; height: {}px;", dims.width, dims.height)
		>
			<canvas
				node_ref=canvas_ref
				class="bubble-chart-canvas"
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_canvas_click
				style=move || {
					let cursor = if tooltip.with(Option::is_some) { "pointer" } else { "default" };
					format!("display: block; cursor: {};", cursor)
				}
			/>
			<ChartTooltip state=tooltip style=tooltip_style />
		</div>
	}
	.into_any()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn validation_reports_the_first_missing_input() {
		let ok = validate(Some(600.0), Some(400.0), Some(vec![1]), Some(vec!["a"]));
		assert!(ok.is_ok());
		assert!(matches!(
			validate(Some(600.0), Some(400.0), None::<Vec<u8>>, Some(vec!["a"])),
			Err(ChartError::MissingData)
		));
		assert!(matches!(
			validate(Some(600.0), Some(400.0), Some(vec![1]), None::<Vec<&str>>),
			Err(ChartError::MissingCategories)
		));
		assert!(matches!(
			validate(None, Some(400.0), None::<Vec<u8>>, None::<Vec<&str>>),
			Err(ChartError::MissingDimension("width"))
		));
	}
}
