//! Leptos component wrapping the force chart canvas.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::state::{BubbleForceConfig, BubbleForceState, GroupMode};
use super::types::{ForceNode, GrantRecord};
use crate::components::canvas::{AnimationLoop, pointer_position, prepare_canvas, viewport_position};
use crate::components::theme::ChartTheme;
use crate::components::tooltip::{ChartTooltip, TooltipState};
use crate::error::{ChartError, Dimensions, require};

struct ChartContext {
	state: BubbleForceState,
	ctx: CanvasRenderingContext2d,
	theme: ChartTheme,
}

/// Presence check on the construction parameters.
fn validate<D>(width: Option<f64>, height: Option<f64>, data: Option<D>) -> Result<(Dimensions, D), ChartError> {
	let dims = Dimensions::validate(width, height)?;
	let data = require(data, ChartError::MissingData)?;
	Ok((dims, data))
}

/// Bubbles sized by grant amount that can be regrouped by year or impact.
///
/// `mode` drives the grouping: [`GroupMode::All`] gathers every bubble in
/// the middle, [`GroupMode::Year`] and [`GroupMode::Impact`] split them into
/// titled clusters. Bubbles grow in from zero radius whenever the dataset
/// changes. Hovering shows title, impact and year; clicking hands the node
/// to `on_click`.
///
/// If a dimension or the dataset is missing, an error is logged and nothing
/// is mounted.
#[component]
pub fn BubbleForceChart(
	#[prop(optional, into)] data: Option<Signal<Vec<GrantRecord>>>,
	#[prop(optional)] width: Option<f64>,
	#[prop(optional)] height: Option<f64>,
	#[prop(optional, into)] mode: Option<Signal<GroupMode>>,
	#[prop(optional)] config: Option<BubbleForceConfig>,
	#[prop(optional, into)] on_click: Option<Callback<ForceNode>>,
) -> impl IntoView {
	let (dims, data) = match validate(width, height, data) {
		Ok(v) => v,
		Err(e) => {
			error!("bubble-charts: failed to init force chart: {}", e);
			return ().into_any();
		}
	};
	let config = config.unwrap_or_else(|| BubbleForceConfig::new(dims));
	let mode = mode.unwrap_or_else(|| Signal::stored(GroupMode::All));

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

		info!("bubble-charts: charting {} grants", records.len());
		let mut state = BubbleForceState::new(dims, config.clone());
		state.chart(&records);
		state.apply_mode(mode.get_untracked());
		*context_init.borrow_mut() = Some(ChartContext {
			state,
			ctx,
			theme: theme.clone(),
		});
		set_tooltip.set(None);

		let context_anim = context_init.clone();
		let started = animation.start(move |dt| {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.advance(dt);
				render::render(&c.state, c.state.positions(), &c.ctx, &c.theme);
			}
		});
		if let Err(e) = started {
			error!("bubble-charts: {}", e);
		}
	});

	let context_mode = context.clone();
	Effect::new(move |prev: Option<GroupMode>| {
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
		let node = context_click.borrow().as_ref().and_then(|c| {
			c.state
				.node_at_position(x, y)
				.and_then(|i| c.state.nodes.get(i).cloned())
		});
		if let Some(node) = node {
			callback.run(node);
		}
	};

	view! {
		<div
			class="bubble-force-chart"
			style=format!("position: relative; width: {}px; height: {}px;", dims.width, dims.height)
		>
			<canvas
				node_ref=canvas_ref
				class="bubble-force-canvas"
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
	fn validation_reports_missing_inputs() {
		assert!(validate(Some(960.0), Some(640.0), Some(vec![1])).is_ok());
		assert!(matches!(
			validate(Some(960.0), Some(640.0), None::<Vec<u8>>),
			Err(ChartError::MissingData)
		));
		assert!(matches!(
			validate(Some(0.0), Some(640.0), Some(vec![1])),
			Err(ChartError::MissingDimension("width"))
		));
		assert!(matches!(
			validate(Some(960.0), Some(f64::NAN), Some(vec![1])),
			Err(ChartError::MissingDimension("height"))
		));
	}
}
