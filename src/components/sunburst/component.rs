//! Leptos component wrapping the sunburst canvas.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::state::SunburstState;
use super::types::HierarchyNode;
use crate::components::canvas::{AnimationLoop, pointer_position, prepare_canvas, viewport_position};
use crate::components::theme::ChartTheme;
use crate::components::tooltip::{ChartTooltip, TooltipState};
use crate::error::{ChartError, Dimensions, require};

struct ChartContext {
	state: SunburstState,
	ctx: CanvasRenderingContext2d,
	theme: ChartTheme,
}

/// Presence check on the construction parameters.
fn validate<D>(width: Option<f64>, height: Option<f64>, data: Option<D>) -> Result<(Dimensions, D), ChartError> {
	let dims = Dimensions::validate(width, height)?;
	let data = require(data, ChartError::MissingData)?;
	Ok((dims, data))
}

/// Zoomable sunburst of a size-weighted tree.
///
/// Clicking an arc zooms so that it fills the circle; clicking the center
/// ring zooms back out to its parent. Hovering shows the node name and its
/// aggregate value.
///
/// If a dimension or the tree is missing, an error is logged and nothing is
/// mounted.
#[component]
pub fn SunburstChart(
	#[prop(optional, into)] data: Option<Signal<HierarchyNode>>,
	#[prop(optional)] width: Option<f64>,
	#[prop(optional)] height: Option<f64>,
) -> impl IntoView {
	let (dims, data) = match validate(width, height, data) {
		Ok(v) => v,
		Err(e) => {
			error!("bubble-charts: failed to init sunburst: {}", e);
			return ().into_any();
		}
	};

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
		let root = data.get();
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

		let state = SunburstState::new(dims, &root);
		info!("bubble-charts: sunburst with {} nodes", state.nodes.len());
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
				render::render(&c.state, &c.ctx, &c.theme);
			}
		});
		if let Err(e) = started {
			error!("bubble-charts: {}", e);
		}
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
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut c) = *context_click.borrow_mut() {
			if let Some(i) = c.state.node_at_position(x, y) {
				c.state.click(i);
			}
		}
	};

	view! {
		<div
			class="sunburst-chart"
			style=format!("position: relative; width: {}px; height: {}px;", dims.width, dims.height)
		>
			<canvas
				node_ref=canvas_ref
				class="sunburst-canvas"
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
