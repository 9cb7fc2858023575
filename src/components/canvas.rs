//! Canvas plumbing shared by the chart components: sizing, pointer
//! coordinates, and the `requestAnimationFrame` loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use crate::error::{ChartError, Dimensions};

/// Longest frame step fed to layouts and transitions, in milliseconds.
/// Keeps a backgrounded tab from jumping a transition to its end.
const MAX_FRAME_MS: f64 = 100.0;

/// Size `canvas` to `dims` and acquire its 2d context.
pub fn prepare_canvas(
	canvas: &HtmlCanvasElement,
	dims: Dimensions,
) -> Result<CanvasRenderingContext2d, ChartError> {
	canvas.set_width(dims.width as u32);
	canvas.set_height(dims.height as u32);
	canvas
		.get_context("2d")
		.map_err(|e| ChartError::Canvas(format!("{e:?}")))?
		.ok_or_else(|| ChartError::Canvas("2d context not supported".into()))?
		.dyn_into::<CanvasRenderingContext2d>()
		.map_err(|_| ChartError::Canvas("context is not a 2d context".into()))
}

/// Cursor position relative to the canvas' top-left corner.
pub fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Cursor position in viewport coordinates, for the fixed tooltip.
pub fn viewport_position(ev: &MouseEvent) -> (f64, f64) {
	(ev.client_x() as f64, ev.client_y() as f64)
}

/// Converts wall-clock timestamps into bounded per-frame deltas.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
	last: Option<f64>,
}

impl FrameClock {
	/// Milliseconds since the previous call; one 60Hz frame on the first call.
	pub fn tick(&mut self, now_ms: f64) -> f64 {
		let dt = match self.last {
			Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
			None => 1000.0 / 60.0,
		};
		self.last = Some(now_ms);
		dt
	}
}

/// Handle on a `requestAnimationFrame` loop. Clones control the same loop,
/// and the handle is `Send` so it can be stopped from `on_cleanup`.
#[derive(Clone, Debug, Default)]
pub struct AnimationLoop {
	started: Arc<AtomicBool>,
	stopped: Arc<AtomicBool>,
}

impl AnimationLoop {
	/// A loop that has not started yet.
	pub fn new() -> Self {
		Self::default()
	}

	/// Calls `frame(dt_ms)` once per animation frame until [`stop`](Self::stop).
	/// Only the first call starts anything; a stopped loop never restarts.
	pub fn start(&self, frame: impl FnMut(f64) + 'static) -> Result<(), ChartError> {
		if self.is_stopped() || self.started.swap(true, Ordering::Relaxed) {
			return Ok(());
		}
		let requested = request_frame(FrameLoop {
			frame: Box::new(frame),
			clock: FrameClock::default(),
			stopped: self.stopped.clone(),
		});
		match requested {
			Ok(()) => debug!("bubble-charts: animation loop started"),
			Err(_) => self.started.store(false, Ordering::Relaxed),
		}
		requested
	}

	/// Ends the loop. The pending frame returns without rescheduling and
	/// drops `frame` along with everything it captured.
	pub fn stop(&self) {
		self.stopped.store(true, Ordering::Relaxed);
	}

	/// Whether [`stop`](Self::stop) has been called.
	pub fn is_stopped(&self) -> bool {
		self.stopped.load(Ordering::Relaxed)
	}
}

struct FrameLoop {
	frame: Box<dyn FnMut(f64)>,
	clock: FrameClock,
	stopped: Arc<AtomicBool>,
}

/// Each frame owns the loop and moves it into the next frame's one-shot
/// callback, so nothing refers back to itself.
fn request_frame(frame_loop: FrameLoop) -> Result<(), ChartError> {
	let window = web_sys::window().ok_or_else(|| ChartError::Canvas("no window".into()))?;
	let callback = Closure::once_into_js(move || {
		let mut frame_loop = frame_loop;
		if frame_loop.stopped.load(Ordering::Relaxed) {
			debug!("bubble-charts: animation loop stopped");
			return;
		}
		let dt = frame_loop.clock.tick(js_sys::Date::now());
		(frame_loop.frame)(dt);
		if let Err(e) = request_frame(frame_loop) {
			error!("bubble-charts: {}", e);
		}
	});
	window
		.request_animation_frame(callback.unchecked_ref())
		.map(|_| ())
		.map_err(|e| ChartError::Canvas(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn frame_clock_bounds_deltas() {
		let mut clock = FrameClock::default();
		assert!((clock.tick(1000.0) - 1000.0 / 60.0).abs() < 1e-9);
		assert_eq!(clock.tick(1020.0), 20.0);
		assert_eq!(clock.tick(5000.0), MAX_FRAME_MS);
		assert_eq!(clock.tick(4000.0), 0.0);
	}

	#[test]
	fn stopped_loop_never_starts() {
		let animation = AnimationLoop::new();
		let cleanup = animation.clone();
		assert!(!animation.is_stopped());
		cleanup.stop();
		assert!(animation.is_stopped());
		assert!(animation.start(|_| {}).is_ok());
		assert!(!animation.started.load(Ordering::Relaxed));
	}
}
