//! Value scales, easing and interpolation shared by every chart.
//!
//! # Scales
//!
//! - [`PowScale`]: continuous power-law mapping. Exponent `0.5` gives the
//!   area-proportional radius scale used by the bubble charts, exponent `1.0`
//!   is a plain linear scale (sunburst angle), and [`PowScale::sqrt`] is the
//!   sunburst radius scale.
//! - [`OrdinalScale`]: discrete key to value mapping with an implicit,
//!   first-seen domain and a cycling range.

use std::collections::HashMap;

/// Continuous power-law scale: `v -> range` via `sign(v) * |v|^exponent`.
///
/// Output is not clamped. Values outside the domain extrapolate.
#[derive(Clone, Debug, PartialEq)]
pub struct PowScale {
	exponent: f64,
	domain: (f64, f64),
	range: (f64, f64),
}

impl PowScale {
	/// Scale with an arbitrary exponent.
	pub fn new(exponent: f64, domain: (f64, f64), range: (f64, f64)) -> Self {
		Self {
			exponent,
			domain,
			range,
		}
	}

	/// Power scale with exponent `0.5`.
	pub fn sqrt(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self::new(0.5, domain, range)
	}

	/// Power scale with exponent `1.0`.
	pub fn linear(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self::new(1.0, domain, range)
	}

	fn transform(&self, v: f64) -> f64 {
		if self.exponent == 1.0 {
			v
		} else if self.exponent == 0.5 {
			v.signum() * v.abs().sqrt()
		} else {
			v.signum() * v.abs().powf(self.exponent)
		}
	}

	/// Maps `v` from the domain onto the range.
	pub fn scale(&self, v: f64) -> f64 {
		let d0 = self.transform(self.domain.0);
		let d1 = self.transform(self.domain.1);
		let (r0, r1) = self.range;
		let span = d1 - d0;
		if span == 0.0 || !span.is_finite() {
			// Collapsed domain: everything lands in the middle of the range.
			return (r0 + r1) / 2.0;
		}
		let t = (self.transform(v) - d0) / span;
		r0 + (r1 - r0) * t
	}
}

/// Discrete scale mapping string keys onto a cycling range of values.
///
/// Keys not yet in the domain are appended on first lookup, so assignment
/// order follows the order in which keys are first requested.
#[derive(Clone, Debug)]
pub struct OrdinalScale<T: Clone> {
	index: HashMap<String, usize>,
	range: Vec<T>,
}

impl<T: Clone> OrdinalScale<T> {
	/// Scale with an empty domain.
	pub fn new(range: Vec<T>) -> Self {
		Self {
			index: HashMap::new(),
			range,
		}
	}

	/// Scale with a pre-seeded domain; `domain[i]` maps to `range[i % len]`.
	pub fn with_domain<S: Into<String>>(domain: impl IntoIterator<Item = S>, range: Vec<T>) -> Self {
		let mut scale = Self::new(range);
		for key in domain {
			scale.slot(key.into());
		}
		scale
	}

	fn slot(&mut self, key: String) -> usize {
		if let Some(&i) = self.index.get(&key) {
			return i;
		}
		let i = self.index.len();
		self.index.insert(key, i);
		i
	}

	/// Look up (or assign) the value for `key`. `None` only for an empty range.
	pub fn get(&mut self, key: &str) -> Option<T> {
		if self.range.is_empty() {
			return None;
		}
		let i = self.slot(key.to_string());
		self.range.get(i % self.range.len()).cloned()
	}

}

/// Cubic in-out easing, symmetric around `t = 0.5`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0) * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

/// Linear interpolation from `a` (`t = 0`) to `b` (`t = 1`).
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

/// [`lerp`] on both components.
pub fn lerp_pair(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
	(lerp(a.0, b.0, t), lerp(a.1, b.1, t))
}

/// Largest finite value, or `0.0` when there is none.
pub fn max_magnitude(values: impl IntoIterator<Item = f64>) -> f64 {
	values
		.into_iter()
		.filter(|v| v.is_finite())
		.fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
		.unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn sqrt_scale_hits_range_ends() {
		let scale = PowScale::sqrt((0.0, 1_000_000.0), (2.0, 85.0));
		assert!(close(scale.scale(0.0), 2.0));
		assert!(close(scale.scale(1_000_000.0), 85.0));
		// Quarter of the domain is half of the (offset) range.
		assert!(close(scale.scale(250_000.0), 2.0 + 83.0 / 2.0));
	}

	#[test]
	fn sqrt_scale_is_monotone() {
		let scale = PowScale::sqrt((0.0, 500.0), (2.0, 50.0));
		let mut last = f64::NEG_INFINITY;
		for v in (0..=500).step_by(7) {
			let r = scale.scale(v as f64);
			assert!(r >= last, "{r} < {last} at {v}");
			last = r;
		}
	}

	#[test]
	fn collapsed_domain_maps_to_midpoint() {
		let scale = PowScale::sqrt((0.0, 0.0), (2.0, 50.0));
		assert!(close(scale.scale(0.0), 26.0));
	}

	#[test]
	fn linear_scale_extrapolates_outside_the_domain() {
		let scale = PowScale::linear((0.5, 1.0), (0.0, 10.0));
		assert!(close(scale.scale(0.75), 5.0));
		assert!(close(scale.scale(0.25), -5.0));
	}

	#[test]
	fn ordinal_scale_assigns_in_first_seen_order_and_cycles() {
		let mut scale = OrdinalScale::new(vec!["a", "b"]);
		assert_eq!(scale.get("x"), Some("a"));
		assert_eq!(scale.get("y"), Some("b"));
		assert_eq!(scale.get("z"), Some("a"));
		assert_eq!(scale.get("x"), Some("a"));
		assert_eq!(scale.get("y"), Some("b"));
		assert!(OrdinalScale::<u8>::new(Vec::new()).get("x").is_none());
	}

	#[test]
	fn ordinal_scale_with_seeded_domain() {
		let mut scale = OrdinalScale::with_domain(["low", "medium", "high"], vec![1, 2, 3]);
		assert_eq!(scale.get("high"), Some(3));
		assert_eq!(scale.get("extra"), Some(1));
	}

	#[test]
	fn easing_endpoints_and_midpoint() {
		assert!(close(ease_cubic_in_out(0.0), 0.0));
		assert!(close(ease_cubic_in_out(0.5), 0.5));
		assert!(close(ease_cubic_in_out(1.0), 1.0));
		assert!(ease_cubic_in_out(0.25) < 0.25);
	}

	#[test]
	fn max_magnitude_ignores_non_finite() {
		assert_eq!(max_magnitude([1.0, f64::NAN, 7.5, 3.0]), 7.5);
		assert_eq!(max_magnitude(std::iter::empty()), 0.0);
	}
}
