//! Lenient field decoding for externally supplied records.
//!
//! Datasets often come from CSV exports where numbers arrive as strings and
//! identifiers as numbers. Magnitudes that cannot be read as a finite number
//! decode as `0.0` rather than failing the whole dataset.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number, numeric string, or absent. Anything unreadable becomes `0.0`.
pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
	let value = Option::<Value>::deserialize(deserializer)?;
	let parsed = match value {
		Some(Value::Number(n)) => n.as_f64(),
		Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
		Some(Value::Bool(b)) => Some(if b { 1.0 } else { 0.0 }),
		_ => None,
	};
	Ok(parsed.filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// Optional non-negative integer given as a number or a numeric string.
/// Integral floats such as `1.0` count; fractions and negatives do not.
pub fn lenient_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(match value {
		Some(Value::Number(n)) => match n.as_u64() {
			Some(v) => usize::try_from(v).ok(),
			None => n.as_f64().and_then(integral_index),
		},
		Some(Value::String(s)) => {
			let s = s.trim();
			s.parse().ok().or_else(|| s.parse::<f64>().ok().and_then(integral_index))
		}
		_ => None,
	})
}

fn integral_index(v: f64) -> Option<usize> {
	if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
		usize::try_from(v as u64).ok()
	} else {
		None
	}
}

/// String, number or absent, rendered as text. Absent becomes empty.
pub fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(match value {
		Some(Value::String(s)) => s,
		Some(Value::Null) | None => String::new(),
		Some(other) => other.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde::Deserialize;

	#[derive(Deserialize)]
	struct Fields {
		#[serde(default, deserialize_with = "lenient_f64")]
		amount: f64,
		#[serde(default, deserialize_with = "lenient_index")]
		index: Option<usize>,
		#[serde(default, deserialize_with = "lenient_string")]
		id: String,
	}

	fn fields(json: &str) -> Fields {
		serde_json::from_str(json).unwrap()
	}

	#[test]
	fn numbers_and_numeric_strings_decode() {
		let p = fields(r#"{"amount": "1500.5", "index": "2", "id": 17}"#);
		assert_eq!(p.amount, 1500.5);
		assert_eq!(p.index, Some(2));
		assert_eq!(p.id, "17");
	}

	#[test]
	fn missing_or_garbage_magnitudes_become_zero() {
		let p = fields(r#"{"amount": "n/a"}"#);
		assert_eq!(p.amount, 0.0);
		assert_eq!(p.index, None);
		assert_eq!(p.id, "");
		assert_eq!(fields(r#"{"amount": "NaN"}"#).amount, 0.0);
		assert_eq!(fields(r#"{"amount": null}"#).amount, 0.0);
	}

	#[test]
	fn integral_floats_are_indices() {
		assert_eq!(fields(r#"{"index": 1.0}"#).index, Some(1));
		assert_eq!(fields(r#"{"index": "3.0"}"#).index, Some(3));
		assert_eq!(fields(r#"{"index": 1.5}"#).index, None);
		assert_eq!(fields(r#"{"index": -1}"#).index, None);
		assert_eq!(fields(r#"{"index": -2.0}"#).index, None);
	}
}
