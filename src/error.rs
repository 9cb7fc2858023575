//! Error types for chart construction and data loading.

use thiserror::Error;

/// Errors that stop a chart from rendering.
///
/// Components never propagate these to the caller: they log the error once
/// and leave the mount point empty.
#[derive(Error, Debug)]
pub enum ChartError {
	/// Width or height missing, zero, or not finite.
	#[error("missing or invalid {0} for chart")]
	MissingDimension(&'static str),

	/// No dataset supplied.
	#[error("no dataset supplied to chart")]
	MissingData,

	/// Category labels are required by this chart and were not supplied.
	#[error("no category labels supplied to chart")]
	MissingCategories,

	/// The canvas or its 2d context could not be acquired.
	#[error("canvas unavailable: {0}")]
	Canvas(String),

	/// A required DOM element is absent.
	#[error("element #{0} not found")]
	MissingElement(&'static str),

	/// Embedded chart data could not be parsed.
	#[error("failed to parse chart data: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Validated pixel dimensions of a chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
}

impl Dimensions {
	/// Both dimensions must be present, finite and positive.
	pub fn validate(width: Option<f64>, height: Option<f64>) -> Result<Self, ChartError> {
		let check = |value: Option<f64>, name: &'static str| match value {
			Some(v) if v.is_finite() && v > 0.0 => Ok(v),
			_ => Err(ChartError::MissingDimension(name)),
		};
		Ok(Self {
			width: check(width, "width")?,
			height: check(height, "height")?,
		})
	}
}

/// Presence check for a required input, mapping absence to `err`.
pub fn require<T>(value: Option<T>, err: ChartError) -> Result<T, ChartError> {
	value.ok_or(err)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_positive_dimensions() {
		let dims = Dimensions::validate(Some(960.0), Some(600.0)).unwrap();
		assert_eq!(
			dims,
			Dimensions {
				width: 960.0,
				height: 600.0
			}
		);
	}

	#[test]
	fn rejects_absent_or_degenerate_dimensions() {
		assert!(matches!(
			Dimensions::validate(None, Some(600.0)),
			Err(ChartError::MissingDimension("width"))
		));
		assert!(matches!(
			Dimensions::validate(Some(960.0), Some(0.0)),
			Err(ChartError::MissingDimension("height"))
		));
		assert!(matches!(
			Dimensions::validate(Some(f64::NAN), Some(1.0)),
			Err(ChartError::MissingDimension("width"))
		));
	}

	#[test]
	fn require_maps_absence_to_the_given_error() {
		assert!(matches!(
			require::<Vec<u8>>(None, ChartError::MissingData),
			Err(ChartError::MissingData)
		));
		assert_eq!(require(Some(3), ChartError::MissingData).unwrap(), 3);
	}

	#[test]
	fn messages_name_the_missing_input() {
		assert_eq!(
			ChartError::MissingDimension("width").to_string(),
			"missing or invalid width for chart"
		);
		assert_eq!(
			ChartError::MissingCategories.to_string(),
			"no category labels supplied to chart"
		);
	}
}
