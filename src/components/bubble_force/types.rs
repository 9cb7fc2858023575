//! Input records and derived nodes for the amount-sized force chart.

use serde::Deserialize;

use crate::components::record::{lenient_f64, lenient_string};

/// One grant as supplied by the caller (typically a CSV export).
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GrantRecord {
	/// Identifier carried onto the bubble.
	#[serde(default, deserialize_with = "lenient_string")]
	pub id: String,
	/// Amount the bubble area is proportional to.
	#[serde(default, deserialize_with = "lenient_f64")]
	pub total_amount: f64,
	/// Shown as the tooltip title.
	#[serde(default, deserialize_with = "lenient_string")]
	pub grant_title: String,
	/// Receiving organization.
	#[serde(default, deserialize_with = "lenient_string")]
	pub organization: String,
	/// Impact level: `low`, `medium` or `high`.
	#[serde(default, deserialize_with = "lenient_string")]
	pub group: String,
	/// Year the grant started.
	#[serde(default, deserialize_with = "lenient_string")]
	pub start_year: String,
}

/// A sized bubble built from a [`GrantRecord`].
#[derive(Clone, Debug, PartialEq)]
pub struct ForceNode {
	/// Record id.
	pub id: String,
	/// Full-grown radius.
	pub radius: f64,
	/// Grant amount.
	pub value: f64,
	/// Grant title.
	pub name: String,
	/// Organization.
	pub org: String,
	/// Impact level.
	pub group: String,
	/// Start year.
	pub year: String,
	/// Scattered starting position.
	pub initial: (f64, f64),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_csv_style_rows() {
		let json = r#"[
			{"id": "1", "total_amount": "2500000", "grant_title": "Water", "organization": "Org", "group": "high", "start_year": "2009"},
			{"id": 2, "total_amount": 1200, "group": "low", "start_year": 2008}
		]"#;
		let rows: Vec<GrantRecord> = serde_json::from_str(json).unwrap();
		assert_eq!(rows[0].total_amount, 2_500_000.0);
		assert_eq!(rows[0].start_year, "2009");
		assert_eq!(rows[1].id, "2");
		assert_eq!(rows[1].start_year, "2008");
		assert_eq!(rows[1].grant_title, "");
	}
}
