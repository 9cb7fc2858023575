//! Hierarchical input for the sunburst chart.

use serde::{Deserialize, Deserializer};

use crate::components::record::{lenient_f64, lenient_string};

/// A node of the input tree. Leaves carry `size`; inner nodes usually only
/// `children`, but an inner node's own `size` is counted too.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct HierarchyNode {
	/// Label shown in the tooltip.
	#[serde(default, deserialize_with = "lenient_string")]
	pub name: String,
	/// Own weight.
	#[serde(default, deserialize_with = "lenient_f64")]
	pub size: f64,
	/// Subtrees; `null` reads as none.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub children: Vec<HierarchyNode>,
}

#[cfg(test)]
impl HierarchyNode {
	pub(crate) fn leaf(name: impl Into<String>, size: f64) -> Self {
		Self {
			name: name.into(),
			size,
			children: Vec::new(),
		}
	}

	pub(crate) fn branch(name: impl Into<String>, children: Vec<HierarchyNode>) -> Self {
		Self {
			name: name.into(),
			size: 0.0,
			children,
		}
	}
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<HierarchyNode>, D::Error> {
	Ok(Option::<Vec<HierarchyNode>>::deserialize(deserializer)?.unwrap_or_default())
}
