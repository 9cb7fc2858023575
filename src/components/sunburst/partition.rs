//! Adjacency partition of a tree into nested unit-square bands.
//!
//! Every node gets a horizontal extent `[x0, x1]` inside `[0, 1]`
//! proportional to its aggregate value and a vertical band
//! `[depth/n, (depth+1)/n]` where `n` is the number of levels. The sunburst
//! maps x to angle and y to radius.

use std::collections::VecDeque;

use super::types::HierarchyNode;

/// One laid-out node, stored breadth-first (parents before children).
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionNode {
	/// Name from the input tree.
	pub name: String,
	/// Own size plus the values of all descendants.
	pub value: f64,
	/// Root is depth 0.
	pub depth: usize,
	/// Index of the parent node.
	pub parent: Option<usize>,
	/// Indices of the child nodes.
	pub children: Vec<usize>,
	/// Start of the horizontal extent.
	pub x0: f64,
	/// End of the horizontal extent.
	pub x1: f64,
	/// Top of the depth band.
	pub y0: f64,
	/// Bottom of the depth band.
	pub y1: f64,
}

impl PartitionNode {
	/// Whether this is an inner node.
	pub fn has_children(&self) -> bool {
		!self.children.is_empty()
	}
}

/// Lays out `root` and returns all nodes breadth-first; index 0 is the root.
pub fn partition(root: &HierarchyNode) -> Vec<PartitionNode> {
	let mut nodes: Vec<PartitionNode> = Vec::new();
	let mut queue: VecDeque<(&HierarchyNode, Option<usize>, usize)> = VecDeque::new();
	queue.push_back((root, None, 0));

	while let Some((data, parent, depth)) = queue.pop_front() {
		let index = nodes.len();
		nodes.push(PartitionNode {
			name: data.name.clone(),
			value: 0.0,
			depth,
			parent,
			children: Vec::new(),
			x0: 0.0,
			x1: 0.0,
			y0: 0.0,
			y1: 0.0,
		});
		if let Some(p) = parent {
			nodes[p].children.push(index);
		}
		for child in &data.children {
			queue.push_back((child, Some(index), depth + 1));
		}
	}

	// Sum sizes bottom-up; breadth-first order guarantees children come later.
	let sizes: Vec<f64> = {
		let mut sizes = Vec::with_capacity(nodes.len());
		let mut queue = VecDeque::from([root]);
		while let Some(data) = queue.pop_front() {
			sizes.push(if data.size.is_finite() { data.size } else { 0.0 });
			queue.extend(data.children.iter());
		}
		sizes
	};
	for i in (0..nodes.len()).rev() {
		let from_children: f64 = nodes[i].children.iter().map(|&c| nodes[c].value).sum();
		nodes[i].value = sizes[i] + from_children;
	}

	let levels = nodes.iter().map(|n| n.depth).max().unwrap_or(0) + 1;
	let band = 1.0 / levels as f64;
	if let Some(root) = nodes.first_mut() {
		root.x0 = 0.0;
		root.x1 = 1.0;
		root.y0 = 0.0;
		root.y1 = band;
	}

	for i in 0..nodes.len() {
		let (x0, x1, value, depth) = (nodes[i].x0, nodes[i].x1, nodes[i].value, nodes[i].depth);
		let k = if value > 0.0 { (x1 - x0) / value } else { 0.0 };
		let mut x = x0;
		for c in nodes[i].children.clone() {
			let child = &mut nodes[c];
			child.x0 = x;
			x += child.value * k;
			child.x1 = x;
			child.y0 = (depth + 1) as f64 * band;
			child.y1 = (depth + 2) as f64 * band;
		}
	}

	nodes
}
