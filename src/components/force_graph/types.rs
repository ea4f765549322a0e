//! Graph data structures for input to the force graph component.
//!
//! The host supplies an ordered node list; edges are never authored; they are
//! derived as a star around the single `central` node.

use serde::Deserialize;

use super::config::LayoutConfig;
use super::error::GraphError;

/// Role of a node in the star topology.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
	/// The hub every edge attaches to. Exactly one per graph.
	Central,
	/// A leaf connected only to the hub.
	#[default]
	Content,
}

/// A node in the graph as supplied by the host.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier. Derived from the label via [`normalize_id`] when absent.
	#[serde(default)]
	pub id: Option<String>,
	/// Display label drawn beside the node.
	pub label: String,
	/// Whether this is the hub or a leaf.
	#[serde(default)]
	pub category: NodeCategory,
}

impl GraphNode {
	/// Convenience constructor for hosts building nodes in code.
	pub fn new(id: impl Into<String>, label: impl Into<String>, category: NodeCategory) -> Self {
		Self {
			id: Some(id.into()),
			label: label.into(),
			category,
		}
	}

	/// The identifier this node resolves to.
	pub fn resolved_id(&self) -> String {
		self.id.clone().unwrap_or_else(|| normalize_id(&self.label))
	}
}

/// Complete graph input: nodes plus optional layout tuning.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub config: LayoutConfig,
}

/// Lower-cases `label` and collapses every run of characters outside
/// `[a-z0-9]` into a single `_`.
pub fn normalize_id(label: &str) -> String {
	let mut id = String::with_capacity(label.len());
	let mut in_separator = false;
	for c in label.chars().flat_map(char::to_lowercase) {
		if c.is_ascii_lowercase() || c.is_ascii_digit() {
			id.push(c);
			in_separator = false;
		} else if !in_separator {
			id.push('_');
			in_separator = true;
		}
	}
	id
}

/// A node after id resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct StarNode {
	pub id: String,
	pub label: String,
	pub category: NodeCategory,
}

/// An edge between two node indices; `source` is always the central node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StarEdge {
	pub source: usize,
	pub target: usize,
}

/// Validated node list with its derived star edges.
#[derive(Clone, Debug, Default)]
pub struct StarGraph {
	nodes: Vec<StarNode>,
	edges: Vec<StarEdge>,
	central: Option<usize>,
}

impl StarGraph {
	/// Resolves ids and derives one edge from the central node to every other node.
	///
	/// An empty node list is a valid, degenerate graph. Duplicate ids are not
	/// detected; the host is expected to produce unique ones.
	pub fn from_nodes(input: &[GraphNode]) -> Result<Self, GraphError> {
		let nodes: Vec<StarNode> = input
			.iter()
			.map(|node| StarNode {
				id: node.resolved_id(),
				label: node.label.clone(),
				category: node.category,
			})
			.collect();

		let mut central: Option<usize> = None;
		for (idx, node) in nodes.iter().enumerate() {
			if node.category != NodeCategory::Central {
				continue;
			}
			if let Some(first) = central {
				return Err(GraphError::MultipleCentral {
					first: nodes[first].id.clone(),
					second: node.id.clone(),
				});
			}
			central = Some(idx);
		}

		let edges = match central {
			Some(hub) => (0..nodes.len())
				.filter(|&idx| idx != hub)
				.map(|target| StarEdge {
					source: hub,
					target,
				})
				.collect(),
			None if nodes.is_empty() => Vec::new(),
			None => return Err(GraphError::MissingCentral(nodes.len())),
		};

		Ok(Self {
			nodes,
			edges,
			central,
		})
	}

	/// Like [`StarGraph::from_nodes`], after rejecting an unusable layout config.
	pub fn from_data(data: &GraphData) -> Result<Self, GraphError> {
		data.config.validate()?;
		Self::from_nodes(&data.nodes)
	}

	pub fn nodes(&self) -> &[StarNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[StarEdge] {
		&self.edges
	}

	/// Index of the central node, `None` only for an empty graph.
	pub fn central(&self) -> Option<usize> {
		self.central
	}

	/// Edges as `(source id, target id)` pairs.
	pub fn edge_ids(&self) -> Vec<(&str, &str)> {
		self.edges
			.iter()
			.map(|e| {
				(
					self.nodes[e.source].id.as_str(),
					self.nodes[e.target].id.as_str(),
				)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, category: NodeCategory) -> GraphNode {
		GraphNode::new(id, id, category)
	}

	#[test]
	fn derives_star_edges_in_node_order() {
		let graph = StarGraph::from_nodes(&[
			node("c", NodeCategory::Central),
			node("a", NodeCategory::Content),
			node("b", NodeCategory::Content),
		])
		.unwrap();

		assert_eq!(graph.edge_ids(), vec![("c", "a"), ("c", "b")]);
		assert_eq!(graph.central(), Some(0));
	}

	#[test]
	fn every_edge_touches_the_central_node_exactly_once() {
		let mut nodes: Vec<GraphNode> = (0..12)
			.map(|i| node(&format!("n{i}"), NodeCategory::Content))
			.collect();
		nodes.insert(5, node("hub", NodeCategory::Central));
		let graph = StarGraph::from_nodes(&nodes).unwrap();

		assert_eq!(graph.edges().len(), 12);
		for (source, target) in graph.edge_ids() {
			assert!((source == "hub") ^ (target == "hub"));
		}
	}

	#[test]
	fn empty_node_list_is_a_degenerate_graph() {
		let graph = StarGraph::from_nodes(&[]).unwrap();
		assert!(graph.nodes().is_empty());
		assert!(graph.edges().is_empty());
		assert_eq!(graph.central(), None);
	}

	#[test]
	fn missing_central_is_rejected() {
		let err = StarGraph::from_nodes(&[node("a", NodeCategory::Content)]).unwrap_err();
		assert!(matches!(err, GraphError::MissingCentral(1)));
	}

	#[test]
	fn second_central_is_rejected() {
		let err = StarGraph::from_nodes(&[
			node("x", NodeCategory::Central),
			node("y", NodeCategory::Central),
		])
		.unwrap_err();
		match err {
			GraphError::MultipleCentral { first, second } => {
				assert_eq!(first, "x");
				assert_eq!(second, "y");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn normalizes_labels_into_ids() {
		assert_eq!(normalize_id("On Charkhas, AI & Economic Growth"), "on_charkhas_ai_economic_growth");
		assert_eq!(normalize_id("questions"), "questions");
		assert_eq!(normalize_id("  Leading"), "_leading");
	}

	#[test]
	fn parses_json_with_derived_ids_and_default_category() {
		let data: GraphData = serde_json::from_str(
			r#"{
				"nodes": [
					{ "label": "sumukh", "category": "central" },
					{ "label": "Unbounded Generality" }
				],
				"config": { "link_distance": 120.0 }
			}"#,
		)
		.unwrap();

		assert_eq!(data.config.link_distance, 120.0);
		let graph = StarGraph::from_data(&data).unwrap();
		assert_eq!(graph.nodes()[1].id, "unbounded_generality");
		assert_eq!(graph.nodes()[1].category, NodeCategory::Content);
		assert_eq!(graph.edge_ids(), vec![("sumukh", "unbounded_generality")]);
	}

	#[test]
	fn inverted_zoom_range_is_rejected_before_layout() {
		let data: GraphData = serde_json::from_str(
			r#"{
				"nodes": [{ "label": "hub", "category": "central" }],
				"config": { "zoom_min": 4.0, "zoom_max": 2.0 }
			}"#,
		)
		.unwrap();

		let err = StarGraph::from_data(&data).unwrap_err();
		assert!(
			matches!(err, GraphError::InvalidConfig { field: "zoom_min", .. }),
			"unexpected error: {err}"
		);
	}
}
