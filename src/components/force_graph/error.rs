//! Construction-time failures for the star graph.
//!
//! The physics itself never fails; every variant here is a precondition the
//! host violated while handing over its node list.

use thiserror::Error;

/// Reasons a graph could not be built from host input.
#[derive(Debug, Error)]
pub enum GraphError {
	/// The host never supplied a node source (e.g. the data element is absent).
	#[error("no graph data source was found")]
	MissingSource,
	/// The node source exists but is not valid graph JSON.
	#[error("failed to parse graph data: {0}")]
	Parse(#[from] serde_json::Error),
	/// A non-empty node list without any `central` node.
	#[error("graph has {0} nodes but none is marked central")]
	MissingCentral(usize),
	/// More than one node claims the `central` category.
	#[error("graph has more than one central node: `{first}` and `{second}`")]
	MultipleCentral { first: String, second: String },
	/// A layout parameter outside the range the engine can work with.
	#[error("invalid layout config: `{field}` {reason}")]
	InvalidConfig { field: &'static str, reason: String },
}
