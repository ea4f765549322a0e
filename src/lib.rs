//! star-graph: Interactive force-directed star graph for the browser.
//!
//! This crate provides a WASM-based canvas component that lays out one central
//! node and its satellites with an alpha-cooled force simulation, supporting
//! node dragging, pan/zoom, hover and click notifications.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;

pub use components::force_graph::{
	ForceGraphCanvas, GraphData, GraphError, GraphNode, LayoutConfig, NodeCategory, StarGraph,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("star-graph: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with `{ nodes: [{ id?, label, category? }], config? }`.
pub fn load_graph_data() -> Result<GraphData, GraphError> {
	let script = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id("graph-data"))
		.and_then(|e| e.dyn_into::<HtmlScriptElement>().ok())
		.ok_or(GraphError::MissingSource)?;
	let json_text = script.text().map_err(|_| GraphError::MissingSource)?;

	let data: GraphData = serde_json::from_str(&json_text)?;
	StarGraph::from_data(&data)?;
	info!("star-graph: loaded {} nodes", data.nodes.len());
	Ok(data)
}

/// Built-in graph shown when the page embeds no data of its own.
pub fn demo_graph() -> GraphData {
	let hub = GraphNode::new("skar", "skar", NodeCategory::Central);
	let leaves = [
		"The Parable of The Robot Pirate",
		"The Dangerous Intuition Of David Bohm",
		"On An Alien Planet",
		"On Charkhas, AI & Economic Growth",
		"This Magic Trick Has No Secrets",
		"The Unsettling Physics of Causality",
		"questions",
		"Unbounded Generality",
		"The Pāṇinian Approach to Compression",
	]
	.into_iter()
	.map(|label| GraphNode {
		id: None,
		label: label.to_string(),
		category: NodeCategory::Content,
	});

	GraphData {
		nodes: std::iter::once(hub).chain(leaves).collect(),
		config: LayoutConfig::default(),
	}
}

/// Main application component.
/// Loads graph data from DOM and renders the force-directed visualization.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = match load_graph_data() {
		Ok(data) => Ok(data),
		Err(GraphError::MissingSource) => {
			info!("star-graph: no embedded graph data, showing demo graph");
			Ok(demo_graph())
		}
		Err(err) => {
			warn!("star-graph: {err}");
			Err(err.to_string())
		}
	};
	let (hovered, set_hovered) = signal(None::<String>);

	let graph_view = match graph_data {
		Ok(data) => view! {
			<ForceGraphCanvas
				data=data
				on_hover={move |label: Option<String>| set_hovered.set(label)}
				on_activate={|id: String| info!("star-graph: clicked node {id}")}
			/>
		}
		.into_any(),
		Err(message) => view! { <p class="graph-error">{message}</p> }.into_any(),
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Interactive Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="graph-page">
			<header class="graph-header">
				<h2>"Interactive Graph"</h2>
			</header>
			<div class="graph-area">
				{graph_view}
				<div class="graph-overlay">
					<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
					<Show when={move || hovered.get().is_some()}>
						<p class="hovered">"Hovering: " {move || hovered.get().unwrap_or_default()}</p>
					</Show>
				</div>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn demo_graph_is_a_valid_star() {
		let graph = StarGraph::from_data(&demo_graph()).unwrap();
		assert_eq!(graph.nodes().len(), 10);
		assert_eq!(graph.edges().len(), 9);
		assert_eq!(graph.central(), Some(0));
		assert_eq!(graph.nodes()[7].id, "questions");
		assert_eq!(graph.nodes()[1].id, "the_parable_of_the_robot_pirate");
	}
}
