//! Force-directed star-graph layout and its canvas component.
//!
//! A host supplies an ordered node list with exactly one `central` node; every
//! other node is linked to it. The layout engine then runs:
//! - link, many-body (Barnes–Hut), center and collision forces
//! - an alpha-cooled integrator that comes to rest on its own
//! - node dragging (pin + reheat), pan, and zoom clamped to 0.5×–3×
//! - re-centering when the drawing surface is resized
//!
//! Everything except [`ForceGraphCanvas`] and the render sink is plain Rust and
//! runs headlessly.
//!
//! # Example
//!
//! ```ignore
//! use star_graph::{ForceGraphCanvas, GraphData, GraphNode, NodeCategory};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode::new("hub", "Hub", NodeCategory::Central),
//!         GraphNode::new("a", "Node A", NodeCategory::Content),
//!     ],
//!     ..Default::default()
//! };
//!
//! view! { <ForceGraphCanvas data=data on_activate={|id: String| log::info!("{id}")} /> }
//! ```

mod component;
pub mod config;
mod error;
pub mod interaction;
mod render;
pub mod resize;
pub mod scale;
pub mod simulation;
pub mod state;
pub mod theme;
mod types;

pub use component::ForceGraphCanvas;
pub use config::LayoutConfig;
pub use error::GraphError;
pub use interaction::{GraphEvent, ViewTransform};
pub use scale::{NodeScaleConfig, ScaleConfig};
pub use simulation::Simulation;
pub use state::{ForceGraphState, Frame};
pub use theme::{Color, NodeStyle, Theme};
pub use types::{GraphData, GraphNode, NodeCategory, StarGraph, normalize_id};
