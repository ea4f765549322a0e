//! Zoom-dependent scaling configuration for graph visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: The coordinate system of the layout. Values in world-space
//!   scale proportionally with zoom (appear larger when zoomed in).
//! - **Screen-space**: Pixel coordinates on the canvas. Values in screen-space
//!   remain constant regardless of zoom level.
//!
//! Circles, labels and edges live in world-space so the whole picture zooms as
//! one. Node outlines stay a fixed pixel width, and hit targets never shrink
//! below a usable on-screen size.

use super::types::NodeCategory;

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k
				let min_world = min_screen / k;
				let max_world = max_screen / k;
				base.clamp(min_world, max_world)
			}
		}
	}
}

/// Per-category node geometry, in world units.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Circle radius at rest.
	pub radius: f64,
	/// Circle radius while hovered.
	pub hover_radius: f64,
	/// Vertical distance from the node center to the label baseline.
	pub label_offset: f64,
	pub label_size: f64,
	pub label_weight: u16,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub central: NodeScaleConfig,
	pub content: NodeScaleConfig,
	/// Extra slack around the hover radius that still counts as a hit.
	pub hit_padding: f64,
	pub hit_behavior: ScaleBehavior,
	pub edge_width: f64,
	pub edge_behavior: ScaleBehavior,
	/// Node outline width.
	pub stroke_width: f64,
	pub stroke_behavior: ScaleBehavior,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			central: NodeScaleConfig {
				radius: 20.0,
				hover_radius: 26.0,
				label_offset: 34.0,
				label_size: 16.0,
				label_weight: 600,
			},
			content: NodeScaleConfig {
				radius: 12.0,
				hover_radius: 16.0,
				label_offset: 24.0,
				label_size: 12.0,
				label_weight: 400,
			},
			hit_padding: 2.0,
			hit_behavior: ScaleBehavior::Clamped {
				min_screen: 10.0,
				max_screen: f64::INFINITY,
			},
			edge_width: 2.0,
			edge_behavior: ScaleBehavior::World,
			stroke_width: 1.5,
			stroke_behavior: ScaleBehavior::Screen,
		}
	}
}

impl ScaleConfig {
	pub fn node(&self, category: NodeCategory) -> &NodeScaleConfig {
		match category {
			NodeCategory::Central => &self.central,
			NodeCategory::Content => &self.content,
		}
	}
}

/// Node geometry for one category at a specific zoom level.
#[derive(Clone, Debug)]
pub struct ScaledNode {
	pub radius: f64,
	pub hover_radius: f64,
	pub hit_radius: f64,
	pub label_offset: f64,
	/// Canvas font string (e.g., "600 16px sans-serif").
	pub label_font: String,
}

impl ScaledNode {
	fn new(node: &NodeScaleConfig, config: &ScaleConfig, k: f64) -> Self {
		Self {
			radius: node.radius,
			hover_radius: node.hover_radius,
			hit_radius: config
				.hit_behavior
				.apply(node.hover_radius + config.hit_padding, k),
			label_offset: node.label_offset,
			label_font: format!("{} {}px sans-serif", node.label_weight, node.label_size),
		}
	}

	/// Radius blended towards the hover radius by `t` in `[0, 1]`.
	pub fn radius_at(&self, t: f64) -> f64 {
		self.radius + (self.hover_radius - self.radius) * t.clamp(0.0, 1.0)
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub central: ScaledNode,
	pub content: ScaledNode,
	pub edge_width: f64,
	pub stroke_width: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			central: ScaledNode::new(&config.central, config, k),
			content: ScaledNode::new(&config.content, config, k),
			edge_width: config.edge_behavior.apply(config.edge_width, k),
			stroke_width: config.stroke_behavior.apply(config.stroke_width, k),
		}
	}

	pub fn node(&self, category: NodeCategory) -> &ScaledNode {
		match category {
			NodeCategory::Central => &self.central,
			NodeCategory::Content => &self.content,
		}
	}
}
