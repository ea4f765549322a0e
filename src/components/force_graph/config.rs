//! Construction-time tuning for the layout engine.
//!
//! Every field has a default, so hosts only need to supply the values they
//! want to change, e.g. `{ "link_distance": 120.0 }` inside the graph data.

use serde::Deserialize;

use super::error::GraphError;
use super::types::NodeCategory;

/// Physics and zoom parameters for one graph instance.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Rest length of every link, in world units.
	pub link_distance: f64,
	/// Many-body strength. Negative values repel.
	pub charge_strength: f64,
	/// Barnes–Hut opening criterion (cell size / distance). `0.0` is exact.
	pub theta: f64,
	/// Distances below this are clamped before computing repulsion.
	pub distance_min: f64,
	/// Pairs farther apart than this do not repel each other.
	pub distance_max: f64,
	/// Fraction of the centroid offset removed per tick.
	pub center_strength: f64,
	/// Collision radius of content nodes.
	pub collision_radius: f64,
	/// Collision radius of the central node.
	pub central_collision_radius: f64,
	/// Fraction of each overlap resolved per tick.
	pub collision_strength: f64,
	/// Fraction of velocity lost per tick (friction).
	pub velocity_decay: f64,
	/// Alpha below which the simulation is at rest.
	pub alpha_min: f64,
	/// Geometric rate at which alpha approaches its target.
	pub alpha_decay: f64,
	/// Alpha used to re-animate the layout on drag and resize.
	pub reheat_alpha: f64,
	/// Smallest allowed zoom factor.
	pub zoom_min: f64,
	/// Largest allowed zoom factor.
	pub zoom_max: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 180.0,
			charge_strength: -450.0,
			theta: 0.9,
			distance_min: 1.0,
			distance_max: f64::INFINITY,
			center_strength: 0.1,
			collision_radius: 40.0,
			central_collision_radius: 48.0,
			collision_strength: 1.0,
			velocity_decay: 0.4,
			alpha_min,
			// Reaches alpha_min from 1.0 in 300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			reheat_alpha: 0.3,
			zoom_min: 0.5,
			zoom_max: 3.0,
		}
	}
}

impl LayoutConfig {
	/// Collision radius for a node of the given category.
	pub fn collision_radius_for(&self, category: NodeCategory) -> f64 {
		match category {
			NodeCategory::Central => self.central_collision_radius,
			NodeCategory::Content => self.collision_radius,
		}
	}

	/// Rejects values the engine cannot settle or that would break zoom clamping.
	pub fn validate(&self) -> Result<(), GraphError> {
		fn invalid(field: &'static str, reason: String) -> Result<(), GraphError> {
			Err(GraphError::InvalidConfig { field, reason })
		}

		let finite = [
			("link_distance", self.link_distance),
			("charge_strength", self.charge_strength),
			("theta", self.theta),
			("distance_min", self.distance_min),
			("center_strength", self.center_strength),
			("collision_radius", self.collision_radius),
			("central_collision_radius", self.central_collision_radius),
			("collision_strength", self.collision_strength),
			("velocity_decay", self.velocity_decay),
			("alpha_min", self.alpha_min),
			("alpha_decay", self.alpha_decay),
			("reheat_alpha", self.reheat_alpha),
			("zoom_min", self.zoom_min),
			("zoom_max", self.zoom_max),
		];
		for (field, value) in finite {
			if !value.is_finite() {
				return invalid(field, format!("must be finite, got {value}"));
			}
		}

		let non_negative = [
			("link_distance", self.link_distance),
			("theta", self.theta),
			("distance_min", self.distance_min),
			("collision_radius", self.collision_radius),
			("central_collision_radius", self.central_collision_radius),
		];
		for (field, value) in non_negative {
			if value < 0.0 {
				return invalid(field, format!("must not be negative, got {value}"));
			}
		}

		let unit = [
			("center_strength", self.center_strength),
			("collision_strength", self.collision_strength),
			("reheat_alpha", self.reheat_alpha),
		];
		for (field, value) in unit {
			if !(0.0..=1.0).contains(&value) {
				return invalid(field, format!("must lie in [0, 1], got {value}"));
			}
		}

		if self.distance_max.is_nan() || self.distance_max <= self.distance_min {
			return invalid(
				"distance_max",
				format!(
					"must exceed distance_min ({}), got {}",
					self.distance_min, self.distance_max
				),
			);
		}
		if !(0.0..1.0).contains(&self.velocity_decay) {
			return invalid(
				"velocity_decay",
				format!("must lie in [0, 1), got {}", self.velocity_decay),
			);
		}
		if self.alpha_decay <= 0.0 || self.alpha_decay > 1.0 {
			return invalid(
				"alpha_decay",
				format!("must lie in (0, 1], got {}", self.alpha_decay),
			);
		}
		if self.alpha_min <= 0.0 || self.alpha_min >= 1.0 {
			return invalid(
				"alpha_min",
				format!("must lie in (0, 1), got {}", self.alpha_min),
			);
		}
		if self.zoom_min <= 0.0 {
			return invalid("zoom_min", format!("must be positive, got {}", self.zoom_min));
		}
		if self.zoom_min > self.zoom_max {
			return invalid(
				"zoom_min",
				format!("must not exceed zoom_max ({}), got {}", self.zoom_max, self.zoom_min),
			);
		}
		Ok(())
	}
}
