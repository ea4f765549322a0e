//! Keeps the layout centred when the drawing surface changes size.

use log::debug;

use super::simulation::Simulation;

/// Re-targets the centering force on size changes and gently reheats.
#[derive(Clone, Copy, Debug)]
pub struct ResizeAdapter {
	reheat_alpha: f64,
	size: Option<(f64, f64)>,
}

impl ResizeAdapter {
	pub fn new(reheat_alpha: f64) -> Self {
		Self {
			reheat_alpha,
			size: None,
		}
	}

	/// Last accepted surface size.
	pub fn size(&self) -> Option<(f64, f64)> {
		self.size
	}

	/// Applies a new surface size. Node positions and pins are untouched; only
	/// the centering target moves, and alpha is raised so nodes drift to it.
	///
	/// Repeating a size re-applies the same center and restarts cooling.
	/// Returns `false` for non-positive or non-finite dimensions (hidden surface).
	pub fn apply(&mut self, sim: &mut Simulation, width: f64, height: f64) -> bool {
		if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
			debug!("resize: ignoring {width}x{height}");
			return false;
		}
		self.size = Some((width, height));
		sim.set_center(width / 2.0, height / 2.0);
		sim.reheat(self.reheat_alpha);
		debug!("resize: {width}x{height}");
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::LayoutConfig;
	use crate::components::force_graph::types::{GraphNode, NodeCategory, StarGraph};

	fn resting_sim() -> Simulation {
		let nodes = [
			GraphNode::new("c", "c", NodeCategory::Central),
			GraphNode::new("a", "a", NodeCategory::Content),
			GraphNode::new("b", "b", NodeCategory::Content),
		];
		let graph = StarGraph::from_nodes(&nodes).unwrap();
		let mut sim = Simulation::new(&graph, &LayoutConfig::default(), 450.0, 300.0);
		sim.run_until_rest(1_000);
		sim
	}

	#[test]
	fn resize_recenters_and_reheats() {
		let mut sim = resting_sim();
		let mut adapter = ResizeAdapter::new(0.3);
		assert!(adapter.apply(&mut sim, 900.0, 600.0));
		sim.run_until_rest(1_000);
		assert!(sim.is_at_rest());

		assert!(adapter.apply(&mut sim, 1200.0, 400.0));
		assert_eq!(sim.center(), (600.0, 200.0));
		assert!(sim.alpha() > sim.alpha_min());
		assert!(!sim.is_at_rest());
	}

	#[test]
	fn layout_drifts_towards_the_new_center() {
		let mut sim = resting_sim();
		let mut adapter = ResizeAdapter::new(0.3);
		adapter.apply(&mut sim, 1200.0, 400.0);
		sim.run_until_rest(1_000);

		let n = sim.nodes().len() as f64;
		let cx = sim.nodes().iter().map(|node| node.x).sum::<f64>() / n;
		let cy = sim.nodes().iter().map(|node| node.y).sum::<f64>() / n;
		assert!((cx - 600.0).abs() < 20.0, "cx = {cx}");
		assert!((cy - 200.0).abs() < 20.0, "cy = {cy}");
	}

	#[test]
	fn repeated_notifications_only_restart_cooling() {
		let mut sim = resting_sim();
		let mut adapter = ResizeAdapter::new(0.3);
		for _ in 0..5 {
			assert!(adapter.apply(&mut sim, 800.0, 600.0));
		}
		assert_eq!(sim.center(), (400.0, 300.0));
		assert_eq!(sim.alpha(), 0.3);
		assert_eq!(sim.nodes().len(), 3);
		assert_eq!(sim.edges().len(), 2);
		assert_eq!(adapter.size(), Some((800.0, 600.0)));

		sim.run_until_rest(1_000);
		assert!(adapter.apply(&mut sim, 800.0, 600.0));
		assert!(!sim.is_at_rest());
	}

	#[test]
	fn positions_and_pins_are_untouched() {
		let mut sim = resting_sim();
		sim.pin(1, 10.0, 20.0);
		let before: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();

		ResizeAdapter::new(0.3).apply(&mut sim, 1024.0, 768.0);
		let after: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
		assert_eq!(sim.node(1).and_then(|n| n.pin).map(|p| (p.x, p.y)), Some((10.0, 20.0)));
	}

	#[test]
	fn invalid_dimensions_are_ignored() {
		let mut sim = resting_sim();
		let mut adapter = ResizeAdapter::new(0.3);
		let center = sim.center();
		for (w, h) in [
			(0.0, 600.0),
			(800.0, -1.0),
			(f64::NAN, 600.0),
			(800.0, f64::INFINITY),
		] {
			assert!(!adapter.apply(&mut sim, w, h));
		}
		assert_eq!(sim.center(), center);
		assert!(sim.is_at_rest());
		assert_eq!(adapter.size(), None);
	}
}
