//! Alpha-cooled force simulation.
//!
//! A [`Simulation`] owns every node and advances them one [`Simulation::tick`]
//! at a time. Each tick applies the link, many-body, center and collision
//! forces to node velocities, integrates positions, then moves alpha
//! geometrically towards its target. Once alpha drops below `alpha_min` with
//! a resting target the simulation stops moving until something reheats it.

mod forces;
mod quadtree;

use std::f64::consts::PI;

use log::{debug, info};

use forces::{CenterForce, CollideForce, LinkForce, ManyBodyForce};

use super::config::LayoutConfig;
use super::types::{NodeCategory, StarEdge, StarGraph};

/// A hard position constraint; the node sits exactly here while it is set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pin {
	pub x: f64,
	pub y: f64,
}

/// A node as the simulation sees it.
#[derive(Clone, Debug)]
pub struct SimNode {
	pub id: String,
	pub label: String,
	pub category: NodeCategory,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Active drag constraint, if any.
	pub pin: Option<Pin>,
}

impl SimNode {
	pub fn new(id: String, label: String, category: NodeCategory, x: f64, y: f64) -> Self {
		Self {
			id,
			label,
			category,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			pin: None,
		}
	}
}

/// Golden-angle spiral placement around `(cx, cy)`.
fn phyllotaxis(index: usize, cx: f64, cy: f64) -> (f64, f64) {
	const INITIAL_RADIUS: f64 = 10.0;
	let initial_angle = PI * (3.0 - 5.0_f64.sqrt());
	let radius = INITIAL_RADIUS * (0.5 + index as f64).sqrt();
	let angle = index as f64 * initial_angle;
	(cx + radius * angle.cos(), cy + radius * angle.sin())
}

/// Force-directed layout state: nodes, edges, forces and the cooling schedule.
pub struct Simulation {
	nodes: Vec<SimNode>,
	edges: Vec<StarEdge>,
	alpha: f64,
	alpha_target: f64,
	alpha_min: f64,
	alpha_decay: f64,
	velocity_decay: f64,
	link: LinkForce,
	many_body: ManyBodyForce,
	center: CenterForce,
	collide: CollideForce,
	stopped: bool,
}

impl Simulation {
	/// Lays the graph out in a spiral around `(cx, cy)` at full heat.
	pub fn new(graph: &StarGraph, config: &LayoutConfig, cx: f64, cy: f64) -> Self {
		// Central node first so it starts closest to the middle.
		let order = graph
			.central()
			.into_iter()
			.chain((0..graph.nodes().len()).filter(|&i| Some(i) != graph.central()));
		let mut nodes: Vec<SimNode> = graph
			.nodes()
			.iter()
			.map(|n| SimNode::new(n.id.clone(), n.label.clone(), n.category, cx, cy))
			.collect();
		for (slot, idx) in order.enumerate() {
			(nodes[idx].x, nodes[idx].y) = phyllotaxis(slot, cx, cy);
		}

		let edges = graph.edges().to_vec();
		let radii = nodes
			.iter()
			.map(|n| config.collision_radius_for(n.category))
			.collect();

		info!(
			"simulation: {} nodes, {} edges, center ({cx}, {cy})",
			nodes.len(),
			edges.len()
		);

		Self {
			link: LinkForce::new(&edges, nodes.len(), config.link_distance),
			many_body: ManyBodyForce {
				strength: config.charge_strength,
				theta: config.theta,
				distance_min: config.distance_min,
				distance_max: config.distance_max,
			},
			center: CenterForce {
				x: cx,
				y: cy,
				strength: config.center_strength,
			},
			collide: CollideForce::new(radii, config.collision_strength),
			nodes,
			edges,
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_min: config.alpha_min,
			alpha_decay: config.alpha_decay,
			velocity_decay: config.velocity_decay,
			stopped: false,
		}
	}

	/// Advances the layout by one step. Returns `false` without touching any
	/// node when the simulation is stopped or at rest.
	pub fn tick(&mut self) -> bool {
		if self.stopped || self.is_at_rest() {
			return false;
		}

		self.link.apply(&mut self.nodes, &self.edges, self.alpha);
		self.many_body.apply(&mut self.nodes, self.alpha);
		self.center.apply(&mut self.nodes);
		self.collide.apply(&mut self.nodes);

		let retain = 1.0 - self.velocity_decay;
		for node in &mut self.nodes {
			match node.pin {
				Some(pin) => {
					(node.x, node.y) = (pin.x, pin.y);
					(node.vx, node.vy) = (0.0, 0.0);
				}
				None => {
					node.vx *= retain;
					node.vy *= retain;
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}

		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		if self.is_at_rest() {
			debug!("simulation: at rest");
		}
		true
	}

	/// Ticks until rest or `max_ticks`, returning the number of ticks taken.
	pub fn run_until_rest(&mut self, max_ticks: usize) -> usize {
		let mut ticks = 0;
		while ticks < max_ticks && self.tick() {
			ticks += 1;
		}
		ticks
	}

	/// Alpha has cooled below `alpha_min` and nothing is holding it up.
	pub fn is_at_rest(&self) -> bool {
		self.alpha < self.alpha_min && self.alpha_target < self.alpha_min
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_min(&self) -> f64 {
		self.alpha_min
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.max(0.0);
	}

	/// Raises alpha to at least `alpha`. Never cools the simulation.
	pub fn reheat(&mut self, alpha: f64) {
		if alpha > self.alpha {
			debug!("simulation: reheat {:.3} -> {alpha:.3}", self.alpha);
			self.alpha = alpha;
		}
	}

	/// Fixes node `index` at `(x, y)` from the next tick on.
	pub fn pin(&mut self, index: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(index) {
			node.pin = Some(Pin { x, y });
		}
	}

	pub fn unpin(&mut self, index: usize) {
		if let Some(node) = self.nodes.get_mut(index) {
			node.pin = None;
		}
	}

	/// Moves the centering target without touching any node.
	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center.x = x;
		self.center.y = y;
	}

	pub fn center(&self) -> (f64, f64) {
		(self.center.x, self.center.y)
	}

	pub fn link_distance(&self) -> f64 {
		self.link.distance
	}

	pub fn collision_radius(&self, index: usize) -> f64 {
		self.collide.radius(index)
	}

	/// Halts the simulation for good; later ticks are no-ops.
	pub fn stop(&mut self) {
		self.stopped = true;
	}

	pub fn is_stopped(&self) -> bool {
		self.stopped
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node(&self, index: usize) -> Option<&SimNode> {
		self.nodes.get(index)
	}

	pub fn edges(&self) -> &[StarEdge] {
		&self.edges
	}

	pub fn find(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|n| n.id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::GraphNode;

	fn star(count: usize) -> StarGraph {
		let mut nodes = vec![GraphNode::new("c", "c", NodeCategory::Central)];
		nodes.extend(
			(1..count).map(|i| GraphNode::new(format!("n{i}"), "leaf", NodeCategory::Content)),
		);
		StarGraph::from_nodes(&nodes).unwrap()
	}

	fn distance(a: &SimNode, b: &SimNode) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn ten_node_graph_comes_to_rest() {
		let mut sim = Simulation::new(&star(10), &LayoutConfig::default(), 450.0, 300.0);
		assert_eq!(sim.alpha(), 1.0);

		let ticks = sim.run_until_rest(1_000);
		assert!(ticks < 500, "took {ticks} ticks");
		assert!(sim.is_at_rest());
		assert!(sim.alpha() < sim.alpha_min());
		assert!(!sim.tick());
	}

	fn assert_no_overlap(count: usize) {
		let mut sim = Simulation::new(&star(count), &LayoutConfig::default(), 450.0, 300.0);
		sim.run_until_rest(1_000);
		assert!(sim.is_at_rest(), "{count} nodes never came to rest");

		let nodes = sim.nodes();
		for i in 0..nodes.len() {
			for j in (i + 1)..nodes.len() {
				let min = sim.collision_radius(i) + sim.collision_radius(j);
				let gap = distance(&nodes[i], &nodes[j]) - min;
				assert!(gap >= -1.0, "{count} nodes: {i} and {j} overlap by {}", -gap);
			}
		}
	}

	#[test]
	fn resting_nodes_do_not_overlap() {
		assert_no_overlap(10);
	}

	#[test]
	fn crowded_rings_still_resolve_collisions() {
		// 48 leaves at link distance 180 cannot all fit on one ring, so
		// collision does real work here.
		for count in [20, 30, 49] {
			assert_no_overlap(count);
		}
	}

	#[test]
	fn three_node_star_settles_near_link_distance() {
		let nodes = [
			GraphNode::new("c", "c", NodeCategory::Central),
			GraphNode::new("a", "a", NodeCategory::Content),
			GraphNode::new("b", "b", NodeCategory::Content),
		];
		let graph = StarGraph::from_nodes(&nodes).unwrap();
		let mut sim = Simulation::new(&graph, &LayoutConfig::default(), 450.0, 300.0);
		sim.run_until_rest(1_000);

		let c = sim.find("c").unwrap();
		let (a, b) = (sim.find("a").unwrap(), sim.find("b").unwrap());
		let nodes = sim.nodes();
		let d = sim.link_distance();
		assert!((distance(&nodes[c], &nodes[a]) - d).abs() < d * 0.25);
		assert!((distance(&nodes[c], &nodes[b]) - d).abs() < d * 0.25);
		assert!(distance(&nodes[a], &nodes[b]) > 1.0);
	}

	#[test]
	fn pinned_node_holds_its_pin_under_any_force() {
		let config = LayoutConfig {
			charge_strength: -50_000.0,
			..LayoutConfig::default()
		};
		let mut sim = Simulation::new(&star(8), &config, 0.0, 0.0);
		sim.pin(3, -120.5, 77.25);
		for _ in 0..50 {
			sim.tick();
			let node = sim.node(3).unwrap();
			assert_eq!((node.x, node.y), (-120.5, 77.25));
			assert_eq!((node.vx, node.vy), (0.0, 0.0));
		}

		sim.unpin(3);
		sim.tick();
		assert_ne!(sim.node(3).unwrap().x, -120.5);
	}

	#[test]
	fn reheat_never_lowers_alpha() {
		let mut sim = Simulation::new(&star(4), &LayoutConfig::default(), 0.0, 0.0);
		sim.reheat(0.3);
		assert_eq!(sim.alpha(), 1.0);

		sim.run_until_rest(1_000);
		sim.reheat(0.3);
		assert_eq!(sim.alpha(), 0.3);
		assert!(!sim.is_at_rest());
	}

	#[test]
	fn alpha_target_holds_simulation_awake() {
		let mut sim = Simulation::new(&star(4), &LayoutConfig::default(), 0.0, 0.0);
		sim.set_alpha_target(0.3);
		assert_eq!(sim.run_until_rest(2_000), 2_000);
		assert!((sim.alpha() - 0.3).abs() < 1e-3);

		sim.set_alpha_target(0.0);
		assert!(sim.run_until_rest(2_000) < 2_000);
	}

	#[test]
	fn empty_graph_idles_at_rest() {
		let mut sim = Simulation::new(&StarGraph::default(), &LayoutConfig::default(), 0.0, 0.0);
		assert!(sim.nodes().is_empty());
		let ticks = sim.run_until_rest(1_000);
		assert!(ticks <= 301);
		assert!(sim.is_at_rest());
	}

	#[test]
	fn stopped_simulation_never_moves() {
		let mut sim = Simulation::new(&star(5), &LayoutConfig::default(), 0.0, 0.0);
		let before: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		sim.stop();
		assert!(!sim.tick());
		sim.reheat(1.0);
		assert!(!sim.tick());
		let after: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
		assert!(sim.is_stopped());
	}

	#[test]
	fn central_node_starts_closest_to_the_center() {
		let nodes = [
			GraphNode::new("a", "a", NodeCategory::Content),
			GraphNode::new("c", "c", NodeCategory::Central),
		];
		let graph = StarGraph::from_nodes(&nodes).unwrap();
		let sim = Simulation::new(&graph, &LayoutConfig::default(), 100.0, 100.0);

		let from_center = |n: &SimNode| ((n.x - 100.0).powi(2) + (n.y - 100.0).powi(2)).sqrt();
		let (a, c) = (sim.node(0).unwrap(), sim.node(1).unwrap());
		assert!(from_center(c) < from_center(a));
		assert!(from_center(c) < 10.0);
	}
}
