//! The four forces that shape the layout.
//!
//! Each force nudges node velocities in place; the integrator sums their
//! effect by applying them one after another within a tick.

use std::f64::consts::TAU;

use super::SimNode;
use super::quadtree::QuadNode;
use crate::components::force_graph::types::StarEdge;

/// Tiny deterministic offset separating coincident points.
///
/// Returns the direction from `a` towards `b`; swapping the arguments flips it.
fn jiggle(a: usize, b: usize) -> (f64, f64) {
	let (lo, hi) = if a < b { (a, b) } else { (b, a) };
	let angle = ((lo as f64) * 0.618_034 + (hi as f64) * 0.414_214 + 0.37) * TAU;
	let (dx, dy) = (angle.cos() * 1e-6, angle.sin() * 1e-6);
	if a < b { (dx, dy) } else { (-dx, -dy) }
}

/// Spring along every edge towards a rest length.
#[derive(Clone, Debug)]
pub struct LinkForce {
	pub distance: f64,
	/// Per-edge stiffness, `1 / min(degree)` so hubs are not over-constrained.
	strengths: Vec<f64>,
}

impl LinkForce {
	pub fn new(edges: &[StarEdge], node_count: usize, distance: f64) -> Self {
		let mut degree = vec![0usize; node_count];
		for edge in edges {
			degree[edge.source] += 1;
			degree[edge.target] += 1;
		}
		let strengths = edges
			.iter()
			.map(|e| 1.0 / degree[e.source].min(degree[e.target]).max(1) as f64)
			.collect();
		Self {
			distance,
			strengths,
		}
	}

	pub fn apply(&self, nodes: &mut [SimNode], edges: &[StarEdge], alpha: f64) {
		for (edge, &strength) in edges.iter().zip(&self.strengths) {
			let (s, t) = (&nodes[edge.source], &nodes[edge.target]);
			let mut dx = (t.x + t.vx) - (s.x + s.vx);
			let mut dy = (t.y + t.vy) - (s.y + s.vy);
			if dx == 0.0 && dy == 0.0 {
				(dx, dy) = jiggle(edge.source, edge.target);
			}
			let l = (dx * dx + dy * dy).sqrt();
			let k = (l - self.distance) / l * alpha * strength * 0.5;
			let (fx, fy) = (dx * k, dy * k);

			let target = &mut nodes[edge.target];
			target.vx -= fx;
			target.vy -= fy;
			let source = &mut nodes[edge.source];
			source.vx += fx;
			source.vy += fy;
		}
	}
}

/// Mutual repulsion (or attraction, for positive strength) between all nodes.
#[derive(Clone, Debug)]
pub struct ManyBodyForce {
	pub strength: f64,
	pub theta: f64,
	pub distance_min: f64,
	pub distance_max: f64,
}

#[derive(Clone, Copy)]
struct ChargeParams {
	strength: f64,
	theta_sq: f64,
	distance_min_sq: f64,
	distance_max_sq: f64,
}

impl ManyBodyForce {
	pub fn apply(&self, nodes: &mut [SimNode], alpha: f64) {
		if nodes.len() < 2 || self.strength == 0.0 {
			return;
		}
		let positions: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
		let Some(tree) = QuadNode::build(&positions) else {
			return;
		};
		let params = ChargeParams {
			strength: self.strength * alpha,
			theta_sq: self.theta * self.theta,
			distance_min_sq: self.distance_min * self.distance_min,
			distance_max_sq: self.distance_max * self.distance_max,
		};

		for (index, node) in nodes.iter_mut().enumerate() {
			let mut dv = (0.0, 0.0);
			accumulate_charge(&tree, index, &positions, params, &mut dv);
			node.vx += dv.0;
			node.vy += dv.1;
		}
	}
}

fn charge_between(
	mut dx: f64,
	mut dy: f64,
	weight: f64,
	params: ChargeParams,
	pair: (usize, usize),
	dv: &mut (f64, f64),
) {
	let mut l = dx * dx + dy * dy;
	if l >= params.distance_max_sq {
		return;
	}
	if l == 0.0 {
		(dx, dy) = jiggle(pair.0, pair.1);
		l = dx * dx + dy * dy;
	}
	if l < params.distance_min_sq {
		l = (params.distance_min_sq * l).sqrt();
	}
	let w = params.strength * weight / l;
	dv.0 += dx * w;
	dv.1 += dy * w;
}

fn accumulate_charge(
	node: &QuadNode,
	index: usize,
	positions: &[(f64, f64)],
	params: ChargeParams,
	dv: &mut (f64, f64),
) {
	if node.mass <= 0.0 {
		return;
	}
	let (px, py) = positions[index];

	if node.is_leaf() {
		for &other in &node.indices {
			if other == index {
				continue;
			}
			let (ox, oy) = positions[other];
			charge_between(ox - px, oy - py, 1.0, params, (index, other), dv);
		}
		return;
	}

	let (dx, dy) = (node.center_of_mass.0 - px, node.center_of_mass.1 - py);
	let side = node.bounds.side_length();
	let far_enough = side * side < params.theta_sq * (dx * dx + dy * dy);
	if far_enough && !node.bounds.contains(px, py) {
		charge_between(dx, dy, node.mass, params, (index, usize::MAX), dv);
		return;
	}

	for child in node.children.iter().flatten() {
		accumulate_charge(child, index, positions, params, dv);
	}
}

/// Shifts the whole layout so its centroid drifts towards a target point.
#[derive(Clone, Debug)]
pub struct CenterForce {
	pub x: f64,
	pub y: f64,
	pub strength: f64,
}

impl CenterForce {
	pub fn apply(&self, nodes: &mut [SimNode]) {
		if nodes.is_empty() {
			return;
		}
		let n = nodes.len() as f64;
		let (sx, sy) = nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let shift_x = (sx / n - self.x) * self.strength;
		let shift_y = (sy / n - self.y) * self.strength;
		for node in nodes {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}
}

/// Pushes overlapping node circles apart.
#[derive(Clone, Debug)]
pub struct CollideForce {
	radii: Vec<f64>,
	max_radius: f64,
	pub strength: f64,
}

impl CollideForce {
	pub fn new(radii: Vec<f64>, strength: f64) -> Self {
		let max_radius = radii.iter().copied().fold(0.0, f64::max);
		Self {
			radii,
			max_radius,
			strength,
		}
	}

	pub fn radius(&self, index: usize) -> f64 {
		self.radii[index]
	}

	pub fn apply(&self, nodes: &mut [SimNode]) {
		if nodes.len() < 2 || self.max_radius <= 0.0 {
			return;
		}
		// Predicted positions, as the integrator will place them.
		let predicted: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x + n.vx, n.y + n.vy)).collect();
		let Some(tree) = QuadNode::build(&predicted) else {
			return;
		};

		for index in 0..nodes.len() {
			let mut others = Vec::new();
			let reach = self.radii[index] + self.max_radius;
			collect_nearby(&tree, index, &predicted, reach * reach, &mut others);

			for other in others {
				self.separate(nodes, &predicted, index, other);
			}
		}
	}

	fn separate(&self, nodes: &mut [SimNode], predicted: &[(f64, f64)], i: usize, j: usize) {
		let (ri, rj) = (self.radii[i], self.radii[j]);
		let r = ri + rj;
		let (mut dx, mut dy) = (predicted[i].0 - predicted[j].0, predicted[i].1 - predicted[j].1);
		let mut l = dx * dx + dy * dy;
		if l >= r * r {
			return;
		}
		if l == 0.0 {
			(dx, dy) = jiggle(j, i);
			l = dx * dx + dy * dy;
		}
		let l = l.sqrt();
		let k = (r - l) / l * self.strength;
		let (fx, fy) = (dx * k, dy * k);
		// The smaller circle moves further.
		let share = (rj * rj) / (ri * ri + rj * rj);

		nodes[i].vx += fx * share;
		nodes[i].vy += fy * share;
		nodes[j].vx -= fx * (1.0 - share);
		nodes[j].vy -= fy * (1.0 - share);
	}
}

/// Gathers indices greater than `index` whose cells lie within `reach_sq` of it.
fn collect_nearby(
	node: &QuadNode,
	index: usize,
	positions: &[(f64, f64)],
	reach_sq: f64,
	out: &mut Vec<usize>,
) {
	let (px, py) = positions[index];
	if node.bounds.distance_sq_to_point(px, py) > reach_sq {
		return;
	}
	if node.is_leaf() {
		out.extend(node.indices.iter().copied().filter(|&other| other > index));
		return;
	}
	for child in node.children.iter().flatten() {
		collect_nearby(child, index, positions, reach_sq, out);
	}
}
