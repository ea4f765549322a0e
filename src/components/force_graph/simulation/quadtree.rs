//! Region quadtree over node positions.
//!
//! Used by the many-body force for the Barnes–Hut approximation and by the
//! collision force to skip cells that cannot overlap.

const QUADTREE_LEAF_CAPACITY: usize = 4;
const QUADTREE_MAX_DEPTH: usize = 16;

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
	pub(super) cx: f64,
	pub(super) cy: f64,
	pub(super) half_extent: f64,
}

impl QuadBounds {
	fn from_points(points: &[(f64, f64)]) -> Option<Self> {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);

		for &(x, y) in points {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}

		if !min_x.is_finite() || !min_y.is_finite() || !max_x.is_finite() || !max_y.is_finite() {
			return None;
		}

		let span = (max_x - min_x).max(max_y - min_y).max(1.0);
		Some(Self {
			cx: (min_x + max_x) * 0.5,
			cy: (min_y + max_y) * 0.5,
			half_extent: span * 0.5 + 1.0,
		})
	}

	pub(super) fn contains(self, x: f64, y: f64) -> bool {
		(x - self.cx).abs() <= self.half_extent && (y - self.cy).abs() <= self.half_extent
	}

	pub(super) fn side_length(self) -> f64 {
		self.half_extent * 2.0
	}

	/// Squared distance from a point to the nearest edge of the cell (0 inside).
	pub(super) fn distance_sq_to_point(self, x: f64, y: f64) -> f64 {
		let dx = ((x - self.cx).abs() - self.half_extent).max(0.0);
		let dy = ((y - self.cy).abs() - self.half_extent).max(0.0);
		dx * dx + dy * dy
	}

	fn child(self, quadrant: usize) -> Self {
		let quarter = self.half_extent * 0.5;
		let (ox, oy) = match quadrant {
			0 => (-quarter, -quarter),
			1 => (quarter, -quarter),
			2 => (-quarter, quarter),
			_ => (quarter, quarter),
		};
		Self {
			cx: self.cx + ox,
			cy: self.cy + oy,
			half_extent: quarter,
		}
	}

	fn quadrant_for(self, x: f64, y: f64) -> usize {
		match (x >= self.cx, y >= self.cy) {
			(false, false) => 0,
			(true, false) => 1,
			(false, true) => 2,
			(true, true) => 3,
		}
	}
}

pub(super) struct QuadNode {
	pub(super) bounds: QuadBounds,
	/// Mean position of every point below this cell.
	pub(super) center_of_mass: (f64, f64),
	/// Number of points below this cell.
	pub(super) mass: f64,
	/// Point indices; only populated on leaves.
	pub(super) indices: Vec<usize>,
	pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
	/// Builds a tree over `positions`. `None` when empty or any coordinate is not finite.
	pub(super) fn build(positions: &[(f64, f64)]) -> Option<Self> {
		let bounds = QuadBounds::from_points(positions)?;
		let indices = (0..positions.len()).collect();
		Some(Self::build_node(bounds, indices, positions, 0))
	}

	fn build_node(
		bounds: QuadBounds,
		indices: Vec<usize>,
		positions: &[(f64, f64)],
		depth: usize,
	) -> Self {
		let (mut sx, mut sy) = (0.0, 0.0);
		for &index in &indices {
			sx += positions[index].0;
			sy += positions[index].1;
		}
		let mass = indices.len() as f64;
		let center_of_mass = if mass > 0.0 {
			(sx / mass, sy / mass)
		} else {
			(bounds.cx, bounds.cy)
		};

		let mut node = Self {
			bounds,
			center_of_mass,
			mass,
			indices,
			children: std::array::from_fn(|_| None),
		};

		if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
			return node;
		}

		let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
		for &index in &node.indices {
			let (x, y) = positions[index];
			buckets[bounds.quadrant_for(x, y)].push(index);
		}

		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			node.children[quadrant] = Some(Box::new(Self::build_node(
				bounds.child(quadrant),
				bucket,
				positions,
				depth + 1,
			)));
		}
		node.indices.clear();
		node
	}

	pub(super) fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn leaf_indices(node: &QuadNode, out: &mut Vec<usize>) {
		out.extend(&node.indices);
		for child in node.children.iter().flatten() {
			leaf_indices(child, out);
		}
	}

	#[test]
	fn every_point_lands_in_exactly_one_leaf() {
		let positions: Vec<(f64, f64)> = (0..40)
			.map(|i| ((i as f64 * 37.0) % 101.0, (i as f64 * 53.0) % 89.0))
			.collect();
		let tree = QuadNode::build(&positions).unwrap();

		let mut seen = Vec::new();
		leaf_indices(&tree, &mut seen);
		seen.sort_unstable();
		assert_eq!(seen, (0..40).collect::<Vec<_>>());
		assert_eq!(tree.mass, 40.0);
		assert!(!tree.is_leaf());
	}

	#[test]
	fn coincident_points_stop_at_max_depth() {
		let positions = vec![(3.0, 3.0); 10];
		let tree = QuadNode::build(&positions).unwrap();
		let mut seen = Vec::new();
		leaf_indices(&tree, &mut seen);
		assert_eq!(seen.len(), 10);
		assert_eq!(tree.center_of_mass, (3.0, 3.0));
	}

	#[test]
	fn rejects_non_finite_positions() {
		assert!(QuadNode::build(&[]).is_none());
		assert!(QuadNode::build(&[(f64::NAN, 0.0)]).is_none());
	}

	#[test]
	fn bounds_distance_is_zero_inside() {
		let bounds = QuadBounds {
			cx: 0.0,
			cy: 0.0,
			half_extent: 10.0,
		};
		assert!(bounds.contains(5.0, -5.0));
		assert_eq!(bounds.distance_sq_to_point(5.0, -5.0), 0.0);
		assert_eq!(bounds.distance_sq_to_point(13.0, 14.0), 9.0 + 16.0);
	}
}
