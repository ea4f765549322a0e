//! Pointer input mapped onto simulation constraints and the view transform.
//!
//! Dragging a node pins it and keeps the simulation warm; dragging the
//! background pans; wheel and pinch zoom. Pan and zoom only ever touch the
//! [`ViewTransform`], never node positions or alpha. Hover and click are
//! reported back as [`GraphEvent`]s and have no effect on the physics.

use super::config::LayoutConfig;
use super::simulation::Simulation;

/// Pointer travel (screen px) below which a press-release counts as a click.
const CLICK_TOLERANCE: f64 = 3.0;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}
}

/// Notifications for the host UI.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	/// The focused node changed; carries its label, or `None` when focus left.
	Hover(Option<String>),
	/// A node was clicked; carries its identifier.
	Activated(String),
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug)]
struct DragState {
	node: usize,
	start_x: f64,
	start_y: f64,
	node_start_x: f64,
	node_start_y: f64,
	/// Furthest screen distance travelled since the press.
	travel: f64,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug)]
struct PanState {
	start_x: f64,
	start_y: f64,
	transform_start_x: f64,
	transform_start_y: f64,
}

/// Translates pointer gestures into pins, alpha-target changes and view updates.
#[derive(Clone, Debug)]
pub struct InteractionController {
	transform: ViewTransform,
	zoom_min: f64,
	zoom_max: f64,
	reheat_alpha: f64,
	drag: Option<DragState>,
	pan: Option<PanState>,
	hovered: Option<usize>,
	/// Finger separation at the previous pinch update.
	pinch_distance: Option<f64>,
}

impl InteractionController {
	pub fn new(config: &LayoutConfig) -> Self {
		Self {
			transform: ViewTransform::default(),
			zoom_min: config.zoom_min,
			zoom_max: config.zoom_max,
			reheat_alpha: config.reheat_alpha,
			drag: None,
			pan: None,
			hovered: None,
			pinch_distance: None,
		}
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn dragged(&self) -> Option<usize> {
		self.drag.as_ref().map(|d| d.node)
	}

	pub fn is_panning(&self) -> bool {
		self.pan.is_some()
	}

	/// Press at screen `(sx, sy)`; `hit` is the node under the pointer, if any.
	pub fn pointer_down(&mut self, sim: &mut Simulation, hit: Option<usize>, sx: f64, sy: f64) {
		self.end_gesture(sim);

		let Some((index, node)) = hit.and_then(|i| sim.node(i).map(|n| (i, n))) else {
			self.pan = Some(PanState {
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			});
			return;
		};

		let (node_x, node_y) = (node.x, node.y);
		self.drag = Some(DragState {
			node: index,
			start_x: sx,
			start_y: sy,
			node_start_x: node_x,
			node_start_y: node_y,
			travel: 0.0,
		});
		sim.set_alpha_target(self.reheat_alpha);
		sim.pin(index, node_x, node_y);
	}

	/// Pointer moved to `(sx, sy)`. Reports hover changes when no gesture is active.
	pub fn pointer_move(
		&mut self,
		sim: &mut Simulation,
		hit: Option<usize>,
		sx: f64,
		sy: f64,
	) -> Option<GraphEvent> {
		if let Some(drag) = self.drag.as_mut() {
			let (dx, dy) = (sx - drag.start_x, sy - drag.start_y);
			drag.travel = drag.travel.max((dx * dx + dy * dy).sqrt());
			let k = self.transform.k;
			sim.pin(
				drag.node,
				drag.node_start_x + dx / k,
				drag.node_start_y + dy / k,
			);
			return None;
		}

		if let Some(pan) = &self.pan {
			self.transform.x = pan.transform_start_x + (sx - pan.start_x);
			self.transform.y = pan.transform_start_y + (sy - pan.start_y);
			return None;
		}

		self.set_hover(sim, hit)
	}

	/// Release. Ends any drag or pan; a drag that barely moved is a click.
	pub fn pointer_up(&mut self, sim: &mut Simulation) -> Option<GraphEvent> {
		let clicked = self
			.drag
			.as_ref()
			.filter(|d| d.travel < CLICK_TOLERANCE)
			.and_then(|d| sim.node(d.node))
			.map(|n| GraphEvent::Activated(n.id.clone()));
		self.end_gesture(sim);
		clicked
	}

	/// Pointer left the surface: end gestures and drop focus.
	pub fn pointer_leave(&mut self, sim: &mut Simulation) -> Option<GraphEvent> {
		self.end_gesture(sim);
		self.pinch_distance = None;
		self.set_hover(sim, None)
	}

	fn end_gesture(&mut self, sim: &mut Simulation) {
		if let Some(drag) = self.drag.take() {
			sim.unpin(drag.node);
			sim.set_alpha_target(0.0);
		}
		self.pan = None;
	}

	fn set_hover(&mut self, sim: &Simulation, hit: Option<usize>) -> Option<GraphEvent> {
		if self.hovered == hit {
			return None;
		}
		self.hovered = hit;
		let label = hit.and_then(|i| sim.node(i)).map(|n| n.label.clone());
		Some(GraphEvent::Hover(label))
	}

	/// Wheel zoom about the pointer. `delta_mode` follows the DOM:
	/// 0 = pixels, 1 = lines, 2 = pages.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64, delta_mode: u32) {
		let per_unit = match delta_mode {
			0 => 0.002,
			1 => 0.05,
			_ => 1.0,
		};
		self.zoom_at(sx, sy, 2f64.powf(-delta_y * per_unit));
	}

	/// Two-finger update; zooms about the midpoint by the change in separation.
	pub fn pinch(&mut self, a: (f64, f64), b: (f64, f64)) {
		let distance = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
		if let Some(previous) = self.pinch_distance.filter(|d| *d > 0.0) {
			let (mx, my) = ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5);
			self.zoom_at(mx, my, distance / previous);
		}
		self.pinch_distance = Some(distance);
	}

	pub fn end_pinch(&mut self) {
		self.pinch_distance = None;
	}

	/// Scales by `factor` keeping the graph point under `(sx, sy)` fixed.
	/// The result is clamped to the configured zoom range.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		if factor.is_nan() || !sx.is_finite() || !sy.is_finite() {
			return;
		}
		// Unlike clamp, max/min tolerates an inverted range.
		let new_k = (self.transform.k * factor).max(self.zoom_min).min(self.zoom_max);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}
}
