//! Graph simulation state and interaction tracking.
//!
//! Bundles the layout [`Simulation`] with the pointer controller, the resize
//! adapter and a smoothed hover highlight. The host drives it with input
//! events and [`ForceGraphState::tick`], and draws whatever
//! [`ForceGraphState::frame`] returns.

use std::collections::HashMap;

use super::config::LayoutConfig;
use super::interaction::{GraphEvent, InteractionController, ViewTransform};
use super::resize::ResizeAdapter;
use super::scale::{ScaleConfig, ScaledValues};
use super::simulation::Simulation;
use super::types::{NodeCategory, StarGraph};

/// Smooth hover transitions with per-node intensity tracking.
///
/// Each node has its own intensity value (0.0 to 1.0) that eases towards 1.0
/// while hovered and back to 0.0 afterwards, so the enlarged-radius cue grows
/// and shrinks instead of snapping. A short hold time keeps the cue from
/// flashing when the pointer only skirts a node's edge.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	hovered: Option<usize>,
	/// Nodes not in this map have intensity 0.
	intensity: HashMap<usize, f64>,
	/// Time remaining before fade-out can begin.
	hold_timer: HashMap<usize, f64>,
}

/// Minimum time (seconds) a highlight must be held before it can fade out.
const MIN_HOLD_TIME: f64 = 0.12;

/// Intensities within this distance of their target are snapped to it.
const SETTLE_EPSILON: f64 = 0.005;

impl HighlightState {
	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		if let Some(idx) = node {
			self.hold_timer.insert(idx, MIN_HOLD_TIME);
			self.intensity.entry(idx).or_insert(0.0);
		}
	}

	/// Eases every intensity towards its target. Returns `true` while anything
	/// is still changing.
	///
	/// Exponential smoothing: value += (target - value) * (1 - e^(-speed * dt))
	pub fn tick(&mut self, dt: f64) -> bool {
		// ~150ms to 95%, matching a short CSS-style transition.
		const FADE_IN_SPEED: f64 = 20.0;
		const FADE_OUT_SPEED: f64 = 14.0;

		let fade_in_factor = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out_decay = (-FADE_OUT_SPEED * dt).exp();
		let hovered = self.hovered;

		self.hold_timer.retain(|idx, timer| {
			if hovered == Some(*idx) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		let hold_timer = &self.hold_timer;
		self.intensity.retain(|idx, intensity| {
			if hovered == Some(*idx) {
				*intensity += (1.0 - *intensity) * fade_in_factor;
				if 1.0 - *intensity < SETTLE_EPSILON {
					*intensity = 1.0;
				}
				true
			} else {
				if !hold_timer.contains_key(idx) {
					*intensity *= fade_out_decay;
				}
				*intensity > SETTLE_EPSILON
			}
		});

		self.is_animating()
	}

	pub fn is_animating(&self) -> bool {
		self.intensity
			.iter()
			.any(|(idx, t)| self.hovered != Some(*idx) || *t < 1.0)
	}

	pub fn intensity(&self, idx: usize) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	fn clear(&mut self) {
		self.hovered = None;
		self.intensity.clear();
		self.hold_timer.clear();
	}
}

/// One node as the render sink sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameNode<'a> {
	pub x: f64,
	pub y: f64,
	pub category: NodeCategory,
	pub label: &'a str,
	/// Hover cue strength in `[0, 1]`.
	pub hover: f64,
}

/// An edge resolved to its endpoints' current positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameEdge {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug)]
pub struct Frame<'a> {
	pub nodes: Vec<FrameNode<'a>>,
	pub edges: Vec<FrameEdge>,
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
}

/// Core graph state combining physics simulation with interaction and highlight tracking.
///
/// Created once when the component mounts, then mutated by input handlers and
/// the animation loop. Nothing here touches the DOM.
pub struct ForceGraphState {
	sim: Simulation,
	interaction: InteractionController,
	resize: ResizeAdapter,
	highlight: HighlightState,
	pub width: f64,
	pub height: f64,
	/// Set by input that changed what is on screen without moving nodes.
	dirty: bool,
}

impl ForceGraphState {
	pub fn new(graph: &StarGraph, config: &LayoutConfig, width: f64, height: f64) -> Self {
		let mut sim = Simulation::new(graph, config, width / 2.0, height / 2.0);
		let mut resize = ResizeAdapter::new(config.reheat_alpha);
		resize.apply(&mut sim, width, height);

		Self {
			sim,
			interaction: InteractionController::new(config),
			resize,
			highlight: HighlightState::default(),
			width,
			height,
			dirty: true,
		}
	}

	pub fn simulation(&self) -> &Simulation {
		&self.sim
	}

	pub fn transform(&self) -> ViewTransform {
		self.interaction.transform()
	}

	pub fn highlight(&self) -> &HighlightState {
		&self.highlight
	}

	/// Closest node whose hit circle contains screen point `(sx, sy)`.
	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<usize> {
		let transform = self.interaction.transform();
		let (gx, gy) = transform.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, transform.k);
		let mut found = None;
		let mut best = f64::INFINITY;
		for (idx, node) in self.sim.nodes().iter().enumerate() {
			let (dx, dy) = (node.x - gx, node.y - gy);
			let dist_sq = dx * dx + dy * dy;
			let hit_radius = scale.node(node.category).hit_radius;
			if dist_sq < hit_radius * hit_radius && dist_sq <= best {
				best = dist_sq;
				found = Some(idx);
			}
		}
		found
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64, config: &ScaleConfig) {
		let hit = self.node_at_position(sx, sy, config);
		self.interaction.pointer_down(&mut self.sim, hit, sx, sy);
		self.dirty = true;
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<GraphEvent> {
		let hit = self.node_at_position(sx, sy, config);
		if self.interaction.is_panning() {
			self.dirty = true;
		}
		let event = self.interaction.pointer_move(&mut self.sim, hit, sx, sy);
		self.after_input(event)
	}

	pub fn pointer_up(&mut self) -> Option<GraphEvent> {
		let event = self.interaction.pointer_up(&mut self.sim);
		self.dirty = true;
		self.after_input(event)
	}

	pub fn pointer_leave(&mut self) -> Option<GraphEvent> {
		let event = self.interaction.pointer_leave(&mut self.sim);
		self.dirty = true;
		self.after_input(event)
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64, delta_mode: u32) {
		self.interaction.wheel(sx, sy, delta_y, delta_mode);
		self.dirty = true;
	}

	pub fn pinch(&mut self, a: (f64, f64), b: (f64, f64)) {
		self.interaction.pinch(a, b);
		self.dirty = true;
	}

	pub fn end_pinch(&mut self) {
		self.interaction.end_pinch();
	}

	/// Mirrors hover changes into the highlight; any event needs a redraw.
	fn after_input(&mut self, event: Option<GraphEvent>) -> Option<GraphEvent> {
		if let Some(GraphEvent::Hover(_)) = event {
			self.highlight.set_hover(self.interaction.hovered());
		}
		if event.is_some() {
			self.dirty = true;
		}
		event
	}

	/// Applies a new surface size; `false` when the size was rejected.
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		if !self.resize.apply(&mut self.sim, width, height) {
			return false;
		}
		self.width = width;
		self.height = height;
		self.dirty = true;
		true
	}

	/// Advances physics and hover animation by one frame of `dt` seconds.
	/// Returns whether anything visible changed.
	pub fn tick(&mut self, dt: f64) -> bool {
		if self.sim.is_stopped() {
			return false;
		}
		let moved = self.sim.tick();
		let animating = self.highlight.tick(dt);
		let redraw = moved || animating || self.dirty;
		self.dirty = false;
		redraw
	}

	/// Whether the host should schedule another animation frame.
	pub fn needs_frame(&self) -> bool {
		!self.sim.is_stopped()
			&& (self.dirty || !self.sim.is_at_rest() || self.highlight.is_animating())
	}

	pub fn frame(&self) -> Frame<'_> {
		let nodes = self.sim.nodes();
		Frame {
			nodes: nodes
				.iter()
				.enumerate()
				.map(|(idx, node)| FrameNode {
					x: node.x,
					y: node.y,
					category: node.category,
					label: &node.label,
					hover: self.highlight.intensity(idx),
				})
				.collect(),
			edges: self
				.sim
				.edges()
				.iter()
				.map(|edge| {
					let (s, t) = (&nodes[edge.source], &nodes[edge.target]);
					FrameEdge {
						x1: s.x,
						y1: s.y,
						x2: t.x,
						y2: t.y,
					}
				})
				.collect(),
			transform: self.interaction.transform(),
			width: self.width,
			height: self.height,
		}
	}

	/// Stops the simulation for good. Later ticks and input leave nodes untouched.
	pub fn teardown(&mut self) {
		self.sim.stop();
		self.highlight.clear();
		self.dirty = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::GraphNode;

	fn state() -> ForceGraphState {
		let nodes = [
			GraphNode::new("skar", "skar", NodeCategory::Central),
			GraphNode::new("robot", "The Parable of The Robot Pirate", NodeCategory::Content),
			GraphNode::new("questions", "questions", NodeCategory::Content),
		];
		let graph = StarGraph::from_nodes(&nodes).unwrap();
		ForceGraphState::new(&graph, &LayoutConfig::default(), 900.0, 600.0)
	}

	fn settle(state: &mut ForceGraphState) -> usize {
		let mut frames = 0;
		while state.needs_frame() && frames < 5_000 {
			state.tick(1.0 / 60.0);
			frames += 1;
		}
		frames
	}

	fn screen_pos(state: &ForceGraphState, idx: usize) -> (f64, f64) {
		let node = &state.simulation().nodes()[idx];
		state.transform().graph_to_screen(node.x, node.y)
	}

	#[test]
	fn frame_edges_follow_their_endpoints() {
		let mut state = state();
		settle(&mut state);
		let frame = state.frame();

		assert_eq!(frame.nodes.len(), 3);
		assert_eq!(frame.edges.len(), 2);
		assert_eq!((frame.width, frame.height), (900.0, 600.0));
		let hub = &frame.nodes[0];
		assert_eq!(hub.category, NodeCategory::Central);
		for (edge, leaf) in frame.edges.iter().zip(&frame.nodes[1..]) {
			assert_eq!((edge.x1, edge.y1), (hub.x, hub.y));
			assert_eq!((edge.x2, edge.y2), (leaf.x, leaf.y));
		}
		assert_eq!(frame.nodes[2].label, "questions");
	}

	#[test]
	fn loop_goes_idle_once_at_rest() {
		let mut state = state();
		assert!(state.needs_frame());
		let frames = settle(&mut state);
		assert!(frames < 5_000);
		assert!(!state.needs_frame());
		assert!(!state.tick(1.0 / 60.0));
	}

	#[test]
	fn drag_through_state_wakes_and_moves_node() {
		let config = ScaleConfig::default();
		let mut state = state();
		settle(&mut state);

		let (sx, sy) = screen_pos(&state, 1);
		state.pointer_down(sx, sy, &config);
		assert!(state.needs_frame());
		state.pointer_move(sx + 50.0, sy + 20.0, &config);
		state.tick(1.0 / 60.0);
		let (nx, ny) = screen_pos(&state, 1);
		assert!((nx - (sx + 50.0)).abs() < 1e-9);
		assert!((ny - (sy + 20.0)).abs() < 1e-9);

		assert_eq!(state.pointer_up(), None);
		assert!(settle(&mut state) < 5_000);
		assert!(!state.needs_frame());
	}

	#[test]
	fn click_reports_node_id() {
		let config = ScaleConfig::default();
		let mut state = state();
		settle(&mut state);
		let (sx, sy) = screen_pos(&state, 2);

		state.pointer_down(sx, sy, &config);
		assert_eq!(
			state.pointer_up(),
			Some(GraphEvent::Activated("questions".into()))
		);
	}

	#[test]
	fn hover_animates_cue_without_moving_nodes() {
		let config = ScaleConfig::default();
		let mut state = state();
		settle(&mut state);
		let before: Vec<(f64, f64)> = state.frame().nodes.iter().map(|n| (n.x, n.y)).collect();

		let (sx, sy) = screen_pos(&state, 0);
		assert_eq!(
			state.pointer_move(sx, sy, &config),
			Some(GraphEvent::Hover(Some("skar".into())))
		);
		assert!(state.needs_frame());
		settle(&mut state);
		assert_eq!(state.frame().nodes[0].hover, 1.0);

		assert_eq!(
			state.pointer_move(1.0, 1.0, &config),
			Some(GraphEvent::Hover(None))
		);
		settle(&mut state);
		assert_eq!(state.frame().nodes[0].hover, 0.0);

		let after: Vec<(f64, f64)> = state.frame().nodes.iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn host_node_sizes_drive_hit_testing() {
		let mut state = state();
		settle(&mut state);
		let (sx, sy) = screen_pos(&state, 2);

		let default = ScaleConfig::default();
		assert_eq!(state.node_at_position(sx + 30.0, sy, &default), None);

		let mut large = ScaleConfig::default();
		large.content.radius = 30.0;
		large.content.hover_radius = 40.0;
		assert_eq!(state.node_at_position(sx + 30.0, sy, &large), Some(2));
		assert_eq!(
			ScaledValues::new(&large, 1.0).node(NodeCategory::Content).radius,
			30.0
		);
	}

	#[test]
	fn idle_pointer_motion_does_not_wake_the_loop() {
		let config = ScaleConfig::default();
		let mut state = state();
		settle(&mut state);
		assert_eq!(state.pointer_move(2.0, 2.0, &config), None);
		assert_eq!(state.pointer_move(5.0, 3.0, &config), None);
		assert!(!state.needs_frame());
	}

	#[test]
	fn zoom_wakes_a_single_redraw() {
		let mut state = state();
		settle(&mut state);
		state.wheel(450.0, 300.0, -240.0, 0);
		assert!(state.needs_frame());
		assert!(state.tick(1.0 / 60.0));
		assert!(!state.needs_frame());
		assert!(state.simulation().is_at_rest());
	}

	#[test]
	fn resize_updates_surface_and_recenters() {
		let mut state = state();
		settle(&mut state);
		assert!(state.resize(1200.0, 400.0));
		assert_eq!((state.width, state.height), (1200.0, 400.0));
		assert_eq!(state.simulation().center(), (600.0, 200.0));
		assert!(state.needs_frame());

		assert!(!state.resize(0.0, 0.0));
		assert_eq!((state.width, state.height), (1200.0, 400.0));
	}

	#[test]
	fn teardown_freezes_everything() {
		let config = ScaleConfig::default();
		let mut state = state();
		state.teardown();
		let before: Vec<(f64, f64)> = state.frame().nodes.iter().map(|n| (n.x, n.y)).collect();

		state.pointer_down(450.0, 300.0, &config);
		state.resize(1000.0, 1000.0);
		assert!(!state.tick(1.0 / 60.0));
		assert!(!state.needs_frame());
		let after: Vec<(f64, f64)> = state.frame().nodes.iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn highlight_holds_briefly_then_fades() {
		let mut highlight = HighlightState::default();
		highlight.set_hover(Some(4));
		highlight.tick(0.05);
		let peak = highlight.intensity(4);
		assert!(peak > 0.0);

		highlight.set_hover(None);
		highlight.tick(0.05);
		assert_eq!(highlight.intensity(4), peak);

		for _ in 0..120 {
			highlight.tick(1.0 / 60.0);
		}
		assert_eq!(highlight.intensity(4), 0.0);
		assert!(!highlight.is_animating());
	}
}
