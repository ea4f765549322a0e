//! Canvas rendering for the force graph.
//!
//! Draws a [`Frame`] and nothing else; it never reads the simulation.
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edge lines (world space)
//! 3. Resting nodes, then hovered/transitioning nodes on top
//! 4. Labels above every circle

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{Frame, FrameNode};
use super::theme::Theme;

/// Attempt to smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete frame to the canvas.
pub fn render(
	frame: &Frame<'_>,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let transform = frame.transform;
	let scale = ScaledValues::new(config, transform.k);

	draw_background(frame, ctx, theme);

	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	draw_edges(frame, ctx, &scale, theme);
	draw_nodes(frame, ctx, &scale, theme);
	draw_labels(frame, ctx, &scale, theme);

	ctx.restore();
}

/// Wipes the surface, used when the component unmounts.
pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
	ctx.clear_rect(0.0, 0.0, width, height);
}

fn draw_background(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
}

fn draw_edges(
	frame: &Frame<'_>,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	ctx.set_stroke_style_str(&theme.edge.to_css());
	ctx.set_line_width(scale.edge_width);

	ctx.begin_path();
	for edge in &frame.edges {
		ctx.move_to(edge.x1, edge.y1);
		ctx.line_to(edge.x2, edge.y2);
	}
	ctx.stroke();
}

fn draw_nodes(
	frame: &Frame<'_>,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	// Pass 1: resting nodes
	for node in frame.nodes.iter().filter(|n| n.hover <= 0.001) {
		draw_node(ctx, node, scale, theme);
	}

	// Pass 2: hovered/transitioning nodes on top
	for node in frame.nodes.iter().filter(|n| n.hover > 0.001) {
		draw_node(ctx, node, scale, theme);
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &FrameNode<'_>,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let t = smooth_step(node.hover);
	let radius = scale.node(node.category).radius_at(t);
	let fill = theme
		.node
		.fill(node.category)
		.lighten(theme.node.hover_lighten * t);

	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&theme.node.stroke.to_css());
	ctx.set_line_width(scale.stroke_width);
	ctx.stroke();
}

fn draw_labels(
	frame: &Frame<'_>,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	ctx.set_fill_style_str(&theme.label.to_css());
	ctx.set_text_align("center");
	for node in &frame.nodes {
		let scaled = scale.node(node.category);
		ctx.set_font(&scaled.label_font);
		let _ = ctx.fill_text(node.label, node.x, node.y + scaled.label_offset);
	}
}
