//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse, wheel and
//! touch handlers for node dragging, panning, and zooming. A
//! `requestAnimationFrame` loop ticks the simulation and redraws, but only
//! while the graph is still settling or animating a hover; input and resizes
//! wake it again. Everything is released when the component unmounts.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, ResizeObserver, TouchEvent, TouchList,
	WheelEvent, Window,
};

use super::interaction::GraphEvent;
use super::render;
use super::scale::ScaleConfig;
use super::state::ForceGraphState;
use super::theme::Theme;
use super::types::{GraphData, StarGraph};

/// Fallback surface size when the parent has collapsed to zero.
const FALLBACK_SIZE: (f64, f64) = (900.0, 600.0);
/// Neither dimension of the canvas goes below this.
const MIN_SURFACE: f64 = 300.0;

/// Bundles graph state with the drawing context and visual configuration.
struct GraphContext {
	state: ForceGraphState,
	ctx: CanvasRenderingContext2d,
	scale: ScaleConfig,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Animation-frame scheduler. At most one frame is ever pending.
#[derive(Default)]
struct FrameLoop {
	callback: Option<Closure<dyn FnMut(f64)>>,
	pending: Option<i32>,
	last_time: Option<f64>,
}

impl FrameLoop {
	fn request(&mut self) {
		if self.pending.is_some() {
			return;
		}
		let (Some(cb), Some(window)) = (&self.callback, web_sys::window()) else {
			return;
		};
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(handle) => self.pending = Some(handle),
			Err(err) => warn!("force-graph: requestAnimationFrame failed: {err:?}"),
		}
	}

	/// Seconds since the previous frame, capped so a backgrounded tab does not
	/// produce one huge step.
	fn frame_delta(&mut self, now_ms: f64) -> f64 {
		let dt = self
			.last_time
			.map_or(1.0 / 60.0, |last| ((now_ms - last) / 1000.0).clamp(0.0, 0.1));
		self.last_time = Some(now_ms);
		dt
	}

	fn idle(&mut self) {
		self.last_time = None;
	}

	/// Cancels any pending frame and drops the loop closure.
	fn cancel(&mut self) {
		if let (Some(handle), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(handle);
		}
		self.callback = None;
		self.last_time = None;
	}
}

type SharedLoop = Rc<RefCell<FrameLoop>>;

/// Surface-size subscription, released on unmount.
enum ResizeHook {
	Window(Closure<dyn FnMut()>),
	Observer(ResizeObserver, Closure<dyn FnMut()>),
}

impl ResizeHook {
	fn detach(self) {
		match self {
			ResizeHook::Window(cb) => {
				if let Some(window) = web_sys::window() {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}
			ResizeHook::Observer(observer, _cb) => observer.disconnect(),
		}
	}
}

/// Host callbacks for graph notifications.
#[derive(Clone, Copy)]
struct Handlers {
	on_hover: Option<Callback<Option<String>>>,
	on_activate: Option<Callback<String>>,
}

impl Handlers {
	fn emit(&self, event: GraphEvent) {
		match event {
			GraphEvent::Hover(label) => {
				if let Some(cb) = self.on_hover {
					cb.run(label);
				}
			}
			GraphEvent::Activated(id) => {
				if let Some(cb) = self.on_activate {
					cb.run(id);
				}
			}
		}
	}
}

/// Runs `f` against the mounted graph, wakes the frame loop if needed and
/// forwards any resulting notification once the state borrow is released.
fn dispatch(
	context: &SharedContext,
	frame_loop: &SharedLoop,
	handlers: Handlers,
	f: impl FnOnce(&mut ForceGraphState, &ScaleConfig) -> Option<GraphEvent>,
) {
	let (event, wake) = {
		let mut guard = context.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};
		let event = f(&mut c.state, &c.scale);
		(event, c.state.needs_frame())
	};
	if wake {
		frame_loop.borrow_mut().request();
	}
	if let Some(event) = event {
		handlers.emit(event);
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	let w = window.inner_width().ok()?.as_f64()?;
	let h = window.inner_height().ok()?.as_f64()?;
	Some((w, h))
}

/// Canvas size: explicit props win, then the viewport in fullscreen mode, then
/// the parent element.
fn surface_size(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	let measured = if fullscreen {
		web_sys::window().as_ref().and_then(window_size)
	} else {
		canvas
			.parent_element()
			.map(|p| (p.client_width() as f64, p.client_height() as f64))
	};
	let (mw, mh) = measured.unwrap_or(FALLBACK_SIZE);
	let or_fallback = |v: f64, fallback: f64| if v > 0.0 { v } else { fallback };
	(
		width.unwrap_or_else(|| or_fallback(mw, FALLBACK_SIZE.0).max(MIN_SURFACE)),
		height.unwrap_or_else(|| or_fallback(mh, FALLBACK_SIZE.1).max(MIN_SURFACE)),
	)
}

fn local_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		client_x as f64 - rect.left(),
		client_y as f64 - rect.top(),
	)
}

fn touch_points(canvas: &HtmlCanvasElement, touches: &TouchList) -> Vec<(f64, f64)> {
	(0..touches.length())
		.filter_map(|i| touches.get(i))
		.map(|t| local_point(canvas, t.client_x(), t.client_y()))
		.collect()
}

/// Renders an interactive star-graph layout on a canvas element.
///
/// The graph is built once from `data` when the canvas mounts. The component
/// sizes itself to its parent container by default; set `fullscreen = true` to
/// fill the viewport and resize with the window. Explicit `width`/`height`
/// override automatic sizing.
///
/// `scale` sets per-category radii, hover radii and label sizes, and `theme`
/// the per-category colors; both fall back to their defaults when omitted.
///
/// `on_hover` receives the focused node's label (or `None` when focus leaves);
/// `on_activate` receives the id of a clicked node.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] scale: ScaleConfig,
	#[prop(optional)] theme: Theme,
	#[prop(optional, into)] on_hover: Option<Callback<Option<String>>>,
	#[prop(optional, into)] on_activate: Option<Callback<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let frame_loop: SharedLoop = Rc::new(RefCell::new(FrameLoop::default()));
	let resize_hook: Rc<RefCell<Option<ResizeHook>>> = Rc::new(RefCell::new(None));
	let handlers = Handlers {
		on_hover,
		on_activate,
	};

	let (context_init, loop_init, hook_init) =
		(context.clone(), frame_loop.clone(), resize_hook.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();

		let data = data.get_untracked();
		let graph = match StarGraph::from_data(&data) {
			Ok(graph) => graph,
			Err(err) => {
				warn!("force-graph: not rendering: {err}");
				return;
			}
		};

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("force-graph: canvas 2d context unavailable");
			return;
		};

		let (w, h) = surface_size(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		*context_init.borrow_mut() = Some(GraphContext {
			state: ForceGraphState::new(&graph, &data.config, w, h),
			ctx,
			scale: scale.clone(),
			theme: theme.clone(),
		});

		let (context_anim, loop_anim) = (context_init.clone(), loop_init.clone());
		loop_init.borrow_mut().callback = Some(Closure::new(move |now: f64| {
			let dt = {
				let mut fl = loop_anim.borrow_mut();
				fl.pending = None;
				fl.frame_delta(now)
			};
			let again = match context_anim.borrow_mut().as_mut() {
				Some(c) => {
					if c.state.tick(dt) {
						render::render(&c.state.frame(), &c.ctx, &c.scale, &c.theme);
					}
					c.state.needs_frame()
				}
				None => false,
			};
			let mut fl = loop_anim.borrow_mut();
			if again {
				fl.request();
			} else {
				fl.idle();
				debug!("force-graph: frame loop idle");
			}
		}));

		if width.is_none() || height.is_none() {
			let (context_resize, loop_resize, canvas_resize) =
				(context_init.clone(), loop_init.clone(), canvas.clone());
			let on_resize: Closure<dyn FnMut()> = Closure::new(move || {
				let (nw, nh) = surface_size(&canvas_resize, fullscreen, width, height);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				dispatch(&context_resize, &loop_resize, handlers, |state, _| {
					state.resize(nw, nh);
					None
				});
			});
			*hook_init.borrow_mut() = attach_resize(&canvas, fullscreen, on_resize);
		}

		loop_init.borrow_mut().request();
	});

	let teardown = {
		let (context, frame_loop, resize_hook) =
			(context.clone(), frame_loop.clone(), resize_hook.clone());
		SendWrapper::new(move || {
			frame_loop.borrow_mut().cancel();
			if let Some(hook) = resize_hook.borrow_mut().take() {
				hook.detach();
			}
			if let Some(mut c) = context.borrow_mut().take() {
				c.state.teardown();
				render::clear(&c.ctx, c.state.width, c.state.height);
			}
			debug!("force-graph: torn down");
		})
	};
	on_cleanup(move || (teardown.take())());

	let (context_md, loop_md) = (context.clone(), frame_loop.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		dispatch(&context_md, &loop_md, handlers, |state, scale| {
			state.pointer_down(x, y, scale);
			None
		});
	};

	let (context_mm, loop_mm) = (context.clone(), frame_loop.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		dispatch(&context_mm, &loop_mm, handlers, |state, scale| {
			state.pointer_move(x, y, scale)
		});
	};

	let (context_mu, loop_mu) = (context.clone(), frame_loop.clone());
	let on_mouseup = move |_: MouseEvent| {
		dispatch(&context_mu, &loop_mu, handlers, |state, _| state.pointer_up());
	};

	let (context_ml, loop_ml) = (context.clone(), frame_loop.clone());
	let on_mouseleave = move |_: MouseEvent| {
		dispatch(&context_ml, &loop_ml, handlers, |state, _| state.pointer_leave());
	};

	let (context_wh, loop_wh) = (context.clone(), frame_loop.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		dispatch(&context_wh, &loop_wh, handlers, |state, _| {
			state.wheel(x, y, ev.delta_y(), ev.delta_mode());
			None
		});
	};

	let (context_ts, loop_ts) = (context.clone(), frame_loop.clone());
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let points = touch_points(&canvas, &ev.touches());
		dispatch(&context_ts, &loop_ts, handlers, |state, scale| match points[..] {
			[(x, y)] => {
				state.pointer_down(x, y, scale);
				None
			}
			[a, b, ..] => {
				// A second finger turns any drag into a pinch, never a click.
				state.pointer_up();
				state.pinch(a, b);
				None
			}
			[] => None,
		});
	};

	let (context_tm, loop_tm) = (context.clone(), frame_loop.clone());
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let points = touch_points(&canvas, &ev.touches());
		dispatch(&context_tm, &loop_tm, handlers, |state, scale| match points[..] {
			[(x, y)] => state.pointer_move(x, y, scale),
			[a, b, ..] => {
				state.pinch(a, b);
				None
			}
			[] => None,
		});
	};

	let (context_te, loop_te) = (context.clone(), frame_loop.clone());
	let on_touchend = move |ev: TouchEvent| {
		let remaining = ev.touches().length();
		dispatch(&context_te, &loop_te, handlers, |state, _| {
			if remaining < 2 {
				state.end_pinch();
			}
			if remaining == 0 {
				state.pointer_up()
			} else {
				None
			}
		});
	};
	let on_touchcancel = on_touchend.clone();

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:touchcancel=on_touchcancel
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}

/// Subscribes `on_resize` to viewport changes in fullscreen mode, otherwise to
/// the canvas parent via `ResizeObserver`. Failure leaves the initial size in place.
fn attach_resize(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	on_resize: Closure<dyn FnMut()>,
) -> Option<ResizeHook> {
	if fullscreen {
		let window = web_sys::window()?;
		if let Err(err) =
			window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
		{
			warn!("force-graph: window resize listener failed: {err:?}");
			return None;
		}
		return Some(ResizeHook::Window(on_resize));
	}

	let Some(parent) = canvas.parent_element() else {
		warn!("force-graph: canvas has no parent; resize tracking disabled");
		return None;
	};
	match ResizeObserver::new(on_resize.as_ref().unchecked_ref()) {
		Ok(observer) => {
			observer.observe(&parent);
			Some(ResizeHook::Observer(observer, on_resize))
		}
		Err(err) => {
			warn!("force-graph: ResizeObserver unavailable, keeping initial size: {err:?}");
			None
		}
	}
}
