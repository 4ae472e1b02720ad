use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::render;
use super::state::CircuitState;
use super::types::SchemeKind;

/// Full-viewport animated circuit backdrop.
///
/// Mounts a canvas, builds a randomized circuit scene for the current
/// viewport and drives it with a `requestAnimationFrame` loop. Changing
/// `scheme` rebuilds the scene in the new colors; unmounting cancels the
/// loop, detaches the resize listener and drops all simulation state.
#[component]
pub fn CircuitCanvas(
	#[prop(into)] scheme: Signal<SchemeKind>,
	#[prop(default = 1.0)] opacity: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<CircuitState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let frame_handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let stopped: Rc<Cell<bool>> = Rc::new(Cell::new(false));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	let (frame_init, stopped_init) = (frame_handle.clone(), stopped.clone());

	Effect::new(move |_| {
		let scheme = scheme.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		// A scheme change reruns this effect; shut the previous loop
		// down before starting over.
		detach(&window, &animate_init, &resize_cb_init, &frame_init);
		stopped_init.set(false);

		let (w, h) = viewport_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			warn!("2d canvas context unavailable, circuit backdrop stays blank");
			return;
		};

		let seed = js_sys::Date::now() as u64;
		let circuit = CircuitState::new(w, h, scheme, seed);
		debug!(
			"circuit backdrop: {} nodes, {} traces, {} packets",
			circuit.scene.nodes.len(),
			circuit.scene.traces.len(),
			circuit.packets.len()
		);
		*state_init.borrow_mut() = Some(circuit);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let win: Window = web_sys::window().unwrap();
			let (nw, nh) = viewport_size(&win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
				debug!(
					"circuit backdrop rebuilt: {} nodes, {} traces",
					s.scene.nodes.len(),
					s.scene.traces.len()
				);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let (frame_anim, stopped_anim) = (frame_init.clone(), stopped_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// Teardown can land before a queued frame fires; touch
			// nothing in that case.
			if stopped_anim.get() {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(s, &ctx, js_sys::Date::now());
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Ok(handle) = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref())
				{
					frame_anim.set(Some(handle));
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Ok(handle) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frame_init.set(Some(handle));
			}
		}
	});

	// `on_cleanup` requires a `Send + Sync` closure even though it fires on
	// this same thread; `SendWrapper` carries the `Rc` cells across that
	// bound and panics only if dereferenced off-thread.
	let cleanup = SendWrapper::new((stopped, animate, resize_cb, frame_handle, state));
	on_cleanup(move || {
		let (stopped, animate, resize_cb, frame_handle, state) = &*cleanup;
		stopped.set(true);
		let window: Window = web_sys::window().unwrap();
		detach(&window, animate, resize_cb, frame_handle);
		*state.borrow_mut() = None;
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="circuit-canvas"
			style=format!("opacity: {};", opacity)
		/>
	}
}

fn detach(
	window: &Window,
	animate: &RefCell<Option<Closure<dyn FnMut()>>>,
	resize_cb: &RefCell<Option<Closure<dyn FnMut()>>>,
	frame_handle: &Cell<Option<i32>>,
) {
	if let Some(handle) = frame_handle.take() {
		let _ = window.cancel_animation_frame(handle);
	}
	if let Some(cb) = resize_cb.borrow_mut().take() {
		let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}
	animate.borrow_mut().take();
}

fn viewport_size(window: &Window) -> (f64, f64) {
	let w = window
		.inner_width()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(0.0);
	let h = window
		.inner_height()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(0.0);
	(w, h)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
}
