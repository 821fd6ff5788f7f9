//! Leptos component wrapping the particle background canvas.
//!
//! The component creates a canvas sized to its own layout box, tracks the
//! pointer over it, and runs the simulation through a [`FrameLoop`]. The loop
//! pauses while the page is hidden.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, VisibilityState, Window,
};

use super::particles::ParticleField;
use super::render;
use super::theme::ParticleStyle;

/// Pending-frame bookkeeping for [`FrameLoop`].
///
/// Holds the id of the scheduled frame, if any. Scheduling and cancelling are
/// passed in so the lifecycle rules can be checked without a browser.
#[derive(Debug, Default)]
pub struct FrameSlot {
	pending: Cell<Option<i32>>,
}

impl FrameSlot {
	/// Whether a frame is currently scheduled.
	pub fn is_running(&self) -> bool {
		self.pending.get().is_some()
	}

	/// Schedules the first frame unless one is already pending.
	pub fn start(&self, schedule: impl FnOnce() -> Option<i32>) {
		if !self.is_running() {
			self.pending.set(schedule());
		}
	}

	/// Schedules the next frame from inside a running frame. Returns `false`
	/// when the loop was stopped in the meantime, in which case nothing is
	/// scheduled.
	pub fn advance(&self, schedule: impl FnOnce() -> Option<i32>) -> bool {
		if !self.is_running() {
			return false;
		}
		self.pending.set(schedule());
		true
	}

	/// Cancels the pending frame, if there is one.
	pub fn stop(&self, cancel: impl FnOnce(i32)) {
		if let Some(id) = self.pending.take() {
			cancel(id);
		}
	}
}

/// Per-frame callback scheduled through `requestAnimationFrame`.
///
/// `start` is a no-op while running; `stop` cancels the pending frame and may
/// be called any number of times, including before the first `start`.
pub struct FrameLoop {
	frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	slot: Rc<FrameSlot>,
}

impl FrameLoop {
	/// Wraps `step` in a frame callback. Nothing runs until [`FrameLoop::start`].
	pub fn new(mut step: impl FnMut() + 'static) -> Self {
		let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
		let slot = Rc::new(FrameSlot::default());
		let (frame_inner, slot_inner) = (frame.clone(), slot.clone());

		*frame.borrow_mut() = Some(Closure::new(move || {
			// A frame that slipped past `stop` must not reschedule itself.
			if !slot_inner.is_running() {
				return;
			}
			step();
			if let Some(ref cb) = *frame_inner.borrow() {
				slot_inner.advance(|| request_frame(cb));
			}
		}));

		Self { frame, slot }
	}

	/// Schedules the first frame.
	pub fn start(&self) {
		if let Some(ref cb) = *self.frame.borrow() {
			self.slot.start(|| request_frame(cb));
		}
	}

	/// Cancels the pending frame.
	pub fn stop(&self) {
		self.slot.stop(|id| {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		});
	}

	/// Whether a frame is currently scheduled.
	pub fn is_running(&self) -> bool {
		self.slot.is_running()
	}
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

/// Measures the canvas layout box, falling back to the viewport.
fn canvas_size(canvas: &HtmlCanvasElement, window: &Window) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	if rect.width() > 0.0 && rect.height() > 0.0 {
		return (rect.width(), rect.height());
	}
	(
		window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
		window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
	)
}

/// Renders the interactive particle background.
///
/// The canvas fills its container; position it behind the page content with
/// CSS. Pass a custom `style` to override the default motion parameters.
#[component]
pub fn ParticleCanvas(
	/// Motion and color tunables; defaults apply when omitted.
	#[prop(optional)]
	style: Option<ParticleStyle>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let field: Rc<RefCell<Option<ParticleField>>> = Rc::new(RefCell::new(None));
	let frame_loop: Rc<RefCell<Option<FrameLoop>>> = Rc::new(RefCell::new(None));
	let listeners: Rc<RefCell<Vec<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(Vec::new()));
	let (field_init, loop_init, listeners_init) =
		(field.clone(), frame_loop.clone(), listeners.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if field_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			return;
		};

		let (w, h) = canvas_size(&canvas, &window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let style = style.clone().unwrap_or_default();
		let count = style.count;
		*field_init.borrow_mut() = Some(ParticleField::new(style, w, h, js_sys::Date::now()));
		info!("portfolio-motion: particle field seeded with {} particles ({}x{})", count, w, h);

		let (field_resize, canvas_resize) = (field_init.clone(), canvas.clone());
		let on_resize: Closure<dyn FnMut()> = Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = canvas_size(&canvas_resize, &win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut f) = *field_resize.borrow_mut() {
				f.resize(nw, nh);
			}
		});
		let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
		listeners_init.borrow_mut().push(on_resize);

		let field_frame = field_init.clone();
		let frames = FrameLoop::new(move || {
			if let Some(ref mut f) = *field_frame.borrow_mut() {
				f.tick(js_sys::Date::now());
				render::paint(&ctx, &render::draw_list(f));
			}
		});
		frames.start();
		*loop_init.borrow_mut() = Some(frames);

		if let Some(document) = window.document() {
			let loop_visibility = loop_init.clone();
			let on_visibility: Closure<dyn FnMut()> = Closure::new(move || {
				let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
					return;
				};
				if let Some(ref frames) = *loop_visibility.borrow() {
					if doc.visibility_state() == VisibilityState::Hidden {
						debug!("portfolio-motion: page hidden, pausing particles");
						frames.stop();
					} else {
						frames.start();
					}
				}
			});
			let _ = document.add_event_listener_with_callback(
				"visibilitychange",
				on_visibility.as_ref().unchecked_ref(),
			);
			listeners_init.borrow_mut().push(on_visibility);
		}
	});

	let field_mm = field.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut f) = *field_mm.borrow_mut() {
			f.set_pointer(Some((x, y)));
		}
	};

	let field_ml = field.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut f) = *field_ml.borrow_mut() {
			f.set_pointer(None);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="particles-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block; width: 100%; height: 100%;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stop_before_start_is_harmless() {
		let slot = FrameSlot::default();
		let cancelled = RefCell::new(Vec::new());
		slot.stop(|id| cancelled.borrow_mut().push(id));
		slot.stop(|id| cancelled.borrow_mut().push(id));
		assert!(cancelled.borrow().is_empty());
		assert!(!slot.is_running());
	}

	#[test]
	fn start_is_idempotent() {
		let slot = FrameSlot::default();
		let scheduled = Cell::new(0);
		let schedule = || {
			scheduled.set(scheduled.get() + 1);
			Some(scheduled.get())
		};
		slot.start(schedule);
		slot.start(schedule);
		assert_eq!(scheduled.get(), 1);
		assert!(slot.is_running());
	}

	#[test]
	fn repeated_stop_cancels_once() {
		let slot = FrameSlot::default();
		slot.start(|| Some(7));
		assert!(slot.advance(|| Some(8)));

		let cancelled = RefCell::new(Vec::new());
		slot.stop(|id| cancelled.borrow_mut().push(id));
		slot.stop(|id| cancelled.borrow_mut().push(id));
		assert_eq!(*cancelled.borrow(), vec![8]);
		assert!(!slot.is_running());
	}

	#[test]
	fn stopped_loop_does_not_reschedule() {
		let slot = FrameSlot::default();
		slot.start(|| Some(1));
		slot.stop(|_| {});
		assert!(!slot.advance(|| panic!("must not schedule after stop")));

		slot.start(|| Some(2));
		assert!(slot.is_running());
	}

	#[test]
	fn failed_schedule_leaves_loop_stopped() {
		let slot = FrameSlot::default();
		slot.start(|| None);
		assert!(!slot.is_running());
	}
}
