//! Leptos component that wires the scroll controller to the window.
//!
//! `ScrollStage` renders the custom scrollbar and, once mounted, registers the
//! wheel, key, touch, resize, scroll and navigation listeners that feed the
//! controller. Each listener borrows the controller only for the duration of
//! one input; follow-up work (settle timer, thumb update) runs after the
//! borrow is released.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Event, KeyboardEvent, MouseEvent, TouchEvent, WheelEvent};

use super::controller::{Outcome, ScrollConfig, ScrollController};
use super::dom::{self, DomHost};
use super::input::{DragTracker, NavKey, Profile, TouchTracker};
use super::presentation::portfolio_sinks;
use super::sections::{Section, default_sections};

type SharedController = Rc<RefCell<ScrollController<DomHost>>>;

/// Schedules the settle timer after a transition and moves the thumb.
fn commit(controller: &SharedController, outcome: Outcome, thumb: RwSignal<f64>) {
	match outcome {
		Outcome::Discarded | Outcome::Unchanged => return,
		Outcome::Transitioned { .. } => {
			let delay = controller.borrow().config().settle_delay_ms;
			let settle = controller.clone();
			dom::set_timeout(delay, move || settle.borrow_mut().settle());
		}
		_ => {}
	}
	thumb.set(controller.borrow().thumb_fraction());
}

fn current_profile(controller: &SharedController) -> Profile {
	controller.borrow().config().profile_for(dom::viewport_size().0)
}

fn first_touch_y(ev: &TouchEvent) -> Option<f64> {
	ev.touches().item(0).map(|t| t.client_y() as f64)
}

/// Scroll-hijacking stage for a page of full-screen sections.
///
/// Renders the scrollbar track and thumb; place it anywhere in the page. The
/// sections themselves are located by id in the host document. Without
/// props, the portfolio's default section table and timings are used.
#[component]
pub fn ScrollStage(
	/// Sections in document order; the portfolio table when omitted.
	#[prop(optional)]
	sections: Option<Vec<Section>>,
	/// Timings and thresholds; defaults when omitted.
	#[prop(optional)]
	config: Option<ScrollConfig>,
) -> impl IntoView {
	let sections = sections.unwrap_or_else(default_sections);
	let config = config.unwrap_or_default();
	let section_count = sections.len().max(1);

	let thumb = RwSignal::new(0.0_f64);
	let track_ref = NodeRef::<leptos::html::Div>::new();

	let touch: Rc<RefCell<TouchTracker>> = Rc::new(RefCell::new(config.touch_tracker()));
	let drag: Rc<RefCell<DragTracker>> = Rc::new(RefCell::new(config.drag_tracker()));
	let controller: SharedController = Rc::new(RefCell::new(ScrollController::new(
		sections,
		portfolio_sinks(),
		DomHost,
		config,
	)));

	let listeners: Rc<RefCell<Vec<Closure<dyn FnMut(Event)>>>> = Rc::new(RefCell::new(Vec::new()));
	let resync: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let wired = Rc::new(Cell::new(false));

	let (ctl, touch_init, drag_init) = (controller.clone(), touch.clone(), drag.clone());
	Effect::new(move |_| {
		if wired.replace(true) {
			return;
		}
		let Some(window) = dom::window() else {
			return;
		};
		let mut registered = listeners.borrow_mut();

		let profile = current_profile(&ctl);
		dom::set_native_scroll(!profile.hijacks_scroll());
		let last_profile = Rc::new(Cell::new(profile));
		info!("portfolio-motion: scroll stage ready ({:?} profile)", profile);

		let c = ctl.clone();
		registered.push(dom::listen(&window, "wheel", false, move |ev: WheelEvent| {
			if !current_profile(&c).hijacks_scroll() {
				return;
			}
			ev.prevent_default();
			let outcome = c.borrow_mut().handle_delta(ev.delta_y());
			commit(&c, outcome, thumb);
		}));

		let c = ctl.clone();
		registered.push(dom::listen(&window, "keydown", false, move |ev: KeyboardEvent| {
			if !current_profile(&c).hijacks_scroll() {
				return;
			}
			let Some(key) = NavKey::from_key(&ev.key()) else {
				return;
			};
			ev.prevent_default();
			let outcome = c.borrow_mut().handle_key(key);
			commit(&c, outcome, thumb);
		}));

		let (c, t) = (ctl.clone(), touch_init.clone());
		registered.push(dom::listen(&window, "touchstart", true, move |ev: TouchEvent| {
			if let Some(y) = first_touch_y(&ev) {
				t.borrow_mut().begin(y, current_profile(&c));
			}
		}));

		let (c, t) = (ctl.clone(), touch_init.clone());
		registered.push(dom::listen(&window, "touchmove", false, move |ev: TouchEvent| {
			let Some(y) = first_touch_y(&ev) else {
				return;
			};
			let outcome = {
				let mut touch = t.borrow_mut();
				if touch.profile() != Some(Profile::Standard) {
					return;
				}
				ev.prevent_default();
				c.borrow_mut().touch_to(&mut touch, y)
			};
			commit(&c, outcome, thumb);
		}));

		let t = touch_init.clone();
		registered.push(dom::listen(&window, "touchend", true, move |_: TouchEvent| {
			t.borrow_mut().end();
		}));

		let (c, profile_cell) = (ctl.clone(), last_profile.clone());
		registered.push(dom::listen(&window, "resize", true, move |_: Event| {
			let profile = current_profile(&c);
			if profile_cell.replace(profile) != profile {
				debug!("portfolio-motion: switched to {:?} profile", profile);
				dom::set_native_scroll(!profile.hijacks_scroll());
			}
		}));

		let c = ctl.clone();
		let layout_sections = ctl.borrow().sections().to_vec();
		registered.push(dom::listen(&window, "scroll", true, move |_: Event| {
			if current_profile(&c).hijacks_scroll() {
				return;
			}
			let layout = dom::section_layout(&layout_sections);
			let (_, viewport_height) = dom::viewport_size();
			let outcome = c.borrow_mut().native_scroll(&layout, dom::scroll_y(), viewport_height);
			commit(&c, outcome, thumb);
		}));

		let (c, d) = (ctl.clone(), drag_init.clone());
		registered.push(dom::listen(&window, "mousemove", true, move |ev: MouseEvent| {
			let outcome = {
				let mut drag = d.borrow_mut();
				if !drag.is_active() {
					return;
				}
				let outcome = c.borrow_mut().drag_to(&mut drag, ev.client_y() as f64);
				if !drag.is_active() {
					debug!("portfolio-motion: drag ended by {:?}", outcome);
				}
				outcome
			};
			commit(&c, outcome, thumb);
		}));

		let d = drag_init.clone();
		registered.push(dom::listen(&window, "mouseup", true, move |_: MouseEvent| {
			let mut drag = d.borrow_mut();
			if drag.is_active() {
				drag.end();
				debug!("portfolio-motion: drag released");
			}
		}));

		let nav_links = dom::query_document(".nav-link");
		if nav_links.is_empty() {
			warn!("portfolio-motion: no .nav-link elements found");
		}
		for (index, link) in nav_links.iter().enumerate() {
			let c = ctl.clone();
			registered.push(dom::listen(link, "click", false, move |ev: MouseEvent| {
				ev.prevent_default();
				let outcome = c.borrow_mut().navigate_to(index);
				commit(&c, outcome, thumb);
			}));
		}

		let (c, d) = (ctl.clone(), drag_init.clone());
		let tick: Closure<dyn FnMut()> = Closure::new(move || {
			if !d.borrow().is_active() {
				thumb.set(c.borrow().thumb_fraction());
			}
		});
		let period = ctl.borrow().config().thumb_resync_ms;
		if dom::set_interval(period, &tick).is_none() {
			warn!("portfolio-motion: could not start thumb resync timer");
		}
		*resync.borrow_mut() = Some(tick);

		ctl.borrow_mut().show_initial();
		thumb.set(ctl.borrow().thumb_fraction());
	});

	let ctl_seek = controller.clone();
	let on_track_click = move |ev: MouseEvent| {
		let Some(track) = track_ref.get() else {
			return;
		};
		let rect = track.get_bounding_client_rect();
		if rect.height() <= 0.0 {
			return;
		}
		let fraction = (ev.client_y() as f64 - rect.top()) / rect.height();
		let outcome = ctl_seek.borrow_mut().seek(fraction);
		commit(&ctl_seek, outcome, thumb);
	};

	let drag_begin = drag.clone();
	let on_thumb_down = move |ev: MouseEvent| {
		ev.prevent_default();
		drag_begin.borrow_mut().begin(ev.client_y() as f64);
		debug!("portfolio-motion: drag started");
	};

	let thumb_pct = 100.0 / section_count as f64;
	let thumb_top = move || format!("{}%", thumb.get() * (100.0 - thumb_pct));

	view! {
		<div class="scroll-track" node_ref=track_ref on:click=on_track_click>
			<div
				class="scroll-thumb"
				on:mousedown=on_thumb_down
				on:click=|ev: MouseEvent| ev.stop_propagation()
				style:height=format!("{thumb_pct}%")
				style:top=thumb_top
			/>
		</div>
	}
}
