//! Host document glue: element lookup, style writes, timers and listeners.
//!
//! Every lookup returns `Option`, and every write to a missing element is a
//! no-op, so absent decoration never interrupts the state machine.

use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement,
	ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, SvgElement, Window,
};

use super::controller::{SectionGeometry, SectionHost};
use super::sections::Section;

/// The global window.
pub fn window() -> Option<Window> {
	web_sys::window()
}

/// The window's document.
pub fn document() -> Option<Document> {
	window()?.document()
}

/// Element with the given id.
pub fn element_by_id(id: &str) -> Option<Element> {
	document()?.get_element_by_id(id)
}

/// First element under `root` matching `selector`.
pub fn query(root: &Element, selector: &str) -> Option<Element> {
	root.query_selector(selector).ok().flatten()
}

/// All elements under `root` matching `selector`, in document order.
pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
	let Ok(list) = root.query_selector_all(selector) else {
		return Vec::new();
	};
	(0..list.length())
		.filter_map(|i| list.item(i))
		.filter_map(|node| node.dyn_into::<Element>().ok())
		.collect()
}

/// Same as [`query_all`], rooted at the document.
pub fn query_document(selector: &str) -> Vec<Element> {
	document()
		.and_then(|doc| doc.document_element())
		.map(|root| query_all(&root, selector))
		.unwrap_or_default()
}

/// Sets an inline style property on an HTML or SVG element.
pub fn set_style(element: &Element, property: &str, value: &str) {
	let style = if let Some(html) = element.dyn_ref::<HtmlElement>() {
		html.style()
	} else if let Some(svg) = element.dyn_ref::<SvgElement>() {
		svg.style()
	} else {
		return;
	};
	let _ = style.set_property(property, value);
}

/// Adds or removes a class.
pub fn set_class(element: &Element, class: &str, on: bool) {
	let classes = element.class_list();
	let _ = if on {
		classes.add_1(class)
	} else {
		classes.remove_1(class)
	};
}

/// Viewport `(width, height)`, or zeros without a window.
pub fn viewport_size() -> (f64, f64) {
	let Some(win) = window() else {
		return (0.0, 0.0);
	};
	(
		win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
		win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
	)
}

/// Vertical page scroll offset.
pub fn scroll_y() -> f64 {
	window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

/// Document-space geometry of each section, in section order. Missing
/// sections stop the list, since later geometry would be misaligned.
pub fn section_layout(sections: &[Section]) -> Vec<SectionGeometry> {
	let offset = scroll_y();
	sections
		.iter()
		.map_while(|section| {
			let rect = element_by_id(&section.id)?.get_bounding_client_rect();
			Some(SectionGeometry {
				top: rect.top() + offset,
				height: rect.height(),
			})
		})
		.collect()
}

/// Turns native page scrolling on or off.
pub fn set_native_scroll(enabled: bool) {
	let Some(doc) = document() else {
		return;
	};
	let overflow = if enabled { "" } else { "hidden" };
	if let Some(root) = doc.document_element() {
		set_style(&root, "overflow", overflow);
	}
	if let Some(body) = doc.body() {
		let _ = body.style().set_property("overflow", overflow);
	}
}

/// Runs `f` once after `delay_ms`.
pub fn set_timeout(delay_ms: u32, f: impl FnOnce() + 'static) {
	let Some(win) = window() else {
		return;
	};
	let cb = Closure::once_into_js(f);
	let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
		cb.unchecked_ref(),
		delay_ms as i32,
	);
}

/// Runs `cb` every `period_ms`. The closure must outlive the interval.
pub fn set_interval(period_ms: u32, cb: &Closure<dyn FnMut()>) -> Option<i32> {
	window()?
		.set_interval_with_callback_and_timeout_and_arguments_0(
			cb.as_ref().unchecked_ref(),
			period_ms as i32,
		)
		.ok()
}

/// Registers a typed event listener. Events that fail to cast to `E` are
/// ignored. The returned closure must be kept alive for as long as the
/// listener should fire.
pub fn listen<E: JsCast + 'static>(
	target: &EventTarget,
	event: &str,
	passive: bool,
	mut f: impl FnMut(E) + 'static,
) -> Closure<dyn FnMut(Event)> {
	let cb: Closure<dyn FnMut(Event)> = Closure::new(move |ev: Event| {
		if let Ok(ev) = ev.dyn_into::<E>() {
			f(ev);
		}
	});
	let options = AddEventListenerOptions::new();
	options.set_passive(passive);
	let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
		event,
		cb.as_ref().unchecked_ref(),
		&options,
	);
	cb
}

/// [`SectionHost`] backed by the live document.
///
/// Navigation entries are the `.nav-link` elements in document order; the
/// `#nav` bar is marked `scrolled` whenever the first section is not active.
#[derive(Clone, Debug, Default)]
pub struct DomHost;

impl SectionHost for DomHost {
	fn scroll_into_view(&mut self, _index: usize, section: &Section) {
		let Some(element) = element_by_id(&section.id) else {
			return;
		};
		let options = ScrollIntoViewOptions::new();
		options.set_behavior(ScrollBehavior::Smooth);
		options.set_block(ScrollLogicalPosition::Start);
		element.scroll_into_view_with_scroll_into_view_options(&options);
	}

	fn highlight_nav(&mut self, index: usize) {
		for (i, link) in query_document(".nav-link").iter().enumerate() {
			set_class(link, "active", i == index);
		}
		if let Some(nav) = element_by_id("nav") {
			set_class(&nav, "scrolled", index != 0);
		}
	}
}
