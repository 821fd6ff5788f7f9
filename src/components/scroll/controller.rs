//! Scroll progress state machine.
//!
//! The controller owns the active section and its progress. Inputs either move
//! progress inside the active section (and hand it to that section's sink) or,
//! once progress saturates, move to a neighboring section. A transition locks
//! out all input until [`ScrollController::settle`] is called; the host calls
//! it after [`ScrollConfig::settle_delay_ms`].
//!
//! Side effects on the page go through [`SectionHost`], so the state machine
//! itself never touches the DOM.

use log::info;
use serde::Deserialize;

use super::input::{DragTracker, NavKey, Profile, TouchTracker};
use super::sections::{ProgressSinks, Section};

/// Timing and threshold parameters for the state machine.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
	/// Time after a transition before input is accepted again.
	pub settle_delay_ms: u32,
	/// Accumulated delta that flips a plain section.
	pub plain_threshold: f64,
	/// Progress at or above which a forward delta leaves the section.
	pub forward_saturation: f64,
	/// Progress at or below which a backward delta leaves the section.
	pub backward_saturation: f64,
	/// Multiplier from finger travel to scroll delta.
	pub touch_gain: f64,
	/// Multiplier from scrollbar thumb travel to scroll delta.
	pub drag_gain: f64,
	/// Viewport width under which the compact profile applies.
	pub compact_breakpoint: f64,
	/// Period of the scrollbar thumb resync timer.
	pub thumb_resync_ms: u32,
}

impl Default for ScrollConfig {
	fn default() -> Self {
		Self {
			settle_delay_ms: 1000,
			plain_threshold: 50.0,
			forward_saturation: 0.99,
			backward_saturation: 0.01,
			touch_gain: 2.0,
			drag_gain: 1.0,
			compact_breakpoint: 769.0,
			thumb_resync_ms: 100,
		}
	}
}

impl ScrollConfig {
	/// Profile for a viewport of the given width.
	pub fn profile_for(&self, viewport_width: f64) -> Profile {
		Profile::from_viewport_width(viewport_width, self.compact_breakpoint)
	}

	/// Touch tracker using this config's gain.
	pub fn touch_tracker(&self) -> TouchTracker {
		TouchTracker::new(self.touch_gain)
	}

	/// Drag tracker using this config's gain.
	pub fn drag_tracker(&self) -> DragTracker {
		DragTracker::new(self.drag_gain)
	}
}

/// Page-level side effects requested by the state machine.
pub trait SectionHost {
	/// Bring the section into view.
	fn scroll_into_view(&mut self, index: usize, section: &Section);
	/// Mark navigation entry `index` as the active one.
	fn highlight_nav(&mut self, index: usize);
}

/// Direction of a section change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	/// Toward the next section.
	Forward,
	/// Toward the previous section.
	Backward,
}

/// Whether input is currently accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Accepting input.
	Idle,
	/// A transition is in flight; input is dropped.
	Transitioning,
}

/// Snapshot of the state machine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollState {
	/// Index of the active section.
	pub current: usize,
	/// Progress of the active section in `[0, 1]`.
	pub progress: f64,
	/// Set while a transition is in flight.
	pub is_animating: bool,
	/// Delta collected by a plain section.
	pub accumulator: f64,
}

/// What an input did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
	/// Dropped because a transition is in flight or the input was not finite.
	Discarded,
	/// Accepted but nothing changed (bounds, same section, no sections).
	Unchanged,
	/// Progress of the active animated section is now this value.
	Progressed(f64),
	/// A plain section collected the delta without reaching its threshold.
	Accumulated(f64),
	/// A plain section reached its threshold but had nowhere to go.
	ThresholdCrossed,
	/// The active section changed; the host must schedule [`ScrollController::settle`].
	Transitioned { from: usize, to: usize },
}

impl Outcome {
	/// Whether the active section changed.
	pub fn is_transition(&self) -> bool {
		matches!(self, Outcome::Transitioned { .. })
	}

	/// Whether an ongoing drag gesture should stop here.
	pub fn ends_gesture(&self) -> bool {
		matches!(self, Outcome::Transitioned { .. } | Outcome::ThresholdCrossed)
	}
}

/// Document-space placement of a section, used by the compact profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionGeometry {
	/// Top edge in document coordinates.
	pub top: f64,
	/// Section height.
	pub height: f64,
}

/// Progress through a natively scrolled section.
///
/// Zero when the section top meets the viewport top, one when the section
/// bottom reaches the middle of the viewport. Sections shorter than half the
/// viewport count as complete as soon as their top is reached.
pub fn native_progress(geometry: SectionGeometry, scroll_y: f64, viewport_height: f64) -> f64 {
	let visible_top = scroll_y - geometry.top;
	let span = geometry.height - 0.5 * viewport_height;
	if span <= 0.0 {
		return if visible_top >= 0.0 { 1.0 } else { 0.0 };
	}
	(visible_top / span).clamp(0.0, 1.0)
}

/// The scroll-hijacking state machine.
pub struct ScrollController<H> {
	sections: Vec<Section>,
	sinks: ProgressSinks,
	host: H,
	config: ScrollConfig,
	state: ScrollState,
}

impl<H: SectionHost> ScrollController<H> {
	/// Starts idle on the first section at progress 0.
	pub fn new(sections: Vec<Section>, sinks: ProgressSinks, host: H, config: ScrollConfig) -> Self {
		Self {
			sections,
			sinks,
			host,
			config,
			state: ScrollState::default(),
		}
	}

	/// Current state snapshot.
	pub fn state(&self) -> &ScrollState {
		&self.state
	}

	/// Current phase.
	pub fn phase(&self) -> Phase {
		if self.state.is_animating {
			Phase::Transitioning
		} else {
			Phase::Idle
		}
	}

	/// Timing and threshold parameters.
	pub fn config(&self) -> &ScrollConfig {
		&self.config
	}

	/// The section table.
	pub fn sections(&self) -> &[Section] {
		&self.sections
	}

	/// The active section, if the table is not empty.
	pub fn current_section(&self) -> Option<&Section> {
		self.sections.get(self.state.current)
	}

	/// The side-effect host.
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Presents the starting section without entering a transition.
	pub fn show_initial(&mut self) {
		self.animate_current();
		self.host.highlight_nav(self.state.current);
	}

	/// Feeds a signed scroll delta (wheel, touch or drag) into the active section.
	pub fn handle_delta(&mut self, delta: f64) -> Outcome {
		if self.state.is_animating || !delta.is_finite() {
			return Outcome::Discarded;
		}
		let Some(section) = self.sections.get(self.state.current) else {
			return Outcome::Unchanged;
		};

		let sensitivity = section.sensitivity;

		match sensitivity {
			Some(sensitivity) => {
				let progress = (self.state.progress + delta * sensitivity).clamp(0.0, 1.0);
				self.state.progress = progress;
				self.animate_current();

				if progress >= self.config.forward_saturation && delta > 0.0 && self.has_next() {
					self.transition(Direction::Forward)
				} else if progress <= self.config.backward_saturation && delta < 0.0 && self.has_prev() {
					self.transition(Direction::Backward)
				} else {
					Outcome::Progressed(progress)
				}
			}
			None => {
				self.state.accumulator += delta;
				if self.state.accumulator.abs() <= self.config.plain_threshold {
					return Outcome::Accumulated(self.state.accumulator);
				}

				let direction = if self.state.accumulator > 0.0 {
					Direction::Forward
				} else {
					Direction::Backward
				};
				self.state.accumulator = 0.0;
				match self.transition(direction) {
					moved @ Outcome::Transitioned { .. } => moved,
					_ => Outcome::ThresholdCrossed,
				}
			}
		}
	}

	/// Navigation keys skip the progress mechanism and change section directly.
	pub fn handle_key(&mut self, key: NavKey) -> Outcome {
		match key {
			NavKey::Next => self.transition(Direction::Forward),
			NavKey::Previous => self.transition(Direction::Backward),
		}
	}

	/// Feeds a finger move from an active touch gesture.
	pub fn touch_to(&mut self, touch: &mut TouchTracker, y: f64) -> Outcome {
		match touch.move_to(y) {
			Some(delta) => self.handle_delta(delta),
			None => Outcome::Unchanged,
		}
	}

	/// Feeds a scrollbar thumb move. A section change or a crossed threshold
	/// ends the drag, so it never carries over into the next section.
	pub fn drag_to(&mut self, drag: &mut DragTracker, y: f64) -> Outcome {
		let Some(delta) = drag.move_to(y) else {
			return Outcome::Unchanged;
		};
		let outcome = self.handle_delta(delta);
		if outcome.ends_gesture() {
			drag.end();
		}
		outcome
	}

	/// Moves one section forward or backward.
	///
	/// Entering from above starts the section at progress 0, entering from
	/// below starts it at 1 so it can be unwound backwards.
	pub fn transition(&mut self, direction: Direction) -> Outcome {
		if self.state.is_animating {
			return Outcome::Discarded;
		}
		let from = self.state.current;
		let to = match direction {
			Direction::Forward if self.has_next() => from + 1,
			Direction::Backward if self.has_prev() => from - 1,
			_ => return Outcome::Unchanged,
		};

		self.state.progress = match direction {
			Direction::Forward => 0.0,
			Direction::Backward => 1.0,
		};
		self.enter(from, to)
	}

	/// Jumps straight to `index`, keeping the current progress value.
	pub fn scroll_to_section(&mut self, index: usize) -> Outcome {
		if self.state.is_animating {
			return Outcome::Discarded;
		}
		if index == self.state.current || index >= self.sections.len() {
			return Outcome::Unchanged;
		}
		self.enter(self.state.current, index)
	}

	/// Navigation link behavior: jump to `index`, starting it from the end that
	/// matches the direction of travel.
	pub fn navigate_to(&mut self, index: usize) -> Outcome {
		if self.state.is_animating {
			return Outcome::Discarded;
		}
		if index == self.state.current || index >= self.sections.len() {
			return Outcome::Unchanged;
		}
		self.state.progress = if index > self.state.current { 0.0 } else { 1.0 };
		self.scroll_to_section(index)
	}

	/// Click-to-seek on the scrollbar track; `fraction` is the click position
	/// along the track in `[0, 1]`. The target section keeps the current
	/// progress value, as with [`ScrollController::scroll_to_section`].
	pub fn seek(&mut self, fraction: f64) -> Outcome {
		if !fraction.is_finite() || self.sections.is_empty() {
			return Outcome::Unchanged;
		}
		let last = self.sections.len() - 1;
		let index = ((fraction * self.sections.len() as f64).floor().max(0.0) as usize).min(last);
		self.scroll_to_section(index)
	}

	/// Compact profile: derives the active section and its progress from the
	/// native scroll position. `layout` lists section geometry in section order.
	pub fn native_scroll(
		&mut self,
		layout: &[SectionGeometry],
		scroll_y: f64,
		viewport_height: f64,
	) -> Outcome {
		if self.state.is_animating {
			return Outcome::Discarded;
		}
		let count = layout.len().min(self.sections.len());
		if count == 0 || !scroll_y.is_finite() {
			return Outcome::Unchanged;
		}

		let midpoint = scroll_y + 0.5 * viewport_height;
		let active = layout[..count]
			.iter()
			.rposition(|g| g.top <= midpoint)
			.unwrap_or(0);
		if active != self.state.current {
			self.state.current = active;
			self.host.highlight_nav(active);
		}

		if !self.sections[active].is_animated() {
			return Outcome::Unchanged;
		}
		let progress = native_progress(layout[active], scroll_y, viewport_height);
		self.state.progress = progress;
		self.animate_current();
		Outcome::Progressed(progress)
	}

	/// Ends the in-flight transition. Safe to call at any time.
	pub fn settle(&mut self) {
		self.state.is_animating = false;
	}

	/// Position of the scrollbar thumb along its track in `[0, 1]`.
	pub fn thumb_fraction(&self) -> f64 {
		let count = self.sections.len();
		if count == 0 {
			return 0.0;
		}
		let within = match self.current_section() {
			Some(section) if section.is_animated() => self.state.progress,
			_ => 0.0,
		};
		((self.state.current as f64 + within) / count as f64).clamp(0.0, 1.0)
	}

	fn has_next(&self) -> bool {
		self.state.current + 1 < self.sections.len()
	}

	fn has_prev(&self) -> bool {
		self.state.current > 0
	}

	fn enter(&mut self, from: usize, to: usize) -> Outcome {
		self.state.is_animating = true;
		self.state.current = to;

		if let Some(section) = self.sections.get(to) {
			self.host.scroll_into_view(to, section);
			info!("portfolio-motion: section {} -> {} ({})", from, to, section.id);
		}
		self.animate_current();
		self.host.highlight_nav(to);

		Outcome::Transitioned { from, to }
	}

	fn animate_current(&mut self) {
		if let Some(section) = self.sections.get(self.state.current) {
			if section.is_animated() {
				self.sinks.deliver(&section.id, self.state.progress);
			}
		}
	}
}
