//! Input normalization: behavior profiles, key mapping, touch and drag gestures.
//!
//! Every input source ends up as a signed delta for
//! [`ScrollController::handle_delta`](super::controller::ScrollController::handle_delta),
//! except navigation keys, which request a section change directly.

/// Behavior profile picked from the viewport width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
	/// Narrow viewports: native scrolling stays on and drives progress.
	Compact,
	/// Wide viewports: wheel, touch and keys are hijacked.
	Standard,
}

impl Profile {
	/// Compact below `breakpoint`, Standard otherwise.
	pub fn from_viewport_width(width: f64, breakpoint: f64) -> Self {
		if width < breakpoint {
			Profile::Compact
		} else {
			Profile::Standard
		}
	}

	/// Whether wheel, touch and keys are taken over.
	pub fn hijacks_scroll(self) -> bool {
		self == Profile::Standard
	}
}

/// A key that requests a section change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
	/// Go to the next section.
	Next,
	/// Go to the previous section.
	Previous,
}

impl NavKey {
	/// Maps a `KeyboardEvent.key` value.
	pub fn from_key(key: &str) -> Option<Self> {
		match key {
			"ArrowDown" | "PageDown" => Some(NavKey::Next),
			"ArrowUp" | "PageUp" => Some(NavKey::Previous),
			_ => None,
		}
	}
}

/// Tracks one touch drag and turns finger motion into scroll deltas.
///
/// The profile is fixed when the gesture begins so a resize mid-gesture
/// cannot change how the rest of it is interpreted.
#[derive(Clone, Debug)]
pub struct TouchTracker {
	gain: f64,
	gesture: Option<(f64, Profile)>,
}

impl TouchTracker {
	/// Tracker with the given finger-to-delta gain.
	pub fn new(gain: f64) -> Self {
		Self {
			gain,
			gesture: None,
		}
	}

	/// Starts a gesture at `y`, fixing its profile.
	pub fn begin(&mut self, y: f64, profile: Profile) {
		self.gesture = Some((y, profile));
	}

	/// Returns the delta for a finger move, or `None` when there is no active
	/// gesture or the gesture belongs to the compact profile.
	///
	/// Moving the finger up yields a positive (forward) delta.
	pub fn move_to(&mut self, y: f64) -> Option<f64> {
		let (last_y, profile) = self.gesture.as_mut()?;
		let delta = (*last_y - y) * self.gain;
		*last_y = y;
		profile.hijacks_scroll().then_some(delta)
	}

	/// Ends the gesture.
	pub fn end(&mut self) {
		self.gesture = None;
	}

	/// Profile of the active gesture.
	pub fn profile(&self) -> Option<Profile> {
		self.gesture.map(|(_, profile)| profile)
	}
}

/// Tracks a drag on the custom scrollbar thumb.
#[derive(Clone, Debug)]
pub struct DragTracker {
	gain: f64,
	last_y: Option<f64>,
}

impl DragTracker {
	/// Tracker with the given thumb-to-delta gain.
	pub fn new(gain: f64) -> Self {
		Self { gain, last_y: None }
	}

	/// Starts a drag at `y`.
	pub fn begin(&mut self, y: f64) {
		self.last_y = Some(y);
	}

	/// Returns the delta for a pointer move while dragging.
	///
	/// Dragging the thumb down yields a positive (forward) delta.
	pub fn move_to(&mut self, y: f64) -> Option<f64> {
		let last_y = self.last_y.as_mut()?;
		let delta = -(*last_y - y) * self.gain;
		*last_y = y;
		Some(delta)
	}

	/// Ends the drag.
	pub fn end(&mut self) {
		self.last_y = None;
	}

	/// Whether a drag is in progress.
	pub fn is_active(&self) -> bool {
		self.last_y.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn profile_switches_at_breakpoint() {
		assert_eq!(Profile::from_viewport_width(768.0, 769.0), Profile::Compact);
		assert_eq!(Profile::from_viewport_width(769.0, 769.0), Profile::Standard);
		assert!(!Profile::Compact.hijacks_scroll());
	}

	#[test]
	fn maps_navigation_keys() {
		assert_eq!(NavKey::from_key("ArrowDown"), Some(NavKey::Next));
		assert_eq!(NavKey::from_key("PageDown"), Some(NavKey::Next));
		assert_eq!(NavKey::from_key("ArrowUp"), Some(NavKey::Previous));
		assert_eq!(NavKey::from_key("PageUp"), Some(NavKey::Previous));
		assert_eq!(NavKey::from_key("Enter"), None);
	}

	#[test]
	fn touch_delta_doubles_finger_travel() {
		let mut touch = TouchTracker::new(2.0);
		assert_eq!(touch.move_to(100.0), None);

		touch.begin(500.0, Profile::Standard);
		assert_eq!(touch.move_to(480.0), Some(40.0));
		assert_eq!(touch.move_to(490.0), Some(-20.0));

		touch.end();
		assert_eq!(touch.move_to(400.0), None);
	}

	#[test]
	fn touch_profile_is_fixed_for_the_gesture() {
		let mut touch = TouchTracker::new(2.0);
		touch.begin(300.0, Profile::Compact);
		assert_eq!(touch.move_to(250.0), None);
		assert_eq!(touch.profile(), Some(Profile::Compact));

		touch.begin(300.0, Profile::Standard);
		assert_eq!(touch.move_to(250.0), Some(100.0));
	}

	#[test]
	fn dragging_down_is_forward() {
		let mut drag = DragTracker::new(5.0);
		assert!(!drag.is_active());
		assert_eq!(drag.move_to(10.0), None);

		drag.begin(100.0);
		assert_eq!(drag.move_to(110.0), Some(50.0));
		assert_eq!(drag.move_to(104.0), Some(-30.0));

		drag.end();
		assert!(!drag.is_active());
	}
}
