//! Section table and progress sinks.

use std::collections::HashMap;

use serde::Deserialize;

/// Receives an animated section's progress in `[0, 1]` and applies it to the page.
pub type ProgressSink = Box<dyn FnMut(f64)>;

/// One full-screen page region, in document order.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Section {
	/// Element id of the section in the host document.
	pub id: String,
	/// Progress gained per unit of scroll delta. `None` marks a plain section
	/// that flips on an accumulated threshold instead of tracking progress.
	#[serde(default)]
	pub sensitivity: Option<f64>,
}

impl Section {
	/// Progress-driven section.
	pub fn animated(id: impl Into<String>, sensitivity: f64) -> Self {
		Self {
			id: id.into(),
			sensitivity: Some(sensitivity),
		}
	}

	/// Threshold-driven section.
	pub fn plain(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			sensitivity: None,
		}
	}

	/// Whether the section tracks progress.
	pub fn is_animated(&self) -> bool {
		self.sensitivity.is_some()
	}
}

/// The portfolio's sections: a plain landing section followed by four
/// progress-driven ones, the last of which ends the page.
pub fn default_sections() -> Vec<Section> {
	vec![
		Section::plain("inicio"),
		Section::animated("blueprint", 0.001),
		Section::animated("proyectos", 0.0008),
		Section::animated("filosofia", 0.002),
		Section::animated("contacto", 0.002),
	]
}

/// Progress callbacks keyed by section id.
///
/// Delivering to a section without a registered sink does nothing.
#[derive(Default)]
pub struct ProgressSinks {
	sinks: HashMap<String, ProgressSink>,
}

impl ProgressSinks {
	/// Empty sink table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces the sink for `id`.
	pub fn register(&mut self, id: impl Into<String>, sink: impl FnMut(f64) + 'static) -> &mut Self {
		self.sinks.insert(id.into(), Box::new(sink));
		self
	}

	/// Whether `id` has a sink.
	pub fn contains(&self, id: &str) -> bool {
		self.sinks.contains_key(id)
	}

	/// Hands `progress` to the sink for `id`, if any.
	pub fn deliver(&mut self, id: &str, progress: f64) {
		if let Some(sink) = self.sinks.get_mut(id) {
			sink(progress);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;

	#[test]
	fn default_table_ends_with_contact() {
		let sections = default_sections();
		assert_eq!(sections.len(), 5);
		assert!(!sections[0].is_animated());
		assert_eq!(sections[1].sensitivity, Some(0.001));
		assert_eq!(sections.last().map(|s| s.id.as_str()), Some("contacto"));
	}

	#[test]
	fn sections_deserialize_with_optional_sensitivity() {
		let sections: Vec<Section> = serde_json::from_str(
			r#"[{ "id": "hero" }, { "id": "work", "sensitivity": 0.004 }]"#,
		)
		.unwrap();
		assert_eq!(sections, vec![Section::plain("hero"), Section::animated("work", 0.004)]);
	}

	#[test]
	fn deliver_reaches_only_registered_sink() {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let seen_sink = seen.clone();
		let mut sinks = ProgressSinks::new();
		sinks.register("blueprint", move |p| seen_sink.borrow_mut().push(p));

		sinks.deliver("blueprint", 0.25);
		sinks.deliver("missing", 0.5);

		assert!(sinks.contains("blueprint"));
		assert_eq!(*seen.borrow(), vec![0.25]);
	}
}
