//! Page-level motion configuration.

use serde::Deserialize;

use crate::components::particle_field::ParticleStyle;
use crate::components::scroll::{ScrollConfig, Section, default_sections};

/// Everything the page can tune, read from an optional
/// `<script id="motion-config" type="application/json">` element.
///
/// Every field is optional in the JSON; missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
	/// State machine timings and thresholds.
	pub scroll: ScrollConfig,
	/// Sections in document order.
	pub sections: Vec<Section>,
	/// Particle background tunables.
	pub particles: ParticleStyle,
}

impl Default for MotionConfig {
	fn default() -> Self {
		Self {
			scroll: ScrollConfig::default(),
			sections: default_sections(),
			particles: ParticleStyle::default(),
		}
	}
}

impl MotionConfig {
	/// Parses a config document.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_keeps_defaults() {
		let config = MotionConfig::from_json("{}").unwrap();
		assert_eq!(config, MotionConfig::default());
		assert_eq!(config.sections.len(), 5);
	}

	#[test]
	fn partial_overrides_merge_with_defaults() {
		let config = MotionConfig::from_json(
			r#"{
				"scroll": { "settle_delay_ms": 600, "compact_breakpoint": 900 },
				"particles": { "count": 40 }
			}"#,
		)
		.unwrap();

		assert_eq!(config.scroll.settle_delay_ms, 600);
		assert_eq!(config.scroll.compact_breakpoint, 900.0);
		assert_eq!(config.scroll.plain_threshold, 50.0);
		assert_eq!(config.particles.count, 40);
		assert_eq!(config.particles.hover_radius, 100.0);
		assert_eq!(config.sections, default_sections());
	}

	#[test]
	fn custom_section_table_replaces_default() {
		let config = MotionConfig::from_json(
			r#"{ "sections": [{ "id": "hero" }, { "id": "work", "sensitivity": 0.003 }] }"#,
		)
		.unwrap();
		assert_eq!(
			config.sections,
			vec![Section::plain("hero"), Section::animated("work", 0.003)]
		);
	}

	#[test]
	fn malformed_document_is_an_error() {
		assert!(MotionConfig::from_json("{ \"scroll\": 3 }").is_err());
		assert!(MotionConfig::from_json("not json").is_err());
	}
}
