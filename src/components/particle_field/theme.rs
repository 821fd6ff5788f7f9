//! Colors and tunables for the particle background.
//!
//! Every constant that shapes how the field moves or looks lives in
//! [`ParticleStyle`], so a host page can override it through the motion config.

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`; defaults to opaque.
	#[serde(default = "opaque")]
	pub a: f64,
}

fn opaque() -> f64 {
	1.0
}

impl Color {
	/// Opaque white.
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	/// Opaque color from channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with a different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS `rgba(...)` string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Motion, interaction and appearance parameters for the particle field.
///
/// Per-tick rates are applied once per animation frame, not per second.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleStyle {
	/// Number of particles, fixed for the lifetime of the field.
	pub count: usize,
	/// Spread of the initial velocity components (each in `±spread/2`).
	pub speed: f64,
	/// Initial size range `[min, max)`.
	pub size_range: (f64, f64),
	/// Range the per-particle maximum size is drawn from.
	pub max_size_range: (f64, f64),
	/// Range initial and base opacity are drawn from.
	pub opacity_range: (f64, f64),
	/// Range of the per-particle pulse phase speed.
	pub pulse_speed_range: (f64, f64),
	/// Pointer distance under which a particle is repelled.
	pub hover_radius: f64,
	/// Velocity impulse gain applied at full repulsion force.
	pub repulsion_gain: f64,
	/// Size growth per tick while repelled.
	pub grow_rate: f64,
	/// Opacity growth per tick while repelled.
	pub brighten_rate: f64,
	/// Size decay per tick while at rest.
	pub shrink_rate: f64,
	/// Opacity decay per tick while at rest.
	pub fade_rate: f64,
	/// Smallest radius a particle may shrink to.
	pub min_size: f64,
	/// Amplitude of the wall-clock opacity pulse.
	pub pulse_amplitude: f64,
	/// Opacity floor after pulsing.
	pub min_opacity: f64,
	/// Maximum distance at which two particles are linked.
	pub connection_distance: f64,
	/// Pointer distance to either endpoint that marks a link as influenced.
	pub pointer_link_radius: f64,
	/// Opacity of a zero-length link before pointer influence.
	pub link_opacity: f64,
	/// Influence added to links near the pointer.
	pub pointer_influence: f64,
	/// Base link stroke width.
	pub line_width: f64,
	/// Shadow blur of influenced links.
	pub line_glow_blur: f64,
	/// Particle fill color.
	pub particle_color: Color,
	/// Link stroke color.
	pub line_color: Color,
	/// Particle glow color.
	pub particle_glow: Color,
	/// Glow color of influenced links.
	pub line_glow: Color,
}

impl Default for ParticleStyle {
	fn default() -> Self {
		Self {
			count: 80,
			speed: 0.3,
			size_range: (1.0, 3.0),
			max_size_range: (2.0, 5.0),
			opacity_range: (0.3, 0.8),
			pulse_speed_range: (0.01, 0.03),
			hover_radius: 100.0,
			repulsion_gain: 0.02,
			grow_rate: 0.15,
			brighten_rate: 0.03,
			shrink_rate: 0.05,
			fade_rate: 0.01,
			min_size: 1.0,
			pulse_amplitude: 0.05,
			min_opacity: 0.1,
			connection_distance: 120.0,
			pointer_link_radius: 80.0,
			link_opacity: 0.3,
			pointer_influence: 0.5,
			line_width: 0.5,
			line_glow_blur: 3.0,
			particle_color: Color::WHITE,
			line_color: Color::WHITE,
			particle_glow: Color::rgba(255, 255, 255, 0.3),
			line_glow: Color::rgba(255, 255, 255, 0.5),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opaque_colors_render_as_hex() {
		assert_eq!(Color::WHITE.to_css(), "#ffffff");
		assert_eq!(Color::rgb(1, 2, 255).to_css(), "#0102ff");
	}

	#[test]
	fn translucent_colors_render_as_rgba() {
		assert_eq!(
			Color::WHITE.with_alpha(0.5).to_css(),
			"rgba(255, 255, 255, 0.5)"
		);
	}

	#[test]
	fn partial_style_keeps_defaults() {
		let style: ParticleStyle =
			serde_json::from_str(r#"{ "count": 12, "line_color": { "r": 10, "g": 20, "b": 30 } }"#)
				.unwrap();
		assert_eq!(style.count, 12);
		assert_eq!(style.line_color, Color::rgb(10, 20, 30));
		assert_eq!(style.hover_radius, 100.0);
	}
}
