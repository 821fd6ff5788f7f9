//! portfolio-motion: scroll-driven section reveals and an interactive particle
//! background for a single-page portfolio.
//!
//! This crate provides two WASM components for a static page: a particle field
//! rendered behind the content, and a scroll stage that turns wheel, touch,
//! keyboard and scrollbar input into per-section progress.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod config;

pub use components::particle_field::{ParticleCanvas, ParticleField, ParticleStyle};
pub use components::scroll::{ScrollConfig, ScrollController, ScrollStage, Section};
pub use config::MotionConfig;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("portfolio-motion: logging initialized");
}

/// Load motion settings from a script element with id="motion-config".
fn load_motion_config() -> Option<MotionConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("motion-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match MotionConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"portfolio-motion: loaded config with {} sections, {} particles",
				config.sections.len(),
				config.particles.count
			);
			Some(config)
		}
		Err(e) => {
			warn!("portfolio-motion: failed to parse motion config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Reads the motion config from the DOM and mounts the background and scroll stage.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let MotionConfig {
		scroll,
		sections,
		particles,
	} = load_motion_config().unwrap_or_default();

	view! {
		<Html attr:data-motion="ready" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="particles-layer">
			<ParticleCanvas style=particles />
		</div>
		<ScrollStage sections=sections config=scroll />
	}
}
