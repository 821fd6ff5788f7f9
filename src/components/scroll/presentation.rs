//! Progress sinks for the animated sections.
//!
//! Each section maps its progress onto the host markup. The math lives in
//! small pure functions; the `apply_*` functions write the results into the
//! document and skip whatever elements are missing.

use super::dom::{self, query, query_all, set_class, set_style};
use super::sections::ProgressSinks;

/// Progress through a stage that starts at `start` and lasts `span`, in `[0, 1]`.
pub fn stage(progress: f64, start: f64, span: f64) -> f64 {
	if span <= 0.0 {
		return if progress >= start { 1.0 } else { 0.0 };
	}
	((progress - start) / span).clamp(0.0, 1.0)
}

/// Ease in-out (cubic) - slow start and end, fast middle
pub fn ease_in_out_cubic(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		let t = t - 1.0;
		1.0 + 4.0 * t * t * t
	}
}

/// An element that fades in while rising `rise_px` into place, starting at
/// `start` and finishing at full progress.
#[derive(Clone, Copy, Debug)]
struct Reveal {
	selector: &'static str,
	start: f64,
	rise_px: f64,
}

impl Reveal {
	const fn new(selector: &'static str, start: f64, rise_px: f64) -> Self {
		Self {
			selector,
			start,
			rise_px,
		}
	}

	/// `(opacity, translate_y_px)` at `progress`.
	fn at(&self, progress: f64) -> (f64, f64) {
		let t = stage(progress, self.start, 1.0 - self.start);
		(t, (1.0 - t) * self.rise_px)
	}

	fn apply(&self, root: &web_sys::Element, progress: f64) {
		let Some(el) = query(root, self.selector) else {
			return;
		};
		let (opacity, offset) = self.at(progress);
		set_style(&el, "opacity", &opacity.to_string());
		set_style(&el, "transform", &format!("translateY({offset}px)"));
	}
}

// blueprint

const ROOM_LABEL_DELAYS: [f64; 5] = [0.7, 0.75, 0.8, 0.85, 0.9];
const MAIN_WALL_LENGTH: f64 = 1800.0;
const PROGRESS_RING_LENGTH: f64 = 126.0;

/// Status line shown under the blueprint drawing.
pub fn blueprint_status(progress: f64) -> &'static str {
	match progress {
		p if p < 0.3 => "Trazando fundamentos...",
		p if p < 0.5 => "Definiendo espacios...",
		p if p < 0.7 => "Integrando funciones...",
		p if p < 0.95 => "Detallando acabados...",
		_ => "Plano completado",
	}
}

/// Scale of room label `index`, or `None` while it is still hidden.
pub fn room_label_scale(index: usize, progress: f64) -> Option<f64> {
	let delay = ROOM_LABEL_DELAYS.get(index).copied().unwrap_or(ROOM_LABEL_DELAYS[0]);
	(progress > delay).then(|| ((progress - delay) * 10.0).min(1.0))
}

/// Dash offset that draws `length` worth of stroke at `progress`.
pub fn dash_offset(length: f64, progress: f64) -> f64 {
	length - progress * length
}

/// Leading number of a `stroke-dasharray` value such as `"10 5"`,
/// `"12.5,3"` or `"40px"`.
pub fn dash_length(dasharray: &str) -> Option<f64> {
	let token = dasharray
		.split(|c: char| c.is_whitespace() || c == ',')
		.find(|t| !t.is_empty())?;
	let end = token
		.find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
		.unwrap_or(token.len());
	token[..end].parse().ok()
}

fn shown(visible: bool) -> &'static str {
	if visible { "1" } else { "0" }
}

/// Draws the blueprint plan, stats and status line.
pub fn apply_blueprint(progress: f64) {
	let Some(section) = dom::element_by_id("blueprint") else {
		return;
	};

	if let Some(canvas) = query(&section, ".blueprint-canvas") {
		set_style(&canvas, "opacity", shown(progress > 0.1));
		set_style(&canvas, "transform", &format!("scale({})", 0.9 + progress * 0.1));
	}

	if let Some(wall) = query(&section, ".main-wall") {
		set_style(
			&wall,
			"stroke-dashoffset",
			&dash_offset(MAIN_WALL_LENGTH, progress).to_string(),
		);
	}

	for (i, line) in query_all(&section, ".division-line").iter().enumerate() {
		let delay = 0.3 + i as f64 * 0.1;
		let Some(length) = line
			.get_attribute("stroke-dasharray")
			.and_then(|v| dash_length(&v))
		else {
			continue;
		};
		let line_progress = stage(progress, delay, 1.0 - delay);
		set_style(line, "stroke-dashoffset", &dash_offset(length, line_progress).to_string());
	}

	for (i, marker) in query_all(&section, ".corner-marker").iter().enumerate() {
		set_style(marker, "opacity", shown(progress > 0.2 + i as f64 * 0.05));
	}

	for (i, detail) in query_all(&section, ".blueprint-detail").iter().enumerate() {
		set_style(detail, "opacity", shown(progress > 0.5 + i as f64 * 0.1));
	}

	for (i, label) in query_all(&section, ".room-label").iter().enumerate() {
		match room_label_scale(i, progress) {
			Some(scale) => {
				set_style(label, "transform", &format!("scale({scale})"));
				set_style(label, "opacity", "1");
			}
			None => set_style(label, "opacity", "0"),
		}
	}

	if let Some(dimensions) = query(&section, ".blueprint-dimensions") {
		set_style(&dimensions, "opacity", shown(progress > 0.95));
	}

	if let (Some(ring), Some(text)) = (
		query(&section, ".progress-circle"),
		query(&section, ".progress-text"),
	) {
		set_style(
			&ring,
			"stroke-dashoffset",
			&dash_offset(PROGRESS_RING_LENGTH, progress).to_string(),
		);
		text.set_text_content(Some(&format!("{}%", (progress * 100.0).round())));
	}

	for (i, stat) in query_all(&section, ".stat-item").iter().enumerate() {
		let t = stage(progress, 0.4 + i as f64 * 0.1, 0.2);
		set_style(stat, "opacity", &t.to_string());
		set_style(stat, "transform", &format!("translateX({}px)", (1.0 - t) * 150.0));
	}

	if let Some(status) = query(&section, ".blueprint-status") {
		status.set_text_content(Some(blueprint_status(progress)));
		set_style(&status, "opacity", shown(progress > 0.7));
	}
}

// proyectos

/// Where a project card sits for a given section progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CardPose {
	/// Waiting in the pile, before its turn.
	Stacked {
		/// Vertical offset in the pile, in pixels.
		offset_px: f64,
		/// Tilt in degrees.
		rotate_deg: f64,
	},
	/// On stage during its own progress window.
	Active {
		/// Horizontal offset in percent.
		translate_x_pct: f64,
		/// Uniform scale.
		scale: f64,
		/// Opacity in `[0, 1]`.
		opacity: f64,
	},
	/// Leaving to the right after its turn.
	Exited {
		/// Horizontal offset in percent.
		translate_x_pct: f64,
		/// Opacity in `[0, 1]`.
		opacity: f64,
	},
}

impl CardPose {
	/// CSS transform for the pose.
	pub fn transform(&self) -> String {
		match *self {
			CardPose::Stacked {
				offset_px,
				rotate_deg,
			} => format!(
				"translateX(-50%) translateY({offset_px}px) rotate({rotate_deg}deg) scale(0.75)"
			),
			CardPose::Active {
				translate_x_pct,
				scale,
				..
			} => format!("translateX({translate_x_pct}%) scale({scale})"),
			CardPose::Exited {
				translate_x_pct, ..
			} => format!("translateX({translate_x_pct}%) scale(0.85)"),
		}
	}

	/// CSS opacity for the pose.
	pub fn opacity(&self) -> f64 {
		match *self {
			CardPose::Stacked { .. } => 0.7,
			CardPose::Active { opacity, .. } | CardPose::Exited { opacity, .. } => opacity,
		}
	}

	/// Whether the card is on stage.
	pub fn is_active(&self) -> bool {
		matches!(self, CardPose::Active { .. })
	}
}

/// Pose of card `index` out of `total` at `progress`.
///
/// Each card owns the window `[index/total, (index+1)/total)`; the last
/// window also includes full progress so the final card stays on stage.
pub fn card_pose(index: usize, total: usize, progress: f64) -> CardPose {
	let total = total.max(1) as f64;
	let start = index as f64 / total;
	let end = (index as f64 + 1.0) / total;
	let is_last = end >= 1.0;

	if progress < start {
		return CardPose::Stacked {
			offset_px: index as f64 * 4.0,
			rotate_deg: if index % 2 == 0 { 3.0 } else { -3.0 },
		};
	}

	if progress < end || is_last {
		let eased = ease_in_out_cubic(stage(progress, start, end - start));
		let entry = (eased / 0.4).min(1.0);
		return CardPose::Active {
			translate_x_pct: (entry - 1.0) * 100.0,
			scale: 0.85 + entry * 0.15,
			opacity: entry,
		};
	}

	let eased = ease_in_out_cubic(stage(progress, end, 1.0 - end));
	CardPose::Exited {
		translate_x_pct: 100.0 + eased * 60.0,
		opacity: (1.0 - eased * 1.5).max(0.0),
	}
}

/// Moves every project card to its pose.
pub fn apply_projects(progress: f64) {
	let Some(section) = dom::element_by_id("proyectos") else {
		return;
	};
	let cards = query_all(&section, ".project-card");
	let total = cards.len();

	for (i, card) in cards.iter().enumerate() {
		let pose = card_pose(i, total, progress);
		let z_index = match pose {
			CardPose::Stacked { .. } => i,
			CardPose::Active { .. } => 100,
			CardPose::Exited { .. } => 1,
		};
		set_style(card, "will-change", "transform, opacity");
		set_style(card, "transform", &pose.transform());
		set_style(card, "opacity", &pose.opacity().to_string());
		set_style(card, "z-index", &z_index.to_string());
		set_class(card, "active", pose.is_active());
	}
}

// filosofia

const PHILOSOPHY_REVEALS: [Reveal; 3] = [
	Reveal::new(".philosophy-title", 0.1, 50.0),
	Reveal::new(".philosophy-quote", 0.3, 50.0),
	Reveal::new(".philosophy-text", 0.7, 40.0),
];

/// Reveals the philosophy title, quote, divider and text.
pub fn apply_philosophy(progress: f64) {
	let Some(section) = dom::element_by_id("filosofia") else {
		return;
	};
	for reveal in &PHILOSOPHY_REVEALS {
		reveal.apply(&section, progress);
	}
	if let Some(divider) = query(&section, ".philosophy-divider") {
		set_style(&divider, "opacity", shown(progress > 0.5));
		set_style(&divider, "transform", &format!("scaleX({})", stage(progress, 0.5, 0.5)));
	}
}

// contacto

const CONTACT_REVEALS: [Reveal; 3] = [
	Reveal::new(".contact-subtitle", 0.3, 40.0),
	Reveal::new(".contact-form-section", 0.4, 50.0),
	Reveal::new(".contact-info-section", 0.5, 50.0),
];

/// Reveals the contact background, title, form and details.
pub fn apply_contact(progress: f64) {
	let Some(section) = dom::element_by_id("contacto") else {
		return;
	};
	if let Some(grid) = query(&section, ".contact-grid-pattern") {
		set_style(&grid, "opacity", &(progress * 2.0).min(1.0).to_string());
	}
	if let Some(orb) = query(&section, ".contact-gradient-orb") {
		set_style(&orb, "opacity", &(progress * 1.5).min(1.0).to_string());
	}

	let letters = stage(progress, 0.1, 0.5);
	for letter in query_all(&section, ".contact-title .letter") {
		set_style(&letter, "opacity", &letters.to_string());
		set_style(&letter, "transform", "translate(0, 0)");
	}

	for reveal in &CONTACT_REVEALS {
		reveal.apply(&section, progress);
	}
}

/// Sinks for the four animated portfolio sections.
pub fn portfolio_sinks() -> ProgressSinks {
	let mut sinks = ProgressSinks::new();
	sinks
		.register("blueprint", apply_blueprint)
		.register("proyectos", apply_projects)
		.register("filosofia", apply_philosophy)
		.register("contacto", apply_contact);
	sinks
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stage_clamps_to_its_window() {
		assert_eq!(stage(0.2, 0.4, 0.2), 0.0);
		assert!((stage(0.5, 0.4, 0.2) - 0.5).abs() < 1e-9);
		assert_eq!(stage(0.9, 0.4, 0.2), 1.0);
		assert_eq!(stage(0.4, 0.4, 0.0), 1.0);
	}

	#[test]
	fn easing_hits_endpoints_and_midpoint() {
		assert_eq!(ease_in_out_cubic(0.0), 0.0);
		assert_eq!(ease_in_out_cubic(0.5), 0.5);
		assert_eq!(ease_in_out_cubic(1.0), 1.0);
		assert!(ease_in_out_cubic(0.25) < 0.25);
	}

	#[test]
	fn status_text_follows_bands() {
		assert_eq!(blueprint_status(0.0), "Trazando fundamentos...");
		assert_eq!(blueprint_status(0.45), "Definiendo espacios...");
		assert_eq!(blueprint_status(0.6), "Integrando funciones...");
		assert_eq!(blueprint_status(0.9), "Detallando acabados...");
		assert_eq!(blueprint_status(1.0), "Plano completado");
	}

	#[test]
	fn room_labels_pop_in_after_their_delay() {
		assert_eq!(room_label_scale(0, 0.7), None);
		assert!((room_label_scale(0, 0.75).unwrap() - 0.5).abs() < 1e-9);
		let last = room_label_scale(4, 1.0).unwrap();
		assert!((last - 1.0).abs() < 1e-9);
		assert_eq!(room_label_scale(9, 0.65), None);
		assert!(room_label_scale(9, 0.71).is_some());
	}

	#[test]
	fn dash_offset_draws_the_stroke() {
		assert_eq!(dash_offset(1800.0, 0.0), 1800.0);
		assert_eq!(dash_offset(1800.0, 1.0), 0.0);
		assert_eq!(dash_offset(126.0, 0.5), 63.0);
	}

	#[test]
	fn dash_length_reads_the_leading_number() {
		assert_eq!(dash_length("400"), Some(400.0));
		assert_eq!(dash_length(" 10 5"), Some(10.0));
		assert_eq!(dash_length("12.5,3"), Some(12.5));
		assert_eq!(dash_length("40px 8px"), Some(40.0));
		assert_eq!(dash_length("none"), None);
		assert_eq!(dash_length(""), None);
	}

	#[test]
	fn cards_move_from_stack_to_stage_to_exit() {
		assert_eq!(
			card_pose(2, 4, 0.1),
			CardPose::Stacked {
				offset_px: 8.0,
				rotate_deg: 3.0
			}
		);
		assert!(card_pose(1, 4, 0.3).is_active());
		assert!(matches!(card_pose(0, 4, 0.6), CardPose::Exited { .. }));
	}

	#[test]
	fn active_card_finishes_entry_early_in_its_window() {
		let entering = card_pose(0, 4, 0.0);
		assert_eq!(entering.opacity(), 0.0);
		assert_eq!(entering.transform(), "translateX(-100%) scale(0.85)");

		let settled = card_pose(0, 4, 0.2);
		assert_eq!(settled.opacity(), 1.0);
		let CardPose::Active {
			translate_x_pct,
			scale,
			..
		} = settled
		else {
			panic!("expected an active card, got {settled:?}");
		};
		assert_eq!(translate_x_pct, 0.0);
		assert!((scale - 1.0).abs() < 1e-9);
	}

	#[test]
	fn last_card_stays_on_stage_at_full_progress() {
		let pose = card_pose(3, 4, 1.0);
		assert!(pose.is_active());
		assert_eq!(pose.opacity(), 1.0);
	}

	#[test]
	fn exited_cards_fade_out() {
		let pose = card_pose(0, 4, 1.0);
		assert_eq!(
			pose,
			CardPose::Exited {
				translate_x_pct: 160.0,
				opacity: 0.0
			}
		);
	}

	#[test]
	fn reveal_rises_into_place() {
		let reveal = Reveal::new(".x", 0.3, 40.0);
		assert_eq!(reveal.at(0.2), (0.0, 40.0));
		let (opacity, offset) = reveal.at(0.65);
		assert!((opacity - 0.5).abs() < 1e-9);
		assert!((offset - 20.0).abs() < 1e-9);
		assert_eq!(reveal.at(1.0), (1.0, 0.0));
	}

	#[test]
	fn portfolio_sinks_cover_animated_sections() {
		let sinks = portfolio_sinks();
		for id in ["blueprint", "proyectos", "filosofia", "contacto"] {
			assert!(sinks.contains(id));
		}
		assert!(!sinks.contains("inicio"));
	}
}
