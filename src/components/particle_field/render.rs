//! Canvas rendering for the particle field.
//!
//! Drawing happens in two steps: [`draw_list`] turns the simulation state into
//! plain [`DrawCommand`]s, and [`paint`] replays them on a 2D context.
//! Ordering matters for z-stacking:
//! 1. Clear the whole domain
//! 2. Every particle's connections
//! 3. Every particle disc, so discs cover the line ends

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::particles::ParticleField;
use super::theme::Color;

/// A single drawing operation in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	/// Clears the whole domain.
	Clear {
		/// Width of the cleared area.
		width: f64,
		/// Height of the cleared area.
		height: f64,
	},
	/// A connection between two particles.
	Line {
		/// Start point.
		from: (f64, f64),
		/// End point.
		to: (f64, f64),
		/// Stroke width.
		width: f64,
		/// Stroke color.
		color: Color,
		/// Shadow blur radius; zero draws without a glow.
		blur: f64,
		/// Shadow color.
		glow: Color,
	},
	/// A filled particle.
	Disc {
		/// Disc center.
		center: (f64, f64),
		/// Disc radius.
		radius: f64,
		/// Fill color.
		color: Color,
		/// Shadow blur radius.
		blur: f64,
		/// Shadow color.
		glow: Color,
	},
}

/// Builds the draw commands for the current frame.
pub fn draw_list(field: &ParticleField) -> Vec<DrawCommand> {
	let style = field.style();
	let particles = field.particles();
	let links: usize = particles.iter().map(|p| p.connections.len()).sum();
	let mut commands = Vec::with_capacity(1 + links + particles.len());

	commands.push(DrawCommand::Clear {
		width: field.width(),
		height: field.height(),
	});

	for p in particles {
		for link in &p.connections {
			let Some(target) = particles.get(link.target) else {
				continue;
			};
			let influenced = link.pointer_influence > 0.0;
			commands.push(DrawCommand::Line {
				from: (p.x, p.y),
				to: (target.x, target.y),
				width: if influenced {
					style.line_width + link.pointer_influence * 2.0
				} else {
					style.line_width
				},
				color: style.line_color.with_alpha(link.opacity),
				blur: if influenced { style.line_glow_blur } else { 0.0 },
				glow: style.line_glow,
			});
		}
	}

	for p in particles {
		commands.push(DrawCommand::Disc {
			center: (p.x, p.y),
			radius: p.size,
			color: style.particle_color.with_alpha(p.opacity),
			blur: p.size * 2.0,
			glow: style.particle_glow,
		});
	}

	commands
}

/// Replays draw commands on the canvas.
pub fn paint(ctx: &CanvasRenderingContext2d, commands: &[DrawCommand]) {
	for command in commands {
		match command {
			DrawCommand::Clear { width, height } => {
				ctx.clear_rect(0.0, 0.0, *width, *height);
			}
			DrawCommand::Line {
				from,
				to,
				width,
				color,
				blur,
				glow,
			} => {
				ctx.save();
				ctx.set_line_width(*width);
				ctx.set_stroke_style_str(&color.to_css());
				if *blur > 0.0 {
					ctx.set_shadow_blur(*blur);
					ctx.set_shadow_color(&glow.to_css());
				}
				ctx.begin_path();
				ctx.move_to(from.0, from.1);
				ctx.line_to(to.0, to.1);
				ctx.stroke();
				ctx.restore();
			}
			DrawCommand::Disc {
				center,
				radius,
				color,
				blur,
				glow,
			} => {
				ctx.save();
				ctx.set_global_alpha(color.a);
				ctx.set_fill_style_str(&color.with_alpha(1.0).to_css());
				ctx.begin_path();
				let _ = ctx.arc(center.0, center.1, *radius, 0.0, PI * 2.0);
				ctx.fill();

				ctx.set_shadow_blur(*blur);
				ctx.set_shadow_color(&glow.to_css());
				ctx.fill();
				ctx.restore();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::particles::Particle;
	use crate::components::particle_field::theme::ParticleStyle;

	fn resting(x: f64, y: f64) -> Particle {
		Particle {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			size: 2.0,
			max_size: 4.0,
			opacity: 0.6,
			base_opacity: 0.6,
			pulse_speed: 0.0,
			connections: Vec::new(),
		}
	}

	fn ticked(pointer: Option<(f64, f64)>) -> ParticleField {
		let mut field = ParticleField::with_particles(
			ParticleStyle::default(),
			300.0,
			300.0,
			vec![resting(50.0, 50.0), resting(100.0, 50.0), resting(280.0, 280.0)],
		);
		field.set_pointer(pointer);
		field.tick(0.0);
		field
	}

	#[test]
	fn clears_then_lines_then_discs() {
		let commands = draw_list(&ticked(None));
		assert!(matches!(
			commands[0],
			DrawCommand::Clear { width, height } if width == 300.0 && height == 300.0
		));

		let first_disc = commands
			.iter()
			.position(|c| matches!(c, DrawCommand::Disc { .. }))
			.unwrap();
		let last_line = commands
			.iter()
			.rposition(|c| matches!(c, DrawCommand::Line { .. }))
			.unwrap();
		assert!(last_line < first_disc);

		// One link stored on both endpoints, one disc per particle.
		assert_eq!(commands.len(), 1 + 2 + 3);
	}

	#[test]
	fn plain_links_are_thin_without_glow() {
		let commands = draw_list(&ticked(None));
		let DrawCommand::Line { width, blur, color, .. } = &commands[1] else {
			panic!("expected a line, got {:?}", commands[1]);
		};
		assert_eq!(*width, 0.5);
		assert_eq!(*blur, 0.0);
		assert!((color.a - (70.0 / 120.0) * 0.3).abs() < 1e-9);
	}

	#[test]
	fn influenced_links_are_wider_and_glow() {
		let commands = draw_list(&ticked(Some((60.0, 60.0))));
		let DrawCommand::Line { width, blur, .. } = &commands[1] else {
			panic!("expected a line, got {:?}", commands[1]);
		};
		assert_eq!(*width, 1.5);
		assert_eq!(*blur, 3.0);
	}

	#[test]
	fn discs_glow_in_proportion_to_size() {
		let commands = draw_list(&ticked(None));
		let DrawCommand::Disc { radius, blur, color, .. } = commands.last().unwrap() else {
			panic!("expected a disc");
		};
		assert!((*blur - *radius * 2.0).abs() < 1e-9);
		assert!((color.a - 0.6).abs() < 1e-9);
	}
}
