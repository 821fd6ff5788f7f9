//! Interactive particle field simulation.
//!
//! A fixed set of particles drifts inside the canvas, bounces off its edges,
//! flees the pointer, and links up with neighbors closer than the connection
//! distance. Nothing here touches the DOM; the host feeds pointer positions,
//! bounds and wall-clock time in, and reads particles back out for drawing.

use super::theme::ParticleStyle;

/// A link from one particle to a neighbor, rebuilt every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	/// Index of the neighbor in [`ParticleField::particles`].
	pub target: usize,
	/// Distance between the two endpoints.
	pub distance: f64,
	/// Stroke opacity in `[0, 1]`.
	pub opacity: f64,
	/// Non-zero when the pointer is near either endpoint.
	pub pointer_influence: f64,
}

/// A single particle.
#[derive(Clone, Debug)]
pub struct Particle {
	/// Horizontal position in canvas pixels.
	pub x: f64,
	/// Vertical position in canvas pixels.
	pub y: f64,
	/// Horizontal velocity per tick.
	pub vx: f64,
	/// Vertical velocity per tick.
	pub vy: f64,
	/// Current radius.
	pub size: f64,
	/// Radius the particle grows to near the pointer.
	pub max_size: f64,
	/// Current opacity in `[0, 1]`.
	pub opacity: f64,
	/// Opacity the particle relaxes back to when left alone.
	pub base_opacity: f64,
	/// Angular speed of the opacity pulse, in radians per millisecond.
	pub pulse_speed: f64,
	/// Links to neighbors from the last tick.
	pub connections: Vec<Connection>,
}

/// Owns every particle plus the bounds and pointer they react to.
pub struct ParticleField {
	particles: Vec<Particle>,
	style: ParticleStyle,
	width: f64,
	height: f64,
	pointer: Option<(f64, f64)>,
}

impl ParticleField {
	/// Seeds `style.count` particles over a `width × height` domain.
	///
	/// The same `seed` always produces the same field.
	pub fn new(style: ParticleStyle, width: f64, height: f64, seed: f64) -> Self {
		let mut particles = Vec::with_capacity(style.count);

		for i in 0..style.count {
			let base = seed + i as f64 + 1.0;
			let sample = |k: f64, (lo, hi): (f64, f64)| lo + Self::pseudo_random(base * k) * (hi - lo);
			let half_speed = style.speed / 2.0;

			let max_size = sample(6.1, style.max_size_range);
			let opacity = sample(7.3, style.opacity_range);

			particles.push(Particle {
				x: Self::pseudo_random(base * 1.1) * width,
				y: Self::pseudo_random(base * 2.3) * height,
				vx: sample(3.7, (-half_speed, half_speed)),
				vy: sample(4.1, (-half_speed, half_speed)),
				size: sample(5.3, style.size_range).min(max_size),
				max_size,
				opacity,
				base_opacity: sample(8.9, style.opacity_range),
				pulse_speed: sample(9.7, style.pulse_speed_range),
				connections: Vec::new(),
			});
		}

		Self::with_particles(style, width, height, particles)
	}

	/// Builds a field from explicit particles.
	pub fn with_particles(
		style: ParticleStyle,
		width: f64,
		height: f64,
		particles: Vec<Particle>,
	) -> Self {
		Self {
			particles,
			style,
			width,
			height,
			pointer: None,
		}
	}

	/// Simple pseudo-random function (deterministic)
	fn pseudo_random(seed: f64) -> f64 {
		let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
		x - x.floor()
	}

	/// All particles, in seeding order.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Tunables the field was built with.
	pub fn style(&self) -> &ParticleStyle {
		&self.style
	}

	/// Domain width.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Domain height.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// Last pointer position, if the pointer is over the canvas.
	pub fn pointer(&self) -> Option<(f64, f64)> {
		self.pointer
	}

	/// Sets the pointer position in canvas coordinates, or `None` once it leaves.
	pub fn set_pointer(&mut self, pointer: Option<(f64, f64)>) {
		self.pointer = pointer;
	}

	/// Replaces the domain bounds. Particles keep their positions; the next
	/// tick clamps them into the new bounds.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width.max(0.0);
		self.height = height.max(0.0);
	}

	/// Advances the simulation by one frame.
	///
	/// `now_ms` is wall-clock time in milliseconds and drives the opacity pulse,
	/// so the pulse keeps pace with real time regardless of frame rate.
	pub fn tick(&mut self, now_ms: f64) {
		let style = &self.style;
		let (width, height, pointer) = (self.width, self.height, self.pointer);

		for p in &mut self.particles {
			p.x += p.vx;
			p.y += p.vy;

			if p.x < 0.0 {
				p.vx = p.vx.abs();
			} else if p.x > width {
				p.vx = -p.vx.abs();
			}
			if p.y < 0.0 {
				p.vy = p.vy.abs();
			} else if p.y > height {
				p.vy = -p.vy.abs();
			}
			p.x = p.x.clamp(0.0, width);
			p.y = p.y.clamp(0.0, height);

			let repel = pointer.and_then(|(mx, my)| {
				let (dx, dy) = (mx - p.x, my - p.y);
				let distance = (dx * dx + dy * dy).sqrt();
				(distance < style.hover_radius).then_some((dx, dy, distance))
			});

			match repel {
				Some((dx, dy, distance)) => {
					// A pointer sitting exactly on the particle has no direction to push along.
					if distance > 0.0 {
						let force = (style.hover_radius - distance) / style.hover_radius;
						p.vx -= dx / distance * force * style.repulsion_gain;
						p.vy -= dy / distance * force * style.repulsion_gain;
					}
					p.size = (p.size + style.grow_rate).min(p.max_size);
					p.opacity = (p.opacity + style.brighten_rate).min(1.0);
				}
				None => {
					p.size = (p.size - style.shrink_rate).max(style.min_size);
					p.opacity = (p.opacity - style.fade_rate).max(p.base_opacity);
				}
			}

			p.opacity += (now_ms * p.pulse_speed).sin() * style.pulse_amplitude;
			p.opacity = p.opacity.clamp(style.min_opacity, 1.0);
		}

		self.update_connections();
	}

	/// Rebuilds every particle's connection list from scratch.
	///
	/// Plain O(n²) pass; the particle count is small and fixed.
	fn update_connections(&mut self) {
		let style = &self.style;
		let near_pointer = |x: f64, y: f64| {
			self.pointer.is_some_and(|(mx, my)| {
				let (dx, dy) = (mx - x, my - y);
				(dx * dx + dy * dy).sqrt() < style.pointer_link_radius
			})
		};

		let mut links = Vec::new();
		for i in 0..self.particles.len() {
			let a = &self.particles[i];
			for j in (i + 1)..self.particles.len() {
				let b = &self.particles[j];
				let (dx, dy) = (a.x - b.x, a.y - b.y);
				let distance = (dx * dx + dy * dy).sqrt();
				if distance >= style.connection_distance {
					continue;
				}

				let pointer_influence = if near_pointer(a.x, a.y) || near_pointer(b.x, b.y) {
					style.pointer_influence
				} else {
					0.0
				};
				let opacity = ((style.connection_distance - distance) / style.connection_distance
					* style.link_opacity
					+ pointer_influence)
					.min(1.0);

				links.push((i, j, distance, opacity, pointer_influence));
			}
		}

		for p in &mut self.particles {
			p.connections.clear();
		}
		for (i, j, distance, opacity, pointer_influence) in links {
			self.particles[i].connections.push(Connection {
				target: j,
				distance,
				opacity,
				pointer_influence,
			});
			self.particles[j].connections.push(Connection {
				target: i,
				distance,
				opacity,
				pointer_influence,
			});
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn particle(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
		Particle {
			x,
			y,
			vx,
			vy,
			size: 2.0,
			max_size: 4.0,
			opacity: 0.5,
			base_opacity: 0.5,
			pulse_speed: 0.0,
			connections: Vec::new(),
		}
	}

	fn field(particles: Vec<Particle>) -> ParticleField {
		ParticleField::with_particles(ParticleStyle::default(), 400.0, 300.0, particles)
	}

	#[test]
	fn seeds_fixed_count_within_bounds() {
		let field = ParticleField::new(ParticleStyle::default(), 800.0, 600.0, 42.0);
		assert_eq!(field.particles().len(), 80);
		for p in field.particles() {
			assert!((0.0..=800.0).contains(&p.x));
			assert!((0.0..=600.0).contains(&p.y));
			assert!(p.vx.abs() <= 0.15 && p.vy.abs() <= 0.15);
			assert!(p.size >= 1.0 && p.size <= p.max_size);
			assert!((2.0..5.0).contains(&p.max_size));
			assert!((0.3..0.8).contains(&p.opacity));
			assert!((0.01..0.03).contains(&p.pulse_speed));
		}
	}

	#[test]
	fn seeding_is_deterministic() {
		let a = ParticleField::new(ParticleStyle::default(), 800.0, 600.0, 7.0);
		let b = ParticleField::new(ParticleStyle::default(), 800.0, 600.0, 7.0);
		for (pa, pb) in a.particles().iter().zip(b.particles()) {
			assert_eq!((pa.x, pa.y, pa.vx, pa.vy), (pb.x, pb.y, pb.vx, pb.vy));
		}
	}

	#[test]
	fn invariants_hold_over_many_ticks() {
		let mut field = ParticleField::new(ParticleStyle::default(), 500.0, 400.0, 3.0);
		for frame in 0..2000 {
			let pointer = match frame % 300 {
				0..100 => Some((250.0, 200.0)),
				100..200 => Some(((frame % 500) as f64, (frame % 400) as f64)),
				_ => None,
			};
			field.set_pointer(pointer);
			field.tick(frame as f64 * 16.7);
			for p in field.particles() {
				assert!(p.size >= 1.0 && p.size <= p.max_size, "size {}", p.size);
				assert!((0.1..=1.0).contains(&p.opacity), "opacity {}", p.opacity);
				assert!((0.0..=500.0).contains(&p.x));
				assert!((0.0..=400.0).contains(&p.y));
			}
		}
		assert_eq!(field.particles().len(), 80);
	}

	#[test]
	fn reflects_on_the_tick_it_crosses() {
		let mut field = field(vec![particle(399.8, 150.0, 0.5, 0.0), particle(0.1, 0.2, -0.3, -0.4)]);
		field.tick(0.0);

		let right = &field.particles()[0];
		assert!(right.vx < 0.0);
		assert_eq!(right.x, 400.0);

		let corner = &field.particles()[1];
		assert!(corner.vx > 0.0 && corner.vy > 0.0);
		assert_eq!((corner.x, corner.y), (0.0, 0.0));
	}

	#[test]
	fn connections_are_symmetric() {
		let mut field = field(vec![
			particle(100.0, 100.0, 0.0, 0.0),
			particle(160.0, 100.0, 0.0, 0.0),
			particle(350.0, 250.0, 0.0, 0.0),
		]);
		field.tick(0.0);

		let ps = field.particles();
		assert_eq!(ps[0].connections.len(), 1);
		assert_eq!(ps[1].connections.len(), 1);
		assert!(ps[2].connections.is_empty());

		let (ab, ba) = (&ps[0].connections[0], &ps[1].connections[0]);
		assert_eq!((ab.target, ba.target), (1, 0));
		assert_eq!(ab.distance, ba.distance);
		assert!((ab.distance - 60.0).abs() < 1e-9);
		assert!((ab.opacity - 0.15).abs() < 1e-9);
		assert_eq!(ab.pointer_influence, 0.0);
	}

	#[test]
	fn connections_are_rebuilt_every_tick() {
		let mut field = field(vec![particle(100.0, 100.0, 0.0, 0.0), particle(150.0, 100.0, 0.0, 0.0)]);
		field.tick(0.0);
		field.tick(16.0);
		assert_eq!(field.particles()[0].connections.len(), 1);

		field.particles[1].x = 390.0;
		field.tick(32.0);
		assert!(field.particles()[0].connections.is_empty());
	}

	#[test]
	fn pointer_near_endpoint_boosts_link() {
		let mut field = field(vec![particle(100.0, 100.0, 0.0, 0.0), particle(200.0, 100.0, 0.0, 0.0)]);
		field.set_pointer(Some((100.0, 170.0)));
		field.tick(0.0);

		let link = &field.particles()[0].connections[0];
		assert_eq!(link.pointer_influence, 0.5);
		assert!(link.opacity > 0.5 && link.opacity <= 1.0);
	}

	#[test]
	fn pointer_repels_and_highlights() {
		let mut field = field(vec![particle(200.0, 150.0, 0.0, 0.0)]);
		field.set_pointer(Some((150.0, 150.0)));
		field.tick(0.0);

		let p = &field.particles()[0];
		assert!((p.vx - 0.01).abs() < 1e-9, "vx {}", p.vx);
		assert_eq!(p.vy, 0.0);
		assert!((p.size - 2.15).abs() < 1e-9);
		assert!((p.opacity - 0.53).abs() < 1e-9);
	}

	#[test]
	fn pointer_on_top_of_particle_does_not_produce_nan() {
		let mut field = field(vec![particle(200.0, 150.0, 0.0, 0.0)]);
		field.set_pointer(Some((200.0, 150.0)));
		field.tick(0.0);
		let p = &field.particles()[0];
		assert!(p.vx.is_finite() && p.vy.is_finite());
	}

	#[test]
	fn absent_pointer_relaxes_toward_rest() {
		let mut p = particle(200.0, 150.0, 0.0, 0.0);
		p.size = 3.0;
		p.opacity = 0.9;
		p.base_opacity = 0.4;
		let mut field = field(vec![p]);
		field.tick(0.0);

		let p = &field.particles()[0];
		assert!((p.size - 2.95).abs() < 1e-9);
		assert!((p.opacity - 0.89).abs() < 1e-9);

		for t in 0..200 {
			field.tick(t as f64);
		}
		let p = &field.particles()[0];
		assert_eq!(p.size, 1.0);
		assert_eq!(p.opacity, 0.4);
	}

	#[test]
	fn pulse_follows_wall_clock() {
		let mut p = particle(200.0, 150.0, 0.0, 0.0);
		p.pulse_speed = 0.02;
		let mut a = field(vec![p.clone()]);
		let mut b = field(vec![p]);

		// sin(0) contributes nothing; sin(π/2) adds the full amplitude.
		a.tick(0.0);
		b.tick(std::f64::consts::FRAC_PI_2 / 0.02);
		assert!((a.particles()[0].opacity - 0.5).abs() < 1e-9);
		assert!((b.particles()[0].opacity - 0.55).abs() < 1e-9);
	}

	#[test]
	fn resize_keeps_positions_until_next_tick() {
		let mut field = field(vec![particle(380.0, 280.0, 0.0, 0.0)]);
		field.resize(200.0, 100.0);
		assert_eq!((field.particles()[0].x, field.particles()[0].y), (380.0, 280.0));

		field.tick(0.0);
		assert_eq!((field.particles()[0].x, field.particles()[0].y), (200.0, 100.0));
	}
}
