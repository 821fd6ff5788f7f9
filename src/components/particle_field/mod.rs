//! Interactive particle background.
//!
//! Renders a field of drifting particles on an HTML canvas with:
//! - Edge reflection inside the canvas bounds
//! - Pointer repulsion with grow/brighten feedback
//! - Proximity links that light up near the pointer
//! - A wall-clock opacity pulse per particle
//!
//! # Example
//!
//! ```ignore
//! use portfolio_motion::ParticleCanvas;
//!
//! view! { <ParticleCanvas /> }
//! ```

mod component;
pub mod particles;
pub mod render;
pub mod theme;

pub use component::{FrameLoop, FrameSlot, ParticleCanvas};
pub use particles::{Connection, Particle, ParticleField};
pub use render::DrawCommand;
pub use theme::{Color, ParticleStyle};
