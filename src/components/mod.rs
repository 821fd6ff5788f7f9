//! Leptos components: the particle background and the scroll stage.

pub mod particle_field;
pub mod scroll;
