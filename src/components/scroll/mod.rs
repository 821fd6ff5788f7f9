//! Scroll-driven section progress.
//!
//! Turns wheel, touch, keyboard and scrollbar input into per-section progress:
//! - Animated sections advance a progress value in `[0, 1]` and hand it to a sink
//! - Plain sections flip once enough delta has accumulated
//! - Saturated progress moves to the neighboring section
//! - A settle delay locks input while a transition plays out
//!
//! Narrow viewports keep native scrolling and derive progress from the
//! scroll position instead.
//!
//! # Example
//!
//! ```ignore
//! use portfolio_motion::ScrollStage;
//!
//! view! { <ScrollStage /> }
//! ```

mod component;
pub mod controller;
pub mod dom;
pub mod input;
pub mod presentation;
pub mod sections;

pub use component::ScrollStage;
pub use controller::{
	Direction, Outcome, Phase, ScrollConfig, ScrollController, ScrollState, SectionGeometry,
	SectionHost,
};
pub use dom::DomHost;
pub use input::{DragTracker, NavKey, Profile, TouchTracker};
pub use presentation::portfolio_sinks;
pub use sections::{ProgressSink, ProgressSinks, Section, default_sections};
