#![forbid(unsafe_code)]

//! Core: easing, progress tweens, and viewport geometry.
//!
//! # Role in reflow
//! `reflow-core` holds the host-independent pieces of the layout transition
//! engine. Nothing here knows about elements, timers, or pages; the
//! controller in `reflow-shell` composes these primitives with a host.
//!
//! # Primary responsibilities
//! - **Animation**: easing functions and the [`Tween`](animation::Tween)
//!   progress primitive used by every continuous transition phase.
//! - **Geometry**: integer pixel rects, offsets, and the viewport clipper
//!   that keeps overlay drawing inside the safe on-screen band.
//! - **Logging**: a tracing facade that compiles to nothing without the
//!   `tracing` feature.

pub mod animation;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};
