#![forbid(unsafe_code)]

//! Shell: the layout transition controller and its host seams.
//!
//! # Role in reflow
//! `reflow-shell` animates one page element between layout modes with a
//! "design tool" choreography: a selection frame draws around the element,
//! a cursor hops to its center, the element is dragged to its new spot, and
//! the overlay fades away. The crate is headless. A host supplies the clock,
//! the element, and the page through [`TrackedElement`] and [`PageScroll`],
//! and draws the [`OverlayScene`] the controller derives each frame.
//!
//! # Primary responsibilities
//! - **Layout**: [`LayoutContext`] owns the alignment and its change counter.
//! - **Measurement**: [`RectTracker`] keeps the baseline rect and measures
//!   the new layout box with transforms neutralized.
//! - **Scheduling**: [`PhaseScheduler`] owns every timer and frame run, so a
//!   superseding change can cancel all of them at once.
//! - **Overlay**: [`OverlayState`] and the derived [`OverlayScene`].
//! - **Scroll lock**: [`ScrollLock`] freezes page scrolling without layout shift.
//! - **Simulation**: [`SimulatedPage`] and [`DeterministicClock`] for tests
//!   and headless hosts.

pub mod config;
pub mod controller;
pub mod host;
pub mod layout;
pub mod overlay;
pub mod rect_tracker;
pub mod scheduler;
pub mod scroll_lock;
pub mod sim;

pub use config::{ConfigError, PhaseOffsets, PhaseTimings, TransitionConfig};
pub use controller::{ChangeOutcome, SkipReason, TransitionController};
pub use host::{ElementStyle, PageScroll, PageStyles, ShellHost, TrackedElement, Viewport};
pub use layout::{
    Alignment, LayoutContext, LayoutStore, LayoutStoreError, MemoryLayoutStore,
    ParseAlignmentError,
};
pub use overlay::{MovementDirection, OverlayMetrics, OverlayScene, OverlayState};
pub use rect_tracker::{RectCapture, RectTracker};
pub use scheduler::{Phase, PhaseEvent, PhaseScheduler, ProgressChannel};
pub use scroll_lock::ScrollLock;
pub use sim::{DeterministicClock, SimulatedPage};

pub use reflow_core::geometry::{PixelRect, Point, RectSnapshot, ViewportClip};
