#![forbid(unsafe_code)]

//! Transition configuration: phase timings and overlay geometry.
//!
//! Everything the controller treats as a constant lives here so embedders
//! can retune the choreography without touching the state machine. The
//! defaults reproduce the stock selection-and-drag sequence.

use std::fmt;
use std::time::Duration;

/// Durations of each timed phase.
///
/// Phases are laid out back to back from a single start instant; see
/// [`PhaseTimings::offsets`] for the resulting schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhaseTimings {
    /// Delay before the selection frame starts drawing.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub rail_prep: Duration,
    /// Overlay fade-in, starting at the transition instant.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub enter: Duration,
    /// Selection frame draw.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub select: Duration,
    /// Cursor hop from the frame corner to its center.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub center: Duration,
    /// Pause with the cursor centred.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub center_hold: Duration,
    /// Second pause right before the drag.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub pre_move_hold: Duration,
    /// The drag itself (eased).
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub drag: Duration,
    /// Overlay fade-out after the drag.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub settle: Duration,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            rail_prep: Duration::from_millis(300),
            enter: Duration::from_millis(280),
            select: Duration::from_millis(700),
            center: Duration::from_millis(320),
            center_hold: Duration::from_millis(250),
            pre_move_hold: Duration::from_millis(160),
            drag: Duration::from_millis(900),
            settle: Duration::from_millis(280),
        }
    }
}

/// Cumulative start offsets of each phase, relative to the transition instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseOffsets {
    pub enter: Duration,
    pub select: Duration,
    pub center: Duration,
    pub hold: Duration,
    pub drag: Duration,
    pub settle: Duration,
    pub cleanup: Duration,
}

impl PhaseTimings {
    /// Start offset of every phase.
    #[must_use]
    pub fn offsets(&self) -> PhaseOffsets {
        let select = self.rail_prep;
        let center = select + self.select;
        let hold = center + self.center;
        let drag = hold + self.center_hold + self.pre_move_hold;
        let settle = drag + self.drag;
        PhaseOffsets {
            enter: Duration::ZERO,
            select,
            center,
            hold,
            drag,
            settle,
            cleanup: settle + self.settle,
        }
    }

    /// Time from the transition instant to cleanup.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.offsets().cleanup
    }
}

/// Full controller configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransitionConfig {
    pub timings: PhaseTimings,
    /// Keep-out band at the top and bottom of the viewport.
    pub viewport_inset_px: i32,
    /// Gap between the content and the selection frame.
    pub frame_padding_px: i32,
    /// Edge length of the square corner handles.
    pub handle_size_px: i32,
    /// Horizontal dead zone for the destination guide.
    pub direction_threshold_px: f32,
    /// Displacements at or below this, on both axes, skip the animation.
    pub noop_threshold_px: f32,
    /// Selection progress above which all four handles are shown.
    pub all_handles_threshold: f32,
    /// Stacking order of the element while it is being dragged.
    pub element_z_index: i32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            timings: PhaseTimings::default(),
            viewport_inset_px: 48,
            frame_padding_px: 14,
            handle_size_px: 12,
            direction_threshold_px: 2.0,
            noop_threshold_px: 0.5,
            all_handles_threshold: 0.85,
            element_z_index: 1150,
        }
    }
}

impl TransitionConfig {
    #[must_use]
    pub fn with_timings(mut self, timings: PhaseTimings) -> Self {
        self.timings = timings;
        self
    }

    #[must_use]
    pub fn with_viewport_inset(mut self, px: i32) -> Self {
        self.viewport_inset_px = px;
        self
    }

    #[must_use]
    pub fn with_frame_padding(mut self, px: i32) -> Self {
        self.frame_padding_px = px;
        self
    }

    #[must_use]
    pub fn with_handle_size(mut self, px: i32) -> Self {
        self.handle_size_px = px;
        self
    }

    #[must_use]
    pub fn with_direction_threshold(mut self, px: f32) -> Self {
        self.direction_threshold_px = px;
        self
    }

    #[must_use]
    pub fn with_noop_threshold(mut self, px: f32) -> Self {
        self.noop_threshold_px = px;
        self
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        let t = &self.timings;

        for (field, value) in [
            ("timings.enter", t.enter),
            ("timings.select", t.select),
            ("timings.center", t.center),
            ("timings.drag", t.drag),
            ("timings.settle", t.settle),
        ] {
            if value.is_zero() {
                errors.push(ConfigError::new(field, "0ms", "progress phases need a duration"));
            }
        }
        if t.enter > t.rail_prep + t.select {
            errors.push(ConfigError::new(
                "timings.enter",
                format!("{}ms", t.enter.as_millis()),
                "fade-in must finish before the selection frame is drawn",
            ));
        }

        for (field, value) in [
            ("viewport_inset_px", self.viewport_inset_px),
            ("frame_padding_px", self.frame_padding_px),
            ("handle_size_px", self.handle_size_px),
        ] {
            if value < 0 {
                errors.push(ConfigError::new(field, value.to_string(), "must be >= 0"));
            }
        }

        for (field, value) in [
            ("direction_threshold_px", self.direction_threshold_px),
            ("noop_threshold_px", self.noop_threshold_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError::new(
                    field,
                    value.to_string(),
                    "must be finite and >= 0",
                ));
            }
        }

        let h = self.all_handles_threshold;
        if !(h > 0.0 && h <= 1.0) {
            errors.push(ConfigError::new(
                "all_handles_threshold",
                h.to_string(),
                "must be in (0, 1]",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(feature = "serde")]
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
