#![forbid(unsafe_code)]

//! Before/after measurement of the tracked element.

use reflow_core::geometry::{Offset, RectSnapshot};

use crate::host::{ElementStyle, TrackedElement};

/// Both ends of one layout change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectCapture {
    /// Where the element rests in the new layout (identity transform).
    pub target: RectSnapshot,
    /// Where the transition starts from.
    pub from: RectSnapshot,
    /// `from` is the painted position of an interrupted transition.
    pub interrupted: bool,
}

/// Holds the baseline ("previous") rect between layout changes, and the
/// layout box an active transition is heading to.
#[derive(Debug, Default)]
pub struct RectTracker {
    baseline: Option<RectSnapshot>,
    heading_to: Option<RectSnapshot>,
}

impl RectTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            baseline: None,
            heading_to: None,
        }
    }

    #[must_use]
    pub const fn baseline(&self) -> Option<RectSnapshot> {
        self.baseline
    }

    /// Layout box of the transition in progress, if any.
    #[must_use]
    pub const fn heading_to(&self) -> Option<RectSnapshot> {
        self.heading_to
    }

    /// Record a settled position.
    pub fn set_baseline(&mut self, rect: RectSnapshot) {
        self.baseline = Some(rect);
        self.heading_to = None;
    }

    /// Record that a transition toward `target` has started.
    pub fn head_to(&mut self, target: RectSnapshot) {
        self.heading_to = Some(target);
    }

    /// Re-measure the element as it is drawn now and store that as baseline.
    ///
    /// Leaves the baseline untouched if the element is absent.
    pub fn rebaseline<E: TrackedElement + ?Sized>(&mut self, element: &E) -> Option<RectSnapshot> {
        let rect = element.measure()?;
        self.set_baseline(rect);
        Some(rect)
    }

    /// Neutralize the element's transform and measure its new layout box.
    ///
    /// Leaves [`ElementStyle::MEASURING`] applied. `in_flight` is the
    /// transform still applied by an active transition. The page has already
    /// reflowed, so the painted position is the old layout box shifted by
    /// that transform, which is where the next transition starts. That rect
    /// is derived from [`heading_to`](Self::heading_to), not measured.
    pub fn capture<E: TrackedElement + ?Sized>(
        &self,
        element: &mut E,
        in_flight: Option<Offset>,
    ) -> Option<RectCapture> {
        element.apply_style(&ElementStyle::MEASURING);
        let target = element.measure()?;

        let painted = in_flight
            .zip(self.heading_to)
            .map(|(offset, dest)| dest.translated(offset));
        let from = painted.or(self.baseline).unwrap_or(target);
        Some(RectCapture {
            target,
            from,
            interrupted: painted.is_some(),
        })
    }
}
