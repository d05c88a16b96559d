#![forbid(unsafe_code)]

//! In-memory page and clock for driving the controller without a browser.
//!
//! [`SimulatedPage`] keeps one natural rect per [`Alignment`] and reports
//! the rect of the current alignment shifted by the applied transform, which
//! is exactly what a real bounding-box query returns. It also counts writes
//! so tests can assert that a code path touched nothing.

use std::time::Duration;

use reflow_core::geometry::{Offset, RectSnapshot};

use crate::host::{ElementStyle, PageScroll, PageStyles, TrackedElement, Viewport};
use crate::layout::Alignment;

/// Manually advanced monotonic clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// A page with one tracked column that moves between three positions.
#[derive(Debug, Clone)]
pub struct SimulatedPage {
    natural: [RectSnapshot; 3],
    alignment: Alignment,
    attached: bool,
    style: ElementStyle,
    style_writes: usize,
    viewport: Viewport,
    page_styles: PageStyles,
    page_style_writes: usize,
}

impl Default for SimulatedPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPage {
    /// 1280x1000 window with a 15px scrollbar and a 450x600 column at top 100.
    #[must_use]
    pub fn new() -> Self {
        let viewport = Viewport::new(1280, 1000, 1265);
        let column = |left| RectSnapshot::new(100, left, 450, 600);
        Self {
            natural: [column(50), column(407), column(765)],
            alignment: Alignment::default(),
            attached: true,
            style: ElementStyle::RESTING,
            style_writes: 0,
            viewport,
            page_styles: PageStyles::default(),
            page_style_writes: 0,
        }
    }

    /// Place the column at `rect` whenever `alignment` is active.
    #[must_use]
    pub fn with_natural(mut self, alignment: Alignment, rect: RectSnapshot) -> Self {
        self.natural[slot(alignment)] = rect;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_page_styles(mut self, styles: PageStyles) -> Self {
        self.page_styles = styles;
        self
    }

    /// Reflow the page as if the layout mode changed.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    #[must_use]
    pub const fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Remove the element; [`measure`](TrackedElement::measure) returns `None`.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Layout box of the current alignment, ignoring any transform.
    #[must_use]
    pub fn natural_rect(&self) -> RectSnapshot {
        self.natural[slot(self.alignment)]
    }

    /// Where the element is painted right now.
    #[must_use]
    pub fn drawn_rect(&self) -> Option<RectSnapshot> {
        self.measure()
    }

    #[must_use]
    pub const fn style(&self) -> &ElementStyle {
        &self.style
    }

    #[must_use]
    pub const fn style_writes(&self) -> usize {
        self.style_writes
    }

    #[must_use]
    pub fn page_styles_snapshot(&self) -> PageStyles {
        self.page_styles.clone()
    }

    #[must_use]
    pub const fn page_style_writes(&self) -> usize {
        self.page_style_writes
    }
}

const fn slot(alignment: Alignment) -> usize {
    match alignment {
        Alignment::Left => 0,
        Alignment::Center => 1,
        Alignment::Right => 2,
    }
}

impl TrackedElement for SimulatedPage {
    fn measure(&self) -> Option<RectSnapshot> {
        if !self.attached {
            return None;
        }
        let shift = self.style.transform.unwrap_or(Offset::ZERO);
        Some(self.natural_rect().translated(shift))
    }

    fn apply_style(&mut self, style: &ElementStyle) {
        self.style = *style;
        self.style_writes += 1;
    }
}

impl PageScroll for SimulatedPage {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn page_styles(&self) -> PageStyles {
        self.page_styles.clone()
    }

    fn set_page_styles(&mut self, styles: &PageStyles) {
        self.page_styles = styles.clone();
        self.page_style_writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_advances_and_sets() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }

    #[test]
    fn measure_follows_alignment_and_transform() {
        let mut page = SimulatedPage::new();
        assert_eq!(page.measure().map(|r| r.left), Some(765));

        page.set_alignment(Alignment::Left);
        page.apply_style(&ElementStyle {
            transform: Some(Offset::new(715, -10)),
            ..ElementStyle::RESTING
        });
        assert_eq!(page.measure(), Some(RectSnapshot::new(90, 765, 450, 600)));
        assert_eq!(page.style_writes(), 1);
    }

    #[test]
    fn detached_element_measures_none() {
        let mut page = SimulatedPage::new();
        page.detach();
        assert_eq!(page.measure(), None);
        page.attach();
        assert!(page.measure().is_some());
    }
}
