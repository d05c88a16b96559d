#![forbid(unsafe_code)]

//! The layout transition controller.
//!
//! [`TransitionController`] turns a layout-mode change into the
//! select → center → drag choreography. It is host-driven:
//!
//! 1. Feed layout changes via [`sync`](TransitionController::sync) (or
//!    [`on_layout_change`](TransitionController::on_layout_change)).
//! 2. Advance time via [`tick`](TransitionController::tick), once per
//!    display frame while [`wants_frame`](TransitionController::wants_frame)
//!    is true, and at least by [`next_deadline`](TransitionController::next_deadline).
//! 3. Draw [`scene`](TransitionController::scene) on top of the page.
//! 4. Call [`teardown`](TransitionController::teardown) before dropping.
//!
//! # Invariants
//!
//! 1. At most one [`OverlayState`] exists; a new change cancels every timer
//!    and frame run of the previous transition before scheduling its own.
//! 2. The scroll lock is held iff a transition is active.
//! 3. During the drag, the element transform and `move_progress` are
//!    written in the same step, so the frame and the content never disagree.
//! 4. Cleanup, early exit, supersession, and teardown all leave the element
//!    with [`ElementStyle::RESTING`].
//!
//! # Example
//!
//! ```ignore
//! use reflow_shell::{Alignment, LayoutContext, TransitionController};
//!
//! let mut layout = LayoutContext::new();
//! let mut controller = TransitionController::new();
//! controller.mount(&page);
//! controller.sync(&layout, clock.now(), &mut page);
//!
//! layout.set_alignment(Alignment::Left);
//! controller.sync(&layout, clock.now(), &mut page);
//! while controller.is_transitioning() {
//!     clock.advance(FRAME);
//!     controller.tick(clock.now(), &mut page);
//!     if let Some(scene) = controller.scene() { draw(&scene); }
//! }
//! ```

use std::time::Duration;

use reflow_core::animation::Easing;
use reflow_core::geometry::{Offset, RectSnapshot, clip_to_viewport};

use crate::config::{ConfigError, TransitionConfig};
use crate::host::{ElementStyle, ShellHost};
use crate::layout::LayoutContext;
use crate::overlay::{OverlayMetrics, OverlayScene, OverlayState};
use crate::rect_tracker::RectTracker;
use crate::scheduler::{Phase, PhaseEvent, PhaseScheduler, ProgressChannel};
use crate::scroll_lock::ScrollLock;

/// Why a layout change settled instantly instead of animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ReducedMotion,
    Unmoved,
    OffScreen,
}

/// Result of processing one layout change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Nothing was done: torn down, never changed, or element absent.
    Ignored,
    /// Baseline re-established without animating (initial layout or passthrough).
    Rebaselined,
    /// Element settled at its new position immediately.
    Skipped(SkipReason),
    /// A transition was armed under this epoch.
    Animating { epoch: u64 },
}

/// Drives the selection-and-drag transition for one tracked element.
#[derive(Debug)]
pub struct TransitionController {
    config: TransitionConfig,
    metrics: OverlayMetrics,
    tracker: RectTracker,
    scheduler: PhaseScheduler,
    scroll_lock: ScrollLock,
    overlay: Option<OverlayState>,
    phase: Phase,
    applied: ElementStyle,
    drag_offset: Offset,
    epoch: u64,
    reduced_motion: bool,
    animation_disabled: bool,
    seen_change: Option<u64>,
    torn_down: bool,
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionController {
    /// Controller with the default choreography.
    #[must_use]
    pub fn new() -> Self {
        Self::with_valid_config(TransitionConfig::default())
    }

    /// Controller with a custom configuration, rejected if invalid.
    pub fn try_new(config: TransitionConfig) -> Result<Self, Vec<ConfigError>> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: TransitionConfig) -> Self {
        Self {
            metrics: OverlayMetrics::from(&config),
            config,
            tracker: RectTracker::new(),
            scheduler: PhaseScheduler::new(),
            scroll_lock: ScrollLock::new(),
            overlay: None,
            phase: Phase::Idle,
            applied: ElementStyle::RESTING,
            drag_offset: Offset::ZERO,
            epoch: 0,
            reduced_motion: false,
            animation_disabled: false,
            seen_change: None,
            torn_down: false,
        }
    }

    /// Capture the initial baseline rect.
    pub fn mount<H: ShellHost + ?Sized>(&mut self, host: &H) {
        if self.tracker.rebaseline(host).is_none() {
            reflow_core::debug!("tracked element absent at mount");
        }
    }

    /// React to the layout context if its change counter moved.
    ///
    /// Only [`LayoutContext::change_id`] is compared; the alignment value
    /// itself never triggers or suppresses a transition.
    pub fn sync<H: ShellHost + ?Sized>(
        &mut self,
        layout: &LayoutContext,
        now: Duration,
        host: &mut H,
    ) -> ChangeOutcome {
        let change_id = layout.change_id();
        if self.seen_change == Some(change_id) {
            return ChangeOutcome::Ignored;
        }
        self.on_layout_change(change_id, now, host)
    }

    /// React to layout change number `change_id` (0 = initial layout).
    pub fn on_layout_change<H: ShellHost + ?Sized>(
        &mut self,
        change_id: u64,
        now: Duration,
        host: &mut H,
    ) -> ChangeOutcome {
        self.seen_change = Some(change_id);
        self.run_layout_effect(now, host)
    }

    /// Update the reduced-motion preference; a change re-evaluates the layout.
    pub fn set_reduced_motion<H: ShellHost + ?Sized>(
        &mut self,
        reduced: bool,
        now: Duration,
        host: &mut H,
    ) -> ChangeOutcome {
        if self.reduced_motion == reduced {
            return ChangeOutcome::Ignored;
        }
        self.reduced_motion = reduced;
        self.run_layout_effect(now, host)
    }

    /// Switch passthrough mode on or off; a change re-evaluates the layout.
    pub fn set_animation_disabled<H: ShellHost + ?Sized>(
        &mut self,
        disabled: bool,
        now: Duration,
        host: &mut H,
    ) -> ChangeOutcome {
        if self.animation_disabled == disabled {
            return ChangeOutcome::Ignored;
        }
        self.animation_disabled = disabled;
        self.run_layout_effect(now, host)
    }

    fn run_layout_effect<H: ShellHost + ?Sized>(
        &mut self,
        now: Duration,
        host: &mut H,
    ) -> ChangeOutcome {
        if self.torn_down {
            return ChangeOutcome::Ignored;
        }
        let Some(change_id) = self.seen_change else {
            return ChangeOutcome::Ignored;
        };
        if host.measure().is_none() {
            reflow_core::trace!(change_id, "tracked element absent; skipping");
            return ChangeOutcome::Ignored;
        }

        if self.animation_disabled {
            self.settle_now(host);
            self.tracker.rebaseline(host);
            return ChangeOutcome::Rebaselined;
        }
        if change_id == 0 {
            self.tracker.rebaseline(host);
            return ChangeOutcome::Rebaselined;
        }

        self.cancel_pending();
        self.scroll_lock.unlock(host);

        let in_flight = if self.phase.is_active() {
            self.applied.transform
        } else {
            None
        };
        let capture = self.tracker.capture(host, in_flight);
        self.applied = ElementStyle::MEASURING;
        let Some(capture) = capture else {
            self.settle_now(host);
            return ChangeOutcome::Ignored;
        };

        let viewport = host.viewport();
        let inset = self.config.viewport_inset_px;
        let from = clip_to_viewport(capture.from, viewport.inner_height, inset);
        let to = clip_to_viewport(capture.target, viewport.inner_height, inset);

        let delta = capture.from.offset_from(&capture.target);
        let noop = self.config.noop_threshold_px;
        let moved = delta.x.unsigned_abs() as f32 > noop || delta.y.unsigned_abs() as f32 > noop;

        let skip = if self.reduced_motion {
            Some(SkipReason::ReducedMotion)
        } else if !moved {
            Some(SkipReason::Unmoved)
        } else if from.rect.height <= 0 || to.rect.height <= 0 {
            Some(SkipReason::OffScreen)
        } else {
            None
        };
        if let Some(reason) = skip {
            reflow_core::debug!(change_id, ?reason, "layout change settled without animation");
            self.settle_now(host);
            self.tracker.set_baseline(capture.target);
            return ChangeOutcome::Skipped(reason);
        }

        self.scroll_lock.lock(host);
        self.write_style(
            host,
            ElementStyle::dragged(delta, from.clip.max(to.clip), self.config.element_z_index),
        );
        self.overlay = Some(OverlayState::new(from.rect, to.rect));
        self.tracker.head_to(capture.target);
        self.drag_offset = delta;
        self.phase = Phase::Armed;
        self.epoch += 1;
        self.scheduler.plan(self.epoch, now, &self.config.timings);

        reflow_core::debug!(
            change_id,
            epoch = self.epoch,
            dx = delta.x,
            dy = delta.y,
            interrupted = capture.interrupted,
            "transition armed"
        );
        ChangeOutcome::Animating { epoch: self.epoch }
    }

    /// Advance to host time `now`, firing due phase boundaries and one frame.
    pub fn tick<H: ShellHost + ?Sized>(&mut self, now: Duration, host: &mut H) {
        if self.torn_down {
            return;
        }
        while let Some((due, event)) = self.scheduler.pop_due(now) {
            // Bring running phases up to the boundary before the next one starts.
            self.step_frames(due, host);
            self.fire(event, due, host);
        }
        self.step_frames(now, host);
    }

    fn step_frames<H: ShellHost + ?Sized>(&mut self, now: Duration, host: &mut H) {
        let overlay = &mut self.overlay;
        let applied = &mut self.applied;
        let offset = self.drag_offset;
        self.scheduler.step_runs(now, |channel, progress| {
            let Some(state) = overlay.as_mut() else {
                return;
            };
            match channel {
                ProgressChannel::Enter => state.enter_progress = progress,
                ProgressChannel::Select => state.select_progress = progress,
                ProgressChannel::Center => state.center_progress = progress,
                ProgressChannel::Drag => {
                    let style = ElementStyle {
                        transform: Some(offset.scaled(1.0 - progress)),
                        ..*applied
                    };
                    host.apply_style(&style);
                    *applied = style;
                    state.move_progress = progress;
                }
                ProgressChannel::Settle => state.opacity = 1.0 - progress,
            }
        });
    }

    fn fire<H: ShellHost + ?Sized>(&mut self, event: PhaseEvent, due: Duration, host: &mut H) {
        self.phase = event.phase();
        reflow_core::trace!(?event, epoch = self.epoch, "phase boundary");

        let t = self.config.timings;
        match event {
            PhaseEvent::StartEnter => {
                self.scheduler
                    .start_run(ProgressChannel::Enter, due, t.enter, Easing::Linear);
            }
            PhaseEvent::StartSelect => {
                self.scheduler
                    .start_run(ProgressChannel::Select, due, t.select, Easing::Linear);
            }
            PhaseEvent::StartCenter => {
                self.scheduler
                    .start_run(ProgressChannel::Center, due, t.center, Easing::Linear);
            }
            PhaseEvent::BeginHold => {}
            PhaseEvent::StartDrag => {
                self.scheduler
                    .start_run(ProgressChannel::Drag, due, t.drag, Easing::EaseOutCubic);
            }
            PhaseEvent::BeginSettle => {
                if let Some(state) = self.overlay.as_mut() {
                    state.cursor_visible = false;
                }
                self.scheduler
                    .start_run(ProgressChannel::Settle, due, t.settle, Easing::Linear);
            }
            PhaseEvent::Cleanup => {
                self.settle_now(host);
                self.tracker.rebaseline(host);
                reflow_core::debug!(epoch = self.epoch, "transition settled");
            }
        }
    }

    /// Cancel everything and strip styling; the element stays in place.
    pub fn teardown<H: ShellHost + ?Sized>(&mut self, host: &mut H) {
        if self.torn_down {
            return;
        }
        self.settle_now(host);
        self.torn_down = true;
        reflow_core::debug!(epoch = self.epoch, "controller torn down");
    }

    fn settle_now<H: ShellHost + ?Sized>(&mut self, host: &mut H) {
        self.cancel_pending();
        self.write_style(host, ElementStyle::RESTING);
        self.scroll_lock.unlock(host);
        self.overlay = None;
        self.phase = Phase::Idle;
    }

    fn cancel_pending(&mut self) {
        let (timers, runs) = self.scheduler.cancel_all();
        if timers + runs > 0 {
            reflow_core::trace!(timers, runs, "cancelled pending phase work");
        }
    }

    fn write_style<H: ShellHost + ?Sized>(&mut self, host: &mut H, style: ElementStyle) {
        host.apply_style(&style);
        self.applied = style;
    }

    // -- Queries -----------------------------------------------------------

    #[must_use]
    pub const fn config(&self) -> &TransitionConfig {
        &self.config
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        self.phase.is_active()
    }

    #[must_use]
    pub const fn overlay(&self) -> Option<&OverlayState> {
        self.overlay.as_ref()
    }

    /// Drawable overlay for the current state.
    #[must_use]
    pub fn scene(&self) -> Option<OverlayScene> {
        self.overlay
            .as_ref()
            .map(|state| OverlayScene::derive(state, &self.metrics))
    }

    /// Style most recently written to the element.
    #[must_use]
    pub const fn applied_style(&self) -> &ElementStyle {
        &self.applied
    }

    #[must_use]
    pub const fn baseline(&self) -> Option<RectSnapshot> {
        self.tracker.baseline()
    }

    /// Sequence number of the most recently armed transition.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub const fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_locked()
    }

    #[must_use]
    pub const fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    #[must_use]
    pub const fn animation_disabled(&self) -> bool {
        self.animation_disabled
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_timers()
    }

    #[must_use]
    pub fn pending_timers_of(&self, epoch: u64) -> usize {
        self.scheduler.pending_timers_of(epoch)
    }

    #[must_use]
    pub fn active_frame_runs(&self) -> usize {
        self.scheduler.active_runs()
    }

    /// Whether the host should call [`tick`](Self::tick) on the next display frame.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.scheduler.active_runs() > 0
    }

    /// Latest instant by which the host must call [`tick`](Self::tick).
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }
}
