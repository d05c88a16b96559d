#![forbid(unsafe_code)]

//! Phase scheduler: a timer queue plus a per-frame progress loop.
//!
//! Timers stand in for macrotask delays; each carries a [`PhaseEvent`] and a
//! due instant measured on the host's monotonic clock. Frame runs stand in
//! for display-refresh callbacks; each drives one [`ProgressChannel`] from 0
//! to 1 through a [`Tween`] and is dropped once it reports 1.
//!
//! # Invariants
//!
//! 1. Due timers pop in `(due, scheduling order)` order.
//! 2. A frame run reports non-decreasing progress and reports 1.0 exactly
//!    once, on the step that completes it.
//! 3. [`PhaseScheduler::cancel_all`] leaves no timer and no run behind;
//!    nothing cancelled can ever report again.

use std::time::Duration;

use reflow_core::animation::{Animation, Easing, Tween};

use crate::config::PhaseTimings;

/// Named stage of the transition state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// No transition; the element carries no inline styling.
    #[default]
    Idle,
    /// Overlay created and element pinned at its old position; no timer fired yet.
    Armed,
    Entering,
    Selecting,
    Centering,
    Hold,
    Moving,
    Settling,
}

impl Phase {
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Timer payloads, one per phase boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    StartEnter,
    StartSelect,
    StartCenter,
    BeginHold,
    StartDrag,
    BeginSettle,
    Cleanup,
}

impl PhaseEvent {
    /// The phase entered when this event fires (`Idle` for cleanup).
    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            Self::StartEnter => Phase::Entering,
            Self::StartSelect => Phase::Selecting,
            Self::StartCenter => Phase::Centering,
            Self::BeginHold => Phase::Hold,
            Self::StartDrag => Phase::Moving,
            Self::BeginSettle => Phase::Settling,
            Self::Cleanup => Phase::Idle,
        }
    }
}

/// Which overlay value a frame run feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressChannel {
    Enter,
    Select,
    Center,
    Drag,
    Settle,
}

/// Cancellation handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Cancellation handle for a frame run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    epoch: u64,
    due: Duration,
    event: PhaseEvent,
}

#[derive(Debug, Clone, Copy)]
struct FrameRun {
    handle: FrameHandle,
    channel: ProgressChannel,
    started_at: Duration,
    tween: Tween,
}

/// Owner of every pending timer and frame run for one controller.
#[derive(Debug, Default)]
pub struct PhaseScheduler {
    timers: Vec<PendingTimer>,
    runs: Vec<FrameRun>,
    next_id: u64,
}

impl PhaseScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Schedule `event` at the absolute instant `due`, tagged with `epoch`.
    pub fn schedule(&mut self, epoch: u64, due: Duration, event: PhaseEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.push(PendingTimer {
            handle,
            epoch,
            due,
            event,
        });
        handle
    }

    /// Schedule the full phase sequence of one transition starting at `start`.
    pub fn plan(&mut self, epoch: u64, start: Duration, timings: &PhaseTimings) -> [TimerHandle; 7] {
        let o = timings.offsets();
        [
            self.schedule(epoch, start + o.enter, PhaseEvent::StartEnter),
            self.schedule(epoch, start + o.select, PhaseEvent::StartSelect),
            self.schedule(epoch, start + o.center, PhaseEvent::StartCenter),
            self.schedule(epoch, start + o.hold, PhaseEvent::BeginHold),
            self.schedule(epoch, start + o.drag, PhaseEvent::StartDrag),
            self.schedule(epoch, start + o.settle, PhaseEvent::BeginSettle),
            self.schedule(epoch, start + o.cleanup, PhaseEvent::Cleanup),
        ]
    }

    /// Cancel one timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel_timer(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() < before
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, PhaseEvent)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.handle))
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(idx);
        Some((timer.due, timer.event))
    }

    /// Earliest pending due instant, for hosts that sleep between frames.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.due).min()
    }

    /// Start a frame run whose clock begins at `started_at`.
    pub fn start_run(
        &mut self,
        channel: ProgressChannel,
        started_at: Duration,
        duration: Duration,
        easing: Easing,
    ) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.runs.push(FrameRun {
            handle,
            channel,
            started_at,
            tween: Tween::new(duration).easing(easing.function()),
        });
        handle
    }

    /// Cancel one frame run. Returns `false` if it already finished.
    pub fn cancel_run(&mut self, handle: FrameHandle) -> bool {
        let before = self.runs.len();
        self.runs.retain(|r| r.handle != handle);
        self.runs.len() < before
    }

    /// Sample every run at `now`, reporting eased progress to `on_progress`.
    ///
    /// Runs that reach 1.0 are reported once more and then dropped.
    pub fn step_runs(&mut self, now: Duration, mut on_progress: impl FnMut(ProgressChannel, f32)) {
        self.runs.retain_mut(|run| {
            run.tween.seek(now.saturating_sub(run.started_at));
            on_progress(run.channel, run.tween.value());
            !run.tween.is_complete()
        });
    }

    /// Drop every pending timer and frame run. Returns how many of each.
    pub fn cancel_all(&mut self) -> (usize, usize) {
        let cancelled = (self.timers.len(), self.runs.len());
        self.timers.clear();
        self.runs.clear();
        cancelled
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Pending timers that belong to transition `epoch`.
    #[must_use]
    pub fn pending_timers_of(&self, epoch: u64) -> usize {
        self.timers.iter().filter(|t| t.epoch == epoch).count()
    }

    #[must_use]
    pub fn active_runs(&self) -> usize {
        self.runs.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty() && self.runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_200: Duration = Duration::from_millis(200);
    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn plan_schedules_every_boundary_in_order() {
        let mut sched = PhaseScheduler::new();
        sched.plan(1, MS_100, &PhaseTimings::default());
        assert_eq!(sched.pending_timers(), 7);

        let mut events = Vec::new();
        while let Some((due, event)) = sched.pop_due(Duration::from_secs(10)) {
            events.push((due.as_millis(), event));
        }
        assert_eq!(
            events,
            vec![
                (100, PhaseEvent::StartEnter),
                (400, PhaseEvent::StartSelect),
                (1100, PhaseEvent::StartCenter),
                (1420, PhaseEvent::BeginHold),
                (1830, PhaseEvent::StartDrag),
                (2730, PhaseEvent::BeginSettle),
                (3010, PhaseEvent::Cleanup),
            ]
        );
    }

    #[test]
    fn pop_due_respects_now() {
        let mut sched = PhaseScheduler::new();
        sched.schedule(1, MS_200, PhaseEvent::StartSelect);
        assert_eq!(sched.pop_due(MS_100), None);
        assert_eq!(sched.next_due(), Some(MS_200));
        assert_eq!(sched.pop_due(MS_200), Some((MS_200, PhaseEvent::StartSelect)));
        assert!(sched.is_idle());
    }

    #[test]
    fn equal_due_times_pop_in_schedule_order() {
        let mut sched = PhaseScheduler::new();
        sched.schedule(1, MS_100, PhaseEvent::StartEnter);
        sched.schedule(1, MS_100, PhaseEvent::StartSelect);
        assert_eq!(sched.pop_due(MS_100).map(|(_, e)| e), Some(PhaseEvent::StartEnter));
        assert_eq!(sched.pop_due(MS_100).map(|(_, e)| e), Some(PhaseEvent::StartSelect));
    }

    #[test]
    fn cancel_timer_by_handle() {
        let mut sched = PhaseScheduler::new();
        let a = sched.schedule(1, MS_100, PhaseEvent::StartEnter);
        sched.schedule(1, MS_200, PhaseEvent::StartSelect);
        assert!(sched.cancel_timer(a));
        assert!(!sched.cancel_timer(a));
        assert_eq!(sched.pending_timers(), 1);
    }

    #[test]
    fn runs_report_progress_and_retire() {
        let mut sched = PhaseScheduler::new();
        sched.start_run(ProgressChannel::Select, MS_100, MS_200, Easing::Linear);

        let mut seen = Vec::new();
        for now in [MS_100, MS_200, MS_300, Duration::from_millis(400)] {
            sched.step_runs(now, |ch, p| seen.push((ch, p)));
        }
        assert_eq!(seen.len(), 3, "run retires after reporting 1.0");
        assert!((seen[0].1 - 0.0).abs() < f32::EPSILON);
        assert!((seen[1].1 - 0.5).abs() < 1e-4);
        assert!((seen[2].1 - 1.0).abs() < f32::EPSILON);
        assert_eq!(sched.active_runs(), 0);
    }

    #[test]
    fn run_progress_is_eased() {
        let mut sched = PhaseScheduler::new();
        sched.start_run(ProgressChannel::Drag, Duration::ZERO, MS_200, Easing::EaseOutCubic);
        let mut last = 0.0;
        sched.step_runs(MS_100, |_, p| last = p);
        assert!((last - 0.875).abs() < 1e-3);
    }

    #[test]
    fn cancelled_run_never_reports() {
        let mut sched = PhaseScheduler::new();
        let h = sched.start_run(ProgressChannel::Enter, Duration::ZERO, MS_200, Easing::Linear);
        assert!(sched.cancel_run(h));
        let mut calls = 0;
        sched.step_runs(MS_100, |_, _| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn cancel_all_drains_both_collections() {
        let mut sched = PhaseScheduler::new();
        sched.plan(3, Duration::ZERO, &PhaseTimings::default());
        sched.start_run(ProgressChannel::Enter, Duration::ZERO, MS_200, Easing::Linear);
        assert_eq!(sched.pending_timers_of(3), 7);
        assert_eq!(sched.cancel_all(), (7, 1));
        assert!(sched.is_idle());
        assert_eq!(sched.pending_timers_of(3), 0);
    }

    #[test]
    fn phase_event_targets() {
        assert_eq!(PhaseEvent::StartDrag.phase(), Phase::Moving);
        assert_eq!(PhaseEvent::Cleanup.phase(), Phase::Idle);
        assert!(Phase::Armed.is_active());
        assert!(!Phase::Idle.is_active());
    }
}
