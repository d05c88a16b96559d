#![forbid(unsafe_code)]

//! Progress primitives for timed transition phases.
//!
//! A [`Tween`] maps elapsed time onto a normalized `f32` in [0.0, 1.0] through
//! an easing curve. Tweens never read a clock: the owner positions them with
//! [`Tween::seek`] at the host's elapsed time, which keeps every phase
//! deterministic under a host-driven clock.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-out: `1 - (1 - t)^3`. Fast departure, gentle arrival.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Named easing policy, for configuration surfaces that cannot hold a `fn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Easing {
    #[default]
    Linear,
    EaseOutCubic,
}

impl Easing {
    /// The curve this policy names.
    #[must_use]
    pub const fn function(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseOutCubic => ease_out_cubic,
        }
    }

    /// Apply the curve to `t`.
    #[inline]
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        (self.function())(t)
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Eased progression from 0.0 to 1.0 over a fixed duration.
///
/// Elapsed time is tracked as a [`Duration`] so repeated small seeks do not
/// accumulate floating-point drift. A zero duration is bumped to one
/// nanosecond: the tween completes on its first non-zero seek instead of
/// dividing by zero.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Tween {
    /// Create a linear tween with the given duration.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// Set the easing function (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Total duration.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Time elapsed so far.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Position the tween at an absolute elapsed time.
    ///
    /// Seeking backwards is ignored so the output never decreases.
    pub fn seek(&mut self, elapsed: Duration) {
        if elapsed > self.elapsed {
            self.elapsed = elapsed;
        }
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    #[must_use]
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Tween {
    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_450: Duration = Duration::from_millis(450);
    const MS_900: Duration = Duration::from_millis(900);

    #[test]
    fn linear_endpoints_and_clamp() {
        assert!((linear(0.0) - 0.0).abs() < f32::EPSILON);
        assert!((linear(1.0) - 1.0).abs() < f32::EPSILON);
        assert!((linear(-3.0) - 0.0).abs() < f32::EPSILON);
        assert!((linear(7.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ease_out_cubic_known_values() {
        assert!((ease_out_cubic(0.0) - 0.0).abs() < f32::EPSILON);
        assert!((ease_out_cubic(1.0) - 1.0).abs() < f32::EPSILON);
        // 1 - 0.5^3
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn ease_out_cubic_leads_linear() {
        for i in 1..10 {
            let t = i as f32 / 10.0;
            assert!(ease_out_cubic(t) > linear(t), "t={t}");
        }
    }

    #[test]
    fn easing_enum_dispatches() {
        assert!((Easing::Linear.apply(0.25) - 0.25).abs() < f32::EPSILON);
        assert!((Easing::EaseOutCubic.apply(0.5) - 0.875).abs() < 1e-6);
        assert_eq!(Easing::default(), Easing::Linear);
    }

    #[test]
    fn tween_starts_at_zero() {
        let tween = Tween::new(MS_900);
        assert!((tween.value() - 0.0).abs() < f32::EPSILON);
        assert!(!tween.is_complete());
    }

    #[test]
    fn tween_midpoint_eased() {
        let mut tween = Tween::new(MS_900).easing(ease_out_cubic);
        tween.seek(MS_450);
        assert!((tween.raw_progress() - 0.5).abs() < 1e-4);
        assert!((tween.value() - 0.875).abs() < 1e-3);
    }

    #[test]
    fn tween_completes_and_clamps() {
        let mut tween = Tween::new(MS_100);
        tween.seek(MS_900);
        assert!(tween.is_complete());
        assert!((tween.value() - 1.0).abs() < f32::EPSILON);
        assert_eq!(tween.elapsed(), MS_900);
    }

    #[test]
    fn tween_seek_is_monotonic() {
        let mut tween = Tween::new(MS_900);
        tween.seek(MS_450);
        tween.seek(MS_100);
        assert_eq!(tween.elapsed(), MS_450);
    }

    #[test]
    fn tween_zero_duration_completes_on_first_seek() {
        let mut tween = Tween::new(Duration::ZERO);
        assert!(!tween.is_complete());
        tween.seek(Duration::from_millis(1));
        assert!(tween.is_complete());
        assert!((tween.value() - 1.0).abs() < f32::EPSILON);
    }
}
