#![forbid(unsafe_code)]

//! Pixel geometry in viewport coordinates.
//!
//! All values are whole CSS pixels with the origin at the top-left of the
//! viewport. Coordinates are signed: an element scrolled above the fold has
//! a negative `top`.

/// Round to the nearest pixel, halves toward positive infinity.
///
/// This is the browser's `Math.round`, so `-2.5` snaps to `-2`, not `-3`.
#[inline]
#[must_use]
pub fn snap_px(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

/// A translation in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The fraction `remaining` of this offset, snapped to pixels.
    ///
    /// Used to shrink a from→to displacement toward zero as a drag advances.
    #[must_use]
    pub fn scaled(&self, remaining: f32) -> Self {
        Self {
            x: snap_px(self.x as f32 * remaining),
            y: snap_px(self.y as f32 * remaining),
        }
    }
}

/// A point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An element's bounding box, captured once and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectSnapshot {
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
}

impl RectSnapshot {
    #[inline]
    #[must_use]
    pub const fn new(top: i32, left: i32, width: i32, height: i32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height)
    }

    /// Displacement that moves `target` back onto `self`.
    #[inline]
    #[must_use]
    pub const fn offset_from(&self, target: &RectSnapshot) -> Offset {
        Offset {
            x: self.left.saturating_sub(target.left),
            y: self.top.saturating_sub(target.top),
        }
    }

    /// The same box shifted by `offset`.
    #[inline]
    #[must_use]
    pub const fn translated(&self, offset: Offset) -> Self {
        Self {
            top: self.top.saturating_add(offset.y),
            left: self.left.saturating_add(offset.x),
            width: self.width,
            height: self.height,
        }
    }

    /// The box grown by `pad` on every side.
    #[must_use]
    pub const fn padded(&self, pad: i32) -> PixelRect {
        PixelRect {
            left: self.left.saturating_sub(pad),
            top: self.top.saturating_sub(pad),
            width: self.width.saturating_add(pad.saturating_mul(2)),
            height: self.height.saturating_add(pad.saturating_mul(2)),
        }
    }
}

/// A drawable rectangle produced for the overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    #[inline]
    #[must_use]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A `size`×`size` square centred on `(x, y)`.
    #[must_use]
    pub const fn square_at(x: i32, y: i32, size: i32) -> Self {
        Self {
            left: x - size / 2,
            top: y - size / 2,
            width: size,
            height: size,
        }
    }
}

/// How much of a rect lies outside the safe viewport band, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportClip {
    pub top: i32,
    pub bottom: i32,
}

impl ViewportClip {
    #[inline]
    #[must_use]
    pub const fn new(top: i32, bottom: i32) -> Self {
        Self { top, bottom }
    }

    /// Pairwise maximum, so a clip derived from two rects hides whatever
    /// either one would have drawn outside the band.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self {
            top: self.top.max(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.top == 0 && self.bottom == 0
    }
}

/// Output of [`clip_to_viewport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedRect {
    /// The visible part of the rect; `height` is floored at 0.
    pub rect: RectSnapshot,
    /// The insets that were cut away.
    pub clip: ViewportClip,
}

/// Clamp `rect` vertically to the band `[inset, viewport_height - inset)`.
///
/// Horizontal extent is left alone: the layout toggle only ever moves the
/// tracked element sideways inside the page, never off-screen.
#[must_use]
pub fn clip_to_viewport(rect: RectSnapshot, viewport_height: i32, inset: i32) -> ClippedRect {
    let top_clip = inset.saturating_sub(rect.top).max(0);
    let band_bottom = viewport_height.saturating_sub(inset);
    let bottom_clip = rect.bottom().saturating_sub(band_bottom).max(0);
    let visible = rect
        .height
        .saturating_sub(top_clip)
        .saturating_sub(bottom_clip)
        .max(0);

    ClippedRect {
        rect: RectSnapshot {
            top: rect.top.saturating_add(top_clip),
            height: visible,
            ..rect
        },
        clip: ViewportClip {
            top: top_clip,
            bottom: bottom_clip,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_matches_browser_rounding() {
        assert_eq!(snap_px(2.5), 3);
        assert_eq!(snap_px(2.49), 2);
        assert_eq!(snap_px(-2.5), -2);
        assert_eq!(snap_px(-2.51), -3);
    }

    #[test]
    fn offset_from_target() {
        let from = RectSnapshot::new(100, 50, 450, 600);
        let to = RectSnapshot::new(100, 900, 450, 600);
        assert_eq!(from.offset_from(&to), Offset::new(-850, 0));
        assert_eq!(to.translated(from.offset_from(&to)), from);
    }

    #[test]
    fn offset_scaled_shrinks_to_zero() {
        let offset = Offset::new(-850, 30);
        assert_eq!(offset.scaled(1.0), offset);
        assert_eq!(offset.scaled(0.5), Offset::new(-425, 15));
        assert_eq!(offset.scaled(0.0), Offset::ZERO);
    }

    #[test]
    fn padded_grows_every_side() {
        let rect = RectSnapshot::new(100, 900, 450, 600);
        assert_eq!(rect.padded(14), PixelRect::new(886, 86, 478, 628));
    }

    #[test]
    fn square_is_centred() {
        assert_eq!(PixelRect::square_at(100, 50, 12), PixelRect::new(94, 44, 12, 12));
    }

    #[test]
    fn clip_inside_band_is_identity() {
        let rect = RectSnapshot::new(100, 50, 450, 600);
        let clipped = clip_to_viewport(rect, 1000, 48);
        assert_eq!(clipped.rect, rect);
        assert!(clipped.clip.is_none());
    }

    #[test]
    fn clip_above_band() {
        let rect = RectSnapshot::new(-200, 50, 450, 600);
        let clipped = clip_to_viewport(rect, 1000, 48);
        assert_eq!(clipped.clip, ViewportClip::new(248, 0));
        assert_eq!(clipped.rect.top, 48);
        assert_eq!(clipped.rect.height, 352);
    }

    #[test]
    fn clip_below_band() {
        let rect = RectSnapshot::new(500, 50, 450, 600);
        let clipped = clip_to_viewport(rect, 1000, 48);
        // 1100 - 952
        assert_eq!(clipped.clip, ViewportClip::new(0, 148));
        assert_eq!(clipped.rect.top, 500);
        assert_eq!(clipped.rect.height, 452);
    }

    #[test]
    fn clip_entirely_outside_floors_height() {
        let rect = RectSnapshot::new(-900, 50, 450, 600);
        let clipped = clip_to_viewport(rect, 1000, 48);
        assert_eq!(clipped.rect.height, 0);
    }

    #[test]
    fn clip_max_is_pairwise() {
        let a = ViewportClip::new(10, 0);
        let b = ViewportClip::new(3, 40);
        assert_eq!(a.max(b), ViewportClip::new(10, 40));
    }
}
