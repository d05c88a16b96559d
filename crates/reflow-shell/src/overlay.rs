#![forbid(unsafe_code)]

//! Overlay state and the scene derived from it.
//!
//! [`OverlayState`] is the only mutable data of a running transition.
//! [`OverlayScene`] is a pure function of that state plus fixed metrics:
//! it holds no state of its own, so a host can rebuild it every frame and
//! draw it with whatever primitives it has.
//!
//! Layering, bottom to top: the fill layer ([`FILL_LAYER_Z`]), the dragged
//! element (its own z-index from the config), then the frame UI
//! ([`FRAME_LAYER_Z`]) with border, handles and cursor.

use reflow_core::geometry::{PixelRect, Point, RectSnapshot, snap_px};

use crate::config::TransitionConfig;

/// Stacking order of the destination guide and solid fill.
pub const FILL_LAYER_Z: i32 = 1050;
/// Stacking order of the frame border, handles and cursor.
pub const FRAME_LAYER_Z: i32 = 1200;

/// Mutable data of one running transition.
///
/// `from` and `to` are the viewport-clipped endpoints and never change after
/// creation; only the progress counters and the settle fields move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayState {
    pub from: RectSnapshot,
    pub to: RectSnapshot,
    pub cursor_visible: bool,
    pub opacity: f32,
    pub enter_progress: f32,
    pub select_progress: f32,
    pub center_progress: f32,
    pub move_progress: f32,
}

impl OverlayState {
    #[must_use]
    pub const fn new(from: RectSnapshot, to: RectSnapshot) -> Self {
        Self {
            from,
            to,
            cursor_visible: true,
            opacity: 1.0,
            enter_progress: 0.0,
            select_progress: 0.0,
            center_progress: 0.0,
            move_progress: 0.0,
        }
    }

    /// Horizontal direction of travel.
    #[must_use]
    pub fn direction(&self, threshold_px: f32) -> MovementDirection {
        MovementDirection::from_delta(self.to.left - self.from.left, threshold_px)
    }
}

/// Horizontal direction of the drag, with a dead zone around zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDirection {
    Left,
    Right,
    None,
}

impl MovementDirection {
    #[must_use]
    pub fn from_delta(delta_x: i32, threshold_px: f32) -> Self {
        let dx = delta_x as f32;
        if dx > threshold_px {
            Self::Right
        } else if dx < -threshold_px {
            Self::Left
        } else {
            Self::None
        }
    }
}

/// Fixed sizes the scene is derived with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayMetrics {
    pub padding_px: i32,
    pub handle_size_px: i32,
    pub direction_threshold_px: f32,
    pub all_handles_threshold: f32,
}

impl From<&TransitionConfig> for OverlayMetrics {
    fn from(config: &TransitionConfig) -> Self {
        Self {
            padding_px: config.frame_padding_px,
            handle_size_px: config.handle_size_px,
            direction_threshold_px: config.direction_threshold_px,
            all_handles_threshold: config.all_handles_threshold,
        }
    }
}

impl Default for OverlayMetrics {
    fn default() -> Self {
        Self::from(&TransitionConfig::default())
    }
}

/// Everything a host needs to draw one overlay frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayScene {
    /// Opacity of both overlay layers.
    pub opacity: f32,
    /// Full padded frame at the current drag position.
    pub frame: PixelRect,
    /// The part of the frame drawn so far, growing from its top-left corner.
    pub draw: PixelRect,
    /// Solid fill under the content; same geometry as `draw`.
    pub fill: PixelRect,
    /// Corner handles: top-left first, then top-right, bottom-left, bottom-right.
    pub handles: Vec<PixelRect>,
    /// Cursor hotspot, if the cursor is visible.
    pub cursor: Option<Point>,
    pub direction: MovementDirection,
    /// Dashed placeholder at the resting position, shown when moving sideways.
    pub destination_guide: Option<PixelRect>,
}

impl OverlayScene {
    /// Derive the scene for `state`.
    #[must_use]
    pub fn derive(state: &OverlayState, metrics: &OverlayMetrics) -> Self {
        let pad = metrics.padding_px;
        let (from, to) = (&state.from, &state.to);
        let t = state.move_progress;

        let content_x = snap_px(from.left as f32 + t * (to.left - from.left) as f32);
        let content_y = snap_px(from.top as f32 + t * (to.top - from.top) as f32);
        let frame_x = content_x - pad;
        let frame_y = content_y - pad;
        let padded_w = from.width + pad * 2;
        let padded_h = from.height + pad * 2;
        let frame = PixelRect::new(frame_x, frame_y, padded_w, padded_h);

        let select = state.select_progress;
        let draw = PixelRect::new(
            frame_x,
            frame_y,
            snap_px(padded_w as f32 * select),
            snap_px(padded_h as f32 * select),
        );

        let size = metrics.handle_size_px;
        let mut handles = vec![PixelRect::square_at(frame_x, frame_y, size)];
        if select > metrics.all_handles_threshold {
            let right = frame_x + draw.width;
            let bottom = frame_y + draw.height;
            handles.push(PixelRect::square_at(right, frame_y, size));
            handles.push(PixelRect::square_at(frame_x, bottom, size));
            handles.push(PixelRect::square_at(right, bottom, size));
        }

        let cursor = state
            .cursor_visible
            .then(|| cursor_position(frame, select, state.center_progress));

        let direction = state.direction(metrics.direction_threshold_px);
        let destination_guide = (direction != MovementDirection::None).then(|| to.padded(pad));

        Self {
            opacity: state.opacity * state.enter_progress,
            frame,
            draw,
            fill: draw,
            handles,
            cursor,
            direction,
            destination_guide,
        }
    }

    #[must_use]
    pub fn shows_all_handles(&self) -> bool {
        self.handles.len() == 4
    }
}

/// The cursor rides the growing bottom-right corner while the frame draws,
/// then hops from the finished corner toward the frame's center.
fn cursor_position(frame: PixelRect, select: f32, center: f32) -> Point {
    let (x0, y0) = (frame.left as f32, frame.top as f32);
    let (w, h) = (frame.width as f32, frame.height as f32);
    if center > 0.0 {
        let (end_x, end_y) = (x0 + w, y0 + h);
        let (mid_x, mid_y) = (x0 + w / 2.0, y0 + h / 2.0);
        Point::new(
            snap_px(end_x + (mid_x - end_x) * center),
            snap_px(end_y + (mid_y - end_y) * center),
        )
    } else {
        Point::new(snap_px(x0 + w * select), snap_px(y0 + h * select))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state() -> OverlayState {
        OverlayState::new(
            RectSnapshot::new(100, 50, 450, 600),
            RectSnapshot::new(100, 900, 450, 600),
        )
    }

    #[test]
    fn direction_dead_zone() {
        assert_eq!(MovementDirection::from_delta(40, 2.0), MovementDirection::Right);
        assert_eq!(MovementDirection::from_delta(-3, 2.0), MovementDirection::Left);
        assert_eq!(MovementDirection::from_delta(1, 2.0), MovementDirection::None);
        assert_eq!(MovementDirection::from_delta(2, 2.0), MovementDirection::None);
    }

    #[test]
    fn fresh_overlay_is_invisible_point() {
        let scene = OverlayScene::derive(&state(), &OverlayMetrics::default());
        assert!((scene.opacity - 0.0).abs() < f32::EPSILON);
        assert_eq!(scene.frame, PixelRect::new(36, 86, 478, 628));
        assert_eq!(scene.draw, PixelRect::new(36, 86, 0, 0));
        assert_eq!(scene.handles, vec![PixelRect::new(30, 80, 12, 12)]);
        assert_eq!(scene.cursor, Some(Point::new(36, 86)));
    }

    #[test]
    fn half_drawn_frame() {
        let mut s = state();
        s.enter_progress = 1.0;
        s.select_progress = 0.5;
        let scene = OverlayScene::derive(&s, &OverlayMetrics::default());
        assert_eq!(scene.draw, PixelRect::new(36, 86, 239, 314));
        assert_eq!(scene.fill, scene.draw);
        assert_eq!(scene.cursor, Some(Point::new(275, 400)));
        assert!(!scene.shows_all_handles());
        assert!((scene.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn all_handles_past_threshold() {
        let mut s = state();
        s.select_progress = 0.9;
        let scene = OverlayScene::derive(&s, &OverlayMetrics::default());
        assert!(scene.shows_all_handles());
        // draw width = round(478 * 0.9) = 430, height = round(628 * 0.9) = 565
        assert_eq!(scene.handles[1], PixelRect::square_at(36 + 430, 86, 12));
        assert_eq!(scene.handles[3], PixelRect::square_at(36 + 430, 86 + 565, 12));
    }

    #[test]
    fn cursor_hops_to_center() {
        let mut s = state();
        s.select_progress = 1.0;
        let metrics = OverlayMetrics::default();

        let corner = OverlayScene::derive(&s, &metrics).cursor;
        assert_eq!(corner, Some(Point::new(36 + 478, 86 + 628)));

        s.center_progress = 0.5;
        let halfway = OverlayScene::derive(&s, &metrics).cursor;
        // corner (514, 714) -> center (275, 400)
        assert_eq!(halfway, Some(Point::new(395, 557)));

        s.center_progress = 1.0;
        let centred = OverlayScene::derive(&s, &metrics).cursor;
        assert_eq!(centred, Some(Point::new(275, 400)));
    }

    #[test]
    fn frame_follows_drag() {
        let mut s = state();
        s.select_progress = 1.0;
        s.center_progress = 1.0;
        s.move_progress = 0.5;
        let scene = OverlayScene::derive(&s, &OverlayMetrics::default());
        // content x = 50 + 0.5 * 850 = 475
        assert_eq!(scene.frame.left, 461);
        assert_eq!(scene.frame.top, 86);
        assert_eq!(scene.cursor, Some(Point::new(461 + 239, 86 + 314)));
    }

    #[test]
    fn destination_guide_only_when_moving_sideways() {
        let scene = OverlayScene::derive(&state(), &OverlayMetrics::default());
        assert_eq!(scene.direction, MovementDirection::Right);
        assert_eq!(scene.destination_guide, Some(PixelRect::new(886, 86, 478, 628)));

        let vertical = OverlayState::new(
            RectSnapshot::new(100, 50, 450, 600),
            RectSnapshot::new(300, 51, 450, 600),
        );
        let scene = OverlayScene::derive(&vertical, &OverlayMetrics::default());
        assert_eq!(scene.direction, MovementDirection::None);
        assert_eq!(scene.destination_guide, None);
    }

    #[test]
    fn hidden_cursor_and_faded_layers() {
        let mut s = state();
        s.enter_progress = 1.0;
        s.cursor_visible = false;
        s.opacity = 0.25;
        let scene = OverlayScene::derive(&s, &OverlayMetrics::default());
        assert_eq!(scene.cursor, None);
        assert!((scene.opacity - 0.25).abs() < f32::EPSILON);
    }
}
