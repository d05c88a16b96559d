#![forbid(unsafe_code)]

//! Host traits: the only two seams between the controller and a page.
//!
//! The controller never owns the element or the document. The embedding
//! surface implements [`TrackedElement`] (measure + inline style writes) and
//! [`PageScroll`] (viewport metrics + body/root scroll styles). Every style
//! the controller writes is non-layout-affecting, so implementing these
//! against a real document never disturbs surrounding flow.

use reflow_core::geometry::{Offset, RectSnapshot, ViewportClip};

/// Inline transition styling for the tracked element.
///
/// [`ElementStyle::RESTING`] is the fully stripped state; writing it must
/// leave the element exactly as if no transition had ever run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementStyle {
    /// `translate3d(x, y, 0)` when set.
    pub transform: Option<Offset>,
    /// `clip-path: inset(top 0 bottom 0)` when set to a non-zero inset.
    pub clip: Option<ViewportClip>,
    pub z_index: Option<i32>,
    /// `overflow: clip` (paint-only clipping, no formatting context).
    pub overflow_clip: bool,
    /// `will-change: transform`.
    pub will_change_transform: bool,
    /// `transition: none`, so transform writes land without CSS easing.
    pub transition_suppressed: bool,
}

impl ElementStyle {
    /// No inline transition styling at all.
    pub const RESTING: Self = Self {
        transform: None,
        clip: None,
        z_index: None,
        overflow_clip: false,
        will_change_transform: false,
        transition_suppressed: false,
    };

    /// Identity transform with transitions off: the element's true layout box.
    pub const MEASURING: Self = Self {
        transform: Some(Offset::ZERO),
        transition_suppressed: true,
        ..Self::RESTING
    };

    /// Styling for an element held at `offset` during an active transition.
    #[must_use]
    pub const fn dragged(offset: Offset, clip: ViewportClip, z_index: i32) -> Self {
        Self {
            transform: Some(offset),
            clip: Some(clip),
            z_index: Some(z_index),
            overflow_clip: true,
            will_change_transform: true,
            transition_suppressed: true,
        }
    }

    #[must_use]
    pub fn is_resting(&self) -> bool {
        *self == Self::RESTING
    }

    /// Render as inline CSS declarations, in a stable order.
    ///
    /// Hosts that write a `style` attribute directly can use this verbatim.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut decls = Vec::new();
        if self.transition_suppressed {
            decls.push("transition: none".to_string());
        }
        if let Some(offset) = self.transform {
            decls.push(format!(
                "transform: translate3d({}px, {}px, 0px)",
                offset.x, offset.y
            ));
        }
        if self.will_change_transform {
            decls.push("will-change: transform".to_string());
        }
        if self.overflow_clip {
            decls.push("overflow: clip".to_string());
        }
        if let Some(clip) = self.clip.filter(|c| !c.is_none()) {
            decls.push(format!(
                "clip-path: inset({}px 0px {}px 0px)",
                clip.top, clip.bottom
            ));
        }
        if let Some(z) = self.z_index {
            decls.push(format!("z-index: {z}"));
        }
        decls.join("; ")
    }
}

/// The single element whose position is tracked and animated.
pub trait TrackedElement {
    /// Bounding box in viewport pixels under the currently applied style.
    ///
    /// `None` when the element is not attached; the controller treats that
    /// as "skip this cycle".
    fn measure(&self) -> Option<RectSnapshot>;

    /// Replace the element's inline transition styling.
    ///
    /// Must take effect before the next [`measure`](Self::measure) call.
    fn apply_style(&mut self, style: &ElementStyle);
}

/// Window metrics needed for clipping and scrollbar compensation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// `window.innerWidth`: includes the vertical scrollbar.
    pub inner_width: i32,
    /// `window.innerHeight`.
    pub inner_height: i32,
    /// Root element client width: excludes the scrollbar.
    pub client_width: i32,
}

impl Viewport {
    #[must_use]
    pub const fn new(inner_width: i32, inner_height: i32, client_width: i32) -> Self {
        Self {
            inner_width,
            inner_height,
            client_width,
        }
    }

    /// Width the page would reclaim if its scrollbar disappeared.
    #[must_use]
    pub const fn scrollbar_width(&self) -> i32 {
        let w = self.inner_width - self.client_width;
        if w > 0 { w } else { 0 }
    }
}

/// The inline styles the scroll lock overrides, as raw CSS values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageStyles {
    pub body_overflow: String,
    pub root_overflow: String,
    pub body_padding_right: String,
}

/// Document-level scroll styling.
pub trait PageScroll {
    fn viewport(&self) -> Viewport;

    fn page_styles(&self) -> PageStyles;

    fn set_page_styles(&mut self, styles: &PageStyles);
}

/// Everything the controller needs from its embedding page.
pub trait ShellHost: TrackedElement + PageScroll {}

impl<T: TrackedElement + PageScroll> ShellHost for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_is_default() {
        assert_eq!(ElementStyle::default(), ElementStyle::RESTING);
        assert!(ElementStyle::RESTING.is_resting());
        assert_eq!(ElementStyle::RESTING.to_css(), "");
    }

    #[test]
    fn measuring_neutralizes_transform() {
        let style = ElementStyle::MEASURING;
        assert_eq!(style.transform, Some(Offset::ZERO));
        assert!(style.clip.is_none());
        assert!(style.z_index.is_none());
        assert!(!style.is_resting());
    }

    #[test]
    fn dragged_css() {
        let style = ElementStyle::dragged(Offset::new(-850, 0), ViewportClip::new(0, 12), 1150);
        assert_eq!(
            style.to_css(),
            "transition: none; transform: translate3d(-850px, 0px, 0px); \
             will-change: transform; overflow: clip; \
             clip-path: inset(0px 0px 12px 0px); z-index: 1150"
        );
    }

    #[test]
    fn zero_clip_is_not_written() {
        let style = ElementStyle::dragged(Offset::new(0, 40), ViewportClip::new(0, 0), 1150);
        assert!(!style.to_css().contains("clip-path"));
        assert!(style.to_css().contains("overflow: clip"));
    }

    #[test]
    fn scrollbar_width_never_negative() {
        assert_eq!(Viewport::new(1280, 1000, 1265).scrollbar_width(), 15);
        assert_eq!(Viewport::new(1280, 1000, 1280).scrollbar_width(), 0);
        assert_eq!(Viewport::new(1280, 1000, 1300).scrollbar_width(), 0);
    }
}
