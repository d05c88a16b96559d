#![forbid(unsafe_code)]

//! Exclusive page scroll lock for the duration of a transition.
//!
//! # Invariants
//!
//! 1. `lock()` records the prior page styles only when not already locked,
//!    so repeated locks never overwrite the saved values with `hidden`.
//! 2. `unlock()` restores exactly the recorded values and forgets them.
//! 3. Both operations are idempotent.

use crate::host::{PageScroll, PageStyles};

const HIDDEN: &str = "hidden";

/// Records the page's scroll styles while the page is locked.
#[derive(Debug, Default)]
pub struct ScrollLock {
    saved: Option<PageStyles>,
}

impl ScrollLock {
    #[must_use]
    pub const fn new() -> Self {
        Self { saved: None }
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.saved.is_some()
    }

    /// The styles that will be restored on unlock.
    #[must_use]
    pub fn saved(&self) -> Option<&PageStyles> {
        self.saved.as_ref()
    }

    /// Hide page overflow, padding the body to cover the vanished scrollbar.
    ///
    /// Returns `false` if the page was already locked.
    pub fn lock<H: PageScroll + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.saved.is_some() {
            return false;
        }
        let scrollbar = host.viewport().scrollbar_width();
        let prior = host.page_styles();

        let mut locked = PageStyles {
            body_overflow: HIDDEN.to_string(),
            root_overflow: HIDDEN.to_string(),
            body_padding_right: prior.body_padding_right.clone(),
        };
        if scrollbar > 0 {
            locked.body_padding_right = format!("{scrollbar}px");
        }
        host.set_page_styles(&locked);
        reflow_core::trace!(scrollbar, "page scroll locked");

        self.saved = Some(prior);
        true
    }

    /// Restore the styles recorded by [`lock`](Self::lock).
    ///
    /// Returns `false` if the page was not locked.
    pub fn unlock<H: PageScroll + ?Sized>(&mut self, host: &mut H) -> bool {
        let Some(prior) = self.saved.take() else {
            return false;
        };
        host.set_page_styles(&prior);
        reflow_core::trace!("page scroll restored");
        true
    }
}
