#![forbid(unsafe_code)]

//! Layout mode source: the alignment value, its setter, and a change counter.
//!
//! [`LayoutContext`] is passed explicitly to everything that reads the
//! alignment. The controller keys its work on [`LayoutContext::change_id`],
//! not on the alignment value: an explicit set of the same value still
//! counts as a change, and the initial restore from storage does not.

use std::fmt;
use std::str::FromStr;

/// Horizontal placement of the page's content column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Alignment {
    Left,
    Center,
    #[default]
    Right,
}

impl Alignment {
    pub const ALL: [Self; 3] = [Self::Left, Self::Center, Self::Right];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized alignment name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAlignmentError(pub String);

impl fmt::Display for ParseAlignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown alignment {:?} (expected left, center or right)", self.0)
    }
}

impl std::error::Error for ParseAlignmentError {}

impl FromStr for Alignment {
    type Err = ParseAlignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(ParseAlignmentError(other.to_string())),
        }
    }
}

/// Storage failure reported by a [`LayoutStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutStoreError {
    /// The backing store cannot be reached (private mode, quota, ...).
    Unavailable(String),
}

impl fmt::Display for LayoutStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "layout store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for LayoutStoreError {}

/// Persistence for the chosen alignment, supplied by the embedder.
pub trait LayoutStore {
    fn load(&self) -> Result<Option<String>, LayoutStoreError>;

    fn save(&mut self, value: &str) -> Result<(), LayoutStoreError>;
}

/// In-process store; the value lives as long as the store does.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayoutStore {
    value: Option<String>,
}

impl MemoryLayoutStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn load(&self) -> Result<Option<String>, LayoutStoreError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, value: &str) -> Result<(), LayoutStoreError> {
        self.value = Some(value.to_string());
        Ok(())
    }
}

/// Current alignment plus a monotonically increasing change counter.
pub struct LayoutContext {
    alignment: Alignment,
    change_id: u64,
    store: Option<Box<dyn LayoutStore>>,
}

impl fmt::Debug for LayoutContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContext")
            .field("alignment", &self.alignment)
            .field("change_id", &self.change_id)
            .field("persisted", &self.store.is_some())
            .finish()
    }
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutContext {
    /// Default alignment, no persistence, change id 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            alignment: Alignment::default(),
            change_id: 0,
            store: None,
        }
    }

    /// Restore the alignment from `store` and persist future changes to it.
    ///
    /// A missing, unreadable, or unrecognized stored value falls back to the
    /// default. Restoring is not a change: `change_id` stays 0.
    #[must_use]
    pub fn with_store(store: impl LayoutStore + 'static) -> Self {
        let alignment = match store.load() {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|err: ParseAlignmentError| {
                reflow_core::warn!(%err, "ignoring stored layout");
                Alignment::default()
            }),
            Ok(None) => Alignment::default(),
            Err(err) => {
                reflow_core::warn!(%err, "layout store read failed");
                Alignment::default()
            }
        };
        Self {
            alignment,
            change_id: 0,
            store: Some(Box::new(store)),
        }
    }

    #[must_use]
    pub const fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Number of explicit [`set_alignment`](Self::set_alignment) calls so far.
    #[must_use]
    pub const fn change_id(&self) -> u64 {
        self.change_id
    }

    /// Set the alignment, persist it, and bump the change counter.
    ///
    /// Persistence failures are logged and otherwise ignored; the in-memory
    /// value always changes.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
        if let Some(store) = self.store.as_mut()
            && let Err(err) = store.save(alignment.as_str())
        {
            reflow_core::warn!(%err, "layout store write failed");
        }
        self.change_id += 1;
        reflow_core::debug!(%alignment, change_id = self.change_id, "layout changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl LayoutStore for BrokenStore {
        fn load(&self) -> Result<Option<String>, LayoutStoreError> {
            Err(LayoutStoreError::Unavailable("denied".into()))
        }

        fn save(&mut self, _value: &str) -> Result<(), LayoutStoreError> {
            Err(LayoutStoreError::Unavailable("denied".into()))
        }
    }

    #[test]
    fn alignment_parses_known_names() {
        for alignment in Alignment::ALL {
            assert_eq!(alignment.as_str().parse::<Alignment>(), Ok(alignment));
        }
        assert_eq!(
            "middle".parse::<Alignment>(),
            Err(ParseAlignmentError("middle".into()))
        );
    }

    #[test]
    fn defaults_to_right_with_zero_change_id() {
        let ctx = LayoutContext::new();
        assert_eq!(ctx.alignment(), Alignment::Right);
        assert_eq!(ctx.change_id(), 0);
    }

    #[test]
    fn restore_does_not_count_as_change() {
        let ctx = LayoutContext::with_store(MemoryLayoutStore::with_value("left"));
        assert_eq!(ctx.alignment(), Alignment::Left);
        assert_eq!(ctx.change_id(), 0);
    }

    #[test]
    fn invalid_stored_value_falls_back() {
        let ctx = LayoutContext::with_store(MemoryLayoutStore::with_value("diagonal"));
        assert_eq!(ctx.alignment(), Alignment::Right);
    }

    #[test]
    fn same_value_set_still_bumps_counter() {
        let mut ctx = LayoutContext::new();
        ctx.set_alignment(Alignment::Right);
        ctx.set_alignment(Alignment::Right);
        assert_eq!(ctx.change_id(), 2);
    }

    #[test]
    fn broken_store_never_blocks_changes() {
        let mut ctx = LayoutContext::with_store(BrokenStore);
        assert_eq!(ctx.alignment(), Alignment::Right);
        ctx.set_alignment(Alignment::Center);
        assert_eq!(ctx.alignment(), Alignment::Center);
        assert_eq!(ctx.change_id(), 1);
    }
}
