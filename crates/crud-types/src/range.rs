use std::fmt;

use serde::{Deserialize, Serialize};

/// Positional window `[start, end)` over an ordered result set.
///
/// Positions count matching entries in result order starting at zero.
/// `end == 0` means "no upper bound", so `KeyRange::new(0, 0)` selects
/// everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRange {
    pub start: u64,
    pub end: u64,
}

impl KeyRange {
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// The unbounded range.
    pub const fn all() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    /// A bounded range must not end before it starts.
    pub fn is_valid(&self) -> bool {
        self.end == 0 || self.start <= self.end
    }

    /// Returns `true` if position `pos` falls inside the window.
    pub fn contains(&self, pos: u64) -> bool {
        pos >= self.start && (self.end == 0 || pos < self.end)
    }

    /// Keep only the items whose position falls inside the window.
    pub fn apply<T, I: IntoIterator<Item = T>>(&self, items: I) -> Vec<T> {
        // Offsets past `usize::MAX` saturate.
        let skip = usize::try_from(self.start).unwrap_or(usize::MAX);
        let iter = items.into_iter().skip(skip);
        if self.end == 0 {
            iter.collect()
        } else {
            let take = usize::try_from(self.end.saturating_sub(self.start)).unwrap_or(usize::MAX);
            iter.take(take).collect()
        }
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.end == 0 {
            write!(f, "[{}, ..)", self.start)
        } else {
            write!(f, "[{}, {})", self.start, self.end)
        }
    }
}
