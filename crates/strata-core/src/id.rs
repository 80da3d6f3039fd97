//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a level in the grid hierarchy.
///
/// Level 0 is the coarsest (root) level; each successive index is one
/// refinement step finer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelIndex(pub u32);

impl LevelIndex {
    /// The root level.
    pub const ROOT: Self = Self(0);

    /// The next coarser level, or `None` for the root.
    pub fn coarser(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    /// The next finer level.
    pub fn finer(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for LevelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl From<u32> for LevelIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a patch within a hierarchy.
///
/// Patch IDs are unique across all levels of one hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatchId(pub u32);

impl fmt::Display for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PatchId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a material. Every field instance is tagged with one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialIndex(pub u32);

impl fmt::Display for MaterialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MaterialIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a registered variable label.
///
/// Labels are registered once with a variable registry; `LabelId(n)` is
/// the n-th registered label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub u32);

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LabelId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_navigation() {
        assert_eq!(LevelIndex::ROOT.coarser(), None);
        assert_eq!(LevelIndex(2).coarser(), Some(LevelIndex(1)));
        assert_eq!(LevelIndex(1).finer(), LevelIndex(2));
    }

    #[test]
    fn display_forms() {
        assert_eq!(LevelIndex(3).to_string(), "L3");
        assert_eq!(PatchId(7).to_string(), "7");
        assert_eq!(MaterialIndex::from(2).to_string(), "2");
    }
}
