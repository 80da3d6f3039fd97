//! Time-snapshot tags and sub-cycle progress.

use std::fmt;

/// Which of the two time snapshots of a coarse level a field belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Snapshot {
    /// State at the start of the current coarse step.
    Old,
    /// State at the end of the current coarse step (being computed).
    New,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Old => f.write_str("old"),
            Self::New => f.write_str("new"),
        }
    }
}

/// How far a fine sub-step lies between the coarse Old and New snapshots.
///
/// Always finite and within `[0, 1]`; construction rejects anything else.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct SubCycleProgress(f64);

impl SubCycleProgress {
    /// Fine time coincides with the coarse Old snapshot.
    pub const START: Self = Self(0.0);
    /// Fine time coincides with the coarse New snapshot.
    pub const END: Self = Self(1.0);

    /// Wrap a progress fraction. Returns `None` if `p` is not a finite
    /// value in `[0, 1]`.
    pub fn new(p: f64) -> Option<Self> {
        (p.is_finite() && (0.0..=1.0).contains(&p)).then_some(Self(p))
    }

    /// Progress of `fine_time` between the coarse Old and New times.
    ///
    /// Returns `None` when the coarse interval is empty or `fine_time`
    /// falls outside it.
    pub fn from_times(fine_time: f64, coarse_old_time: f64, coarse_new_time: f64) -> Option<Self> {
        let span = coarse_new_time - coarse_old_time;
        if !(span.is_finite() && span > 0.0) {
            return None;
        }
        Self::new((fine_time - coarse_old_time) / span)
    }

    /// The raw fraction.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for SubCycleProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}
