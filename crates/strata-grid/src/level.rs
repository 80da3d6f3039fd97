//! One refinement level of the hierarchy.

use strata_core::{Axis, IntVector, LevelIndex, PatchId};

use crate::cell_box::CellBox;

/// A uniformly spaced grid level.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub(crate) index: LevelIndex,
    pub(crate) dx: [f64; 3],
    pub(crate) ratio: IntVector,
    pub(crate) domain: CellBox,
    pub(crate) patches: Vec<PatchId>,
}

impl Level {
    /// Position of this level in the hierarchy (0 is coarsest).
    pub fn index(&self) -> LevelIndex {
        self.index
    }

    /// Cell spacing along each axis.
    pub fn dx(&self) -> [f64; 3] {
        self.dx
    }

    /// Refinement ratio relative to the next coarser level; all ones for
    /// the root.
    pub fn ratio(&self) -> IntVector {
        self.ratio
    }

    /// The physical domain expressed in this level's cell indices.
    pub fn domain(&self) -> CellBox {
        self.domain
    }

    /// Patches on this level, in construction order.
    pub fn patch_ids(&self) -> &[PatchId] {
        &self.patches
    }

    /// Volume of one cell.
    pub fn cell_volume(&self) -> f64 {
        self.dx[0] * self.dx[1] * self.dx[2]
    }

    /// Physical position of the center of cell `c`.
    pub fn cell_center(&self, c: IntVector) -> [f64; 3] {
        Axis::ALL.map(|a| (f64::from(c[a]) + 0.5) * self.dx[a.index()])
    }
}
