//! Error types for hierarchy construction and grid queries.

use std::fmt;

use strata_core::{IntVector, LevelIndex, PatchId};

use crate::cell_box::CellBox;

/// Errors arising from hierarchy construction or grid queries.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A patch or domain box contains no cells.
    EmptyBox {
        /// The offending box.
        bx: CellBox,
    },
    /// A refinement ratio component is zero or negative.
    InvalidRatio {
        /// The offending ratio.
        ratio: IntVector,
    },
    /// Mesh spacing is not finite and positive on every axis.
    InvalidSpacing {
        /// The offending spacing.
        dx: [f64; 3],
    },
    /// A level index beyond the finest level.
    UnknownLevel {
        /// The requested level.
        level: LevelIndex,
    },
    /// A patch id not present in the hierarchy.
    UnknownPatch {
        /// The requested patch.
        patch: PatchId,
    },
    /// A patch extends past the physical domain of its level.
    OutsideDomain {
        /// The patch box.
        bx: CellBox,
        /// The level domain.
        domain: CellBox,
    },
    /// A fine patch corner does not fall on a coarse cell boundary.
    MisalignedPatch {
        /// Level of the patch.
        level: LevelIndex,
        /// The patch box.
        bx: CellBox,
        /// Ratio to the parent level.
        ratio: IntVector,
    },
    /// Two patches on the same level share cells.
    OverlappingPatches {
        /// Level containing both patches.
        level: LevelIndex,
        /// First patch box.
        a: CellBox,
        /// Second patch box.
        b: CellBox,
    },
    /// A fine patch (grown by the nesting buffer) is not covered by the
    /// patches of its parent level.
    ImproperNesting {
        /// Level of the fine patch.
        level: LevelIndex,
        /// The fine patch box.
        bx: CellBox,
    },
    /// The root level patches do not tile the whole domain.
    RootNotCovering {
        /// Cells in the domain.
        domain_cells: usize,
        /// Cells covered by root patches.
        covered_cells: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBox { bx } => write!(f, "box {bx} contains no cells"),
            Self::InvalidRatio { ratio } => {
                write!(f, "refinement ratio {ratio} must be positive on every axis")
            }
            Self::InvalidSpacing { dx } => {
                write!(f, "mesh spacing {dx:?} must be finite and positive")
            }
            Self::UnknownLevel { level } => write!(f, "level {level} does not exist"),
            Self::UnknownPatch { patch } => write!(f, "patch {patch} does not exist"),
            Self::OutsideDomain { bx, domain } => {
                write!(f, "patch {bx} extends outside domain {domain}")
            }
            Self::MisalignedPatch { level, bx, ratio } => write!(
                f,
                "patch {bx} on level {level} is not aligned to refinement ratio {ratio}"
            ),
            Self::OverlappingPatches { level, a, b } => {
                write!(f, "patches {a} and {b} overlap on level {level}")
            }
            Self::ImproperNesting { level, bx } => {
                write!(f, "patch {bx} on level {level} is not nested in its parent level")
            }
            Self::RootNotCovering {
                domain_cells,
                covered_cells,
            } => write!(
                f,
                "root patches cover {covered_cells} of {domain_cells} domain cells"
            ),
        }
    }
}

impl std::error::Error for GridError {}
