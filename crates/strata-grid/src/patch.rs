//! Patches and the classification of their faces.

use smallvec::SmallVec;
use strata_core::{Axis, Face, IntVector, LevelIndex, PatchId};

use crate::cell_box::CellBox;

/// What lies on the other side of a patch face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceKind {
    /// The face is fully shared with patches on the same level.
    Neighbor,
    /// At least part of the face borders the next coarser level.
    CoarseFine,
    /// The face lies on the physical domain boundary.
    Domain,
}

/// Which cells next to a patch face to select.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceCellMode {
    /// The innermost interior layer touching the face.
    Interior,
    /// `depth` ghost layers outside the face, same tangential extent as the
    /// patch.
    Ghost {
        /// Number of layers.
        depth: u32,
    },
    /// `depth` ghost layers outside the face, extended tangentially by
    /// `depth` so edge and corner ghost cells are included.
    GhostPlusEdges {
        /// Number of layers.
        depth: u32,
    },
}

/// A box of cells on one level.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    pub(crate) id: PatchId,
    pub(crate) level: LevelIndex,
    pub(crate) interior: CellBox,
    pub(crate) faces: [FaceKind; 6],
}

impl Patch {
    /// Hierarchy-unique id.
    pub fn id(&self) -> PatchId {
        self.id
    }

    /// Level the patch lives on.
    pub fn level(&self) -> LevelIndex {
        self.level
    }

    /// Interior cells, without ghosts.
    pub fn interior(&self) -> CellBox {
        self.interior
    }

    /// Low corner of the interior.
    pub fn low_index(&self) -> IntVector {
        self.interior.lo()
    }

    /// High (exclusive) corner of the interior.
    pub fn high_index(&self) -> IntVector {
        self.interior.hi()
    }

    /// Boundary classification of `face`.
    pub fn face_kind(&self, face: Face) -> FaceKind {
        self.faces[face.index()]
    }

    /// Faces bordering the next coarser level.
    pub fn coarse_fine_faces(&self) -> SmallVec<[Face; 6]> {
        Face::ALL
            .into_iter()
            .filter(|&f| self.face_kind(f) == FaceKind::CoarseFine)
            .collect()
    }

    /// Per axis, whether the low face is shared with a same-level patch.
    pub fn neighbors_low(&self) -> [bool; 3] {
        Axis::ALL.map(|a| self.face_kind(Face::minus(a)) == FaceKind::Neighbor)
    }

    /// Per axis, whether the high face is shared with a same-level patch.
    pub fn neighbors_high(&self) -> [bool; 3] {
        Axis::ALL.map(|a| self.face_kind(Face::plus(a)) == FaceKind::Neighbor)
    }

    /// Sides not shared with a same-level neighbour, indexed by
    /// [`Face::index`].
    pub fn non_neighbor_sides(&self) -> [bool; 6] {
        self.faces.map(|k| k != FaceKind::Neighbor)
    }

    /// Cells adjacent to `face` selected by `mode`.
    pub fn face_cells(&self, face: Face, mode: FaceCellMode) -> CellBox {
        match mode {
            FaceCellMode::Interior => self.interior.inner_face_layer(face, 1),
            FaceCellMode::Ghost { depth } => self.interior.face_layer(face, depth as i32),
            FaceCellMode::GhostPlusEdges { depth } => {
                let mut layer = self.interior.face_layer(face, depth as i32);
                for axis in face.axis().tangential() {
                    layer = layer.grow_axis(axis, depth as i32);
                }
                layer
            }
        }
    }

    /// Interior grown by `ghost` cells on every side.
    pub fn with_ghost(&self, ghost: u32) -> CellBox {
        self.interior.grow_uniform(ghost as i32)
    }
}
