//! Pure index arithmetic relating coarse and fine cells.
//!
//! Everything here is integer math on [`IntVector`] and [`CellBox`]; none of
//! it can fail. Division rounds toward negative infinity so ghost indices
//! below zero map to the correct parent.

use strata_core::{Axis, Face, IntVector};

use crate::cell_box::CellBox;

/// Parent cell of `fine` under refinement ratio `ratio`.
pub fn coarse_of(fine: IntVector, ratio: IntVector) -> IntVector {
    fine.div_floor(ratio)
}

/// The fine cells `[c * r, (c + 1) * r)` covered by coarse cell `coarse`.
pub fn fine_range_of(coarse: IntVector, ratio: IntVector) -> CellBox {
    CellBox::new(coarse * ratio, (coarse + IntVector::ONE) * ratio)
}

/// Outward unit normal of `face`.
pub fn face_offset(face: Face) -> IntVector {
    face.outward_normal()
}

/// Smallest coarse box whose refinement covers `fine`.
pub fn coarse_box_of(fine: &CellBox, ratio: IntVector) -> CellBox {
    if fine.is_empty() {
        return CellBox::new(coarse_of(fine.lo(), ratio), coarse_of(fine.lo(), ratio));
    }
    CellBox::new(
        coarse_of(fine.lo(), ratio),
        coarse_of(fine.hi() - IntVector::ONE, ratio) + IntVector::ONE,
    )
}

/// Fine cells covered by `coarse`.
pub fn refine_box(coarse: &CellBox, ratio: IntVector) -> CellBox {
    CellBox::new(coarse.lo() * ratio, coarse.hi() * ratio)
}

/// `true` if both corners of `fine` lie on coarse cell boundaries.
pub fn is_aligned(fine: &CellBox, ratio: IntVector) -> bool {
    Axis::ALL.iter().all(|&a| {
        fine.lo()[a].rem_euclid(ratio[a]) == 0 && fine.hi()[a].rem_euclid(ratio[a]) == 0
    })
}

/// Position of a fine cell center relative to its parent's center.
///
/// Per axis the signed distance is `(2 (f - c r) + 1 - r) / (2 r)` in units
/// of the coarse spacing, held as an exact numerator over `2 r` so the sign
/// (and exact zero for odd ratios) is decided without rounding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentOffset {
    parent: IntVector,
    numer: IntVector,
    denom: IntVector,
}

impl ParentOffset {
    /// The parent coarse cell.
    pub fn parent(&self) -> IntVector {
        self.parent
    }

    /// Signed distance along `axis` in coarse cell widths, in `(-0.5, 0.5)`.
    pub fn distance(&self, axis: Axis) -> f64 {
        f64::from(self.numer[axis]) / f64::from(self.denom[axis])
    }

    /// Signed distances along all three axes.
    pub fn distances(&self) -> [f64; 3] {
        Axis::ALL.map(|a| self.distance(a))
    }

    /// Direction of the neighbouring coarse cell used by the stencil:
    /// the sign of the distance, or zero where the distance is exactly zero.
    pub fn stencil_offset(&self) -> IntVector {
        IntVector(self.numer.0.map(i32::signum))
    }
}

/// Exact offset of `fine` from the center of its parent cell.
pub fn fine_offset_in_parent(fine: IntVector, ratio: IntVector) -> ParentOffset {
    let parent = coarse_of(fine, ratio);
    let local = fine - parent * ratio;
    ParentOffset {
        parent,
        numer: local * 2 + IntVector::ONE - ratio,
        denom: ratio * 2,
    }
}

/// Coarse cells an interpolation stencil needs to fill `fine_range`, the
/// ghost layer outside `face` of a fine patch.
///
/// The coarse cover of the range is extended one coarse cell further away
/// from the fine patch along the face normal, and one coarse cell on every
/// tangential side flagged in `tangential_cf` (indexed by [`Face::index`]),
/// which marks sides that are not shared with a same-level neighbour.
pub fn expanded_coarse_footprint(
    fine_range: &CellBox,
    face: Face,
    ratio: IntVector,
    tangential_cf: [bool; 6],
) -> CellBox {
    let mut footprint = coarse_box_of(fine_range, ratio).grow_face(face, 1);
    for axis in face.axis().tangential() {
        for side in [Face::minus(axis), Face::plus(axis)] {
            if tangential_cf[side.index()] {
                footprint = footprint.grow_face(side, 1);
            }
        }
    }
    footprint
}

/// The coarse cells bordering one face of a fine patch, with the offsets
/// that locate the shared coarse-fine faces.
///
/// For a coarse cell `c` in `coarse_cells`, the interface face has coarse
/// face index `c + coarse_fc_offset`. For a fine cell `f` just inside the
/// fine patch, the matching fine face index is `f + fine_fc_offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefluxInterface {
    /// Face of the fine patch this interface lies on.
    pub face: Face,
    /// Coarse cells just outside the fine patch, clipped to the coarse patch.
    pub coarse_cells: CellBox,
    /// Inward unit vector for "-" faces, zero for "+" faces.
    pub coarse_fc_offset: IntVector,
    /// Inward unit vector for "+" faces, zero for "-" faces.
    pub fine_fc_offset: IntVector,
}

impl RefluxInterface {
    /// Coarse face index shared with the fine patch for coarse cell `c`.
    pub fn coarse_face_of(&self, c: IntVector) -> IntVector {
        c + self.coarse_fc_offset
    }

    /// Fine faces covering the interface face of coarse cell `c`.
    pub fn fine_faces(&self, c: IntVector, ratio: IntVector) -> CellBox {
        fine_faces_under(self.coarse_face_of(c), self.face.axis(), ratio)
    }
}

/// Interface cells of `coarse_patch` along `face` of `fine_patch`.
///
/// Returns `None` when the fine patch's face does not border any cell of
/// the coarse patch. The caller still has to skip coarse cells that are
/// themselves covered by some fine patch.
pub fn reflux_coarse_level_iterator(
    face: Face,
    coarse_patch: &CellBox,
    fine_patch: &CellBox,
    ratio: IntVector,
) -> Option<RefluxInterface> {
    let layer = coarse_box_of(fine_patch, ratio).face_layer(face, 1);
    let coarse_cells = layer.intersect(coarse_patch)?;
    let inward = IntVector::unit(face.axis());
    let (coarse_fc_offset, fine_fc_offset) = if face.is_plus() {
        (IntVector::ZERO, inward)
    } else {
        (inward, IntVector::ZERO)
    };
    Some(RefluxInterface {
        face,
        coarse_cells,
        coarse_fc_offset,
        fine_fc_offset,
    })
}

/// Fine face indices along `axis` lying under coarse face `coarse_face`.
///
/// The result is a single layer: the axis component is fixed at
/// `coarse_face[axis] * ratio[axis]` and the tangential range is the fine
/// refinement of the coarse face.
pub fn fine_faces_under(coarse_face: IntVector, axis: Axis, ratio: IntVector) -> CellBox {
    let cover = fine_range_of(coarse_face, ratio);
    let mut lo = cover.lo();
    let mut hi = cover.hi();
    lo[axis] = coarse_face[axis] * ratio[axis];
    hi[axis] = lo[axis] + 1;
    CellBox::new(lo, hi)
}
