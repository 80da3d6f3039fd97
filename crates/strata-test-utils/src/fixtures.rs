//! Reusable hierarchies.
//!
//! All use a root domain `[0,8)^3` with unit spacing, so root cell `i` is
//! centred at `i + 0.5`.

use strata_core::IntVector;
use strata_grid::{CellBox, GridError, Hierarchy, HierarchyBuilder};

/// The root domain shared by every fixture.
pub fn root_domain() -> CellBox {
    CellBox::new(IntVector::ZERO, IntVector::splat(8))
}

fn iv(x: i32, y: i32, z: i32) -> IntVector {
    IntVector::new(x, y, z)
}

/// One root patch and one fine patch `[4,12)^3` at ratio 2, covering
/// root cells `[2,6)^3`. Every fine face is coarse-fine.
pub fn single_fine_patch() -> Result<Hierarchy, GridError> {
    HierarchyBuilder::new(root_domain(), [1.0; 3])
        .add_level(IntVector::splat(2), vec![CellBox::new(iv(4, 4, 4), iv(12, 12, 12))])
        .build()
}

/// Like [`single_fine_patch`] but the root is split at `x = 4`, so the
/// fine patch straddles two coarse patches.
pub fn split_root() -> Result<Hierarchy, GridError> {
    HierarchyBuilder::new(root_domain(), [1.0; 3])
        .root_patches(vec![
            CellBox::new(iv(0, 0, 0), iv(4, 8, 8)),
            CellBox::new(iv(4, 0, 0), iv(8, 8, 8)),
        ])
        .add_level(IntVector::splat(2), vec![CellBox::new(iv(4, 4, 4), iv(12, 12, 12))])
        .build()
}

/// Two fine patches at ratio 2 sharing the face `x = 8`, with root split
/// at `x = 4`. The union covers root cells `[2,6) x [2,6) x [2,6)`.
pub fn adjacent_fine_patches() -> Result<Hierarchy, GridError> {
    HierarchyBuilder::new(root_domain(), [1.0; 3])
        .root_patches(vec![
            CellBox::new(iv(0, 0, 0), iv(4, 8, 8)),
            CellBox::new(iv(4, 0, 0), iv(8, 8, 8)),
        ])
        .add_level(
            IntVector::splat(2),
            vec![
                CellBox::new(iv(4, 4, 4), iv(8, 12, 12)),
                CellBox::new(iv(8, 4, 4), iv(12, 12, 12)),
            ],
        )
        .build()
}

/// A fine patch touching the low x domain boundary, anisotropic ratio
/// `(2, 2, 1)`.
pub fn boundary_fine_patch() -> Result<Hierarchy, GridError> {
    HierarchyBuilder::new(root_domain(), [1.0; 3])
        .add_level(iv(2, 2, 1), vec![CellBox::new(iv(0, 4, 2), iv(6, 10, 6))])
        .build()
}

/// Three levels at ratio 2 under the default nesting buffer: level 1 is
/// `[2,14)^3`, level 2 is `[12,16)^3`.
pub fn three_levels() -> Result<Hierarchy, GridError> {
    HierarchyBuilder::new(root_domain(), [1.0; 3])
        .add_level(IntVector::splat(2), vec![CellBox::new(iv(2, 2, 2), iv(14, 14, 14))])
        .add_level(IntVector::splat(2), vec![CellBox::new(iv(12, 12, 12), iv(16, 16, 16))])
        .build()
}
