//! Dense cell- and face-centered field arrays.

use std::ops::{Index, IndexMut};

use strata_core::{Axis, CellValue, IntVector};
use strata_grid::CellBox;

/// Values of type `T` on every cell of a box, x fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct CellField<T> {
    region: CellBox,
    data: Vec<T>,
}

impl<T: CellValue> CellField<T> {
    /// A field over `region` with every cell set to `fill`.
    pub fn new(region: CellBox, fill: T) -> Self {
        Self {
            region,
            data: vec![fill; region.cell_count()],
        }
    }

    /// A field over `region` with cell `c` set to `f(c)`.
    pub fn from_fn(region: CellBox, mut f: impl FnMut(IntVector) -> T) -> Self {
        Self {
            region,
            data: region.cells().map(&mut f).collect(),
        }
    }

    /// The cells this field stores.
    pub fn region(&self) -> CellBox {
        self.region
    }

    /// Value at `c`, or `None` outside the region.
    pub fn get(&self, c: IntVector) -> Option<T> {
        self.region
            .contains(c)
            .then(|| self.data[self.region.linear_index(c)])
    }

    /// Overwrite the value at `c`. Returns `false` (and writes nothing)
    /// outside the region.
    pub fn set(&mut self, c: IntVector, v: T) -> bool {
        if !self.region.contains(c) {
            return false;
        }
        let i = self.region.linear_index(c);
        self.data[i] = v;
        true
    }

    /// Set every cell to `v`.
    pub fn fill(&mut self, v: T) {
        self.data.fill(v);
    }

    /// Set every cell of `bx` that lies inside the region to `v`.
    pub fn fill_box(&mut self, bx: &CellBox, v: T) {
        if let Some(overlap) = self.region.intersect(bx) {
            for c in overlap.cells() {
                self[c] = v;
            }
        }
    }

    /// Copy `src` into `self` wherever both regions overlap. Returns the
    /// overlap, if any.
    pub fn copy_from(&mut self, src: &CellField<T>) -> Option<CellBox> {
        let overlap = self.region.intersect(&src.region)?;
        for c in overlap.cells() {
            self[c] = src[c];
        }
        Some(overlap)
    }

    /// Copy the cells of `bx` from `src` into `self`. `bx` must lie in
    /// both regions.
    pub fn copy_box(&mut self, src: &CellField<T>, bx: &CellBox) {
        for c in bx.cells() {
            self[c] = src[c];
        }
    }

    /// Raw values in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over `(cell, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (IntVector, T)> + '_ {
        self.region.cells().zip(self.data.iter().copied())
    }
}

impl<T: CellValue> Index<IntVector> for CellField<T> {
    type Output = T;

    fn index(&self, c: IntVector) -> &T {
        debug_assert!(self.region.contains(c), "cell {c} outside field region {}", self.region);
        &self.data[self.region.linear_index(c)]
    }
}

impl<T: CellValue> IndexMut<IntVector> for CellField<T> {
    fn index_mut(&mut self, c: IntVector) -> &mut T {
        debug_assert!(self.region.contains(c), "cell {c} outside field region {}", self.region);
        let i = self.region.linear_index(c);
        &mut self.data[i]
    }
}

/// Face-centered values normal to one axis.
///
/// Face index `i` along `axis` is the low face of cell `i`, so a patch with
/// interior `[lo, hi)` has faces `[lo, hi + e_axis)`. Each value is the net
/// amount transported through the face in the `+axis` direction.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceField<T> {
    axis: Axis,
    faces: CellField<T>,
}

impl<T: CellValue> FaceField<T> {
    /// Faces normal to `axis` bounding the cells of `interior`, set to `fill`.
    pub fn for_cells(axis: Axis, interior: &CellBox, fill: T) -> Self {
        let faces = CellBox::new(interior.lo(), interior.hi() + IntVector::unit(axis));
        Self {
            axis,
            faces: CellField::new(faces, fill),
        }
    }

    /// Normal axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The face indices stored.
    pub fn region(&self) -> CellBox {
        self.faces.region()
    }

    /// Value at face `f`, or `None` outside the region.
    pub fn get(&self, f: IntVector) -> Option<T> {
        self.faces.get(f)
    }

    /// Overwrite the value at face `f`; `false` outside the region.
    pub fn set(&mut self, f: IntVector, v: T) -> bool {
        self.faces.set(f, v)
    }

    /// Set every face to `v`.
    pub fn fill(&mut self, v: T) {
        self.faces.fill(v);
    }

    /// Sum over the faces of `bx` (clipped to the region).
    pub fn sum_over(&self, bx: &CellBox) -> T {
        let mut total = T::zero();
        if let Some(overlap) = self.faces.region().intersect(bx) {
            for f in overlap.cells() {
                total += self.faces[f];
            }
        }
        total
    }
}

impl<T: CellValue> Index<IntVector> for FaceField<T> {
    type Output = T;

    fn index(&self, f: IntVector) -> &T {
        &self.faces[f]
    }
}

impl<T: CellValue> IndexMut<IntVector> for FaceField<T> {
    fn index_mut(&mut self, f: IntVector) -> &mut T {
        &mut self.faces[f]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Vector3;

    fn bx(lo: [i32; 3], hi: [i32; 3]) -> CellBox {
        CellBox::new(IntVector(lo), IntVector(hi))
    }

    #[test]
    fn get_set_outside_region() {
        let mut f = CellField::new(bx([0, 0, 0], [2, 2, 2]), 1.0);
        assert_eq!(f.get(IntVector::new(1, 1, 1)), Some(1.0));
        assert_eq!(f.get(IntVector::new(2, 0, 0)), None);
        assert!(!f.set(IntVector::new(-1, 0, 0), 5.0));
        assert!(f.set(IntVector::new(0, 1, 0), 5.0));
        assert_eq!(f[IntVector::new(0, 1, 0)], 5.0);
    }

    #[test]
    fn from_fn_row_major() {
        let f = CellField::from_fn(bx([0, 0, 0], [3, 2, 1]), |c| f64::from(c.x() + 10 * c.y()));
        assert_eq!(f.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn copy_from_overlap_only() {
        let mut dst = CellField::new(bx([0, 0, 0], [4, 1, 1]), 0.0);
        let src = CellField::new(bx([2, 0, 0], [6, 1, 1]), 7.0);
        assert_eq!(dst.copy_from(&src), Some(bx([2, 0, 0], [4, 1, 1])));
        assert_eq!(dst.as_slice(), &[0.0, 0.0, 7.0, 7.0]);
    }

    #[test]
    fn face_field_extends_one_past_high() {
        let interior = bx([0, 0, 0], [4, 4, 4]);
        let f = FaceField::for_cells(Axis::Y, &interior, Vector3::splat(1.0));
        assert_eq!(f.region(), bx([0, 0, 0], [4, 5, 4]));
        assert!(f.get(IntVector::new(0, 4, 0)).is_some());
        assert!(f.get(IntVector::new(4, 0, 0)).is_none());
    }

    #[test]
    fn face_sum_clips_to_region() {
        let f = FaceField::for_cells(Axis::X, &bx([0, 0, 0], [2, 2, 2]), 0.5);
        assert_eq!(f.sum_over(&bx([2, 0, 0], [3, 2, 2])), 2.0);
        assert_eq!(f.sum_over(&bx([5, 0, 0], [6, 2, 2])), 0.0);
    }
}
