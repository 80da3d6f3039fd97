//! Half-open integer boxes of cells.

use std::fmt;

use strata_core::{Axis, Face, IntVector};

/// An axis-aligned box of cells `[lo, hi)`.
///
/// A box with `hi <= lo` on any axis is empty. Empty boxes are valid values
/// (intersections routinely produce them) but contain no cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellBox {
    lo: IntVector,
    hi: IntVector,
}

impl CellBox {
    /// Create the box `[lo, hi)`.
    pub fn new(lo: IntVector, hi: IntVector) -> Self {
        Self { lo, hi }
    }

    /// Box of `extent` cells starting at `lo`.
    pub fn from_extent(lo: IntVector, extent: IntVector) -> Self {
        Self::new(lo, lo + extent)
    }

    /// The single cell `c`.
    pub fn cell(c: IntVector) -> Self {
        Self::new(c, c + IntVector::ONE)
    }

    /// Inclusive low corner.
    pub fn lo(&self) -> IntVector {
        self.lo
    }

    /// Exclusive high corner.
    pub fn hi(&self) -> IntVector {
        self.hi
    }

    /// Number of cells along each axis (zero for empty axes).
    pub fn extent(&self) -> IntVector {
        (self.hi - self.lo).max(IntVector::ZERO)
    }

    /// Returns `true` if the box contains no cells.
    pub fn is_empty(&self) -> bool {
        !self.lo.all_lt(self.hi)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.extent().product() as usize
        }
    }

    /// Returns `true` if `c` lies inside the box.
    pub fn contains(&self, c: IntVector) -> bool {
        self.lo.all_le(c) && c.all_lt(self.hi)
    }

    /// Returns `true` if every cell of `other` lies inside `self`.
    /// The empty box is contained in every box.
    pub fn contains_box(&self, other: &CellBox) -> bool {
        other.is_empty() || (self.lo.all_le(other.lo) && other.hi.all_le(self.hi))
    }

    /// Intersection of two boxes, or `None` if they share no cell.
    pub fn intersect(&self, other: &CellBox) -> Option<CellBox> {
        let b = CellBox::new(self.lo.max(other.lo), self.hi.min(other.hi));
        (!b.is_empty()).then_some(b)
    }

    /// Grow by `n` cells on both sides of every axis.
    pub fn grow(&self, n: IntVector) -> CellBox {
        CellBox::new(self.lo - n, self.hi + n)
    }

    /// Grow by `n` cells on both sides of every axis.
    pub fn grow_uniform(&self, n: i32) -> CellBox {
        self.grow(IntVector::splat(n))
    }

    /// Grow by `n` cells on the given face only.
    pub fn grow_face(&self, face: Face, n: i32) -> CellBox {
        let mut b = *self;
        let axis = face.axis();
        if face.is_plus() {
            b.hi[axis] += n;
        } else {
            b.lo[axis] -= n;
        }
        b
    }

    /// Grow by `n` cells on both sides of `axis` only.
    pub fn grow_axis(&self, axis: Axis, n: i32) -> CellBox {
        self.grow_face(Face::minus(axis), n).grow_face(Face::plus(axis), n)
    }

    /// The `depth` cells just outside the given face, spanning the same
    /// tangential range as `self`.
    pub fn face_layer(&self, face: Face, depth: i32) -> CellBox {
        let axis = face.axis();
        let mut b = *self;
        if face.is_plus() {
            b.lo[axis] = self.hi[axis];
            b.hi[axis] = self.hi[axis] + depth;
        } else {
            b.hi[axis] = self.lo[axis];
            b.lo[axis] = self.lo[axis] - depth;
        }
        b
    }

    /// The `depth` cells just inside the given face.
    pub fn inner_face_layer(&self, face: Face, depth: i32) -> CellBox {
        let axis = face.axis();
        let mut b = *self;
        if face.is_plus() {
            b.lo[axis] = (self.hi[axis] - depth).max(self.lo[axis]);
        } else {
            b.hi[axis] = (self.lo[axis] + depth).min(self.hi[axis]);
        }
        b
    }

    /// Translate by `offset`.
    pub fn shift(&self, offset: IntVector) -> CellBox {
        CellBox::new(self.lo + offset, self.hi + offset)
    }

    /// Row-major (x fastest) position of `c` within the box.
    ///
    /// The caller guarantees `self.contains(c)`.
    pub fn linear_index(&self, c: IntVector) -> usize {
        let e = self.extent();
        let d = c - self.lo;
        let (ex, ey) = (e.x() as usize, e.y() as usize);
        d.x() as usize + ex * (d.y() as usize + ey * d.z() as usize)
    }

    /// Iterate over the cells in row-major (x fastest) order.
    pub fn cells(&self) -> CellIter {
        CellIter {
            bx: *self,
            cur: self.lo,
            done: self.is_empty(),
        }
    }
}

impl fmt::Display for CellBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.lo, self.hi)
    }
}

impl IntoIterator for CellBox {
    type Item = IntVector;
    type IntoIter = CellIter;

    fn into_iter(self) -> CellIter {
        self.cells()
    }
}

/// Iterator over the cells of a [`CellBox`], x fastest.
#[derive(Clone, Debug)]
pub struct CellIter {
    bx: CellBox,
    cur: IntVector,
    done: bool,
}

impl Iterator for CellIter {
    type Item = IntVector;

    fn next(&mut self) -> Option<IntVector> {
        if self.done {
            return None;
        }
        let out = self.cur;
        for axis in Axis::ALL {
            self.cur[axis] += 1;
            if self.cur[axis] < self.bx.hi[axis] {
                return Some(out);
            }
            self.cur[axis] = self.bx.lo[axis];
        }
        self.done = true;
        Some(out)
    }
}
