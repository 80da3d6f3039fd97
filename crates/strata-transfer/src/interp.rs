//! Coarse-to-fine interpolation stencils.
//!
//! Both kernels read coarse values around the parent of a fine cell and
//! perform no bounds checking beyond the coarse field's own indexing: the
//! caller fetches the coarse footprint grown by
//! [`InterpolationOrder::required_ghost`].

use strata_core::{Axis, CellValue, IntVector};
use strata_grid::mapper::{self, ParentOffset};
use strata_grid::CellBox;
use strata_store::CellField;

use crate::config::InterpolationOrder;

/// Trilinear (8-point) interpolation at fine cell `fine`.
///
/// Along each axis the stencil pairs the parent with the neighbour on the
/// side of the fine cell center. Where the fine center coincides with the
/// parent center (odd ratios) the neighbour weight is zero.
pub fn trilinear<T: CellValue>(coarse: &CellField<T>, fine: IntVector, ratio: IntVector) -> T {
    let off = mapper::fine_offset_in_parent(fine, ratio);
    trilinear_at(coarse, &off)
}

fn trilinear_at<T: CellValue>(coarse: &CellField<T>, off: &ParentOffset) -> T {
    let c = off.parent();
    let o = off.stencil_offset();
    let [x, y, z] = off.distances().map(f64::abs);

    let w0 = (1.0 - x) * (1.0 - y);
    let w1 = x * (1.0 - y);
    let w2 = y * (1.0 - x);
    let w3 = x * y;

    let ox = IntVector::new(o.x(), 0, 0);
    let oy = IntVector::new(0, o.y(), 0);
    let oz = IntVector::new(0, 0, o.z());

    let plane = |base: IntVector| -> T {
        coarse[base] * w0
            + coarse[base + ox] * w1
            + coarse[base + oy] * w2
            + coarse[base + ox + oy] * w3
    };
    plane(c) * (1.0 - z) + plane(c + oz) * z
}

/// Lagrange weights for points at -1, 0, +1 evaluated at `t`.
fn quadratic_weights(t: f64) -> [f64; 3] {
    [0.5 * t * (t - 1.0), -(t + 1.0) * (t - 1.0), 0.5 * t * (t + 1.0)]
}

/// Triquadratic (27-point) interpolation at fine cell `fine`.
pub fn triquadratic<T: CellValue>(coarse: &CellField<T>, fine: IntVector, ratio: IntVector) -> T {
    let off = mapper::fine_offset_in_parent(fine, ratio);
    triquadratic_at(coarse, &off)
}

fn triquadratic_at<T: CellValue>(coarse: &CellField<T>, off: &ParentOffset) -> T {
    let c = off.parent();
    let wx = quadratic_weights(off.distance(Axis::X));
    let wy = quadratic_weights(off.distance(Axis::Y));
    let wz = quadratic_weights(off.distance(Axis::Z));

    let mut sum = T::zero();
    for (k, &wk) in wz.iter().enumerate() {
        let mut plane = T::zero();
        for (j, &wj) in wy.iter().enumerate() {
            for (i, &wi) in wx.iter().enumerate() {
                let idx = c + IntVector::new(i as i32 - 1, j as i32 - 1, k as i32 - 1);
                plane += coarse[idx] * (wi * wj);
            }
        }
        sum += plane * wk;
    }
    sum
}

/// Interpolates fine cells from a coarse field with a fixed kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilInterpolator {
    order: InterpolationOrder,
}

impl StencilInterpolator {
    /// An interpolator using `order`.
    pub fn new(order: InterpolationOrder) -> Self {
        Self { order }
    }

    /// The kernel in use.
    pub fn order(&self) -> InterpolationOrder {
        self.order
    }

    /// Coarse ghost width needed around a footprint.
    pub fn required_ghost(&self) -> u32 {
        self.order.required_ghost()
    }

    /// Coarse cells to fetch so every cell of `fine_region` can be
    /// interpolated.
    pub fn fetch_region(&self, fine_region: &CellBox, ratio: IntVector) -> CellBox {
        mapper::coarse_box_of(fine_region, ratio).grow_uniform(self.required_ghost() as i32)
    }

    /// Value at one fine cell.
    pub fn at<T: CellValue>(&self, coarse: &CellField<T>, fine: IntVector, ratio: IntVector) -> T {
        let off = mapper::fine_offset_in_parent(fine, ratio);
        match self.order {
            InterpolationOrder::Linear => trilinear_at(coarse, &off),
            InterpolationOrder::Quadratic => triquadratic_at(coarse, &off),
        }
    }

    /// Interpolate every cell of `fine_region`, passing each result to
    /// `write`.
    pub fn for_each<T: CellValue>(
        &self,
        coarse: &CellField<T>,
        ratio: IntVector,
        fine_region: &CellBox,
        mut write: impl FnMut(IntVector, T),
    ) {
        for f in fine_region.cells() {
            write(f, self.at(coarse, f, ratio));
        }
    }

    /// Interpolate `fine_region` into a new field.
    pub fn interpolate<T: CellValue>(
        &self,
        coarse: &CellField<T>,
        ratio: IntVector,
        fine_region: &CellBox,
    ) -> CellField<T> {
        CellField::from_fn(*fine_region, |f| self.at(coarse, f, ratio))
    }
}
