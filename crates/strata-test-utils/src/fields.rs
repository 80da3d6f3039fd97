//! Analytic fields and level integrals.

use strata_core::{LabelId, LevelIndex, MaterialIndex};
use strata_grid::GridQuery;
use strata_store::{CellField, DataWarehouse, StoreError, StoredValue};

/// `a + g . x`.
pub fn linear(a: f64, g: [f64; 3]) -> impl Fn([f64; 3]) -> f64 + Copy {
    move |x| a + g[0] * x[0] + g[1] * x[1] + g[2] * x[2]
}

/// Store, for every patch on `level`, a field over the interior plus
/// `ghost` layers holding `f` evaluated at each cell centre. Ghost cells
/// are evaluated too, so they hold the exact analytic value.
pub fn fill_level<T: StoredValue>(
    dw: &mut DataWarehouse,
    grid: &dyn GridQuery,
    label: LabelId,
    material: MaterialIndex,
    level: LevelIndex,
    ghost: u32,
    f: impl Fn([f64; 3]) -> T,
) -> Result<(), StoreError> {
    let lvl = grid.level(level)?;
    for &id in lvl.patch_ids() {
        let p = grid.patch(id)?;
        let field = CellField::from_fn(p.with_ghost(ghost), |c| f(lvl.cell_center(c)));
        dw.put(label, material, p, field)?;
    }
    Ok(())
}

/// Sum of `value * cell volume` over the interiors of `level`'s patches,
/// skipping cells covered by the next finer level.
pub fn level_integral(
    dw: &DataWarehouse,
    grid: &dyn GridQuery,
    label: LabelId,
    material: MaterialIndex,
    level: LevelIndex,
) -> Result<f64, StoreError> {
    weighted_level_integral::<f64>(dw, grid, label, material, level, &[])
}

/// [`level_integral`] with each cell value also multiplied by the scalar
/// cell fields `weights` (density for momentum, density and specific heat
/// for temperature).
pub fn weighted_level_integral<T: StoredValue>(
    dw: &DataWarehouse,
    grid: &dyn GridQuery,
    label: LabelId,
    material: MaterialIndex,
    level: LevelIndex,
    weights: &[LabelId],
) -> Result<T, StoreError> {
    let lvl = grid.level(level)?;
    let mut total = T::zero();
    for &id in lvl.patch_ids() {
        let field = dw.get::<T>(label, material, id)?;
        let factors = weights
            .iter()
            .map(|&w| dw.get::<f64>(w, material, id))
            .collect::<Result<Vec<_>, _>>()?;
        for c in grid.patch(id)?.interior().cells() {
            if !grid.is_covered_by_finer(level, c)? {
                let w: f64 = factors.iter().map(|f| f[c]).product();
                total += field[c] * w;
            }
        }
    }
    Ok(total * lvl.cell_volume())
}

/// [`level_integral`] summed over every level of the hierarchy.
pub fn composite_integral(
    dw: &DataWarehouse,
    grid: &dyn GridQuery,
    label: LabelId,
    material: MaterialIndex,
) -> Result<f64, StoreError> {
    weighted_composite_integral::<f64>(dw, grid, label, material, &[])
}

/// [`weighted_level_integral`] summed over every level of the hierarchy.
pub fn weighted_composite_integral<T: StoredValue>(
    dw: &DataWarehouse,
    grid: &dyn GridQuery,
    label: LabelId,
    material: MaterialIndex,
    weights: &[LabelId],
) -> Result<T, StoreError> {
    let mut total = T::zero();
    for l in 0..grid.num_levels() {
        let level = LevelIndex(l as u32);
        total += weighted_level_integral::<T>(dw, grid, label, material, level, weights)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use strata_store::{ValueType, VarKind, VarRegistry};

    #[test]
    fn linear_evaluates_affine_function() {
        let f = linear(1.0, [2.0, 0.0, -1.0]);
        assert_eq!(f([0.5, 7.0, 0.5]), 1.5);
    }

    #[test]
    fn composite_integral_of_constant_is_domain_volume() {
        let h = fixtures::split_root().unwrap();
        let mut vars = VarRegistry::new();
        let rho = vars.register("density", VarKind::Cell, ValueType::Scalar).unwrap();
        let mut dw = DataWarehouse::new();
        for l in [LevelIndex::ROOT, LevelIndex(1)] {
            fill_level(&mut dw, &h, rho, MaterialIndex(0), l, 1, |_| 2.0).unwrap();
        }
        let total = composite_integral(&dw, &h, rho, MaterialIndex(0)).unwrap();
        assert!((total - 2.0 * 512.0).abs() < 1e-9);
    }
}
