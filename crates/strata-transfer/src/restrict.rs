//! Fine-to-coarse averaging.

use log::{debug, trace};
use strata_core::{CellValue, IntVector, LabelId, LevelIndex, MaterialIndex, PatchId, Vector3};
use strata_grid::mapper;
use strata_grid::{CellBox, GridQuery};
use strata_store::{CellField, DataWarehouse, StoredValue, ValueType, VarRegistry};

use crate::config::TransferConfig;
use crate::error::TransferError;
use crate::model::ModelRegistry;

/// Arithmetic mean of `fine` over the cells of `cover`.
///
/// Accumulated as `first + sum(v - first) / n`, so a constant region
/// averages to exactly that constant whatever its size.
pub fn volume_mean<T: CellValue>(fine: &CellField<T>, cover: &CellBox) -> T {
    let mut cells = cover.cells();
    let Some(c0) = cells.next() else {
        return T::zero();
    };
    let first = fine[c0];
    let mut excess = T::zero();
    for c in cells {
        excess += fine[c] - first;
    }
    first + excess * (cover.cell_count() as f64).recip()
}

/// Replaces coarse cells under finer patches with the mean of their
/// children.
pub struct Restriction<'a> {
    grid: &'a dyn GridQuery,
    vars: &'a VarRegistry,
    config: TransferConfig,
}

impl<'a> Restriction<'a> {
    /// Create the operator. Fails if `config` is invalid.
    pub fn new(
        grid: &'a dyn GridQuery,
        vars: &'a VarRegistry,
        config: TransferConfig,
    ) -> Result<Self, TransferError> {
        config.validate()?;
        Ok(Self { grid, vars, config })
    }

    /// Average every fine patch over coarse patch `patch` into it.
    /// Returns the number of coarse cells overwritten.
    pub fn restrict_patch<T: StoredValue>(
        &self,
        dw: &mut DataWarehouse,
        label: LabelId,
        material: MaterialIndex,
        patch: PatchId,
    ) -> Result<usize, TransferError> {
        let coarse = self.grid.patch(patch)?;
        let Some(fine_level) = self.grid.finer_level(coarse.level()) else {
            return Ok(0);
        };
        let ratio = fine_level.ratio();

        let mut means: Vec<(IntVector, T)> = Vec::new();
        for fp in self.grid.fine_level_patches(patch)? {
            let cover = mapper::coarse_box_of(&fp.interior(), ratio);
            let Some(cells) = cover.intersect(&coarse.interior()) else {
                continue;
            };
            let fine = dw.get::<T>(label, material, fp.id())?;
            if self.config.diagnostics.detailed() {
                trace!("restrict: patch {patch} from fine patch {}: {cells}", fp.id());
            }
            means.extend(
                cells
                    .cells()
                    .map(|c| (c, volume_mean(fine, &mapper::fine_range_of(c, ratio)))),
            );
        }
        if means.is_empty() {
            return Ok(0);
        }

        let field = dw.get_modifiable::<T>(label, material, patch)?;
        for &(c, v) in &means {
            field[c] = v;
        }
        if self.config.diagnostics.summary() {
            debug!(
                "restrict: patch {patch} level {} '{}' material {material}: {} cells",
                coarse.level(),
                self.vars.name(label),
                means.len()
            );
        }
        Ok(means.len())
    }

    /// Restrict every transported variable of `models` into `patch`.
    pub fn restrict_registered(
        &self,
        dw: &mut DataWarehouse,
        models: &ModelRegistry,
        patch: PatchId,
    ) -> Result<usize, TransferError> {
        let mut n = 0;
        for var in models.transported() {
            for m in &var.materials {
                n += match var.value_type {
                    ValueType::Scalar => self.restrict_patch::<f64>(dw, var.label, m, patch)?,
                    ValueType::Vector3 => self.restrict_patch::<Vector3>(dw, var.label, m, patch)?,
                };
            }
        }
        Ok(n)
    }

    /// [`restrict_registered`](Self::restrict_registered) on every patch
    /// of the coarse `level`.
    pub fn restrict_level(
        &self,
        dw: &mut DataWarehouse,
        models: &ModelRegistry,
        level: LevelIndex,
    ) -> Result<usize, TransferError> {
        let mut n = 0;
        for &id in self.grid.level(level)?.patch_ids() {
            n += self.restrict_registered(dw, models, id)?;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strata_grid::{Hierarchy, HierarchyBuilder};
    use strata_store::VarKind;

    const M0: MaterialIndex = MaterialIndex(0);

    fn iv(x: i32, y: i32, z: i32) -> IntVector {
        IntVector::new(x, y, z)
    }

    fn grid(ratio: IntVector) -> Hierarchy {
        let fine = CellBox::new(iv(2, 2, 2), iv(4, 6, 4));
        HierarchyBuilder::new(CellBox::new(IntVector::ZERO, IntVector::splat(6)), [1.0; 3])
            .add_level(ratio, vec![mapper::refine_box(&fine, ratio)])
            .build()
            .unwrap()
    }

    #[test]
    fn mean_of_children() {
        let bx = CellBox::new(IntVector::ZERO, iv(2, 2, 2));
        let f = CellField::from_fn(bx, |c| f64::from(c.x() + 2 * c.y() + 4 * c.z()));
        assert_eq!(volume_mean(&f, &bx), 3.5);
    }

    #[test]
    fn restricts_only_covered_cells() {
        let r = IntVector::splat(2);
        let h = grid(r);
        let mut vars = VarRegistry::new();
        let rho = vars.register("density", VarKind::Cell, ValueType::Scalar).unwrap();
        let mut dw = DataWarehouse::new();
        dw.allocate_and_put(rho, M0, h.patch(PatchId(0)).unwrap(), 0, -1.0).unwrap();
        let fp = h.patch(PatchId(1)).unwrap();
        let f = CellField::from_fn(fp.interior(), |c| f64::from(c.x()));
        dw.put(rho, M0, fp, f).unwrap();

        let op = Restriction::new(&h, &vars, TransferConfig::default()).unwrap();
        assert_eq!(op.restrict_patch::<f64>(&mut dw, rho, M0, PatchId(0)).unwrap(), 16);
        let coarse = dw.get::<f64>(rho, M0, PatchId(0)).unwrap();
        // Children of coarse x = 2 are fine x = 4, 5.
        assert_eq!(coarse[iv(2, 3, 2)], 4.5);
        assert_eq!(coarse[iv(3, 5, 3)], 6.5);
        assert_eq!(coarse[iv(1, 3, 2)], -1.0);
    }

    #[test]
    fn vector_restriction() {
        let r = iv(1, 2, 3);
        let h = grid(r);
        let mut vars = VarRegistry::new();
        let vel = vars.register("velocity", VarKind::Cell, ValueType::Vector3).unwrap();
        let mut dw = DataWarehouse::new();
        dw.allocate_and_put(vel, M0, h.patch(PatchId(0)).unwrap(), 0, Vector3::splat(0.0))
            .unwrap();
        let fp = h.patch(PatchId(1)).unwrap();
        dw.allocate_and_put(vel, M0, fp, 0, Vector3::new(1.0, -2.0, 0.125)).unwrap();
        let op = Restriction::new(&h, &vars, TransferConfig::default()).unwrap();
        op.restrict_patch::<Vector3>(&mut dw, vel, M0, PatchId(0)).unwrap();
        let coarse = dw.get::<Vector3>(vel, M0, PatchId(0)).unwrap();
        assert_eq!(coarse[iv(3, 4, 3)], Vector3::new(1.0, -2.0, 0.125));
    }

    #[test]
    fn finest_level_restricts_nothing() {
        let h = grid(IntVector::splat(2));
        let vars = VarRegistry::new();
        let mut dw = DataWarehouse::new();
        let op = Restriction::new(&h, &vars, TransferConfig::default()).unwrap();
        assert_eq!(op.restrict_patch::<f64>(&mut dw, LabelId(0), M0, PatchId(1)), Ok(0));
    }

    proptest! {
        #[test]
        fn constants_restrict_exactly(
            v in -1.0e6f64..1.0e6,
            r in prop::array::uniform3(1i32..6),
        ) {
            let r = IntVector(r);
            let fine = CellField::new(CellBox::new(IntVector::ZERO, r), v);
            prop_assert_eq!(volume_mean(&fine, &fine.region()), v);
        }
    }
}
