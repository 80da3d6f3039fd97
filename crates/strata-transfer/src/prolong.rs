//! Coarse-to-fine initialization of new fine patches.

use log::{debug, trace};
use strata_core::{LabelId, LevelIndex, MaterialIndex, PatchId, Vector3};
use strata_grid::mapper;
use strata_grid::{GridError, GridQuery};
use strata_store::{CellField, DataWarehouse, StoredValue, ValueType, VarRegistry};

use crate::config::TransferConfig;
use crate::error::TransferError;
use crate::interp::StencilInterpolator;
use crate::model::ModelRegistry;
use crate::validate::FillGuard;

/// Fills fine patch interiors by interpolating the coarser level.
pub struct Prolongation<'a> {
    grid: &'a dyn GridQuery,
    vars: &'a VarRegistry,
    config: TransferConfig,
    interp: StencilInterpolator,
}

impl<'a> Prolongation<'a> {
    /// Create the operator. Fails if `config` is invalid.
    pub fn new(
        grid: &'a dyn GridQuery,
        vars: &'a VarRegistry,
        config: TransferConfig,
    ) -> Result<Self, TransferError> {
        config.validate()?;
        let interp = StencilInterpolator::new(config.interpolation);
        Ok(Self {
            grid,
            vars,
            config,
            interp,
        })
    }

    /// Interpolate the interior of fine patch `patch` from every coarse
    /// patch under it.
    ///
    /// If `dw` holds no field for the patch, one is allocated with
    /// `boundary_ghost` ghost layers. The interior is validated after the
    /// fill; a cell no coarse patch reached is an `UninitializedValue`.
    pub fn prolong_patch<T: StoredValue>(
        &self,
        dw: &mut DataWarehouse,
        label: LabelId,
        material: MaterialIndex,
        patch: PatchId,
    ) -> Result<(), TransferError> {
        let fine = self.grid.patch(patch)?;
        let level = fine.level();
        let coarse_level = level.coarser().ok_or(GridError::UnknownLevel { level })?;
        let ratio = self.grid.refinement_ratio(level)?;
        let interior = fine.interior();

        let mut pieces: Vec<CellField<T>> = Vec::new();
        for cp in self.grid.coarse_level_patches(patch)? {
            let under = mapper::refine_box(&cp.interior(), ratio);
            let Some(overlap) = under.intersect(&interior) else {
                continue;
            };
            let fetch = self.interp.fetch_region(&overlap, ratio);
            let coarse = dw.get_region::<T>(self.grid, label, material, coarse_level, &fetch)?;
            if self.config.diagnostics.detailed() {
                trace!("prolong: patch {patch} from coarse patch {}: {overlap}", cp.id());
            }
            pieces.push(self.interp.interpolate(&coarse, ratio, &overlap));
        }

        if !dw.contains(label, material, patch) {
            dw.allocate_and_put(label, material, fine, self.config.boundary_ghost, T::zero())?;
        }
        let field = dw.get_modifiable::<T>(label, material, patch)?;
        let mut guard = FillGuard::new(field, interior, self.config.validation);
        for piece in &pieces {
            for (c, v) in piece.iter() {
                guard.write(c, v);
            }
        }
        guard.finish().map_err(|cell| TransferError::UninitializedValue {
            cell,
            patch,
            level,
            variable: self.vars.name(label).to_string(),
        })?;

        if self.config.diagnostics.summary() {
            debug!(
                "prolong: patch {patch} level {level} '{}' material {material}: {} coarse patches",
                self.vars.name(label),
                pieces.len()
            );
        }
        Ok(())
    }

    /// Prolong every transported variable of `models` onto `patch`.
    pub fn prolong_registered(
        &self,
        dw: &mut DataWarehouse,
        models: &ModelRegistry,
        patch: PatchId,
    ) -> Result<(), TransferError> {
        for var in models.transported() {
            for m in &var.materials {
                match var.value_type {
                    ValueType::Scalar => self.prolong_patch::<f64>(dw, var.label, m, patch)?,
                    ValueType::Vector3 => self.prolong_patch::<Vector3>(dw, var.label, m, patch)?,
                }
            }
        }
        Ok(())
    }

    /// [`prolong_registered`](Self::prolong_registered) on every patch of
    /// the fine `level`.
    pub fn prolong_level(
        &self,
        dw: &mut DataWarehouse,
        models: &ModelRegistry,
        level: LevelIndex,
    ) -> Result<(), TransferError> {
        for &id in self.grid.level(level)?.patch_ids() {
            self.prolong_registered(dw, models, id)?;
        }
        Ok(())
    }
}
