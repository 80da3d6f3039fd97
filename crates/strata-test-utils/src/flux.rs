//! Seeded random face fluxes for conservation tests.
//!
//! Fluxes are generated once per level over the whole level domain and
//! then copied into each patch, so two patches sharing a face see the same
//! value. Faces on the physical domain boundary carry zero flux, which
//! makes the composite integral of the transported quantity invariant
//! under a conservative update.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_core::{Axis, CellValue, IntVector, LabelId, LevelIndex, MaterialIndex};
use strata_grid::{GridQuery, Level};
use strata_store::{DataWarehouse, FaceField, StoreError, StoredValue};

/// Deterministic generator of level-wide face fluxes in
/// `[-amplitude, amplitude]`.
pub struct FluxGenerator {
    rng: ChaCha8Rng,
    amplitude: f64,
}

impl FluxGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            amplitude: 1.0,
        }
    }

    /// Set the flux magnitude bound (default 1).
    pub fn amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Faces normal to `axis` over the whole domain of `level`.
    pub fn level_fluxes(&mut self, level: &Level, axis: Axis) -> FaceField<f64> {
        self.level_fluxes_of(level, axis)
    }

    /// [`level_fluxes`](Self::level_fluxes) for any value type, each
    /// component drawn independently.
    pub fn level_fluxes_of<T: CellValue>(&mut self, level: &Level, axis: Axis) -> FaceField<T> {
        let domain = level.domain();
        let mut field = FaceField::for_cells(axis, &domain, T::zero());
        let lo = domain.lo()[axis];
        let hi = domain.hi()[axis];
        let a = self.amplitude;
        for f in field.region().cells() {
            if f[axis] != lo && f[axis] != hi {
                field[f] = T::from_components(|_| self.rng.random_range(-a..=a));
            }
        }
        field
    }

    /// Generate fluxes on every axis of `level` and store each patch's
    /// share under `labels` (indexed by axis).
    pub fn scatter(
        &mut self,
        dw: &mut DataWarehouse,
        grid: &dyn GridQuery,
        labels: [LabelId; 3],
        material: MaterialIndex,
        level: LevelIndex,
    ) -> Result<(), StoreError> {
        self.scatter_of::<f64>(dw, grid, labels, material, level)
    }

    /// [`scatter`](Self::scatter) for any stored value type.
    pub fn scatter_of<T: StoredValue>(
        &mut self,
        dw: &mut DataWarehouse,
        grid: &dyn GridQuery,
        labels: [LabelId; 3],
        material: MaterialIndex,
        level: LevelIndex,
    ) -> Result<(), StoreError> {
        let lvl = grid.level(level)?;
        for axis in Axis::ALL {
            let global = self.level_fluxes_of::<T>(lvl, axis);
            for &id in lvl.patch_ids() {
                let p = grid.patch(id)?;
                let mut local = FaceField::for_cells(axis, &p.interior(), T::zero());
                for f in local.region().cells() {
                    local[f] = global[f];
                }
                dw.put_face(labels[axis.index()], material, p, local)?;
            }
        }
        Ok(())
    }
}

/// Finite-volume update `q += (F_lo - F_hi) / volume` on every interior
/// cell of `level`, with the face fluxes stored under `fluxes`.
pub fn apply_divergence(
    dw: &mut DataWarehouse,
    grid: &dyn GridQuery,
    target: LabelId,
    fluxes: [LabelId; 3],
    material: MaterialIndex,
    level: LevelIndex,
) -> Result<(), StoreError> {
    apply_weighted_divergence::<f64>(dw, grid, target, fluxes, material, level, &[])
}

/// Finite-volume update `q += (F_lo - F_hi) / (volume * w_1 * .. * w_n)`,
/// where `weights` name scalar cell fields on the same patches (density,
/// specific heat). With no weights this is [`apply_divergence`].
pub fn apply_weighted_divergence<T: StoredValue>(
    dw: &mut DataWarehouse,
    grid: &dyn GridQuery,
    target: LabelId,
    fluxes: [LabelId; 3],
    material: MaterialIndex,
    level: LevelIndex,
    weights: &[LabelId],
) -> Result<(), StoreError> {
    let lvl = grid.level(level)?;
    let volume = lvl.cell_volume();
    for &id in lvl.patch_ids() {
        let interior = grid.patch(id)?.interior();
        let mut delta = Vec::with_capacity(interior.cell_count());
        for c in interior.cells() {
            let mut d = T::zero();
            for axis in Axis::ALL {
                let flux = dw.get_face::<T>(fluxes[axis.index()], material, id)?;
                d += flux[c] - flux[c + IntVector::unit(axis)];
            }
            let mut capacity = volume;
            for &w in weights {
                capacity *= dw.get::<f64>(w, material, id)?[c];
            }
            delta.push((c, d * capacity.recip()));
        }
        let q = dw.get_modifiable::<T>(target, material, id)?;
        for (c, d) in delta {
            q[c] += d;
        }
    }
    Ok(())
}
