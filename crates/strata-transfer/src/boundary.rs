//! Ghost filling on coarse-fine faces.
//!
//! A fine patch's ghost cells outside a coarse-fine face have no
//! same-level owner. [`CoarseFineBoundaryFiller`] interpolates them from
//! the coarser level, blending the coarse Old and New snapshots by the
//! fine sub-step's [`SubCycleProgress`].

use log::{debug, trace};
use strata_core::{
    CellValue, Face, IntVector, LabelId, LevelIndex, MaterialIndex, PatchId, Snapshot,
    SubCycleProgress, Vector3,
};
use strata_grid::mapper;
use strata_grid::{CellBox, FaceCellMode, GridQuery, Patch};
use strata_store::{CellField, StoredValue, ValueType, VarRegistry, WarehousePair};

use crate::config::TransferConfig;
use crate::error::TransferError;
use crate::interp::StencilInterpolator;
use crate::model::ModelRegistry;
use crate::validate::FillGuard;

/// Which coarse snapshots a fill reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TemporalSource {
    /// Old only.
    Old,
    /// New only.
    New,
    /// `(1 - p) * old + p * new`.
    Blend(f64),
}

impl TemporalSource {
    /// Choose the source for `progress`, snapping to a single snapshot
    /// within `epsilon` of either end.
    pub fn select(progress: SubCycleProgress, epsilon: f64) -> Self {
        let p = progress.value();
        if p < epsilon {
            Self::Old
        } else if p > 1.0 - epsilon {
            Self::New
        } else {
            Self::Blend(p)
        }
    }
}

/// Fills coarse-fine ghost layers of fine patches.
///
/// Coarse values are read from both snapshots of the pair through
/// region gathering; the filled fine field lives in the New snapshot.
pub struct CoarseFineBoundaryFiller<'a> {
    grid: &'a dyn GridQuery,
    vars: &'a VarRegistry,
    config: TransferConfig,
    interp: StencilInterpolator,
}

impl<'a> CoarseFineBoundaryFiller<'a> {
    /// Create a filler. Fails if `config` is invalid.
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

    /// The active configuration.
    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Cells filled outside `face` of `patch`: `boundary_ghost` layers,
    /// extended tangentially to include edges and corners.
    pub fn fill_range(&self, patch: &Patch, face: Face) -> CellBox {
        patch.face_cells(
            face,
            FaceCellMode::GhostPlusEdges {
                depth: self.config.boundary_ghost,
            },
        )
    }

    /// Coarse cells gathered to fill `face` of `patch`.
    pub fn coarse_fetch_region(&self, patch: &Patch, face: Face, ratio: IntVector) -> CellBox {
        let range = self.fill_range(patch, face);
        mapper::expanded_coarse_footprint(&range, face, ratio, patch.non_neighbor_sides())
            .grow_uniform(self.interp.required_ghost() as i32)
    }

    /// Fill every coarse-fine ghost layer of variable `label` on `patch`.
    ///
    /// The fine field must already be stored in the New snapshot with
    /// room for `boundary_ghost` layers. Returns the number of cells
    /// written; a root-level patch has no coarse-fine faces and gets zero.
    pub fn fill<T: StoredValue>(
        &self,
        pair: &mut WarehousePair,
        label: LabelId,
        material: MaterialIndex,
        patch: PatchId,
        progress: SubCycleProgress,
    ) -> Result<usize, TransferError> {
        let p = self.grid.patch(patch)?;
        let faces = p.coarse_fine_faces();
        let Some(coarse_level) = p.level().coarser() else {
            return Ok(0);
        };
        if faces.is_empty() {
            return Ok(0);
        }
        let ratio = self.grid.refinement_ratio(p.level())?;
        let source = TemporalSource::select(progress, self.config.progress_epsilon);
        let variable = self.vars.name(label);
        let allocated = pair.snapshot(Snapshot::New).get::<T>(label, material, patch)?.region();

        // Every face is interpolated before anything is written.
        let mut pieces: Vec<CellField<T>> = Vec::with_capacity(faces.len());
        for &face in &faces {
            let range = self.fill_range(p, face);
            if !allocated.contains_box(&range) {
                return Err(TransferError::InsufficientGhost {
                    patch,
                    variable: variable.to_string(),
                    required: range,
                    allocated,
                });
            }
            let fetch = self.coarse_fetch_region(p, face, ratio);
            let gather = |snapshot: Snapshot| {
                pair.snapshot(snapshot)
                    .get_region::<T>(self.grid, label, material, coarse_level, &fetch)
            };
            let at = |snapshot: Snapshot| -> Result<CellField<T>, TransferError> {
                Ok(self.interp.interpolate(&gather(snapshot)?, ratio, &range))
            };
            let piece = match source {
                TemporalSource::Old => at(Snapshot::Old)?,
                TemporalSource::New => at(Snapshot::New)?,
                TemporalSource::Blend(t) => blend(&at(Snapshot::Old)?, &at(Snapshot::New)?, t),
            };
            if self.config.diagnostics.detailed() {
                trace!(
                    "cf fill: patch {patch} face {face} '{variable}' material {material}: {} cells from coarse {fetch}",
                    range.cell_count()
                );
            }
            pieces.push(piece);
        }

        let field = pair
            .snapshot_mut(Snapshot::New)
            .get_modifiable::<T>(label, material, patch)?;
        let mut written = 0;
        for piece in &pieces {
            let mut guard = FillGuard::new(&mut *field, piece.region(), self.config.validation);
            for (c, v) in piece.iter() {
                guard.write(c, v);
            }
            guard.finish().map_err(|cell| TransferError::UninitializedValue {
                cell,
                patch,
                level: p.level(),
                variable: variable.to_string(),
            })?;
            written += piece.region().cell_count();
        }

        if self.config.diagnostics.summary() {
            debug!(
                "cf fill: patch {patch} level {} '{variable}' material {material} at {progress} ({source:?}): {} faces, {written} cells",
                p.level(),
                faces.len()
            );
        }
        Ok(written)
    }

    /// Fill every transported variable of `models` on `patch`, for each
    /// material in the variable's mask.
    pub fn fill_registered(
        &self,
        pair: &mut WarehousePair,
        models: &ModelRegistry,
        patch: PatchId,
        progress: SubCycleProgress,
    ) -> Result<usize, TransferError> {
        let mut written = 0;
        for var in models.transported() {
            for m in &var.materials {
                let (label, p) = (var.label, progress);
                written += match var.value_type {
                    ValueType::Scalar => self.fill::<f64>(pair, label, m, patch, p)?,
                    ValueType::Vector3 => self.fill::<Vector3>(pair, label, m, patch, p)?,
                };
            }
        }
        Ok(written)
    }

    /// [`fill_registered`](Self::fill_registered) on every patch of `level`.
    pub fn fill_level(
        &self,
        pair: &mut WarehousePair,
        models: &ModelRegistry,
        level: LevelIndex,
        progress: SubCycleProgress,
    ) -> Result<usize, TransferError> {
        let mut written = 0;
        for &id in self.grid.level(level)?.patch_ids() {
            written += self.fill_registered(pair, models, id, progress)?;
        }
        Ok(written)
    }
}

/// Cell-wise `(1 - t) * old + t * new` over matching regions.
fn blend<T: CellValue>(old: &CellField<T>, new: &CellField<T>, t: f64) -> CellField<T> {
    CellField::from_fn(old.region(), |c| old[c] * (1.0 - t) + new[c] * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InterpolationOrder, Validation};
    use strata_core::Axis;
    use strata_grid::{FaceKind, Hierarchy, HierarchyBuilder};
    use strata_store::{DataWarehouse, VarKind};

    const M0: MaterialIndex = MaterialIndex(0);
    const FINE: PatchId = PatchId(1);

    fn iv(x: i32, y: i32, z: i32) -> IntVector {
        IntVector::new(x, y, z)
    }

    /// Root `[0,8)^3`, unit spacing; fine `[4,12)^3` at ratio 2.
    fn grid() -> Hierarchy {
        HierarchyBuilder::new(CellBox::new(IntVector::ZERO, IntVector::splat(8)), [1.0; 3])
            .add_level(IntVector::splat(2), vec![CellBox::new(iv(4, 4, 4), iv(12, 12, 12))])
            .build()
            .unwrap()
    }

    fn lin(p: [f64; 3]) -> f64 {
        1.0 + 2.0 * p[0] - p[1] + 0.5 * p[2]
    }

    /// Root field `scale * lin(center)`, fine field zero with one ghost.
    fn warehouse(h: &Hierarchy, rho: LabelId, scale: f64) -> DataWarehouse {
        let mut dw = DataWarehouse::new();
        let root = h.level(LevelIndex::ROOT).unwrap();
        let coarse = h.patch(PatchId(0)).unwrap();
        let f = CellField::from_fn(coarse.interior(), |c| scale * lin(root.cell_center(c)));
        dw.put(rho, M0, coarse, f).unwrap();
        dw.allocate_and_put(rho, M0, h.patch(FINE).unwrap(), 1, 0.0).unwrap();
        dw
    }

    fn setup() -> (Hierarchy, VarRegistry, LabelId) {
        let mut vars = VarRegistry::new();
        let rho = vars.register("density", VarKind::Cell, ValueType::Scalar).unwrap();
        (grid(), vars, rho)
    }

    #[test]
    fn temporal_source_snaps_near_ends() {
        let at = |p| TemporalSource::select(SubCycleProgress::new(p).unwrap(), 1e-10);
        assert_eq!(at(0.0), TemporalSource::Old);
        assert_eq!(at(1e-12), TemporalSource::Old);
        assert_eq!(at(1.0 - 1e-12), TemporalSource::New);
        assert_eq!(at(0.25), TemporalSource::Blend(0.25));
    }

    #[test]
    fn fill_reproduces_linear_field_in_every_ghost() {
        let (h, vars, rho) = setup();
        let mut pair = WarehousePair::from_parts(warehouse(&h, rho, 1.0), warehouse(&h, rho, 1.0));
        let filler = CoarseFineBoundaryFiller::new(&h, &vars, TransferConfig::default()).unwrap();
        let n = filler
            .fill::<f64>(&mut pair, rho, M0, FINE, SubCycleProgress::new(0.5).unwrap())
            .unwrap();
        assert!(n > 0);

        let fine = h.level(LevelIndex(1)).unwrap();
        let field = pair.snapshot(Snapshot::New).get::<f64>(rho, M0, FINE).unwrap();
        let interior = h.patch(FINE).unwrap().interior();
        for c in field.region().cells().filter(|&c| !interior.contains(c)) {
            assert!((field[c] - lin(fine.cell_center(c))).abs() < 1e-12, "ghost {c}");
        }
        // Interior untouched.
        assert_eq!(field[iv(6, 6, 6)], 0.0);
    }

    #[test]
    fn blend_is_linear_in_progress() {
        let (h, vars, rho) = setup();
        let filler = CoarseFineBoundaryFiller::new(&h, &vars, TransferConfig::default()).unwrap();
        let ghost = iv(3, 7, 8);
        let at = |p: f64| {
            let mut pair = WarehousePair::from_parts(warehouse(&h, rho, 1.0), warehouse(&h, rho, 3.0));
            filler
                .fill::<f64>(&mut pair, rho, M0, FINE, SubCycleProgress::new(p).unwrap())
                .unwrap();
            pair.snapshot(Snapshot::New).get::<f64>(rho, M0, FINE).unwrap()[ghost]
        };
        let (v0, v1, vq) = (at(0.0), at(1.0), at(0.25));
        assert!((vq - (0.75 * v0 + 0.25 * v1)).abs() < 1e-12);
        assert!((v1 - 3.0 * v0).abs() < 1e-12);
    }

    #[test]
    fn quadratic_fill_with_two_ghosts() {
        let (h, vars, rho) = setup();
        let make = || {
            let mut dw = warehouse(&h, rho, 1.0);
            dw.allocate_and_put(rho, M0, h.patch(FINE).unwrap(), 2, 0.0).unwrap();
            dw
        };
        let mut pair = WarehousePair::from_parts(make(), make());
        let config = TransferConfig {
            interpolation: InterpolationOrder::Quadratic,
            boundary_ghost: 2,
            validation: Validation::InitializedMask,
            ..TransferConfig::default()
        };
        let filler = CoarseFineBoundaryFiller::new(&h, &vars, config).unwrap();
        filler
            .fill::<f64>(&mut pair, rho, M0, FINE, SubCycleProgress::END)
            .unwrap();
        let fine = h.level(LevelIndex(1)).unwrap();
        let field = pair.snapshot(Snapshot::New).get::<f64>(rho, M0, FINE).unwrap();
        let c = iv(2, 2, 2);
        assert!((field[c] - lin(fine.cell_center(c))).abs() < 1e-12);
    }

    #[test]
    fn narrow_field_is_rejected() {
        let (h, vars, rho) = setup();
        let mut pair = WarehousePair::from_parts(warehouse(&h, rho, 1.0), warehouse(&h, rho, 1.0));
        let config = TransferConfig {
            boundary_ghost: 2,
            ..TransferConfig::default()
        };
        let filler = CoarseFineBoundaryFiller::new(&h, &vars, config).unwrap();
        let err = filler
            .fill::<f64>(&mut pair, rho, M0, FINE, SubCycleProgress::START)
            .unwrap_err();
        assert!(matches!(err, TransferError::InsufficientGhost { patch: FINE, .. }));
    }

    #[test]
    fn root_patch_has_nothing_to_fill() {
        let (h, vars, rho) = setup();
        let mut pair = WarehousePair::from_parts(warehouse(&h, rho, 1.0), warehouse(&h, rho, 1.0));
        let filler = CoarseFineBoundaryFiller::new(&h, &vars, TransferConfig::default()).unwrap();
        assert_eq!(
            filler.fill::<f64>(&mut pair, rho, M0, PatchId(0), SubCycleProgress::START),
            Ok(0)
        );
    }

    #[test]
    fn fetch_region_grows_footprint_by_stencil() {
        let (h, vars, _) = setup();
        let filler = CoarseFineBoundaryFiller::new(&h, &vars, TransferConfig::default()).unwrap();
        let p = h.patch(FINE).unwrap();
        // x- ghost layer [3,4) x [3,13)^2 -> coarse [1,2) x [1,7)^2, pushed
        // out one cell along -x and on all four tangential sides, then grown
        // by the trilinear ghost width.
        assert_eq!(filler.fill_range(p, Face::XMinus), CellBox::new(iv(3, 3, 3), iv(4, 13, 13)));
        assert_eq!(
            filler.coarse_fetch_region(p, Face::XMinus, IntVector::splat(2)),
            CellBox::new(iv(-1, -1, -1), iv(3, 9, 9))
        );
        assert_eq!(p.face_kind(Face::minus(Axis::Y)), FaceKind::CoarseFine);
    }

    #[test]
    fn vector_fields_fill_per_component() {
        let mut vars = VarRegistry::new();
        let vel = vars.register("velocity", VarKind::Cell, ValueType::Vector3).unwrap();
        let h = grid();
        let make = || {
            let mut dw = DataWarehouse::new();
            let root = h.level(LevelIndex::ROOT).unwrap();
            let coarse = h.patch(PatchId(0)).unwrap();
            let f = CellField::from_fn(coarse.interior(), |c| {
                let x = root.cell_center(c);
                Vector3::new(lin(x), -lin(x), 2.0)
            });
            dw.put(vel, M0, coarse, f).unwrap();
            dw.allocate_and_put(vel, M0, h.patch(FINE).unwrap(), 1, Vector3::splat(0.0))
                .unwrap();
            dw
        };
        let mut pair = WarehousePair::from_parts(make(), make());
        let filler = CoarseFineBoundaryFiller::new(&h, &vars, TransferConfig::default()).unwrap();
        filler
            .fill::<Vector3>(&mut pair, vel, M0, FINE, SubCycleProgress::START)
            .unwrap();
        let fine = h.level(LevelIndex(1)).unwrap();
        let c = iv(12, 5, 6);
        let x = fine.cell_center(c);
        let got = pair.snapshot(Snapshot::New).get::<Vector3>(vel, M0, FINE).unwrap()[c];
        assert!(got.max_abs_diff(&Vector3::new(lin(x), -lin(x), 2.0)) < 1e-12);
    }
}
