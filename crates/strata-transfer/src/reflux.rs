//! Conservative flux correction at coarse-fine interfaces.
//!
//! After all fine sub-steps of a coarse step have produced face fluxes,
//! the coarse flux through a coarse face lying on a coarse-fine boundary
//! disagrees with the sum of the fine fluxes through the same face.
//! [`RefluxEngine`] repairs this in two phases:
//!
//! 1. [`compute_correction_fluxes`](RefluxEngine::compute_correction_fluxes)
//!    overwrites each such coarse face flux with the correction
//!    `(s_c F_c + w s_f sum F_f) / denominator`.
//! 2. [`apply_correction_fluxes`](RefluxEngine::apply_correction_fluxes)
//!    adds the stored correction to the coarse cell just outside the fine
//!    patch.
//!
//! Both phases act on the New snapshot and must run in that order, once
//! per coarse step.
//!
//! # Signs
//!
//! Fluxes are net amounts in the `+axis` direction. On the low face of a
//! fine patch `(s_c, s_f) = (+1, -1)`; on the high face `(-1, +1)`.

use std::fmt;

use log::{debug, trace};
use strata_core::{Axis, Face, IntVector, LabelId, LevelIndex, MaterialIndex, PatchId, Vector3};
use strata_grid::mapper::{self, RefluxInterface};
use strata_grid::{GridQuery, Level, Patch};
use strata_store::{CellField, DataWarehouse, StoredValue, ValueType, VarRegistry};

use crate::config::TransferConfig;
use crate::error::TransferError;
use crate::model::{self, names, ModelRegistry, QuantityKind, RefluxQuantity};

/// Where a [`RefluxEngine`] is in its per-step cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefluxPhase {
    /// Nothing computed yet.
    Idle,
    /// Corrections written into the coarse face fluxes, not yet applied.
    Computed,
    /// Corrections added to the coarse cells.
    Applied,
}

impl fmt::Display for RefluxPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Computed => f.write_str("computed"),
            Self::Applied => f.write_str("applied"),
        }
    }
}

/// `(s_c, s_f)` for an interface on `face` of the fine patch.
fn signs(face: Face) -> (f64, f64) {
    if face.is_plus() {
        (-1.0, 1.0)
    } else {
        (1.0, -1.0)
    }
}

/// One face of one fine patch bordering a coarse patch, with the coarse
/// cells that take a correction.
#[derive(Clone, Debug)]
struct FineInterface {
    fine: PatchId,
    itf: RefluxInterface,
    cells: Vec<IntVector>,
}

/// A reflux quantity with its three face flux labels resolved.
struct Resolved<'m> {
    quantity: &'m RefluxQuantity,
    fluxes: [LabelId; 3],
}

impl Resolved<'_> {
    fn flux(&self, axis: Axis) -> LabelId {
        self.fluxes[axis.index()]
    }
}

/// Per-cell denominator of the correction for one quantity kind.
enum Denominator<'d> {
    Volume(f64),
    Mass {
        volume: f64,
        density: &'d CellField<f64>,
    },
    HeatCapacity {
        volume: f64,
        density: &'d CellField<f64>,
        specific_heat: &'d CellField<f64>,
    },
}

impl Denominator<'_> {
    fn at(&self, c: IntVector) -> f64 {
        match self {
            Self::Volume(v) => *v,
            Self::Mass { volume, density } => density[c] * volume,
            Self::HeatCapacity {
                volume,
                density,
                specific_heat,
            } => density[c] * volume * specific_heat[c],
        }
    }
}

/// Level-wide constants of one compute pass.
#[derive(Clone, Copy)]
struct Pass {
    ratio: IntVector,
    weight: f64,
    volume: f64,
}

/// Two-phase conservative reflux.
///
/// Borrows the grid, the variable registry and the model registry, and
/// tracks its own [`RefluxPhase`]. One engine serves one coarse level per
/// step.
pub struct RefluxEngine<'a> {
    grid: &'a dyn GridQuery,
    vars: &'a VarRegistry,
    models: &'a ModelRegistry,
    config: TransferConfig,
    phase: RefluxPhase,
}

impl<'a> RefluxEngine<'a> {
    /// Create an engine in the `Idle` phase. Fails if `config` is invalid.
    pub fn new(
        grid: &'a dyn GridQuery,
        vars: &'a VarRegistry,
        models: &'a ModelRegistry,
        config: TransferConfig,
    ) -> Result<Self, TransferError> {
        config.validate()?;
        Ok(Self {
            grid,
            vars,
            models,
            config,
            phase: RefluxPhase::Idle,
        })
    }

    /// Current phase.
    pub fn phase(&self) -> RefluxPhase {
        self.phase
    }

    /// Phase 1: replace every coarse face flux on a coarse-fine interface
    /// of `coarse_level` with its correction.
    ///
    /// `dw` is the New snapshot. It must hold, for every material in each
    /// quantity's mask, the three face fluxes on the coarse and fine
    /// patches, and the coarse density (and specific heat, for internal
    /// energy). All fluxes of a coarse patch are read before any is
    /// overwritten.
    pub fn compute_correction_fluxes(
        &mut self,
        dw: &mut DataWarehouse,
        coarse_level: LevelIndex,
    ) -> Result<(), TransferError> {
        if self.phase == RefluxPhase::Computed {
            return Err(TransferError::PhaseOrder {
                operation: "compute_correction_fluxes",
                phase: self.phase,
            });
        }
        let resolved = self.resolve()?;
        let level = self.grid.level(coarse_level)?;
        if let Some(fine) = self.grid.finer_level(coarse_level) {
            let pass = Pass {
                ratio: fine.ratio(),
                weight: self.config.flux_weighting.weight(fine.ratio()),
                volume: level.cell_volume(),
            };
            for &pid in level.patch_ids() {
                let coarse = self.grid.patch(pid)?;
                let interfaces = self.interfaces(coarse, fine)?;
                if interfaces.is_empty() {
                    continue;
                }
                for r in &resolved {
                    for m in &r.quantity.materials {
                        let itfs = &interfaces;
                        let n = match r.quantity.value_type {
                            ValueType::Scalar => {
                                self.correct_patch::<f64>(dw, r, m, pid, itfs, pass)?
                            }
                            ValueType::Vector3 => {
                                self.correct_patch::<Vector3>(dw, r, m, pid, itfs, pass)?
                            }
                        };
                        if self.config.diagnostics.summary() {
                            debug!(
                                "reflux compute: patch {pid} level {coarse_level} '{}' material {m}: {n} faces",
                                r.quantity.name
                            );
                        }
                    }
                }
            }
        }
        self.phase = RefluxPhase::Computed;
        Ok(())
    }

    /// Phase 2: add the stored corrections to the target cell quantities
    /// of `coarse_level`.
    ///
    /// Fails with `PhaseOrder` unless phase 1 ran since the last apply.
    pub fn apply_correction_fluxes(
        &mut self,
        dw: &mut DataWarehouse,
        coarse_level: LevelIndex,
    ) -> Result<(), TransferError> {
        if self.phase != RefluxPhase::Computed {
            return Err(TransferError::PhaseOrder {
                operation: "apply_correction_fluxes",
                phase: self.phase,
            });
        }
        let resolved = self.resolve()?;
        let level = self.grid.level(coarse_level)?;
        if let Some(fine) = self.grid.finer_level(coarse_level) {
            for &pid in level.patch_ids() {
                let coarse = self.grid.patch(pid)?;
                let interfaces = self.interfaces(coarse, fine)?;
                if interfaces.is_empty() {
                    continue;
                }
                for r in &resolved {
                    for m in &r.quantity.materials {
                        let itfs = &interfaces;
                        let n = match r.quantity.value_type {
                            ValueType::Scalar => apply_patch::<f64>(dw, r, m, pid, itfs)?,
                            ValueType::Vector3 => apply_patch::<Vector3>(dw, r, m, pid, itfs)?,
                        };
                        if self.config.diagnostics.summary() {
                            debug!(
                                "reflux apply: patch {pid} level {coarse_level} '{}' material {m}: {n} cells",
                                r.quantity.name
                            );
                        }
                    }
                }
            }
        }
        self.phase = RefluxPhase::Applied;
        Ok(())
    }

    /// Look up the face flux labels of every reflux quantity.
    fn resolve(&self) -> Result<Vec<Resolved<'a>>, TransferError> {
        let models: &'a ModelRegistry = self.models;
        let needs = |k: QuantityKind| models.reflux_quantities().iter().any(|q| q.kind == k);
        let needs_density = needs(QuantityKind::Other) || needs(QuantityKind::InternalEnergy);
        if models.density().is_none() && needs_density {
            return Err(TransferError::UnknownVariable {
                name: names::DENSITY.to_string(),
            });
        }
        if models.specific_heat().is_none() && needs(QuantityKind::InternalEnergy) {
            return Err(TransferError::UnknownVariable {
                name: names::SPECIFIC_HEAT.to_string(),
            });
        }

        models
            .reflux_quantities()
            .iter()
            .map(|q| {
                let expected = model::flux_names(&q.name);
                match expected.each_ref().map(|n| self.vars.find(n)) {
                    [Some(x), Some(y), Some(z)] => Ok(Resolved {
                        quantity: q,
                        fluxes: [x, y, z],
                    }),
                    _ => Err(TransferError::MissingFluxRegistration { expected }),
                }
            })
            .collect()
    }

    /// Interfaces between `coarse` and the fine patches bordering it. A
    /// fine patch need not overlie `coarse` to border it. Coarse cells
    /// under some fine patch are dropped.
    fn interfaces(
        &self,
        coarse: &Patch,
        fine: &Level,
    ) -> Result<Vec<FineInterface>, TransferError> {
        let ratio = fine.ratio();
        let mut out = Vec::new();
        for &fid in fine.patch_ids() {
            let fp = self.grid.patch(fid)?;
            for face in fp.coarse_fine_faces() {
                let (ci, fi) = (coarse.interior(), fp.interior());
                let Some(itf) = mapper::reflux_coarse_level_iterator(face, &ci, &fi, ratio) else {
                    continue;
                };
                let mut cells = Vec::with_capacity(itf.coarse_cells.cell_count());
                for c in itf.coarse_cells.cells() {
                    if !self.grid.is_covered_by_finer(coarse.level(), c)? {
                        cells.push(c);
                    }
                }
                if self.config.diagnostics.detailed() {
                    trace!(
                        "reflux interface: coarse patch {} / fine patch {} face {face}: {} of {} cells",
                        coarse.id(),
                        fp.id(),
                        cells.len(),
                        itf.coarse_cells.cell_count()
                    );
                }
                if !cells.is_empty() {
                    out.push(FineInterface {
                        fine: fp.id(),
                        itf,
                        cells,
                    });
                }
            }
        }
        Ok(out)
    }

    fn denominator<'d>(
        &self,
        dw: &'d DataWarehouse,
        kind: QuantityKind,
        material: MaterialIndex,
        patch: PatchId,
        volume: f64,
    ) -> Result<Denominator<'d>, TransferError> {
        type Field<'f> = Result<&'f CellField<f64>, TransferError>;
        let field = |label: Option<LabelId>, name: &str| -> Field<'d> {
            let label = label.ok_or_else(|| TransferError::UnknownVariable {
                name: name.to_string(),
            })?;
            Ok(dw.get::<f64>(label, material, patch)?)
        };
        Ok(match kind {
            QuantityKind::Mass => Denominator::Volume(volume),
            QuantityKind::Other => Denominator::Mass {
                volume,
                density: field(self.models.density(), names::DENSITY)?,
            },
            QuantityKind::InternalEnergy => Denominator::HeatCapacity {
                volume,
                density: field(self.models.density(), names::DENSITY)?,
                specific_heat: field(self.models.specific_heat(), names::SPECIFIC_HEAT)?,
            },
        })
    }

    fn correct_patch<T: StoredValue>(
        &self,
        dw: &mut DataWarehouse,
        r: &Resolved<'_>,
        material: MaterialIndex,
        coarse: PatchId,
        interfaces: &[FineInterface],
        pass: Pass,
    ) -> Result<usize, TransferError> {
        let mut updates: Vec<(Axis, IntVector, T)> = Vec::new();
        {
            let den = self.denominator(dw, r.quantity.kind, material, coarse, pass.volume)?;
            for fi in interfaces {
                let axis = fi.itf.face.axis();
                let coarse_flux = dw.get_face::<T>(r.flux(axis), material, coarse)?;
                let fine_flux = dw.get_face::<T>(r.flux(axis), material, fi.fine)?;
                let (s_c, s_f) = signs(fi.itf.face);
                for &c in &fi.cells {
                    let cf = fi.itf.coarse_face_of(c);
                    let fine_sum = fine_flux.sum_over(&fi.itf.fine_faces(c, pass.ratio));
                    let num = coarse_flux[cf] * s_c + fine_sum * (pass.weight * s_f);
                    updates.push((axis, cf, num * den.at(c).recip()));
                }
            }
        }
        for axis in Axis::ALL {
            if !updates.iter().any(|(a, _, _)| *a == axis) {
                continue;
            }
            let field = dw.get_face_modifiable::<T>(r.flux(axis), material, coarse)?;
            for &(_, cf, v) in updates.iter().filter(|(a, _, _)| *a == axis) {
                field[cf] = v;
            }
        }
        Ok(updates.len())
    }
}

fn apply_patch<T: StoredValue>(
    dw: &mut DataWarehouse,
    r: &Resolved<'_>,
    material: MaterialIndex,
    coarse: PatchId,
    interfaces: &[FineInterface],
) -> Result<usize, TransferError> {
    let mut adds: Vec<(IntVector, T)> = Vec::new();
    for fi in interfaces {
        let flux = dw.get_face::<T>(r.flux(fi.itf.face.axis()), material, coarse)?;
        for &c in &fi.cells {
            adds.push((c, flux[fi.itf.coarse_face_of(c)]));
        }
    }
    let target = dw.get_modifiable::<T>(r.quantity.target, material, coarse)?;
    for &(c, v) in &adds {
        target[c] += v;
    }
    Ok(adds.len())
}
