//! Benchmark profiles for the Strata transfer core.
//!
//! - [`reference_profile`]: 32^3 root with two adjacent fine patches at
//!   ratio 2 (64K cells in all)
//! - [`stress_profile`]: 64^3 root with a 2x2x2 block of fine patches
//!   (~500K cells)
//!
//! Each [`Profile`] registers the built-in hydrodynamic model and can
//! produce a ready-to-run [`WarehousePair`] with [`Profile::state`].

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_core::{CellValue, IntVector, LevelIndex, MaterialSet, Vector3};
use strata_grid::{CellBox, GridQuery, Hierarchy, HierarchyBuilder};
use strata_store::{CellField, DataWarehouse, ValueType, VarRegistry, WarehousePair};
use strata_transfer::{ModelRegistry, Prolongation, TransferConfig, TransferError};

/// A hierarchy with its registered variables.
pub struct Profile {
    pub grid: Hierarchy,
    pub vars: VarRegistry,
    /// The built-in hydrodynamic model over the profile's materials.
    pub models: ModelRegistry,
}

/// Build a reference profile: root `[0,32)^3`, fine patches
/// `[16,32) x [16,48)^2` and `[32,48) x [16,48)^2`.
pub fn reference_profile(materials: u32) -> Result<Profile, TransferError> {
    let fine = vec![
        CellBox::new(IntVector::new(16, 16, 16), IntVector::new(32, 48, 48)),
        CellBox::new(IntVector::new(32, 16, 16), IntVector::new(48, 48, 48)),
    ];
    build(32, fine, materials)
}

/// Build a stress profile: root `[0,64)^3` split in eight, fine level a
/// 2x2x2 block of `32^3` patches over root cells `[16,48)^3`.
pub fn stress_profile(materials: u32) -> Result<Profile, TransferError> {
    let mut fine = Vec::with_capacity(8);
    for i in 0..8 {
        let lo = IntVector::new(32 + 32 * (i & 1), 32 + 32 * ((i >> 1) & 1), 32 + 32 * (i >> 2));
        fine.push(CellBox::from_extent(lo, IntVector::splat(32)));
    }
    build(64, fine, materials)
}

fn build(n: i32, fine: Vec<CellBox>, materials: u32) -> Result<Profile, TransferError> {
    let domain = CellBox::new(IntVector::ZERO, IntVector::splat(n));
    let half = n / 2;
    let mut roots = Vec::with_capacity(8);
    for i in 0..8 {
        let lo = IntVector::new(half * (i & 1), half * ((i >> 1) & 1), half * (i >> 2));
        roots.push(CellBox::from_extent(lo, IntVector::splat(half)));
    }
    let grid = HierarchyBuilder::new(domain, [1.0 / f64::from(n); 3])
        .root_patches(roots)
        .add_level(IntVector::splat(2), fine)
        .build()?;
    let mut vars = VarRegistry::new();
    let models = ModelRegistry::hydro(&mut vars, &MaterialSet::first_n(materials))?;
    Ok(Profile { grid, vars, models })
}

/// Smooth profile used for every scalar variable.
pub fn profile_value(x: [f64; 3]) -> f64 {
    1.0 + 0.5 * (x[0] - 0.5) * (x[1] - 0.25) + 0.1 * x[2]
}

impl Profile {
    /// Root state in both snapshots and fine patches prolonged from it
    /// in New, each with `ghost` ghost layers.
    pub fn state(&self, config: TransferConfig) -> Result<WarehousePair, TransferError> {
        let mut dw = DataWarehouse::new();
        let root = self.grid.level(LevelIndex::ROOT)?;
        for var in self.models.transported() {
            for m in &var.materials {
                for &id in root.patch_ids() {
                    let p = self.grid.patch(id)?;
                    match var.value_type {
                        ValueType::Scalar => {
                            let f = CellField::from_fn(p.interior(), |c| {
                                profile_value(root.cell_center(c))
                            });
                            dw.put(var.label, m, p, f)?;
                        }
                        ValueType::Vector3 => {
                            let f = CellField::from_fn(p.interior(), |c| {
                                Vector3::splat(profile_value(root.cell_center(c)))
                            });
                            dw.put(var.label, m, p, f)?;
                        }
                    }
                }
            }
        }
        let old = dw.clone();
        let prolong = Prolongation::new(&self.grid, &self.vars, config)?;
        prolong.prolong_level(&mut dw, &self.models, LevelIndex(1))?;
        Ok(WarehousePair::from_parts(old, dw))
    }

    /// Total cells over both levels.
    pub fn cell_count(&self) -> usize {
        self.grid.patches().iter().map(|p| p.interior().cell_count()).sum()
    }
}
