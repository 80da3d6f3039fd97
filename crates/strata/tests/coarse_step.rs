//! One sub-cycled coarse step driven through every transfer operator.

use strata::prelude::*;
use strata::transfer::model::register_fluxes;
use strata_test_utils::{
    apply_divergence, composite_integral, fill_level, fixtures, level_integral, linear,
    FluxGenerator,
};

const M0: MaterialIndex = MaterialIndex(0);
const SUBSTEPS: u32 = 2;

struct Model {
    vars: VarRegistry,
    models: ModelRegistry,
    density: LabelId,
    fluxes: [LabelId; 3],
    substep_fluxes: [LabelId; 3],
}

fn model() -> Model {
    let mut vars = VarRegistry::new();
    let density = vars.register("density", VarKind::Cell, ValueType::Scalar).unwrap();
    let fluxes = register_fluxes(&mut vars, "mass", ValueType::Scalar).unwrap();
    let substep_fluxes = register_fluxes(&mut vars, "substep", ValueType::Scalar).unwrap();
    let mut models = ModelRegistry::new();
    models.add_transported(&vars, "density", MaterialSet::first_n(1)).unwrap();
    models
        .add_reflux(&vars, "mass", "density", QuantityKind::Mass, MaterialSet::first_n(1))
        .unwrap();
    Model {
        vars,
        models,
        density,
        fluxes,
        substep_fluxes,
    }
}

/// Add the substep fluxes of every fine patch into the step totals.
fn accumulate(dw: &mut DataWarehouse, grid: &Hierarchy, m: &Model) {
    for &id in grid.level(LevelIndex(1)).unwrap().patch_ids() {
        for axis in Axis::ALL {
            let step = dw.get_face::<f64>(m.substep_fluxes[axis.index()], M0, id).unwrap().clone();
            let total = dw.get_face_modifiable::<f64>(m.fluxes[axis.index()], M0, id).unwrap();
            for f in step.region().cells() {
                total[f] += step[f];
            }
        }
    }
}

#[test]
fn sub_cycled_step_conserves_mass() {
    let grid = fixtures::split_root().unwrap();
    let m = model();
    let config = TransferConfig {
        diagnostics: DiagnosticConfig {
            verbosity: Verbosity::Detailed,
        },
        ..TransferConfig::default()
    };
    let fine = LevelIndex(1);

    // Start of step: root state, fine patch prolonged from it.
    let mut new = DataWarehouse::new();
    let profile = linear(3.0, [0.1, 0.2, -0.1]);
    fill_level(&mut new, &grid, m.density, M0, LevelIndex::ROOT, 0, profile).unwrap();
    Prolongation::new(&grid, &m.vars, config)
        .unwrap()
        .prolong_level(&mut new, &m.models, fine)
        .unwrap();
    let mut pair = WarehousePair::from_parts(new.clone(), new);
    let before = composite_integral(pair.snapshot(Snapshot::New), &grid, m.density, M0).unwrap();

    // Coarse update.
    let mut generator = FluxGenerator::new(2024).amplitude(0.5);
    let dw = pair.snapshot_mut(Snapshot::New);
    generator.scatter(dw, &grid, m.fluxes, M0, LevelIndex::ROOT).unwrap();
    apply_divergence(dw, &grid, m.density, m.fluxes, M0, LevelIndex::ROOT).unwrap();
    for &id in grid.level(fine).unwrap().patch_ids() {
        let patch = grid.patch(id).unwrap();
        for axis in Axis::ALL {
            dw.allocate_and_put_face(m.fluxes[axis.index()], M0, patch, axis, 0.0).unwrap();
        }
    }

    // Fine sub-steps with ghost fills in between.
    let filler = CoarseFineBoundaryFiller::new(&grid, &m.vars, config).unwrap();
    for k in 0..SUBSTEPS {
        let progress = SubCycleProgress::new(f64::from(k) / f64::from(SUBSTEPS)).unwrap();
        assert!(filler.fill_level(&mut pair, &m.models, fine, progress).unwrap() > 0);
        let dw = pair.snapshot_mut(Snapshot::New);
        generator.scatter(dw, &grid, m.substep_fluxes, M0, fine).unwrap();
        apply_divergence(dw, &grid, m.density, m.substep_fluxes, M0, fine).unwrap();
        accumulate(dw, &grid, &m);
    }

    // End of step: average down, then reflux.
    let dw = pair.snapshot_mut(Snapshot::New);
    Restriction::new(&grid, &m.vars, config)
        .unwrap()
        .restrict_level(dw, &m.models, LevelIndex::ROOT)
        .unwrap();
    let mut reflux = RefluxEngine::new(&grid, &m.vars, &m.models, config).unwrap();
    reflux.compute_correction_fluxes(dw, LevelIndex::ROOT).unwrap();
    reflux.apply_correction_fluxes(dw, LevelIndex::ROOT).unwrap();

    let after = composite_integral(dw, &grid, m.density, M0).unwrap();
    assert!((after - before).abs() < 1e-8, "{before} -> {after}");

    // After restriction the root alone carries the composite total.
    let mut root_total = 0.0;
    for &id in grid.level(LevelIndex::ROOT).unwrap().patch_ids() {
        let f = dw.get::<f64>(m.density, M0, id).unwrap();
        root_total += grid.patch(id).unwrap().interior().cells().map(|c| f[c]).sum::<f64>();
    }
    assert!((root_total - after).abs() < 1e-8);
    assert!(level_integral(dw, &grid, m.density, M0, fine).unwrap() > 0.0);

    pair.advance();
    assert_eq!(pair.step(), 1);
}
