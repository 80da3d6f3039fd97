//! Reflux restores conservation of the composite integral.
//!
//! Each level takes one finite-volume update with seeded random fluxes
//! that agree across shared same-level faces and vanish on the domain
//! boundary. Without reflux the coarse and fine updates disagree at
//! coarse-fine faces; with it the composite total is unchanged.
//!
//! The conserved total depends on the quantity kind: `sum(rho V)` for
//! mass, `sum(rho V u)` for momentum and `sum(rho V cv T)` for internal
//! energy.

use proptest::prelude::*;
use strata_core::{CellValue, LabelId, LevelIndex, MaterialIndex, MaterialSet, Vector3};
use strata_grid::{GridError, GridQuery, Hierarchy};
use strata_store::{DataWarehouse, StoredValue, ValueType, VarKind, VarRegistry};
use strata_test_utils::{
    apply_weighted_divergence, fill_level, fixtures, linear, weighted_composite_integral,
    FluxGenerator,
};
use strata_transfer::model::register_fluxes;
use strata_transfer::{ModelRegistry, QuantityKind, RefluxEngine, TransferConfig};

const M0: MaterialIndex = MaterialIndex(0);

/// One reflux quantity with everything its update and integral read.
struct Conserved {
    vars: VarRegistry,
    models: ModelRegistry,
    target: LabelId,
    fluxes: [LabelId; 3],
    density: LabelId,
    specific_heat: LabelId,
    /// Cell fields multiplying the target in the conserved total.
    weights: Vec<LabelId>,
}

fn conserved(flux: &str, target: &str, value_type: ValueType, kind: QuantityKind) -> Conserved {
    let mut vars = VarRegistry::new();
    let density = vars.register("density", VarKind::Cell, ValueType::Scalar).unwrap();
    let specific_heat = vars
        .register("specific_heat", VarKind::Cell, ValueType::Scalar)
        .unwrap();
    let target = match vars.find(target) {
        Some(label) => label,
        None => vars.register(target, VarKind::Cell, value_type).unwrap(),
    };
    let fluxes = register_fluxes(&mut vars, flux, value_type).unwrap();
    let mut models = ModelRegistry::new();
    models.set_density(&vars, "density").unwrap();
    models.set_specific_heat(&vars, "specific_heat").unwrap();
    models
        .add_reflux(&vars, flux, vars.name(target), kind, MaterialSet::first_n(1))
        .unwrap();
    let weights = match kind {
        QuantityKind::Mass => vec![],
        QuantityKind::Other => vec![density],
        QuantityKind::InternalEnergy => vec![density, specific_heat],
    };
    Conserved {
        vars,
        models,
        target,
        fluxes,
        density,
        specific_heat,
        weights,
    }
}

fn mass() -> Conserved {
    conserved("mass", "density", ValueType::Scalar, QuantityKind::Mass)
}

fn momentum() -> Conserved {
    conserved("momentum", "velocity", ValueType::Vector3, QuantityKind::Other)
}

fn internal_energy() -> Conserved {
    conserved(
        "internal_energy",
        "temperature",
        ValueType::Scalar,
        QuantityKind::InternalEnergy,
    )
}

/// Returns the conserved total before and after one step.
fn step<T: StoredValue>(
    h: &Hierarchy,
    q: &Conserved,
    seed: u64,
    reflux: bool,
    init: impl Fn([f64; 3]) -> T + Copy,
) -> (T, T) {
    let mut dw = DataWarehouse::new();
    let mut generator = FluxGenerator::new(seed);
    for l in 0..h.num_levels() {
        let level = LevelIndex(l as u32);
        if q.target != q.density {
            fill_level(&mut dw, h, q.density, M0, level, 0, linear(1.5, [0.05, -0.02, 0.04]))
                .unwrap();
        }
        fill_level(&mut dw, h, q.specific_heat, M0, level, 0, linear(2.0, [-0.03, 0.01, 0.02]))
            .unwrap();
        fill_level(&mut dw, h, q.target, M0, level, 0, init).unwrap();
        generator.scatter_of::<T>(&mut dw, h, q.fluxes, M0, level).unwrap();
    }
    let total = |dw: &DataWarehouse| {
        weighted_composite_integral::<T>(dw, h, q.target, M0, &q.weights).unwrap()
    };
    let before = total(&dw);

    for l in 0..h.num_levels() {
        let level = LevelIndex(l as u32);
        apply_weighted_divergence::<T>(&mut dw, h, q.target, q.fluxes, M0, level, &q.weights)
            .unwrap();
    }
    if reflux {
        for l in 0..h.num_levels() - 1 {
            let level = LevelIndex(l as u32);
            let mut engine =
                RefluxEngine::new(h, &q.vars, &q.models, TransferConfig::default()).unwrap();
            engine.compute_correction_fluxes(&mut dw, level).unwrap();
            engine.apply_correction_fluxes(&mut dw, level).unwrap();
        }
    }
    (before, total(&dw))
}

fn drift<T: CellValue>((before, after): (T, T)) -> f64 {
    after.max_abs_diff(&before)
}

fn mass_step(h: &Hierarchy, seed: u64, reflux: bool) -> f64 {
    drift(step(h, &mass(), seed, reflux, linear(2.0, [0.1, -0.05, 0.02])))
}

fn momentum_step(h: &Hierarchy, seed: u64, reflux: bool) -> f64 {
    let u = |x: [f64; 3]| Vector3::new(0.5 + 0.1 * x[0], -0.25, 0.2 * x[2] - 0.3 * x[1]);
    drift(step(h, &momentum(), seed, reflux, u))
}

fn energy_step(h: &Hierarchy, seed: u64, reflux: bool) -> f64 {
    drift(step(h, &internal_energy(), seed, reflux, linear(3.0, [0.02, 0.03, -0.01])))
}

fn hierarchies() -> Vec<Result<Hierarchy, GridError>> {
    vec![
        fixtures::single_fine_patch(),
        fixtures::split_root(),
        fixtures::adjacent_fine_patches(),
        fixtures::boundary_fine_patch(),
        fixtures::three_levels(),
    ]
}

#[test]
fn unrefluxed_update_drifts() {
    let h = fixtures::split_root().unwrap();
    assert!(mass_step(&h, 3, false) > 1e-6);
    assert!(momentum_step(&h, 3, false) > 1e-6);
    assert!(energy_step(&h, 3, false) > 1e-6);
}

#[test]
fn reflux_conserves_on_every_fixture() {
    for h in hierarchies() {
        let h = h.unwrap();
        assert!(mass_step(&h, 11, true) < 1e-8);
        assert!(momentum_step(&h, 11, true) < 1e-8);
        assert!(energy_step(&h, 11, true) < 1e-8);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn reflux_conserves_mass_for_any_seed(seed in any::<u64>(), which in 0usize..5) {
        let h = hierarchies().swap_remove(which).unwrap();
        let d = mass_step(&h, seed, true);
        prop_assert!(d < 1e-8, "mass drift {}", d);
    }

    #[test]
    fn reflux_conserves_momentum_for_any_seed(seed in any::<u64>(), which in 0usize..5) {
        let h = hierarchies().swap_remove(which).unwrap();
        let d = momentum_step(&h, seed, true);
        prop_assert!(d < 1e-8, "momentum drift {}", d);
    }

    #[test]
    fn reflux_conserves_internal_energy_for_any_seed(seed in any::<u64>(), which in 0usize..5) {
        let h = hierarchies().swap_remove(which).unwrap();
        let d = energy_step(&h, seed, true);
        prop_assert!(d < 1e-8, "internal energy drift {}", d);
    }
}
