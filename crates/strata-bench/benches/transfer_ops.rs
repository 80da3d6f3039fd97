//! Criterion benchmarks for the level-wide transfer operators on the
//! reference profile.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use strata_bench::{reference_profile, Profile};
use strata_core::{Axis, CellValue, LevelIndex, Snapshot, SubCycleProgress, Vector3};
use strata_grid::GridQuery;
use strata_store::{DataWarehouse, ValueType};
use strata_test_utils::FluxGenerator;
use strata_transfer::model::{flux_names, names};
use strata_transfer::{
    CoarseFineBoundaryFiller, Prolongation, RefluxEngine, Restriction, TransferConfig,
};

fn profile() -> Profile {
    reference_profile(1).unwrap()
}

/// Benchmark: prolong every hydro variable onto both fine patches.
fn bench_prolong_level(c: &mut Criterion) {
    let p = profile();
    let config = TransferConfig::default();
    let pair = p.state(config).unwrap();
    let op = Prolongation::new(&p.grid, &p.vars, config).unwrap();
    c.bench_function("prolong_level_reference", |b| {
        b.iter_batched(
            || pair.snapshot(Snapshot::Old).clone(),
            |mut dw| {
                op.prolong_level(&mut dw, &p.models, LevelIndex(1)).unwrap();
                black_box(dw)
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: average both fine patches down onto the root.
fn bench_restrict_level(c: &mut Criterion) {
    let p = profile();
    let config = TransferConfig::default();
    let pair = p.state(config).unwrap();
    let op = Restriction::new(&p.grid, &p.vars, config).unwrap();
    c.bench_function("restrict_level_reference", |b| {
        b.iter_batched(
            || pair.snapshot(Snapshot::New).clone(),
            |mut dw| black_box(op.restrict_level(&mut dw, &p.models, LevelIndex::ROOT).unwrap()),
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: time-blended ghost fill of every hydro variable.
fn bench_fill_level(c: &mut Criterion) {
    let p = profile();
    let config = TransferConfig::default();
    let mut pair = p.state(config).unwrap();
    let filler = CoarseFineBoundaryFiller::new(&p.grid, &p.vars, config).unwrap();
    let mid = SubCycleProgress::new(0.5).unwrap();
    c.bench_function("fill_level_blend_reference", |b| {
        b.iter(|| black_box(filler.fill_level(&mut pair, &p.models, LevelIndex(1), mid).unwrap()));
    });
}

/// Face fluxes for every reflux quantity on both levels, plus the
/// specific heat the internal energy correction needs.
fn with_fluxes(p: &Profile, mut dw: DataWarehouse) -> DataWarehouse {
    let mut generator = FluxGenerator::new(17).amplitude(0.01);
    for q in p.models.reflux_quantities() {
        let labels = flux_names(&q.name).map(|n| p.vars.find(&n).unwrap());
        for m in &q.materials {
            for level in [LevelIndex::ROOT, LevelIndex(1)] {
                match q.value_type {
                    ValueType::Scalar => {
                        generator.scatter(&mut dw, &p.grid, labels, m, level).unwrap();
                    }
                    ValueType::Vector3 => {
                        for &id in p.grid.level(level).unwrap().patch_ids() {
                            let patch = p.grid.patch(id).unwrap();
                            for axis in Axis::ALL {
                                let fill = Vector3::splat(0.01);
                                dw.allocate_and_put_face(labels[axis.index()], m, patch, axis, fill)
                                    .unwrap();
                            }
                        }
                    }
                }
            }
        }
    }
    let cv = p.vars.find(names::SPECIFIC_HEAT).unwrap();
    for &id in p.grid.level(LevelIndex::ROOT).unwrap().patch_ids() {
        for m in &p.models.transported()[0].materials {
            dw.allocate_and_put(cv, m, p.grid.patch(id).unwrap(), 0, 718.0).unwrap();
        }
    }
    dw
}

/// Benchmark: both reflux phases for all four hydro quantities.
fn bench_reflux(c: &mut Criterion) {
    let p = profile();
    let config = TransferConfig::default();
    let pair = p.state(config).unwrap();
    let dw = with_fluxes(&p, pair.snapshot(Snapshot::New).clone());
    c.bench_function("reflux_compute_apply_reference", |b| {
        b.iter_batched(
            || dw.clone(),
            |mut dw| {
                let mut engine = RefluxEngine::new(&p.grid, &p.vars, &p.models, config).unwrap();
                engine.compute_correction_fluxes(&mut dw, LevelIndex::ROOT).unwrap();
                engine.apply_correction_fluxes(&mut dw, LevelIndex::ROOT).unwrap();
                black_box(dw)
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_prolong_level,
    bench_restrict_level,
    bench_fill_level,
    bench_reflux
);
criterion_main!(benches);
