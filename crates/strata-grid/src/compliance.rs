//! GridQuery compliance test helpers.
//!
//! These functions verify that a [`GridQuery`] implementation satisfies the
//! invariants the transfer operators rely on. Reused by every hierarchy test
//! that builds a non-trivial layout.

use indexmap::IndexSet;
use strata_core::{Face, IntVector, LevelIndex, PatchId};

use crate::mapper;
use crate::patch::{FaceCellMode, FaceKind};
use crate::query::GridQuery;

fn all_patch_ids(grid: &dyn GridQuery) -> Vec<PatchId> {
    (0..grid.num_levels() as u32)
        .flat_map(|l| grid.level(LevelIndex(l)).unwrap().patch_ids().to_vec())
        .collect()
}

/// Assert that every patch id appears on exactly one level and resolves to a
/// patch claiming that level.
pub fn assert_patch_ids_unique(grid: &dyn GridQuery) {
    let mut seen = IndexSet::new();
    for l in 0..grid.num_levels() as u32 {
        let level = grid.level(LevelIndex(l)).unwrap();
        assert_eq!(level.index(), LevelIndex(l));
        for &id in level.patch_ids() {
            assert!(seen.insert(id), "patch {id} listed on more than one level");
            assert_eq!(grid.patch(id).unwrap().level(), LevelIndex(l));
        }
    }
}

/// Assert that mapping a cell to its parent and back yields a box holding
/// the original cell, for every patch corner.
pub fn assert_mapping_round_trip(grid: &dyn GridQuery) {
    for id in all_patch_ids(grid) {
        let p = grid.patch(id).unwrap();
        if p.level() == LevelIndex::ROOT {
            continue;
        }
        let parent_level = LevelIndex(p.level().0 - 1);
        for cell in [p.low_index(), p.high_index() - IntVector::ONE] {
            let parent = grid.map_cell_to_coarser(p.level(), cell).unwrap();
            let kids = grid.map_cell_to_finer(parent_level, parent).unwrap();
            assert!(kids.contains(cell), "{cell} not among children of {parent}");
        }
    }
}

/// Assert that fine/coarse patch enumeration is symmetric.
pub fn assert_overlap_symmetric(grid: &dyn GridQuery) {
    for id in all_patch_ids(grid) {
        for fine in grid.fine_level_patches(id).unwrap() {
            let under: IndexSet<PatchId> = grid
                .coarse_level_patches(fine.id())
                .unwrap()
                .iter()
                .map(|p| p.id())
                .collect();
            assert!(
                under.contains(&id),
                "patch {} overlies {id} but {id} is not under it",
                fine.id()
            );
        }
    }
}

/// Assert that every coarse-fine face of a fine patch borders cells that
/// the coarser level covers, and that no root face is coarse-fine.
pub fn assert_coarse_fine_faces_nested(grid: &dyn GridQuery) {
    for id in all_patch_ids(grid) {
        let p = grid.patch(id).unwrap();
        let faces = grid.coarse_fine_interface_faces(id).unwrap();
        if p.level() == LevelIndex::ROOT {
            assert!(faces.is_empty(), "root patch {id} has coarse-fine faces");
            continue;
        }
        let ratio = grid.refinement_ratio(p.level()).unwrap();
        for face in Face::ALL {
            let kind = grid.face_kind(id, face).unwrap();
            assert_eq!(faces.contains(&face), kind == FaceKind::CoarseFine);
            if kind != FaceKind::CoarseFine {
                continue;
            }
            let ghost = grid
                .face_cell_box(id, face, FaceCellMode::Ghost { depth: 1 })
                .unwrap();
            let coarse = mapper::coarse_box_of(&ghost, ratio);
            let covered: usize = grid
                .coarse_patches_under(p.level(), &ghost)
                .unwrap()
                .iter()
                .filter_map(|cp| cp.interior().intersect(&coarse))
                .map(|b| b.cell_count())
                .sum();
            assert_eq!(
                covered,
                coarse.cell_count(),
                "coarse level does not cover the {face} ghost layer of patch {id}"
            );
        }
    }
}

/// Run all compliance checks.
pub fn run_full_compliance(grid: &dyn GridQuery) {
    assert_patch_ids_unique(grid);
    assert_mapping_round_trip(grid);
    assert_overlap_symmetric(grid);
    assert_coarse_fine_faces_nested(grid);
}
