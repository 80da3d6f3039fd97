//! The [`GridQuery`] trait.

use smallvec::SmallVec;
use strata_core::{Face, IntVector, LevelIndex, PatchId};

use crate::cell_box::CellBox;
use crate::error::GridError;
use crate::level::Level;
use crate::mapper;
use crate::patch::{FaceCellMode, FaceKind, Patch};

/// Read-only view of a level/patch hierarchy.
///
/// Transfer operators only ever see the hierarchy through this trait.
/// Implementors provide the three lookups; everything else has a default
/// built on them.
///
/// # Thread Safety
///
/// `Sync` is required so operators running on different patches can share
/// one `&dyn GridQuery`.
pub trait GridQuery: Send + Sync {
    /// Number of levels, coarsest first.
    fn num_levels(&self) -> usize;

    /// Look up a level.
    fn level(&self, index: LevelIndex) -> Result<&Level, GridError>;

    /// Look up a patch.
    fn patch(&self, id: PatchId) -> Result<&Patch, GridError>;

    /// The next coarser level, or `None` for the root.
    fn coarser_level(&self, index: LevelIndex) -> Option<&Level> {
        self.level(index.coarser()?).ok()
    }

    /// The next finer level, or `None` for the finest.
    fn finer_level(&self, index: LevelIndex) -> Option<&Level> {
        self.level(index.finer()).ok()
    }

    /// Refinement ratio between `fine` and its parent level.
    fn refinement_ratio(&self, fine: LevelIndex) -> Result<IntVector, GridError> {
        Ok(self.level(fine)?.ratio())
    }

    /// Parent of `cell` on the next coarser level.
    fn map_cell_to_coarser(
        &self,
        fine: LevelIndex,
        cell: IntVector,
    ) -> Result<IntVector, GridError> {
        Ok(mapper::coarse_of(cell, self.refinement_ratio(fine)?))
    }

    /// Children of `cell` on the next finer level.
    fn map_cell_to_finer(&self, coarse: LevelIndex, cell: IntVector) -> Result<CellBox, GridError> {
        let finer = self
            .finer_level(coarse)
            .ok_or(GridError::UnknownLevel { level: coarse.finer() })?;
        Ok(mapper::fine_range_of(cell, finer.ratio()))
    }

    /// Cells next to `face` of patch `id`.
    fn face_cell_box(
        &self,
        id: PatchId,
        face: Face,
        mode: FaceCellMode,
    ) -> Result<CellBox, GridError> {
        Ok(self.patch(id)?.face_cells(face, mode))
    }

    /// Boundary classification of `face` of patch `id`.
    fn face_kind(&self, id: PatchId, face: Face) -> Result<FaceKind, GridError> {
        Ok(self.patch(id)?.face_kind(face))
    }

    /// Faces of patch `id` that border the next coarser level.
    fn coarse_fine_interface_faces(&self, id: PatchId) -> Result<SmallVec<[Face; 6]>, GridError> {
        Ok(self.patch(id)?.coarse_fine_faces())
    }

    /// Patches on the coarser level lying under `fine_region` (fine-level
    /// indices) of level `fine`.
    fn coarse_patches_under(
        &self,
        fine: LevelIndex,
        fine_region: &CellBox,
    ) -> Result<Vec<&Patch>, GridError> {
        let ratio = self.refinement_ratio(fine)?;
        let coarse = self
            .coarser_level(fine)
            .ok_or(GridError::UnknownLevel { level: fine })?;
        let cover = mapper::coarse_box_of(fine_region, ratio);
        let mut out = Vec::new();
        for &id in coarse.patch_ids() {
            let p = self.patch(id)?;
            if p.interior().intersect(&cover).is_some() {
                out.push(p);
            }
        }
        Ok(out)
    }

    /// Coarser-level patches underlying fine patch `id`.
    fn coarse_level_patches(&self, id: PatchId) -> Result<Vec<&Patch>, GridError> {
        let p = self.patch(id)?;
        self.coarse_patches_under(p.level(), &p.interior())
    }

    /// Finer-level patches overlying coarse patch `id`.
    fn fine_level_patches(&self, id: PatchId) -> Result<Vec<&Patch>, GridError> {
        let p = self.patch(id)?;
        let Some(fine) = self.finer_level(p.level()) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for &fid in fine.patch_ids() {
            let fp = self.patch(fid)?;
            let cover = mapper::coarse_box_of(&fp.interior(), fine.ratio());
            if cover.intersect(&p.interior()).is_some() {
                out.push(fp);
            }
        }
        Ok(out)
    }

    /// `true` if coarse `cell` on `level` lies under some finer-level patch.
    fn is_covered_by_finer(&self, level: LevelIndex, cell: IntVector) -> Result<bool, GridError> {
        let Some(fine) = self.finer_level(level) else {
            return Ok(false);
        };
        let children = mapper::fine_range_of(cell, fine.ratio());
        for &fid in fine.patch_ids() {
            if self.patch(fid)?.interior().intersect(&children).is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
