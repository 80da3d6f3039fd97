//! Reference [`GridQuery`] implementation and its builder.

use strata_core::{Face, IntVector, LevelIndex, PatchId};

use crate::cell_box::CellBox;
use crate::error::GridError;
use crate::level::Level;
use crate::mapper;
use crate::patch::{FaceKind, Patch};
use crate::query::GridQuery;

/// Parent-level cells required around every fine patch unless
/// [`HierarchyBuilder::nesting_buffer`] says otherwise.
///
/// Covers a one-layer linear ghost fill at any ratio: one parent cell under
/// the ghost layer, one of footprint expansion and one of stencil reach.
pub const DEFAULT_NESTING_BUFFER: u32 = 3;

/// A validated, immutable stack of nested levels.
///
/// Patch ids are dense: patch `n` is the `n`-th patch created, counting
/// root patches first and then each finer level in order.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    levels: Vec<Level>,
    patches: Vec<Patch>,
}

impl Hierarchy {
    /// All levels, coarsest first.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// All patches, in id order.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Index of the finest level.
    pub fn finest_level(&self) -> LevelIndex {
        LevelIndex(self.levels.len().saturating_sub(1) as u32)
    }

    /// Patches on `level`.
    pub fn level_patches(&self, level: LevelIndex) -> Result<Vec<&Patch>, GridError> {
        self.level(level)?
            .patch_ids()
            .iter()
            .map(|&id| self.patch(id))
            .collect()
    }
}

impl GridQuery for Hierarchy {
    fn num_levels(&self) -> usize {
        self.levels.len()
    }

    fn level(&self, index: LevelIndex) -> Result<&Level, GridError> {
        self.levels
            .get(index.0 as usize)
            .ok_or(GridError::UnknownLevel { level: index })
    }

    fn patch(&self, id: PatchId) -> Result<&Patch, GridError> {
        self.patches
            .get(id.0 as usize)
            .ok_or(GridError::UnknownPatch { patch: id })
    }
}

/// Builder for [`Hierarchy`].
///
/// ```
/// use strata_core::IntVector;
/// use strata_grid::{CellBox, HierarchyBuilder};
///
/// let domain = CellBox::new(IntVector::ZERO, IntVector::splat(8));
/// let h = HierarchyBuilder::new(domain, [1.0; 3])
///     .add_level(
///         IntVector::splat(2),
///         vec![CellBox::new(IntVector::splat(4), IntVector::splat(12))],
///     )
///     .build()
///     .unwrap();
/// assert_eq!(h.levels().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct HierarchyBuilder {
    domain: CellBox,
    dx0: [f64; 3],
    root: Option<Vec<CellBox>>,
    fine: Vec<(IntVector, Vec<CellBox>)>,
    nesting_buffer: u32,
}

impl HierarchyBuilder {
    /// Start a hierarchy over `domain` (root-level indices) with root
    /// spacing `dx0`. By default the root is a single patch spanning the
    /// whole domain.
    pub fn new(domain: CellBox, dx0: [f64; 3]) -> Self {
        Self {
            domain,
            dx0,
            root: None,
            fine: Vec::new(),
            nesting_buffer: DEFAULT_NESTING_BUFFER,
        }
    }

    /// Split the root level into `boxes`, which must tile the domain.
    pub fn root_patches(mut self, boxes: Vec<CellBox>) -> Self {
        self.root = Some(boxes);
        self
    }

    /// Append a finer level with refinement `ratio` relative to the current
    /// finest level, made of `boxes` in the new level's indices.
    pub fn add_level(mut self, ratio: IntVector, boxes: Vec<CellBox>) -> Self {
        self.fine.push((ratio, boxes));
        self
    }

    /// Minimum number of parent-level cells required between a fine patch
    /// and the edge of its parent level's coverage, clipped to the domain.
    /// Default [`DEFAULT_NESTING_BUFFER`].
    pub fn nesting_buffer(mut self, cells: u32) -> Self {
        self.nesting_buffer = cells;
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Hierarchy, GridError> {
        if self.domain.is_empty() {
            return Err(GridError::EmptyBox { bx: self.domain });
        }
        check_spacing(self.dx0)?;

        let mut levels: Vec<Level> = Vec::with_capacity(1 + self.fine.len());
        let mut boxes_per_level: Vec<Vec<CellBox>> = Vec::with_capacity(1 + self.fine.len());

        let root_boxes = self.root.unwrap_or_else(|| vec![self.domain]);
        check_level_boxes(LevelIndex::ROOT, &root_boxes, &self.domain, IntVector::ONE)?;
        let covered: usize = root_boxes.iter().map(CellBox::cell_count).sum();
        if covered != self.domain.cell_count() {
            return Err(GridError::RootNotCovering {
                domain_cells: self.domain.cell_count(),
                covered_cells: covered,
            });
        }
        levels.push(Level {
            index: LevelIndex::ROOT,
            dx: self.dx0,
            ratio: IntVector::ONE,
            domain: self.domain,
            patches: Vec::new(),
        });
        boxes_per_level.push(root_boxes);

        for (ratio, boxes) in self.fine {
            if !IntVector::ZERO.all_lt(ratio) {
                return Err(GridError::InvalidRatio { ratio });
            }
            let index = LevelIndex(levels.len() as u32);
            let (parent_domain, parent_dx) = match levels.last() {
                Some(parent) => (parent.domain, parent.dx),
                None => (self.domain, self.dx0),
            };
            let domain = mapper::refine_box(&parent_domain, ratio);
            let dx = [0, 1, 2].map(|i| parent_dx[i] / f64::from(ratio.0[i]));
            check_spacing(dx)?;
            check_level_boxes(index, &boxes, &domain, ratio)?;
            if let Some(parent_boxes) = boxes_per_level.last() {
                for bx in &boxes {
                    check_nesting(
                        index,
                        bx,
                        ratio,
                        parent_boxes,
                        &parent_domain,
                        self.nesting_buffer,
                    )?;
                }
            }
            levels.push(Level {
                index,
                dx,
                ratio,
                domain,
                patches: Vec::new(),
            });
            boxes_per_level.push(boxes);
        }

        let mut patches = Vec::new();
        for (level, boxes) in levels.iter_mut().zip(&boxes_per_level) {
            for bx in boxes {
                let id = PatchId(patches.len() as u32);
                level.patches.push(id);
                patches.push(Patch {
                    id,
                    level: level.index,
                    interior: *bx,
                    faces: Face::ALL.map(|f| classify_face(bx, f, &level.domain, boxes)),
                });
            }
        }

        Ok(Hierarchy { levels, patches })
    }
}

fn check_spacing(dx: [f64; 3]) -> Result<(), GridError> {
    if dx.iter().all(|d| d.is_finite() && *d > 0.0) {
        Ok(())
    } else {
        Err(GridError::InvalidSpacing { dx })
    }
}

fn check_level_boxes(
    level: LevelIndex,
    boxes: &[CellBox],
    domain: &CellBox,
    ratio: IntVector,
) -> Result<(), GridError> {
    for (i, bx) in boxes.iter().enumerate() {
        if bx.is_empty() {
            return Err(GridError::EmptyBox { bx: *bx });
        }
        if !domain.contains_box(bx) {
            return Err(GridError::OutsideDomain {
                bx: *bx,
                domain: *domain,
            });
        }
        if !mapper::is_aligned(bx, ratio) {
            return Err(GridError::MisalignedPatch {
                level,
                bx: *bx,
                ratio,
            });
        }
        if let Some(other) = boxes[..i].iter().find(|o| o.intersect(bx).is_some()) {
            return Err(GridError::OverlappingPatches {
                level,
                a: *other,
                b: *bx,
            });
        }
    }
    Ok(())
}

fn check_nesting(
    level: LevelIndex,
    bx: &CellBox,
    ratio: IntVector,
    parent_boxes: &[CellBox],
    parent_domain: &CellBox,
    buffer: u32,
) -> Result<(), GridError> {
    let required = mapper::coarse_box_of(bx, ratio).grow_uniform(buffer as i32);
    let Some(required) = required.intersect(parent_domain) else {
        return Err(GridError::ImproperNesting { level, bx: *bx });
    };
    let covered: usize = parent_boxes
        .iter()
        .filter_map(|p| p.intersect(&required))
        .map(|b| b.cell_count())
        .sum();
    if covered == required.cell_count() {
        Ok(())
    } else {
        Err(GridError::ImproperNesting { level, bx: *bx })
    }
}

fn classify_face(bx: &CellBox, face: Face, domain: &CellBox, level_boxes: &[CellBox]) -> FaceKind {
    let layer = bx.face_layer(face, 1);
    if !domain.contains_box(&layer) {
        return FaceKind::Domain;
    }
    let covered: usize = level_boxes
        .iter()
        .filter_map(|o| o.intersect(&layer))
        .map(|b| b.cell_count())
        .sum();
    if covered == layer.cell_count() {
        FaceKind::Neighbor
    } else {
        FaceKind::CoarseFine
    }
}
