//! The per-snapshot field store.

use indexmap::IndexMap;
use strata_core::{Axis, CellValue, IntVector, LabelId, LevelIndex, MaterialIndex, PatchId, Vector3};
use strata_grid::{CellBox, GridQuery, Patch};

use crate::error::StoreError;
use crate::field::{CellField, FaceField};
use crate::label::ValueType;

/// A stored field of any supported layout.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldData {
    /// Cell-centered scalar.
    CellScalar(CellField<f64>),
    /// Cell-centered 3-vector.
    CellVector(CellField<Vector3>),
    /// Face-centered scalar.
    FaceScalar(FaceField<f64>),
    /// Face-centered 3-vector.
    FaceVector(FaceField<Vector3>),
}

impl FieldData {
    /// Short description of the layout, for error messages.
    pub fn layout(&self) -> &'static str {
        match self {
            Self::CellScalar(_) => "cell scalar",
            Self::CellVector(_) => "cell vector3",
            Self::FaceScalar(_) => "face scalar",
            Self::FaceVector(_) => "face vector3",
        }
    }
}

/// Value types that a [`DataWarehouse`] can store.
///
/// Bridges generic operator code (`T: StoredValue`) to the concrete
/// [`FieldData`] variants.
pub trait StoredValue: CellValue {
    /// Registry value type.
    const VALUE_TYPE: ValueType;
    /// Layout name of a cell field of this type.
    const CELL_LAYOUT: &'static str;
    /// Layout name of a face field of this type.
    const FACE_LAYOUT: &'static str;

    /// Borrow as a cell field of this type.
    fn cell(data: &FieldData) -> Option<&CellField<Self>>;
    /// Mutably borrow as a cell field of this type.
    fn cell_mut(data: &mut FieldData) -> Option<&mut CellField<Self>>;
    /// Borrow as a face field of this type.
    fn face(data: &FieldData) -> Option<&FaceField<Self>>;
    /// Mutably borrow as a face field of this type.
    fn face_mut(data: &mut FieldData) -> Option<&mut FaceField<Self>>;
    /// Wrap a cell field.
    fn wrap_cell(field: CellField<Self>) -> FieldData;
    /// Wrap a face field.
    fn wrap_face(field: FaceField<Self>) -> FieldData;
}

impl StoredValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Scalar;
    const CELL_LAYOUT: &'static str = "cell scalar";
    const FACE_LAYOUT: &'static str = "face scalar";

    fn cell(data: &FieldData) -> Option<&CellField<Self>> {
        match data {
            FieldData::CellScalar(f) => Some(f),
            _ => None,
        }
    }

    fn cell_mut(data: &mut FieldData) -> Option<&mut CellField<Self>> {
        match data {
            FieldData::CellScalar(f) => Some(f),
            _ => None,
        }
    }

    fn face(data: &FieldData) -> Option<&FaceField<Self>> {
        match data {
            FieldData::FaceScalar(f) => Some(f),
            _ => None,
        }
    }

    fn face_mut(data: &mut FieldData) -> Option<&mut FaceField<Self>> {
        match data {
            FieldData::FaceScalar(f) => Some(f),
            _ => None,
        }
    }

    fn wrap_cell(field: CellField<Self>) -> FieldData {
        FieldData::CellScalar(field)
    }

    fn wrap_face(field: FaceField<Self>) -> FieldData {
        FieldData::FaceScalar(field)
    }
}

impl StoredValue for Vector3 {
    const VALUE_TYPE: ValueType = ValueType::Vector3;
    const CELL_LAYOUT: &'static str = "cell vector3";
    const FACE_LAYOUT: &'static str = "face vector3";

    fn cell(data: &FieldData) -> Option<&CellField<Self>> {
        match data {
            FieldData::CellVector(f) => Some(f),
            _ => None,
        }
    }

    fn cell_mut(data: &mut FieldData) -> Option<&mut CellField<Self>> {
        match data {
            FieldData::CellVector(f) => Some(f),
            _ => None,
        }
    }

    fn face(data: &FieldData) -> Option<&FaceField<Self>> {
        match data {
            FieldData::FaceVector(f) => Some(f),
            _ => None,
        }
    }

    fn face_mut(data: &mut FieldData) -> Option<&mut FaceField<Self>> {
        match data {
            FieldData::FaceVector(f) => Some(f),
            _ => None,
        }
    }

    fn wrap_cell(field: CellField<Self>) -> FieldData {
        FieldData::CellVector(field)
    }

    fn wrap_face(field: FaceField<Self>) -> FieldData {
        FieldData::FaceVector(field)
    }
}

type FieldKey = (LabelId, MaterialIndex, PatchId);

/// Fields of one time snapshot, keyed by `(label, material, patch)`.
///
/// Uses `IndexMap` so iteration follows insertion order.
#[derive(Clone, Debug, Default)]
pub struct DataWarehouse {
    fields: IndexMap<FieldKey, FieldData>,
}

impl DataWarehouse {
    /// An empty warehouse.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drop every field, keeping the map's capacity.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Returns `true` if a field of any layout is stored under the key.
    pub fn contains(&self, label: LabelId, material: MaterialIndex, patch: PatchId) -> bool {
        self.fields.contains_key(&(label, material, patch))
    }

    /// Remove and return a stored field.
    pub fn remove(
        &mut self,
        label: LabelId,
        material: MaterialIndex,
        patch: PatchId,
    ) -> Option<FieldData> {
        self.fields.shift_remove(&(label, material, patch))
    }

    fn entry(
        &self,
        label: LabelId,
        material: MaterialIndex,
        patch: PatchId,
    ) -> Result<&FieldData, StoreError> {
        self.fields
            .get(&(label, material, patch))
            .ok_or(StoreError::FieldNotFound {
                label,
                material,
                patch,
            })
    }

    fn entry_mut(
        &mut self,
        label: LabelId,
        material: MaterialIndex,
        patch: PatchId,
    ) -> Result<&mut FieldData, StoreError> {
        self.fields
            .get_mut(&(label, material, patch))
            .ok_or(StoreError::FieldNotFound {
                label,
                material,
                patch,
            })
    }

    /// Read-only access to a cell field.
    pub fn get<T: StoredValue>(
        &self,
        label: LabelId,
        material: MaterialIndex,
        patch: PatchId,
    ) -> Result<&CellField<T>, StoreError> {
        let data = self.entry(label, material, patch)?;
        T::cell(data).ok_or(StoreError::TypeMismatch {
            label,
            expected: T::CELL_LAYOUT,
            found: data.layout(),
        })
    }

    /// Mutable access to a cell field.
    pub fn get_modifiable<T: StoredValue>(
        &mut self,
        label: LabelId,
        material: MaterialIndex,
        patch: PatchId,
    ) -> Result<&mut CellField<T>, StoreError> {
        let data = self.entry_mut(label, material, patch)?;
        let found = data.layout();
        T::cell_mut(data).ok_or(StoreError::TypeMismatch {
            label,
            expected: T::CELL_LAYOUT,
            found,
        })
    }

    /// Read-only access to a face field.
    pub fn get_face<T: StoredValue>(
        &self,
        label: LabelId,
        material: MaterialIndex,
        patch: PatchId,
    ) -> Result<&FaceField<T>, StoreError> {
        let data = self.entry(label, material, patch)?;
        T::face(data).ok_or(StoreError::TypeMismatch {
            label,
            expected: T::FACE_LAYOUT,
            found: data.layout(),
        })
    }

    /// Mutable access to a face field.
    pub fn get_face_modifiable<T: StoredValue>(
        &mut self,
        label: LabelId,
        material: MaterialIndex,
        patch: PatchId,
    ) -> Result<&mut FaceField<T>, StoreError> {
        let data = self.entry_mut(label, material, patch)?;
        let found = data.layout();
        T::face_mut(data).ok_or(StoreError::TypeMismatch {
            label,
            expected: T::FACE_LAYOUT,
            found,
        })
    }

    /// Store `field` for `patch`, replacing any previous field under the
    /// same key. The field's region must contain the patch interior.
    pub fn put<T: StoredValue>(
        &mut self,
        label: LabelId,
        material: MaterialIndex,
        patch: &Patch,
        field: CellField<T>,
    ) -> Result<(), StoreError> {
        if !field.region().contains_box(&patch.interior()) {
            return Err(StoreError::RegionMismatch {
                patch: patch.id(),
                region: field.region(),
                interior: patch.interior(),
            });
        }
        self.fields.insert((label, material, patch.id()), T::wrap_cell(field));
        Ok(())
    }

    /// Allocate a cell field over the patch interior plus `ghost` layers,
    /// set to `fill`, store it and return it for writing.
    pub fn allocate_and_put<T: StoredValue>(
        &mut self,
        label: LabelId,
        material: MaterialIndex,
        patch: &Patch,
        ghost: u32,
        fill: T,
    ) -> Result<&mut CellField<T>, StoreError> {
        self.put(label, material, patch, CellField::new(patch.with_ghost(ghost), fill))?;
        self.get_modifiable(label, material, patch.id())
    }

    /// Store a face field for `patch`, replacing any previous field under
    /// the same key. Its region must hold every face of the patch interior.
    pub fn put_face<T: StoredValue>(
        &mut self,
        label: LabelId,
        material: MaterialIndex,
        patch: &Patch,
        field: FaceField<T>,
    ) -> Result<(), StoreError> {
        let interior = patch.interior();
        let needed = CellBox::new(interior.lo(), interior.hi() + IntVector::unit(field.axis()));
        if !field.region().contains_box(&needed) {
            return Err(StoreError::RegionMismatch {
                patch: patch.id(),
                region: field.region(),
                interior,
            });
        }
        self.fields.insert((label, material, patch.id()), T::wrap_face(field));
        Ok(())
    }

    /// Allocate a face field normal to `axis` over the patch's faces, set
    /// to `fill`, store it and return it for writing.
    pub fn allocate_and_put_face<T: StoredValue>(
        &mut self,
        label: LabelId,
        material: MaterialIndex,
        patch: &Patch,
        axis: Axis,
        fill: T,
    ) -> Result<&mut FaceField<T>, StoreError> {
        self.put_face(label, material, patch, FaceField::for_cells(axis, &patch.interior(), fill))?;
        self.get_face_modifiable(label, material, patch.id())
    }

    /// A scratch field that is not stored in the warehouse.
    pub fn allocate_temporary<T: StoredValue>(&self, region: CellBox, fill: T) -> CellField<T> {
        CellField::new(region, fill)
    }

    /// Gather `region` of a level-wide variable into a fresh field.
    ///
    /// In-domain cells are copied from the interior of whichever patch on
    /// `level` owns them; every such cell must be owned by some patch.
    /// Cells outside the level's domain take the value of the nearest
    /// domain cell (zero-gradient extension).
    pub fn get_region<T: StoredValue>(
        &self,
        grid: &dyn GridQuery,
        label: LabelId,
        material: MaterialIndex,
        level: LevelIndex,
        region: &CellBox,
    ) -> Result<CellField<T>, StoreError> {
        let lvl = grid.level(level)?;
        let domain = lvl.domain();
        let not_covered = StoreError::RegionNotCovered {
            level,
            region: *region,
        };
        let Some(inner) = region.intersect(&domain) else {
            return Err(not_covered);
        };

        let mut out = CellField::new(*region, T::zero());
        let mut filled = 0usize;
        for &id in lvl.patch_ids() {
            let Some(overlap) = grid.patch(id)?.interior().intersect(&inner) else {
                continue;
            };
            out.copy_box(self.get::<T>(label, material, id)?, &overlap);
            filled += overlap.cell_count();
        }
        if filled != inner.cell_count() {
            return Err(not_covered);
        }

        if inner != *region {
            let last = domain.hi() - IntVector::ONE;
            for c in region.cells() {
                if !domain.contains(c) {
                    let v = out[c.max(domain.lo()).min(last)];
                    out[c] = v;
                }
            }
        }
        Ok(out)
    }
}
