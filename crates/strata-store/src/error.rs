//! Storage error types.

use std::error::Error;
use std::fmt;

use strata_core::{LabelId, LevelIndex, MaterialIndex, PatchId};
use strata_grid::{CellBox, GridError};

/// Errors that can occur while registering variables or accessing fields.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreError {
    /// A label id that is not registered.
    UnknownLabel {
        /// The unrecognised label.
        label: LabelId,
    },
    /// A variable name registered twice.
    DuplicateLabel {
        /// The repeated name.
        name: String,
    },
    /// No field stored under this key.
    FieldNotFound {
        /// Variable label.
        label: LabelId,
        /// Material.
        material: MaterialIndex,
        /// Patch.
        patch: PatchId,
    },
    /// The stored field has a different layout or value type.
    TypeMismatch {
        /// Variable label.
        label: LabelId,
        /// Layout requested by the caller.
        expected: &'static str,
        /// Layout actually stored.
        found: &'static str,
    },
    /// A gathered region contains in-domain cells that no patch on the
    /// level owns.
    RegionNotCovered {
        /// Level the region was gathered on.
        level: LevelIndex,
        /// The requested region.
        region: CellBox,
    },
    /// A field's region does not contain the patch it is stored for.
    RegionMismatch {
        /// Patch the field was stored for.
        patch: PatchId,
        /// The field's region.
        region: CellBox,
        /// The patch interior.
        interior: CellBox,
    },
    /// A grid lookup failed.
    Grid(GridError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLabel { label } => write!(f, "unknown variable label {label}"),
            Self::DuplicateLabel { name } => write!(f, "variable '{name}' is already registered"),
            Self::FieldNotFound {
                label,
                material,
                patch,
            } => write!(
                f,
                "no field for label {label}, material {material} on patch {patch}"
            ),
            Self::TypeMismatch {
                label,
                expected,
                found,
            } => write!(f, "label {label}: expected {expected}, found {found}"),
            Self::RegionNotCovered { level, region } => {
                write!(f, "region {region} on level {level} is not covered by any patch")
            }
            Self::RegionMismatch {
                patch,
                region,
                interior,
            } => write!(
                f,
                "field region {region} does not contain interior {interior} of patch {patch}"
            ),
            Self::Grid(e) => write!(f, "grid: {e}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for StoreError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
