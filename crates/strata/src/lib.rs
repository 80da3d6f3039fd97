//! Strata: the inter-level transfer core of a block-structured adaptive
//! mesh refinement solver.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Strata sub-crates. For most users, adding `strata` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! // Root [0,8)^3 with unit spacing, one fine patch at ratio 2.
//! let grid = HierarchyBuilder::new(CellBox::new(IntVector::ZERO, IntVector::splat(8)), [1.0; 3])
//!     .add_level(
//!         IntVector::splat(2),
//!         vec![CellBox::new(IntVector::splat(4), IntVector::splat(12))],
//!     )
//!     .build()
//!     .unwrap();
//!
//! let mut vars = VarRegistry::new();
//! let models = ModelRegistry::hydro(&mut vars, &MaterialSet::first_n(1)).unwrap();
//!
//! // Uniform state on the root.
//! let mut dw = DataWarehouse::new();
//! for var in models.transported() {
//!     let root = grid.patch(PatchId(0)).unwrap();
//!     match var.value_type {
//!         ValueType::Scalar => {
//!             dw.allocate_and_put(var.label, MaterialIndex(0), root, 0, 1.0).unwrap();
//!         }
//!         ValueType::Vector3 => {
//!             dw.allocate_and_put(var.label, MaterialIndex(0), root, 0, Vector3::default())
//!                 .unwrap();
//!         }
//!     }
//! }
//!
//! // Initialize the new fine patch from the root.
//! let prolong = Prolongation::new(&grid, &vars, TransferConfig::default()).unwrap();
//! prolong.prolong_level(&mut dw, &models, LevelIndex(1)).unwrap();
//!
//! let density = vars.find("density").unwrap();
//! let fine = dw.get::<f64>(density, MaterialIndex(0), PatchId(1)).unwrap();
//! assert_eq!(fine[IntVector::splat(7)], 1.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | IDs, cell indices, faces, value types, materials, progress |
//! | [`grid`] | `strata-grid` | Cell boxes, index mapping, levels, patches, `GridQuery` |
//! | [`store`] | `strata-store` | Cell/face fields, variable registry, data warehouses |
//! | [`transfer`] | `strata-transfer` | Prolongation, restriction, ghost filling, reflux |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Identifiers, indices and value types (`strata-core`).
pub use strata_core as types;

/// Hierarchy layout and coarse-fine index mapping (`strata-grid`).
///
/// The [`grid::GridQuery`] trait is the seam through which a host
/// solver's own hierarchy can drive the transfer operators.
pub use strata_grid as grid;

/// Field storage (`strata-store`).
///
/// Fields are keyed by label, material and patch in a
/// [`store::DataWarehouse`]; [`store::WarehousePair`] holds the old and
/// new snapshots of a step.
pub use strata_store as store;

/// Inter-level transfer operators (`strata-transfer`).
pub use strata_transfer as transfer;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use strata_core::{
        Axis, CellValue, Face, IntVector, LabelId, LevelIndex, MaterialIndex, MaterialSet, PatchId,
        Snapshot, SubCycleProgress, Vector3,
    };

    // Grid
    pub use strata_grid::{CellBox, GridQuery, Hierarchy, HierarchyBuilder};

    // Storage
    pub use strata_store::{
        CellField, DataWarehouse, FaceField, ValueType, VarKind, VarRegistry, WarehousePair,
    };

    // Transfer
    pub use strata_transfer::{
        CoarseFineBoundaryFiller, DiagnosticConfig, FluxWeighting, InterpolationOrder,
        ModelRegistry, Prolongation, QuantityKind, RefluxEngine, Restriction, TransferConfig,
        TransferError, Validation, Verbosity,
    };
}
