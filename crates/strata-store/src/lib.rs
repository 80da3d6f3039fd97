//! Per-patch field storage for Strata.
//!
//! Fields live in a [`DataWarehouse`] keyed by variable label, material and
//! patch. Two warehouses form a [`WarehousePair`]: the `Old` snapshot holds
//! the state at the start of the current coarse step, the `New` snapshot the
//! state being computed. [`WarehousePair::advance`] rotates them at the end
//! of a step.
//!
//! # Architecture
//!
//! ```text
//! WarehousePair
//! ├── DataWarehouse (Old)  ── (LabelId, MaterialIndex, PatchId) → FieldData
//! └── DataWarehouse (New)
//!
//! FieldData = CellField<f64> | CellField<Vector3>
//!           | FaceField<f64> | FaceField<Vector3>
//! ```
//!
//! Variable names are resolved to [`LabelId`](strata_core::LabelId)s once,
//! through the [`VarRegistry`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod label;
pub mod pair;
pub mod warehouse;

pub use error::StoreError;
pub use field::{CellField, FaceField};
pub use label::{ValueType, VarKind, VarLabel, VarRegistry};
pub use pair::WarehousePair;
pub use warehouse::{DataWarehouse, FieldData, StoredValue};
