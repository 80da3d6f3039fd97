//! Core types for the Strata AMR transfer core.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by the grid, storage and transfer
//! crates: identifiers, integer cell indices and patch faces, the generic
//! per-cell value type, material masks, and sub-cycle progress.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod index;
pub mod material;
pub mod progress;
pub mod value;

pub use id::{LabelId, LevelIndex, MaterialIndex, PatchId};
pub use index::{Axis, Face, IntVector};
pub use material::{MaterialSet, MaterialSetIter};
pub use progress::{Snapshot, SubCycleProgress};
pub use value::{CellValue, Vector, Vector3};
