//! Grid hierarchy queries and coarse-fine index mapping for Strata.
//!
//! This crate defines the [`GridQuery`] trait, the interface through which
//! every transfer operator reads the level/patch layout, along with a
//! reference [`Hierarchy`] implementation and the pure index arithmetic in
//! [`mapper`] that relates coarse and fine cells.
//!
//! # Index conventions
//!
//! - Cell boxes are half-open: `[lo, hi)` per axis.
//! - Every level shares the physical origin; cell `i` on a level with
//!   spacing `dx` is centred at `(i + 0.5) * dx`.
//! - Face index `i` along an axis denotes the face on the low side of
//!   cell `i`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell_box;
pub mod error;
pub mod hierarchy;
pub mod level;
pub mod mapper;
pub mod patch;
pub mod query;

#[cfg(test)]
pub(crate) mod compliance;

pub use cell_box::{CellBox, CellIter};
pub use error::GridError;
pub use hierarchy::{Hierarchy, HierarchyBuilder, DEFAULT_NESTING_BUFFER};
pub use level::Level;
pub use mapper::{ParentOffset, RefluxInterface};
pub use patch::{FaceCellMode, FaceKind, Patch};
pub use query::GridQuery;
