//! Test fixtures for Strata development.
//!
//! - [`fixtures`]: small hierarchies used across the test suites.
//! - [`fields`]: analytic cell fields and level integrals.
//! - [`flux`]: seeded random face fluxes and the matching
//!   finite-volume update, for conservation tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fields;
pub mod fixtures;
pub mod flux;

pub use fields::{
    composite_integral, fill_level, level_integral, linear, weighted_composite_integral,
    weighted_level_integral,
};
pub use flux::{apply_divergence, apply_weighted_divergence, FluxGenerator};
