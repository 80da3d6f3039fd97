//! Inter-level transfer operators for Strata.
//!
//! Moves data between adjacent levels of a block-structured hierarchy
//! while preserving accuracy and conservation:
//!
//! | Operator | Direction | When |
//! |----------|-----------|------|
//! | [`Prolongation`] | coarse → fine interior | regrid, new fine patches |
//! | [`Restriction`] | fine → coarse | end of each coarse step |
//! | [`CoarseFineBoundaryFiller`] | coarse → fine ghosts | every fine sub-step |
//! | [`RefluxEngine`] | fine fluxes → coarse cells | end of each coarse step |
//!
//! All operators read the layout through
//! [`GridQuery`](strata_grid::GridQuery), act on fields in a
//! [`DataWarehouse`](strata_store::DataWarehouse), share one
//! [`TransferConfig`], and iterate the variables listed in a
//! [`ModelRegistry`]. Every failure is a [`TransferError`] and aborts the
//! step.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod interp;
pub mod model;
pub mod prolong;
pub mod reflux;
pub mod restrict;
pub mod validate;

pub use boundary::{CoarseFineBoundaryFiller, TemporalSource};
pub use config::{
    ConfigError, FluxWeighting, InterpolationOrder, TransferConfig, Validation, DEFAULT_SENTINEL,
};
pub use diagnostics::{DiagnosticConfig, Verbosity};
pub use error::TransferError;
pub use interp::StencilInterpolator;
pub use model::{ModelRegistry, QuantityKind, RefluxQuantity, TransportedVar};
pub use prolong::Prolongation;
pub use reflux::{RefluxEngine, RefluxPhase};
pub use restrict::Restriction;
pub use validate::FillGuard;
