//! Transfer configuration, validation, and error types.
//!
//! [`TransferConfig`] is shared by every operator in this crate.
//! [`validate()`](TransferConfig::validate) must pass before any operator
//! runs; the operator constructors call it.

use std::error::Error;
use std::fmt;

use strata_core::IntVector;

use crate::diagnostics::DiagnosticConfig;

// ── InterpolationOrder ─────────────────────────────────────────────

/// Spatial interpolation kernel used for prolongation and ghost filling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InterpolationOrder {
    /// 8-point trilinear.
    #[default]
    Linear,
    /// 27-point triquadratic.
    Quadratic,
}

impl InterpolationOrder {
    /// Coarse ghost width the caller must fetch around a stencil footprint.
    pub fn required_ghost(self) -> u32 {
        match self {
            Self::Linear => 1,
            Self::Quadratic => 2,
        }
    }
}

// ── Validation ─────────────────────────────────────────────────────

/// Poison value written before filling, in [`Validation::Sentinel`] mode.
pub const DEFAULT_SENTINEL: f64 = -9.99999999e30;

/// How filled cells are checked for completeness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Validation {
    /// Poison the target cells with this value, then reject any cell still
    /// holding it.
    Sentinel(f64),
    /// Track written cells in a side mask and reject unwritten ones.
    InitializedMask,
    /// No check.
    Off,
}

impl Default for Validation {
    /// `Sentinel` in debug builds, `InitializedMask` in release builds.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Sentinel(DEFAULT_SENTINEL)
        } else {
            Self::InitializedMask
        }
    }
}

// ── FluxWeighting ──────────────────────────────────────────────────

/// Weight applied to summed fine fluxes in the reflux correction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FluxWeighting {
    /// Fine fluxes are stored as transported amounts; weight 1.
    #[default]
    Amount,
    /// Fine fluxes are stored per fine face area; weight `rx * ry * rz`.
    RefinementRatioProduct,
}

impl FluxWeighting {
    /// The multiplier for a level with refinement `ratio`.
    pub fn weight(self, ratio: IntVector) -> f64 {
        match self {
            Self::Amount => 1.0,
            Self::RefinementRatioProduct => ratio.product() as f64,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`TransferConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `boundary_ghost` is zero.
    ZeroBoundaryGhost,
    /// `progress_epsilon` is NaN, infinite, negative, or at least 0.5.
    InvalidProgressEpsilon {
        /// The invalid value.
        value: f64,
    },
    /// The sentinel value is not finite.
    NonFiniteSentinel {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBoundaryGhost => write!(f, "boundary_ghost must be at least 1"),
            Self::InvalidProgressEpsilon { value } => {
                write!(f, "progress_epsilon must be finite and in [0, 0.5), got {value}")
            }
            Self::NonFiniteSentinel { value } => {
                write!(f, "sentinel must be finite, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── TransferConfig ─────────────────────────────────────────────────

/// Settings shared by all transfer operators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransferConfig {
    /// Interpolation kernel. Default: `Linear`.
    pub interpolation: InterpolationOrder,
    /// Fine ghost layers filled on each coarse-fine face. Default: 1.
    pub boundary_ghost: u32,
    /// Progress within this distance of 0 or 1 reads a single coarse
    /// snapshot instead of blending. Default: 1e-10.
    pub progress_epsilon: f64,
    /// Completeness check for filled cells.
    pub validation: Validation,
    /// Fine flux weight in the reflux correction. Default: `Amount`.
    pub flux_weighting: FluxWeighting,
    /// Diagnostic verbosity. Default: quiet.
    pub diagnostics: DiagnosticConfig,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationOrder::default(),
            boundary_ghost: 1,
            progress_epsilon: 1e-10,
            validation: Validation::default(),
            flux_weighting: FluxWeighting::default(),
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

impl TransferConfig {
    /// Check all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.boundary_ghost == 0 {
            return Err(ConfigError::ZeroBoundaryGhost);
        }
        let eps = self.progress_epsilon;
        if !eps.is_finite() || !(0.0..0.5).contains(&eps) {
            return Err(ConfigError::InvalidProgressEpsilon { value: eps });
        }
        if let Validation::Sentinel(value) = self.validation {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteSentinel { value });
            }
        }
        Ok(())
    }

    /// Smallest hierarchy nesting buffer, in parent cells, for which every
    /// coarse-fine ghost fill of a level with refinement `ratio` reads only
    /// cells on parent patches.
    ///
    /// Counts the parent cells under the ghost layer, one of footprint
    /// expansion, and the interpolation stencil's reach.
    pub fn required_nesting_buffer(&self, ratio: IntVector) -> u32 {
        let finest = ratio.0.iter().copied().min().unwrap_or(1).max(1) as u32;
        self.boundary_ghost.div_ceil(finest) + 1 + self.interpolation.required_ghost()
    }
}
