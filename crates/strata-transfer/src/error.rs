//! Error type for transfer operators.

use std::error::Error;
use std::fmt;

use strata_core::{IntVector, LevelIndex, PatchId};
use strata_grid::{CellBox, GridError};
use strata_store::StoreError;

use crate::config::ConfigError;
use crate::reflux::RefluxPhase;

/// Errors from prolongation, restriction, ghost filling and reflux.
///
/// Every variant is fatal for the current step; operators never return a
/// partially applied result.
#[derive(Clone, Debug, PartialEq)]
pub enum TransferError {
    /// A cell the operator was required to fill was left unwritten.
    UninitializedValue {
        /// The first offending cell.
        cell: IntVector,
        /// Patch being filled.
        patch: PatchId,
        /// Level of the patch.
        level: LevelIndex,
        /// Variable name.
        variable: String,
    },
    /// One of the three per-axis flux fields of a reflux quantity is not
    /// registered.
    MissingFluxRegistration {
        /// The X, Y and Z flux names that were looked up.
        expected: [String; 3],
    },
    /// A model registration names a variable that is not registered.
    UnknownVariable {
        /// The missing name.
        name: String,
    },
    /// A variable's value type does not match how it is being registered.
    ValueTypeMismatch {
        /// Variable name.
        name: String,
    },
    /// The target field does not have room for the cells to be filled.
    InsufficientGhost {
        /// Patch being filled.
        patch: PatchId,
        /// Variable name.
        variable: String,
        /// Cells the operator must write.
        required: CellBox,
        /// Cells the field holds.
        allocated: CellBox,
    },
    /// A reflux phase was invoked out of order.
    PhaseOrder {
        /// Operation attempted.
        operation: &'static str,
        /// Phase the engine was in.
        phase: RefluxPhase,
    },
    /// Invalid configuration.
    Config(ConfigError),
    /// Field storage failure.
    Store(StoreError),
    /// Grid lookup failure.
    Grid(GridError),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UninitializedValue {
                cell,
                patch,
                level,
                variable,
            } => write!(
                f,
                "uninitialized value of '{variable}' at cell {cell} on patch {patch}, level {level}"
            ),
            Self::MissingFluxRegistration { expected } => write!(
                f,
                "missing face flux registration: expected '{}', '{}' and '{}'",
                expected[0], expected[1], expected[2]
            ),
            Self::UnknownVariable { name } => write!(f, "variable '{name}' is not registered"),
            Self::ValueTypeMismatch { name } => {
                write!(f, "variable '{name}' has the wrong value type for this registration")
            }
            Self::InsufficientGhost {
                patch,
                variable,
                required,
                allocated,
            } => write!(
                f,
                "field '{variable}' on patch {patch} holds {allocated} but {required} must be filled"
            ),
            Self::PhaseOrder { operation, phase } => {
                write!(f, "reflux {operation} invoked in phase {phase}")
            }
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for TransferError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<GridError> for TransferError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
