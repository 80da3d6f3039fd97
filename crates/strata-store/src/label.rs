//! Variable labels and the name → id registry.

use std::fmt;

use indexmap::IndexMap;
use strata_core::{Axis, LabelId};

use crate::error::StoreError;

/// Per-cell value type of a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// One `f64` per cell.
    Scalar,
    /// Three `f64` components per cell.
    Vector3,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::Vector3 => f.write_str("vector3"),
        }
    }
}

/// Where a variable's values live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// Cell-centered.
    Cell,
    /// Face-centered, normal to the given axis.
    Face(Axis),
}

/// A registered variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarLabel {
    /// Registry-assigned id.
    pub id: LabelId,
    /// Unique name.
    pub name: String,
    /// Cell or face centering.
    pub kind: VarKind,
    /// Value type.
    pub value_type: ValueType,
}

/// Maps variable names to labels.
///
/// Ids are assigned densely in registration order. Uses `IndexMap` so
/// iteration follows registration order.
#[derive(Clone, Debug, Default)]
pub struct VarRegistry {
    labels: IndexMap<String, VarLabel>,
}

impl VarRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new variable. Fails if `name` is already taken.
    pub fn register(
        &mut self,
        name: &str,
        kind: VarKind,
        value_type: ValueType,
    ) -> Result<LabelId, StoreError> {
        if self.labels.contains_key(name) {
            return Err(StoreError::DuplicateLabel {
                name: name.to_string(),
            });
        }
        let id = LabelId(self.labels.len() as u32);
        self.labels.insert(
            name.to_string(),
            VarLabel {
                id,
                name: name.to_string(),
                kind,
                value_type,
            },
        );
        Ok(id)
    }

    /// Look up a variable by name. `None` means not registered.
    pub fn find(&self, name: &str) -> Option<LabelId> {
        self.labels.get(name).map(|l| l.id)
    }

    /// Look up a label by id.
    pub fn label(&self, id: LabelId) -> Result<&VarLabel, StoreError> {
        self.labels
            .get_index(id.0 as usize)
            .map(|(_, l)| l)
            .ok_or(StoreError::UnknownLabel { label: id })
    }

    /// Name of a label, or `"<unknown>"`.
    pub fn name(&self, id: LabelId) -> &str {
        self.label(id).map(|l| l.name.as_str()).unwrap_or("<unknown>")
    }

    /// Number of registered variables.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over labels in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &VarLabel> {
        self.labels.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_find() {
        let mut reg = VarRegistry::new();
        let rho = reg.register("density", VarKind::Cell, ValueType::Scalar).unwrap();
        let vel = reg.register("velocity", VarKind::Cell, ValueType::Vector3).unwrap();
        assert_eq!(reg.find("density"), Some(rho));
        assert_eq!(reg.find("velocity"), Some(vel));
        assert_eq!(reg.find("pressure"), None);
        assert_eq!(reg.label(vel).unwrap().value_type, ValueType::Vector3);
        assert_eq!(reg.name(rho), "density");
    }

    #[test]
    fn duplicate_rejected() {
        let mut reg = VarRegistry::new();
        reg.register("mass_X_FC_flux", VarKind::Face(Axis::X), ValueType::Scalar)
            .unwrap();
        let err = reg
            .register("mass_X_FC_flux", VarKind::Cell, ValueType::Scalar)
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateLabel {
                name: "mass_X_FC_flux".into()
            }
        );
    }

    #[test]
    fn unknown_id() {
        let reg = VarRegistry::new();
        assert!(matches!(
            reg.label(LabelId(3)),
            Err(StoreError::UnknownLabel { .. })
        ));
        assert_eq!(reg.name(LabelId(3)), "<unknown>");
    }
}
