//! Registration of the variables the transfer operators act on.
//!
//! The boundary filler and the restriction operator iterate
//! [`ModelRegistry::transported`]; the reflux engine iterates
//! [`ModelRegistry::reflux_quantities`]. Each entry carries the material
//! mask it applies to. Built-in hydrodynamic variables and runtime-added
//! scalars are stored side by side and treated identically.

use strata_core::{Axis, LabelId, MaterialSet};
use strata_store::{ValueType, VarKind, VarRegistry};

use crate::error::TransferError;

/// Names of the built-in variables.
pub mod names {
    /// Cell pressure.
    pub const PRESSURE: &str = "pressure";
    /// Cell density.
    pub const DENSITY: &str = "density";
    /// Cell specific volume.
    pub const SPECIFIC_VOLUME: &str = "specific_volume";
    /// Cell temperature.
    pub const TEMPERATURE: &str = "temperature";
    /// Cell velocity.
    pub const VELOCITY: &str = "velocity";
    /// Cell specific heat at constant volume.
    pub const SPECIFIC_HEAT: &str = "specific_heat";
    /// Mass flux base name.
    pub const MASS: &str = "mass";
    /// Momentum flux base name.
    pub const MOMENTUM: &str = "momentum";
    /// Internal energy flux base name.
    pub const INTERNAL_ENERGY: &str = "internal_energy";
}

/// Names of the three face flux variables of reflux quantity `base`, in
/// X, Y, Z order (`"mass_X_FC_flux"`, ...).
pub fn flux_names(base: &str) -> [String; 3] {
    Axis::ALL.map(|a| format!("{base}_{}_FC_flux", a.name()))
}

/// Which conserved-variable denominator a reflux quantity uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuantityKind {
    /// Mass flux correcting density: divide by cell volume.
    Mass,
    /// Energy flux correcting temperature: divide by cell mass times
    /// specific heat.
    InternalEnergy,
    /// Any other flux correcting a specific quantity: divide by cell mass.
    Other,
}

/// A cell variable kept current across coarse-fine boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportedVar {
    /// Variable name.
    pub name: String,
    /// Cell variable label.
    pub label: LabelId,
    /// Value type.
    pub value_type: ValueType,
    /// Materials the variable exists for.
    pub materials: MaterialSet,
}

/// A conserved quantity corrected by reflux.
#[derive(Clone, Debug, PartialEq)]
pub struct RefluxQuantity {
    /// Flux base name; the face fluxes are [`flux_names`] of it.
    pub name: String,
    /// Cell variable receiving the correction.
    pub target: LabelId,
    /// Value type of both the fluxes and the target.
    pub value_type: ValueType,
    /// Denominator selection.
    pub kind: QuantityKind,
    /// Materials the quantity exists for.
    pub materials: MaterialSet,
}

/// Runtime list of transported variables and reflux quantities.
#[derive(Clone, Debug, Default)]
pub struct ModelRegistry {
    transported: Vec<TransportedVar>,
    reflux: Vec<RefluxQuantity>,
    density: Option<LabelId>,
    specific_heat: Option<LabelId>,
}

impl ModelRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the built-in hydrodynamic state in `vars` and return a
    /// registry listing it for `materials`.
    ///
    /// Cell variables: pressure, density, specific volume, temperature,
    /// velocity and specific heat. Reflux quantities: mass (into density),
    /// momentum (into velocity), internal energy (into temperature) and
    /// specific volume, each with its three face flux variables.
    pub fn hydro(vars: &mut VarRegistry, materials: &MaterialSet) -> Result<Self, TransferError> {
        let mut reg = Self::new();
        for (name, vt) in [
            (names::PRESSURE, ValueType::Scalar),
            (names::DENSITY, ValueType::Scalar),
            (names::SPECIFIC_VOLUME, ValueType::Scalar),
            (names::TEMPERATURE, ValueType::Scalar),
            (names::VELOCITY, ValueType::Vector3),
        ] {
            vars.register(name, VarKind::Cell, vt)?;
            reg.add_transported(vars, name, materials.clone())?;
        }
        vars.register(names::SPECIFIC_HEAT, VarKind::Cell, ValueType::Scalar)?;
        reg.set_density(vars, names::DENSITY)?;
        reg.set_specific_heat(vars, names::SPECIFIC_HEAT)?;

        for (flux, target, vt, kind) in [
            (names::MASS, names::DENSITY, ValueType::Scalar, QuantityKind::Mass),
            (names::MOMENTUM, names::VELOCITY, ValueType::Vector3, QuantityKind::Other),
            (
                names::INTERNAL_ENERGY,
                names::TEMPERATURE,
                ValueType::Scalar,
                QuantityKind::InternalEnergy,
            ),
            (
                names::SPECIFIC_VOLUME,
                names::SPECIFIC_VOLUME,
                ValueType::Scalar,
                QuantityKind::Other,
            ),
        ] {
            register_fluxes(vars, flux, vt)?;
            reg.add_reflux(vars, flux, target, kind, materials.clone())?;
        }
        Ok(reg)
    }

    /// Register a passive scalar `name` in `vars` and list it as
    /// transported, and optionally refluxed with denominator `Other`.
    pub fn register_scalar(
        &mut self,
        vars: &mut VarRegistry,
        name: &str,
        materials: MaterialSet,
        reflux: bool,
    ) -> Result<(), TransferError> {
        vars.register(name, VarKind::Cell, ValueType::Scalar)?;
        self.add_transported(vars, name, materials.clone())?;
        if reflux {
            register_fluxes(vars, name, ValueType::Scalar)?;
            self.add_reflux(vars, name, name, QuantityKind::Other, materials)?;
        }
        Ok(())
    }

    /// List an already registered cell variable as transported.
    pub fn add_transported(
        &mut self,
        vars: &VarRegistry,
        name: &str,
        materials: MaterialSet,
    ) -> Result<(), TransferError> {
        let label = lookup(vars, name)?;
        let value_type = vars.label(label)?.value_type;
        self.transported.push(TransportedVar {
            name: name.to_string(),
            label,
            value_type,
            materials,
        });
        Ok(())
    }

    /// List a reflux quantity whose fluxes are named after `flux` and whose
    /// correction goes into the registered cell variable `target`.
    ///
    /// The flux variables themselves are resolved when the reflux engine
    /// runs, so a missing flux registration surfaces there.
    pub fn add_reflux(
        &mut self,
        vars: &VarRegistry,
        flux: &str,
        target: &str,
        kind: QuantityKind,
        materials: MaterialSet,
    ) -> Result<(), TransferError> {
        let label = lookup(vars, target)?;
        let value_type = vars.label(label)?.value_type;
        self.reflux.push(RefluxQuantity {
            name: flux.to_string(),
            target: label,
            value_type,
            kind,
            materials,
        });
        Ok(())
    }

    /// Use the registered scalar `name` as cell density in reflux
    /// denominators.
    pub fn set_density(&mut self, vars: &VarRegistry, name: &str) -> Result<(), TransferError> {
        self.density = Some(scalar(vars, name)?);
        Ok(())
    }

    /// Use the registered scalar `name` as specific heat in reflux
    /// denominators.
    pub fn set_specific_heat(
        &mut self,
        vars: &VarRegistry,
        name: &str,
    ) -> Result<(), TransferError> {
        self.specific_heat = Some(scalar(vars, name)?);
        Ok(())
    }

    /// Variables filled across coarse-fine boundaries and restricted.
    pub fn transported(&self) -> &[TransportedVar] {
        &self.transported
    }

    /// Quantities corrected by reflux.
    pub fn reflux_quantities(&self) -> &[RefluxQuantity] {
        &self.reflux
    }

    /// Density label, if set.
    pub fn density(&self) -> Option<LabelId> {
        self.density
    }

    /// Specific heat label, if set.
    pub fn specific_heat(&self) -> Option<LabelId> {
        self.specific_heat
    }
}

fn lookup(vars: &VarRegistry, name: &str) -> Result<LabelId, TransferError> {
    vars.find(name).ok_or_else(|| TransferError::UnknownVariable {
        name: name.to_string(),
    })
}

fn scalar(vars: &VarRegistry, name: &str) -> Result<LabelId, TransferError> {
    let label = lookup(vars, name)?;
    if vars.label(label)?.value_type != ValueType::Scalar {
        return Err(TransferError::ValueTypeMismatch {
            name: name.to_string(),
        });
    }
    Ok(label)
}

/// Register the three face flux variables of `base`.
pub fn register_fluxes(
    vars: &mut VarRegistry,
    base: &str,
    value_type: ValueType,
) -> Result<[LabelId; 3], TransferError> {
    let names = flux_names(base);
    let mut ids = [LabelId(0); 3];
    for (axis, name) in Axis::ALL.into_iter().zip(&names) {
        ids[axis.index()] = vars.register(name, VarKind::Face(axis), value_type)?;
    }
    Ok(ids)
}
