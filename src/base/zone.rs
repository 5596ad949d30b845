use super::{BcCode, Nature, UNSET_VALUE};
use crate::zones::ZoneError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines how the inlet velocity is specified
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum InletVelocity {
    /// Velocity norm; normal to the face unless a direction is given
    Norm { norm: f64, direction: Option<[f64; 3]> },

    /// Mass flow rate (flow1)
    MassFlow { rate: f64, direction: Option<[f64; 3]> },

    /// Volume flow rate (flow2)
    VolumeFlow { rate: f64, direction: Option<[f64; 3]> },
}

impl InletVelocity {
    /// Returns the flow rate indicator (IQIMP): 0 for norm, 1 for mass flow, 2 for volume flow
    pub fn iqimp(&self) -> i32 {
        match self {
            InletVelocity::Norm { .. } => 0,
            InletVelocity::MassFlow { .. } => 1,
            InletVelocity::VolumeFlow { .. } => 2,
        }
    }

    /// Returns the imposed flow rate (QIMP), zero for a norm specification
    pub fn qimp(&self) -> f64 {
        match self {
            InletVelocity::Norm { .. } => 0.0,
            InletVelocity::MassFlow { rate, .. } | InletVelocity::VolumeFlow { rate, .. } => *rate,
        }
    }

    /// Returns the direction, if any
    pub fn direction(&self) -> Option<[f64; 3]> {
        match self {
            InletVelocity::Norm { direction, .. }
            | InletVelocity::MassFlow { direction, .. }
            | InletVelocity::VolumeFlow { direction, .. } => *direction,
        }
    }
}

/// Defines how the inlet turbulence is computed
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum InletTurbulence {
    /// Computed from the hydraulic diameter
    HydraulicDiameter { dh: f64 },

    /// Computed from the hydraulic diameter and the turbulent intensity (as a fraction)
    TurbulentIntensity { dh: f64, intensity: f64 },
}

impl InletTurbulence {
    /// Returns the automatic turbulence indicator (ICALKE)
    pub fn icalke(&self) -> i32 {
        match self {
            InletTurbulence::HydraulicDiameter { .. } => 1,
            InletTurbulence::TurbulentIntensity { .. } => 2,
        }
    }

    /// Returns the hydraulic diameter (DH)
    pub fn dh(&self) -> f64 {
        match self {
            InletTurbulence::HydraulicDiameter { dh } | InletTurbulence::TurbulentIntensity { dh, .. } => *dh,
        }
    }

    /// Returns the turbulent intensity (XINTUR), zero if not given
    pub fn xintur(&self) -> f64 {
        match self {
            InletTurbulence::HydraulicDiameter { .. } => 0.0,
            InletTurbulence::TurbulentIntensity { intensity, .. } => *intensity,
        }
    }
}

/// Holds the boundary condition of one variable on one zone
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct VarCondition {
    /// How the value is imposed; None means the solver default
    pub code: Option<BcCode>,

    /// Dirichlet value (RCODCL 1)
    pub val1: f64,

    /// Exchange coefficient (RCODCL 2)
    pub val2: f64,

    /// Neumann flux (RCODCL 3)
    pub val3: f64,
}

impl Default for VarCondition {
    fn default() -> Self {
        VarCondition {
            code: None,
            val1: UNSET_VALUE,
            val2: UNSET_VALUE,
            val3: 0.0,
        }
    }
}

/// Holds the nature-specific parameters of a zone
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ZoneConditions {
    /// Inlet velocity specification
    pub velocity: Option<InletVelocity>,

    /// Inlet turbulence specification
    pub turbulence: Option<InletTurbulence>,

    /// Wall roughness height; None means smooth wall
    pub roughness: Option<f64>,

    /// Conditions per variable, indexed as the variable table
    pub variables: Vec<VarCondition>,
}

impl ZoneConditions {
    /// Allocates a new instance with default conditions for `nvar` variables
    pub fn new(nvar: usize) -> Self {
        ZoneConditions {
            velocity: None,
            turbulence: None,
            roughness: None,
            variables: vec![VarCondition::default(); nvar],
        }
    }
}

/// Holds one user-declared boundary zone
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ZoneDecl {
    /// Unique identifier
    pub label: String,

    /// Physical condition category
    pub nature: Nature,

    /// User-assigned zone number (1-based)
    pub zone_number: i32,

    /// Selection expression resolved by the geometric selector
    pub selection: String,

    /// Nature-specific parameters
    pub conditions: ZoneConditions,
}

impl ZoneDecl {
    /// Allocates a new declaration from the raw nature tag
    ///
    /// The conditions are initialized with defaults for `nvar` variables.
    pub fn new(label: &str, nature: &str, zone_number: i32, selection: &str, nvar: usize) -> Result<Self, ZoneError> {
        let nature = Nature::from_tag(nature).ok_or_else(|| ZoneError::UnknownNature {
            label: label.to_string(),
            nature: nature.to_string(),
        })?;
        Ok(ZoneDecl {
            label: label.to_string(),
            nature,
            zone_number,
            selection: selection.to_string(),
            conditions: ZoneConditions::new(nvar),
        })
    }

    /// Indicates a wall with a roughness height
    pub fn is_rough(&self) -> bool {
        self.nature == Nature::Wall && self.conditions.roughness.is_some()
    }
}

impl fmt::Display for ZoneDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "zone {} '{}' ({}) : {}",
            self.zone_number, self.label, self.nature, self.selection
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
