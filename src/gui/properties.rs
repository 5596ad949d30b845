use crate::base::VariableTable;
use crate::xml::{Document, Query};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds the gravity and the reference fluid properties
///
/// A None field keeps the solver default.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PhysicalProperties {
    /// Gravity components (GX, GY, GZ)
    pub gravity: [Option<f64>; 3],

    /// Reference density (RO0)
    pub density: Option<f64>,

    /// Reference molecular viscosity (VISCL0)
    pub viscosity: Option<f64>,

    /// Reference specific heat (CP0)
    pub specific_heat: Option<f64>,

    /// Reference pressure (P0)
    pub reference_pressure: Option<f64>,

    /// Variable density (IROVAR)
    pub variable_density: Option<bool>,

    /// Variable molecular viscosity (IVIVAR)
    pub variable_viscosity: Option<bool>,
}

/// Holds the clipping bounds of a user scalar (SCAMIN, SCAMAX)
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScalarBounds {
    /// Scalar label
    pub label: String,

    /// Minimum value
    pub min: Option<f64>,

    /// Maximum value
    pub max: Option<f64>,
}

/// Reads the gravity and the reference fluid properties
///
/// # Document layout
///
/// ```text
/// physical_properties/gravity            gravity_x, gravity_y, gravity_z
/// property[@name, @choice]               initial_value
///                                        (density, molecular_viscosity, specific_heat)
/// reference_pressure
/// ```
pub fn read_physical_properties(doc: &Document) -> Result<PhysicalProperties, StrError> {
    let mut props = PhysicalProperties::default();
    for (i, name) in ["gravity_x", "gravity_y", "gravity_z"].into_iter().enumerate() {
        let q = Query::root().elements(&["physical_properties", "gravity", name]).text();
        props.gravity[i] = doc.get_double(&q)?;
    }
    let property = |name: &str| Query::anywhere().element("property").test_attribute("name", name);
    let initial_value = |name: &str| doc.get_double(&property(name).element("initial_value").text());
    props.density = initial_value("density")?;
    props.viscosity = initial_value("molecular_viscosity")?;
    props.specific_heat = initial_value("specific_heat")?;
    props.reference_pressure = doc.get_double(&Query::anywhere().element("reference_pressure").text())?;

    let variable = |name: &str| -> Result<Option<bool>, StrError> {
        match doc.get_attribute(&property(name).attribute("choice")).as_deref() {
            Some("variable") => Ok(Some(true)),
            Some("constant") => Ok(Some(false)),
            Some(_) => Err("property choice must be 'constant' or 'variable'"),
            None => Ok(None),
        }
    };
    props.variable_density = variable("density")?;
    props.variable_viscosity = variable("molecular_viscosity")?;
    if let Some(rho) = props.density {
        if rho <= 0.0 {
            return Err("density must be positive");
        }
    }
    log::debug!("\n{}", props);
    Ok(props)
}

/// Reads the clipping bounds of the user scalars, in the order of the variable table
pub fn read_scalar_bounds(doc: &Document, variables: &VariableTable) -> Result<Vec<ScalarBounds>, StrError> {
    let mut bounds = Vec::with_capacity(variables.n_user_scalar);
    for (_, label) in variables.user_scalars() {
        let value = |name: &str| {
            let q = Query::root()
                .elements(&["additional_scalars", "scalar"])
                .test_attribute("label", label)
                .element(name)
                .text();
            doc.get_double(&q)
        };
        let min = value("min_value")?;
        let max = value("max_value")?;
        if let (Some(a), Some(b)) = (min, max) {
            if a > b {
                return Err("scalar min_value must not exceed max_value");
            }
        }
        bounds.push(ScalarBounds {
            label: label.to_string(),
            min,
            max,
        });
    }
    Ok(bounds)
}

fn show(value: &Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v),
        None => "default".to_string(),
    }
}

impl fmt::Display for PhysicalProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Physical properties\n")?;
        write!(f, "===================\n")?;
        write!(
            f,
            "gravity = ({}, {}, {})\n",
            show(&self.gravity[0]),
            show(&self.gravity[1]),
            show(&self.gravity[2])
        )?;
        write!(f, "density = {}\n", show(&self.density))?;
        write!(f, "viscosity = {}\n", show(&self.viscosity))?;
        write!(f, "specific_heat = {}\n", show(&self.specific_heat))?;
        write!(f, "reference_pressure = {}\n", show(&self.reference_pressure))?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
