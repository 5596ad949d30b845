use crate::base::VariableTable;
use crate::selector::FaceSelector;
use crate::xml::{Document, Query};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds the initial values of the variables in one volume zone
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct InitialZone {
    /// Zone name
    pub name: String,

    /// Selection criteria of the cells (same syntax as the boundary zones)
    pub selection: String,

    /// Initial value of each variable, in the order of the variable table
    ///
    /// None means that the zone leaves the variable untouched. The pressure is never
    /// initialized here. The turbulence and mesh velocity variables are initialized only when
    /// the turbulence initialization choice is "values".
    pub values: Vec<Option<f64>>,
}

/// Reads the initial values of the volume zones
///
/// A variable without an initial value in a zone starts at zero.
///
/// # Document layout
///
/// ```text
/// solution_domain/volumic_conditions/zone[@name]       (text: selection criteria)
/// thermophysical_models/turbulence/initialization[@choice]
/// variable[@name]/initial_value[@zone]
/// additional_scalars/scalar[@label]/initial_value[@zone]
/// ```
pub fn read_initial_values(doc: &Document, variables: &VariableTable) -> Result<Vec<InitialZone>, StrError> {
    let q = Query::root()
        .elements(&["thermophysical_models", "turbulence", "initialization"])
        .attribute("choice");
    let with_turbulence = doc.get_attribute(&q).as_deref() == Some("values");
    let first_scalar = variables.first_user_scalar();

    let zone = || Query::root().elements(&["solution_domain", "volumic_conditions"]);
    let n = doc.count(&zone().element("zone"));
    let mut zones = Vec::with_capacity(n);
    for i in 1..=n {
        let name = doc
            .get_attribute(&zone().element_num("zone", i).attribute("name"))
            .ok_or("volume zone must have a name")?;
        let q = zone().element("zone").test_attribute("name", &name).text();
        let selection = doc.get_text(&q).unwrap_or_default();
        let mut values = vec![None; variables.len()];
        for (j, var) in variables.all.iter().enumerate() {
            let base = if j >= first_scalar {
                Query::root()
                    .elements(&["additional_scalars", "scalar"])
                    .test_attribute("label", &var.name)
            } else if j == 0 || (j > 3 && !with_turbulence) {
                continue;
            } else {
                Query::anywhere().element("variable").test_attribute("name", &var.name)
            };
            let q = base.element("initial_value").test_attribute("zone", &name).text();
            values[j] = Some(doc.get_double(&q)?.unwrap_or(0.0));
        }
        zones.push(InitialZone { name, selection, values });
    }
    log::info!("{} volume zones with initial values", zones.len());
    Ok(zones)
}

/// Writes the initial values into the cell fields
///
/// # Input
///
/// * `zones` -- the volume zones, applied in order (a later zone overwrites an earlier one)
/// * `selector` -- resolves the selection criteria into cell ids
/// * `fields` -- one array of cell values per variable, in the order of the variable table
pub fn apply_initial_values<S>(zones: &[InitialZone], selector: &S, fields: &mut [Vec<f64>]) -> Result<(), StrError>
where
    S: FaceSelector + ?Sized,
{
    for zone in zones {
        if zone.values.len() != fields.len() {
            return Err("there must be one field per variable");
        }
        let selection = selector.select(&zone.selection)?;
        for fragment in &selection.missing {
            log::warn!(
                "the group or attribute \"{}\" in the selection criteria \"{}\" of volume zone '{}' \
                 does not correspond to any cell",
                fragment,
                zone.selection,
                zone.name
            );
        }
        for (field, value) in fields.iter_mut().zip(&zone.values) {
            if let Some(v) = value {
                for &c in &selection.faces {
                    *field.get_mut(c).ok_or("volume zone selects a cell out of range")? = *v;
                }
            }
        }
        log::debug!("volume zone '{}': {} cells", zone.name, selection.faces.len());
    }
    Ok(())
}

impl fmt::Display for InitialZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "volume zone '{}' \"{}\":", self.name, self.selection)?;
        for value in &self.values {
            match value {
                Some(v) => write!(f, " {}", v)?,
                None => write!(f, " -")?,
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
