use crate::base::{Turbulence, TurbulenceModel, VariableTable};
use crate::xml::{Document, Query};
use crate::StrError;
use serde::{Deserialize, Serialize};

/// Defines the mesh viscosity used to move the mesh (IORTVM)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum MeshViscosity {
    Isotropic,
    Orthotropic,
}

impl MeshViscosity {
    /// Returns the solver code
    pub fn code(&self) -> i32 {
        match self {
            MeshViscosity::Isotropic => 0,
            MeshViscosity::Orthotropic => 1,
        }
    }
}

/// Holds the parameters of the mesh motion (arbitrary Lagrangian-Eulerian method)
///
/// A None field keeps the solver default.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct AleParameters {
    /// Number of sub-iterations to initialize the fluid (NALINF)
    pub sub_iterations: Option<i32>,

    /// Maximum number of iterations of the implicit structure displacement (NALIMX)
    pub max_iterations: Option<i32>,

    /// Relative precision of the implicit structure displacement (EPALIM)
    pub precision: Option<f64>,

    /// Mesh viscosity type (IORTVM)
    pub mesh_viscosity: Option<MeshViscosity>,
}

/// Holds the reference values used to initialize the turbulence (UREF, ALMAX)
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TurbulenceInit {
    /// Initialization choice (e.g., "reference_velocity", "reference_velocity_length", "values")
    pub choice: Option<String>,

    /// Reference velocity
    pub reference_velocity: Option<f64>,

    /// Reference length; read only with the "reference_velocity_length" choice
    pub reference_length: Option<f64>,
}

/// Reads the turbulence model and its options
///
/// A document without a turbulence model means no turbulence model.
pub fn read_turbulence(doc: &Document) -> Result<Turbulence, StrError> {
    let base = Query::root().elements(&["thermophysical_models", "turbulence"]);
    let model = match doc.get_attribute(&base.clone().attribute("model")) {
        Some(tag) => TurbulenceModel::from_tag(&tag).ok_or("turbulence model is invalid")?,
        None => TurbulenceModel::Off,
    };
    let mut turbulence = Turbulence::new(model);
    if model == TurbulenceModel::MixingLength {
        let q = base.clone().element("mixing_length_scale").text();
        turbulence.mixing_length_scale = doc.get_double(&q)?;
    }
    if model.has_rans_options() {
        let q = base.clone().element("scale_model").text();
        turbulence.scale_model = doc.get_int(&q)?;
        let q = base.element("gravity_terms").attribute("status");
        turbulence.gravity_terms = doc.get_status(&q)?;
    }
    Ok(turbulence)
}

/// Reads whether the mesh moves (arbitrary Lagrangian-Eulerian method)
pub fn read_ale_status(doc: &Document) -> Result<bool, StrError> {
    let q = Query::root()
        .elements(&["thermophysical_models", "ale_method"])
        .attribute("status");
    Ok(doc.get_status(&q)?.unwrap_or(false))
}

/// Reads the mesh motion parameters
///
/// Returns None if the mesh does not move.
pub fn read_ale_parameters(doc: &Document) -> Result<Option<AleParameters>, StrError> {
    if !read_ale_status(doc)? {
        return Ok(None);
    }
    let base = || Query::root().elements(&["thermophysical_models", "ale_method"]);
    let truncated = |name: &str| -> Result<Option<i32>, StrError> {
        Ok(doc.get_double(&base().element(name).text())?.map(|v| v as i32))
    };
    let mut ale = AleParameters::default();
    ale.sub_iterations = truncated("fluid_initialization_sub_iterations")?;
    ale.max_iterations = truncated("max_iterations_implicitation")?;
    ale.precision = doc.get_double(&base().element("implicitation_precision").text())?;
    let q = base().element("mesh_viscosity");
    if doc.count(&q) > 0 {
        ale.mesh_viscosity = match doc.get_attribute(&q.attribute("type")).as_deref() {
            Some("isotrop") => Some(MeshViscosity::Isotropic),
            Some("orthotrop") => Some(MeshViscosity::Orthotropic),
            _ => return Err("mesh viscosity type must be 'isotrop' or 'orthotrop'"),
        };
    }
    Ok(Some(ale))
}

/// Reads the reference values used to initialize the turbulence
pub fn read_turbulence_init(doc: &Document) -> Result<TurbulenceInit, StrError> {
    let base = || Query::root().elements(&["thermophysical_models", "turbulence", "initialization"]);
    let mut init = TurbulenceInit::default();
    init.choice = doc.get_attribute(&base().attribute("choice"));
    init.reference_velocity = doc.get_double(&base().element("reference_velocity").text())?;
    if init.choice.as_deref() == Some("reference_velocity_length") {
        init.reference_length = doc.get_double(&base().element("reference_length").text())?;
    }
    Ok(init)
}

/// Reads the labels of the user scalars in document order
pub fn read_scalar_labels(doc: &Document) -> Result<Vec<String>, StrError> {
    let n = doc.count(&Query::root().elements(&["additional_scalars", "scalar"]));
    let mut labels = Vec::with_capacity(n);
    for i in 1..=n {
        let q = Query::root()
            .element("additional_scalars")
            .element_num("scalar", i)
            .attribute("label");
        labels.push(doc.get_attribute(&q).ok_or("user scalar must have a label")?);
    }
    Ok(labels)
}

/// Builds the variable table from the turbulence model, the ALE status, and the user scalars
pub fn read_variables(doc: &Document) -> Result<VariableTable, StrError> {
    let turbulence = read_turbulence(doc)?;
    let ale = read_ale_status(doc)?;
    let labels = read_scalar_labels(doc)?;
    let variables = VariableTable::new(turbulence.model, ale, &labels)?;
    log::info!(
        "turbulence model {} (code {}), ALE {}, {} variables including {} user scalars",
        turbulence.model.tag(),
        turbulence.model.code(),
        if ale { "on" } else { "off" },
        variables.len(),
        variables.n_user_scalar
    );
    Ok(variables)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
