use crate::base::{VarKind, VariableTable};
use crate::xml::{Document, Query};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds the output options of one variable
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct VariablePost {
    /// Variable name (for scalars, the user label)
    pub name: String,

    /// Label shown in the outputs
    pub label: String,

    /// Written to the post-processing files (ICHRVR)
    pub postprocessing: bool,

    /// Printed in the listing (ILISVR)
    pub listing: bool,

    /// Number of recorded probes (IHISVR(.,1)); -1 means all probes
    pub n_probes: i32,

    /// Numbers of the recorded probes (IHISVR(.,2:))
    pub probes: Vec<i32>,
}

/// Holds the post-processing switches of the boundary surface variables
///
/// The solver packs the switches into one code (IPSTDV), a product of prime factors.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SurfaceOutput {
    /// Dimensionless wall distance (IPSTYP)
    pub yplus: bool,

    /// Boundary variables (IPSTCL)
    pub all_variables: bool,

    /// Thermal flux (IPSTFT)
    pub input_thermal_flux: bool,

    /// Efforts on the boundary (IPSTFO)
    pub effort: bool,
}

impl SurfaceOutput {
    /// Prime factors of IPSTYP, IPSTCL, IPSTFT, IPSTFO
    pub const FACTORS: [i32; 4] = [2, 3, 5, 7];

    /// Returns the packed solver code (IPSTDV)
    pub fn code(&self) -> i32 {
        [self.yplus, self.all_variables, self.input_thermal_flux, self.effort]
            .iter()
            .zip(SurfaceOutput::FACTORS)
            .filter(|(on, _)| **on)
            .map(|(_, factor)| factor)
            .product()
    }
}

impl Default for SurfaceOutput {
    fn default() -> Self {
        SurfaceOutput {
            yplus: true,
            all_variables: true,
            input_thermal_flux: true,
            effort: true,
        }
    }
}

/// Holds the output control parameters
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct OutputControl {
    /// Listing printing frequency (NTLIST)
    pub listing_frequency: Option<i32>,

    /// Post-processing output frequency (NTCHR)
    pub postprocessing_frequency: Option<i32>,

    /// Probe recording frequency (NTHIST)
    pub probe_frequency: Option<i32>,

    /// Post-processing of the fluid domain (ICHRVL)
    pub fluid_domain: Option<bool>,

    /// Post-processing of the domain boundary (ICHRBO)
    pub domain_boundary: Option<bool>,

    /// Post-processing of the boundary coupled with the thermal code (ICHRSY)
    pub syrthes_boundary: Option<bool>,

    /// Post-processing of the boundary surface variables
    pub surface: SurfaceOutput,

    /// Writing of the auxiliary restart file (IECAUX)
    pub auxiliary_restart: Option<bool>,

    /// Mesh options of the post-processing (ICHRMD)
    pub mesh_options: Option<i32>,

    /// Post-processing format (FMTCHR)
    pub format: Option<String>,

    /// Post-processing format options (OPTCHR)
    pub format_options: Option<String>,

    /// Probe coordinates
    pub probes: Vec<[f64; 3]>,

    /// Output options per variable, in the order of the variable table
    pub variables: Vec<VariablePost>,
}

/// Reads the output control parameters
///
/// # Document layout
///
/// ```text
/// analysis_control/output
/// ├── listing_printing_frequency, postprocessing_frequency, probe_recording_frequency
/// ├── fluid_domain[@status], domain_boundary[@status], syrthes_boundary[@status]
/// ├── auxiliary_restart_file_writing[@status]
/// ├── postprocessing_mesh_options[@choice], postprocessing_format[@choice], postprocessing_options[@choice]
/// └── probe[@name]                       probe_x, probe_y, probe_z
/// property[@name]/postprocessing_recording[@status]
///                                        (yplus, effort, all_variables, input_thermal_flux)
/// variable[@name] or additional_scalars/scalar[@label]
/// ├── postprocessing_recording[@status]
/// ├── listing_printing[@status]
/// └── probes[@choice]                    probe_recording[@name]
/// ```
pub fn read_output_control(doc: &Document, variables: &VariableTable) -> Result<OutputControl, StrError> {
    let output = || Query::root().elements(&["analysis_control", "output"]);
    let mut control = OutputControl::default();

    control.listing_frequency = doc.get_int(&output().element("listing_printing_frequency").text())?;
    control.postprocessing_frequency = doc.get_int(&output().element("postprocessing_frequency").text())?;
    control.probe_frequency = doc.get_int(&output().element("probe_recording_frequency").text())?;

    control.fluid_domain = doc.get_status(&output().element("fluid_domain").attribute("status"))?;
    control.domain_boundary = doc.get_status(&output().element("domain_boundary").attribute("status"))?;
    control.syrthes_boundary = doc.get_status(&output().element("syrthes_boundary").attribute("status"))?;
    let q = output().element("auxiliary_restart_file_writing").attribute("status");
    control.auxiliary_restart = doc.get_status(&q)?;

    let q = output().element("postprocessing_mesh_options").attribute("choice");
    control.mesh_options = match doc.get_attribute(&q) {
        Some(choice) => Some(
            choice
                .trim()
                .parse()
                .map_err(|_| "postprocessing mesh option must be an integer")?,
        ),
        None => None,
    };
    control.format = doc.get_attribute(&output().element("postprocessing_format").attribute("choice"));
    control.format_options = doc.get_attribute(&output().element("postprocessing_options").attribute("choice"));

    // a surface variable is written unless its recording status is "off"
    let surface = |name: &str| -> Result<bool, StrError> {
        let q = Query::anywhere()
            .element("property")
            .test_attribute("name", name)
            .element("postprocessing_recording")
            .attribute("status");
        Ok(doc.get_status(&q)?.unwrap_or(true))
    };
    control.surface = SurfaceOutput {
        yplus: surface("yplus")?,
        all_variables: surface("all_variables")?,
        input_thermal_flux: surface("input_thermal_flux")?,
        effort: surface("effort")?,
    };

    let n = doc.count(&output().element("probe"));
    for i in 1..=n {
        let probe = output().element("probe").test_attribute("name", &i.to_string());
        let mut x = [0.0; 3];
        for (j, name) in ["probe_x", "probe_y", "probe_z"].iter().enumerate() {
            x[j] = doc
                .get_double(&probe.clone().element(name).text())?
                .ok_or("probe must have probe_x, probe_y, and probe_z")?;
        }
        control.probes.push(x);
    }

    for var in &variables.all {
        let base = match var.kind {
            VarKind::Variable => Query::anywhere().element("variable").test_attribute("name", &var.name),
            VarKind::Scalar => Query::root()
                .elements(&["additional_scalars", "scalar"])
                .test_attribute("label", &var.name),
        };
        let status = |name: &str| doc.get_status(&base.clone().element(name).attribute("status"));
        let postprocessing = status("postprocessing_recording")?.unwrap_or(true);
        let listing = status("listing_printing")?.unwrap_or(true);
        let n_probes: i32 = match doc.get_attribute(&base.clone().element("probes").attribute("choice")) {
            Some(choice) => choice.trim().parse().map_err(|_| "probes choice must be an integer")?,
            None => -1,
        };
        let mut probes = Vec::new();
        for j in 1..=n_probes.max(0) as usize {
            let q = base
                .clone()
                .element("probes")
                .element_num("probe_recording", j)
                .attribute("name");
            let number: i32 = doc
                .get_attribute(&q)
                .ok_or("probe_recording must have a name")?
                .trim()
                .parse()
                .map_err(|_| "probe_recording name must be an integer")?;
            if number < 1 || number as usize > control.probes.len() {
                return Err("probe_recording refers to an undefined probe");
            }
            probes.push(number);
        }
        let label = match var.kind {
            VarKind::Variable => doc
                .get_attribute(&base.clone().attribute("label"))
                .unwrap_or_else(|| var.name.clone()),
            VarKind::Scalar => var.name.clone(),
        };
        control.variables.push(VariablePost {
            name: var.name.clone(),
            label,
            postprocessing,
            listing,
            n_probes,
            probes,
        });
    }
    log::info!(
        "output control with {} probes and {} variables",
        control.probes.len(),
        control.variables.len()
    );
    Ok(control)
}

fn show<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => format!("{}", v),
        None => "default".to_string(),
    }
}

impl fmt::Display for OutputControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Output control\n")?;
        write!(f, "==============\n")?;
        write!(f, "listing_frequency = {}\n", show(&self.listing_frequency))?;
        write!(f, "postprocessing_frequency = {}\n", show(&self.postprocessing_frequency))?;
        write!(f, "probe_frequency = {}\n", show(&self.probe_frequency))?;
        write!(f, "fluid_domain = {}\n", show(&self.fluid_domain))?;
        write!(f, "domain_boundary = {}\n", show(&self.domain_boundary))?;
        write!(f, "syrthes_boundary = {}\n", show(&self.syrthes_boundary))?;
        write!(f, "surface_code = {}\n", self.surface.code())?;
        write!(f, "auxiliary_restart = {}\n", show(&self.auxiliary_restart))?;
        write!(f, "mesh_options = {}\n", show(&self.mesh_options))?;
        write!(f, "format = {}\n", show(&self.format))?;
        write!(f, "format_options = {}\n", show(&self.format_options))?;
        write!(f, "\nProbes\n")?;
        write!(f, "======\n")?;
        for (i, x) in self.probes.iter().enumerate() {
            write!(f, "{}: ({}, {}, {})\n", i + 1, x[0], x[1], x[2])?;
        }
        write!(f, "\nVariables\n")?;
        write!(f, "=========\n")?;
        for v in &self.variables {
            write!(
                f,
                "{} '{}': post = {}, listing = {}, probes = {} {:?}\n",
                v.name, v.label, v.postprocessing, v.listing, v.n_probes, v.probes
            )?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
