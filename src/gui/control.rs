use crate::xml::{Document, Query};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds the time stepping parameters
///
/// A None field keeps the solver default. The steady fields (`relaxation_coefficient`) and the
/// unsteady fields (`time_step_*`, `max_*_number`, `thermal_time_step`) are exclusive.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TimeParameters {
    /// Steady algorithm (IDTVAR = -1)
    pub steady: bool,

    /// Absolute number of the last time step or iteration (NTMABS)
    pub iterations: Option<i32>,

    /// Zero time step or iteration (INPDT0)
    pub zero_time_step: Option<bool>,

    /// Relaxation coefficient of the steady algorithm (RELXST)
    pub relaxation_coefficient: Option<f64>,

    /// Reference time step (DTREF)
    pub time_step_ref: Option<f64>,

    /// Minimum time step (DTMIN)
    pub time_step_min: Option<f64>,

    /// Maximum time step (DTMAX)
    pub time_step_max: Option<f64>,

    /// Maximum Courant number (COUMAX)
    pub max_courant_number: Option<f64>,

    /// Maximum Fourier number (FOUMAX)
    pub max_fourier_number: Option<f64>,

    /// Maximum variation of the time step between two steps (VARRDT)
    pub time_step_variation: Option<f64>,

    /// Time step limited by the thermal stratification (IPTLRO)
    pub thermal_time_step: Option<bool>,
}

/// Holds the restart switches
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RestartParameters {
    /// Restart from a previous calculation (ISUITE)
    pub restart: Option<bool>,

    /// Read the auxiliary restart file (ILEAUX)
    pub with_auxiliary: Option<bool>,

    /// Frozen velocity field (ICCVFG)
    pub frozen_field: Option<bool>,
}

/// Reads the time stepping parameters
///
/// The algorithm is steady if `analysis_control/steady_management` has the status "on".
///
/// # Document layout
///
/// ```text
/// analysis_control
/// ├── steady_management[@status]
/// │   ├── iterations, relaxation_coefficient
/// │   └── zero_iteration[@status]
/// └── time_parameters
///     ├── iterations, time_step_ref, time_step_min, time_step_max
///     ├── max_courant_num, max_fourier_num, time_step_var
///     └── zero_time_step[@status], thermal_time_step[@status]
/// ```
pub fn read_time_parameters(doc: &Document) -> Result<TimeParameters, StrError> {
    let steady_management = || Query::root().elements(&["analysis_control", "steady_management"]);
    let mut time = TimeParameters::default();
    time.steady = doc
        .get_status(&steady_management().attribute("status"))?
        .unwrap_or(false);
    let base = if time.steady {
        steady_management()
    } else {
        Query::root().elements(&["analysis_control", "time_parameters"])
    };
    let value = |name: &str| doc.get_double(&base.clone().element(name).text());
    let status = |name: &str| doc.get_status(&base.clone().element(name).attribute("status"));

    // the front-end writes the number of iterations as a real number
    time.iterations = value("iterations")?.map(|v| v as i32);
    if time.steady {
        time.zero_time_step = status("zero_iteration")?;
        time.relaxation_coefficient = value("relaxation_coefficient")?;
    } else {
        time.zero_time_step = status("zero_time_step")?;
        time.time_step_ref = value("time_step_ref")?;
        time.time_step_min = value("time_step_min")?;
        time.time_step_max = value("time_step_max")?;
        time.max_courant_number = value("max_courant_num")?;
        time.max_fourier_number = value("max_fourier_num")?;
        time.time_step_variation = value("time_step_var")?;
        time.thermal_time_step = status("thermal_time_step")?;
    }
    if let (Some(min), Some(max)) = (time.time_step_min, time.time_step_max) {
        if min > max {
            return Err("minimum time step must not exceed the maximum time step");
        }
    }
    log::debug!("\n{}", time);
    Ok(time)
}

/// Reads the restart switches from `calcul_management/start_restart`
pub fn read_restart_parameters(doc: &Document) -> Result<RestartParameters, StrError> {
    let status = |name: &str| {
        let q = Query::root()
            .elements(&["calcul_management", "start_restart", name])
            .attribute("status");
        doc.get_status(&q)
    };
    Ok(RestartParameters {
        restart: status("restart")?,
        with_auxiliary: status("restart_with_auxiliary")?,
        frozen_field: status("frozen_field")?,
    })
}

fn show<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => format!("{}", v),
        None => "default".to_string(),
    }
}

impl fmt::Display for TimeParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time parameters\n")?;
        write!(f, "===============\n")?;
        write!(f, "steady = {}\n", self.steady)?;
        write!(f, "iterations = {}\n", show(&self.iterations))?;
        write!(f, "zero_time_step = {}\n", show(&self.zero_time_step))?;
        if self.steady {
            write!(f, "relaxation_coefficient = {}\n", show(&self.relaxation_coefficient))?;
        } else {
            write!(f, "time_step_ref = {}\n", show(&self.time_step_ref))?;
            write!(f, "time_step_min = {}\n", show(&self.time_step_min))?;
            write!(f, "time_step_max = {}\n", show(&self.time_step_max))?;
            write!(f, "max_courant_number = {}\n", show(&self.max_courant_number))?;
            write!(f, "max_fourier_number = {}\n", show(&self.max_fourier_number))?;
            write!(f, "time_step_variation = {}\n", show(&self.time_step_variation))?;
            write!(f, "thermal_time_step = {}\n", show(&self.thermal_time_step))?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
