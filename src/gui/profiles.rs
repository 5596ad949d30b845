use crate::base::DEFAULT_PROFILE_POINTS;
use crate::xml::{Document, Query};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

/// Holds the parameters of one 1D profile (a segment sampled at regular points)
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Label, also the base name of the output file
    pub label: String,

    /// Names of the sampled variables or properties
    pub variables: Vec<String>,

    /// First end of the segment
    pub start: [f64; 3],

    /// Second end of the segment
    pub end: [f64; 3],

    /// Output frequency: -1 writes at the last time step only; n > 0 writes every n steps
    pub frequency: i32,

    /// Number of sample points
    pub points: usize,
}

impl Profile {
    /// Indicates whether the profile is written at time step `ntcabs` of a run ending at `ntmabs`
    pub fn is_output_step(&self, ntcabs: i32, ntmabs: i32) -> bool {
        (self.frequency == -1 && ntcabs == ntmabs) || (self.frequency > 0 && ntcabs % self.frequency == 0)
    }

    /// Returns the output file name (without extension)
    ///
    /// With a positive frequency, the time step is appended and zero-padded to the number of
    /// digits of `ntmabs`, so that the files of one run sort in time order.
    pub fn file_name(&self, ntcabs: i32, ntmabs: i32) -> String {
        if self.frequency > 0 {
            let width = ntmabs.max(1).to_string().len();
            format!("{}_{:0width$}", self.label, ntcabs, width = width)
        } else {
            self.label.clone()
        }
    }

    /// Returns the equally spaced sample points, both ends included
    pub fn sample_points(&self) -> Vec<[f64; 3]> {
        let den = (self.points.max(2) - 1) as f64;
        (0..self.points)
            .map(|i| {
                let t = i as f64 / den;
                let mut x = [0.0; 3];
                for k in 0..3 {
                    x[k] = self.start[k] + t * (self.end[k] - self.start[k]);
                }
                x
            })
            .collect()
    }

    /// Writes the sampled values to `<dir>/<file_name>.dat`
    ///
    /// # Input
    ///
    /// * `dir` -- output directory (created if needed)
    /// * `ntcabs` -- current time step
    /// * `ntmabs` -- last time step of the run
    /// * `ttcabs` -- current time
    /// * `values` -- one column per variable, each with one value per sample point
    pub fn write_file<P>(&self, dir: &P, ntcabs: i32, ntmabs: i32, ttcabs: f64, values: &[Vec<f64>]) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        if values.len() != self.variables.len() {
            return Err("there must be one column of values per profile variable");
        }
        if values.iter().any(|column| column.len() != self.points) {
            return Err("each column of values must have one value per sample point");
        }
        let mut buffer = String::new();
        write!(&mut buffer, "# 1D profile '{}'\n", self.label).map_err(|_| "cannot write buffer")?;
        write!(&mut buffer, "# iteration {} at time {}\n", ntcabs, ttcabs).map_err(|_| "cannot write buffer")?;
        write!(&mut buffer, "# s x y z").map_err(|_| "cannot write buffer")?;
        for name in &self.variables {
            write!(&mut buffer, " {}", name).map_err(|_| "cannot write buffer")?;
        }
        buffer.push('\n');
        let points = self.sample_points();
        for (i, x) in points.iter().enumerate() {
            let s = distance(&self.start, x);
            write!(&mut buffer, "{:13.5e}{:13.5e}{:13.5e}{:13.5e}", s, x[0], x[1], x[2])
                .map_err(|_| "cannot write buffer")?;
            for column in values {
                write!(&mut buffer, "{:13.5e}", column[i]).map_err(|_| "cannot write buffer")?;
            }
            buffer.push('\n');
        }
        let dir = Path::new(dir);
        fs::create_dir_all(dir).map_err(|_| "cannot create directory")?;
        let path = dir.join(format!("{}.dat", self.file_name(ntcabs, ntmabs)));
        fs::write(&path, buffer).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2) + (b[2] - a[2]).powi(2)).sqrt()
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "profile '{}': ({}, {}, {}) to ({}, {}, {}), {} points, frequency {}, variables {:?}",
            self.label,
            self.start[0],
            self.start[1],
            self.start[2],
            self.end[0],
            self.end[1],
            self.end[2],
            self.points,
            self.frequency,
            self.variables
        )
    }
}

/// Reads the 1D profiles
///
/// # Document layout
///
/// ```text
/// analysis_control/profiles/profile[@label]
/// ├── var_prop[@name]
/// ├── x1, y1, z1, x2, y2, z2
/// ├── output_frequency
/// └── points                             (optional)
/// ```
pub fn read_profiles(doc: &Document) -> Result<Vec<Profile>, StrError> {
    let n = doc.count(&Query::root().elements(&["analysis_control", "profiles", "profile"]));
    let mut profiles = Vec::with_capacity(n);
    for i in 1..=n {
        let base = Query::root()
            .elements(&["analysis_control", "profiles"])
            .element_num("profile", i);
        let label = doc
            .get_attribute(&base.clone().attribute("label"))
            .ok_or("profile must have a label")?;
        let nvar = doc.count(&base.clone().element("var_prop"));
        let mut variables = Vec::with_capacity(nvar);
        for j in 1..=nvar {
            let q = base.clone().element_num("var_prop", j).attribute("name");
            variables.push(doc.get_attribute(&q).ok_or("profile variable must have a name")?);
        }
        let real = |name: &str| -> Result<f64, StrError> {
            doc.get_double(&base.clone().element(name).text())?
                .ok_or("profile must have x1, y1, z1, x2, y2, z2, and output_frequency")
        };
        let start = [real("x1")?, real("y1")?, real("z1")?];
        let end = [real("x2")?, real("y2")?, real("z2")?];
        // stored as a real number in the document
        let frequency = real("output_frequency")? as i32;
        let points = match doc.get_int(&base.clone().element("points").text())? {
            Some(p) if p >= 2 => p as usize,
            Some(_) => return Err("profile must have at least two points"),
            None => DEFAULT_PROFILE_POINTS,
        };
        let profile = Profile {
            label,
            variables,
            start,
            end,
            frequency,
            points,
        };
        log::debug!("{}", profile);
        profiles.push(profile);
    }
    Ok(profiles)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
