use super::{FaceKind, DEFAULT_MAX_ZONES};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the integer codes used by the solver to classify boundary faces
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct FaceKindCodes {
    /// Code of faces without a defined condition (IINDEF)
    pub undefined: i32,

    /// Code of inlet faces (IENTRE)
    pub inlet: i32,

    /// Code of outlet faces (ISOLIB)
    pub outlet: i32,

    /// Code of symmetry faces (ISYMET)
    pub symmetry: i32,

    /// Code of smooth wall faces (IPAROI)
    pub smooth_wall: i32,

    /// Code of rough wall faces (IPARUG)
    pub rough_wall: i32,
}

impl FaceKindCodes {
    /// Returns the solver code of a face kind
    pub fn code(&self, kind: FaceKind) -> i32 {
        match kind {
            FaceKind::Undefined => self.undefined,
            FaceKind::Inlet => self.inlet,
            FaceKind::Outlet => self.outlet,
            FaceKind::Symmetry => self.symmetry,
            FaceKind::SmoothWall => self.smooth_wall,
            FaceKind::RoughWall => self.rough_wall,
        }
    }

    /// Returns the face kind of a solver code, if the code is known
    pub fn kind(&self, code: i32) -> Option<FaceKind> {
        [
            FaceKind::Undefined,
            FaceKind::Inlet,
            FaceKind::Outlet,
            FaceKind::Symmetry,
            FaceKind::SmoothWall,
            FaceKind::RoughWall,
        ]
        .into_iter()
        .find(|k| self.code(*k) == code)
    }

    fn all(&self) -> [i32; 6] {
        [
            self.undefined,
            self.inlet,
            self.outlet,
            self.symmetry,
            self.smooth_wall,
            self.rough_wall,
        ]
    }
}

impl Default for FaceKindCodes {
    fn default() -> Self {
        FaceKindCodes {
            undefined: 1,
            inlet: 2,
            outlet: 3,
            symmetry: 4,
            smooth_wall: 5,
            rough_wall: 6,
        }
    }
}

/// Holds the run configuration of the translation layer
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Upper bound on boundary zone numbers (NOZPPM)
    pub max_zones: i32,

    /// Solver codes for boundary face kinds
    pub face_kinds: FaceKindCodes,

    /// Logging level used by the command-line tool
    pub log_level: String,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Config {
            max_zones: DEFAULT_MAX_ZONES,
            face_kinds: FaceKindCodes::default(),
            log_level: "info".to_string(),
        }
    }

    /// Sets the maximum zone number
    pub fn set_max_zones(&mut self, value: i32) -> Result<&mut Self, StrError> {
        if value < 1 {
            return Err("max_zones must be ≥ 1");
        }
        self.max_zones = value;
        Ok(self)
    }

    /// Sets the solver codes for boundary face kinds
    pub fn set_face_kinds(&mut self, codes: FaceKindCodes) -> Result<&mut Self, StrError> {
        let all = codes.all();
        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                if all[i] == all[j] {
                    return Err("face kind codes must be distinct");
                }
            }
        }
        self.face_kinds = codes;
        Ok(self)
    }

    /// Sets the logging level (off, error, warn, info, debug, trace)
    pub fn set_log_level(&mut self, level: &str) -> Result<&mut Self, StrError> {
        match level {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => (),
            _ => return Err("log_level must be one of off, error, warn, info, debug, trace"),
        }
        self.log_level = level.to_string();
        Ok(self)
    }

    /// Reads a JSON file containing this struct
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        // run the same checks as the setters
        let (max_zones, face_kinds, log_level) = (config.max_zones, config.face_kinds, config.log_level.clone());
        config
            .set_max_zones(max_zones)?
            .set_face_kinds(face_kinds)?
            .set_log_level(&log_level)?;
        Ok(config)
    }

    /// Writes a JSON file with this struct
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer_pretty(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n")?;
        write!(f, "==================\n")?;
        write!(f, "max_zones = {}\n", self.max_zones)?;
        write!(f, "log_level = {}\n", self.log_level)?;
        write!(f, "\nFace kind codes\n")?;
        write!(f, "===============\n")?;
        let c = &self.face_kinds;
        write!(f, "undefined = {}\n", c.undefined)?;
        write!(f, "inlet = {}\n", c.inlet)?;
        write!(f, "outlet = {}\n", c.outlet)?;
        write!(f, "symmetry = {}\n", c.symmetry)?;
        write!(f, "smooth_wall = {}\n", c.smooth_wall)?;
        write!(f, "rough_wall = {}\n", c.rough_wall)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
