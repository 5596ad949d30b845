use super::{Expr, FaceSelector, Selection};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the selection attributes of one boundary face
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct FaceTags {
    /// Group names
    #[serde(default)]
    pub groups: Vec<String>,

    /// Color (integer attribute)
    #[serde(default)]
    pub color: Option<i32>,

    /// Face center
    #[serde(default)]
    pub center: Option<[f64; 3]>,

    /// Outward face normal (its norm is the face area)
    #[serde(default)]
    pub normal: Option<[f64; 3]>,
}

impl FaceTags {
    /// Allocates a new instance with the given groups
    pub fn new(groups: &[&str]) -> Self {
        FaceTags {
            groups: groups.iter().map(|g| g.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Sets the color
    pub fn with_color(mut self, color: i32) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the face center
    pub fn with_center(mut self, center: [f64; 3]) -> Self {
        self.center = Some(center);
        self
    }

    /// Sets the outward face normal
    pub fn with_normal(mut self, normal: [f64; 3]) -> Self {
        self.normal = Some(normal);
        self
    }

    /// Evaluates a selection expression on this face
    fn matches(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Group(name) => self.groups.iter().any(|g| g == name),
            Expr::Color(color) => self.color == Some(*color),
            Expr::All => true,
            Expr::InBox(b) => match self.center {
                Some(x) => (0..3).all(|i| x[i] >= b[i] && x[i] <= b[3 + i]),
                None => false,
            },
            Expr::Plane { axis, compare, value } => match self.center {
                Some(x) => compare.holds(x[*axis], *value),
                None => false,
            },
            Expr::Not(a) => !self.matches(a),
            Expr::And(a, b) => self.matches(a) && self.matches(b),
            Expr::Or(a, b) => self.matches(a) || self.matches(b),
        }
    }
}

/// Implements a face selector over group names, colors, and face centers
///
/// Face ids are the positions in `faces` (0-based).
///
/// # Examples
///
/// ```
/// use fvbc::prelude::*;
///
/// let selector = GroupSelector::from_groups(&["inlet", "inlet", "walls", "outlet"]);
/// let selection = selector.select("inlet or outlet or exit").unwrap();
/// assert_eq!(selection.faces, &[0, 1, 3]);
/// assert_eq!(selection.missing, &["exit"]);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GroupSelector {
    /// Attributes of each boundary face
    pub faces: Vec<FaceTags>,
}

impl GroupSelector {
    /// Allocates a new instance
    pub fn new(faces: Vec<FaceTags>) -> Self {
        GroupSelector { faces }
    }

    /// Allocates a new instance with one group per face
    pub fn from_groups(groups: &[&str]) -> Self {
        GroupSelector {
            faces: groups.iter().map(|g| FaceTags::new(&[*g])).collect(),
        }
    }

    /// Returns the number of boundary faces
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Returns the outward normals of all faces, if every face has one
    pub fn normals(&self) -> Option<Vec<[f64; 3]>> {
        self.faces.iter().map(|f| f.normal).collect()
    }

    /// Indicates whether some face carries the group name or color given as text
    fn carries(&self, fragment: &str) -> bool {
        let color = fragment.parse::<i32>().ok();
        self.faces
            .iter()
            .any(|f| f.groups.iter().any(|g| g == fragment) || (color.is_some() && f.color == color))
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
        let selector = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(selector)
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

impl FaceSelector for GroupSelector {
    fn select(&self, expression: &str) -> Result<Selection, StrError> {
        if expression.trim().is_empty() {
            return Ok(Selection::default());
        }
        let expr = Expr::parse(expression)?;
        let faces = self
            .faces
            .iter()
            .enumerate()
            .filter(|(_, tags)| tags.matches(&expr))
            .map(|(f, _)| f)
            .collect();
        let missing = expr
            .fragments()
            .into_iter()
            .filter(|fragment| !self.carries(fragment))
            .collect();
        Ok(Selection { faces, missing })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
