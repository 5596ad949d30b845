use super::{TurbulenceModel, VarKind};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds one solver variable
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Variable {
    /// Name (for scalars, the user label)
    pub name: String,

    /// Document section the variable belongs to (e.g., "velocity_pressure")
    pub head: String,

    /// Solved field or transported scalar
    pub kind: VarKind,
}

/// Holds the ordered table of solver variables
///
/// The position of a variable in the table is its solver index (0-based).
///
/// # Order
///
/// 1. pressure and velocity components
/// 2. turbulence variables of the selected model
/// 3. mesh velocity components (ALE only)
/// 4. user scalars
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VariableTable {
    /// All variables, in solver order
    pub all: Vec<Variable>,

    /// Number of user scalars (NSCAUS)
    pub n_user_scalar: usize,
}

impl VariableTable {
    /// Allocates a new table
    ///
    /// # Input
    ///
    /// * `turbulence` -- selected turbulence model
    /// * `ale` -- whether the mesh moves (adds the mesh velocity components)
    /// * `scalar_labels` -- labels of the user scalars in document order
    pub fn new(turbulence: TurbulenceModel, ale: bool, scalar_labels: &[String]) -> Result<Self, StrError> {
        let mut all = Vec::new();
        let mut push = |name: &str, head: &str, kind: VarKind| {
            all.push(Variable {
                name: name.to_string(),
                head: head.to_string(),
                kind,
            })
        };
        for name in ["pressure", "velocity_U", "velocity_V", "velocity_W"] {
            push(name, "velocity_pressure", VarKind::Variable);
        }
        for name in turbulence.variable_names() {
            push(name, "turbulence", VarKind::Variable);
        }
        if ale {
            for name in ["mesh_velocity_U", "mesh_velocity_V", "mesh_velocity_W"] {
                push(name, "ale_method", VarKind::Variable);
            }
        }
        for label in scalar_labels {
            if label.is_empty() {
                return Err("user scalar label must not be empty");
            }
            push(label, "additional_scalar", VarKind::Scalar);
        }
        // labels must not shadow each other or the predefined names
        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                if all[i].name == all[j].name {
                    return Err("user scalar labels must be unique and differ from variable names");
                }
            }
        }
        Ok(VariableTable {
            all,
            n_user_scalar: scalar_labels.len(),
        })
    }

    /// Returns the number of variables (NVAR)
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns the solver index of a variable given its name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.all.iter().position(|v| v.name == name)
    }

    /// Returns the index of the first user scalar
    pub fn first_user_scalar(&self) -> usize {
        self.all.len() - self.n_user_scalar
    }

    /// Returns an iterator over (index, label) of the user scalars
    pub fn user_scalars(&self) -> impl Iterator<Item = (usize, &str)> {
        let first = self.first_user_scalar();
        self.all[first..]
            .iter()
            .enumerate()
            .map(move |(i, v)| (first + i, v.name.as_str()))
    }

    /// Returns the indices of the velocity components
    pub fn velocity(&self) -> [usize; 3] {
        [1, 2, 3]
    }
}

impl fmt::Display for VariableTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variables\n")?;
        write!(f, "=========\n")?;
        for (i, v) in self.all.iter().enumerate() {
            write!(f, "{}: {} ({}, {:?})\n", i, v.name, v.head, v.kind)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
