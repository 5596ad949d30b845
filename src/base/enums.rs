use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines the physical condition category of a boundary zone
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Nature {
    Inlet,
    Wall,
    Outlet,
    Symmetry,
    Undefined,
}

impl Nature {
    /// Returns the nature corresponding to a document tag (e.g., "inlet")
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "inlet" => Some(Nature::Inlet),
            "wall" => Some(Nature::Wall),
            "outlet" => Some(Nature::Outlet),
            "symmetry" => Some(Nature::Symmetry),
            "undefined" => Some(Nature::Undefined),
            _ => None,
        }
    }

    /// Returns the document tag
    pub fn tag(&self) -> &'static str {
        match self {
            Nature::Inlet => "inlet",
            Nature::Wall => "wall",
            Nature::Outlet => "outlet",
            Nature::Symmetry => "symmetry",
            Nature::Undefined => "undefined",
        }
    }

    /// Returns the face kind implied by this nature
    ///
    /// A wall is rough if a roughness height is given, smooth otherwise.
    pub fn face_kind(&self, rough: bool) -> FaceKind {
        match self {
            Nature::Inlet => FaceKind::Inlet,
            Nature::Wall => {
                if rough {
                    FaceKind::RoughWall
                } else {
                    FaceKind::SmoothWall
                }
            }
            Nature::Outlet => FaceKind::Outlet,
            Nature::Symmetry => FaceKind::Symmetry,
            Nature::Undefined => FaceKind::Undefined,
        }
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Defines the solver's classification of a boundary face (the ITYPFB categories)
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum FaceKind {
    Undefined,
    Inlet,
    SmoothWall,
    RoughWall,
    Symmetry,
    Outlet,
}

impl FaceKind {
    /// Returns the kind used for consistency checks (rough walls count as smooth walls)
    pub fn folded(&self) -> Self {
        match self {
            FaceKind::RoughWall => FaceKind::SmoothWall,
            other => *other,
        }
    }
}

/// Defines how a boundary value is imposed for one variable
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum BcCode {
    /// Prescribed value (stored in `val1`)
    Dirichlet,

    /// Prescribed flux (stored in `val3`)
    Neumann,

    /// Prescribed value handled by a wall function (stored in `val1`)
    WallFunction,

    /// Prescribed value and exchange coefficient (stored in `val1` and `val2`)
    ExchangeCoefficient,
}

impl BcCode {
    /// Returns the code corresponding to a document choice (e.g., "neumann")
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "dirichlet" => Some(BcCode::Dirichlet),
            "neumann" => Some(BcCode::Neumann),
            "wall_function" => Some(BcCode::WallFunction),
            "exchange_coefficient" => Some(BcCode::ExchangeCoefficient),
            _ => None,
        }
    }
}

/// Distinguishes solved fields from transported scalars
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum VarKind {
    Variable,
    Scalar,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
