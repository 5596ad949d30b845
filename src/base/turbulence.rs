use serde::{Deserialize, Serialize};

/// Defines the turbulence models selectable in the front-end
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum TurbulenceModel {
    Off,
    MixingLength,
    KEpsilon,
    KEpsilonLinearProduction,
    RijEpsilon,
    RijSsg,
    LesSmagorinsky,
    LesDynamic,
    V2fPhi,
    KOmegaSst,
}

impl TurbulenceModel {
    /// Returns the model corresponding to a document tag (e.g., "k-epsilon")
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "off" => Some(TurbulenceModel::Off),
            "mixing_length" => Some(TurbulenceModel::MixingLength),
            "k-epsilon" => Some(TurbulenceModel::KEpsilon),
            "k-epsilon-PL" => Some(TurbulenceModel::KEpsilonLinearProduction),
            "Rij-epsilon" => Some(TurbulenceModel::RijEpsilon),
            "Rij-SSG" => Some(TurbulenceModel::RijSsg),
            "LES_Smagorinsky" => Some(TurbulenceModel::LesSmagorinsky),
            "LES_dynamique" => Some(TurbulenceModel::LesDynamic),
            "v2f-phi" => Some(TurbulenceModel::V2fPhi),
            "k-omega-SST" => Some(TurbulenceModel::KOmegaSst),
            _ => None,
        }
    }

    /// Returns the document tag
    pub fn tag(&self) -> &'static str {
        match self {
            TurbulenceModel::Off => "off",
            TurbulenceModel::MixingLength => "mixing_length",
            TurbulenceModel::KEpsilon => "k-epsilon",
            TurbulenceModel::KEpsilonLinearProduction => "k-epsilon-PL",
            TurbulenceModel::RijEpsilon => "Rij-epsilon",
            TurbulenceModel::RijSsg => "Rij-SSG",
            TurbulenceModel::LesSmagorinsky => "LES_Smagorinsky",
            TurbulenceModel::LesDynamic => "LES_dynamique",
            TurbulenceModel::V2fPhi => "v2f-phi",
            TurbulenceModel::KOmegaSst => "k-omega-SST",
        }
    }

    /// Returns the solver code (ITURB)
    pub fn code(&self) -> i32 {
        match self {
            TurbulenceModel::Off => 0,
            TurbulenceModel::MixingLength => 10,
            TurbulenceModel::KEpsilon => 20,
            TurbulenceModel::KEpsilonLinearProduction => 21,
            TurbulenceModel::RijEpsilon => 30,
            TurbulenceModel::RijSsg => 31,
            TurbulenceModel::LesSmagorinsky => 40,
            TurbulenceModel::LesDynamic => 41,
            TurbulenceModel::V2fPhi => 50,
            TurbulenceModel::KOmegaSst => 60,
        }
    }

    /// Returns the names of the transported turbulence variables, in solver order
    pub fn variable_names(&self) -> &'static [&'static str] {
        match self {
            TurbulenceModel::KEpsilon | TurbulenceModel::KEpsilonLinearProduction => &["turb_k", "turb_eps"],
            TurbulenceModel::RijEpsilon | TurbulenceModel::RijSsg => &[
                "component_R11",
                "component_R22",
                "component_R33",
                "component_R12",
                "component_R13",
                "component_R23",
                "turb_eps",
            ],
            TurbulenceModel::V2fPhi => &["turb_k", "turb_eps", "turb_phi", "turb_fb"],
            TurbulenceModel::KOmegaSst => &["turb_k", "turb_omega"],
            _ => &[],
        }
    }

    /// Indicates whether the model has the scale_model and gravity_terms options
    pub fn has_rans_options(&self) -> bool {
        !matches!(
            self,
            TurbulenceModel::Off
                | TurbulenceModel::MixingLength
                | TurbulenceModel::LesSmagorinsky
                | TurbulenceModel::LesDynamic
        )
    }

    /// Indicates a Reynolds-stress model (gravity terms go to IGRARI instead of IGRAKE)
    pub fn is_rij(&self) -> bool {
        matches!(self, TurbulenceModel::RijEpsilon | TurbulenceModel::RijSsg)
    }
}

/// Holds the turbulence model and its options
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Turbulence {
    /// Selected model
    pub model: TurbulenceModel,

    /// Wall law treatment (IDEUCH)
    pub scale_model: Option<i32>,

    /// Gravity effects in the turbulence equations (IGRAKE or IGRARI)
    pub gravity_terms: Option<bool>,

    /// Mixing length scale (XLOMLG)
    pub mixing_length_scale: Option<f64>,
}

impl Turbulence {
    /// Allocates a new instance without options
    pub fn new(model: TurbulenceModel) -> Self {
        Turbulence {
            model,
            scale_model: None,
            gravity_terms: None,
            mixing_length_scale: None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
