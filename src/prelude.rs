//! Makes available common structures needed to translate a case file
//!
//! You may write `use fvbc::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{BcCode, Config, FaceKind, FaceKindCodes, Nature, VariableTable, ZoneConditions, ZoneDecl};
pub use crate::base::{DEFAULT_MAX_ZONES, DEFAULT_OUT_DIR, DEFAULT_TEST_DIR, UNSET_VALUE};
pub use crate::gui::{read_output_control, read_profiles, read_variables, read_zone_declarations};
pub use crate::gui::{read_physical_properties, read_restart_parameters, read_time_parameters};
pub use crate::selector::{FaceSelector, FaceTags, GroupSelector, Selection};
pub use crate::xml::{Document, Query};
pub use crate::zones::{apply_conditions, resolve_zones, verify_zones, BoundaryArrays, ZoneError, ZoneMap};
pub use crate::StrError;
