//! Implements the readers that translate the parameter document into the data model

mod boundaries;
mod control;
mod initialization;
mod models;
mod output;
mod profiles;
mod properties;
pub use crate::gui::boundaries::*;
pub use crate::gui::control::*;
pub use crate::gui::initialization::*;
pub use crate::gui::models::*;
pub use crate::gui::output::*;
pub use crate::gui::profiles::*;
pub use crate::gui::properties::*;
