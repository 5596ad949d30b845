//! Implements the data model shared by the readers and the zone resolver

mod config;
mod constants;
mod enums;
mod turbulence;
mod variables;
mod zone;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::enums::*;
pub use crate::base::turbulence::*;
pub use crate::base::variables::*;
pub use crate::base::zone::*;
