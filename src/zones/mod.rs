//! Implements the boundary zone resolver and the writing of boundary conditions

mod conditions;
mod error;
mod resolver;
mod verify;
pub use crate::zones::conditions::*;
pub use crate::zones::error::*;
pub use crate::zones::resolver::*;
pub use crate::zones::verify::*;
