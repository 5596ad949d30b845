//! Implements the parameter document and the typed queries into it

mod document;
mod query;
pub use crate::xml::document::*;
pub use crate::xml::query::*;
