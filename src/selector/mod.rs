//! Implements the geometric selection of boundary faces

use crate::StrError;

mod expression;
mod group_selector;
pub use crate::selector::expression::*;
pub use crate::selector::group_selector::*;

/// Holds the result of a selection
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Selected face ids (0-based), ascending, without repetitions
    pub faces: Vec<usize>,

    /// Groups or attributes in the expression that match no boundary face
    pub missing: Vec<String>,
}

/// Defines the geometric selector that turns a selection expression into a list of faces
pub trait FaceSelector {
    /// Resolves an expression
    ///
    /// A malformed expression is an error. Unmatched parts are reported in `missing`.
    fn select(&self, expression: &str) -> Result<Selection, StrError>;
}
