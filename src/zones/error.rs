use crate::StrError;
use thiserror::Error;

/// Errors detected while resolving or verifying boundary zones
///
/// All variants are fatal: boundary conditions that are misconfigured invalidate the whole run.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ZoneError {
    /// Zone number outside [1, max_zones]
    #[error("zone '{label}' has number {zone_number}, outside the allowed range [1, {max_zones}]")]
    ConfigurationRange {
        label: String,
        zone_number: i32,
        max_zones: i32,
    },

    /// Nature tag not in the recognized set
    #[error("boundary nature '{nature}' of zone '{label}' is unknown")]
    UnknownNature { label: String, nature: String },

    /// Two zones claim the same face
    #[error(
        "zone '{label}' (number {zone_number}) claims face {face} already marked by zone \
         '{previous_label}' (number {previous_zone_number}); zone definitions are overlapping"
    )]
    ZoneOverlap {
        label: String,
        zone_number: i32,
        face: usize,
        previous_zone_number: i32,
        previous_label: String,
    },

    /// The solver's zone number of a face differs from the declared one
    #[error(
        "zone '{label}' does not have the same number in the case file ({gui_zone_number}) \
         and in the solver ({solver_zone_number}) at face {face}"
    )]
    PostHocZoneNumber {
        label: String,
        face: usize,
        gui_zone_number: i32,
        solver_zone_number: i32,
    },

    /// The solver's face kind differs from the one implied by the declared nature
    #[error(
        "zone '{label}' does not have the same nature in the case file ({nature}) \
         and in the solver (face kind code {solver_kind}) at face {face}"
    )]
    PostHocNature {
        label: String,
        face: usize,
        nature: String,
        solver_kind: i32,
    },

    /// Two declarations share a label
    #[error("zone label '{0}' is declared more than once")]
    DuplicateLabel(String),

    /// The zone number attribute is not an integer
    #[error("zone '{label}' has an invalid number '{text}'")]
    InvalidZoneNumber { label: String, text: String },

    /// The selector rejected the expression
    #[error("zone '{label}' has an invalid selection criteria \"{expression}\": {message}")]
    InvalidSelection {
        label: String,
        expression: String,
        message: StrError,
    },

    /// The selector returned a face outside the boundary
    #[error("zone '{label}' selects face {face} but there are only {total_faces} boundary faces")]
    FaceOutOfRange {
        label: String,
        face: usize,
        total_faces: usize,
    },

    /// An array does not have the expected length
    #[error("array {what} has length {found} instead of {expected}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A direction or face normal has zero length
    #[error("zone '{label}' has a zero-length {what}")]
    InvalidVector { label: String, what: &'static str },

    /// Error from the document or configuration layer
    #[error("{0}")]
    Document(StrError),
}

impl From<StrError> for ZoneError {
    fn from(message: StrError) -> Self {
        ZoneError::Document(message)
    }
}

/// Non-fatal notice: part of a selection expression matched no boundary face
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionWarning {
    /// Label of the zone owning the expression
    pub label: String,

    /// The group or attribute that matched nothing
    pub fragment: String,

    /// The full selection expression
    pub expression: String,
}

impl std::fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "the group or attribute \"{}\" in the selection criteria \"{}\" of zone '{}' \
             does not correspond to any boundary face",
            self.fragment, self.expression, self.label
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
