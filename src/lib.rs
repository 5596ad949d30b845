//! Fvbc translates the parameter document of a graphical front-end into the
//! solver-indexed arrays of a finite volume solver
//!
//! The central piece is the boundary zone resolver (see [zones::resolve_zones]) which maps
//! user-declared boundary zones onto the per-face zone array and rejects overlapping zones.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod gui;
pub mod prelude;
pub mod selector;
pub mod xml;
pub mod zones;
