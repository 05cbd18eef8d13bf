//! In-memory draw tool and its interaction modes.
//!
//! `DrawTool` owns the features being edited, the current selection and the
//! active mode. Input is dispatched to the mode through the callback traits in
//! [`mode`]; the tool reports what happened as [`DrawEvent`]s that a
//! controller drains after each call.

pub mod constants;
pub mod display;
pub mod event;
pub mod feature;
pub mod mode;
pub mod modes;
pub mod path;
pub mod registry;
pub mod store;
pub mod tool;

pub use display::*;
pub use event::*;
pub use feature::*;
pub use mode::*;
pub use path::*;
pub use registry::*;
pub use store::*;
pub use tool::*;

use features::FeatureId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    UnknownMode(String),
    FeatureNotFound(FeatureId),
    InvalidCoordPath(String),
    InvalidGeometry(String),
    MissingFeatureId,
}

impl std::fmt::Display for DrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawError::UnknownMode(name) => write!(f, "unknown draw mode: {name}"),
            DrawError::FeatureNotFound(id) => write!(f, "feature not found: {id}"),
            DrawError::InvalidCoordPath(path) => write!(f, "invalid coordinate path: {path}"),
            DrawError::InvalidGeometry(reason) => write!(f, "invalid geometry: {reason}"),
            DrawError::MissingFeatureId => write!(f, "mode requires a feature id"),
        }
    }
}

impl std::error::Error for DrawError {}
