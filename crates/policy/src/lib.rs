//! Geometry acceptance checks applied before a drawn shape reaches the host.
//!
//! The checks only apply thresholds. Area, centroid and segment intersection
//! come from the `geo` crate.

pub mod area;
pub mod containment;
mod convert;
pub mod kinks;
pub mod report;

pub use area::*;
pub use containment::*;
pub use kinks::*;
pub use report::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    NonFiniteCoordinate,
    EmptyGeometry,
}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyError::NonFiniteCoordinate => write!(f, "geometry has a non-finite coordinate"),
            PolicyError::EmptyGeometry => write!(f, "geometry has no measurable extent"),
        }
    }
}

impl std::error::Error for PolicyError {}
