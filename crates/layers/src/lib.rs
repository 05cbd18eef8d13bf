//! Renderer-facing style tables for the draw tool.

pub mod filter;
pub mod layer;
pub mod symbology;

pub use layer::*;
pub use symbology::*;
