pub mod feature;
pub mod geometry;
pub mod id;

pub use feature::*;
pub use geometry::*;
pub use id::*;
