//! Offline driver for draw sessions: a pixel-space map stand-in, a host that
//! logs its callbacks as JSON, and a scripted input replayer.

pub mod host;
pub mod map;
pub mod script;

pub use host::*;
pub use map::*;
pub use script::*;
