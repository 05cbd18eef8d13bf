//! Draw session controller.
//!
//! A [`DrawSession`] sits between a [`draw::DrawTool`], the application's
//! feature store ([`FeatureHost`]) and the map canvas ([`MapSurface`]). It
//! feeds input to the tool, reacts to the tool's events, checks new and
//! edited shapes against the configured policy, and keeps a small state
//! record (mode, drawing flag, selection snapshots, status label) the UI
//! reads back.

pub mod host;
pub mod label;
pub mod map;
pub mod options;
pub mod session;
pub mod state;

pub use host::*;
pub use label::*;
pub use map::*;
pub use options::*;
pub use session::*;
pub use state::*;

use draw::DrawError;

/// Fault raised while mirroring tool state to the host or the map.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    Sync(DrawError),
    MapSource(MapError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Sync(err) => write!(f, "draw tool sync failed: {err}"),
            SessionError::MapSource(err) => write!(f, "map source update failed: {err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Sync(err) => Some(err),
            SessionError::MapSource(err) => Some(err),
        }
    }
}

impl From<DrawError> for SessionError {
    fn from(err: DrawError) -> Self {
        SessionError::Sync(err)
    }
}

impl From<MapError> for SessionError {
    fn from(err: MapError) -> Self {
        SessionError::MapSource(err)
    }
}
