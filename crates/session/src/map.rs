use draw::{DisplayFeature, PointerTarget, ScreenBox, ScreenPoint};
use features::{Feature, FeatureCollection};
use layers::LayerStyle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    MissingSource(String),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::MissingSource(id) => write!(f, "map has no source named {id}"),
        }
    }
}

impl std::error::Error for MapError {}

/// The map canvas the session draws on.
pub trait MapSurface {
    /// Adds a style layer (and its inline source, if any).
    fn add_layer(&mut self, layer: &LayerStyle);

    fn set_source_data(&mut self, source_id: &str, data: &FeatureCollection) -> Result<(), MapError>;

    /// Rendered features of the given layers intersecting `area`.
    fn query_rendered_features(&self, area: ScreenBox, layers: &[&str]) -> Vec<Feature>;

    /// Draw-tool element under `point`, searched within `buffer` pixels.
    fn target_at(&self, _point: ScreenPoint, _buffer: f64) -> Option<PointerTarget> {
        None
    }

    /// Receives the draw tool's display list after every change.
    fn render(&mut self, _display: &[DisplayFeature]) {}
}
