use std::collections::BTreeMap;

use draw::{DisplayFeature, Meta, PointerTarget, ScreenBox, ScreenPoint};
use features::{Feature, FeatureCollection, Geometry, Position};
use geo::{Contains, Coord, LineString, Point, Polygon};
use layers::LayerStyle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use session::{MapError, MapSurface};

const HOT_SOURCE: &str = "mapbox-gl-draw-hot";

/// Linear lon/lat to pixel mapping; y grows southwards.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Projection {
    /// Lon/lat at pixel (0, 0).
    pub origin: Position,
    pub degrees_per_pixel: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0],
            degrees_per_pixel: 1e-4,
        }
    }
}

impl Projection {
    pub fn to_screen(&self, p: Position) -> ScreenPoint {
        ScreenPoint::new(
            (p[0] - self.origin[0]) / self.degrees_per_pixel,
            (self.origin[1] - p[1]) / self.degrees_per_pixel,
        )
    }

    pub fn to_lng_lat(&self, p: ScreenPoint) -> Position {
        [
            self.origin[0] + p.x * self.degrees_per_pixel,
            self.origin[1] - p.y * self.degrees_per_pixel,
        ]
    }
}

/// In-memory map surface for replays and tests.
///
/// Handles and active features render into the hot draw source, the rest
/// into the cold one. Hit-testing works on the last display list.
#[derive(Debug, Default)]
pub struct ReplayMap {
    projection: Projection,
    layers: Vec<LayerStyle>,
    sources: BTreeMap<String, FeatureCollection>,
    display: Vec<DisplayFeature>,
}

impl ReplayMap {
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            ..Self::default()
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    pub fn source(&self, id: &str) -> Option<&FeatureCollection> {
        self.sources.get(id)
    }

    pub fn display(&self) -> &[DisplayFeature] {
        &self.display
    }

    fn hits_box(&self, geometry: &Geometry, area: &ScreenBox) -> bool {
        let mut inside = false;
        geometry.for_each_position(|p| inside |= area.contains(self.projection.to_screen(*p)));
        if inside {
            return true;
        }
        let center = ScreenPoint::new((area.min.x + area.max.x) / 2.0, (area.min.y + area.max.y) / 2.0);
        covers(geometry, self.projection.to_lng_lat(center))
    }
}

fn is_hot(display: &DisplayFeature) -> bool {
    display.active || display.meta != Meta::Feature
}

fn ring(points: &[Position]) -> LineString<f64> {
    LineString::from(points.iter().map(|p| Coord { x: p[0], y: p[1] }).collect::<Vec<_>>())
}

fn polygon(rings: &[Vec<Position>]) -> Option<Polygon<f64>> {
    let (outer, holes) = rings.split_first()?;
    Some(Polygon::new(ring(outer), holes.iter().map(|h| ring(h)).collect()))
}

/// Whether an areal geometry contains `at`.
fn covers(geometry: &Geometry, at: Position) -> bool {
    let point = Point::new(at[0], at[1]);
    match geometry {
        Geometry::Polygon(rings) => polygon(rings).is_some_and(|p| p.contains(&point)),
        Geometry::MultiPolygon(polys) => polys
            .iter()
            .filter_map(|rings| polygon(rings))
            .any(|p| p.contains(&point)),
        _ => false,
    }
}

impl MapSurface for ReplayMap {
    fn add_layer(&mut self, layer: &LayerStyle) {
        if let Some(Value::Object(_)) = &layer.source {
            self.sources.insert(layer.id.clone(), FeatureCollection::default());
        }
        self.layers.push(layer.clone());
    }

    fn set_source_data(&mut self, source_id: &str, data: &FeatureCollection) -> Result<(), MapError> {
        let slot = self
            .sources
            .get_mut(source_id)
            .ok_or_else(|| MapError::MissingSource(source_id.to_string()))?;
        *slot = data.clone();
        Ok(())
    }

    fn query_rendered_features(&self, area: ScreenBox, layer_ids: &[&str]) -> Vec<Feature> {
        let mut hits = Vec::new();
        for layer in self.layers.iter().filter(|l| layer_ids.contains(&l.id.as_str())) {
            let hot = layer.source.as_ref().and_then(Value::as_str) == Some(HOT_SOURCE);
            for display in self.display.iter().filter(|d| is_hot(d) == hot) {
                let feature = display.to_feature();
                if layer.renders(&feature) && self.hits_box(&feature.geometry, &area) {
                    hits.push(feature);
                }
            }
        }
        hits
    }

    /// Handles take precedence over shapes; later entries are on top.
    fn target_at(&self, point: ScreenPoint, buffer: f64) -> Option<PointerTarget> {
        let area = ScreenBox::around(point, buffer);
        let handle = self.display.iter().rev().find_map(|d| {
            let (Geometry::Point(at), Some(parent), Some(path)) = (&d.geometry, &d.parent, &d.coord_path)
            else {
                return None;
            };
            if !area.contains(self.projection.to_screen(*at)) {
                return None;
            }
            let (parent, path) = (parent.clone(), path.clone());
            match d.meta {
                Meta::Vertex => Some(PointerTarget::Vertex { parent, path }),
                Meta::Midpoint => Some(PointerTarget::Midpoint { parent, path }),
                Meta::Feature => None,
            }
        });
        if handle.is_some() {
            return handle;
        }
        let at = self.projection.to_lng_lat(point);
        self.display
            .iter()
            .rev()
            .filter(|d| d.meta == Meta::Feature)
            .find(|d| covers(&d.geometry, at) || self.hits_box(&d.geometry, &area))
            .and_then(|d| d.id.clone())
            .map(|id| PointerTarget::Feature { id })
    }

    fn render(&mut self, display: &[DisplayFeature]) {
        self.display = display.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::{Projection, ReplayMap};
    use draw::{CoordPath, DisplayFeature, DrawFeature, PointerTarget, ScreenBox, ScreenPoint};
    use features::{Feature, FeatureCollection, FeatureId, Geometry};
    use layers::{StyleOptions, VERTEX_HOT_LAYER, draw_fill_layer, draw_styles, hot_and_cold};
    use pretty_assertions::assert_eq;
    use session::{MapError, MapSurface};

    fn square() -> DrawFeature {
        DrawFeature::from_feature(
            Feature::new(Geometry::Polygon(vec![vec![
                [0.0, 0.0],
                [0.01, 0.0],
                [0.01, -0.01],
                [0.0, -0.01],
                [0.0, 0.0],
            ]]))
            .with_id("sq"),
        )
    }

    fn styled_map() -> ReplayMap {
        let mut map = ReplayMap::new(Projection::default());
        for layer in hot_and_cold(&draw_styles(StyleOptions::default())) {
            map.add_layer(&layer);
        }
        map.add_layer(&draw_fill_layer());
        map
    }

    #[test]
    fn projection_round_trips_pixels() {
        let p = Projection {
            origin: [10.0, 50.0],
            degrees_per_pixel: 0.5,
        };
        let screen = p.to_screen([11.0, 49.0]);
        assert_eq!(screen, ScreenPoint::new(2.0, 2.0));
        assert_eq!(p.to_lng_lat(screen), [11.0, 49.0]);
    }

    #[test]
    fn only_inline_sources_accept_data() {
        let mut map = styled_map();
        assert!(map.set_source_data("draw-fill", &FeatureCollection::default()).is_ok());
        assert_eq!(
            map.set_source_data("parcels", &FeatureCollection::default()),
            Err(MapError::MissingSource("parcels".into()))
        );
    }

    #[test]
    fn vertex_handles_are_found_in_the_hot_layer() {
        let mut map = styled_map();
        let sq = square();
        let id = sq.id.clone();
        map.render(&[
            DisplayFeature::feature(&sq, "draw_polygon"),
            DisplayFeature::vertex(&id, CoordPath::ring(0, 1), [0.01, 0.0], false, "draw_polygon"),
        ]);

        let near = ScreenBox::around(ScreenPoint::new(98.0, 3.0), 16.0);
        assert_eq!(map.query_rendered_features(near, &[VERTEX_HOT_LAYER]).len(), 1);
        let far = ScreenBox::around(ScreenPoint::new(50.0, 50.0), 16.0);
        assert!(map.query_rendered_features(far, &[VERTEX_HOT_LAYER]).is_empty());
    }

    #[test]
    fn targets_prefer_handles_then_shapes() {
        let mut map = styled_map();
        let sq = square();
        let id = sq.id.clone();
        map.render(&[
            DisplayFeature::feature(&sq, "direct_select"),
            DisplayFeature::vertex(&id, CoordPath::ring(0, 2), [0.01, -0.01], false, "direct_select"),
        ]);

        assert_eq!(
            map.target_at(ScreenPoint::new(101.0, 99.0), 5.0),
            Some(PointerTarget::Vertex {
                parent: id.clone(),
                path: CoordPath::ring(0, 2),
            })
        );
        assert_eq!(
            map.target_at(ScreenPoint::new(50.0, 50.0), 5.0),
            Some(PointerTarget::Feature { id: FeatureId::from("sq") })
        );
        assert_eq!(map.target_at(ScreenPoint::new(400.0, 400.0), 5.0), None);
    }
}
