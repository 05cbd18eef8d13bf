use features::{Feature, FeatureId, Geometry, Position};
use serde_json::{Map, Value};

use crate::constants::properties;
use crate::feature::DrawFeature;
use crate::path::CoordPath;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Meta {
    Feature,
    Vertex,
    Midpoint,
}

impl Meta {
    pub fn as_str(self) -> &'static str {
        match self {
            Meta::Feature => "feature",
            Meta::Vertex => "vertex",
            Meta::Midpoint => "midpoint",
        }
    }
}

/// What the renderer draws for one frame: features plus their handles.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFeature {
    pub meta: Meta,
    /// Set for `Meta::Feature`.
    pub id: Option<FeatureId>,
    /// Owning feature of a vertex or midpoint.
    pub parent: Option<FeatureId>,
    pub coord_path: Option<CoordPath>,
    pub active: bool,
    pub mode: String,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

impl DisplayFeature {
    pub fn feature(feature: &DrawFeature, mode: &str) -> Self {
        Self {
            meta: Meta::Feature,
            id: Some(feature.id.clone()),
            parent: None,
            coord_path: None,
            active: false,
            mode: mode.to_string(),
            geometry: feature.shape.to_geometry(),
            properties: feature.properties.clone(),
        }
    }

    pub fn vertex(parent: &FeatureId, path: CoordPath, at: Position, active: bool, mode: &str) -> Self {
        Self::handle(Meta::Vertex, parent, path, at, active, mode)
    }

    pub fn midpoint(parent: &FeatureId, path: CoordPath, at: Position, mode: &str) -> Self {
        Self::handle(Meta::Midpoint, parent, path, at, false, mode)
    }

    fn handle(meta: Meta, parent: &FeatureId, path: CoordPath, at: Position, active: bool, mode: &str) -> Self {
        Self {
            meta,
            id: None,
            parent: Some(parent.clone()),
            coord_path: Some(path),
            active,
            mode: mode.to_string(),
            geometry: Geometry::Point(at),
            properties: Map::new(),
        }
    }

    /// Id of the feature this entry belongs to.
    pub fn owner(&self) -> Option<&FeatureId> {
        self.id.as_ref().or(self.parent.as_ref())
    }

    /// GeoJSON form with the display properties style filters match on.
    pub fn to_feature(&self) -> Feature {
        let mut props = self.properties.clone();
        props.insert(properties::META.into(), Value::from(self.meta.as_str()));
        props.insert(
            properties::ACTIVE.into(),
            Value::from(if self.active { "true" } else { "false" }),
        );
        props.insert(properties::MODE.into(), Value::from(self.mode.as_str()));
        if let Some(id) = &self.id {
            props.insert(properties::ID.into(), Value::from(id.as_str()));
        }
        if let Some(parent) = &self.parent {
            props.insert(properties::PARENT.into(), Value::from(parent.as_str()));
        }
        if let Some(path) = &self.coord_path {
            props.insert(properties::COORD_PATH.into(), Value::from(path.to_string()));
        }
        Feature {
            id: self.id.clone(),
            properties: props,
            geometry: self.geometry.clone(),
        }
    }
}

/// Vertex handles for `feature`, plus midpoints when requested. Vertices whose
/// path is in `selected` are active.
pub fn supplementary_points(
    feature: &DrawFeature,
    mode: &str,
    selected: &[CoordPath],
    midpoints: bool,
) -> Vec<DisplayFeature> {
    let mut out: Vec<DisplayFeature> = feature
        .shape
        .vertices()
        .into_iter()
        .map(|(path, at)| {
            let active = selected.contains(&path);
            DisplayFeature::vertex(&feature.id, path, at, active, mode)
        })
        .collect();
    if midpoints {
        out.extend(
            feature
                .shape
                .midpoints()
                .into_iter()
                .map(|(path, at)| DisplayFeature::midpoint(&feature.id, path, at, mode)),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{Meta, supplementary_points};
    use crate::feature::DrawFeature;
    use crate::path::CoordPath;
    use features::{Feature, Geometry};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn handles_carry_filter_properties() {
        let f = DrawFeature::from_feature(
            Feature::new(Geometry::Polygon(vec![vec![
                [0.0, 0.0],
                [2.0, 0.0],
                [2.0, 2.0],
                [0.0, 0.0],
            ]]))
            .with_id("p"),
        );
        let points = supplementary_points(&f, "direct_select", &[CoordPath::ring(0, 1)], true);
        assert_eq!(points.len(), 6);
        assert_eq!(points.iter().filter(|p| p.meta == Meta::Midpoint).count(), 3);
        let v = points[1].to_feature();
        assert_eq!(v.property("meta"), Some(&json!("vertex")));
        assert_eq!(v.property("active"), Some(&json!("true")));
        assert_eq!(v.property("parent"), Some(&json!("p")));
        assert_eq!(v.property("coord_path"), Some(&json!("0.1")));
    }
}
