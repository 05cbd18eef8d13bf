use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::geometry::Geometry;
use crate::id::FeatureId;

/// Property key stamped on committed features.
pub const TYPE_PROPERTY: &str = "type";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            properties: Map::new(),
            geometry,
        }
    }

    pub fn with_id(mut self, id: impl Into<FeatureId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    NotAFeatureCollection,
    Json(String),
}

impl std::fmt::Display for FeatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            FeatureError::Json(msg) => write!(f, "invalid GeoJSON: {msg}"),
        }
    }
}

impl std::error::Error for FeatureError {}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, FeatureError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| FeatureError::Json(e.to_string()))?;
        if value.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(FeatureError::NotAFeatureCollection);
        }
        serde_json::from_value(value).map_err(|e| FeatureError::Json(e.to_string()))
    }

    pub fn to_geojson_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Map<String, Value>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::{Feature, FeatureCollection, FeatureError};
    use crate::geometry::Geometry;
    use crate::id::FeatureId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_collection_with_numeric_ids_and_null_properties() {
        let payload = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": 7,
                    "properties": null,
                    "geometry": { "type": "Point", "coordinates": [1.0, 2.0] }
                },
                {
                    "type": "Feature",
                    "properties": { "type": 4 },
                    "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] }
                }
            ]
        })
        .to_string();

        let fc = FeatureCollection::from_geojson_str(&payload).expect("parse");
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[0].id, Some(FeatureId::new("7")));
        assert!(fc.features[0].properties.is_empty());
        assert_eq!(fc.features[1].id, None);
        assert_eq!(fc.features[1].property("type"), Some(&json!(4)));
    }

    #[test]
    fn rejects_non_collections() {
        let err = FeatureCollection::from_geojson_str(r#"{"type":"Feature"}"#).unwrap_err();
        assert_eq!(err, FeatureError::NotAFeatureCollection);
        assert!(matches!(
            FeatureCollection::from_geojson_str("not json"),
            Err(FeatureError::Json(_))
        ));
    }

    #[test]
    fn feature_serializes_with_tag() {
        let f = Feature::new(Geometry::Point([3.0, 4.0]))
            .with_id("a")
            .with_property("type", 4);
        assert_eq!(
            serde_json::to_value(&f).expect("ser"),
            json!({
                "type": "Feature",
                "id": "a",
                "properties": { "type": 4 },
                "geometry": { "type": "Point", "coordinates": [3.0, 4.0] }
            })
        );
    }
}
