use features::Feature;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::filter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Fill,
    Line,
    Circle,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Fill => "fill",
            LayerKind::Line => "line",
            LayerKind::Circle => "circle",
        }
    }
}

/// One style layer: which features it draws (`filter`) and how.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    pub id: String,
    pub kind: LayerKind,
    pub filter: Option<Value>,
    pub paint: Map<String, Value>,
    pub layout: Map<String, Value>,
    pub source: Option<Value>,
}

impl LayerStyle {
    pub fn new(id: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            filter: None,
            paint: Map::new(),
            layout: Map::new(),
            source: None,
        }
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_paint(mut self, key: &str, value: Value) -> Self {
        self.paint.insert(key.to_string(), value);
        self
    }

    pub fn with_layout(mut self, key: &str, value: Value) -> Self {
        self.layout.insert(key.to_string(), value);
        self
    }

    pub fn with_source(mut self, source: Value) -> Self {
        self.source = Some(source);
        self
    }

    /// Hidden only by an explicit `visibility: none`.
    pub fn is_visible(&self) -> bool {
        self.layout.get("visibility").and_then(Value::as_str) != Some("none")
    }

    /// Whether this layer would draw `feature`. Hidden layers draw nothing.
    pub fn renders(&self, feature: &Feature) -> bool {
        self.is_visible() && self.filter.as_ref().is_none_or(|f| filter::matches(f, feature))
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("id".into(), json!(self.id));
        out.insert("type".into(), json!(self.kind.as_str()));
        if let Some(filter) = &self.filter {
            out.insert("filter".into(), filter.clone());
        }
        if !self.layout.is_empty() {
            out.insert("layout".into(), Value::Object(self.layout.clone()));
        }
        out.insert("paint".into(), Value::Object(self.paint.clone()));
        if let Some(source) = &self.source {
            out.insert("source".into(), source.clone());
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerKind, LayerStyle};
    use features::{Feature, Geometry};
    use serde_json::json;

    #[test]
    fn hidden_layers_render_nothing() {
        let layer = LayerStyle::new("l", LayerKind::Line).with_layout("visibility", json!("none"));
        let f = Feature::new(Geometry::LineString(vec![[0.0, 0.0], [1.0, 1.0]]));
        assert!(!layer.is_visible());
        assert!(!layer.renders(&f));
    }

    #[test]
    fn json_form_omits_empty_layout() {
        let v = LayerStyle::new("a", LayerKind::Fill).with_paint("fill-color", json!("red")).to_json();
        assert_eq!(v, json!({"id": "a", "type": "fill", "paint": {"fill-color": "red"}}));
    }
}
