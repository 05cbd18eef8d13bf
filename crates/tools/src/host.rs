use draw::DrawTool;
use features::Feature;
use serde_json::{Value, json};
use session::{FeatureHost, Rejection};

/// Host that turns every callback into one JSON record, named after the
/// host callback it stands for.
#[derive(Debug, Default)]
pub struct JsonHost {
    records: Vec<Value>,
}

impl JsonHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Value> {
        self.records
    }

    fn push(&mut self, call: &str, feature: &Feature) {
        self.records.push(json!({ "call": call, "feature": feature }));
    }
}

impl FeatureHost for JsonHost {
    fn add_feature(&mut self, feature: &Feature) {
        self.push("addFeature", feature);
    }

    fn remove_feature(&mut self, feature: &Feature) {
        self.push("removeFeature", feature);
    }

    fn update_feature(&mut self, feature: &Feature) {
        self.push("updateFeature", feature);
    }

    fn error_modal(&mut self, tool: &DrawTool, rejection: &Rejection) {
        self.records.push(json!({
            "call": "errorModal",
            "mode": tool.mode(),
            "hasKinks": rejection.has_kinks,
            "tooBig": rejection.too_big,
            "isOutside": rejection.is_outside,
            "hasNoCoords": rejection.has_no_coords,
            "features": rejection.features,
        }));
    }
}
