use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Feature identifier.
///
/// Always held as a string. Numeric ids coming from GeoJSON input are
/// normalized to their decimal text so that `1` and `"1"` name the same feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawFeatureId", into = "String")]
pub struct FeatureId(String);

impl FeatureId {
    pub fn new(id: impl Into<String>) -> Self {
        FeatureId(id.into())
    }

    /// Fresh random (v4) identifier.
    pub fn generate() -> Self {
        FeatureId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<FeatureId> for String {
    fn from(id: FeatureId) -> Self {
        id.0
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        FeatureId(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFeatureId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawFeatureId> for FeatureId {
    fn from(raw: RawFeatureId) -> Self {
        match raw {
            RawFeatureId::Text(s) => FeatureId(s),
            RawFeatureId::Number(n) => FeatureId(n.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureId;

    #[test]
    fn numeric_and_text_ids_normalize() {
        let a: FeatureId = serde_json::from_str("42").expect("number id");
        let b: FeatureId = serde_json::from_str("\"42\"").expect("text id");
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).expect("ser"), "\"42\"");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = FeatureId::generate();
        let b = FeatureId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }
}
