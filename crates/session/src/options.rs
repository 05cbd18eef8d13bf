use std::path::{Path, PathBuf};

use draw::DrawToolOptions;
use foundation::Aabb2;
use layers::StyleOptions;
use policy::PolicyLimits;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_AREA_ACRES: f64 = 5000.0;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ConfigError::Parse(msg) => write!(f, "invalid session options: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(_) => None,
        }
    }
}

/// Per-mode status strings; any may be left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomMessage {
    pub start: Option<String>,
    pub close: Option<String>,
    pub rectangle: Option<String>,
    pub circle: Option<String>,
    pub edit: Option<String>,
    pub delete: Option<String>,
    pub empty: Option<String>,
}

/// Status strings after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub start: String,
    pub close: String,
    pub rectangle: String,
    pub circle: String,
    pub edit: String,
    pub delete: String,
    /// No label by default.
    pub empty: Option<String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self::resolve(&CustomMessage::default())
    }
}

impl Messages {
    /// Explicit non-empty strings win; everything else takes the built-in
    /// default.
    pub fn resolve(custom: &CustomMessage) -> Self {
        let pick = |value: &Option<String>, default: &str| {
            value
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        Self {
            start: pick(&custom.start, "Select a starting point"),
            close: pick(&custom.close, "Press enter to close shape"),
            rectangle: pick(&custom.rectangle, "Click and drag to draw a rectangle"),
            circle: pick(&custom.circle, "Click and drag to draw a pivot"),
            edit: pick(&custom.edit, "Press enter to finish editing"),
            delete: pick(&custom.delete, "Press delete to remove shape"),
            empty: custom.empty.clone().filter(|s| !s.is_empty()),
        }
    }
}

fn default_area_size() -> Option<f64> {
    Some(DEFAULT_AREA_ACRES)
}

fn default_feature_type() -> Value {
    Value::from(4)
}

/// Host-supplied session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionOptions {
    /// When set, self-intersecting shapes are accepted.
    pub allow_kinks: bool,
    /// Maximum area in acres. An absent key takes the default; an explicit
    /// `null`, zero or a negative value disables the check.
    #[serde(default = "default_area_size")]
    pub area_size: Option<f64>,
    /// `[minX, minY, maxX, maxY]` that shape centroids must fall in.
    pub allow_outside_area: Option<[f64; 4]>,
    /// Stamped on committed features as the `type` property.
    #[serde(default = "default_feature_type")]
    pub feature_type: Value,
    pub custom_message: CustomMessage,
    pub draw: DrawToolOptions,
    pub styles: StyleOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            allow_kinks: false,
            area_size: default_area_size(),
            allow_outside_area: None,
            feature_type: default_feature_type(),
            custom_message: CustomMessage::default(),
            draw: DrawToolOptions::default(),
            styles: StyleOptions::default(),
        }
    }
}

impl SessionOptions {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(payload).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    pub fn limits(&self) -> PolicyLimits {
        PolicyLimits {
            max_area_acres: self.area_size.filter(|a| *a > 0.0),
            allowed_area: self.allow_outside_area.map(Aabb2::from_extent),
            allow_kinks: self.allow_kinks,
        }
    }

    pub fn messages(&self) -> Messages {
        Messages::resolve(&self.custom_message)
    }
}
