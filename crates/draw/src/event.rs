use features::{Feature, FeatureId, Position};
use serde::{Deserialize, Serialize};

use crate::constants::events;
use crate::path::CoordPath;

/// Screen position in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned screen rectangle used for rendered-feature queries.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenBox {
    pub min: ScreenPoint,
    pub max: ScreenPoint,
}

impl ScreenBox {
    /// Square of half-width `buffer` centred on `center`.
    pub fn around(center: ScreenPoint, buffer: f64) -> Self {
        Self {
            min: ScreenPoint::new(center.x - buffer, center.y - buffer),
            max: ScreenPoint::new(center.x + buffer, center.y + buffer),
        }
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Rendered element under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerTarget {
    Feature { id: FeatureId },
    Vertex { parent: FeatureId, path: CoordPath },
    Midpoint { parent: FeatureId, path: CoordPath },
}

impl PointerTarget {
    /// Feature the target belongs to.
    pub fn feature_id(&self) -> &FeatureId {
        match self {
            PointerTarget::Feature { id } => id,
            PointerTarget::Vertex { parent, .. } | PointerTarget::Midpoint { parent, .. } => parent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub lng_lat: Position,
    pub point: ScreenPoint,
    pub target: Option<PointerTarget>,
    pub shift_key: bool,
    pub default_prevented: bool,
}

impl PointerEvent {
    pub fn new(lng_lat: Position, point: ScreenPoint) -> Self {
        Self {
            lng_lat,
            point,
            target: None,
            shift_key: false,
            default_prevented: false,
        }
    }

    pub fn with_target(mut self, target: PointerTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    Move,
    ChangeCoordinates,
}

impl UpdateAction {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateAction::Move => "move",
            UpdateAction::ChangeCoordinates => "change_coordinates",
        }
    }
}

/// Notification raised by the draw tool.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    Create { features: Vec<Feature> },
    Update { action: UpdateAction, features: Vec<Feature> },
    Delete { features: Vec<Feature> },
    SelectionChange { features: Vec<Feature> },
    ModeChange { mode: String },
    LiveUpdate { feature: Feature },
}

impl DrawEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DrawEvent::Create { .. } => events::CREATE,
            DrawEvent::Update { .. } => events::UPDATE,
            DrawEvent::Delete { .. } => events::DELETE,
            DrawEvent::SelectionChange { .. } => events::SELECTION_CHANGE,
            DrawEvent::ModeChange { .. } => events::MODE_CHANGE,
            DrawEvent::LiveUpdate { .. } => events::LIVE_UPDATE,
        }
    }
}
