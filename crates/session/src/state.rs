use draw::constants::modes;
use features::Feature;
use serde::Serialize;

use crate::SessionError;

/// What the user is doing, as shown to them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Polygon,
    Rectangle,
    Circle,
    Edit,
    Delete,
}

impl Mode {
    /// Semantic mode for a draw-tool mode name, if it has one.
    pub fn from_draw_mode(raw: &str) -> Option<Mode> {
        match raw {
            modes::DRAW_POLYGON => Some(Mode::Polygon),
            modes::DRAW_RECTANGLE => Some(Mode::Rectangle),
            modes::DRAW_CIRCLE => Some(Mode::Circle),
            modes::DIRECT_SELECT => Some(Mode::Edit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub mode: Option<Mode>,
    /// Raw draw-tool mode name.
    pub draw_mode: String,
    pub is_drawing: bool,
    /// Last accepted state of the features under direct edit.
    pub direct_selection: Option<Vec<Feature>>,
    /// Selection as it was before any edit; Escape restores it.
    pub original_selection: Option<Vec<Feature>>,
    pub is_hovering_over_vertex: bool,
    pub polygon_clicks: u32,
    pub label: Option<String>,
    pub live_feature: Option<Feature>,
    /// Append-only.
    pub errors: Vec<SessionError>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: None,
            draw_mode: modes::SIMPLE_SELECT.to_string(),
            is_drawing: false,
            direct_selection: None,
            original_selection: None,
            is_hovering_over_vertex: false,
            polygon_clicks: 0,
            label: None,
            live_feature: None,
            errors: Vec::new(),
        }
    }
}
