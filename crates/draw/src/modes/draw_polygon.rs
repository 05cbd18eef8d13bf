use features::{FeatureId, Geometry};

use crate::DrawError;
use crate::constants::{buttons, keys, modes};
use crate::display::DisplayFeature;
use crate::event::{DrawEvent, PointerEvent, PointerTarget};
use crate::feature::DrawFeature;
use crate::mode::{
    Cursor, KeyInput, ModeContext, ModeOptions, PointerDown, PointerMove, PointerUp, Render, Setup,
    Teardown, Trash,
};
use crate::path::CoordPath;

/// Click-by-click polygon drawing.
///
/// While drawing, the ring ends in a floating vertex that follows the
/// pointer; it is dropped when the mode stops. Adapters reuse this mode as
/// their base and tune it through the crate-visible fields.
#[derive(Debug)]
pub struct DrawPolygonMode {
    pub(crate) polygon: Option<FeatureId>,
    pub(crate) current_vertex_position: usize,
    /// Whether the ring carries a floating cursor vertex.
    pub(crate) trailing_vertex: bool,
}

impl Default for DrawPolygonMode {
    fn default() -> Self {
        Self {
            polygon: None,
            current_vertex_position: 0,
            trailing_vertex: true,
        }
    }
}

impl DrawPolygonMode {
    /// Base for adapters that rewrite the whole ring themselves.
    pub(crate) fn without_trailing_vertex() -> Self {
        Self {
            trailing_vertex: false,
            ..Self::default()
        }
    }

    pub fn polygon_id(&self) -> Option<&FeatureId> {
        self.polygon.as_ref()
    }

    /// Installs `feature` as the shape being drawn and prepares the map.
    pub(crate) fn begin(&mut self, ctx: &mut ModeContext<'_>, feature: DrawFeature) {
        let id = ctx.add_feature(feature);
        ctx.clear_selected_features();
        ctx.disable_double_click_zoom();
        ctx.set_cursor(Cursor::Add);
        ctx.activate_button(Some(buttons::POLYGON));
        ctx.set_trash_actionable(true);
        self.polygon = Some(id);
        self.current_vertex_position = 0;
    }

    fn finish(&self, ctx: &mut ModeContext<'_>) {
        if let Some(id) = &self.polygon {
            ctx.change_mode(modes::SIMPLE_SELECT, ModeOptions::select(vec![id.clone()]));
        }
    }

    /// Only the first and the last placed vertex are rendered as handles.
    fn is_own_vertex(&self, target: &PointerTarget) -> bool {
        match target {
            PointerTarget::Vertex { parent, .. } => self.polygon.as_ref() == Some(parent),
            _ => false,
        }
    }

    fn click_anywhere(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        let Some(id) = self.polygon.clone() else {
            return;
        };
        let pos = self.current_vertex_position;
        let Some(feature) = ctx.feature_mut(&id) else {
            return;
        };
        if pos > 0 && feature.coordinate(&CoordPath::ring(0, pos - 1)) == Some(event.lng_lat) {
            return self.finish(ctx);
        }
        feature.update_coordinate(&CoordPath::ring(0, pos), event.lng_lat);
        self.current_vertex_position += 1;
        if self.trailing_vertex {
            feature.update_coordinate(&CoordPath::ring(0, self.current_vertex_position), event.lng_lat);
        }
    }
}

impl Setup for DrawPolygonMode {
    fn on_setup(&mut self, ctx: &mut ModeContext<'_>, _options: &ModeOptions) -> Result<(), DrawError> {
        self.begin(ctx, DrawFeature::empty_polygon());
        Ok(())
    }
}

impl PointerDown for DrawPolygonMode {}

impl PointerMove for DrawPolygonMode {
    fn on_pointer_move(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        if self.trailing_vertex {
            if let Some(id) = self.polygon.clone() {
                let path = CoordPath::ring(0, self.current_vertex_position);
                if let Some(feature) = ctx.feature_mut(&id) {
                    feature.update_coordinate(&path, event.lng_lat);
                }
            }
        }
        let over_vertex = matches!(event.target, Some(PointerTarget::Vertex { .. }));
        ctx.set_cursor(if over_vertex { Cursor::Pointer } else { Cursor::Add });
    }
}

impl PointerUp for DrawPolygonMode {
    fn on_click(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        let closes = self.current_vertex_position > 0
            && event.target.as_ref().is_some_and(|t| self.is_own_vertex(t));
        if closes {
            return self.finish(ctx);
        }
        self.click_anywhere(ctx, event);
    }
}

impl KeyInput for DrawPolygonMode {
    fn on_key_up(&mut self, ctx: &mut ModeContext<'_>, key: &str) {
        match key {
            keys::ESCAPE => {
                if let Some(id) = self.polygon.clone() {
                    ctx.delete_features(&[id], true);
                }
                ctx.change_mode(modes::SIMPLE_SELECT, ModeOptions::default());
            }
            keys::ENTER => self.finish(ctx),
            _ => {}
        }
    }
}

impl Render for DrawPolygonMode {
    fn to_display_features(
        &self,
        ctx: &mut ModeContext<'_>,
        mut feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    ) {
        let Some(id) = self.polygon.clone() else {
            return display(feature);
        };
        let is_active = feature.id.as_ref() == Some(&id);
        feature.active = is_active;
        if !is_active {
            return display(feature);
        }
        let ring = match &feature.geometry {
            Geometry::Polygon(rings) => rings.first().cloned().unwrap_or_default(),
            _ => return display(feature),
        };
        // Closed ring: the first vertex appears twice.
        let count = ring.len();
        if count < 3 {
            return;
        }
        let mode = ctx.mode_name().to_string();
        display(DisplayFeature::vertex(&id, CoordPath::ring(0, 0), ring[0], false, &mode));
        if count > 3 {
            let end = count - 3;
            display(DisplayFeature::vertex(&id, CoordPath::ring(0, end), ring[end], false, &mode));
        }
        if count <= 4 {
            let mut line = feature.clone();
            line.geometry = Geometry::LineString(vec![ring[0], ring[1]]);
            display(line);
            if count == 3 {
                return;
            }
        }
        display(feature);
    }
}

impl Teardown for DrawPolygonMode {
    fn on_stop(&mut self, ctx: &mut ModeContext<'_>) {
        ctx.enable_double_click_zoom();
        ctx.set_cursor(Cursor::None);
        ctx.activate_button(None);
        let Some(id) = self.polygon.clone() else {
            return;
        };
        let trailing = self.trailing_vertex;
        let position = self.current_vertex_position;
        let Some(feature) = ctx.feature_mut(&id) else {
            return;
        };
        if trailing {
            feature.remove_coordinate(&CoordPath::ring(0, position));
        }
        if feature.is_valid() {
            let created = feature.to_feature();
            ctx.fire(DrawEvent::Create {
                features: vec![created],
            });
        } else {
            ctx.delete_features(&[id], true);
            ctx.change_mode_silently(modes::SIMPLE_SELECT, ModeOptions::default());
        }
    }
}

impl Trash for DrawPolygonMode {
    fn on_trash(&mut self, ctx: &mut ModeContext<'_>) {
        if let Some(id) = self.polygon.clone() {
            ctx.delete_features(&[id], true);
        }
        ctx.change_mode(modes::SIMPLE_SELECT, ModeOptions::default());
    }
}
