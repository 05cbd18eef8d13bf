use features::{FeatureId, Position};

use crate::DrawError;
use crate::constants::modes;
use crate::display::DisplayFeature;
use crate::event::{DrawEvent, PointerEvent};
use crate::feature::DrawFeature;
use crate::mode::{
    Cursor, KeyInput, ModeContext, ModeOptions, PointerDown, PointerMove, PointerUp, Render, Setup,
    Teardown, Trash,
};
use crate::path::CoordPath;

/// Axis-aligned rectangle drawn with a single press-drag-release.
///
/// While dragging, vertex 4 repeats vertex 0 so the ring renders closed; it
/// is removed again when the mode stops.
#[derive(Debug, Default)]
pub struct RectangleDragMode {
    rectangle: Option<FeatureId>,
    start: Option<Position>,
}

impl Setup for RectangleDragMode {
    fn on_setup(&mut self, ctx: &mut ModeContext<'_>, _options: &ModeOptions) -> Result<(), DrawError> {
        let id = ctx.add_feature(DrawFeature::empty_polygon());
        ctx.clear_selected_features();
        ctx.set_cursor(Cursor::Add);
        ctx.set_trash_actionable(true);
        ctx.disable_double_click_zoom();
        self.rectangle = Some(id);
        Ok(())
    }
}

impl PointerDown for RectangleDragMode {
    fn on_pointer_down(&mut self, ctx: &mut ModeContext<'_>, event: &mut PointerEvent) {
        event.prevent_default();
        let start = event.lng_lat;
        self.start = Some(start);
        if let Some(id) = &self.rectangle {
            if let Some(feature) = ctx.feature_mut(id) {
                feature.update_coordinate(&CoordPath::ring(0, 0), start);
            }
        }
    }
}

impl PointerMove for RectangleDragMode {
    fn on_drag(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        let (Some(start), Some(id)) = (self.start, &self.rectangle) else {
            return;
        };
        let Some(feature) = ctx.feature_mut(id) else {
            return;
        };
        let [x, y] = event.lng_lat;
        let corners = [[x, start[1]], [x, y], [start[0], y], start];
        for (i, corner) in corners.into_iter().enumerate() {
            feature.update_coordinate(&CoordPath::ring(0, i + 1), corner);
        }
    }
}

impl PointerUp for RectangleDragMode {
    fn on_pointer_up(&mut self, ctx: &mut ModeContext<'_>, _event: &PointerEvent) {
        ctx.set_cursor(Cursor::Pointer);
        let ids = self.rectangle.iter().cloned().collect();
        ctx.change_mode(modes::SIMPLE_SELECT, ModeOptions::select(ids));
    }
}

impl KeyInput for RectangleDragMode {}

impl Render for RectangleDragMode {
    fn to_display_features(
        &self,
        _ctx: &mut ModeContext<'_>,
        mut feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    ) {
        let is_active = feature.id.is_some() && feature.id == self.rectangle;
        feature.active = is_active;
        if is_active && self.start.is_none() {
            return;
        }
        display(feature)
    }
}

impl Teardown for RectangleDragMode {
    fn on_stop(&mut self, ctx: &mut ModeContext<'_>) {
        ctx.enable_double_click_zoom();
        ctx.set_cursor(Cursor::None);
        let Some(id) = self.rectangle.clone() else {
            return;
        };
        let Some(feature) = ctx.feature_mut(&id) else {
            return;
        };
        feature.remove_coordinate(&CoordPath::ring(0, 4));
        if feature.is_valid() {
            let created = feature.to_feature();
            ctx.fire(DrawEvent::Create {
                features: vec![created],
            });
            return;
        }
        ctx.delete_features(&[id], true);
        ctx.change_mode_silently(modes::SIMPLE_SELECT, ModeOptions::default());
    }
}

impl Trash for RectangleDragMode {
    fn on_trash(&mut self, ctx: &mut ModeContext<'_>) {
        if let Some(id) = self.rectangle.clone() {
            ctx.delete_features(&[id], true);
        }
        ctx.change_mode(modes::SIMPLE_SELECT, ModeOptions::default());
    }
}
