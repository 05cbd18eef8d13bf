use features::{FeatureId, GeometryKind, Position};

use crate::DrawError;
use crate::constants::modes;
use crate::display::{DisplayFeature, supplementary_points};
use crate::event::{DrawEvent, PointerEvent, PointerTarget, UpdateAction};
use crate::mode::{
    Cursor, KeyInput, ModeContext, ModeOptions, PointerDown, PointerMove, PointerUp, Render, Setup,
    Teardown, Trash,
};

/// Neutral mode: select, move and delete whole features.
#[derive(Debug, Default)]
pub struct SimpleSelectMode {
    drag_origin: Option<Position>,
    moved: bool,
}

impl SimpleSelectMode {
    fn end_drag(&mut self, ctx: &mut ModeContext<'_>) {
        self.drag_origin = None;
        self.moved = false;
        ctx.set_cursor(Cursor::None);
    }

    fn refresh_actionable(ctx: &mut ModeContext<'_>) {
        let any = !ctx.selected_ids().is_empty();
        ctx.set_trash_actionable(any);
    }
}

impl Setup for SimpleSelectMode {
    fn on_setup(&mut self, ctx: &mut ModeContext<'_>, options: &ModeOptions) -> Result<(), DrawError> {
        ctx.set_selected(&options.feature_ids);
        ctx.clear_selected_coordinates();
        ctx.set_cursor(Cursor::None);
        Self::refresh_actionable(ctx);
        Ok(())
    }
}

impl PointerDown for SimpleSelectMode {
    fn on_pointer_down(&mut self, ctx: &mut ModeContext<'_>, event: &mut PointerEvent) {
        if let Some(PointerTarget::Feature { id }) = &event.target {
            if ctx.is_selected(id) {
                self.drag_origin = Some(event.lng_lat);
                self.moved = false;
                ctx.set_cursor(Cursor::Move);
            }
        }
    }
}

impl PointerMove for SimpleSelectMode {
    fn on_pointer_move(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        let over_feature = event.target.is_some();
        ctx.set_cursor(if over_feature { Cursor::Pointer } else { Cursor::None });
    }

    fn on_drag(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        let Some(origin) = self.drag_origin else {
            return;
        };
        let delta = [event.lng_lat[0] - origin[0], event.lng_lat[1] - origin[1]];
        for id in ctx.selected_ids() {
            if let Some(feature) = ctx.feature_mut(&id) {
                feature.shape.translate(delta);
            }
        }
        self.drag_origin = Some(event.lng_lat);
        self.moved = true;
    }
}

impl PointerUp for SimpleSelectMode {
    fn on_pointer_up(&mut self, ctx: &mut ModeContext<'_>, _event: &PointerEvent) {
        if self.moved {
            let features = ctx.selected_features();
            ctx.fire(DrawEvent::Update {
                action: UpdateAction::Move,
                features,
            });
        }
        self.end_drag(ctx);
    }

    fn on_click(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        self.end_drag(ctx);
        let Some(target) = &event.target else {
            ctx.clear_selected_features();
            Self::refresh_actionable(ctx);
            return;
        };
        let id: FeatureId = target.feature_id().clone();
        if event.shift_key {
            if !ctx.deselect(&id) {
                ctx.select(id);
            }
        } else if ctx.is_selected(&id) && ctx.selected_ids().len() == 1 {
            let editable = ctx
                .get_feature(&id)
                .is_some_and(|f| f.shape.kind() != GeometryKind::Point);
            if editable {
                ctx.change_mode(modes::DIRECT_SELECT, ModeOptions::edit(id));
                return;
            }
        } else {
            ctx.set_selected(std::slice::from_ref(&id));
        }
        Self::refresh_actionable(ctx);
    }
}

impl KeyInput for SimpleSelectMode {}

impl Render for SimpleSelectMode {
    fn to_display_features(
        &self,
        ctx: &mut ModeContext<'_>,
        mut feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    ) {
        let Some(id) = feature.id.clone() else {
            return display(feature);
        };
        feature.active = ctx.is_selected(&id);
        let show_handles = feature.active && !feature.geometry.is_point();
        display(feature);
        if show_handles {
            if let Some(f) = ctx.get_feature(&id) {
                for handle in supplementary_points(f, ctx.mode_name(), &[], false) {
                    display(handle);
                }
            }
        }
    }
}

impl Teardown for SimpleSelectMode {}

impl Trash for SimpleSelectMode {
    fn on_trash(&mut self, ctx: &mut ModeContext<'_>) {
        let ids = ctx.selected_ids();
        if ids.is_empty() {
            return;
        }
        ctx.delete_features(&ids, false);
        ctx.set_trash_actionable(false);
    }
}
