use features::{FeatureId, Position};
use tracing::debug;

use crate::DrawError;
use crate::constants::modes;
use crate::display::{DisplayFeature, supplementary_points};
use crate::event::{DrawEvent, PointerEvent, PointerTarget, UpdateAction};
use crate::mode::{
    Cursor, KeyInput, ModeContext, ModeOptions, PointerDown, PointerMove, PointerUp, Render, Setup,
    Teardown, Trash,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Drag {
    Vertices,
    Feature,
}

/// Vertex editing of a single feature.
#[derive(Debug, Default)]
pub struct DirectSelectMode {
    feature_id: Option<FeatureId>,
    drag: Option<(Drag, Position)>,
    changed: bool,
}

impl DirectSelectMode {
    fn owns(&self, id: &FeatureId) -> bool {
        self.feature_id.as_ref() == Some(id)
    }

    fn fire_update(&self, ctx: &mut ModeContext<'_>) {
        let Some(id) = &self.feature_id else {
            return;
        };
        if let Some(feature) = ctx.get_feature(id) {
            let features = vec![feature.to_feature()];
            ctx.fire(DrawEvent::Update {
                action: UpdateAction::ChangeCoordinates,
                features,
            });
        }
    }

    fn refresh_actionable(ctx: &mut ModeContext<'_>) {
        let any = !ctx.selected_coordinates().is_empty();
        ctx.set_trash_actionable(any);
    }
}

impl Setup for DirectSelectMode {
    fn on_setup(&mut self, ctx: &mut ModeContext<'_>, options: &ModeOptions) -> Result<(), DrawError> {
        let id = options.feature_id.clone().ok_or(DrawError::MissingFeatureId)?;
        if ctx.get_feature(&id).is_none() {
            return Err(DrawError::FeatureNotFound(id));
        }
        ctx.set_selected(std::slice::from_ref(&id));
        ctx.clear_selected_coordinates();
        ctx.set_cursor(Cursor::Move);
        Self::refresh_actionable(ctx);
        self.feature_id = Some(id);
        Ok(())
    }
}

impl PointerDown for DirectSelectMode {
    fn on_pointer_down(&mut self, ctx: &mut ModeContext<'_>, event: &mut PointerEvent) {
        match &event.target {
            Some(PointerTarget::Vertex { parent, path }) if self.owns(parent) => {
                let already = ctx.selected_coordinates().contains(path);
                if !event.shift_key && !already {
                    ctx.clear_selected_coordinates();
                }
                ctx.select_coordinate(path.clone());
                self.drag = Some((Drag::Vertices, event.lng_lat));
            }
            Some(PointerTarget::Midpoint { parent, path }) if self.owns(parent) => {
                let inserted = ctx
                    .feature_mut(parent)
                    .is_some_and(|f| f.add_coordinate(path, event.lng_lat));
                if inserted {
                    self.fire_update(ctx);
                    ctx.clear_selected_coordinates();
                    ctx.select_coordinate(path.clone());
                    self.drag = Some((Drag::Vertices, event.lng_lat));
                }
            }
            Some(PointerTarget::Feature { id }) if self.owns(id) => {
                self.drag = Some((Drag::Feature, event.lng_lat));
            }
            _ => return,
        }
        event.prevent_default();
        self.changed = false;
        Self::refresh_actionable(ctx);
    }
}

impl PointerMove for DirectSelectMode {
    fn on_drag(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        let (Some((kind, origin)), Some(id)) = (self.drag, self.feature_id.clone()) else {
            return;
        };
        let delta = [event.lng_lat[0] - origin[0], event.lng_lat[1] - origin[1]];
        let paths = ctx.selected_coordinates();
        let Some(feature) = ctx.feature_mut(&id) else {
            return;
        };
        match kind {
            Drag::Feature => feature.shape.translate(delta),
            Drag::Vertices => {
                for path in &paths {
                    if let Some(at) = feature.coordinate(path) {
                        feature.update_coordinate(path, [at[0] + delta[0], at[1] + delta[1]]);
                    }
                }
            }
        }
        self.drag = Some((kind, event.lng_lat));
        self.changed = true;
    }
}

impl PointerUp for DirectSelectMode {
    fn on_pointer_up(&mut self, ctx: &mut ModeContext<'_>, _event: &PointerEvent) {
        if self.changed {
            self.fire_update(ctx);
        }
        self.drag = None;
        self.changed = false;
    }

    fn on_click(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        self.drag = None;
        self.changed = false;
        match &event.target {
            None => ctx.change_mode(modes::SIMPLE_SELECT, ModeOptions::default()),
            Some(target) if !self.owns(target.feature_id()) => {
                let other = target.feature_id().clone();
                ctx.change_mode(modes::SIMPLE_SELECT, ModeOptions::select(vec![other]));
            }
            Some(PointerTarget::Feature { .. }) => {
                ctx.clear_selected_coordinates();
                Self::refresh_actionable(ctx);
            }
            Some(_) => {}
        }
    }
}

impl KeyInput for DirectSelectMode {}

impl Render for DirectSelectMode {
    fn to_display_features(
        &self,
        ctx: &mut ModeContext<'_>,
        mut feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    ) {
        let editing = feature.id.as_ref().is_some_and(|id| self.owns(id));
        feature.active = editing;
        display(feature);
        if !editing {
            return;
        }
        let Some(id) = &self.feature_id else {
            return;
        };
        let selected = ctx.selected_coordinates();
        if let Some(f) = ctx.get_feature(id) {
            for handle in supplementary_points(f, ctx.mode_name(), &selected, true) {
                display(handle);
            }
        }
    }
}

impl Teardown for DirectSelectMode {
    fn on_stop(&mut self, ctx: &mut ModeContext<'_>) {
        ctx.clear_selected_coordinates();
    }
}

impl Trash for DirectSelectMode {
    fn on_trash(&mut self, ctx: &mut ModeContext<'_>) {
        let Some(id) = self.feature_id.clone() else {
            return;
        };
        let mut paths = ctx.selected_coordinates();
        if paths.is_empty() {
            return;
        }
        // Highest index first so earlier removals don't shift later paths.
        paths.sort();
        paths.reverse();
        let Some(feature) = ctx.feature_mut(&id) else {
            return;
        };
        for path in &paths {
            feature.remove_coordinate(path);
        }
        let valid = feature.is_valid();
        self.fire_update(ctx);
        ctx.clear_selected_coordinates();
        if !valid {
            debug!(feature = %id, "vertex removal left an invalid shape; deleting");
            ctx.delete_features(std::slice::from_ref(&id), false);
            ctx.change_mode(modes::SIMPLE_SELECT, ModeOptions::default());
        }
        Self::refresh_actionable(ctx);
    }
}
