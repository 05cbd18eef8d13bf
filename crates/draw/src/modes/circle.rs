use features::{FeatureId, Position};
use foundation::math::{CIRCLE_STEPS, circle_ring, haversine_distance_km};
use serde_json::{Value, json};

use crate::DrawError;
use crate::constants::{modes, properties};
use crate::display::DisplayFeature;
use crate::event::PointerEvent;
use crate::feature::DrawFeature;
use crate::mode::{
    KeyInput, ModeContext, ModeOptions, PointerDown, PointerMove, PointerUp, Render, Setup,
    Teardown, Trash,
};
use super::DrawPolygonMode;

/// Press to fix the centre, drag out the radius, release to finish.
#[derive(Debug)]
pub struct CircleMode {
    base: DrawPolygonMode,
}

impl Default for CircleMode {
    fn default() -> Self {
        Self {
            base: DrawPolygonMode::without_trailing_vertex(),
        }
    }
}

fn center_of(feature: &DrawFeature) -> Option<Position> {
    match feature.properties.get(properties::CENTER)?.as_array()?.as_slice() {
        [lng, lat] => Some([lng.as_f64()?, lat.as_f64()?]),
        _ => None,
    }
}

impl CircleMode {
    fn id(&self) -> Option<FeatureId> {
        self.base.polygon.clone()
    }

    fn resize(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        let Some(id) = self.id() else {
            return;
        };
        let Some(feature) = ctx.feature_mut(&id) else {
            return;
        };
        let Some(center) = center_of(feature) else {
            return;
        };
        let radius_km = haversine_distance_km(center, event.lng_lat);
        feature.set_polygon_rings(&[circle_ring(center, radius_km, CIRCLE_STEPS)]);
        feature.set_property(properties::RADIUS_IN_KM, json!(radius_km));
    }
}

impl Setup for CircleMode {
    fn on_setup(&mut self, ctx: &mut ModeContext<'_>, _options: &ModeOptions) -> Result<(), DrawError> {
        let mut polygon = DrawFeature::empty_polygon();
        polygon.set_property(properties::CENTER, json!([]));
        polygon.set_property(properties::IS_CIRCLE, Value::Bool(true));
        self.base.begin(ctx, polygon);
        ctx.disable_drag_pan();
        Ok(())
    }
}

impl PointerDown for CircleMode {
    fn on_pointer_down(&mut self, ctx: &mut ModeContext<'_>, event: &mut PointerEvent) {
        let Some(id) = self.id() else {
            return;
        };
        if let Some(feature) = ctx.feature_mut(&id) {
            if center_of(feature).is_none() {
                feature.set_property(properties::CENTER, json!(event.lng_lat));
            }
        }
    }
}

impl PointerMove for CircleMode {
    fn on_pointer_move(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        self.resize(ctx, event);
    }

    fn on_drag(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        self.resize(ctx, event);
    }
}

impl PointerUp for CircleMode {
    fn on_pointer_up(&mut self, ctx: &mut ModeContext<'_>, _event: &PointerEvent) {
        ctx.enable_drag_pan();
        let ids = self.id().into_iter().collect();
        ctx.change_mode(modes::SIMPLE_SELECT, ModeOptions::select(ids));
    }

    fn on_click(&mut self, ctx: &mut ModeContext<'_>, _event: &PointerEvent) {
        let Some(id) = self.id() else {
            return;
        };
        if let Some(feature) = ctx.feature_mut(&id) {
            feature.set_property(properties::CENTER, json!([]));
        }
    }
}

impl KeyInput for CircleMode {
    fn on_key_up(&mut self, ctx: &mut ModeContext<'_>, key: &str) {
        self.base.on_key_up(ctx, key)
    }
}

impl Render for CircleMode {
    fn to_display_features(
        &self,
        _ctx: &mut ModeContext<'_>,
        mut feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    ) {
        feature.active = feature.id.is_some() && feature.id == self.base.polygon;
        display(feature)
    }
}

impl Teardown for CircleMode {
    fn on_stop(&mut self, ctx: &mut ModeContext<'_>) {
        // Escape and trash leave without a pointer-up.
        ctx.enable_drag_pan();
        self.base.on_stop(ctx)
    }
}

impl Trash for CircleMode {
    fn on_trash(&mut self, ctx: &mut ModeContext<'_>) {
        self.base.on_trash(ctx)
    }
}
