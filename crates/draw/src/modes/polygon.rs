use crate::DrawError;
use crate::display::DisplayFeature;
use crate::event::{DrawEvent, PointerEvent};
use crate::mode::{
    KeyInput, ModeContext, ModeOptions, PointerDown, PointerMove, PointerUp, Render, Setup,
    Teardown, Trash,
};
use super::DrawPolygonMode;

/// Stock polygon drawing that also reports the shape under construction as a
/// live update on every render, so observers can follow it while it is drawn.
#[derive(Debug, Default)]
pub struct PolygonMode {
    base: DrawPolygonMode,
}

impl Setup for PolygonMode {
    fn on_setup(&mut self, ctx: &mut ModeContext<'_>, options: &ModeOptions) -> Result<(), DrawError> {
        self.base.on_setup(ctx, options)
    }
}

impl PointerDown for PolygonMode {
    fn on_pointer_down(&mut self, ctx: &mut ModeContext<'_>, event: &mut PointerEvent) {
        self.base.on_pointer_down(ctx, event)
    }
}

impl PointerMove for PolygonMode {
    fn on_pointer_move(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        self.base.on_pointer_move(ctx, event)
    }

    fn on_drag(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        self.base.on_drag(ctx, event)
    }
}

impl PointerUp for PolygonMode {
    fn on_pointer_up(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        self.base.on_pointer_up(ctx, event)
    }

    fn on_click(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        self.base.on_click(ctx, event)
    }
}

impl KeyInput for PolygonMode {
    fn on_key_up(&mut self, ctx: &mut ModeContext<'_>, key: &str) {
        self.base.on_key_up(ctx, key)
    }
}

impl Render for PolygonMode {
    fn to_display_features(
        &self,
        ctx: &mut ModeContext<'_>,
        feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    ) {
        if feature.id.is_some() && feature.id.as_ref() == self.base.polygon_id() {
            ctx.fire(DrawEvent::LiveUpdate {
                feature: feature.to_feature(),
            });
        }
        self.base.to_display_features(ctx, feature, display)
    }
}

impl Teardown for PolygonMode {
    fn on_stop(&mut self, ctx: &mut ModeContext<'_>) {
        self.base.on_stop(ctx)
    }
}

impl Trash for PolygonMode {
    fn on_trash(&mut self, ctx: &mut ModeContext<'_>) {
        self.base.on_trash(ctx)
    }
}
