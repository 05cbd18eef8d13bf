//! Mode contract.
//!
//! A mode is a bundle of optional callbacks. Each callback lives on its own
//! trait whose default body does nothing, so a mode implements only the
//! traits it cares about and inherits the no-op for the rest. Adapters that
//! wrap a base mode forward explicitly to the base for the callbacks they do
//! not override.

use std::collections::VecDeque;

use features::{Feature, FeatureId};
use runtime::EventBus;
use tracing::trace;

use crate::DrawError;
use crate::display::DisplayFeature;
use crate::event::{DrawEvent, PointerEvent};
use crate::feature::DrawFeature;
use crate::path::CoordPath;
use crate::store::FeatureStore;

/// Arguments handed to a mode's setup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeOptions {
    pub feature_ids: Vec<FeatureId>,
    pub feature_id: Option<FeatureId>,
}

impl ModeOptions {
    pub fn select(ids: Vec<FeatureId>) -> Self {
        Self {
            feature_ids: ids,
            feature_id: None,
        }
    }

    pub fn edit(id: FeatureId) -> Self {
        Self {
            feature_ids: Vec::new(),
            feature_id: Some(id),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    None,
    Add,
    Pointer,
    Move,
}

/// Toolbar-facing state the modes drive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    pub cursor: Cursor,
    pub active_button: Option<&'static str>,
    pub trash_actionable: bool,
}

/// Map gestures the modes switch on and off.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapInteractions {
    pub double_click_zoom: bool,
    pub drag_pan: bool,
    initial_double_click_zoom: bool,
}

impl MapInteractions {
    pub fn new(double_click_zoom: bool) -> Self {
        Self {
            double_click_zoom,
            drag_pan: true,
            initial_double_click_zoom: double_click_zoom,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ToolRequest {
    ChangeMode {
        name: String,
        options: ModeOptions,
        silent: bool,
    },
}

/// Everything a mode callback may touch.
pub struct ModeContext<'a> {
    pub(crate) store: &'a mut FeatureStore,
    pub(crate) bus: &'a mut EventBus<DrawEvent>,
    pub(crate) requests: &'a mut VecDeque<ToolRequest>,
    pub(crate) map: &'a mut MapInteractions,
    pub(crate) ui: &'a mut UiState,
    pub(crate) mode_name: &'a str,
}

impl<'a> ModeContext<'a> {
    pub fn mode_name(&self) -> &str {
        self.mode_name
    }

    pub fn store(&self) -> &FeatureStore {
        &*self.store
    }

    pub fn add_feature(&mut self, feature: DrawFeature) -> FeatureId {
        self.store.add(feature)
    }

    pub fn get_feature(&self, id: &FeatureId) -> Option<&DrawFeature> {
        self.store.get(id)
    }

    pub fn feature_mut(&mut self, id: &FeatureId) -> Option<&mut DrawFeature> {
        self.store.get_mut(id)
    }

    /// Removes features. Unless `silent`, the removal is reported as a
    /// delete event.
    pub fn delete_features(&mut self, ids: &[FeatureId], silent: bool) {
        let removed = self.store.delete(ids);
        if !silent && !removed.is_empty() {
            let features = removed.iter().map(DrawFeature::to_feature).collect();
            self.fire(DrawEvent::Delete { features });
        }
    }

    pub fn selected_ids(&self) -> Vec<FeatureId> {
        self.store.selected_ids().to_vec()
    }

    pub fn selected_features(&self) -> Vec<Feature> {
        self.store.selected_features()
    }

    pub fn is_selected(&self, id: &FeatureId) -> bool {
        self.store.is_selected(id)
    }

    pub fn select(&mut self, id: FeatureId) -> bool {
        self.store.select(id)
    }

    pub fn deselect(&mut self, id: &FeatureId) -> bool {
        self.store.deselect(id)
    }

    pub fn set_selected(&mut self, ids: &[FeatureId]) {
        self.store.set_selected(ids)
    }

    pub fn clear_selected_features(&mut self) {
        self.store.clear_selected()
    }

    pub fn selected_coordinates(&self) -> Vec<CoordPath> {
        self.store.selected_coordinates().to_vec()
    }

    pub fn select_coordinate(&mut self, path: CoordPath) -> bool {
        self.store.select_coordinate(path)
    }

    pub fn deselect_coordinate(&mut self, path: &CoordPath) -> bool {
        self.store.deselect_coordinate(path)
    }

    pub fn clear_selected_coordinates(&mut self) {
        self.store.clear_selected_coordinates()
    }

    /// Requests a switch once the current callback returns.
    pub fn change_mode(&mut self, name: &str, options: ModeOptions) {
        self.request_mode(name, options, false)
    }

    /// As [`Self::change_mode`] without the mode-change event.
    pub fn change_mode_silently(&mut self, name: &str, options: ModeOptions) {
        self.request_mode(name, options, true)
    }

    fn request_mode(&mut self, name: &str, options: ModeOptions, silent: bool) {
        self.requests.push_back(ToolRequest::ChangeMode {
            name: name.to_string(),
            options,
            silent,
        });
    }

    pub fn fire(&mut self, event: DrawEvent) {
        trace!(event = event.name(), mode = self.mode_name, "draw event");
        self.bus.emit(event);
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.ui.cursor = cursor;
    }

    pub fn activate_button(&mut self, button: Option<&'static str>) {
        self.ui.active_button = button;
    }

    pub fn set_trash_actionable(&mut self, actionable: bool) {
        self.ui.trash_actionable = actionable;
    }

    pub fn disable_double_click_zoom(&mut self) {
        self.map.double_click_zoom = false;
    }

    /// Restores double-click zoom unless it was off from the start.
    pub fn enable_double_click_zoom(&mut self) {
        if self.map.initial_double_click_zoom {
            self.map.double_click_zoom = true;
        }
    }

    pub fn disable_drag_pan(&mut self) {
        self.map.drag_pan = false;
    }

    pub fn enable_drag_pan(&mut self) {
        self.map.drag_pan = true;
    }
}

pub trait Setup {
    fn on_setup(&mut self, _ctx: &mut ModeContext<'_>, _options: &ModeOptions) -> Result<(), DrawError> {
        Ok(())
    }
}

pub trait PointerDown {
    fn on_pointer_down(&mut self, _ctx: &mut ModeContext<'_>, _event: &mut PointerEvent) {}
}

pub trait PointerMove {
    /// Pointer moved with no button held.
    fn on_pointer_move(&mut self, _ctx: &mut ModeContext<'_>, _event: &PointerEvent) {}

    /// Pointer moved while pressed.
    fn on_drag(&mut self, _ctx: &mut ModeContext<'_>, _event: &PointerEvent) {}
}

/// A release is either a click (within click tolerance of the press) or a
/// plain pointer-up; exactly one of the two callbacks runs.
pub trait PointerUp {
    fn on_pointer_up(&mut self, _ctx: &mut ModeContext<'_>, _event: &PointerEvent) {}

    fn on_click(&mut self, _ctx: &mut ModeContext<'_>, _event: &PointerEvent) {}
}

pub trait KeyInput {
    fn on_key_up(&mut self, _ctx: &mut ModeContext<'_>, _key: &str) {}
}

pub trait Render {
    /// Maps one stored feature to what should be drawn. The default passes
    /// it through unchanged.
    fn to_display_features(
        &self,
        _ctx: &mut ModeContext<'_>,
        feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    ) {
        display(feature)
    }
}

pub trait Teardown {
    fn on_stop(&mut self, _ctx: &mut ModeContext<'_>) {}
}

pub trait Trash {
    fn on_trash(&mut self, _ctx: &mut ModeContext<'_>) {}
}

pub trait DrawMode:
    Setup + PointerDown + PointerMove + PointerUp + KeyInput + Render + Teardown + Trash
{
}

impl<T> DrawMode for T where
    T: Setup + PointerDown + PointerMove + PointerUp + KeyInput + Render + Teardown + Trash
{
}
