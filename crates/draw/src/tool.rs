use std::collections::VecDeque;

use features::{Feature, FeatureCollection, FeatureId};
use runtime::EventBus;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::DrawError;
use crate::constants::{keys, modes};
use crate::display::DisplayFeature;
use crate::event::{DrawEvent, PointerEvent, ScreenPoint};
use crate::feature::DrawFeature;
use crate::mode::{
    DrawMode, KeyInput, MapInteractions, ModeContext, ModeOptions, PointerDown, PointerMove, PointerUp,
    Render, Setup, Teardown, ToolRequest, Trash, UiState,
};
use crate::modes::SimpleSelectMode;
use crate::registry::ModeRegistry;
use crate::store::FeatureStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawToolOptions {
    /// Half-size in pixels of the box used to find features under the pointer.
    pub click_buffer: f64,
    /// Maximum pointer travel in pixels for a press and release to count as a click.
    pub click_tolerance: f64,
    pub double_click_zoom: bool,
    pub trash_control: bool,
}

impl Default for DrawToolOptions {
    fn default() -> Self {
        Self {
            click_buffer: 16.0,
            click_tolerance: 2.0,
            double_click_zoom: true,
            trash_control: true,
        }
    }
}

/// How a pointer release was interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    Click,
    Release,
}

/// Draw tool: owns the features under edit and routes input to the active
/// mode.
///
/// Every public call runs to completion before returning: mode changes the
/// mode asked for are applied, the display list is rebuilt, and any
/// resulting notifications are queued for [`DrawTool::drain_events`].
pub struct DrawTool {
    options: DrawToolOptions,
    modes: ModeRegistry,
    mode_name: String,
    mode: Box<dyn DrawMode>,
    store: FeatureStore,
    bus: EventBus<DrawEvent>,
    requests: VecDeque<ToolRequest>,
    map: MapInteractions,
    ui: UiState,
    pressed_at: Option<ScreenPoint>,
    last_selection: Vec<FeatureId>,
    display: Vec<DisplayFeature>,
}

impl std::fmt::Debug for DrawTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawTool")
            .field("mode", &self.mode_name)
            .field("features", &self.store.len())
            .field("selected", &self.store.selected_ids())
            .finish()
    }
}

impl DrawTool {
    /// Starts in `simple_select`, which the registry must provide.
    pub fn new(options: DrawToolOptions, registry: ModeRegistry) -> Result<Self, DrawError> {
        let factory = registry
            .get(modes::SIMPLE_SELECT)
            .ok_or_else(|| DrawError::UnknownMode(modes::SIMPLE_SELECT.to_string()))?;
        let mut tool = Self {
            map: MapInteractions::new(options.double_click_zoom),
            options,
            modes: registry,
            mode_name: modes::SIMPLE_SELECT.to_string(),
            mode: factory(),
            store: FeatureStore::new(),
            bus: EventBus::new(),
            requests: VecDeque::new(),
            ui: UiState::default(),
            pressed_at: None,
            last_selection: Vec::new(),
            display: Vec::new(),
        };
        tool.with_mode(|m, ctx| m.on_setup(ctx, &ModeOptions::default()))?;
        tool.settle()?;
        Ok(tool)
    }

    pub fn options(&self) -> &DrawToolOptions {
        &self.options
    }

    pub fn mode(&self) -> &str {
        &self.mode_name
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn map_interactions(&self) -> &MapInteractions {
        &self.map
    }

    pub fn display_features(&self) -> &[DisplayFeature] {
        &self.display
    }

    pub fn drain_events(&mut self) -> Vec<DrawEvent> {
        self.bus.drain().into_iter().map(|e| e.payload).collect()
    }

    /// Adds or replaces a feature without notifying. A missing id is
    /// generated.
    pub fn add(&mut self, feature: Feature) -> Result<FeatureId, DrawError> {
        let mut finite = true;
        feature
            .geometry
            .for_each_position(|p| finite &= p[0].is_finite() && p[1].is_finite());
        if !finite {
            return Err(DrawError::InvalidGeometry("non-finite coordinate".to_string()));
        }
        let id = self.store.add(DrawFeature::from_feature(feature));
        self.settle()?;
        Ok(id)
    }

    pub fn get(&self, id: &FeatureId) -> Option<Feature> {
        self.store.get(id).map(DrawFeature::to_feature)
    }

    pub fn get_all(&self) -> FeatureCollection {
        FeatureCollection::new(self.store.to_features())
    }

    pub fn feature_ids(&self) -> Vec<FeatureId> {
        self.store.ids()
    }

    /// Removes features without notifying. Leaves direct editing if the
    /// edited feature went away.
    pub fn delete(&mut self, ids: &[FeatureId]) -> Result<(), DrawError> {
        if self.store.delete(ids).is_empty() {
            return Ok(());
        }
        self.after_api_removal()
    }

    pub fn delete_all(&mut self) -> Result<(), DrawError> {
        if self.store.clear().is_empty() {
            return Ok(());
        }
        self.after_api_removal()
    }

    fn after_api_removal(&mut self) -> Result<(), DrawError> {
        let switched = if self.mode_name == modes::DIRECT_SELECT {
            self.switch_mode(modes::SIMPLE_SELECT, ModeOptions::default(), true)
        } else {
            Ok(())
        };
        let settled = self.settle();
        switched.and(settled)
    }

    pub fn trash(&mut self) -> Result<(), DrawError> {
        self.with_mode(|m, ctx| m.on_trash(ctx));
        self.settle()
    }

    pub fn selected_ids(&self) -> Vec<FeatureId> {
        self.store.selected_ids().to_vec()
    }

    pub fn get_selected(&self) -> Vec<Feature> {
        self.store.selected_features()
    }

    /// Switches mode and reports it with a mode-change event.
    pub fn change_mode(&mut self, name: &str, options: ModeOptions) -> Result<(), DrawError> {
        self.request_change(name, options, false)
    }

    pub fn change_mode_silently(&mut self, name: &str, options: ModeOptions) -> Result<(), DrawError> {
        self.request_change(name, options, true)
    }

    fn request_change(&mut self, name: &str, options: ModeOptions, silent: bool) -> Result<(), DrawError> {
        if name == modes::SIMPLE_SELECT && self.mode_name == modes::SIMPLE_SELECT {
            // Reselect in place instead of restarting the mode.
            self.store.set_selected(&options.feature_ids);
            return self.settle();
        }
        if name == modes::DIRECT_SELECT
            && self.mode_name == modes::DIRECT_SELECT
            && options.feature_id.as_ref() == self.store.selected_ids().first()
        {
            return Ok(());
        }
        let switched = self.switch_mode(name, options, silent);
        let settled = self.settle();
        switched.and(settled)
    }

    pub fn pointer_down(&mut self, mut event: PointerEvent) -> Result<(), DrawError> {
        self.pressed_at = Some(event.point);
        self.with_mode(|m, ctx| m.on_pointer_down(ctx, &mut event));
        self.settle()
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> Result<(), DrawError> {
        if self.pressed_at.is_some() {
            self.with_mode(|m, ctx| m.on_drag(ctx, &event));
        } else {
            self.with_mode(|m, ctx| m.on_pointer_move(ctx, &event));
        }
        self.settle()
    }

    /// Resolves the release as a click when the pointer stayed within
    /// `click_tolerance` of where it was pressed (or was never pressed).
    pub fn pointer_up(&mut self, event: PointerEvent) -> Result<PointerOutcome, DrawError> {
        let outcome = match self.pressed_at.take() {
            Some(start) if start.distance(event.point) > self.options.click_tolerance => {
                PointerOutcome::Release
            }
            _ => PointerOutcome::Click,
        };
        match outcome {
            PointerOutcome::Click => self.with_mode(|m, ctx| m.on_click(ctx, &event)),
            PointerOutcome::Release => self.with_mode(|m, ctx| m.on_pointer_up(ctx, &event)),
        }
        self.settle()?;
        Ok(outcome)
    }

    pub fn key_down(&mut self, key: &str) -> Result<(), DrawError> {
        if self.options.trash_control && matches!(key, keys::BACKSPACE | keys::DELETE) {
            return self.trash();
        }
        Ok(())
    }

    pub fn key_up(&mut self, key: &str) -> Result<(), DrawError> {
        self.with_mode(|m, ctx| m.on_key_up(ctx, key));
        self.settle()
    }

    fn with_mode<R>(&mut self, f: impl FnOnce(&mut dyn DrawMode, &mut ModeContext<'_>) -> R) -> R {
        let mut ctx = ModeContext {
            store: &mut self.store,
            bus: &mut self.bus,
            requests: &mut self.requests,
            map: &mut self.map,
            ui: &mut self.ui,
            mode_name: &self.mode_name,
        };
        f(self.mode.as_mut(), &mut ctx)
    }

    fn emit(&mut self, event: DrawEvent) {
        trace!(event = event.name(), mode = %self.mode_name, "draw event");
        self.bus.emit(event);
    }

    /// Stops the current mode and starts `name`. Mode changes requested
    /// while stopping are dropped; the switch in progress supersedes them.
    fn switch_mode(&mut self, name: &str, options: ModeOptions, silent: bool) -> Result<(), DrawError> {
        let factory = self
            .modes
            .get(name)
            .ok_or_else(|| DrawError::UnknownMode(name.to_string()))?;
        let queued = self.requests.len();
        self.with_mode(|m, ctx| m.on_stop(ctx));
        self.requests.truncate(queued);

        debug!(from = %self.mode_name, to = name, silent, "draw mode change");
        self.mode_name = name.to_string();
        self.mode = factory();
        if let Err(err) = self.with_mode(|m, ctx| m.on_setup(ctx, &options)) {
            warn!(mode = name, error = %err, "mode setup failed; returning to simple_select");
            self.mode_name = modes::SIMPLE_SELECT.to_string();
            self.mode = match self.modes.get(modes::SIMPLE_SELECT) {
                Some(factory) => factory(),
                None => Box::new(SimpleSelectMode::default()),
            };
            // Setup of the neutral mode with no selection cannot fail.
            let _ = self.with_mode(|m, ctx| m.on_setup(ctx, &ModeOptions::default()));
            if !silent {
                self.emit(DrawEvent::ModeChange {
                    mode: modes::SIMPLE_SELECT.to_string(),
                });
            }
            return Err(err);
        }
        if !silent {
            self.emit(DrawEvent::ModeChange {
                mode: name.to_string(),
            });
        }
        Ok(())
    }

    /// Applies queued mode changes, rebuilds the display list and reports a
    /// changed selection.
    fn settle(&mut self) -> Result<(), DrawError> {
        let mut outcome = Ok(());
        while let Some(request) = self.requests.pop_front() {
            let ToolRequest::ChangeMode {
                name,
                options,
                silent,
            } = request;
            if let Err(err) = self.switch_mode(&name, options, silent) {
                outcome = Err(err);
            }
        }
        self.render();
        self.emit_selection_change();
        outcome
    }

    fn render(&mut self) {
        let snapshot: Vec<DisplayFeature> = self
            .store
            .iter()
            .map(|f| DisplayFeature::feature(f, &self.mode_name))
            .collect();
        let mut out: Vec<DisplayFeature> = Vec::with_capacity(snapshot.len());
        for feature in snapshot {
            self.with_mode(|m, ctx| m.to_display_features(ctx, feature, &mut |d: DisplayFeature| out.push(d)));
        }
        self.display = out;
    }

    fn emit_selection_change(&mut self) {
        if self.store.selected_ids() == self.last_selection.as_slice() {
            return;
        }
        self.last_selection = self.store.selected_ids().to_vec();
        let features = self.store.selected_features();
        self.emit(DrawEvent::SelectionChange { features });
    }
}
