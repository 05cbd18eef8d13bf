use draw::constants::{keys, modes};
use draw::{
    DisplayFeature, DrawEvent, DrawTool, ModeOptions, ModeRegistry, PointerEvent, PointerOutcome,
    ScreenBox, ScreenPoint,
};
use features::{Feature, FeatureCollection, FeatureId, TYPE_PROPERTY};
use foundation::time::Time;
use layers::{DRAW_FILL_LAYER, VERTEX_HOT_LAYER, draw_fill_layer, draw_styles, hot_and_cold};
use policy::PolicyLimits;
use runtime::Scheduler;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::SessionError;
use crate::host::{FeatureHost, Rejection};
use crate::label::derive_label;
use crate::map::MapSurface;
use crate::options::{Messages, SessionOptions};
use crate::state::{Mode, SessionState};

/// Delay between accepting a new shape and handing it to the host, so the
/// tool has finished discarding its own copy first.
pub const COMMIT_DELAY_MS: u64 = 10;

/// Upper bound on event rounds per input; handlers reacting to tool events
/// may cause more events.
const MAX_PUMP_ROUNDS: usize = 32;

/// Raw input forwarded from the map canvas and the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    KeyDown(String),
    KeyUp(String),
}

#[derive(Debug)]
struct PendingCommit {
    features: Vec<Feature>,
}

/// Drives a [`DrawTool`] on behalf of a host application.
///
/// Everything runs on the caller's thread. Each public call handles the
/// input, then drains the tool's events until it goes quiet, then refreshes
/// the map and the status label.
pub struct DrawSession<H: FeatureHost, M: MapSurface> {
    tool: DrawTool,
    host: H,
    map: M,
    limits: PolicyLimits,
    messages: Messages,
    feature_type: Value,
    state: SessionState,
    commits: Scheduler<PendingCommit>,
    now: Time,
}

impl<H: FeatureHost, M: MapSurface> std::fmt::Debug for DrawSession<H, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawSession")
            .field("tool", &self.tool)
            .field("state", &self.state)
            .field("pending_commits", &self.commits.pending())
            .finish()
    }
}

impl<H: FeatureHost, M: MapSurface> DrawSession<H, M> {
    /// Creates the draw tool with the three adapters installed and adds the
    /// draw style layers and the `draw-fill` layer to the map.
    pub fn attach(mut map: M, host: H, options: &SessionOptions) -> Result<Self, SessionError> {
        let tool = DrawTool::new(options.draw.clone(), ModeRegistry::with_adapters())?;
        let styles = hot_and_cold(&draw_styles(options.styles));
        for layer in &styles {
            map.add_layer(layer);
        }
        map.add_layer(&draw_fill_layer());
        debug!(layers = styles.len() + 1, "draw session attached");

        let mut session = Self {
            tool,
            host,
            map,
            limits: options.limits(),
            messages: options.messages(),
            feature_type: options.feature_type.clone(),
            state: SessionState::default(),
            commits: Scheduler::new(),
            now: Time::ZERO,
        };
        session.refresh_label();
        Ok(session)
    }

    /// Releases the map and the host. Pending commits are dropped.
    pub fn detach(self) -> (M, H) {
        debug!(dropped_commits = self.commits.pending(), "draw session detached");
        (self.map, self.host)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> Option<Mode> {
        self.state.mode
    }

    pub fn draw_mode(&self) -> &str {
        &self.state.draw_mode
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing
    }

    pub fn polygon_clicks(&self) -> u32 {
        self.state.polygon_clicks
    }

    pub fn is_hovering_over_vertex(&self) -> bool {
        self.state.is_hovering_over_vertex
    }

    pub fn direct_selection(&self) -> Option<&[Feature]> {
        self.state.direct_selection.as_deref()
    }

    pub fn original_selection(&self) -> Option<&[Feature]> {
        self.state.original_selection.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.state.label.as_deref()
    }

    pub fn errors(&self) -> &[SessionError] {
        &self.state.errors
    }

    /// Latest in-progress polygon reported while drawing.
    pub fn live_feature(&self) -> Option<&Feature> {
        self.state.live_feature.as_ref()
    }

    /// Features currently held by the draw tool.
    pub fn features(&self) -> Vec<Feature> {
        self.tool.get_all().features
    }

    pub fn tool(&self) -> &DrawTool {
        &self.tool
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn now(&self) -> Time {
        self.now
    }

    pub fn pending_commits(&self) -> usize {
        self.commits.pending()
    }

    pub fn handle(&mut self, input: InputEvent) {
        match input {
            InputEvent::PointerDown(mut event) => {
                self.resolve_target(&mut event);
                let result = self.tool.pointer_down(event);
                self.sync(result);
                self.pump();
            }
            InputEvent::PointerMove(mut event) => {
                self.resolve_target(&mut event);
                let point = event.point;
                let result = self.tool.pointer_move(event);
                self.sync(result);
                self.pump();
                self.on_pointer_move(point);
            }
            InputEvent::PointerUp(mut event) => {
                self.resolve_target(&mut event);
                let outcome = self.tool.pointer_up(event);
                self.pump();
                match outcome {
                    Ok(PointerOutcome::Click) => self.on_click(),
                    Ok(PointerOutcome::Release) => {}
                    Err(err) => self.record(err.into()),
                }
            }
            InputEvent::KeyDown(key) => {
                let result = self.tool.key_down(&key);
                self.sync(result);
                self.pump();
                match key.as_str() {
                    keys::ESCAPE => self.escape(),
                    keys::ENTER => self.commit(),
                    _ => {}
                }
            }
            InputEvent::KeyUp(key) => {
                let result = self.tool.key_up(&key);
                self.sync(result);
                self.pump();
            }
        }
        self.refresh_label();
    }

    /// Moves the session clock and hands due shapes to the host.
    pub fn advance(&mut self, now: Time) {
        if now > self.now {
            self.now = now;
        }
        for pending in self.commits.take_due(self.now) {
            self.commit_created(pending.features);
        }
        self.pump();
        self.refresh_label();
    }

    /// Logical undo: puts the selection back the way it was before it was
    /// edited, then leaves every drawing state.
    pub fn escape(&mut self) {
        if let Some(original) = self.state.original_selection.take() {
            let ids: Vec<FeatureId> = original.iter().filter_map(|f| f.id.clone()).collect();
            let result = self.tool.delete(&ids);
            self.sync(result);
            for feature in &original {
                let result = self.tool.add(feature.clone());
                self.sync(result);
            }
            for feature in &original {
                let stamped = self.stamp(feature);
                self.host.update_feature(&stamped);
            }
            info!(restored = original.len(), "selection restored");
            self.pump();
        }
        // Removing the edited feature leaves direct_select without a mode-change event.
        self.state.draw_mode = self.tool.mode().to_string();
        self.state.original_selection = None;
        self.state.is_drawing = false;
        self.state.mode = None;
        self.state.polygon_clicks = 0;
        self.refresh_label();
    }

    /// Finishes the current interaction: a shape still being drawn is
    /// completed first, then every feature in the tool is forwarded to the
    /// host and the tool returns to plain selection.
    pub fn commit(&mut self) {
        if modes::is_drawing_mode(self.tool.mode()) {
            let result = self.tool.key_up(keys::ENTER);
            self.sync(result);
            self.pump();
        }
        self.forward_all_updates();
        let result = self.tool.change_mode(modes::SIMPLE_SELECT, ModeOptions::default());
        self.sync(result);
        self.pump();
        self.state.draw_mode = modes::SIMPLE_SELECT.to_string();
        self.state.mode = None;
        self.state.is_drawing = false;
        self.refresh_label();
    }

    /// Toolbar hook: switches the tool to `name` (for example `draw_circle`).
    pub fn set_draw_mode(&mut self, name: &str) {
        self.state.draw_mode = name.to_string();
        let result = self.tool.change_mode(name, ModeOptions::default());
        self.sync(result);
        self.pump();
        self.refresh_label();
    }

    /// Mirrors the host's committed shapes into the tool and the `draw-fill`
    /// source.
    pub fn sync_draws(&mut self, draws: &[Feature]) {
        for feature in draws {
            let result = self.tool.add(feature.clone());
            self.sync(result);
        }
        let collection = FeatureCollection::new(draws.to_vec());
        if let Err(err) = self.map.set_source_data(DRAW_FILL_LAYER, &collection) {
            self.record(err.into());
        }
        self.pump();
        self.refresh_label();
    }

    fn resolve_target(&self, event: &mut PointerEvent) {
        if event.target.is_none() {
            event.target = self.map.target_at(event.point, self.tool.options().click_buffer);
        }
    }

    fn pump(&mut self) {
        for _ in 0..MAX_PUMP_ROUNDS {
            let events = self.tool.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                self.dispatch(event);
            }
        }
        let display: &[DisplayFeature] = self.tool.display_features();
        self.map.render(display);
    }

    fn dispatch(&mut self, event: DrawEvent) {
        match event {
            DrawEvent::Create { features } => self.on_create(features),
            DrawEvent::Update { features, .. } => self.on_update(features),
            DrawEvent::Delete { features } => self.on_delete(features),
            DrawEvent::SelectionChange { .. } => self.on_selection_change(),
            DrawEvent::ModeChange { .. } => self.on_mode_change(),
            DrawEvent::LiveUpdate { feature } => self.state.live_feature = Some(feature),
        }
    }

    fn on_create(&mut self, features: Vec<Feature>) {
        let report = self.limits.check_created(&features);
        // The tool's copy goes either way; accepted shapes come back with a
        // fresh id once committed.
        let ids: Vec<FeatureId> = features.iter().filter_map(|f| f.id.clone()).collect();
        let result = self.tool.delete(&ids);
        self.sync(result);
        self.state.is_drawing = false;
        self.state.mode = None;
        self.state.polygon_clicks = 0;

        if report.passed() {
            info!(count = features.len(), "shape accepted");
            self.commits
                .schedule_after(self.now, COMMIT_DELAY_MS, PendingCommit { features });
        } else {
            info!(?report, count = features.len(), "shape rejected");
            let rejection = Rejection::new(&report, features);
            self.host.error_modal(&self.tool, &rejection);
        }
    }

    fn commit_created(&mut self, features: Vec<Feature>) {
        for feature in features {
            let committed = Feature {
                id: Some(FeatureId::generate()),
                properties: self.type_properties(),
                geometry: feature.geometry,
            };
            self.host.add_feature(&committed);
            info!(id = ?committed.id, "shape committed");
            let result = self.tool.add(committed);
            self.sync(result);
        }
    }

    fn on_update(&mut self, features: Vec<Feature>) {
        let report = self.limits.check_updated(&features);
        if report.passed() {
            self.state.direct_selection = Some(features);
            self.forward_all_updates();
            return;
        }

        info!(?report, count = features.len(), "edit rejected");
        let rejection = Rejection::new(&report, features);
        self.host.error_modal(&self.tool, &rejection);
        if let Some(backup) = self.state.direct_selection.take() {
            for feature in backup {
                let result = self.tool.add(feature);
                self.sync(result);
            }
        }
        let result = self.tool.change_mode(modes::SIMPLE_SELECT, ModeOptions::default());
        self.sync(result);
        self.state.mode = None;
        self.state.is_drawing = false;
    }

    fn on_delete(&mut self, features: Vec<Feature>) {
        self.state.is_drawing = false;
        self.state.original_selection = None;
        for feature in features.iter().filter(|f| f.id.is_some()) {
            self.host.remove_feature(feature);
        }
        self.state.polygon_clicks = 0;
        self.state.mode = None;
    }

    /// Reads the selection from the tool rather than from the event: a
    /// handler may already have removed what the event reported.
    fn on_selection_change(&mut self) {
        let selected = self.tool.get_selected();
        let tool_mode = self.tool.mode().to_string();

        if !selected.is_empty() && tool_mode == modes::SIMPLE_SELECT {
            self.state.mode = Some(Mode::Delete);
        }
        if selected.is_empty() {
            self.state.original_selection = None;
        } else if self.state.original_selection.is_none() {
            self.state.original_selection = Some(selected.clone());
        }
        self.state.is_drawing = !selected.is_empty() || modes::is_drawing_mode(&tool_mode);
        self.state.direct_selection = (tool_mode == modes::DIRECT_SELECT).then_some(selected);
    }

    /// Entering `direct_select` snapshots the selection so the first edit
    /// can be rolled back.
    fn on_mode_change(&mut self) {
        let raw = self.tool.mode().to_string();
        self.state.direct_selection = (raw == modes::DIRECT_SELECT).then(|| self.tool.get_selected());
        if let Some(mode) = Mode::from_draw_mode(&raw) {
            self.state.mode = Some(mode);
        }
        self.state.is_drawing = raw.contains("draw");
        self.state.draw_mode = raw;
    }

    fn on_click(&mut self) {
        if self.state.is_drawing {
            self.state.polygon_clicks += 1;
        }
    }

    fn on_pointer_move(&mut self, point: ScreenPoint) {
        if !self.state.is_drawing {
            self.state.is_hovering_over_vertex = false;
            return;
        }
        let area = ScreenBox::around(point, self.tool.options().click_buffer);
        let hits = self.map.query_rendered_features(area, &[VERTEX_HOT_LAYER]);
        self.state.is_hovering_over_vertex = !hits.is_empty();
    }

    fn forward_all_updates(&mut self) {
        let features = self.tool.get_all().features;
        for feature in features.iter().filter(|f| f.id.is_some()) {
            let stamped = self.stamp(feature);
            self.host.update_feature(&stamped);
        }
    }

    fn type_properties(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert(TYPE_PROPERTY.to_string(), self.feature_type.clone());
        properties
    }

    /// Host-facing copy: same id and geometry, properties replaced by the
    /// feature-type tag.
    fn stamp(&self, feature: &Feature) -> Feature {
        Feature {
            id: feature.id.clone(),
            properties: self.type_properties(),
            geometry: feature.geometry.clone(),
        }
    }

    fn sync<T>(&mut self, result: Result<T, draw::DrawError>) {
        if let Err(err) = result {
            self.record(err.into());
        }
    }

    fn record(&mut self, err: SessionError) {
        warn!(error = %err, "draw sync fault");
        self.state.errors.push(err);
    }

    fn refresh_label(&mut self) {
        self.state.label = derive_label(
            self.state.mode,
            self.state.is_drawing,
            self.state.is_hovering_over_vertex,
            self.state.polygon_clicks,
            &self.messages,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{COMMIT_DELAY_MS, DrawSession, InputEvent};
    use crate::host::{HostCall, RecordingHost};
    use crate::map::{MapError, MapSurface};
    use crate::options::SessionOptions;
    use crate::state::Mode;
    use crate::SessionError;
    use draw::constants::{keys, modes};
    use draw::{PointerEvent, ScreenBox, ScreenPoint};
    use features::{Feature, FeatureCollection, Geometry};
    use foundation::time::Time;
    use layers::LayerStyle;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Default)]
    struct NullMap {
        layers: Vec<String>,
        vertex_hits: usize,
        fail_sources: bool,
    }

    impl MapSurface for NullMap {
        fn add_layer(&mut self, layer: &LayerStyle) {
            self.layers.push(layer.id.clone());
        }

        fn set_source_data(&mut self, source_id: &str, _data: &FeatureCollection) -> Result<(), MapError> {
            if self.fail_sources {
                return Err(MapError::MissingSource(source_id.to_string()));
            }
            Ok(())
        }

        fn query_rendered_features(&self, _area: ScreenBox, _layers: &[&str]) -> Vec<Feature> {
            vec![Feature::new(Geometry::Point([0.0, 0.0])); self.vertex_hits]
        }
    }

    fn session(map: NullMap) -> DrawSession<RecordingHost, NullMap> {
        DrawSession::attach(map, RecordingHost::new(), &SessionOptions::default()).expect("attach")
    }

    fn at(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new([x / 1000.0, -y / 1000.0], ScreenPoint::new(x, y))
    }

    #[test]
    fn attach_installs_draw_layers() {
        let s = session(NullMap::default());
        assert!(s.map().layers.iter().any(|id| id == "draw-fill"));
        assert!(s.map().layers.iter().any(|id| id == layers::VERTEX_HOT_LAYER));
        assert_eq!(s.label(), None);
    }

    #[test]
    fn toolbar_mode_sets_drawing_state() {
        let mut s = session(NullMap::default());
        s.set_draw_mode(modes::DRAW_CIRCLE);
        assert_eq!(s.mode(), Some(Mode::Circle));
        assert!(s.is_drawing());
        assert_eq!(s.draw_mode(), modes::DRAW_CIRCLE);
        assert_eq!(s.label(), Some("Click and drag to draw a pivot"));
    }

    #[test]
    fn unknown_mode_is_recorded_not_raised() {
        let mut s = session(NullMap::default());
        s.set_draw_mode("draw_hexagon");
        assert_eq!(s.errors().len(), 1);
        assert!(matches!(s.errors()[0], SessionError::Sync(draw::DrawError::UnknownMode(_))));
    }

    #[test]
    fn hover_needs_drawing_and_a_vertex_hit() {
        let mut s = session(NullMap {
            vertex_hits: 1,
            ..NullMap::default()
        });
        s.handle(InputEvent::PointerMove(at(5.0, 5.0)));
        assert!(!s.is_hovering_over_vertex());

        s.set_draw_mode(modes::DRAW_POLYGON);
        s.handle(InputEvent::PointerMove(at(5.0, 5.0)));
        assert!(s.is_hovering_over_vertex());
    }

    #[test]
    fn rectangle_commit_waits_for_the_deferral() {
        let mut s = session(NullMap::default());
        s.set_draw_mode(modes::DRAW_RECTANGLE);
        s.handle(InputEvent::PointerDown(at(0.0, 0.0)));
        s.handle(InputEvent::PointerMove(at(10.0, 10.0)));
        s.handle(InputEvent::PointerUp(at(10.0, 10.0)));

        assert_eq!(s.pending_commits(), 1);
        assert!(s.host().added().is_empty());
        assert!(s.features().is_empty());
        assert_eq!(s.mode(), None);
        assert!(!s.is_drawing());

        s.advance(Time::from_millis(COMMIT_DELAY_MS - 1));
        assert!(s.host().added().is_empty());
        s.advance(Time::from_millis(COMMIT_DELAY_MS));
        let added = s.host().added();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].properties.get("type"), Some(&json!(4)));
        assert_eq!(s.features().len(), 1);
        assert_eq!(s.features()[0].id, added[0].id);
    }

    #[test]
    fn sync_draws_records_missing_source() {
        let mut s = session(NullMap {
            fail_sources: true,
            ..NullMap::default()
        });
        let draw = Feature::new(Geometry::Polygon(vec![vec![
            [0.0, 0.0],
            [0.001, 0.0],
            [0.001, 0.001],
            [0.0, 0.0],
        ]]))
        .with_id("field-1");
        s.sync_draws(&[draw]);
        assert_eq!(s.features().len(), 1);
        assert_eq!(
            s.errors(),
            &[SessionError::MapSource(MapError::MissingSource("draw-fill".into()))]
        );
    }

    #[test]
    fn enter_leaves_every_mode() {
        let mut s = session(NullMap::default());
        s.set_draw_mode(modes::DRAW_CIRCLE);
        s.handle(InputEvent::KeyDown(keys::ENTER.into()));
        assert_eq!(s.draw_mode(), modes::SIMPLE_SELECT);
        assert!(!s.is_drawing());
        assert_eq!(s.mode(), None);
        assert!(s.host().calls.iter().all(|c| !matches!(c, HostCall::Add(_))));
    }
}
