use draw::constants::{keys, modes};
use draw::{CoordPath, PointerEvent, PointerTarget, ScreenBox, ScreenPoint};
use features::{Feature, FeatureCollection, FeatureId, Geometry};
use foundation::time::Time;
use layers::LayerStyle;
use pretty_assertions::assert_eq;
use serde_json::json;
use session::{
    COMMIT_DELAY_MS, DrawSession, HostCall, InputEvent, MapError, MapSurface, Mode, RecordingHost,
    SessionOptions,
};

/// Map stand-in: one pixel is 0.0001 degrees, y grows southwards.
#[derive(Default)]
struct TestMap {
    sources: Vec<(String, usize)>,
    renders: usize,
}

impl MapSurface for TestMap {
    fn add_layer(&mut self, _layer: &LayerStyle) {}

    fn set_source_data(&mut self, source_id: &str, data: &FeatureCollection) -> Result<(), MapError> {
        self.sources.push((source_id.to_string(), data.len()));
        Ok(())
    }

    fn query_rendered_features(&self, _area: ScreenBox, _layers: &[&str]) -> Vec<Feature> {
        Vec::new()
    }

    fn render(&mut self, _display: &[draw::DisplayFeature]) {
        self.renders += 1;
    }
}

type Session = DrawSession<RecordingHost, TestMap>;

fn session_with(options: serde_json::Value) -> Session {
    let options: SessionOptions = serde_json::from_value(options).expect("options");
    DrawSession::attach(TestMap::default(), RecordingHost::new(), &options).expect("attach")
}

fn session() -> Session {
    session_with(json!({}))
}

fn lng_lat(x: f64, y: f64) -> [f64; 2] {
    [x / 10_000.0, -y / 10_000.0]
}

fn at(x: f64, y: f64) -> PointerEvent {
    PointerEvent::new(lng_lat(x, y), ScreenPoint::new(x, y))
}

fn click(s: &mut Session, event: PointerEvent) {
    s.handle(InputEvent::PointerDown(event.clone()));
    s.handle(InputEvent::PointerUp(event));
}

fn drag(s: &mut Session, from: PointerEvent, to: PointerEvent) {
    s.handle(InputEvent::PointerDown(from));
    s.handle(InputEvent::PointerMove(to.clone()));
    s.handle(InputEvent::PointerUp(to));
}

fn key(s: &mut Session, name: &str) {
    s.handle(InputEvent::KeyDown(name.to_string()));
    s.handle(InputEvent::KeyUp(name.to_string()));
}

fn square(id: &str) -> Feature {
    Feature::new(Geometry::Polygon(vec![vec![
        lng_lat(0.0, 0.0),
        lng_lat(100.0, 0.0),
        lng_lat(100.0, 100.0),
        lng_lat(0.0, 100.0),
        lng_lat(0.0, 0.0),
    ]]))
    .with_id(id)
    .with_property("name", "north field")
}

fn draw_rectangle(s: &mut Session, to: f64) {
    s.set_draw_mode(modes::DRAW_RECTANGLE);
    drag(s, at(0.0, 0.0), at(to, to));
}

fn draw_polygon(s: &mut Session, points: &[(f64, f64)]) {
    s.set_draw_mode(modes::DRAW_POLYGON);
    for &(x, y) in points {
        click(s, at(x, y));
    }
}

fn select_then_edit(s: &mut Session, id: &str) {
    let on_feature = || at(50.0, 50.0).with_target(PointerTarget::Feature { id: FeatureId::from(id) });
    click(s, on_feature());
    click(s, on_feature());
}

fn vertex(id: &str, path: &str, x: f64, y: f64) -> PointerEvent {
    at(x, y).with_target(PointerTarget::Vertex {
        parent: FeatureId::from(id),
        path: path.parse::<CoordPath>().expect("path"),
    })
}

#[test]
fn accepted_polygon_is_committed_once_with_a_fresh_id() {
    let mut s = session();
    draw_polygon(&mut s, &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
    assert_eq!(s.polygon_clicks(), 3);
    let drawn_id = s.features()[0].id.clone();

    // Clicking the last point again finishes the shape.
    click(&mut s, at(100.0, 100.0));
    assert_eq!(s.polygon_clicks(), 0);
    assert_eq!(s.mode(), None);
    assert!(!s.is_drawing());
    assert!(s.host().added().is_empty());

    s.advance(Time::from_millis(COMMIT_DELAY_MS));
    let added = s.host().added();
    assert_eq!(added.len(), 1);
    assert!(added[0].id.is_some());
    assert_ne!(added[0].id, drawn_id);
    assert_eq!(added[0].properties.get("type"), Some(&json!(4)));
    assert_eq!(added[0].properties.len(), 1);
    assert!(s.host().rejections().is_empty());

    // Later ticks do not commit again.
    s.advance(Time::from_millis(100));
    assert_eq!(s.host().added().len(), 1);
}

#[test]
fn configured_feature_type_is_stamped() {
    let mut s = session_with(json!({"featureType": "orchard"}));
    draw_rectangle(&mut s, 50.0);
    s.advance(Time::from_millis(COMMIT_DELAY_MS));
    assert_eq!(s.host().added()[0].properties.get("type"), Some(&json!("orchard")));
}

#[test]
fn oversized_shape_is_rejected_with_only_the_area_flag() {
    let mut s = session_with(json!({"areaSize": 1}));
    draw_rectangle(&mut s, 100.0);
    s.advance(Time::from_millis(1_000));

    assert!(s.host().added().is_empty());
    let rejections = s.host().rejections();
    assert_eq!(rejections.len(), 1);
    let r = rejections[0];
    assert!(r.too_big);
    assert!(!r.has_kinks);
    assert!(!r.is_outside);
    assert_eq!(r.has_no_coords, None);
    assert_eq!(r.features.len(), 1);
    assert!(s.features().is_empty());
    assert_eq!(s.mode(), None);
}

#[test]
fn shape_outside_allowed_area_is_rejected() {
    let mut s = session_with(json!({"allowOutsideArea": [10.0, 10.0, 11.0, 11.0]}));
    draw_rectangle(&mut s, 50.0);
    s.advance(Time::from_millis(1_000));

    assert!(s.host().added().is_empty());
    let rejections = s.host().rejections();
    assert_eq!(rejections.len(), 1);
    assert!(rejections[0].is_outside);
    assert!(!rejections[0].too_big);
    assert!(!rejections[0].has_kinks);
}

#[test]
fn self_intersecting_polygon_is_rejected_unless_kinks_are_allowed() {
    let bow_tie = [(0.0, 0.0), (100.0, 100.0), (100.0, 0.0), (0.0, 100.0)];

    let mut strict = session();
    draw_polygon(&mut strict, &bow_tie);
    key(&mut strict, keys::ENTER);
    strict.advance(Time::from_millis(1_000));
    assert!(strict.host().added().is_empty());
    let rejections = strict.host().rejections();
    assert_eq!(rejections.len(), 1);
    assert!(rejections[0].has_kinks);
    assert!(!rejections[0].too_big);

    let mut lenient = session_with(json!({"allowKinks": true}));
    draw_polygon(&mut lenient, &bow_tie);
    key(&mut lenient, keys::ENTER);
    lenient.advance(Time::from_millis(1_000));
    assert_eq!(lenient.host().added().len(), 1);
    assert!(lenient.host().rejections().is_empty());
}

#[test]
fn polygon_label_tracks_clicks() {
    let mut s = session_with(json!({"customMessage": {"start": "Tap to begin", "close": "Enter to close"}}));
    assert_eq!(s.label(), None);

    s.set_draw_mode(modes::DRAW_POLYGON);
    assert_eq!(s.mode(), Some(Mode::Polygon));
    assert_eq!(s.label(), Some("Tap to begin"));

    click(&mut s, at(0.0, 0.0));
    assert_eq!(s.label(), None);
    click(&mut s, at(100.0, 0.0));
    click(&mut s, at(100.0, 100.0));
    assert_eq!(s.polygon_clicks(), 3);
    assert_eq!(s.label(), Some("Enter to close"));
}

#[test]
fn polygon_mode_reports_the_shape_in_progress() {
    let mut s = session();
    draw_polygon(&mut s, &[(0.0, 0.0), (100.0, 0.0)]);
    let live = s.live_feature().expect("live feature");
    assert_eq!(live.geometry.kind().as_str(), "Polygon");
    assert!(live.geometry.position_count() >= 3);
}

#[test]
fn delete_forwards_one_removal_and_resets_clicks() {
    let mut s = session();
    s.sync_draws(&[square("field-7")]);
    assert_eq!(s.map().sources, vec![("draw-fill".to_string(), 1)]);

    draw_polygon(&mut s, &[(500.0, 500.0), (600.0, 500.0)]);
    s.set_draw_mode(modes::SIMPLE_SELECT);
    assert!(s.polygon_clicks() > 0);

    click(
        &mut s,
        at(50.0, 50.0).with_target(PointerTarget::Feature {
            id: FeatureId::from("field-7"),
        }),
    );
    assert_eq!(s.mode(), Some(Mode::Delete));
    assert_eq!(s.label(), Some("Press delete to remove shape"));
    assert_eq!(s.original_selection().map(|f| f.len()), Some(1));

    key(&mut s, keys::DELETE);
    assert_eq!(s.host().removed_ids(), vec![FeatureId::from("field-7")]);
    assert_eq!(s.polygon_clicks(), 0);
    assert_eq!(s.mode(), None);
    assert!(!s.is_drawing());
    assert_eq!(s.original_selection(), None);
    assert!(s.features().is_empty());
}

#[test]
fn escape_restores_the_original_selection() {
    let mut s = session();
    let original = square("field-7");
    s.sync_draws(std::slice::from_ref(&original));

    select_then_edit(&mut s, "field-7");
    assert_eq!(s.draw_mode(), modes::DIRECT_SELECT);
    assert_eq!(s.mode(), Some(Mode::Edit));

    drag(&mut s, vertex("field-7", "0.2", 100.0, 100.0), at(140.0, 160.0));
    let moved = s.tool().get(&FeatureId::from("field-7")).expect("feature");
    assert_ne!(moved.geometry, original.geometry);
    assert_eq!(s.direct_selection().map(|f| f.len()), Some(1));
    assert_eq!(s.host().updated().len(), 1);

    s.host_mut().clear();
    key(&mut s, keys::ESCAPE);

    let restored = s.tool().get(&FeatureId::from("field-7")).expect("feature");
    assert_eq!(restored.geometry, original.geometry);
    let updates = s.host().updated();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, Some(FeatureId::from("field-7")));
    assert_eq!(updates[0].geometry, original.geometry);
    assert_eq!(s.original_selection(), None);
    assert_eq!(s.mode(), None);
    assert!(!s.is_drawing());
    assert_eq!(s.polygon_clicks(), 0);
    assert_eq!(s.draw_mode(), s.tool().mode());
    assert_eq!(s.draw_mode(), modes::SIMPLE_SELECT);
}

#[test]
fn first_edit_rejected_restores_the_shape_and_never_reaches_the_host() {
    let mut s = session_with(json!({"allowOutsideArea": [-0.1, -0.1, 0.1, 0.1]}));
    let original = square("field-7");
    s.sync_draws(std::slice::from_ref(&original));
    select_then_edit(&mut s, "field-7");
    assert_eq!(s.direct_selection().map(|f| f.len()), Some(1));

    drag(&mut s, vertex("field-7", "0.2", 100.0, 100.0), at(5_000.0, 5_000.0));

    let rejections = s.host().rejections();
    assert_eq!(rejections.len(), 1);
    assert!(rejections[0].is_outside);
    let id = FeatureId::from("field-7");
    assert_eq!(s.tool().get(&id).expect("feature").geometry, original.geometry);
    assert_eq!(s.tool().mode(), modes::SIMPLE_SELECT);

    s.host_mut().clear();
    key(&mut s, keys::ENTER);
    let updates = s.host().updated();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].geometry, original.geometry);
}

#[test]
fn rejected_edit_rolls_back_to_the_last_good_shape() {
    let mut s = session_with(json!({"allowOutsideArea": [-0.1, -0.1, 0.1, 0.1]}));
    s.sync_draws(&[square("field-7")]);
    select_then_edit(&mut s, "field-7");

    drag(&mut s, vertex("field-7", "0.2", 100.0, 100.0), at(120.0, 120.0));
    let good = s.tool().get(&FeatureId::from("field-7")).expect("feature").geometry;

    // Far outside the allowed box.
    drag(&mut s, vertex("field-7", "0.2", 120.0, 120.0), at(5_000.0, 5_000.0));

    let rejections = s.host().rejections();
    assert_eq!(rejections.len(), 1);
    assert!(rejections[0].is_outside);
    assert_eq!(rejections[0].has_no_coords, Some(false));
    assert_eq!(s.tool().get(&FeatureId::from("field-7")).expect("feature").geometry, good);
    assert_eq!(s.tool().mode(), modes::SIMPLE_SELECT);
    assert_eq!(s.mode(), None);
    assert!(!s.is_drawing());
    assert_eq!(s.direct_selection(), None);
}

#[test]
fn enter_returns_to_selection_from_any_mode() {
    for start in [modes::DRAW_POLYGON, modes::DRAW_RECTANGLE, modes::DRAW_CIRCLE] {
        let mut s = session();
        s.set_draw_mode(start);
        assert!(s.is_drawing());
        key(&mut s, keys::ENTER);
        assert_eq!(s.draw_mode(), modes::SIMPLE_SELECT, "from {start}");
        assert!(!s.is_drawing(), "from {start}");
        assert_eq!(s.mode(), None);
    }

    let mut s = session();
    s.sync_draws(&[square("field-7"), square("field-8")]);
    select_then_edit(&mut s, "field-7");
    s.host_mut().clear();
    key(&mut s, keys::ENTER);
    assert_eq!(s.draw_mode(), modes::SIMPLE_SELECT);
    assert!(!s.is_drawing());
    let updated: Vec<_> = s.host().updated().iter().map(|f| f.id.clone()).collect();
    assert_eq!(
        updated,
        vec![Some(FeatureId::from("field-7")), Some(FeatureId::from("field-8"))]
    );
}

#[test]
fn circle_commits_a_closed_ring_with_radius() {
    let mut s = session();
    s.set_draw_mode(modes::DRAW_CIRCLE);
    drag(&mut s, at(0.0, 0.0), at(50.0, 0.0));
    s.advance(Time::from_millis(COMMIT_DELAY_MS));

    let added = s.host().added();
    assert_eq!(added.len(), 1);
    match &added[0].geometry {
        Geometry::Polygon(rings) => {
            assert_eq!(rings[0].len(), 65);
            assert_eq!(rings[0].first(), rings[0].last());
        }
        other => panic!("expected polygon, got {other:?}"),
    }
    assert!(
        s.host()
            .calls
            .iter()
            .all(|c| !matches!(c, HostCall::Error(_)))
    );
}

#[test]
fn detach_hands_back_map_and_host() {
    let mut s = session();
    draw_rectangle(&mut s, 50.0);
    assert_eq!(s.pending_commits(), 1);
    let (map, host) = s.detach();
    assert!(map.renders > 0);
    assert!(host.added().is_empty());
}
