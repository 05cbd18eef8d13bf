use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::layer::{LayerKind, LayerStyle};

/// Layer the session hit-tests to detect hovering over a vertex handle.
pub const VERTEX_HOT_LAYER: &str = "gl-draw-polygon-and-line-vertex-inactive.hot";

/// Fill layer (and GeoJSON source) mirroring the host's committed shapes.
pub const DRAW_FILL_LAYER: &str = "draw-fill";

const HOT: &str = "hot";
const COLD: &str = "cold";
const ACTIVE_COLOR: &str = "#FFC700";
const IDLE_COLOR: &str = "#00FFFF";
const STATIC_COLOR: &str = "#404040";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOptions {
    /// Hide the outline of finished polygons.
    pub hide_idle_lines: bool,
}

fn line(id: &str, filter: serde_json::Value, color: &str, width: f64) -> LayerStyle {
    LayerStyle::new(id, LayerKind::Line)
        .with_filter(filter)
        .with_layout("line-cap", json!("round"))
        .with_layout("line-join", json!("round"))
        .with_paint("line-color", json!(color))
        .with_paint("line-width", json!(width))
}

fn circle(id: &str, filter: serde_json::Value, color: &str, radius: f64) -> LayerStyle {
    LayerStyle::new(id, LayerKind::Circle)
        .with_filter(filter)
        .with_paint("circle-color", json!(color))
        .with_paint("circle-radius", json!(radius))
}

fn fill(id: &str, filter: serde_json::Value, color: &str, opacity: f64, outline: &str) -> LayerStyle {
    LayerStyle::new(id, LayerKind::Fill)
        .with_filter(filter)
        .with_paint("fill-color", json!(color))
        .with_paint("fill-opacity", json!(opacity))
        .with_paint("fill-outline-color", json!(outline))
}

/// Draw tool style table, one entry per visual state.
pub fn draw_styles(options: StyleOptions) -> Vec<LayerStyle> {
    let idle_polygon = json!([
        "all",
        ["==", "active", "false"],
        ["==", "$type", "Polygon"],
        ["!=", "mode", "static"]
    ]);
    let active_polygon = json!(["all", ["==", "active", "true"], ["==", "$type", "Polygon"]]);
    let vertex = json!([
        "all",
        ["==", "meta", "vertex"],
        ["==", "$type", "Point"],
        ["!=", "mode", "static"]
    ]);
    let idle_point = json!([
        "all",
        ["==", "active", "false"],
        ["==", "$type", "Point"],
        ["==", "meta", "feature"],
        ["!=", "mode", "static"]
    ]);
    let active_point = json!([
        "all",
        ["==", "$type", "Point"],
        ["==", "active", "true"],
        ["!=", "meta", "midpoint"]
    ]);
    let visibility = if options.hide_idle_lines { "none" } else { "visible" };

    vec![
        // Transparent so finished shapes stay clickable.
        fill("gl-draw-polygon-fill-inactive", idle_polygon.clone(), "red", 0.0, "red"),
        fill("gl-draw-polygon-fill-active", active_polygon.clone(), ACTIVE_COLOR, 0.1, ACTIVE_COLOR),
        circle(
            "gl-draw-polygon-midpoint",
            json!(["all", ["==", "$type", "Point"], ["==", "meta", "midpoint"]]),
            ACTIVE_COLOR,
            6.0,
        ),
        line("gl-draw-polygon-stroke-inactive", idle_polygon, IDLE_COLOR, 3.0)
            .with_layout("visibility", json!(visibility)),
        line("gl-draw-polygon-stroke-active", active_polygon, ACTIVE_COLOR, 3.0),
        line(
            "gl-draw-line-inactive",
            json!([
                "all",
                ["==", "active", "false"],
                ["==", "$type", "LineString"],
                ["!=", "mode", "static"]
            ]),
            "#3bb2d0",
            2.0,
        ),
        // First edge while a polygon is being drawn.
        line(
            "gl-draw-line-active",
            json!(["all", ["==", "$type", "LineString"], ["==", "active", "true"]]),
            ACTIVE_COLOR,
            3.0,
        ),
        circle("gl-draw-polygon-and-line-vertex-stroke-inactive", vertex.clone(), "#fff", 7.0),
        circle("gl-draw-polygon-and-line-vertex-inactive", vertex, ACTIVE_COLOR, 5.0),
        circle("gl-draw-point-point-stroke-inactive", idle_point.clone(), "#fff", 5.0)
            .with_paint("circle-opacity", json!(1)),
        circle("gl-draw-point-inactive", idle_point, "#3bb2d0", 3.0),
        circle("gl-draw-point-stroke-active", active_point.clone(), "#fff", 7.0),
        circle("gl-draw-point-active", active_point, "#fbb03b", 5.0),
        fill(
            "gl-draw-polygon-fill-static",
            json!(["all", ["==", "mode", "static"], ["==", "$type", "Polygon"]]),
            "red",
            0.1,
            STATIC_COLOR,
        ),
        line(
            "gl-draw-polygon-stroke-static",
            json!(["all", ["==", "mode", "static"], ["==", "$type", "Polygon"]]),
            STATIC_COLOR,
            2.0,
        ),
        line(
            "gl-draw-line-static",
            json!(["all", ["==", "mode", "static"], ["==", "$type", "LineString"]]),
            STATIC_COLOR,
            2.0,
        ),
        circle(
            "gl-draw-point-static",
            json!(["all", ["==", "mode", "static"], ["==", "$type", "Point"]]),
            STATIC_COLOR,
            5.0,
        ),
    ]
}

/// The renderer draws every style twice, once per source: features being
/// edited live in the `hot` source, the rest in `cold`. Ids get the source
/// name as suffix.
pub fn hot_and_cold(styles: &[LayerStyle]) -> Vec<LayerStyle> {
    let mut out = Vec::with_capacity(styles.len() * 2);
    for source in [COLD, HOT] {
        for style in styles {
            let mut copy = style.clone();
            copy.id = format!("{}.{source}", style.id);
            copy.source = Some(json!(format!("mapbox-gl-draw-{source}")));
            out.push(copy);
        }
    }
    out
}

/// Fill for committed shapes; highlights on the `hover` feature state.
pub fn draw_fill_layer() -> LayerStyle {
    LayerStyle::new(DRAW_FILL_LAYER, LayerKind::Fill)
        .with_paint("fill-color", json!("#00FFFF"))
        .with_paint(
            "fill-opacity",
            json!(["case", ["boolean", ["feature-state", "hover"], false], 0.25, 0]),
        )
        .with_source(json!({
            "type": "geojson",
            "data": {"type": "FeatureCollection", "features": []}
        }))
}

#[cfg(test)]
mod tests {
    use super::{StyleOptions, VERTEX_HOT_LAYER, draw_fill_layer, draw_styles, hot_and_cold};
    use features::{Feature, Geometry};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn by_id<'a>(styles: &'a [crate::LayerStyle], id: &str) -> &'a crate::LayerStyle {
        styles.iter().find(|s| s.id == id).expect("style present")
    }

    #[test]
    fn idle_outline_follows_option() {
        let shown = draw_styles(StyleOptions::default());
        let hidden = draw_styles(StyleOptions { hide_idle_lines: true });
        assert!(by_id(&shown, "gl-draw-polygon-stroke-inactive").is_visible());
        assert!(!by_id(&hidden, "gl-draw-polygon-stroke-inactive").is_visible());
        assert_eq!(shown.len(), hidden.len());
    }

    #[test]
    fn vertex_hot_layer_exists_and_matches_vertex_handles() {
        let styles = hot_and_cold(&draw_styles(StyleOptions::default()));
        let layer = by_id(&styles, VERTEX_HOT_LAYER);
        let handle = Feature::new(Geometry::Point([0.0, 0.0]))
            .with_property("meta", "vertex")
            .with_property("mode", "draw_polygon")
            .with_property("active", "false");
        assert!(layer.renders(&handle));
        assert_eq!(layer.source, Some(json!("mapbox-gl-draw-hot")));
    }

    #[test]
    fn draw_fill_starts_empty() {
        let v = draw_fill_layer().to_json();
        assert_eq!(v["id"], json!("draw-fill"));
        assert_eq!(v["source"]["data"]["features"], json!([]));
        assert_eq!(v["paint"]["fill-opacity"][2], json!(0.25));
    }
}
