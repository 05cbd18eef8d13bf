//! Evaluation of legacy style filters (`["all", ["==", "meta", "vertex"], ...]`).
//!
//! Supported: `all`, `any`, `none`, `==`, `!=`, `in`, `!in`, `has`, `!has`.
//! The key `$type` compares against the geometry type with multi-geometries
//! folded into their single form, as renderers do. Unknown operators match
//! nothing.

use features::{Feature, GeometryKind};
use serde_json::Value;

fn type_of(feature: &Feature) -> &'static str {
    match feature.geometry.kind() {
        GeometryKind::Point | GeometryKind::MultiPoint => "Point",
        GeometryKind::LineString | GeometryKind::MultiLineString => "LineString",
        GeometryKind::Polygon | GeometryKind::MultiPolygon => "Polygon",
    }
}

fn lookup(feature: &Feature, key: &str) -> Option<Value> {
    match key {
        "$type" => Some(Value::from(type_of(feature))),
        "$id" => feature.id.as_ref().map(|id| Value::from(id.as_str())),
        _ => feature.property(key).cloned(),
    }
}

pub fn matches(filter: &Value, feature: &Feature) -> bool {
    let Some(parts) = filter.as_array() else {
        return false;
    };
    let Some((op, args)) = parts.split_first() else {
        return true;
    };
    let key = || args.first().and_then(Value::as_str);
    match op.as_str() {
        Some("all") => args.iter().all(|f| matches(f, feature)),
        Some("any") => args.iter().any(|f| matches(f, feature)),
        Some("none") => !args.iter().any(|f| matches(f, feature)),
        Some("==") | Some("!=") => {
            let (Some(k), Some(expected)) = (key(), args.get(1)) else {
                return false;
            };
            let equal = lookup(feature, k).as_ref() == Some(expected);
            if op.as_str() == Some("==") { equal } else { !equal }
        }
        Some("in") | Some("!in") => {
            let Some(k) = key() else {
                return false;
            };
            let actual = lookup(feature, k);
            let found = args[1..].iter().any(|v| actual.as_ref() == Some(v));
            if op.as_str() == Some("in") { found } else { !found }
        }
        Some("has") => key().is_some_and(|k| lookup(feature, k).is_some()),
        Some("!has") => key().is_some_and(|k| lookup(feature, k).is_none()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::matches;
    use features::{Feature, Geometry};
    use serde_json::json;

    fn vertex() -> Feature {
        Feature::new(Geometry::Point([0.0, 0.0]))
            .with_property("meta", "vertex")
            .with_property("mode", "draw_polygon")
            .with_property("active", "false")
    }

    #[test]
    fn all_of_comparisons() {
        let f = json!(["all", ["==", "meta", "vertex"], ["==", "$type", "Point"], ["!=", "mode", "static"]]);
        assert!(matches(&f, &vertex()));
        let static_vertex = vertex().with_property("mode", "static");
        assert!(!matches(&f, &static_vertex));
    }

    #[test]
    fn membership_and_presence() {
        assert!(matches(&json!(["in", "meta", "midpoint", "vertex"]), &vertex()));
        assert!(matches(&json!(["!in", "meta", "feature"]), &vertex()));
        assert!(matches(&json!(["has", "active"]), &vertex()));
        assert!(matches(&json!(["!has", "parent"]), &vertex()));
    }

    #[test]
    fn multi_geometries_fold_into_single_type() {
        let f = Feature::new(Geometry::MultiPolygon(vec![]));
        assert!(matches(&json!(["==", "$type", "Polygon"]), &f));
    }

    #[test]
    fn unknown_operator_matches_nothing() {
        assert!(!matches(&json!(["within", "x"]), &vertex()));
    }
}
