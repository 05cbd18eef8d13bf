use features::{Feature, Geometry, Position};
use geo::Line;
use geo::algorithm::line_intersection::{LineIntersection, line_intersection};

use crate::convert::coord;

/// Self-intersection points of `geometry`.
///
/// Lines within one group (the rings of a polygon, the parts of a
/// multi-line) are tested against each other. Adjacent segments and the
/// closing pair of a closed ring share a vertex by construction and are not
/// kinks. Consecutive repeated vertices are collapsed first and collinear
/// overlaps are ignored. Points never kink.
pub fn geometry_kinks(geometry: &Geometry) -> Vec<Position> {
    let mut out = Vec::new();
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
        Geometry::LineString(line) => group_kinks(&[line.as_slice()], &mut out),
        Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
            let group: Vec<&[Position]> = lines.iter().map(Vec::as_slice).collect();
            group_kinks(&group, &mut out);
        }
        Geometry::MultiPolygon(polys) => {
            for rings in polys {
                let group: Vec<&[Position]> = rings.iter().map(Vec::as_slice).collect();
                group_kinks(&group, &mut out);
            }
        }
    }
    out
}

/// Whether a single feature self-intersects, whatever its geometry type.
pub fn feature_has_kinks(feature: &Feature) -> bool {
    !geometry_kinks(&feature.geometry).is_empty()
}

/// Whether any polygon or multipolygon in `features` self-intersects.
pub fn features_have_kinks(features: &[Feature]) -> bool {
    features
        .iter()
        .filter(|f| f.geometry.is_areal())
        .any(feature_has_kinks)
}

fn group_kinks(group: &[&[Position]], out: &mut Vec<Position>) {
    let group: Vec<Vec<Position>> = group
        .iter()
        .map(|line| {
            let mut line = line.to_vec();
            line.dedup();
            line
        })
        .collect();

    for (a, first) in group.iter().enumerate() {
        for (b, second) in group.iter().enumerate().skip(a) {
            let same = a == b;
            let closed = first.len() > 2 && first.first() == first.last();

            for i in 0..first.len().saturating_sub(1) {
                let Some(s1) = segment(first, i) else {
                    continue;
                };
                let start = if same { i + 1 } else { 0 };
                for k in start..second.len().saturating_sub(1) {
                    if same && (k == i + 1 || (closed && i == 0 && k == first.len() - 2)) {
                        continue;
                    }
                    let Some(s2) = segment(second, k) else {
                        continue;
                    };
                    if let Some(LineIntersection::SinglePoint { intersection, .. }) =
                        line_intersection(s1, s2)
                    {
                        out.push([intersection.x, intersection.y]);
                    }
                }
            }
        }
    }
}

fn segment(line: &[Position], i: usize) -> Option<Line<f64>> {
    let start = coord(line.get(i)?).ok()?;
    let end = coord(line.get(i + 1)?).ok()?;
    if start == end {
        return None;
    }
    Some(Line::new(start, end))
}
