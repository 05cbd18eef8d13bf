use features::{Feature, FeatureId, Geometry, GeometryKind, Position};
use serde_json::{Map, Value};

use crate::path::CoordPath;

/// Editable geometry. Polygon rings are held open while editing; the closing
/// vertex is added back by [`Shape::to_geometry`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Option<Position>),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
    Multi(GeometryKind, Vec<Shape>),
}

fn open_ring(ring: &[Position]) -> Vec<Position> {
    let mut ring = ring.to_vec();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

fn close_ring(ring: &[Position]) -> Vec<Position> {
    let mut ring = ring.to_vec();
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }
    ring
}

fn set_at(list: &mut Vec<Position>, index: usize, position: Position) -> bool {
    match index.cmp(&list.len()) {
        std::cmp::Ordering::Less => {
            list[index] = position;
            true
        }
        std::cmp::Ordering::Equal => {
            list.push(position);
            true
        }
        std::cmp::Ordering::Greater => false,
    }
}

impl Shape {
    pub fn from_geometry(geometry: &Geometry) -> Shape {
        match geometry {
            Geometry::Point(p) => Shape::Point(Some(*p)),
            Geometry::LineString(ps) => Shape::LineString(ps.clone()),
            Geometry::Polygon(rings) => Shape::Polygon(rings.iter().map(|r| open_ring(r)).collect()),
            Geometry::MultiPoint(ps) => Shape::Multi(
                GeometryKind::MultiPoint,
                ps.iter().map(|p| Shape::Point(Some(*p))).collect(),
            ),
            Geometry::MultiLineString(lines) => Shape::Multi(
                GeometryKind::MultiLineString,
                lines.iter().map(|l| Shape::LineString(l.clone())).collect(),
            ),
            Geometry::MultiPolygon(polys) => Shape::Multi(
                GeometryKind::MultiPolygon,
                polys
                    .iter()
                    .map(|rings| Shape::Polygon(rings.iter().map(|r| open_ring(r)).collect()))
                    .collect(),
            ),
        }
    }

    pub fn to_geometry(&self) -> Geometry {
        match self {
            // An unplaced point has nowhere to be; report the origin.
            Shape::Point(p) => Geometry::Point(p.unwrap_or_default()),
            Shape::LineString(ps) => Geometry::LineString(ps.clone()),
            Shape::Polygon(rings) => Geometry::Polygon(rings.iter().map(|r| close_ring(r)).collect()),
            Shape::Multi(kind, parts) => match kind {
                GeometryKind::MultiPoint => Geometry::MultiPoint(
                    parts
                        .iter()
                        .filter_map(|p| match p {
                            Shape::Point(p) => *p,
                            _ => None,
                        })
                        .collect(),
                ),
                GeometryKind::MultiLineString => Geometry::MultiLineString(
                    parts
                        .iter()
                        .filter_map(|p| match p {
                            Shape::LineString(ps) => Some(ps.clone()),
                            _ => None,
                        })
                        .collect(),
                ),
                _ => Geometry::MultiPolygon(
                    parts
                        .iter()
                        .filter_map(|p| match p {
                            Shape::Polygon(rings) => {
                                Some(rings.iter().map(|r| close_ring(r)).collect())
                            }
                            _ => None,
                        })
                        .collect(),
                ),
            },
        }
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Shape::Point(_) => GeometryKind::Point,
            Shape::LineString(_) => GeometryKind::LineString,
            Shape::Polygon(_) => GeometryKind::Polygon,
            Shape::Multi(kind, _) => *kind,
        }
    }

    /// A polygon needs at least one ring and every ring more than two
    /// vertices; a line needs two vertices.
    pub fn is_valid(&self) -> bool {
        match self {
            Shape::Point(p) => p.is_some(),
            Shape::LineString(ps) => ps.len() > 1,
            Shape::Polygon(rings) => !rings.is_empty() && rings.iter().all(|r| r.len() > 2),
            Shape::Multi(_, parts) => !parts.is_empty() && parts.iter().all(Shape::is_valid),
        }
    }

    pub fn coordinate(&self, path: &[usize]) -> Option<Position> {
        match (self, path) {
            (Shape::Point(p), []) | (Shape::Point(p), [0]) => *p,
            (Shape::LineString(ps), [i]) => ps.get(*i).copied(),
            (Shape::Polygon(rings), [r, i]) => rings.get(*r)?.get(*i).copied(),
            (Shape::Multi(_, parts), [part, rest @ ..]) => parts.get(*part)?.coordinate(rest),
            _ => None,
        }
    }

    /// Sets the vertex at `path`, appending when the index is one past the
    /// end (a ring one past the last ring is created). Returns false when the
    /// path does not address this shape.
    pub fn update_coordinate(&mut self, path: &[usize], position: Position) -> bool {
        match (self, path) {
            (Shape::Point(p), []) | (Shape::Point(p), [0]) => {
                *p = Some(position);
                true
            }
            (Shape::LineString(ps), [i]) => set_at(ps, *i, position),
            (Shape::Polygon(rings), [r, i]) => {
                if *r == rings.len() {
                    rings.push(Vec::new());
                }
                match rings.get_mut(*r) {
                    Some(ring) => set_at(ring, *i, position),
                    None => false,
                }
            }
            (Shape::Multi(_, parts), [part, rest @ ..]) => parts
                .get_mut(*part)
                .is_some_and(|p| p.update_coordinate(rest, position)),
            _ => false,
        }
    }

    /// Inserts a vertex before the one at `path`.
    pub fn add_coordinate(&mut self, path: &[usize], position: Position) -> bool {
        fn insert(list: &mut Vec<Position>, i: usize, position: Position) -> bool {
            if i > list.len() {
                return false;
            }
            list.insert(i, position);
            true
        }
        match (self, path) {
            (Shape::LineString(ps), [i]) => insert(ps, *i, position),
            (Shape::Polygon(rings), [r, i]) => rings.get_mut(*r).is_some_and(|ring| insert(ring, *i, position)),
            (Shape::Multi(_, parts), [part, rest @ ..]) => parts
                .get_mut(*part)
                .is_some_and(|p| p.add_coordinate(rest, position)),
            _ => false,
        }
    }

    pub fn remove_coordinate(&mut self, path: &[usize]) -> bool {
        fn remove(list: &mut Vec<Position>, i: usize) -> bool {
            if i >= list.len() {
                return false;
            }
            list.remove(i);
            true
        }
        match (self, path) {
            (Shape::Point(p), []) | (Shape::Point(p), [0]) => p.take().is_some(),
            (Shape::LineString(ps), [i]) => remove(ps, *i),
            (Shape::Polygon(rings), [r, i]) => rings.get_mut(*r).is_some_and(|ring| remove(ring, *i)),
            (Shape::Multi(_, parts), [part, rest @ ..]) => parts
                .get_mut(*part)
                .is_some_and(|p| p.remove_coordinate(rest)),
            _ => false,
        }
    }

    pub fn translate(&mut self, delta: Position) {
        let shift = |p: &mut Position| {
            p[0] += delta[0];
            p[1] += delta[1];
        };
        match self {
            Shape::Point(p) => {
                if let Some(p) = p.as_mut() {
                    shift(p);
                }
            }
            Shape::LineString(ps) => ps.iter_mut().for_each(shift),
            Shape::Polygon(rings) => rings.iter_mut().flatten().for_each(shift),
            Shape::Multi(_, parts) => parts.iter_mut().for_each(|p| p.translate(delta)),
        }
    }

    /// Every vertex with its path, in document order.
    pub fn vertices(&self) -> Vec<(CoordPath, Position)> {
        let mut out = Vec::new();
        self.collect_vertices(&mut Vec::new(), &mut out);
        out
    }

    fn collect_vertices(&self, prefix: &mut Vec<usize>, out: &mut Vec<(CoordPath, Position)>) {
        let path_with = |prefix: &Vec<usize>, tail: &[usize]| {
            let mut parts = prefix.clone();
            parts.extend_from_slice(tail);
            CoordPath::new(parts)
        };
        match self {
            Shape::Point(p) => {
                if let Some(p) = p {
                    out.push((path_with(prefix, &[]), *p));
                }
            }
            Shape::LineString(ps) => {
                for (i, p) in ps.iter().enumerate() {
                    out.push((path_with(prefix, &[i]), *p));
                }
            }
            Shape::Polygon(rings) => {
                for (r, ring) in rings.iter().enumerate() {
                    for (i, p) in ring.iter().enumerate() {
                        out.push((path_with(prefix, &[r, i]), *p));
                    }
                }
            }
            Shape::Multi(_, parts) => {
                for (i, part) in parts.iter().enumerate() {
                    prefix.push(i);
                    part.collect_vertices(prefix, out);
                    prefix.pop();
                }
            }
        }
    }

    /// Edge midpoints as `(insert_path, position)`; inserting at
    /// `insert_path` splits the edge. Polygon rings include the closing edge.
    pub fn midpoints(&self) -> Vec<(CoordPath, Position)> {
        let mut out = Vec::new();
        self.collect_midpoints(&mut Vec::new(), &mut out);
        out
    }

    fn collect_midpoints(&self, prefix: &mut Vec<usize>, out: &mut Vec<(CoordPath, Position)>) {
        let mid = |a: Position, b: Position| [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0];
        let mut push = |tail: &[usize], p: Position| {
            let mut parts = prefix.clone();
            parts.extend_from_slice(tail);
            out.push((CoordPath::new(parts), p));
        };
        match self {
            Shape::Point(_) => {}
            Shape::LineString(ps) => {
                for i in 1..ps.len() {
                    push(&[i], mid(ps[i - 1], ps[i]));
                }
            }
            Shape::Polygon(rings) => {
                for (r, ring) in rings.iter().enumerate() {
                    if ring.len() < 2 {
                        continue;
                    }
                    for i in 1..ring.len() {
                        push(&[r, i], mid(ring[i - 1], ring[i]));
                    }
                    if ring.len() > 2 {
                        push(&[r, ring.len()], mid(ring[ring.len() - 1], ring[0]));
                    }
                }
            }
            Shape::Multi(_, parts) => {
                for (i, part) in parts.iter().enumerate() {
                    prefix.push(i);
                    part.collect_midpoints(prefix, out);
                    prefix.pop();
                }
            }
        }
    }
}

/// Feature as held by the draw tool while it is being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawFeature {
    pub id: FeatureId,
    pub properties: Map<String, Value>,
    pub shape: Shape,
}

impl DrawFeature {
    pub fn new(id: FeatureId, shape: Shape) -> Self {
        Self {
            id,
            properties: Map::new(),
            shape,
        }
    }

    /// Empty polygon with a single open ring, the starting point of every
    /// drawing mode.
    pub fn empty_polygon() -> Self {
        Self::new(FeatureId::generate(), Shape::Polygon(vec![Vec::new()]))
    }

    /// Takes the feature's id, generating one when absent.
    pub fn from_feature(feature: Feature) -> Self {
        Self {
            id: feature.id.unwrap_or_else(FeatureId::generate),
            properties: feature.properties,
            shape: Shape::from_geometry(&feature.geometry),
        }
    }

    pub fn to_feature(&self) -> Feature {
        Feature {
            id: Some(self.id.clone()),
            properties: self.properties.clone(),
            geometry: self.shape.to_geometry(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.shape.is_valid()
    }

    pub fn coordinate(&self, path: &CoordPath) -> Option<Position> {
        self.shape.coordinate(path.parts())
    }

    pub fn update_coordinate(&mut self, path: &CoordPath, position: Position) -> bool {
        self.shape.update_coordinate(path.parts(), position)
    }

    pub fn add_coordinate(&mut self, path: &CoordPath, position: Position) -> bool {
        self.shape.add_coordinate(path.parts(), position)
    }

    pub fn remove_coordinate(&mut self, path: &CoordPath) -> bool {
        self.shape.remove_coordinate(path.parts())
    }

    /// Replaces a polygon's rings wholesale. Incoming rings may be closed.
    pub fn set_polygon_rings(&mut self, rings: &[Vec<Position>]) {
        self.shape = Shape::Polygon(rings.iter().map(|r| open_ring(r)).collect());
    }

    pub fn set_property(&mut self, key: &str, value: Value) {
        self.properties.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawFeature, Shape};
    use crate::path::CoordPath;
    use features::{Feature, Geometry};
    use pretty_assertions::assert_eq;

    fn square() -> Geometry {
        Geometry::Polygon(vec![vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [0.0, 0.0],
        ]])
    }

    #[test]
    fn polygon_rings_open_on_import_and_close_on_export() {
        let shape = Shape::from_geometry(&square());
        match &shape {
            Shape::Polygon(rings) => assert_eq!(rings[0].len(), 4),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(shape.to_geometry(), square());
    }

    #[test]
    fn update_appends_one_past_the_end_only() {
        let mut f = DrawFeature::empty_polygon();
        assert!(f.update_coordinate(&CoordPath::ring(0, 0), [1.0, 1.0]));
        assert!(f.update_coordinate(&CoordPath::ring(0, 1), [2.0, 2.0]));
        assert!(!f.update_coordinate(&CoordPath::ring(0, 5), [3.0, 3.0]));
        assert!(f.update_coordinate(&CoordPath::ring(0, 0), [0.5, 0.5]));
        assert_eq!(f.coordinate(&CoordPath::ring(0, 0)), Some([0.5, 0.5]));
        assert!(!f.is_valid());
        assert!(f.update_coordinate(&CoordPath::ring(0, 2), [3.0, 0.0]));
        assert!(f.is_valid());
    }

    #[test]
    fn add_and_remove_shift_following_vertices() {
        let mut f = DrawFeature::from_feature(Feature::new(square()).with_id("a"));
        assert!(f.add_coordinate(&CoordPath::ring(0, 1), [0.5, 0.0]));
        assert_eq!(f.coordinate(&CoordPath::ring(0, 2)), Some([1.0, 0.0]));
        assert!(f.remove_coordinate(&CoordPath::ring(0, 1)));
        assert_eq!(f.to_feature().geometry, square());
    }

    #[test]
    fn midpoints_cover_the_closing_edge() {
        let shape = Shape::from_geometry(&square());
        let mids = shape.midpoints();
        assert_eq!(mids.len(), 4);
        assert_eq!(mids[3], (CoordPath::ring(0, 4), [0.0, 0.5]));
        assert_eq!(shape.vertices().len(), 4);
    }

    #[test]
    fn translate_moves_every_vertex() {
        let mut shape = Shape::from_geometry(&square());
        shape.translate([1.0, 2.0]);
        assert_eq!(shape.coordinate(&[0, 2]), Some([2.0, 3.0]));
    }

    #[test]
    fn missing_id_is_generated() {
        let f = DrawFeature::from_feature(Feature::new(Geometry::Point([1.0, 2.0])));
        assert!(!f.id.as_str().is_empty());
        assert!(f.is_valid());
    }
}
