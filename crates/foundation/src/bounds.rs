/// Axis-aligned lon/lat box.
///
/// Edges are inclusive: a point lying exactly on `min` or `max` is inside.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Builds a box from the `[minX, minY, maxX, maxY]` layout hosts use.
    pub fn from_extent(extent: [f64; 4]) -> Self {
        let [min_x, min_y, max_x, max_y] = extent;
        Aabb2 {
            min: [min_x, min_y],
            max: [max_x, max_y],
        }
    }

    pub fn extent(&self) -> [f64; 4] {
        [self.min[0], self.min[1], self.max[0], self.max[1]]
    }

    pub fn contains(&self, point: [f64; 2]) -> bool {
        point[0] >= self.min[0]
            && point[0] <= self.max[0]
            && point[1] >= self.min[1]
            && point[1] <= self.max[1]
    }

    /// Smallest box covering every point, or `None` for an empty input.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f64; 2]>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut out = Aabb2::new(first, first);
        for p in iter {
            out.min[0] = out.min[0].min(p[0]);
            out.min[1] = out.min[1].min(p[1]);
            out.max[0] = out.max[0].max(p[0]);
            out.max[1] = out.max[1].max(p[1]);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;

    #[test]
    fn contains_is_edge_inclusive() {
        let b = Aabb2::from_extent([-10.0, -5.0, 10.0, 5.0]);
        assert!(b.contains([0.0, 0.0]));
        assert!(b.contains([-10.0, 5.0]));
        assert!(!b.contains([10.1, 0.0]));
        assert!(!b.contains([0.0, -5.1]));
        assert_eq!(b.extent(), [-10.0, -5.0, 10.0, 5.0]);
    }

    #[test]
    fn from_points_covers_all() {
        let pts = [[1.0, 2.0], [-3.0, 4.0], [2.0, -1.0]];
        let b = Aabb2::from_points(pts.iter()).expect("non-empty");
        assert_eq!(b.min, [-3.0, -1.0]);
        assert_eq!(b.max, [2.0, 4.0]);
        assert!(Aabb2::from_points(std::iter::empty()).is_none());
    }
}
