use features::{Feature, Geometry};
use geo::ChamberlainDuquetteArea;
use tracing::warn;

use crate::PolicyError;
use crate::convert::{multi_polygon, polygon};

pub const SQUARE_METERS_PER_ACRE: f64 = 4_046.856_422_4;

/// Spherical area of `geometry` in acres. Non-areal geometry measures zero.
pub fn area_acres(geometry: &Geometry) -> Result<f64, PolicyError> {
    let square_meters = match geometry {
        Geometry::Polygon(rings) => polygon(rings)?.chamberlain_duquette_unsigned_area(),
        Geometry::MultiPolygon(polys) => multi_polygon(polys)?.chamberlain_duquette_unsigned_area(),
        _ => 0.0,
    };
    if !square_meters.is_finite() {
        return Err(PolicyError::NonFiniteCoordinate);
    }
    Ok(square_meters / SQUARE_METERS_PER_ACRE)
}

/// Whether the summed area of all non-point features exceeds `max_acres`.
///
/// An unset, zero or negative limit disables the check. A computation
/// failure counts as too large.
pub fn is_area_too_large(features: &[Feature], max_acres: Option<f64>) -> bool {
    let Some(max_acres) = max_acres.filter(|m| *m > 0.0) else {
        return false;
    };

    let measured: Vec<&Feature> = features.iter().filter(|f| !f.geometry.is_point()).collect();
    if measured.is_empty() {
        return false;
    }

    let total: Result<f64, PolicyError> = measured
        .iter()
        .try_fold(0.0, |acc, f| Ok(acc + area_acres(&f.geometry)?));

    match total {
        Ok(total) => total > max_acres,
        Err(err) => {
            warn!("area check failed closed: {err}");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{area_acres, is_area_too_large};
    use features::{Feature, Geometry};

    // Roughly 0.01 x 0.01 degrees at the equator: ~1.236 km^2, ~305 acres.
    fn small_square() -> Feature {
        Feature::new(Geometry::Polygon(vec![vec![
            [0.0, 0.0],
            [0.01, 0.0],
            [0.01, 0.01],
            [0.0, 0.01],
            [0.0, 0.0],
        ]]))
    }

    #[test]
    fn measures_in_acres() {
        let acres = area_acres(&small_square().geometry).expect("area");
        assert!(acres > 300.0 && acres < 310.0, "got {acres}");
        assert_eq!(area_acres(&Geometry::Point([1.0, 1.0])).expect("point"), 0.0);
    }

    #[test]
    fn unset_or_empty_is_never_too_large() {
        assert!(!is_area_too_large(&[], Some(10.0)));
        assert!(!is_area_too_large(&[small_square()], None));
        assert!(!is_area_too_large(&[small_square()], Some(0.0)));
    }

    #[test]
    fn points_are_ignored() {
        let pts = vec![Feature::new(Geometry::Point([0.0, 0.0]))];
        assert!(!is_area_too_large(&pts, Some(1.0)));
    }

    #[test]
    fn compares_total_against_limit() {
        let two = vec![small_square(), small_square()];
        assert!(!is_area_too_large(&two, Some(1_000.0)));
        assert!(is_area_too_large(&two, Some(500.0)));
    }

    #[test]
    fn fails_closed_on_bad_coordinates() {
        let bad = Feature::new(Geometry::Polygon(vec![vec![
            [0.0, 0.0],
            [f64::NAN, 0.0],
            [1.0, 1.0],
            [0.0, 0.0],
        ]]));
        assert!(is_area_too_large(&[bad], Some(1.0e12)));
    }
}
