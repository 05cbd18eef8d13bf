use features::Feature;
use foundation::Aabb2;

use crate::{features_have_kinks, is_area_too_large, is_outside_area};

/// Thresholds a session applies to candidate geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyLimits {
    pub max_area_acres: Option<f64>,
    pub allowed_area: Option<Aabb2>,
    pub allow_kinks: bool,
}

/// Which checks a batch of features failed.
///
/// `has_no_coords` is `None` when the check did not apply to the batch.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PolicyReport {
    pub has_kinks: bool,
    pub too_big: bool,
    pub is_outside: bool,
    pub has_no_coords: Option<bool>,
}

impl PolicyReport {
    pub fn passed(&self) -> bool {
        !(self.has_kinks || self.too_big || self.is_outside || self.has_no_coords == Some(true))
    }
}

impl PolicyLimits {
    /// Checks for newly drawn features.
    ///
    /// The coordinate check only reports when a feature is entirely empty.
    pub fn check_created(&self, features: &[Feature]) -> PolicyReport {
        let empty = features.iter().any(|f| f.geometry.position_count() == 0);
        PolicyReport {
            has_no_coords: empty.then_some(true),
            ..self.check_common(features)
        }
    }

    /// Checks for edited features. Anything that is not a polygon with at
    /// least one ring counts as having no coordinates.
    pub fn check_updated(&self, features: &[Feature]) -> PolicyReport {
        PolicyReport {
            has_no_coords: Some(has_no_coords(features)),
            ..self.check_common(features)
        }
    }

    fn check_common(&self, features: &[Feature]) -> PolicyReport {
        PolicyReport {
            has_kinks: !self.allow_kinks && features_have_kinks(features),
            too_big: is_area_too_large(features, self.max_area_acres),
            is_outside: features
                .iter()
                .any(|f| is_outside_area(&f.geometry, self.allowed_area.as_ref())),
            has_no_coords: None,
        }
    }
}

pub fn has_no_coords(features: &[Feature]) -> bool {
    features.iter().any(|f| match &f.geometry {
        features::Geometry::Polygon(rings) => rings.is_empty(),
        features::Geometry::MultiPolygon(polys) => polys.is_empty(),
        _ => true,
    })
}
