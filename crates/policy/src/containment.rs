use features::{Geometry, Position};
use foundation::Aabb2;
use geo::Centroid;
use tracing::warn;

use crate::PolicyError;
use crate::convert::to_geo;

pub fn centroid(geometry: &Geometry) -> Result<Position, PolicyError> {
    let point = to_geo(geometry)?
        .centroid()
        .ok_or(PolicyError::EmptyGeometry)?;
    Ok([point.x(), point.y()])
}

/// Whether the centroid of `geometry` falls outside `area`.
///
/// No area means everywhere is allowed. A centroid that cannot be computed
/// counts as outside.
pub fn is_outside_area(geometry: &Geometry, area: Option<&Aabb2>) -> bool {
    let Some(area) = area else {
        return false;
    };
    match centroid(geometry) {
        Ok(c) => !area.contains(c),
        Err(err) => {
            warn!("containment check failed closed: {err}");
            true
        }
    }
}
