//! Great-circle helpers on a spherical earth.
//!
//! Positions are `[lon_deg, lat_deg]`, the order GeoJSON uses.

/// Mean earth radius (meters).
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Number of vertices used to approximate a circle.
pub const CIRCLE_STEPS: usize = 64;

/// Haversine distance between two positions, in meters.
pub fn haversine_distance_m(from: [f64; 2], to: [f64; 2]) -> f64 {
    let lat1 = from[1].to_radians();
    let lat2 = to[1].to_radians();
    let d_lat = (to[1] - from[1]).to_radians();
    let d_lon = (to[0] - from[0]).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn haversine_distance_km(from: [f64; 2], to: [f64; 2]) -> f64 {
    haversine_distance_m(from, to) / 1000.0
}

/// Position reached by travelling `distance_m` from `origin` on the initial
/// `bearing_deg` (clockwise from north).
pub fn destination(origin: [f64; 2], distance_m: f64, bearing_deg: f64) -> [f64; 2] {
    let lon1 = origin[0].to_radians();
    let lat1 = origin[1].to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_m / MEAN_EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    [lon2.to_degrees(), lat2.to_degrees()]
}

/// Closed ring approximating a circle of `radius_km` around `center`.
///
/// Vertices run counter-clockwise starting due north; the first vertex is
/// repeated at the end.
pub fn circle_ring(center: [f64; 2], radius_km: f64, steps: usize) -> Vec<[f64; 2]> {
    let steps = steps.max(3);
    let mut ring = Vec::with_capacity(steps + 1);
    for i in 0..steps {
        let bearing = (i as f64) * -360.0 / steps as f64;
        ring.push(destination(center, radius_km * 1000.0, bearing));
    }
    ring.push(ring[0]);
    ring
}
