use features::{Geometry, Position};
use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::PolicyError;

pub(crate) fn coord(p: &Position) -> Result<Coord<f64>, PolicyError> {
    if !p[0].is_finite() || !p[1].is_finite() {
        return Err(PolicyError::NonFiniteCoordinate);
    }
    Ok(Coord { x: p[0], y: p[1] })
}

pub(crate) fn line_string(points: &[Position]) -> Result<LineString<f64>, PolicyError> {
    points
        .iter()
        .map(coord)
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

pub(crate) fn polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>, PolicyError> {
    let Some((exterior, interiors)) = rings.split_first() else {
        return Ok(Polygon::new(LineString::new(Vec::new()), Vec::new()));
    };
    let interiors = interiors
        .iter()
        .map(|r| line_string(r))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(line_string(exterior)?, interiors))
}

pub(crate) fn multi_polygon(polys: &[Vec<Vec<Position>>]) -> Result<MultiPolygon<f64>, PolicyError> {
    polys
        .iter()
        .map(|p| polygon(p))
        .collect::<Result<Vec<_>, _>>()
        .map(MultiPolygon::new)
}

pub(crate) fn to_geo(geometry: &Geometry) -> Result<geo::Geometry<f64>, PolicyError> {
    Ok(match geometry {
        Geometry::Point(p) => geo::Geometry::Point(coord(p)?.into()),
        Geometry::MultiPoint(ps) => geo::Geometry::MultiPoint(
            ps.iter()
                .map(|p| coord(p).map(geo::Point::from))
                .collect::<Result<Vec<_>, _>>()?
                .into(),
        ),
        Geometry::LineString(ps) => geo::Geometry::LineString(line_string(ps)?),
        Geometry::MultiLineString(lines) => geo::Geometry::MultiLineString(geo::MultiLineString::new(
            lines
                .iter()
                .map(|l| line_string(l))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Geometry::Polygon(rings) => geo::Geometry::Polygon(polygon(rings)?),
        Geometry::MultiPolygon(polys) => geo::Geometry::MultiPolygon(multi_polygon(polys)?),
    })
}
