//! Conversions between the crate geometries and [`geojson`] types.
//!
//! Renderers receive geometries as GeoJSON, and programmatically provided polygons come as GeoJSON too. Positions are
//! `[longitude, latitude]`; extra dimensions are ignored.

use geojson::{GeoJson, Geometry, PolygonType, Position, Value};

use crate::cartesian::Rect;
use crate::error::GeometryError;
use crate::geo::{GeoPoint, GeoPoint2d};
use crate::impls::{ClosedContour, Polygon};
use crate::ring::Ring;

impl TryFrom<&Position> for GeoPoint2d {
    type Error = GeometryError;

    fn try_from(value: &Position) -> Result<Self, Self::Error> {
        if value.len() < 2 {
            return Err(GeometryError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            ));
        }

        Ok(crate::lonlat!(value[0], value[1]))
    }
}

/// GeoJSON position of the point.
pub fn position(point: &GeoPoint2d) -> Position {
    vec![point.lon(), point.lat()]
}

/// Line string geometry going through the given points.
pub fn line_string<'a>(points: impl IntoIterator<Item = &'a GeoPoint2d>) -> Geometry {
    Geometry::new(Value::LineString(
        points.into_iter().map(position).collect(),
    ))
}

/// Single ring polygon geometry.
pub fn ring_polygon(ring: &Ring<GeoPoint2d>) -> Geometry {
    Geometry::new(Value::Polygon(vec![ring
        .points()
        .iter()
        .map(position)
        .collect()]))
}

/// GeoJSON rings of the polygon, each ring explicitly closed.
pub fn polygon_rings(polygon: &Polygon<GeoPoint2d>) -> PolygonType {
    std::iter::once(&polygon.outer_contour)
        .chain(polygon.inner_contours.iter())
        .map(closed_positions)
        .collect()
}

/// Polygon geometry if there is only one part, multipolygon geometry otherwise.
pub fn multi_polygon(parts: &[Polygon<GeoPoint2d>]) -> Geometry {
    match parts {
        [single] => Geometry::new(Value::Polygon(polygon_rings(single))),
        _ => Geometry::new(Value::MultiPolygon(
            parts.iter().map(polygon_rings).collect(),
        )),
    }
}

/// Reads polygons from a `Polygon` or `MultiPolygon` geometry.
pub fn polygons_from_geometry(
    geometry: &Geometry,
) -> Result<Vec<Polygon<GeoPoint2d>>, GeometryError> {
    match &geometry.value {
        Value::Polygon(polygon) => Ok(vec![convert_polygon(polygon)?]),
        Value::MultiPolygon(parts) => parts.iter().map(convert_polygon).collect(),
        other => Err(GeometryError::Conversion(format!(
            "expected a polygon, got {}",
            type_name(other)
        ))),
    }
}

/// Position of a `Point` geometry. Other geometry types have no single position.
pub fn point_of_geometry(geometry: &Geometry) -> Option<GeoPoint2d> {
    match &geometry.value {
        Value::Point(position) => GeoPoint2d::try_from(position).ok(),
        _ => None,
    }
}

/// Bounding rectangle of a geometry, a feature or the first feature of a collection.
///
/// Returns `None` if there is nothing to measure.
pub fn bounding_rect(geojson: &GeoJson) -> Option<Rect> {
    let geometry = match geojson {
        GeoJson::Geometry(geometry) => geometry,
        GeoJson::Feature(feature) => feature.geometry.as_ref()?,
        GeoJson::FeatureCollection(collection) => {
            collection.features.first()?.geometry.as_ref()?
        }
    };

    let mut positions = vec![];
    collect_positions(&geometry.value, &mut positions);
    let points = positions
        .into_iter()
        .filter_map(|p| GeoPoint2d::try_from(p).ok())
        .collect::<Vec<_>>();
    Rect::from_points(points.iter())
}

fn collect_positions<'a>(value: &'a Value, positions: &mut Vec<&'a Position>) {
    match value {
        Value::Point(p) => positions.push(p),
        Value::MultiPoint(points) | Value::LineString(points) => positions.extend(points.iter()),
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            positions.extend(lines.iter().flatten())
        }
        Value::MultiPolygon(polygons) => positions.extend(polygons.iter().flatten().flatten()),
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_positions(&geometry.value, positions);
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn closed_positions(contour: &ClosedContour<GeoPoint2d>) -> Vec<Position> {
    contour
        .points
        .iter()
        .chain(contour.points.first())
        .map(position)
        .collect()
}

fn convert_contour(ring: &[Position]) -> Result<ClosedContour<GeoPoint2d>, GeometryError> {
    let mut points = ring
        .iter()
        .map(GeoPoint2d::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    if points.len() < 3 {
        return Err(GeometryError::InvalidRing(points.len() + 1));
    }

    Ok(ClosedContour::new(points))
}

fn convert_polygon(polygon: &PolygonType) -> Result<Polygon<GeoPoint2d>, GeometryError> {
    let Some((outer, inner)) = polygon.split_first() else {
        return Err(GeometryError::Conversion(
            "polygon must have an outer ring".to_string(),
        ));
    };

    Ok(Polygon::with_holes(
        convert_contour(outer)?,
        inner
            .iter()
            .map(|ring| convert_contour(ring))
            .collect::<Result<Vec<_>, _>>()?,
    ))
}
