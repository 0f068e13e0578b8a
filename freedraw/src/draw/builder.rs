use freedraw_types::cartesian::{CartesianPoint2d, Rect};
use freedraw_types::geo::GeoPoint2d;
use freedraw_types::impls::{MultiPolygon, Polygon};
use freedraw_types::repair::{clean_ring, dedup_points, unkink};
use freedraw_types::ring::Ring;

use crate::error::FreeDrawError;

/// Collects the points of a freehand line and turns it into a polygon.
///
/// The builder holds the points of one drawing session. Call [`GeometryBuilder::reset`] before starting a new
/// session.
#[derive(Debug, Default, Clone)]
pub struct GeometryBuilder {
    points: Vec<GeoPoint2d>,
}

/// The line drawn so far, used to render the live preview.
#[derive(Debug, Copy, Clone)]
pub struct LinePreview<'a> {
    points: &'a [GeoPoint2d],
}

impl<'a> LinePreview<'a> {
    /// Points of the line.
    pub fn points(&self) -> &'a [GeoPoint2d] {
        self.points
    }

    /// GeoJSON line string of the line.
    pub fn to_geometry(&self) -> geojson::Geometry {
        freedraw_types::geojson::line_string(self.points)
    }
}

impl GeometryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all the collected points.
    pub fn reset(&mut self) {
        self.points.clear();
    }

    /// Points collected so far.
    pub fn points(&self) -> &[GeoPoint2d] {
        &self.points
    }

    /// Number of collected points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no points were collected.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Adds a point to the line. Returns the line preview once the line has at least 2 points.
    ///
    /// Points with non-finite coordinates are ignored.
    pub fn add_point(&mut self, point: GeoPoint2d) -> Option<LinePreview<'_>> {
        if !point.is_finite() {
            log::trace!("Ignoring non-finite point {point:?}");
            return None;
        }

        self.points.push(point);
        log::trace!("Added point {point:?}, line has {} points", self.points.len());

        self.preview()
    }

    /// The line drawn so far, if it has at least 2 points.
    pub fn preview(&self) -> Option<LinePreview<'_>> {
        (self.points.len() >= 2).then_some(LinePreview {
            points: &self.points,
        })
    }

    /// Closes the line into a polygon and repairs its self-intersections.
    ///
    /// Returns [`FreeDrawError::DegenerateGeometry`] if the line does not enclose any area: it has less than 3
    /// distinct points, or all of its points lie on one line. If the repair fails, the closed line is used as is.
    pub fn finalize(&self) -> Result<DrawnPolygon, FreeDrawError> {
        let distinct = dedup_points(&self.points);
        if distinct.len() < 3 {
            return Err(FreeDrawError::DegenerateGeometry {
                points: distinct.len(),
            });
        }

        let ring = Ring::close(distinct)?;
        let vertices = clean_ring(&ring);
        if vertices.len() < 3 {
            return Err(FreeDrawError::DegenerateGeometry {
                points: vertices.len(),
            });
        }

        let ring = Ring::close(vertices)?;
        Ok(DrawnPolygon::repair(ring))
    }
}

/// Result of the self-intersection repair of a drawn polygon.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// The drawn line did not cross itself.
    Simple,
    /// The drawn line crossed itself and was split into several parts.
    Repaired {
        /// Number of parts.
        parts: usize,
    },
    /// The repair failed and the polygon consists of the closed drawn line as is.
    Fallback,
}

/// A finished polygon drawn by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnPolygon {
    ring: Ring<GeoPoint2d>,
    parts: MultiPolygon<GeoPoint2d>,
    repair: RepairOutcome,
    drawn: bool,
}

impl DrawnPolygon {
    fn repair(ring: Ring<GeoPoint2d>) -> Self {
        let (parts, repair) = match unkink(ring.vertices()) {
            Ok(parts) if parts.len() == 1 => (parts, RepairOutcome::Simple),
            Ok(parts) => {
                let count = parts.len();
                log::debug!("Drawn polygon was split into {count} parts");
                (parts, RepairOutcome::Repaired { parts: count })
            }
            Err(err) => {
                log::warn!("Failed to repair drawn polygon, using it as is: {err}");
                (
                    vec![ring.clone().into_closed_contour()],
                    RepairOutcome::Fallback,
                )
            }
        };

        Self {
            ring,
            parts: MultiPolygon::from(parts.into_iter().map(Polygon::from).collect::<Vec<_>>()),
            repair,
            drawn: true,
        }
    }

    /// Creates a polygon from programmatically given parts. The outer contour of the first part is used as the ring.
    pub fn from_parts(parts: Vec<Polygon<GeoPoint2d>>) -> Result<Self, FreeDrawError> {
        let Some(first) = parts.first() else {
            return Err(FreeDrawError::DegenerateGeometry { points: 0 });
        };

        let ring = Ring::close(first.outer_contour.points.clone())?;
        let repair = match parts.len() {
            1 => RepairOutcome::Simple,
            count => RepairOutcome::Repaired { parts: count },
        };

        Ok(Self {
            ring,
            parts: MultiPolygon::from(parts),
            repair,
            drawn: false,
        })
    }

    /// Closed drawn line, after cleaning.
    pub fn ring(&self) -> &Ring<GeoPoint2d> {
        &self.ring
    }

    /// Simple polygons the drawn line was split into.
    pub fn parts(&self) -> &[Polygon<GeoPoint2d>] {
        self.parts.parts()
    }

    /// What the self-intersection repair did.
    pub fn repair_outcome(&self) -> RepairOutcome {
        self.repair
    }

    /// Returns true if the point is inside any of the parts, or on the boundary.
    pub fn contains_point(&self, point: &impl CartesianPoint2d<Num = f64>) -> bool {
        self.parts.contains_point(point)
    }

    /// Bounding rectangle of the polygon.
    pub fn bounding_rect(&self) -> Option<Rect> {
        self.parts
            .bounding_rect()
            .or_else(|| Rect::from_points(self.ring.points().iter()))
    }

    /// GeoJSON geometry of the polygon: `Polygon` for one part, `MultiPolygon` for several.
    pub fn to_geometry(&self) -> geojson::Geometry {
        freedraw_types::geojson::multi_polygon(self.parts())
    }

    /// GeoJSON polygon of the closed drawn line, before repair.
    pub fn ring_geometry(&self) -> geojson::Geometry {
        freedraw_types::geojson::ring_polygon(&self.ring)
    }

    /// Geometry the outline is rendered with: the closed drawn line for drawn polygons, all the parts for polygons
    /// created with [`DrawnPolygon::from_parts`].
    pub fn outline_geometry(&self) -> geojson::Geometry {
        if self.drawn {
            self.ring_geometry()
        } else {
            self.to_geometry()
        }
    }
}
