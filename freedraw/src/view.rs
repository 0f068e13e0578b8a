//! Initial viewport of the map: which area to show before the user starts drawing.

use std::f64::consts::PI;

use freedraw_types::cartesian::{Rect, Size};
use freedraw_types::geo::{GeoPoint, GeoPoint2d, NewGeoPoint};
use freedraw_types::ring::Ring;
use serde::{Deserialize, Serialize};

use crate::error::FreeDrawError;

/// Size of the whole world in pixels at zoom level 0.
pub const WORLD_SIZE: f64 = 256.0;
/// Maximum zoom level a fitted viewport can have.
pub const MAX_ZOOM: f64 = 21.0;
/// Mean radius of the Earth in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;
/// Default number of vertices of [`circle`] polygons.
pub const DEFAULT_CIRCLE_STEPS: usize = 64;

/// Center and zoom level of the map.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    center: GeoPoint2d,
    zoom: f64,
}

impl Viewport {
    /// Creates a new viewport.
    pub fn new(center: GeoPoint2d, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Center of the map.
    pub fn center(&self) -> GeoPoint2d {
        self.center
    }

    /// Zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Largest integer zoom level (up to [`MAX_ZOOM`]) at which the rectangle fits into a container of the given
    /// size, centered on the rectangle.
    ///
    /// Longitudes of `rect` are allowed to cross the antimeridian, i.e. `x_max` may be less than `x_min`. Returns
    /// `None` if the container is empty or the rectangle is not finite.
    pub fn fit(rect: &Rect, container: Size) -> Option<Self> {
        let finite = [rect.x_min, rect.y_min, rect.x_max, rect.y_max]
            .iter()
            .all(|v| v.is_finite());
        if container.is_empty() || !finite {
            return None;
        }

        let lat_fraction = (mercator_lat(rect.y_max) - mercator_lat(rect.y_min)) / PI;
        let lon_diff = rect.x_max - rect.x_min;
        let lon_fraction = if lon_diff < 0.0 { lon_diff + 360.0 } else { lon_diff } / 360.0;

        let zoom = fit_zoom(container.height(), lat_fraction)
            .min(fit_zoom(container.width(), lon_fraction))
            .min(MAX_ZOOM);

        let mut center_lon = rect.x_min + lon_fraction * 180.0;
        if center_lon > 180.0 {
            center_lon -= 360.0;
        }

        let center = GeoPoint2d::lonlat(center_lon, (rect.y_min + rect.y_max) / 2.0);
        log::debug!("Fitted {rect:?} into {container:?}: center {center:?}, zoom {zoom}");

        Some(Self { center, zoom })
    }

    /// Fits the bounding rectangle of a geometry, a feature or the first feature of a collection.
    pub fn fit_geojson(geojson: &geojson::GeoJson, container: Size) -> Option<Self> {
        freedraw_types::geojson::bounding_rect(geojson).and_then(|rect| Self::fit(&rect, container))
    }

    /// Fits a circle with the given center and radius.
    pub fn around(center: GeoPoint2d, radius_km: f64, container: Size) -> Result<Option<Self>, FreeDrawError> {
        let ring = circle(center, radius_km, DEFAULT_CIRCLE_STEPS)?;
        Ok(Rect::from_points(ring.points().iter()).and_then(|rect| Self::fit(&rect, container)))
    }
}

/// Half of the Web Mercator `y` of the latitude, clamped to the `[-PI/2, PI/2]` range.
fn mercator_lat(lat: f64) -> f64 {
    let sin = lat.to_radians().sin();
    let rad_x2 = ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;
    rad_x2.clamp(-PI, PI) / 2.0
}

fn fit_zoom(container_px: f64, fraction: f64) -> f64 {
    (container_px / WORLD_SIZE / fraction).log2().floor()
}

/// Polygon approximating a circle on the Earth surface.
///
/// Vertices are placed at `radius_km` from the center along `steps` equally spaced bearings, starting to the north
/// and going counterclockwise.
pub fn circle(center: GeoPoint2d, radius_km: f64, steps: usize) -> Result<Ring<GeoPoint2d>, FreeDrawError> {
    let points = (0..steps)
        .map(|i| destination(&center, radius_km, -360.0 * i as f64 / steps as f64))
        .collect();

    Ok(Ring::close(points)?)
}

/// Point at `distance_km` from `origin` along the great circle with the given initial bearing (in degrees).
fn destination(origin: &GeoPoint2d, distance_km: f64, bearing: f64) -> GeoPoint2d {
    let lat1 = origin.lat_rad();
    let lon1 = origin.lon_rad();
    let bearing = bearing.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint2d::latlon(lat2.to_degrees(), lon2.to_degrees())
}
