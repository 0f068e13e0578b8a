//! Selection of rendered point features inside a drawn polygon.

use serde::{Deserialize, Serialize};

use crate::draw::{DrawnPolygon, FeatureSource, PointFeature};

/// Default maximum zoom level at which filtering is performed.
pub const DEFAULT_MAX_FILTER_ZOOM: f64 = 15.0;

/// Configuration of the feature filtering of the drawn polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    layers: Vec<String>,
    max_zoom: f64,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            layers: vec![],
            max_zoom: DEFAULT_MAX_FILTER_ZOOM,
        }
    }
}

impl FilterOptions {
    /// Creates options filtering features of the given layers.
    pub fn new(layers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            layers: layers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Layers to select the features from.
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Maximum zoom level at which filtering is performed.
    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Sets maximum zoom level at which filtering is performed.
    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    /// Sets maximum zoom level at which filtering is performed.
    pub fn set_max_zoom(&mut self, max_zoom: f64) {
        self.max_zoom = max_zoom;
    }
}

/// Result of a filter query.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterResult<F> {
    /// Features inside the polygon, in the order the source returned them.
    Features(Vec<F>),
    /// The map was zoomed in further than the maximum filter zoom, so no filtering was done.
    ZoomTooHigh {
        /// Zoom level of the map at the moment of the query.
        zoom: f64,
    },
}

impl<F> FilterResult<F> {
    /// Selected features. Empty if the zoom was too high.
    pub fn features(&self) -> &[F] {
        match self {
            Self::Features(features) => features,
            Self::ZoomTooHigh { .. } => &[],
        }
    }

    /// Converts the result into the list of selected features.
    pub fn into_features(self) -> Vec<F> {
        match self {
            Self::Features(features) => features,
            Self::ZoomTooHigh { .. } => vec![],
        }
    }
}

/// Selects point features inside a polygon.
///
/// The features are first queried from the source by the bounding rectangle of the polygon, and then tested for
/// exact containment. Points on the polygon boundary are considered inside.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpatialFilter {
    max_zoom: f64,
}

impl Default for SpatialFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILTER_ZOOM)
    }
}

impl SpatialFilter {
    /// Creates a filter that only works at zoom levels up to `max_zoom`.
    pub fn new(max_zoom: f64) -> Self {
        Self { max_zoom }
    }

    /// Selects features of the `layers` that lie inside the polygon.
    pub fn query<S: FeatureSource + ?Sized>(
        &self,
        polygon: &DrawnPolygon,
        layers: &[String],
        source: &S,
    ) -> FilterResult<S::Feature> {
        let zoom = source.zoom();
        if zoom > self.max_zoom {
            log::debug!(
                "Skipping feature filter at zoom {zoom} (max {})",
                self.max_zoom
            );
            return FilterResult::ZoomTooHigh { zoom };
        }

        let Some(bbox) = polygon.bounding_rect() else {
            return FilterResult::Features(vec![]);
        };

        let candidates = source.query_rendered_features(&bbox, layers);
        let total = candidates.len();
        let features: Vec<_> = candidates
            .into_iter()
            .filter(|feature| {
                feature
                    .position()
                    .is_some_and(|point| polygon.contains_point(&point))
            })
            .collect();

        log::debug!(
            "Selected {} of {total} candidate features inside the polygon",
            features.len()
        );
        FilterResult::Features(features)
    }
}

impl From<&FilterOptions> for SpatialFilter {
    fn from(options: &FilterOptions) -> Self {
        Self::new(options.max_zoom)
    }
}
