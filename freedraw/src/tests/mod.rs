//! Test fixtures: an in-memory map host and sample geometries.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use freedraw_types::cartesian::Rect;
use freedraw_types::geo::GeoPoint2d;
use freedraw_types::lonlat;
use parking_lot::Mutex;

use crate::draw::{
    ButtonStyle, Cursor, DrawContext, DrawnPolygon, FeatureSource, GeometryBuilder, LayerDefinition, ListenerKind,
    PointFeature, RenderSurface,
};
use crate::events::{DrawEvent, EventBus};

/// Map host keeping all the state the control changes in plain fields.
#[derive(Debug)]
pub(crate) struct TestMap {
    pub sources: BTreeMap<String, geojson::Geometry>,
    pub layers: Vec<LayerDefinition>,
    pub source_updates: usize,
    pub zoom: f64,
    pub features: Vec<(String, geojson::Feature)>,
    last_query_size: Cell<usize>,
    pub pan_enabled: bool,
    pub cursor: Cursor,
    pub hidden_layers: BTreeSet<String>,
    pub disabled_clicks: BTreeSet<String>,
    pub message: Option<String>,
    pub control_active: bool,
    pub control_style: Option<ButtonStyle>,
    pub control_visible: bool,
    pub cancel_badge: bool,
    pub listeners: HashSet<ListenerKind>,
}

impl Default for TestMap {
    fn default() -> Self {
        Self {
            sources: BTreeMap::new(),
            layers: vec![],
            source_updates: 0,
            zoom: 10.0,
            features: vec![],
            last_query_size: Cell::new(0),
            pan_enabled: true,
            cursor: Cursor::Default,
            hidden_layers: BTreeSet::new(),
            disabled_clicks: BTreeSet::new(),
            message: None,
            control_active: false,
            control_style: None,
            control_visible: false,
            cancel_badge: false,
            listeners: HashSet::new(),
        }
    }
}

impl TestMap {
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn add_feature(&mut self, layer: &str, feature: geojson::Feature) {
        self.features.push((layer.to_string(), feature));
    }

    /// Number of features returned by the last rendered features query.
    pub fn last_query_size(&self) -> usize {
        self.last_query_size.get()
    }

    /// Returns true if nothing the control changes while drawing is left changed.
    pub fn is_pristine(&self) -> bool {
        self.pan_enabled
            && self.cursor == Cursor::Default
            && self.hidden_layers.is_empty()
            && self.disabled_clicks.is_empty()
            && self.message.is_none()
            && !self.control_active
            && !self.cancel_badge
            && self.listeners.is_empty()
            && self.layers.is_empty()
            && self.sources.is_empty()
    }
}

impl RenderSurface for TestMap {
    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_source(&mut self, id: &str, data: geojson::Geometry) {
        assert!(self.sources.insert(id.to_string(), data).is_none(), "duplicate source {id}");
    }

    fn set_source_data(&mut self, id: &str, data: geojson::Geometry) {
        let source = self.sources.get_mut(id).expect("source exists");
        *source = data;
        self.source_updates += 1;
    }

    fn remove_source(&mut self, id: &str) {
        assert!(!self.layers.iter().any(|l| l.source == id), "source {id} is still in use");
        self.sources.remove(id).expect("source exists");
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    fn add_layer(&mut self, layer: &LayerDefinition) {
        assert!(!self.has_layer(&layer.id), "duplicate layer {}", layer.id);
        assert!(self.has_source(&layer.source), "no source for layer {}", layer.id);
        self.layers.push(layer.clone());
    }

    fn remove_layer(&mut self, id: &str) {
        assert!(self.has_layer(id), "no layer {id}");
        self.layers.retain(|l| l.id != id);
    }
}

impl DrawContext for TestMap {
    fn set_pan_enabled(&mut self, enabled: bool) {
        self.pan_enabled = enabled;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_layers_visible(&mut self, layers: &[String], visible: bool) {
        for layer in layers {
            if visible {
                self.hidden_layers.remove(layer);
            } else {
                self.hidden_layers.insert(layer.clone());
            }
        }
    }

    fn set_click_handlers_enabled(&mut self, layers: &[String], enabled: bool) {
        for layer in layers {
            if enabled {
                self.disabled_clicks.remove(layer);
            } else {
                self.disabled_clicks.insert(layer.clone());
            }
        }
    }

    fn show_message(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }

    fn hide_message(&mut self) {
        self.message = None;
    }

    fn set_control_state(&mut self, active: bool, style: &ButtonStyle) {
        self.control_active = active;
        self.control_style = Some(style.clone());
    }

    fn set_control_visible(&mut self, visible: bool) {
        self.control_visible = visible;
    }

    fn set_cancel_badge_visible(&mut self, visible: bool) {
        self.cancel_badge = visible;
    }

    fn listen(&mut self, kind: ListenerKind, enabled: bool) {
        if enabled {
            self.listeners.insert(kind);
        } else {
            self.listeners.remove(&kind);
        }
    }
}

impl FeatureSource for TestMap {
    type Feature = geojson::Feature;

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn query_rendered_features(&self, bbox: &Rect, layers: &[String]) -> Vec<Self::Feature> {
        let result: Vec<_> = self
            .features
            .iter()
            .filter(|(layer, _)| layers.contains(layer))
            .filter(|(_, feature)| feature.position().map_or(true, |p| bbox.contains(&p)))
            .map(|(_, feature)| feature.clone())
            .collect();

        self.last_query_size.set(result.len());
        result
    }
}

/// Feature source of bare points, ignoring the layers.
pub(crate) struct PointSource {
    points: Vec<GeoPoint2d>,
}

impl PointSource {
    pub fn new(points: Vec<GeoPoint2d>) -> Self {
        Self { points }
    }
}

impl FeatureSource for PointSource {
    type Feature = GeoPoint2d;

    fn zoom(&self) -> f64 {
        0.0
    }

    fn query_rendered_features(&self, bbox: &Rect, _layers: &[String]) -> Vec<GeoPoint2d> {
        self.points.iter().copied().filter(|p| bbox.contains(p)).collect()
    }
}

pub(crate) fn point_feature(lon: f64, lat: f64, name: &str) -> geojson::Feature {
    let mut properties = geojson::JsonObject::new();
    properties.insert("name".into(), name.into());

    geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![lon, lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub(crate) const SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)];

pub(crate) fn square_polygon() -> DrawnPolygon {
    let mut builder = GeometryBuilder::new();
    for (lon, lat) in SQUARE {
        builder.add_point(lonlat!(lon, lat));
    }

    builder.finalize().expect("square is a valid polygon")
}

pub(crate) fn square_geometry() -> geojson::Geometry {
    square_polygon().to_geometry()
}

/// Registers a listener collecting all the events of the bus.
pub(crate) fn recorded_events(bus: &EventBus) -> Arc<Mutex<Vec<DrawEvent>>> {
    let events = Arc::new(Mutex::new(vec![]));
    let sink = events.clone();
    bus.register(move |event: &DrawEvent| sink.lock().push(event.clone()));

    events
}
