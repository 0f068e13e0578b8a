//! Interfaces of the map the drawing control works with.
//!
//! The control does not render anything and does not know about the UI toolkit of the application. Everything it
//! needs from the map is expressed by three traits: [`RenderSurface`] to show the polygon, [`DrawContext`] to switch
//! the UI affordances, and [`FeatureSource`] to query rendered features. A type implementing all three is a
//! [`MapHost`].

use freedraw_types::cartesian::Rect;
use freedraw_types::geo::GeoPoint2d;

use crate::draw::options::ButtonStyle;
use crate::draw::surface::LayerDefinition;

/// Sources and layers of the map renderer.
pub trait RenderSurface {
    /// Returns true if a data source with the id exists.
    fn has_source(&self, id: &str) -> bool;
    /// Adds a GeoJSON data source.
    fn add_source(&mut self, id: &str, data: geojson::Geometry);
    /// Replaces the data of an existing source.
    fn set_source_data(&mut self, id: &str, data: geojson::Geometry);
    /// Removes the source.
    fn remove_source(&mut self, id: &str);
    /// Returns true if a layer with the id exists.
    fn has_layer(&self, id: &str) -> bool;
    /// Adds a layer rendering a source.
    fn add_layer(&mut self, layer: &LayerDefinition);
    /// Removes the layer.
    fn remove_layer(&mut self, id: &str);
}

/// Mouse cursor shown over the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Default cursor of the map.
    #[default]
    Default,
    /// Cursor indicating that the user can draw.
    Crosshair,
}

/// Kind of native pointer listeners the control needs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Mouse button press and touch start over the map.
    PointerDown,
    /// Pointer movement over the map.
    PointerMove,
    /// Mouse button release and touch end over the map.
    PointerUp,
}

/// UI state of the map the drawing control changes while the drawing mode is on.
pub trait DrawContext {
    /// Enables or disables panning the map by dragging.
    fn set_pan_enabled(&mut self, enabled: bool);
    /// Sets the cursor shown over the map.
    fn set_cursor(&mut self, cursor: Cursor);
    /// Shows or hides the layers.
    fn set_layers_visible(&mut self, layers: &[String], visible: bool);
    /// Enables or disables click handlers of the layers.
    fn set_click_handlers_enabled(&mut self, layers: &[String], enabled: bool);
    /// Shows the message banner.
    fn show_message(&mut self, message: &str);
    /// Hides the message banner.
    fn hide_message(&mut self);
    /// Marks the control button as active or inactive and applies the corresponding style.
    fn set_control_state(&mut self, active: bool, style: &ButtonStyle);
    /// Shows or hides the control button.
    fn set_control_visible(&mut self, visible: bool);

    /// Shows or hides the cancel badge of the control button. Only called when the badge is enabled in the options.
    fn set_cancel_badge_visible(&mut self, _visible: bool) {}

    /// Subscribes to (or unsubscribes from) native pointer events. Hosts that always forward all pointer events to the
    /// control can ignore this.
    fn listen(&mut self, _kind: ListenerKind, _enabled: bool) {}
}

/// A rendered feature with a point position.
pub trait PointFeature {
    /// Position of the feature. `None` for features without a point geometry.
    fn position(&self) -> Option<GeoPoint2d>;
}

impl PointFeature for geojson::Feature {
    fn position(&self) -> Option<GeoPoint2d> {
        self.geometry
            .as_ref()
            .and_then(freedraw_types::geojson::point_of_geometry)
    }
}

impl PointFeature for GeoPoint2d {
    fn position(&self) -> Option<GeoPoint2d> {
        Some(*self)
    }
}

/// Rendered features of the map.
pub trait FeatureSource {
    /// Type of the returned features.
    type Feature: PointFeature;

    /// Current zoom level of the map.
    fn zoom(&self) -> f64;

    /// Features of the given layers rendered inside the rectangle (in longitude/latitude), in render order.
    fn query_rendered_features(&self, bbox: &Rect, layers: &[String]) -> Vec<Self::Feature>;
}

/// Map the drawing control can be added to. This trait is auto-implemented.
pub trait MapHost: RenderSurface + DrawContext + FeatureSource {}

impl<T: RenderSurface + DrawContext + FeatureSource> MapHost for T {}
