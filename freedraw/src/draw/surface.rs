use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::draw::builder::DrawnPolygon;
use crate::draw::context::RenderSurface;
use crate::events::{DrawEvent, EventBus, PolygonOrigin};

/// Identifiers and paint of the primitives the polygon is rendered with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceStyle {
    fill_layer: String,
    fill_source: String,
    fill_color: Color,
    fill_opacity: f32,
    outline_color: Color,
    line_layer: String,
    line_source: String,
    line_color: Color,
    line_width: f64,
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            fill_layer: "fill".into(),
            fill_source: "fill_source".into(),
            fill_color: Color::RASPBERRY,
            fill_opacity: 0.1,
            outline_color: Color::RED,
            line_layer: "line".into(),
            line_source: "line_source".into(),
            line_color: Color::RASPBERRY,
            line_width: 2.0,
        }
    }
}

impl SurfaceStyle {
    /// Id of the fill layer.
    pub fn fill_layer(&self) -> &str {
        &self.fill_layer
    }

    /// Id of the fill data source.
    pub fn fill_source(&self) -> &str {
        &self.fill_source
    }

    /// Id of the outline layer.
    pub fn line_layer(&self) -> &str {
        &self.line_layer
    }

    /// Id of the outline data source.
    pub fn line_source(&self) -> &str {
        &self.line_source
    }

    /// Sets ids of the fill layer and its source.
    pub fn with_fill_ids(mut self, layer: impl Into<String>, source: impl Into<String>) -> Self {
        self.fill_layer = layer.into();
        self.fill_source = source.into();
        self
    }

    /// Sets ids of the outline layer and its source.
    pub fn with_line_ids(mut self, layer: impl Into<String>, source: impl Into<String>) -> Self {
        self.line_layer = layer.into();
        self.line_source = source.into();
        self
    }

    /// Sets fill color and opacity.
    pub fn with_fill(mut self, color: Color, opacity: f32) -> Self {
        self.fill_color = color;
        self.fill_opacity = opacity;
        self
    }

    /// Sets outline color of the fill layer.
    pub fn with_outline_color(mut self, color: Color) -> Self {
        self.outline_color = color;
        self
    }

    /// Sets line color and width.
    pub fn with_line(mut self, color: Color, width: f64) -> Self {
        self.line_color = color;
        self.line_width = width;
        self
    }

    fn fill_definition(&self) -> LayerDefinition {
        LayerDefinition {
            id: self.fill_layer.clone(),
            source: self.fill_source.clone(),
            paint: LayerPaint::Fill {
                color: self.fill_color,
                opacity: self.fill_opacity,
                outline_color: self.outline_color,
            },
        }
    }

    fn line_definition(&self) -> LayerDefinition {
        LayerDefinition {
            id: self.line_layer.clone(),
            source: self.line_source.clone(),
            paint: LayerPaint::Line {
                color: self.line_color,
                width: self.line_width,
            },
        }
    }
}

/// Layer to be added to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDefinition {
    /// Layer id.
    pub id: String,
    /// Id of the source the layer renders.
    pub source: String,
    /// How the layer is painted.
    pub paint: LayerPaint,
}

/// Paint of a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerPaint {
    /// Filled area.
    Fill {
        /// Fill color.
        color: Color,
        /// Fill opacity in `[0, 1]` range.
        opacity: f32,
        /// Color of the area border.
        outline_color: Color,
    },
    /// Line with round joins and caps.
    Line {
        /// Line color.
        color: Color,
        /// Line width in pixels.
        width: f64,
    },
}

/// Ids of the primitives currently showing the polygon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPolygonHandle {
    /// Fill layer id, if the fill is shown.
    pub fill_layer: Option<String>,
    /// Outline layer id, if the outline is shown.
    pub line_layer: Option<String>,
}

/// Rendered representation of the drawn polygon.
///
/// All operations are idempotent: existence of sources and layers is checked through the renderer by their ids, so
/// showing the polygon again updates the data in place instead of creating duplicates.
#[derive(Debug, Clone)]
pub struct PolygonSurface {
    style: SurfaceStyle,
    bus: EventBus,
}

impl PolygonSurface {
    /// Creates a new surface emitting its events to the bus.
    pub fn new(style: SurfaceStyle, bus: EventBus) -> Self {
        Self { style, bus }
    }

    /// Style of the surface.
    pub fn style(&self) -> &SurfaceStyle {
        &self.style
    }

    /// Shows the geometry as a line. Used for the live preview while drawing.
    pub fn show_line(&self, renderer: &mut impl RenderSurface, geometry: geojson::Geometry) {
        Self::show(
            renderer,
            &self.style.line_source,
            self.style.line_definition(),
            geometry,
        );
    }

    /// Shows the geometry as a filled area.
    pub fn show_fill(&self, renderer: &mut impl RenderSurface, geometry: geojson::Geometry) {
        Self::show(
            renderer,
            &self.style.fill_source,
            self.style.fill_definition(),
            geometry,
        );
    }

    fn show(
        renderer: &mut impl RenderSurface,
        source: &str,
        layer: LayerDefinition,
        geometry: geojson::Geometry,
    ) {
        if renderer.has_source(source) {
            renderer.set_source_data(source, geometry);
        } else {
            renderer.add_source(source, geometry);
        }

        if !renderer.has_layer(&layer.id) {
            log::debug!("Adding layer {}", layer.id);
            renderer.add_layer(&layer);
        }
    }

    /// Shows the polygon with both fill and outline and notifies the listeners.
    ///
    /// The outline follows the line as it was drawn, the fill shows the repaired parts.
    pub fn add_polygon(
        &self,
        renderer: &mut impl RenderSurface,
        polygon: &DrawnPolygon,
        origin: PolygonOrigin,
    ) {
        let geometry = polygon.to_geometry();
        self.show_line(renderer, polygon.outline_geometry());
        self.show_fill(renderer, geometry.clone());
        self.bus
            .fire(&DrawEvent::PolygonAdded { origin, geometry });
    }

    /// Removes the rendered polygon, if any, and notifies the listeners.
    ///
    /// [`DrawEvent::PolygonRemoved`] is emitted even if nothing was rendered, so that the listeners can release any
    /// state bound to the polygon.
    pub fn clear(&self, renderer: &mut impl RenderSurface) {
        for layer in [&self.style.fill_layer, &self.style.line_layer] {
            if renderer.has_layer(layer) {
                renderer.remove_layer(layer);
            }
        }

        for source in [&self.style.fill_source, &self.style.line_source] {
            if renderer.has_source(source) {
                renderer.remove_source(source);
            }
        }

        self.bus.fire(&DrawEvent::PolygonRemoved);
    }

    /// Ids of the shown primitives. `None` if nothing is shown.
    pub fn handle(&self, renderer: &impl RenderSurface) -> Option<RenderedPolygonHandle> {
        let shown = |id: &String| renderer.has_layer(id).then(|| id.clone());
        let handle = RenderedPolygonHandle {
            fill_layer: shown(&self.style.fill_layer),
            line_layer: shown(&self.style.line_layer),
        };

        (handle.fill_layer.is_some() || handle.line_layer.is_some()).then_some(handle)
    }
}
