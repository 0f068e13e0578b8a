//! Runs the drawing control against an in-memory map and prints what happens.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example headless_draw
//! ```

use std::collections::HashMap;

use freedraw::control::{EventDispatcher, PointerEvent, PointerInput, SharedHandler};
use freedraw::draw::{
    ButtonStyle, Cursor, Delivery, DrawContext, DrawControlOptions, DrawController, FeatureSource, LayerDefinition,
    PointFeature, PolygonReady, RenderSurface,
};
use freedraw::events::DrawEvent;
use freedraw::filter::FilterOptions;
use freedraw::freedraw_types::cartesian::{Rect, Size};
use freedraw::freedraw_types::lonlat;
use freedraw::view::circle;
use freedraw::Viewport;

/// Map that only remembers its sources, layers and the points of interest.
#[derive(Default)]
struct ConsoleMap {
    sources: HashMap<String, geojson::Geometry>,
    layers: Vec<String>,
    pois: Vec<geojson::Feature>,
}

impl RenderSurface for ConsoleMap {
    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_source(&mut self, id: &str, data: geojson::Geometry) {
        self.sources.insert(id.to_string(), data);
    }

    fn set_source_data(&mut self, id: &str, data: geojson::Geometry) {
        self.sources.insert(id.to_string(), data);
    }

    fn remove_source(&mut self, id: &str) {
        self.sources.remove(id);
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|layer| layer == id)
    }

    fn add_layer(&mut self, layer: &LayerDefinition) {
        log::info!("Layer {} added: {:?}", layer.id, layer.paint);
        self.layers.push(layer.id.clone());
    }

    fn remove_layer(&mut self, id: &str) {
        log::info!("Layer {id} removed");
        self.layers.retain(|layer| layer != id);
    }
}

impl DrawContext for ConsoleMap {
    fn set_pan_enabled(&mut self, enabled: bool) {
        log::info!("Pan enabled: {enabled}");
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        log::info!("Cursor: {cursor:?}");
    }

    fn set_layers_visible(&mut self, layers: &[String], visible: bool) {
        log::info!("Layers {layers:?} visible: {visible}");
    }

    fn set_click_handlers_enabled(&mut self, layers: &[String], enabled: bool) {
        log::info!("Clicks on {layers:?} enabled: {enabled}");
    }

    fn show_message(&mut self, message: &str) {
        log::info!("Message: {message}");
    }

    fn hide_message(&mut self) {
        log::info!("Message hidden");
    }

    fn set_control_state(&mut self, active: bool, style: &ButtonStyle) {
        log::info!(
            "Button {} active: {active}, background {}",
            style.label,
            style.background.to_css()
        );
    }

    fn set_control_visible(&mut self, visible: bool) {
        log::info!("Button visible: {visible}");
    }
}

impl FeatureSource for ConsoleMap {
    type Feature = geojson::Feature;

    fn zoom(&self) -> f64 {
        12.0
    }

    fn query_rendered_features(&self, bbox: &Rect, _layers: &[String]) -> Vec<geojson::Feature> {
        self.pois
            .iter()
            .filter(|poi| poi.position().is_some_and(|p| bbox.contains(&p)))
            .cloned()
            .collect()
    }
}

fn poi(lon: f64, lat: f64, name: &str) -> geojson::Feature {
    let mut feature = geojson::Feature::from(geojson::Geometry::new(geojson::Value::Point(vec![lon, lat])));
    feature.set_property("name", name);
    feature
}

fn main() {
    env_logger::init();

    let center = lonlat!(13.40, 52.52);
    if let Ok(Some(viewport)) = Viewport::around(center, 3.0, Size::new(1024.0, 768.0)) {
        log::info!("Initial viewport: {viewport:?}");
    }

    let mut map = ConsoleMap {
        pois: vec![
            poi(13.40, 52.52, "Alexanderplatz"),
            poi(13.38, 52.51, "Gendarmenmarkt"),
            poi(13.29, 52.52, "Charlottenburg"),
        ],
        ..Default::default()
    };

    let options = DrawControlOptions::default()
        .with_message("Draw an area to select places")
        .with_delivery(Delivery::Filtered(FilterOptions::new(["pois"])));
    let controller = SharedHandler::new(DrawController::new(options).with_consumer(
        |ready: PolygonReady<geojson::Feature>| {
            if let PolygonReady::FilteredFeatures { result, .. } = ready {
                for feature in result.features() {
                    println!("Selected: {:?}", feature.property("name"));
                }
            }
        },
    ));
    controller
        .lock()
        .events()
        .register(|event: &DrawEvent| log::info!("Event: {event:?}"));

    let mut dispatcher = EventDispatcher::default();
    dispatcher.add_handler(controller.clone());

    controller.lock().on_add(&mut map);
    if let Err(err) = controller.lock().toggle(&mut map, true) {
        log::error!("Failed to switch drawing mode on: {err}");
        return;
    }

    // The user draws a loop of 2 km around the center.
    let Ok(path) = circle(center, 2.0, 32) else {
        return;
    };
    let mut points = path.points().iter().copied();
    if let Some(first) = points.next() {
        dispatcher.handle(PointerEvent::Down(PointerInput::mouse(first)), &mut map);
    }
    let mut last = center;
    for point in points {
        dispatcher.handle(PointerEvent::Move(PointerInput::touch(point)), &mut map);
        last = point;
    }
    dispatcher.handle(PointerEvent::Up(PointerInput::mouse(last)), &mut map);
    dispatcher.handle(PointerEvent::DocumentUp, &mut map);
    dispatcher.end_tick(&mut map);

    if let Err(err) = controller.lock().toggle(&mut map, true) {
        log::error!("Failed to switch drawing mode off: {err}");
    };
}
