use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::draw::surface::SurfaceStyle;
use crate::error::FreeDrawError;
use crate::filter::FilterOptions;

/// Layers that are hidden, and whose click handlers are disabled, while the drawing mode is on.
pub const DEFAULT_INTERACTIVE_LAYERS: [&str; 5] = [
    "pois",
    "pois_price",
    "poi_selected",
    "pois_price_selected",
    "agg",
];

/// Look of the control button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonStyle {
    /// Text of the button.
    pub label: String,
    /// Button width in pixels.
    pub width: f64,
    /// Button height in pixels.
    pub height: f64,
    /// Background color.
    pub background: Color,
    /// Text color.
    pub text_color: Color,
    /// Text size in pixels.
    pub text_size: f64,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            label: "FD".into(),
            width: 56.0,
            height: 56.0,
            background: Color::CHARCOAL,
            text_color: Color::WHITE,
            text_size: 12.0,
        }
    }
}

impl ButtonStyle {
    /// Line height (in percent of the text size) that centers the label vertically.
    pub fn line_height_percent(&self) -> u32 {
        if self.text_size <= 0.0 {
            return 100;
        }

        (self.height / self.text_size * 100.0).floor() as u32
    }

    /// Sets background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Sets button label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// What the control gives to the application when a polygon is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Delivery {
    /// Rendered point features inside the polygon.
    Filtered(FilterOptions),
    /// The polygon itself.
    Raw,
}

impl Default for Delivery {
    fn default() -> Self {
        Self::Filtered(FilterOptions::default())
    }
}

/// Configuration of a [`DrawController`](crate::draw::DrawController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawControlOptions {
    button: ButtonStyle,
    active_button: ButtonStyle,
    message: Option<String>,
    delivery: Delivery,
    interactive_layers: Vec<String>,
    surface: SurfaceStyle,
    cancel_badge: bool,
}

impl Default for DrawControlOptions {
    fn default() -> Self {
        Self {
            button: ButtonStyle::default(),
            active_button: ButtonStyle::default(),
            message: None,
            delivery: Delivery::default(),
            interactive_layers: Vec::from(DEFAULT_INTERACTIVE_LAYERS.map(String::from)),
            surface: SurfaceStyle::default(),
            cancel_badge: false,
        }
    }
}

impl DrawControlOptions {
    /// Parses options from a JSON string. Missing fields get their default values.
    pub fn from_json(json: &str) -> Result<Self, FreeDrawError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Style of the button when the drawing mode is off.
    pub fn button(&self) -> &ButtonStyle {
        &self.button
    }

    /// Sets style of the button when the drawing mode is off.
    pub fn with_button(mut self, style: ButtonStyle) -> Self {
        self.button = style;
        self
    }

    /// Style of the button when the drawing mode is on.
    pub fn active_button(&self) -> &ButtonStyle {
        &self.active_button
    }

    /// Sets style of the button when the drawing mode is on.
    pub fn with_active_button(mut self, style: ButtonStyle) -> Self {
        self.active_button = style;
        self
    }

    /// Message shown while the drawing mode is on and the user has not started drawing yet.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Sets the message shown while the drawing mode is on.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the message shown while the drawing mode is on.
    pub fn set_message(&mut self, message: Option<String>) {
        self.message = message;
    }

    /// What is given to the application when a polygon is drawn.
    pub fn delivery(&self) -> &Delivery {
        &self.delivery
    }

    /// Sets what is given to the application when a polygon is drawn.
    pub fn with_delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = delivery;
        self
    }

    /// Sets what is given to the application when a polygon is drawn.
    pub fn set_delivery(&mut self, delivery: Delivery) {
        self.delivery = delivery;
    }

    /// Layers hidden while the drawing mode is on.
    pub fn interactive_layers(&self) -> &[String] {
        &self.interactive_layers
    }

    /// Sets layers hidden while the drawing mode is on.
    pub fn with_interactive_layers(
        mut self,
        layers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.interactive_layers = layers.into_iter().map(Into::into).collect();
        self
    }

    /// Identifiers and paint of the rendered polygon.
    pub fn surface(&self) -> &SurfaceStyle {
        &self.surface
    }

    /// Sets identifiers and paint of the rendered polygon.
    pub fn with_surface(mut self, style: SurfaceStyle) -> Self {
        self.surface = style;
        self
    }

    /// Whether a cancel badge is shown next to the button while the drawing mode is on.
    pub fn cancel_badge(&self) -> bool {
        self.cancel_badge
    }

    /// Enables the cancel badge shown next to the button while the drawing mode is on.
    pub fn with_cancel_badge(mut self, enabled: bool) -> Self {
        self.cancel_badge = enabled;
        self
    }
}
