//! Styling inputs handed to the presentation layer
//!
//! None of these values influence step selection; they ride along in every
//! [`MenuView`](super::MenuView) so a renderer can draw with them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::StepperType;

/// Default color for icons, connectors and progress bars
pub const DEFAULT_WIDGET_COLOR: Rgb = Rgb(0x29_62_FF);

/// Default label color
pub const DEFAULT_TEXT_COLOR: Rgb = Rgb(0x00_00_00);

/// An opaque 24-bit color, written as `#RRGGBB` in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self((u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
    }

    pub fn components(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0 & 0x00FF_FFFF)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return Err(format!("expected a #RRGGBB color, got '{s}'"));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb)
            .map_err(|_| format!("expected a #RRGGBB color, got '{s}'"))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Label text style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    #[default]
    Normal,
    Bold,
    Italic,
}

/// Rendering parameters of a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuStyle {
    pub widget_color: Rgb,
    pub text_color: Rgb,
    pub icon_size: u16,
    /// Unset means the renderer uses [`MenuStyle::default_text_size`]
    pub text_size: Option<u16>,
    pub text_style: TextStyle,
}

impl MenuStyle {
    /// Defaults for a stepper type. Fleets use larger icons and smaller labels.
    pub fn defaults_for(kind: StepperType) -> Self {
        Self {
            widget_color: DEFAULT_WIDGET_COLOR,
            text_color: DEFAULT_TEXT_COLOR,
            icon_size: Self::default_icon_size(kind),
            text_size: None,
            text_style: TextStyle::Normal,
        }
    }

    pub fn default_icon_size(kind: StepperType) -> u16 {
        match kind {
            StepperType::Fleets => 20,
            _ => 16,
        }
    }

    pub fn default_text_size(kind: StepperType) -> u16 {
        match kind {
            StepperType::Fleets => 16,
            _ => 18,
        }
    }
}
