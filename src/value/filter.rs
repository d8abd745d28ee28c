//! View filters (`filter`, `backdrop-filter`).

use serde::Serialize;

use crate::value::angle::Angle;
use crate::value::shadow::TextShadow;
use crate::value::size::Size;

/// Any subset of filter functions. Percent-valued functions hold the number
/// as written (`brightness = 150` means 150%).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ViewFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grayscale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invert: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sepia: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue_rotate: Option<Angle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow: Option<TextShadow>,
}

impl ViewFilter {
    /// Field names of the percent-valued functions.
    pub const PERCENT_FIELDS: [&'static str; 7] = [
        "brightness",
        "contrast",
        "grayscale",
        "invert",
        "opacity",
        "saturate",
        "sepia",
    ];

    /// Mutable access to a percent-valued field by name.
    pub fn percent_mut(&mut self, name: &str) -> Option<&mut Option<f64>> {
        match name {
            "brightness" => Some(&mut self.brightness),
            "contrast" => Some(&mut self.contrast),
            "grayscale" => Some(&mut self.grayscale),
            "invert" => Some(&mut self.invert),
            "opacity" => Some(&mut self.opacity),
            "saturate" => Some(&mut self.saturate),
            "sepia" => Some(&mut self.sepia),
            _ => None,
        }
    }

    /// Read a percent-valued field by name.
    pub fn percent(&self, name: &str) -> Option<f64> {
        match name {
            "brightness" => self.brightness,
            "contrast" => self.contrast,
            "grayscale" => self.grayscale,
            "invert" => self.invert,
            "opacity" => self.opacity,
            "saturate" => self.saturate,
            "sepia" => self.sepia,
            _ => None,
        }
    }

    /// Whether no function is set.
    pub fn is_empty(&self) -> bool {
        *self == ViewFilter::default()
    }
}
