//! Angle values.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValueParseError;
use crate::value::size::split_number;

/// Angle unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AngleUnit {
    #[default]
    Deg,
    Grad,
    Rad,
    Turn,
}

impl AngleUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            AngleUnit::Deg => "deg",
            AngleUnit::Grad => "grad",
            AngleUnit::Rad => "rad",
            AngleUnit::Turn => "turn",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "deg" => Some(AngleUnit::Deg),
            "grad" => Some(AngleUnit::Grad),
            "rad" => Some(AngleUnit::Rad),
            "turn" => Some(AngleUnit::Turn),
            _ => None,
        }
    }
}

/// An angle such as `90deg` or `0.25turn`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Angle {
    pub value: f64,
    pub unit: AngleUnit,
}

impl Angle {
    pub const fn new(value: f64, unit: AngleUnit) -> Self {
        Self { value, unit }
    }

    pub const fn deg(value: f64) -> Self {
        Self::new(value, AngleUnit::Deg)
    }

    pub const fn rad(value: f64) -> Self {
        Self::new(value, AngleUnit::Rad)
    }

    pub const fn turn(value: f64) -> Self {
        Self::new(value, AngleUnit::Turn)
    }

    /// The angle in degrees, whatever unit it was written in.
    pub fn to_degrees(&self) -> f64 {
        match self.unit {
            AngleUnit::Deg => self.value,
            AngleUnit::Grad => self.value * 0.9,
            AngleUnit::Rad => self.value * 180.0 / PI,
            AngleUnit::Turn => self.value * 360.0,
        }
    }

    /// The angle in radians.
    pub fn to_radians(&self) -> f64 {
        self.to_degrees() * PI / 180.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for Angle {
    type Err = ValueParseError;

    /// Accepts `<number><unit>`; a bare number is read as degrees.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, suffix) =
            split_number(s.trim()).ok_or_else(|| ValueParseError::new("angle", s))?;
        if suffix.is_empty() {
            return Ok(Angle::deg(value));
        }
        let unit = AngleUnit::from_suffix(suffix).ok_or_else(|| ValueParseError::new("angle", s))?;
        Ok(Angle::new(value, unit))
    }
}
