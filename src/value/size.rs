//! Size values: a magnitude plus a unit, or `auto`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValueParseError;

/// Length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeUnit {
    /// No magnitude: "unset" / "stretch", distinct from zero.
    #[default]
    Auto,
    Px,
    Em,
    Ex,
    Percent,
    Pt,
    Pc,
    Mm,
    Cm,
    In,
    /// Grid track fraction.
    Fr,
}

impl SizeUnit {
    /// Source-text suffix of this unit (`""` for auto).
    pub fn suffix(self) -> &'static str {
        match self {
            SizeUnit::Auto => "",
            SizeUnit::Px => "px",
            SizeUnit::Em => "em",
            SizeUnit::Ex => "ex",
            SizeUnit::Percent => "%",
            SizeUnit::Pt => "pt",
            SizeUnit::Pc => "pc",
            SizeUnit::Mm => "mm",
            SizeUnit::Cm => "cm",
            SizeUnit::In => "in",
            SizeUnit::Fr => "fr",
        }
    }

    /// Look up a unit by its suffix (case-insensitive).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let unit = match suffix.to_ascii_lowercase().as_str() {
            "px" => SizeUnit::Px,
            "em" => SizeUnit::Em,
            "ex" => SizeUnit::Ex,
            "%" => SizeUnit::Percent,
            "pt" => SizeUnit::Pt,
            "pc" => SizeUnit::Pc,
            "mm" => SizeUnit::Mm,
            "cm" => SizeUnit::Cm,
            "in" => SizeUnit::In,
            "fr" => SizeUnit::Fr,
            _ => return None,
        };
        Some(unit)
    }
}

/// A size such as `32px`, `100%`, `1fr` or `auto`.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Size {
    pub value: f64,
    pub unit: SizeUnit,
}

impl Size {
    /// The `auto` size.
    pub const fn auto() -> Self {
        Self {
            value: 0.0,
            unit: SizeUnit::Auto,
        }
    }

    /// Create a size with an explicit unit. `SizeUnit::Auto` drops the magnitude.
    pub fn new(value: f64, unit: SizeUnit) -> Self {
        match unit {
            SizeUnit::Auto => Self::auto(),
            unit => Self { value, unit },
        }
    }

    pub fn px(value: f64) -> Self {
        Self::new(value, SizeUnit::Px)
    }

    pub fn em(value: f64) -> Self {
        Self::new(value, SizeUnit::Em)
    }

    pub fn percent(value: f64) -> Self {
        Self::new(value, SizeUnit::Percent)
    }

    pub fn pt(value: f64) -> Self {
        Self::new(value, SizeUnit::Pt)
    }

    pub fn fr(value: f64) -> Self {
        Self::new(value, SizeUnit::Fr)
    }

    /// Returns `true` for `auto`.
    pub fn is_auto(&self) -> bool {
        self.unit == SizeUnit::Auto
    }

    /// Returns `true` for a zero magnitude in any concrete unit.
    pub fn is_zero(&self) -> bool {
        !self.is_auto() && self.value == 0.0
    }
}

impl PartialEq for Size {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && (self.is_auto() || self.value == other.value)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_auto() {
            write!(f, "auto")
        } else {
            write!(f, "{}{}", self.value, self.unit.suffix())
        }
    }
}

impl FromStr for Size {
    type Err = ValueParseError;

    /// Accepts `auto`, `none`, the empty string, `<number><unit>` and a bare
    /// number (pixels).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("auto") || text.eq_ignore_ascii_case("none") {
            return Ok(Size::auto());
        }
        let (value, suffix) = split_number(text).ok_or_else(|| ValueParseError::new("size", s))?;
        if suffix.is_empty() {
            return Ok(Size::px(value));
        }
        let unit = SizeUnit::from_suffix(suffix).ok_or_else(|| ValueParseError::new("size", s))?;
        Ok(Size::new(value, unit))
    }
}

/// Split `"-12.5px"` into `(-12.5, "px")`.
///
/// The numeric prefix is `-?digits(.digits)?`; anything after it is returned
/// untouched as the suffix. Returns `None` when there is no numeric prefix.
pub(crate) fn split_number(text: &str) -> Option<(f64, &str)> {
    let bytes = text.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') || bytes.first() == Some(&b'+') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            end = frac_end;
        }
    }
    let value = text[..end].parse::<f64>().ok()?;
    Some((value, text[end..].trim_start()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_units() {
        assert_eq!("32px".parse::<Size>().unwrap(), Size::px(32.0));
        assert_eq!("100%".parse::<Size>().unwrap(), Size::percent(100.0));
        assert_eq!("1.5fr".parse::<Size>().unwrap(), Size::fr(1.5));
        assert_eq!("2.5em".parse::<Size>().unwrap(), Size::em(2.5));
        assert_eq!("-4pt".parse::<Size>().unwrap(), Size::pt(-4.0));
        assert_eq!("3IN".parse::<Size>().unwrap(), Size::new(3.0, SizeUnit::In));
    }

    #[test]
    fn bare_number_is_pixels() {
        assert_eq!("12".parse::<Size>().unwrap(), Size::px(12.0));
        assert_eq!("0".parse::<Size>().unwrap(), Size::px(0.0));
    }

    #[test]
    fn auto_forms() {
        for text in ["auto", "AUTO", "none", "", "  "] {
            assert!(text.parse::<Size>().unwrap().is_auto(), "{text:?}");
        }
    }

    #[test]
    fn auto_is_not_zero() {
        assert_ne!(Size::auto(), Size::px(0.0));
        assert!(!Size::auto().is_zero());
        assert!(Size::px(0.0).is_zero());
    }

    #[test]
    fn auto_ignores_magnitude() {
        assert_eq!(Size::new(5.0, SizeUnit::Auto), Size::auto());
    }

    #[test]
    fn rejects_unknown_unit() {
        assert!("3furlongs".parse::<Size>().is_err());
        assert!("px".parse::<Size>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Size::px(32.0).to_string(), "32px");
        assert_eq!(Size::percent(12.5).to_string(), "12.5%");
        assert_eq!(Size::auto().to_string(), "auto");
    }

    #[test]
    fn split_number_forms() {
        assert_eq!(split_number("12px"), Some((12.0, "px")));
        assert_eq!(split_number("-0.5"), Some((-0.5, "")));
        assert_eq!(split_number("7."), Some((7.0, ".")));
        assert_eq!(split_number("deg"), None);
    }
}
