//! 32-bit ARGB colors and the named palette.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueParseError;

/// A color stored as `0xAARRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "ColorRepr")]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(0xFF, r, g, b)
    }

    /// Color from alpha and RGB components.
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Look up a palette name, case-insensitively.
    pub fn named(name: &str) -> Option<Color> {
        let lower = name.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|&(_, argb)| Color(argb))
    }

    /// The first palette name for this exact value, if any.
    pub fn name(self) -> Option<&'static str> {
        NAMED_COLORS
            .iter()
            .find(|(_, argb)| *argb == self.0)
            .map(|&(n, _)| n)
    }

    /// Parse `#RGB`, `#ARGB`, `#RRGGBB` or `#AARRGGBB` (the `#` is required).
    pub fn from_hex(text: &str) -> Option<Color> {
        let hex = text.strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let raw = u32::from_str_radix(hex, 16).ok()?;
        let expand = |nibble: u32| (nibble & 0xF) * 0x11;
        match hex.len() {
            3 => Some(Color(
                0xFF00_0000 | expand(raw >> 8) << 16 | expand(raw >> 4) << 8 | expand(raw),
            )),
            4 => Some(Color(
                expand(raw >> 12) << 24 | expand(raw >> 8) << 16 | expand(raw >> 4) << 8 | expand(raw),
            )),
            6 => Some(Color(0xFF00_0000 | raw)),
            8 => Some(Color(raw)),
            _ => None,
        }
    }

    /// Parse `rgb(r, g, b)` / `rgba(r, g, b, a)`.
    ///
    /// Channels are `0..=255` or percentages; alpha is `0..=1` when it has a
    /// fractional part or is at most 1, otherwise `0..=255`.
    fn from_function(text: &str) -> Option<Color> {
        let lower = text.trim().to_ascii_lowercase();
        let (args, with_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest.strip_suffix(')')?, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest.strip_suffix(')')?, false)
        } else {
            return None;
        };
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != if with_alpha { 4 } else { 3 } {
            return None;
        }
        let channel = |p: &str| -> Option<u8> {
            if let Some(pct) = p.strip_suffix('%') {
                let v: f64 = pct.trim().parse().ok()?;
                Some((v.clamp(0.0, 100.0) * 2.55).round() as u8)
            } else {
                let v: f64 = p.parse().ok()?;
                Some(v.clamp(0.0, 255.0).round() as u8)
            }
        };
        let r = channel(parts[0])?;
        let g = channel(parts[1])?;
        let b = channel(parts[2])?;
        let a = if with_alpha {
            let p = parts[3];
            if let Some(pct) = p.strip_suffix('%') {
                channel(&format!("{pct}%"))?
            } else {
                let v: f64 = p.parse().ok()?;
                if p.contains('.') || v <= 1.0 {
                    (v.clamp(0.0, 1.0) * 255.0).round() as u8
                } else {
                    v.clamp(0.0, 255.0).round() as u8
                }
            }
        } else {
            0xFF
        };
        Some(Color::argb(a, r, g, b))
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:08X})", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl FromStr for Color {
    type Err = ValueParseError;

    /// Accepts hex literals, `rgb()`/`rgba()` and palette names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.starts_with('#') {
            return Color::from_hex(text).ok_or_else(|| ValueParseError::new("color", s));
        }
        Color::from_function(text)
            .or_else(|| Color::named(text))
            .ok_or_else(|| ValueParseError::new("color", s))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.to_string()
    }
}

/// Wire forms accepted when decoding a color: text or a raw ARGB number.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Argb(u32),
    Text(String),
}

impl TryFrom<ColorRepr> for Color {
    type Error = ValueParseError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Argb(argb) => Ok(Color(argb)),
            ColorRepr::Text(text) => text.parse(),
        }
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Named colors (lowercase), ARGB.
pub const NAMED_COLORS: &[(&str, u32)] = &[
    ("transparent", 0x00000000),
    ("aliceblue", 0xFFF0F8FF),
    ("antiquewhite", 0xFFFAEBD7),
    ("aqua", 0xFF00FFFF),
    ("aquamarine", 0xFF7FFFD4),
    ("azure", 0xFFF0FFFF),
    ("beige", 0xFFF5F5DC),
    ("bisque", 0xFFFFE4C4),
    ("black", 0xFF000000),
    ("blanchedalmond", 0xFFFFEBCD),
    ("blue", 0xFF0000FF),
    ("blueviolet", 0xFF8A2BE2),
    ("brown", 0xFFA52A2A),
    ("burlywood", 0xFFDEB887),
    ("cadetblue", 0xFF5F9EA0),
    ("chartreuse", 0xFF7FFF00),
    ("chocolate", 0xFFD2691E),
    ("coral", 0xFFFF7F50),
    ("cornflowerblue", 0xFF6495ED),
    ("cornsilk", 0xFFFFF8DC),
    ("crimson", 0xFFDC143C),
    ("cyan", 0xFF00FFFF),
    ("darkblue", 0xFF00008B),
    ("darkcyan", 0xFF008B8B),
    ("darkgoldenrod", 0xFFB8860B),
    ("darkgray", 0xFFA9A9A9),
    ("darkgreen", 0xFF006400),
    ("darkgrey", 0xFFA9A9A9),
    ("darkkhaki", 0xFFBDB76B),
    ("darkmagenta", 0xFF8B008B),
    ("darkolivegreen", 0xFF556B2F),
    ("darkorange", 0xFFFF8C00),
    ("darkorchid", 0xFF9932CC),
    ("darkred", 0xFF8B0000),
    ("darksalmon", 0xFFE9967A),
    ("darkseagreen", 0xFF8FBC8F),
    ("darkslateblue", 0xFF483D8B),
    ("darkslategray", 0xFF2F4F4F),
    ("darkslategrey", 0xFF2F4F4F),
    ("darkturquoise", 0xFF00CED1),
    ("darkviolet", 0xFF9400D3),
    ("deeppink", 0xFFFF1493),
    ("deepskyblue", 0xFF00BFFF),
    ("dimgray", 0xFF696969),
    ("dimgrey", 0xFF696969),
    ("dodgerblue", 0xFF1E90FF),
    ("firebrick", 0xFFB22222),
    ("floralwhite", 0xFFFFFAF0),
    ("forestgreen", 0xFF228B22),
    ("fuchsia", 0xFFFF00FF),
    ("gainsboro", 0xFFDCDCDC),
    ("ghostwhite", 0xFFF8F8FF),
    ("gold", 0xFFFFD700),
    ("goldenrod", 0xFFDAA520),
    ("gray", 0xFF808080),
    ("green", 0xFF008000),
    ("greenyellow", 0xFFADFF2F),
    ("grey", 0xFF808080),
    ("honeydew", 0xFFF0FFF0),
    ("hotpink", 0xFFFF69B4),
    ("indianred", 0xFFCD5C5C),
    ("indigo", 0xFF4B0082),
    ("ivory", 0xFFFFFFF0),
    ("khaki", 0xFFF0E68C),
    ("lavender", 0xFFE6E6FA),
    ("lavenderblush", 0xFFFFF0F5),
    ("lawngreen", 0xFF7CFC00),
    ("lemonchiffon", 0xFFFFFACD),
    ("lightblue", 0xFFADD8E6),
    ("lightcoral", 0xFFF08080),
    ("lightcyan", 0xFFE0FFFF),
    ("lightgoldenrodyellow", 0xFFFAFAD2),
    ("lightgray", 0xFFD3D3D3),
    ("lightgreen", 0xFF90EE90),
    ("lightgrey", 0xFFD3D3D3),
    ("lightpink", 0xFFFFB6C1),
    ("lightsalmon", 0xFFFFA07A),
    ("lightseagreen", 0xFF20B2AA),
    ("lightskyblue", 0xFF87CEFA),
    ("lightslategray", 0xFF778899),
    ("lightslategrey", 0xFF778899),
    ("lightsteelblue", 0xFFB0C4DE),
    ("lightyellow", 0xFFFFFFE0),
    ("lime", 0xFF00FF00),
    ("limegreen", 0xFF32CD32),
    ("linen", 0xFFFAF0E6),
    ("magenta", 0xFFFF00FF),
    ("maroon", 0xFF800000),
    ("mediumaquamarine", 0xFF66CDAA),
    ("mediumblue", 0xFF0000CD),
    ("mediumorchid", 0xFFBA55D3),
    ("mediumpurple", 0xFF9370DB),
    ("mediumseagreen", 0xFF3CB371),
    ("mediumslateblue", 0xFF7B68EE),
    ("mediumspringgreen", 0xFF00FA9A),
    ("mediumturquoise", 0xFF48D1CC),
    ("mediumvioletred", 0xFFC71585),
    ("midnightblue", 0xFF191970),
    ("mintcream", 0xFFF5FFFA),
    ("mistyrose", 0xFFFFE4E1),
    ("moccasin", 0xFFFFE4B5),
    ("navajowhite", 0xFFFFDEAD),
    ("navy", 0xFF000080),
    ("oldlace", 0xFFFDF5E6),
    ("olive", 0xFF808000),
    ("olivedrab", 0xFF6B8E23),
    ("orange", 0xFFFFA500),
    ("orangered", 0xFFFF4500),
    ("orchid", 0xFFDA70D6),
    ("palegoldenrod", 0xFFEEE8AA),
    ("palegreen", 0xFF98FB98),
    ("paleturquoise", 0xFFAFEEEE),
    ("palevioletred", 0xFFDB7093),
    ("papayawhip", 0xFFFFEFD5),
    ("peachpuff", 0xFFFFDAB9),
    ("peru", 0xFFCD853F),
    ("pink", 0xFFFFC0CB),
    ("plum", 0xFFDDA0DD),
    ("powderblue", 0xFFB0E0E6),
    ("purple", 0xFF800080),
    ("rebeccapurple", 0xFF663399),
    ("red", 0xFFFF0000),
    ("rosybrown", 0xFFBC8F8F),
    ("royalblue", 0xFF4169E1),
    ("saddlebrown", 0xFF8B4513),
    ("salmon", 0xFFFA8072),
    ("sandybrown", 0xFFF4A460),
    ("seagreen", 0xFF2E8B57),
    ("seashell", 0xFFFFF5EE),
    ("sienna", 0xFFA0522D),
    ("silver", 0xFFC0C0C0),
    ("skyblue", 0xFF87CEEB),
    ("slateblue", 0xFF6A5ACD),
    ("slategray", 0xFF708090),
    ("slategrey", 0xFF708090),
    ("snow", 0xFFFFFAFA),
    ("springgreen", 0xFF00FF7F),
    ("steelblue", 0xFF4682B4),
    ("tan", 0xFFD2B48C),
    ("teal", 0xFF008080),
    ("thistle", 0xFFD8BFD8),
    ("tomato", 0xFFFF6347),
    ("turquoise", 0xFF40E0D0),
    ("violet", 0xFFEE82EE),
    ("wheat", 0xFFF5DEB3),
    ("white", 0xFFFFFFFF),
    ("whitesmoke", 0xFFF5F5F5),
    ("yellow", 0xFFFFFF00),
    ("yellowgreen", 0xFF9ACD32),
];

#[cfg(test)]
mod tests {
    use super::*;

    // ── Hex ──────────────────────────────────────────────────────────

    #[test]
    fn six_digit_hex_is_opaque() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color(0xFFFF0000)));
        assert_eq!(Color::from_hex("#00ff7f"), Some(Color(0xFF00FF7F)));
    }

    #[test]
    fn eight_digit_hex_keeps_alpha() {
        assert_eq!(Color::from_hex("#FF0000FF"), Some(Color(0xFF0000FF)));
        assert_eq!(Color::from_hex("#80ffffff"), Some(Color(0x80FFFFFF)));
    }

    #[test]
    fn short_hex_expands_nibbles() {
        assert_eq!(Color::from_hex("#F00"), Some(Color(0xFFFF0000)));
        assert_eq!(Color::from_hex("#8F00"), Some(Color(0x88FF0000)));
    }

    #[test]
    fn bad_hex_lengths() {
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#1234567"), None);
        assert_eq!(Color::from_hex("FF0000"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
    }

    // ── Names and functions ──────────────────────────────────────────

    #[test]
    fn named_palette() {
        assert_eq!(Color::named("gray"), Some(Color(0xFF808080)));
        assert_eq!(Color::named("LightGrey"), Some(Color(0xFFD3D3D3)));
        assert_eq!(Color::named("red"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::named("notacolor"), None);
        assert_eq!(Color(0xFF808080).name(), Some("gray"));
    }

    #[test]
    fn rgb_functions() {
        assert_eq!("rgb(255, 0, 0)".parse::<Color>().unwrap(), Color(0xFFFF0000));
        assert_eq!("rgba(0,0,255,0.5)".parse::<Color>().unwrap(), Color(0x800000FF));
        assert_eq!("rgba(0,0,255,128)".parse::<Color>().unwrap(), Color(0x800000FF));
        assert_eq!("rgb(100%, 0%, 0%)".parse::<Color>().unwrap(), Color(0xFFFF0000));
        assert!("rgb(1,2)".parse::<Color>().is_err());
    }

    #[test]
    fn channels() {
        let c = Color(0x80112233);
        assert_eq!((c.alpha(), c.red(), c.green(), c.blue()), (0x80, 0x11, 0x22, 0x33));
    }

    #[test]
    fn display_is_eight_digit_hex() {
        assert_eq!(Color(0xFF0000FF).to_string(), "#FF0000FF");
        assert_eq!(Color::TRANSPARENT.to_string(), "#00000000");
    }

    // ── Serde ────────────────────────────────────────────────────────

    #[test]
    fn serde_forms() {
        assert_eq!(serde_json::to_string(&Color(0xFF808080)).unwrap(), "\"#FF808080\"");
        let c: Color = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(c, Color(0xFFFF0000));
        let c: Color = serde_json::from_str("4278190335").unwrap();
        assert_eq!(c, Color(0xFF0000FF));
    }
}
