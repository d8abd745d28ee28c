//! Four-sided bounds (margin, padding, cell padding) and integer ranges.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValueParseError;
use crate::value::size::Size;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Four independently-typed sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    pub top: Size,
    pub right: Size,
    pub bottom: Size,
    pub left: Size,
}

impl Bounds {
    /// Field names, in source order.
    pub const FIELDS: [&'static str; 4] = ["top", "right", "bottom", "left"];

    /// The same size on all four sides.
    pub fn all(size: Size) -> Self {
        Self {
            top: size,
            right: size,
            bottom: size,
            left: size,
        }
    }

    /// Vertical (top/bottom) and horizontal (left/right) sizes.
    pub fn symmetric(vertical: Size, horizontal: Size) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// CSS shorthand semantics for one to four sizes.
    ///
    /// - 1: all sides
    /// - 2: vertical, horizontal
    /// - 3: top, horizontal, bottom
    /// - 4: top, right, bottom, left
    pub fn from_shorthand(sizes: &[Size]) -> Option<Self> {
        match *sizes {
            [all] => Some(Self::all(all)),
            [v, h] => Some(Self::symmetric(v, h)),
            [top, h, bottom] => Some(Self {
                top,
                right: h,
                bottom,
                left: h,
            }),
            [top, right, bottom, left] => Some(Self {
                top,
                right,
                bottom,
                left,
            }),
            _ => None,
        }
    }

    /// Read a side by field name.
    pub fn side(&self, name: &str) -> Option<Size> {
        match name {
            "top" => Some(self.top),
            "right" => Some(self.right),
            "bottom" => Some(self.bottom),
            "left" => Some(self.left),
            _ => None,
        }
    }

    /// Mutable access to a side by field name.
    pub fn side_mut(&mut self, name: &str) -> Option<&mut Size> {
        match name {
            "top" => Some(&mut self.top),
            "right" => Some(&mut self.right),
            "bottom" => Some(&mut self.bottom),
            "left" => Some(&mut self.left),
            _ => None,
        }
    }

    /// Whether all four sides are equal.
    pub fn is_uniform(&self) -> bool {
        self.top == self.right && self.top == self.bottom && self.top == self.left
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// Inclusive integer range, used for grid row/column spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    pub first: i64,
    pub last: i64,
}

impl Range {
    pub const fn new(first: i64, last: i64) -> Self {
        Self { first, last }
    }

    /// The single-cell range `(n, n)`.
    pub const fn single(n: i64) -> Self {
        Self { first: n, last: n }
    }

    /// Number of cells spanned; zero when `last < first`.
    pub fn span(&self) -> u64 {
        if self.last < self.first {
            0
        } else {
            self.last.abs_diff(self.first) + 1
        }
    }
}

impl From<i64> for Range {
    fn from(n: i64) -> Self {
        Range::single(n)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}:{}", self.first, self.last)
        }
    }
}

impl FromStr for Range {
    type Err = ValueParseError;

    /// Accepts `"n"` and `"first:last"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ValueParseError::new("range", s);
        match s.split_once(':') {
            Some((a, b)) => {
                let first = a.trim().parse().map_err(|_| err())?;
                let last = b.trim().parse().map_err(|_| err())?;
                Ok(Range::new(first, last))
            }
            None => s.trim().parse().map(Range::single).map_err(|_| err()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_counts() {
        let a = Size::px(1.0);
        let b = Size::px(2.0);
        let c = Size::px(3.0);
        let d = Size::px(4.0);
        assert_eq!(Bounds::from_shorthand(&[a]), Some(Bounds::all(a)));
        assert_eq!(Bounds::from_shorthand(&[a, b]), Some(Bounds::symmetric(a, b)));
        assert_eq!(
            Bounds::from_shorthand(&[a, b, c]),
            Some(Bounds { top: a, right: b, bottom: c, left: b })
        );
        assert_eq!(
            Bounds::from_shorthand(&[a, b, c, d]),
            Some(Bounds { top: a, right: b, bottom: c, left: d })
        );
        assert_eq!(Bounds::from_shorthand(&[]), None);
        assert_eq!(Bounds::from_shorthand(&[a, b, c, d, a]), None);
    }

    #[test]
    fn side_access() {
        let mut b = Bounds::all(Size::px(1.0));
        *b.side_mut("left").unwrap() = Size::percent(5.0);
        assert_eq!(b.side("left"), Some(Size::percent(5.0)));
        assert_eq!(b.side("middle"), None);
        assert!(!b.is_uniform());
    }

    #[test]
    fn range_parse() {
        assert_eq!("0:1".parse::<Range>().unwrap(), Range::new(0, 1));
        assert_eq!("3".parse::<Range>().unwrap(), Range::single(3));
        assert_eq!("-1 : 2".parse::<Range>().unwrap(), Range::new(-1, 2));
        assert!("a:b".parse::<Range>().is_err());
    }

    #[test]
    fn range_display() {
        assert_eq!(Range::single(2).to_string(), "2");
        assert_eq!(Range::new(0, 1).to_string(), "0:1");
    }

    #[test]
    fn range_span() {
        assert_eq!(Range::single(4).span(), 1);
        assert_eq!(Range::new(1, 3).span(), 3);
        assert_eq!(Range::new(3, 1).span(), 0);
    }
}
