//! Calendar dates and times of day, as held by date/time pickers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueParseError;

// ---------------------------------------------------------------------------
// Date
// ---------------------------------------------------------------------------

/// A proleptic Gregorian date. Always valid once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
}

impl Date {
    /// Validate and build a date.
    pub fn new(year: i32, month: u8, day: u8) -> Option<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

impl Default for Date {
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for Date {
    type Err = ValueParseError;

    /// Accepts `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ValueParseError::new("date", s);
        let mut parts = s.trim().splitn(3, '-');
        let year = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let month = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let day = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        Date::new(year, month, day).ok_or_else(err)
    }
}

impl From<Date> for String {
    fn from(date: Date) -> String {
        date.to_string()
    }
}

impl TryFrom<String> for Date {
    type Error = ValueParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

// ---------------------------------------------------------------------------
// TimeOfDay
// ---------------------------------------------------------------------------

/// A wall-clock time with second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self {
            hour,
            minute,
            second,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl FromStr for TimeOfDay {
    type Err = ValueParseError;

    /// Accepts `HH:MM` and `HH:MM:SS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ValueParseError::new("time", s);
        let parts: Vec<&str> = s.trim().split(':').collect();
        let field = |i: usize| -> Result<u8, ValueParseError> {
            parts.get(i).and_then(|p| p.parse().ok()).ok_or_else(err)
        };
        let (hour, minute, second) = match parts.len() {
            2 => (field(0)?, field(1)?, 0),
            3 => (field(0)?, field(1)?, field(2)?),
            _ => return Err(err()),
        };
        TimeOfDay::new(hour, minute, second).ok_or_else(err)
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> String {
        time.to_string()
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValueParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_validation() {
        assert!(Date::new(2024, 2, 29).is_some());
        assert!(Date::new(2023, 2, 29).is_none());
        assert!(Date::new(1900, 2, 29).is_none());
        assert!(Date::new(2000, 2, 29).is_some());
        assert!(Date::new(2024, 13, 1).is_none());
        assert!(Date::new(2024, 4, 31).is_none());
    }

    #[test]
    fn date_text() {
        let d: Date = "2024-01-31".parse().unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 1, 31));
        assert_eq!(d.to_string(), "2024-01-31");
        assert!("2024/01/31".parse::<Date>().is_err());
    }

    #[test]
    fn time_text() {
        let t: TimeOfDay = "09:05".parse().unwrap();
        assert_eq!(t, TimeOfDay::new(9, 5, 0).unwrap());
        assert_eq!(t.to_string(), "09:05:00");
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn serde_as_text() {
        let d = Date::new(2020, 5, 17).unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2020-05-17\"");
        let t: TimeOfDay = serde_json::from_str("\"23:59:59\"").unwrap();
        assert_eq!(t.hour(), 23);
    }
}
