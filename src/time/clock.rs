//! Time-of-day values and the arithmetic on them.
//!
//! Every computation goes through [`TimeOfDay`], a count of minutes since
//! midnight kept in `[0, 1439]`. Strings only appear at the edges, in the
//! strict 12-hour `HH:MM AM|PM` form.

use crate::error::SpanError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: i64 = 24 * 60;

static TIME12_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(1[0-2]|0?[1-9]):([0-5][0-9])\s*([AP]M)$").expect("valid 12-hour regex")
});

static TIME24_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])$").expect("valid 24-hour regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Period {
    Am,
    Pm,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Am => "AM",
            Period::Pm => "PM",
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Period::Am => Period::Pm,
            Period::Pm => Period::Am,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AM" | "A" => Ok(Period::Am),
            "PM" | "P" => Ok(Period::Pm),
            _ => Err(SpanError::InvalidTime(s.to_string())),
        }
    }
}

/// Minutes since midnight, always in `[0, 1439]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const NOON: TimeOfDay = TimeOfDay(720);

    /// Reduce any minute count onto the clock face. Negative counts wrap
    /// backwards from midnight.
    pub fn from_minutes(total: i64) -> Self {
        TimeOfDay(total.rem_euclid(MINUTES_PER_DAY) as u16)
    }

    pub fn from_hm(hour24: u32, minute: u32) -> Option<Self> {
        if hour24 >= 24 || minute >= 60 {
            return None;
        }
        Some(TimeOfDay((hour24 * 60 + minute) as u16))
    }

    /// Parse a strict 12-hour string. 12 AM is midnight, 12 PM is noon.
    pub fn parse_12(s: &str) -> Option<Self> {
        let caps = TIME12_RE.captures(s)?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        let period: Period = caps[3].parse().ok()?;

        let hour24 = match (period, hour) {
            (Period::Am, 12) => 0,
            (Period::Am, h) => h,
            (Period::Pm, 12) => 12,
            (Period::Pm, h) => h + 12,
        };
        Self::from_hm(hour24, minute)
    }

    /// Parse a 24-hour `H:MM` / `HH:MM` string.
    pub fn parse_24(s: &str) -> Option<Self> {
        let caps = TIME24_RE.captures(s)?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        Self::from_hm(hour, minute)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0) / 60
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0) % 60
    }

    pub fn period(self) -> Period {
        if self.hour() >= 12 { Period::Pm } else { Period::Am }
    }

    /// Hour on a 12-hour dial: 0 and 12 both show as 12.
    pub fn hour12(self) -> u32 {
        match self.hour() % 12 {
            0 => 12,
            h => h,
        }
    }

    pub fn offset(self, delta: i64) -> Self {
        Self::from_minutes(i64::from(self.0) + delta.rem_euclid(MINUTES_PER_DAY))
    }

    /// Minutes from `self` forward to `end`, wrapping past midnight when
    /// `end` is earlier on the dial.
    pub fn minutes_until(self, end: TimeOfDay) -> u32 {
        let diff = i64::from(end.0) - i64::from(self.0);
        diff.rem_euclid(MINUTES_PER_DAY) as u32
    }

    pub fn to_time12(self) -> String {
        self.to_string()
    }

    pub fn to_time24(self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} {}",
            self.hour12(),
            self.minute(),
            self.period()
        )
    }
}

impl FromStr for TimeOfDay {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_12(s).ok_or_else(|| SpanError::InvalidTime(s.to_string()))
    }
}

pub fn is_valid_time12(s: &str) -> bool {
    TIME12_RE.is_match(s)
}

pub fn is_valid_time24(s: &str) -> bool {
    TIME24_RE.is_match(s)
}

/// `None` means the input was not a valid 12-hour string and callers should
/// leave whatever they hold untouched.
pub fn to_time_of_day(time12: &str) -> Option<TimeOfDay> {
    TimeOfDay::parse_12(time12)
}

pub fn from_time_of_day(t: TimeOfDay) -> String {
    t.to_time12()
}

/// Elapsed minutes from `start` to `end`, treating `end` as the same day or
/// the next one. Never negative.
pub fn difference(start: &str, end: &str) -> Option<u32> {
    let start = to_time_of_day(start)?;
    let end = to_time_of_day(end)?;
    Some(start.minutes_until(end))
}

pub fn add_minutes(start: &str, delta: i64) -> Option<String> {
    to_time_of_day(start).map(|t| t.offset(delta).to_time12())
}

pub fn increment_by_one_minute(time12: &str) -> Option<String> {
    add_minutes(time12, 1)
}

pub fn decrement_by_one_minute(time12: &str) -> Option<String> {
    add_minutes(time12, MINUTES_PER_DAY - 1)
}

/// Convert `HH:MM AM|PM` to `HH:MM` (24-hour). Invalid input is returned as is.
pub fn to_24_hour(time12: &str) -> String {
    match to_time_of_day(time12) {
        Some(t) => t.to_time24(),
        None => time12.to_string(),
    }
}

/// Convert `H:MM` (24-hour) to canonical 12-hour. Invalid input is returned as is.
pub fn to_12_hour(time24: &str) -> String {
    if !is_valid_time24(time24) {
        return time24.to_string();
    }
    match TimeOfDay::parse_24(time24) {
        Some(t) => t.to_time12(),
        None => time24.to_string(),
    }
}
