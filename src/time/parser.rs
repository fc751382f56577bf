//! Lenient parsing of half-typed time input.
//!
//! Accepts things like `9`, `930`, `9:3`, `13:15`, `7p` and turns them into
//! the canonical `HH:MM AM|PM` form. The parser never fails loudly: when
//! there is nothing to interpret yet it returns `None` and the caller keeps
//! waiting for more input.

use super::clock::Period;
use log::trace;
use serde::Serialize;
use std::fmt;

/// A time recovered from raw input, already normalised to a 12-hour dial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedTime {
    pub hour: u32,
    pub minute: u32,
    pub period: Period,
}

impl fmt::Display for ParsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02} {}", self.hour, self.minute, self.period)
    }
}

/// Parse raw input into the canonical string, or `None` to defer.
pub fn smart_parse(input: &str) -> Option<String> {
    parse_parts(input).map(|parsed| parsed.to_string())
}

pub fn parse_parts(input: &str) -> Option<ParsedTime> {
    let cleaned = clean(input);
    if cleaned.is_empty() {
        return None;
    }

    let (body, period) = split_period(&cleaned);

    let parsed = match body.split_once(':') {
        Some((hour_part, rest)) => {
            let minute_part = rest.split(':').next().unwrap_or_default();
            let (hours, minutes) = colon_fields(hour_part, minute_part);
            normalize(hours, minutes, period)
        }
        None => {
            let digits: String = body.chars().filter(char::is_ascii_digit).collect();
            let (hours, minutes) = digit_fields(&digits)?;
            normalize(hours, minutes, period)
        }
    };

    trace!("parsed {:?} as {}", input, parsed);
    Some(parsed)
}

/// Uppercase and drop everything that is not a digit, colon, whitespace or
/// one of the letters of AM/PM.
pub(crate) fn clean(input: &str) -> String {
    input
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| {
            c.is_ascii_digit() || c.is_whitespace() || matches!(*c, ':' | 'A' | 'P' | 'M')
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Strip a trailing `AM`, `PM`, `A` or `P` from already-cleaned input.
pub(crate) fn split_period(cleaned: &str) -> (&str, Option<Period>) {
    let marker = |c: char| match c {
        'A' => Some(Period::Am),
        'P' => Some(Period::Pm),
        _ => None,
    };

    let mut chars = cleaned.chars().rev();
    let (cut, period) = match (chars.next(), chars.next()) {
        (Some('M'), Some(c)) => match marker(c) {
            Some(p) => (2, Some(p)),
            None => (0, None),
        },
        (Some(c), _) => match marker(c) {
            Some(p) => (1, Some(p)),
            None => (0, None),
        },
        (None, _) => (0, None),
    };

    // Markers are ASCII, so the byte cut lands on a char boundary.
    let body = cleaned[..cleaned.len() - cut].trim();
    (body, period)
}

fn number(digits: &str) -> u32 {
    digits
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')))
}

/// Hour and minute from the two sides of a colon. A lone minute digit is
/// the tens digit: `9:3` means 9:30.
fn colon_fields(hour_part: &str, minute_part: &str) -> (u32, u32) {
    let hours = number(hour_part);
    let minute_digits: String = minute_part.chars().filter(char::is_ascii_digit).collect();
    let minutes = match minute_digits.len() {
        0 => 0,
        1 => number(&minute_digits) * 10,
        _ => number(&minute_digits[..2]),
    };
    (hours, minutes)
}

/// Digit-count decision table for input typed without a colon.
///
/// | digits | hour        | minute      |
/// |--------|-------------|-------------|
/// | 0      | defer       |             |
/// | 1      | d           | 0           |
/// | 2      | dd if <= 12 | 0           |
/// | 2      | d[0]        | d[1]        |
/// | 3      | d[0]        | d[1..3]     |
/// | 4      | d[0..2]     | d[2..4]     |
/// | 5+     | d[0..2]     | d[2..4]     |
fn digit_fields(digits: &str) -> Option<(u32, u32)> {
    let fields = match digits.len() {
        0 => return None,
        1 => (number(digits), 0),
        2 => match number(digits) {
            n if n <= 12 => (n, 0),
            _ => (number(&digits[..1]), number(&digits[1..])),
        },
        3 => (number(&digits[..1]), number(&digits[1..])),
        _ => (number(&digits[..2]), number(&digits[2..4])),
    };
    Some(fields)
}

fn wrap12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

/// Fold hours onto a 12-hour dial, fill in a missing period, then carry
/// minutes of 60 or more into the hour.
fn normalize(hours: u32, minutes: u32, period: Option<Period>) -> ParsedTime {
    let (mut hour, mut period) = match hours {
        0 => (12, period.unwrap_or(Period::Am)),
        h if h > 12 => (wrap12(h), period.unwrap_or(Period::Pm)),
        h => (h, period.unwrap_or(Period::Am)),
    };

    let mut minute = minutes;
    if minute >= 60 {
        hour += minute / 60;
        minute %= 60;
        if hour > 12 {
            hour = wrap12(hour);
            period = period.flip();
        }
    }

    ParsedTime {
        hour,
        minute,
        period,
    }
}
