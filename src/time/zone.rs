//! The fixed civil timezone used for "now" and for the timezone label.
//!
//! Arithmetic never looks at the zone. It only decides what the current
//! wall-clock time is and which abbreviation (CDT/CST, ...) gets printed.

use super::clock::TimeOfDay;
use crate::error::SpanError;
use chrono::{DateTime, Datelike, LocalResult, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: &str = "America/Chicago";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceZone {
    tz: Tz,
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self {
            tz: chrono_tz::America::Chicago,
        }
    }
}

impl ReferenceZone {
    pub fn new(name: &str) -> Result<Self, SpanError> {
        let tz: Tz = name
            .parse()
            .map_err(|_| SpanError::UnknownTimezone(name.to_string()))?;
        Ok(Self { tz })
    }

    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }

    pub fn time_of_day(&self, instant: DateTime<Utc>) -> TimeOfDay {
        let local = self.local(instant);
        TimeOfDay::from_minutes(i64::from(local.hour() * 60 + local.minute()))
    }

    pub fn today(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local(instant).date_naive()
    }

    pub fn abbreviation(&self, instant: DateTime<Utc>) -> String {
        self.local(instant).format("%Z").to_string()
    }

    /// `MM/DD/YYYY H:MM AM (TZ)` for `time` on `date`. The label follows
    /// daylight saving at that moment; a wall time skipped by a DST jump
    /// falls back to the label at `now`.
    pub fn format_end_at(&self, date: NaiveDate, time: TimeOfDay, now: DateTime<Utc>) -> String {
        let abbreviation = date
            .and_hms_opt(time.hour(), time.minute(), 0)
            .map(|naive| match self.tz.from_local_datetime(&naive) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                    dt.format("%Z").to_string()
                }
                LocalResult::None => self.abbreviation(now),
            })
            .unwrap_or_else(|| self.abbreviation(now));

        format!(
            "{:02}/{:02}/{} {}:{:02} {} ({})",
            date.month(),
            date.day(),
            date.year(),
            time.hour12(),
            time.minute(),
            time.period(),
            abbreviation
        )
    }
}
