//! The calculator's field state and the transitions applied to it.
//!
//! Every user action is a pure `AppState -> AppState` function. Rendering and
//! persistence happen afterwards, driven off the new state.

use crate::config::DefaultsConfig;
use crate::error::SpanError;
use crate::state::PersistedState;
use crate::time::{self, ReferenceZone};
use crate::utils::display::{ERROR_LABEL, format_minutes};
use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub start_time: String,
    pub end_time: String,
    /// Raw text of the add-minutes field.
    pub add_minutes: String,
}

/// Result of [`AppState::bootstrap`]. `fresh` means defaults were applied
/// and the state should be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    pub state: AppState,
    pub fresh: bool,
}

/// What a renderer shows for one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub start_time: String,
    pub end_time: String,
    pub add_minutes: String,
    /// Difference with thousands separators, or `Error`.
    pub minutes: String,
    pub error: Option<String>,
    /// Canonical start + add-minutes, if computable.
    pub end_at_time: Option<String>,
    /// `MM/DD/YYYY H:MM AM (TZ)` form of `end_at_time`.
    pub end_at: Option<String>,
}

fn looks_unset(start: &str) -> bool {
    start.is_empty()
        || start.eq_ignore_ascii_case("00:00 AM")
        || start.eq_ignore_ascii_case("0:00 AM")
}

/// Leading integer of `raw`, with an optional sign. Trailing junk is ignored.
fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }
    let value = digits
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));
    Some(if negative { -value } else { value })
}

/// Parse the add-minutes field. Empty, non-numeric and negative values
/// yield `None`.
pub fn parse_delta(raw: &str) -> Option<i64> {
    leading_int(raw).filter(|delta| *delta >= 0)
}

/// Lenient parse on commit; text the parser cannot read yet is kept as typed.
fn commit(raw: &str) -> String {
    time::smart_parse(raw).unwrap_or_else(|| raw.to_string())
}

impl AppState {
    pub fn new(start_time: &str, end_time: &str, add_minutes: &str) -> Self {
        Self {
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            add_minutes: add_minutes.to_string(),
        }
    }

    /// Rebuild the fields from storage at startup.
    ///
    /// A stored start of `""`, `00:00 AM` or `0:00 AM` counts as never set:
    /// start becomes `now`, end keeps the stored value unless it is empty
    /// or `00:00 AM`, and add-minutes goes back to its default.
    pub fn bootstrap(
        saved: Option<&PersistedState>,
        now: &str,
        defaults: &DefaultsConfig,
    ) -> Bootstrap {
        let saved_start = saved.map(|s| s.start_time.trim()).unwrap_or_default();
        let saved_end = saved.map(|s| s.end_time.trim()).unwrap_or_default();

        if !saved_start.is_empty() && !saved_end.is_empty() && !looks_unset(saved_start) {
            let add_minutes = saved
                .map(|s| s.add_minutes.trim())
                .filter(|a| !a.is_empty())
                .unwrap_or(defaults.add_minutes.as_str());
            return Bootstrap {
                state: AppState::new(saved_start, saved_end, add_minutes),
                fresh: false,
            };
        }

        let end_time = if saved_end.is_empty() || saved_end.eq_ignore_ascii_case("00:00 AM") {
            defaults.end_time.as_str()
        } else {
            saved_end
        };
        Bootstrap {
            state: AppState::new(now, end_time, &defaults.add_minutes),
            fresh: true,
        }
    }

    pub fn field(&self, field: TimeField) -> &str {
        match field {
            TimeField::Start => &self.start_time,
            TimeField::End => &self.end_time,
        }
    }

    fn with_field(mut self, field: TimeField, value: String) -> Self {
        match field {
            TimeField::Start => self.start_time = value,
            TimeField::End => self.end_time = value,
        }
        self
    }

    /// Commit typed text into a time field.
    pub fn set_time(self, field: TimeField, raw: &str) -> Self {
        let value = commit(raw);
        self.with_field(field, value)
    }

    /// Move a time field by one minute. Invalid fields are left alone.
    pub fn step(self, field: TimeField, step: Step) -> Self {
        let current = self.field(field);
        let next = match step {
            Step::Up => time::increment_by_one_minute(current),
            Step::Down => time::decrement_by_one_minute(current),
        };
        match next {
            Some(value) => self.with_field(field, value),
            None => self,
        }
    }

    pub fn set_add_minutes(mut self, raw: &str) -> Self {
        self.add_minutes = raw.to_string();
        self
    }

    /// Nudge the add-minutes amount. It never goes below zero.
    pub fn step_add_minutes(mut self, step: Step) -> Self {
        let current = leading_int(&self.add_minutes).unwrap_or(0);
        match step {
            Step::Up => self.add_minutes = current.saturating_add(1).to_string(),
            Step::Down if current > 0 => self.add_minutes = (current - 1).to_string(),
            Step::Down => {}
        }
        self
    }

    /// Copy start + add-minutes into the end field.
    pub fn apply_add_minutes(self) -> Self {
        match self.end_at_time() {
            Some(end) => self.with_field(TimeField::End, end),
            None => self,
        }
    }

    pub fn add_minutes_delta(&self) -> Option<i64> {
        parse_delta(&self.add_minutes)
    }

    /// Start time as the add-minutes calculation sees it: leniently parsed
    /// when possible, otherwise as typed.
    pub fn effective_start(&self) -> String {
        commit(&self.start_time)
    }

    pub fn end_at_time(&self) -> Option<String> {
        let delta = self.add_minutes_delta()?;
        time::add_minutes(&self.effective_start(), delta)
    }

    pub fn difference(&self) -> Result<u32, SpanError> {
        if !time::is_valid_time12(&self.start_time) {
            return Err(SpanError::InvalidStart);
        }
        if !time::is_valid_time12(&self.end_time) {
            return Err(SpanError::InvalidEnd);
        }
        time::difference(&self.start_time, &self.end_time).ok_or(SpanError::InvalidEnd)
    }

    pub fn minutes_text(&self) -> String {
        match self.difference() {
            Ok(minutes) => format_minutes(minutes),
            Err(_) => ERROR_LABEL.to_string(),
        }
    }

    pub fn view(&self, zone: &ReferenceZone, now: DateTime<Utc>) -> View {
        let difference = self.difference();
        if let Err(e) = &difference {
            warn!("Input error: {}", e);
        }

        let end_at_time = self.end_at_time();
        let end_at = end_at_time
            .as_deref()
            .and_then(time::to_time_of_day)
            .map(|end| zone.format_end_at(zone.today(now), end, now));

        View {
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            add_minutes: self.add_minutes.clone(),
            minutes: self.minutes_text(),
            error: difference.err().map(|e| e.to_string()),
            end_at_time,
            end_at,
        }
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            minutes: self.minutes_text(),
            add_minutes: self.add_minutes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn saved(start: &str, end: &str, add: &str) -> PersistedState {
        PersistedState {
            start_time: start.to_string(),
            end_time: end.to_string(),
            minutes: String::new(),
            add_minutes: add.to_string(),
        }
    }

    #[test]
    fn test_bootstrap_first_run_uses_defaults() {
        let boot = AppState::bootstrap(None, "10:05 AM", &DefaultsConfig::default());
        assert!(boot.fresh);
        assert_eq!(boot.state, AppState::new("10:05 AM", "07:00 AM", "90"));
    }

    #[test]
    fn test_bootstrap_restores_saved_fields() {
        let stored = saved(" 08:00 AM ", "04:30 PM", "45");
        let boot = AppState::bootstrap(Some(&stored), "10:05 AM", &DefaultsConfig::default());
        assert!(!boot.fresh);
        assert_eq!(boot.state, AppState::new("08:00 AM", "04:30 PM", "45"));
    }

    #[test]
    fn test_bootstrap_saved_without_add_minutes_gets_default() {
        let stored = saved("08:00 AM", "04:30 PM", "");
        let boot = AppState::bootstrap(Some(&stored), "10:05 AM", &DefaultsConfig::default());
        assert_eq!(boot.state.add_minutes, "90");
    }

    #[test]
    fn test_bootstrap_unset_start_keeps_saved_end() {
        for start in ["", "00:00 AM", "0:00 AM", "00:00 am"] {
            let stored = saved(start, "06:15 PM", "30");
            let boot = AppState::bootstrap(Some(&stored), "10:05 AM", &DefaultsConfig::default());
            assert!(boot.fresh, "start {:?} should count as unset", start);
            assert_eq!(boot.state, AppState::new("10:05 AM", "06:15 PM", "90"));
        }
    }

    #[test]
    fn test_bootstrap_midnight_end_replaced() {
        let stored = saved("00:00 AM", "00:00 AM", "");
        let boot = AppState::bootstrap(Some(&stored), "10:05 AM", &DefaultsConfig::default());
        assert_eq!(boot.state.end_time, "07:00 AM");
    }

    #[test]
    fn test_set_time_normalizes_or_keeps_raw() {
        let state = AppState::new("09:00 AM", "05:00 PM", "90")
            .set_time(TimeField::Start, "930")
            .set_time(TimeField::End, "1559");
        assert_eq!(state.start_time, "09:30 AM");
        assert_eq!(state.end_time, "03:59 PM");

        let state = state.set_time(TimeField::End, "??");
        assert_eq!(state.end_time, "??");
    }

    #[test]
    fn test_step_wraps_and_skips_invalid() {
        let state = AppState::new("11:59 PM", "12:00 AM", "")
            .step(TimeField::Start, Step::Up)
            .step(TimeField::End, Step::Down);
        assert_eq!(state.start_time, "12:00 AM");
        assert_eq!(state.end_time, "11:59 PM");

        let state = AppState::new("junk", "", "").step(TimeField::Start, Step::Up);
        assert_eq!(state.start_time, "junk");
    }

    #[test]
    fn test_add_minutes_steps_stop_at_zero() {
        let state = AppState::new("", "", "1")
            .step_add_minutes(Step::Down)
            .step_add_minutes(Step::Down);
        assert_eq!(state.add_minutes, "0");

        let state = AppState::new("", "", "").step_add_minutes(Step::Up);
        assert_eq!(state.add_minutes, "1");
    }

    #[test]
    fn test_parse_delta() {
        assert_eq!(parse_delta("90"), Some(90));
        assert_eq!(parse_delta(" 45min"), Some(45));
        assert_eq!(parse_delta("+5"), Some(5));
        assert_eq!(parse_delta("-0"), Some(0));
        assert_eq!(parse_delta("-5"), None);
        assert_eq!(parse_delta(""), None);
        assert_eq!(parse_delta("abc"), None);
    }

    #[test]
    fn test_apply_add_minutes_uses_lenient_start() {
        let state = AppState::new("930", "05:00 PM", "90").apply_add_minutes();
        assert_eq!(state.end_time, "11:00 AM");

        let state = AppState::new("09:30 AM", "05:00 PM", "-3").apply_add_minutes();
        assert_eq!(state.end_time, "05:00 PM");
    }

    #[test]
    fn test_difference_errors_name_the_field() {
        let state = AppState::new("bad", "05:00 PM", "");
        assert_eq!(state.difference(), Err(SpanError::InvalidStart));
        let state = AppState::new("09:00 AM", "bad", "");
        assert_eq!(state.difference(), Err(SpanError::InvalidEnd));
        assert_eq!(AppState::new("11:00 PM", "01:00 AM", "").difference(), Ok(120));
    }

    #[test]
    fn test_view_and_persisted() {
        let zone = ReferenceZone::default();
        let now = Utc.with_ymd_and_hms(2025, 10, 31, 15, 0, 0).unwrap();
        let state = AppState::new("09:59 AM", "10:00 AM", "90");

        let view = state.view(&zone, now);
        assert_eq!(view.minutes, "1");
        assert_eq!(view.error, None);
        assert_eq!(view.end_at_time.as_deref(), Some("11:29 AM"));
        assert_eq!(view.end_at.as_deref(), Some("10/31/2025 11:29 AM (CDT)"));

        let persisted = AppState::new("10:00 AM", "09:59 AM", "").to_persisted();
        assert_eq!(persisted.minutes, "1,439");
        assert_eq!(persisted.add_minutes, "");
    }

    #[test]
    fn test_view_reports_error_label() {
        let zone = ReferenceZone::default();
        let now = Utc.with_ymd_and_hms(2025, 10, 31, 15, 0, 0).unwrap();
        let view = AppState::new("09:00 AM", "13:00 AM", "").view(&zone, now);
        assert_eq!(view.minutes, "Error");
        assert_eq!(
            view.error.as_deref(),
            Some("Invalid end time format. Use: HH:MM AM/PM")
        );
        assert_eq!(view.end_at, None);
    }
}
