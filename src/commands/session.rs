use crate::OutputFormat;
use crate::app::{AppState, Step, TimeField, View};
use crate::clipboard::Clipboard;
use crate::config::DefaultsConfig;
use crate::state::Store;
use crate::time::ReferenceZone;
use crate::utils::display::end_at_line;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use log::info;
use serde::Serialize;

/// Field targeted by the spinner commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Field {
    Start,
    End,
    AddMinutes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CopyTarget {
    /// The computed difference, as displayed
    Minutes,
    /// The "End at" date and time
    EndAt,
}

/// One load -> transition -> save -> render cycle over the persisted fields.
pub struct Session<S: Store> {
    store: S,
    zone: ReferenceZone,
    defaults: DefaultsConfig,
    now: DateTime<Utc>,
}

impl<S: Store> Session<S> {
    pub fn new(
        store: S,
        zone: ReferenceZone,
        defaults: DefaultsConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            store,
            zone,
            defaults,
            now,
        }
    }

    fn now_time12(&self) -> String {
        self.zone.time_of_day(self.now).to_time12()
    }

    /// Load stored fields, applying the first-run defaults when needed.
    pub fn open(&self) -> AppState {
        let saved = self.store.load();
        let boot = AppState::bootstrap(saved.as_ref(), &self.now_time12(), &self.defaults);
        if boot.fresh {
            self.store.save(&boot.state.to_persisted());
            info!("Time Span Calculator initialized with default values");
        } else {
            info!("Time Span Calculator loaded with saved data");
        }
        boot.state
    }

    /// Apply `transition`, persist the result and return what to render.
    pub fn run<F>(&self, transition: F) -> View
    where
        F: FnOnce(AppState) -> AppState,
    {
        let state = transition(self.open());
        self.store.save(&state.to_persisted());
        state.view(&self.zone, self.now)
    }

    pub fn show(&self) -> View {
        self.open().view(&self.zone, self.now)
    }

    /// Set a time field from typed text; `None` or `now` means the current time.
    pub fn set_time(&self, field: TimeField, raw: Option<&str>) -> View {
        let value = match raw {
            Some(raw) if !raw.trim().eq_ignore_ascii_case("now") => raw.to_string(),
            _ => self.now_time12(),
        };
        self.run(|state| state.set_time(field, &value))
    }

    pub fn step(&self, field: Field, step: Step) -> View {
        self.run(|state| match field {
            Field::Start => state.step(TimeField::Start, step),
            Field::End => state.step(TimeField::End, step),
            Field::AddMinutes => state.step_add_minutes(step),
        })
    }

    pub fn set_add_minutes(&self, raw: &str) -> View {
        self.run(|state| state.set_add_minutes(raw))
    }

    pub fn apply(&self) -> View {
        self.run(AppState::apply_add_minutes)
    }

    pub fn reset(&self) {
        self.store.clear();
    }
}

pub fn render(view: &View, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(view).context("Failed to serialize view")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("Start:   {}", view.start_time);
            println!("End:     {}", view.end_time);
            println!("Minutes: {}", view.minutes);
            println!("Add:     {}", view.add_minutes);
            println!("{}", end_at_line(view.end_at.as_deref()));
            if let Some(error) = &view.error {
                eprintln!("✗ {}", error);
            }
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct CopyOutcome<'a> {
    text: &'a str,
    copied: bool,
}

/// Copy part of the view. A failed copy is reported, not returned as an error.
pub fn copy(
    view: &View,
    target: CopyTarget,
    clipboard: &dyn Clipboard,
    format: OutputFormat,
) -> Result<()> {
    let text = match target {
        CopyTarget::Minutes => view.minutes.as_str(),
        CopyTarget::EndAt => view
            .end_at
            .as_deref()
            .context("Nothing to copy: end time cannot be computed")?,
    };

    let copied = clipboard.copy(text).is_ok();
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&CopyOutcome { text, copied })
                .context("Failed to serialize copy result")?;
            println!("{}", json);
        }
        OutputFormat::Text if copied => println!("✓ Copied: {}", text),
        OutputFormat::Text => eprintln!("✗ Could not copy to clipboard"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpanError;
    use crate::state::PersistedState;
    use chrono::TimeZone;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryStore {
        slot: RefCell<Option<PersistedState>>,
    }

    impl Store for &MemoryStore {
        fn save(&self, state: &PersistedState) {
            *self.slot.borrow_mut() = Some(state.clone());
        }

        fn load(&self) -> Option<PersistedState> {
            self.slot.borrow().clone().filter(PersistedState::has_times)
        }

        fn clear(&self) {
            if let Some(state) = self.slot.borrow_mut().as_mut() {
                state.start_time.clear();
                state.end_time.clear();
                state.minutes.clear();
            }
        }
    }

    struct RecordingClipboard {
        fail: bool,
        copied: RefCell<Vec<String>>,
    }

    impl Clipboard for RecordingClipboard {
        fn copy(&self, text: &str) -> Result<(), SpanError> {
            if self.fail {
                return Err(SpanError::Clipboard("denied".to_string()));
            }
            self.copied.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn session(store: &MemoryStore) -> Session<&MemoryStore> {
        // 15:05 UTC is 10:05 AM CDT
        let now = Utc.with_ymd_and_hms(2025, 10, 31, 15, 5, 0).unwrap();
        Session::new(store, ReferenceZone::default(), DefaultsConfig::default(), now)
    }

    #[test]
    fn test_first_open_writes_defaults() {
        let store = MemoryStore::default();
        let view = session(&store).show();

        assert_eq!(view.start_time, "10:05 AM");
        assert_eq!(view.end_time, "07:00 AM");
        assert_eq!(view.minutes, "1,255");
        assert_eq!(view.end_at.as_deref(), Some("10/31/2025 11:35 AM (CDT)"));

        let stored = store.slot.borrow().clone().unwrap();
        assert_eq!(stored.start_time, "10:05 AM");
        assert_eq!(stored.minutes, "1,255");
        assert_eq!(stored.add_minutes, "90");
    }

    #[test]
    fn test_transitions_persist() {
        let store = MemoryStore::default();
        let s = session(&store);

        s.set_time(TimeField::Start, Some("9"));
        s.set_time(TimeField::End, Some("530p"));
        let view = s.step(Field::End, Step::Up);
        assert_eq!(view.start_time, "09:00 AM");
        assert_eq!(view.end_time, "05:31 PM");
        assert_eq!(view.minutes, "511");

        let view = s.set_add_minutes("30");
        assert_eq!(view.end_at_time.as_deref(), Some("09:30 AM"));
        let view = s.apply();
        assert_eq!(view.end_time, "09:30 AM");
        assert_eq!(view.minutes, "30");

        let stored = store.slot.borrow().clone().unwrap();
        assert_eq!(stored.end_time, "09:30 AM");
        assert_eq!(stored.add_minutes, "30");
    }

    #[test]
    fn test_start_now() {
        let store = MemoryStore::default();
        let s = session(&store);
        s.set_time(TimeField::Start, Some("08:00 AM"));
        let view = s.set_time(TimeField::Start, Some("now"));
        assert_eq!(view.start_time, "10:05 AM");
    }

    #[test]
    fn test_reset_bootstraps_again() {
        let store = MemoryStore::default();
        let s = session(&store);
        s.set_time(TimeField::Start, Some("08:00 AM"));
        s.set_add_minutes("15");
        s.reset();

        let view = s.show();
        assert_eq!(view.start_time, "10:05 AM");
        assert_eq!(view.end_time, "07:00 AM");
        assert_eq!(view.add_minutes, "90");
    }

    #[test]
    fn test_copy_reports_without_failing() {
        let store = MemoryStore::default();
        let view = session(&store).show();

        let ok = RecordingClipboard {
            fail: false,
            copied: RefCell::new(Vec::new()),
        };
        copy(&view, CopyTarget::Minutes, &ok, OutputFormat::Text).unwrap();
        copy(&view, CopyTarget::EndAt, &ok, OutputFormat::Text).unwrap();
        assert_eq!(
            *ok.copied.borrow(),
            vec!["1,255".to_string(), "10/31/2025 11:35 AM (CDT)".to_string()]
        );

        let denied = RecordingClipboard {
            fail: true,
            copied: RefCell::new(Vec::new()),
        };
        assert!(copy(&view, CopyTarget::Minutes, &denied, OutputFormat::Text).is_ok());
    }
}
