//! One-shot calculations that never touch stored state.

use crate::OutputFormat;
use crate::app::parse_delta;
use crate::error::SpanError;
use crate::time::{self, ReferenceZone};
use crate::utils::display::format_minutes;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Lenient parse as a committed field would see it: parsed if possible,
/// otherwise the text as typed.
fn committed(raw: &str) -> String {
    time::smart_parse(raw).unwrap_or_else(|| raw.to_string())
}

#[derive(Debug, Serialize)]
struct ParseOutput<'a> {
    input: &'a str,
    canonical: Option<String>,
}

/// Print the canonical form of `input`. Nothing is printed in text mode
/// while the input is not parseable yet.
pub fn parse(input: &str, format: OutputFormat) -> Result<()> {
    let canonical = time::smart_parse(input);
    match format {
        OutputFormat::Json => print_json(&ParseOutput { input, canonical })?,
        OutputFormat::Text => {
            if let Some(canonical) = canonical {
                println!("{}", canonical);
            }
        }
    }
    Ok(())
}

pub fn format(input: &str, caret: Option<usize>, format: OutputFormat) -> Result<()> {
    let caret = caret.unwrap_or_else(|| input.chars().count());
    let edit = time::auto_format(input, caret);
    match format {
        OutputFormat::Json => print_json(&edit)?,
        OutputFormat::Text => println!("{}", edit.text),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct DiffOutput {
    start: String,
    end: String,
    minutes: u32,
    display: String,
}

pub fn diff(start: &str, end: &str, format: OutputFormat) -> Result<()> {
    let start = committed(start);
    let end = committed(end);

    if !time::is_valid_time12(&start) {
        return Err(SpanError::InvalidStart.into());
    }
    if !time::is_valid_time12(&end) {
        return Err(SpanError::InvalidEnd.into());
    }
    let minutes = time::difference(&start, &end).context("Cannot compute difference")?;

    match format {
        OutputFormat::Json => print_json(&DiffOutput {
            display: format_minutes(minutes),
            start,
            end,
            minutes,
        })?,
        OutputFormat::Text => println!("{}", format_minutes(minutes)),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct AddOutput {
    start: String,
    minutes: i64,
    end_time: String,
    end_at: String,
}

pub fn add(start: &str, minutes: &str, zone: &ReferenceZone, format: OutputFormat) -> Result<()> {
    let delta = parse_delta(minutes)
        .with_context(|| format!("Invalid minutes '{}', expected a non-negative number", minutes))?;
    let start = committed(start);
    let end_time = time::add_minutes(&start, delta).ok_or(SpanError::InvalidStart)?;

    let now = Utc::now();
    let end = time::to_time_of_day(&end_time).context("Computed an invalid end time")?;
    let end_at = zone.format_end_at(zone.today(now), end, now);

    match format {
        OutputFormat::Json => print_json(&AddOutput {
            start,
            minutes: delta,
            end_time,
            end_at,
        })?,
        OutputFormat::Text => {
            println!("{}", end_time);
            println!("End at: {}", end_at);
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ConvertOutput<'a> {
    input: &'a str,
    output: String,
}

/// Convert between `HH:MM AM|PM` and 24-hour `HH:MM`, whichever the input is.
pub fn convert(input: &str, format: OutputFormat) -> Result<()> {
    let trimmed = input.trim();
    let output = if time::is_valid_time12(trimmed) {
        time::to_24_hour(trimmed)
    } else if time::is_valid_time24(trimmed) {
        time::to_12_hour(trimmed)
    } else {
        return Err(SpanError::InvalidTime(input.to_string()).into());
    };

    match format {
        OutputFormat::Json => print_json(&ConvertOutput { input, output })?,
        OutputFormat::Text => println!("{}", output),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    input: &'a str,
    valid: bool,
}

/// Strict validity check, no lenient parsing. Invalid input is an error so
/// the exit status can be scripted against.
pub fn check(input: &str, format: OutputFormat) -> Result<()> {
    let valid = time::is_valid_time12(input);
    match format {
        OutputFormat::Json => print_json(&CheckOutput { input, valid })?,
        OutputFormat::Text if valid => println!("valid"),
        OutputFormat::Text => {}
    }
    if !valid {
        return Err(SpanError::InvalidTime(input.to_string()).into());
    }
    Ok(())
}
