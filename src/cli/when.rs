//! Parsing of points in time given on the command line
//!
//! Accepted forms:
//! - `2026-05-04` (end of that day, 23:59:59)
//! - `2026-05-04 17:30`, `2026-05-04 17:30:00`
//! - `2026-05-04T17:30`, `2026-05-04T17:30:00`
//! - relative to now: `+90m`, `+12h`, `+3d`, `+2w`

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a point in time; relative forms are offsets from `now`
pub fn parse_when(input: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let input = input.trim();

    if let Some(offset) = input.strip_prefix('+') {
        return now
            .checked_add_signed(parse_offset(offset)?)
            .with_context(|| format!("Relative time '{}' is out of range", input));
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(parsed);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(end_of_day) = date.and_hms_opt(23, 59, 59) {
            return Ok(end_of_day);
        }
    }

    bail!(
        "Invalid time '{}': expected YYYY-MM-DD, YYYY-MM-DD HH:MM or +N[m|h|d|w]",
        input
    )
}

/// Resolves the `--now` option, falling back to the local clock
pub fn resolve_now(pinned: Option<&str>) -> Result<NaiveDateTime> {
    let clock = Local::now().naive_local();
    match pinned {
        Some(value) => parse_when(value, clock).context("Invalid --now value"),
        None => Ok(clock),
    }
}

fn parse_offset(offset: &str) -> Result<Duration> {
    let unit_at = offset
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(offset.len());
    let (amount, unit) = offset.split_at(unit_at);

    let amount: i64 = amount
        .parse()
        .with_context(|| format!("Invalid relative time '+{}'", offset))?;

    let duration = match unit {
        "m" => Duration::try_minutes(amount),
        "h" | "" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        "w" => Duration::try_weeks(amount),
        other => bail!("Unknown time unit '{}': use m, h, d or w", other),
    };

    duration.with_context(|| format!("Relative time '+{}' is out of range", offset))
}
