//! Conversions between second counts and the textual forms used by users,
//! the YouTube API and rendered responses.

use crate::utils::error::{AppError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Renders seconds as `H:MM:SS`, hours unpadded (`0:05:00`, `1:30:15`).
pub fn format_duration(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let secs = seconds.unsigned_abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Parses `HH:MM:SS`, `MM:SS` or a plain number of seconds.
pub fn parse_duration(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();

    let invalid = |reason: &str| AppError::InvalidDuration {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let numbers = parts
        .iter()
        .map(|p| p.trim().parse::<i64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| invalid("expected HH:MM:SS, MM:SS or seconds"))?;

    if numbers.iter().any(|n| *n < 0) {
        return Err(invalid("components must not be negative"));
    }

    let (h, m, s) = match numbers.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => (0, *m, *s),
        [s] => (0, 0, *s),
        _ => return Err(invalid("too many ':' separated components")),
    };

    h.checked_mul(3600)
        .and_then(|hours| m.checked_mul(60).and_then(|mins| hours.checked_add(mins)))
        .and_then(|total| total.checked_add(s))
        .ok_or_else(|| invalid("duration is too large"))
}

/// Parses a requested target: clock notation when it contains `:`,
/// otherwise a whole number of minutes.
pub fn parse_target(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidDuration {
            input: input.to_string(),
            reason: "duration is required".to_string(),
        });
    }

    if trimmed.contains(':') {
        return parse_duration(trimmed);
    }

    let minutes: i64 = trimmed.parse().map_err(|_| AppError::InvalidDuration {
        input: input.to_string(),
        reason: "expected minutes or HH:MM:SS".to_string(),
    })?;
    minutes
        .checked_mul(60)
        .ok_or_else(|| AppError::InvalidDuration {
            input: input.to_string(),
            reason: "duration is too large".to_string(),
        })
}

fn iso_component(unit: char) -> &'static Regex {
    static HOURS: OnceLock<Regex> = OnceLock::new();
    static MINUTES: OnceLock<Regex> = OnceLock::new();
    static SECONDS: OnceLock<Regex> = OnceLock::new();
    static DAYS: OnceLock<Regex> = OnceLock::new();

    let (cell, pattern) = match unit {
        'D' => (&DAYS, r"(\d+)D"),
        'H' => (&HOURS, r"(\d+)H"),
        'M' => (&MINUTES, r"(\d+)M"),
        _ => (&SECONDS, r"(\d+)S"),
    };
    cell.get_or_init(|| Regex::new(pattern).expect("static regex is valid"))
}

/// Parses YouTube `contentDetails.duration` values such as `PT1H30M15S`
/// or `P1DT2H`. Missing components count as zero.
pub fn parse_iso8601_duration(input: &str) -> i64 {
    let (date_part, time_part) = input.split_once('T').unwrap_or((input, ""));

    let component = |unit: char, part: &str| -> i64 {
        iso_component(unit)
            .captures(part)
            .and_then(|caps| caps[1].parse::<i64>().ok())
            .unwrap_or(0)
    };

    let days = component('D', date_part);
    [('H', 3600), ('M', 60), ('S', 1)]
        .iter()
        .fold(days.saturating_mul(86_400), |total, (unit, factor)| {
            total.saturating_add(component(*unit, time_part).saturating_mul(*factor))
        })
}
