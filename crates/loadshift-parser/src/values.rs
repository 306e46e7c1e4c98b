//! Scalar field parsing
//!
//! MSPDI carries dates as ISO timestamps and effort as ISO-8601 durations.
//! Both parsers are total: anything unreadable becomes "absent" (dates) or
//! zero (durations), matching the analysis core's error model.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse an MSPDI date field to a calendar date.
///
/// Accepted: RFC 3339 with offset, `%Y-%m-%dT%H:%M:%S` (optional trailing
/// `Z`), `%Y-%m-%d %H:%M:%S`, bare `%Y-%m-%d`. Anything else → `None`
/// (the task is treated as unscheduled).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    let bare = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(bare, fmt) {
            return Some(dt.date());
        }
    }

    NaiveDate::parse_from_str(bare, "%Y-%m-%d").ok()
}

/// Parse an MSPDI work field (ISO-8601 duration subset) to hours.
///
/// `P[nD][T[nH][nM][nS]]` with days counted as 8-hour workdays:
/// `PT8H0M0S` → 8, `P2DT4H30M0S` → 20.5, `P1D` → 8. A non-`P` value is
/// read as a bare number of hours. Malformed input parses to 0, never an
/// error.
pub fn parse_work_hours(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let Some(body) = trimmed.strip_prefix('P') else {
        return trimmed.parse().unwrap_or(0.0);
    };

    let (date_part, time_part) = match body.split_once('T') {
        Some((date, time)) => (date, time),
        None => (body, ""),
    };

    let mut hours = 0.0;
    if let Some(days) = date_part.strip_suffix('D') {
        hours += days.parse::<f64>().unwrap_or(0.0) * 8.0;
    }

    let mut number = String::new();
    for c in time_part.chars() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
            continue;
        }
        let value: f64 = number.parse().unwrap_or(0.0);
        number.clear();
        match c {
            'H' => hours += value,
            'M' => hours += value / 60.0,
            'S' => hours += value / 3600.0,
            _ => {}
        }
    }

    hours
}

/// Parse an MSPDI MaxUnits field; malformed or absent values fall back to
/// full time.
pub fn parse_max_units(input: Option<&str>) -> f64 {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .unwrap_or(1.0)
}
