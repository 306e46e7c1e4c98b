//! Temporal overlap and capacity utilities
//!
//! Pure date arithmetic shared by the aggregator and the optimizer. All
//! ranges are inclusive of both bounds and computed at day granularity.

use chrono::{Datelike, NaiveDate, Weekday};

/// Nominal working hours per business day
pub const HOURS_PER_DAY: f64 = 8.0;

/// Nominal working hours per 5-day week
pub const HOURS_PER_WEEK: f64 = 40.0;

/// Fallback window capacity when no dates are known (4 weeks × 40 h)
pub const DEFAULT_WINDOW_HOURS: f64 = 160.0;

/// Count weekdays (Mon–Fri) in `[start, end]` inclusive.
///
/// Returns 0 if either bound is absent or `end < start`.
pub fn business_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> i64 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0;
    };
    if end < start {
        return 0;
    }

    let mut count = 0;
    let mut current = start;
    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
        current = match current.succ_opt() {
            Some(d) => d,
            None => break,
        };
    }
    count
}

/// Working capacity of one full-time person over `business_days` days.
pub fn work_capacity_hours(business_days: i64) -> f64 {
    business_days as f64 * HOURS_PER_DAY
}

/// Available work-hours in a calendar range.
///
/// Uses the MS Project approximation: 5/7 of calendar days are workdays,
/// 8 hours each, with a floor of one nominal working day (8 h) whenever
/// both bounds are present. Either bound absent → `default_hours`.
pub fn available_work_hours(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    default_hours: f64,
) -> f64 {
    let (Some(start), Some(end)) = (start, end) else {
        return default_hours;
    };

    let calendar_days = (end - start).num_days() + 1;
    if calendar_days <= 0 {
        return HOURS_PER_DAY;
    }

    let workdays = calendar_days as f64 * (5.0 / 7.0);
    (workdays * HOURS_PER_DAY).max(HOURS_PER_DAY)
}

/// Inclusive day-count of the intersection of `[a_start, a_end]` and
/// `[b_start, b_end]`; 0 when disjoint.
pub fn overlap_days(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> i64 {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if start > end {
        return 0;
    }
    (end - start).num_days() + 1
}

/// Overlap of a task interval with an analysis range.
///
/// Returns `(overlap_days, proportion)` where the proportion is the share
/// of the task's total calendar duration falling inside the range, clamped
/// to `[0, 1]`. Disjoint intervals yield `(0, 0.0)`.
pub fn overlap(
    task_start: NaiveDate,
    task_end: NaiveDate,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> (i64, f64) {
    let days = overlap_days(task_start, task_end, range_start, range_end);
    if days == 0 {
        return (0, 0.0);
    }

    let task_total_days = (task_end - task_start).num_days() + 1;
    if task_total_days <= 0 {
        return (days, 0.0);
    }

    let proportion = (days as f64 / task_total_days as f64).clamp(0.0, 1.0);
    (days, proportion)
}
