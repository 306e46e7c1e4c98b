//! Shift-improvement evaluation and optimal-shift search
//!
//! [`evaluate_shift`] scores a single candidate day-shift of one task
//! between a source (overloaded) week and a target (underloaded) week,
//! accounting for partial-week overlap. [`search_best_shift`] binary-
//! searches the shift distance in `[1, max_shift]`.

use chrono::{Duration, NaiveDate};
use loadshift_core::temporal::overlap_days;
use loadshift_core::{Task, WeekLoad};

use crate::deps::{can_shift, TaskIndex};

/// A task occurrence considered for shifting: the resolved task plus the
/// assignment's effort against it.
#[derive(Clone, Copy, Debug)]
pub struct CandidateTask<'a> {
    pub task: &'a Task,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Total effort of the assignment, in work-hours
    pub hours: f64,
}

impl CandidateTask<'_> {
    /// Inclusive calendar duration in days
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Outcome of evaluating one candidate shift
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShiftOutcome {
    /// Percentage-point drop in the source week's load (0 when invalid)
    pub improvement_pct: f64,
    /// Hours the shift removes from the source week
    pub hours_removed: f64,
    /// Hours the shift adds to the target week
    pub hours_added: f64,
    /// Whether the shift strictly lowers the source load without pushing
    /// the target above 100%
    pub valid: bool,
}

impl ShiftOutcome {
    fn invalid() -> Self {
        Self::default()
    }
}

/// Evaluate shifting a task by `shift_days`, removing hours from `source`
/// and adding them to `target`.
///
/// Pure and side-effect free: the week records are never mutated; the
/// caller applies a winning suggestion as advisory text only.
///
/// Degenerate cases are invalid by definition: a task that does not
/// overlap the source week was never loading it, and a shifted task that
/// misses the target week moves nothing there.
pub fn evaluate_shift(
    candidate: &CandidateTask<'_>,
    source: &WeekLoad,
    target: &WeekLoad,
    shift_days: i64,
) -> ShiftOutcome {
    let new_start = candidate.start + Duration::days(shift_days);
    let new_end = candidate.end + Duration::days(shift_days);

    let source_days = overlap_days(
        candidate.start,
        candidate.end,
        source.week.start,
        source.week.end,
    );
    if source_days == 0 {
        return ShiftOutcome::invalid();
    }

    let task_days = candidate.duration_days();
    if task_days <= 0 {
        return ShiftOutcome::invalid();
    }
    let hours_removed = candidate.hours * source_days as f64 / task_days as f64;

    let target_days = overlap_days(new_start, new_end, target.week.start, target.week.end);
    if target_days == 0 {
        return ShiftOutcome::invalid();
    }
    let hours_added = candidate.hours * target_days as f64 / task_days as f64;

    let new_source_pct = if source.capacity > 0.0 {
        (source.hours - hours_removed) / source.capacity * 100.0
    } else {
        0.0
    };
    let new_target_pct = if target.capacity > 0.0 {
        (target.hours + hours_added) / target.capacity * 100.0
    } else {
        0.0
    };

    let valid = new_source_pct < source.percentage && new_target_pct <= 100.0;
    ShiftOutcome {
        improvement_pct: if valid {
            source.percentage - new_source_pct
        } else {
            0.0
        },
        hours_removed,
        hours_added,
        valid,
    }
}

/// Binary-search the shift distance in `[1, max_shift]` that maximizes the
/// source week's load reduction for one (task, target week) pair.
///
/// Two regimes:
/// - the maximum shift already violates dependencies → search for the
///   largest shift that is both dependency-valid and improvement-valid;
/// - dependencies hold at the maximum → search on improvement alone,
///   comparing `evaluate(mid + 1)` against `evaluate(mid)` to pick a
///   direction. Assumes improvement is unimodal in shift distance; week
///   boundaries can break that, so plateaus and multi-peak shapes resolve
///   best-effort rather than exactly.
///
/// Returns `(None, 0.0)` when no feasible improving shift exists, when the
/// target index is out of bounds, or when it equals the source index.
pub fn search_best_shift(
    candidate: &CandidateTask<'_>,
    weekly_loads: &[WeekLoad],
    week_idx: usize,
    target_week_idx: usize,
    max_shift: i64,
    index: &TaskIndex<'_>,
) -> (Option<i64>, f64) {
    if target_week_idx >= weekly_loads.len() || target_week_idx == week_idx {
        return (None, 0.0);
    }
    let source = &weekly_loads[week_idx];
    let target = &weekly_loads[target_week_idx];

    let max_start = candidate.start + Duration::days(max_shift);
    let (max_shift_valid, _) = can_shift(&candidate.task.id, max_start, index);

    let mut best_shift = None;
    let mut best_improvement = 0.0;

    if !max_shift_valid {
        // Dependencies cut off the far end: find the largest shift that
        // clears them and still improves.
        let (mut left, mut right) = (1, max_shift);
        while left <= right {
            let mid = left + (right - left) / 2;
            let new_start = candidate.start + Duration::days(mid);
            let (dep_ok, _) = can_shift(&candidate.task.id, new_start, index);
            let outcome = evaluate_shift(candidate, source, target, mid);

            if dep_ok && outcome.valid && outcome.improvement_pct > best_improvement {
                best_shift = Some(mid);
                best_improvement = outcome.improvement_pct;
                left = mid + 1;
            } else {
                right = mid - 1;
            }
        }
        return (best_shift, best_improvement);
    }

    let (mut left, mut right) = (1, max_shift);
    while left <= right {
        let mid = left + (right - left) / 2;
        let outcome = evaluate_shift(candidate, source, target, mid);

        if outcome.valid && outcome.improvement_pct > best_improvement {
            best_shift = Some(mid);
            best_improvement = outcome.improvement_pct;
        }

        if mid >= max_shift {
            break;
        }
        let next = evaluate_shift(candidate, source, target, mid + 1);
        if next.valid && next.improvement_pct > outcome.improvement_pct {
            left = mid + 1;
        } else {
            right = mid - 1;
        }
    }

    (best_shift, best_improvement)
}
