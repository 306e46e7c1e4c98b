//! Workload aggregation
//!
//! Computes, per resource, the work-hours demanded against available
//! capacity — as a single window total and as a weekly time series.
//! Everything here is a pure function of the project snapshot; derived
//! records are rebuilt from scratch on every call.

use chrono::{Duration, NaiveDate};
use loadshift_core::temporal::{
    self, available_work_hours, DEFAULT_WINDOW_HOURS, HOURS_PER_WEEK,
};
use loadshift_core::{Assignment, Project, TaskEffort, WeekBucket, WeekLoad, WorkloadRecord};
use std::collections::HashMap;

/// The analysis window: the explicit range when given, otherwise the span
/// of the project's dated tasks. `None` when neither is available.
pub fn effective_range(
    project: &Project,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Option<(NaiveDate, NaiveDate)> {
    range.or_else(|| project.date_range())
}

/// Aggregate demanded hours, capacity and utilization per resource.
///
/// Assignments resolve to tasks via the (name, start, finish) tuple;
/// unresolved assignments are skipped and counted nowhere (see
/// [`unmatched_assignments`] for the observability hook). A resolved task
/// with both dates is prorated by its overlap with the window; a task
/// without dates — or an undefined window — contributes its full hours.
///
/// Resources without assignments still produce a zero-hour record, and the
/// output preserves roster order.
pub fn aggregate(project: &Project, range: Option<(NaiveDate, NaiveDate)>) -> Vec<WorkloadRecord> {
    let window = effective_range(project, range);
    let available_base = available_work_hours(
        window.map(|(start, _)| start),
        window.map(|(_, end)| end),
        DEFAULT_WINDOW_HOURS,
    );

    project
        .resources
        .iter()
        .map(|resource| {
            let mut total_work_hours = 0.0;
            let mut tasks = Vec::new();

            for assignment in assignments_for(project, &resource.name) {
                let Some(task) = project.resolve_task(assignment) else {
                    continue;
                };

                let hours = match (task.start, task.finish, window) {
                    (Some(task_start), Some(task_finish), Some((range_start, range_end))) => {
                        let (_, proportion) =
                            temporal::overlap(task_start, task_finish, range_start, range_end);
                        assignment.work_hours * proportion
                    }
                    _ => assignment.work_hours,
                };

                total_work_hours += hours;
                tasks.push(TaskEffort {
                    task_name: task.name.clone(),
                    work_hours: hours,
                    start: task.start,
                    finish: task.finish,
                });
            }

            let max_capacity_hours = available_base * resource.max_units;
            let workload_percentage = if max_capacity_hours > 0.0 {
                total_work_hours / max_capacity_hours * 100.0
            } else {
                0.0
            };

            WorkloadRecord {
                resource_name: resource.name.clone(),
                total_work_hours,
                max_capacity_hours,
                workload_percentage,
                task_count: tasks.len(),
                tasks,
            }
        })
        .collect()
}

/// Contiguous, non-overlapping 7-day buckets covering `[start, end]`.
///
/// The last bucket is clipped to `end` when the range is not a whole
/// number of weeks.
pub fn week_buckets(range_start: NaiveDate, range_end: NaiveDate) -> Vec<WeekBucket> {
    let mut buckets = Vec::new();
    let mut current = range_start;
    while current <= range_end {
        let week_end = current + Duration::days(6);
        buckets.push(WeekBucket::new(current, week_end.min(range_end)));
        current = week_end + Duration::days(1);
    }
    buckets
}

/// Weekly load series per resource over the effective range.
///
/// Each bucket accumulates `task_hours × bucket_overlap / task_duration`
/// for every resolved, dated assignment. Weekly capacity is the constant
/// `40 × max_units` even for clipped edge buckets — the boundary weeks are
/// measured against a nominal full week on purpose; do not "fix" this to
/// the bucket's actual span.
///
/// Returns an empty map when no range can be determined.
pub fn weekly_timeline(
    project: &Project,
    range: Option<(NaiveDate, NaiveDate)>,
) -> HashMap<String, Vec<WeekLoad>> {
    let Some((range_start, range_end)) = effective_range(project, range) else {
        return HashMap::new();
    };
    let buckets = week_buckets(range_start, range_end);

    let mut timeline = HashMap::new();
    for resource in &project.resources {
        let capacity = HOURS_PER_WEEK * resource.max_units;
        let mut loads: Vec<WeekLoad> = buckets
            .iter()
            .map(|bucket| WeekLoad {
                week: bucket.clone(),
                hours: 0.0,
                capacity,
                percentage: 0.0,
            })
            .collect();

        for assignment in assignments_for(project, &resource.name) {
            let Some(task) = project.resolve_task(assignment) else {
                continue;
            };
            let (Some(task_start), Some(task_finish)) = (task.start, task.finish) else {
                continue;
            };
            let Some(task_days) = task.duration_days() else {
                continue;
            };

            for load in &mut loads {
                let days = temporal::overlap_days(
                    task_start,
                    task_finish,
                    load.week.start,
                    load.week.end,
                );
                if days > 0 {
                    load.hours += assignment.work_hours * days as f64 / task_days as f64;
                }
            }
        }

        for load in &mut loads {
            load.percentage = if load.capacity > 0.0 {
                load.hours / load.capacity * 100.0
            } else {
                0.0
            };
        }

        timeline.insert(resource.name.clone(), loads);
    }

    timeline
}

/// Assignments the aggregation will drop: unknown resource name or a task
/// key that resolves to nothing. Surfaced so the ingestion boundary can
/// log the count; the aggregation itself stays silent.
pub fn unmatched_assignments(project: &Project) -> Vec<&Assignment> {
    project
        .assignments
        .iter()
        .filter(|a| {
            project.get_resource(&a.resource_name).is_none() || project.resolve_task(a).is_none()
        })
        .collect()
}

fn assignments_for<'a>(
    project: &'a Project,
    resource_name: &'a str,
) -> impl Iterator<Item = &'a Assignment> {
    project
        .assignments
        .iter()
        .filter(move |a| a.resource_name == resource_name)
}
