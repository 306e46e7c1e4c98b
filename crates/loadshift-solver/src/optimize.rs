//! Multi-resource optimization driver
//!
//! Walks each resource's weekly timeline, ranks the tasks loading each
//! overloaded week by impact, and recommends the best dependency-valid
//! date-shift into an underloaded week. Greedy and local by design: one
//! (task, target-week) pair at a time, no global re-optimization.

use chrono::{Duration, NaiveDate};
use loadshift_core::temporal::overlap_days;
use loadshift_core::{
    OptimizeMode, OptimizeSettings, Priority, Project, Resource, ShiftSuggestion, WeekLoad,
};
use rayon::prelude::*;
use std::collections::HashMap;

use crate::aggregate::weekly_timeline;
use crate::deps::{can_shift, task_index, TaskIndex};
use crate::shift::{evaluate_shift, search_best_shift, CandidateTask};

/// Produce shift suggestions for every overloaded resource week.
///
/// Resources are evaluated independently (in parallel) and the results are
/// flattened in roster order, so the output is deterministic for a given
/// snapshot. When no analysis range can be determined the pass yields no
/// suggestions; an empty result is a valid "nothing to do" state.
pub fn optimize(
    project: &Project,
    settings: &OptimizeSettings,
    range: Option<(NaiveDate, NaiveDate)>,
    selected_resources: Option<&[String]>,
) -> Vec<ShiftSuggestion> {
    let timeline = weekly_timeline(project, range);
    if timeline.is_empty() {
        return Vec::new();
    }
    let index = task_index(&project.tasks);

    project
        .resources
        .par_iter()
        .map(|resource| {
            if excluded(resource, selected_resources) {
                return Vec::new();
            }
            match timeline.get(&resource.name) {
                Some(loads) => optimize_resource(project, resource, loads, settings, &index),
                None => Vec::new(),
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

fn excluded(resource: &Resource, selected: Option<&[String]>) -> bool {
    match selected {
        Some(names) if !names.is_empty() => !names.iter().any(|n| n == &resource.name),
        _ => false,
    }
}

fn optimize_resource(
    project: &Project,
    resource: &Resource,
    loads: &[WeekLoad],
    settings: &OptimizeSettings,
    index: &TaskIndex<'_>,
) -> Vec<ShiftSuggestion> {
    let overloaded: Vec<usize> = loads
        .iter()
        .enumerate()
        .filter(|(_, w)| w.percentage > 100.0)
        .map(|(i, _)| i)
        .collect();
    if overloaded.is_empty() {
        return Vec::new();
    }
    let underloaded: Vec<usize> = loads
        .iter()
        .enumerate()
        .filter(|(_, w)| w.percentage < settings.target_load_pct)
        .map(|(i, _)| i)
        .collect();

    let mut suggestions = Vec::new();

    for &week_idx in &overloaded {
        let week = &loads[week_idx];
        let mut candidates = tasks_in_week(project, resource, week);

        // Largest tasks in the most overloaded weeks rank first
        candidates.sort_by(|a, b| {
            task_impact(b, week)
                .partial_cmp(&task_impact(a, week))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for candidate in &candidates {
            let mut best: Option<(i64, usize)> = None;
            let mut best_improvement = 0.0;

            for &target_idx in &underloaded {
                if target_idx == week_idx {
                    continue;
                }
                let (found, improvement) = search_best_shift(
                    candidate,
                    loads,
                    week_idx,
                    target_idx,
                    settings.max_shift_days,
                    index,
                );
                let Some(found) = found else {
                    continue;
                };
                if improvement <= best_improvement {
                    continue;
                }

                // The search may return a shift whose dependency state was
                // never probed (fast path); re-check, and on failure fall
                // back to the first smaller shift that clears both gates.
                let new_start = candidate.start + Duration::days(found);
                let (dep_ok, _) = can_shift(&candidate.task.id, new_start, index);
                if dep_ok {
                    best_improvement = improvement;
                    best = Some((found, target_idx));
                } else if found > 1 {
                    for smaller in 1..found {
                        let probe_start = candidate.start + Duration::days(smaller);
                        let (probe_ok, _) = can_shift(&candidate.task.id, probe_start, index);
                        if !probe_ok {
                            continue;
                        }
                        let outcome = evaluate_shift(
                            candidate,
                            &loads[week_idx],
                            &loads[target_idx],
                            smaller,
                        );
                        if outcome.valid && outcome.improvement_pct > best_improvement {
                            best_improvement = outcome.improvement_pct;
                            best = Some((smaller, target_idx));
                            break;
                        }
                    }
                }
            }

            if let Some((shift_days, target_idx)) = best {
                let outcome =
                    evaluate_shift(candidate, &loads[week_idx], &loads[target_idx], shift_days);
                suggestions.push(ShiftSuggestion {
                    resource_name: resource.name.clone(),
                    task_name: candidate.task.name.clone(),
                    task_hours: candidate.hours,
                    original_start: candidate.start,
                    original_end: candidate.end,
                    suggested_start: candidate.start + Duration::days(shift_days),
                    suggested_end: candidate.end + Duration::days(shift_days),
                    shift_days,
                    improvement_pct: best_improvement,
                    hours_freed: outcome.hours_removed,
                    hours_added: outcome.hours_added,
                    reason: format!(
                        "Reduce overload by {:.1}h in week {}",
                        outcome.hours_removed, week.week.label
                    ),
                    priority: if week.percentage > 120.0 {
                        Priority::High
                    } else {
                        Priority::Medium
                    },
                });

                // Balance mode moves one task per overloaded week per pass
                if settings.mode == OptimizeMode::Balance {
                    break;
                }
            }
        }
    }

    suggestions
}

/// Resolved, dated assignments of this resource whose interval intersects
/// the week.
fn tasks_in_week<'a>(
    project: &'a Project,
    resource: &Resource,
    week: &WeekLoad,
) -> Vec<CandidateTask<'a>> {
    let mut candidates = Vec::new();
    for assignment in project
        .assignments
        .iter()
        .filter(|a| a.resource_name == resource.name)
    {
        let Some(task) = project.resolve_task(assignment) else {
            continue;
        };
        let (Some(start), Some(end)) = (task.start, task.finish) else {
            continue;
        };
        if end < week.week.start || start > week.week.end {
            continue;
        }
        candidates.push(CandidateTask {
            task,
            start,
            end,
            hours: assignment.work_hours,
        });
    }
    candidates
}

/// Impact = hours the task puts into the week × the week's overload level.
fn task_impact(candidate: &CandidateTask<'_>, week: &WeekLoad) -> f64 {
    let days = overlap_days(
        candidate.start,
        candidate.end,
        week.week.start,
        week.week.end,
    );
    if days == 0 {
        return 0.0;
    }
    let task_days = candidate.duration_days();
    if task_days <= 0 {
        return 0.0;
    }
    let hours_in_week = candidate.hours * days as f64 / task_days as f64;
    hours_in_week * week.percentage
}

/// Group suggestions by resource name, preserving emission order.
pub fn suggestions_by_resource(
    suggestions: &[ShiftSuggestion],
) -> HashMap<String, Vec<&ShiftSuggestion>> {
    let mut grouped: HashMap<String, Vec<&ShiftSuggestion>> = HashMap::new();
    for suggestion in suggestions {
        grouped
            .entry(suggestion.resource_name.clone())
            .or_default()
            .push(suggestion);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadshift_core::{date, Assignment, Task};

    /// One resource, one 14-day 112h task: week 1 and 2 at 140%, weeks 3-4
    /// idle. The canonical optimizer scenario.
    fn overloaded_project() -> Project {
        let mut project = Project::new("Test");
        project.resources.push(Resource::new("Alice"));
        project.tasks.push(
            Task::new("1")
                .name("Build")
                .spanning(date(2024, 1, 1), date(2024, 1, 14)),
        );
        project.tasks.push(
            Task::new("2")
                .name("Polish")
                .spanning(date(2024, 1, 22), date(2024, 1, 28)),
        );
        project.assignments.push(
            Assignment::new("Alice", "Build")
                .task_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 14)))
                .work_hours(112.0),
        );
        project.assignments.push(
            Assignment::new("Alice", "Polish")
                .task_dates(Some(date(2024, 1, 22)), Some(date(2024, 1, 28)))
                .work_hours(8.0),
        );
        project
    }

    #[test]
    fn optimizer_proposes_valid_shift() {
        let project = overloaded_project();
        let settings = OptimizeSettings::default();

        let suggestions = optimize(&project, &settings, None, None);
        assert!(!suggestions.is_empty(), "overload must yield a suggestion");

        let s = &suggestions[0];
        assert_eq!(s.resource_name, "Alice");
        assert_eq!(s.task_name, "Build");
        assert!((1..=settings.max_shift_days).contains(&s.shift_days));
        assert!(s.improvement_pct > 0.0);
        assert_eq!(
            s.suggested_start,
            s.original_start + Duration::days(s.shift_days)
        );
        assert_eq!(s.priority, Priority::High); // 140% > 120%
    }

    #[test]
    fn optimizer_is_deterministic() {
        let project = overloaded_project();
        let settings = OptimizeSettings::default();

        let first = optimize(&project, &settings, None, None);
        let second = optimize(&project, &settings, None, None);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.task_name, b.task_name);
            assert_eq!(a.shift_days, b.shift_days);
            assert_eq!(a.suggested_start, b.suggested_start);
        }
    }

    #[test]
    fn optimizer_skips_filtered_resources() {
        let project = overloaded_project();
        let settings = OptimizeSettings::default();

        let only_bob = vec!["Bob".to_string()];
        let suggestions = optimize(&project, &settings, None, Some(&only_bob));
        assert!(suggestions.is_empty());

        // An empty filter list means no filtering
        let suggestions = optimize(&project, &settings, None, Some(&[]));
        assert!(!suggestions.is_empty());
    }

    #[test]
    fn optimizer_empty_without_any_dates() {
        let mut project = Project::new("Test");
        project.resources.push(Resource::new("Alice"));
        project.tasks.push(Task::new("1").name("Undated"));
        project
            .assignments
            .push(Assignment::new("Alice", "Undated").work_hours(400.0));

        let suggestions = optimize(&project, &OptimizeSettings::default(), None, None);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn optimizer_quiet_when_nothing_overloaded() {
        let mut project = Project::new("Test");
        project.resources.push(Resource::new("Alice"));
        project.tasks.push(
            Task::new("1")
                .name("Light")
                .spanning(date(2024, 1, 1), date(2024, 1, 14)),
        );
        project.assignments.push(
            Assignment::new("Alice", "Light")
                .task_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 14)))
                .work_hours(40.0),
        );

        let suggestions = optimize(&project, &OptimizeSettings::default(), None, None);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn dependency_blocks_shift_suggestion() {
        // Build depends on Prep which finishes after every reachable
        // shifted start; no suggestion may violate it.
        let mut project = overloaded_project();
        project.tasks.push(
            Task::new("0")
                .name("Prep")
                .spanning(date(2024, 1, 1), date(2024, 3, 1)),
        );
        project.tasks[0].predecessors.push("0".to_string());

        let suggestions = optimize(&project, &OptimizeSettings::default(), None, None);
        assert!(
            suggestions.iter().all(|s| s.task_name != "Build"),
            "dependency-violating shifts must not be suggested"
        );
    }

    #[test]
    fn impact_ranks_heavier_tasks_first() {
        let week = WeekLoad {
            week: loadshift_core::WeekBucket::new(date(2024, 1, 1), date(2024, 1, 7)),
            hours: 60.0,
            capacity: 40.0,
            percentage: 150.0,
        };
        let heavy_task = Task::new("1")
            .name("Heavy")
            .spanning(date(2024, 1, 1), date(2024, 1, 7));
        let light_task = Task::new("2")
            .name("Light")
            .spanning(date(2024, 1, 1), date(2024, 1, 7));
        let heavy = CandidateTask {
            task: &heavy_task,
            start: date(2024, 1, 1),
            end: date(2024, 1, 7),
            hours: 40.0,
        };
        let light = CandidateTask {
            task: &light_task,
            start: date(2024, 1, 1),
            end: date(2024, 1, 7),
            hours: 10.0,
        };

        assert!(task_impact(&heavy, &week) > task_impact(&light, &week));
    }

    #[test]
    fn minimize_peaks_considers_every_task_in_week() {
        // Two shiftable tasks in the same overloaded week: balance mode
        // emits one suggestion, minimize-peaks may emit more.
        let mut project = Project::new("Test");
        project.resources.push(Resource::new("Alice"));
        for (id, name) in [("1", "Alpha"), ("2", "Beta")] {
            project.tasks.push(
                Task::new(id)
                    .name(name)
                    .spanning(date(2024, 1, 1), date(2024, 1, 7)),
            );
            project.assignments.push(
                Assignment::new("Alice", name)
                    .task_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 7)))
                    .work_hours(30.0),
            );
        }
        // A later idle stretch to shift into
        project.tasks.push(
            Task::new("3")
                .name("Later")
                .spanning(date(2024, 2, 1), date(2024, 2, 7)),
        );

        let balance = optimize(&project, &OptimizeSettings::default(), None, None);
        let peaks_settings = OptimizeSettings {
            mode: OptimizeMode::MinimizePeaks,
            ..OptimizeSettings::default()
        };
        let peaks = optimize(&project, &peaks_settings, None, None);

        assert_eq!(balance.len(), 1);
        assert!(peaks.len() >= balance.len());
    }

    #[test]
    fn grouping_preserves_emission_order() {
        let project = overloaded_project();
        let suggestions = optimize(&project, &OptimizeSettings::default(), None, None);
        let grouped = suggestions_by_resource(&suggestions);
        assert_eq!(grouped.len(), 1);
        assert!(grouped.contains_key("Alice"));
    }
}
