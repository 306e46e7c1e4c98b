//! Integration tests for the task-shifting optimizer
//!
//! Full pipeline scenarios: weekly timeline → dependency checks →
//! binary-search shift selection → suggestions.

use chrono::{Duration, NaiveDate};
use loadshift_core::{
    Assignment, OptimizeMode, OptimizeSettings, Priority, Project, Resource, Task,
};
use loadshift_solver::{can_shift, optimize, task_index, weekly_timeline};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Alice works "Build" (Jan 1–14, 112h → weeks 1–2 at 140%) and "Wrap up"
/// (Jan 15–21, 8h → week 3 at 20%).
fn overloaded_schedule() -> Project {
    let mut project = Project::new("Release");
    project.resources.push(Resource::new("Alice"));
    project.tasks.push(
        Task::new("1")
            .name("Build")
            .spanning(date(2024, 1, 1), date(2024, 1, 14)),
    );
    project.tasks.push(
        Task::new("2")
            .name("Wrap up")
            .spanning(date(2024, 1, 15), date(2024, 1, 21)),
    );
    project.assignments.push(
        Assignment::new("Alice", "Build")
            .task_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 14)))
            .work_hours(112.0),
    );
    project.assignments.push(
        Assignment::new("Alice", "Wrap up")
            .task_dates(Some(date(2024, 1, 15)), Some(date(2024, 1, 21)))
            .work_hours(8.0),
    );
    project
}

#[test]
fn proposed_shift_relieves_the_overloaded_week() {
    let project = overloaded_schedule();
    let settings = OptimizeSettings {
        max_shift_days: 14,
        target_load_pct: 85.0,
        mode: OptimizeMode::Balance,
    };

    let timeline = weekly_timeline(&project, None);
    let before = &timeline["Alice"];
    assert!((before[0].percentage - 140.0).abs() < 1e-9);
    assert!((before[2].percentage - 20.0).abs() < 1e-9);
    assert_eq!(before[2].capacity, 40.0);

    let suggestions = optimize(&project, &settings, None, None);
    assert!(!suggestions.is_empty());

    let s = &suggestions[0];
    assert_eq!(s.resource_name, "Alice");
    assert_eq!(s.task_name, "Build");
    assert!((1..=14).contains(&s.shift_days));

    // Recompute both weeks under the suggested shift: the source must end
    // strictly below 140% and the target — week 3 is the only underloaded
    // candidate here — must stay at or below 100%.
    let source = &before[0];
    let new_source_pct = (source.hours - s.hours_freed) / source.capacity * 100.0;
    assert!(new_source_pct < source.percentage);

    let target = &before[2];
    let new_target_pct = (target.hours + s.hours_added) / target.capacity * 100.0;
    assert!(new_target_pct <= 100.0 + 1e-9);

    // The shifted interval actually reaches the target week
    assert!(s.suggested_end >= target.week.start);
}

#[test]
fn suggestion_carries_advisory_fields() {
    let project = overloaded_schedule();
    let suggestions = optimize(&project, &OptimizeSettings::default(), None, None);

    let s = &suggestions[0];
    assert_eq!(s.task_hours, 112.0);
    assert_eq!(s.original_start, date(2024, 1, 1));
    assert_eq!(s.original_end, date(2024, 1, 14));
    assert_eq!(s.suggested_start, s.original_start + Duration::days(s.shift_days));
    assert_eq!(s.suggested_end, s.original_end + Duration::days(s.shift_days));
    assert!(s.hours_freed > 0.0);
    assert!(s.improvement_pct > 0.0);
    assert!(s.reason.contains("Reduce overload"));
    assert_eq!(s.priority, Priority::High);
}

#[test]
fn optimizer_never_mutates_the_project() {
    let project = overloaded_schedule();
    let before = weekly_timeline(&project, None);

    let _ = optimize(&project, &OptimizeSettings::default(), None, None);

    let after = weekly_timeline(&project, None);
    assert_eq!(before["Alice"].len(), after["Alice"].len());
    for (b, a) in before["Alice"].iter().zip(after["Alice"].iter()) {
        assert_eq!(b.hours, a.hours);
        assert_eq!(b.percentage, a.percentage);
    }
}

#[test]
fn finish_to_start_dependency_blocks_early_start() {
    // TaskA finishes Mar 10; TaskB depends on it. Starting B on Mar 5 must
    // be rejected with TaskA reported as blocking.
    let tasks = vec![
        Task::new("a")
            .name("TaskA")
            .spanning(date(2024, 3, 1), date(2024, 3, 10)),
        Task::new("b")
            .name("TaskB")
            .spanning(date(2024, 3, 11), date(2024, 3, 20))
            .depends_on("a"),
    ];
    let index = task_index(&tasks);

    let (ok, blocking) = can_shift("b", date(2024, 3, 5), &index);
    assert!(!ok);
    assert_eq!(blocking.len(), 1);
    assert_eq!(blocking[0].id, "a");
    assert_eq!(blocking[0].finish, date(2024, 3, 10));
}

#[test]
fn blocked_task_is_passed_over_for_shiftable_one() {
    // Two tasks load the same overloaded week; the heavier one is pinned
    // behind a far-future predecessor, so the optimizer should fall
    // through to the lighter, shiftable one.
    let mut project = Project::new("Release");
    project.resources.push(Resource::new("Alice"));
    project.tasks.push(
        Task::new("fence")
            .name("Fence")
            .spanning(date(2024, 1, 1), date(2024, 6, 1)),
    );
    project.tasks.push(
        Task::new("1")
            .name("Pinned")
            .spanning(date(2024, 1, 1), date(2024, 1, 7))
            .depends_on("fence"),
    );
    project.tasks.push(
        Task::new("2")
            .name("Movable")
            .spanning(date(2024, 1, 1), date(2024, 1, 7)),
    );
    project.assignments.push(
        Assignment::new("Alice", "Pinned")
            .task_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 7)))
            .work_hours(40.0),
    );
    project.assignments.push(
        Assignment::new("Alice", "Movable")
            .task_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 7)))
            .work_hours(20.0),
    );

    // Analyze January only so the long fence task does not stretch the
    // range (it carries no assignment, only a finish date).
    let range = Some((date(2024, 1, 1), date(2024, 1, 31)));
    let suggestions = optimize(&project, &OptimizeSettings::default(), range, None);

    assert!(!suggestions.is_empty());
    assert!(suggestions.iter().all(|s| s.task_name != "Pinned"));
    assert_eq!(suggestions[0].task_name, "Movable");
}

#[test]
fn minimize_peaks_emits_per_task_suggestions() {
    let mut project = Project::new("Release");
    project.resources.push(Resource::new("Alice"));
    for (id, name, hours) in [("1", "Alpha", 30.0), ("2", "Beta", 25.0)] {
        project.tasks.push(
            Task::new(id)
                .name(name)
                .spanning(date(2024, 1, 1), date(2024, 1, 7)),
        );
        project.assignments.push(
            Assignment::new("Alice", name)
                .task_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 7)))
                .work_hours(hours),
        );
    }

    let range = Some((date(2024, 1, 1), date(2024, 1, 28)));
    let balance = optimize(&project, &OptimizeSettings::default(), range, None);
    let peaks = optimize(
        &project,
        &OptimizeSettings {
            mode: OptimizeMode::MinimizePeaks,
            ..OptimizeSettings::default()
        },
        range,
        None,
    );

    assert_eq!(balance.len(), 1);
    assert_eq!(peaks.len(), 2);
    // Impact ranking puts the heavier task first
    assert_eq!(peaks[0].task_name, "Alpha");
    assert_eq!(peaks[1].task_name, "Beta");
}

#[test]
fn no_overload_means_no_suggestions() {
    let mut project = Project::new("Calm");
    project.resources.push(Resource::new("Alice"));
    project.tasks.push(
        Task::new("1")
            .name("Steady")
            .spanning(date(2024, 1, 1), date(2024, 1, 14)),
    );
    project.assignments.push(
        Assignment::new("Alice", "Steady")
            .task_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 14)))
            .work_hours(60.0),
    );

    let suggestions = optimize(&project, &OptimizeSettings::default(), None, None);
    assert!(suggestions.is_empty());
}
