//! # loadshift-core
//!
//! Core domain model for the loadshift workload analysis engine.
//!
//! This crate provides:
//! - Domain types: `Project`, `Task`, `Resource`, `Assignment`
//! - Derived records: `WorkloadRecord`, `WeekLoad`, `ShiftSuggestion`
//! - Temporal/capacity utilities (business days, range overlap)
//!
//! ## Example
//!
//! ```rust
//! use loadshift_core::{Project, Task, Resource, Assignment, date};
//!
//! let mut project = Project::new("Release 1");
//! project.tasks.push(
//!     Task::new("1")
//!         .name("Design")
//!         .spanning(date(2024, 1, 1), date(2024, 1, 14))
//! );
//! project.resources.push(Resource::new("alice"));
//! project.assignments.push(
//!     Assignment::new("alice", "Design")
//!         .task_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 14)))
//!         .work_hours(112.0)
//! );
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub mod temporal;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a task
pub type TaskId = String;

/// Unique key for a resource (resources are identified by name)
pub type ResourceName = String;

/// Construct a `NaiveDate` from components; panics on invalid input.
///
/// Convenience for tests and examples where the date is a literal.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

// ============================================================================
// Project
// ============================================================================

/// An ingested schedule dataset: tasks, resources and assignments.
///
/// Read-only to the analysis core; all derived records are recomputed from
/// scratch on every call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Project {
    /// Human-readable name (source file stem, typically)
    pub name: String,
    /// All tasks in the dataset
    pub tasks: Vec<Task>,
    /// All resources in the dataset
    pub resources: Vec<Resource>,
    /// Resource-to-task effort links
    pub assignments: Vec<Assignment>,
}

impl Project {
    /// Create a new empty project with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
            resources: Vec::new(),
            assignments: Vec::new(),
        }
    }

    /// Get a task by ID
    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a resource by name
    pub fn get_resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Resolve an assignment to its task via the (name, start, finish) tuple.
    pub fn resolve_task(&self, assignment: &Assignment) -> Option<&Task> {
        find_task_by_name_and_dates(
            &self.tasks,
            &assignment.task_name,
            assignment.task_start,
            assignment.task_finish,
        )
    }

    /// The span `min(task.start) .. max(task.finish)` over dated tasks.
    ///
    /// Returns `None` when no task carries the respective bound.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.tasks.iter().filter_map(|t| t.start).min()?;
        let end = self.tasks.iter().filter_map(|t| t.finish).max()?;
        Some((start, end))
    }

    /// Merge another dataset into this one.
    ///
    /// Resources merge by name and the higher `max_units` wins; tasks and
    /// assignments concatenate. Derived percentages must be recomputed after
    /// merging, never summed across sources.
    pub fn merge(&mut self, other: Project) {
        for resource in other.resources {
            match self.resources.iter_mut().find(|r| r.name == resource.name) {
                Some(existing) => {
                    if resource.max_units > existing.max_units {
                        existing.max_units = resource.max_units;
                    }
                }
                None => self.resources.push(resource),
            }
        }
        self.tasks.extend(other.tasks);
        self.assignments.extend(other.assignments);
    }
}

/// Find a task by name plus optional start/finish date equality.
///
/// This is the dataset's documented join contract: assignments reference
/// tasks by `(name, start, finish)` rather than by id. A bound left `None`
/// on the query side matches any value; a query with neither date returns
/// the first task with a matching name.
pub fn find_task_by_name_and_dates<'a>(
    tasks: &'a [Task],
    task_name: &str,
    task_start: Option<NaiveDate>,
    task_finish: Option<NaiveDate>,
) -> Option<&'a Task> {
    if task_name.is_empty() {
        return None;
    }

    tasks.iter().find(|task| {
        if task.name != task_name {
            return false;
        }
        if task_start.is_none() && task_finish.is_none() {
            return true;
        }
        let start_match = task_start.map_or(true, |query| task.start == Some(query));
        let finish_match = task_finish.map_or(true, |query| task.finish == Some(query));
        start_match && finish_match
    })
}

// ============================================================================
// Task
// ============================================================================

/// A schedulable unit of work.
///
/// `start`/`finish` may be absent (unscheduled). Identity is `id`, but ids
/// serve dependency lookups only; see [`find_task_by_name_and_dates`] for
/// how assignments reference tasks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Human-readable name
    pub name: String,
    /// Scheduled start date
    pub start: Option<NaiveDate>,
    /// Scheduled finish date
    pub finish: Option<NaiveDate>,
    /// Finish-to-start predecessor task ids
    pub predecessors: Vec<TaskId>,
}

impl Task {
    /// Create a new task with the given ID
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            start: None,
            finish: None,
            predecessors: Vec::new(),
        }
    }

    /// Set the task name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set both schedule bounds
    pub fn spanning(mut self, start: NaiveDate, finish: NaiveDate) -> Self {
        self.start = Some(start);
        self.finish = Some(finish);
        self
    }

    /// Set the start date
    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the finish date
    pub fn finishing(mut self, finish: NaiveDate) -> Self {
        self.finish = Some(finish);
        self
    }

    /// Add a finish-to-start predecessor
    pub fn depends_on(mut self, predecessor: impl Into<String>) -> Self {
        self.predecessors.push(predecessor.into());
        self
    }

    /// Whether both schedule bounds are known
    pub fn is_scheduled(&self) -> bool {
        self.start.is_some() && self.finish.is_some()
    }

    /// Calendar duration in days, inclusive of both bounds.
    pub fn duration_days(&self) -> Option<i64> {
        match (self.start, self.finish) {
            (Some(start), Some(finish)) if finish >= start => {
                Some((finish - start).num_days() + 1)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Resource
// ============================================================================

/// A person that can be assigned effort
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Resource {
    /// Unique key
    pub name: ResourceName,
    /// Fraction of full-time (1.0 = full time, 0.5 = half time)
    pub max_units: f64,
}

impl Resource {
    /// Create a new full-time resource
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_units: 1.0,
        }
    }

    /// Set the full-time fraction
    pub fn max_units(mut self, max_units: f64) -> Self {
        self.max_units = max_units;
        self
    }
}

// ============================================================================
// Assignment
// ============================================================================

/// Links a resource to a task's effort.
///
/// Carries the task's name and dates as the lookup key; has no identity of
/// its own.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Assignment {
    /// Name of the assigned resource
    pub resource_name: ResourceName,
    /// Name of the task worked on
    pub task_name: String,
    /// Task start date as recorded on the assignment
    pub task_start: Option<NaiveDate>,
    /// Task finish date as recorded on the assignment
    pub task_finish: Option<NaiveDate>,
    /// Effort demanded, in work-hours
    pub work_hours: f64,
    /// Allocation units (1.0 = 100%)
    pub units: f64,
}

impl Assignment {
    /// Create a new assignment linking a resource to a task name
    pub fn new(resource: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            resource_name: resource.into(),
            task_name: task.into(),
            task_start: None,
            task_finish: None,
            work_hours: 0.0,
            units: 1.0,
        }
    }

    /// Set the task date key
    pub fn task_dates(mut self, start: Option<NaiveDate>, finish: Option<NaiveDate>) -> Self {
        self.task_start = start;
        self.task_finish = finish;
        self
    }

    /// Set the effort in work-hours
    pub fn work_hours(mut self, hours: f64) -> Self {
        self.work_hours = hours;
        self
    }

    /// Set the allocation units
    pub fn units(mut self, units: f64) -> Self {
        self.units = units;
        self
    }
}

// ============================================================================
// Derived Records
// ============================================================================

/// A 7-day analysis bucket (the last bucket of a range may be shorter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBucket {
    /// First day of the bucket
    pub start: NaiveDate,
    /// Last day of the bucket, clipped to the analysis range
    pub end: NaiveDate,
    /// Stable label (ISO date of `start`); the merge key across sources
    pub label: String,
}

impl WeekBucket {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            label: start.format("%Y-%m-%d").to_string(),
            start,
            end,
        }
    }
}

/// Load on one resource in one week bucket
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeekLoad {
    /// The bucket this load falls into
    pub week: WeekBucket,
    /// Demanded work-hours
    pub hours: f64,
    /// Capacity in hours (constant 40 × max_units, even for clipped buckets)
    pub capacity: f64,
    /// `100 × hours / capacity`, 0 when capacity is 0
    pub percentage: f64,
}

/// Per-task effort detail inside a workload record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskEffort {
    pub task_name: String,
    pub work_hours: f64,
    pub start: Option<NaiveDate>,
    pub finish: Option<NaiveDate>,
}

/// Aggregated workload for one resource over an analysis window.
///
/// A pure function of (tasks, resources, assignments, range); never mutated
/// in place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub resource_name: ResourceName,
    /// Total demanded work-hours in the window
    pub total_work_hours: f64,
    /// Available capacity in hours, scaled by max_units
    pub max_capacity_hours: f64,
    /// `100 × total / capacity`, 0 when capacity is 0
    pub workload_percentage: f64,
    /// Number of resolved assignments
    pub task_count: usize,
    /// Per-task breakdown
    pub tasks: Vec<TaskEffort>,
}

/// Suggestion priority
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// A recommended task date-shift produced by the optimizer.
///
/// Advisory only; the schedule itself is never rewritten.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShiftSuggestion {
    pub resource_name: ResourceName,
    pub task_name: String,
    /// Total effort of the shifted assignment
    pub task_hours: f64,
    pub original_start: NaiveDate,
    pub original_end: NaiveDate,
    pub suggested_start: NaiveDate,
    pub suggested_end: NaiveDate,
    /// Calendar days the task moves forward
    pub shift_days: i64,
    /// Percentage-point drop in the source week's load
    pub improvement_pct: f64,
    /// Hours leaving the source week
    pub hours_freed: f64,
    /// Hours landing in the target week
    pub hours_added: f64,
    pub reason: String,
    pub priority: Priority,
}

/// A predecessor that blocks a proposed shift
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingTask {
    pub id: TaskId,
    pub name: String,
    /// The predecessor's finish; the shifted task may not start before it
    pub finish: NaiveDate,
}

// ============================================================================
// Optimizer Settings
// ============================================================================

/// Optimization strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizeMode {
    /// One task moved per overloaded week per pass
    #[default]
    Balance,
    /// Every candidate task in an overloaded week may get a suggestion
    MinimizePeaks,
}

/// Error parsing an [`OptimizeMode`] from text
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown optimization mode '{0}' (expected 'balance' or 'minimize-peaks')")]
pub struct ParseModeError(String);

impl FromStr for OptimizeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance" => Ok(OptimizeMode::Balance),
            "minimize-peaks" | "minimize_peaks" => Ok(OptimizeMode::MinimizePeaks),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

impl std::fmt::Display for OptimizeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizeMode::Balance => write!(f, "balance"),
            OptimizeMode::MinimizePeaks => write!(f, "minimize-peaks"),
        }
    }
}

/// Tunables for the shift optimizer
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeSettings {
    /// Maximum calendar days a task may move
    pub max_shift_days: i64,
    /// Weeks below this load percentage are shift targets
    pub target_load_pct: f64,
    /// Strategy
    pub mode: OptimizeMode,
}

impl Default for OptimizeSettings {
    fn default() -> Self {
        Self {
            max_shift_days: 14,
            target_load_pct: 85.0,
            mode: OptimizeMode::Balance,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
