//! # loadshift-solver
//!
//! Workload aggregation and task-shifting optimization.
//!
//! This crate provides:
//! - Per-resource workload aggregation and weekly load timelines
//! - Overloaded / optimal / underutilized classification
//! - Finish-to-start dependency checking for proposed shifts
//! - Binary-search task-shift optimization across week buckets
//! - Capacity-based reassignment recommendations
//!
//! Every entry point is a pure function of an immutable [`Project`]
//! snapshot; nothing is cached and nothing is mutated, so concurrent calls
//! over the same snapshot are safe by construction.
//!
//! ## Example
//!
//! ```rust,ignore
//! use loadshift_core::{OptimizeSettings, Project};
//! use loadshift_solver::{aggregate, classify, optimize};
//!
//! let project: Project = load_from_somewhere();
//! let records = aggregate(&project, None);
//! let analysis = classify(records);
//! let suggestions = optimize(&project, &OptimizeSettings::default(), None, None);
//! ```

pub mod aggregate;
pub mod classify;
pub mod deps;
pub mod merge;
pub mod optimize;
pub mod recommend;
pub mod shift;

pub use aggregate::{
    aggregate, effective_range, unmatched_assignments, week_buckets, weekly_timeline,
};
pub use classify::{classify, Band, WorkloadAnalysis};
pub use deps::{can_shift, task_index, TaskIndex};
pub use merge::merge_weekly_timelines;
pub use optimize::optimize;
pub use recommend::{recommend, Recommendation};
pub use shift::{evaluate_shift, search_best_shift, CandidateTask, ShiftOutcome};
