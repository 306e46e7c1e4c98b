//! Capacity-based recommendations
//!
//! Turns a classified workload analysis into coarse staffing advisories:
//! move hours from overloaded to underutilized resources, hire when no one
//! has spare capacity, raise utilization when no one is overloaded.

use loadshift_core::Priority;
use serde::Serialize;

use crate::classify::WorkloadAnalysis;

/// An advisory derived from aggregate capacity, not from the weekly
/// timeline; complements the optimizer's date-shift suggestions.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recommendation {
    /// Move hours from an overloaded resource to an underutilized one
    ReassignTasks {
        from: String,
        to: String,
        hours: f64,
        priority: Priority,
    },
    /// Nobody has spare capacity; the overload needs new staff
    HireAdditional {
        resource: String,
        reason: String,
        priority: Priority,
    },
    /// Spare capacity with no overload anywhere
    IncreaseUtilization {
        resource: String,
        available_pct: f64,
        available_hours: f64,
        priority: Priority,
    },
}

/// Generate recommendations from a classified aggregate.
pub fn recommend(analysis: &WorkloadAnalysis) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let overloaded = &analysis.overloaded;
    let underutilized = &analysis.underutilized;

    if !overloaded.is_empty() && !underutilized.is_empty() {
        for over in overloaded {
            let excess_hours =
                (over.workload_percentage - 100.0) / 100.0 * over.max_capacity_hours;
            let priority = if over.workload_percentage > 120.0 {
                Priority::High
            } else {
                Priority::Medium
            };

            for under in underutilized {
                let available_hours =
                    (100.0 - under.workload_percentage) / 100.0 * under.max_capacity_hours;
                if available_hours <= 0.0 {
                    continue;
                }
                recommendations.push(Recommendation::ReassignTasks {
                    from: over.resource_name.clone(),
                    to: under.resource_name.clone(),
                    hours: excess_hours.min(available_hours),
                    priority,
                });
            }
        }
    } else if !overloaded.is_empty() {
        for over in overloaded {
            let overload_pct = over.workload_percentage - 100.0;
            let excess_hours = overload_pct / 100.0 * over.max_capacity_hours;
            recommendations.push(Recommendation::HireAdditional {
                resource: over.resource_name.clone(),
                reason: format!(
                    "Overloaded by {:.1}% ({:.1} hours)",
                    overload_pct, excess_hours
                ),
                priority: if over.workload_percentage > 120.0 {
                    Priority::High
                } else {
                    Priority::Medium
                },
            });
        }
    } else {
        for under in underutilized {
            let available_pct = 100.0 - under.workload_percentage;
            recommendations.push(Recommendation::IncreaseUtilization {
                resource: under.resource_name.clone(),
                available_pct,
                available_hours: available_pct / 100.0 * under.max_capacity_hours,
                priority: Priority::Low,
            });
        }
    }

    recommendations
}
